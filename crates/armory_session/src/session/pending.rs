//! PendingSync — coalescing debounce для reconciliation
//!
//! - schedule при пустом слоте → новый таймер
//! - schedule при активном таймере → игнор (join'ы схлопываются в один pass)
//! - срабатывание / clear → слот пуст

use bevy::prelude::*;
use std::time::Duration;

#[derive(Resource, Debug, Default)]
pub struct PendingSync {
    timer: Option<Timer>,
}

impl PendingSync {
    pub fn is_pending(&self) -> bool {
        self.timer.is_some()
    }

    /// true → таймер запущен этим вызовом
    pub fn schedule(&mut self, delay: Duration) -> bool {
        if self.timer.is_some() {
            return false;
        }
        self.timer = Some(Timer::new(delay, TimerMode::Once));
        true
    }

    /// true → таймер истёк (и слот уже очищен)
    pub fn tick(&mut self, delta: Duration) -> bool {
        let Some(timer) = self.timer.as_mut() else {
            return false;
        };

        if timer.tick(delta).finished() {
            self.timer = None;
            return true;
        }
        false
    }

    pub fn clear(&mut self) {
        self.timer = None;
    }
}
