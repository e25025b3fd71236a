//! Session events
//!
//! **Host → core:** `SessionStarted`, `UserJoined`, `UserLeft`, `ClickEvent` (см. host)
//! **Intents (внутри core):** `ToggleEquipIntent`, `TriggerPulled`
//! **Core → наружу:** `ReconcileCompleted`, `SessionFailed`

use bevy::prelude::*;

use crate::host::{ActorId, UserId};

/// Движок запустил сессию (может прийти повторно)
#[derive(Event, Clone, Debug, Default)]
pub struct SessionStarted;

#[derive(Event, Clone, Debug)]
pub struct UserJoined {
    pub user: UserId,
}

#[derive(Event, Clone, Debug)]
pub struct UserLeft {
    pub user: UserId,
}

/// Клик по ячейке меню
///
/// # Flow
/// 1. Пользователь уже держит prop (любой) → remove, конец
/// 2. Иначе → создать prop шаблона и привязать к пользователю
#[derive(Event, Clone, Debug)]
pub struct ToggleEquipIntent {
    pub user: UserId,
    pub template: String,
}

/// Клик по trigger volume prop'а (instance ищется по anchor)
#[derive(Event, Clone, Debug)]
pub struct TriggerPulled {
    pub anchor: ActorId,
    pub user: UserId,
}

/// Reconciliation pass выполнен
#[derive(Event, Clone, Debug, PartialEq, Eq)]
pub struct ReconcileCompleted {
    pub equipped: usize,
    pub spawned: usize,
}

/// Сессия не смогла стартовать (template set не загружен)
#[derive(Event, Clone, Debug)]
pub struct SessionFailed {
    pub error: String,
}
