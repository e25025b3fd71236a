//! Session module — жизненный цикл props в shared session
//!
//! ECS ответственность:
//! - Templates: load (built-in или remote), меню, world props
//! - Ownership: кто что держит (EquippedRegistry / SpawnedRegistry)
//! - Reconciliation: debounce после join'ов
//!
//! Host ответственность (SceneHost):
//! - Actors, attachment, click detection, grid layout
//! - ClickEvent / UserJoined / UserLeft → ECS

use bevy::prelude::*;

pub mod config;
pub mod controller;
pub mod events;
pub mod pending;
pub mod registry;
pub mod systems;

#[cfg(test)]
mod controller_tests;

pub use config::{SessionConfig, DEFAULT_BULLET_TTL, MIN_SYNC_INTERVAL, URL_PARAM};
pub use controller::{Fetcher, SessionController, SessionPhase, TemplateLoad};
pub use events::{
    ReconcileCompleted, SessionFailed, SessionStarted, ToggleEquipIntent, TriggerPulled,
    UserJoined, UserLeft,
};
pub use pending::PendingSync;
pub use registry::{EquippedRegistry, SpawnedRegistry};

use crate::ephemeral::expire_ephemerals;
use crate::host::ClickEvent;
use crate::menu::MenuLayout;
use crate::template::TemplateSet;

/// Session Plugin
///
/// Требует `Scene` resource (движок) до первого update.
///
/// Порядок выполнения (Update):
/// 1. handle_session_start — SessionStarted → load / respawn
/// 2. poll_template_load — remote fetch завершился?
/// 3. schedule_reconcile — UserJoined → PendingSync
/// 4. route_clicks — ClickEvent → ToggleEquipIntent / TriggerPulled
/// 5. expire_ephemerals — ttl bullets (до активаций: новый bullet не тикает в кадре создания)
/// 6. process_toggle_equip
/// 7. process_trigger_pulls
/// 8. process_user_left
/// 9. tick_pending_sync — reconciliation видит состояние после всех событий кадра
pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<SessionStarted>()
            .add_event::<UserJoined>()
            .add_event::<UserLeft>()
            .add_event::<ClickEvent>()
            .add_event::<ToggleEquipIntent>()
            .add_event::<TriggerPulled>()
            .add_event::<ReconcileCompleted>()
            .add_event::<SessionFailed>();

        // Ресурсы (config / fetcher можно вставить заранее — init не перезапишет)
        app.init_resource::<SessionConfig>()
            .init_resource::<Fetcher>()
            .init_resource::<SessionPhase>()
            .init_resource::<TemplateLoad>()
            .init_resource::<TemplateSet>()
            .init_resource::<EquippedRegistry>()
            .init_resource::<SpawnedRegistry>()
            .init_resource::<MenuLayout>()
            .init_resource::<PendingSync>();

        app.add_systems(
            Update,
            (
                // Фаза 1: Startup
                systems::handle_session_start,
                systems::poll_template_load,

                // Фаза 2: Input
                systems::schedule_reconcile,
                systems::route_clicks,

                // Фаза 3: Lifecycle
                expire_ephemerals,
                systems::process_toggle_equip,
                systems::process_trigger_pulls,
                systems::process_user_left,

                // Фаза 4: Reconciliation
                systems::tick_pending_sync,
            )
                .chain(),
        );
    }
}
