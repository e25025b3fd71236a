//! Session systems — тонкие обёртки: event → SessionController
//!
//! Вся логика в controller; здесь только чтение событий и routing.

use bevy::prelude::*;

use super::controller::SessionController;
use super::events::{SessionFailed, SessionStarted, ToggleEquipIntent, TriggerPulled, UserJoined, UserLeft};
use crate::host::{ClickBinding, ClickEvent};
use crate::logger::log_error;

/// System: SessionStarted → load templates (или respawn world props)
pub fn handle_session_start(mut events: EventReader<SessionStarted>, mut session: SessionController) {
    for _ in events.read() {
        session.on_session_start();
    }
}

/// System: завершился ли remote fetch
///
/// Ошибка fatal: сессия → Failed, SessionFailed наружу, AppExit с ошибкой.
pub fn poll_template_load(
    mut session: SessionController,
    mut failed: EventWriter<SessionFailed>,
    mut exit: EventWriter<AppExit>,
) {
    let Some(Err(error)) = session.poll_template_load() else {
        return;
    };

    log_error(&format!("❌ Template load failed: {}", error));
    failed.write(SessionFailed {
        error: error.to_string(),
    });
    exit.write(AppExit::error());
}

/// System: UserJoined → debounce reconciliation
pub fn schedule_reconcile(mut events: EventReader<UserJoined>, mut session: SessionController) {
    for event in events.read() {
        session.on_user_join(event.user);
    }
}

/// System: ClickEvent → intent по binding'у
pub fn route_clicks(
    mut clicks: EventReader<ClickEvent>,
    mut toggles: EventWriter<ToggleEquipIntent>,
    mut triggers: EventWriter<TriggerPulled>,
) {
    for click in clicks.read() {
        match &click.binding {
            ClickBinding::MenuCell { template } => {
                toggles.write(ToggleEquipIntent {
                    user: click.user,
                    template: template.clone(),
                });
            }
            ClickBinding::Trigger { anchor } => {
                triggers.write(TriggerPulled {
                    anchor: *anchor,
                    user: click.user,
                });
            }
        }
    }
}

pub fn process_toggle_equip(mut intents: EventReader<ToggleEquipIntent>, mut session: SessionController) {
    for intent in intents.read() {
        session.toggle_equip(intent.user, &intent.template);
    }
}

pub fn process_trigger_pulls(mut pulls: EventReader<TriggerPulled>, mut session: SessionController) {
    for pull in pulls.read() {
        session.activate_trigger(pull.anchor, pull.user);
    }
}

pub fn process_user_left(mut events: EventReader<UserLeft>, mut session: SessionController) {
    for event in events.read() {
        session.on_user_leave(event.user);
    }
}

/// System: tick debounce → reconciliation pass
pub fn tick_pending_sync(time: Res<Time>, mut session: SessionController) {
    if session.tick_pending(time.delta()) {
        session.on_reconcile();
    }
}
