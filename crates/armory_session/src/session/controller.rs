//! SessionController — single source of truth: кто что держит
//!
//! `SystemParam` поверх эксклюзивных ресурсов сессии. Все переходы
//! выполняются по одному событию за раз (ECS schedule), поэтому локов нет.
//!
//! # Per-user state machine
//!
//! ```text
//! Unequipped ──select any cell──► Equipped(T)
//! Equipped(T) ──select any cell──► Unequipped   (swap = два клика)
//! Equipped(T) ──leave──────────► Unequipped
//! ```

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::tasks::{futures::check_ready, IoTaskPool, Task};
use std::sync::Arc;
use std::time::Duration;

use super::config::SessionConfig;
use super::events::ReconcileCompleted;
use super::pending::PendingSync;
use super::registry::{EquippedRegistry, SpawnedRegistry};
use crate::ephemeral::Ephemeral;
use crate::host::{invisible_material, ActorId, Scene, UserId};
use crate::logger::{log, log_info, log_warning};
use crate::menu::MenuLayout;
use crate::prop::{PropInstance, PropKind};
use crate::template::{HttpTemplateFetcher, TemplateError, TemplateFetcher, TemplateSet};

/// Фаза сессии
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionPhase {
    #[default]
    Idle,
    /// Remote template set грузится на IoTaskPool
    Loading,
    Running,
    /// Template set не загружен — сессия не может продолжать
    Failed,
}

/// Источник remote template set
#[derive(Resource, Clone)]
pub struct Fetcher(pub Arc<dyn TemplateFetcher>);

impl Fetcher {
    pub fn new(fetcher: impl TemplateFetcher) -> Self {
        Self(Arc::new(fetcher))
    }
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new(HttpTemplateFetcher::default())
    }
}

/// Незавершённый fetch (suspension point старта)
#[derive(Resource, Default)]
pub struct TemplateLoad {
    task: Option<Task<Result<TemplateSet, TemplateError>>>,
}

impl TemplateLoad {
    pub fn is_loading(&self) -> bool {
        self.task.is_some()
    }
}

#[derive(SystemParam)]
pub struct SessionController<'w, 's> {
    commands: Commands<'w, 's>,
    scene: ResMut<'w, Scene>,
    config: Res<'w, SessionConfig>,
    fetcher: Res<'w, Fetcher>,
    phase: ResMut<'w, SessionPhase>,
    load: ResMut<'w, TemplateLoad>,
    templates: ResMut<'w, TemplateSet>,
    equipped: ResMut<'w, EquippedRegistry>,
    spawned: ResMut<'w, SpawnedRegistry>,
    menu: ResMut<'w, MenuLayout>,
    pending: ResMut<'w, PendingSync>,
    reconciled: EventWriter<'w, ReconcileCompleted>,
}

impl SessionController<'_, '_> {
    // ========================================================================
    // Startup
    // ========================================================================

    /// Загрузить template set → меню → world props
    ///
    /// Повторный старт уже запущенной сессии только повторяет
    /// (idempotent) world spawn.
    pub fn on_session_start(&mut self) {
        let phase = *self.phase;
        match phase {
            SessionPhase::Idle => match self.config.source_url.clone() {
                None => self.apply_templates(TemplateSet::defaults()),
                Some(url) => {
                    log_info(&format!("🌐 Fetching templates from '{}'", url));
                    let fetcher = Arc::clone(&self.fetcher.0);
                    let task = IoTaskPool::get().spawn(async move { fetcher.fetch(&url) });
                    self.load.task = Some(task);
                    *self.phase = SessionPhase::Loading;
                }
            },
            SessionPhase::Running => {
                log("Session already running - respawning missing world props");
                self.spawn_world_props();
            }
            SessionPhase::Loading | SessionPhase::Failed => {
                log_warning(&format!("Ignored session start in phase {:?}", phase));
            }
        }
    }

    /// Проверить fetch; `Some` когда задача завершилась
    pub fn poll_template_load(&mut self) -> Option<Result<(), TemplateError>> {
        let task = self.load.task.as_mut()?;
        let result = check_ready(task)?;
        self.load.task = None;

        match result {
            Ok(templates) => {
                self.apply_templates(templates);
                Some(Ok(()))
            }
            Err(error) => {
                *self.phase = SessionPhase::Failed;
                Some(Err(error))
            }
        }
    }

    pub fn apply_templates(&mut self, templates: TemplateSet) {
        log_info(&format!("✅ Loaded {} prop templates", templates.len()));
        *self.templates = templates;

        invisible_material(self.scene.host());
        if !self.menu.is_built() {
            let menu = MenuLayout::build(self.scene.host(), self.templates.attachable());
            *self.menu = menu;
        }

        self.spawn_world_props();
        *self.phase = SessionPhase::Running;
    }

    /// Один Shared instance на каждый шаблон без attach point (idempotent)
    pub fn spawn_world_props(&mut self) {
        for template in self.templates.world_spawned() {
            if self.spawned.contains(&template.name) {
                continue;
            }

            let prop = PropInstance::create(self.scene.host(), Arc::clone(template), PropKind::Shared);
            if let Err(duplicate) = self.spawned.insert(prop) {
                duplicate.remove(self.scene.host());
            }
        }
    }

    // ========================================================================
    // Join / leave / reconcile
    // ========================================================================

    pub fn on_user_join(&mut self, user: UserId) {
        let delay = self.config.effective_sync_delay();
        if self.pending.schedule(delay) {
            log(&format!("👤 {} joined - sync in {:?}", user, delay));
        } else {
            log(&format!("👤 {} joined - sync already pending", user));
        }
    }

    pub fn tick_pending(&mut self, delta: Duration) -> bool {
        self.pending.tick(delta)
    }

    /// Повторить attachment + click bindings для всех instances и ячеек
    ///
    /// Видит registries на момент выполнения, а не на момент schedule.
    pub fn on_reconcile(&mut self) {
        self.pending.clear();
        let host = self.scene.host();

        for (_, prop) in self.equipped.iter() {
            prop.reattach(host);
        }
        for (_, prop) in self.spawned.iter() {
            prop.reattach(host);
            prop.bind_trigger(host);
        }
        self.menu.bind(host);

        let summary = ReconcileCompleted {
            equipped: self.equipped.len(),
            spawned: self.spawned.len(),
        };
        log_info(&format!(
            "🔄 Reconciled {} equipped + {} spawned props",
            summary.equipped, summary.spawned
        ));
        self.reconciled.write(summary);
    }

    /// Idempotent: пользователь без prop'а → no-op
    pub fn on_user_leave(&mut self, user: UserId) {
        if let Some(prop) = self.equipped.take(user) {
            log(&format!("👋 {} left holding '{}'", user, prop.name()));
            prop.remove(self.scene.host());
        }
    }

    // ========================================================================
    // Equip / trigger
    // ========================================================================

    /// Держит что-то → unequip (какой бы шаблон ни кликнули), иначе equip
    pub fn toggle_equip(&mut self, user: UserId, template: &str) {
        if let Some(prop) = self.equipped.take(user) {
            log(&format!("🗑️ {} unequipped '{}'", user, prop.name()));
            prop.remove(self.scene.host());
            return;
        }

        let Some(template) = self.templates.get(template).cloned() else {
            log_warning(&format!("Unknown template '{}' selected by {}", template, user));
            return;
        };

        let prop = PropInstance::create(self.scene.host(), template, PropKind::Owned(user));
        log(&format!("✅ {} equipped '{}'", user, prop.name()));
        if let Err(duplicate) = self.equipped.insert(user, prop) {
            duplicate.remove(self.scene.host());
        }
    }

    /// Активация trigger'а → ephemeral entity со своим таймером
    pub fn activate_trigger(&mut self, anchor: ActorId, user: UserId) {
        let Some(prop) = self
            .equipped
            .find_by_anchor(anchor)
            .or_else(|| self.spawned.find_by_anchor(anchor))
        else {
            log(&format!("Trigger {:?} no longer bound to a prop", anchor));
            return;
        };

        if let Some(spawn) = prop.activate(self.scene.host(), user, self.config.default_bullet_ttl) {
            self.commands.spawn(Ephemeral::from(spawn));
        }
    }
}
