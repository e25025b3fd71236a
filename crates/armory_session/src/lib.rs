//! Armory Session Core
//!
//! ECS-ядро shared session на Bevy 0.16: меню props, equip/unequip,
//! trigger → ephemeral bullets, reconciliation после join'ов.
//!
//! HYBRID ARCHITECTURE:
//! - ECS = session state (кто что держит, таймеры, debounce)
//! - Host engine (SceneHost) = actors, attachment, clicks, layout

use bevy::prelude::*;

// Публичные модули
pub mod ephemeral;
pub mod host;
pub mod logger;
pub mod menu;
pub mod prop;
pub mod session;
pub mod template;

// Re-export logger
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, LogLevel,
    LogPrinter,
};

// Re-export основных типов
pub use host::{ClickBinding, ClickEvent, MemoryHost, Scene, SceneHost, UserId};
pub use session::{
    Fetcher, SessionConfig, SessionController, SessionPhase, SessionPlugin, SessionStarted,
    UserJoined, UserLeft,
};
pub use template::{HttpTemplateFetcher, PropTemplate, TemplateSet};

/// Создаёт minimal Bevy App для headless сессии
pub fn create_headless_app() -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins);

    app
}

/// Headless App с SessionPlugin поверх данного движка
///
/// Remote templates грузятся через `HttpTemplateFetcher` с `fetch_timeout`
/// из config (замените `Fetcher` resource чтобы подменить источник).
pub fn create_session_app(config: SessionConfig, host: impl SceneHost) -> App {
    let mut app = create_headless_app();

    app.insert_resource(Scene::new(host))
        .insert_resource(Fetcher::new(HttpTemplateFetcher::new(config.fetch_timeout)))
        .insert_resource(config)
        .add_plugins(SessionPlugin);

    app
}
