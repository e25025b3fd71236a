//! Session configuration (startup parameters хоста)

use bevy::prelude::*;
use std::time::Duration;

/// Минимальный debounce reconciliation pass'а
pub const MIN_SYNC_INTERVAL: Duration = Duration::from_secs(1);

/// ttl bullet'а когда шаблон его не задал
pub const DEFAULT_BULLET_TTL: Duration = Duration::from_secs(5);

/// Startup parameter с url template set'а
pub const URL_PARAM: &str = "url";

#[derive(Resource, Clone, Debug, PartialEq)]
pub struct SessionConfig {
    /// None → built-in templates
    pub source_url: Option<String>,
    /// Debounce окно join → reconcile (не меньше `MIN_SYNC_INTERVAL`)
    pub sync_delay: Duration,
    pub default_bullet_ttl: Duration,
    pub fetch_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            source_url: None,
            sync_delay: MIN_SYNC_INTERVAL,
            default_bullet_ttl: DEFAULT_BULLET_TTL,
            fetch_timeout: Duration::from_secs(10),
        }
    }
}

impl SessionConfig {
    /// Из key/value parameter set хоста (`url=...`); пустой url = не задан
    pub fn from_params<'a>(params: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let source_url = params
            .into_iter()
            .find(|(key, _)| *key == URL_PARAM)
            .map(|(_, value)| value.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        Self {
            source_url,
            ..Default::default()
        }
    }

    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    /// Фактический debounce (с учётом минимума)
    pub fn effective_sync_delay(&self) -> Duration {
        self.sync_delay.max(MIN_SYNC_INTERVAL)
    }
}
