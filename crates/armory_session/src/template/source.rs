//! Remote template source
//!
//! Fetch блокирующий — вызывается только из задачи на `IoTaskPool`
//! (см. `session::systems::poll_template_load`), ECS thread не ждёт сеть.

use std::time::Duration;

use super::{TemplateError, TemplateSet};

/// Источник template set по url (format: JSON array)
pub trait TemplateFetcher: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> Result<TemplateSet, TemplateError>;
}

/// HTTP(S) GET → JSON. Без retry: любая ошибка фатальна для сессии.
#[derive(Clone, Debug)]
pub struct HttpTemplateFetcher {
    timeout: Duration,
}

impl HttpTemplateFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for HttpTemplateFetcher {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

impl TemplateFetcher for HttpTemplateFetcher {
    fn fetch(&self, url: &str) -> Result<TemplateSet, TemplateError> {
        let fetch_error = |source| TemplateError::Fetch {
            url: url.to_string(),
            source,
        };

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(fetch_error)?;

        let response = client.get(url).send().map_err(fetch_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TemplateError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(fetch_error)?;
        TemplateSet::from_json(&body)
    }
}
