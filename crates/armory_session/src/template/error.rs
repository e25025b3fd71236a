use thiserror::Error;

/// Ошибки загрузки template set. Все фатальны для старта сессии.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to fetch templates from '{url}': {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("template source '{url}' responded with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("malformed template json: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate template name '{0}'")]
    DuplicateName(String),
}
