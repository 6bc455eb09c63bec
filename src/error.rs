use thiserror::Error;

/// Failure talking to the table or object store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct StorageError {
    pub message: String,
}

impl StorageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl From<reqwest::Error> for StorageError {
    fn from(err: reqwest::Error) -> Self {
        StorageError::new(err.to_string())
    }
}

/// Errors returned by the completion gateway. The display text is the short
/// summary that is safe to hand back to a client.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    UpstreamUnavailable(String),

    #[error("{summary}")]
    Storage {
        summary: String,
        #[source]
        source: StorageError,
    },
}

impl GatewayError {
    pub fn summary(&self) -> &str {
        match self {
            GatewayError::UpstreamUnavailable(summary) => summary,
            GatewayError::Storage { summary, .. } => summary,
        }
    }
}

/// Fatal startup errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Supabase URL or Key not defined in environment variables.")]
    MissingStorageConfig,

    #[error("OpenAI API key is required")]
    MissingApiKey,

    #[error("Invalid URL for {name}: {source}")]
    InvalidUrl {
        name: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid CORS origin '{0}'")]
    InvalidCorsOrigin(String),
}
