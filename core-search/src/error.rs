use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    /// Queries before the first successful `initialize()`.
    #[error("Search index not initialized")]
    NotInitialized,

    #[error("Content provider {provider} failed: {message}")]
    Provider { provider: String, message: String },
}

impl SearchError {
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        SearchError::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
