use bridge_traits::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    /// The storage medium refused the operation (quota, disabled, I/O).
    #[error("Storage error: {0}")]
    Storage(#[from] BridgeError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CacheError {
    /// True when the medium is full. Callers usually prune and retry.
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, CacheError::Storage(BridgeError::QuotaExceeded { .. }))
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;
