//! Error types for the bible-api provider

use bridge_traits::error::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BibleApiError {
    /// The API answered with an `{"error": ...}` body
    #[error("bible-api error: {0}")]
    Api(String),

    #[error("Failed to parse chapter response: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BibleApiError>;

impl From<BibleApiError> for BridgeError {
    fn from(error: BibleApiError) -> Self {
        BridgeError::OperationFailed(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let bridge_error: BridgeError = BibleApiError::Api("not found".to_string()).into();
        assert!(matches!(
            bridge_error,
            BridgeError::OperationFailed(ref msg) if msg == "bible-api error: not found"
        ));
    }
}
