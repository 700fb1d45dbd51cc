use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Core initialization failed: {0}")]
    InitializationFailed(String),

    /// Configuration or capability problem reported by the runtime.
    #[error(transparent)]
    Runtime(#[from] core_runtime::Error),

    #[error("Feature disabled: {0}")]
    FeatureDisabled(&'static str),

    #[error("Bridge error: {0}")]
    Bridge(#[from] bridge_traits::BridgeError),

    #[error("Cache error: {0}")]
    Cache(#[from] core_cache::CacheError),

    #[error("Download error: {0}")]
    Sync(#[from] core_sync::SyncError),

    #[error("Search error: {0}")]
    Search(#[from] core_search::SearchError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
