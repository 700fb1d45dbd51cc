use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Unknown book: {0}")]
    UnknownBook(String),

    /// Only one book downloads at a time; the caller should wait or cancel.
    #[error("Download of {active} already in progress (requested {requested})")]
    DownloadInProgress { active: String, requested: String },
}

pub type Result<T> = std::result::Result<T, SyncError>;
