use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("wire codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

pub type SyncResult<T> = Result<T, SyncError>;
