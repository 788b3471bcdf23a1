use thiserror::Error;

use ra_core::CoreError;
use ra_route::RouteError;
use ra_sync::SyncError;
use ra_trip::TripError;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("dispatch configuration error: {0}")]
    Config(String),

    #[error("no pending request to act on")]
    NoPendingRequest,

    #[error("a request is already assigned")]
    RequestInProgress,

    #[error("responder is offline")]
    Offline,

    #[error("no navigation leg to retry in the current trip phase")]
    NothingToRetry,

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("routing error: {0}")]
    Route(#[from] RouteError),

    #[error("trip error: {0}")]
    Trip(#[from] TripError),

    #[error("sync error: {0}")]
    Sync(#[from] SyncError),

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type DispatchResult<T> = Result<T, DispatchError>;
