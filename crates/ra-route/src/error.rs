//! Routing-subsystem error type.

use thiserror::Error;

use ra_core::Coordinate;

/// Errors produced by `ra-route`.
///
/// Every lookup failure is retryable: the caller surfaces it and may invoke
/// the lookup again.  None of them is fatal to a process.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: Coordinate, to: Coordinate },

    #[error("routing service unavailable: {0}")]
    Unavailable(String),

    #[error("route geometry must contain at least one waypoint")]
    EmptyGeometry,
}

pub type RouteResult<T> = Result<T, RouteError>;
