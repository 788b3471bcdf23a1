//! Trip-subsystem error type.

use thiserror::Error;

use crate::{TripEvent, TripPhase};

/// Errors produced by `ra-trip`.
///
/// A rejected operation never changes the machine; the caller reports the
/// error to the operator and carries on.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TripError {
    #[error("{event:?} is not allowed in phase {from:?}")]
    InvalidTransition { from: TripPhase, event: TripEvent },

    #[error("verification code does not match")]
    CodeMismatch,

    #[error("malformed verification code: {0}")]
    MalformedCode(String),
}

pub type TripResult<T> = Result<T, TripError>;
