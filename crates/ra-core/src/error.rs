//! Core error type.
//!
//! Sub-crates define their own error enums and convert them into
//! `DispatchError` (in `ra-sim`) via `From` impls.  `CoreError` covers the
//! few failures that belong to the primitives themselves.

use thiserror::Error;

/// The error type for `ra-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("coordinate out of range: {0}")]
    InvalidCoordinate(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `ra-core`.
pub type CoreResult<T> = Result<T, CoreError>;
