//! Plain data row types written by trace backends.

use ra_core::Role;

/// Where one side drew the vehicle at a given tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionRow {
    pub tick:     u64,
    pub role:     Role,
    pub lat:      f64,
    pub lng:      f64,
    pub heading:  f64,
    /// Leg progress in `[0, 1]`.  `None` for positions the requester took
    /// from a `DRIVER_POSITION` frame.
    pub progress: Option<f64>,
}

/// Any non-motion event, flattened to text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    pub tick:   u64,
    pub role:   Role,
    pub kind:   &'static str,
    pub detail: String,
}
