//! `ra-motion` — turns a road-snapped polyline into a stream of motion samples.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                 |
//! |------------------|----------------------------------------------------------|
//! | [`sample`]       | `MotionSample`, `MotionEvent`, `RoutePoint`, `sample_at` |
//! | [`policy`]       | `DurationPolicy`: per-tick progress step and ETA         |
//! | [`heading`]      | `HeadingSmoother`: wrap-aware exponential smoothing      |
//! | [`zoom`]         | `ZoomController`: turn-severity camera zoom              |
//! | [`interpolator`] | `MotionInterpolator`: one active cycle per instance      |
//!
//! # Motion model (summary)
//!
//! A cycle holds a scalar `progress ∈ [0, 1]` advanced by a fixed step per
//! tick.  Progress maps onto the route as
//!
//! ```text
//! t    = clamp(progress) × (N − 1)
//! idx  = floor(t),  frac = t − idx
//! pos  = lerp(route[idx], route[idx + 1], frac)
//! head = bearing(route[idx] → route[idx + 1])   (smoothed, never per sub-point)
//! ```
//!
//! The first tick that finds `progress > 1` ends the cycle with a single
//! `MotionEvent::Arrived`.

pub mod heading;
pub mod interpolator;
pub mod policy;
pub mod sample;
pub mod zoom;

#[cfg(test)]
mod tests;

pub use heading::HeadingSmoother;
pub use interpolator::MotionInterpolator;
pub use policy::{DurationPolicy, NOMINAL_TRIP_MINUTES};
pub use sample::{MotionEvent, MotionSample, RoutePoint, sample_at};
pub use zoom::ZoomController;
