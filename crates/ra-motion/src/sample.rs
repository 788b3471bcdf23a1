//! Motion samples and the pure progress-to-route mapping.

use ra_core::{Coordinate, CycleId};
use ra_route::RouteGeometry;

/// Where `progress` lands on a route, before any smoothing.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RoutePoint {
    pub position: Coordinate,
    /// Index of the segment the point lies on (`0` for a degenerate route).
    pub segment:  usize,
    /// Raw bearing of that segment; `None` for a zero-length segment.
    pub bearing:  Option<f64>,
}

/// Evaluate `route` at `progress`.
///
/// `progress` is clamped to `[0, 1]` first (NaN counts as 0).  At exactly
/// `1.0` the point is reported on the last real segment with `frac = 1`, so
/// the bearing stays that of the final hop.
pub fn sample_at(route: &RouteGeometry, progress: f64) -> RoutePoint {
    let p = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };

    if route.is_degenerate() {
        return RoutePoint { position: route.origin(), segment: 0, bearing: None };
    }

    let last_seg = route.segment_count() - 1;
    let t = p * route.segment_count() as f64;
    let (idx, frac) = match t.floor() as usize {
        i if i > last_seg => (last_seg, 1.0),
        i => (i, t - i as f64),
    };

    let (a, b) = route.segment(idx);
    RoutePoint {
        position: a.lerp(b, frac),
        segment:  idx,
        bearing:  a.bearing_to(b),
    }
}

/// One rendered step of an animation cycle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MotionSample {
    pub cycle:       CycleId,
    pub position:    Coordinate,
    /// Smoothed heading in `[0, 360)`.
    pub heading:     f64,
    /// Progress in `[0, 1]`.
    pub progress:    f64,
    pub segment:     usize,
    /// Whole minutes remaining, never below 1.
    pub eta_minutes: u32,
    /// Smoothed camera zoom, present only on camera-following interpolators.
    pub zoom:        Option<f64>,
}

/// What one interpolator tick produced.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MotionEvent {
    Sample(MotionSample),
    /// Terminal signal; emitted once per cycle.
    Arrived { cycle: CycleId },
}
