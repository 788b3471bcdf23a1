//! Camera zoom driven by how sharp the upcoming turn is.

use ra_core::angular_delta;

/// Smoothly zooms in ahead of sharp turns and back out on straights.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ZoomController {
    pub sharp_turn_deg: f64,
    pub close_zoom:     f64,
    pub cruise_zoom:    f64,
    pub alpha:          f64,
    level:              f64,
    target:             f64,
}

impl ZoomController {
    pub fn new(sharp_turn_deg: f64, close_zoom: f64, cruise_zoom: f64, alpha: f64) -> Self {
        Self {
            sharp_turn_deg,
            close_zoom,
            cruise_zoom,
            alpha,
            level:  cruise_zoom,
            target: cruise_zoom,
        }
    }

    /// Absolute turn between two segment bearings.  Unknown bearings count
    /// as straight ahead.
    pub fn turn_severity(current: Option<f64>, next: Option<f64>) -> f64 {
        match (current, next) {
            (Some(c), Some(n)) => angular_delta(c, n).abs(),
            _ => 0.0,
        }
    }

    /// Retarget from the current and next segment bearings, take one
    /// smoothing step, and return the new zoom level.
    pub fn observe(&mut self, current: Option<f64>, next: Option<f64>) -> f64 {
        self.target = if Self::turn_severity(current, next) > self.sharp_turn_deg {
            self.close_zoom
        } else {
            self.cruise_zoom
        };
        self.level += (self.target - self.level) * self.alpha;
        self.level
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn target(&self) -> f64 {
        self.target
    }
}

impl Default for ZoomController {
    /// 20° threshold, zoom 18.5 near turns, 17.0 cruising, α = 0.02.
    fn default() -> Self {
        Self::new(20.0, 18.5, 17.0, 0.02)
    }
}
