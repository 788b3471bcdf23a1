//! Wrap-aware exponential heading smoothing.

use ra_core::normalize_degrees;

/// Exponentially smooths a raw bearing signal.
///
/// The smoothed value is kept unwrapped internally; each target is first
/// shifted by whole turns into `(smoothed − 180, smoothed + 180]` so the
/// smoother always rotates the short way round.  Output is normalised to
/// `[0, 360)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HeadingSmoother {
    alpha:        f64,
    max_step_deg: Option<f64>,
    smoothed:     f64,
}

impl HeadingSmoother {
    /// `alpha` is clamped to `(0, 1]`.
    pub fn new(alpha: f64) -> Self {
        let alpha = if alpha.is_finite() && alpha > 0.0 { alpha.min(1.0) } else { 1.0 };
        Self { alpha, max_step_deg: None, smoothed: 0.0 }
    }

    /// Slow, cinematic smoothing for a chase camera.
    pub fn chase() -> Self {
        Self::new(0.08)
    }

    /// Snappier smoothing for a north-up map.
    pub fn top_down() -> Self {
        Self::new(0.35)
    }

    /// Cap the rotation applied in a single update.
    pub fn with_max_step(mut self, deg: f64) -> Self {
        self.max_step_deg = Some(deg.abs());
        self
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Jump straight to `heading`.
    pub fn reset(&mut self, heading: f64) {
        self.smoothed = normalize_degrees(heading);
    }

    /// Move towards `target` and return the new heading in `[0, 360)`.
    pub fn update(&mut self, target: f64) -> f64 {
        let mut t = target;
        while t - self.smoothed > 180.0 {
            t -= 360.0;
        }
        while t - self.smoothed < -180.0 {
            t += 360.0;
        }

        let mut delta = (t - self.smoothed) * self.alpha;
        if let Some(max) = self.max_step_deg {
            delta = delta.clamp(-max, max);
        }
        self.smoothed += delta;
        self.heading()
    }

    /// Current heading in `[0, 360)`.
    pub fn heading(&self) -> f64 {
        normalize_degrees(self.smoothed)
    }

    /// Current heading without wrapping; continuous across the 0/360 seam.
    pub fn unwrapped(&self) -> f64 {
        self.smoothed
    }
}

impl Default for HeadingSmoother {
    fn default() -> Self {
        Self::chase()
    }
}
