//! How fast a cycle advances and how long it has left.

/// Trip length assumed for ETA when no routing estimate is available.
pub const NOMINAL_TRIP_MINUTES: f64 = 15.0;

/// Per-tick progress model for one cycle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DurationPolicy {
    /// Constant velocity in route fractions per tick.
    FixedStep(f64),
    /// Duration-normalised: the whole route takes `total_secs` with one
    /// step every `frame_ms`.
    Estimated { total_secs: f64, frame_ms: u64 },
}

impl DurationPolicy {
    /// Use the routing estimate when there is a usable one, otherwise fall
    /// back to `FixedStep(fallback_step)`.
    ///
    /// `frame_ms` must be the interval at which steps actually fire.
    pub fn from_estimate(duration_secs: Option<f64>, frame_ms: u64, fallback_step: f64) -> Self {
        match duration_secs {
            Some(total_secs) if total_secs > 0.0 => Self::Estimated { total_secs, frame_ms },
            _ => Self::FixedStep(fallback_step),
        }
    }

    /// Progress added per tick.  Non-positive inputs collapse to a full step
    /// so a cycle always terminates.
    pub fn step_per_tick(&self) -> f64 {
        let step = match *self {
            Self::FixedStep(step) => step,
            Self::Estimated { total_secs, frame_ms } => frame_ms as f64 / (total_secs * 1_000.0),
        };
        if step.is_finite() && step > 0.0 { step } else { 1.0 }
    }

    /// Total trip length in minutes used for ETA projection.
    pub fn total_minutes(&self) -> f64 {
        match *self {
            Self::FixedStep(_) => NOMINAL_TRIP_MINUTES,
            Self::Estimated { total_secs, .. } => total_secs / 60.0,
        }
    }

    /// `max(1, ceil((1 − progress) × total))` minutes.
    pub fn eta_minutes(&self, progress: f64) -> u32 {
        let left = (1.0 - progress.clamp(0.0, 1.0)) * self.total_minutes();
        (left.ceil() as u32).max(1)
    }
}
