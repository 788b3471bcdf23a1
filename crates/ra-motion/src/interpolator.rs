//! `MotionInterpolator` — the single animation driver shared by both roles.

use std::sync::Arc;

use ra_core::CycleId;
use ra_route::RouteGeometry;

use crate::{DurationPolicy, HeadingSmoother, MotionEvent, MotionSample, ZoomController, sample_at};

/// State of the running cycle.
struct Cycle {
    id:       CycleId,
    route:    Arc<RouteGeometry>,
    policy:   DurationPolicy,
    step:     f64,
    progress: f64,
}

/// Produces one `MotionEvent` per `tick()` while a cycle is active.
///
/// The owner drives `tick()` from its scheduler's frame timer; the
/// interpolator holds no timer itself, so stopping the cycle is the only
/// cancellation needed.  At most one cycle runs at a time: `start` retires
/// whatever was running, and a retired cycle can never emit again.
pub struct MotionInterpolator {
    cycle:   Option<Cycle>,
    next_id: CycleId,
    heading: HeadingSmoother,
    zoom:    Option<ZoomController>,
}

impl MotionInterpolator {
    pub fn new(heading: HeadingSmoother) -> Self {
        Self { cycle: None, next_id: CycleId(0), heading, zoom: None }
    }

    /// Camera-following variant: every sample also carries a zoom level.
    pub fn with_zoom(mut self, zoom: ZoomController) -> Self {
        self.zoom = Some(zoom);
        self
    }

    /// Begin a new cycle over `route`, cancelling any running one first.
    ///
    /// The heading is seeded with the first segment's bearing; a route whose
    /// first hop has zero length keeps the previous heading.
    pub fn start(&mut self, route: Arc<RouteGeometry>, policy: DurationPolicy) -> CycleId {
        if let Some(old) = self.cycle.take() {
            tracing::debug!(cycle = %old.id, "motion cycle superseded");
        }

        let id = self.next_id;
        self.next_id = id.next();

        if let Some(bearing) = route.segment_bearing(0) {
            self.heading.reset(bearing);
        }

        tracing::debug!(cycle = %id, waypoints = route.len(), ?policy, "motion cycle started");
        self.cycle = Some(Cycle { id, route, policy, step: policy.step_per_tick(), progress: 0.0 });
        id
    }

    /// Halt the running cycle without an arrival.  Returns whether one was
    /// running.
    pub fn stop(&mut self) -> bool {
        self.cycle.take().is_some()
    }

    pub fn is_active(&self) -> bool {
        self.cycle.is_some()
    }

    pub fn current_cycle(&self) -> Option<CycleId> {
        self.cycle.as_ref().map(|c| c.id)
    }

    /// Progress the next `tick()` will sample at.
    pub fn progress(&self) -> Option<f64> {
        self.cycle.as_ref().map(|c| c.progress)
    }

    pub fn route(&self) -> Option<&Arc<RouteGeometry>> {
        self.cycle.as_ref().map(|c| &c.route)
    }

    /// Current smoothed heading in `[0, 360)`.
    pub fn heading(&self) -> f64 {
        self.heading.heading()
    }

    /// Advance the running cycle by one step.
    ///
    /// Returns `None` when idle.  The tick that finds `progress > 1` ends the
    /// cycle and returns `Arrived`.
    pub fn tick(&mut self) -> Option<MotionEvent> {
        let cycle = self.cycle.as_mut()?;

        if cycle.progress > 1.0 {
            let id = cycle.id;
            self.cycle = None;
            tracing::debug!(cycle = %id, "motion cycle arrived");
            return Some(MotionEvent::Arrived { cycle: id });
        }

        let point = sample_at(&cycle.route, cycle.progress);
        let heading = match point.bearing {
            Some(target) => self.heading.update(target),
            None => self.heading.heading(),
        };
        let zoom = self.zoom.as_mut().map(|z| {
            let next = cycle.route.segment_bearing(point.segment + 1);
            z.observe(point.bearing, next)
        });

        let progress = cycle.progress.min(1.0);
        let sample = MotionSample {
            cycle: cycle.id,
            position: point.position,
            heading,
            progress,
            segment: point.segment,
            eta_minutes: cycle.policy.eta_minutes(progress),
            zoom,
        };
        cycle.progress += cycle.step;
        Some(MotionEvent::Sample(sample))
    }
}

impl Default for MotionInterpolator {
    fn default() -> Self {
        Self::new(HeadingSmoother::default())
    }
}
