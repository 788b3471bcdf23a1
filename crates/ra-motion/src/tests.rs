//! Unit tests for ra-motion.

use std::sync::Arc;

use ra_core::{Coordinate, angular_delta};
use ra_route::RouteGeometry;

use crate::{
    DurationPolicy, HeadingSmoother, MotionEvent, MotionInterpolator, MotionSample,
    ZoomController, sample_at,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Responder start → via point → patient.
fn three_point() -> Arc<RouteGeometry> {
    Arc::new(
        RouteGeometry::from_pairs(&[
            (12.9850, 77.6100),
            (12.9800, 77.5990),
            (12.9716, 77.5946),
        ])
        .unwrap(),
    )
}

/// Run the active cycle to completion, collecting samples and arrivals.
fn run_to_end(interp: &mut MotionInterpolator) -> (Vec<MotionSample>, usize) {
    let mut samples = Vec::new();
    let mut arrivals = 0;
    for _ in 0..100_000 {
        match interp.tick() {
            Some(MotionEvent::Sample(s)) => samples.push(s),
            Some(MotionEvent::Arrived { .. }) => arrivals += 1,
            None => break,
        }
    }
    (samples, arrivals)
}

// ── Route mapping ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod mapping {
    use super::*;

    #[test]
    fn positions_stay_between_consecutive_waypoints() {
        let route = three_point();
        let pts = route.points();
        for i in 0..=1_000 {
            let p = sample_at(&route, i as f64 / 1_000.0);
            assert!(
                p.position.within_span(pts[p.segment], pts[p.segment + 1], 1e-12),
                "progress {} escaped segment {}",
                i,
                p.segment
            );
        }
    }

    #[test]
    fn endpoints_are_exact() {
        let route = three_point();
        assert_eq!(sample_at(&route, 0.0).position, route.origin());
        let end = sample_at(&route, 1.0);
        assert_eq!(end.position, route.destination());
        assert_eq!(end.segment, 1);
        assert_eq!(end.bearing, route.segment_bearing(1));
    }

    #[test]
    fn out_of_range_progress_is_clamped() {
        let route = three_point();
        assert_eq!(sample_at(&route, 7.5), sample_at(&route, 1.0));
        assert_eq!(sample_at(&route, -3.0), sample_at(&route, 0.0));
        assert_eq!(sample_at(&route, f64::NAN), sample_at(&route, 0.0));
    }

    #[test]
    fn midpoint_of_two_point_route() {
        let route = RouteGeometry::from_pairs(&[(0.0, 0.0), (0.002, 0.004)]).unwrap();
        let p = sample_at(&route, 0.5);
        assert!((p.position.lat - 0.001).abs() < 1e-12);
        assert!((p.position.lng - 0.002).abs() < 1e-12);
    }

    #[test]
    fn degenerate_route_is_constant() {
        let route = RouteGeometry::from_pairs(&[(12.97, 77.59)]).unwrap();
        for p in [0.0, 0.3, 1.0, 4.0] {
            let pt = sample_at(&route, p);
            assert_eq!(pt.position, Coordinate::new(12.97, 77.59));
            assert_eq!(pt.segment, 0);
            assert_eq!(pt.bearing, None);
        }
    }

    #[test]
    fn zero_length_segment_has_no_bearing() {
        let route = RouteGeometry::from_pairs(&[(1.0, 1.0), (1.0, 1.0), (1.001, 1.0)]).unwrap();
        assert_eq!(sample_at(&route, 0.25).bearing, None);
        assert!(sample_at(&route, 0.75).bearing.is_some());
    }
}

// ── Heading smoothing ─────────────────────────────────────────────────────────

#[cfg(test)]
mod heading {
    use super::*;

    #[test]
    fn takes_short_way_across_north() {
        let mut h = HeadingSmoother::new(0.5);
        h.reset(350.0);
        // 350 → 10 is +20°, not −340°.
        assert!((h.update(10.0) - 0.0).abs() < 1e-9);
        assert!((h.update(10.0) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn max_step_holds_across_the_seam() {
        let mut h = HeadingSmoother::new(0.9).with_max_step(5.0);
        h.reset(355.0);
        let mut prev = h.heading();
        for i in 0..200 {
            let target = if i % 40 < 20 { 2.0 } else { 358.0 };
            let next = h.update(target);
            assert!(angular_delta(prev, next).abs() <= 5.0 + 1e-9, "jump at {i}");
            assert!((0.0..360.0).contains(&next));
            prev = next;
        }
    }

    #[test]
    fn unclamped_jump_bounded_by_alpha() {
        let mut h = HeadingSmoother::chase();
        h.reset(359.0);
        let prev = h.heading();
        let next = h.update(1.0);
        assert!(angular_delta(prev, next).abs() <= 180.0 * h.alpha());
        assert!(h.unwrapped() > 359.0);
    }

    #[test]
    fn converges_to_target() {
        let mut h = HeadingSmoother::top_down();
        for _ in 0..200 {
            h.update(90.0);
        }
        assert!((h.heading() - 90.0).abs() < 1e-6);
    }

    #[test]
    fn bad_alpha_falls_back_to_direct() {
        let mut h = HeadingSmoother::new(-2.0);
        assert_eq!(h.update(45.0), 45.0);
    }
}

// ── Zoom ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod zoom {
    use super::*;

    #[test]
    fn sharp_turn_zooms_in_gradually() {
        let mut z = ZoomController::default();
        let level = z.observe(Some(245.0), Some(205.0));
        assert_eq!(z.target(), 18.5);
        assert!((level - 17.03).abs() < 1e-9);
    }

    #[test]
    fn gentle_turn_across_north_is_not_sharp() {
        assert!(ZoomController::turn_severity(Some(355.0), Some(5.0)) <= 20.0);
        let mut z = ZoomController::default();
        z.observe(Some(355.0), Some(5.0));
        assert_eq!(z.target(), 17.0);
        assert_eq!(z.level(), 17.0);
    }

    #[test]
    fn unknown_next_bearing_is_straight() {
        assert_eq!(ZoomController::turn_severity(Some(10.0), None), 0.0);
    }
}

// ── Policy ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod policy {
    use super::*;

    #[test]
    fn fixed_step_eta_uses_nominal_trip() {
        let p = DurationPolicy::FixedStep(0.0025);
        assert_eq!(p.eta_minutes(0.0), 15);
        assert_eq!(p.eta_minutes(0.5), 8);
        assert_eq!(p.eta_minutes(0.99), 1);
        assert_eq!(p.eta_minutes(1.0), 1);
    }

    #[test]
    fn estimate_drives_step() {
        let p = DurationPolicy::from_estimate(Some(10.0), 40, 0.0025);
        assert!((p.step_per_tick() - 0.004).abs() < 1e-12);
        assert_eq!(p.eta_minutes(0.0), 1);
        let long = DurationPolicy::from_estimate(Some(600.0), 40, 0.0025);
        assert_eq!(long.eta_minutes(0.25), 8);
    }

    #[test]
    fn missing_estimate_falls_back() {
        assert_eq!(DurationPolicy::from_estimate(None, 40, 0.01), DurationPolicy::FixedStep(0.01));
        assert_eq!(DurationPolicy::from_estimate(Some(0.0), 40, 0.01), DurationPolicy::FixedStep(0.01));
    }

    #[test]
    fn non_positive_step_still_terminates() {
        assert_eq!(DurationPolicy::FixedStep(0.0).step_per_tick(), 1.0);
        assert_eq!(DurationPolicy::FixedStep(-1.0).step_per_tick(), 1.0);
    }
}

// ── Interpolator ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod interpolator {
    use super::*;

    #[test]
    fn three_point_route_visits_segments_in_order_and_arrives_once() {
        let mut interp = MotionInterpolator::default();
        interp.start(three_point(), DurationPolicy::FixedStep(0.0025));
        let (samples, arrivals) = run_to_end(&mut interp);

        assert_eq!(arrivals, 1);
        assert!(!interp.is_active());
        assert!(interp.tick().is_none());

        assert_eq!(samples[0].segment, 0);
        assert_eq!(samples.last().unwrap().segment, 1);
        assert!(samples.windows(2).all(|w| w[0].segment <= w[1].segment));
        assert!(samples.windows(2).all(|w| w[0].progress < w[1].progress));
        assert!(samples.len() >= 400 && samples.len() <= 402);
        assert!(samples.iter().all(|s| (0.0..=1.0).contains(&s.progress)));
    }

    #[test]
    fn first_sample_faces_first_segment() {
        let route = three_point();
        let mut interp = MotionInterpolator::default();
        interp.start(Arc::clone(&route), DurationPolicy::FixedStep(0.1));
        let Some(MotionEvent::Sample(s)) = interp.tick() else { panic!("expected sample") };
        assert!((s.heading - route.segment_bearing(0).unwrap()).abs() < 1e-9);
        assert_eq!(s.position, route.origin());
        assert_eq!(s.eta_minutes, 15);
    }

    #[test]
    fn restart_retires_previous_cycle() {
        let mut interp = MotionInterpolator::default();
        let first = interp.start(three_point(), DurationPolicy::FixedStep(0.1));
        interp.tick();
        interp.tick();
        let second = interp.start(three_point(), DurationPolicy::FixedStep(0.1));
        assert_ne!(first, second);
        assert_eq!(interp.current_cycle(), Some(second));
        assert_eq!(interp.progress(), Some(0.0));

        let mut arrivals = Vec::new();
        while let Some(ev) = interp.tick() {
            match ev {
                MotionEvent::Sample(s) => assert_eq!(s.cycle, second),
                MotionEvent::Arrived { cycle } => arrivals.push(cycle),
            }
        }
        assert_eq!(arrivals, vec![second]);
    }

    #[test]
    fn stop_is_idempotent_and_silences() {
        let mut interp = MotionInterpolator::default();
        interp.start(three_point(), DurationPolicy::FixedStep(0.1));
        assert!(interp.stop());
        assert!(!interp.stop());
        assert!(interp.tick().is_none());
    }

    #[test]
    fn degenerate_route_holds_heading() {
        let mut interp = MotionInterpolator::default();
        let here = RouteGeometry::from_pairs(&[(12.97, 77.59)]).unwrap();
        interp.start(Arc::new(here), DurationPolicy::FixedStep(0.25));
        let (samples, arrivals) = run_to_end(&mut interp);
        assert_eq!(arrivals, 1);
        assert_eq!(samples.len(), 5);
        assert!(samples.iter().all(|s| s.position == Coordinate::new(12.97, 77.59)));
        assert!(samples.iter().all(|s| s.heading == 0.0));
    }

    #[test]
    fn heading_never_jumps_past_max_step() {
        // Hook north through the 0/360 seam: bearings ~315 then ~45.
        let route = Arc::new(
            RouteGeometry::from_pairs(&[(0.0, 0.0), (0.001, -0.001), (0.002, 0.0), (0.003, 0.001)])
                .unwrap(),
        );
        let mut interp = MotionInterpolator::new(HeadingSmoother::new(0.5).with_max_step(4.0));
        interp.start(route, DurationPolicy::FixedStep(0.01));
        let (samples, _) = run_to_end(&mut interp);
        for w in samples.windows(2) {
            assert!(angular_delta(w[0].heading, w[1].heading).abs() <= 4.0 + 1e-9);
        }
    }

    #[test]
    fn camera_variant_zooms_ahead_of_turn() {
        let mut interp = MotionInterpolator::default().with_zoom(ZoomController::default());
        interp.start(three_point(), DurationPolicy::FixedStep(0.0025));
        let (samples, _) = run_to_end(&mut interp);
        let on_first: Vec<f64> = samples
            .iter()
            .filter(|s| s.segment == 0)
            .map(|s| s.zoom.unwrap())
            .collect();
        assert!(on_first.windows(2).all(|w| w[1] > w[0]));
        assert!(on_first.iter().all(|&z| z < 18.5));
    }

    #[test]
    fn plain_variant_has_no_zoom() {
        let mut interp = MotionInterpolator::default();
        interp.start(three_point(), DurationPolicy::FixedStep(0.5));
        let (samples, _) = run_to_end(&mut interp);
        assert!(samples.iter().all(|s| s.zoom.is_none()));
    }
}
