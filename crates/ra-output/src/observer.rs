//! `TraceObserver<W>` — bridges `DispatchObserver` to a `TraceWriter`.

use ra_core::{Role, Tick};
use ra_sim::{DispatchObserver, ProcessEvent};
use ra_trip::EscalationEvent;

use crate::row::{EventRow, PositionRow};
use crate::writer::TraceWriter;
use crate::{OutputError, OutputResult};

/// A [`DispatchObserver`] that buffers one tick of positions and events and
/// hands them to a [`TraceWriter`] at the end of the tick.
///
/// Errors from the writer are stored internally because observer methods
/// have no return value.  Check with [`take_error`][Self::take_error] after
/// the run.
pub struct TraceObserver<W: TraceWriter> {
    writer:     W,
    positions:  Vec<PositionRow>,
    events:     Vec<EventRow>,
    last_error: Option<OutputError>,
}

impl<W: TraceWriter> TraceObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, positions: Vec::new(), events: Vec::new(), last_error: None }
    }

    /// Take the stored write error (if any).
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn flush(&mut self) {
        if !self.positions.is_empty() {
            let result = self.writer.write_positions(&self.positions);
            self.positions.clear();
            self.store_err(result);
        }
        if !self.events.is_empty() {
            let result = self.writer.write_events(&self.events);
            self.events.clear();
            self.store_err(result);
        }
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: TraceWriter> DispatchObserver for TraceObserver<W> {
    fn on_event(&mut self, tick: Tick, role: Role, event: &ProcessEvent) {
        match event {
            ProcessEvent::Motion { sample, .. } => self.positions.push(PositionRow {
                tick:     tick.0,
                role,
                lat:      sample.position.lat,
                lng:      sample.position.lng,
                heading:  sample.heading,
                progress: Some(sample.progress),
            }),
            ProcessEvent::VehicleUpdated(view) => self.positions.push(PositionRow {
                tick:     tick.0,
                role,
                lat:      view.position.lat,
                lng:      view.position.lng,
                heading:  view.heading,
                progress: None,
            }),
            other => self.events.push(EventRow {
                tick:   tick.0,
                role,
                kind:   other.kind(),
                detail: detail(other),
            }),
        }
    }

    fn on_tick_end(&mut self, _tick: Tick) {
        self.flush();
    }

    fn on_run_end(&mut self, _final_tick: Tick) {
        self.flush();
        let result = self.writer.finish();
        self.store_err(result);
    }
}

/// One-line description of a non-motion event.
pub fn detail(event: &ProcessEvent) -> String {
    match event {
        ProcessEvent::Published { kind }             => kind.to_string(),
        ProcessEvent::LegArrived { leg }             => leg.as_str().to_owned(),
        ProcessEvent::LookupFailed { leg, error }    => format!("{}: {error}", leg.as_str()),
        ProcessEvent::TripTransition { from, to, cause } => format!("{from} -> {to} ({cause:?})"),
        ProcessEvent::VerificationRejected { reason } => reason.clone(),
        ProcessEvent::Escalation(e) => match e {
            EscalationEvent::PhaseChanged { from, to, at_ms } => format!("{from:?} -> {to:?} at {at_ms} ms"),
            EscalationEvent::RadiusWidened { radius_km }     => format!("radius {radius_km} km"),
            EscalationEvent::PartnerNotified { name, at_ms, .. } => format!("{name} at {at_ms} ms"),
            EscalationEvent::SatellitePriorityRaised         => "satellite priority".to_owned(),
        },
        ProcessEvent::MirrorUpdated { phase }        => phase.to_string(),
        ProcessEvent::CodePresented { code }         => code.clone(),
        ProcessEvent::AssignmentConfirmed { driver_name, vehicle } => format!("{driver_name} ({vehicle})"),
        ProcessEvent::RequestIgnored { reason }      => (*reason).to_owned(),
        ProcessEvent::Motion { .. }
        | ProcessEvent::VehicleUpdated(_)
        | ProcessEvent::VehicleHidden
        | ProcessEvent::AssignmentVoided             => String::new(),
    }
}
