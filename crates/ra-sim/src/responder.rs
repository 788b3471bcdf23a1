//! `Responder` — the authoritative side of a trip.
//!
//! Owns the only `TripStateMachine`.  Every phase the requester shows is a
//! consequence of a message published here.

use ra_core::{Coordinate, RequestId, Role, SimClock, Tick, TimerToken};
use ra_motion::{DurationPolicy, HeadingSmoother, MotionEvent, MotionInterpolator};
use ra_route::{RouteProvider, RouteQuery};
use ra_schedule::Scheduler;
use ra_sync::{
    DriverPosition, DriverStatus, DriverStatusUpdate, EmergencyRequest, Endpoint, Envelope, Message,
    RequestAccepted, TripStatus, TripStatusUpdate,
};
use ra_trip::{CodeEntry, TripError, TripEvent, TripPhase, TripStateMachine, VerificationCode};

use crate::{DispatchConfig, DispatchError, DispatchResult, Leg, ProcessEvent};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ResponderTimer {
    Frame,
}

pub struct Responder<P: RouteProvider> {
    clock:        SimClock,
    config:       DispatchConfig,
    endpoint:     Endpoint,
    scheduler:    Scheduler<ResponderTimer>,
    provider:     P,
    code:         VerificationCode,
    machine:      TripStateMachine,
    interpolator: MotionInterpolator,

    online:       bool,
    pending:      Option<EmergencyRequest>,
    /// Request currently being served, for duplicate suppression.
    serving:      Option<RequestId>,
    leg:          Option<Leg>,
    /// End point of the current leg.
    leg_end:      Coordinate,
    frame_timer:  Option<TimerToken>,
    position:     Coordinate,
    events:       Vec<ProcessEvent>,
}

impl<P: RouteProvider> Responder<P> {
    pub fn new(config: DispatchConfig, endpoint: Endpoint, provider: P) -> DispatchResult<Self> {
        let clock = config.clock();
        let code = config.code()?;
        let mut heading = HeadingSmoother::new(config.heading_alpha);
        if let Some(max) = config.max_heading_step {
            heading = heading.with_max_step(max);
        }
        Ok(Self {
            clock,
            scheduler: Scheduler::new(clock),
            code,
            machine: TripStateMachine::new(),
            interpolator: MotionInterpolator::new(heading),
            online: true,
            pending: None,
            serving: None,
            leg: None,
            leg_end: config.responder_start,
            frame_timer: None,
            position: config.responder_start,
            events: Vec::new(),
            endpoint,
            provider,
            config,
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn phase(&self) -> TripPhase {
        self.machine.phase()
    }

    pub fn machine(&self) -> &TripStateMachine {
        &self.machine
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    /// The request waiting for accept or decline.
    pub fn pending_request(&self) -> Option<&EmergencyRequest> {
        self.pending.as_ref()
    }

    pub fn position(&self) -> Coordinate {
        self.position
    }

    /// Leg being driven right now, if any.
    pub fn current_leg(&self) -> Option<Leg> {
        self.leg
    }

    pub fn is_navigating(&self) -> bool {
        self.interpolator.is_active()
    }

    pub fn take_events(&mut self) -> Vec<ProcessEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Operator actions ──────────────────────────────────────────────────

    /// Accept the pending request and start driving to the patient.
    ///
    /// A failed route lookup leaves the trip `Accepted`; see
    /// [`retry_navigation`][Self::retry_navigation].
    pub fn accept_request(&mut self, now: Tick) -> DispatchResult<()> {
        if !self.online {
            return Err(DispatchError::Offline);
        }
        if self.pending.is_none() {
            return Err(DispatchError::NoPendingRequest);
        }
        self.apply(TripEvent::Accept, now)?;
        let accepted = RequestAccepted {
            driver_name: self.config.driver_name.clone(),
            vehicle:     self.config.vehicle.clone(),
        };
        self.publish(Message::RequestAccepted(accepted), now)?;
        self.start_leg(Leg::Pickup, now)
    }

    pub fn decline_request(&mut self, now: Tick) -> DispatchResult<()> {
        if self.pending.is_none() {
            return Err(DispatchError::NoPendingRequest);
        }
        self.apply(TripEvent::Decline, now)?;
        self.pending = None;
        // A later resend of the same request is offered again.
        self.serving = None;
        Ok(())
    }

    /// Check the code read out by the patient.  `entry` is cleared by every
    /// attempt made at pickup.
    pub fn enter_code(&mut self, entry: &mut CodeEntry, now: Tick) -> DispatchResult<()> {
        let at_ms = self.clock.ms_at(now);
        match self.machine.enter_code(&self.code, entry, at_ms) {
            Ok(_) => {
                self.record_last_transition();
                self.board(now)
            }
            Err(err) => {
                if matches!(err, TripError::CodeMismatch | TripError::MalformedCode(_)) {
                    self.events.push(ProcessEvent::VerificationRejected { reason: err.to_string() });
                }
                Err(err.into())
            }
        }
    }

    /// Board the patient without a code.  Recorded as an override.
    pub fn override_verification(&mut self, now: Tick) -> DispatchResult<()> {
        self.machine.override_verification(self.clock.ms_at(now))?;
        self.record_last_transition();
        self.board(now)
    }

    /// Abandon the trip before the patient is on board.
    ///
    /// Once a requester holds an assignment it is told through
    /// `DRIVER_STATUS OFFLINE`; the wire has no other way to void it.
    pub fn cancel(&mut self, now: Tick) -> DispatchResult<()> {
        let assigned = self.holds_assignment();
        self.apply(TripEvent::Cancel, now)?;
        self.stop_leg();
        self.pending = None;
        if assigned {
            self.publish_offline(now)?;
        }
        Ok(())
    }

    /// Stop taking requests.  Cancels any trip not yet on board.
    ///
    /// `DRIVER_STATUS OFFLINE` goes out only when an accepted trip is
    /// abandoned.  A requester still searching keeps escalating.
    pub fn go_offline(&mut self, now: Tick) -> DispatchResult<()> {
        if !self.online {
            return Ok(());
        }
        let assigned = self.holds_assignment();
        let phase = self.machine.phase();
        if phase.is_cancellable() && phase != TripPhase::Idle {
            self.apply(TripEvent::GoOffline, now)?;
            self.stop_leg();
        } else if !phase.is_terminal() && phase != TripPhase::Idle {
            return Err(TripError::InvalidTransition { from: phase, event: TripEvent::GoOffline }.into());
        }
        self.pending = None;
        self.online = false;
        tracing::info!(driver = %self.config.driver_name, "responder offline");
        if assigned {
            self.publish_offline(now)?;
        }
        Ok(())
    }

    pub fn go_online(&mut self, now: Tick) -> DispatchResult<()> {
        if self.online {
            return Ok(());
        }
        self.online = true;
        tracing::info!(driver = %self.config.driver_name, "responder online");
        self.reset(now)
    }

    /// Finish the trip without waiting for the destination leg to arrive.
    pub fn mark_trip_complete(&mut self, now: Tick) -> DispatchResult<()> {
        self.apply(TripEvent::MarkComplete, now)?;
        self.stop_leg();
        self.publish_status(TripStatus::ReachedHospital, now)
    }

    /// Retry the route lookup for the leg the current phase is waiting on.
    pub fn retry_navigation(&mut self, now: Tick) -> DispatchResult<()> {
        match self.machine.phase() {
            TripPhase::Accepted => self.start_leg(Leg::Pickup, now),
            TripPhase::Onboard  => self.start_leg(Leg::Destination, now),
            _ => Err(DispatchError::NothingToRetry),
        }
    }

    /// Return a finished trip to `Idle`.  A no-op in any other phase.
    pub fn reset(&mut self, now: Tick) -> DispatchResult<()> {
        if self.machine.phase().is_terminal() {
            self.apply(TripEvent::Reset, now)?;
            self.serving = None;
        }
        Ok(())
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    pub fn process_tick(&mut self, now: Tick) -> DispatchResult<()> {
        for envelope in self.endpoint.drain() {
            self.on_envelope(envelope, now)?;
        }
        for (_, ResponderTimer::Frame) in self.scheduler.due(now) {
            self.drive(now)?;
        }
        Ok(())
    }

    fn on_envelope(&mut self, envelope: Envelope, now: Tick) -> DispatchResult<()> {
        if envelope.sender != Role::Requester {
            return Ok(());
        }
        let Message::EmergencyRequest(request) = envelope.message else {
            return Ok(());
        };

        if !self.online {
            self.ignore("offline");
            return Ok(());
        }
        if request.request_id.is_some() && request.request_id == self.serving {
            self.ignore("duplicate request");
            return Ok(());
        }
        if self.machine.phase().is_terminal() {
            self.reset(now)?;
        }
        if self.machine.phase() != TripPhase::Idle {
            self.ignore("busy with another trip");
            return Ok(());
        }

        self.apply(TripEvent::RequestReceived, now)?;
        tracing::info!(
            request = ?request.request_id,
            address = %request.address,
            condition = %request.condition,
            "emergency request received",
        );
        self.serving = request.request_id;
        self.pending = Some(request);
        Ok(())
    }

    fn drive(&mut self, now: Tick) -> DispatchResult<()> {
        let Some(leg) = self.leg else {
            self.cancel_frame_timer();
            return Ok(());
        };
        match self.interpolator.tick() {
            Some(MotionEvent::Sample(sample)) => {
                self.position = sample.position;
                let pos = DriverPosition {
                    pos:   sample.position,
                    angle: sample.heading,
                    eta:   Some(sample.eta_minutes),
                };
                self.events.push(ProcessEvent::Motion { leg, sample });
                self.publish(Message::DriverPosition(pos), now)
            }
            Some(MotionEvent::Arrived { .. }) => {
                self.cancel_frame_timer();
                self.leg = None;
                // The last sample may fall short of progress 1.
                self.position = self.leg_end;
                let pos = DriverPosition {
                    pos:   self.leg_end,
                    angle: self.interpolator.heading(),
                    eta:   Some(0),
                };
                self.publish(Message::DriverPosition(pos), now)?;
                self.events.push(ProcessEvent::LegArrived { leg });
                match leg {
                    Leg::Pickup => {
                        self.apply(TripEvent::PickupReached, now)?;
                        self.publish_status(TripStatus::Arrived, now)
                    }
                    Leg::Destination => {
                        self.apply(TripEvent::DestinationReached, now)?;
                        self.publish_status(TripStatus::ReachedHospital, now)
                    }
                    Leg::Optimistic => Ok(()),
                }
            }
            None => {
                self.cancel_frame_timer();
                Ok(())
            }
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn board(&mut self, now: Tick) -> DispatchResult<()> {
        self.publish_status(TripStatus::OnBoard, now)?;
        self.start_leg(Leg::Destination, now)
    }

    /// Look up and start a navigation leg.  A lookup failure is reported as
    /// an event and leaves the phase where it was.
    fn start_leg(&mut self, leg: Leg, now: Tick) -> DispatchResult<()> {
        let (destination, event) = match leg {
            Leg::Pickup => {
                let patient = self.pending.as_ref().map_or(self.config.patient, |r| r.patient_location);
                (patient, TripEvent::PickupLegStarted)
            }
            Leg::Destination => (self.config.hospital, TripEvent::DestinationLegStarted),
            Leg::Optimistic => return Ok(()),
        };
        let (mode, preferences) = match &self.pending {
            Some(r) => (r.routing_mode, r.route_preferences),
            None => (self.config.routing_mode, self.config.route_preferences),
        };
        let query = RouteQuery::new(self.position, destination).with_mode(mode, preferences);

        let found = match self.provider.lookup(&query) {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!(leg = leg.as_str(), error = %err, "navigation lookup failed");
                self.events.push(ProcessEvent::LookupFailed { leg, error: err.to_string() });
                return Ok(());
            }
        };

        let policy = if self.config.use_route_estimate {
            DurationPolicy::from_estimate(
                found.duration_secs,
                self.clock.period_ms(self.config.frame_ms),
                self.config.responder_step,
            )
        } else {
            DurationPolicy::FixedStep(self.config.responder_step)
        };
        self.apply(event, now)?;
        tracing::info!(
            leg = leg.as_str(),
            waypoints = found.geometry.len(),
            km = found.distance_km(),
            "navigation leg started",
        );
        self.leg_end = found.geometry.destination();
        self.interpolator.start(found.geometry, policy);
        self.leg = Some(leg);
        self.cancel_frame_timer();
        self.frame_timer = Some(self.scheduler.every(now, self.config.frame_ms, ResponderTimer::Frame));
        Ok(())
    }

    /// Whether a requester has been told this responder took its request.
    fn holds_assignment(&self) -> bool {
        matches!(
            self.machine.phase(),
            TripPhase::Accepted | TripPhase::EnRoutePickup | TripPhase::ArrivedPickup
        )
    }

    fn stop_leg(&mut self) {
        self.interpolator.stop();
        self.cancel_frame_timer();
        self.leg = None;
    }

    fn cancel_frame_timer(&mut self) {
        if let Some(token) = self.frame_timer.take() {
            self.scheduler.cancel(token);
        }
    }

    fn apply(&mut self, event: TripEvent, now: Tick) -> DispatchResult<TripPhase> {
        let to = self.machine.apply(event, self.clock.ms_at(now))?;
        self.record_last_transition();
        Ok(to)
    }

    fn record_last_transition(&mut self) {
        if let Some(rec) = self.machine.history().last() {
            self.events.push(ProcessEvent::TripTransition { from: rec.from, to: rec.to, cause: rec.cause });
        }
    }

    fn ignore(&mut self, reason: &'static str) {
        tracing::debug!(reason, "emergency request ignored");
        self.events.push(ProcessEvent::RequestIgnored { reason });
    }

    fn publish_status(&mut self, status: TripStatus, now: Tick) -> DispatchResult<()> {
        self.publish(Message::TripStatus(TripStatusUpdate { status }), now)
    }

    fn publish_offline(&mut self, now: Tick) -> DispatchResult<()> {
        let update = DriverStatusUpdate { status: DriverStatus::Offline };
        self.publish(Message::DriverStatus(update), now)
    }

    fn publish(&mut self, message: Message, now: Tick) -> DispatchResult<()> {
        let kind = message.kind();
        self.endpoint.publish(message, self.clock.unix_ms_at(now))?;
        // Position frames are too frequent to report individually.
        if kind != ra_sync::MessageKind::DriverPosition {
            self.events.push(ProcessEvent::Published { kind });
        }
        Ok(())
    }
}
