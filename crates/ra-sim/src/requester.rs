//! `Requester` — the party asking for help.
//!
//! Holds only mirrors of responder state.  The trip phase shown here comes
//! from `TRIP_STATUS` / `REQUEST_ACCEPTED` / `DRIVER_STATUS` frames and is
//! never advanced locally.  Until the first `DRIVER_POSITION` arrives the
//! requester animates its own optimistic estimate from the nearest unit;
//! after that the vehicle view is whatever the responder last said.

use ra_core::{Coordinate, RequestId, Role, SimClock, Tick, TimerToken};
use ra_motion::{DurationPolicy, HeadingSmoother, MotionEvent, MotionInterpolator};
use ra_route::{Fleet, RouteProvider, RouteQuery};
use ra_schedule::Scheduler;
use ra_sync::{EmergencyRequest, Endpoint, Envelope, Message, TripStatus};
use ra_trip::{EscalationPhase, EscalationTimer, TripPhase, VerificationCode};

use crate::{DispatchConfig, DispatchError, DispatchResult, Leg, ProcessEvent, VehicleView};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum RequesterTimer {
    EscalationCheck,
    Frame,
}

/// The requester's own view of its request.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum RequestStatus {
    Idle,
    /// Broadcast, no acceptance seen yet.
    Pending,
    Assigned,
    /// The assigned responder went offline.
    Voided,
    Cancelled,
    Completed,
}

impl RequestStatus {
    /// Inbound vehicle and trip updates are applied only while active.
    pub fn is_active(self) -> bool {
        matches!(self, RequestStatus::Pending | RequestStatus::Assigned)
    }
}

/// Responder identity shown once a request is accepted.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Assignment {
    pub driver_name: String,
    pub vehicle:     String,
}

pub struct Requester<P: RouteProvider> {
    clock:        SimClock,
    config:       DispatchConfig,
    endpoint:     Endpoint,
    scheduler:    Scheduler<RequesterTimer>,
    provider:     P,
    fleet:        Fleet,
    code:         VerificationCode,
    interpolator: MotionInterpolator,

    status:           RequestStatus,
    request:          Option<EmergencyRequest>,
    next_request:     RequestId,
    escalation:       Option<EscalationTimer>,
    escalation_timer: Option<TimerToken>,
    frame_timer:      Option<TimerToken>,

    mirror:      TripPhase,
    vehicle:     Option<VehicleView>,
    assignment:  Option<Assignment>,
    events:      Vec<ProcessEvent>,
}

impl<P: RouteProvider> Requester<P> {
    pub fn new(config: DispatchConfig, endpoint: Endpoint, provider: P) -> DispatchResult<Self> {
        let clock = config.clock();
        let code = config.code()?;
        let mut heading = HeadingSmoother::new(config.heading_alpha);
        if let Some(max) = config.max_heading_step {
            heading = heading.with_max_step(max);
        }
        Ok(Self {
            clock,
            fleet: Fleet::numbered(&config.nearby_units),
            code,
            interpolator: MotionInterpolator::new(heading),
            scheduler: Scheduler::new(clock),
            endpoint,
            provider,
            config,
            status: RequestStatus::Idle,
            request: None,
            next_request: RequestId(0),
            escalation: None,
            escalation_timer: None,
            frame_timer: None,
            mirror: TripPhase::Idle,
            vehicle: None,
            assignment: None,
            events: Vec::new(),
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn status(&self) -> RequestStatus {
        self.status
    }

    /// Mirrored trip phase: the last value the responder announced.
    pub fn mirror(&self) -> TripPhase {
        self.mirror
    }

    pub fn vehicle(&self) -> Option<&VehicleView> {
        self.vehicle.as_ref()
    }

    pub fn assignment(&self) -> Option<&Assignment> {
        self.assignment.as_ref()
    }

    pub fn escalation(&self) -> Option<&EscalationTimer> {
        self.escalation.as_ref()
    }

    pub fn escalation_phase(&self) -> Option<EscalationPhase> {
        self.escalation.as_ref().map(EscalationTimer::phase)
    }

    pub fn request_id(&self) -> Option<RequestId> {
        self.request.as_ref().and_then(|r| r.request_id)
    }

    /// The pickup code, shown only while the vehicle waits at pickup.
    pub fn presented_code(&self) -> Option<&VerificationCode> {
        (self.status.is_active() && self.mirror == TripPhase::ArrivedPickup).then_some(&self.code)
    }

    /// `true` while the local optimistic animation is running.
    pub fn is_animating(&self) -> bool {
        self.interpolator.is_active()
    }

    pub fn fleet_mut(&mut self) -> &mut Fleet {
        &mut self.fleet
    }

    /// Hand over everything reported since the last call.
    pub fn take_events(&mut self) -> Vec<ProcessEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Actions ───────────────────────────────────────────────────────────

    /// Broadcast an emergency request.
    ///
    /// A fresh request arms a new escalation ladder, resets the mirror to
    /// `Idle`, and starts the optimistic animation.  While a request is still
    /// pending the same request is re-sent unchanged; the ladder keeps
    /// running.  Once a responder has accepted, asking again is an error.
    pub fn request_help(&mut self, now: Tick) -> DispatchResult<RequestId> {
        match self.status {
            RequestStatus::Assigned => return Err(DispatchError::RequestInProgress),
            RequestStatus::Pending => {
                if let Some(req) = self.request.clone() {
                    tracing::info!(request = ?req.request_id, "emergency request re-sent");
                    self.publish(Message::EmergencyRequest(req.clone()), now)?;
                    return Ok(req.request_id.unwrap_or_default());
                }
            }
            _ => {}
        }

        self.reset_request_state();

        let id = self.next_request;
        self.next_request = id.next();
        let req = EmergencyRequest {
            request_id:        Some(id),
            patient_location:  self.config.patient,
            address:           self.config.address.clone(),
            condition:         self.config.condition.clone(),
            routing_mode:      self.config.routing_mode,
            route_preferences: self.config.route_preferences,
        };
        self.request = Some(req.clone());
        self.status = RequestStatus::Pending;
        self.set_mirror(TripPhase::Idle);

        let now_ms = self.clock.ms_at(now);
        self.escalation = Some(EscalationTimer::new(
            self.config.escalation.clone(),
            self.config.partners.clone(),
            now_ms,
        ));
        self.escalation_timer = Some(self.scheduler.every(
            now,
            self.config.escalation_check_ms,
            RequesterTimer::EscalationCheck,
        ));

        tracing::info!(request = %id, patient = %self.config.patient, "emergency request broadcast");
        self.publish(Message::EmergencyRequest(req), now)?;
        self.start_optimistic(now);
        Ok(id)
    }

    /// Retry the optimistic route lookup after a failure.  A no-op once an
    /// authoritative position has arrived.
    pub fn retry_optimistic_route(&mut self, now: Tick) -> DispatchResult<()> {
        if !self.status.is_active() {
            return Err(DispatchError::NoPendingRequest);
        }
        if !self.has_authoritative_position() {
            self.start_optimistic(now);
        }
        Ok(())
    }

    /// Withdraw the request locally.  Stops escalation and animation.
    pub fn cancel_request(&mut self, _now: Tick) -> DispatchResult<()> {
        if !self.status.is_active() {
            return Err(DispatchError::NoPendingRequest);
        }
        if let Some(timer) = self.escalation.as_mut() {
            timer.cancel();
        }
        self.stop_timers();
        self.status = RequestStatus::Cancelled;
        tracing::info!(request = ?self.request_id(), "request cancelled by requester");
        Ok(())
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Apply delivered frames, then fire due timers.
    pub fn process_tick(&mut self, now: Tick) -> DispatchResult<()> {
        for envelope in self.endpoint.drain() {
            self.on_envelope(&envelope, now);
        }

        for (_, timer) in self.scheduler.due(now) {
            match timer {
                RequesterTimer::EscalationCheck => self.check_escalation(now),
                RequesterTimer::Frame => self.animate(),
            }
        }
        Ok(())
    }

    fn check_escalation(&mut self, now: Tick) {
        let now_ms = self.clock.ms_at(now);
        let Some(timer) = self.escalation.as_mut() else { return };
        let fired = timer.advance(now_ms);
        self.events.extend(fired.into_iter().map(ProcessEvent::Escalation));
    }

    fn animate(&mut self) {
        match self.interpolator.tick() {
            Some(MotionEvent::Sample(sample)) => {
                let view = VehicleView {
                    position:      sample.position,
                    heading:       sample.heading,
                    eta_minutes:   Some(sample.eta_minutes),
                    authoritative: false,
                };
                self.vehicle = Some(view);
                self.events.push(ProcessEvent::Motion { leg: Leg::Optimistic, sample });
            }
            Some(MotionEvent::Arrived { .. }) => {
                self.cancel_frame_timer();
                self.events.push(ProcessEvent::LegArrived { leg: Leg::Optimistic });
            }
            None => self.cancel_frame_timer(),
        }
    }

    // ── Inbound ───────────────────────────────────────────────────────────

    fn on_envelope(&mut self, envelope: &Envelope, now: Tick) {
        if envelope.sender != Role::Responder {
            return;
        }
        if !self.status.is_active() {
            tracing::debug!(kind = %envelope.kind(), status = ?self.status, "frame ignored, no active request");
            return;
        }

        match &envelope.message {
            Message::DriverPosition(pos) => {
                if !self.has_authoritative_position() {
                    self.interpolator.stop();
                    self.cancel_frame_timer();
                }
                let view = VehicleView {
                    position:      pos.pos,
                    heading:       pos.angle,
                    eta_minutes:   pos.eta,
                    authoritative: true,
                };
                self.vehicle = Some(view);
                self.events.push(ProcessEvent::VehicleUpdated(view));
            }

            Message::RequestAccepted(acc) => {
                if self.status == RequestStatus::Assigned {
                    return;
                }
                let now_ms = self.clock.ms_at(now);
                if let Some(ev) = self.escalation.as_mut().and_then(|t| t.confirm(now_ms)) {
                    self.events.push(ProcessEvent::Escalation(ev));
                }
                if let Some(token) = self.escalation_timer.take() {
                    self.scheduler.cancel(token);
                }
                self.status = RequestStatus::Assigned;
                let assignment = Assignment {
                    driver_name: acc.driver_name.clone(),
                    vehicle:     acc.vehicle.clone(),
                };
                tracing::info!(driver = %assignment.driver_name, vehicle = %assignment.vehicle, "request accepted");
                self.events.push(ProcessEvent::AssignmentConfirmed {
                    driver_name: assignment.driver_name.clone(),
                    vehicle:     assignment.vehicle.clone(),
                });
                self.assignment = Some(assignment);
                self.set_mirror(TripPhase::Accepted);
            }

            Message::TripStatus(update) => {
                let phase = match update.status {
                    TripStatus::Arrived         => TripPhase::ArrivedPickup,
                    TripStatus::OnBoard         => TripPhase::Onboard,
                    TripStatus::ReachedHospital => TripPhase::Completed,
                };
                let changed = self.set_mirror(phase);
                if changed && phase == TripPhase::ArrivedPickup {
                    self.events.push(ProcessEvent::CodePresented { code: self.code.as_str().to_owned() });
                }
                if phase == TripPhase::Completed {
                    self.stop_timers();
                    self.status = RequestStatus::Completed;
                }
            }

            Message::DriverStatus(_) => {
                // Only an assignment can be voided; a pending search keeps escalating.
                if self.status != RequestStatus::Assigned {
                    tracing::debug!(request = ?self.request_id(), "responder offline, no assignment held");
                    return;
                }
                tracing::warn!(request = ?self.request_id(), "responder offline, assignment void");
                if let Some(timer) = self.escalation.as_mut() {
                    timer.cancel();
                }
                self.stop_timers();
                self.status = RequestStatus::Voided;
                self.assignment = None;
                if self.vehicle.take().is_some() {
                    self.events.push(ProcessEvent::VehicleHidden);
                }
                self.events.push(ProcessEvent::AssignmentVoided);
                self.set_mirror(TripPhase::Cancelled);
            }

            Message::EmergencyRequest(_) => {}
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn has_authoritative_position(&self) -> bool {
        self.vehicle.is_some_and(|v| v.authoritative)
    }

    /// Record `phase` as the mirror.  Returns whether it changed.
    fn set_mirror(&mut self, phase: TripPhase) -> bool {
        if self.mirror == phase {
            return false;
        }
        self.mirror = phase;
        self.events.push(ProcessEvent::MirrorUpdated { phase });
        true
    }

    fn start_optimistic(&mut self, now: Tick) {
        let Some(unit) = self.fleet.nearest_available(self.config.patient) else {
            tracing::debug!("no available unit nearby, no optimistic animation");
            return;
        };
        let origin: Coordinate = unit.position;
        let query = RouteQuery::new(origin, self.config.patient)
            .with_mode(self.config.routing_mode, self.config.route_preferences);

        match self.provider.lookup(&query) {
            Ok(found) => {
                let policy = if self.config.use_route_estimate {
                    DurationPolicy::from_estimate(
                        found.duration_secs,
                        self.clock.period_ms(self.config.frame_ms),
                        self.config.requester_step,
                    )
                } else {
                    DurationPolicy::FixedStep(self.config.requester_step)
                };
                self.interpolator.start(found.geometry, policy);
                self.cancel_frame_timer();
                self.frame_timer = Some(self.scheduler.every(now, self.config.frame_ms, RequesterTimer::Frame));
            }
            Err(err) => {
                tracing::warn!(error = %err, "optimistic route lookup failed");
                self.events.push(ProcessEvent::LookupFailed { leg: Leg::Optimistic, error: err.to_string() });
            }
        }
    }

    fn publish(&mut self, message: Message, now: Tick) -> DispatchResult<()> {
        let kind = message.kind();
        self.endpoint.publish(message, self.clock.unix_ms_at(now))?;
        self.events.push(ProcessEvent::Published { kind });
        Ok(())
    }

    fn cancel_frame_timer(&mut self) {
        if let Some(token) = self.frame_timer.take() {
            self.scheduler.cancel(token);
        }
    }

    fn stop_timers(&mut self) {
        self.interpolator.stop();
        self.cancel_frame_timer();
        if let Some(token) = self.escalation_timer.take() {
            self.scheduler.cancel(token);
        }
    }

    /// Clear everything tied to a previous request.
    fn reset_request_state(&mut self) {
        self.stop_timers();
        self.escalation = None;
        self.assignment = None;
        self.request = None;
        if self.vehicle.take().is_some() {
            self.events.push(ProcessEvent::VehicleHidden);
        }
    }
}
