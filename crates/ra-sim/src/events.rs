//! Everything a process reports outward.
//!
//! Processes never touch presentation state.  Each state change they make is
//! recorded as a `ProcessEvent`; the runner forwards these to a
//! [`DispatchObserver`][crate::DispatchObserver], which is where rendering,
//! alerts, and trace output hook in.

use ra_core::Coordinate;
use ra_motion::MotionSample;
use ra_sync::MessageKind;
use ra_trip::{EscalationEvent, TransitionCause, TripPhase};

/// Which animation a motion event belongs to.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Leg {
    /// Requester's local estimate before any authoritative position.
    Optimistic,
    Pickup,
    Destination,
}

impl Leg {
    pub fn as_str(self) -> &'static str {
        match self {
            Leg::Optimistic  => "optimistic",
            Leg::Pickup      => "pickup",
            Leg::Destination => "destination",
        }
    }
}

/// How the requester currently shows the vehicle.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct VehicleView {
    pub position:      Coordinate,
    pub heading:       f64,
    pub eta_minutes:   Option<u32>,
    /// `true` once the view comes from a `DRIVER_POSITION`.
    pub authoritative: bool,
}

#[derive(Clone, PartialEq, Debug)]
pub enum ProcessEvent {
    Published { kind: MessageKind },
    Motion { leg: Leg, sample: MotionSample },
    LegArrived { leg: Leg },
    LookupFailed { leg: Leg, error: String },
    TripTransition { from: TripPhase, to: TripPhase, cause: TransitionCause },
    VerificationRejected { reason: String },
    Escalation(EscalationEvent),
    MirrorUpdated { phase: TripPhase },
    VehicleUpdated(VehicleView),
    VehicleHidden,
    /// The pickup code the requester must read out to the responder.
    CodePresented { code: String },
    AssignmentConfirmed { driver_name: String, vehicle: String },
    AssignmentVoided,
    RequestIgnored { reason: &'static str },
}

impl ProcessEvent {
    /// Short stable name, used as a trace column.
    pub fn kind(&self) -> &'static str {
        match self {
            ProcessEvent::Published { .. }            => "published",
            ProcessEvent::Motion { .. }               => "motion",
            ProcessEvent::LegArrived { .. }           => "leg_arrived",
            ProcessEvent::LookupFailed { .. }         => "lookup_failed",
            ProcessEvent::TripTransition { .. }       => "trip_transition",
            ProcessEvent::VerificationRejected { .. } => "verification_rejected",
            ProcessEvent::Escalation(_)               => "escalation",
            ProcessEvent::MirrorUpdated { .. }        => "mirror_updated",
            ProcessEvent::VehicleUpdated(_)           => "vehicle_updated",
            ProcessEvent::VehicleHidden               => "vehicle_hidden",
            ProcessEvent::CodePresented { .. }        => "code_presented",
            ProcessEvent::AssignmentConfirmed { .. }  => "assignment_confirmed",
            ProcessEvent::AssignmentVoided            => "assignment_voided",
            ProcessEvent::RequestIgnored { .. }       => "request_ignored",
        }
    }
}
