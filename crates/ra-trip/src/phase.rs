//! Trip phases and the events that move between them.

use std::fmt;

/// Phase of a single dispatch, as owned by the responder.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum TripPhase {
    #[default]
    Idle,
    Requested,
    Accepted,
    EnRoutePickup,
    ArrivedPickup,
    Onboard,
    EnRouteDestination,
    Completed,
    Cancelled,
}

impl TripPhase {
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, TripPhase::Completed | TripPhase::Cancelled)
    }

    /// Phases that a cancel or go-offline may still abort.
    #[inline]
    pub fn is_cancellable(self) -> bool {
        matches!(
            self,
            TripPhase::Idle
                | TripPhase::Requested
                | TripPhase::Accepted
                | TripPhase::EnRoutePickup
                | TripPhase::ArrivedPickup
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TripPhase::Idle               => "IDLE",
            TripPhase::Requested          => "REQUESTED",
            TripPhase::Accepted           => "ACCEPTED",
            TripPhase::EnRoutePickup      => "EN_ROUTE_PICKUP",
            TripPhase::ArrivedPickup      => "ARRIVED_PICKUP",
            TripPhase::Onboard            => "ONBOARD",
            TripPhase::EnRouteDestination => "EN_ROUTE_DESTINATION",
            TripPhase::Completed          => "COMPLETED",
            TripPhase::Cancelled          => "CANCELLED",
        }
    }
}

impl fmt::Display for TripPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something that may move the trip forward.  Each operator action and each
/// interpolator milestone maps to exactly one event.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum TripEvent {
    RequestReceived,
    Accept,
    Decline,
    PickupLegStarted,
    PickupReached,
    /// Produced only by a successful code entry.
    VerifyCode,
    /// Elevated-trust bypass of code verification.
    Override,
    DestinationLegStarted,
    DestinationReached,
    MarkComplete,
    Cancel,
    GoOffline,
    Reset,
}

impl TripEvent {
    /// The phase `from` moves to on this event, or `None` if the pair is not
    /// in the transition table.
    pub fn target(self, from: TripPhase) -> Option<TripPhase> {
        use TripEvent as E;
        use TripPhase as P;

        match (from, self) {
            (P::Idle, E::RequestReceived)                      => Some(P::Requested),
            (P::Idle | P::Requested, E::Accept)                => Some(P::Accepted),
            (P::Requested, E::Decline)                         => Some(P::Idle),
            (P::Accepted, E::PickupLegStarted)                 => Some(P::EnRoutePickup),
            (P::EnRoutePickup, E::PickupReached)               => Some(P::ArrivedPickup),
            (P::ArrivedPickup, E::VerifyCode | E::Override)    => Some(P::Onboard),
            (P::Onboard, E::DestinationLegStarted)             => Some(P::EnRouteDestination),
            (P::EnRouteDestination, E::DestinationReached | E::MarkComplete) => Some(P::Completed),
            (p, E::Cancel | E::GoOffline) if p.is_cancellable() => Some(P::Cancelled),
            (P::Completed | P::Cancelled, E::Reset)            => Some(P::Idle),
            _ => None,
        }
    }
}
