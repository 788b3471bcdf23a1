//! Wire message taxonomy.
//!
//! Messages serialise as `{ "type": "<KIND>", "data": { … } }` with camelCase
//! payload fields.

use std::fmt;

use serde::{Deserialize, Serialize};

use ra_core::{Coordinate, RequestId};
use ra_route::{RoutePreferences, RoutingMode};

/// A message published on the bus.  Immutable once published.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    /// Requester → responder.
    EmergencyRequest(EmergencyRequest),
    /// Responder → requester.  Authoritative vehicle position.
    DriverPosition(DriverPosition),
    /// Responder → requester.  Ends escalation.
    RequestAccepted(RequestAccepted),
    /// Responder → requester.  Trip phase mirror update.
    TripStatus(TripStatusUpdate),
    /// Responder → requester.
    DriverStatus(DriverStatusUpdate),
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::EmergencyRequest(_) => MessageKind::EmergencyRequest,
            Message::DriverPosition(_)   => MessageKind::DriverPosition,
            Message::RequestAccepted(_)  => MessageKind::RequestAccepted,
            Message::TripStatus(_)       => MessageKind::TripStatus,
            Message::DriverStatus(_)     => MessageKind::DriverStatus,
        }
    }
}

/// Payload-free message discriminant, for logs and traces.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum MessageKind {
    EmergencyRequest,
    DriverPosition,
    RequestAccepted,
    TripStatus,
    DriverStatus,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::EmergencyRequest => "EMERGENCY_REQUEST",
            MessageKind::DriverPosition   => "DRIVER_POSITION",
            MessageKind::RequestAccepted  => "REQUEST_ACCEPTED",
            MessageKind::TripStatus       => "TRIP_STATUS",
            MessageKind::DriverStatus     => "DRIVER_STATUS",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Payloads ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyRequest {
    /// Identity of the logical request.  Resends reuse it so a responder can
    /// drop duplicates; absent on frames from older clients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id:       Option<RequestId>,
    pub patient_location: Coordinate,
    pub address:          String,
    pub condition:        String,
    pub routing_mode:     RoutingMode,
    pub route_preferences: RoutePreferences,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DriverPosition {
    pub pos:   Coordinate,
    /// Heading in degrees.
    pub angle: f64,
    /// Minutes to the current leg's end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eta:   Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestAccepted {
    pub driver_name: String,
    pub vehicle:     String,
}

/// Trip milestones the responder announces.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TripStatus {
    Arrived,
    OnBoard,
    ReachedHospital,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripStatusUpdate {
    pub status: TripStatus,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DriverStatus {
    Offline,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverStatusUpdate {
    pub status: DriverStatus,
}
