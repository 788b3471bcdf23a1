//! Unit tests for ra-sync.

use ra_core::{Coordinate, RequestId, Role};
use ra_route::{RoutePreferences, RoutingMode};

use crate::{
    Channel, DriverPosition, DriverStatus, DriverStatusUpdate, EmergencyRequest, Envelope,
    FaultPolicy, Message, MessageKind, RequestAccepted, TripStatus, TripStatusUpdate,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn position(lat: f64, lng: f64, angle: f64) -> Message {
    Message::DriverPosition(DriverPosition { pos: Coordinate::new(lat, lng), angle, eta: Some(4) })
}

fn emergency() -> Message {
    Message::EmergencyRequest(EmergencyRequest {
        request_id:        Some(RequestId(1)),
        patient_location:  Coordinate::new(12.9716, 77.5946),
        address:           "MG Road, Bengaluru".into(),
        condition:         "Chest pain".into(),
        routing_mode:      RoutingMode::Intelligent,
        route_preferences: RoutePreferences::emergency(),
    })
}

// ── Wire codec ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod codec {
    use serde_json::{Value, json};

    use super::*;

    #[test]
    fn emergency_request_wire_shape() {
        let env = Envelope::new(Role::Requester, 1_700_000_000_000, emergency());
        let v: Value = serde_json::from_str(&env.to_json().unwrap()).unwrap();
        assert_eq!(v["sender"], "REQUESTER");
        assert_eq!(v["timestamp"], 1_700_000_000_000i64);
        assert_eq!(v["message"]["type"], "EMERGENCY_REQUEST");
        let data = &v["message"]["data"];
        assert_eq!(data["patientLocation"], json!({ "lat": 12.9716, "lng": 77.5946 }));
        assert_eq!(data["routingMode"], "INTELLIGENT");
        assert_eq!(data["routePreferences"]["preferWideRoads"], true);
        assert_eq!(data["routePreferences"]["avoidMarketAreas"], true);
        assert_eq!(data["requestId"], 1);
    }

    #[test]
    fn status_enums_use_screaming_case() {
        let on_board = Message::TripStatus(TripStatusUpdate { status: TripStatus::OnBoard });
        let v = serde_json::to_value(&on_board).unwrap();
        assert_eq!(v, json!({ "type": "TRIP_STATUS", "data": { "status": "ON_BOARD" } }));

        let offline = Message::DriverStatus(DriverStatusUpdate { status: DriverStatus::Offline });
        let v = serde_json::to_value(&offline).unwrap();
        assert_eq!(v, json!({ "type": "DRIVER_STATUS", "data": { "status": "OFFLINE" } }));
    }

    #[test]
    fn accepted_uses_camel_case() {
        let m = Message::RequestAccepted(RequestAccepted {
            driver_name: "Sarah Wilson".into(),
            vehicle:     "KA-01-MJ-2024".into(),
        });
        let v = serde_json::to_value(&m).unwrap();
        assert_eq!(v["data"]["driverName"], "Sarah Wilson");
    }

    #[test]
    fn optional_eta_is_omitted_and_defaulted() {
        let m = Message::DriverPosition(DriverPosition {
            pos:   Coordinate::new(1.0, 2.0),
            angle: 90.0,
            eta:   None,
        });
        let v = serde_json::to_value(&m).unwrap();
        assert!(v["data"].get("eta").is_none());

        let frame = r#"{"sender":"RESPONDER","timestamp":5,"message":{"type":"DRIVER_POSITION","data":{"pos":{"lat":1.0,"lng":2.0},"angle":90.0}}}"#;
        let env = Envelope::from_json(frame).unwrap();
        assert_eq!(env.message, m);
        assert_eq!(env.kind(), MessageKind::DriverPosition);
    }

    #[test]
    fn request_without_id_decodes() {
        let frame = r#"{"sender":"REQUESTER","timestamp":0,"message":{"type":"EMERGENCY_REQUEST","data":{
            "patientLocation":{"lat":12.9716,"lng":77.5946},"address":"","condition":"",
            "routingMode":"STANDARD","routePreferences":{"preferWideRoads":false,"avoidNarrowLanes":false,
            "avoidSchoolZones":false,"avoidMarketAreas":false}}}}"#;
        let env = Envelope::from_json(frame).unwrap();
        let Message::EmergencyRequest(req) = env.message else { panic!("wrong kind") };
        assert_eq!(req.request_id, None);
        assert_eq!(req.routing_mode, RoutingMode::Standard);
    }

    #[test]
    fn unknown_type_is_an_error() {
        let frame = r#"{"sender":"RESPONDER","timestamp":0,"message":{"type":"PING","data":{}}}"#;
        assert!(Envelope::from_json(frame).is_err());
    }
}

// ── Delivery ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod delivery {
    use super::*;

    #[test]
    fn five_positions_mirrored_exactly() {
        let ch = Channel::reliable("rapid-aid");
        let responder = ch.attach(Role::Responder);
        let requester = ch.attach(Role::Requester);

        let mut mirror: Option<Coordinate> = Some(Coordinate::new(0.0, 0.0)); // optimistic
        for i in 0..5 {
            let lat = 12.9850 - i as f64 * 0.001;
            let lng = 77.6100 - i as f64 * 0.002;
            assert_eq!(responder.publish(position(lat, lng, 245.0), i).unwrap(), 1);

            requester.dispatch(&mut |env: &Envelope| {
                if let Message::DriverPosition(p) = &env.message {
                    mirror = Some(p.pos);
                }
            });
            assert_eq!(mirror, Some(Coordinate::new(lat, lng)));
        }
    }

    #[test]
    fn publisher_never_hears_itself() {
        let ch = Channel::reliable("c");
        let a = ch.attach(Role::Responder);
        let b = ch.attach(Role::Requester);
        a.publish(position(1.0, 1.0, 0.0), 0).unwrap();
        assert_eq!(a.pending(), 0);
        assert!(a.drain().is_empty());
        assert_eq!(b.pending(), 1);
    }

    #[test]
    fn messages_before_attach_are_lost() {
        let ch = Channel::reliable("c");
        let responder = ch.attach(Role::Responder);
        assert_eq!(responder.publish(position(1.0, 1.0, 0.0), 0).unwrap(), 0);
        let requester = ch.attach(Role::Requester);
        assert!(requester.drain().is_empty());
        responder.publish(position(2.0, 2.0, 0.0), 1).unwrap();
        assert_eq!(requester.drain().len(), 1);
    }

    #[test]
    fn single_sender_fifo() {
        let ch = Channel::reliable("c");
        let tx = ch.attach(Role::Responder);
        let rx = ch.attach(Role::Requester);
        for i in 0..20 {
            tx.publish(position(i as f64, 0.0, 0.0), i).unwrap();
        }
        let stamps: Vec<i64> = rx.drain().iter().map(|e| e.timestamp).collect();
        assert_eq!(stamps, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn envelope_carries_sender_role() {
        let ch = Channel::reliable("c");
        let tx = ch.attach(Role::Requester);
        let rx = ch.attach(Role::Responder);
        tx.publish(emergency(), 42).unwrap();
        let got = rx.drain();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].sender, Role::Requester);
        assert_eq!(got[0].message, emergency());
    }

    #[test]
    fn dropping_endpoint_detaches() {
        let ch = Channel::reliable("c");
        let tx = ch.attach(Role::Responder);
        {
            let _rx = ch.attach(Role::Requester);
            assert_eq!(ch.subscriber_count(), 2);
            assert_eq!(tx.peers(), vec![Role::Requester]);
        }
        assert_eq!(ch.subscriber_count(), 1);
        assert_eq!(tx.publish(position(0.0, 0.0, 0.0), 0).unwrap(), 0);
    }

    #[test]
    fn dispatch_counts_handled() {
        let ch = Channel::reliable("c");
        let tx = ch.attach(Role::Responder);
        let rx = ch.attach(Role::Requester);
        tx.publish(position(0.0, 0.0, 0.0), 0).unwrap();
        tx.publish(position(1.0, 0.0, 0.0), 1).unwrap();
        let mut kinds = Vec::new();
        let n = rx.dispatch(&mut |env: &Envelope| kinds.push(env.kind()));
        assert_eq!(n, 2);
        assert_eq!(kinds, vec![MessageKind::DriverPosition; 2]);
        assert_eq!(ch.stats().published, 2);
        assert_eq!(ch.stats().delivered, 2);
    }
}

// ── Faults ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod faults {
    use super::*;

    #[test]
    fn total_loss_drops_everything() {
        let ch = Channel::new("c", FaultPolicy::lossy(1.0, 0.0, 3));
        let tx = ch.attach(Role::Responder);
        let rx = ch.attach(Role::Requester);
        for i in 0..10 {
            assert_eq!(tx.publish(position(0.0, 0.0, 0.0), i).unwrap(), 0);
        }
        assert!(rx.drain().is_empty());
        assert_eq!(ch.stats().dropped, 10);
    }

    #[test]
    fn full_duplication_doubles_in_order() {
        let ch = Channel::new("c", FaultPolicy::lossy(0.0, 1.0, 3));
        let tx = ch.attach(Role::Responder);
        let rx = ch.attach(Role::Requester);
        for i in 0..3 {
            tx.publish(position(i as f64, 0.0, 0.0), i).unwrap();
        }
        let stamps: Vec<i64> = rx.drain().iter().map(|e| e.timestamp).collect();
        assert_eq!(stamps, vec![0, 0, 1, 1, 2, 2]);
    }

    #[test]
    fn lossy_channel_keeps_order_and_is_seeded() {
        let run = |seed| {
            let ch = Channel::new("c", FaultPolicy::lossy(0.3, 0.3, seed));
            let tx = ch.attach(Role::Responder);
            let rx = ch.attach(Role::Requester);
            for i in 0..200 {
                tx.publish(position(0.0, 0.0, 0.0), i).unwrap();
            }
            rx.drain().iter().map(|e| e.timestamp).collect::<Vec<_>>()
        };
        let a = run(11);
        assert!(a.windows(2).all(|w| w[0] <= w[1]));
        assert!(a.len() < 260 && a.len() > 100);
        assert_eq!(a, run(11));
    }

    #[test]
    fn reliable_policy_reports_reliable() {
        assert!(FaultPolicy::default().is_reliable());
        assert!(!FaultPolicy::lossy(0.1, 0.0, 0).is_reliable());
    }
}
