//! `DispatchConfig` — every tunable of a dispatch run in one serde struct.
//!
//! Loaded from JSON by the application; every field has a default, so a
//! partial file (or `{}`) is valid:
//!
//! ```json
//! { "tickMs": 40, "verificationCode": "4029",
//!   "faults": { "dropRate": 0.1, "duplicateRate": 0.05, "seed": 7 } }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use ra_core::{Coordinate, SimClock};
use ra_route::{RoutePreferences, RoutingMode};
use ra_sync::FaultPolicy;
use ra_trip::{EscalationLadder, VerificationCode, default_partners};

use crate::{DispatchError, DispatchResult};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DispatchConfig {
    // ── Time ────────────────────────────────────────────────────────────────
    /// Unix timestamp (ms) of tick 0; stamps outgoing messages.
    pub start_unix_ms:       i64,
    /// Simulated milliseconds per tick.
    pub tick_ms:             u32,
    /// Period of the requester's escalation check.
    pub escalation_check_ms: u64,
    /// Period of the animation frame timer on both sides.
    pub frame_ms:            u64,

    // ── Motion ──────────────────────────────────────────────────────────────
    /// Progress per frame of the requester's optimistic animation.
    pub requester_step:      f64,
    /// Progress per frame of the responder's navigation animation.
    pub responder_step:      f64,
    /// Drive legs from the routing duration estimate when one is returned.
    pub use_route_estimate:  bool,
    pub heading_alpha:       f64,
    /// Optional cap on heading rotation per frame, degrees.
    pub max_heading_step:    Option<f64>,

    // ── Places ──────────────────────────────────────────────────────────────
    pub patient:             Coordinate,
    pub responder_start:     Coordinate,
    pub hospital:            Coordinate,
    pub hospital_name:       String,
    /// Units shown around the requester; the nearest available one seeds the
    /// optimistic animation.
    pub nearby_units:        Vec<Coordinate>,

    // ── Request ─────────────────────────────────────────────────────────────
    pub address:             String,
    pub condition:           String,
    pub routing_mode:        RoutingMode,
    pub route_preferences:   RoutePreferences,

    // ── Responder ───────────────────────────────────────────────────────────
    pub driver_name:         String,
    pub vehicle:             String,
    pub verification_code:   String,

    // ── Escalation and channel ──────────────────────────────────────────────
    pub escalation:          EscalationLadder,
    pub partners:            Vec<String>,
    pub channel_name:        String,
    pub faults:              FaultPolicy,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            start_unix_ms:       1_700_000_000_000,
            tick_ms:             40,
            escalation_check_ms: 250,
            frame_ms:            40,

            requester_step:      0.0025,
            responder_step:      0.0005,
            use_route_estimate:  false,
            heading_alpha:       0.08,
            max_heading_step:    None,

            patient:             Coordinate::new(12.9716, 77.5946),
            responder_start:     Coordinate::new(12.9850, 77.6100),
            hospital:            Coordinate::new(12.9650, 77.5850),
            hospital_name:       "St. John's Hospital".into(),
            nearby_units:        vec![
                Coordinate::new(12.9750, 77.6000),
                Coordinate::new(12.9680, 77.5850),
                Coordinate::new(12.9800, 77.6150),
                Coordinate::new(12.9600, 77.6000),
            ],

            address:             "MG Road, Bengaluru".into(),
            condition:           "Medical emergency".into(),
            routing_mode:        RoutingMode::Intelligent,
            route_preferences:   RoutePreferences::emergency(),

            driver_name:         "Sarah Wilson".into(),
            vehicle:             "KA-01-MJ-2024".into(),
            verification_code:   "4029".into(),

            escalation:          EscalationLadder::default(),
            partners:            default_partners(),
            channel_name:        "rapid_aid_dispatch".into(),
            faults:              FaultPolicy::reliable(),
        }
    }
}

impl DispatchConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> DispatchResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> DispatchResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reject settings no run could use.
    pub fn validate(&self) -> DispatchResult<()> {
        if self.tick_ms == 0 {
            return Err(DispatchError::Config("tickMs must be positive".into()));
        }
        for (name, step) in [("requesterStep", self.requester_step), ("responderStep", self.responder_step)] {
            if !(step > 0.0 && step <= 1.0) {
                return Err(DispatchError::Config(format!("{name} must lie in (0, 1], got {step}")));
            }
        }
        if !(self.heading_alpha > 0.0 && self.heading_alpha <= 1.0) {
            return Err(DispatchError::Config(format!(
                "headingAlpha must lie in (0, 1], got {}",
                self.heading_alpha
            )));
        }
        for rate in [self.faults.drop_rate, self.faults.duplicate_rate] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(DispatchError::Config(format!("fault rate {rate} outside [0, 1]")));
            }
        }
        for c in [self.patient, self.responder_start, self.hospital] {
            Coordinate::try_new(c.lat, c.lng)?;
        }
        self.code()?;
        Ok(())
    }

    pub fn clock(&self) -> SimClock {
        SimClock::new(self.start_unix_ms, self.tick_ms)
    }

    /// The pickup verification code.
    pub fn code(&self) -> DispatchResult<VerificationCode> {
        Ok(VerificationCode::new(self.verification_code.clone())?)
    }
}
