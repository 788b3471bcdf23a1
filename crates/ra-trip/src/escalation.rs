//! `EscalationTimer` — time-gated visibility ladder for an unanswered request.
//!
//! # Ladder
//!
//! | elapsed (default) | phase               | side effect                        |
//! |-------------------|---------------------|------------------------------------|
//! | 0–19 s            | `Searching`         | none                               |
//! | 20 s              | `RadiusExpanded`    | search radius 3 km → 8 km          |
//! | 30 s              | `PartnersNotified`  | partners notified one by one, 2 s apart |
//! | 45 s              | `SatellitePriority` | maximum-visibility flag set        |
//!
//! The timer is driven by elapsed time only.  `advance(now)` emits every
//! threshold crossed since the last call, in order, so a coarse or late
//! caller still sees the full ladder.  `confirm` freezes it at `Confirmed`;
//! `cancel` stops it where it is.  A stopped timer never emits again.

/// Escalation step.  Ordered; a timer only ever moves forward.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum EscalationPhase {
    Searching,
    RadiusExpanded,
    PartnersNotified,
    SatellitePriority,
    Confirmed,
}

/// Thresholds and radii of the ladder.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct EscalationLadder {
    pub radius_expanded_ms: u64,
    pub partners_ms:        u64,
    pub satellite_ms:       u64,
    /// Delay between consecutive partner notifications.
    pub partner_gap_ms:     u64,
    pub initial_radius_km:  f64,
    pub expanded_radius_km: f64,
}

impl Default for EscalationLadder {
    fn default() -> Self {
        Self {
            radius_expanded_ms: 20_000,
            partners_ms:        30_000,
            satellite_ms:       45_000,
            partner_gap_ms:     2_000,
            initial_radius_km:  3.0,
            expanded_radius_km: 8.0,
        }
    }
}

/// Partner facilities notified at the `PartnersNotified` step.
pub fn default_partners() -> Vec<String> {
    ["City Care Hospital", "Apollo Clinic", "GreenLife Medical"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Something the ladder did.  `at_ms` is the scheduled threshold, measured
/// from the broadcast, not the time `advance` happened to be called.
#[derive(Clone, Debug, PartialEq)]
pub enum EscalationEvent {
    PhaseChanged { from: EscalationPhase, to: EscalationPhase, at_ms: u64 },
    RadiusWidened { radius_km: f64 },
    PartnerNotified { index: usize, name: String, at_ms: u64 },
    SatellitePriorityRaised,
}

enum Step {
    Phase(EscalationPhase),
    Partner(usize),
}

/// One timer per broadcast request.
#[derive(Debug)]
pub struct EscalationTimer {
    ladder:             EscalationLadder,
    partners:           Vec<String>,
    started_ms:         u64,
    phase:              EscalationPhase,
    radius_km:          f64,
    notified:           usize,
    satellite_priority: bool,
    running:            bool,
}

impl EscalationTimer {
    /// Arm a timer for a request broadcast at `now_ms`.
    pub fn new(ladder: EscalationLadder, partners: Vec<String>, now_ms: u64) -> Self {
        Self {
            radius_km: ladder.initial_radius_km,
            ladder,
            partners,
            started_ms: now_ms,
            phase: EscalationPhase::Searching,
            notified: 0,
            satellite_priority: false,
            running: true,
        }
    }

    pub fn phase(&self) -> EscalationPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Milliseconds since the broadcast, as of `now_ms`.
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.started_ms)
    }

    /// Currently advertised search radius.
    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    pub fn satellite_priority(&self) -> bool {
        self.satellite_priority
    }

    /// Partners notified so far, in notification order.
    pub fn notified_partners(&self) -> &[String] {
        &self.partners[..self.notified]
    }

    /// Emit everything due by `now_ms`, in threshold order.
    pub fn advance(&mut self, now_ms: u64) -> Vec<EscalationEvent> {
        let mut out = Vec::new();
        if !self.running {
            return out;
        }
        let elapsed = self.elapsed_ms(now_ms);

        while let Some((due, step)) = self.next_step() {
            if due > elapsed {
                break;
            }
            match step {
                Step::Phase(to) => self.enter(to, due, &mut out),
                Step::Partner(index) => {
                    self.notified += 1;
                    let name = self.partners[index].clone();
                    tracing::info!(partner = %name, at_ms = due, "partner notified");
                    out.push(EscalationEvent::PartnerNotified { index, name, at_ms: due });
                }
            }
        }
        out
    }

    /// Acceptance observed: freeze at `Confirmed`.  Pending partner
    /// notifications are dropped.  Returns the `PhaseChanged` event, or
    /// `None` if the timer had already stopped.
    pub fn confirm(&mut self, now_ms: u64) -> Option<EscalationEvent> {
        if !self.running {
            return None;
        }
        self.running = false;
        let from = self.phase;
        self.phase = EscalationPhase::Confirmed;
        let at_ms = self.elapsed_ms(now_ms);
        tracing::info!(?from, at_ms, "escalation confirmed");
        Some(EscalationEvent::PhaseChanged { from, to: EscalationPhase::Confirmed, at_ms })
    }

    /// Stop without confirming.  Returns whether the timer was running.
    pub fn cancel(&mut self) -> bool {
        std::mem::replace(&mut self.running, false)
    }

    /// The earliest pending step.  Phase thresholds win ties with partner
    /// notifications.
    fn next_step(&self) -> Option<(u64, Step)> {
        let l = &self.ladder;
        let phase = match self.phase {
            EscalationPhase::Searching => {
                Some((l.radius_expanded_ms, Step::Phase(EscalationPhase::RadiusExpanded)))
            }
            EscalationPhase::RadiusExpanded => {
                Some((l.partners_ms, Step::Phase(EscalationPhase::PartnersNotified)))
            }
            EscalationPhase::PartnersNotified => {
                Some((l.satellite_ms, Step::Phase(EscalationPhase::SatellitePriority)))
            }
            EscalationPhase::SatellitePriority | EscalationPhase::Confirmed => None,
        };
        let partner = (self.phase >= EscalationPhase::PartnersNotified
            && self.notified < self.partners.len())
        .then(|| (l.partners_ms + self.notified as u64 * l.partner_gap_ms, Step::Partner(self.notified)));

        match (phase, partner) {
            (Some(p), Some(q)) => Some(if q.0 < p.0 { q } else { p }),
            (p, q) => p.or(q),
        }
    }

    fn enter(&mut self, to: EscalationPhase, at_ms: u64, out: &mut Vec<EscalationEvent>) {
        let from = self.phase;
        self.phase = to;
        tracing::info!(?from, ?to, at_ms, "escalation phase");
        out.push(EscalationEvent::PhaseChanged { from, to, at_ms });
        match to {
            EscalationPhase::RadiusExpanded => {
                self.radius_km = self.ladder.expanded_radius_km;
                out.push(EscalationEvent::RadiusWidened { radius_km: self.radius_km });
            }
            EscalationPhase::SatellitePriority => {
                self.satellite_priority = true;
                out.push(EscalationEvent::SatellitePriorityRaised);
            }
            _ => {}
        }
    }
}
