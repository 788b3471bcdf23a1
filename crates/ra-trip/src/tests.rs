//! Unit tests for ra-trip.

use crate::{
    CodeEntry, EscalationEvent, EscalationLadder, EscalationPhase, EscalationTimer,
    TransitionCause, TripError, TripEvent, TripPhase, TripStateMachine, VerificationCode,
    default_partners,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Drive a fresh machine to `ArrivedPickup`.
fn at_pickup() -> TripStateMachine {
    let mut m = TripStateMachine::new();
    for ev in [TripEvent::RequestReceived, TripEvent::Accept, TripEvent::PickupLegStarted, TripEvent::PickupReached] {
        m.apply(ev, 0).unwrap();
    }
    assert_eq!(m.phase(), TripPhase::ArrivedPickup);
    m
}

fn code() -> VerificationCode {
    VerificationCode::new("4029").unwrap()
}

fn phases(events: &[EscalationEvent]) -> Vec<(EscalationPhase, u64)> {
    events
        .iter()
        .filter_map(|e| match e {
            EscalationEvent::PhaseChanged { to, at_ms, .. } => Some((*to, *at_ms)),
            _ => None,
        })
        .collect()
}

// ── Transition table ──────────────────────────────────────────────────────────

#[cfg(test)]
mod transitions {
    use super::*;

    #[test]
    fn full_happy_path() {
        let mut m = at_pickup();
        let mut entry = CodeEntry::from("4029");
        m.enter_code(&code(), &mut entry, 10).unwrap();
        m.apply(TripEvent::DestinationLegStarted, 11).unwrap();
        m.apply(TripEvent::DestinationReached, 12).unwrap();
        assert_eq!(m.phase(), TripPhase::Completed);
        assert_eq!(m.history().len(), 7);
        assert!(m.overrides().next().is_none());
    }

    #[test]
    fn cannot_skip_to_onboard() {
        let mut m = TripStateMachine::new();
        m.apply(TripEvent::Accept, 0).unwrap();
        let err = m.override_verification(1).unwrap_err();
        assert_eq!(err, TripError::InvalidTransition { from: TripPhase::Accepted, event: TripEvent::Override });
        let mut entry = CodeEntry::from("4029");
        assert!(m.enter_code(&code(), &mut entry, 1).is_err());
        assert_eq!(m.phase(), TripPhase::Accepted);
        assert_eq!(m.history().len(), 1);
    }

    #[test]
    fn every_unlisted_pair_is_rejected() {
        use TripEvent as E;
        use TripPhase as P;
        let all_phases = [
            P::Idle, P::Requested, P::Accepted, P::EnRoutePickup, P::ArrivedPickup,
            P::Onboard, P::EnRouteDestination, P::Completed, P::Cancelled,
        ];
        let all_events = [
            E::RequestReceived, E::Accept, E::Decline, E::PickupLegStarted, E::PickupReached,
            E::VerifyCode, E::Override, E::DestinationLegStarted, E::DestinationReached,
            E::MarkComplete, E::Cancel, E::GoOffline, E::Reset,
        ];
        let mut allowed = 0;
        for p in all_phases {
            for e in all_events {
                if let Some(to) = e.target(p) {
                    allowed += 1;
                    if to == P::Onboard {
                        assert_eq!(p, P::ArrivedPickup);
                    }
                }
            }
        }
        // 13 forward/reset pairs plus cancel and go-offline from 5 phases.
        assert_eq!(allowed, 23);
    }

    #[test]
    fn cancel_only_before_onboard() {
        let mut m = at_pickup();
        m.override_verification(5).unwrap();
        assert!(m.apply(TripEvent::Cancel, 6).is_err());
        assert!(m.apply(TripEvent::GoOffline, 6).is_err());

        let mut m = TripStateMachine::new();
        m.apply(TripEvent::RequestReceived, 0).unwrap();
        m.apply(TripEvent::Accept, 1).unwrap();
        assert_eq!(m.apply(TripEvent::GoOffline, 2), Ok(TripPhase::Cancelled));
    }

    #[test]
    fn terminal_until_reset() {
        let mut m = TripStateMachine::new();
        m.apply(TripEvent::Cancel, 0).unwrap();
        assert!(m.apply(TripEvent::RequestReceived, 1).is_err());
        m.apply(TripEvent::Reset, 2).unwrap();
        assert_eq!(m.apply(TripEvent::RequestReceived, 3), Ok(TripPhase::Requested));
    }

    #[test]
    fn decline_returns_to_idle() {
        let mut m = TripStateMachine::new();
        m.apply(TripEvent::RequestReceived, 0).unwrap();
        assert_eq!(m.apply(TripEvent::Decline, 1), Ok(TripPhase::Idle));
        assert!(m.apply(TripEvent::Decline, 2).is_err());
    }

    #[test]
    fn mark_complete_only_en_route() {
        let mut m = at_pickup();
        assert!(m.apply(TripEvent::MarkComplete, 1).is_err());
        m.override_verification(2).unwrap();
        m.apply(TripEvent::DestinationLegStarted, 3).unwrap();
        assert_eq!(m.apply(TripEvent::MarkComplete, 4), Ok(TripPhase::Completed));
    }

    #[test]
    fn verify_event_not_accepted_through_apply() {
        let mut m = at_pickup();
        assert!(m.apply(TripEvent::VerifyCode, 1).is_err());
        assert_eq!(m.phase(), TripPhase::ArrivedPickup);
    }
}

// ── Verification ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod verification {
    use ra_core::SimRng;

    use super::*;

    #[test]
    fn exact_code_boards() {
        let mut m = at_pickup();
        let mut entry = CodeEntry::new();
        for c in "4029".chars() {
            entry.push(c);
        }
        assert_eq!(m.enter_code(&code(), &mut entry, 7), Ok(TripPhase::Onboard));
        assert!(entry.is_empty());
        let last = m.history().last().unwrap();
        assert_eq!(last.cause, TransitionCause::Verified);
        assert_eq!(last.at_ms, 7);
    }

    #[test]
    fn wrong_code_clears_entry_and_keeps_phase() {
        let expected = code();
        let mut m = at_pickup();
        for wrong in ["0000", "4028", "9204", "1234"] {
            let mut entry = CodeEntry::from(wrong);
            assert_eq!(m.enter_code(&expected, &mut entry, 1), Err(TripError::CodeMismatch));
            assert!(entry.is_empty());
            assert_eq!(m.phase(), TripPhase::ArrivedPickup);
        }
        assert_eq!(expected.as_str(), "4029");
        // The right code still works after failures.
        let mut entry = CodeEntry::from("4029");
        assert_eq!(m.enter_code(&expected, &mut entry, 2), Ok(TripPhase::Onboard));
    }

    #[test]
    fn partial_or_malformed_entry_rejected() {
        let mut m = at_pickup();
        for bad in ["402", "40290", "40a9", ""] {
            let mut entry = CodeEntry::from(bad);
            assert!(matches!(m.enter_code(&code(), &mut entry, 1), Err(TripError::MalformedCode(_))));
            assert!(entry.is_empty());
        }
        assert_eq!(m.phase(), TripPhase::ArrivedPickup);
    }

    #[test]
    fn wrong_phase_leaves_entry() {
        let mut m = TripStateMachine::new();
        let mut entry = CodeEntry::from("4029");
        assert!(m.enter_code(&code(), &mut entry, 0).is_err());
        assert_eq!(entry.as_str(), "4029");
    }

    #[test]
    fn override_is_audited() {
        let mut m = at_pickup();
        m.override_verification(99).unwrap();
        let overrides: Vec<_> = m.overrides().collect();
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides[0].from, TripPhase::ArrivedPickup);
        assert_eq!(overrides[0].to, TripPhase::Onboard);
        assert_eq!(overrides[0].at_ms, 99);
    }

    #[test]
    fn entry_ignores_non_digits() {
        let mut e = CodeEntry::new();
        assert!(!e.push('x'));
        assert!(e.push('4'));
        assert!(e.push('0'));
        assert_eq!(e.backspace(), Some('0'));
        assert_eq!(e.as_str(), "4");
    }

    #[test]
    fn code_construction() {
        assert!(VerificationCode::new("").is_err());
        assert!(VerificationCode::new("12a4").is_err());
        assert_eq!(format!("{:?}", code()), "VerificationCode(len=4)");

        let mut rng = SimRng::new(7);
        let c = VerificationCode::random(&mut rng, 4);
        assert_eq!(c.len(), 4);
        assert!(c.as_str().bytes().all(|b| b.is_ascii_digit()));
        let again = VerificationCode::random(&mut SimRng::new(7), 4);
        assert_eq!(c, again);
    }
}

// ── Escalation ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod escalation {
    use super::*;

    fn timer() -> EscalationTimer {
        EscalationTimer::new(EscalationLadder::default(), default_partners(), 0)
    }

    #[test]
    fn full_ladder_in_order_at_thresholds() {
        let mut t = timer();
        let mut seen = Vec::new();
        // Poll every 250 ms for 46 s.
        for ms in (0..=46_000).step_by(250) {
            seen.extend(t.advance(ms));
        }
        assert_eq!(
            phases(&seen),
            vec![
                (EscalationPhase::RadiusExpanded, 20_000),
                (EscalationPhase::PartnersNotified, 30_000),
                (EscalationPhase::SatellitePriority, 45_000),
            ]
        );
        let partners: Vec<(usize, u64)> = seen
            .iter()
            .filter_map(|e| match e {
                EscalationEvent::PartnerNotified { index, at_ms, .. } => Some((*index, *at_ms)),
                _ => None,
            })
            .collect();
        assert_eq!(partners, vec![(0, 30_000), (1, 32_000), (2, 34_000)]);
        assert_eq!(t.radius_km(), 8.0);
        assert!(t.satellite_priority());
        assert_eq!(t.notified_partners().len(), 3);
    }

    #[test]
    fn nothing_before_twenty_seconds() {
        let mut t = timer();
        assert!(t.advance(19_999).is_empty());
        assert_eq!(t.phase(), EscalationPhase::Searching);
        assert_eq!(t.radius_km(), 3.0);
    }

    #[test]
    fn time_jump_emits_everything_in_order() {
        let mut t = timer();
        let events = t.advance(60_000);
        let order: Vec<&str> = events
            .iter()
            .map(|e| match e {
                EscalationEvent::PhaseChanged { .. } => "phase",
                EscalationEvent::RadiusWidened { .. } => "radius",
                EscalationEvent::PartnerNotified { .. } => "partner",
                EscalationEvent::SatellitePriorityRaised => "satellite",
            })
            .collect();
        assert_eq!(
            order,
            vec!["phase", "radius", "phase", "partner", "partner", "partner", "phase", "satellite"]
        );
        assert!(t.advance(120_000).is_empty());
    }

    #[test]
    fn confirm_freezes_permanently() {
        let mut t = timer();
        t.advance(31_000);
        assert_eq!(t.phase(), EscalationPhase::PartnersNotified);
        let ev = t.confirm(31_500).unwrap();
        assert_eq!(
            ev,
            EscalationEvent::PhaseChanged {
                from:  EscalationPhase::PartnersNotified,
                to:    EscalationPhase::Confirmed,
                at_ms: 31_500,
            }
        );
        assert!(t.advance(90_000).is_empty());
        assert_eq!(t.phase(), EscalationPhase::Confirmed);
        assert!(!t.satellite_priority());
        // Partner 1 was still pending and is dropped.
        assert_eq!(t.notified_partners().len(), 1);
        assert!(t.confirm(95_000).is_none());
    }

    #[test]
    fn phase_never_decreases() {
        let mut t = timer();
        let mut last = t.phase();
        for ms in [5_000, 25_000, 21_000, 40_000, 10_000, 50_000] {
            t.advance(ms);
            assert!(t.phase() >= last);
            last = t.phase();
        }
        assert_eq!(last, EscalationPhase::SatellitePriority);
    }

    #[test]
    fn cancel_stops_without_confirming() {
        let mut t = timer();
        assert!(t.cancel());
        assert!(!t.cancel());
        assert!(t.advance(50_000).is_empty());
        assert_eq!(t.phase(), EscalationPhase::Searching);
        assert!(t.confirm(50_000).is_none());
    }

    #[test]
    fn thresholds_are_relative_to_broadcast() {
        let mut t = EscalationTimer::new(EscalationLadder::default(), vec![], 100_000);
        assert!(t.advance(119_000).is_empty());
        assert_eq!(phases(&t.advance(120_000)), vec![(EscalationPhase::RadiusExpanded, 20_000)]);
    }
}
