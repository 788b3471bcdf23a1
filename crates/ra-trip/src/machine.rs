//! `TripStateMachine` — the responder's authoritative trip phase.

use crate::{CodeEntry, TripError, TripEvent, TripPhase, TripResult, VerificationCode};

/// How an accepted transition came about.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum TransitionCause {
    Normal,
    /// Pickup code matched.
    Verified,
    /// Verification was bypassed by the operator.
    Override,
}

/// One line of the audit log.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct TransitionRecord {
    pub from:  TripPhase,
    pub to:    TripPhase,
    pub event: TripEvent,
    pub cause: TransitionCause,
    pub at_ms: u64,
}

/// Trip phase plus a full audit log of every accepted transition.
///
/// Rejected events leave both the phase and the log untouched.
#[derive(Debug, Default)]
pub struct TripStateMachine {
    phase: TripPhase,
    log:   Vec<TransitionRecord>,
}

impl TripStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn phase(&self) -> TripPhase {
        self.phase
    }

    /// Apply `event` at simulated time `at_ms`.
    ///
    /// `VerifyCode` is only reachable through [`enter_code`][Self::enter_code];
    /// passing it here is rejected as an invalid transition.
    pub fn apply(&mut self, event: TripEvent, at_ms: u64) -> TripResult<TripPhase> {
        if event == TripEvent::VerifyCode {
            return Err(TripError::InvalidTransition { from: self.phase, event });
        }
        let cause = match event {
            TripEvent::Override => TransitionCause::Override,
            _ => TransitionCause::Normal,
        };
        self.transition(event, cause, at_ms)
    }

    /// Check `entry` against `expected` and, on an exact match, move
    /// `ArrivedPickup → Onboard`.
    ///
    /// The entry is cleared after every attempt made in `ArrivedPickup`,
    /// successful or not.  `expected` is never touched.
    pub fn enter_code(
        &mut self,
        expected: &VerificationCode,
        entry:    &mut CodeEntry,
        at_ms:    u64,
    ) -> TripResult<TripPhase> {
        if self.phase != TripPhase::ArrivedPickup {
            return Err(TripError::InvalidTransition { from: self.phase, event: TripEvent::VerifyCode });
        }
        let verdict = expected.check(entry.as_str());
        entry.clear();
        match verdict? {
            true => self.transition(TripEvent::VerifyCode, TransitionCause::Verified, at_ms),
            false => {
                tracing::info!("pickup code rejected");
                Err(TripError::CodeMismatch)
            }
        }
    }

    /// Elevated-trust bypass: `ArrivedPickup → Onboard` without a code.
    pub fn override_verification(&mut self, at_ms: u64) -> TripResult<TripPhase> {
        self.apply(TripEvent::Override, at_ms)
    }

    /// Every accepted transition, oldest first.
    pub fn history(&self) -> &[TransitionRecord] {
        &self.log
    }

    /// Transitions made through the verification bypass.
    pub fn overrides(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.log.iter().filter(|r| r.cause == TransitionCause::Override)
    }

    fn transition(
        &mut self,
        event: TripEvent,
        cause: TransitionCause,
        at_ms: u64,
    ) -> TripResult<TripPhase> {
        let from = self.phase;
        let to = event
            .target(from)
            .ok_or(TripError::InvalidTransition { from, event })?;

        self.phase = to;
        self.log.push(TransitionRecord { from, to, event, cause, at_ms });

        if cause == TransitionCause::Override {
            tracing::warn!(%from, %to, at_ms, "verification overridden");
        } else {
            tracing::debug!(%from, %to, ?event, at_ms, "trip transition");
        }
        Ok(to)
    }
}
