//! `ra-trip` — discrete trip state owned by the responder.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`phase`]       | `TripPhase`, `TripEvent`, the transition table             |
//! | [`machine`]     | `TripStateMachine`, `TransitionRecord`, `TransitionCause`  |
//! | [`verify`]      | `VerificationCode`, `CodeEntry`                            |
//! | [`escalation`]  | `EscalationPhase`, `EscalationLadder`, `EscalationTimer`   |
//! | [`error`]       | `TripError`, `TripResult<T>`                               |
//!
//! # Lifecycle (summary)
//!
//! ```text
//! Idle → Requested → Accepted → EnRoutePickup → ArrivedPickup
//!      → Onboard (code match, or audited override)
//!      → EnRouteDestination → Completed
//! ```
//!
//! Any phase before `Onboard` may be cancelled.  `Completed` and `Cancelled`
//! are terminal until an explicit `Reset` returns the machine to `Idle`.

pub mod error;
pub mod escalation;
pub mod machine;
pub mod phase;
pub mod verify;

#[cfg(test)]
mod tests;

pub use error::{TripError, TripResult};
pub use escalation::{EscalationEvent, EscalationLadder, EscalationPhase, EscalationTimer, default_partners};
pub use machine::{TransitionCause, TransitionRecord, TripStateMachine};
pub use phase::{TripEvent, TripPhase};
pub use verify::{CodeEntry, VerificationCode};
