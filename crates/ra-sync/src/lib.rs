//! `ra-sync` — the only channel between requester and responder.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                      |
//! |---------------|---------------------------------------------------------------|
//! | [`message`]   | `Message` and its payloads, `MessageKind`                     |
//! | [`envelope`]  | `Envelope` (sender, timestamp, message) and the JSON codec    |
//! | [`channel`]   | `Channel`, `Endpoint`, `ChannelStats`                         |
//! | [`fault`]     | `FaultPolicy`: seeded loss and duplication                    |
//! | [`handler`]   | `MessageHandler` trait                                        |
//! | [`error`]     | `SyncError`, `SyncResult<T>`                                  |
//!
//! # Delivery model (summary)
//!
//! Every published envelope is encoded to a JSON frame and queued on each
//! *other* attached endpoint.  Receivers decode frames when they drain.
//!
//! * A publisher never receives its own message.
//! * Frames published before an endpoint attaches are never seen by it.
//! * One sender's frames arrive in publish order; frames from different
//!   senders interleave however the receivers' drain order falls.
//! * Loss and duplication come only from the channel's `FaultPolicy`.
//!
//! Handlers must therefore be idempotent: applying the latest position or
//! status any number of times converges to the same state.

pub mod channel;
pub mod envelope;
pub mod error;
pub mod fault;
pub mod handler;
pub mod message;

#[cfg(test)]
mod tests;

pub use channel::{Channel, ChannelStats, Endpoint};
pub use envelope::Envelope;
pub use error::{SyncError, SyncResult};
pub use fault::FaultPolicy;
pub use handler::MessageHandler;
pub use message::{
    DriverPosition, DriverStatus, DriverStatusUpdate, EmergencyRequest, Message, MessageKind,
    RequestAccepted, TripStatus, TripStatusUpdate,
};
