//! `ra-sim` — the two dispatch participants and the runner that drives them.
//!
//! # Modules
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | `config`    | `DispatchConfig`, JSON loading and validation                |
//! | `requester` | `Requester`: broadcasts requests, mirrors the trip           |
//! | `responder` | `Responder`: owns the trip machine and drives navigation     |
//! | `dispatch`  | `Dispatch`: tick loop over both processes                    |
//! | `builder`   | `DispatchBuilder`                                            |
//! | `events`    | `ProcessEvent`, the only outward effect of a process         |
//! | `observer`  | `DispatchObserver`, `NoopObserver`, `EventLog`               |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ra_sim::{DispatchBuilder, DispatchConfig, NoopObserver};
//!
//! let mut dispatch = DispatchBuilder::new(DispatchConfig::default()).build()?;
//! dispatch.requester.request_help(dispatch.now())?;
//! dispatch.step(&mut NoopObserver)?;
//! dispatch.responder.accept_request(dispatch.now())?;
//! dispatch.run_ticks(2_500, &mut NoopObserver)?;
//! ```

pub mod builder;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod observer;
pub mod requester;
pub mod responder;


pub use builder::DispatchBuilder;
pub use config::DispatchConfig;
pub use dispatch::Dispatch;
pub use error::{DispatchError, DispatchResult};
pub use events::{Leg, ProcessEvent, VehicleView};
pub use observer::{DispatchObserver, EventLog, NoopObserver};
pub use requester::{Assignment, RequestStatus, Requester};
pub use responder::Responder;
