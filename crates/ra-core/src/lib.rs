//! `ra-core` — foundational types for the `rapid_aid` dispatch core.
//!
//! This crate is a dependency of every other `ra-*` crate.  It intentionally
//! has no `ra-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`geo`]         | `Coordinate`, haversine distance, bearings, lerp      |
//! | [`ids`]         | `CycleId`, `TimerToken`, `EndpointId`, `RequestId`    |
//! | [`time`]        | `Tick`, `SimClock`                                    |
//! | [`rng`]         | `SimRng` (seeded, deterministic)                      |
//! | [`role`]        | `Role`, requester or responder                        |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//!           | Required by `ra-sync` for the wire codec.                  |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod role;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{Coordinate, angular_delta, normalize_degrees};
pub use ids::{CycleId, EndpointId, RequestId, TimerToken};
pub use rng::SimRng;
pub use role::Role;
pub use time::{SimClock, Tick};
