//! `ra-route` — route geometry, routing lookup, and nearby-unit index.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`geometry`] | `RouteGeometry`, an immutable road-snapped polyline          |
//! | [`provider`] | `RouteProvider` trait, `RouteQuery`, `RouteLookup`, providers |
//! | [`fleet`]    | `Fleet`, an R-tree of nearby units                           |
//! | [`error`]    | `RouteError`, `RouteResult<T>`                               |
//!
//! # Routing is external
//!
//! Real geometries come from a third-party routing service.  The core only
//! consumes the capability through [`RouteProvider`]; the providers shipped
//! here replay fixed legs or lay out straight lines for demos and tests.
//! Road preferences are forwarded untouched and may be ignored.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on preference types.       |

pub mod error;
pub mod fleet;
pub mod geometry;
pub mod provider;


pub use error::{RouteError, RouteResult};
pub use fleet::{Fleet, FleetUnit};
pub use geometry::RouteGeometry;
pub use provider::{
    DirectRouteProvider, RouteLookup, RoutePreferences, RouteProvider, RouteQuery, RoutingMode,
    StaticLeg, StaticRouteProvider,
};
