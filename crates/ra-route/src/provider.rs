//! Routing lookup trait and the providers shipped with the core.
//!
//! # Pluggability
//!
//! Participants call routing via the [`RouteProvider`] trait, so applications
//! can plug in an HTTP-backed client without touching the core.  The two
//! providers here are deterministic and never touch the network:
//!
//! | Provider                | Behaviour                                            |
//! |-------------------------|------------------------------------------------------|
//! | [`StaticRouteProvider`] | Replays pre-snapped legs matched by their endpoints  |
//! | [`DirectRouteProvider`] | Evenly spaced waypoints on the straight line         |
//!
//! Any `Fn(&RouteQuery) -> RouteResult<RouteLookup>` closure is also a
//! provider, which keeps failure injection in tests to one line.

use std::sync::Arc;

use ra_core::Coordinate;

use crate::{RouteError, RouteGeometry, RouteResult};

// ── Query ─────────────────────────────────────────────────────────────────────

/// Routing profile requested by the caller.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum RoutingMode {
    #[default]
    Standard,
    /// Emergency-vehicle profile; carries the road preference flags.
    Intelligent,
}

/// Road preference flags forwarded to the routing collaborator.
///
/// The core never interprets these; a provider may honour or ignore them.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RoutePreferences {
    pub prefer_wide_roads:  bool,
    pub avoid_narrow_lanes: bool,
    pub avoid_school_zones: bool,
    pub avoid_market_areas: bool,
}

impl RoutePreferences {
    /// All four emergency preferences switched on.
    pub fn emergency() -> Self {
        Self {
            prefer_wide_roads:  true,
            avoid_narrow_lanes: true,
            avoid_school_zones: true,
            avoid_market_areas: true,
        }
    }

    /// Human-readable labels of the enabled flags, in a fixed order.
    pub fn labels(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.prefer_wide_roads  { out.push("wide roads prioritized"); }
        if self.avoid_narrow_lanes { out.push("narrow lanes avoided"); }
        if self.avoid_school_zones { out.push("school zones bypassed"); }
        if self.avoid_market_areas { out.push("market areas avoided"); }
        out
    }
}

/// One routing request.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RouteQuery {
    pub origin:      Coordinate,
    pub destination: Coordinate,
    pub mode:        RoutingMode,
    pub preferences: RoutePreferences,
}

impl RouteQuery {
    /// A standard-mode query with no preferences.
    pub fn new(origin: Coordinate, destination: Coordinate) -> Self {
        Self {
            origin,
            destination,
            mode:        RoutingMode::Standard,
            preferences: RoutePreferences::default(),
        }
    }

    pub fn with_mode(mut self, mode: RoutingMode, preferences: RoutePreferences) -> Self {
        self.mode = mode;
        self.preferences = preferences;
        self
    }
}

// ── Result ────────────────────────────────────────────────────────────────────

/// A successful lookup: the geometry plus optional service estimates.
#[derive(Debug, Clone)]
pub struct RouteLookup {
    pub geometry:      Arc<RouteGeometry>,
    /// Total driving time estimated by the service, in seconds.
    pub duration_secs: Option<f64>,
    /// Total driving distance estimated by the service, in metres.
    pub distance_m:    Option<f64>,
}

impl RouteLookup {
    /// A lookup with no service estimates.
    pub fn bare(geometry: RouteGeometry) -> Self {
        Self { geometry: Arc::new(geometry), duration_secs: None, distance_m: None }
    }

    /// Whole minutes of driving, rounded up.
    pub fn duration_minutes(&self) -> Option<u32> {
        self.duration_secs.map(|s| (s / 60.0).ceil().max(0.0) as u32)
    }

    /// Distance in kilometres, falling back to the geometry length.
    pub fn distance_km(&self) -> f64 {
        self.distance_m.unwrap_or_else(|| self.geometry.total_length_m()) / 1_000.0
    }
}

// ── Provider trait ────────────────────────────────────────────────────────────

/// Pluggable routing lookup.
///
/// Implementations must not block the caller's event loop for long; a slow
/// backend should answer from a cache or fail fast with
/// [`RouteError::Unavailable`] so the caller can retry later.
pub trait RouteProvider {
    /// Look up a road-snapped route for `query`.
    fn lookup(&self, query: &RouteQuery) -> RouteResult<RouteLookup>;
}

impl<F> RouteProvider for F
where
    F: Fn(&RouteQuery) -> RouteResult<RouteLookup>,
{
    fn lookup(&self, query: &RouteQuery) -> RouteResult<RouteLookup> {
        self(query)
    }
}

// ── StaticRouteProvider ───────────────────────────────────────────────────────

/// A pre-snapped leg known to a [`StaticRouteProvider`].
#[derive(Debug, Clone)]
pub struct StaticLeg {
    pub geometry:      Arc<RouteGeometry>,
    pub duration_secs: Option<f64>,
}

/// Replays fixed legs, matching a query when both its endpoints lie within
/// `tolerance_m` of a leg's first and last waypoint.
#[derive(Debug, Clone, Default)]
pub struct StaticRouteProvider {
    legs:        Vec<StaticLeg>,
    tolerance_m: f64,
}

impl StaticRouteProvider {
    pub fn new(tolerance_m: f64) -> Self {
        Self { legs: Vec::new(), tolerance_m }
    }

    /// Register a leg.  Later legs do not shadow earlier ones; the first
    /// match wins.
    pub fn with_leg(mut self, geometry: RouteGeometry, duration_secs: Option<f64>) -> Self {
        self.legs.push(StaticLeg { geometry: Arc::new(geometry), duration_secs });
        self
    }

    pub fn leg_count(&self) -> usize {
        self.legs.len()
    }
}

impl RouteProvider for StaticRouteProvider {
    fn lookup(&self, query: &RouteQuery) -> RouteResult<RouteLookup> {
        self.legs
            .iter()
            .find(|leg| {
                leg.geometry.origin().distance_m(query.origin) <= self.tolerance_m
                    && leg.geometry.destination().distance_m(query.destination) <= self.tolerance_m
            })
            .map(|leg| RouteLookup {
                geometry:      Arc::clone(&leg.geometry),
                duration_secs: leg.duration_secs,
                distance_m:    Some(leg.geometry.total_length_m()),
            })
            .ok_or(RouteError::NoRoute { from: query.origin, to: query.destination })
    }
}

// ── DirectRouteProvider ───────────────────────────────────────────────────────

/// Lays `hops` evenly spaced segments on the straight line between the query
/// endpoints and estimates duration from a constant `speed_mps`.
///
/// Not a router: it stands in for one in demos and tests.
#[derive(Debug, Clone, Copy)]
pub struct DirectRouteProvider {
    pub hops:      usize,
    pub speed_mps: f64,
}

impl Default for DirectRouteProvider {
    /// 20 hops at ~30 km/h.
    fn default() -> Self {
        Self { hops: 20, speed_mps: 8.3 }
    }
}

impl RouteProvider for DirectRouteProvider {
    fn lookup(&self, query: &RouteQuery) -> RouteResult<RouteLookup> {
        let hops = self.hops.max(1);
        let points = (0..=hops)
            .map(|i| query.origin.lerp(query.destination, i as f64 / hops as f64))
            .collect();
        let geometry = RouteGeometry::new(points)?;
        let distance = geometry.total_length_m();
        let duration = (self.speed_mps > 0.0).then(|| distance / self.speed_mps);
        Ok(RouteLookup {
            geometry:      Arc::new(geometry),
            duration_secs: duration,
            distance_m:    Some(distance),
        })
    }
}
