//! Hand-snapped road legs around MG Road, Bengaluru.
//!
//! Stands in for a routing service: the two legs of the default scenario are
//! replayed exactly, anything else gets a straight-line route.

use ra_route::{
    DirectRouteProvider, RouteGeometry, RouteLookup, RouteProvider, RouteQuery, RouteResult,
    StaticRouteProvider,
};

/// Indiranagar side to the patient on MG Road.
const PICKUP_LEG: &[(f64, f64)] = &[
    (12.9850, 77.6100),
    (12.9800, 77.5990),
    (12.9716, 77.5946),
];

/// Patient to St. John's Hospital.
const HOSPITAL_LEG: &[(f64, f64)] = &[
    (12.9716, 77.5946),
    (12.9700, 77.5900),
    (12.9672, 77.5871),
    (12.9650, 77.5850),
];

/// Known legs first, straight line otherwise.
pub fn provider() -> RouteResult<impl Fn(&RouteQuery) -> RouteResult<RouteLookup> + Clone> {
    let known = StaticRouteProvider::new(30.0)
        .with_leg(RouteGeometry::from_pairs(PICKUP_LEG)?, Some(360.0))
        .with_leg(RouteGeometry::from_pairs(HOSPITAL_LEG)?, Some(240.0));
    let direct = DirectRouteProvider::default();
    Ok(move |q: &RouteQuery| known.lookup(q).or_else(|_| direct.lookup(q)))
}
