//! Immutable road-snapped route geometry.

use ra_core::Coordinate;

use crate::{RouteError, RouteResult};

/// An ordered, non-empty sequence of road-snapped waypoints from an origin to
/// a destination.
///
/// Consecutive points are assumed close enough that straight-line
/// interpolation approximates the road surface.  That is a contract of the
/// routing collaborator and is never validated here.
///
/// A geometry is immutable once built.  Owners share it behind an `Arc`; a
/// new navigation leg always gets a new geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteGeometry {
    points: Vec<Coordinate>,
}

impl RouteGeometry {
    /// Build a geometry, rejecting an empty waypoint list.
    pub fn new(points: Vec<Coordinate>) -> RouteResult<Self> {
        if points.is_empty() {
            return Err(RouteError::EmptyGeometry);
        }
        Ok(Self { points })
    }

    /// Convenience constructor from `(lat, lng)` pairs.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> RouteResult<Self> {
        Self::new(pairs.iter().copied().map(Coordinate::from).collect())
    }

    #[inline]
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// Number of waypoints (always ≥ 1).
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// A single-point route: the vehicle is already where it needs to be.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.points.len() == 1
    }

    /// Number of straight segments (`len − 1`, zero for a degenerate route).
    #[inline]
    pub fn segment_count(&self) -> usize {
        self.points.len() - 1
    }

    #[inline]
    pub fn origin(&self) -> Coordinate {
        self.points[0]
    }

    #[inline]
    pub fn destination(&self) -> Coordinate {
        self.points[self.points.len() - 1]
    }

    /// Endpoints of segment `idx`, clamped so the end index never leaves the
    /// route.  For a degenerate route both endpoints are the single point.
    #[inline]
    pub fn segment(&self, idx: usize) -> (Coordinate, Coordinate) {
        let last = self.points.len() - 1;
        let a = idx.min(last);
        let b = (a + 1).min(last);
        (self.points[a], self.points[b])
    }

    /// Bearing of segment `idx`, or `None` for a zero-length segment.
    pub fn segment_bearing(&self, idx: usize) -> Option<f64> {
        let (a, b) = self.segment(idx);
        a.bearing_to(b)
    }

    /// Sum of haversine lengths of all segments, in metres.
    pub fn total_length_m(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| w[0].distance_m(w[1]))
            .sum()
    }

    /// The part of the route not yet driven: `position` (the current
    /// interpolated point on segment `segment`) followed by every waypoint
    /// after that segment's start.
    ///
    /// Renderers draw this so the route line starts exactly at the vehicle.
    pub fn remaining_path(&self, position: Coordinate, segment: usize) -> Vec<Coordinate> {
        let from = (segment + 1).min(self.points.len());
        let mut path = Vec::with_capacity(self.points.len() - from + 1);
        path.push(position);
        path.extend_from_slice(&self.points[from..]);
        path
    }

    /// Length of [`remaining_path`][Self::remaining_path] in metres.
    pub fn remaining_length_m(&self, position: Coordinate, segment: usize) -> f64 {
        self.remaining_path(position, segment)
            .windows(2)
            .map(|w| w[0].distance_m(w[1]))
            .sum()
    }
}
