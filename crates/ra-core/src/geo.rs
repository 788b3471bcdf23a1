//! Geographic coordinate type and bearing utilities.
//!
//! `Coordinate` uses `f64` latitude/longitude.  Route hops are short (tens of
//! metres), so interpolation runs in plain lat/lng space; single precision
//! would visibly quantise the animated position at street zoom levels.

use crate::{CoreError, CoreResult};

/// A WGS-84 geographic coordinate in degrees.  No altitude.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    #[inline]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validating constructor for coordinates arriving from configuration or
    /// the wire: latitude must lie in `[-90, 90]`, longitude in `[-180, 180]`.
    pub fn try_new(lat: f64, lng: f64) -> CoreResult<Self> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(CoreError::InvalidCoordinate(format!("({lat}, {lng})")));
        }
        Ok(Self { lat, lng })
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: Coordinate) -> f64 {
        const R: f64 = 6_371_000.0; // mean Earth radius, metres

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lng * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        R * c
    }

    /// Planar linear interpolation towards `other` by `frac` (not clamped).
    ///
    /// Only valid over small angular spans, which holds for road-snapped hops.
    #[inline]
    pub fn lerp(self, other: Coordinate, frac: f64) -> Coordinate {
        Coordinate {
            lat: self.lat + (other.lat - self.lat) * frac,
            lng: self.lng + (other.lng - self.lng) * frac,
        }
    }

    /// Compass-style bearing towards `other`: `atan2(Δlng, Δlat)` in degrees,
    /// normalised to `[0, 360)`.
    ///
    /// Returns `None` when the two points coincide; the direction of a
    /// zero-length hop is undefined and callers hold their last heading.
    pub fn bearing_to(self, other: Coordinate) -> Option<f64> {
        let d_lat = other.lat - self.lat;
        let d_lng = other.lng - self.lng;
        if d_lat == 0.0 && d_lng == 0.0 {
            return None;
        }
        Some(normalize_degrees(d_lng.atan2(d_lat).to_degrees()))
    }

    /// `true` if `self` lies inside the axis-aligned box spanned by `a` and `b`
    /// (inclusive, with `eps` slack for float rounding).
    pub fn within_span(self, a: Coordinate, b: Coordinate, eps: f64) -> bool {
        let (lat_lo, lat_hi) = (a.lat.min(b.lat) - eps, a.lat.max(b.lat) + eps);
        let (lng_lo, lng_hi) = (a.lng.min(b.lng) - eps, a.lng.max(b.lng) + eps);
        (lat_lo..=lat_hi).contains(&self.lat) && (lng_lo..=lng_hi).contains(&self.lng)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Coordinate { lat, lng }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// Map any angle in degrees to `[0, 360)`.
#[inline]
pub fn normalize_degrees(deg: f64) -> f64 {
    let d = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if d >= 360.0 { 0.0 } else { d }
}

/// Signed shortest rotation from `from` to `to`, in `(-180, 180]` degrees.
#[inline]
pub fn angular_delta(from: f64, to: f64) -> f64 {
    let mut d = (to - from).rem_euclid(360.0);
    if d > 180.0 {
        d -= 360.0;
    }
    d
}
