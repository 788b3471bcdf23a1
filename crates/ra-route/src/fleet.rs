//! Nearby units and nearest-available-unit lookup.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `[lat, lng]` to unit indices.  The requester
//! uses it to pick the unit most likely to be dispatched, so its optimistic
//! local animation starts from a plausible origin before any authoritative
//! position arrives.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use ra_core::Coordinate;

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// Entry stored in the R-tree: a 2-D `[lat, lng]` point and the unit's index
/// in `Fleet::units`.
#[derive(Clone)]
struct UnitEntry {
    point: [f64; 2],
    index: usize,
}

impl RTreeObject for UnitEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for UnitEntry {
    /// Squared Euclidean distance in lat/lng space.  Good enough to rank
    /// units within one city.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlng = self.point[1] - point[1];
        dlat * dlat + dlng * dlng
    }
}

// ── Fleet ─────────────────────────────────────────────────────────────────────

/// A vehicle parked or cruising near the requester.
#[derive(Debug, Clone, PartialEq)]
pub struct FleetUnit {
    pub label:     String,
    pub position:  Coordinate,
    pub available: bool,
}

/// Nearby units plus a spatial index over their positions.
///
/// Positions are fixed once the fleet is built; availability may change.
pub struct Fleet {
    units: Vec<FleetUnit>,
    tree:  RTree<UnitEntry>,
}

impl Fleet {
    /// Bulk-load the R-tree from `units`.
    pub fn new(units: Vec<FleetUnit>) -> Self {
        let entries = units
            .iter()
            .enumerate()
            .map(|(index, u)| UnitEntry { point: [u.position.lat, u.position.lng], index })
            .collect();
        Self { units, tree: RTree::bulk_load(entries) }
    }

    /// Units numbered `Unit #100`, `Unit #101`, … at `positions`, all available.
    pub fn numbered(positions: &[Coordinate]) -> Self {
        Self::new(
            positions
                .iter()
                .enumerate()
                .map(|(i, &position)| FleetUnit {
                    label: format!("Unit #{}", 100 + i),
                    position,
                    available: true,
                })
                .collect(),
        )
    }

    pub fn units(&self) -> &[FleetUnit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Mark unit `index` (un)available.  Returns `false` for an unknown index.
    pub fn set_available(&mut self, index: usize, available: bool) -> bool {
        match self.units.get_mut(index) {
            Some(u) => {
                u.available = available;
                true
            }
            None => false,
        }
    }

    /// The available unit closest to `point`, or `None` if none is available.
    pub fn nearest_available(&self, point: Coordinate) -> Option<&FleetUnit> {
        self.tree
            .nearest_neighbor_iter(&[point.lat, point.lng])
            .map(|e| &self.units[e.index])
            .find(|u| u.available)
    }

    /// Every available unit within `radius_m` of `point`, nearest first.
    pub fn available_within(&self, point: Coordinate, radius_m: f64) -> Vec<&FleetUnit> {
        self.tree
            .nearest_neighbor_iter(&[point.lat, point.lng])
            .map(|e| &self.units[e.index])
            .filter(|u| u.available && u.position.distance_m(point) <= radius_m)
            .collect()
    }
}
