//! Arena-addressed working state for one assembly run. Replaces the source's
//! raw `WayInfo*`/`RingInfo*` graph with numeric indices into owned `Vec`s.

use crate::model::{MemberRole, Way};
use geo::{LineString, Polygon};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WayId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RingId(pub usize);

/// What a way is currently doing: sitting idle, permanently rejected as a
/// ring seed, or consumed into a specific ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsedBy {
    Available,
    Rejected,
    Ring(RingId),
}

#[derive(Debug, Clone)]
pub struct WayInfo {
    pub way_geom: LineString<f64>,
    pub first_node_id: i64,
    pub last_node_id: i64,
    pub used: UsedBy,
    /// Position within the owning ring's way list; meaningful only once
    /// `used` is `Ring(_)`.
    pub sequence: usize,
    /// Whether this way's coordinates are consumed in reverse.
    pub invert: bool,
    /// Scoped to a single ring-extension pass; reset before each pass.
    pub tried: bool,
    /// Advisory role as recorded on the relation member, fixed at construction.
    pub orig_innerouter: MemberRole,
    /// Role as resolved by geometric nesting; set once the way's ring is
    /// placed during final assembly.
    pub innerouter: MemberRole,
    /// Absent for synthesized gap-filler ways.
    pub way: Option<Way>,
}

impl WayInfo {
    pub fn from_way(way: Way, role: MemberRole) -> Self {
        let way_geom = LineString::new(way.coords.clone());
        WayInfo {
            way_geom,
            first_node_id: way.first_node_id,
            last_node_id: way.last_node_id,
            used: UsedBy::Available,
            sequence: 0,
            invert: false,
            tried: false,
            orig_innerouter: role,
            innerouter: role,
            way: Some(way),
        }
    }

    pub fn synthesized(first_node_id: i64, last_node_id: i64, geom: LineString<f64>) -> Self {
        WayInfo {
            way_geom: geom,
            first_node_id,
            last_node_id,
            used: UsedBy::Available,
            sequence: 0,
            invert: false,
            tried: false,
            orig_innerouter: MemberRole::Unset,
            innerouter: MemberRole::Unset,
            way: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

#[derive(Debug, Clone)]
pub struct RingInfo {
    pub ring_id: RingId,
    /// `None` once merged away by the inner-ring touch fixer or consumed
    /// into the final multipolygon.
    pub polygon: Option<Polygon<f64>>,
    pub direction: Direction,
    pub ways: Vec<WayId>,
    pub contained_by: Option<RingId>,
    pub inner_rings: Vec<RingId>,
    pub nested: bool,
}

impl RingInfo {
    pub fn exterior(&self) -> Option<&LineString<f64>> {
        self.polygon.as_ref().map(|p| p.exterior())
    }
}
