//! Plain, read-only input shapes. No PBF/XML decoding lives here; callers
//! populate these directly from whatever OSM source they use.

use geo::Coord;
use hashbrown::HashMap;

/// A geographic coordinate (longitude, latitude).
pub type Coordinate = Coord<f64>;

/// Arbitrary string-keyed tag set, as OSM attaches to ways and relations.
pub type Tags = HashMap<String, String>;

/// Advisory role of a relation member, as recorded in the source data.
/// Nesting is later determined by geometry (§4.4), not by this field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberRole {
    Inner,
    Outer,
    Unset,
}

/// One member way of a multipolygon relation.
#[derive(Debug, Clone)]
pub struct Way {
    pub id: i64,
    pub coords: Vec<Coordinate>,
    pub tags: Tags,
    pub timestamp: i64,
    /// OSM node id of the way's first coordinate.
    pub first_node_id: i64,
    /// OSM node id of the way's last coordinate.
    pub last_node_id: i64,
}

impl Way {
    pub fn is_closed(&self) -> bool {
        self.first_node_id == self.last_node_id
    }
}

/// A reference to a member way plus its advisory role within a relation.
#[derive(Debug, Clone, Copy)]
pub struct RelationMember {
    pub way_id: i64,
    pub role: MemberRole,
}

/// The multipolygon relation itself: tags, timestamp, and member references.
#[derive(Debug, Clone)]
pub struct Relation {
    pub id: i64,
    pub tags: Tags,
    pub timestamp: i64,
    pub members: Vec<RelationMember>,
}
