//! Secondary inner polygons (§4.7): a tagged inner ring built from exactly
//! one way, whose tags aren't already accounted for by the relation or its
//! enclosing outer way, is emitted as its own single-polygon multipolygon
//! through the caller's callback rather than being silently absorbed as a
//! hole.

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::geometry;
use crate::model::Tags;
use crate::tags::{same_tags, untagged};
use crate::way_info::{Direction, RingInfo, WayId, WayInfo};
use geo::Polygon;

/// A standalone polygon emitted for a tagged inner singleton.
pub struct SecondaryPolygon {
    pub geometry: Polygon<f64>,
    pub tags: Tags,
}

/// Decides, for one contained ring, whether it warrants a secondary
/// polygon, and emits it through `on_secondary` if so.
pub fn maybe_emit_secondary(
    ring: &RingInfo,
    ways: &[WayInfo],
    outer: &RingInfo,
    relation_tags: &Tags,
    on_secondary: &mut dyn FnMut(SecondaryPolygon),
    diagnostics: &dyn Diagnostics,
) {
    if ring.ways.len() != 1 {
        return;
    }
    let WayId(idx) = ring.ways[0];
    let Some(way) = ways[idx].way.as_ref() else { return };
    if untagged(&way.tags) {
        return;
    }

    if same_tags(&way.tags, relation_tags) {
        diagnostics.report(Diagnostic::RedundantInnerTags { way_id: way.id });
        return;
    }

    if outer.ways.len() == 1 {
        let WayId(outer_idx) = outer.ways[0];
        if let Some(outer_way) = ways[outer_idx].way.as_ref() {
            if same_tags(&outer_way.tags, &way.tags) {
                diagnostics.report(Diagnostic::RedundantInnerTags { way_id: way.id });
                return;
            }
        }
    }

    let Some(polygon) = &ring.polygon else { return };
    let exterior = if ring.direction == Direction::CounterClockwise {
        geometry::reverse_ring(polygon.exterior())
    } else {
        polygon.exterior().clone()
    };

    on_secondary(SecondaryPolygon {
        geometry: Polygon::new(exterior, vec![]),
        tags: way.tags.clone(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingDiagnostics;
    use crate::model::{MemberRole, Way};
    use crate::way_info::RingId;
    use geo::{Coord, LineString};
    use hashbrown::HashMap;

    fn tagged_way(id: i64, tags: &[(&str, &str)]) -> WayInfo {
        let coords = vec![
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 1.0, y: 0.0 },
            Coord { x: 1.0, y: 1.0 },
            Coord { x: 0.0, y: 0.0 },
        ];
        WayInfo::from_way(
            Way {
                id,
                coords,
                tags: tags.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
                timestamp: 0,
                first_node_id: 1,
                last_node_id: 1,
            },
            MemberRole::Inner,
        )
    }

    fn square_ring(id: usize) -> RingInfo {
        RingInfo {
            ring_id: RingId(id),
            polygon: Some(Polygon::new(
                LineString::new(vec![
                    Coord { x: 0.0, y: 0.0 },
                    Coord { x: 1.0, y: 0.0 },
                    Coord { x: 1.0, y: 1.0 },
                    Coord { x: 0.0, y: 0.0 },
                ]),
                vec![],
            )),
            direction: Direction::Clockwise,
            ways: vec![WayId(0)],
            contained_by: Some(RingId(1)),
            inner_rings: vec![],
            nested: false,
        }
    }

    #[test]
    fn emits_when_tags_differ_from_relation() {
        let ways = vec![tagged_way(1, &[("natural", "wetland")])];
        let ring = square_ring(0);
        let outer = RingInfo { ways: vec![], ..square_ring(1) };
        let relation_tags: Tags = HashMap::new();
        let sink = CollectingDiagnostics::new();
        let mut emitted = None;
        maybe_emit_secondary(&ring, &ways, &outer, &relation_tags, &mut |p| emitted = Some(p), &sink);
        assert!(emitted.is_some());
    }

    #[test]
    fn skips_when_tags_match_relation() {
        let mut relation_tags: Tags = HashMap::new();
        relation_tags.insert("natural".into(), "wetland".into());
        let ways = vec![tagged_way(1, &[("natural", "wetland")])];
        let ring = square_ring(0);
        let outer = RingInfo { ways: vec![], ..square_ring(1) };
        let sink = CollectingDiagnostics::new();
        let mut emitted: Option<SecondaryPolygon> = None;
        maybe_emit_secondary(&ring, &ways, &outer, &relation_tags, &mut |p| emitted = Some(p), &sink);
        assert!(emitted.is_none());
    }
}
