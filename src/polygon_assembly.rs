//! Polygon/MultiPolygon assembly (§4.6): orients rings, builds polygons
//! with holes, and validates the final multipolygon.

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::AssemblyError;
use crate::geometry;
use crate::model::{MemberRole, Tags};
use crate::tags::reconcile_way_tags;
use crate::way_info::{Direction, RingInfo, WayId, WayInfo};
use geo::{MultiPolygon, Polygon};

fn oriented(ring: &geo::LineString<f64>, want: Direction) -> geo::LineString<f64> {
    let have = match geometry::orientation(ring) {
        geometry::Orientation::Clockwise => Direction::Clockwise,
        geometry::Orientation::CounterClockwise => Direction::CounterClockwise,
    };
    if have == want {
        ring.clone()
    } else {
        geometry::reverse_ring(ring)
    }
}

/// Builds one polygon for an outer ring plus its surviving inner rings,
/// orienting the exterior counter-clockwise and every hole clockwise.
fn build_one_polygon(outer: &RingInfo, rings: &[RingInfo]) -> Option<Polygon<f64>> {
    let exterior_src = outer.polygon.as_ref()?.exterior().clone();
    let exterior = oriented(&exterior_src, Direction::CounterClockwise);

    let holes: Vec<_> = outer
        .inner_rings
        .iter()
        .filter_map(|rid| rings[rid.0].exterior())
        .map(|ring| oriented(ring, Direction::Clockwise))
        .collect();

    Some(Polygon::new(exterior, holes))
}

/// Applies the §4.9 tag-promotion policy for every way making up an outer
/// ring, then builds and validates the final multipolygon.
pub fn assemble_multipolygon(
    outer_ring_indices: &[usize],
    rings: &[RingInfo],
    ways: &mut [WayInfo],
    relation_tags: &mut Tags,
    diagnostics: &dyn Diagnostics,
) -> Result<MultiPolygon<f64>, AssemblyError> {
    let mut polygons = Vec::with_capacity(outer_ring_indices.len());

    for &outer_idx in outer_ring_indices {
        let outer = &rings[outer_idx];
        for &WayId(way_idx) in &outer.ways {
            let way_info = &mut ways[way_idx];
            if let Some(way) = way_info.way.as_ref() {
                if way_info.orig_innerouter == MemberRole::Inner {
                    diagnostics.report(Diagnostic::RoleMismatch { way_id: way.id });
                }
                reconcile_way_tags(relation_tags, &way.tags, diagnostics);
            }
            way_info.innerouter = MemberRole::Outer;
        }

        let polygon = build_one_polygon(outer, rings).ok_or(AssemblyError::InvalidRing)?;
        if !geometry::is_valid_polygon(&polygon) {
            return Err(AssemblyError::InvalidRing);
        }
        polygons.push(polygon);
    }

    let multipolygon = MultiPolygon::new(polygons);
    if !geometry::is_valid_multipolygon(&multipolygon) {
        return Err(AssemblyError::InvalidMultipolygon);
    }
    Ok(multipolygon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingDiagnostics;
    use crate::way_info::RingId;
    use geo::{Coord, LineString};
    use hashbrown::HashMap;

    fn square(id: usize, x: f64, y: f64, size: f64, dir: Direction) -> RingInfo {
        let mut coords = vec![
            Coord { x, y },
            Coord { x: x + size, y },
            Coord { x: x + size, y: y + size },
            Coord { x, y: y + size },
            Coord { x, y },
        ];
        if dir == Direction::Clockwise {
            coords.reverse();
        }
        RingInfo {
            ring_id: RingId(id),
            polygon: Some(Polygon::new(LineString::new(coords), vec![])),
            direction: dir,
            ways: vec![],
            contained_by: None,
            inner_rings: vec![],
            nested: false,
        }
    }

    #[test]
    fn builds_valid_multipolygon_with_a_hole() {
        let mut outer = square(0, 0.0, 0.0, 10.0, Direction::CounterClockwise);
        let hole = square(1, 2.0, 2.0, 2.0, Direction::CounterClockwise);
        outer.inner_rings = vec![RingId(1)];
        let rings = vec![outer, hole];
        let mut ways: Vec<WayInfo> = vec![];
        let mut relation_tags: Tags = HashMap::new();
        let sink = CollectingDiagnostics::new();

        let mp = assemble_multipolygon(&[0], &rings, &mut ways, &mut relation_tags, &sink).unwrap();
        assert_eq!(mp.0.len(), 1);
        assert_eq!(mp.0[0].interiors().len(), 1);
    }
}
