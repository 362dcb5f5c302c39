//! Inner-ring touch fixer (§4.5): when two sibling inner rings of the same
//! outer ring share a boundary arc (rather than merely crossing), merge them
//! into one via symmetric difference + re-stitching.

use crate::geometry;
use crate::way_info::{Direction, RingId, RingInfo};
use geo::Polygon;

/// Repeatedly scans `outer_ring_id`'s direct inner rings for a touching pair
/// and merges them, restarting the scan after every successful merge (the
/// "`j = -1`" restart in §4.5) since a merge can create a new touch with a
/// ring that was already checked.
pub fn fix_inner_ring_touches(rings: &mut [RingInfo], outer_ring_id: RingId) {
    loop {
        let inner_ids: Vec<RingId> = rings[outer_ring_id.0].inner_rings.clone();
        let mut merged = false;

        'pairs: for a in 0..inner_ids.len() {
            for b in (a + 1)..inner_ids.len() {
                let (ia, ib) = (inner_ids[a].0, inner_ids[b].0);
                let (ext_a, ext_b) = match (rings[ia].exterior(), rings[ib].exterior()) {
                    (Some(x), Some(y)) => (x.clone(), y.clone()),
                    _ => continue,
                };
                if !geometry::rings_exteriors_intersect(&ext_a, &ext_b) {
                    continue;
                }
                if let Some(combined) = geometry::symmetric_difference_single_ring(&ext_a, &ext_b) {
                    let direction = match geometry::orientation(&combined) {
                        geometry::Orientation::Clockwise => Direction::Clockwise,
                        geometry::Orientation::CounterClockwise => Direction::CounterClockwise,
                    };
                    rings[ia].polygon = Some(Polygon::new(combined, vec![]));
                    rings[ia].direction = direction;
                    rings[ib].polygon = None;
                    merged = true;
                    break 'pairs;
                }
                // Intersections that aren't a clean single-ring symmetric
                // difference are left alone; later validity checks catch
                // whatever ill-formed data caused them.
            }
        }

        if !merged {
            break;
        }
        rings[outer_ring_id.0]
            .inner_rings
            .retain(|rid| rings[rid.0].polygon.is_some());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::way_info::Direction;
    use geo::{Coord, LineString};

    fn ring(id: usize, coords: Vec<Coord<f64>>, parent: Option<RingId>) -> RingInfo {
        RingInfo {
            ring_id: RingId(id),
            polygon: Some(Polygon::new(LineString::new(coords), vec![])),
            direction: Direction::CounterClockwise,
            ways: vec![],
            contained_by: parent,
            inner_rings: vec![],
            nested: false,
        }
    }

    fn coord(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    #[test]
    fn merges_two_inner_rings_sharing_an_edge() {
        // Two unit squares sharing the edge x=1, forming a 2x1 rectangle.
        let left = vec![coord(0.0, 0.0), coord(1.0, 0.0), coord(1.0, 1.0), coord(0.0, 1.0), coord(0.0, 0.0)];
        let right = vec![coord(1.0, 0.0), coord(2.0, 0.0), coord(2.0, 1.0), coord(1.0, 1.0), coord(1.0, 0.0)];

        let outer = ring(0, vec![coord(-5.0, -5.0), coord(5.0, -5.0), coord(5.0, 5.0), coord(-5.0, 5.0), coord(-5.0, -5.0)], None);
        let mut rings = vec![outer, ring(1, left, Some(RingId(0))), ring(2, right, Some(RingId(0)))];
        rings[0].inner_rings = vec![RingId(1), RingId(2)];

        fix_inner_ring_touches(&mut rings, RingId(0));

        assert_eq!(rings[0].inner_rings, vec![RingId(1)]);
        assert!(rings[2].polygon.is_none());
        assert!(rings[1].polygon.is_some());
    }

    #[test]
    fn leaves_disjoint_inner_rings_alone() {
        let a = vec![coord(0.0, 0.0), coord(1.0, 0.0), coord(1.0, 1.0), coord(0.0, 1.0), coord(0.0, 0.0)];
        let b = vec![coord(3.0, 3.0), coord(4.0, 3.0), coord(4.0, 4.0), coord(3.0, 4.0), coord(3.0, 3.0)];
        let outer = ring(0, vec![coord(-5.0, -5.0), coord(5.0, -5.0), coord(5.0, 5.0), coord(-5.0, 5.0), coord(-5.0, -5.0)], None);
        let mut rings = vec![outer, ring(1, a, Some(RingId(0))), ring(2, b, Some(RingId(0)))];
        rings[0].inner_rings = vec![RingId(1), RingId(2)];

        fix_inner_ring_touches(&mut rings, RingId(0));
        assert_eq!(rings[0].inner_rings, vec![RingId(1), RingId(2)]);
    }
}
