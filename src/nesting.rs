//! Containment-based nesting resolution (§4.4): builds the pairwise
//! containment matrix, reduces it to direct parent/child edges, and
//! partitions rings into outer (even containment depth) and inner (odd).

use crate::geometry;
use crate::way_info::RingInfo;

/// Resolves `contained_by`/`inner_rings`/`nested` on every ring in place.
/// Returns, per ring index, whether it is an outer ring (even depth).
pub fn resolve_nesting(rings: &mut [RingInfo]) -> Vec<bool> {
    let n = rings.len();
    let mut contains = vec![vec![false; n]; n];
    let mut contained_by_even = vec![true; n];

    for i in 0..n {
        for j in 0..n {
            if i == j || contains[j][i] {
                continue;
            }
            let (outer, inner) = match (&rings[i].polygon, &rings[j].polygon) {
                (Some(o), Some(inn)) => (o, inn),
                _ => continue,
            };
            if geometry::polygon_contains_polygon(outer, inner) {
                contains[i][j] = true;
                contained_by_even[j] = !contained_by_even[j];
            }
        }
    }

    // Transitive reduction: drop contains[i][j] if some k has contains[i][k]
    // and contains[k][j], and flag j as nested (diagnostic only).
    for i in 0..n {
        for j in 0..n {
            if !contains[i][j] {
                continue;
            }
            for k in 0..n {
                if contains[i][k] && contains[k][j] {
                    contains[i][j] = false;
                    rings[j].nested = true;
                    break;
                }
            }
        }
    }

    for j in 0..n {
        if contained_by_even[j] {
            continue;
        }
        for i in 0..n {
            if contains[i][j] {
                rings[j].contained_by = Some(rings[i].ring_id);
                rings[i].inner_rings.push(rings[j].ring_id);
                break;
            }
        }
    }

    contained_by_even
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::way_info::{Direction, RingId};
    use geo::{LineString, Polygon};

    fn square_ring(id: usize, x: f64, y: f64, size: f64) -> RingInfo {
        let ring = LineString::new(vec![
            geo::Coord { x, y },
            geo::Coord { x: x + size, y },
            geo::Coord { x: x + size, y: y + size },
            geo::Coord { x, y: y + size },
            geo::Coord { x, y },
        ]);
        RingInfo {
            ring_id: RingId(id),
            polygon: Some(Polygon::new(ring, vec![])),
            direction: Direction::CounterClockwise,
            ways: vec![],
            contained_by: None,
            inner_rings: vec![],
            nested: false,
        }
    }

    #[test]
    fn island_in_lake_in_island_gets_three_levels() {
        let mut rings = vec![
            square_ring(0, 0.0, 0.0, 10.0),  // outer island
            square_ring(1, 2.0, 2.0, 6.0),   // lake (hole)
            square_ring(2, 4.0, 4.0, 2.0),   // island in the lake
        ];
        let even = resolve_nesting(&mut rings);
        assert!(even[0]); // depth 0: outer
        assert!(!even[1]); // depth 1: hole
        assert!(even[2]); // depth 2: new outer
        assert_eq!(rings[1].contained_by, Some(RingId(0)));
        assert_eq!(rings[2].contained_by, Some(RingId(1)));
    }

    #[test]
    fn disjoint_rings_have_no_containment() {
        let mut rings = vec![square_ring(0, 0.0, 0.0, 1.0), square_ring(1, 10.0, 10.0, 1.0)];
        let even = resolve_nesting(&mut rings);
        assert!(even[0] && even[1]);
        assert!(rings[0].contained_by.is_none());
        assert!(rings[1].contained_by.is_none());
    }
}
