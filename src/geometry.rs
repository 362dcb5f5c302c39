//! Thin shim over `geo`, exposing exactly the operations the assembly
//! pipeline needs. Kept separate so the rest of the crate never has to know
//! which geometry kernel is underneath it.

use geo::algorithm::area::Area;
use geo::algorithm::contains::Contains;
use geo::algorithm::euclidean_distance::EuclideanDistance;
use geo::algorithm::intersects::Intersects;
use geo::{Coord, LineString, MultiPolygon, Point, Polygon};
use hashbrown::HashMap;

const EPS: f64 = 1e-9;

/// Orientation of a closed ring's coordinate sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Clockwise,
    CounterClockwise,
}

/// Shoelace-formula winding test. Grounded on the same formula used to decide
/// GeoJSON winding conventions: positive signed area is counter-clockwise.
pub fn orientation(ring: &LineString<f64>) -> Orientation {
    let mut sum = 0.0;
    let coords = &ring.0;
    for i in 0..coords.len().saturating_sub(1) {
        let p1 = coords[i];
        let p2 = coords[i + 1];
        sum += (p2.x - p1.x) * (p2.y + p1.y);
    }
    if sum < 0.0 {
        Orientation::CounterClockwise
    } else {
        Orientation::Clockwise
    }
}

/// Reverses a ring's coordinate order in place, flipping its orientation.
pub fn reverse_ring(ring: &LineString<f64>) -> LineString<f64> {
    let mut coords = ring.0.clone();
    coords.reverse();
    LineString::new(coords)
}

fn orient2d(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn on_segment(a: Coord<f64>, b: Coord<f64>, p: Coord<f64>) -> bool {
    p.x >= a.x.min(b.x) - EPS
        && p.x <= a.x.max(b.x) + EPS
        && p.y >= a.y.min(b.y) - EPS
        && p.y <= a.y.max(b.y) + EPS
}

fn segments_intersect(p1: Coord<f64>, p2: Coord<f64>, p3: Coord<f64>, p4: Coord<f64>) -> bool {
    let d1 = orient2d(p3, p4, p1);
    let d2 = orient2d(p3, p4, p2);
    let d3 = orient2d(p1, p2, p3);
    let d4 = orient2d(p1, p2, p4);

    if ((d1 > 0.0) != (d2 > 0.0)) && d1.abs() > EPS && d2.abs() > EPS
        && ((d3 > 0.0) != (d4 > 0.0)) && d3.abs() > EPS && d4.abs() > EPS
    {
        return true;
    }
    if d1.abs() <= EPS && on_segment(p3, p4, p1) {
        return true;
    }
    if d2.abs() <= EPS && on_segment(p3, p4, p2) {
        return true;
    }
    if d3.abs() <= EPS && on_segment(p1, p2, p3) {
        return true;
    }
    if d4.abs() <= EPS && on_segment(p1, p2, p4) {
        return true;
    }
    false
}

/// True if two collinear-overlapping adjacent segments extend past their
/// single shared endpoint (a degenerate "spike" that isn't really simple).
fn adjacent_segments_overlap(p1: Coord<f64>, p2: Coord<f64>, p3: Coord<f64>, p4: Coord<f64>) -> bool {
    let collinear = orient2d(p1, p2, p3).abs() <= EPS && orient2d(p1, p2, p4).abs() <= EPS;
    if !collinear {
        return false;
    }
    on_segment(p1, p2, p3) || on_segment(p1, p2, p4) || on_segment(p3, p4, p1) || on_segment(p3, p4, p2)
}

/// Self-intersection test for a closed ring's coordinate sequence. `geo`'s own
/// `LineString::is_valid` only checks length and finiteness, not crossings, so
/// this is implemented by hand: a pairwise test over all non-adjacent segment
/// pairs, with adjacent pairs (which legitimately share one endpoint) checked
/// only for collinear overlap beyond that shared point.
pub fn is_simple_ring(ring: &LineString<f64>) -> bool {
    let coords = &ring.0;
    let n = coords.len();
    if n < 4 {
        return false;
    }
    let seg_count = n - 1; // last coordinate duplicates the first
    for i in 0..seg_count {
        let (a1, a2) = (coords[i], coords[i + 1]);
        for j in (i + 1)..seg_count {
            let (b1, b2) = (coords[j], coords[j + 1]);
            let adjacent = j == i + 1 || (i == 0 && j == seg_count - 1);
            if adjacent {
                if adjacent_segments_overlap(a1, a2, b1, b2) {
                    return false;
                }
                continue;
            }
            if segments_intersect(a1, a2, b1, b2) {
                return false;
            }
        }
    }
    true
}

/// A ring is well-formed if it is simple, closed, has enough distinct points,
/// and encloses non-zero area. Mirrors the basic checks an upstream assembler
/// does before trusting a ring's geometry (closure, minimum point count,
/// non-zero area), extended with the self-intersection test above.
pub fn is_valid_ring(ring: &LineString<f64>) -> bool {
    let coords = &ring.0;
    if coords.len() < 4 {
        return false;
    }
    let (first, last) = (coords[0], coords[coords.len() - 1]);
    if (first.x - last.x).abs() > EPS || (first.y - last.y).abs() > EPS {
        return false;
    }
    if !is_simple_ring(ring) {
        return false;
    }
    let poly = Polygon::new(ring.clone(), vec![]);
    poly.area().abs() >= 1e-12
}

/// Full polygon validity: exterior and every hole must each be a simple,
/// well-formed ring, each hole must lie inside the exterior, and sibling
/// holes must not overlap one another. Mirrors the basic-checks philosophy
/// an upstream assembler applies before trusting a polygon (point count,
/// closure, non-zero area), extended to cover holes explicitly since this
/// crate's polygons always carry them.
pub fn is_valid_polygon(poly: &Polygon<f64>) -> bool {
    if !is_valid_ring(poly.exterior()) {
        return false;
    }
    let exterior_poly = Polygon::new(poly.exterior().clone(), vec![]);
    for (i, hole) in poly.interiors().iter().enumerate() {
        if !is_valid_ring(hole) {
            return false;
        }
        let hole_poly = Polygon::new(hole.clone(), vec![]);
        if !polygon_contains_polygon(&exterior_poly, &hole_poly) {
            return false;
        }
        for other in poly.interiors().iter().skip(i + 1) {
            if hole.intersects(other) {
                return false;
            }
        }
    }
    true
}

pub fn is_valid_multipolygon(mp: &MultiPolygon<f64>) -> bool {
    mp.0.iter().all(is_valid_polygon)
}

/// Representative-point containment test: is `inner`'s first exterior
/// coordinate contained within `outer`? Used for both ring-nesting (§4.4) and
/// hole assignment (§4.6), the same technique an upstream assembler uses to
/// decide which inner ring belongs inside which outer ring.
pub fn polygon_contains_polygon(outer: &Polygon<f64>, inner: &Polygon<f64>) -> bool {
    match inner.exterior().0.first() {
        Some(p) => outer.contains(&Point::new(p.x, p.y)),
        None => false,
    }
}

pub fn rings_exteriors_intersect(a: &LineString<f64>, b: &LineString<f64>) -> bool {
    a.intersects(b)
}

pub fn euclidean_distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    Point::new(a.x, a.y).euclidean_distance(&Point::new(b.x, b.y))
}

fn coord_key(c: &Coord<f64>) -> (i64, i64) {
    ((c.x * 1e7).round() as i64, (c.y * 1e7).round() as i64)
}

fn ring_segments(ring: &LineString<f64>) -> Vec<(Coord<f64>, Coord<f64>)> {
    let coords = &ring.0;
    (0..coords.len().saturating_sub(1))
        .map(|i| (coords[i], coords[i + 1]))
        .collect()
}

/// Symmetric difference of two rings that share at least one boundary
/// segment, restricted to the "touching siblings" case the inner-ring touch
/// fixer needs: segments present in exactly one of the two rings are kept,
/// shared segments are dropped, and the survivors are re-stitched into rings
/// using the same endpoint-matching technique `assemble_rings` uses to build
/// rings from ways in the first place. Returns `None` unless the remaining
/// segments stitch back into exactly one closed ring.
pub fn symmetric_difference_single_ring(
    a: &LineString<f64>,
    b: &LineString<f64>,
) -> Option<LineString<f64>> {
    let mut shared: HashMap<((i64, i64), (i64, i64)), usize> = HashMap::new();
    for (p, q) in ring_segments(a).into_iter().chain(ring_segments(b)) {
        let (kp, kq) = (coord_key(&p), coord_key(&q));
        let key = if kp <= kq { (kp, kq) } else { (kq, kp) };
        *shared.entry(key).or_insert(0) += 1;
    }

    let mut remaining: Vec<(Coord<f64>, Coord<f64>)> = Vec::new();
    for (p, q) in ring_segments(a).into_iter().chain(ring_segments(b)) {
        let (kp, kq) = (coord_key(&p), coord_key(&q));
        let key = if kp <= kq { (kp, kq) } else { (kq, kp) };
        if shared.get(&key).copied().unwrap_or(0) == 1 {
            remaining.push((p, q));
        }
    }
    if remaining.is_empty() {
        return None;
    }

    stitch_single_ring(remaining)
}

fn stitch_single_ring(segments: Vec<(Coord<f64>, Coord<f64>)>) -> Option<LineString<f64>> {
    let mut start_index: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
    let mut used = vec![false; segments.len()];
    for (idx, (p, _)) in segments.iter().enumerate() {
        start_index.entry(coord_key(p)).or_default().push(idx);
    }

    if segments.is_empty() {
        return None;
    }
    let seed = 0;
    used[seed] = true;
    let ring_start = coord_key(&segments[seed].0);
    let mut coords = vec![segments[seed].0, segments[seed].1];

    loop {
        let current_end = coord_key(coords.last().unwrap());
        if coords.len() >= 4 && current_end == ring_start {
            return Some(LineString::new(coords));
        }
        let next = start_index
            .get(&current_end)
            .into_iter()
            .flatten()
            .find(|&&idx| !used[idx]);
        match next {
            Some(&idx) => {
                used[idx] = true;
                coords.push(segments[idx].1);
            }
            None => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    fn square(x: f64, y: f64, size: f64) -> LineString<f64> {
        LineString::new(vec![
            coord(x, y),
            coord(x + size, y),
            coord(x + size, y + size),
            coord(x, y + size),
            coord(x, y),
        ])
    }

    #[test]
    fn square_is_simple_and_valid() {
        let ring = square(0.0, 0.0, 1.0);
        assert!(is_simple_ring(&ring));
        assert!(is_valid_ring(&ring));
    }

    #[test]
    fn figure_eight_is_not_simple() {
        let ring = LineString::new(vec![
            coord(0.0, 0.0),
            coord(1.0, 1.0),
            coord(1.0, 0.0),
            coord(0.0, 1.0),
            coord(0.0, 0.0),
        ]);
        assert!(!is_simple_ring(&ring));
    }

    #[test]
    fn ccw_square_detected() {
        let ccw = LineString::new(vec![
            coord(0.0, 0.0),
            coord(0.0, 1.0),
            coord(1.0, 1.0),
            coord(1.0, 0.0),
            coord(0.0, 0.0),
        ]);
        assert_eq!(orientation(&ccw), Orientation::CounterClockwise);
    }

    #[test]
    fn containment_by_representative_point() {
        let outer = Polygon::new(square(0.0, 0.0, 10.0), vec![]);
        let inner = Polygon::new(square(2.0, 2.0, 1.0), vec![]);
        assert!(polygon_contains_polygon(&outer, &inner));
        assert!(!polygon_contains_polygon(&inner, &outer));
    }
}
