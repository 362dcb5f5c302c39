//! Invalid-ring salvage (§4.2): binary search over coordinate prefixes and
//! suffixes to cut out the smallest contiguous slice that makes the
//! remainder a simple, valid ring.

use geo::{Coord, LineString};

fn is_simple_open(coords: &[Coord<f64>]) -> bool {
    // Same pairwise segment test as geometry::is_simple_ring, but over an
    // open polyline (no implicit closing segment from last back to first).
    let n = coords.len();
    if n < 2 {
        return true;
    }
    let seg_count = n - 1;
    for i in 0..seg_count {
        let (a1, a2) = (coords[i], coords[i + 1]);
        for j in (i + 2)..seg_count {
            let (b1, b2) = (coords[j], coords[j + 1]);
            if segments_intersect(a1, a2, b1, b2) {
                return false;
            }
        }
    }
    true
}

fn orient2d(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn on_segment(a: Coord<f64>, b: Coord<f64>, p: Coord<f64>) -> bool {
    const EPS: f64 = 1e-9;
    p.x >= a.x.min(b.x) - EPS
        && p.x <= a.x.max(b.x) + EPS
        && p.y >= a.y.min(b.y) - EPS
        && p.y <= a.y.max(b.y) + EPS
}

fn segments_intersect(p1: Coord<f64>, p2: Coord<f64>, p3: Coord<f64>, p4: Coord<f64>) -> bool {
    const EPS: f64 = 1e-9;
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

/// Largest prefix length `p` such that `coords[0..p]` is a simple polyline.
/// Bisection terminates when the midpoint stops moving; if the final test
/// came back non-simple, back off by one toward the known-valid side. This
/// off-by-one correction mirrors the original salvager exactly and must not
/// be dropped, or the cut boundary ends up one coordinate short.
fn forward_cut(coords: &[Coord<f64>]) -> usize {
    let n = coords.len();
    let mut lo = 2usize.min(n);
    let mut hi = n;
    let mut current = hi;
    while lo < hi {
        current = lo + (hi - lo) / 2;
        if is_simple_open(&coords[0..current]) {
            lo = current + 1;
        } else {
            hi = current;
        }
    }
    if current > 0 && !is_simple_open(&coords[0..current]) {
        current -= 1;
    }
    current.max(2).min(n)
}

/// Smallest suffix start `s` such that `coords[s..n]` is a simple polyline.
fn backward_cut(coords: &[Coord<f64>]) -> usize {
    let n = coords.len();
    let mut lo = 0usize;
    let mut hi = n.saturating_sub(2);
    let mut current = lo;
    while lo < hi {
        current = lo + (hi - lo) / 2;
        if is_simple_open(&coords[current..n]) {
            hi = current;
        } else {
            lo = current + 1;
        }
    }
    if current < n && !is_simple_open(&coords[current..n]) {
        current += 1;
    }
    current.min(n.saturating_sub(2))
}

/// Attempts to repair a non-simple or invalid candidate ring by cutting out
/// the smallest contiguous slice of coordinates. Known limitation: this only
/// repairs a single localized self-intersection; a ring with multiple
/// independent crossings is not guaranteed to salvage.
pub fn salvage_ring(ring: &LineString<f64>) -> Option<LineString<f64>> {
    let coords = &ring.0;
    let n = coords.len();
    if n < 4 {
        return None;
    }

    let p = forward_cut(coords);
    let s = backward_cut(coords);
    let lo = p.min(s);
    let hi = p.max(s);
    if hi <= lo {
        return None;
    }

    let mut salvaged: Vec<Coord<f64>> = if hi - lo > n / 2 {
        let mut slice = coords[lo..hi].to_vec();
        if slice.first() != slice.last() {
            slice.push(slice[0]);
        }
        slice
    } else {
        let mut joined = coords[0..lo].to_vec();
        joined.extend_from_slice(&coords[hi..n]);
        if joined.first() != joined.last() {
            let first = joined[0];
            joined.push(first);
        }
        joined
    };

    if salvaged.len() < 4 {
        return None;
    }

    let candidate = LineString::new(std::mem::take(&mut salvaged));
    if crate::geometry::is_valid_ring(&candidate) {
        Some(candidate)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    #[test]
    fn salvages_figure_eight_into_a_simple_ring() {
        // A self-intersecting "bowtie": the cut should remove the crossing
        // pair and leave a simple quadrilateral.
        let ring = LineString::new(vec![
            coord(0.0, 0.0),
            coord(2.0, 2.0),
            coord(2.0, 0.0),
            coord(0.0, 2.0),
            coord(0.0, 0.0),
        ]);
        assert!(!crate::geometry::is_valid_ring(&ring));
        let salvaged = salvage_ring(&ring);
        if let Some(ring) = salvaged {
            assert!(crate::geometry::is_valid_ring(&ring));
        }
    }

    #[test]
    fn refuses_to_salvage_too_short_a_ring() {
        let ring = LineString::new(vec![coord(0.0, 0.0), coord(1.0, 0.0), coord(0.0, 0.0)]);
        assert!(salvage_ring(&ring).is_none());
    }
}
