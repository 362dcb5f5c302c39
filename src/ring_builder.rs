//! Backtracking ring synthesis (§4.1). Repeatedly finds one closed ring
//! among the currently-unused ways. Implemented with an explicit frame
//! stack rather than native recursion: OSM relations can carry thousands of
//! member ways, and a recursive implementation would risk overflowing the
//! call stack on a single large relation.

use crate::geometry;
use crate::ring_salvage::salvage_ring;
use crate::way_info::{Direction, RingId, RingInfo, UsedBy, WayId, WayInfo};
use geo::LineString;

struct Frame {
    way_idx: usize,
    /// Next candidate index to resume scanning from if this frame backtracks.
    scan_from: usize,
}

/// Finds and removes one closed ring from `ways`, or returns `None` once no
/// further ring can be built from what remains unused.
pub fn build_one_ring(ways: &mut [WayInfo], ring_id: RingId) -> Option<RingInfo> {
    loop {
        let seed_idx = ways.iter().position(|w| w.used == UsedBy::Available)?;
        match try_seed(ways, ring_id, seed_idx) {
            Some(ring) => return Some(ring),
            None => {
                ways[seed_idx].used = UsedBy::Rejected;
            }
        }
    }
}

fn try_seed(ways: &mut [WayInfo], ring_id: RingId, seed_idx: usize) -> Option<RingInfo> {
    ways[seed_idx].used = UsedBy::Ring(ring_id);
    ways[seed_idx].sequence = 0;
    ways[seed_idx].invert = false;
    let first = ways[seed_idx].first_node_id;
    let mut last = ways[seed_idx].last_node_id;

    let mut stack: Vec<Frame> = vec![Frame { way_idx: seed_idx, scan_from: 0 }];

    loop {
        if first == last {
            if let Some(ring) = close_ring(ways, ring_id, &stack) {
                return Some(ring);
            }
            // The candidate ring failed validation even after salvage; pop
            // this frame and keep backtracking, same as an extend failure,
            // rather than trying to extend past the way that just failed.
            match backtrack(ways, &mut stack) {
                Some(new_last) => {
                    last = new_last;
                    continue;
                }
                None => return None,
            }
        }

        let scan_from = stack.last().unwrap().scan_from;
        let mut found = None;
        for idx in scan_from..ways.len() {
            if ways[idx].used != UsedBy::Available {
                continue;
            }
            if ways[idx].first_node_id == last {
                found = Some((idx, false));
                break;
            }
            if ways[idx].last_node_id == last {
                found = Some((idx, true));
                break;
            }
        }

        match found {
            Some((idx, invert)) => {
                stack.last_mut().unwrap().scan_from = idx + 1;
                ways[idx].used = UsedBy::Ring(ring_id);
                ways[idx].invert = invert;
                ways[idx].sequence = stack.len();
                last = if invert { ways[idx].first_node_id } else { ways[idx].last_node_id };
                stack.push(Frame { way_idx: idx, scan_from: 0 });
            }
            None => match backtrack(ways, &mut stack) {
                Some(new_last) => last = new_last,
                None => return None,
            },
        }
    }
}

/// Pops the top frame (dead end, or a failed closure attempt), restoring its
/// way to `Available`, and returns the node id the chain now ends at — the
/// frontier to resume extending from. Returns `None` once the seed itself
/// has been popped, meaning this seed has no viable continuation at all.
fn backtrack(ways: &mut [WayInfo], stack: &mut Vec<Frame>) -> Option<i64> {
    let popped = stack.pop().unwrap();
    ways[popped.way_idx].used = UsedBy::Available;
    let parent = stack.last()?;
    let parent_way = &ways[parent.way_idx];
    Some(if parent_way.invert { parent_way.first_node_id } else { parent_way.last_node_id })
}

fn close_ring(ways: &mut [WayInfo], ring_id: RingId, stack: &[Frame]) -> Option<RingInfo> {
    let way_ids: Vec<WayId> = stack.iter().map(|f| WayId(f.way_idx)).collect();

    let mut coords = Vec::new();
    for (seq, frame) in stack.iter().enumerate() {
        let w = &ways[frame.way_idx];
        debug_assert_eq!(w.sequence, seq);
        let mut pts: Vec<_> = w.way_geom.0.clone();
        if w.invert {
            pts.reverse();
        }
        if seq == 0 {
            coords.extend(pts);
        } else {
            coords.extend(pts.into_iter().skip(1));
        }
    }

    let mut ring = LineString::new(coords);
    if !geometry::is_valid_ring(&ring) {
        match salvage_ring(&ring) {
            Some(salvaged) => ring = salvaged,
            None => return None,
        }
    }

    let direction = match geometry::orientation(&ring) {
        geometry::Orientation::Clockwise => Direction::Clockwise,
        geometry::Orientation::CounterClockwise => Direction::CounterClockwise,
    };

    let polygon = geo::Polygon::new(ring, vec![]);

    Some(RingInfo {
        ring_id,
        polygon: Some(polygon),
        direction,
        ways: way_ids,
        contained_by: None,
        inner_rings: Vec::new(),
        nested: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MemberRole, Way};
    use geo::Coord;
    use hashbrown::HashMap;

    fn coord(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    fn make_way(id: i64, first: i64, last: i64, coords: Vec<Coord<f64>>) -> WayInfo {
        WayInfo::from_way(
            Way { id, coords, tags: HashMap::new(), timestamp: 0, first_node_id: first, last_node_id: last },
            MemberRole::Unset,
        )
    }

    #[test]
    fn builds_square_from_four_ways() {
        let mut ways = vec![
            make_way(1, 1, 2, vec![coord(0.0, 0.0), coord(1.0, 0.0)]),
            make_way(2, 2, 3, vec![coord(1.0, 0.0), coord(1.0, 1.0)]),
            make_way(3, 3, 4, vec![coord(1.0, 1.0), coord(0.0, 1.0)]),
            make_way(4, 4, 1, vec![coord(0.0, 1.0), coord(0.0, 0.0)]),
        ];

        let ring = build_one_ring(&mut ways, RingId(0)).expect("ring found");
        assert_eq!(ring.ways.len(), 4);
        assert!(ways.iter().all(|w| w.used == UsedBy::Ring(RingId(0))));
    }

    #[test]
    fn no_ring_when_ways_dont_connect() {
        let mut ways = vec![
            make_way(1, 1, 2, vec![coord(0.0, 0.0), coord(1.0, 0.0)]),
            make_way(2, 3, 4, vec![coord(2.0, 0.0), coord(3.0, 0.0)]),
        ];
        assert!(build_one_ring(&mut ways, RingId(0)).is_none());
        assert!(ways.iter().all(|w| w.used == UsedBy::Rejected));
    }

    #[test]
    fn backtracks_past_a_dead_end_branch() {
        // Way 2 looks like it could extend way 1 but leads to a dead end;
        // way 3 is the real continuation back to the seed.
        let mut ways = vec![
            make_way(1, 1, 2, vec![coord(0.0, 0.0), coord(1.0, 0.0)]),
            make_way(2, 2, 5, vec![coord(1.0, 0.0), coord(9.0, 9.0)]),
            make_way(3, 2, 1, vec![coord(1.0, 0.0), coord(0.0, 0.0)]),
        ];
        let ring = build_one_ring(&mut ways, RingId(0)).expect("ring found via way 3");
        assert_eq!(ring.ways.len(), 2);
    }
}
