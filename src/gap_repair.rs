//! Dangling-endpoint gap repair (§4.3). Ways left over after a ring-build
//! pass either got fully rejected or never found a partner; this pairs up
//! their loose ends and synthesizes straight-line filler ways so a second
//! ring-build pass can close the gaps.

use crate::error::AssemblyError;
use crate::geometry;
use crate::model::MemberRole;
use crate::way_info::{UsedBy, WayInfo};
use geo::{Coord, LineString};
use hashbrown::HashMap;

/// Resets every unused way to `Available`, finds dangling endpoints among
/// them, and synthesizes filler ways pairing the nearest ones together.
/// Returns `Err` only when repair is disabled and dangling ends remain;
/// termination is otherwise guaranteed because dangling endpoints always
/// come in pairs (or, with an odd count, one is left over and simply
/// ignored after all closer pairs are exhausted).
pub fn find_and_repair_holes(
    ways: &mut Vec<WayInfo>,
    attempt_repair: bool,
) -> Result<(), AssemblyError> {
    let mut endpoints: HashMap<i64, Coord<f64>> = HashMap::new();

    for way in ways.iter_mut() {
        if matches!(way.used, UsedBy::Ring(_)) {
            continue;
        }
        way.used = UsedBy::Available;
        way.innerouter = MemberRole::Unset;

        for (node_id, coord) in [
            (way.first_node_id, way.way_geom.0[0]),
            (way.last_node_id, *way.way_geom.0.last().unwrap()),
        ] {
            if endpoints.remove(&node_id).is_some() {
                // Seen before: this node isn't dangling after all.
            } else {
                endpoints.insert(node_id, coord);
            }
        }
    }

    if endpoints.is_empty() {
        return Ok(());
    }

    if !attempt_repair {
        return Err(AssemblyError::UnconnectableDanglingEnds);
    }

    let mut dangling: Vec<(i64, Coord<f64>)> = endpoints.into_iter().collect();

    while dangling.len() >= 2 {
        let (n1_id, n1) = dangling.pop().unwrap();
        let (best_idx, _) = dangling
            .iter()
            .enumerate()
            .map(|(i, (_, c))| (i, geometry::euclidean_distance(n1, *c)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .expect("at least one candidate remains");
        let (n2_id, n2) = dangling.remove(best_idx);

        ways.push(WayInfo::synthesized(n1_id, n2_id, LineString::new(vec![n1, n2])));
    }

    Ok(())
}
