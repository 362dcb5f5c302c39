//! Tag reconciliation policy (§4.9): which keys participate in tag equality
//! and merging, and how a way's tags interact with its relation's tags
//! during polygon assembly.

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::model::Tags;

pub const IGNORED_KEYS: [&str; 4] = ["type", "created_by", "source", "note"];

fn ignored(key: &str) -> bool {
    IGNORED_KEYS.contains(&key)
}

/// True if `tags` has at least one non-ignored key.
pub fn untagged(tags: &Tags) -> bool {
    !tags.keys().any(|k| !ignored(k))
}

/// Equal iff, after dropping ignored keys, the two maps are key-for-key
/// identical.
pub fn same_tags(a: &Tags, b: &Tags) -> bool {
    let a_relevant: Vec<_> = a.iter().filter(|(k, _)| !ignored(k)).collect();
    let b_relevant: Vec<_> = b.iter().filter(|(k, _)| !ignored(k)).collect();
    if a_relevant.len() != b_relevant.len() {
        return false;
    }
    a_relevant.into_iter().all(|(k, v)| b.get(k) == Some(v))
}

/// Merges `b`'s non-ignored tags into `a`. Keys already present in `a` with a
/// different value are left untouched in `a`, and the collision is reported.
pub fn merge_tags(a: &mut Tags, b: &Tags, diagnostics: &dyn Diagnostics) {
    for (key, value) in b.iter() {
        if ignored(key) {
            continue;
        }
        match a.get(key) {
            None => {
                a.insert(key.clone(), value.clone());
            }
            Some(existing) if existing != value => {
                diagnostics.report(Diagnostic::TagCollision { key: key.clone() });
            }
            Some(_) => {}
        }
    }
}

/// Applied once per outer-ring member way during polygon assembly: decides
/// whether the way's tags should be folded into the relation's tag set. A
/// way that's tagged, differs from the relation, and finds the relation
/// already tagged too is left alone — there's nothing to merge and nothing
/// to report here.
pub fn reconcile_way_tags(relation_tags: &mut Tags, way_tags: &Tags, diagnostics: &dyn Diagnostics) {
    if untagged(way_tags) {
        return;
    }
    if same_tags(relation_tags, way_tags) {
        return;
    }
    if untagged(relation_tags) {
        merge_tags(relation_tags, way_tags, diagnostics);
    }
}
