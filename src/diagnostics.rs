//! Non-fatal warning sink, replacing the `#define debug false` global flag
//! the original assembler used. §7 kind 6 (tag collisions, role mismatches)
//! flows through here instead of being hard-wired to stderr.

use std::cell::RefCell;

/// A single non-fatal diagnostic raised during assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A way's advisory inner/outer role disagreed with its geometric nesting.
    RoleMismatch { way_id: i64 },
    /// Two tag sets being merged disagreed on a shared key; the first value won.
    TagCollision { key: String },
    /// A secondary inner polygon was skipped because its tags were redundant.
    RedundantInnerTags { way_id: i64 },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::RoleMismatch { way_id } => {
                write!(f, "way {way_id}: advisory role disagrees with geometric nesting")
            }
            Diagnostic::TagCollision { key } => {
                write!(f, "tag collision on key {key:?}, kept existing value")
            }
            Diagnostic::RedundantInnerTags { way_id } => {
                write!(f, "way {way_id}: inner polygon tags redundant, skipped")
            }
        }
    }
}

/// Sink for non-fatal diagnostics raised while assembling a relation.
pub trait Diagnostics {
    fn report(&self, diagnostic: Diagnostic);
}

/// Forwards every diagnostic to the `log` facade at `warn` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        log::warn!("{diagnostic}");
    }
}

/// Collects diagnostics in memory; used by tests that assert on warnings.
#[derive(Debug, Default)]
pub struct CollectingDiagnostics {
    collected: RefCell<Vec<Diagnostic>>,
}

impl CollectingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.collected.into_inner()
    }
}

impl Diagnostics for CollectingDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        self.collected.borrow_mut().push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_in_order() {
        let sink = CollectingDiagnostics::new();
        sink.report(Diagnostic::RoleMismatch { way_id: 1 });
        sink.report(Diagnostic::TagCollision { key: "highway".into() });
        let collected = sink.into_vec();
        assert_eq!(collected.len(), 2);
        assert_eq!(collected[0], Diagnostic::RoleMismatch { way_id: 1 });
    }
}
