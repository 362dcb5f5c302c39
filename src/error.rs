//! Fatal error kinds for relation assembly.

use thiserror::Error;

/// Reasons the assembler can fail to produce a multipolygon.
#[derive(Debug, Clone, Error)]
pub enum AssemblyError {
    #[error("invalid way geometry in multipolygon relation member")]
    InvalidWayGeometry,

    #[error("un-connectable dangling ends")]
    UnconnectableDanglingEnds,

    #[error("no rings")]
    NoRings,

    #[error("invalid ring")]
    InvalidRing,

    #[error("multipolygon invalid")]
    InvalidMultipolygon,
}
