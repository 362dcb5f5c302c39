//! Assembles an OSM multipolygon relation's member ways into a valid planar
//! multipolygon: ring synthesis by backtracking, invalid-ring salvage,
//! dangling-endpoint gap repair, containment-based nesting, inner-ring touch
//! merging, and tag reconciliation.
//!
//! This crate is a library, not a process: it has no CLI, no file I/O, and
//! no configuration layer. Callers supply already-parsed relation/way data
//! and receive back geometry plus reconciled tags.

pub mod diagnostics;
pub mod error;
pub mod gap_repair;
pub mod geometry;
pub mod inner_touch;
pub mod model;
pub mod nesting;
pub mod polygon_assembly;
pub mod ring_builder;
pub mod ring_salvage;
pub mod secondary;
pub mod tags;
pub mod way_info;

use diagnostics::Diagnostics;
use error::AssemblyError;
use model::{MemberRole, Relation, Tags, Way};
use secondary::SecondaryPolygon;
use way_info::{RingId, RingInfo, WayInfo};

use geo::MultiPolygon;

/// Knobs the assembler needs; deliberately not a config-file/env-var layer
/// (out of scope), just plain constructor fields.
#[derive(Debug, Clone, Copy)]
pub struct AssemblyOptions {
    /// When `false`, any dangling way endpoint left after ring building is
    /// fatal (`AssemblyError::UnconnectableDanglingEnds`) rather than
    /// repaired with a synthesized filler way.
    pub attempt_repair: bool,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self { attempt_repair: true }
    }
}

/// The assembled result: geometry, reconciled tags, and a derived timestamp.
#[derive(Debug, Clone)]
pub struct AssembledMultipolygon {
    pub geometry: MultiPolygon<f64>,
    pub tags: Tags,
    pub timestamp: i64,
}

fn member_role(relation: &Relation, way_id: i64) -> MemberRole {
    relation
        .members
        .iter()
        .find(|m| m.way_id == way_id)
        .map(|m| m.role)
        .unwrap_or(MemberRole::Unset)
}

fn run_ring_building_pass(ways: &mut Vec<WayInfo>, rings: &mut Vec<RingInfo>) {
    loop {
        let ring_id = RingId(rings.len());
        match ring_builder::build_one_ring(ways, ring_id) {
            Some(ring) => rings.push(ring),
            None => break,
        }
    }
}

/// Assembles `member_ways` (filtered to `relation`'s members) into a
/// validated multipolygon, following the control flow of §2: WayInfo setup
/// → ring-build pass 1 → gap repair → ring-build pass 2 → nesting →
/// inner-ring touch fix → secondary polygons → final polygon assembly.
pub fn assemble(
    relation: &Relation,
    member_ways: &[Way],
    options: AssemblyOptions,
    on_secondary: &mut dyn FnMut(SecondaryPolygon),
    diagnostics: &dyn Diagnostics,
) -> Result<AssembledMultipolygon, AssemblyError> {
    log::debug!(
        "assembling relation {} from {} member ways",
        relation.id,
        member_ways.len()
    );

    let mut max_timestamp = relation.timestamp;
    let mut ways: Vec<WayInfo> = Vec::with_capacity(member_ways.len());
    for way in member_ways {
        if way.coords.len() < 2 {
            return Err(AssemblyError::InvalidWayGeometry);
        }
        max_timestamp = max_timestamp.max(way.timestamp);
        let role = member_role(relation, way.id);
        ways.push(WayInfo::from_way(way.clone(), role));
    }

    let mut rings: Vec<RingInfo> = Vec::new();
    run_ring_building_pass(&mut ways, &mut rings);
    log::debug!("ring-build pass 1: {} rings", rings.len());

    // The original assembler's "no rings after pass 1" early return is
    // deliberately not enforced here (see Design Notes): the gap-repair
    // pass still gets a chance to connect things up.
    gap_repair::find_and_repair_holes(&mut ways, options.attempt_repair)?;

    run_ring_building_pass(&mut ways, &mut rings);
    log::debug!("ring-build pass 2: {} rings total", rings.len());

    if rings.is_empty() {
        return Err(AssemblyError::NoRings);
    }

    let contained_by_even = nesting::resolve_nesting(&mut rings);
    let outer_indices: Vec<usize> = (0..rings.len())
        .filter(|&i| rings[i].contained_by.is_none())
        .collect();
    debug_assert!(outer_indices.iter().all(|&i| contained_by_even[i]));

    for &outer_idx in &outer_indices {
        inner_touch::fix_inner_ring_touches(&mut rings, RingId(outer_idx));
    }

    let mut relation_tags = relation.tags.clone();

    for idx in 0..rings.len() {
        let Some(parent) = rings[idx].contained_by else { continue };
        if rings[idx].polygon.is_none() || rings[idx].ways.len() != 1 {
            continue;
        }
        let ring = rings[idx].clone();
        let outer = rings[parent.0].clone();
        secondary::maybe_emit_secondary(&ring, &ways, &outer, &relation_tags, on_secondary, diagnostics);
    }

    let geometry = polygon_assembly::assemble_multipolygon(
        &outer_indices,
        &rings,
        &mut ways,
        &mut relation_tags,
        diagnostics,
    )?;

    Ok(AssembledMultipolygon {
        geometry,
        tags: relation_tags,
        timestamp: max_timestamp,
    })
}
