// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Broad phase: a region quad-tree rebuilt every step.
//!
//! Determinism contract:
//! - Entries are visited in insertion order within a node and nodes in
//!   pre-order with quadrants in `[NW, NE, SW, SE]` order, so the candidate
//!   pair list depends only on the insertion sequence.
//! - Overlap is inclusive on faces (touching AABBs are candidates).
//! - Candidates are a superset of true overlaps; the narrow phase filters.

#[doc = "Flat, value-copyable quad-tree and its configuration."]
pub mod quad_tree;

pub use quad_tree::{QuadEntry, QuadNodeView, QuadTree, QuadTreeConfig};
