// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Core geometry types used by the engine (vector, AABB, shape).
//!
//! Determinism notes:
//! - Broad-phase overlap semantics are inclusive on faces so touching shapes
//!   still reach the exact narrow-phase test.
//! - Arithmetic uses `f32` without fused multiply-add to preserve identical
//!   results across platforms.

#[doc = "Axis-aligned bounding boxes (world space)."]
pub mod aabb;
#[doc = "Closed shape variant attached to colliders."]
pub mod shape;
#[doc = "2D float vector."]
pub mod vec2;
