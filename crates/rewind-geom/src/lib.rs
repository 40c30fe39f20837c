// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![doc = r"Geometry primitives for Rewind.

This crate provides:
- A 2D float vector (`Vec2`) and axis-aligned bounding boxes (`Aabb`).
- The closed collision shape variant (`Shape`).
- A region quad-tree broad phase (`QuadTree`) that produces candidate pairs.
- Exact narrow-phase overlap tests (`narrow::overlaps`) and separating-axis
  helpers for convex polygons.

Design notes:
- Deterministic: no ambient RNG, no hash-ordered iteration; pair output order
  depends only on insertion order.
- Float32 throughout; operations favor clarity and reproducibility.
- Every container is a plain value so owners can snapshot by cloning.
"]

/// Broad-phase quad-tree.
pub mod broad;
/// Error types for geometry construction.
pub mod error;
/// Exact overlap tests.
pub mod narrow;
/// Foundational geometry types.
pub mod types;

pub use broad::{QuadEntry, QuadNodeView, QuadTree, QuadTreeConfig};
pub use error::GeomError;
pub use types::aabb::Aabb;
pub use types::shape::{Shape, ShapeKind};
pub use types::vec2::{Vec2, EPSILON};
