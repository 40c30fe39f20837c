// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! rewind-physics: deterministic 2D rigid-body simulation built for rollback.
//!
//! A [`World`] owns bodies and colliders in generational arenas addressed by
//! [`BodyHandle`] and [`ColliderHandle`]. Each [`World::update`] integrates
//! every body, rebuilds a quad-tree broad phase, runs exact narrow-phase
//! tests, resolves contacts with a single-point impulse solver, and reports
//! Enter/Stay/Exit transitions to a [`ContactListener`].
//!
//! The whole world is a plain value: `World::clone` is a snapshot, and
//! stepping a snapshot with the same input reproduces the same bits. Use
//! [`World::state_hash`] or [`sandbox::run_pair_determinism`] to check.
#![forbid(unsafe_code)]

mod arena;
mod body;
mod collider;
mod config;
mod digest;
mod error;
mod handle;
mod listener;
mod pair;
mod solver;
mod world;

pub mod sandbox;

pub use body::{Body, BodyKind};
pub use collider::Collider;
pub use config::{WorldConfig, DEFAULT_GRAVITY};
pub use digest::StateHash;
pub use error::PhysicsError;
pub use handle::{BodyHandle, ColliderHandle, Handle};
pub use listener::{ContactEvent, ContactListener, EventLog, SharedListener};
pub use pair::ColliderPair;
pub use solver::{contact, Contact, ContactSolver};
pub use world::World;

pub use rewind_geom::{Aabb, QuadTree, QuadTreeConfig, Shape, ShapeKind, Vec2};
