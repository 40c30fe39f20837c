// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Canonical state digest.
//!
//! Every float is hashed by bit pattern, every slot (free ones included) in
//! index order with its occupancy, lengths as little-endian `u64`. The
//! construction config and each live pair's trigger flag are included, since
//! both decide what later steps do. The step counter and the registered
//! listener are not.

use blake3::Hasher;
use rewind_geom::{Shape, Vec2};

use crate::arena::Arena;
use crate::body::Body;
use crate::collider::Collider;
use crate::config::WorldConfig;
use crate::pair::ColliderPair;

/// 32-byte state digest.
pub type StateHash = [u8; 32];

fn put_f32(hasher: &mut Hasher, v: f32) {
    hasher.update(&v.to_bits().to_le_bytes());
}

fn put_vec2(hasher: &mut Hasher, v: Vec2) {
    put_f32(hasher, v.x);
    put_f32(hasher, v.y);
}

fn put_len(hasher: &mut Hasher, len: usize) {
    hasher.update(&(len as u64).to_le_bytes());
}

fn put_shape(hasher: &mut Hasher, shape: &Shape) {
    match shape {
        Shape::None => {
            hasher.update(&[0]);
        }
        Shape::Circle { center, radius } => {
            hasher.update(&[1]);
            put_vec2(hasher, *center);
            put_f32(hasher, *radius);
        }
        Shape::Rectangle { min, max } => {
            hasher.update(&[2]);
            put_vec2(hasher, *min);
            put_vec2(hasher, *max);
        }
        Shape::Polygon { vertices } => {
            hasher.update(&[3]);
            put_len(hasher, vertices.len());
            for v in vertices {
                put_vec2(hasher, *v);
            }
        }
    }
}

fn put_body(hasher: &mut Hasher, body: &Body) {
    put_vec2(hasher, body.position);
    put_vec2(hasher, body.velocity);
    put_vec2(hasher, body.force_sum());
    put_vec2(hasher, body.impulse_sum());
    put_f32(hasher, body.mass());
    put_f32(hasher, body.inv_mass());
    put_f32(hasher, body.damping);
    hasher.update(&[body.kind().tag()]);
}

fn put_collider(hasher: &mut Hasher, collider: &Collider) {
    put_shape(hasher, &collider.shape);
    put_vec2(hasher, collider.offset);
    put_f32(hasher, collider.restitution);
    put_f32(hasher, collider.friction);
    let body = collider.body();
    hasher.update(&body.index().to_le_bytes());
    hasher.update(&body.generation().to_le_bytes());
    hasher.update(&[
        u8::from(collider.trigger),
        u8::from(collider.enabled),
        u8::from(collider.is_valid()),
    ]);
}

/// Only the settings that still steer future steps; initial gravity and
/// preallocation are already reflected in the live state.
fn put_config(hasher: &mut Hasher, config: &WorldConfig) {
    put_len(hasher, config.growth_factor);
    hasher.update(&config.quad_tree.max_depth.to_le_bytes());
    put_len(hasher, config.quad_tree.leaf_capacity);
}

/// Digest of the simulation state owned by a world.
///
/// `live_pairs` yields each pair from the last narrow phase with its trigger
/// flag.
pub(crate) fn world_hash(
    config: &WorldConfig,
    gravity: Vec2,
    bodies: &Arena<Body>,
    colliders: &Arena<Collider>,
    live_pairs: impl ExactSizeIterator<Item = (ColliderPair, bool)>,
) -> StateHash {
    let mut hasher = Hasher::new();
    put_config(&mut hasher, config);
    put_vec2(&mut hasher, gravity);

    put_len(&mut hasher, bodies.capacity());
    for (body, generation, occupied) in bodies.raw_slots() {
        hasher.update(&generation.to_le_bytes());
        hasher.update(&[u8::from(occupied)]);
        put_body(&mut hasher, body);
    }

    put_len(&mut hasher, colliders.capacity());
    for (collider, generation, occupied) in colliders.raw_slots() {
        hasher.update(&generation.to_le_bytes());
        hasher.update(&[u8::from(occupied)]);
        put_collider(&mut hasher, collider);
    }

    put_len(&mut hasher, live_pairs.len());
    for (pair, trigger) in live_pairs {
        for h in [pair.first(), pair.second()] {
            hasher.update(&h.index().to_le_bytes());
            hasher.update(&h.generation().to_le_bytes());
        }
        hasher.update(&[u8::from(trigger)]);
    }
    hasher.finalize().into()
}
