// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use rewind_geom::{QuadTreeConfig, Vec2};

/// Gravity applied when none is configured, in units per second squared.
pub const DEFAULT_GRAVITY: Vec2 = Vec2::new(0.0, -9.8);

/// Construction parameters for a [`crate::World`].
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldConfig {
    /// Constant acceleration applied to every dynamic body.
    pub gravity: Vec2,
    /// Body slots allocated up front.
    pub preallocated_bodies: usize,
    /// Collider slots allocated up front.
    pub preallocated_colliders: usize,
    /// Capacity multiplier used when a store runs out of free slots.
    pub growth_factor: usize,
    /// Broad-phase tuning.
    pub quad_tree: QuadTreeConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            preallocated_bodies: 0,
            preallocated_colliders: 0,
            growth_factor: 2,
            quad_tree: QuadTreeConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Sets gravity.
    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    /// Preallocates `count` slots in both the body and collider stores.
    pub fn with_preallocated(mut self, count: usize) -> Self {
        self.preallocated_bodies = count;
        self.preallocated_colliders = count;
        self
    }

    /// Sets the store growth factor.
    pub fn with_growth_factor(mut self, growth_factor: usize) -> Self {
        self.growth_factor = growth_factor;
        self
    }

    /// Sets the broad-phase configuration.
    pub fn with_quad_tree(mut self, quad_tree: QuadTreeConfig) -> Self {
        self.quad_tree = quad_tree;
        self
    }
}
