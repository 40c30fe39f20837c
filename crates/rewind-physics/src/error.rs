// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use rewind_geom::GeomError;
use thiserror::Error;

/// Errors surfaced by world and body operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    /// A body handle outlived the body it referred to.
    #[error("stale body handle {index}v{generation} (live generation {live:?})")]
    StaleBody {
        /// Slot index carried by the handle.
        index: u32,
        /// Generation carried by the handle.
        generation: u32,
        /// Current generation of the slot, or `None` if the index is out of range.
        live: Option<u32>,
    },
    /// A collider handle outlived the collider it referred to.
    #[error("stale collider handle {index}v{generation} (live generation {live:?})")]
    StaleCollider {
        /// Slot index carried by the handle.
        index: u32,
        /// Generation carried by the handle.
        generation: u32,
        /// Current generation of the slot, or `None` if the index is out of range.
        live: Option<u32>,
    },
    /// Mass must be finite and strictly positive.
    #[error("invalid mass: {0}")]
    InvalidMass(f32),
    /// Shape construction failed.
    #[error(transparent)]
    Geometry(#[from] GeomError),
}
