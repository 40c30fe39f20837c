// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use thiserror::Error;

use crate::types::vec2::Vec2;

/// Errors raised when constructing geometry from caller-supplied values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeomError {
    /// An AABB was requested with `min > max` on some axis, or a non-finite
    /// corner.
    #[error("invalid AABB: min {min:?}, max {max:?}")]
    InvalidAabb {
        /// Requested minimum corner.
        min: Vec2,
        /// Requested maximum corner.
        max: Vec2,
    },
    /// A circle was requested with a negative or non-finite radius.
    #[error("invalid circle radius: {0}")]
    InvalidRadius(f32),
}
