// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use rewind_geom::{Aabb, Shape, Vec2};

use crate::arena::Slot;
use crate::body::Body;
use crate::handle::BodyHandle;

/// Collision shape attached to a body.
///
/// The shape is stored in body-local space; [`Collider::world_shape`]
/// translates it by the body position plus [`Collider::offset`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Collider {
    /// Local-space shape. [`Shape::None`] never collides.
    pub shape: Shape,
    /// Offset from the owning body's origin.
    pub offset: Vec2,
    /// Bounciness in `[0, 1]`.
    pub restitution: f32,
    /// Friction coefficient. Stored, not used by the solver.
    pub friction: f32,
    /// Triggers report overlaps but receive no contact response.
    pub trigger: bool,
    /// Disabled colliders are left out of the broad phase.
    pub enabled: bool,
    body: BodyHandle,
    #[cfg_attr(feature = "serde", serde(skip, default = "initialized"))]
    initialized: bool,
}

#[cfg(feature = "serde")]
const fn initialized() -> bool {
    true
}

impl Slot for Collider {
    fn vacant() -> Self {
        Self {
            shape: Shape::None,
            offset: Vec2::ZERO,
            restitution: 0.0,
            friction: 0.0,
            trigger: false,
            enabled: false,
            body: BodyHandle::from_raw_parts(0, 0),
            initialized: false,
        }
    }
}

impl Collider {
    /// Creates an enabled collider with no shape attached to `body`.
    pub fn new(body: BodyHandle) -> Self {
        Self {
            enabled: true,
            body,
            initialized: true,
            ..Self::vacant()
        }
    }

    /// Sets the shape.
    #[must_use]
    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    /// Sets the offset from the body origin.
    #[must_use]
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Sets restitution.
    #[must_use]
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    /// Sets friction.
    #[must_use]
    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    /// Marks the collider as a trigger.
    #[must_use]
    pub fn with_trigger(mut self, trigger: bool) -> Self {
        self.trigger = trigger;
        self
    }

    /// Enables or disables the collider.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Owning body.
    pub fn body(&self) -> BodyHandle {
        self.body
    }

    /// Returns `true` for a real collider rather than a free slot.
    pub fn is_valid(&self) -> bool {
        self.initialized
    }

    /// Shape in world space for the given owning body.
    pub fn world_shape(&self, body: &Body) -> Shape {
        self.shape.translated(body.position + self.offset)
    }

    /// World-space bounding box; `None` for [`Shape::None`].
    ///
    /// Circles map to the square of side `2 * radius` around their centre.
    pub fn world_aabb(&self, body: &Body) -> Option<Aabb> {
        self.shape
            .aabb()
            .map(|bb| bb.translated(body.position + self.offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_enabled_with_no_shape() {
        let c = Collider::new(BodyHandle::from_raw_parts(3, 1));
        assert!(c.enabled && c.is_valid() && !c.trigger);
        assert_eq!(c.shape, Shape::None);
        assert_eq!(c.body(), BodyHandle::from_raw_parts(3, 1));
        assert!(!Collider::vacant().is_valid());
    }

    #[test]
    fn world_aabb_follows_body_and_offset() {
        let mut body = Body::default();
        body.position = Vec2::new(10.0, 0.0);
        let c = Collider::new(BodyHandle::from_raw_parts(0, 0))
            .with_shape(Shape::circle(Vec2::ZERO, 0.5).expect("radius"))
            .with_offset(Vec2::new(0.0, 2.0));
        let bb = c.world_aabb(&body).expect("circle has bounds");
        assert_eq!(bb.min(), Vec2::new(9.5, 1.5));
        assert_eq!(bb.max(), Vec2::new(10.5, 2.5));
        assert_eq!(
            c.world_shape(&body),
            Shape::circle(Vec2::new(10.0, 2.0), 0.5).expect("radius")
        );
    }
}
