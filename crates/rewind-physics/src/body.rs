// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use rewind_geom::Vec2;

use crate::arena::Slot;
use crate::error::PhysicsError;

/// How a body participates in integration and contact resolution.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BodyKind {
    /// Moved by forces, gravity, and contact impulses.
    #[default]
    Dynamic,
    /// Moved only by its own velocity; ignores forces and is immovable in
    /// contacts.
    Kinematic,
    /// Never moves.
    Static,
    /// Inert: neither integrated nor pushed.
    None,
}

impl BodyKind {
    /// Stable tag used when hashing world state.
    pub(crate) const fn tag(self) -> u8 {
        match self {
            Self::Dynamic => 0,
            Self::Kinematic => 1,
            Self::Static => 2,
            Self::None => 3,
        }
    }
}

/// Point-mass rigid body.
///
/// A body is valid iff `mass > 0`; a free arena slot holds a zero-mass body.
/// Inverse mass is derived from mass and kind and is zero for every kind
/// except [`BodyKind::Dynamic`]. Deserialization goes through
/// [`Body::new`], so it rejects invalid masses and recomputes inverse mass.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "BodyState"))]
pub struct Body {
    /// World-space position of the body origin.
    pub position: Vec2,
    /// Linear velocity.
    pub velocity: Vec2,
    /// Linear damping coefficient (per second).
    pub damping: f32,
    force_sum: Vec2,
    impulse_sum: Vec2,
    mass: f32,
    inv_mass: f32,
    kind: BodyKind,
}

impl Default for Body {
    /// A unit-mass dynamic body at rest at the origin.
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            damping: 0.0,
            force_sum: Vec2::ZERO,
            impulse_sum: Vec2::ZERO,
            mass: 1.0,
            inv_mass: 1.0,
            kind: BodyKind::Dynamic,
        }
    }
}

impl Slot for Body {
    fn vacant() -> Self {
        Self {
            mass: 0.0,
            inv_mass: 0.0,
            kind: BodyKind::None,
            ..Self::default()
        }
    }
}

/// Serialized form of a [`Body`]; derived fields are not trusted.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct BodyState {
    position: Vec2,
    velocity: Vec2,
    damping: f32,
    #[serde(default)]
    force_sum: Vec2,
    #[serde(default)]
    impulse_sum: Vec2,
    mass: f32,
    kind: BodyKind,
}

#[cfg(feature = "serde")]
impl TryFrom<BodyState> for Body {
    type Error = PhysicsError;

    fn try_from(state: BodyState) -> Result<Self, Self::Error> {
        let mut body = Self::new(state.mass, state.kind)?;
        body.position = state.position;
        body.velocity = state.velocity;
        body.damping = state.damping;
        body.force_sum = state.force_sum;
        body.impulse_sum = state.impulse_sum;
        Ok(body)
    }
}

impl Body {
    /// Creates a body at rest at the origin.
    pub fn new(mass: f32, kind: BodyKind) -> Result<Self, PhysicsError> {
        let mut body = Self {
            kind,
            ..Self::default()
        };
        body.set_mass(mass)?;
        Ok(body)
    }

    /// Returns `true` for a live body (positive mass).
    pub fn is_valid(&self) -> bool {
        self.mass > 0.0
    }

    /// Mass.
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Inverse mass; zero for non-dynamic bodies.
    pub fn inv_mass(&self) -> f32 {
        self.inv_mass
    }

    /// Body kind.
    pub fn kind(&self) -> BodyKind {
        self.kind
    }

    /// Forces accumulated since the last step.
    pub fn force_sum(&self) -> Vec2 {
        self.force_sum
    }

    /// Impulses accumulated since the last step.
    pub fn impulse_sum(&self) -> Vec2 {
        self.impulse_sum
    }

    /// Returns `true` if contact impulses can move this body.
    pub fn is_movable(&self) -> bool {
        self.kind == BodyKind::Dynamic
    }

    /// Sets the mass, rejecting values that would mark the slot as free.
    pub fn set_mass(&mut self, mass: f32) -> Result<(), PhysicsError> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(PhysicsError::InvalidMass(mass));
        }
        self.mass = mass;
        self.refresh_inv_mass();
        Ok(())
    }

    /// Changes the kind. Static and kinematic bodies get zero inverse mass.
    pub fn set_kind(&mut self, kind: BodyKind) {
        self.kind = kind;
        self.refresh_inv_mass();
    }

    /// Adds a force applied over the next step.
    pub fn apply_force(&mut self, force: Vec2) {
        self.force_sum += force;
    }

    /// Adds an instantaneous impulse applied at the start of the next step.
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        self.impulse_sum += impulse;
    }

    /// Discards accumulated forces and impulses.
    pub fn clear_accumulators(&mut self) {
        self.force_sum = Vec2::ZERO;
        self.impulse_sum = Vec2::ZERO;
    }

    /// Advances the body by `dt` under `gravity` (an acceleration).
    ///
    /// Dynamic: semi-implicit Euler with linear damping, then accumulators
    /// reset. Kinematic: `position += velocity * dt`; accumulators are left
    /// alone. Static and None: untouched.
    pub fn integrate(&mut self, gravity: Vec2, dt: f32) {
        match self.kind {
            BodyKind::Dynamic => {
                self.velocity += self.impulse_sum * self.inv_mass;
                let accel = gravity + self.force_sum * self.inv_mass;
                self.velocity += accel * dt;
                self.velocity *= 1.0 - self.damping * dt;
                self.position += self.velocity * dt;
                self.clear_accumulators();
            }
            BodyKind::Kinematic => {
                self.position += self.velocity * dt;
            }
            BodyKind::Static | BodyKind::None => {}
        }
    }

    fn refresh_inv_mass(&mut self) {
        self.inv_mass = match self.kind {
            BodyKind::Dynamic if self.mass > 0.0 => 1.0 / self.mass,
            _ => 0.0,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_and_kinematic_are_immovable() {
        let mut body = Body::default();
        body.set_mass(4.0).expect("valid mass");
        assert_eq!(body.inv_mass(), 0.25);
        body.set_kind(BodyKind::Static);
        assert_eq!(body.inv_mass(), 0.0);
        body.set_kind(BodyKind::Kinematic);
        assert_eq!(body.inv_mass(), 0.0);
        body.set_kind(BodyKind::Dynamic);
        assert_eq!(body.inv_mass(), 0.25);
    }

    #[test]
    fn non_positive_mass_is_rejected() {
        let mut body = Body::default();
        assert!(matches!(body.set_mass(0.0), Err(PhysicsError::InvalidMass(_))));
        assert!(body.set_mass(-1.0).is_err());
        assert!(body.set_mass(f32::NAN).is_err());
        assert_eq!(body.mass(), 1.0);
    }

    #[test]
    fn vacant_slot_is_invalid() {
        assert!(!Body::vacant().is_valid());
        assert!(Body::default().is_valid());
    }

    #[test]
    fn impulse_changes_velocity_once() {
        let mut body = Body::new(2.0, BodyKind::Dynamic).expect("valid mass");
        body.apply_impulse(Vec2::new(4.0, 0.0));
        body.integrate(Vec2::ZERO, 0.5);
        assert_eq!(body.velocity, Vec2::new(2.0, 0.0));
        assert_eq!(body.position, Vec2::new(1.0, 0.0));
        assert_eq!(body.impulse_sum(), Vec2::ZERO);
        body.integrate(Vec2::ZERO, 0.5);
        assert_eq!(body.velocity, Vec2::new(2.0, 0.0));
    }

    #[test]
    fn damping_scales_velocity() {
        let mut body = Body::default();
        body.damping = 0.5;
        body.velocity = Vec2::new(10.0, 0.0);
        body.integrate(Vec2::ZERO, 1.0);
        assert_eq!(body.velocity, Vec2::new(5.0, 0.0));
    }
}
