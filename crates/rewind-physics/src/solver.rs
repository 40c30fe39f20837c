// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Single-point contact resolution.
//!
//! Contact normals always point from the second operand towards the first,
//! i.e. along the direction the first body has to move to separate.

use rewind_geom::narrow::sat;
use rewind_geom::{Aabb, Shape, Vec2, EPSILON};
use tracing::trace;

use crate::body::Body;
use crate::collider::Collider;

/// Contact geometry between two overlapping shapes.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Contact {
    /// Unit normal, from B towards A.
    pub normal: Vec2,
    /// Contact point in world space.
    pub point: Vec2,
    /// Overlap depth along `normal`; positive when the shapes interpenetrate.
    pub penetration: f32,
}

impl Contact {
    /// Same contact seen from the other side.
    #[must_use]
    pub fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            ..self
        }
    }
}

/// Computes contact geometry between two world-space shapes.
///
/// Returns `None` when either shape is [`Shape::None`] or the separating-axis
/// test finds a gap. Orderings without a dedicated routine are swapped once
/// and the result flipped back.
pub fn contact(a: &Shape, b: &Shape) -> Option<Contact> {
    match (a, b) {
        (Shape::None, _) | (_, Shape::None) => None,
        (
            Shape::Circle {
                center: ca,
                radius: ra,
            },
            Shape::Circle {
                center: cb,
                radius: rb,
            },
        ) => Some(circle_circle(*ca, *ra, *cb, *rb)),
        (Shape::Circle { center, radius }, Shape::Rectangle { min, max }) => {
            Some(circle_rectangle(*center, *radius, Aabb::from_corners(*min, *max)))
        }
        (Shape::Rectangle { min: amin, max: amax }, Shape::Rectangle { min: bmin, max: bmax }) => {
            Some(rectangle_rectangle(
                Aabb::from_corners(*amin, *amax),
                Aabb::from_corners(*bmin, *bmax),
            ))
        }
        (Shape::Circle { center, radius }, Shape::Polygon { vertices }) => {
            let (normal, penetration) = sat::circle_polygon(*center, *radius, vertices)?;
            let point = midpoint(*center, b.centroid()?);
            Some(Contact {
                normal,
                point,
                penetration,
            })
        }
        (Shape::Polygon { .. }, Shape::Polygon { .. } | Shape::Rectangle { .. })
        | (Shape::Rectangle { .. }, Shape::Polygon { .. }) => convex_convex(a, b),
        (Shape::Rectangle { .. } | Shape::Polygon { .. }, Shape::Circle { .. }) => {
            contact(b, a).map(Contact::flipped)
        }
    }
}

fn midpoint(p: Vec2, q: Vec2) -> Vec2 {
    (p + q) * 0.5
}

fn circle_circle(ca: Vec2, ra: f32, cb: Vec2, rb: f32) -> Contact {
    let delta = ca - cb;
    let distance = delta.length();
    let normal = if distance <= EPSILON {
        Vec2::UNIT_Y
    } else {
        Vec2::new(delta.x / distance, delta.y / distance)
    };
    Contact {
        normal,
        point: ca + delta * 0.5,
        penetration: ra + rb - distance,
    }
}

fn circle_rectangle(center: Vec2, radius: f32, rect: Aabb) -> Contact {
    let (lo, hi) = (rect.min(), rect.max());
    let closest = center.clamp(&lo, &hi);
    let delta = center - closest;
    let distance = delta.length();
    if distance > EPSILON {
        return Contact {
            normal: Vec2::new(delta.x / distance, delta.y / distance),
            point: closest,
            penetration: radius - distance,
        };
    }
    // Centre inside the rectangle: leave through the nearest face.
    let faces = [
        (center.x - lo.x, Vec2::new(-1.0, 0.0), Vec2::new(lo.x, center.y)),
        (hi.x - center.x, Vec2::UNIT_X, Vec2::new(hi.x, center.y)),
        (center.y - lo.y, Vec2::new(0.0, -1.0), Vec2::new(center.x, lo.y)),
        (hi.y - center.y, Vec2::UNIT_Y, Vec2::new(center.x, hi.y)),
    ];
    let (depth, normal, point) = faces
        .into_iter()
        .fold(faces[0], |best, face| if face.0 < best.0 { face } else { best });
    Contact {
        normal,
        point,
        penetration: radius + depth,
    }
}

fn rectangle_rectangle(a: Aabb, b: Aabb) -> Contact {
    let delta = a.center() - b.center();
    let (ha, hb) = (a.half_extents(), b.half_extents());
    let px = ha.x + hb.x - delta.x.abs();
    let py = ha.y + hb.y - delta.y.abs();
    let sign = |v: f32| if v < 0.0 { -1.0 } else { 1.0 };
    let (normal, penetration) = if px < py {
        (Vec2::new(sign(delta.x), 0.0), px)
    } else {
        (Vec2::new(0.0, sign(delta.y)), py)
    };
    let overlap_lo = a.min().max(&b.min());
    let overlap_hi = a.max().min(&b.max());
    Contact {
        normal,
        point: midpoint(overlap_lo, overlap_hi),
        penetration,
    }
}

fn convex_convex(a: &Shape, b: &Shape) -> Option<Contact> {
    let (va, vb) = (a.corners()?, b.corners()?);
    let (normal, penetration) = sat::min_translation(&va, &vb)?;
    Some(Contact {
        normal,
        point: midpoint(a.centroid()?, b.centroid()?),
        penetration,
    })
}

/// Resolves one contact between two bodies.
///
/// Holds exclusive access to both bodies for the duration of a resolution;
/// colliders are read-only.
#[derive(Debug)]
pub struct ContactSolver<'a> {
    body_a: &'a mut Body,
    collider_a: &'a Collider,
    body_b: &'a mut Body,
    collider_b: &'a Collider,
}

impl<'a> ContactSolver<'a> {
    /// Pairs two bodies with their colliders.
    pub fn new(
        body_a: &'a mut Body,
        collider_a: &'a Collider,
        body_b: &'a mut Body,
        collider_b: &'a Collider,
    ) -> Self {
        Self {
            body_a,
            collider_a,
            body_b,
            collider_b,
        }
    }

    /// Contact geometry of the two colliders in world space.
    pub fn calculate_contact_properties(&self) -> Option<Contact> {
        contact(
            &self.collider_a.world_shape(self.body_a),
            &self.collider_b.world_shape(self.body_b),
        )
    }

    /// Relative velocity of A with respect to B along the contact normal.
    pub fn separating_velocity(&self, contact: &Contact) -> f32 {
        (self.body_a.velocity - self.body_b.velocity).dot(&contact.normal)
    }

    /// Applies a restitution impulse along the normal.
    ///
    /// No-op when the bodies already separate or both are immovable.
    /// Restitution is the mass-weighted average of both colliders'.
    pub fn resolve_post_collision_velocity(&mut self, contact: &Contact) {
        let separating = self.separating_velocity(contact);
        if separating > 0.0 {
            return;
        }
        let total_inv = self.body_a.inv_mass() + self.body_b.inv_mass();
        if total_inv <= 0.0 {
            return;
        }
        let (ma, mb) = (self.body_a.mass(), self.body_b.mass());
        let restitution =
            (self.collider_a.restitution * ma + self.collider_b.restitution * mb) / (ma + mb);
        let target = -separating * restitution;
        let impulse = contact.normal * ((target - separating) / total_inv);
        if self.body_a.is_movable() {
            self.body_a.velocity += impulse * self.body_a.inv_mass();
        }
        if self.body_b.is_movable() {
            self.body_b.velocity -= impulse * self.body_b.inv_mass();
        }
    }

    /// Pushes the bodies apart by the penetration depth, split by inverse
    /// mass.
    pub fn resolve_post_collision_position(&mut self, contact: &Contact) {
        let total_inv = self.body_a.inv_mass() + self.body_b.inv_mass();
        if contact.penetration <= 0.0 || total_inv <= 0.0 {
            return;
        }
        let per_inv_mass = contact.normal * (contact.penetration / total_inv);
        if self.body_a.is_movable() {
            self.body_a.position += per_inv_mass * self.body_a.inv_mass();
        }
        if self.body_b.is_movable() {
            self.body_b.position -= per_inv_mass * self.body_b.inv_mass();
        }
    }

    /// Computes the contact and resolves velocity, then position.
    ///
    /// When A is immovable and B is movable the operands are swapped (and the
    /// normal negated) so the movable body is always resolved as A. Returns
    /// the contact as seen from the original A, or `None` if the shapes have
    /// no contact.
    pub fn resolve_contact(mut self) -> Option<Contact> {
        let contact = self.calculate_contact_properties()?;
        if !self.body_a.is_movable() && self.body_b.is_movable() {
            let mut swapped = ContactSolver::new(
                self.body_b,
                self.collider_b,
                self.body_a,
                self.collider_a,
            );
            let flipped = contact.flipped();
            swapped.resolve_post_collision_velocity(&flipped);
            swapped.resolve_post_collision_position(&flipped);
        } else {
            self.resolve_post_collision_velocity(&contact);
            self.resolve_post_collision_position(&contact);
        }
        trace!(
            nx = contact.normal.x,
            ny = contact.normal.y,
            penetration = contact.penetration,
            "contact resolved"
        );
        Some(contact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::BodyKind;
    use crate::handle::BodyHandle;

    fn circle(x: f32, y: f32, r: f32) -> Shape {
        Shape::circle(Vec2::new(x, y), r).expect("radius")
    }

    fn collider(shape: Shape) -> Collider {
        Collider::new(BodyHandle::from_raw_parts(0, 0)).with_shape(shape)
    }

    #[test]
    fn circle_circle_geometry() {
        let c = contact(&circle(0.75, 0.0, 0.5), &circle(0.0, 0.0, 0.5)).expect("contact");
        assert_eq!(c.normal, Vec2::UNIT_X);
        assert!((c.penetration - 0.25).abs() < 1e-6);
        assert_eq!(c.point, Vec2::new(1.125, 0.0));
    }

    #[test]
    fn coincident_circles_push_up() {
        let c = contact(&circle(1.0, 1.0, 0.5), &circle(1.0, 1.0, 0.5)).expect("contact");
        assert_eq!(c.normal, Vec2::UNIT_Y);
        assert_eq!(c.penetration, 1.0);
    }

    #[test]
    fn circle_rectangle_outside_and_inside() {
        let rect = Shape::rectangle(Vec2::new(-1.0, -1.0), Vec2::new(1.0, 1.0)).expect("rect");
        let c = contact(&circle(1.25, 0.0, 0.5), &rect).expect("contact");
        assert_eq!(c.normal, Vec2::UNIT_X);
        assert!((c.penetration - 0.25).abs() < 1e-6);
        assert_eq!(c.point, Vec2::new(1.0, 0.0));

        let inside = contact(&circle(0.0, 0.75, 0.5), &rect).expect("contact");
        assert_eq!(inside.normal, Vec2::UNIT_Y);
        assert!((inside.penetration - 0.75).abs() < 1e-6);

        let swapped = contact(&rect, &circle(1.25, 0.0, 0.5)).expect("contact");
        assert_eq!(swapped.normal, -Vec2::UNIT_X);
    }

    #[test]
    fn rectangle_rectangle_picks_shallow_axis() {
        let a = Shape::rectangle_centered(Vec2::new(0.0, 1.5), 1.0, 1.0);
        let b = Shape::rectangle_centered(Vec2::ZERO, 1.0, 1.0);
        let c = contact(&a, &b).expect("contact");
        assert_eq!(c.normal, Vec2::UNIT_Y);
        assert!((c.penetration - 0.5).abs() < 1e-6);
        assert_eq!(c.point, Vec2::new(0.0, 0.75));
    }

    fn square(cx: f32, h: f32) -> Shape {
        Shape::polygon(vec![
            Vec2::new(cx - h, -h),
            Vec2::new(cx + h, -h),
            Vec2::new(cx + h, h),
            Vec2::new(cx - h, h),
        ])
    }

    fn assert_close(actual: Vec2, expected: Vec2) {
        assert!(
            (actual - expected).length() < 1e-5,
            "{actual:?} != {expected:?}"
        );
    }

    #[test]
    fn polygon_rectangle_normal_points_at_first_operand() {
        let poly = square(1.5, 1.0);
        let rect = Shape::rectangle_centered(Vec2::ZERO, 1.0, 1.0);

        let c = contact(&poly, &rect).expect("contact");
        assert_close(c.normal, Vec2::UNIT_X);
        assert!((c.penetration - 0.5).abs() < 1e-6);
        assert_close(c.point, Vec2::new(0.75, 0.0));

        let swapped = contact(&rect, &poly).expect("contact");
        assert_close(swapped.normal, -Vec2::UNIT_X);
        assert!((swapped.penetration - 0.5).abs() < 1e-6);
    }

    #[test]
    fn polygon_polygon_uses_shallow_axis() {
        let upper = Shape::polygon(vec![
            Vec2::new(-1.0, 0.8),
            Vec2::new(1.0, 0.8),
            Vec2::new(0.0, 3.0),
        ]);
        let c = contact(&upper, &square(0.0, 1.0)).expect("contact");
        assert_close(c.normal, Vec2::UNIT_Y);
        assert!((c.penetration - 0.2).abs() < 1e-5);
        assert!(contact(&square(3.0, 1.0), &square(0.0, 1.0)).is_none());
    }

    #[test]
    fn circle_polygon_both_orders() {
        let poly = square(0.0, 1.0);
        let disc = circle(1.7, 0.0, 1.0);

        let c = contact(&disc, &poly).expect("contact");
        assert_close(c.normal, Vec2::UNIT_X);
        assert!((c.penetration - 0.3).abs() < 1e-5);
        assert_close(c.point, Vec2::new(0.85, 0.0));

        let swapped = contact(&poly, &disc).expect("contact");
        assert_close(swapped.normal, -Vec2::UNIT_X);
        assert!((swapped.penetration - 0.3).abs() < 1e-5);
        assert!(contact(&circle(2.5, 0.0, 1.0), &poly).is_none());
    }

    #[test]
    fn none_shape_has_no_contact() {
        assert!(contact(&Shape::None, &circle(0.0, 0.0, 1.0)).is_none());
    }

    #[test]
    fn head_on_equal_masses_exchange_velocity_when_elastic() {
        let mut a = Body::default();
        a.position = Vec2::new(0.75, 0.0);
        a.velocity = Vec2::new(-1.0, 0.0);
        let mut b = Body::default();
        b.velocity = Vec2::new(1.0, 0.0);
        let ca = collider(circle(0.0, 0.0, 0.5)).with_restitution(1.0);
        let cb = collider(circle(0.0, 0.0, 0.5)).with_restitution(1.0);
        let contact = ContactSolver::new(&mut a, &ca, &mut b, &cb)
            .resolve_contact()
            .expect("contact");
        assert_eq!(contact.normal, Vec2::UNIT_X);
        assert_eq!(a.velocity, Vec2::new(1.0, 0.0));
        assert_eq!(b.velocity, Vec2::new(-1.0, 0.0));
        // Penetration 0.25 split evenly.
        assert!((a.position.x - 0.875).abs() < 1e-6);
        assert!((b.position.x + 0.125).abs() < 1e-6);
    }

    #[test]
    fn separating_bodies_keep_velocity() {
        let mut a = Body::default();
        a.position = Vec2::new(0.75, 0.0);
        a.velocity = Vec2::new(1.0, 0.0);
        let mut b = Body::default();
        let ca = collider(circle(0.0, 0.0, 0.5));
        let cb = collider(circle(0.0, 0.0, 0.5));
        let mut solver = ContactSolver::new(&mut a, &ca, &mut b, &cb);
        let c = solver.calculate_contact_properties().expect("contact");
        assert!(solver.separating_velocity(&c) > 0.0);
        solver.resolve_post_collision_velocity(&c);
        assert_eq!(a.velocity, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn static_first_operand_is_swapped() {
        let mut ground = Body::new(1.0, BodyKind::Static).expect("mass");
        let mut ball = Body::default();
        ball.position = Vec2::new(0.0, 0.9);
        ball.velocity = Vec2::new(0.0, -2.0);
        let cg = collider(Shape::rectangle_centered(Vec2::ZERO, 5.0, 0.5));
        let cball = collider(circle(0.0, 0.0, 0.5));
        let c = ContactSolver::new(&mut ground, &cg, &mut ball, &cball)
            .resolve_contact()
            .expect("contact");
        // Seen from the ground: normal points from the ball down into it.
        assert_eq!(c.normal, Vec2::new(0.0, -1.0));
        assert_eq!(ground.position, Vec2::ZERO);
        assert_eq!(ground.velocity, Vec2::ZERO);
        assert_eq!(ball.velocity, Vec2::ZERO);
        assert!((ball.position.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn two_immovable_bodies_are_untouched() {
        let mut a = Body::new(1.0, BodyKind::Kinematic).expect("mass");
        a.velocity = Vec2::new(-1.0, 0.0);
        let mut b = Body::new(1.0, BodyKind::Static).expect("mass");
        let ca = collider(circle(0.5, 0.0, 0.5));
        let cb = collider(circle(0.0, 0.0, 0.5));
        ContactSolver::new(&mut a, &ca, &mut b, &cb).resolve_contact();
        assert_eq!(a.velocity, Vec2::new(-1.0, 0.0));
        assert_eq!(a.position, Vec2::ZERO);
    }
}
