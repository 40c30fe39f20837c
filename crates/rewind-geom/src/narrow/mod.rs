// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Exact narrow-phase overlap tests.
//!
//! Inputs are world-space shapes. Overlap is strict: shapes that merely
//! touch do not overlap, which keeps resting contacts from flickering
//! between Enter and Exit.

#[doc = "Separating axis tests shared with the contact solver."]
pub mod sat;

use crate::types::shape::Shape;
use crate::types::vec2::Vec2;

/// Returns `true` when the two world-space shapes overlap.
///
/// Dispatches on the ordered pair of shape kinds; orderings without a
/// dedicated test are swapped once. Any pairing involving [`Shape::None`]
/// reports no overlap.
pub fn overlaps(a: &Shape, b: &Shape) -> bool {
    match (a, b) {
        (Shape::None, _) | (_, Shape::None) => false,
        (
            Shape::Circle {
                center: ca,
                radius: ra,
            },
            Shape::Circle {
                center: cb,
                radius: rb,
            },
        ) => circle_circle(*ca, *ra, *cb, *rb),
        (Shape::Circle { center, radius }, Shape::Rectangle { min, max }) => {
            circle_rectangle(*center, *radius, *min, *max)
        }
        (
            Shape::Rectangle {
                min: amin,
                max: amax,
            },
            Shape::Rectangle {
                min: bmin,
                max: bmax,
            },
        ) => rectangle_rectangle(*amin, *amax, *bmin, *bmax),
        (Shape::Polygon { vertices: va }, Shape::Polygon { vertices: vb }) => {
            sat::min_translation(va, vb).is_some()
        }
        (Shape::Polygon { vertices }, Shape::Rectangle { .. }) => b
            .corners()
            .is_some_and(|corners| sat::min_translation(vertices, &corners).is_some()),
        (Shape::Polygon { vertices }, Shape::Circle { center, radius }) => {
            sat::circle_polygon(*center, *radius, vertices).is_some()
        }
        (Shape::Rectangle { .. }, Shape::Circle { .. })
        | (Shape::Rectangle { .. } | Shape::Circle { .. }, Shape::Polygon { .. }) => {
            overlaps(b, a)
        }
    }
}

/// Circle–circle: centre distance against radius sum.
pub fn circle_circle(ca: Vec2, ra: f32, cb: Vec2, rb: f32) -> bool {
    let r = ra + rb;
    ca.sub(&cb).length_squared() < r * r
}

/// Circle–rectangle: closest point on the rectangle via per-axis clamping.
pub fn circle_rectangle(center: Vec2, radius: f32, min: Vec2, max: Vec2) -> bool {
    let closest = center.clamp(&min, &max);
    center.sub(&closest).length_squared() < radius * radius
}

/// Rectangle–rectangle: strict interval overlap on both axes.
pub fn rectangle_rectangle(amin: Vec2, amax: Vec2, bmin: Vec2, bmax: Vec2) -> bool {
    amin.x < bmax.x && bmin.x < amax.x && amin.y < bmax.y && bmin.y < amax.y
}
