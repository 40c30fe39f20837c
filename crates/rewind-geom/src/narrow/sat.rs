// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Separating axis tests for convex point sets and circles.
//!
//! Every function returns the minimum translation as `(normal, depth)` with
//! `normal` a unit vector pointing from the second operand towards the first,
//! or `None` when a separating axis exists. Touching (zero-depth) contact is
//! reported as separated.

use crate::types::vec2::Vec2;

/// Minimum polygon size that encloses area.
pub const MIN_POLYGON_VERTICES: usize = 3;

fn project(points: &[Vec2], axis: &Vec2) -> (f32, f32) {
    let mut lo = f32::INFINITY;
    let mut hi = f32::NEG_INFINITY;
    for p in points {
        let d = p.dot(axis);
        lo = lo.min(d);
        hi = hi.max(d);
    }
    (lo, hi)
}

fn centroid(points: &[Vec2]) -> Vec2 {
    let sum = points.iter().fold(Vec2::ZERO, |acc, v| acc.add(v));
    sum.scale(1.0 / points.len() as f32)
}

/// Unit edge normals of a closed polygon; zero-length edges are skipped.
fn edge_axes(points: &[Vec2]) -> impl Iterator<Item = Vec2> + '_ {
    let n = points.len();
    (0..n).filter_map(move |i| {
        let edge = points[(i + 1) % n].sub(&points[i]);
        let axis = edge.perp().normalize();
        (axis != Vec2::ZERO).then_some(axis)
    })
}

#[derive(Debug, Clone, Copy)]
struct Best {
    axis: Vec2,
    depth: f32,
}

impl Best {
    const fn new() -> Self {
        Self {
            axis: Vec2::ZERO,
            depth: f32::INFINITY,
        }
    }

    /// Folds one axis in; returns `false` once the axis separates the sets.
    fn consider(&mut self, axis: Vec2, a: (f32, f32), b: (f32, f32)) -> bool {
        let depth = (a.1 - b.0).min(b.1 - a.0);
        if depth <= 0.0 {
            return false;
        }
        if depth < self.depth {
            self.depth = depth;
            self.axis = axis;
        }
        true
    }

    fn oriented(self, from_b_to_a: Vec2) -> Option<(Vec2, f32)> {
        if !self.depth.is_finite() {
            return None;
        }
        let normal = if self.axis.dot(&from_b_to_a) < 0.0 {
            -self.axis
        } else {
            self.axis
        };
        Some((normal, self.depth))
    }
}

/// Minimum translation between two convex polygons.
pub fn min_translation(a: &[Vec2], b: &[Vec2]) -> Option<(Vec2, f32)> {
    if a.len() < MIN_POLYGON_VERTICES || b.len() < MIN_POLYGON_VERTICES {
        return None;
    }
    let mut best = Best::new();
    for axis in edge_axes(a).chain(edge_axes(b)) {
        if !best.consider(axis, project(a, &axis), project(b, &axis)) {
            return None;
        }
    }
    best.oriented(centroid(a).sub(&centroid(b)))
}

/// Minimum translation between a circle (first operand) and a convex polygon.
pub fn circle_polygon(center: Vec2, radius: f32, poly: &[Vec2]) -> Option<(Vec2, f32)> {
    if poly.len() < MIN_POLYGON_VERTICES {
        return None;
    }
    let circle = |axis: &Vec2| {
        let c = center.dot(axis);
        (c - radius, c + radius)
    };
    let mut best = Best::new();
    for axis in edge_axes(poly) {
        if !best.consider(axis, circle(&axis), project(poly, &axis)) {
            return None;
        }
    }
    // The Voronoi region of the nearest vertex adds one more candidate axis.
    let nearest = poly.iter().copied().fold(poly[0], |acc, v| {
        if v.sub(&center).length_squared() < acc.sub(&center).length_squared() {
            v
        } else {
            acc
        }
    });
    let axis = center.sub(&nearest).normalize();
    if axis != Vec2::ZERO && !best.consider(axis, circle(&axis), project(poly, &axis)) {
        return None;
    }
    best.oriented(center.sub(&centroid(poly)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(cx: f32, cy: f32, h: f32) -> Vec<Vec2> {
        vec![
            Vec2::new(cx - h, cy - h),
            Vec2::new(cx + h, cy - h),
            Vec2::new(cx + h, cy + h),
            Vec2::new(cx - h, cy + h),
        ]
    }

    #[test]
    fn overlapping_squares_report_shallowest_axis() {
        let a = square(1.5, 0.0, 1.0);
        let b = square(0.0, 0.0, 1.0);
        let (n, depth) = min_translation(&a, &b).unwrap_or((Vec2::ZERO, 0.0));
        assert_eq!(n, Vec2::UNIT_X);
        assert!((depth - 0.5).abs() < 1e-6);
    }

    #[test]
    fn winding_does_not_matter() {
        let a = square(0.0, 1.5, 1.0);
        let mut b = square(0.0, 0.0, 1.0);
        b.reverse();
        let (n, depth) = min_translation(&a, &b).unwrap_or((Vec2::ZERO, 0.0));
        assert_eq!(n, Vec2::UNIT_Y);
        assert!((depth - 0.5).abs() < 1e-6);
    }

    #[test]
    fn separated_and_touching_are_none() {
        assert!(min_translation(&square(3.0, 0.0, 1.0), &square(0.0, 0.0, 1.0)).is_none());
        assert!(min_translation(&square(2.0, 0.0, 1.0), &square(0.0, 0.0, 1.0)).is_none());
    }

    #[test]
    fn circle_near_corner_uses_vertex_axis() {
        let poly = square(0.0, 0.0, 1.0);
        // Diagonal from the (1,1) corner: distance ≈ 0.707 > radius 0.5.
        assert!(circle_polygon(Vec2::new(1.5, 1.5), 0.5, &poly).is_none());
        let hit = circle_polygon(Vec2::new(1.3, 1.3), 0.5, &poly);
        assert!(hit.is_some());
    }

    #[test]
    fn degenerate_polygons_never_hit() {
        let line = vec![Vec2::ZERO, Vec2::UNIT_X];
        assert!(min_translation(&line, &square(0.0, 0.0, 1.0)).is_none());
        assert!(circle_polygon(Vec2::ZERO, 1.0, &line).is_none());
    }
}
