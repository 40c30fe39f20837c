// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use crate::error::GeomError;
use crate::types::aabb::Aabb;
use crate::types::vec2::Vec2;

/// Discriminant of [`Shape`], used to dispatch on ordered shape pairs.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShapeKind {
    /// No geometry attached.
    None,
    /// [`Shape::Circle`].
    Circle,
    /// [`Shape::Rectangle`].
    Rectangle,
    /// [`Shape::Polygon`].
    Polygon,
}

/// Collision geometry, expressed either in collider-local space (as stored on
/// a collider) or in world space (after [`Shape::translated`]).
///
/// The variant set is closed: every dispatch site matches exhaustively, so a
/// new shape kind must be handled explicitly everywhere it flows.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Shape {
    /// Sentinel for "no geometry". Never overlaps anything.
    #[default]
    None,
    /// Disc with the given centre and radius.
    Circle {
        /// Centre of the disc.
        center: Vec2,
        /// Radius, non-negative.
        radius: f32,
    },
    /// Axis-aligned rectangle given by its corners.
    Rectangle {
        /// Minimum corner.
        min: Vec2,
        /// Maximum corner.
        max: Vec2,
    },
    /// Convex polygon. Winding may be either direction; fewer than three
    /// vertices never overlap anything.
    Polygon {
        /// Polygon vertices in order around the hull.
        vertices: Vec<Vec2>,
    },
}

impl Shape {
    /// Circle with a validated radius.
    pub fn circle(center: Vec2, radius: f32) -> Result<Self, GeomError> {
        if radius.is_finite() && radius >= 0.0 {
            Ok(Self::Circle { center, radius })
        } else {
            Err(GeomError::InvalidRadius(radius))
        }
    }

    /// Rectangle with validated corners.
    pub fn rectangle(min: Vec2, max: Vec2) -> Result<Self, GeomError> {
        let bb = Aabb::new(min, max)?;
        Ok(Self::from_aabb(&bb))
    }

    /// Rectangle centred on `center` with half-extents `hx, hy`.
    pub fn rectangle_centered(center: Vec2, hx: f32, hy: f32) -> Self {
        Self::from_aabb(&Aabb::from_center_half_extents(center, hx, hy))
    }

    /// Rectangle covering `bb`.
    pub fn from_aabb(bb: &Aabb) -> Self {
        Self::Rectangle {
            min: bb.min(),
            max: bb.max(),
        }
    }

    /// Convex polygon from its hull vertices.
    pub fn polygon(vertices: impl Into<Vec<Vec2>>) -> Self {
        Self::Polygon {
            vertices: vertices.into(),
        }
    }

    /// Variant discriminant.
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::None => ShapeKind::None,
            Self::Circle { .. } => ShapeKind::Circle,
            Self::Rectangle { .. } => ShapeKind::Rectangle,
            Self::Polygon { .. } => ShapeKind::Polygon,
        }
    }

    /// Returns the same shape moved by `offset`.
    pub fn translated(&self, offset: Vec2) -> Self {
        match self {
            Self::None => Self::None,
            Self::Circle { center, radius } => Self::Circle {
                center: center.add(&offset),
                radius: *radius,
            },
            Self::Rectangle { min, max } => Self::Rectangle {
                min: min.add(&offset),
                max: max.add(&offset),
            },
            Self::Polygon { vertices } => Self::Polygon {
                vertices: vertices.iter().map(|v| v.add(&offset)).collect(),
            },
        }
    }

    /// Simplified bounding box used by the broad phase.
    ///
    /// Circles map to the square of side `2·radius` around their centre;
    /// rectangles and polygons to their exact AABB. `None` (and empty
    /// polygons) have no bounds.
    pub fn aabb(&self) -> Option<Aabb> {
        match self {
            Self::None => None,
            Self::Circle { center, radius } => {
                Some(Aabb::from_center_half_extents(*center, *radius, *radius))
            }
            Self::Rectangle { min, max } => Some(Aabb::from_corners(*min, *max)),
            Self::Polygon { vertices } => Aabb::from_points(vertices),
        }
    }

    /// Reference point of the shape: circle centre, rectangle centre, or the
    /// vertex average of a polygon.
    pub fn centroid(&self) -> Option<Vec2> {
        match self {
            Self::None => None,
            Self::Circle { center, .. } => Some(*center),
            Self::Rectangle { min, max } => Some(Aabb::from_corners(*min, *max).center()),
            Self::Polygon { vertices } => {
                if vertices.is_empty() {
                    return None;
                }
                let sum = vertices.iter().fold(Vec2::ZERO, |acc, v| acc.add(v));
                Some(sum.scale(1.0 / vertices.len() as f32))
            }
        }
    }

    /// Vertices of the shape as a convex point set, if it has corners.
    ///
    /// Rectangles yield their four corners counter-clockwise from `min`.
    pub fn corners(&self) -> Option<Vec<Vec2>> {
        match self {
            Self::None | Self::Circle { .. } => None,
            Self::Rectangle { min, max } => {
                let bb = Aabb::from_corners(*min, *max);
                let (lo, hi) = (bb.min(), bb.max());
                Some(vec![
                    lo,
                    Vec2::new(hi.x, lo.y),
                    hi,
                    Vec2::new(lo.x, hi.y),
                ])
            }
            Self::Polygon { vertices } => Some(vertices.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_aabb_is_square_of_diameter() {
        let s = Shape::Circle {
            center: Vec2::new(1.0, 2.0),
            radius: 0.5,
        };
        let bb = s.aabb();
        assert_eq!(
            bb,
            Some(Aabb::from_corners(Vec2::new(0.5, 1.5), Vec2::new(1.5, 2.5)))
        );
    }

    #[test]
    fn none_has_no_bounds() {
        assert_eq!(Shape::None.aabb(), None);
        assert_eq!(Shape::None.kind(), ShapeKind::None);
        assert_eq!(Shape::polygon(Vec::new()).aabb(), None);
    }

    #[test]
    fn translated_moves_every_vertex() {
        let tri = Shape::polygon(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
        ]);
        let moved = tri.translated(Vec2::new(2.0, -1.0));
        assert_eq!(
            moved.aabb(),
            Some(Aabb::from_corners(Vec2::new(2.0, -1.0), Vec2::new(3.0, 0.0)))
        );
    }

    #[test]
    fn constructors_validate() {
        assert!(Shape::circle(Vec2::ZERO, -1.0).is_err());
        assert!(Shape::circle(Vec2::ZERO, f32::NAN).is_err());
        assert!(Shape::rectangle(Vec2::new(1.0, 1.0), Vec2::ZERO).is_err());
        assert_eq!(
            Shape::rectangle_centered(Vec2::ZERO, 1.0, 2.0),
            Shape::Rectangle {
                min: Vec2::new(-1.0, -2.0),
                max: Vec2::new(1.0, 2.0)
            }
        );
    }
}
