// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use crate::error::GeomError;
use crate::types::vec2::Vec2;

/// Axis-aligned bounding rectangle in world coordinates.
///
/// Invariants:
/// - `min` components are less than or equal to `max` components.
/// - Values are `f32` world units.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    min: Vec2,
    max: Vec2,
}

impl Default for Aabb {
    fn default() -> Self {
        Self {
            min: Vec2::ZERO,
            max: Vec2::ZERO,
        }
    }
}

impl Aabb {
    /// Constructs an AABB from its minimum and maximum corners.
    ///
    /// Returns [`GeomError::InvalidAabb`] if any component of `min` exceeds its
    /// counterpart in `max`, or either corner is not finite.
    pub fn new(min: Vec2, max: Vec2) -> Result<Self, GeomError> {
        if min.is_finite() && max.is_finite() && min.x <= max.x && min.y <= max.y {
            Ok(Self { min, max })
        } else {
            Err(GeomError::InvalidAabb { min, max })
        }
    }

    /// Builds the AABB spanning two arbitrary corners, ordering components.
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(&b),
            max: a.max(&b),
        }
    }

    /// Returns the minimum corner.
    pub fn min(&self) -> Vec2 {
        self.min
    }

    /// Returns the maximum corner.
    pub fn max(&self) -> Vec2 {
        self.max
    }

    /// Builds an AABB centered at `center` with half-extents `hx, hy`.
    ///
    /// Negative half-extents are taken by magnitude.
    pub fn from_center_half_extents(center: Vec2, hx: f32, hy: f32) -> Self {
        let he = Vec2::new(hx.abs(), hy.abs());
        Self {
            min: center.sub(&he),
            max: center.add(&he),
        }
    }

    /// Centre point.
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            0.5 * (self.min.x + self.max.x),
            0.5 * (self.min.y + self.max.y),
        )
    }

    /// Half-extents along each axis.
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(
            0.5 * (self.max.x - self.min.x),
            0.5 * (self.max.y - self.min.y),
        )
    }

    /// Width and height.
    pub fn size(&self) -> Vec2 {
        self.max.sub(&self.min)
    }

    /// Returns `true` if this AABB overlaps another (inclusive on faces).
    pub fn overlaps(&self, other: &Self) -> bool {
        // Inclusive so touching boxes still reach the narrow phase.
        !(self.max.x < other.min.x
            || self.min.x > other.max.x
            || self.max.y < other.min.y
            || self.min.y > other.max.y)
    }

    /// Returns `true` if `other` lies entirely inside this box (inclusive).
    pub fn contains(&self, other: &Self) -> bool {
        other.min.x >= self.min.x
            && other.max.x <= self.max.x
            && other.min.y >= self.min.y
            && other.max.y <= self.max.y
    }

    /// Returns the union of two AABBs.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(&other.min),
            max: self.max.max(&other.max),
        }
    }

    /// Returns the box moved by `offset`.
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            min: self.min.add(&offset),
            max: self.max.add(&offset),
        }
    }

    /// Splits the box into four equal quadrants around its centre.
    ///
    /// Order: `[NW, NE, SW, SE]` with +Y up. Shared edges belong to every
    /// quadrant touching them (containment is inclusive).
    pub fn quadrants(&self) -> [Self; 4] {
        let c = self.center();
        let h = self.half_extents();
        let q = h.scale(0.5);
        [
            Self::from_center_half_extents(Vec2::new(c.x - q.x, c.y + q.y), q.x, q.y),
            Self::from_center_half_extents(Vec2::new(c.x + q.x, c.y + q.y), q.x, q.y),
            Self::from_center_half_extents(Vec2::new(c.x - q.x, c.y - q.y), q.x, q.y),
            Self::from_center_half_extents(Vec2::new(c.x + q.x, c.y - q.y), q.x, q.y),
        ]
    }

    /// Builds the minimal AABB that contains all `points`.
    ///
    /// Returns `None` if `points` is empty.
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut min = *first;
        let mut max = *first;
        for p in rest {
            min = min.min(p);
            max = max.max(p);
        }
        Some(Self { min, max })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_inverted_corners() {
        let err = Aabb::new(Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0));
        assert!(matches!(err, Err(GeomError::InvalidAabb { .. })));
        assert!(Aabb::new(Vec2::ZERO, Vec2::ZERO).is_ok());
    }

    #[test]
    fn new_rejects_non_finite_corners() {
        let inf = Vec2::new(f32::INFINITY, 0.0);
        assert!(Aabb::new(Vec2::ZERO, inf).is_err());
        assert!(Aabb::new(Vec2::new(f32::NAN, 0.0), Vec2::splat(1.0)).is_err());
        assert!(Aabb::new(-inf, Vec2::ZERO).is_err());
    }

    #[test]
    fn touching_faces_overlap() {
        let a = Aabb::from_center_half_extents(Vec2::ZERO, 1.0, 1.0);
        let b = Aabb::from_center_half_extents(Vec2::new(2.0, 0.0), 1.0, 1.0);
        let c = Aabb::from_center_half_extents(Vec2::new(2.5, 0.0), 1.0, 1.0);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn quadrants_tile_parent() {
        let parent = Aabb::from_corners(Vec2::new(0.0, 0.0), Vec2::new(4.0, 2.0));
        let [nw, ne, sw, se] = parent.quadrants();
        assert_eq!(nw.min(), Vec2::new(0.0, 1.0));
        assert_eq!(nw.max(), Vec2::new(2.0, 2.0));
        assert_eq!(ne.min(), Vec2::new(2.0, 1.0));
        assert_eq!(sw.max(), Vec2::new(2.0, 1.0));
        assert_eq!(se.max(), Vec2::new(4.0, 1.0));
        let all = nw.union(&ne).union(&sw).union(&se);
        assert_eq!(all, parent);
    }

    #[test]
    fn from_points_empty_is_none() {
        assert!(Aabb::from_points(&[]).is_none());
        let bb = Aabb::from_points(&[Vec2::new(1.0, -1.0), Vec2::new(-2.0, 3.0)]);
        assert_eq!(
            bb,
            Some(Aabb::from_corners(Vec2::new(-2.0, -1.0), Vec2::new(1.0, 3.0)))
        );
    }
}
