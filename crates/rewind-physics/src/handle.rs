// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

use crate::body::Body;
use crate::collider::Collider;

/// Generational reference to a slot in a [`crate::World`] store.
///
/// A handle is valid while `generation` equals the live generation of the
/// slot at `index`. Destroying the slot bumps its generation, so every handle
/// captured before the destroy stops resolving and can never alias whatever
/// is created at the same index afterwards.
///
/// The type parameter only tags which store the handle belongs to; handles
/// are plain `Copy` values regardless of `T`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = ""))]
pub struct Handle<T> {
    index: u32,
    generation: u32,
    #[cfg_attr(feature = "serde", serde(skip))]
    _marker: PhantomData<fn() -> T>,
}

/// Handle to a [`Body`].
pub type BodyHandle = Handle<Body>;

/// Handle to a [`Collider`].
pub type ColliderHandle = Handle<Collider>;

impl<T> Handle<T> {
    /// Builds a handle from raw parts.
    ///
    /// Mostly useful for tests and for callers restoring handles from their
    /// own snapshots; the store still validates the generation on use.
    pub const fn from_raw_parts(index: u32, generation: u32) -> Self {
        Self {
            index,
            generation,
            _marker: PhantomData,
        }
    }

    /// Dense slot index.
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Generation the slot had when this handle was issued.
    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<T> PartialOrd for Handle<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Handle<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.index, self.generation).cmp(&(other.index, other.generation))
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}v{})", self.index, self.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_index_then_generation() {
        let a = BodyHandle::from_raw_parts(1, 5);
        let b = BodyHandle::from_raw_parts(2, 0);
        let c = BodyHandle::from_raw_parts(2, 1);
        assert!(a < b && b < c);
        assert_eq!(format!("{c:?}"), "Handle(2v1)");
    }
}
