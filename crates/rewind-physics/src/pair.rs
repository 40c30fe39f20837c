// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use crate::handle::ColliderHandle;

/// Unordered pair of colliders.
///
/// Stored canonically (`first <= second`), so the derived equality and
/// hashing are pair-symmetric.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColliderPair {
    a: ColliderHandle,
    b: ColliderHandle,
}

impl ColliderPair {
    /// Builds the canonical pair of `x` and `y`.
    pub fn new(x: ColliderHandle, y: ColliderHandle) -> Self {
        if x <= y {
            Self { a: x, b: y }
        } else {
            Self { a: y, b: x }
        }
    }

    /// Smaller handle.
    pub fn first(&self) -> ColliderHandle {
        self.a
    }

    /// Larger handle.
    pub fn second(&self) -> ColliderHandle {
        self.b
    }

    /// Returns `true` if either side is `handle`.
    pub fn contains(&self, handle: ColliderHandle) -> bool {
        self.a == handle || self.b == handle
    }

    /// The side that is not `handle`, or `None` if `handle` is not in the pair.
    pub fn other(&self, handle: ColliderHandle) -> Option<ColliderHandle> {
        if self.a == handle {
            Some(self.b)
        } else if self.b == handle {
            Some(self.a)
        } else {
            None
        }
    }
}
