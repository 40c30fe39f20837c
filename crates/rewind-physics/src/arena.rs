// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Dense generational storage for bodies and colliders.
//!
//! Slots are never removed from the backing vector; a destroyed slot is reset
//! to its vacant value and its generation is bumped. Liveness is tracked by the
//! arena itself, never read back from slot contents, so nothing written through
//! a `&mut T` can free or leak a slot. Allocation always takes
//! the lowest free index, so the index/generation sequence observed by callers
//! is identical to a linear scan for the first vacant slot.

use std::collections::BTreeSet;

use tracing::debug;

use crate::handle::Handle;

/// Storage element with a distinguished "free" value.
pub(crate) trait Slot {
    /// The value a slot holds while free.
    fn vacant() -> Self;
}

/// Growable arena of `T` addressed by [`Handle<T>`].
///
/// Everything lives in plain vectors and a `BTreeSet`, so `Clone` is a full
/// deep copy; world snapshots rely on that.
#[derive(Debug, Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<T>,
    generations: Vec<u32>,
    occupied: Vec<bool>,
    free: BTreeSet<u32>,
    growth_factor: usize,
    live: usize,
}

impl<T: Slot> Arena<T> {
    /// Creates an arena with `slots` vacant slots preallocated.
    ///
    /// `growth_factor` is the capacity multiplier applied when no free slot
    /// remains; values below 2 still grow by at least one slot.
    pub fn with_slots(slots: usize, growth_factor: usize) -> Self {
        let mut arena = Self {
            slots: Vec::with_capacity(slots),
            generations: Vec::with_capacity(slots),
            occupied: Vec::with_capacity(slots),
            free: BTreeSet::new(),
            growth_factor,
            live: 0,
        };
        arena.extend_vacant(slots);
        arena
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Total slots, live or free.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Current generation of the slot at `index`, if the slot exists.
    pub fn generation_at(&self, index: u32) -> Option<u32> {
        self.generations.get(index as usize).copied()
    }

    /// Stores `value` in the lowest free slot, growing storage when full.
    pub fn insert(&mut self, value: T) -> Handle<T> {
        let index = match self.free.pop_first() {
            Some(index) => index,
            None => self.grow(),
        };
        let i = index as usize;
        self.slots[i] = value;
        self.occupied[i] = true;
        self.live += 1;
        Handle::from_raw_parts(index, self.generations[i])
    }

    /// Frees the slot behind `handle`, returning its previous value.
    ///
    /// Returns `None` (and changes nothing) for stale handles.
    pub fn remove(&mut self, handle: Handle<T>) -> Option<T> {
        if !self.contains(handle) {
            return None;
        }
        let i = handle.index() as usize;
        let old = std::mem::replace(&mut self.slots[i], T::vacant());
        self.generations[i] = self.generations[i].wrapping_add(1);
        self.occupied[i] = false;
        self.free.insert(handle.index());
        self.live -= 1;
        Some(old)
    }

    /// Returns `true` when `handle` refers to a live object.
    pub fn contains(&self, handle: Handle<T>) -> bool {
        let i = handle.index() as usize;
        self.generations.get(i) == Some(&handle.generation()) && self.occupied[i]
    }

    /// Resolves `handle` to a shared reference.
    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        if self.contains(handle) {
            self.slots.get(handle.index() as usize)
        } else {
            None
        }
    }

    /// Resolves `handle` to an exclusive reference.
    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        if self.contains(handle) {
            self.slots.get_mut(handle.index() as usize)
        } else {
            None
        }
    }

    /// Resolves two distinct handles to exclusive references at once.
    ///
    /// Returns `None` if either handle is stale or both name the same slot.
    pub fn get2_mut(&mut self, a: Handle<T>, b: Handle<T>) -> Option<(&mut T, &mut T)> {
        if a.index() == b.index() || !self.contains(a) || !self.contains(b) {
            return None;
        }
        let (ia, ib) = (a.index() as usize, b.index() as usize);
        if ia < ib {
            let (lo, hi) = self.slots.split_at_mut(ib);
            Some((&mut lo[ia], &mut hi[0]))
        } else {
            let (lo, hi) = self.slots.split_at_mut(ia);
            Some((&mut hi[0], &mut lo[ib]))
        }
    }

    /// Live objects in index order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> + '_ {
        self.slots
            .iter()
            .zip(&self.generations)
            .zip(&self.occupied)
            .enumerate()
            .filter(|(_, (_, occupied))| **occupied)
            .map(|(i, ((slot, generation), _))| {
                (Handle::from_raw_parts(i as u32, *generation), slot)
            })
    }

    /// Live objects in index order, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Handle<T>, &mut T)> + '_ {
        self.slots
            .iter_mut()
            .zip(&self.generations)
            .zip(&self.occupied)
            .enumerate()
            .filter(|(_, (_, occupied))| **occupied)
            .map(|(i, ((slot, generation), _))| {
                (Handle::from_raw_parts(i as u32, *generation), slot)
            })
    }

    /// Every slot with its generation and occupancy, live or free, in index
    /// order.
    pub(crate) fn raw_slots(&self) -> impl Iterator<Item = (&T, u32, bool)> + '_ {
        self.slots
            .iter()
            .zip(&self.generations)
            .zip(&self.occupied)
            .map(|((slot, generation), occupied)| (slot, *generation, *occupied))
    }

    fn extend_vacant(&mut self, additional: usize) {
        let start = self.slots.len();
        for i in start..start + additional {
            self.slots.push(T::vacant());
            self.generations.push(0);
            self.occupied.push(false);
            self.free.insert(i as u32);
        }
    }

    /// Grows by the growth factor and returns the first new index, which the
    /// caller claims immediately.
    fn grow(&mut self) -> u32 {
        let old = self.slots.len();
        let new = old.saturating_mul(self.growth_factor).max(old + 1);
        debug!(from = old, to = new, "arena grow");
        self.extend_vacant(new - old);
        self.free.remove(&(old as u32));
        old as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Cell(i32);

    impl Slot for Cell {
        fn vacant() -> Self {
            Self(0)
        }
    }

    #[test]
    fn reuses_lowest_free_index_with_bumped_generation() {
        let mut arena = Arena::with_slots(0, 2);
        let a = arena.insert(Cell(1));
        assert_eq!((a.index(), a.generation()), (0, 0));
        assert_eq!(arena.remove(a), Some(Cell(1)));
        let b = arena.insert(Cell(2));
        assert_eq!((b.index(), b.generation()), (0, 1));
        assert!(arena.get(a).is_none());
        assert_eq!(arena.get(b), Some(&Cell(2)));
    }

    #[test]
    fn growth_doubles_capacity() {
        let mut arena = Arena::with_slots(2, 2);
        for i in 1..=3 {
            arena.insert(Cell(i));
        }
        assert_eq!(arena.capacity(), 4);
        assert_eq!(arena.len(), 3);
        arena.insert(Cell(4));
        arena.insert(Cell(5));
        assert_eq!(arena.capacity(), 8);
    }

    #[test]
    fn remove_stale_is_noop() {
        let mut arena = Arena::with_slots(1, 2);
        let a = arena.insert(Cell(7));
        assert!(arena.remove(a).is_some());
        assert!(arena.remove(a).is_none());
        assert_eq!(arena.generation_at(0), Some(1));
        assert_eq!(arena.len(), 0);
    }

    #[test]
    fn forged_handle_to_vacant_slot_is_rejected() {
        let arena: Arena<Cell> = Arena::with_slots(4, 2);
        assert!(!arena.contains(Handle::from_raw_parts(2, 0)));
        assert!(!arena.contains(Handle::from_raw_parts(99, 0)));
    }

    #[test]
    fn overwriting_with_vacant_value_keeps_slot_live() {
        let mut arena = Arena::with_slots(0, 2);
        let a = arena.insert(Cell(1));
        *arena.get_mut(a).expect("live") = Cell::vacant();
        assert!(arena.contains(a));
        assert_eq!(arena.len(), 1);
        assert_eq!(arena.iter().count(), 1);
        assert_eq!(arena.remove(a), Some(Cell(0)));
        let b = arena.insert(Cell(2));
        assert_eq!((b.index(), b.generation()), (0, 1));
    }

    #[test]
    fn get2_mut_rejects_aliasing() {
        let mut arena = Arena::with_slots(0, 2);
        let a = arena.insert(Cell(1));
        let b = arena.insert(Cell(2));
        assert!(arena.get2_mut(a, a).is_none());
        if let Some((x, y)) = arena.get2_mut(b, a) {
            x.0 = 20;
            y.0 = 10;
        }
        assert_eq!(arena.get(a), Some(&Cell(10)));
        assert_eq!(arena.get(b), Some(&Cell(20)));
    }

    #[test]
    fn iteration_follows_index_order() {
        let mut arena = Arena::with_slots(0, 2);
        let handles: Vec<_> = (1..=5).map(|i| arena.insert(Cell(i))).collect();
        arena.remove(handles[1]);
        let seen: Vec<i32> = arena.iter().map(|(_, c)| c.0).collect();
        assert_eq!(seen, vec![1, 3, 4, 5]);
    }
}
