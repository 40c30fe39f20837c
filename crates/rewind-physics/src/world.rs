// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use std::fmt;

use rewind_geom::narrow::overlaps;
use rewind_geom::{Aabb, QuadTree, Vec2};
use rustc_hash::FxHashSet;
use tracing::{debug, instrument, trace, trace_span, warn};

use crate::arena::Arena;
use crate::body::Body;
use crate::collider::Collider;
use crate::config::WorldConfig;
use crate::digest::{world_hash, StateHash};
use crate::error::PhysicsError;
use crate::handle::{BodyHandle, ColliderHandle};
use crate::listener::{ContactListener, SharedListener};
use crate::pair::ColliderPair;
use crate::solver::{Contact, ContactSolver};

/// A pair that overlapped during the last narrow phase.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct LivePair {
    pair: ColliderPair,
    trigger: bool,
}

/// Transition counts for one narrow phase, for tracing.
#[derive(Debug, Default)]
struct Transitions {
    enter: usize,
    stay: usize,
    exit: usize,
}

/// Owns every body, collider, and the broad-phase index, and advances them.
///
/// `Clone` produces a fully independent copy of the simulation state (the
/// registered listener is shared, not duplicated). Stepping a clone and the
/// original with identical input yields bit-identical results.
#[derive(Clone)]
pub struct World {
    config: WorldConfig,
    gravity: Vec2,
    bodies: Arena<Body>,
    colliders: Arena<Collider>,
    quad_tree: QuadTree<ColliderHandle>,
    live_pairs: Vec<LivePair>,
    live_set: FxHashSet<ColliderPair>,
    listener: Option<SharedListener>,
    step_count: u64,
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("gravity", &self.gravity)
            .field("bodies", &self.bodies.len())
            .field("colliders", &self.colliders.len())
            .field("live_pairs", &self.live_pairs.len())
            .field("has_listener", &self.listener.is_some())
            .field("step_count", &self.step_count)
            .finish_non_exhaustive()
    }
}

impl World {
    /// Creates an empty world.
    #[instrument(level = "debug")]
    pub fn new(config: WorldConfig) -> Self {
        debug!(
            bodies = config.preallocated_bodies,
            colliders = config.preallocated_colliders,
            "world created"
        );
        Self {
            gravity: config.gravity,
            bodies: Arena::with_slots(config.preallocated_bodies, config.growth_factor),
            colliders: Arena::with_slots(config.preallocated_colliders, config.growth_factor),
            quad_tree: QuadTree::new(config.quad_tree),
            live_pairs: Vec::new(),
            live_set: FxHashSet::default(),
            listener: None,
            step_count: 0,
            config,
        }
    }

    /// Creates a world with `gravity` and `preallocated` free slots in both
    /// stores.
    pub fn with_gravity(gravity: Vec2, preallocated: usize) -> Self {
        Self::new(
            WorldConfig::default()
                .with_gravity(gravity)
                .with_preallocated(preallocated),
        )
    }

    /// Configuration the world was built with.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    // ── Bodies ──────────────────────────────────────────────────────────

    /// Creates a unit-mass dynamic body at rest at the origin.
    pub fn create_body(&mut self) -> BodyHandle {
        let handle = self.bodies.insert(Body::default());
        debug!(?handle, "body created");
        handle
    }

    /// Stores a prepared body.
    pub fn insert_body(&mut self, body: Body) -> Result<BodyHandle, PhysicsError> {
        if !body.is_valid() {
            return Err(PhysicsError::InvalidMass(body.mass()));
        }
        let handle = self.bodies.insert(body);
        debug!(?handle, "body inserted");
        Ok(handle)
    }

    /// Destroys a body and returns its last state.
    ///
    /// Colliders attached to it are left in place; the broad phase skips
    /// them until they are destroyed too.
    #[instrument(level = "debug", skip(self))]
    pub fn destroy_body(&mut self, handle: BodyHandle) -> Result<Body, PhysicsError> {
        self.bodies
            .remove(handle)
            .ok_or_else(|| self.stale_body(handle))
    }

    /// Resolves a body handle.
    pub fn body(&self, handle: BodyHandle) -> Result<&Body, PhysicsError> {
        self.bodies.get(handle).ok_or_else(|| self.stale_body(handle))
    }

    /// Resolves a body handle for mutation.
    pub fn body_mut(&mut self, handle: BodyHandle) -> Result<&mut Body, PhysicsError> {
        let err = self.stale_body(handle);
        self.bodies.get_mut(handle).ok_or(err)
    }

    /// Returns `true` if `handle` refers to a live body.
    pub fn contains_body(&self, handle: BodyHandle) -> bool {
        self.bodies.contains(handle)
    }

    /// Number of live bodies.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Live bodies in index order.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &Body)> + '_ {
        self.bodies.iter()
    }

    fn stale_body(&self, handle: BodyHandle) -> PhysicsError {
        PhysicsError::StaleBody {
            index: handle.index(),
            generation: handle.generation(),
            live: self.bodies.generation_at(handle.index()),
        }
    }

    // ── Colliders ───────────────────────────────────────────────────────

    /// Creates an enabled, shapeless collider attached to `body`.
    pub fn create_collider(&mut self, body: BodyHandle) -> Result<ColliderHandle, PhysicsError> {
        self.insert_collider(Collider::new(body))
    }

    /// Stores a prepared collider after checking its owning body is live.
    pub fn insert_collider(&mut self, collider: Collider) -> Result<ColliderHandle, PhysicsError> {
        let body = collider.body();
        if !self.bodies.contains(body) {
            return Err(self.stale_body(body));
        }
        let handle = self.colliders.insert(collider);
        debug!(?handle, ?body, "collider created");
        Ok(handle)
    }

    /// Destroys a collider and returns its last state.
    ///
    /// A pair it was part of reports its exit on the next step.
    #[instrument(level = "debug", skip(self))]
    pub fn destroy_collider(&mut self, handle: ColliderHandle) -> Result<Collider, PhysicsError> {
        self.colliders
            .remove(handle)
            .ok_or_else(|| self.stale_collider(handle))
    }

    /// Resolves a collider handle.
    pub fn collider(&self, handle: ColliderHandle) -> Result<&Collider, PhysicsError> {
        self.colliders
            .get(handle)
            .ok_or_else(|| self.stale_collider(handle))
    }

    /// Resolves a collider handle for mutation.
    pub fn collider_mut(&mut self, handle: ColliderHandle) -> Result<&mut Collider, PhysicsError> {
        let err = self.stale_collider(handle);
        self.colliders.get_mut(handle).ok_or(err)
    }

    /// Number of live colliders.
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Live colliders in index order.
    pub fn colliders(&self) -> impl Iterator<Item = (ColliderHandle, &Collider)> + '_ {
        self.colliders.iter()
    }

    fn stale_collider(&self, handle: ColliderHandle) -> PhysicsError {
        PhysicsError::StaleCollider {
            index: handle.index(),
            generation: handle.generation(),
            live: self.colliders.generation_at(handle.index()),
        }
    }

    // ── Globals ─────────────────────────────────────────────────────────

    /// Sets gravity.
    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    /// Current gravity.
    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    /// Registers the listener, replacing any previous one. Collision
    /// detection only runs while a listener is registered.
    pub fn set_contact_listener(&mut self, listener: SharedListener) {
        debug!(replaced = self.listener.is_some(), "contact listener set");
        self.listener = Some(listener);
    }

    /// Unregisters the listener and returns it.
    pub fn clear_contact_listener(&mut self) -> Option<SharedListener> {
        debug!("contact listener cleared");
        self.listener.take()
    }

    /// Registered listener, if any.
    pub fn contact_listener(&self) -> Option<&SharedListener> {
        self.listener.as_ref()
    }

    /// Broad-phase index as built by the last collision pass.
    pub fn quad_tree(&self) -> &QuadTree<ColliderHandle> {
        &self.quad_tree
    }

    /// Pairs that overlapped during the last collision pass.
    pub fn live_pairs(&self) -> impl ExactSizeIterator<Item = ColliderPair> + '_ {
        self.live_pairs.iter().map(|live| live.pair)
    }

    /// Number of completed steps.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Digest of the simulation state: config, gravity, every store slot, and
    /// the live pairs with their trigger flags.
    ///
    /// Two worlds with equal hashes step identically under identical input.
    /// The step counter and the registered listener are left out.
    pub fn state_hash(&self) -> StateHash {
        world_hash(
            &self.config,
            self.gravity,
            &self.bodies,
            &self.colliders,
            self.live_pairs.iter().map(|live| (live.pair, live.trigger)),
        )
    }

    // ── Stepping ────────────────────────────────────────────────────────

    /// Advances the simulation by `dt` seconds.
    ///
    /// Integrates every body, then, if a listener is registered, runs the
    /// broad and narrow phases and reports transitions to it. Without a
    /// listener no collision work is done at all.
    pub fn update(&mut self, dt: f32) {
        let span = trace_span!("world.update", step = self.step_count, dt);
        let _enter = span.enter();
        self.integrate(dt);
        if let Some(listener) = self.listener.clone() {
            match listener.try_borrow_mut() {
                Ok(mut guard) => self.detect_collisions(&mut *guard),
                Err(_) => warn!("contact listener is already borrowed; collisions skipped"),
            }
        }
        self.step_count += 1;
    }

    /// Like [`World::update`] but reports to `listener` for this step,
    /// bypassing (and regardless of) the registered one.
    pub fn update_with(&mut self, dt: f32, listener: &mut dyn ContactListener) {
        let span = trace_span!("world.update", step = self.step_count, dt);
        let _enter = span.enter();
        self.integrate(dt);
        self.detect_collisions(listener);
        self.step_count += 1;
    }

    /// Integrates every live body in index order.
    pub fn integrate(&mut self, dt: f32) {
        let gravity = self.gravity;
        for (_, body) in self.bodies.iter_mut() {
            body.integrate(gravity, dt);
        }
    }

    fn detect_collisions(&mut self, listener: &mut dyn ContactListener) {
        let candidates = self.resolve_broad_phase();
        self.resolve_narrow_phase(&candidates, listener);
    }

    /// Rebuilds the quad-tree from enabled colliders and returns candidate
    /// pairs.
    ///
    /// Colliders that are disabled, shapeless, or attached to a destroyed
    /// body are left out. The root boundary is the union of the inserted
    /// bounding boxes.
    pub fn resolve_broad_phase(&mut self) -> Vec<(ColliderHandle, ColliderHandle)> {
        let mut entries: Vec<(ColliderHandle, Aabb)> = Vec::with_capacity(self.colliders.len());
        for (handle, collider) in self.colliders.iter() {
            if !collider.enabled {
                continue;
            }
            let Some(body) = self.bodies.get(collider.body()) else {
                continue;
            };
            if let Some(bounds) = collider.world_aabb(body) {
                entries.push((handle, bounds));
            }
        }
        let boundary = entries
            .iter()
            .map(|(_, bounds)| *bounds)
            .reduce(|acc, bounds| acc.union(&bounds))
            .unwrap_or_default();
        self.quad_tree.reset(boundary);
        for (handle, bounds) in &entries {
            self.quad_tree.insert(*bounds, *handle);
        }
        let candidates = self.quad_tree.calculate_possible_pairs();
        trace!(
            colliders = entries.len(),
            candidates = candidates.len(),
            "broad phase"
        );
        candidates
    }

    /// Runs exact tests on `candidates`, resolves contacts, and reports
    /// Enter/Stay/Exit transitions against the previous pass.
    ///
    /// Enter and Stay are reported in candidate order, then Exit in the order
    /// the pairs were found last time. Colliders on the same body never
    /// pair.
    pub fn resolve_narrow_phase(
        &mut self,
        candidates: &[(ColliderHandle, ColliderHandle)],
        listener: &mut dyn ContactListener,
    ) {
        let mut current = Vec::with_capacity(candidates.len());
        let mut current_set =
            FxHashSet::with_capacity_and_hasher(candidates.len(), Default::default());
        let mut counts = Transitions::default();

        for &(x, y) in candidates {
            let Some(trigger) = self.overlapping(x, y) else {
                continue;
            };
            let pair = ColliderPair::new(x, y);
            if !current_set.insert(pair) {
                continue;
            }
            current.push(LivePair { pair, trigger });
            let (a, b) = (pair.first(), pair.second());
            if self.live_set.contains(&pair) {
                counts.stay += 1;
                if trigger {
                    listener.on_trigger_stay(a, b);
                } else {
                    self.resolve_pair(a, b);
                }
            } else {
                counts.enter += 1;
                if trigger {
                    listener.on_trigger_enter(a, b);
                } else {
                    self.resolve_pair(a, b);
                    listener.on_collision_enter(a, b);
                }
            }
        }

        let previous = std::mem::take(&mut self.live_pairs);
        for live in previous {
            if current_set.contains(&live.pair) {
                continue;
            }
            counts.exit += 1;
            let (a, b) = (live.pair.first(), live.pair.second());
            if live.trigger {
                listener.on_trigger_exit(a, b);
            } else {
                self.resolve_pair(a, b);
                listener.on_collision_exit(a, b);
            }
        }

        trace!(
            live = current.len(),
            enter = counts.enter,
            stay = counts.stay,
            exit = counts.exit,
            "narrow phase"
        );
        self.live_pairs = current;
        self.live_set = current_set;
    }

    /// Exact overlap test between two colliders in their current placement.
    ///
    /// Pairs on the same body, and pairs involving a shapeless collider,
    /// never overlap.
    pub fn detect_overlap(
        &self,
        a: ColliderHandle,
        b: ColliderHandle,
    ) -> Result<bool, PhysicsError> {
        let ca = self.collider(a)?;
        let cb = self.collider(b)?;
        if ca.body() == cb.body() {
            return Ok(false);
        }
        let ba = self.body(ca.body())?;
        let bb = self.body(cb.body())?;
        Ok(overlaps(&ca.world_shape(ba), &cb.world_shape(bb)))
    }

    /// `Some(is_trigger_pair)` when both colliders resolve and overlap.
    fn overlapping(&self, a: ColliderHandle, b: ColliderHandle) -> Option<bool> {
        if !self.detect_overlap(a, b).ok()? {
            return None;
        }
        let trigger = self.colliders.get(a)?.trigger || self.colliders.get(b)?.trigger;
        Some(trigger)
    }

    /// Runs the contact solver on a pair; `None` if either side no longer
    /// resolves.
    fn resolve_pair(&mut self, a: ColliderHandle, b: ColliderHandle) -> Option<Contact> {
        let ca = self.colliders.get(a)?;
        let cb = self.colliders.get(b)?;
        let (body_a, body_b) = self.bodies.get2_mut(ca.body(), cb.body())?;
        ContactSolver::new(body_a, ca, body_b, cb).resolve_contact()
    }
}
