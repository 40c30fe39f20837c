// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Contact callbacks.
//!
//! The world reports overlap transitions to a single registered listener.
//! A pair counts as a trigger pair when either collider is a trigger; every
//! other pair is a collision pair. Each callback fires at most once per pair
//! per transition per step.

use std::cell::RefCell;
use std::rc::Rc;

use crate::handle::ColliderHandle;

/// Receiver for overlap transitions. All methods default to no-ops.
pub trait ContactListener {
    /// A trigger pair started overlapping.
    fn on_trigger_enter(&mut self, _a: ColliderHandle, _b: ColliderHandle) {}
    /// A trigger pair is still overlapping.
    fn on_trigger_stay(&mut self, _a: ColliderHandle, _b: ColliderHandle) {}
    /// A trigger pair stopped overlapping.
    fn on_trigger_exit(&mut self, _a: ColliderHandle, _b: ColliderHandle) {}
    /// A collision pair started overlapping. Fired after the contact is resolved.
    fn on_collision_enter(&mut self, _a: ColliderHandle, _b: ColliderHandle) {}
    /// A collision pair stopped overlapping.
    fn on_collision_exit(&mut self, _a: ColliderHandle, _b: ColliderHandle) {}
}

/// Listener shared between a world and its clones.
pub type SharedListener = Rc<RefCell<dyn ContactListener>>;

/// One recorded callback.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContactEvent {
    /// `on_trigger_enter`.
    TriggerEnter(ColliderHandle, ColliderHandle),
    /// `on_trigger_stay`.
    TriggerStay(ColliderHandle, ColliderHandle),
    /// `on_trigger_exit`.
    TriggerExit(ColliderHandle, ColliderHandle),
    /// `on_collision_enter`.
    CollisionEnter(ColliderHandle, ColliderHandle),
    /// `on_collision_exit`.
    CollisionExit(ColliderHandle, ColliderHandle),
}

/// Listener that records every callback in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<ContactEvent>,
}

impl EventLog {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded events, oldest first.
    pub fn events(&self) -> &[ContactEvent] {
        &self.events
    }

    /// Removes and returns every recorded event.
    pub fn drain(&mut self) -> Vec<ContactEvent> {
        std::mem::take(&mut self.events)
    }

    /// Wraps a fresh log for registration with a world, returning both the
    /// concrete handle (for inspection) and the erased listener.
    pub fn shared() -> (Rc<RefCell<Self>>, SharedListener) {
        let log = Rc::new(RefCell::new(Self::new()));
        let listener: SharedListener = log.clone();
        (log, listener)
    }
}

impl ContactListener for EventLog {
    fn on_trigger_enter(&mut self, a: ColliderHandle, b: ColliderHandle) {
        self.events.push(ContactEvent::TriggerEnter(a, b));
    }
    fn on_trigger_stay(&mut self, a: ColliderHandle, b: ColliderHandle) {
        self.events.push(ContactEvent::TriggerStay(a, b));
    }
    fn on_trigger_exit(&mut self, a: ColliderHandle, b: ColliderHandle) {
        self.events.push(ContactEvent::TriggerExit(a, b));
    }
    fn on_collision_enter(&mut self, a: ColliderHandle, b: ColliderHandle) {
        self.events.push(ContactEvent::CollisionEnter(a, b));
    }
    fn on_collision_exit(&mut self, a: ColliderHandle, b: ColliderHandle) {
        self.events.push(ContactEvent::CollisionExit(a, b));
    }
}
