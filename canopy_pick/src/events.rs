// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener registration and the pick event sink contract.

use std::sync::{Arc, Mutex};

use crate::types::PickedObject;

bitflags::bitflags! {
    /// Which event families a picker dispatches to its listeners.
    ///
    /// Options gate dispatch only. The tracker always maintains full
    /// membership state, so enabling a family later picks up mid-run without
    /// replaying missed events.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct EventOptions: u8 {
        /// Dispatch touch-start and touch-end events.
        const TOUCH_EVENTS = 1 << 0;
        /// Dispatch the per-pass inside events.
        const INSIDE_EVENTS = 1 << 1;
        /// Dispatch the pick and no-pick summary events.
        const SUMMARY_EVENTS = 1 << 2;
    }
}

impl Default for EventOptions {
    fn default() -> Self {
        Self::all()
    }
}

/// Receiver for pick events.
///
/// All methods default to no-ops so listeners implement only what they care
/// about. Callbacks run on the thread driving the pick pass, after every
/// picking lock has been released; it is safe to mutate the scene or the
/// picker from inside one.
pub trait PickListener: Send + Sync {
    /// A node's membership began this pass.
    fn on_enter(&self, _hit: &PickedObject) {}
    /// A node's membership ended this pass.
    fn on_exit(&self, _hit: &PickedObject) {}
    /// A node remains picked this pass.
    fn on_inside(&self, _hit: &PickedObject) {}
    /// The activation trigger engaged over a node.
    fn on_touch_start(&self, _hit: &PickedObject) {}
    /// The activation trigger released over a node, or the node was exited
    /// while touched.
    fn on_touch_end(&self, _hit: &PickedObject) {}
    /// Pass summary: at least one node is picked.
    fn on_pick(&self, _picked: &[PickedObject]) {}
    /// Pass summary: nothing is picked, fired once per empty spell.
    fn on_no_pick(&self) {}
}

/// Copy-on-write listener collection.
///
/// Mutation replaces the inner `Arc<Vec<_>>`; dispatch iterates a snapshot,
/// so listeners added or removed mid-dispatch never corrupt the iteration and
/// take effect from the next dispatch on.
pub(crate) struct ListenerSet<L: ?Sized> {
    inner: Mutex<Arc<Vec<Arc<L>>>>,
}

impl<L: ?Sized> ListenerSet<L> {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(Arc::new(Vec::new())),
        }
    }

    /// Register a listener. Re-adding the same `Arc` is a no-op.
    pub(crate) fn add(&self, listener: Arc<L>) {
        let mut inner = self.inner.lock().unwrap();
        if inner.iter().any(|l| Arc::ptr_eq(l, &listener)) {
            return;
        }
        let mut next = Vec::with_capacity(inner.len() + 1);
        next.extend(inner.iter().cloned());
        next.push(listener);
        *inner = Arc::new(next);
    }

    /// Unregister a listener by identity.
    pub(crate) fn remove(&self, listener: &Arc<L>) {
        let mut inner = self.inner.lock().unwrap();
        if !inner.iter().any(|l| Arc::ptr_eq(l, listener)) {
            return;
        }
        let next: Vec<Arc<L>> = inner
            .iter()
            .filter(|l| !Arc::ptr_eq(l, listener))
            .cloned()
            .collect();
        *inner = Arc::new(next);
    }

    /// Stable snapshot for dispatch.
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<L>>> {
        Arc::clone(&self.inner.lock().unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Named: Send + Sync {
        fn name(&self) -> &'static str;
    }

    struct Tag(&'static str);

    impl Named for Tag {
        fn name(&self) -> &'static str {
            self.0
        }
    }

    #[test]
    fn default_options_enable_everything() {
        let options = EventOptions::default();
        assert!(options.contains(EventOptions::TOUCH_EVENTS));
        assert!(options.contains(EventOptions::INSIDE_EVENTS));
        assert!(options.contains(EventOptions::SUMMARY_EVENTS));
    }

    #[test]
    fn snapshot_is_stable_across_mutation() {
        let set: ListenerSet<dyn Named> = ListenerSet::new();
        let a: Arc<dyn Named> = Arc::new(Tag("a"));
        let b: Arc<dyn Named> = Arc::new(Tag("b"));
        set.add(Arc::clone(&a));

        let snapshot = set.snapshot();
        set.add(Arc::clone(&b));
        set.remove(&a);

        // The snapshot taken before the mutations still sees only `a`.
        let names: Vec<&str> = snapshot.iter().map(|l| l.name()).collect();
        assert_eq!(names, vec!["a"]);
        let names: Vec<&str> = set.snapshot().iter().map(|l| l.name()).collect();
        assert_eq!(names, vec!["b"]);
    }

    #[test]
    fn add_is_identity_deduplicated() {
        let set: ListenerSet<dyn Named> = ListenerSet::new();
        let a: Arc<dyn Named> = Arc::new(Tag("a"));
        set.add(Arc::clone(&a));
        set.add(Arc::clone(&a));
        assert_eq!(set.snapshot().len(), 1);

        // A distinct allocation with equal contents is a different listener.
        let a2: Arc<dyn Named> = Arc::new(Tag("a"));
        set.add(a2);
        assert_eq!(set.snapshot().len(), 2);
    }

    #[test]
    fn remove_of_unregistered_listener_is_a_no_op() {
        let set: ListenerSet<dyn Named> = ListenerSet::new();
        let a: Arc<dyn Named> = Arc::new(Tag("a"));
        let stranger: Arc<dyn Named> = Arc::new(Tag("s"));
        set.add(Arc::clone(&a));
        set.remove(&stranger);
        assert_eq!(set.snapshot().len(), 1);
    }
}
