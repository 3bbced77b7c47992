// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sensor capability: aggregating descendant pick events to one ancestor.
//!
//! A node carrying a sensor receives every enter/exit/inside/touch event
//! produced on colliders anywhere beneath it, as [`SensorEvent`]s. The walk
//! from the hit node stops at the nearest sensor-bearing ancestor, so a
//! sensor also shields ancestors above it; a hit with no sensor-bearing
//! ancestor is dropped.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use canopy_scene::{NodeId, Scene};

use crate::events::ListenerSet;
use crate::tracker::{Transition, TransitionKind};
use crate::types::{Controller, PickedObject};

/// One aggregated sensor event.
#[derive(Clone)]
pub struct SensorEvent {
    /// The sensor-bearing ancestor this event was delivered to.
    pub sensor: NodeId,
    /// True for enter, touch-start, and inside; false for exit and touch-end.
    pub over: bool,
    /// Activation state carried by the hit.
    pub touched: bool,
    /// The descendant hit that caused this event.
    pub hit: PickedObject,
    /// The controller that produced the hit, or the sensor's cached one when
    /// the pass had no controller.
    pub controller: Option<Arc<dyn Controller>>,
}

impl std::fmt::Debug for SensorEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SensorEvent")
            .field("sensor", &self.sensor)
            .field("over", &self.over)
            .field("touched", &self.touched)
            .field("hit", &self.hit)
            .finish_non_exhaustive()
    }
}

/// Receiver for aggregated sensor events.
pub trait SensorListener: Send + Sync {
    /// Called once per underlying pick event on any descendant of the sensor.
    fn on_sensor_event(&self, event: &SensorEvent);
}

struct CachedHit {
    hit: PickedObject,
    controller: Arc<dyn Controller>,
}

struct SensorEntry {
    listeners: ListenerSet<dyn SensorListener>,
    /// Last hit delivered with a known controller, for touch continuation.
    last: Mutex<Option<CachedHit>>,
}

/// Registry of sensor-bearing nodes.
///
/// One hub is shared by all pickers of a coordinator, so hits from any picker
/// propagate to the same sensors. Node identity is generational; a removed
/// node's sensor entry stays until [`SensorHub::detach`], which only matters
/// for late touch-end delivery and costs nothing otherwise.
pub struct SensorHub {
    entries: Mutex<HashMap<NodeId, Arc<SensorEntry>>>,
}

impl SensorHub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Mark `node` as sensor-bearing. Idempotent.
    ///
    /// From now on, descendant pick events stop here instead of walking
    /// further up, whether or not listeners are registered.
    pub fn attach(&self, node: NodeId) {
        let mut entries = self.entries.lock().unwrap();
        entries.entry(node).or_insert_with(|| {
            Arc::new(SensorEntry {
                listeners: ListenerSet::new(),
                last: Mutex::new(None),
            })
        });
    }

    /// Remove the sensor capability (listeners and cache included) from `node`.
    pub fn detach(&self, node: NodeId) {
        self.entries.lock().unwrap().remove(&node);
    }

    /// Whether `node` currently carries a sensor.
    pub fn is_sensor(&self, node: NodeId) -> bool {
        self.entries.lock().unwrap().contains_key(&node)
    }

    /// Register a listener on the sensor at `node`.
    ///
    /// Returns false (and logs at debug level) if `node` carries no sensor;
    /// call [`SensorHub::attach`] first.
    pub fn add_listener(&self, node: NodeId, listener: Arc<dyn SensorListener>) -> bool {
        let entry = {
            let entries = self.entries.lock().unwrap();
            entries.get(&node).map(Arc::clone)
        };
        match entry {
            Some(entry) => {
                entry.listeners.add(listener);
                true
            }
            None => {
                log::debug!("add_listener: {node:?} carries no sensor, ignoring");
                false
            }
        }
    }

    /// Unregister a listener by identity. No-op if absent.
    pub fn remove_listener(&self, node: NodeId, listener: &Arc<dyn SensorListener>) {
        let entry = {
            let entries = self.entries.lock().unwrap();
            entries.get(&node).map(Arc::clone)
        };
        if let Some(entry) = entry {
            entry.listeners.remove(listener);
        }
    }

    /// The last hit delivered to the sensor at `node` with a known controller.
    pub fn last_hit(&self, node: NodeId) -> Option<PickedObject> {
        let entry = {
            let entries = self.entries.lock().unwrap();
            entries.get(&node).map(Arc::clone)
        };
        entry.and_then(|e| e.last.lock().unwrap().as_ref().map(|c| c.hit))
    }

    /// Route one pass's transitions to their nearest sensor-bearing ancestors
    /// and dispatch sensor events.
    ///
    /// The parent walk runs under a short-lived scene lock; every lock is
    /// released before any listener is invoked. A hit whose node went stale
    /// since the scan (its parent chain is gone) routes nowhere and is
    /// dropped, matching the tolerance for destruction races elsewhere.
    pub(crate) fn propagate(
        &self,
        scene: &Scene,
        transitions: &[Transition],
        controller: Option<&Arc<dyn Controller>>,
    ) {
        if transitions.is_empty() {
            return;
        }

        let routes: Vec<Option<NodeId>> = {
            let graph = scene.graph();
            let entries = self.entries.lock().unwrap();
            transitions
                .iter()
                .map(|t| {
                    let mut cursor = Some(t.hit.node);
                    while let Some(node) = cursor {
                        if entries.contains_key(&node) {
                            return Some(node);
                        }
                        cursor = graph.parent_of(node);
                    }
                    None
                })
                .collect()
        };

        for (t, route) in transitions.iter().zip(&routes) {
            let Some(sensor) = *route else {
                continue;
            };
            let entry = {
                let entries = self.entries.lock().unwrap();
                match entries.get(&sensor) {
                    Some(e) => Arc::clone(e),
                    None => continue, // detached mid-pass
                }
            };

            let over = match t.kind {
                TransitionKind::Enter | TransitionKind::Inside | TransitionKind::TouchStart => true,
                TransitionKind::Exit | TransitionKind::TouchEnd => false,
            };
            let controller = match controller {
                Some(c) => Some(Arc::clone(c)),
                None => entry
                    .last
                    .lock()
                    .unwrap()
                    .as_ref()
                    .map(|c| Arc::clone(&c.controller)),
            };
            if let Some(c) = &controller {
                *entry.last.lock().unwrap() = Some(CachedHit {
                    hit: t.hit,
                    controller: Arc::clone(c),
                });
            }

            let event = SensorEvent {
                sensor,
                over,
                touched: t.hit.touched,
                hit: t.hit,
                controller,
            };
            for listener in entry.listeners.snapshot().iter() {
                listener.on_sensor_event(&event);
            }
        }
    }
}

impl Default for SensorHub {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SensorHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sensors = self.entries.lock().unwrap().len();
        f.debug_struct("SensorHub")
            .field("sensors", &sensors)
            .finish_non_exhaustive()
    }
}
