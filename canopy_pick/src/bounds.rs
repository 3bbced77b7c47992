// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounds picking: a batch of collidable spheres scanned against the scene.

use std::sync::{Arc, Mutex};

use canopy_geom::Sphere;
use canopy_scene::Scene;

use crate::picker::{FramePicker, Picker, PickerConfig};
use crate::sensor::SensorHub;
use crate::types::HitTester;

/// An indexed list of collidable spheres.
///
/// Indices are stable: removing a collidable leaves a hole, and the next add
/// fills the lowest hole. Hits report the index of the collidable that
/// produced them, so listeners can key per-collidable behavior off it.
///
/// The list carries its own lock, independent of the scan lock. Application
/// threads may add, move, and remove collidables while a scan is in flight;
/// the scan reads a stable snapshot and a concurrent change becomes visible
/// on the next scan at the latest.
#[derive(Debug, Default)]
pub struct CollidableList {
    slots: Mutex<Vec<Option<Sphere>>>,
}

impl CollidableList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a collidable, returning its index.
    pub fn add(&self, sphere: Sphere) -> usize {
        let mut slots = self.slots.lock().unwrap();
        match slots.iter().position(Option::is_none) {
            Some(i) => {
                slots[i] = Some(sphere);
                i
            }
            None => {
                slots.push(Some(sphere));
                slots.len() - 1
            }
        }
    }

    /// Remove the collidable at `index`, leaving a hole.
    ///
    /// Returns the removed sphere, or `None` for out-of-range and
    /// already-empty indices.
    pub fn remove(&self, index: usize) -> Option<Sphere> {
        let mut slots = self.slots.lock().unwrap();
        slots.get_mut(index).and_then(Option::take)
    }

    /// The collidable at `index`, if occupied.
    pub fn get(&self, index: usize) -> Option<Sphere> {
        self.slots.lock().unwrap().get(index).copied().flatten()
    }

    /// Move the collidable at `index`. Returns false if the slot is empty.
    pub fn update(&self, index: usize, sphere: Sphere) -> bool {
        let mut slots = self.slots.lock().unwrap();
        match slots.get_mut(index) {
            Some(slot @ Some(_)) => {
                *slot = Some(sphere);
                true
            }
            _ => false,
        }
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.lock().unwrap().iter().flatten().count()
    }

    /// Whether no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stable snapshot of occupied slots with their indices.
    pub(crate) fn snapshot(&self) -> Vec<(usize, Sphere)> {
        self.slots
            .lock()
            .unwrap()
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.map(|s| (i, s)))
            .collect()
    }
}

/// Picker scanning a batch of collidable spheres each frame.
///
/// The query shape is the collidable list itself; a controller, if set,
/// contributes activation state only.
pub struct BoundsPicker {
    base: Picker,
    collidables: Arc<CollidableList>,
}

impl BoundsPicker {
    /// Create a bounds picker with an empty collidable list.
    pub fn new(
        scene: Arc<Scene>,
        tester: Arc<dyn HitTester>,
        sensors: Arc<SensorHub>,
        config: PickerConfig,
    ) -> Self {
        Self {
            base: Picker::new(scene, tester, sensors, config),
            collidables: Arc::new(CollidableList::new()),
        }
    }

    /// The shared picker base: listeners, enablement, options.
    pub fn base(&self) -> &Picker {
        &self.base
    }

    /// The collidable list, shareable with application threads.
    pub fn collidables(&self) -> &Arc<CollidableList> {
        &self.collidables
    }

    /// Add a collidable sphere, returning its index.
    pub fn add_collidable(&self, sphere: Sphere) -> usize {
        self.collidables.add(sphere)
    }

    /// Remove the collidable at `index`.
    pub fn remove_collidable(&self, index: usize) -> Option<Sphere> {
        self.collidables.remove(index)
    }

    /// The collidable at `index`, if occupied.
    pub fn collidable(&self, index: usize) -> Option<Sphere> {
        self.collidables.get(index)
    }

    /// Run one pass over the current collidables, regardless of frame gating.
    ///
    /// An empty list is a valid query: the pass runs with zero hits, so exit
    /// and no-pick events still fire.
    pub fn pick_once(&self) {
        let snapshot = self.collidables.snapshot();
        self.base
            .run_pass(|graph| self.base.tester().test_spheres(graph, &snapshot));
    }
}

impl FramePicker for BoundsPicker {
    fn on_frame(&self) {
        if !self.base.frame_gate() {
            return;
        }
        self.pick_once();
    }

    fn base(&self) -> &Picker {
        &self.base
    }
}

impl std::fmt::Debug for BoundsPicker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundsPicker")
            .field("base", &self.base)
            .field("collidables", &self.collidables.len())
            .finish()
    }
}
