// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame driving and shared wiring for a scene's pickers.

use std::sync::{Arc, Mutex};

use canopy_scene::{NodeId, Scene};

use crate::bounds::BoundsPicker;
use crate::frustum::FrustumPicker;
use crate::object::ObjectPicker;
use crate::picker::{FramePicker, Picker, PickerConfig};
use crate::sensor::SensorHub;
use crate::types::{HitTester, PickerId};

/// Shared pick wiring for one scene: the hit engine, the sensor hub, and the
/// registry of frame-driven pickers.
///
/// The render loop calls [`PickCoordinator::frame`] once per rendered frame
/// and every registered picker runs in registration order. Registration and
/// unregistration are allowed from any thread, including from listeners
/// mid-frame; such changes take effect from the next frame on.
pub struct PickCoordinator {
    scene: Arc<Scene>,
    tester: Arc<dyn HitTester>,
    sensors: Arc<SensorHub>,
    pickers: Mutex<Vec<Arc<dyn FramePicker>>>,
}

impl PickCoordinator {
    /// Create a coordinator for `scene`, scanning through `tester`.
    pub fn new(scene: Arc<Scene>, tester: Arc<dyn HitTester>) -> Self {
        Self {
            scene,
            tester,
            sensors: Arc::new(SensorHub::new()),
            pickers: Mutex::new(Vec::new()),
        }
    }

    /// The scene this coordinator serves.
    pub fn scene(&self) -> &Arc<Scene> {
        &self.scene
    }

    /// The hit engine shared by this coordinator's pickers.
    pub fn tester(&self) -> &Arc<dyn HitTester> {
        &self.tester
    }

    /// The sensor hub shared by this coordinator's pickers.
    pub fn sensors(&self) -> &Arc<SensorHub> {
        &self.sensors
    }

    /// Register a picker at the end of the frame order.
    ///
    /// Registering a picker that is already registered is a no-op.
    pub fn register(&self, picker: Arc<dyn FramePicker>) {
        let mut pickers = self.pickers.lock().unwrap();
        if pickers.iter().any(|p| p.base().id() == picker.base().id()) {
            return;
        }
        pickers.push(picker);
    }

    /// Unregister the picker with identity `id`, returning it if present.
    pub fn unregister(&self, id: PickerId) -> Option<Arc<dyn FramePicker>> {
        let mut pickers = self.pickers.lock().unwrap();
        let index = pickers.iter().position(|p| p.base().id() == id)?;
        Some(pickers.remove(index))
    }

    /// Number of registered pickers.
    pub fn picker_count(&self) -> usize {
        self.pickers.lock().unwrap().len()
    }

    /// Drive one frame: every registered picker runs once, in registration
    /// order.
    ///
    /// The registry lock is not held while pickers run, so listeners may
    /// register and unregister pickers mid-frame.
    pub fn frame(&self) {
        let pickers: Vec<Arc<dyn FramePicker>> = self.pickers.lock().unwrap().clone();
        for picker in pickers {
            picker.on_frame();
        }
    }

    /// Build a ray picker wired to this coordinator and register it.
    pub fn ray_picker(&self, config: PickerConfig) -> Arc<Picker> {
        let picker = Arc::new(Picker::new(
            Arc::clone(&self.scene),
            Arc::clone(&self.tester),
            Arc::clone(&self.sensors),
            config,
        ));
        self.register(picker.clone());
        picker
    }

    /// Build a bounds picker wired to this coordinator and register it.
    pub fn bounds_picker(&self, config: PickerConfig) -> Arc<BoundsPicker> {
        let picker = Arc::new(BoundsPicker::new(
            Arc::clone(&self.scene),
            Arc::clone(&self.tester),
            Arc::clone(&self.sensors),
            config,
        ));
        self.register(picker.clone());
        picker
    }

    /// Build a frustum picker wired to this coordinator and register it.
    pub fn frustum_picker(&self, config: PickerConfig) -> Arc<FrustumPicker> {
        let picker = Arc::new(FrustumPicker::new(
            Arc::clone(&self.scene),
            Arc::clone(&self.tester),
            Arc::clone(&self.sensors),
            config,
        ));
        self.register(picker.clone());
        picker
    }

    /// Build an object picker wired to this coordinator and register it.
    pub fn object_picker(&self, owner: Option<NodeId>, config: PickerConfig) -> Arc<ObjectPicker> {
        let picker = Arc::new(ObjectPicker::new(
            Arc::clone(&self.scene),
            Arc::clone(&self.tester),
            Arc::clone(&self.sensors),
            owner,
            config,
        ));
        self.register(picker.clone());
        picker
    }
}

impl std::fmt::Debug for PickCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PickCoordinator")
            .field("pickers", &self.picker_count())
            .finish_non_exhaustive()
    }
}
