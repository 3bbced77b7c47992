// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Picker base: configuration, the pick pass pipeline, and event dispatch.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use canopy_geom::Ray;
use canopy_scene::{NodeFlags, Scene, SceneGraph};

use crate::events::{EventOptions, ListenerSet, PickListener};
use crate::sensor::SensorHub;
use crate::tracker::{CollisionTracker, PassEvents, Summary, TransitionKind};
use crate::types::{Controller, HitTester, PickedObject, PickerId, RawHit};

/// Construction-time picker configuration.
#[derive(Copy, Clone, Debug)]
pub struct PickerConfig {
    /// Whether the coordinator drives this picker once per frame.
    ///
    /// A manual-only picker ignores [`FramePicker::on_frame`] and scans only
    /// through its explicit pick methods.
    pub frame_driven: bool,
    /// Reduce each pass to the single closest hit, after the scan.
    pub closest_only: bool,
    /// Which event families reach listeners.
    pub options: EventOptions,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            frame_driven: true,
            closest_only: false,
            options: EventOptions::default(),
        }
    }
}

/// Anything a coordinator can drive once per rendered frame.
pub trait FramePicker: Send + Sync {
    /// Run one frame-driven pick pass.
    ///
    /// Implementations no-op while disabled or when constructed manual-only.
    fn on_frame(&self);

    /// The shared picker base, for configuration and listener access.
    fn base(&self) -> &Picker;
}

/// The base ray picker.
///
/// Each frame it scans along the controller's pick ray, resolves raw hits
/// against the scene under the scan lock, folds them into a
/// [`CollisionTracker`], and dispatches the resulting transitions with every
/// lock released. The specialized pickers embed one of these and substitute
/// their own scan.
pub struct Picker {
    id: PickerId,
    scene: Arc<Scene>,
    tester: Arc<dyn HitTester>,
    sensors: Arc<SensorHub>,
    controller: Mutex<Option<Arc<dyn Controller>>>,
    listeners: ListenerSet<dyn PickListener>,
    tracker: Mutex<CollisionTracker>,
    enabled: AtomicBool,
    closest_only: AtomicBool,
    options: Mutex<EventOptions>,
    frame_driven: bool,
}

impl Picker {
    /// Create a picker scanning `scene` through `tester`.
    ///
    /// The picker starts enabled and without a controller; a frame-driven
    /// picker stays idle until [`Picker::set_controller`].
    pub fn new(
        scene: Arc<Scene>,
        tester: Arc<dyn HitTester>,
        sensors: Arc<SensorHub>,
        config: PickerConfig,
    ) -> Self {
        Self {
            id: PickerId::next(),
            scene,
            tester,
            sensors,
            controller: Mutex::new(None),
            listeners: ListenerSet::new(),
            tracker: Mutex::new(CollisionTracker::new()),
            enabled: AtomicBool::new(true),
            closest_only: AtomicBool::new(config.closest_only),
            options: Mutex::new(config.options),
            frame_driven: config.frame_driven,
        }
    }

    /// This picker's identity, as carried by its hits.
    pub fn id(&self) -> PickerId {
        self.id
    }

    /// The scene this picker scans.
    pub fn scene(&self) -> &Arc<Scene> {
        &self.scene
    }

    /// Resume frame-driven picking.
    pub fn enable(&self) {
        self.enabled.store(true, Ordering::SeqCst);
    }

    /// Stop frame-driven picking.
    ///
    /// The last-known picked set is kept until [`Picker::clear_picked`], so
    /// re-enabling continues the membership runs instead of replaying enters.
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::SeqCst);
    }

    /// Whether frame-driven picking is active.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Swap the motion and activation source.
    pub fn set_controller(&self, controller: Option<Arc<dyn Controller>>) {
        *self.controller.lock().unwrap() = controller;
    }

    /// The current controller, if any.
    pub fn controller(&self) -> Option<Arc<dyn Controller>> {
        self.controller.lock().unwrap().clone()
    }

    /// Register a pick listener.
    pub fn add_listener(&self, listener: Arc<dyn PickListener>) {
        self.listeners.add(listener);
    }

    /// Unregister a pick listener by identity.
    pub fn remove_listener(&self, listener: &Arc<dyn PickListener>) {
        self.listeners.remove(listener);
    }

    /// Replace the dispatched event families.
    pub fn set_options(&self, options: EventOptions) {
        *self.options.lock().unwrap() = options;
    }

    /// The dispatched event families.
    pub fn options(&self) -> EventOptions {
        *self.options.lock().unwrap()
    }

    /// Toggle closest-only reduction.
    pub fn set_closest_only(&self, closest_only: bool) {
        self.closest_only.store(closest_only, Ordering::SeqCst);
    }

    /// Whether passes reduce to the single closest hit.
    pub fn closest_only(&self) -> bool {
        self.closest_only.load(Ordering::SeqCst)
    }

    /// The picked set as of the last pass, coalesced per node.
    pub fn picked(&self) -> Vec<PickedObject> {
        self.tracker.lock().unwrap().picked().to_vec()
    }

    /// Drop all membership state without generating exit events.
    pub fn clear_picked(&self) {
        self.tracker.lock().unwrap().clear();
    }

    /// Terminal teardown: drop the controller and all membership state.
    pub fn detach(&self) {
        self.set_controller(None);
        self.clear_picked();
    }

    /// Run one pick pass along an explicit world-space ray.
    ///
    /// Explicit calls scan regardless of the frame-driven flag and the
    /// enabled state; disabling stops only frame-driven passes.
    pub fn pick_with_ray(&self, ray: Ray) {
        self.run_pass(|graph| self.tester.test_ray(graph, ray));
    }

    pub(crate) fn tester(&self) -> &Arc<dyn HitTester> {
        &self.tester
    }

    /// Whether a frame-driven pass should proceed at all.
    pub(crate) fn frame_gate(&self) -> bool {
        self.frame_driven && self.is_enabled()
    }

    /// One full pick pass around a scan closure.
    ///
    /// The scan closure runs under the scene lock and must not call user
    /// code. Everything after it (tracker fold, listener dispatch, sensor
    /// propagation) runs with the scene unlocked.
    pub(crate) fn run_pass<F>(&self, scan: F)
    where
        F: FnOnce(&SceneGraph) -> Vec<RawHit>,
    {
        let controller = self.controller.lock().unwrap().clone();
        let touched = controller
            .as_ref()
            .is_some_and(|c| c.is_active() && c.is_touching());

        let mut resolved: Vec<PickedObject> = {
            let graph = self.scene.graph();
            let raw = scan(&graph);
            resolve_hits(&graph, &raw, self.id, touched)
        };

        if self.closest_only() {
            resolved = closest_hit(resolved);
        }

        let (events, picked) = {
            let mut tracker = self.tracker.lock().unwrap();
            let events = tracker.update(&resolved);
            let picked = tracker.picked().to_vec();
            (events, picked)
        };

        self.dispatch(&events, &picked);
        self.sensors
            .propagate(&self.scene, &events.transitions, controller.as_ref());
    }

    fn dispatch(&self, events: &PassEvents, picked: &[PickedObject]) {
        let options = self.options();
        let listeners = self.listeners.snapshot();
        if listeners.is_empty() {
            return;
        }
        for t in &events.transitions {
            match t.kind {
                TransitionKind::Enter => {
                    for l in listeners.iter() {
                        l.on_enter(&t.hit);
                    }
                }
                TransitionKind::Exit => {
                    for l in listeners.iter() {
                        l.on_exit(&t.hit);
                    }
                }
                TransitionKind::Inside if options.contains(EventOptions::INSIDE_EVENTS) => {
                    for l in listeners.iter() {
                        l.on_inside(&t.hit);
                    }
                }
                TransitionKind::TouchStart if options.contains(EventOptions::TOUCH_EVENTS) => {
                    for l in listeners.iter() {
                        l.on_touch_start(&t.hit);
                    }
                }
                TransitionKind::TouchEnd if options.contains(EventOptions::TOUCH_EVENTS) => {
                    for l in listeners.iter() {
                        l.on_touch_end(&t.hit);
                    }
                }
                _ => {}
            }
        }
        if options.contains(EventOptions::SUMMARY_EVENTS) {
            match events.summary {
                Some(Summary::Pick) => {
                    for l in listeners.iter() {
                        l.on_pick(picked);
                    }
                }
                Some(Summary::NoPick) => {
                    for l in listeners.iter() {
                        l.on_no_pick();
                    }
                }
                None => {}
            }
        }
    }
}

impl FramePicker for Picker {
    fn on_frame(&self) {
        if !self.frame_gate() {
            return;
        }
        let Some(controller) = self.controller.lock().unwrap().clone() else {
            return;
        };
        if !controller.is_active() {
            return;
        }
        let ray = controller.pick_ray();
        self.run_pass(|graph| self.tester.test_ray(graph, ray));
    }

    fn base(&self) -> &Picker {
        self
    }
}

impl std::fmt::Debug for Picker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Picker")
            .field("id", &self.id)
            .field("enabled", &self.is_enabled())
            .field("frame_driven", &self.frame_driven)
            .finish_non_exhaustive()
    }
}

/// Resolve raw hits against the scene, in scan order.
///
/// Records that no longer make sense are dropped and logged at debug level:
/// stale colliders, disabled colliders, hits past the collider's distance
/// cap, owners gone or not pickable. Destruction races are expected under
/// concurrent scene mutation, so none of these are errors.
fn resolve_hits(
    graph: &SceneGraph,
    raw: &[RawHit],
    picker: PickerId,
    touched: bool,
) -> Vec<PickedObject> {
    let mut out = Vec::with_capacity(raw.len());
    for hit in raw {
        let Some(collider) = graph.collider(hit.collider) else {
            log::debug!("dropping hit on stale collider {:?}", hit.collider);
            continue;
        };
        if !collider.enabled {
            log::debug!("dropping hit on disabled collider {:?}", hit.collider);
            continue;
        }
        if collider.max_distance.is_some_and(|max| hit.distance > max) {
            log::debug!(
                "dropping hit at {} past the distance cap on {:?}",
                hit.distance,
                hit.collider
            );
            continue;
        }
        let Some(node) = graph.collider_owner(hit.collider) else {
            log::debug!("dropping hit on ownerless collider {:?}", hit.collider);
            continue;
        };
        match graph.flags(node) {
            Some(flags) if flags.contains(NodeFlags::PICKABLE) => {}
            Some(_) => {
                log::debug!("dropping hit on unpickable node {node:?}");
                continue;
            }
            None => {
                log::debug!("dropping hit on stale node {node:?}");
                continue;
            }
        }
        out.push(PickedObject {
            picker,
            collider: hit.collider,
            node,
            hit_point: hit.position,
            distance: hit.distance,
            touched,
            collidable_index: hit.collidable_index,
        });
    }
    out
}

/// Reduce to the single minimum-distance hit; first-found wins ties.
fn closest_hit(hits: Vec<PickedObject>) -> Vec<PickedObject> {
    let mut best: Option<PickedObject> = None;
    for hit in hits {
        match &best {
            None => best = Some(hit),
            Some(b) if hit.distance < b.distance => best = Some(hit),
            Some(_) => {}
        }
    }
    best.into_iter().collect()
}
