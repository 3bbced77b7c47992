// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Object picking: proximity selection by bounding-volume overlap.

use std::sync::{Arc, Mutex};

use canopy_geom::Frustum;
use canopy_scene::{NodeId, Scene};

use crate::picker::{FramePicker, Picker, PickerConfig};
use crate::sensor::SensorHub;
use crate::types::HitTester;

/// Picker selecting nodes whose world bounds overlap its owner's.
///
/// Candidates come from the camera visibility scan, then every candidate is
/// filtered to those whose world-space AABB intersects the owner node's
/// world-space AABB. This picks by proximity rather than by ray: whatever the
/// owner is touching right now. The owner itself is never a candidate.
pub struct ObjectPicker {
    base: Picker,
    owner: Mutex<Option<NodeId>>,
}

impl ObjectPicker {
    /// Create an object picker anchored at `owner`.
    pub fn new(
        scene: Arc<Scene>,
        tester: Arc<dyn HitTester>,
        sensors: Arc<SensorHub>,
        owner: Option<NodeId>,
        config: PickerConfig,
    ) -> Self {
        Self {
            base: Picker::new(scene, tester, sensors, config),
            owner: Mutex::new(owner),
        }
    }

    /// The shared picker base: listeners, enablement, options.
    pub fn base(&self) -> &Picker {
        &self.base
    }

    /// Re-anchor the picker.
    pub fn set_owner(&self, owner: Option<NodeId>) {
        *self.owner.lock().unwrap() = owner;
    }

    /// The current anchor node.
    pub fn owner(&self) -> Option<NodeId> {
        *self.owner.lock().unwrap()
    }

    /// Run one pass now, regardless of frame gating.
    ///
    /// Without an owner, or with a stale one, the pass is empty: ongoing
    /// memberships exit and the no-pick summary fires once.
    pub fn pick_once(&self) {
        let owner = self.owner();
        self.base.run_pass(|graph| {
            let Some(owner) = owner else {
                log::debug!("object picker has no owner; empty pass");
                return Vec::new();
            };
            let Some(owner_bounds) = graph.world_bounds(owner) else {
                log::debug!("object picker owner {owner:?} is stale; empty pass");
                return Vec::new();
            };
            let camera_volume = Frustum::from_matrix(graph.camera().view_projection());
            let mut hits = self.base.tester().test_frustum(graph, &camera_volume);
            hits.retain(|hit| {
                graph
                    .collider_owner(hit.collider)
                    .filter(|node| *node != owner)
                    .and_then(|node| graph.world_bounds(node))
                    .is_some_and(|b| b.intersects(&owner_bounds))
            });
            hits
        });
    }
}

impl FramePicker for ObjectPicker {
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

impl std::fmt::Debug for ObjectPicker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectPicker")
            .field("base", &self.base)
            .field("owner", &self.owner())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RawHit, sort_hits};
    use canopy_geom::{Aabb, Ray, Sphere};
    use canopy_scene::{Camera, Collider, LocalNode, SceneGraph};
    use core::f32::consts::FRAC_PI_2;
    use glam::{Mat4, Vec3};

    struct VisibilityTester;

    impl HitTester for VisibilityTester {
        fn test_ray(&self, _graph: &SceneGraph, _ray: Ray) -> Vec<RawHit> {
            Vec::new()
        }

        fn test_spheres(
            &self,
            _graph: &SceneGraph,
            _collidables: &[(usize, Sphere)],
        ) -> Vec<RawHit> {
            Vec::new()
        }

        fn test_frustum(&self, graph: &SceneGraph, frustum: &Frustum) -> Vec<RawHit> {
            let mut hits = Vec::new();
            for (collider, owner, _) in graph.colliders() {
                let Some(sphere) = graph.world_sphere(owner) else {
                    continue;
                };
                if frustum.intersects_sphere(sphere) {
                    hits.push(RawHit {
                        collider,
                        position: sphere.center,
                        distance: sphere.center.length(),
                        collidable_index: None,
                    });
                }
            }
            sort_hits(&mut hits);
            hits
        }
    }

    /// Owner at x=0, a nearby node at `near_x`, and a far node, all at z=-3
    /// in front of the camera, unit boxes, one collider each.
    fn rig(near_x: f32) -> (Arc<Scene>, [NodeId; 3], ObjectPicker) {
        let scene = Arc::new(Scene::new());
        let mut nodes = [None; 3];
        {
            let mut graph = scene.graph();
            for (i, x) in [0.0, near_x, 2.5].into_iter().enumerate() {
                let node = graph.insert(
                    None,
                    LocalNode {
                        local_bounds: Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(0.5)),
                        local_transform: Mat4::from_translation(Vec3::new(x, 0.0, -3.0)),
                        ..Default::default()
                    },
                );
                let _ = graph.attach_collider(node, Collider::default()).unwrap();
                nodes[i] = Some(node);
            }
            graph.set_camera(Camera {
                view: Mat4::IDENTITY,
                projection: Mat4::perspective_rh(FRAC_PI_2, 1.0, 0.1, 100.0),
            });
            graph.commit();
        }
        let nodes = nodes.map(|n| n.unwrap());
        let picker = ObjectPicker::new(
            Arc::clone(&scene),
            Arc::new(VisibilityTester),
            Arc::new(SensorHub::new()),
            Some(nodes[0]),
            PickerConfig::default(),
        );
        (scene, nodes, picker)
    }

    #[test]
    fn picks_only_what_overlaps_the_owner() {
        let (_scene, [owner, near, far], picker) = rig(0.7);
        picker.pick_once();

        let picked = picker.base().picked();
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].node, near);
        assert!(picked.iter().all(|p| p.node != owner), "owner is not self-picked");
        assert!(picked.iter().all(|p| p.node != far));
    }

    #[test]
    fn separated_bounds_are_not_picked() {
        let (_scene, _nodes, picker) = rig(1.5);
        picker.pick_once();
        assert!(picker.base().picked().is_empty());
    }

    #[test]
    fn no_owner_is_an_empty_pass() {
        let (_scene, _nodes, picker) = rig(0.7);
        picker.set_owner(None);
        picker.pick_once();
        assert!(picker.base().picked().is_empty());
    }

    #[test]
    fn removing_the_owner_exits_ongoing_memberships() {
        let (scene, [owner, _near, _far], picker) = rig(0.7);
        picker.pick_once();
        assert_eq!(picker.base().picked().len(), 1);

        scene.graph().remove(owner);
        picker.pick_once();
        assert!(picker.base().picked().is_empty());
    }
}
