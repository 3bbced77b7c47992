// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frustum picking: whole-scene visibility and anchored projection volumes.

use std::sync::{Arc, Mutex};

use canopy_geom::Frustum;
use canopy_scene::{NodeId, Scene};
use glam::Mat4;

use crate::picker::{FramePicker, Picker, PickerConfig};
use crate::sensor::SensorHub;
use crate::types::HitTester;

/// Picker testing the scene against a view volume each frame.
///
/// Without an explicit projection, the pass picks whatever the engine reports
/// visible from the scene camera. With an explicit projection anchored at an
/// owner node, the camera scan still supplies the candidates, and each
/// candidate's world bounding sphere is additionally tested against the
/// projection's frustum in the owner's local space; candidates failing that
/// secondary test are discarded even though the scan reported them.
pub struct FrustumPicker {
    base: Picker,
    owner: Mutex<Option<NodeId>>,
    projection: Mutex<Option<Mat4>>,
}

impl FrustumPicker {
    /// Create a frustum picker in whole-scene camera mode.
    pub fn new(
        scene: Arc<Scene>,
        tester: Arc<dyn HitTester>,
        sensors: Arc<SensorHub>,
        config: PickerConfig,
    ) -> Self {
        Self {
            base: Picker::new(scene, tester, sensors, config),
            owner: Mutex::new(None),
            projection: Mutex::new(None),
        }
    }

    /// The shared picker base: listeners, enablement, options.
    pub fn base(&self) -> &Picker {
        &self.base
    }

    /// Anchor node for the explicit projection.
    pub fn set_owner(&self, owner: Option<NodeId>) {
        *self.owner.lock().unwrap() = owner;
    }

    /// The current anchor node.
    pub fn owner(&self) -> Option<NodeId> {
        *self.owner.lock().unwrap()
    }

    /// Set or clear the explicit projection matrix.
    ///
    /// The secondary test engages only while both a projection and an owner
    /// are set.
    pub fn set_projection(&self, projection: Option<Mat4>) {
        *self.projection.lock().unwrap() = projection;
    }

    /// The current explicit projection.
    pub fn projection(&self) -> Option<Mat4> {
        *self.projection.lock().unwrap()
    }

    /// Run one pass now, regardless of frame gating.
    pub fn pick_once(&self) {
        let owner = self.owner();
        let projection = self.projection();
        self.base.run_pass(|graph| {
            let camera_volume = Frustum::from_matrix(graph.camera().view_projection());
            let mut hits = self.base.tester().test_frustum(graph, &camera_volume);
            let (Some(projection), Some(owner)) = (projection, owner) else {
                return hits;
            };
            let Some(owner_tf) = graph.world_transform(owner) else {
                log::debug!("frustum owner {owner:?} is stale; keeping the camera volume");
                return hits;
            };
            let inverse = owner_tf.inverse();
            let local_volume = Frustum::from_matrix(projection);
            hits.retain(|hit| {
                let sphere = graph
                    .collider_owner(hit.collider)
                    .and_then(|node| graph.world_sphere(node));
                match sphere {
                    Some(s) => local_volume.intersects_sphere(s.transformed_by(inverse)),
                    // Unresolvable hits pass through; resolution drops them
                    // with its own logging.
                    None => true,
                }
            });
            hits
        });
    }
}

impl FramePicker for FrustumPicker {
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

impl std::fmt::Debug for FrustumPicker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrustumPicker")
            .field("base", &self.base)
            .field("owner", &self.owner())
            .field("explicit_projection", &self.projection().is_some())
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
    use glam::Vec3;

    /// Reports every collider whose owner's world sphere is in the frustum.
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

    /// One unit-box node at `node_pos`, camera at the origin looking at `look`.
    fn rig(node_pos: Vec3, look: Vec3) -> (Arc<Scene>, NodeId, FrustumPicker) {
        let scene = Arc::new(Scene::new());
        let node = {
            let mut graph = scene.graph();
            let node = graph.insert(
                None,
                LocalNode {
                    local_bounds: Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(0.5)),
                    local_transform: Mat4::from_translation(node_pos),
                    ..Default::default()
                },
            );
            let _ = graph.attach_collider(node, Collider::default()).unwrap();
            graph.set_camera(Camera {
                view: Mat4::look_at_rh(Vec3::ZERO, look, Vec3::Y),
                projection: Mat4::perspective_rh(FRAC_PI_2, 1.0, 0.1, 100.0),
            });
            graph.commit();
            node
        };
        let picker = FrustumPicker::new(
            Arc::clone(&scene),
            Arc::new(VisibilityTester),
            Arc::new(SensorHub::new()),
            PickerConfig::default(),
        );
        (scene, node, picker)
    }

    #[test]
    fn camera_mode_picks_what_the_camera_sees() {
        let (_scene, node, picker) = rig(Vec3::new(0.0, 0.0, -5.0), Vec3::NEG_Z);
        picker.pick_once();
        let picked = picker.base().picked();
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].node, node);
    }

    #[test]
    fn camera_mode_misses_what_is_behind_it() {
        let (_scene, _node, picker) = rig(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        picker.pick_once();
        assert!(picker.base().picked().is_empty());
    }

    #[test]
    fn explicit_projection_discards_scanned_hits_outside_it() {
        // Camera turned around so the scan sees the +Z node; the explicit
        // projection at the origin-anchored owner looks down -Z and must
        // throw the candidate away.
        let (scene, _node, picker) = rig(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        let anchor = {
            let mut graph = scene.graph();
            let anchor = graph.insert(None, LocalNode::default());
            graph.commit();
            anchor
        };

        picker.pick_once();
        assert_eq!(picker.base().picked().len(), 1, "scan sees the node");

        picker.set_owner(Some(anchor));
        picker.set_projection(Some(Mat4::perspective_rh(FRAC_PI_2, 1.0, 0.1, 100.0)));
        picker.pick_once();
        assert!(
            picker.base().picked().is_empty(),
            "secondary test in owner space excludes the hit"
        );
    }

    #[test]
    fn explicit_projection_keeps_hits_inside_it() {
        let (scene, node, picker) = rig(Vec3::new(0.0, 0.0, -5.0), Vec3::NEG_Z);
        let anchor = {
            let mut graph = scene.graph();
            let anchor = graph.insert(None, LocalNode::default());
            graph.commit();
            anchor
        };

        picker.set_owner(Some(anchor));
        picker.set_projection(Some(Mat4::perspective_rh(FRAC_PI_2, 1.0, 0.1, 100.0)));
        picker.pick_once();
        let picked = picker.base().picked();
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].node, node);
    }

    #[test]
    fn stale_owner_falls_back_to_the_camera_volume() {
        let (scene, _node, picker) = rig(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        let anchor = {
            let mut graph = scene.graph();
            let anchor = graph.insert(None, LocalNode::default());
            graph.commit();
            anchor
        };
        picker.set_owner(Some(anchor));
        picker.set_projection(Some(Mat4::perspective_rh(FRAC_PI_2, 1.0, 0.1, 100.0)));
        scene.graph().remove(anchor);

        picker.pick_once();
        assert_eq!(
            picker.base().picked().len(),
            1,
            "with the owner gone, the camera volume alone decides"
        );
    }
}
