// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=canopy_pick --heading-base-level=0

//! Canopy Pick: frame-coherent picking for 3D scene graphs.
//!
//! A pick pass scans the scene, resolves raw collider hits back to live nodes,
//! and folds them into the previous pass to produce enter, exit, inside, and
//! touch transitions plus a pick / no-pick summary. Scans go through the
//! [`HitTester`] trait, so any hit engine that can answer ray, sphere-set, and
//! frustum queries plugs in.
//!
//! - [`Picker`] is the ray picker: it follows a [`Controller`]'s pointing ray
//!   once per frame, or an explicit ray via [`Picker::pick_with_ray`].
//! - [`BoundsPicker`] scans with a list of moving world-space spheres instead
//!   of a ray, [`FrustumPicker`] with a view volume, and [`ObjectPicker`] by
//!   bounds overlap against one chosen node. All three embed a [`Picker`] and
//!   share its tracking, listener, and sensor pipeline.
//! - [`SensorHub`] forwards each transition to the nearest enclosing node that
//!   registered as a sensor, so a hand-off zone can listen for everything that
//!   happens inside its subtree.
//! - [`PickCoordinator`] owns the shared wiring for one scene and drives every
//!   registered picker once per [`PickCoordinator::frame`], in registration
//!   order.
//!
//! Listener dispatch never runs under the scene or tracker locks, so listeners
//! are free to mutate the scene, re-arm pickers, or unregister themselves.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use canopy_geom::{Aabb, Frustum, Ray, Sphere};
//! use canopy_pick::{HitTester, Picker, PickerConfig, RawHit, sort_hits};
//! use canopy_scene::{Collider, LocalNode, Scene, SceneGraph};
//! use glam::Vec3;
//!
//! // A toy hit engine that ray-casts every collider's world bounding sphere.
//! struct SphereCast;
//!
//! impl HitTester for SphereCast {
//!     fn test_ray(&self, graph: &SceneGraph, ray: Ray) -> Vec<RawHit> {
//!         let mut hits: Vec<RawHit> = graph
//!             .colliders()
//!             .filter_map(|(collider, owner, _)| {
//!                 let sphere = graph.world_sphere(owner)?;
//!                 let distance = ray.intersect_sphere(&sphere)?;
//!                 Some(RawHit {
//!                     collider,
//!                     position: ray.at(distance),
//!                     distance,
//!                     collidable_index: None,
//!                 })
//!             })
//!             .collect();
//!         sort_hits(&mut hits);
//!         hits
//!     }
//!
//!     fn test_spheres(&self, _: &SceneGraph, _: &[(usize, Sphere)]) -> Vec<RawHit> {
//!         Vec::new()
//!     }
//!
//!     fn test_frustum(&self, _: &SceneGraph, _: &Frustum) -> Vec<RawHit> {
//!         Vec::new()
//!     }
//! }
//!
//! let scene = Arc::new(Scene::new());
//! let ball = {
//!     let mut graph = scene.graph();
//!     let ball = graph.insert(
//!         None,
//!         LocalNode {
//!             local_bounds: Aabb::from_center_half_extents(
//!                 Vec3::new(0.0, 0.0, -5.0),
//!                 Vec3::splat(0.5),
//!             ),
//!             ..Default::default()
//!         },
//!     );
//!     let _ = graph.attach_collider(ball, Collider::default());
//!     graph.commit();
//!     ball
//! };
//!
//! let picker = Picker::new(scene, Arc::new(SphereCast), Arc::default(), PickerConfig::default());
//! picker.pick_with_ray(Ray::new(Vec3::ZERO, Vec3::NEG_Z));
//!
//! let picked = picker.picked();
//! assert_eq!(picked.len(), 1);
//! assert_eq!(picked[0].node, ball);
//! ```
//!
//! ### Float semantics
//!
//! Hit distances are finite `f32`. Ordering uses `f32::total_cmp`, so a NaN
//! from a misbehaving hit engine sorts deterministically instead of panicking,
//! but testers are expected not to produce one.

pub mod bounds;
pub mod coordinator;
pub mod events;
pub mod frustum;
pub mod object;
pub mod picker;
pub mod sensor;
pub mod tracker;
pub mod types;

pub use bounds::{BoundsPicker, CollidableList};
pub use coordinator::PickCoordinator;
pub use events::{EventOptions, PickListener};
pub use frustum::FrustumPicker;
pub use object::ObjectPicker;
pub use picker::{FramePicker, Picker, PickerConfig};
pub use sensor::{SensorEvent, SensorHub, SensorListener};
pub use tracker::{CollisionTracker, PassEvents, Summary, Transition, TransitionKind};
pub use types::{Controller, HitTester, PickedObject, PickerId, RawHit, sort_hits};

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use canopy_geom::{Aabb, Frustum, Ray, Sphere};
    use canopy_scene::{Collider, LocalNode, NodeId, Scene, SceneGraph};
    use glam::Vec3;

    use super::*;

    struct SphereCast;

    impl HitTester for SphereCast {
        fn test_ray(&self, graph: &SceneGraph, ray: Ray) -> Vec<RawHit> {
            let mut hits: Vec<RawHit> = graph
                .colliders()
                .filter_map(|(collider, owner, _)| {
                    let sphere = graph.world_sphere(owner)?;
                    let distance = ray.intersect_sphere(&sphere)?;
                    Some(RawHit {
                        collider,
                        position: ray.at(distance),
                        distance,
                        collidable_index: None,
                    })
                })
                .collect();
            sort_hits(&mut hits);
            hits
        }

        fn test_spheres(&self, _: &SceneGraph, _: &[(usize, Sphere)]) -> Vec<RawHit> {
            Vec::new()
        }

        fn test_frustum(&self, _: &SceneGraph, _: &Frustum) -> Vec<RawHit> {
            Vec::new()
        }
    }

    struct Swivel {
        ray: Mutex<Ray>,
    }

    impl Controller for Swivel {
        fn pick_ray(&self) -> Ray {
            *self.ray.lock().unwrap()
        }
    }

    struct NameLog {
        log: Mutex<Vec<&'static str>>,
    }

    impl PickListener for NameLog {
        fn on_enter(&self, _hit: &PickedObject) {
            self.log.lock().unwrap().push("enter");
        }
        fn on_exit(&self, _hit: &PickedObject) {
            self.log.lock().unwrap().push("exit");
        }
        fn on_inside(&self, _hit: &PickedObject) {
            self.log.lock().unwrap().push("inside");
        }
        fn on_pick(&self, _picked: &[PickedObject]) {
            self.log.lock().unwrap().push("pick");
        }
        fn on_no_pick(&self) {
            self.log.lock().unwrap().push("no-pick");
        }
    }

    fn ball_scene() -> (Arc<Scene>, NodeId, NodeId) {
        let scene = Arc::new(Scene::new());
        let mut graph = scene.graph();
        let zone = graph.insert(None, LocalNode::default());
        let ball = graph.insert(
            Some(zone),
            LocalNode {
                local_bounds: Aabb::from_center_half_extents(
                    Vec3::new(0.0, 0.0, -5.0),
                    Vec3::splat(0.5),
                ),
                ..Default::default()
            },
        );
        let _ = graph.attach_collider(ball, Collider::default()).unwrap();
        graph.commit();
        drop(graph);
        (scene, zone, ball)
    }

    #[test]
    fn frames_produce_the_full_membership_cycle() {
        let (scene, _zone, _ball) = ball_scene();
        let coordinator = PickCoordinator::new(scene, Arc::new(SphereCast));
        let picker = coordinator.ray_picker(PickerConfig::default());

        let controller = Arc::new(Swivel {
            ray: Mutex::new(Ray::new(Vec3::ZERO, Vec3::NEG_Z)),
        });
        picker.set_controller(Some(controller.clone()));
        let log = Arc::new(NameLog {
            log: Mutex::new(Vec::new()),
        });
        picker.add_listener(log.clone());

        coordinator.frame();
        coordinator.frame();
        *controller.ray.lock().unwrap() = Ray::new(Vec3::ZERO, Vec3::X);
        coordinator.frame();

        assert_eq!(
            log.log.lock().unwrap().as_slice(),
            &["enter", "pick", "inside", "pick", "exit", "no-pick"]
        );
        assert!(picker.picked().is_empty());
    }

    #[test]
    fn sensors_hear_about_descendant_hits() {
        struct OverLog {
            overs: Mutex<Vec<bool>>,
        }
        impl SensorListener for OverLog {
            fn on_sensor_event(&self, event: &SensorEvent) {
                self.overs.lock().unwrap().push(event.over);
            }
        }

        let (scene, zone, ball) = ball_scene();
        let coordinator = PickCoordinator::new(scene, Arc::new(SphereCast));
        coordinator.sensors().attach(zone);
        let overs = Arc::new(OverLog {
            overs: Mutex::new(Vec::new()),
        });
        coordinator.sensors().add_listener(zone, overs.clone());

        let picker = coordinator.ray_picker(PickerConfig::default());
        let controller = Arc::new(Swivel {
            ray: Mutex::new(Ray::new(Vec3::ZERO, Vec3::NEG_Z)),
        });
        picker.set_controller(Some(controller.clone()));

        coordinator.frame();
        *controller.ray.lock().unwrap() = Ray::new(Vec3::ZERO, Vec3::X);
        coordinator.frame();

        // The zone never held a collider itself; the ball's enter and exit
        // were routed up to it.
        assert_ne!(zone, ball);
        assert_eq!(overs.overs.lock().unwrap().as_slice(), &[true, false]);
    }
}
