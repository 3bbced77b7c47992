// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A pointer ray entering, touching, and leaving a scene object.
//!
//! The scene holds a pickable ball and a closer but unpickable sign; the sign
//! is scanned and then dropped during resolution (run with `RUST_LOG=debug`
//! to see the drop).
//!
//! Run:
//! - `cargo run -p canopy_examples --example picking_basics`

use std::sync::{Arc, Mutex};

use canopy_geom::{Aabb, Frustum, Ray, Sphere};
use canopy_pick::{
    Controller, HitTester, PickCoordinator, PickListener, PickedObject, PickerConfig, RawHit,
    sort_hits,
};
use canopy_scene::{Collider, LocalNode, NodeFlags, Scene, SceneGraph};
use glam::{Mat4, Vec3};

struct SphereCast;

impl HitTester for SphereCast {
    fn test_ray(&self, graph: &SceneGraph, ray: Ray) -> Vec<RawHit> {
        let mut hits: Vec<RawHit> = graph
            .colliders()
            .filter_map(|(collider, owner, _)| {
                // Invisible nodes are not scanned at all.
                if !graph.flags(owner)?.contains(NodeFlags::VISIBLE) {
                    return None;
                }
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

struct Wand {
    ray: Mutex<Ray>,
    touching: Mutex<bool>,
}

impl Controller for Wand {
    fn pick_ray(&self) -> Ray {
        *self.ray.lock().unwrap()
    }

    fn is_touching(&self) -> bool {
        *self.touching.lock().unwrap()
    }
}

struct Shout;

impl PickListener for Shout {
    fn on_enter(&self, hit: &PickedObject) {
        println!("  enter       {:?} at distance {:.2}", hit.node, hit.distance);
    }
    fn on_exit(&self, hit: &PickedObject) {
        println!("  exit        {:?}", hit.node);
    }
    fn on_inside(&self, hit: &PickedObject) {
        println!("  inside      {:?} (touched: {})", hit.node, hit.touched);
    }
    fn on_touch_start(&self, hit: &PickedObject) {
        println!("  touch start {:?}", hit.node);
    }
    fn on_touch_end(&self, hit: &PickedObject) {
        println!("  touch end   {:?}", hit.node);
    }
    fn on_pick(&self, picked: &[PickedObject]) {
        println!("  pick        ({} object(s))", picked.len());
    }
    fn on_no_pick(&self) {
        println!("  no pick");
    }
}

fn main() {
    env_logger::init();

    let scene = Arc::new(Scene::new());
    let ball = {
        let mut graph = scene.graph();
        let ball = graph.insert(
            None,
            LocalNode {
                local_bounds: Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(0.5)),
                local_transform: Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0)),
                ..Default::default()
            },
        );
        let _ = graph.attach_collider(ball, Collider::default());

        // Closer to the camera, but not pickable.
        let sign = graph.insert(
            None,
            LocalNode {
                local_bounds: Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(0.5)),
                local_transform: Mat4::from_translation(Vec3::new(0.0, 0.0, -2.0)),
                flags: NodeFlags::VISIBLE,
            },
        );
        let _ = graph.attach_collider(sign, Collider::default());
        graph.commit();
        ball
    };

    let coordinator = PickCoordinator::new(scene, Arc::new(SphereCast));
    let picker = coordinator.ray_picker(PickerConfig::default());
    let wand = Arc::new(Wand {
        ray: Mutex::new(Ray::new(Vec3::ZERO, Vec3::NEG_Z)),
        touching: Mutex::new(false),
    });
    picker.set_controller(Some(wand.clone()));
    picker.add_listener(Arc::new(Shout));

    println!("== Frame 1: pointing at the ball ==");
    coordinator.frame();
    let picked = picker.picked();
    assert_eq!(picked.len(), 1, "the sign was dropped, the ball picked");
    assert_eq!(picked[0].node, ball);

    println!("== Frame 2: trigger held ==");
    *wand.touching.lock().unwrap() = true;
    coordinator.frame();

    println!("== Frame 3: trigger released, pointing away ==");
    *wand.touching.lock().unwrap() = false;
    *wand.ray.lock().unwrap() = Ray::new(Vec3::ZERO, Vec3::Y);
    coordinator.frame();
    assert!(picker.picked().is_empty());
}
