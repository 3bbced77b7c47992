// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pick events routed to the nearest sensor ancestor.
//!
//! A "zone" node registers as a sensor and hears about every hit inside its
//! subtree, even though the zone itself carries no collider. Hits outside any
//! sensor subtree are dropped.
//!
//! Run:
//! - `cargo run -p canopy_examples --example sensor_propagation`

use std::sync::{Arc, Mutex};

use canopy_geom::{Aabb, Frustum, Ray, Sphere};
use canopy_pick::{
    Controller, HitTester, PickCoordinator, PickerConfig, RawHit, SensorEvent, SensorListener,
    sort_hits,
};
use canopy_scene::{Collider, LocalNode, Scene, SceneGraph};
use glam::{Mat4, Vec3};

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

struct ZoneLog {
    overs: Mutex<Vec<bool>>,
}

impl SensorListener for ZoneLog {
    fn on_sensor_event(&self, event: &SensorEvent) {
        println!(
            "  sensor {:?}: over={} (hit on {:?})",
            event.sensor, event.over, event.hit.node
        );
        self.overs.lock().unwrap().push(event.over);
    }
}

fn main() {
    env_logger::init();

    let scene = Arc::new(Scene::new());
    let (zone, finger) = {
        let mut graph = scene.graph();
        // zone -> palm -> finger, with the collider on the fingertip only.
        let zone = graph.insert(None, LocalNode::default());
        let palm = graph.insert(Some(zone), LocalNode::default());
        let finger = graph.insert(
            Some(palm),
            LocalNode {
                local_bounds: Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(0.5)),
                local_transform: Mat4::from_translation(Vec3::new(0.0, 0.0, -4.0)),
                ..Default::default()
            },
        );
        let _ = graph.attach_collider(finger, Collider::default());

        // A sensor-less object off to the side; its events go nowhere.
        let table = graph.insert(
            None,
            LocalNode {
                local_bounds: Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(0.5)),
                local_transform: Mat4::from_translation(Vec3::new(4.0, 0.0, 0.0)),
                ..Default::default()
            },
        );
        let _ = graph.attach_collider(table, Collider::default());
        graph.commit();
        (zone, finger)
    };

    let coordinator = PickCoordinator::new(scene, Arc::new(SphereCast));
    coordinator.sensors().attach(zone);
    let log = Arc::new(ZoneLog {
        overs: Mutex::new(Vec::new()),
    });
    coordinator.sensors().add_listener(zone, log.clone());

    let picker = coordinator.ray_picker(PickerConfig::default());
    let swivel = Arc::new(Swivel {
        ray: Mutex::new(Ray::new(Vec3::ZERO, Vec3::NEG_Z)),
    });
    picker.set_controller(Some(swivel.clone()));

    println!("== Frame 1: pointing at the fingertip ==");
    coordinator.frame();
    assert_eq!(coordinator.sensors().last_hit(zone).map(|h| h.node), Some(finger));

    println!("== Frame 2: swinging over to the table ==");
    *swivel.ray.lock().unwrap() = Ray::new(Vec3::ZERO, Vec3::X);
    coordinator.frame();

    // The zone heard the fingertip enter and exit; the table's enter had no
    // sensor above it and was dropped.
    assert_eq!(log.overs.lock().unwrap().as_slice(), &[true, false]);
}
