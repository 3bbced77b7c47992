// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sphere probes scanning a scene through a bounds picker.
//!
//! Two probes sweep over two stations; hits report which probe struck via
//! `collidable_index`, and removed probe slots are reused by later adds.
//!
//! Run:
//! - `cargo run -p canopy_examples --example bounds_collidables`

use std::sync::{Arc, Mutex};

use canopy_geom::{Aabb, Frustum, Ray, Sphere};
use canopy_pick::{
    HitTester, PickCoordinator, PickListener, PickedObject, PickerConfig, RawHit, sort_hits,
};
use canopy_scene::{Collider, LocalNode, Scene, SceneGraph};
use glam::{Mat4, Vec3};

struct Overlap;

impl HitTester for Overlap {
    fn test_ray(&self, _: &SceneGraph, _: Ray) -> Vec<RawHit> {
        Vec::new()
    }

    fn test_spheres(&self, graph: &SceneGraph, collidables: &[(usize, Sphere)]) -> Vec<RawHit> {
        let mut hits = Vec::new();
        for &(index, probe) in collidables {
            for (collider, owner, _) in graph.colliders() {
                let Some(sphere) = graph.world_sphere(owner) else {
                    continue;
                };
                if probe.intersects(&sphere) {
                    hits.push(RawHit {
                        collider,
                        position: sphere.center,
                        distance: probe.center.distance(sphere.center),
                        collidable_index: Some(index),
                    });
                }
            }
        }
        sort_hits(&mut hits);
        hits
    }

    fn test_frustum(&self, _: &SceneGraph, _: &Frustum) -> Vec<RawHit> {
        Vec::new()
    }
}

struct ProbeLog {
    entries: Mutex<Vec<Option<usize>>>,
}

impl PickListener for ProbeLog {
    fn on_enter(&self, hit: &PickedObject) {
        println!("  enter {:?} via probe {:?}", hit.node, hit.collidable_index);
        self.entries.lock().unwrap().push(hit.collidable_index);
    }
    fn on_exit(&self, hit: &PickedObject) {
        println!("  exit  {:?}", hit.node);
    }
}

fn main() {
    env_logger::init();

    let scene = Arc::new(Scene::new());
    {
        let mut graph = scene.graph();
        for x in [-3.0_f32, 3.0] {
            let station = graph.insert(
                None,
                LocalNode {
                    local_bounds: Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(0.5)),
                    local_transform: Mat4::from_translation(Vec3::new(x, 0.0, 0.0)),
                    ..Default::default()
                },
            );
            let _ = graph.attach_collider(station, Collider::default());
        }
        graph.commit();
    }

    let coordinator = PickCoordinator::new(scene, Arc::new(Overlap));
    let picker = coordinator.bounds_picker(PickerConfig::default());
    let log = Arc::new(ProbeLog {
        entries: Mutex::new(Vec::new()),
    });
    picker.base().add_listener(log.clone());

    println!("== Frame 1: left probe over the left station, right probe idle ==");
    let left = picker.add_collidable(Sphere::new(Vec3::new(-3.0, 0.0, 0.0), 0.75));
    let right = picker.add_collidable(Sphere::new(Vec3::new(3.0, 5.0, 0.0), 0.75));
    coordinator.frame();
    assert_eq!(picker.base().picked().len(), 1);

    println!("== Frame 2: right probe drops onto the right station ==");
    picker.collidables().update(right, Sphere::new(Vec3::new(3.0, 0.0, 0.0), 0.75));
    coordinator.frame();
    assert_eq!(picker.base().picked().len(), 2);

    println!("== Frame 3: left probe removed ==");
    picker.remove_collidable(left);
    coordinator.frame();
    assert_eq!(picker.base().picked().len(), 1);

    // The freed slot is reused by the next add.
    let reused = picker.add_collidable(Sphere::new(Vec3::ZERO, 0.1));
    println!("new probe took slot {reused} (was {left})");
    assert_eq!(reused, left);
    assert_eq!(log.entries.lock().unwrap().as_slice(), &[Some(left), Some(right)]);
}
