// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::f32::consts::TAU;
use std::sync::Arc;

use canopy_geom::{Aabb, Frustum, Ray, Sphere};
use canopy_pick::{
    CollisionTracker, HitTester, PickedObject, Picker, PickerConfig, RawHit, sort_hits,
};
use canopy_scene::{Collider, LocalNode, Scene, SceneGraph};
use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use glam::{Mat4, Quat, Vec3};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f32(&mut self) -> f32 {
        ((self.next_u64() >> 40) as f32) / ((1u64 << 24) as f32)
    }
}

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

/// `count` collider-bearing balls strung out along `axis` so a single ray
/// from the origin crosses all of them.
fn ball_row(graph: &mut SceneGraph, count: usize, axis: Vec3) {
    for i in 0..count {
        let node = graph.insert(
            None,
            LocalNode {
                local_bounds: Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(0.25)),
                local_transform: Mat4::from_translation(axis * (2.0 + i as f32)),
                ..Default::default()
            },
        );
        let _ = graph.attach_collider(node, Collider::default());
    }
}

fn scattered_scene(count: usize) -> Scene {
    let scene = Scene::new();
    let mut graph = scene.graph();
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    for _ in 0..count {
        let translation = Vec3::new(
            rng.next_f32() * 200.0 - 100.0,
            rng.next_f32() * 200.0 - 100.0,
            rng.next_f32() * 200.0 - 100.0,
        );
        let rotation = Quat::from_rotation_y(rng.next_f32() * TAU);
        let node = graph.insert(
            None,
            LocalNode {
                local_bounds: Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(0.5)),
                local_transform: Mat4::from_rotation_translation(rotation, translation),
                ..Default::default()
            },
        );
        let _ = graph.attach_collider(node, Collider::default());
    }
    drop(graph);
    scene
}

fn bench_scene_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene_commit");
    for &n in &[256usize, 1024, 4096] {
        let scene = scattered_scene(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("flat_n{n}"), |b| {
            b.iter(|| scene.graph().commit());
        });
    }

    let chain = Scene::new();
    {
        let mut graph = chain.graph();
        let mut parent = None;
        for _ in 0..512 {
            let node = graph.insert(
                parent,
                LocalNode {
                    local_bounds: Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(0.5)),
                    local_transform: Mat4::from_translation(Vec3::new(0.1, 0.0, -0.1)),
                    ..Default::default()
                },
            );
            parent = Some(node);
        }
    }
    group.throughput(Throughput::Elements(512));
    group.bench_function("chain_depth512", |b| {
        b.iter(|| chain.graph().commit());
    });
    group.finish();
}

fn bench_tracker(c: &mut Criterion) {
    let mut group = c.benchmark_group("tracker");

    // Two disjoint membership sets built from live scene handles.
    let n = 1024usize;
    let scene = Arc::new(Scene::new());
    {
        let mut graph = scene.graph();
        ball_row(&mut graph, 2 * n, Vec3::NEG_Z);
        graph.commit();
    }
    let picker = Picker::new(
        scene.clone(),
        Arc::new(SphereCast),
        Arc::default(),
        PickerConfig::default(),
    );
    let all: Vec<PickedObject> = {
        let graph = scene.graph();
        graph
            .colliders()
            .enumerate()
            .map(|(i, (collider, node, _))| PickedObject {
                picker: picker.id(),
                collider,
                node,
                hit_point: Vec3::ZERO,
                distance: i as f32,
                touched: false,
                collidable_index: None,
            })
            .collect()
    };
    let first_half = &all[..n];
    let straddle = &all[n / 2..n + n / 2];

    group.throughput(Throughput::Elements(n as u64));
    group.bench_function(format!("steady_n{n}"), |b| {
        b.iter_batched(
            || {
                let mut tracker = CollisionTracker::new();
                let _ = tracker.update(first_half);
                tracker
            },
            |mut tracker| {
                let _ = tracker.update(first_half);
                black_box(tracker.picked().len());
            },
            BatchSize::SmallInput,
        );
    });
    group.bench_function(format!("churn_half_n{n}"), |b| {
        b.iter_batched(
            || {
                let mut tracker = CollisionTracker::new();
                let _ = tracker.update(first_half);
                tracker
            },
            |mut tracker| {
                let _ = tracker.update(straddle);
                black_box(tracker.picked().len());
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_pick_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("pick_pass");
    for &n in &[64usize, 256, 1024] {
        let scene = Arc::new(Scene::new());
        {
            let mut graph = scene.graph();
            ball_row(&mut graph, n, Vec3::NEG_Z);
            graph.commit();
        }
        let picker = Picker::new(
            scene.clone(),
            Arc::new(SphereCast),
            Arc::default(),
            PickerConfig::default(),
        );
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        // Warm pass so the measured passes are steady-state insides.
        picker.pick_with_ray(ray);

        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("steady_n{n}"), |b| {
            b.iter(|| picker.pick_with_ray(ray));
        });
    }

    // Full exit + enter churn: the ray flips between two disjoint rows.
    let scene = Arc::new(Scene::new());
    {
        let mut graph = scene.graph();
        ball_row(&mut graph, 256, Vec3::NEG_Z);
        ball_row(&mut graph, 256, Vec3::Z);
        graph.commit();
    }
    let picker = Picker::new(
        scene.clone(),
        Arc::new(SphereCast),
        Arc::default(),
        PickerConfig::default(),
    );
    let rays = [
        Ray::new(Vec3::ZERO, Vec3::NEG_Z),
        Ray::new(Vec3::ZERO, Vec3::Z),
    ];
    let mut flip = 0usize;
    group.throughput(Throughput::Elements(256));
    group.bench_function("alternating_n256", |b| {
        b.iter(|| {
            flip ^= 1;
            picker.pick_with_ray(rays[flip]);
        });
    });
    group.finish();
}

criterion_group!(benches, bench_scene_commit, bench_tracker, bench_pick_pass);
criterion_main!(benches);
