// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=canopy_scene --heading-base-level=0

//! Canopy Scene: a 3D scene graph with generational handles and collider ownership.
//!
//! Canopy Scene is the structural layer picking operates on.
//!
//! - Nodes carry a local transform, local AABB bounds, and visibility/pickability flags.
//! - [`SceneGraph::commit`] recomputes world transforms, world-space AABBs, and
//!   enclosing bounding spheres for every node, top-down.
//! - [`NodeId`] and [`ColliderId`] are generational: a handle to removed content
//!   goes stale and is rejected by every accessor, even after its slot is reused.
//! - Colliders are opaque pickable proxies owned by nodes. A hit engine reports
//!   collider identifiers; this crate resolves them back to owning nodes and
//!   per-collider configuration (enabled, maximum pick distance).
//! - [`Scene`] wraps the graph in a mutex so scans and mutations can come from
//!   different threads.
//!
//! # Example
//!
//! ```rust
//! use canopy_geom::Aabb;
//! use canopy_scene::{Collider, LocalNode, Scene};
//! use glam::{Mat4, Vec3};
//!
//! let scene = Scene::new();
//! let mut graph = scene.graph();
//!
//! // A unit box pushed out along -Z.
//! let body = graph.insert(
//!     None,
//!     LocalNode {
//!         local_bounds: Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(0.5)),
//!         local_transform: Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0)),
//!         ..Default::default()
//!     },
//! );
//! let collider = graph.attach_collider(body, Collider::default()).unwrap();
//! graph.commit();
//!
//! let sphere = graph.world_sphere(body).unwrap();
//! assert_eq!(sphere.center, Vec3::new(0.0, 0.0, -5.0));
//! assert_eq!(graph.collider_owner(collider), Some(body));
//! ```
//!
//! ### Float semantics
//!
//! This crate assumes no NaNs in transforms and bounds. Debug builds may assert.

pub mod graph;
pub mod scene;
pub mod types;

mod colliders;

pub use graph::SceneGraph;
pub use scene::Scene;
pub use types::{Camera, Collider, ColliderId, LocalNode, NodeFlags, NodeId};
