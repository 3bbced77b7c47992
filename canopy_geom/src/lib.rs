// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=canopy_geom --heading-base-level=0

//! Canopy Geom: query-shape primitives for 3D picking.
//!
//! This crate is a small building block for the picking layer.
//!
//! - [`Ray`], [`Sphere`], and [`Aabb`] describe query shapes and bounding volumes.
//! - [`Aabb::transformed_by`] computes a conservative world-space box for a
//!   transformed local box (the eight transformed corners, re-boxed).
//! - [`Frustum`] extracts the six clip planes from a view-projection matrix and
//!   answers sphere/point containment queries against them.
//!
//! It does not scan scenes. Higher layers decide *what* to test; this crate only
//! answers the per-shape questions.
//!
//! # Example
//!
//! ```rust
//! use canopy_geom::{Aabb, Frustum, Sphere};
//! use glam::{Mat4, Vec3};
//!
//! // A box ahead of a camera at the origin looking down -Z.
//! let bounds = Aabb::new(Vec3::new(-1.0, -1.0, -6.0), Vec3::new(1.0, 1.0, -4.0));
//! let vp = Mat4::perspective_rh(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0);
//! let frustum = Frustum::from_matrix(vp);
//!
//! assert!(frustum.intersects_sphere(bounds.enclosing_sphere()));
//! assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, 5.0))); // behind the camera
//! ```
//!
//! ## Float semantics
//!
//! This crate assumes no NaNs in coordinates. Plane tests treat a NaN distance
//! as "outside" rather than asserting.

pub mod frustum;
pub mod types;

pub use frustum::{Frustum, Plane};
pub use types::{Aabb, Ray, Sphere};
