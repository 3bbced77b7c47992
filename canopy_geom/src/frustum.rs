// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frustum planes extracted from a view-projection matrix.
//!
//! ## Overview
//!
//! [`Frustum::from_matrix`] uses the Gribb-Hartmann plane extraction: each clip
//! plane is a sum or difference of rows of the view-projection matrix, then
//! normalized so signed distances are in world units.
//!
//! The depth range is assumed to be `[0, 1]`, matching
//! [`glam::Mat4::perspective_rh`] and the common wgpu/Vulkan convention. For a
//! GL-style `[-1, 1]` matrix the near plane would differ; callers using such
//! matrices should convert first.

use glam::{Mat4, Vec3, Vec4};

use crate::types::Sphere;

/// A plane in the form `normal · p + d = 0`, with the positive half-space inside.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Plane {
    /// Plane normal, pointing into the frustum.
    pub normal: Vec3,
    /// Signed offset along the normal.
    pub d: f32,
}

impl Plane {
    /// Build a plane from a clip-row combination `(nx, ny, nz, d)`.
    pub fn from_vec4(v: Vec4) -> Self {
        Self {
            normal: v.truncate(),
            d: v.w,
        }
    }

    /// The same plane scaled so `normal` has unit length.
    ///
    /// A degenerate (zero-normal) plane is returned unchanged.
    pub fn normalized(&self) -> Self {
        let len = self.normal.length();
        if len > 0.0 {
            Self {
                normal: self.normal / len,
                d: self.d / len,
            }
        } else {
            *self
        }
    }

    /// Signed distance from the plane to a point; positive is inside.
    pub fn distance_to_point(&self, p: Vec3) -> f32 {
        self.normal.dot(p) + self.d
    }
}

/// The six planes of a viewing volume, in order left, right, bottom, top, near, far.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Frustum {
    /// Normalized clip planes with normals pointing inward.
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Extract frustum planes from a view-projection matrix.
    pub fn from_matrix(vp: Mat4) -> Self {
        let r0 = vp.row(0);
        let r1 = vp.row(1);
        let r2 = vp.row(2);
        let r3 = vp.row(3);
        Self {
            planes: [
                Plane::from_vec4(r3 + r0).normalized(), // left
                Plane::from_vec4(r3 - r0).normalized(), // right
                Plane::from_vec4(r3 + r1).normalized(), // bottom
                Plane::from_vec4(r3 - r1).normalized(), // top
                Plane::from_vec4(r2).normalized(),      // near, depth range [0, 1]
                Plane::from_vec4(r3 - r2).normalized(), // far
            ],
        }
    }

    /// Whether a sphere overlaps the frustum volume.
    ///
    /// A sphere entirely on the outside of any single plane is rejected; this
    /// is the usual conservative test and may accept spheres near corners that
    /// a precise test would reject. NaN distances reject.
    pub fn intersects_sphere(&self, sphere: Sphere) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(sphere.center) >= -sphere.radius)
    }

    /// Whether a point lies inside or on the boundary of the frustum.
    pub fn contains_point(&self, p: Vec3) -> bool {
        self.planes.iter().all(|pl| pl.distance_to_point(p) >= 0.0)
    }
}
