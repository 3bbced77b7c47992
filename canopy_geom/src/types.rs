// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive query shapes and bounding volumes.

use glam::{Mat4, Vec3};

/// A ray in world space.
///
/// `direction` does not need to be normalized; callers that report distances
/// along the ray should either normalize at the source or measure in
/// multiples of `direction`'s length. [`Ray::normalized`] is provided for the
/// former.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    /// Ray origin.
    pub origin: Vec3,
    /// Ray direction.
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray from an origin and a direction.
    pub const fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// The point at parameter `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// The same ray with a unit-length direction.
    ///
    /// A zero direction is returned unchanged.
    pub fn normalized(&self) -> Self {
        let len_sq = self.direction.length_squared();
        if len_sq > 0.0 {
            Self {
                origin: self.origin,
                direction: self.direction / len_sq.sqrt(),
            }
        } else {
            *self
        }
    }

    /// Distance along the ray to the nearest intersection with `sphere`.
    ///
    /// Distances are in multiples of `direction`'s length. Returns `None` for
    /// a miss, a sphere entirely behind the origin, or a zero direction. An
    /// origin inside the sphere reports the exit point.
    pub fn intersect_sphere(&self, sphere: &Sphere) -> Option<f32> {
        let a = self.direction.length_squared();
        if a == 0.0 {
            return None;
        }
        let oc = self.origin - sphere.center;
        let half_b = oc.dot(self.direction);
        let c = oc.length_squared() - sphere.radius * sphere.radius;
        let discriminant = half_b * half_b - a * c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrt_d = discriminant.sqrt();
        let near = (-half_b - sqrt_d) / a;
        if near >= 0.0 {
            return Some(near);
        }
        let far = (-half_b + sqrt_d) / a;
        (far >= 0.0).then_some(far)
    }
}

/// A sphere, used as a bounding volume and as a bounds-picking query shape.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sphere {
    /// Center point.
    pub center: Vec3,
    /// Radius. Zero is valid and describes a point.
    pub radius: f32,
}

impl Sphere {
    /// Create a sphere from a center and radius.
    pub const fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Transform the sphere by an affine matrix.
    ///
    /// The center is transformed exactly; the radius is scaled by the largest
    /// axis scale factor, which is conservative under non-uniform scale.
    pub fn transformed_by(&self, m: Mat4) -> Self {
        let scale = m
            .x_axis
            .truncate()
            .length()
            .max(m.y_axis.truncate().length())
            .max(m.z_axis.truncate().length());
        Self {
            center: m.transform_point3(self.center),
            radius: self.radius * scale,
        }
    }

    /// Whether two spheres overlap (touching counts).
    pub fn intersects(&self, other: &Self) -> bool {
        let r = self.radius + other.radius;
        self.center.distance_squared(other.center) <= r * r
    }
}

/// Axis-aligned bounding box in 3D.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// The degenerate box containing only the origin.
    pub const ZERO: Self = Self {
        min: Vec3::ZERO,
        max: Vec3::ZERO,
    };

    /// Create a new AABB from min/max corners.
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB from a center point and half extents.
    pub fn from_center_half_extents(center: Vec3, half: Vec3) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Center point of the box.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Whether this AABB contains the point (boundary inclusive).
    pub fn contains_point(&self, p: Vec3) -> bool {
        self.min.x <= p.x
            && self.min.y <= p.y
            && self.min.z <= p.z
            && p.x <= self.max.x
            && p.y <= self.max.y
            && p.z <= self.max.z
    }

    /// Whether two AABBs overlap (touching counts).
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
            && self.min.z <= other.max.z
            && other.min.z <= self.max.z
    }

    /// Return true if the AABB is inverted (no volume). Assumes no NaN.
    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y || self.max.z < self.min.z
    }

    /// Conservative AABB of this box under an affine transform.
    ///
    /// Transforms the eight corners and re-boxes them, so rotation expands the
    /// result rather than shearing it.
    pub fn transformed_by(&self, m: Mat4) -> Self {
        let corners = [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ];
        let first = m.transform_point3(corners[0]);
        let mut out = Self {
            min: first,
            max: first,
        };
        for c in &corners[1..] {
            let p = m.transform_point3(*c);
            out.min = out.min.min(p);
            out.max = out.max.max(p);
        }
        out
    }

    /// The smallest sphere enclosing this box.
    pub fn enclosing_sphere(&self) -> Sphere {
        let center = self.center();
        Sphere {
            center,
            radius: (self.max - center).length(),
        }
    }
}
