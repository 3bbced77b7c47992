// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene graph: node and collider identifiers, flags,
//! local geometry, and the camera.

use canopy_geom::Aabb;
use glam::Mat4;

/// Identifier for a node in the scene graph.
///
/// This is a small, copyable handle that stays stable across updates but becomes
/// invalid when the underlying slot is reused.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// ### Liveness
///
/// Use [`SceneGraph::is_alive`](crate::SceneGraph::is_alive) to check whether a `NodeId`
/// still refers to a live node.
/// Stale `NodeId`s never alias a different live node because the generation must match.
///
/// ### Notes
///
/// - The generation increments on slot reuse and never decreases.
/// - `u32` is ample for practical lifetimes; behavior on generation overflow is unspecified.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

/// Identifier for a collider registered with the scene graph.
///
/// Shares the slot + generation scheme of [`NodeId`]: a removed collider's
/// identifier goes stale, and a reused slot produces a distinct identifier.
/// Hit records carry this identity only; resolving it back to a collider can
/// therefore fail when the collider was removed between scan and resolution,
/// which callers must treat as "no hit".
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ColliderId(pub(crate) u32, pub(crate) u32);

impl ColliderId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

bitflags::bitflags! {
    /// Node flags controlling visibility and picking.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node is visible (participates in rendering and visibility queries).
        const VISIBLE  = 0b0000_0001;
        /// Node is pickable (its colliders participate in hit testing).
        const PICKABLE = 0b0000_0010;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::PICKABLE
    }
}

/// Local geometry for a node.
#[derive(Clone, Debug)]
pub struct LocalNode {
    /// Local (untransformed) bounds. For non-axis-aligned content, use a conservative AABB.
    pub local_bounds: Aabb,
    /// Local transform relative to parent space.
    pub local_transform: Mat4,
    /// Visibility and picking flags.
    pub flags: NodeFlags,
}

impl Default for LocalNode {
    fn default() -> Self {
        Self {
            local_bounds: Aabb::ZERO,
            local_transform: Mat4::IDENTITY,
            flags: NodeFlags::default(),
        }
    }
}

/// A geometric-proxy handle's configuration.
///
/// The collider itself is opaque to this layer: intersection geometry lives in
/// whatever hit-testing engine scans the scene. What the scene tracks is the
/// owner node, whether the collider currently participates, and an optional
/// cap on pick distance that resolution applies to reported hits.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Collider {
    /// Whether hits against this collider are accepted.
    pub enabled: bool,
    /// Maximum accepted hit distance, if any.
    pub max_distance: Option<f32>,
}

impl Default for Collider {
    fn default() -> Self {
        Self {
            enabled: true,
            max_distance: None,
        }
    }
}

/// Scene camera: view and projection matrices.
///
/// Used by frustum and object pickers for "visible from the scene's own
/// camera" queries.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    /// World-to-view matrix.
    pub view: Mat4,
    /// View-to-clip matrix, depth range `[0, 1]`.
    pub projection: Mat4,
}

impl Camera {
    /// Combined view-projection matrix.
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        }
    }
}
