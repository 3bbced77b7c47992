// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit records and the external capability traits picking is built on.

use std::sync::atomic::{AtomicU32, Ordering};

use canopy_geom::{Frustum, Ray, Sphere};
use canopy_scene::{ColliderId, NodeId, SceneGraph};
use glam::Vec3;

/// Identifier for a picker instance, unique within the process.
///
/// Carried by every [`PickedObject`] so listeners shared between pickers can
/// tell which picker produced a hit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PickerId(u32);

static NEXT_PICKER_ID: AtomicU32 = AtomicU32::new(0);

impl PickerId {
    pub(crate) fn next() -> Self {
        Self(NEXT_PICKER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// One raw hit as reported by a [`HitTester`].
///
/// Raw hits carry collider identity only; resolution back to the owning node
/// and per-collider configuration happens inside the picker, under the scan
/// lock.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RawHit {
    /// The collider that was hit.
    pub collider: ColliderId,
    /// World-space hit position.
    pub position: Vec3,
    /// Distance from the query origin.
    pub distance: f32,
    /// For sphere scans, which collidable produced this hit.
    pub collidable_index: Option<usize>,
}

/// One resolved hit: the unit tracked frame-over-frame and handed to listeners.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PickedObject {
    /// The picker that produced this hit.
    pub picker: PickerId,
    /// The collider that was hit.
    pub collider: ColliderId,
    /// The node owning the collider.
    pub node: NodeId,
    /// World-space hit position.
    pub hit_point: Vec3,
    /// Distance from the query origin.
    pub distance: f32,
    /// True while the controller's activation trigger is held.
    pub touched: bool,
    /// For bounds picking, which collidable was struck.
    pub collidable_index: Option<usize>,
}

/// Geometric intersection engine.
///
/// Implementations own the actual intersection math; the picking layer owns
/// the event semantics. Every method returns hits sorted by ascending
/// [`RawHit::distance`] and an empty vector when nothing intersects; none of
/// them may panic on an empty scene.
///
/// Methods receive the scene graph under the scan lock, so world transforms
/// and bounds are stable for the duration of one call.
pub trait HitTester: Send + Sync {
    /// Scan the scene with a world-space ray.
    fn test_ray(&self, graph: &SceneGraph, ray: Ray) -> Vec<RawHit>;

    /// Scan the scene with a batch of collidable spheres.
    ///
    /// Each collidable carries its list index; hits report it back through
    /// [`RawHit::collidable_index`].
    fn test_spheres(&self, graph: &SceneGraph, collidables: &[(usize, Sphere)]) -> Vec<RawHit>;

    /// Scan the scene with a view frustum.
    fn test_frustum(&self, graph: &SceneGraph, frustum: &Frustum) -> Vec<RawHit>;
}

/// Motion and activation source for a picker.
pub trait Controller: Send + Sync {
    /// Current pick ray in world space.
    fn pick_ray(&self) -> Ray;

    /// False while the input source should not drive picking at all.
    fn is_active(&self) -> bool {
        true
    }

    /// True while the activation button or trigger is held.
    fn is_touching(&self) -> bool {
        false
    }
}

/// Sort hits by ascending distance.
///
/// Engines must return sorted hits; this is a convenience for implementations
/// that collect candidates in arbitrary order.
pub fn sort_hits(hits: &mut [RawHit]) {
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_scene::{LocalNode, SceneGraph};

    #[test]
    fn picker_ids_are_unique() {
        let a = PickerId::next();
        let b = PickerId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn sort_orders_by_distance() {
        let mut graph = SceneGraph::new();
        let node = graph.insert(None, LocalNode::default());
        let collider = graph
            .attach_collider(node, canopy_scene::Collider::default())
            .unwrap();
        let hit = |distance: f32| RawHit {
            collider,
            position: Vec3::ZERO,
            distance,
            collidable_index: None,
        };
        let mut hits = vec![hit(3.0), hit(1.0), hit(2.0)];
        sort_hits(&mut hits);
        let distances: Vec<f32> = hits.iter().map(|h| h.distance).collect();
        assert_eq!(distances, vec![1.0, 2.0, 3.0]);
    }
}
