// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core scene graph implementation: structure, transforms, bounds, colliders.

use canopy_geom::{Aabb, Sphere};
use glam::Mat4;

use crate::colliders::ColliderArena;
use crate::types::{Camera, Collider, ColliderId, LocalNode, NodeFlags, NodeId};

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Top-level scene graph.
///
/// Nodes live in a slot arena addressed by generational [`NodeId`]s; colliders
/// live in a parallel arena addressed by [`ColliderId`]s and each knows its
/// owning node. World transforms and bounds are recomputed by [`SceneGraph::commit`].
pub struct SceneGraph {
    nodes: Vec<Option<Node>>, // slots
    generations: Vec<u32>,    // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    colliders: ColliderArena,
    camera: Camera,
}

impl std::fmt::Debug for SceneGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let free = self.free_list.len();
        f.debug_struct("SceneGraph")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &free)
            .field("colliders_alive", &self.colliders.alive_len())
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
struct WorldNode {
    world_transform: Mat4,
    world_bounds: Aabb,   // AABB of the transformed local bounds
    world_sphere: Sphere, // sphere enclosing world_bounds
}

impl WorldNode {
    fn new() -> Self {
        Self {
            world_transform: Mat4::IDENTITY,
            world_bounds: Aabb::ZERO,
            world_sphere: Aabb::ZERO.enclosing_sphere(),
        }
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    colliders: Vec<ColliderId>,
    local: LocalNode,
    world: WorldNode,
}

impl Node {
    fn new(generation: u32, local: LocalNode) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            colliders: Vec::new(),
            local,
            world: WorldNode::new(),
        }
    }
}

impl SceneGraph {
    /// Create a new empty scene graph.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            colliders: ColliderArena::default(),
            camera: Camera::default(),
        }
    }

    /// Insert a new node as a child of `parent` (or as a root if `None`).
    ///
    /// A stale `parent` is dropped (logged at debug level) and the new node
    /// is inserted as a root.
    pub fn insert(&mut self, parent: Option<NodeId>, local: LocalNode) -> NodeId {
        let parent = match parent {
            Some(p) if !self.is_alive(p) => {
                log::debug!("insert: stale parent {p:?}, inserting as a root");
                None
            }
            other => other,
        };
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, local));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, local)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = NodeId::new(idx, generation);
        if let Some(p) = parent {
            self.link_parent(id, p);
        }
        id
    }

    /// Remove a node and its subtree, detaching every collider owned by it.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        let children = self.node(id).children.clone();
        for child in children {
            self.remove(child);
        }
        let colliders = std::mem::take(&mut self.node_mut(id).colliders);
        for cid in colliders {
            let _ = self.colliders.remove(cid);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Reparent `id` under `new_parent` (or detach it to a root with `None`).
    ///
    /// No-op when `id` or `new_parent` is stale; a stale parent is logged at
    /// debug level and the node keeps its current parent.
    pub fn reparent(&mut self, id: NodeId, new_parent: Option<NodeId>) {
        if !self.is_alive(id) {
            return;
        }
        let new_parent = match new_parent {
            Some(p) if !self.is_alive(p) => {
                log::debug!("reparent: stale parent {p:?}, ignoring");
                return;
            }
            other => other,
        };
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        if let Some(p) = new_parent {
            self.link_parent(id, p);
        }
    }

    /// Update local transform.
    pub fn set_local_transform(&mut self, id: NodeId, tf: Mat4) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.local_transform = tf;
        }
    }

    /// Update local bounds.
    pub fn set_local_bounds(&mut self, id: NodeId, bounds: Aabb) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.local_bounds = bounds;
        }
    }

    /// Update node flags.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.flags = flags;
        }
    }

    /// Recompute world transforms, world bounds, and bounding spheres.
    ///
    /// Walks every root's subtree top-down. Call after a batch of mutations
    /// and before scanning; pickers assume world data is current.
    pub fn commit(&mut self) {
        let roots: Vec<NodeId> = self
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| match n {
                Some(n) if n.parent.is_none() =>
                {
                    #[allow(
                        clippy::cast_possible_truncation,
                        reason = "NodeId uses 32-bit indices by design."
                    )]
                    Some(NodeId::new(i as u32, n.generation))
                }
                _ => None,
            })
            .collect();

        for root in roots {
            self.update_world_recursive(root, Mat4::IDENTITY);
        }
    }

    /// Returns true if `id` refers to a live node.
    ///
    /// A `NodeId` is considered live if its slot exists and its generation matches
    /// the current generation stored in that slot.
    /// See [`NodeId`] docs for the generational semantics.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node_ref(id).is_some()
    }

    /// The parent of a node, or `None` for roots and stale identifiers.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_ref(id)?.parent
    }

    /// Path from the root down to `id` (inclusive). Empty for stale identifiers.
    pub fn path_to_root(&self, mut id: NodeId) -> Vec<NodeId> {
        if !self.is_alive(id) {
            return Vec::new();
        }
        let mut out = Vec::new();
        loop {
            out.push(id);
            let parent = self.node(id).parent;
            match parent {
                Some(p) => id = p,
                None => break,
            }
        }
        out.reverse();
        out
    }

    /// Returns the flags of a node if the identifier is live.
    pub fn flags(&self, id: NodeId) -> Option<NodeFlags> {
        self.node_ref(id).map(|n| n.local.flags)
    }

    /// World transform of a node as of the last [`SceneGraph::commit`].
    pub fn world_transform(&self, id: NodeId) -> Option<Mat4> {
        self.node_ref(id).map(|n| n.world.world_transform)
    }

    /// World-space bounds of a node as of the last [`SceneGraph::commit`].
    pub fn world_bounds(&self, id: NodeId) -> Option<Aabb> {
        self.node_ref(id).map(|n| n.world.world_bounds)
    }

    /// World-space bounding sphere of a node as of the last [`SceneGraph::commit`].
    pub fn world_sphere(&self, id: NodeId) -> Option<Sphere> {
        self.node_ref(id).map(|n| n.world.world_sphere)
    }

    /// The scene camera.
    pub fn camera(&self) -> Camera {
        self.camera
    }

    /// Replace the scene camera.
    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    // --- colliders ---

    /// Register a collider owned by `node`.
    ///
    /// Returns `None` (and logs at debug level) when `node` is stale; hit
    /// engines never learn about the collider in that case.
    pub fn attach_collider(&mut self, node: NodeId, collider: Collider) -> Option<ColliderId> {
        if !self.is_alive(node) {
            log::debug!("attach_collider: stale node {node:?}, ignoring");
            return None;
        }
        let id = self.colliders.insert(node, collider);
        self.node_mut(node).colliders.push(id);
        Some(id)
    }

    /// Explicitly remove a collider. The identifier goes stale immediately.
    pub fn detach_collider(&mut self, id: ColliderId) -> Option<Collider> {
        let Some(entry) = self.colliders.get(id) else {
            log::debug!("detach_collider: stale collider {id:?}, ignoring");
            return None;
        };
        let owner = entry.owner;
        let taken = self.colliders.remove(id);
        if let Some(n) = self.node_opt_mut(owner) {
            n.colliders.retain(|c| *c != id);
        }
        taken
    }

    /// Returns true if `id` refers to a live collider.
    pub fn collider_is_alive(&self, id: ColliderId) -> bool {
        self.colliders.is_alive(id)
    }

    /// Returns the configuration of a collider if the identifier is live.
    pub fn collider(&self, id: ColliderId) -> Option<Collider> {
        self.colliders.get(id).map(|e| e.collider)
    }

    /// Returns the owning node of a collider if the identifier is live.
    pub fn collider_owner(&self, id: ColliderId) -> Option<NodeId> {
        self.colliders.get(id).map(|e| e.owner)
    }

    /// Enable or disable a collider. No-op on stale identifiers.
    pub fn set_collider_enabled(&mut self, id: ColliderId, enabled: bool) {
        if let Some(e) = self.colliders.get_mut(id) {
            e.collider.enabled = enabled;
        }
    }

    /// Set or clear a collider's maximum pick distance. No-op on stale identifiers.
    pub fn set_collider_max_distance(&mut self, id: ColliderId, max_distance: Option<f32>) {
        if let Some(e) = self.colliders.get_mut(id) {
            e.collider.max_distance = max_distance;
        }
    }

    /// Iterate all live colliders with their owners.
    pub fn colliders(&self) -> impl Iterator<Item = (ColliderId, NodeId, Collider)> + '_ {
        self.colliders.iter().map(|(id, e)| (id, e.owner, e.collider))
    }

    // --- internals ---

    /// Access a node; panics if `id` is stale.
    fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    /// Access a node mutably; panics if `id` is stale.
    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    fn node_ref(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.generation()).then_some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.generation() {
            return None;
        }
        Some(n)
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        let parent_node = self.node_mut(parent);
        parent_node.children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        let p = self.node_mut(parent);
        p.children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }

    fn update_world_recursive(&mut self, id: NodeId, parent_tf: Mat4) {
        let (world_tf, child_ids) = {
            let node = self.node_mut(id);
            let tf = parent_tf * node.local.local_transform;
            node.world.world_transform = tf;
            node.world.world_bounds = node.local.local_bounds.transformed_by(tf);
            node.world.world_sphere = node.world.world_bounds.enclosing_sphere();
            (tf, node.children.clone())
        };
        for child in child_ids {
            self.update_world_recursive(child, world_tf);
        }
    }
}
