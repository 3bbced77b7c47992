// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generation-checked collider storage.
//!
//! The registry that resolves a hit record's collider identity back to its
//! owner. Removal is explicit; a removed identity stays stale forever and slot
//! reuse bumps the generation, so resolution can never alias a later collider.

use crate::types::{Collider, ColliderId, NodeId};

#[derive(Clone, Debug)]
pub(crate) struct ColliderEntry {
    pub(crate) generation: u32,
    pub(crate) owner: NodeId,
    pub(crate) collider: Collider,
}

/// Slot arena for colliders, same scheme as the node arena.
#[derive(Clone, Debug, Default)]
pub(crate) struct ColliderArena {
    slots: Vec<Option<ColliderEntry>>,
    generations: Vec<u32>, // last generation per slot (persists across frees)
    free_list: Vec<usize>,
}

impl ColliderArena {
    pub(crate) fn insert(&mut self, owner: NodeId, collider: Collider) -> ColliderId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.slots[idx] = Some(ColliderEntry {
                generation,
                owner,
                collider,
            });
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ColliderId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.slots.push(Some(ColliderEntry {
                generation,
                owner,
                collider,
            }));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ColliderId uses 32-bit indices by design."
            )]
            ((self.slots.len() - 1) as u32, generation)
        };
        ColliderId::new(idx, generation)
    }

    pub(crate) fn remove(&mut self, id: ColliderId) -> Option<Collider> {
        if !self.is_alive(id) {
            return None;
        }
        let entry = self.slots[id.idx()].take();
        self.free_list.push(id.idx());
        entry.map(|e| e.collider)
    }

    pub(crate) fn get(&self, id: ColliderId) -> Option<&ColliderEntry> {
        let e = self.slots.get(id.idx())?.as_ref()?;
        (e.generation == id.generation()).then_some(e)
    }

    pub(crate) fn get_mut(&mut self, id: ColliderId) -> Option<&mut ColliderEntry> {
        let e = self.slots.get_mut(id.idx())?.as_mut()?;
        (e.generation == id.generation()).then_some(e)
    }

    pub(crate) fn is_alive(&self, id: ColliderId) -> bool {
        self.get(id).is_some()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (ColliderId, &ColliderEntry)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            let e = slot.as_ref()?;
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ColliderId uses 32-bit indices by design."
            )]
            Some((ColliderId::new(i as u32, e.generation), e))
        })
    }

    pub(crate) fn alive_len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}
