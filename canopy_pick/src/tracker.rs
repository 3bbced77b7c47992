// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-over-frame collision membership tracking.
//!
//! [`CollisionTracker`] converts a flat list of this pass's resolved hits into
//! ordered enter/exit/inside transitions relative to the previous pass. It is
//! a pure state machine: no locks, no listeners, no scene access. The picker
//! feeds it under its own lock and dispatches the returned transitions after
//! every lock is released.

use crate::types::PickedObject;

/// What happened to one node's membership this pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TransitionKind {
    /// The node was absent last pass and is present now.
    Enter,
    /// The node was present last pass and is absent now.
    Exit,
    /// The node is present in both passes.
    Inside,
    /// The activation trigger was pressed while over the node, or the node
    /// was entered with the trigger already held.
    TouchStart,
    /// The activation trigger was released while over the node, or the node
    /// was exited while still touched.
    TouchEnd,
}

/// One ordered transition, carrying the hit the event should report.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transition {
    /// Which membership edge this is.
    pub kind: TransitionKind,
    /// The hit the event reports.
    pub hit: PickedObject,
}

/// Once-per-pass summary of the whole result set.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Summary {
    /// The pass produced at least one hit.
    Pick,
    /// The pass produced no hits and the previous pass did (or this is the
    /// first pass). Not repeated on subsequent empty passes.
    NoPick,
}

/// Everything one pass produced, in dispatch order.
#[derive(Clone, Debug, PartialEq)]
pub struct PassEvents {
    /// Per-node transitions: all exits first (previous-pass order), then all
    /// enters, then all insides (each in current-pass order). Touch edges nest
    /// inside their node's enter/exit pair: `Enter` before `TouchStart`,
    /// `TouchEnd` before `Exit`.
    pub transitions: Vec<Transition>,
    /// Summary event, if this pass warrants one.
    pub summary: Option<Summary>,
}

/// Per-picker membership state machine.
///
/// Membership is per node: multiple hits on colliders under one node coalesce
/// into a single logical membership carrying the closest hit. Each continuous
/// occupancy run of a node produces exactly one `Enter`, any number of
/// `Inside`s, and exactly one `Exit`.
#[derive(Clone, Debug, Default)]
pub struct CollisionTracker {
    previous: Vec<PickedObject>,
    /// True when the next empty pass should emit [`Summary::NoPick`].
    no_pick_armed: bool,
}

impl CollisionTracker {
    /// Create a tracker with empty membership.
    ///
    /// The no-pick latch starts armed, so a first pass over an empty scene
    /// reports `NoPick` once.
    pub fn new() -> Self {
        Self {
            previous: Vec::new(),
            no_pick_armed: true,
        }
    }

    /// Fold one pass of resolved hits into the membership state.
    ///
    /// `hits` need not be deduplicated; same-node hits coalesce here, keeping
    /// the closest. Order of first appearance decides dispatch order among
    /// enters and insides.
    pub fn update(&mut self, hits: &[PickedObject]) -> PassEvents {
        let mut current: Vec<PickedObject> = Vec::new();
        for hit in hits {
            match current.iter_mut().find(|c| c.node == hit.node) {
                Some(existing) => {
                    if hit.distance < existing.distance {
                        *existing = *hit;
                    }
                }
                None => current.push(*hit),
            }
        }

        let mut transitions = Vec::new();

        // Exits first, in previous-pass order.
        for prev in &self.previous {
            if !current.iter().any(|c| c.node == prev.node) {
                let mut last = *prev;
                if last.touched {
                    last.touched = false;
                    transitions.push(Transition {
                        kind: TransitionKind::TouchEnd,
                        hit: last,
                    });
                }
                transitions.push(Transition {
                    kind: TransitionKind::Exit,
                    hit: last,
                });
            }
        }

        // Then all enters, in current-pass order.
        for cur in &current {
            if !self.previous.iter().any(|p| p.node == cur.node) {
                transitions.push(Transition {
                    kind: TransitionKind::Enter,
                    hit: *cur,
                });
                if cur.touched {
                    transitions.push(Transition {
                        kind: TransitionKind::TouchStart,
                        hit: *cur,
                    });
                }
            }
        }

        // Then all insides, in current-pass order.
        for cur in &current {
            if let Some(prev) = self.previous.iter().find(|p| p.node == cur.node) {
                if cur.touched && !prev.touched {
                    transitions.push(Transition {
                        kind: TransitionKind::TouchStart,
                        hit: *cur,
                    });
                } else if !cur.touched && prev.touched {
                    transitions.push(Transition {
                        kind: TransitionKind::TouchEnd,
                        hit: *cur,
                    });
                }
                transitions.push(Transition {
                    kind: TransitionKind::Inside,
                    hit: *cur,
                });
            }
        }

        let summary = if current.is_empty() {
            if self.no_pick_armed {
                self.no_pick_armed = false;
                Some(Summary::NoPick)
            } else {
                None
            }
        } else {
            self.no_pick_armed = true;
            Some(Summary::Pick)
        };

        self.previous = current;
        PassEvents {
            transitions,
            summary,
        }
    }

    /// The coalesced membership as of the last pass, in dispatch order.
    pub fn picked(&self) -> &[PickedObject] {
        &self.previous
    }

    /// Drop all membership and re-arm the no-pick latch.
    ///
    /// No exit events are generated. Callers that want exit symmetry should
    /// run one empty [`CollisionTracker::update`] first.
    pub fn clear(&mut self) {
        self.previous.clear();
        self.no_pick_armed = true;
    }
}
