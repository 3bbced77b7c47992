// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared ownership of a scene graph.

use std::sync::{Mutex, MutexGuard};

use crate::graph::SceneGraph;

/// A scene graph behind a mutex, shareable across threads.
///
/// This is the unit pickers operate on. A picker holds the lock for the
/// duration of one scan and releases it before any listener runs, so listener
/// code is free to take the lock again and mutate the scene.
pub struct Scene {
    graph: Mutex<SceneGraph>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self {
            graph: Mutex::new(SceneGraph::new()),
        }
    }

    /// Lock the scene graph for structured access.
    ///
    /// Hold the guard only for the access itself. Never call user code while
    /// holding it; a listener that locks the scene again would deadlock.
    pub fn graph(&self) -> MutexGuard<'_, SceneGraph> {
        self.graph.lock().unwrap()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene").finish_non_exhaustive()
    }
}
