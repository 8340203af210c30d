//! Change detection for render state
//!
//! Each keyed piece of state is serialized and compared with what was drawn
//! last time; only keys whose snapshot differs are marked dirty. A frame
//! generation counter lets keys that stopped showing up (despawned entities)
//! be forgotten.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use serde::Serialize;

/// What a snapshot belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RenderKey {
    Player,
    Hud,
    Pipe(u32),
    Coin(u32),
    PowerUp(u32),
}

#[derive(Debug, Clone)]
struct Snapshot {
    json: String,
    seen: u64,
}

#[derive(Debug, Clone)]
pub struct ChangeTracker<K> {
    snapshots: HashMap<K, Snapshot>,
    dirty: HashSet<K>,
    generation: u64,
}

impl<K> Default for ChangeTracker<K> {
    fn default() -> Self {
        Self {
            snapshots: HashMap::new(),
            dirty: HashSet::new(),
            generation: 0,
        }
    }
}

impl<K: Copy + Eq + Hash> ChangeTracker<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare `state` against the last snapshot for `key`.
    ///
    /// Returns true (and marks the key dirty) when it changed or is new.
    pub fn should_render<S: Serialize>(&mut self, key: K, state: &S) -> bool {
        let json = match serde_json::to_string(state) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Snapshot failed, forcing redraw: {e}");
                self.dirty.insert(key);
                return true;
            }
        };
        let generation = self.generation;
        match self.snapshots.get_mut(&key) {
            Some(snapshot) if snapshot.json == json => {
                snapshot.seen = generation;
                false
            }
            _ => {
                self.snapshots.insert(key, Snapshot { json, seen: generation });
                self.dirty.insert(key);
                true
            }
        }
    }

    pub fn mark_dirty(&mut self, key: K) {
        self.dirty.insert(key);
    }

    pub fn is_dirty(&self, key: K) -> bool {
        self.dirty.contains(&key)
    }

    pub fn clear_dirty(&mut self, key: K) {
        self.dirty.remove(&key);
    }

    /// Close the current frame: forget keys not seen in it and start a new generation
    pub fn end_frame(&mut self) {
        let current = self.generation;
        self.snapshots.retain(|_, s| s.seen == current);
        let snapshots = &self.snapshots;
        self.dirty.retain(|k| snapshots.contains_key(k));
        self.generation += 1;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of keys with a retained snapshot
    pub fn tracked(&self) -> usize {
        self.snapshots.len()
    }
}
