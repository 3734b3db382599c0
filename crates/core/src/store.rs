// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared string maps for variables and aliases.
//!
//! Both stores sit behind a reader/writer lock: lookups happen on every
//! expansion and run concurrently, mutations are exclusive. Cloning a store
//! shares the underlying map; use [`VarStore::fork`] for an independent copy.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
struct SharedMap {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl SharedMap {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.read().get(key).cloned()
    }

    fn insert(&self, key: String, value: String) -> Option<String> {
        self.inner.write().insert(key, value)
    }

    fn remove(&self, key: &str) -> Option<String> {
        self.inner.write().remove(key)
    }

    fn contains(&self, key: &str) -> bool {
        self.inner.read().contains_key(key)
    }

    fn len(&self) -> usize {
        self.inner.read().len()
    }

    // Collected under a single read guard. Must not call back into any
    // other method here, parking_lot read locks are not reentrant-safe
    // against a queued writer.
    fn sorted_entries(&self) -> Vec<(String, String)> {
        let mut entries: Vec<_> = {
            let map = self.inner.read();
            map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
        };
        entries.sort();
        entries
    }
}

/// Variable bindings keyed by their full reference text (conventionally `@name`).
///
/// Lookup is exact-match only. The engine owns one long-lived global store;
/// callers may pass a second, call-scoped store into an execution.
#[derive(Debug, Clone, Default)]
pub struct VarStore {
    map: SharedMap,
}

impl VarStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from key/value pairs.
    pub fn from_pairs(
        pairs: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Self {
        let store = Self::new();
        for (k, v) in pairs {
            store.set(k, v);
        }
        store
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.map.get(key)
    }

    /// Bind `key` to `value`, returning the previous value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.map.insert(key.into(), value.into())
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        self.map.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All bindings, sorted by key.
    pub fn entries(&self) -> Vec<(String, String)> {
        self.map.sorted_entries()
    }

    /// Independent copy of the current bindings.
    pub fn fork(&self) -> VarStore {
        VarStore::from_pairs(self.entries())
    }

    /// Replace every occurrence of every key in `text` with its value.
    ///
    /// Matching is purely textual (no word boundaries), so `@a` also matches
    /// inside `@ab`. Keys are applied longest first so the longer name wins
    /// when one key is a prefix of another. Empty keys are ignored.
    pub fn substitute(&self, text: &str) -> String {
        let mut entries = self.entries();
        entries.retain(|(k, _)| !k.is_empty());
        entries.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let mut out = text.to_string();
        for (key, value) in entries {
            if out.contains(key.as_str()) {
                out = out.replace(key.as_str(), &value);
            }
        }
        out
    }
}

/// Alias definitions: invocation text mapped to its expansion.
///
/// Keys may span several words (`"git st"`). Each engine owns its own table.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    map: SharedMap,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.map.get(key)
    }

    pub fn set(&self, key: impl Into<String>, expansion: impl Into<String>) -> Option<String> {
        self.map.insert(key.into(), expansion.into())
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        self.map.remove(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All aliases sorted by key, for listing or export.
    pub fn entries(&self) -> Vec<(String, String)> {
        self.map.sorted_entries()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
