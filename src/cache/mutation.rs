//! Mutation Module
//!
//! Insertion, reparenting and leaf-only LRU eviction on top of `TreeStore`.
//!
//! Every insert promotes the new node first and its ancestors afterwards, so
//! a parent is always at least as fresh as its freshest child. That ordering
//! is what keeps the LRU tail a leaf; eviction never checks for children.

use std::hash::Hash;

use tracing::debug;

use crate::cache::entry::CacheNode;
use crate::cache::store::TreeStore;
use crate::error::{CacheError, Result};

impl<K, V> TreeStore<K, V>
where
    K: Eq + Hash + Clone,
{
    // == Add ==
    /// Inserts a new leaf under `parent_key`.
    ///
    /// Returns the evicted node if the insert pushed the store over capacity.
    pub fn add(&mut self, key: K, value: V, parent_key: &K) -> Result<Option<CacheNode<K, V>>> {
        let id = self.insert_child(key, value, parent_key)?;
        if let Some(parent) = self.entry(id).and_then(|entry| entry.parent) {
            self.promote_chain(parent);
        }
        Ok(self.evict_if_over_capacity())
    }

    // == Add Or Update ==
    /// Inserts `key` under `parent_key`, or updates and possibly reparents it.
    ///
    /// Fails with `CycleDetected` when `parent_key` lies inside the subtree of
    /// `key`; nothing is modified in that case.
    pub fn add_or_update(
        &mut self,
        key: K,
        value: V,
        parent_key: &K,
    ) -> Result<Option<CacheNode<K, V>>> {
        let parent = self.slot(parent_key).ok_or(CacheError::ParentNotFound)?;
        let Some(id) = self.slot(&key) else {
            return self.add(key, value, parent_key);
        };

        let current_parent = self.entry(id).and_then(|entry| entry.parent);
        if current_parent != Some(parent) {
            if self.is_ancestor_or_self(id, parent) {
                return Err(CacheError::CycleDetected);
            }
            self.detach_from_parent(id);
            self.attach_to_parent(id, parent);
            debug!("Node reparented");
        }

        if let Some(entry) = self.entry_mut(id) {
            entry.value = value;
        }
        self.promote_chain(id);
        Ok(self.evict_if_over_capacity())
    }

    // == Evict ==
    /// Removes the least recently used entry, which is always a leaf.
    pub fn evict_oldest(&mut self) -> Option<CacheNode<K, V>> {
        let id = self.oldest()?;
        debug_assert!(
            self.entry(id).map_or(true, |entry| entry.is_leaf()),
            "LRU tail must be a leaf"
        );

        let parent_key = self.parent_key(id).cloned();
        self.detach_from_parent(id);
        let entry = self.unregister(id)?;
        debug!(remaining = self.len(), "Evicted least recently used leaf");

        Some(CacheNode::new(entry.key, entry.value, parent_key))
    }

    fn evict_if_over_capacity(&mut self) -> Option<CacheNode<K, V>> {
        if self.is_over_capacity() {
            self.evict_oldest()
        } else {
            None
        }
    }
}
