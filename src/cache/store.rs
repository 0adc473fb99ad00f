//! Tree Store Module
//!
//! Entry storage combining a slot arena, a keyed index and LRU tracking.
//! The store owns every entry; parent and child links are slot ids.
//!
//! Mutation, traversal and removal engines extend `TreeStore` in their own
//! modules. Nothing in here locks: `TreeCache` wraps the store in a lock.

use std::hash::Hash;

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::cache::arena::{SlotArena, SlotId};
use crate::cache::entry::{CacheNode, TreeEntry};
use crate::cache::lru::LruTracker;
use crate::error::{CacheError, Result};

// == Tree Store ==
#[derive(Debug)]
pub(crate) struct TreeStore<K, V> {
    /// Entry storage, sole owner of every entry
    entries: SlotArena<TreeEntry<K, V>>,
    /// Key to slot lookup
    index: FxHashMap<K, SlotId>,
    /// Recency order of entry slots
    lru: LruTracker<SlotId>,
    /// Set by the first `insert_root` and never cleared, even if the root is
    /// later removed
    root_created: bool,
    /// Maximum number of entries, 0 = unbounded
    capacity: usize,
}

impl<K, V> TreeStore<K, V>
where
    K: Eq + Hash + Clone,
{
    // == Constructor ==
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: SlotArena::new(),
            index: FxHashMap::default(),
            lru: LruTracker::new(),
            root_created: false,
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_over_capacity(&self) -> bool {
        self.capacity > 0 && self.len() > self.capacity
    }

    // == Lookup ==
    pub fn slot(&self, key: &K) -> Option<SlotId> {
        self.index.get(key).copied()
    }

    pub fn lookup(&self, key: &K) -> Option<&TreeEntry<K, V>> {
        self.slot(key).and_then(|id| self.entries.get(id))
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    pub fn entry(&self, id: SlotId) -> Option<&TreeEntry<K, V>> {
        self.entries.get(id)
    }

    pub fn entry_mut(&mut self, id: SlotId) -> Option<&mut TreeEntry<K, V>> {
        self.entries.get_mut(id)
    }

    pub fn parent_key(&self, id: SlotId) -> Option<&K> {
        let parent = self.entry(id)?.parent?;
        self.entry(parent).map(|entry| &entry.key)
    }

    /// Builds the public record for `id`.
    pub fn node(&self, id: SlotId) -> Option<CacheNode<K, V>>
    where
        V: Clone,
    {
        let entry = self.entry(id)?;
        Some(CacheNode::new(
            entry.key.clone(),
            entry.value.clone(),
            self.parent_key(id).cloned(),
        ))
    }

    /// Walks from `id` up to the root, `id` first.
    pub fn chain(&self, id: SlotId) -> impl Iterator<Item = SlotId> + '_ {
        let mut cursor = self.entries.contains(id).then_some(id);
        std::iter::from_fn(move || {
            let current = cursor?;
            cursor = self.entry(current).and_then(|entry| entry.parent);
            Some(current)
        })
    }

    /// Returns true if `ancestor` is `id` itself or lies on its path to the root.
    pub fn is_ancestor_or_self(&self, ancestor: SlotId, id: SlotId) -> bool {
        self.chain(id).any(|slot| slot == ancestor)
    }

    // == Insert Root ==
    /// Creates the root. A cache gets exactly one root over its lifetime.
    pub fn insert_root(&mut self, key: K, value: V) -> Result<SlotId> {
        if self.root_created {
            return Err(CacheError::RootAlreadyExists);
        }
        let id = self.register(key, value, None);
        self.root_created = true;
        trace!("Root node created");
        Ok(id)
    }

    // == Insert Child ==
    /// Creates a leaf under `parent_key` at the front of the recency order.
    ///
    /// Ancestors are not promoted here; that is the caller's decision.
    pub fn insert_child(&mut self, key: K, value: V, parent_key: &K) -> Result<SlotId> {
        let parent = self.slot(parent_key).ok_or(CacheError::ParentNotFound)?;
        if self.contains(&key) {
            return Err(CacheError::AlreadyExists);
        }
        let id = self.register(key, value, Some(parent));
        if let Some(parent_entry) = self.entry_mut(parent) {
            parent_entry.children.push(id);
        }
        Ok(id)
    }

    // == Delete ==
    /// Detaches a single entry from its parent and drops it from the store.
    ///
    /// Children are left untouched: callers delete them first (removal) or
    /// only ever delete leaves (eviction).
    pub fn delete(&mut self, key: &K) -> Option<TreeEntry<K, V>> {
        let id = self.slot(key)?;
        self.detach_from_parent(id);
        self.unregister(id)
    }

    // == Link Maintenance ==
    pub fn detach_from_parent(&mut self, id: SlotId) {
        let Some(parent) = self.entry_mut(id).and_then(|entry| entry.parent.take()) else {
            return;
        };
        if let Some(parent_entry) = self.entry_mut(parent) {
            parent_entry.unlink_child(id);
        }
    }

    pub fn attach_to_parent(&mut self, id: SlotId, parent: SlotId) {
        if let Some(entry) = self.entry_mut(id) {
            entry.parent = Some(parent);
        }
        if let Some(parent_entry) = self.entry_mut(parent) {
            parent_entry.children.push(id);
        }
    }

    /// Drops `id` from the index, the recency list and the arena.
    pub fn unregister(&mut self, id: SlotId) -> Option<TreeEntry<K, V>> {
        let entry = self.entries.remove(id)?;
        self.index.remove(&entry.key);
        self.lru.remove(entry.lru);
        Some(entry)
    }

    // == Recency ==
    /// Moves a single entry to the front of the recency order.
    pub fn promote(&mut self, id: SlotId) {
        if let Some(handle) = self.entry(id).map(|entry| entry.lru) {
            self.lru.touch(handle);
        }
    }

    /// Promotes `id`, then its parent, and so on up to the root.
    ///
    /// The root ends up frontmost, so no entry is ever older than its children.
    pub fn promote_chain(&mut self, id: SlotId) {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            self.promote(current);
            cursor = self.entry(current).and_then(|entry| entry.parent);
        }
    }

    /// Least recently used entry slot.
    pub fn oldest(&self) -> Option<SlotId> {
        self.lru.peek_oldest()
    }

    /// Keys from most to least recently used.
    pub fn recency_order(&self) -> Vec<K> {
        self.lru
            .iter()
            .filter_map(|id| self.entry(id).map(|entry| entry.key.clone()))
            .collect()
    }

    fn register(&mut self, key: K, value: V, parent: Option<SlotId>) -> SlotId {
        let id = self.entries.vacant_id();
        let handle = self.lru.push_front(id);
        let inserted = self
            .entries
            .insert(TreeEntry::new(key.clone(), value, parent, handle));
        debug_assert_eq!(id, inserted);
        self.index.insert(key, id);
        debug_assert_eq!(self.lru.len(), self.entries.len());
        id
    }
}
