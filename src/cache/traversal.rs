//! Traversal Module
//!
//! Lookups, branch reads and callback-driven walks over `TreeStore`.
//!
//! Walks that hand entries to a caller callback record the promotions they
//! owe in a `PromotionGuard`. The guard applies them on drop, so they land
//! even when the callback panics and the stack unwinds through the walk.

use std::hash::Hash;

use crate::cache::arena::SlotId;
use crate::cache::entry::CacheNode;
use crate::cache::store::TreeStore;

// == Promotion Guard ==
/// Subtree walk position: entry, its depth and the next child to descend into.
#[derive(Debug, Clone, Copy)]
struct Frame {
    id: SlotId,
    depth: usize,
    next_child: usize,
}

impl Frame {
    fn new(id: SlotId, depth: usize) -> Self {
        Self {
            id,
            depth,
            next_child: 0,
        }
    }
}

/// Deferred recency updates for an in-progress walk.
///
/// On drop, every still-open frame is promoted innermost first, then the
/// chain starting at `chain_from` up to the root.
struct PromotionGuard<'a, K, V>
where
    K: Eq + Hash + Clone,
{
    store: &'a mut TreeStore<K, V>,
    open: Vec<Frame>,
    chain_from: Option<SlotId>,
}

impl<'a, K, V> PromotionGuard<'a, K, V>
where
    K: Eq + Hash + Clone,
{
    fn new(store: &'a mut TreeStore<K, V>, chain_from: Option<SlotId>) -> Self {
        Self {
            store,
            open: Vec::new(),
            chain_from,
        }
    }

    /// Opens a frame for `frame.id` and hands the entry to `visit`.
    ///
    /// The frame is opened first so the entry is promoted even if `visit` panics.
    fn enter<F>(&mut self, frame: Frame, visit: &mut F)
    where
        F: FnMut(&K, &V, Option<&K>),
    {
        let id = frame.id;
        self.open.push(frame);
        if let Some(entry) = self.store.entry(id) {
            visit(&entry.key, &entry.value, self.store.parent_key(id));
        }
    }

    /// Closes the innermost frame and promotes its entry.
    fn leave(&mut self) {
        if let Some(frame) = self.open.pop() {
            self.store.promote(frame.id);
        }
    }
}

impl<K, V> Drop for PromotionGuard<'_, K, V>
where
    K: Eq + Hash + Clone,
{
    fn drop(&mut self) {
        while let Some(frame) = self.open.pop() {
            self.store.promote(frame.id);
        }
        if let Some(id) = self.chain_from {
            self.store.promote_chain(id);
        }
    }
}

impl<K, V> TreeStore<K, V>
where
    K: Eq + Hash + Clone,
{
    // == Get / Peek ==
    /// Returns the node and promotes it together with all its ancestors.
    pub fn get(&mut self, key: &K) -> Option<CacheNode<K, V>>
    where
        V: Clone,
    {
        let id = self.slot(key)?;
        self.promote_chain(id);
        self.node(id)
    }

    /// Returns the node without touching recency.
    pub fn peek(&self, key: &K) -> Option<CacheNode<K, V>>
    where
        V: Clone,
    {
        self.slot(key).and_then(|id| self.node(id))
    }

    // == Branches ==
    /// Path from the root (index 0) down to `key` (last index), without
    /// touching recency. Empty if `key` is absent.
    pub fn peek_branch(&self, key: &K) -> Vec<CacheNode<K, V>>
    where
        V: Clone,
    {
        let Some(id) = self.slot(key) else {
            return Vec::new();
        };
        let mut branch: Vec<_> = self.chain(id).filter_map(|slot| self.node(slot)).collect();
        branch.reverse();
        branch
    }

    /// Same as `peek_branch`, then promotes `key` and every ancestor.
    pub fn get_branch(&mut self, key: &K) -> Vec<CacheNode<K, V>>
    where
        V: Clone,
    {
        let branch = self.peek_branch(key);
        if let Some(id) = self.slot(key) {
            self.promote_chain(id);
        }
        branch
    }

    // == Traverse To Root ==
    /// Calls `visit` for `key` and then each ancestor up to the root.
    ///
    /// The whole chain is promoted once the walk ends, panicking or not.
    /// Returns false, without calling `visit`, if `key` is absent.
    pub fn traverse_to_root<F>(&mut self, key: &K, mut visit: F) -> bool
    where
        F: FnMut(&K, &V, Option<&K>),
    {
        let Some(id) = self.slot(key) else {
            return false;
        };

        let guard = PromotionGuard::new(self, Some(id));
        for slot in guard.store.chain(id) {
            if let Some(entry) = guard.store.entry(slot) {
                visit(&entry.key, &entry.value, guard.store.parent_key(slot));
            }
        }
        true
    }

    // == Traverse Subtree ==
    /// Pre-order depth-first walk of the subtree rooted at `key`.
    ///
    /// `key` sits at depth 0 and children are descended into while the
    /// current depth is below `max_depth` (`None` walks everything). Each
    /// entry is promoted once its own subtree is done, then the ancestors of
    /// `key` are promoted, so parents always end up fresher than children.
    /// Returns false, without calling `visit`, if `key` is absent.
    pub fn traverse_subtree<F>(&mut self, key: &K, max_depth: Option<usize>, mut visit: F) -> bool
    where
        F: FnMut(&K, &V, Option<&K>),
    {
        let Some(start) = self.slot(key) else {
            return false;
        };
        let above = self.entry(start).and_then(|entry| entry.parent);

        let mut guard = PromotionGuard::new(self, above);
        guard.enter(Frame::new(start, 0), &mut visit);

        while let Some(frame) = guard.open.last_mut() {
            let descend = max_depth.map_or(true, |max| frame.depth < max);
            let child = if descend {
                guard
                    .store
                    .entry(frame.id)
                    .and_then(|entry| entry.children.get(frame.next_child).copied())
            } else {
                None
            };

            match child {
                Some(child) => {
                    frame.next_child += 1;
                    let depth = frame.depth + 1;
                    guard.enter(Frame::new(child, depth), &mut visit);
                }
                None => guard.leave(),
            }
        }
        true
    }
}
