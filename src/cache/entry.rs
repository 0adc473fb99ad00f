//! Cache Entry Module
//!
//! Defines the internal tree entry and the public node record handed to callers.

use serde::Serialize;

use crate::cache::arena::SlotId;
use crate::cache::lru::LruHandle;

// == Cache Node ==
/// A snapshot of one cached node: its key, value and parent key.
///
/// `parent_key` is `None` only for the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheNode<K, V> {
    /// Node key
    pub key: K,
    /// Stored value
    pub value: V,
    /// Key of the parent node, None for the root
    pub parent_key: Option<K>,
}

impl<K, V> CacheNode<K, V> {
    /// Creates a new node record.
    pub fn new(key: K, value: V, parent_key: Option<K>) -> Self {
        Self {
            key,
            value,
            parent_key,
        }
    }

    /// Returns true if this record describes the root node.
    pub fn is_root(&self) -> bool {
        self.parent_key.is_none()
    }
}

// == Tree Entry ==
/// A live entry owned by the store arena.
///
/// `parent` and `children` are slot ids resolved through the same arena, so
/// they never own the entries they point at.
#[derive(Debug)]
pub(crate) struct TreeEntry<K, V> {
    pub key: K,
    pub value: V,
    pub parent: Option<SlotId>,
    pub children: Vec<SlotId>,
    pub lru: LruHandle,
}

impl<K, V> TreeEntry<K, V> {
    pub fn new(key: K, value: V, parent: Option<SlotId>, lru: LruHandle) -> Self {
        Self {
            key,
            value,
            parent,
            children: Vec::new(),
            lru,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Drops `child` from this entry's children, if present.
    pub fn unlink_child(&mut self, child: SlotId) {
        if let Some(pos) = self.children.iter().position(|&id| id == child) {
            self.children.remove(pos);
        }
    }
}
