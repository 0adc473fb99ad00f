//! Removal Module
//!
//! Cascading deletion of a node and its whole subtree.

use std::hash::Hash;

use tracing::debug;

use crate::cache::store::TreeStore;

impl<K, V> TreeStore<K, V>
where
    K: Eq + Hash + Clone,
{
    // == Remove ==
    /// Deletes `key` and all of its descendants.
    ///
    /// Returns the number of entries removed, 0 if `key` is absent.
    pub fn remove(&mut self, key: &K) -> usize {
        let Some(top) = self.delete(key) else {
            return 0;
        };

        let mut pending = top.children;
        let mut removed = 1;
        while let Some(current) = pending.pop() {
            if let Some(entry) = self.unregister(current) {
                removed += 1;
                pending.extend(entry.children);
            }
        }

        debug!(removed, remaining = self.len(), "Removed subtree");
        removed
    }
}
