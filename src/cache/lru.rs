//! LRU Tracker Module
//!
//! Implements Least Recently Used tracking for cache eviction.
//!
//! The tracker is an intrusive doubly linked list whose nodes live in a
//! `SlotArena`. Each tracked item gets an `LruHandle` on insertion; the handle
//! stays valid across any reordering, so promotion and removal are O(1).

use crate::cache::arena::{SlotArena, SlotId};

// == LRU Handle ==
/// Stable position of an item inside an `LruTracker`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LruHandle(SlotId);

#[derive(Debug)]
struct Node<T> {
    item: T,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

// == LRU Tracker ==
/// Tracks access order for LRU eviction strategy.
///
/// - Front = Most recently used
/// - Back = Least recently used
#[derive(Debug)]
pub struct LruTracker<T> {
    nodes: SlotArena<Node<T>>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
}

impl<T: Copy> LruTracker<T> {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self {
            nodes: SlotArena::new(),
            head: None,
            tail: None,
        }
    }

    // == Push Front ==
    /// Starts tracking `item` as the most recently used one.
    pub fn push_front(&mut self, item: T) -> LruHandle {
        let id = self.nodes.insert(Node {
            item,
            prev: None,
            next: None,
        });
        self.attach_front(id);
        LruHandle(id)
    }

    // == Touch ==
    /// Marks an item as recently used (moves to front).
    ///
    /// Returns false if the handle is no longer tracked.
    pub fn touch(&mut self, handle: LruHandle) -> bool {
        let id = handle.0;
        if !self.nodes.contains(id) {
            return false;
        }
        if self.head != Some(id) {
            self.detach(id);
            self.attach_front(id);
        }
        true
    }

    // == Remove ==
    /// Stops tracking the item behind `handle` and returns it.
    pub fn remove(&mut self, handle: LruHandle) -> Option<T> {
        self.detach(handle.0)?;
        self.nodes.remove(handle.0).map(|node| node.item)
    }

    // == Peek Oldest ==
    /// Returns the least recently used item without removing it.
    pub fn peek_oldest(&self) -> Option<T> {
        self.tail
            .and_then(|id| self.nodes.get(id))
            .map(|node| node.item)
    }

    // == Iter ==
    /// Iterates items from most to least recently used.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let node = self.nodes.get(cursor?)?;
            cursor = node.next;
            Some(node.item)
        })
    }

    // == Length ==
    /// Returns the number of tracked items.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    fn detach(&mut self, id: SlotId) -> Option<()> {
        let (prev, next) = {
            let node = self.nodes.get(id)?;
            (node.prev, node.next)
        };

        match prev {
            Some(prev_id) => {
                if let Some(prev_node) = self.nodes.get_mut(prev_id) {
                    prev_node.next = next;
                }
            }
            None => self.head = next,
        }

        match next {
            Some(next_id) => {
                if let Some(next_node) = self.nodes.get_mut(next_id) {
                    next_node.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(node) = self.nodes.get_mut(id) {
            node.prev = None;
            node.next = None;
        }
        Some(())
    }

    fn attach_front(&mut self, id: SlotId) {
        let old_head = self.head;
        if let Some(node) = self.nodes.get_mut(id) {
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(head_id) => {
                if let Some(head_node) = self.nodes.get_mut(head_id) {
                    head_node.prev = Some(id);
                }
            }
            None => self.tail = Some(id),
        }
        self.head = Some(id);
    }
}

impl<T: Copy> Default for LruTracker<T> {
    fn default() -> Self {
        Self::new()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn order(lru: &LruTracker<&'static str>) -> Vec<&'static str> {
        lru.iter().collect()
    }

    fn pop_oldest<T: Copy>(lru: &mut LruTracker<T>) -> Option<T> {
        let tail = lru.tail?;
        lru.remove(LruHandle(tail))
    }

    #[test]
    fn test_lru_new() {
        let lru: LruTracker<u32> = LruTracker::new();
        assert_eq!(lru.len(), 0);
        assert_eq!(lru.peek_oldest(), None);
    }

    #[test]
    fn test_lru_push_front() {
        let mut lru = LruTracker::new();

        lru.push_front("key1");
        lru.push_front("key2");
        lru.push_front("key3");

        assert_eq!(lru.len(), 3);
        // key1 is oldest (added first)
        assert_eq!(lru.peek_oldest(), Some("key1"));
        assert_eq!(order(&lru), vec!["key3", "key2", "key1"]);
    }

    #[test]
    fn test_lru_touch_existing_key() {
        let mut lru = LruTracker::new();

        let key1 = lru.push_front("key1");
        lru.push_front("key2");
        lru.push_front("key3");

        // Touch key1 again - should move to front
        assert!(lru.touch(key1));

        assert_eq!(lru.len(), 3);
        assert_eq!(lru.peek_oldest(), Some("key2"));
        assert_eq!(order(&lru), vec!["key1", "key3", "key2"]);
    }

    #[test]
    fn test_lru_touch_head_is_noop() {
        let mut lru = LruTracker::new();
        lru.push_front("a");
        let b = lru.push_front("b");

        assert!(lru.touch(b));
        assert_eq!(order(&lru), vec!["b", "a"]);
    }

    #[test]
    fn test_lru_pop_in_age_order() {
        let mut lru = LruTracker::new();

        lru.push_front("key1");
        lru.push_front("key2");
        lru.push_front("key3");

        assert_eq!(pop_oldest(&mut lru), Some("key1"));
        assert_eq!(lru.len(), 2);

        assert_eq!(pop_oldest(&mut lru), Some("key2"));
        assert_eq!(lru.len(), 1);

        assert_eq!(pop_oldest(&mut lru), Some("key3"));
        assert_eq!(lru.len(), 0);
        assert_eq!(pop_oldest(&mut lru), None);
    }

    #[test]
    fn test_lru_remove_middle() {
        let mut lru = LruTracker::new();

        lru.push_front("key1");
        let key2 = lru.push_front("key2");
        lru.push_front("key3");

        assert_eq!(lru.remove(key2), Some("key2"));

        assert_eq!(lru.len(), 2);
        assert_eq!(order(&lru), vec!["key3", "key1"]);
    }

    #[test]
    fn test_lru_stale_handle() {
        let mut lru = LruTracker::new();
        let a = lru.push_front("a");
        lru.push_front("b");

        assert_eq!(lru.remove(a), Some("a"));
        assert_eq!(lru.remove(a), None);
        assert!(!lru.touch(a));
        assert_eq!(order(&lru), vec!["b"]);
    }

    #[test]
    fn test_lru_order_after_multiple_touches() {
        let mut lru = LruTracker::new();

        let a = lru.push_front("a");
        let b = lru.push_front("b");
        let c = lru.push_front("c");

        // [c, b, a] -> touch a: [a, c, b] -> touch c: [c, a, b] -> touch b: [b, c, a]
        lru.touch(a);
        lru.touch(c);
        lru.touch(b);

        assert_eq!(pop_oldest(&mut lru), Some("a"));
        assert_eq!(pop_oldest(&mut lru), Some("c"));
        assert_eq!(pop_oldest(&mut lru), Some("b"));
    }

    #[test]
    fn test_lru_touch_tail_updates_tail() {
        let mut lru = LruTracker::new();

        let a = lru.push_front("a");
        lru.push_front("b");
        lru.push_front("c");

        lru.touch(a);
        assert_eq!(lru.peek_oldest(), Some("b"));

        lru.push_front("d");
        assert_eq!(order(&lru), vec!["d", "a", "c", "b"]);
    }
}
