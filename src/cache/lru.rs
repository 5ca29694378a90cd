//! Recency List Module
//!
//! Doubly-linked ordering of entries, threaded through arena handles:
//! - Head = Most recently used
//! - Tail = Least recently used
//!
//! Every operation is O(1). Nodes never move in memory when the order
//! changes, so a handle handed out by `push_front` stays valid until the
//! entry itself is removed.

use tracing::trace;

use crate::cache::arena::{Arena, Handle};
use crate::cache::Entry;
use crate::error::Result;

#[derive(Debug)]
struct Node<V> {
    entry: Entry<V>,
    prev: Option<Handle>,
    next: Option<Handle>,
}

// == Recency List ==
/// Owns every cached entry, ordered by recency of use.
#[derive(Debug)]
pub struct RecencyList<V> {
    nodes: Arena<Node<V>>,
    head: Option<Handle>,
    tail: Option<Handle>,
}

impl<V> Default for RecencyList<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> RecencyList<V> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self {
            nodes: Arena::new(),
            head: None,
            tail: None,
        }
    }

    /// Makes sure the next `push_front` will not need to allocate.
    pub fn try_reserve_one(&mut self) -> Result<()> {
        self.nodes.try_reserve_one()
    }

    // == Push Front ==
    /// Inserts an entry as the most recently used one.
    ///
    /// On failure the list is unchanged.
    pub fn push_front(&mut self, entry: Entry<V>) -> Result<Handle> {
        let handle = self.nodes.try_insert(Node {
            entry,
            prev: None,
            next: None,
        })?;
        self.link_front(handle);
        Ok(handle)
    }

    // == Move To Front ==
    /// Relinks an entry at the head. Returns false for stale handles.
    pub fn move_to_front(&mut self, handle: Handle) -> bool {
        if !self.nodes.contains(handle) {
            return false;
        }
        if self.head != Some(handle) {
            self.unlink(handle);
            self.link_front(handle);
            trace!("promoted entry to head");
        }
        true
    }

    // == Remove ==
    /// Unlinks and frees an entry.
    pub fn remove(&mut self, handle: Handle) -> Option<Entry<V>> {
        if !self.nodes.contains(handle) {
            return None;
        }
        self.unlink(handle);
        self.nodes.remove(handle).map(|node| node.entry)
    }

    // == Pop Back ==
    /// Removes and returns the least recently used entry.
    pub fn pop_back(&mut self) -> Option<Entry<V>> {
        let tail = self.tail?;
        self.remove(tail)
    }

    // == Peek ==
    pub fn head(&self) -> Option<Handle> {
        self.head
    }

    pub fn tail(&self) -> Option<Handle> {
        self.tail
    }

    pub fn get(&self, handle: Handle) -> Option<&Entry<V>> {
        self.nodes.get(handle).map(|node| &node.entry)
    }

    /// Mutable access to a value. Keys are never handed out mutably.
    pub fn value_mut(&mut self, handle: Handle) -> Option<&mut V> {
        self.nodes.get_mut(handle).map(|node| &mut node.entry.value)
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.tail = None;
    }

    // == Iterate ==
    /// Entries from most to least recently used.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.len(),
        }
    }

    fn unlink(&mut self, handle: Handle) {
        let (prev, next) = match self.nodes.get(handle) {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev.and_then(|p| self.nodes.get_mut(p)) {
            Some(prev_node) => prev_node.next = next,
            None => self.head = next,
        }
        match next.and_then(|n| self.nodes.get_mut(n)) {
            Some(next_node) => next_node.prev = prev,
            None => self.tail = prev,
        }

        if let Some(node) = self.nodes.get_mut(handle) {
            node.prev = None;
            node.next = None;
        }
    }

    fn link_front(&mut self, handle: Handle) {
        let old_head = self.head;
        if let Some(node) = self.nodes.get_mut(handle) {
            node.prev = None;
            node.next = old_head;
        }

        match old_head.and_then(|h| self.nodes.get_mut(h)) {
            Some(head_node) => head_node.prev = Some(handle),
            None => self.tail = Some(handle),
        }
        self.head = Some(handle);
    }
}

// == Iterator ==
/// Borrowing iterator over a `RecencyList`, head to tail.
pub struct Iter<'a, V> {
    list: &'a RecencyList<V>,
    cursor: Option<Handle>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a Entry<V>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.nodes.get(self.cursor?)?;
        self.cursor = node.next;
        self.remaining -= 1;
        Some(&node.entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}
