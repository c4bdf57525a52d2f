//! Binary min-priority queue.
//!
//! Entries pop in ascending key order, and entries with equal keys pop in the
//! order they were pushed. There is no decrease-key: a caller that improves a
//! priority pushes a second entry and discards the outdated one when it
//! surfaces (lazy deletion).
//!
//!   push(k, v): O(log n)
//!   pop():      O(log n), `None` on an empty queue
//!   peek():     O(1)

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

struct Entry<K, V> {
    key: K,
    /// Push counter; breaks ties between equal keys.
    seq: u64,
    value: V,
}

impl<K: Ord, V> Ord for Entry<K, V> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key
            .cmp(&other.key)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl<K: Ord, V> PartialOrd for Entry<K, V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord, V> PartialEq for Entry<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K: Ord, V> Eq for Entry<K, V> {}

/// A min-priority queue of `(key, value)` pairs. Only keys are compared.
pub struct MinQueue<K, V> {
    heap: BinaryHeap<Reverse<Entry<K, V>>>,
    next_seq: u64,
}

impl<K: Ord, V> MinQueue<K, V> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            next_seq: 0,
        }
    }

    pub fn push(&mut self, key: K, value: V) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Entry { key, seq, value }));
    }

    /// Remove the entry with the smallest key.
    pub fn pop(&mut self) -> Option<(K, V)> {
        self.heap
            .pop()
            .map(|Reverse(Entry { key, value, .. })| (key, value))
    }

    pub fn peek(&self) -> Option<(&K, &V)> {
        self.heap.peek().map(|Reverse(entry)| (&entry.key, &entry.value))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

impl<K: Ord, V> Default for MinQueue<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> Extend<(K, V)> for MinQueue<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, entries: I) {
        for (key, value) in entries {
            self.push(key, value);
        }
    }
}

impl<K: Ord + std::fmt::Debug, V> std::fmt::Debug for MinQueue<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MinQueue")
            .field("len", &self.heap.len())
            .field("min", &self.heap.peek().map(|Reverse(e)| &e.key))
            .finish()
    }
}
