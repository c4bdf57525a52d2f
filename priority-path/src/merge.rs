//! K-way merge of already-sorted sources.
//!
//! Each source is a cursor that only advances when its current head has been
//! emitted, so the queue holds at most one entry per non-exhausted source.
//! Equal elements from different sources come out in source order.

use std::iter::FusedIterator;

use tracing::debug;

use crate::queue::MinQueue;

/// Lazy merge of sorted sources by their natural order. See [`merge_sorted`].
pub struct MergeSorted<I: Iterator> {
    sources: Vec<I>,
    queue: MinQueue<(I::Item, usize), ()>,
}

/// Merge ascending `sources` into one ascending sequence.
///
/// Sources may be empty, and there may be none at all. Input that is not
/// sorted is not detected; the output is then merely interleaved.
///
/// ```rust
/// use priority_path::merge_sorted;
///
/// let merged: Vec<i32> = merge_sorted([vec![1, 4, 7], vec![2, 5, 8], vec![3, 6, 9]]).collect();
/// assert_eq!(merged, [1, 2, 3, 4, 5, 6, 7, 8, 9]);
/// ```
pub fn merge_sorted<S, I>(sources: S) -> MergeSorted<I::IntoIter>
where
    S: IntoIterator<Item = I>,
    I: IntoIterator,
    I::Item: Ord,
{
    let mut sources: Vec<I::IntoIter> = sources.into_iter().map(IntoIterator::into_iter).collect();
    let mut queue = MinQueue::with_capacity(sources.len());
    for (source, cursor) in sources.iter_mut().enumerate() {
        if let Some(head) = cursor.next() {
            queue.push((head, source), ());
        }
    }
    debug!(sources = sources.len(), live = queue.len(), "k-way merge started");
    MergeSorted { sources, queue }
}

impl<I> Iterator for MergeSorted<I>
where
    I: Iterator,
    I::Item: Ord,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let ((item, source), ()) = self.queue.pop()?;
        if let Some(head) = self.sources[source].next() {
            self.queue.push((head, source), ());
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        remaining(self.queue.len(), &self.sources)
    }
}

impl<I> FusedIterator for MergeSorted<I>
where
    I: Iterator,
    I::Item: Ord,
{
}

/// Lazy merge of sources sorted by a key. See [`merge_sorted_by_key`].
pub struct MergeSortedByKey<I: Iterator, K, F> {
    sources: Vec<I>,
    queue: MinQueue<(K, usize), I::Item>,
    key: F,
}

/// Merge `sources`, each ascending by `key`, into one sequence ascending by
/// `key`. Elements themselves need no ordering.
///
/// ```rust
/// use priority_path::merge_sorted_by_key;
///
/// let a = [("apple", 1), ("pear", 4)];
/// let b = [("fig", 2), ("kiwi", 3)];
/// let names: Vec<&str> = merge_sorted_by_key([a, b], |&(_, rank)| rank)
///     .map(|(name, _)| name)
///     .collect();
/// assert_eq!(names, ["apple", "fig", "kiwi", "pear"]);
/// ```
pub fn merge_sorted_by_key<S, I, K, F>(sources: S, mut key: F) -> MergeSortedByKey<I::IntoIter, K, F>
where
    S: IntoIterator<Item = I>,
    I: IntoIterator,
    K: Ord,
    F: FnMut(&I::Item) -> K,
{
    let mut sources: Vec<I::IntoIter> = sources.into_iter().map(IntoIterator::into_iter).collect();
    let mut queue = MinQueue::with_capacity(sources.len());
    for (source, cursor) in sources.iter_mut().enumerate() {
        if let Some(head) = cursor.next() {
            queue.push((key(&head), source), head);
        }
    }
    debug!(sources = sources.len(), live = queue.len(), "keyed k-way merge started");
    MergeSortedByKey { sources, queue, key }
}

impl<I, K, F> Iterator for MergeSortedByKey<I, K, F>
where
    I: Iterator,
    K: Ord,
    F: FnMut(&I::Item) -> K,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let ((_, source), item) = self.queue.pop()?;
        if let Some(head) = self.sources[source].next() {
            self.queue.push(((self.key)(&head), source), head);
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        remaining(self.queue.len(), &self.sources)
    }
}

impl<I, K, F> FusedIterator for MergeSortedByKey<I, K, F>
where
    I: Iterator,
    K: Ord,
    F: FnMut(&I::Item) -> K,
{
}

/// Buffered heads plus whatever the sources still report.
fn remaining<I: Iterator>(buffered: usize, sources: &[I]) -> (usize, Option<usize>) {
    sources
        .iter()
        .fold((buffered, Some(buffered)), |(lower, upper), source| {
            let (l, u) = source.size_hint();
            (
                lower.saturating_add(l),
                upper.zip(u).and_then(|(a, b)| a.checked_add(b)),
            )
        })
}
