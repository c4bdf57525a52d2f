//! Read-only snapshot of a [`PrefixIndex`] backed by an FST (Finite State
//! Transducer).
//!
//! A [`FrozenIndex`] maps every word to its frequency. It answers the same
//! queries as the index it was frozen from, with identical results, but it
//! cannot grow. It is `Send + Sync`, so one snapshot can serve lookups from
//! many threads while the mutable index stays single-owner.
//!
//! Trade-offs:
//! - Immutable once built
//! - Frequencies are stored as the FST's `u64` outputs
//! - Prefix queries stream a key range instead of walking child slots

use std::ops::ControlFlow;

use fst::{IntoStreamer, Map, MapBuilder, Streamer};
use thiserror::Error;
use tracing::debug;

use crate::{fold, rank_by_frequency, spell, Completion, PrefixIndex};

/// Error type for building a frozen snapshot.
#[derive(Debug, Error)]
pub enum FrozenError {
    /// FST construction or access error.
    #[error("FST error: {0}")]
    Fst(#[from] fst::Error),
}

/// Result type for frozen snapshot operations.
pub type Result<T> = std::result::Result<T, FrozenError>;

/// An immutable word → frequency map built from a [`PrefixIndex`].
pub struct FrozenIndex {
    fst: Map<Vec<u8>>,
}

impl PrefixIndex {
    /// Build a read-only snapshot of the current contents.
    pub fn freeze(&self) -> Result<FrozenIndex> {
        // Depth-first a..z order is byte order, which the FST builder requires.
        let mut builder = MapBuilder::memory();
        for completion in self.iter() {
            builder.insert(completion.word.as_bytes(), u64::from(completion.frequency))?;
        }
        let fst = Map::new(builder.into_inner()?)?;
        debug!(words = fst.len(), bytes = fst.as_fst().size(), "frozen snapshot built");
        Ok(FrozenIndex { fst })
    }
}

impl FrozenIndex {
    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.fst.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fst.is_empty()
    }

    /// Bytes held by the FST.
    pub fn size_bytes(&self) -> usize {
        self.fst.as_fst().size()
    }

    /// Whether `word` is a complete word.
    pub fn search(&self, word: &str) -> bool {
        self.frequency(word).is_some()
    }

    /// How many times `word` was inserted before freezing.
    pub fn frequency(&self, word: &str) -> Option<u32> {
        let letters = fold(word).ok()?;
        self.fst.get(letters.as_slice()).map(to_frequency)
    }

    /// Whether any word starts with `prefix`. The empty prefix always exists.
    pub fn starts_with(&self, prefix: &str) -> bool {
        let mut found = prefix.is_empty();
        self.scan(prefix, |_, _| {
            found = true;
            ControlFlow::Break(())
        });
        found
    }

    /// Sum of the frequencies of all words starting with `prefix`.
    pub fn prefix_count(&self, prefix: &str) -> u64 {
        let mut total = 0u64;
        self.scan(prefix, |_, frequency| {
            total = total.saturating_add(u64::from(frequency));
            ControlFlow::Continue(())
        });
        total
    }

    /// The first `limit` completions of `prefix` in lexicographic order.
    pub fn autocomplete_lexicographic(&self, prefix: &str, limit: usize) -> Vec<Completion> {
        let mut out = Vec::new();
        if limit == 0 {
            return out;
        }
        self.scan(prefix, |word, frequency| {
            out.push(Completion {
                word: spell(word),
                frequency,
            });
            if out.len() == limit {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        out
    }

    /// The `limit` most frequent completions of `prefix`, ties broken by word.
    /// Scans every match before truncating.
    pub fn autocomplete_by_frequency(&self, prefix: &str, limit: usize) -> Vec<Completion> {
        if limit == 0 {
            return Vec::new();
        }
        let mut all = Vec::new();
        self.scan(prefix, |word, frequency| {
            all.push(Completion {
                word: spell(word),
                frequency,
            });
            ControlFlow::Continue(())
        });
        rank_by_frequency(all, limit)
    }

    /// Every word with its frequency, in lexicographic order.
    pub fn entries(&self) -> Vec<Completion> {
        self.autocomplete_lexicographic("", usize::MAX)
    }

    /// Feed every `(word, frequency)` under `prefix` to `visit` in byte order
    /// until it breaks. Invalid prefixes visit nothing.
    fn scan<F>(&self, prefix: &str, mut visit: F)
    where
        F: FnMut(&[u8], u32) -> ControlFlow<()>,
    {
        let Ok(letters) = fold(prefix) else {
            return;
        };

        let mut range = self.fst.range().ge(letters.as_slice());
        if let Some(end) = prefix_end(&letters) {
            range = range.lt(end);
        }

        let mut stream = range.into_stream();
        while let Some((word, value)) = stream.next() {
            if visit(word, to_frequency(value)).is_break() {
                break;
            }
        }
    }
}

impl std::fmt::Debug for FrozenIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.entries().into_iter().map(|c| (c.word, c.frequency)))
            .finish()
    }
}

/// Smallest key greater than every key starting with `prefix`, or `None` when
/// the range is unbounded.
fn prefix_end(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut end = prefix.to_vec();
    while let Some(last) = end.pop() {
        if last < u8::MAX {
            end.push(last + 1);
            return Some(end);
        }
    }
    None
}

fn to_frequency(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
