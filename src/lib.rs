//! # prefix-index
//!
//! An in-memory prefix tree over lowercase ASCII words, with per-word insertion
//! frequencies, prefix counting and two autocomplete rankings.
//!
//! Input is case-folded: `"The"` and `"the"` name the same word. A word holding
//! any character outside `a..=z` after folding is rejected as a whole; nothing
//! of it is stored.
//!
//! ## Example
//!
//! ```rust
//! use prefix_index::PrefixIndex;
//!
//! let mut index = PrefixIndex::new();
//! for word in ["the", "the", "them", "theory", "tea"] {
//!     index.insert(word);
//! }
//!
//! assert!(index.search("them"));
//! assert!(!index.search("th"));
//! assert_eq!(index.prefix_count("the"), 4);
//!
//! let ranked = index.autocomplete_by_frequency("th", 2);
//! assert_eq!(ranked[0].word, "the");
//! assert_eq!(ranked[0].frequency, 2);
//! ```

pub mod frozen;

use std::cmp::Ordering;

use smallvec::SmallVec;
use thiserror::Error;
use tracing::trace;

pub use frozen::FrozenIndex;

// =============================================================================
// Alphabet
// =============================================================================

const ALPHABET_SIZE: usize = 26;

/// Folded word bytes; most dictionary words fit inline.
type Letters = SmallVec<[u8; 32]>;

/// Case-fold `text` into lowercase ASCII bytes.
///
/// Fails on the first character that is not an ASCII letter. Folding is ASCII
/// only: a non-ASCII character is rejected even when its Unicode lowercase is
/// ASCII (the Kelvin sign U+212A lowercases to `k` but is refused here).
pub(crate) fn fold(text: &str) -> Result<Letters, InvalidWord> {
    let mut letters = Letters::with_capacity(text.len());
    for (position, ch) in text.chars().enumerate() {
        let lower = ch.to_ascii_lowercase();
        if !lower.is_ascii_lowercase() {
            return Err(InvalidWord::InvalidChar { ch, position });
        }
        letters.push(lower as u8);
    }
    Ok(letters)
}

#[inline]
fn slot(letter: u8) -> usize {
    debug_assert!(letter.is_ascii_lowercase());
    (letter - b'a') as usize
}

#[inline]
fn letter(slot: usize) -> u8 {
    debug_assert!(slot < ALPHABET_SIZE);
    b'a' + slot as u8
}

fn spell(letters: &[u8]) -> String {
    letters.iter().map(|&b| b as char).collect()
}

/// Reason a word was refused by [`PrefixIndex::try_insert`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidWord {
    /// The empty string names the root, which is never a word.
    #[error("empty word")]
    Empty,
    /// A character outside `a..=z` after case folding.
    #[error("character {ch:?} at position {position} is not an ASCII letter")]
    InvalidChar {
        /// The offending character as given.
        ch: char,
        /// Its index in `chars()` order.
        position: usize,
    },
}

// =============================================================================
// Public value types
// =============================================================================

/// How autocomplete orders (and cuts) its results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ranking {
    /// Depth-first `a..z` order; stops as soon as the limit is reached.
    #[default]
    Lexicographic,
    /// Highest frequency first, ties by word. Visits every completion before
    /// cutting, so cost grows with the number of matches, not the limit.
    Frequency,
}

/// One autocomplete result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Completion {
    /// The complete word, lowercase.
    pub word: String,
    /// Number of times the word was inserted.
    pub frequency: u32,
}

impl Completion {
    /// Frequency descending, then word ascending.
    pub fn frequency_order(&self, other: &Self) -> Ordering {
        other
            .frequency
            .cmp(&self.frequency)
            .then_with(|| self.word.cmp(&other.word))
    }
}

/// Ranks `completions` by frequency and keeps the best `limit`.
pub(crate) fn rank_by_frequency(mut completions: Vec<Completion>, limit: usize) -> Vec<Completion> {
    completions.sort_unstable_by(Completion::frequency_order);
    completions.truncate(limit);
    completions
}

/// Configuration for a [`PrefixIndex`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Number of nodes to reserve up front.
    pub initial_capacity: usize,
    /// Ranking used by [`PrefixIndex::suggest`].
    pub ranking: Ranking,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_capacity: 1024,
            ranking: Ranking::Lexicographic,
        }
    }
}

// =============================================================================
// Node arena
// =============================================================================

/// Index of a node in the arena. `NULL` marks an absent child slot.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct NodeId(u32);

impl NodeId {
    const ROOT: NodeId = NodeId(0);
    const NULL: NodeId = NodeId(u32::MAX);

    #[inline]
    fn is_null(self) -> bool {
        self == Self::NULL
    }

    #[inline]
    fn index(self) -> usize {
        debug_assert!(!self.is_null());
        self.0 as usize
    }

    /// The id for arena slot `index`, or `None` once the 32-bit id space
    /// (less the `NULL` sentinel) is used up.
    fn from_index(index: usize) -> Option<NodeId> {
        u32::try_from(index)
            .ok()
            .filter(|&raw| raw != Self::NULL.0)
            .map(NodeId)
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
struct Node {
    children: [NodeId; ALPHABET_SIZE],
    is_end_of_word: bool,
    /// Insertions ending exactly here. Saturates at `u32::MAX`; past that point
    /// the pass counts above it keep growing and no longer equal the sum of
    /// the frequencies below.
    frequency: u32,
    /// Insertions whose path passes through (or ends at) this node.
    pass_count: u64,
}

impl Node {
    const EMPTY: Node = Node {
        children: [NodeId::NULL; ALPHABET_SIZE],
        is_end_of_word: false,
        frequency: 0,
        pass_count: 0,
    };

    #[inline]
    fn child(&self, letter: u8) -> NodeId {
        self.children[slot(letter)]
    }
}

/// Nodes live in one vector; a parent refers to children by index. Nodes are
/// never freed individually.
#[derive(Clone, PartialEq, Eq, Debug)]
struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(Node::EMPTY);
        Self { nodes }
    }

    /// Panics once the arena holds `u32::MAX` nodes.
    fn alloc(&mut self) -> NodeId {
        let Some(id) = NodeId::from_index(self.nodes.len()) else {
            panic!("node arena full at {} nodes", self.nodes.len());
        };
        self.nodes.push(Node::EMPTY);
        id
    }

    #[inline]
    fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit();
    }
}

// =============================================================================
// PrefixIndex
// =============================================================================

/// A prefix tree over lowercase ASCII words.
///
/// The index only grows: there is no removal. Every query case-folds its input
/// and treats invalid characters as "no such path".
#[derive(Clone)]
pub struct PrefixIndex {
    nodes: NodeArena,
    words: usize,
    config: Config,
}

impl PrefixIndex {
    /// Create an empty index with the default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create an empty index with the given configuration.
    pub fn with_config(config: Config) -> Self {
        Self {
            nodes: NodeArena::with_capacity(config.initial_capacity),
            words: 0,
            config,
        }
    }

    /// The configuration this index was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of distinct words.
    #[inline]
    pub fn len(&self) -> usize {
        self.words
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words == 0
    }

    /// Number of successful insertions, duplicates included.
    pub fn total_insertions(&self) -> u64 {
        self.nodes.get(NodeId::ROOT).pass_count
    }

    /// Number of allocated nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn memory_usage(&self) -> usize {
        std::mem::size_of::<Self>() + self.nodes.capacity() * std::mem::size_of::<Node>()
    }

    pub fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit();
    }

    /// Insert `word`, silently ignoring it if it is empty or holds a character
    /// outside `a..=z` after case folding.
    ///
    /// Use [`try_insert`](Self::try_insert) to learn whether the word was kept.
    pub fn insert(&mut self, word: &str) {
        if let Err(err) = self.try_insert(word) {
            trace!(word, %err, "insertion rejected");
        }
    }

    /// Insert `word`, reporting why it was refused.
    ///
    /// A refused word leaves the index untouched; validation runs before any
    /// node is created.
    pub fn try_insert(&mut self, word: &str) -> Result<(), InvalidWord> {
        if word.is_empty() {
            return Err(InvalidWord::Empty);
        }
        let letters = fold(word)?;

        let mut current = NodeId::ROOT;
        self.bump_pass_count(current);
        for &letter in &letters {
            let mut child = self.nodes.get(current).child(letter);
            if child.is_null() {
                child = self.nodes.alloc();
                self.nodes.get_mut(current).children[slot(letter)] = child;
            }
            self.bump_pass_count(child);
            current = child;
        }

        let terminal = self.nodes.get_mut(current);
        if !terminal.is_end_of_word {
            terminal.is_end_of_word = true;
            self.words += 1;
        }
        terminal.frequency = terminal.frequency.saturating_add(1);
        Ok(())
    }

    #[inline]
    fn bump_pass_count(&mut self, id: NodeId) {
        let node = self.nodes.get_mut(id);
        node.pass_count = node.pass_count.saturating_add(1);
    }

    /// Walk the path spelled by `text`. Returns the node reached and the folded
    /// letters, or `None` for an invalid character or a missing path.
    fn descend(&self, text: &str) -> Option<(NodeId, Letters)> {
        let letters = fold(text).ok()?;
        let mut current = NodeId::ROOT;
        for &letter in &letters {
            current = self.nodes.get(current).child(letter);
            if current.is_null() {
                return None;
            }
        }
        Some((current, letters))
    }

    /// Whether `word` was inserted as a complete word.
    pub fn search(&self, word: &str) -> bool {
        self.frequency(word).is_some()
    }

    /// How many times `word` was inserted, or `None` if it is not a word.
    pub fn frequency(&self, word: &str) -> Option<u32> {
        let (id, _) = self.descend(word)?;
        let node = self.nodes.get(id);
        node.is_end_of_word.then_some(node.frequency)
    }

    /// Whether any inserted word starts with `prefix`. The empty prefix always
    /// exists.
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.descend(prefix).is_some()
    }

    /// Number of successful insertions whose word starts with `prefix`,
    /// duplicates included. `0` for an invalid or missing prefix.
    pub fn prefix_count(&self, prefix: &str) -> u64 {
        self.descend(prefix)
            .map_or(0, |(id, _)| self.nodes.get(id).pass_count)
    }

    /// Lazily enumerate the words starting with `prefix` in lexicographic
    /// order.
    pub fn completions(&self, prefix: &str) -> Iter<'_> {
        match self.descend(prefix) {
            Some((id, letters)) => Iter::new(self, id, letters),
            None => Iter::empty(self),
        }
    }

    /// Every word with its frequency, in lexicographic order.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self, NodeId::ROOT, Letters::new())
    }

    /// Up to `limit` completions of `prefix`, ordered by `ranking`.
    ///
    /// An invalid or unknown prefix, or a `limit` of zero, yields an empty
    /// vector.
    pub fn autocomplete(&self, prefix: &str, limit: usize, ranking: Ranking) -> Vec<Completion> {
        match ranking {
            Ranking::Lexicographic => self.autocomplete_lexicographic(prefix, limit),
            Ranking::Frequency => self.autocomplete_by_frequency(prefix, limit),
        }
    }

    /// The first `limit` completions of `prefix` in `a..z` depth-first order.
    /// Traversal stops once `limit` words have been found.
    pub fn autocomplete_lexicographic(&self, prefix: &str, limit: usize) -> Vec<Completion> {
        if limit == 0 {
            return Vec::new();
        }
        self.completions(prefix).take(limit).collect()
    }

    /// The `limit` most frequent completions of `prefix`, ties broken by word.
    ///
    /// Every completion is collected and sorted before truncating, which is
    /// `O(m log m)` in the number of matches `m`. Short prefixes over a large
    /// dictionary pay for the whole subtree.
    pub fn autocomplete_by_frequency(&self, prefix: &str, limit: usize) -> Vec<Completion> {
        if limit == 0 {
            return Vec::new();
        }
        rank_by_frequency(self.completions(prefix).collect(), limit)
    }

    /// Autocomplete using the configured [`Ranking`].
    pub fn suggest(&self, prefix: &str, limit: usize) -> Vec<Completion> {
        self.autocomplete(prefix, limit, self.config.ranking)
    }
}

impl Default for PrefixIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PrefixIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|c| (c.word, c.frequency)))
            .finish()
    }
}

impl<S: AsRef<str>> Extend<S> for PrefixIndex {
    fn extend<I: IntoIterator<Item = S>>(&mut self, words: I) {
        for word in words {
            self.insert(word.as_ref());
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for PrefixIndex {
    fn from_iter<I: IntoIterator<Item = S>>(words: I) -> Self {
        let mut index = Self::new();
        index.extend(words);
        index
    }
}

impl<'a> IntoIterator for &'a PrefixIndex {
    type Item = Completion;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// =============================================================================
// Iteration
// =============================================================================

#[derive(Clone, Copy)]
struct Frame {
    node: NodeId,
    /// Word length once this node's letter is appended.
    depth: usize,
    /// `None` for the starting node, whose letters are already buffered.
    letter: Option<u8>,
}

/// Depth-first, `a..z` iterator over the words below a node.
pub struct Iter<'a> {
    index: &'a PrefixIndex,
    stack: Vec<Frame>,
    buf: Letters,
}

impl<'a> Iter<'a> {
    fn new(index: &'a PrefixIndex, start: NodeId, buf: Letters) -> Self {
        let stack = vec![Frame {
            node: start,
            depth: buf.len(),
            letter: None,
        }];
        Self { index, stack, buf }
    }

    fn empty(index: &'a PrefixIndex) -> Self {
        Self {
            index,
            stack: Vec::new(),
            buf: Letters::new(),
        }
    }
}

impl Iterator for Iter<'_> {
    type Item = Completion;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(frame) = self.stack.pop() {
            if let Some(letter) = frame.letter {
                self.buf.truncate(frame.depth - 1);
                self.buf.push(letter);
            }

            let node = self.index.nodes.get(frame.node);
            for slot in (0..ALPHABET_SIZE).rev() {
                let child = node.children[slot];
                if !child.is_null() {
                    self.stack.push(Frame {
                        node: child,
                        depth: frame.depth + 1,
                        letter: Some(letter(slot)),
                    });
                }
            }

            if node.is_end_of_word {
                return Some(Completion {
                    word: spell(&self.buf),
                    frequency: node.frequency,
                });
            }
        }
        None
    }
}

impl std::iter::FusedIterator for Iter<'_> {}


#[cfg(test)]
mod proptests;
