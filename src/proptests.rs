use super::*;

use proptest::prelude::*;
use std::collections::BTreeMap;

/// Walks the arena from the root and checks the structural invariants.
fn validate_index(t: &PrefixIndex) {
    let root = t.nodes.get(NodeId::ROOT);
    assert!(!root.is_end_of_word, "root must never be a word");

    let mut reachable = 1usize;
    let mut words = 0usize;
    let mut stack = vec![NodeId::ROOT];
    while let Some(id) = stack.pop() {
        let node = t.nodes.get(id);

        assert_eq!(
            node.is_end_of_word,
            node.frequency > 0,
            "frequency is positive exactly on terminal nodes"
        );
        if node.is_end_of_word {
            words += 1;
        }

        let mut through_children = 0u64;
        for &child in node.children.iter().filter(|c| !c.is_null()) {
            let child_node = t.nodes.get(child);
            assert!(child_node.pass_count > 0, "a created node lies on some word");
            through_children += child_node.pass_count;
            reachable += 1;
            stack.push(child);
        }
        assert_eq!(
            node.pass_count,
            u64::from(node.frequency) + through_children,
            "pass count must equal words ending here plus words passing below"
        );
    }

    assert_eq!(reachable, t.node_count(), "every node is reachable from the root");
    assert_eq!(words, t.len(), "distinct word count must match PrefixIndex::len");
}

/// Reference model: folded word → insertion count.
#[derive(Default)]
struct Model {
    words: BTreeMap<String, u32>,
}

impl Model {
    fn fold(text: &str) -> Option<String> {
        text.chars()
            .all(|c| c.is_ascii_alphabetic())
            .then(|| text.to_ascii_lowercase())
    }

    fn insert(&mut self, word: &str) {
        if let Some(word) = Self::fold(word).filter(|w| !w.is_empty()) {
            *self.words.entry(word).or_default() += 1;
        }
    }

    fn completions(&self, prefix: &str) -> Vec<Completion> {
        let Some(prefix) = Self::fold(prefix) else {
            return Vec::new();
        };
        self.words
            .iter()
            .filter(|(w, _)| w.starts_with(&prefix))
            .map(|(w, &f)| Completion {
                word: w.clone(),
                frequency: f,
            })
            .collect()
    }

    fn prefix_count(&self, prefix: &str) -> u64 {
        self.completions(prefix)
            .iter()
            .map(|c| u64::from(c.frequency))
            .sum()
    }
}

#[derive(Clone, Debug)]
enum Op {
    Insert(String),
    Search(String),
    PrefixCount(String),
    Autocomplete(String, usize, Ranking),
}

fn word_strategy() -> impl Strategy<Value = String> + Clone {
    // A small alphabet keeps paths overlapping; digits and spaces exercise
    // rejection.
    "[a-dA-D]{0,6}|[a-c]{0,3}[1 ][a-c]{0,2}"
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let word = word_strategy();
    let ranking = prop_oneof![Just(Ranking::Lexicographic), Just(Ranking::Frequency)];
    let op = prop_oneof![
        50 => word.clone().prop_map(Op::Insert),
        15 => word.clone().prop_map(Op::Search),
        15 => word.clone().prop_map(Op::PrefixCount),
        20 => (word.clone(), 0usize..6, ranking)
            .prop_map(|(p, limit, r)| Op::Autocomplete(p, limit, r)),
    ];
    prop::collection::vec(op, 0..=500)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(ops in ops_strategy()) {
        let mut t = PrefixIndex::new();
        let mut m = Model::default();

        for op in ops {
            match op {
                Op::Insert(word) => {
                    t.insert(&word);
                    m.insert(&word);
                }
                Op::Search(word) => {
                    let expected = Model::fold(&word).and_then(|w| m.words.get(&w).copied());
                    prop_assert_eq!(t.frequency(&word), expected);
                    prop_assert_eq!(t.search(&word), expected.is_some());
                }
                Op::PrefixCount(prefix) => {
                    prop_assert_eq!(t.prefix_count(&prefix), m.prefix_count(&prefix));
                }
                Op::Autocomplete(prefix, limit, ranking) => {
                    let mut expected = m.completions(&prefix);
                    if ranking == Ranking::Frequency {
                        expected.sort_by(Completion::frequency_order);
                    }
                    expected.truncate(limit);
                    prop_assert_eq!(t.autocomplete(&prefix, limit, ranking), expected);
                }
            }

            prop_assert_eq!(t.len(), m.words.len());
        }

        validate_index(&t);
        let got: Vec<(String, u32)> = t.iter().map(|c| (c.word, c.frequency)).collect();
        let expected: Vec<(String, u32)> = m.words.into_iter().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_prefix_count_is_monotonic(
        words in prop::collection::vec("[a-c]{1,5}", 0..100),
        longer in "[a-c]{0,5}",
        cut in 0usize..=5,
    ) {
        let t: PrefixIndex = words.iter().collect();
        let shorter = &longer[..cut.min(longer.len())];
        prop_assert!(t.prefix_count(shorter) >= t.prefix_count(&longer));
    }

    #[test]
    fn prop_repeat_insert_doubles_frequency(word in "[a-zA-Z]{1,12}") {
        let mut t = PrefixIndex::new();
        t.insert(&word);
        t.insert(&word);
        prop_assert!(t.search(&word));
        prop_assert_eq!(t.frequency(&word), Some(2));
        validate_index(&t);
    }

    #[test]
    fn prop_rejected_word_leaves_index_untouched(
        words in prop::collection::vec("[a-c]{1,4}", 0..30),
        head in "[a-c]{0,4}",
        bad in "[0-9 _.-]",
        tail in "[a-c]{0,4}",
    ) {
        let mut t: PrefixIndex = words.iter().collect();
        let before = t.nodes.clone();
        t.insert(&format!("{head}{bad}{tail}"));
        prop_assert_eq!(&t.nodes, &before);
    }

    #[test]
    fn prop_frozen_equivalence(
        words in prop::collection::vec("[a-dA-D]{1,6}", 0..200),
        prefix in "[a-d]{0,3}",
        limit in 0usize..8,
    ) {
        let t: PrefixIndex = words.iter().collect();
        let f = t.freeze().unwrap();
        prop_assert_eq!(f.prefix_count(&prefix), t.prefix_count(&prefix));
        prop_assert_eq!(f.starts_with(&prefix), t.starts_with(&prefix));
        prop_assert_eq!(
            f.autocomplete_by_frequency(&prefix, limit),
            t.autocomplete_by_frequency(&prefix, limit)
        );
        prop_assert_eq!(
            f.autocomplete_lexicographic(&prefix, limit),
            t.autocomplete_lexicographic(&prefix, limit)
        );
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

#[test]
fn exhaustive_insert_order_small_set() {
    let words = ["a", "b", "ab", "abc", "ab", "ba"];
    let reference: PrefixIndex = words.iter().collect();
    let expected: Vec<Completion> = reference.iter().collect();

    for_each_permutation(&words, |perm| {
        let t: PrefixIndex = perm.iter().collect();

        validate_index(&t);
        assert_eq!(t.node_count(), reference.node_count());
        assert_eq!(t.iter().collect::<Vec<_>>(), expected);
        for prefix in ["", "a", "ab", "abc", "b", "ba", "c"] {
            assert_eq!(t.prefix_count(prefix), reference.prefix_count(prefix));
            assert_eq!(
                t.autocomplete_by_frequency(prefix, 3),
                reference.autocomplete_by_frequency(prefix, 3)
            );
        }
    });
}
