use crate::traces::{Letter, Sample, Trace};
use std::collections::HashMap;

/// The shared representation of all the suffixes of the traces of a sample.
///
/// Letters occurring in the sample are numbered by order of first occurrence
/// (positive traces first, then negative ones, each in order, positions ascending); these numbers are the letter classes.
///
/// Node `0` is the empty suffix.
/// Any other node is a pair `(c, m)` standing for the letter of class `c` followed by the suffix of node `m`, with `m` lower than the node.
/// Two identical suffixes, in the same trace or in different ones, are represented by the same node.
#[derive(Debug)]
pub struct SuffixTrie {
    letter_classes: Vec<Letter>,
    nodes: Vec<Option<(usize, usize)>>,
    positive_nodes: Vec<usize>,
    negative_nodes: Vec<usize>,
}

impl SuffixTrie {
    /// Builds the trie of a sample.
    pub fn new(sample: &Sample) -> Self {
        let mut letter_indices = HashMap::new();
        let mut letter_classes = vec![];
        sample
            .positive_traces()
            .iter()
            .chain(sample.negative_traces().iter())
            .flat_map(|t| t.letters().iter())
            .for_each(|l| {
                letter_indices.entry(l.clone()).or_insert_with(|| {
                    letter_classes.push(l.clone());
                    letter_classes.len() - 1
                });
            });
        let mut trie = SuffixTrie {
            letter_classes,
            nodes: vec![None],
            positive_nodes: Vec::with_capacity(sample.positive_traces().len()),
            negative_nodes: Vec::with_capacity(sample.negative_traces().len()),
        };
        let mut children = HashMap::new();
        let mut insert = |trace: &Trace, nodes: &mut Vec<Option<(usize, usize)>>| {
            trace.letters().iter().rev().fold(0, |next, letter| {
                let class = letter_indices[letter];
                *children.entry((class, next)).or_insert_with(|| {
                    nodes.push(Some((class, next)));
                    nodes.len() - 1
                })
            })
        };
        for t in sample.positive_traces() {
            let node = insert(t, &mut trie.nodes);
            trie.positive_nodes.push(node);
        }
        for t in sample.negative_traces() {
            let node = insert(t, &mut trie.nodes);
            trie.negative_nodes.push(node);
        }
        trie
    }

    /// Returns the letters of the classes, the index of a letter being its class.
    pub fn letter_classes(&self) -> &[Letter] {
        &self.letter_classes
    }

    /// Returns the number of letter classes.
    pub fn n_letter_classes(&self) -> usize {
        self.letter_classes.len()
    }

    /// Returns the number of nodes, including the empty suffix node.
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the letter class and the next node of a node, or [Option::None] for the empty suffix.
    pub fn node(&self, node: usize) -> Option<(usize, usize)> {
        self.nodes[node]
    }

    /// Iterates over the non-empty suffix nodes, giving `(node, class, next node)` triples.
    pub fn iter_non_empty(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(n, node)| node.map(|(c, m)| (n, c, m)))
    }

    /// Returns the nodes of the positive traces, in trace order.
    pub fn positive_nodes(&self) -> &[usize] {
        &self.positive_nodes
    }

    /// Returns the nodes of the negative traces, in trace order.
    pub fn negative_nodes(&self) -> &[usize] {
        &self.negative_nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traces::{TraceEncoder, Vocabulary};

    fn sample(pos: &[Vec<Vec<&str>>], neg: &[Vec<Vec<&str>>]) -> Sample {
        let vocabulary = Vocabulary::new_with_symbols(&["p", "q"]).unwrap();
        TraceEncoder::new(&vocabulary)
            .encode_sample(pos, neg)
            .unwrap()
    }

    #[test]
    fn test_letter_classes_order() {
        let s = sample(&[vec![vec!["q"], vec!["p"]]], &[vec![vec![], vec!["q"]]]);
        let trie = SuffixTrie::new(&s);
        assert_eq!(
            &[
                Letter::new_with_values(&[false, true]),
                Letter::new_with_values(&[true, false]),
                Letter::new_with_values(&[false, false]),
            ],
            trie.letter_classes()
        );
    }

    #[test]
    fn test_shared_suffixes() {
        // "q p" and "p" share the suffix "p"
        let s = sample(&[vec![vec!["q"], vec!["p"]]], &[vec![vec!["p"]]]);
        let trie = SuffixTrie::new(&s);
        assert_eq!(3, trie.n_nodes());
        assert_eq!(None, trie.node(0));
        assert_eq!(Some((1, 0)), trie.node(1));
        assert_eq!(Some((0, 1)), trie.node(2));
        assert_eq!(&[2], trie.positive_nodes());
        assert_eq!(&[1], trie.negative_nodes());
        assert_eq!(
            vec![(1, 1, 0), (2, 0, 1)],
            trie.iter_non_empty().collect::<Vec<(usize, usize, usize)>>()
        );
    }

    #[test]
    fn test_identical_traces_share_nodes() {
        let s = sample(&[vec![vec!["p"], vec!["p"]], vec![]], &[vec![vec!["p"], vec!["p"]]]);
        let trie = SuffixTrie::new(&s);
        assert_eq!(3, trie.n_nodes());
        assert_eq!(&[2, 0], trie.positive_nodes());
        assert_eq!(&[2], trie.negative_nodes());
        assert_eq!(1, trie.n_letter_classes());
    }

    #[test]
    fn test_empty_sample() {
        let trie = SuffixTrie::new(&sample(&[], &[]));
        assert_eq!(1, trie.n_nodes());
        assert_eq!(0, trie.n_letter_classes());
        assert_eq!(0, trie.iter_non_empty().count());
    }
}
