//! Every text over a four-letter alphabet up to a fixed length, checked
//! against brute force.

use std::collections::HashSet;

use blumer_dawg::dawg::{Dawg, Representation, PARTIAL_LIST_CAPACITY};
use itertools::Itertools;

const LETTERS: &[u8] = b"abcd";

fn words(len: usize) -> impl Iterator<Item = Vec<u8>> {
    (0..len)
        .map(|_| LETTERS.iter().copied())
        .multi_cartesian_product()
}

fn texts(max_len: usize) -> impl Iterator<Item = Vec<u8>> {
    std::iter::once(Vec::new()).chain((1..=max_len).flat_map(words))
}

fn occurs(text: &[u8], pattern: &[u8]) -> bool {
    pattern.is_empty() || text.windows(pattern.len()).any(|w| w == pattern)
}

/// One state per distinct set of end positions, plus the source.
fn state_count(text: &[u8]) -> usize {
    let mut classes = HashSet::new();
    for start in 0..text.len() {
        for end in start + 1..=text.len() {
            let pattern = &text[start..end];
            let ends: Vec<usize> = text
                .windows(pattern.len())
                .positions(|w| w == pattern)
                .map(|i| i + pattern.len())
                .collect();
            classes.insert(ends);
        }
    }
    classes.len() + 1
}

#[test]
fn accepts_exactly_the_substrings() {
    let patterns: Vec<Vec<u8>> = (1..=3).flat_map(words).collect();
    for text in texts(6) {
        let dawg = Dawg::<4>::from_text(&text);
        for pattern in &patterns {
            assert_eq!(
                dawg.contains(pattern),
                occurs(&text, pattern),
                "{:?} in {:?}",
                String::from_utf8_lossy(pattern),
                String::from_utf8_lossy(&text)
            );
            assert_eq!(dawg.is_suffix(pattern), text.ends_with(pattern));
        }
    }
}

#[test]
fn state_count_is_minimal() {
    for text in texts(7) {
        let dawg = Dawg::<4>::from_text(&text);
        assert_eq!(
            dawg.node_count(),
            state_count(&text),
            "{}",
            String::from_utf8_lossy(&text)
        );
    }
}

#[test]
fn representation_follows_degree() {
    let mut maps = 0;
    for text in texts(6) {
        let dawg = Dawg::<4>::from_text(&text);
        for node in dawg.nodes() {
            let expected = match node.degree() {
                0 => Representation::Empty,
                1 => Representation::Single,
                d if d <= PARTIAL_LIST_CAPACITY => Representation::PartialList,
                _ => Representation::FullMap,
            };
            assert_eq!(node.representation(), expected);
            assert_eq!(node.edges().len(), node.degree());
        }
        let memory = dawg.memory();
        let collections = dawg
            .nodes()
            .filter(|n| n.representation() >= Representation::PartialList)
            .count();
        assert_eq!(memory.lists.live + memory.maps.live, collections);
        maps += memory.maps.live;
    }
    assert!(maps > 0);
}

#[test]
fn edge_labels_are_unique_and_sorted_within_maps() {
    for text in texts(5) {
        let dawg = Dawg::<4>::from_text(&text);
        for node in dawg.nodes() {
            let labels: Vec<_> = node.edges().map(|e| e.label).collect();
            assert!(labels.iter().all_unique());
            if node.representation() == Representation::FullMap {
                assert!(labels.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }
}
