//! Example: a substring index on top of the DAWG.
//!
//! `SubstringIndex` wraps a `Dawg` and answers substring and suffix queries,
//! counts distinct substrings and lists those of a given length.
//!
//! Run with: cargo run --example substrings

use std::collections::HashMap;

use blumer_dawg::dawg::{NodeHandle, NodeRef};
use blumer_dawg::Dawg;

struct SubstringIndex {
    dawg: Dawg,
}

impl SubstringIndex {
    fn new(text: &str) -> Self {
        SubstringIndex {
            dawg: Dawg::new(text),
        }
    }

    fn occurs(&self, pattern: &str) -> bool {
        self.dawg.contains(pattern)
    }

    fn ends_text(&self, pattern: &str) -> bool {
        self.dawg.is_suffix(pattern)
    }

    /// Number of distinct non-empty substrings: the number of paths leaving the source.
    fn distinct_substrings(&self) -> u64 {
        // Post-order over the DAG with an explicit stack; text length does not
        // bound the call depth.
        let mut paths: HashMap<NodeHandle, u64> = HashMap::new();
        let mut stack = vec![(self.dawg.source(), false)];
        while let Some((handle, expanded)) = stack.pop() {
            if paths.contains_key(&handle) {
                continue;
            }
            let node = self.dawg.node(handle);
            if expanded {
                let total = 1 + node.edges().map(|e| paths[&e.target]).sum::<u64>();
                paths.insert(handle, total);
            } else {
                stack.push((handle, true));
                stack.extend(
                    node.edges()
                        .filter(|e| !paths.contains_key(&e.target))
                        .map(|e| (e.target, false)),
                );
            }
        }
        paths[&self.dawg.source()] - 1
    }

    /// Distinct substrings of exactly `len` symbols, in edge order.
    fn of_length(&self, len: usize) -> Vec<String> {
        let mut found = Vec::new();
        let mut stack = vec![(self.dawg.root(), String::new())];
        while let Some((node, prefix)) = stack.pop() {
            if prefix.len() == len {
                found.push(prefix);
                continue;
            }
            let children: Vec<(NodeRef<'_>, String)> = node
                .edges()
                .map(|e| (self.dawg.node(e.target), format!("{prefix}{}", e.label)))
                .collect();
            stack.extend(children.into_iter().rev());
        }
        found
    }
}

fn main() {
    let text = "abracadabra";
    let index = SubstringIndex::new(text);
    println!("text: {text}");
    println!(
        "states: {}, splits: {}",
        index.dawg.node_count(),
        index.dawg.construction_stats().splits
    );

    // Substring lookup
    println!("\nSubstrings:");
    for pattern in ["cad", "abra", "brac", "dab", "rab", "aa"] {
        println!("  {pattern}: {}", if index.occurs(pattern) { "yes" } else { "no" });
    }

    // Suffix checking
    println!("\nSuffixes:");
    for pattern in ["bra", "abra", "cadabra", "abr"] {
        println!("  *{pattern}: {}", if index.ends_text(pattern) { "yes" } else { "no" });
    }

    println!("\nDistinct substrings: {}", index.distinct_substrings());
    println!("Of length 3: {:?}", index.of_length(3));
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn counts_distinct_substrings() {
        // abracadabra: 11 characters, 54 distinct non-empty substrings
        assert_eq!(SubstringIndex::new("abracadabra").distinct_substrings(), 54);
        assert_eq!(SubstringIndex::new("").distinct_substrings(), 0);
    }

    #[test]
    fn long_texts_do_not_exhaust_the_stack() {
        // (ab)^k has 2 distinct substrings of every length below 2k and one of length 2k.
        let index = SubstringIndex::new(&"ab".repeat(100_000));
        assert_eq!(index.distinct_substrings(), 399_999);
        assert_eq!(index.of_length(4), ["abab", "baba"]);
    }

    #[test]
    fn lists_substrings_of_a_length() {
        let mut found = SubstringIndex::new("abracadabra").of_length(3);
        found.sort();
        assert_eq!(found, ["abr", "aca", "ada", "bra", "cad", "dab", "rac"]);
    }
}
