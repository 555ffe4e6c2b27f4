//! Out-degree statistics over the states of an automaton.

use std::fmt;

use crate::dawg::Dawg;

/// Whether the state reached by the whole text takes part in the statistics.
///
/// That state never has outgoing edges. For an empty text it is the source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FinalState {
    /// Count it like every other state.
    Include,
    /// Leave it out.
    Exclude,
}

/// Histogram of state out-degrees.
///
/// # Examples
///
/// ```
/// use blumer_dawg::stats::{FinalState, NodeStats};
/// use blumer_dawg::Dawg;
///
/// let dawg = Dawg::new("abcbc");
/// let stats = NodeStats::collect(&dawg, FinalState::Include);
/// assert_eq!(stats.nodes(), dawg.node_count());
/// assert_eq!(stats.count(0), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeStats {
    histogram: Vec<usize>,
    final_state: FinalState,
}

impl NodeStats {
    /// Scans every allocated state of `dawg`.
    pub fn collect<const A: usize>(dawg: &Dawg<A>, final_state: FinalState) -> Self {
        let mut histogram = vec![0; A + 1];
        for node in dawg.nodes() {
            if final_state == FinalState::Exclude && node.handle() == dawg.last() {
                continue;
            }
            histogram[node.degree()] += 1;
        }
        NodeStats {
            histogram,
            final_state,
        }
    }

    /// Number of states per out-degree, indexed by degree `0..=A`.
    pub fn histogram(&self) -> &[usize] {
        &self.histogram
    }

    /// Number of states with out-degree `degree`.
    pub fn count(&self, degree: usize) -> usize {
        self.histogram.get(degree).copied().unwrap_or(0)
    }

    /// Number of states counted.
    pub fn nodes(&self) -> usize {
        self.histogram.iter().sum()
    }

    /// Number of states with at least two outgoing edges.
    pub fn branching(&self) -> usize {
        self.histogram.iter().skip(2).sum()
    }

    /// Whether the final state was counted.
    pub fn final_state(&self) -> FinalState {
        self.final_state
    }
}

impl fmt::Display for NodeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (degree, count) in self.histogram.iter().enumerate() {
            writeln!(f, "{degree}: {count}")?;
        }
        write!(f, "branching: {}", self.branching())
    }
}
