use std::collections::VecDeque;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use hashbrown::HashMap;
use thiserror::Error;

use super::arena::NodeHandle;
use super::builder::{Builder, ConstructionStats};
use super::children::{Edges, Representation};
use super::config::{Config, ConfigError};
use super::edge::Edge;
use super::node::{MemoryStats, NodeStore};
use super::symbol::{collect_pattern, encode, IntoText, Symbol, SymbolError, ALPHABET_SIZE};

/// The directed acyclic word graph of a text.
///
/// The automaton owns all of its nodes. Starting at [`root`](Dawg::root) and
/// following edges spells exactly the substrings of the text; the states on
/// the suffix chain of [`last`](Dawg::last) are the ones reached by suffixes.
///
/// # Examples
///
/// ```
/// use blumer_dawg::Dawg;
///
/// let dawg = Dawg::new("abcbc");
/// assert!(dawg.contains("bcb"));
/// assert!(!dawg.contains("cc"));
/// assert!(dawg.is_suffix("cbc"));
/// assert!(!dawg.is_suffix("bcb"));
/// ```
#[derive(Debug)]
pub struct Dawg<const A: usize = ALPHABET_SIZE> {
    store: NodeStore<A>,
    source: NodeHandle,
    last: NodeHandle,
    stats: ConstructionStats,
}

impl Dawg {
    /// Builds the automaton of `text` over the default 26-letter alphabet.
    ///
    /// # Panics
    ///
    /// Panics if the text holds a non-letter or a symbol outside the alphabet.
    pub fn new(text: impl IntoText) -> Self {
        Self::from_text(text)
    }
}

impl<const A: usize> Dawg<A> {
    /// Builds the automaton of `text` with the default arena configuration.
    ///
    /// # Panics
    ///
    /// Panics if a symbol of the text is outside the alphabet.
    pub fn from_text(text: impl IntoText) -> Self {
        Self::with_config(text, &Config::default())
    }

    /// Builds the automaton of `text` with arenas sized by `config`.
    ///
    /// # Panics
    ///
    /// Panics if `config` is invalid, if a symbol of the text is outside the
    /// alphabet, or if an arena runs out of chunks.
    pub fn with_config(text: impl IntoText, config: &Config) -> Self {
        let mut builder = Builder::with_config(config);
        builder.extend(text);
        builder.build()
    }

    /// Reads a text file and builds its automaton.
    ///
    /// Trailing whitespace is ignored. Every other byte must be an ASCII letter
    /// of the alphabet; case is ignored.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use blumer_dawg::dawg::{Config, Dawg};
    ///
    /// let dawg = Dawg::<26>::from_file("genome.txt", &Config::default()).unwrap();
    /// println!("{} states", dawg.node_count());
    /// ```
    pub fn from_file(path: impl AsRef<Path>, config: &Config) -> Result<Self, LoadError> {
        config.validate()?;
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let symbols = encode(bytes.trim_ascii_end(), A)?;
        Ok(Self::with_config(symbols, config))
    }

    pub(crate) fn from_parts(
        store: NodeStore<A>,
        source: NodeHandle,
        last: NodeHandle,
        stats: ConstructionStats,
    ) -> Self {
        Dawg {
            store,
            source,
            last,
            stats,
        }
    }

    /// Handle of the start state.
    pub fn source(&self) -> NodeHandle {
        self.source
    }

    /// Handle of the state reached by the whole text.
    pub fn last(&self) -> NodeHandle {
        self.last
    }

    /// The start state.
    pub fn root(&self) -> NodeRef<'_, A> {
        self.node(self.source)
    }

    /// Returns a view of the node behind `handle`.
    pub fn node(&self, handle: NodeHandle) -> NodeRef<'_, A> {
        NodeRef { dawg: self, handle }
    }

    /// Length of the text.
    pub fn len(&self) -> usize {
        self.stats.symbols
    }

    /// True if the text was empty.
    pub fn is_empty(&self) -> bool {
        self.stats.symbols == 0
    }

    /// Number of states, the source included.
    pub fn node_count(&self) -> usize {
        self.store.node_count()
    }

    /// Number of node slots carved, including the reserved slot 0. Handles
    /// `1..node_slots()` name every allocated node.
    pub fn node_slots(&self) -> usize {
        self.store.node_slots()
    }

    /// Iterates over every state in allocation order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeRef<'_, A>> + '_ {
        self.store.handles().map(move |handle| self.node(handle))
    }

    /// Read access to the underlying node store.
    pub fn store(&self) -> &NodeStore<A> {
        &self.store
    }

    /// Arena usage of this automaton.
    pub fn memory(&self) -> MemoryStats {
        self.store.memory()
    }

    /// Counters recorded while the automaton was built.
    pub fn construction_stats(&self) -> ConstructionStats {
        self.stats
    }

    /// Returns the state reached by following `pattern` from the source.
    pub fn walk(&self, pattern: impl IntoText) -> Option<NodeRef<'_, A>> {
        let symbols = collect_pattern(pattern, A)?;
        symbols
            .iter()
            .try_fold(self.root(), |node, &symbol| node.get(symbol))
    }

    /// True if `pattern` occurs in the text. The empty pattern always does.
    pub fn contains(&self, pattern: impl IntoText) -> bool {
        self.walk(pattern).is_some()
    }

    /// True if `pattern` is a suffix of the text.
    pub fn is_suffix(&self, pattern: impl IntoText) -> bool {
        match self.walk(pattern) {
            Some(end) => self.suffix_chain().any(|node| node.handle == end.handle),
            None => false,
        }
    }

    /// The suffix chain of the last state, ending at the source.
    pub fn suffix_chain(&self) -> impl Iterator<Item = NodeRef<'_, A>> + '_ {
        std::iter::successors(Some(self.node(self.last)), |node| node.suffix())
    }

    /// True if `other` has the same structure up to a relabeling of handles:
    /// the same states, the same labeled edges of the same kinds, and the same
    /// suffix links.
    pub fn is_isomorphic(&self, other: &Dawg<A>) -> bool {
        if self.node_count() != other.node_count() || self.len() != other.len() {
            return false;
        }
        let mut pairing = Pairing::default();
        pairing.link(self.source, other.source);
        while let Some((mine, theirs)) = pairing.queue.pop_front() {
            if self.store.degree(mine) != other.store.degree(theirs) {
                return false;
            }
            for edge in self.store.edges(mine) {
                let matched = match other.store.get_edge(theirs, edge.label) {
                    Some(other_edge) => {
                        other_edge.kind == edge.kind && pairing.link(edge.target, other_edge.target)
                    }
                    None => false,
                };
                if !matched {
                    return false;
                }
            }
            let suffixes_match = match (self.store.suffix(mine), other.store.suffix(theirs)) {
                (None, None) => true,
                (Some(a), Some(b)) => pairing.link(a, b),
                _ => false,
            };
            if !suffixes_match {
                return false;
            }
        }
        pairing.forward.len() == self.node_count()
            && pairing.forward.get(&self.last) == Some(&other.last)
    }
}

#[derive(Default)]
struct Pairing {
    forward: HashMap<NodeHandle, NodeHandle>,
    backward: HashMap<NodeHandle, NodeHandle>,
    queue: VecDeque<(NodeHandle, NodeHandle)>,
}

impl Pairing {
    /// Records that `mine` corresponds to `theirs`; false if either side is
    /// already paired with something else.
    fn link(&mut self, mine: NodeHandle, theirs: NodeHandle) -> bool {
        match (self.forward.get(&mine), self.backward.get(&theirs)) {
            (None, None) => {
                self.forward.insert(mine, theirs);
                self.backward.insert(theirs, mine);
                self.queue.push_back((mine, theirs));
                true
            }
            (Some(&a), Some(&b)) => a == theirs && b == mine,
            _ => false,
        }
    }
}

/// A read-only view of one state of a [`Dawg`].
#[derive(Clone, Copy)]
pub struct NodeRef<'d, const A: usize = ALPHABET_SIZE> {
    dawg: &'d Dawg<A>,
    handle: NodeHandle,
}

impl<'d, const A: usize> NodeRef<'d, A> {
    /// The node's handle.
    #[inline]
    pub fn handle(&self) -> NodeHandle {
        self.handle
    }

    /// True for the start state.
    #[inline]
    pub fn is_source(&self) -> bool {
        self.handle == self.dawg.source
    }

    /// Follows the edge labeled `symbol`.
    #[inline]
    pub fn get(&self, symbol: Symbol) -> Option<NodeRef<'d, A>> {
        self.edge(symbol).map(|edge| self.dawg.node(edge.target))
    }

    /// The edge labeled `symbol`, if any.
    #[inline]
    pub fn edge(&self, symbol: Symbol) -> Option<Edge> {
        self.dawg.store.get_edge(self.handle, symbol)
    }

    /// The node's outgoing edges.
    #[inline]
    pub fn edges(&self) -> Edges<'d> {
        self.dawg.store.edges(self.handle)
    }

    /// Out-degree.
    #[inline]
    pub fn degree(&self) -> usize {
        self.dawg.store.degree(self.handle)
    }

    /// The edge representation in use.
    #[inline]
    pub fn representation(&self) -> Representation {
        self.dawg.store.representation(self.handle)
    }

    /// The suffix-link target; `None` only for the source.
    #[inline]
    pub fn suffix(&self) -> Option<NodeRef<'d, A>> {
        self.dawg
            .store
            .suffix(self.handle)
            .map(|handle| self.dawg.node(handle))
    }
}

impl<const A: usize> PartialEq for NodeRef<'_, A> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.dawg, other.dawg) && self.handle == other.handle
    }
}

impl<const A: usize> Eq for NodeRef<'_, A> {}

impl<const A: usize> fmt::Debug for NodeRef<'_, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("handle", &self.handle)
            .field("degree", &self.degree())
            .field("suffix", &self.dawg.store.suffix(self.handle))
            .finish()
    }
}

/// Errors that can occur when building an automaton from a file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read {}", path.display())]
    Io {
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The file contains a byte that is not a symbol of the alphabet.
    #[error(transparent)]
    Symbol(#[from] SymbolError),
    /// The arena configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
