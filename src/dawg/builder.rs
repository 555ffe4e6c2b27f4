use tracing::{debug, trace};

use super::arena::NodeHandle;
use super::config::Config;
use super::edge::EdgeKind;
use super::node::NodeStore;
use super::owned::Dawg;
use super::symbol::{IntoText, Symbol, ALPHABET_SIZE};

/// Counters describing the work done while building an automaton.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConstructionStats {
    /// Symbols consumed.
    pub symbols: usize,
    /// Nodes cloned by `split`.
    pub splits: usize,
    /// Secondary edges added while walking suffix links.
    pub secondary_edges: usize,
    /// Secondary edges redirected to a clone by `split`.
    pub redirected_edges: usize,
}

/// Builds the DAWG of a text one symbol at a time.
///
/// The builder owns every node created so far. After each [`push`](Builder::push)
/// the automaton recognizes exactly the substrings of the text consumed, and
/// [`active`](Builder::active) is the state reached by the whole text.
///
/// # Examples
///
/// ```
/// use blumer_dawg::dawg::builder::Builder;
///
/// let mut builder = Builder::new();
/// builder.extend("abc");
/// builder.extend("bc");
/// let dawg = builder.build();
/// assert!(dawg.contains("cbc"));
/// assert!(!dawg.contains("cc"));
/// ```
pub struct Builder<const A: usize = ALPHABET_SIZE> {
    store: NodeStore<A>,
    source: NodeHandle,
    active: NodeHandle,
    stats: ConstructionStats,
}

impl Builder {
    /// Creates a builder for the default alphabet with the default arena configuration.
    pub fn new() -> Self {
        Builder::with_config(&Config::default())
    }
}

impl<const A: usize> Default for Builder<A> {
    fn default() -> Self {
        Builder::with_config(&Config::default())
    }
}

impl<const A: usize> Builder<A> {
    /// Creates a builder whose arenas are sized by `config`.
    ///
    /// # Panics
    ///
    /// Panics if `config` is invalid; see [`Config::validate`].
    pub fn with_config(config: &Config) -> Self {
        let mut store = NodeStore::new(config);
        let source = store.create_node();
        Builder {
            store,
            source,
            active: source,
            stats: ConstructionStats::default(),
        }
    }

    /// Consumes one symbol of the text.
    ///
    /// # Panics
    ///
    /// Panics if `symbol` is outside the alphabet.
    pub fn push(&mut self, symbol: Symbol) {
        assert!(
            symbol.is_in_alphabet(A),
            "symbol {symbol} outside an alphabet of {A} symbols"
        );
        self.active = self.update(self.active, symbol);
        self.stats.symbols += 1;
    }

    /// Consumes every symbol of `text`.
    ///
    /// # Panics
    ///
    /// Panics if the text holds a byte that is not an ASCII letter, or a
    /// symbol outside the alphabet.
    pub fn extend(&mut self, text: impl IntoText) {
        for code in text.into_codes() {
            let offset = self.stats.symbols;
            match Symbol::new(code) {
                Some(symbol) if symbol.is_in_alphabet(A) => self.push(symbol),
                Some(symbol) => panic!(
                    "symbol {symbol} at offset {offset} is not a symbol of an alphabet of {A} symbols"
                ),
                None => panic!("byte at offset {offset} is not a letter"),
            }
        }
    }

    /// The start state.
    pub fn source(&self) -> NodeHandle {
        self.source
    }

    /// The state reached by the text consumed so far.
    pub fn active(&self) -> NodeHandle {
        self.active
    }

    /// Read access to the nodes built so far.
    pub fn store(&self) -> &NodeStore<A> {
        &self.store
    }

    /// Counters for the work done so far.
    pub fn stats(&self) -> ConstructionStats {
        self.stats
    }

    /// Finishes construction.
    pub fn build(self) -> Dawg<A> {
        let memory = self.store.memory();
        debug!(
            symbols = self.stats.symbols,
            nodes = memory.nodes.live,
            splits = self.stats.splits,
            secondary_edges = self.stats.secondary_edges,
            redirected_edges = self.stats.redirected_edges,
            edge_records = memory.edge_records(),
            "dawg.build.done"
        );
        Dawg::from_parts(self.store, self.source, self.active, self.stats)
    }

    fn update(&mut self, active: NodeHandle, symbol: Symbol) -> NodeHandle {
        let new_active = self.store.create_node();
        self.store
            .add_edge(active, symbol, new_active, EdgeKind::Primary);

        let mut current = active;
        let mut suffix = None;
        while current != self.source && suffix.is_none() {
            current = self.suffix_of(current);
            match self.store.get_edge(current, symbol) {
                None => {
                    self.store
                        .add_edge(current, symbol, new_active, EdgeKind::Secondary);
                    self.stats.secondary_edges += 1;
                }
                Some(edge) if edge.is_primary() => suffix = Some(edge.target),
                Some(_) => suffix = Some(self.split(current, symbol)),
            }
        }
        self.store
            .set_suffix(new_active, suffix.unwrap_or(self.source));
        new_active
    }

    fn split(&mut self, parent: NodeHandle, symbol: Symbol) -> NodeHandle {
        let edge = match self.store.get_edge(parent, symbol) {
            Some(edge) => edge,
            None => panic!("split: {parent:?} has no edge labeled {symbol}"),
        };
        assert_eq!(
            edge.kind,
            EdgeKind::Secondary,
            "split: edge {symbol} of {parent:?} must be secondary"
        );
        let child = edge.target;
        let new_child = self.store.create_node();
        trace!(
            parent = parent.get(),
            child = child.get(),
            clone = new_child.get(),
            "dawg.split"
        );

        self.store
            .set_edge_props(parent, symbol, new_child, EdgeKind::Primary);
        self.store.copy_edges_as_secondary(child, new_child);
        let child_suffix = self.suffix_of(child);
        self.store.set_suffix(new_child, child_suffix);
        self.store.set_suffix(child, new_child);

        let mut current = parent;
        while current != self.source {
            current = self.suffix_of(current);
            match self.store.get_edge(current, symbol) {
                Some(edge) if edge.target == child => {
                    assert_eq!(
                        edge.kind,
                        EdgeKind::Secondary,
                        "split: redirected edge {symbol} of {current:?} must be secondary"
                    );
                    self.store
                        .set_edge_props(current, symbol, new_child, EdgeKind::Secondary);
                    self.stats.redirected_edges += 1;
                    trace!(node = current.get(), "dawg.split.redirect");
                }
                _ => break,
            }
        }
        self.stats.splits += 1;
        new_child
    }

    fn suffix_of(&self, node: NodeHandle) -> NodeHandle {
        match self.store.suffix(node) {
            Some(suffix) => suffix,
            None => panic!("{node:?} has no suffix link"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dawg::children::Representation;
    use crate::dawg::edge::Edge;

    fn sym(ch: u8) -> Symbol {
        Symbol::from_ascii(ch).unwrap()
    }

    fn built(text: &str) -> Builder {
        let mut builder = Builder::new();
        builder.extend(text);
        builder
    }

    #[test]
    fn empty_text_is_just_the_source() {
        let builder = built("");
        let store = builder.store();
        assert_eq!(store.node_count(), 1);
        assert_eq!(builder.active(), builder.source());
        assert_eq!(store.degree(builder.source()), 0);
        assert_eq!(store.suffix(builder.source()), None);
    }

    #[test]
    fn single_symbol() {
        let builder = built("a");
        let store = builder.store();
        let source = builder.source();
        assert_eq!(store.node_count(), 2);
        assert_eq!(store.degree(source), 1);
        assert_eq!(
            store.get_edge(source, sym(b'a')),
            Some(Edge::new(builder.active(), EdgeKind::Primary))
        );
        assert_eq!(store.suffix(builder.active()), Some(source));
    }

    #[test]
    fn repeated_symbol_links_to_first_node() {
        let builder = built("aa");
        let store = builder.store();
        let source = builder.source();
        let first = store.get_edge(source, sym(b'a')).unwrap();
        assert!(first.is_primary());
        assert_eq!(store.degree(source), 1, "no secondary edge on the source");
        assert_eq!(store.suffix(builder.active()), Some(first.target));
        assert_eq!(
            store.get_edge(first.target, sym(b'a')),
            Some(Edge::new(builder.active(), EdgeKind::Primary))
        );
        assert_eq!(builder.stats().splits, 0);
    }

    #[test]
    fn abab_resolves_through_primary_edges() {
        let mut builder = built("aba");
        let source = builder.source();
        let b = builder.store().get_edge(source, sym(b'b')).unwrap();
        assert_eq!(b.kind, EdgeKind::Secondary);

        builder.push(sym(b'b'));
        assert_eq!(builder.stats().splits, 0);
        assert_eq!(builder.store().get_edge(source, sym(b'b')), Some(b));
        assert_eq!(builder.store().node_count(), 5);
    }

    #[test]
    fn repeated_tail_splits_secondary_edge() {
        let mut builder = built("ab");
        let source = builder.source();
        let before = builder.store().get_edge(source, sym(b'b')).unwrap();
        assert_eq!(before.kind, EdgeKind::Secondary);

        builder.push(sym(b'b'));
        let store = builder.store();
        let after = store.get_edge(source, sym(b'b')).unwrap();
        assert_eq!(builder.stats().splits, 1);
        assert_eq!(after.kind, EdgeKind::Primary);
        assert_ne!(after.target, before.target);
        // the clone sits between the original and the source on the suffix chain
        assert_eq!(store.suffix(before.target), Some(after.target));
        assert_eq!(store.suffix(after.target), Some(source));
        assert_eq!(store.suffix(builder.active()), Some(after.target));
        // the clone carries the original's edges as secondary copies
        let clone_edge = store.get_edge(after.target, sym(b'b')).unwrap();
        assert_eq!(clone_edge, Edge::new(builder.active(), EdgeKind::Secondary));
        assert_eq!(
            store.get_edge(before.target, sym(b'b')),
            Some(Edge::new(builder.active(), EdgeKind::Primary))
        );
    }

    #[test]
    fn split_redirects_suffix_chain() {
        let mut builder = built("abcb");
        let source = builder.source();
        let c_before = builder.store().get_edge(source, sym(b'c')).unwrap();
        assert_eq!(c_before.kind, EdgeKind::Secondary);

        builder.push(sym(b'c'));
        let stats = builder.stats();
        assert_eq!(stats.splits, 2);
        assert_eq!(stats.redirected_edges, 1);

        let store = builder.store();
        let c_after = store.get_edge(source, sym(b'c')).unwrap();
        assert_eq!(c_after.kind, EdgeKind::Secondary, "redirected edges stay secondary");
        assert_ne!(c_after.target, c_before.target);
        assert_eq!(store.suffix(builder.active()), Some(c_after.target));
        assert_eq!(store.suffix(c_before.target), Some(c_after.target));
    }

    #[test]
    fn representation_never_decreases() {
        let mut builder = Builder::new();
        let mut levels: Vec<Representation> = Vec::new();
        for &ch in b"abracadabraxyzzyabcdefabcdefmississippi" {
            builder.push(sym(ch));
            let store = builder.store();
            for (i, handle) in store.handles().enumerate() {
                let level = store.representation(handle);
                if let Some(previous) = levels.get(i) {
                    assert!(level >= *previous, "{handle:?} went from {previous:?} to {level:?}");
                    levels[i] = level;
                } else {
                    levels.push(level);
                }
            }
        }
        assert!(levels.contains(&Representation::FullMap));
    }

    #[test]
    fn full_alphabet_promotes_source() {
        let builder = built("abcdefghijklmnopqrstuvwxyz");
        let store = builder.store();
        let source = builder.source();
        assert_eq!(store.degree(source), 26);
        assert_eq!(store.representation(source), Representation::FullMap);
        for ch in b'a'..=b'z' {
            assert!(store.get_edge(source, sym(ch)).is_some());
        }
        assert_eq!(store.memory().lists.live, 0);
    }

    #[test]
    fn small_alphabet() {
        let mut builder = Builder::<2>::default();
        builder.extend("abbaab");
        assert_eq!(builder.stats().symbols, 6);
        let dawg = builder.build();
        assert!(dawg.contains("baa"));
        assert!(!dawg.contains("bbb"));
    }

    #[test]
    #[should_panic(expected = "not a symbol")]
    fn symbol_outside_alphabet_is_fatal() {
        let mut builder = Builder::<2>::default();
        builder.extend("abc");
    }

    #[test]
    #[should_panic(expected = "byte at offset 2 is not a letter")]
    fn spaces_are_fatal() {
        built("ab ab");
    }

    #[test]
    #[should_panic(expected = "byte at offset 2 is not a letter")]
    fn digits_are_fatal() {
        built("ab1");
    }

    #[test]
    #[should_panic(expected = "byte at offset 3 is not a letter")]
    fn non_ascii_is_fatal() {
        built("caf\u{e9}");
    }
}
