use super::arena::{ListHandle, MapHandle};
use super::edge::{Edge, LabeledEdge};
use super::symbol::Symbol;

/// Maximum out-degree stored in a [`PartialEdgeList`] before a node is
/// promoted to a [`FullEdgeMap`].
pub const PARTIAL_LIST_CAPACITY: usize = 3;

/// The outgoing edges of a node, in one of four representations chosen by
/// out-degree. A node only ever moves to a later variant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EdgeStorage {
    /// No edges.
    #[default]
    Empty,
    /// Exactly one edge, stored inline in the node.
    Single(LabeledEdge),
    /// Two to [`PARTIAL_LIST_CAPACITY`] edges in a separately allocated list.
    PartialList(ListHandle),
    /// More edges, in a separately allocated array indexed by symbol.
    FullMap(MapHandle),
}

impl EdgeStorage {
    /// The representation currently in use.
    #[inline]
    pub fn representation(&self) -> Representation {
        match self {
            EdgeStorage::Empty => Representation::Empty,
            EdgeStorage::Single(_) => Representation::Single,
            EdgeStorage::PartialList(_) => Representation::PartialList,
            EdgeStorage::FullMap(_) => Representation::FullMap,
        }
    }
}

/// Representation levels of [`EdgeStorage`], ordered by promotion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Representation {
    /// Out-degree 0.
    Empty,
    /// Out-degree 1.
    Single,
    /// Out-degree 2 to [`PARTIAL_LIST_CAPACITY`].
    PartialList,
    /// Out-degree above [`PARTIAL_LIST_CAPACITY`].
    FullMap,
}

/// A short list of labeled edges kept in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PartialEdgeList {
    entries: [Option<LabeledEdge>; PARTIAL_LIST_CAPACITY],
    len: u8,
}

impl PartialEdgeList {
    /// Number of edges.
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// True if the list holds no edges.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True if another edge would require promotion.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == PARTIAL_LIST_CAPACITY
    }

    /// Returns the edge labeled `label`.
    #[inline]
    pub fn get(&self, label: Symbol) -> Option<Edge> {
        self.position(label)
            .and_then(|i| self.entries[i])
            .map(|e| e.edge())
    }

    /// Appends an edge.
    ///
    /// Panics if the list is full or already has an edge for the label.
    pub fn push(&mut self, edge: LabeledEdge) {
        assert!(!self.is_full(), "push on a full edge list");
        assert!(
            self.position(edge.label).is_none(),
            "edge list already has an edge labeled {}",
            edge.label
        );
        self.entries[self.len()] = Some(edge);
        self.len += 1;
    }

    /// Replaces the target and kind of the edge labeled `label`.
    ///
    /// Returns false if there is no such edge.
    pub fn set(&mut self, label: Symbol, edge: Edge) -> bool {
        match self.position(label) {
            Some(i) => {
                self.entries[i] = Some(edge.labeled(label));
                true
            }
            None => false,
        }
    }

    /// The edges in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = LabeledEdge> + '_ {
        self.entries[..self.len()].iter().flatten().copied()
    }

    fn position(&self, label: Symbol) -> Option<usize> {
        self.entries[..self.len()]
            .iter()
            .position(|e| e.is_some_and(|e| e.label == label))
    }
}

/// A dense array of edges indexed by symbol, for an alphabet of `A` symbols.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FullEdgeMap<const A: usize> {
    edges: [Option<Edge>; A],
    len: u8,
}

impl<const A: usize> Default for FullEdgeMap<A> {
    fn default() -> Self {
        FullEdgeMap {
            edges: [None; A],
            len: 0,
        }
    }
}

impl<const A: usize> FullEdgeMap<A> {
    /// Number of edges.
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// True if the map holds no edges.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the edge labeled `label`. Labels outside the alphabet have none.
    #[inline]
    pub fn get(&self, label: Symbol) -> Option<Edge> {
        self.edges.get(label.index()).copied().flatten()
    }

    /// Adds an edge.
    ///
    /// Panics if the label is outside the alphabet or already has an edge.
    pub fn insert(&mut self, label: Symbol, edge: Edge) {
        assert!(
            label.is_in_alphabet(A),
            "symbol {label} outside an alphabet of {A} symbols"
        );
        let slot = &mut self.edges[label.index()];
        assert!(slot.is_none(), "edge map already has an edge labeled {label}");
        *slot = Some(edge);
        self.len += 1;
    }

    /// Replaces the target and kind of the edge labeled `label`.
    ///
    /// Returns false if there is no such edge.
    pub fn set(&mut self, label: Symbol, edge: Edge) -> bool {
        match self.edges.get_mut(label.index()) {
            Some(slot) if slot.is_some() => {
                *slot = Some(edge);
                true
            }
            _ => false,
        }
    }
}

/// An iterator over the outgoing edges of a node.
///
/// Yields edges in insertion order for the inline and list representations and
/// in ascending label order for the full map. A clone continues from the same
/// position independently of the original.
#[derive(Clone, Debug)]
pub struct Edges<'g> {
    inner: EdgesInner<'g>,
    remaining: usize,
}

#[derive(Clone, Debug)]
enum EdgesInner<'g> {
    Single(Option<LabeledEdge>),
    List(std::slice::Iter<'g, Option<LabeledEdge>>),
    Map(std::iter::Enumerate<std::slice::Iter<'g, Option<Edge>>>),
}

impl<'g> Edges<'g> {
    pub(crate) fn none() -> Self {
        Edges {
            inner: EdgesInner::Single(None),
            remaining: 0,
        }
    }

    pub(crate) fn from_single(edge: LabeledEdge) -> Self {
        Edges {
            inner: EdgesInner::Single(Some(edge)),
            remaining: 1,
        }
    }

    pub(crate) fn from_list(list: &'g PartialEdgeList) -> Self {
        Edges {
            inner: EdgesInner::List(list.entries[..list.len()].iter()),
            remaining: list.len(),
        }
    }

    pub(crate) fn from_map<const A: usize>(map: &'g FullEdgeMap<A>) -> Self {
        Edges {
            inner: EdgesInner::Map(map.edges.iter().enumerate()),
            remaining: map.len(),
        }
    }
}

impl Iterator for Edges<'_> {
    type Item = LabeledEdge;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let next = match &mut self.inner {
            EdgesInner::Single(edge) => edge.take(),
            EdgesInner::List(entries) => entries.find_map(|e| *e),
            EdgesInner::Map(edges) => edges.find_map(|(i, e)| {
                let label = Symbol::new(i as u8 + 1)?;
                e.map(|e| e.labeled(label))
            }),
        };
        if next.is_some() {
            self.remaining -= 1;
        }
        next
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Edges<'_> {}

impl std::iter::FusedIterator for Edges<'_> {}
