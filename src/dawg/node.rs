use smallvec::SmallVec;
use tracing::trace;

use super::arena::{Arena, ArenaHandle, ListHandle, MapHandle, NodeHandle};
use super::children::{
    EdgeStorage, Edges, FullEdgeMap, PartialEdgeList, Representation, PARTIAL_LIST_CAPACITY,
};
use super::config::Config;
use super::edge::{Edge, EdgeKind, LabeledEdge};
use super::symbol::{Symbol, MAX_ALPHABET_SIZE};

/// A state of the automaton.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Node {
    suffix: Option<NodeHandle>,
    edges: EdgeStorage,
}

impl Node {
    /// The node's suffix link; `None` only for the source.
    #[inline]
    pub fn suffix(&self) -> Option<NodeHandle> {
        self.suffix
    }

    /// The node's edge storage.
    #[inline]
    pub fn storage(&self) -> EdgeStorage {
        self.edges
    }
}

/// Storage for every node of one automaton and the edge records they own.
///
/// Edge operations are dispatched on the node's [`EdgeStorage`]; adding an
/// edge promotes the storage to the next representation when the current one
/// is full, freeing the superseded record.
#[derive(Debug)]
pub struct NodeStore<const A: usize> {
    nodes: Arena<Node, NodeHandle>,
    lists: Arena<PartialEdgeList, ListHandle>,
    maps: Arena<FullEdgeMap<A>, MapHandle>,
}

impl<const A: usize> NodeStore<A> {
    const ALPHABET_FITS: () = assert!(
        A >= 1 && A <= MAX_ALPHABET_SIZE,
        "alphabet size must be between 1 and 31"
    );

    /// Creates an empty store whose arenas are sized by `config`.
    pub fn new(config: &Config) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::ALPHABET_FITS;
        NodeStore {
            nodes: Arena::new(config),
            lists: Arena::new(config),
            maps: Arena::new(config),
        }
    }

    /// Allocates a node with no edges and no suffix link.
    #[inline]
    pub fn create_node(&mut self) -> NodeHandle {
        self.nodes.allocate()
    }

    /// Returns the node record.
    #[inline]
    pub fn node(&self, node: NodeHandle) -> &Node {
        self.nodes.get(node)
    }

    /// The node's suffix link.
    #[inline]
    pub fn suffix(&self, node: NodeHandle) -> Option<NodeHandle> {
        self.nodes.get(node).suffix
    }

    /// Points the node's suffix link at `suffix`.
    #[inline]
    pub fn set_suffix(&mut self, node: NodeHandle, suffix: NodeHandle) {
        debug_assert!(self.nodes.is_valid(suffix));
        self.nodes.get_mut(node).suffix = Some(suffix);
    }

    /// Adds an edge labeled `label` from `node` to `target`.
    ///
    /// # Panics
    ///
    /// Panics if `node` already has an edge for `label`, or if `label` is
    /// outside the alphabet.
    pub fn add_edge(&mut self, node: NodeHandle, label: Symbol, target: NodeHandle, kind: EdgeKind) {
        assert!(
            label.is_in_alphabet(A),
            "symbol {label} outside an alphabet of {A} symbols"
        );
        debug_assert!(self.nodes.is_valid(target));
        let edge = Edge::new(target, kind).labeled(label);
        let promoted = match self.nodes.get(node).edges {
            EdgeStorage::Empty => EdgeStorage::Single(edge),
            EdgeStorage::Single(existing) => {
                assert!(
                    existing.label != label,
                    "{node:?} already has an edge labeled {label}"
                );
                let handle = self.lists.allocate();
                let list = self.lists.get_mut(handle);
                list.push(existing);
                list.push(edge);
                trace!(node = node.get(), "edges.promote.list");
                EdgeStorage::PartialList(handle)
            }
            EdgeStorage::PartialList(handle) => {
                if !self.lists.get(handle).is_full() {
                    self.lists.get_mut(handle).push(edge);
                    return;
                }
                let map_handle = self.maps.allocate();
                let map = self.maps.get_mut(map_handle);
                for existing in self.lists.get(handle).iter() {
                    assert!(
                        existing.label != label,
                        "{node:?} already has an edge labeled {label}"
                    );
                    map.insert(existing.label, existing.edge());
                }
                map.insert(label, edge.edge());
                self.lists.free(handle);
                trace!(node = node.get(), "edges.promote.map");
                EdgeStorage::FullMap(map_handle)
            }
            EdgeStorage::FullMap(handle) => {
                self.maps.get_mut(handle).insert(label, edge.edge());
                return;
            }
        };
        self.nodes.get_mut(node).edges = promoted;
    }

    /// Returns the edge labeled `label` leaving `node`, if any.
    #[inline]
    pub fn get_edge(&self, node: NodeHandle, label: Symbol) -> Option<Edge> {
        match self.nodes.get(node).edges {
            EdgeStorage::Empty => None,
            EdgeStorage::Single(edge) => (edge.label == label).then(|| edge.edge()),
            EdgeStorage::PartialList(handle) => self.lists.get(handle).get(label),
            EdgeStorage::FullMap(handle) => self.maps.get(handle).get(label),
        }
    }

    /// Rewrites the target and kind of the existing edge labeled `label`.
    ///
    /// Never changes the node's degree or representation.
    ///
    /// # Panics
    ///
    /// Panics if `node` has no edge for `label`.
    pub fn set_edge_props(
        &mut self,
        node: NodeHandle,
        label: Symbol,
        target: NodeHandle,
        kind: EdgeKind,
    ) {
        let edge = Edge::new(target, kind);
        let found = match &mut self.nodes.get_mut(node).edges {
            EdgeStorage::Empty => false,
            EdgeStorage::Single(existing) => {
                let found = existing.label == label;
                if found {
                    *existing = edge.labeled(label);
                }
                found
            }
            EdgeStorage::PartialList(handle) => self.lists.get_mut(*handle).set(label, edge),
            EdgeStorage::FullMap(handle) => self.maps.get_mut(*handle).set(label, edge),
        };
        assert!(found, "{node:?} has no edge labeled {label}");
    }

    /// Iterates over the edges leaving `node`.
    #[inline]
    pub fn edges(&self, node: NodeHandle) -> Edges<'_> {
        match self.nodes.get(node).edges {
            EdgeStorage::Empty => Edges::none(),
            EdgeStorage::Single(edge) => Edges::from_single(edge),
            EdgeStorage::PartialList(handle) => Edges::from_list(self.lists.get(handle)),
            EdgeStorage::FullMap(handle) => Edges::from_map(self.maps.get(handle)),
        }
    }

    /// Out-degree of `node`.
    #[inline]
    pub fn degree(&self, node: NodeHandle) -> usize {
        match self.nodes.get(node).edges {
            EdgeStorage::Empty => 0,
            EdgeStorage::Single(_) => 1,
            EdgeStorage::PartialList(handle) => self.lists.get(handle).len(),
            EdgeStorage::FullMap(handle) => self.maps.get(handle).len(),
        }
    }

    /// The edge representation `node` currently uses.
    #[inline]
    pub fn representation(&self, node: NodeHandle) -> Representation {
        self.nodes.get(node).edges.representation()
    }

    /// Adds a secondary copy of every edge of `from` to `to`. `from` keeps its edges.
    pub fn copy_edges_as_secondary(&mut self, from: NodeHandle, to: NodeHandle) {
        let edges: SmallVec<[LabeledEdge; PARTIAL_LIST_CAPACITY + 1]> = self.edges(from).collect();
        for edge in edges {
            self.add_edge(to, edge.label, edge.target, EdgeKind::Secondary);
        }
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of node slots carved, including the reserved slot 0.
    ///
    /// Every allocated node has a handle in `1..node_slots()`.
    pub fn node_slots(&self) -> usize {
        self.nodes.slot_count()
    }

    /// Iterates over the handles of all live nodes in allocation order.
    pub fn handles(&self) -> impl Iterator<Item = NodeHandle> + '_ {
        self.nodes.iter().map(|(handle, _)| handle)
    }

    /// Slot usage of the three arenas.
    pub fn memory(&self) -> MemoryStats {
        MemoryStats {
            nodes: ArenaUsage::of(&self.nodes),
            lists: ArenaUsage::of(&self.lists),
            maps: ArenaUsage::of(&self.maps),
        }
    }
}

/// Slot usage of a single arena.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ArenaUsage {
    /// Records currently live.
    pub live: usize,
    /// Records ever carved, excluding the reserved slot.
    pub carved: usize,
    /// Chunks allocated.
    pub chunks: usize,
}

impl ArenaUsage {
    fn of<T, H: ArenaHandle>(arena: &Arena<T, H>) -> Self {
        ArenaUsage {
            live: arena.len(),
            carved: arena.slot_count().saturating_sub(1),
            chunks: arena.chunk_count(),
        }
    }
}

/// Slot usage of the arenas behind an automaton.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryStats {
    /// Node arena.
    pub nodes: ArenaUsage,
    /// Partial edge list arena.
    pub lists: ArenaUsage,
    /// Full edge map arena.
    pub maps: ArenaUsage,
}

impl MemoryStats {
    /// Edge collection records ever carved, lists and maps together.
    pub fn edge_records(&self) -> usize {
        self.lists.carved + self.maps.carved
    }
}
