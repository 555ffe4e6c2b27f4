use super::arena::NodeHandle;
use super::symbol::Symbol;

/// How an edge came into existence during construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// A genuine extension of a word, added to the active node by `update`.
    Primary,
    /// Added while propagating along suffix links; a later split may redirect it.
    Secondary,
}

/// An outgoing transition of a node.
///
/// An absent transition is `None` wherever an `Option<Edge>` is returned;
/// handle 0 is never a valid target, so the two cannot be confused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Node the transition leads to.
    pub target: NodeHandle,
    /// Primary or secondary.
    pub kind: EdgeKind,
}

impl Edge {
    /// Creates an edge.
    #[inline]
    pub fn new(target: NodeHandle, kind: EdgeKind) -> Self {
        Edge { target, kind }
    }

    /// True for primary edges.
    #[inline]
    pub fn is_primary(&self) -> bool {
        self.kind == EdgeKind::Primary
    }

    /// Attaches a label.
    #[inline]
    pub fn labeled(self, label: Symbol) -> LabeledEdge {
        LabeledEdge {
            label,
            target: self.target,
            kind: self.kind,
        }
    }
}

/// An edge together with the symbol that triggers it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LabeledEdge {
    /// Symbol of the transition.
    pub label: Symbol,
    /// Node the transition leads to.
    pub target: NodeHandle,
    /// Primary or secondary.
    pub kind: EdgeKind,
}

impl LabeledEdge {
    /// Drops the label.
    #[inline]
    pub fn edge(&self) -> Edge {
        Edge::new(self.target, self.kind)
    }
}
