/// Chunked arena allocator and the handle types it hands out.
pub mod arena;
/// Online construction: `update` and `split`.
pub mod builder;
/// Adaptive per-node edge storage.
pub mod children;
/// Arena sizing.
pub mod config;
/// Edge value types.
pub mod edge;
/// Node records and the store that owns them.
pub mod node;
/// The finished automaton.
pub mod owned;
/// Symbols and texts.
pub mod symbol;

pub use arena::{ListHandle, MapHandle, NodeHandle};
pub use builder::{Builder, ConstructionStats};
pub use children::{Edges, Representation, PARTIAL_LIST_CAPACITY};
pub use config::{Config, ConfigError};
pub use edge::{Edge, EdgeKind, LabeledEdge};
pub use node::{MemoryStats, NodeStore};
pub use owned::{Dawg, LoadError, NodeRef};
pub use symbol::{IntoText, Symbol, SymbolError, ALPHABET_SIZE};
