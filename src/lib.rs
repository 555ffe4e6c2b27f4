//! # blumer-dawg
//!
//! Online construction of the [DAWG](https://en.wikipedia.org/wiki/Suffix_automaton)
//! (Directed Acyclic Word Graph, also known as the suffix automaton) of a text.
//!
//! The DAWG of a text `w` is the smallest deterministic automaton that accepts
//! every substring of `w`. It has at most `2|w| - 1` states and is built in one
//! left-to-right pass with the algorithm of
//! [Blumer et al. (1985)](https://doi.org/10.1016/0304-3975(85)90157-4): each
//! appended symbol runs `update`, which walks suffix links and calls `split`
//! to clone a state whenever a secondary edge is found.
//!
//! ## Features
//!
//! - **Arena allocated**: nodes and edge collections live in chunked arenas and
//!   are addressed by 32-bit handles
//! - **Adaptive edges**: a node stores its outgoing edges inline, in a short
//!   list, or in a full table indexed by symbol, growing as edges are added
//! - **Small alphabets**: the alphabet size is a const generic, 26 letters by
//!   default and at most 31 symbols
//!
//! ## Quick Start
//!
//! ```
//! use blumer_dawg::Dawg;
//!
//! let dawg = Dawg::new("abcbc");
//! assert_eq!(dawg.node_count(), 8);
//! assert!(dawg.contains("cbc"));
//! assert!(!dawg.contains("cc"));
//! ```
//!
//! For incremental construction, feed symbols to a
//! [`Builder`](dawg::builder::Builder) and finish it when done:
//!
//! ```
//! use blumer_dawg::dawg::builder::Builder;
//! use blumer_dawg::dawg::Symbol;
//!
//! let mut builder = Builder::new();
//! builder.extend("abcb");
//! builder.push(Symbol::from_ascii(b'c').unwrap());
//! let dawg = builder.build();
//! assert!(dawg.is_suffix("bcbc"));
//! assert_eq!(dawg.construction_stats().splits, 2);
//! ```
//!
//! ## Other Alphabets
//!
//! ```
//! use blumer_dawg::dawg::Dawg;
//!
//! let dna = Dawg::<4>::from_text("abdcabdd");
//! assert!(dna.contains("dcab"));
//! assert_eq!(dna.root().degree(), 4);
//! ```

#![warn(missing_docs)]

/// Core DAWG data structure: arenas, edge storage, builder and queries.
pub mod dawg;
/// Out-degree statistics.
pub mod stats;

pub use dawg::Dawg;
