//! # RDF Stores
//!
//! An in-memory store for RDF quads, queryable by partially bound patterns,
//! with native support for RDF-star quoted triples.
//!
//! Terms are interned by a term dictionary into integer codes. Quoted triples
//! get their own tagged code range and are encoded recursively, so a triple
//! embedded in another statement is stored as a single code. Encoded quads are
//! kept in one four-level trie per configured component order, and each query
//! goes to the index whose order best fits the bound positions of its pattern.
//!
//! ## Features
//!
//! - Exact-match and prefix pattern queries, with exact counts
//! - Quoted triple patterns with unbound inner terms
//! - Configurable index orders and optional distinct-term tracking per position
//! - Bulk import and removal from iterators or streams
//!
//! ## Example
//!
//! ```rust
//! use rdf_stores::{Quad, RdfStore, Result, Term};
//!
//! fn example() -> Result<()> {
//!     let mut store = RdfStore::create_default();
//!     let alice = Term::named_node("http://example.org/alice");
//!     let knows = Term::named_node("http://example.org/knows");
//!     let bob = Term::named_node("http://example.org/bob");
//!
//!     store.add_quad(&Quad::triple(alice.clone(), knows.clone(), bob))?;
//!     assert_eq!(store.count_quads(Some(&alice), None, None, None), 1);
//!
//!     for quad in store.read_quads(None, Some(&knows), None, None) {
//!         println!("{}", quad?);
//!     }
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::unused_self)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::unnecessary_map_or)]
#![allow(clippy::new_without_default)]

/// Core data structures and types
pub mod core;

pub mod error;

/// Term dictionaries, component orders and trie indexes
pub mod indexing;

/// The store orchestrator and its configuration
pub mod storage;

// Re-export commonly used types
pub use crate::core::{Code, Literal, Quad, QuadPosition, Term};
pub use error::{Result, StoreError};
pub use indexing::{
    CardinalitySet, ComponentOrder, QuadIndex, QuotedTermDictionary, TermDictionary,
    TermsCardinalitySet, TermTable, TrieIndex,
};
pub use storage::{RdfStore, StoreConfig};
