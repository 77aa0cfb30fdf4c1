//! Term dictionaries, component orders and the trie indexes built on them

pub mod cardinality;
pub mod dictionary;
pub mod order;
pub mod quoted;
pub mod trie;

pub use cardinality::{CardinalitySet, TermsCardinalitySet};
pub use dictionary::{TermDictionary, TermTable};
pub use order::{ComponentOrder, QuadPattern};
pub use quoted::QuotedTermDictionary;
pub use trie::{QuadIndex, TrieIndex};
