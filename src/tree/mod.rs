//! Parse trees
//!
//! This module provides the owned tree representation, bracketed-notation
//! reading and writing, and the tree-to-text flattener.

pub mod arena;
pub mod bracketed;
pub mod flatten;

pub use arena::{NodeId, ParseTree, TaggedLeaf, TreeBuilder};
pub use flatten::{flatten, LabelPattern, TreeFlattener, SENTENCE_TERMINATOR};
