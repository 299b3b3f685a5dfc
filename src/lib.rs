//! # treeflat
//!
//! String-attribute filters for tabular text data.
//!
//! Two filters rewrite the string cells of a [`Dataset`] in place:
//!
//! - [`ChangeCase`] lower- or upper-cases every selected cell.
//! - [`PartOfSpeechTagging`] splits each cell into sentences, tokenizes and
//!   parses every sentence, and replaces the cell with the flattened tree:
//!   `DT:The NN:dog VBZ:runs.`
//!
//! The flattening step is available on its own through [`TreeFlattener`] for
//! trees that come from elsewhere (see [`ParseTree::from_bracketed`]).
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use treeflat::filter::{apply, NoopObserver};
//! use treeflat::{Dataset, PartOfSpeechTagging, SentenceSplitter, TaggingOptions};
//!
//! let splitter = SentenceSplitter::english();
//! let options = TaggingOptions {
//!     model: "models/english.json".into(),
//!     ..TaggingOptions::default()
//! };
//! let mut filter = PartOfSpeechTagging::new(&splitter, options);
//! let (tagged, report) = apply(&mut filter, dataset, &mut NoopObserver)?;
//! ```

pub mod config;
pub mod dataset;
pub mod errors;
pub mod filter;
pub mod nlp;
pub mod parser;
pub mod range;
pub mod tree;

pub use config::{build_filter, FilterKind, FilterSpec, ValidationEngine};
pub use dataset::{Attribute, AttributeKind, Dataset, Row, Value};
pub use errors::{ConfigError, ErrorCode, FilterError, ParseError, Result};
pub use filter::{
    apply, BatchReport, ChangeCase, ChangeCaseOptions, FilterObserver, PartOfSpeechTagging,
    StreamFilter, TaggingOptions,
};
pub use nlp::{SentenceSplitter, Stopwords, Tokenizer};
pub use parser::{LexiconParser, Parser, ParserOptions};
pub use range::AttributeRange;
pub use tree::{flatten, LabelPattern, ParseTree, TreeFlattener};
