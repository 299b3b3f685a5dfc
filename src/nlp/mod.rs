//! Natural Language Processing components
//!
//! This module provides sentence splitting, tokenization, stopword
//! filtering, and the option-string registries that select them.

pub mod options;
pub mod sentences;
pub mod stopwords;
pub mod tokenizer;

pub use sentences::SentenceSplitter;
pub use stopwords::{stopwords_from_spec, NullStopwords, StopwordFilter, Stopwords};
pub use tokenizer::{tokenizer_from_spec, Tokenizer, Tokens};
