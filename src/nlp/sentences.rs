//! Sentence splitting with pretrained punkt data.

use std::fmt;

use punkt::params::Standard;
use punkt::{SentenceTokenizer, TrainingData};

/// Splits a document into sentences.
///
/// Loading the English training data is comparatively slow, so build one
/// splitter up front and share it by reference.
pub struct SentenceSplitter {
    data: TrainingData,
}

impl SentenceSplitter {
    /// Splitter backed by the bundled English punkt model.
    pub fn english() -> Self {
        Self {
            data: TrainingData::english(),
        }
    }

    /// Sentences of `text`, trimmed, in order. Blank input yields nothing.
    pub fn split<'a>(&'a self, text: &'a str) -> Vec<&'a str> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        SentenceTokenizer::<Standard>::new(text, &self.data)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl Default for SentenceSplitter {
    fn default() -> Self {
        Self::english()
    }
}

impl fmt::Debug for SentenceSplitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SentenceSplitter")
            .field("data", &"punkt:english")
            .finish()
    }
}
