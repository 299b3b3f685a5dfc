//! Filter specification types.
//!
//! A [`FilterSpec`] names the filter to run, its options, and strictness
//! settings. These types are the input to the
//! [`super::validation::ValidationEngine`].
//!
//! # JSON shape
//!
//! ```json
//! {
//!   "v": 1,
//!   "filter": "pos_tagging",
//!   "options": {
//!     "range": "first-last",
//!     "tokenizer": "ptb",
//!     "model": "models/english.json",
//!     "label_pattern": "NN.*|VB.*",
//!     "stopwords": "language en"
//!   },
//!   "strict": false
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, ErrorCode, Result};
use crate::filter::{ChangeCase, ChangeCaseOptions, PartOfSpeechTagging, StreamFilter, TaggingOptions};
use crate::nlp::SentenceSplitter;

/// Spec version understood by this crate.
pub const SPEC_VERSION: u32 = 1;

/// Top-level filter specification (v1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Spec version (currently `1`).
    pub v: u32,

    /// Which filter to run.
    pub filter: FilterKind,

    /// Filter options; their schema depends on `filter`.
    #[serde(default)]
    pub options: serde_json::Map<String, serde_json::Value>,

    /// If `true`, unrecognized fields are errors; if `false`, warnings.
    #[serde(default)]
    pub strict: bool,

    /// Captures any fields not recognized by the schema.
    /// Used by the strict-mode validation rule.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

/// The available filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    /// Lower- or upper-case string attributes.
    ChangeCase,
    /// Replace string attributes with flattened parse trees.
    PosTagging,
}

impl FilterKind {
    /// Returns the user-facing name used in JSON and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChangeCase => "change_case",
            Self::PosTagging => "pos_tagging",
        }
    }
}

/// Typed options of one filter.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOptions {
    ChangeCase(ChangeCaseOptions),
    PosTagging(TaggingOptions),
}

impl FilterOptions {
    /// Fields of the options object that no filter option consumed.
    pub fn unknown_fields(&self) -> &HashMap<String, serde_json::Value> {
        match self {
            Self::ChangeCase(o) => &o.unknown_fields,
            Self::PosTagging(o) => &o.unknown_fields,
        }
    }

    /// Build the filter these options describe.
    pub fn into_filter<'s>(self, splitter: &'s SentenceSplitter) -> Box<dyn StreamFilter + 's> {
        match self {
            Self::ChangeCase(o) => Box::new(ChangeCase::new(o)),
            Self::PosTagging(o) => Box::new(PartOfSpeechTagging::new(splitter, o)),
        }
    }
}

impl FilterSpec {
    pub fn new(filter: FilterKind) -> Self {
        Self {
            v: SPEC_VERSION,
            filter,
            options: serde_json::Map::new(),
            strict: false,
            unknown_fields: HashMap::new(),
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Decode the options object for the selected filter.
    pub fn filter_options(&self) -> Result<FilterOptions, ConfigError> {
        let value = serde_json::Value::Object(self.options.clone());
        let decoded = match self.filter {
            FilterKind::ChangeCase => serde_json::from_value(value).map(FilterOptions::ChangeCase),
            FilterKind::PosTagging => serde_json::from_value(value).map(FilterOptions::PosTagging),
        };
        decoded.map_err(|e| {
            ConfigError::new(
                ErrorCode::InvalidOptions,
                "/options",
                format!("invalid {} options: {e}", self.filter.as_str()),
            )
        })
    }
}
