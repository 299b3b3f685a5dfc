//! Lexicon parser model files.
//!
//! # JSON shape
//!
//! ```json
//! {
//!   "root_label": "ROOT",
//!   "clause_label": "S",
//!   "default_tag": "NN",
//!   "proper_noun_tag": "NNP",
//!   "lexicon": { "the": "DT", "dog": "NN", "runs": "VBZ" },
//!   "suffix_rules": [ { "suffix": "ing", "tag": "VBG" } ],
//!   "phrases": [
//!     { "label": "NP", "tags": ["DT", "JJ", "NN", "NNS"] },
//!     { "label": "VP", "tags": ["VBZ", "VBD"] }
//!   ],
//!   "chunking": { "min_length": 1, "max_length": 8 }
//! }
//! ```

use std::path::Path;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, ErrorCode};

/// Path reported for model problems.
pub const MODEL_PATH: &str = "/options/model";

fn default_root_label() -> String {
    "ROOT".to_string()
}

fn default_clause_label() -> String {
    "S".to_string()
}

fn default_tag() -> String {
    "NN".to_string()
}

/// A tagging lexicon plus the phrase rules used to build trees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconModel {
    /// Label of the tree root.
    #[serde(default = "default_root_label")]
    pub root_label: String,

    /// Label of the single clause node under the root.
    #[serde(default = "default_clause_label")]
    pub clause_label: String,

    /// Tag for words nothing else recognizes.
    #[serde(default = "default_tag")]
    pub default_tag: String,

    /// Tag for unknown capitalized words that do not start the sentence.
    #[serde(default)]
    pub proper_noun_tag: Option<String>,

    /// Known words and their tags.
    #[serde(default)]
    pub lexicon: FxHashMap<String, String>,

    /// Tried in order on unknown words.
    #[serde(default)]
    pub suffix_rules: Vec<SuffixRule>,

    /// Tried in order; the first rule containing a word's tag wins.
    #[serde(default)]
    pub phrases: Vec<PhraseRule>,

    #[serde(default)]
    pub chunking: ChunkingSpec,
}

/// Tag unknown words ending in `suffix` with `tag`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuffixRule {
    pub suffix: String,
    pub tag: String,
}

/// Maximal runs of words tagged with one of `tags` form a `label` phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseRule {
    pub label: String,
    pub tags: FxHashSet<String>,
}

/// Phrase length limits, in words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingSpec {
    /// Shorter runs are attached to the clause directly.
    #[serde(default = "ChunkingSpec::default_min")]
    pub min_length: usize,
    /// Longer runs are split into consecutive phrases.
    #[serde(default = "ChunkingSpec::default_max")]
    pub max_length: usize,
}

impl ChunkingSpec {
    fn default_min() -> usize {
        1
    }

    fn default_max() -> usize {
        8
    }
}

impl Default for ChunkingSpec {
    fn default() -> Self {
        Self {
            min_length: Self::default_min(),
            max_length: Self::default_max(),
        }
    }
}

impl LexiconModel {
    /// Decode a model from JSON text and check it.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let model: Self = serde_json::from_str(text).map_err(|e| {
            ConfigError::new(
                ErrorCode::InvalidModel,
                MODEL_PATH,
                format!("cannot decode parser model: {e}"),
            )
        })?;
        model.check()?;
        Ok(model)
    }

    /// Read and decode a model file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::new(
                ErrorCode::InvalidModel,
                MODEL_PATH,
                format!("cannot read parser model {}: {e}", path.display()),
            )
        })?;
        Self::from_json(&text)
    }

    fn check(&self) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::new(ErrorCode::InvalidModel, MODEL_PATH, message);

        if self.root_label.is_empty() || self.clause_label.is_empty() {
            return Err(invalid("root and clause labels must not be empty".into()));
        }
        if self.default_tag.is_empty() {
            return Err(invalid("default tag must not be empty".into()));
        }
        if let Some(rule) = self.phrases.iter().find(|r| r.label.is_empty()) {
            return Err(invalid(format!(
                "phrase rule with tags {:?} has an empty label",
                rule.tags
            )));
        }
        if let Some(rule) = self.suffix_rules.iter().find(|r| r.suffix.is_empty()) {
            return Err(invalid(format!("suffix rule for tag {} has an empty suffix", rule.tag)));
        }
        let ChunkingSpec {
            min_length,
            max_length,
        } = self.chunking;
        if min_length == 0 || max_length < min_length {
            return Err(invalid(format!(
                "chunking lengths must satisfy 1 <= min_length <= max_length, got {min_length}..{max_length}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_model_uses_defaults() {
        let model = LexiconModel::from_json("{}").unwrap();
        assert_eq!(model.root_label, "ROOT");
        assert_eq!(model.clause_label, "S");
        assert_eq!(model.default_tag, "NN");
        assert!(model.lexicon.is_empty());
        assert_eq!(model.chunking, ChunkingSpec::default());
    }

    #[test]
    fn test_full_model() {
        let json = r#"{
            "root_label": "TOP",
            "lexicon": { "the": "DT" },
            "suffix_rules": [ { "suffix": "ly", "tag": "RB" } ],
            "phrases": [ { "label": "NP", "tags": ["DT", "NN"] } ],
            "chunking": { "max_length": 3 }
        }"#;
        let model = LexiconModel::from_json(json).unwrap();
        assert_eq!(model.root_label, "TOP");
        assert_eq!(model.lexicon["the"], "DT");
        assert!(model.phrases[0].tags.contains("NN"));
        assert_eq!(model.chunking.min_length, 1);
        assert_eq!(model.chunking.max_length, 3);
    }

    #[test]
    fn test_rejects_bad_models() {
        for json in [
            "not json",
            r#"{ "root_label": "" }"#,
            r#"{ "phrases": [ { "label": "", "tags": [] } ] }"#,
            r#"{ "suffix_rules": [ { "suffix": "", "tag": "X" } ] }"#,
            r#"{ "chunking": { "min_length": 0 } }"#,
            r#"{ "chunking": { "min_length": 4, "max_length": 2 } }"#,
        ] {
            let err = LexiconModel::from_json(json).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidModel, "{json}");
            assert_eq!(err.path, MODEL_PATH);
        }
    }

    #[test]
    fn test_load_missing_file() {
        let err = LexiconModel::load(Path::new("/no/such/model.json")).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidModel);
    }
}
