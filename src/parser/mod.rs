//! Constituency parsers
//!
//! A [`Parser`] turns the words of one sentence into a [`ParseTree`]. The
//! crate ships [`LexiconParser`], a lexicon tagger with tag-pattern phrase
//! chunking whose model is read from a JSON file.

pub mod chunker;
pub mod lexicon;
pub mod model;

use std::path::Path;

use crate::errors::{ConfigError, ErrorCode, ParseError};
use crate::nlp::options::{join_options, OptionArgs};
use crate::tree::ParseTree;

pub use lexicon::LexiconParser;
pub use model::{LexiconModel, MODEL_PATH};

/// Label of every node in the flat tree returned for over-long sentences.
pub const FALLBACK_LABEL: &str = "X";

/// Path reported for problems with the additional parser options.
pub const ADDITIONAL_OPTIONS_PATH: &str = "/options/additional";

/// Parses the words of one sentence.
pub trait Parser: Send + Sync {
    fn parse(&self, words: &[String]) -> Result<ParseTree, ParseError>;
}

/// Extra parser settings given as one option string, e.g.
/// `-maxLength 80 -caseInsensitive`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserOptions {
    /// Sentences with more words get the flat `(X (X w) ...)` tree.
    pub max_length: Option<usize>,
    /// Overrides the model's default tag.
    pub default_tag: Option<String>,
    /// Ignore case when guessing tags for unknown words.
    pub case_insensitive: bool,
}

impl ParserOptions {
    pub fn parse(additional: &str) -> Result<Self, ConfigError> {
        let invalid = |message: String| {
            ConfigError::new(ErrorCode::InvalidParserOptions, ADDITIONAL_OPTIONS_PATH, message)
                .with_hint("Known options: -maxLength <n>, -defaultTag <tag>, -caseInsensitive")
        };

        let mut args = OptionArgs::parse(additional).map_err(invalid)?;

        let max_length = args
            .take_value("maxLength")
            .map_err(invalid)?
            .map(|v| {
                v.parse::<usize>()
                    .map_err(|_| invalid(format!("-maxLength expects a number, got \"{v}\"")))
            })
            .transpose()?;
        let default_tag = args.take_value("defaultTag").map_err(invalid)?;
        let case_insensitive = args.take_flag("caseInsensitive");
        args.finish().map_err(invalid)?;

        if default_tag.as_deref() == Some("") {
            return Err(invalid("-defaultTag must not be empty".to_string()));
        }

        Ok(Self {
            max_length,
            default_tag,
            case_insensitive,
        })
    }

    /// Option string that [`ParserOptions::parse`] reads back unchanged.
    pub fn to_spec(&self) -> String {
        let mut words = Vec::new();
        if let Some(n) = self.max_length {
            words.push("-maxLength".to_string());
            words.push(n.to_string());
        }
        if let Some(tag) = &self.default_tag {
            words.push("-defaultTag".to_string());
            words.push(tag.clone());
        }
        if self.case_insensitive {
            words.push("-caseInsensitive".to_string());
        }
        join_options(&words)
    }
}

/// The model path must name an existing file.
pub fn check_model_path(path: &Path) -> Result<(), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::new(
            ErrorCode::ModelNotFound,
            MODEL_PATH,
            format!("parser model {} does not exist", path.display()),
        ));
    }
    if path.is_dir() {
        return Err(ConfigError::new(
            ErrorCode::ModelIsDirectory,
            MODEL_PATH,
            format!("parser model {} points to a directory", path.display()),
        )
        .with_hint("Point the model option at the model file itself"));
    }
    Ok(())
}

/// Check `path`, then load the parser it names.
pub fn load_parser(path: &Path, options: ParserOptions) -> Result<Box<dyn Parser>, ConfigError> {
    check_model_path(path)?;
    let parser = LexiconParser::from_path(path, options)?;
    tracing::debug!(
        model = %path.display(),
        lexicon = parser.model().lexicon.len(),
        "loaded parser model"
    );
    Ok(Box::new(parser))
}
