//! Part-of-speech tagging of string attributes.
//!
//! Each selected string cell is split into sentences, every sentence is
//! tokenized and parsed, and the parse trees are flattened into one
//! `label:word` string that replaces the cell.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dataset::{Attribute, Row, Value};
use crate::errors::{ConfigError, FilterError, ParseError, Result};
use crate::filter::{shorten, string_columns, StreamFilter};
use crate::nlp::stopwords::{stopwords_from_spec, Stopwords, DEFAULT_STOPWORDS};
use crate::nlp::tokenizer::{tokenizer_from_spec, Tokenizer, DEFAULT_TOKENIZER};
use crate::nlp::SentenceSplitter;
use crate::parser::{check_model_path, load_parser, Parser, ParserOptions};
use crate::range::{AttributeRange, ALL_ATTRIBUTES};
use crate::tree::flatten::MATCH_ALL_LABELS;
use crate::tree::{LabelPattern, ParseTree, TreeFlattener};

pub const RANGE_PATH: &str = "/options/range";
pub const TOKENIZER_PATH: &str = "/options/tokenizer";
pub const STOPWORDS_PATH: &str = "/options/stopwords";
pub const LABEL_PATTERN_PATH: &str = "/options/label_pattern";

/// Model used when none is configured. It is a directory, so a model must
/// always be given explicitly.
pub const DEFAULT_MODEL: &str = ".";

fn default_range() -> String {
    ALL_ATTRIBUTES.to_string()
}

fn default_tokenizer() -> String {
    DEFAULT_TOKENIZER.to_string()
}

fn default_model() -> PathBuf {
    PathBuf::from(DEFAULT_MODEL)
}

fn default_label_pattern() -> String {
    MATCH_ALL_LABELS.to_string()
}

fn default_stopwords() -> String {
    DEFAULT_STOPWORDS.to_string()
}

/// Settings of [`PartOfSpeechTagging`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggingOptions {
    /// Attributes to process, e.g. `first-3,5,last`.
    #[serde(default = "default_range")]
    pub range: String,

    /// Process the attributes outside the range instead.
    #[serde(default)]
    pub invert: bool,

    /// Tokenizer spec, e.g. `word -delimiters " .,"`.
    #[serde(default = "default_tokenizer")]
    pub tokenizer: String,

    /// Parser model file.
    #[serde(default = "default_model")]
    pub model: PathBuf,

    /// Additional parser options, e.g. `-maxLength 80`.
    #[serde(default)]
    pub additional: String,

    /// Emit bare words instead of `label:word`.
    #[serde(default)]
    pub suppress_label_prefixes: bool,

    /// Only leaves whose parent label fully matches are kept. Empty keeps all.
    #[serde(default = "default_label_pattern")]
    pub label_pattern: String,

    /// Stopwords spec, e.g. `language en`.
    #[serde(default = "default_stopwords")]
    pub stopwords: String,

    /// Captures any fields not recognized by the schema.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

impl Default for TaggingOptions {
    fn default() -> Self {
        Self {
            range: default_range(),
            invert: false,
            tokenizer: default_tokenizer(),
            model: default_model(),
            additional: String::new(),
            suppress_label_prefixes: false,
            label_pattern: default_label_pattern(),
            stopwords: default_stopwords(),
            unknown_fields: HashMap::new(),
        }
    }
}

impl TaggingOptions {
    pub fn attribute_range(&self) -> Result<AttributeRange, ConfigError> {
        AttributeRange::parse(&self.range)
            .map(|r| r.with_invert(self.invert))
            .map_err(|e| e.at(RANGE_PATH))
    }

    pub fn label_pattern(&self) -> Result<LabelPattern, ConfigError> {
        LabelPattern::new(&self.label_pattern).map_err(|e| e.at(LABEL_PATTERN_PATH))
    }

    pub fn build_tokenizer(&self) -> Result<Box<dyn Tokenizer>, ConfigError> {
        tokenizer_from_spec(&self.tokenizer).map_err(|e| e.at(TOKENIZER_PATH))
    }

    pub fn build_stopwords(&self) -> Result<Box<dyn Stopwords>, ConfigError> {
        stopwords_from_spec(&self.stopwords).map_err(|e| e.at(STOPWORDS_PATH))
    }

    pub fn parser_options(&self) -> Result<ParserOptions, ConfigError> {
        ParserOptions::parse(&self.additional)
    }

    pub fn model_path(&self) -> &Path {
        &self.model
    }

    /// Command-line style rendering of the options.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec!["-R".to_string(), self.range.clone()];
        if self.invert {
            args.push("-V".to_string());
        }
        args.push("-tokenizer".to_string());
        args.push(self.tokenizer.clone());
        args.push("-model".to_string());
        args.push(self.model.display().to_string());
        if !self.additional.is_empty() {
            args.push("-additional".to_string());
            args.push(self.additional.clone());
        }
        if self.suppress_label_prefixes {
            args.push("-suppress-label-prefixes".to_string());
        }
        args.push("-regexp-labels".to_string());
        args.push(self.label_pattern.clone());
        args.push("-stopwords".to_string());
        args.push(self.stopwords.clone());
        args
    }
}

/// Components built from the options once the input header is known.
struct Prepared {
    columns: Vec<usize>,
    names: Vec<String>,
    tokenizer: Box<dyn Tokenizer>,
    stopwords: Box<dyn Stopwords>,
    labels: LabelPattern,
}

fn collect<T>(result: Result<T, ConfigError>, errors: &mut Vec<ConfigError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            errors.push(err);
            None
        }
    }
}

/// Replaces string cells with their flattened parse trees.
pub struct PartOfSpeechTagging<'s> {
    splitter: &'s SentenceSplitter,
    options: TaggingOptions,
    parser: Option<Box<dyn Parser>>,
    parser_injected: bool,
    prepared: Option<Prepared>,
}

impl<'s> PartOfSpeechTagging<'s> {
    pub fn new(splitter: &'s SentenceSplitter, options: TaggingOptions) -> Self {
        Self {
            splitter,
            options,
            parser: None,
            parser_injected: false,
            prepared: None,
        }
    }

    /// Use `parser` instead of loading one from the model file.
    pub fn with_parser(mut self, parser: Box<dyn Parser>) -> Self {
        self.parser = Some(parser);
        self.parser_injected = true;
        self
    }

    pub fn options(&self) -> &TaggingOptions {
        &self.options
    }

    /// Replace the options. A parser loaded from the old model is dropped
    /// and loaded again when the output format is next determined.
    pub fn set_options(&mut self, options: TaggingOptions) {
        self.options = options;
        self.prepared = None;
        if !self.parser_injected {
            self.parser = None;
        }
    }

    fn ready(&self) -> Result<(&Prepared, &dyn Parser)> {
        match (&self.prepared, &self.parser) {
            (Some(prepared), Some(parser)) => Ok((prepared, parser.as_ref())),
            _ => Err(FilterError::NotPrepared("pos_tagging")),
        }
    }

    fn parse_with(
        &self,
        prepared: &Prepared,
        parser: &dyn Parser,
        text: &str,
    ) -> Result<Vec<ParseTree>, ParseError> {
        self.splitter
            .split(text)
            .into_iter()
            .map(|sentence| {
                let words: Vec<String> = prepared.tokenizer.tokenize(sentence).collect();
                parser.parse(&words)
            })
            .collect()
    }

    fn tag_with(
        &self,
        prepared: &Prepared,
        parser: &dyn Parser,
        text: &str,
    ) -> Result<(String, usize), ParseError> {
        let trees = self.parse_with(prepared, parser, text)?;
        let flattened = TreeFlattener::new(prepared.stopwords.as_ref(), &prepared.labels)
            .with_suppressed_prefixes(self.options.suppress_label_prefixes)
            .flatten_document(&trees);
        Ok((flattened, trees.len()))
    }

    /// Parse every sentence of `text`.
    pub fn parse_sentences(&self, text: &str) -> Result<Vec<ParseTree>> {
        let (prepared, parser) = self.ready()?;
        Ok(self.parse_with(prepared, parser, text)?)
    }

    /// The value a cell holding `text` would be replaced with.
    pub fn tag_text(&self, text: &str) -> Result<String> {
        let (prepared, parser) = self.ready()?;
        Ok(self.tag_with(prepared, parser, text)?.0)
    }
}

impl StreamFilter for PartOfSpeechTagging<'_> {
    fn name(&self) -> &'static str {
        "pos_tagging"
    }

    fn determine_output_format(&mut self, input: &[Attribute]) -> Result<Vec<Attribute>> {
        let mut errors = Vec::new();

        let columns = collect(
            self.options
                .attribute_range()
                .and_then(|r| r.resolve(input.len()).map_err(|e| e.at(RANGE_PATH))),
            &mut errors,
        )
        .map(|resolved| string_columns(&resolved, input));
        let labels = collect(self.options.label_pattern(), &mut errors);
        let tokenizer = collect(self.options.build_tokenizer(), &mut errors);
        let stopwords = collect(self.options.build_stopwords(), &mut errors);
        let parser_options = collect(self.options.parser_options(), &mut errors);

        if self.parser.is_none() {
            match parser_options {
                Some(parser_options) => {
                    let parser = load_parser(&self.options.model, parser_options);
                    self.parser = collect(parser, &mut errors);
                }
                None => {
                    collect(check_model_path(&self.options.model), &mut errors);
                }
            }
        }

        match (columns, labels, tokenizer, stopwords) {
            (Some(columns), Some(labels), Some(tokenizer), Some(stopwords)) if errors.is_empty() => {
                tracing::debug!(
                    columns = ?columns,
                    tokenizer = %tokenizer.spec(),
                    stopwords = %stopwords.spec(),
                    labels = labels.as_str(),
                    "pos tagging prepared"
                );
                self.prepared = Some(Prepared {
                    columns,
                    names: input.iter().map(|a| a.name.clone()).collect(),
                    tokenizer,
                    stopwords,
                    labels,
                });
                Ok(input.to_vec())
            }
            _ => {
                self.prepared = None;
                Err(FilterError::Config(errors))
            }
        }
    }

    fn process(&mut self, row_index: usize, row: &mut Row) -> Result<usize> {
        let (prepared, parser) = self.ready()?;

        let mut changed = 0;
        for &col in &prepared.columns {
            let Some(Value::Text(text)) = row.get(col) else {
                continue;
            };

            let (tagged, sentences) =
                self.tag_with(prepared, parser, text)
                    .map_err(|source| FilterError::Process {
                        row: row_index,
                        attribute: prepared.names[col].clone(),
                        source,
                    })?;

            tracing::debug!(
                row = row_index,
                attribute = %prepared.names[col],
                sentences,
                input = %shorten(text, 40),
                output = %shorten(&tagged, 30),
                "tagged cell"
            );

            row[col] = Value::Text(tagged);
            changed += 1;
        }
        Ok(changed)
    }

    fn target_columns(&self) -> &[usize] {
        self.prepared
            .as_ref()
            .map(|p| p.columns.as_slice())
            .unwrap_or(&[])
    }
}
