//! Error types shared by every filter stage.
//!
//! Configuration problems are reported as [`ConfigError`]s that carry a
//! stable [`ErrorCode`], the option path they refer to, a message, and an
//! optional hint. They are collected rather than short-circuited so users see
//! every problem at once. Everything that goes wrong after configuration is a
//! [`FilterError`] and aborts the batch.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

// ─── Error codes ────────────────────────────────────────────────────────────

/// Stable, machine-readable identifier for a configuration problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The attribute range does not follow `first-3,5,6-10,last` syntax.
    InvalidRange,
    /// The attribute range names a column the table does not have.
    RangeOutOfBounds,
    /// The label-keep expression does not compile.
    InvalidRegex,
    /// The tokenizer spec string is empty, unknown, or has bad arguments.
    InvalidTokenizer,
    /// The stopwords spec string is empty, unknown, or has bad arguments.
    InvalidStopwords,
    /// The additional parser options could not be understood.
    InvalidParserOptions,
    /// The parser model file does not exist.
    ModelNotFound,
    /// The parser model path points to a directory.
    ModelIsDirectory,
    /// The parser model file exists but could not be read or decoded.
    InvalidModel,
    /// The options object does not match the selected filter.
    InvalidOptions,
    /// A field is not part of the spec schema.
    UnknownField,
    /// The spec version is not supported.
    UnsupportedVersion,
}

impl ErrorCode {
    /// Returns the user-facing name used in JSON and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRange => "invalid_range",
            Self::RangeOutOfBounds => "range_out_of_bounds",
            Self::InvalidRegex => "invalid_regex",
            Self::InvalidTokenizer => "invalid_tokenizer",
            Self::InvalidStopwords => "invalid_stopwords",
            Self::InvalidParserOptions => "invalid_parser_options",
            Self::ModelNotFound => "model_not_found",
            Self::ModelIsDirectory => "model_is_directory",
            Self::InvalidModel => "invalid_model",
            Self::InvalidOptions => "invalid_options",
            Self::UnknownField => "unknown_field",
            Self::UnsupportedVersion => "unsupported_version",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Configuration errors ───────────────────────────────────────────────────

/// A single configuration problem, attached to the option it concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigError {
    pub code: ErrorCode,
    /// JSON-pointer style path of the offending option (e.g. `/options/range`).
    pub path: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ConfigError {
    pub fn new(code: ErrorCode, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            path: path.into(),
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Re-anchor the error under a different option path.
    pub fn at(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.path, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, " (hint: {hint})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigError {}

// ─── Dataset errors ─────────────────────────────────────────────────────────

/// The input table is inconsistent with its own header.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("row {row} has {found} values, expected {expected}")]
    RowWidth {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("row {row}, attribute '{attribute}': {message}")]
    BadValue {
        row: usize,
        attribute: String,
        message: String,
    },
    #[error("unknown attribute '{0}'")]
    UnknownAttribute(String),
}

// ─── Parse errors ───────────────────────────────────────────────────────────

/// Failure to produce a parse tree.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed bracketed tree at byte {offset}: {message}")]
    Malformed { offset: usize, message: String },
    #[error("parser failed: {0}")]
    Failed(String),
}

// ─── Top-level error ────────────────────────────────────────────────────────

/// Any error surfaced by a filter run.
#[derive(Debug, Error)]
pub enum FilterError {
    /// One or more configuration problems; fatal to the whole batch.
    #[error("invalid configuration: {}", join_config_errors(.0))]
    Config(Vec<ConfigError>),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    /// A cell could not be processed; the remaining rows are not attempted.
    #[error("row {row}, attribute '{attribute}': {source}")]
    Process {
        row: usize,
        attribute: String,
        #[source]
        source: ParseError,
    },
    /// Parsing failed outside of a table cell (free text, tree files).
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("filter '{0}' used before its output format was determined")]
    NotPrepared(&'static str),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FilterError {
    /// The configuration problems carried by this error, if any.
    pub fn config_errors(&self) -> &[ConfigError] {
        match self {
            Self::Config(errors) => errors,
            _ => &[],
        }
    }
}

impl From<ConfigError> for FilterError {
    fn from(err: ConfigError) -> Self {
        Self::Config(vec![err])
    }
}

fn join_config_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T, E = FilterError> = std::result::Result<T, E>;
