//! Checks a [`FilterSpec`] before any filter is built.
//!
//! Each [`ValidationRule`] looks at one concern (version, range syntax,
//! tokenizer spec, model file, ...). [`ValidationEngine::validate`] runs every
//! rule and keeps every finding, so one run reports all problems:
//!
//! ```rust,ignore
//! use treeflat::config::validation::ValidationEngine;
//!
//! let report = ValidationEngine::with_defaults().validate(&spec);
//! for problem in report.errors() {
//!     eprintln!("{problem}");
//! }
//! ```

use std::collections::HashMap;

use serde::Serialize;

use super::spec::{FilterOptions, FilterSpec, SPEC_VERSION};
use crate::errors::{ConfigError, ErrorCode, FilterError};
use crate::filter::TaggingOptions;
use crate::parser::check_model_path;
use crate::range::AttributeRange;

// ─── Severity ───────────────────────────────────────────────────────────────

/// Errors block the run; warnings are only logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

// ─── Diagnostic ─────────────────────────────────────────────────────────────

/// One finding. Serializes as the [`ConfigError`] fields plus `severity`.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: Severity,
    #[serde(flatten)]
    pub error: ConfigError,
}

impl ValidationDiagnostic {
    pub fn error(err: ConfigError) -> Self {
        Self {
            severity: Severity::Error,
            error: err,
        }
    }

    pub fn warning(err: ConfigError) -> Self {
        Self {
            severity: Severity::Warning,
            error: err,
        }
    }
}

// ─── Report ─────────────────────────────────────────────────────────────────

/// Every finding of one validation run, in rule order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    /// Findings that block the run.
    pub fn errors(&self) -> impl Iterator<Item = &ConfigError> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .map(|d| &d.error)
    }

    /// Findings that are only logged.
    pub fn warnings(&self) -> impl Iterator<Item = &ConfigError> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .map(|d| &d.error)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// No errors; warnings may remain.
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Log the warnings and fail with every error, if there are any.
    pub fn into_result(self) -> Result<(), FilterError> {
        for warning in self.warnings() {
            tracing::warn!(code = %warning.code, path = %warning.path, "{}", warning.message);
        }
        if self.has_errors() {
            Err(FilterError::Config(self.errors().cloned().collect()))
        } else {
            Ok(())
        }
    }
}

// ─── Rule trait ─────────────────────────────────────────────────────────────

/// One concern checked on a [`FilterSpec`].
pub trait ValidationRule: Send + Sync {
    /// Stable identifier, e.g. `"range"`.
    fn name(&self) -> &str;

    fn validate(&self, spec: &FilterSpec) -> Vec<ValidationDiagnostic>;
}

// ─── Engine ─────────────────────────────────────────────────────────────────

/// An ordered list of rules.
pub struct ValidationEngine {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl ValidationEngine {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Every built-in rule, in the order the filters check their options.
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.add_rule(Box::new(VersionRule));
        engine.add_rule(Box::new(OptionsShapeRule));
        engine.add_rule(Box::new(RangeRule));
        engine.add_rule(Box::new(LabelPatternRule));
        engine.add_rule(Box::new(TokenizerRule));
        engine.add_rule(Box::new(StopwordsRule));
        engine.add_rule(Box::new(ParserOptionsRule));
        engine.add_rule(Box::new(ModelFileRule));
        engine.add_rule(Box::new(UnknownFieldsRule));
        engine
    }

    /// Append a rule; it runs after the existing ones.
    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    /// Names of the registered rules, in run order.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn validate(&self, spec: &FilterSpec) -> ValidationReport {
        let mut report = ValidationReport::default();
        for rule in &self.rules {
            report.diagnostics.extend(rule.validate(spec));
        }
        report
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// One error diagnostic if `result` failed.
fn check<T>(result: Result<T, ConfigError>) -> Vec<ValidationDiagnostic> {
    match result {
        Ok(_) => vec![],
        Err(err) => vec![ValidationDiagnostic::error(err)],
    }
}

/// Options of a pos tagging spec whose options decode; other specs are left
/// to the rules that apply to them.
fn tagging_options(spec: &FilterSpec) -> Option<TaggingOptions> {
    match spec.filter_options() {
        Ok(FilterOptions::PosTagging(options)) => Some(options),
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Concrete rules
// ═══════════════════════════════════════════════════════════════════════════

// ─── 1. Spec version ────────────────────────────────────────────────────────

struct VersionRule;

impl ValidationRule for VersionRule {
    fn name(&self) -> &str {
        "version"
    }

    fn validate(&self, spec: &FilterSpec) -> Vec<ValidationDiagnostic> {
        if spec.v == SPEC_VERSION {
            return vec![];
        }
        vec![ValidationDiagnostic::error(
            ConfigError::new(
                ErrorCode::UnsupportedVersion,
                "/v",
                format!("spec version {} is not supported", spec.v),
            )
            .with_hint(format!("Set \"v\": {SPEC_VERSION}")),
        )]
    }
}

// ─── 2. Options decode for the selected filter ──────────────────────────────

struct OptionsShapeRule;

impl ValidationRule for OptionsShapeRule {
    fn name(&self) -> &str {
        "options_shape"
    }

    fn validate(&self, spec: &FilterSpec) -> Vec<ValidationDiagnostic> {
        check(spec.filter_options())
    }
}

// ─── 3. Attribute range syntax ──────────────────────────────────────────────

struct RangeRule;

impl ValidationRule for RangeRule {
    fn name(&self) -> &str {
        "range"
    }

    fn validate(&self, spec: &FilterSpec) -> Vec<ValidationDiagnostic> {
        // Bounds are checked against the dataset when the filter runs.
        match spec.filter_options() {
            Ok(FilterOptions::ChangeCase(o)) => check(o.attribute_range()),
            Ok(FilterOptions::PosTagging(o)) => check(o.attribute_range()),
            Err(_) => match spec.options.get("range").and_then(|v| v.as_str()) {
                Some(range) => check(AttributeRange::parse(range).map_err(|e| e.at("/options/range"))),
                None => vec![],
            },
        }
    }
}

// ─── 4. Label pattern compiles ──────────────────────────────────────────────

struct LabelPatternRule;

impl ValidationRule for LabelPatternRule {
    fn name(&self) -> &str {
        "label_pattern"
    }

    fn validate(&self, spec: &FilterSpec) -> Vec<ValidationDiagnostic> {
        tagging_options(spec).map_or_else(Vec::new, |o| check(o.label_pattern()))
    }
}

// ─── 5. Tokenizer spec ──────────────────────────────────────────────────────

struct TokenizerRule;

impl ValidationRule for TokenizerRule {
    fn name(&self) -> &str {
        "tokenizer"
    }

    fn validate(&self, spec: &FilterSpec) -> Vec<ValidationDiagnostic> {
        tagging_options(spec).map_or_else(Vec::new, |o| check(o.build_tokenizer()))
    }
}

// ─── 6. Stopwords spec ──────────────────────────────────────────────────────

struct StopwordsRule;

impl ValidationRule for StopwordsRule {
    fn name(&self) -> &str {
        "stopwords"
    }

    fn validate(&self, spec: &FilterSpec) -> Vec<ValidationDiagnostic> {
        tagging_options(spec).map_or_else(Vec::new, |o| check(o.build_stopwords()))
    }
}

// ─── 7. Additional parser options ───────────────────────────────────────────

struct ParserOptionsRule;

impl ValidationRule for ParserOptionsRule {
    fn name(&self) -> &str {
        "parser_options"
    }

    fn validate(&self, spec: &FilterSpec) -> Vec<ValidationDiagnostic> {
        tagging_options(spec).map_or_else(Vec::new, |o| check(o.parser_options()))
    }
}

// ─── 8. Model path names a file ─────────────────────────────────────────────

/// Only the path is checked; the model is decoded once, when the filter
/// determines its output format.
struct ModelFileRule;

impl ValidationRule for ModelFileRule {
    fn name(&self) -> &str {
        "model_file"
    }

    fn validate(&self, spec: &FilterSpec) -> Vec<ValidationDiagnostic> {
        let Some(options) = tagging_options(spec) else {
            return vec![];
        };
        check(check_model_path(options.model_path()))
    }
}

// ─── 9. Unknown fields (strict → error, non-strict → warning) ──────────────

struct UnknownFieldsRule;

impl UnknownFieldsRule {
    /// One finding per leftover key under `path`, sorted by key.
    fn check_unknowns(
        path: &str,
        unknowns: &HashMap<String, serde_json::Value>,
        strict: bool,
    ) -> Vec<ValidationDiagnostic> {
        let mut keys: Vec<&String> = unknowns.keys().collect();
        keys.sort();
        keys.into_iter()
            .map(|key| {
                let err = ConfigError::new(
                    ErrorCode::UnknownField,
                    format!("{path}/{key}"),
                    format!("\"{key}\" is not a known field"),
                )
                .with_hint("Check spelling or remove this field");
                if strict {
                    ValidationDiagnostic::error(err)
                } else {
                    ValidationDiagnostic::warning(err)
                }
            })
            .collect()
    }
}

impl ValidationRule for UnknownFieldsRule {
    fn name(&self) -> &str {
        "unknown_fields"
    }

    fn validate(&self, spec: &FilterSpec) -> Vec<ValidationDiagnostic> {
        let mut out = Self::check_unknowns("", &spec.unknown_fields, spec.strict);
        if let Ok(options) = spec.filter_options() {
            out.extend(Self::check_unknowns(
                "/options",
                options.unknown_fields(),
                spec.strict,
            ));
        }
        out
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════════
