//! JSON filter specifications and their validation.

pub mod spec;
pub mod validation;

pub use spec::{FilterKind, FilterOptions, FilterSpec, SPEC_VERSION};
pub use validation::{
    Severity, ValidationDiagnostic, ValidationEngine, ValidationReport, ValidationRule,
};

use crate::errors::Result;
use crate::filter::StreamFilter;
use crate::nlp::SentenceSplitter;

/// Validate `spec` with the default rules and build the filter it names.
///
/// Warnings are logged; any error fails the build with every error found.
pub fn build_filter<'s>(
    spec: &FilterSpec,
    splitter: &'s SentenceSplitter,
) -> Result<Box<dyn StreamFilter + 's>> {
    ValidationEngine::with_defaults().validate(spec).into_result()?;
    let options = spec.filter_options()?;
    tracing::debug!(filter = spec.filter.as_str(), "built filter from spec");
    Ok(options.into_filter(splitter))
}
