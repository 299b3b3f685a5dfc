//! Row-by-row string attribute filters.
//!
//! A [`StreamFilter`] is configured, told the input header once through
//! [`StreamFilter::determine_output_format`], and then rewrites rows one at a
//! time. [`runner::apply`] drives a filter over a whole [`Dataset`].
//!
//! [`Dataset`]: crate::dataset::Dataset

pub mod change_case;
pub mod observer;
pub mod pos_tagging;
pub mod runner;

use crate::dataset::{Attribute, Row};
use crate::errors::Result;
use crate::range::ResolvedRange;

pub use change_case::{ChangeCase, ChangeCaseOptions};
pub use observer::{BatchClock, BatchReport, FilterObserver, NoopObserver, TracingObserver};
pub use pos_tagging::{PartOfSpeechTagging, TaggingOptions};
pub use runner::apply;

/// A filter that rewrites rows independently of each other.
pub trait StreamFilter {
    /// Short, stable identifier (e.g. `"change_case"`).
    fn name(&self) -> &'static str;

    /// Validate the configuration against the input header and return the
    /// output header. Must be called before [`StreamFilter::process`]; any
    /// configuration problem is reported here, before a row is touched.
    fn determine_output_format(&mut self, input: &[Attribute]) -> Result<Vec<Attribute>>;

    /// Rewrite one row in place and return how many cells changed.
    fn process(&mut self, row_index: usize, row: &mut Row) -> Result<usize>;

    /// Columns this filter will rewrite, once the output format is known.
    fn target_columns(&self) -> &[usize];
}

/// String attributes inside `range`: the cells a string filter may rewrite.
pub fn string_columns(range: &ResolvedRange, attributes: &[Attribute]) -> Vec<usize> {
    range
        .indices()
        .filter(|&i| attributes.get(i).map_or(false, Attribute::is_string))
        .collect()
}

/// First `max` characters of `text`, with `...` appended when cut.
pub fn shorten(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
