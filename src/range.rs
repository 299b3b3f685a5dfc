//! Attribute ranges
//!
//! A range is written with 1-based indices, comma separated, with `first` and
//! `last` as symbolic bounds and `-` for inclusive spans:
//! `first-3,5,6-10,last`. Parsing only checks syntax; indices are resolved
//! against a concrete column count with [`AttributeRange::resolve`] right
//! before a table is processed.

use std::fmt;

use crate::errors::{ConfigError, ErrorCode};

/// Range that selects every column.
pub const ALL_ATTRIBUTES: &str = "first-last";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    First,
    Last,
    /// 1-based index as written by the user.
    Index(usize),
}

impl Bound {
    fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("first") {
            Some(Bound::First)
        } else if text.eq_ignore_ascii_case("last") {
            Some(Bound::Last)
        } else {
            match text.parse::<usize>() {
                Ok(n) if n >= 1 => Some(Bound::Index(n)),
                _ => None,
            }
        }
    }

    /// 0-based column index, or `None` if the table has no such column.
    fn resolve(self, num_columns: usize) -> Option<usize> {
        match self {
            Bound::First if num_columns > 0 => Some(0),
            Bound::Last if num_columns > 0 => Some(num_columns - 1),
            Bound::Index(n) if n <= num_columns => Some(n - 1),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RangeItem {
    Single(Bound),
    Span(Bound, Bound),
}

/// A parsed, not yet resolved, attribute range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeRange {
    spec: String,
    items: Vec<RangeItem>,
    invert: bool,
}

impl Default for AttributeRange {
    fn default() -> Self {
        Self::all()
    }
}

impl AttributeRange {
    /// Range covering every column (`first-last`).
    pub fn all() -> Self {
        Self {
            spec: ALL_ATTRIBUTES.to_string(),
            items: vec![RangeItem::Span(Bound::First, Bound::Last)],
            invert: false,
        }
    }

    /// Parse a range spec. Empty items are skipped; the empty spec selects
    /// nothing.
    pub fn parse(spec: &str) -> Result<Self, ConfigError> {
        let mut items = Vec::new();

        for raw in spec.split(',') {
            let item = raw.trim();
            if item.is_empty() {
                continue;
            }

            let parsed = match item.split_once('-') {
                Some((lo, hi)) => Bound::parse(lo)
                    .zip(Bound::parse(hi))
                    .map(|(lo, hi)| RangeItem::Span(lo, hi)),
                None => Bound::parse(item).map(RangeItem::Single),
            };

            match parsed {
                Some(range_item) => items.push(range_item),
                None => {
                    return Err(ConfigError::new(
                        ErrorCode::InvalidRange,
                        "/range",
                        format!("invalid range item \"{item}\" in \"{spec}\""),
                    )
                    .with_hint(
                        "Use comma separated 1-based indices, \"first\", \"last\", \
                         and inclusive spans like \"first-3,5,6-10,last\"",
                    ))
                }
            }
        }

        Ok(Self {
            spec: spec.trim().to_string(),
            items,
            invert: false,
        })
    }

    /// Set whether the selection is inverted.
    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Whether the selection is inverted.
    pub fn invert(&self) -> bool {
        self.invert
    }

    /// The range as originally written.
    pub fn as_str(&self) -> &str {
        &self.spec
    }

    /// Resolve the range against a table with `num_columns` columns.
    ///
    /// Spans are inclusive and order-insensitive (`5-3` is `3-5`). An index
    /// past the last column is an error.
    pub fn resolve(&self, num_columns: usize) -> Result<ResolvedRange, ConfigError> {
        let mut selected = vec![false; num_columns];

        for item in &self.items {
            let (lo, hi) = match *item {
                RangeItem::Single(b) => (b, b),
                RangeItem::Span(lo, hi) => (lo, hi),
            };

            let out_of_bounds = |b: Bound| match b {
                Bound::Index(n) => Some(n),
                _ => None,
            };

            match (lo.resolve(num_columns), hi.resolve(num_columns)) {
                (Some(a), Some(b)) => {
                    let (start, end) = if a <= b { (a, b) } else { (b, a) };
                    for flag in &mut selected[start..=end] {
                        *flag = true;
                    }
                }
                _ => {
                    // first/last on an empty table select nothing
                    let bad = out_of_bounds(lo)
                        .filter(|&n| n > num_columns)
                        .or_else(|| out_of_bounds(hi).filter(|&n| n > num_columns));
                    if let Some(n) = bad {
                        return Err(ConfigError::new(
                            ErrorCode::RangeOutOfBounds,
                            "/range",
                            format!(
                                "attribute index {n} in \"{}\" exceeds the {num_columns} available attribute(s)",
                                self.spec
                            ),
                        ));
                    }
                }
            }
        }

        if self.invert {
            for flag in &mut selected {
                *flag = !*flag;
            }
        }

        Ok(ResolvedRange { selected })
    }
}

impl fmt::Display for AttributeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spec)
    }
}

/// A range resolved against a concrete column count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRange {
    selected: Vec<bool>,
}

impl ResolvedRange {
    /// Whether the 0-based column `index` is selected.
    pub fn contains(&self, index: usize) -> bool {
        self.selected.get(index).copied().unwrap_or(false)
    }

    /// Selected 0-based column indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.selected
            .iter()
            .enumerate()
            .filter(|(_, &on)| on)
            .map(|(i, _)| i)
    }

    /// Number of selected columns.
    pub fn count(&self) -> usize {
        self.selected.iter().filter(|&&on| on).count()
    }

    /// Number of columns the range was resolved against.
    pub fn num_columns(&self) -> usize {
        self.selected.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selected(spec: &str, columns: usize) -> Vec<usize> {
        AttributeRange::parse(spec)
            .unwrap()
            .resolve(columns)
            .unwrap()
            .indices()
            .collect()
    }

    #[test]
    fn test_first_last_selects_everything() {
        assert_eq!(selected("first-last", 4), vec![0, 1, 2, 3]);
        assert_eq!(AttributeRange::all().resolve(3).unwrap().count(), 3);
    }

    #[test]
    fn test_mixed_range() {
        assert_eq!(selected("first-3,5,6-10,last", 12), vec![0, 1, 2, 4, 5, 6, 7, 8, 9, 11]);
    }

    #[test]
    fn test_reversed_span_is_normalized() {
        assert_eq!(selected("4-2", 5), vec![1, 2, 3]);
    }

    #[test]
    fn test_whitespace_and_empty_items_are_ignored() {
        assert_eq!(selected(" 1 , ,LAST ", 3), vec![0, 2]);
    }

    #[test]
    fn test_empty_spec_selects_nothing() {
        assert!(selected("", 3).is_empty());
    }

    #[test]
    fn test_invert() {
        let range = AttributeRange::parse("2-3").unwrap().with_invert(true);
        let resolved = range.resolve(5).unwrap();
        assert_eq!(resolved.indices().collect::<Vec<_>>(), vec![0, 3, 4]);
        assert!(range.invert());
    }

    #[test]
    fn test_malformed_items_are_rejected() {
        for spec in ["0", "a-3", "1-", "first-middle", "-2", "1.5"] {
            let err = AttributeRange::parse(spec).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidRange, "spec {spec:?}");
        }
    }

    #[test]
    fn test_out_of_bounds_detected_at_resolve_time() {
        let range = AttributeRange::parse("1,7").unwrap();
        let err = range.resolve(3).unwrap_err();
        assert_eq!(err.code, ErrorCode::RangeOutOfBounds);
        assert!(range.resolve(7).is_ok());
    }

    #[test]
    fn test_symbolic_bounds_on_empty_table() {
        let resolved = AttributeRange::all().resolve(0).unwrap();
        assert_eq!(resolved.count(), 0);
        assert!(!resolved.contains(0));
    }

    #[test]
    fn test_display_keeps_written_form() {
        let range = AttributeRange::parse("first-3,last").unwrap();
        assert_eq!(range.to_string(), "first-3,last");
        assert_eq!(range.as_str(), "first-3,last");
    }
}
