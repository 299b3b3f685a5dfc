//! Lower- or upper-case string attributes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::dataset::{Attribute, Row, Value};
use crate::errors::{ConfigError, FilterError, Result};
use crate::filter::{string_columns, StreamFilter};
use crate::range::{AttributeRange, ALL_ATTRIBUTES};

fn default_range() -> String {
    ALL_ATTRIBUTES.to_string()
}

/// Settings of [`ChangeCase`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeCaseOptions {
    /// Attributes to process, e.g. `first-3,5,last`.
    #[serde(default = "default_range")]
    pub range: String,

    /// Process the attributes outside the range instead.
    #[serde(default)]
    pub invert: bool,

    /// Upper-case instead of lower-case.
    #[serde(default)]
    pub uppercase: bool,

    /// Captures any fields not recognized by the schema.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

impl Default for ChangeCaseOptions {
    fn default() -> Self {
        Self {
            range: default_range(),
            invert: false,
            uppercase: false,
            unknown_fields: HashMap::new(),
        }
    }
}

impl ChangeCaseOptions {
    pub fn attribute_range(&self) -> Result<AttributeRange, ConfigError> {
        AttributeRange::parse(&self.range)
            .map(|r| r.with_invert(self.invert))
            .map_err(|e| e.at("/options/range"))
    }

    /// Command-line style rendering of the options.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec!["-R".to_string(), self.range.clone()];
        if self.invert {
            args.push("-V".to_string());
        }
        if self.uppercase {
            args.push("-uppercase".to_string());
        }
        args
    }
}

/// Changes the case of every string cell in the selected attributes.
///
/// Missing values, non-string attributes, and attributes outside the range
/// pass through untouched.
#[derive(Debug, Clone)]
pub struct ChangeCase {
    options: ChangeCaseOptions,
    columns: Option<Vec<usize>>,
}

impl ChangeCase {
    pub fn new(options: ChangeCaseOptions) -> Self {
        Self {
            options,
            columns: None,
        }
    }

    pub fn options(&self) -> &ChangeCaseOptions {
        &self.options
    }

    /// Replace the options; the output format must be determined again.
    pub fn set_options(&mut self, options: ChangeCaseOptions) {
        self.options = options;
        self.columns = None;
    }

    fn convert(&self, text: &str) -> String {
        if self.options.uppercase {
            text.to_uppercase()
        } else {
            text.to_lowercase()
        }
    }
}

impl StreamFilter for ChangeCase {
    fn name(&self) -> &'static str {
        "change_case"
    }

    fn determine_output_format(&mut self, input: &[Attribute]) -> Result<Vec<Attribute>> {
        let range = self.options.attribute_range()?;
        let resolved = range
            .resolve(input.len())
            .map_err(|e| e.at("/options/range"))?;
        self.columns = Some(string_columns(&resolved, input));
        Ok(input.to_vec())
    }

    fn process(&mut self, _row_index: usize, row: &mut Row) -> Result<usize> {
        let columns = self
            .columns
            .as_ref()
            .ok_or(FilterError::NotPrepared("change_case"))?;

        let mut changed = 0;
        for &col in columns {
            if let Some(Value::Text(text)) = row.get(col) {
                let converted = self.convert(text);
                if converted != *text {
                    row[col] = Value::Text(converted);
                    changed += 1;
                }
            }
        }
        Ok(changed)
    }

    fn target_columns(&self) -> &[usize] {
        self.columns.as_deref().unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> Vec<Attribute> {
        vec![
            Attribute::numeric("id"),
            Attribute::string("a"),
            Attribute::string("b"),
            Attribute::nominal("c", ["X"]),
        ]
    }

    fn row() -> Row {
        vec![
            Value::Number(1.0),
            "Hello World".into(),
            "MiXeD".into(),
            "X".into(),
        ]
    }

    #[test]
    fn test_lowercase_by_default() {
        let mut filter = ChangeCase::new(ChangeCaseOptions::default());
        let out = filter.determine_output_format(&header()).unwrap();
        assert_eq!(out, header());

        let mut r = row();
        assert_eq!(filter.process(0, &mut r).unwrap(), 2);
        assert_eq!(r[1], Value::from("hello world"));
        assert_eq!(r[2], Value::from("mixed"));
        assert_eq!(r[3], Value::from("X"));
        assert_eq!(r[0], Value::Number(1.0));
    }

    #[test]
    fn test_uppercase_in_range_only() {
        let options = ChangeCaseOptions {
            range: "2".into(),
            uppercase: true,
            ..ChangeCaseOptions::default()
        };
        let mut filter = ChangeCase::new(options);
        filter.determine_output_format(&header()).unwrap();
        assert_eq!(filter.target_columns(), &[1]);

        let mut r = row();
        filter.process(0, &mut r).unwrap();
        assert_eq!(r[1], Value::from("HELLO WORLD"));
        assert_eq!(r[2], Value::from("MiXeD"));
    }

    #[test]
    fn test_inverted_range() {
        let options = ChangeCaseOptions {
            range: "2".into(),
            invert: true,
            ..ChangeCaseOptions::default()
        };
        let mut filter = ChangeCase::new(options);
        filter.determine_output_format(&header()).unwrap();
        assert_eq!(filter.target_columns(), &[2]);
    }

    #[test]
    fn test_missing_values_pass_through() {
        let mut filter = ChangeCase::new(ChangeCaseOptions::default());
        filter.determine_output_format(&header()).unwrap();
        let mut r = vec![Value::Missing, Value::Missing, "abc".into(), Value::Missing];
        assert_eq!(filter.process(0, &mut r).unwrap(), 0);
        assert!(r[1].is_missing());
    }

    #[test]
    fn test_range_errors_are_config_errors() {
        let options = ChangeCaseOptions {
            range: "9".into(),
            ..ChangeCaseOptions::default()
        };
        let err = ChangeCase::new(options)
            .determine_output_format(&header())
            .unwrap_err();
        let errors = err.config_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "/options/range");

        let options = ChangeCaseOptions {
            range: "x-".into(),
            ..ChangeCaseOptions::default()
        };
        assert!(matches!(
            ChangeCase::new(options).determine_output_format(&header()),
            Err(FilterError::Config(_))
        ));
    }

    #[test]
    fn test_process_before_prepare_fails() {
        let mut filter = ChangeCase::new(ChangeCaseOptions::default());
        assert!(matches!(
            filter.process(0, &mut row()),
            Err(FilterError::NotPrepared(_))
        ));
    }

    #[test]
    fn test_options_from_json_and_args() {
        let options: ChangeCaseOptions =
            serde_json::from_str(r#"{ "range": "first-2", "uppercase": true, "colour": 1 }"#)
                .unwrap();
        assert!(options.uppercase);
        assert!(options.unknown_fields.contains_key("colour"));
        assert_eq!(options.to_args(), vec!["-R", "first-2", "-uppercase"]);
    }
}
