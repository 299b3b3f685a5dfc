//! In-memory tables the filters operate on.
//!
//! # JSON shape
//!
//! ```json
//! {
//!   "relation": "reviews",
//!   "attributes": [
//!     { "name": "id", "type": "numeric" },
//!     { "name": "label", "type": "nominal", "values": ["pos", "neg"] },
//!     { "name": "text", "type": "string" }
//!   ],
//!   "rows": [[1, "pos", "The dog runs."], [2, "neg", null]]
//! }
//! ```
//!
//! `null` marks a missing value.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{DatasetError, Result};

/// What kind of values a column holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AttributeKind {
    Numeric,
    Nominal { values: Vec<String> },
    String,
}

/// A named column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(flatten)]
    pub kind: AttributeKind,
}

impl Attribute {
    pub fn numeric(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Numeric,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::String,
        }
    }

    pub fn nominal<S: Into<String>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Nominal {
                values: values.into_iter().map(Into::into).collect(),
            },
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self.kind, AttributeKind::String)
    }
}

/// One cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Missing,
    Number(f64),
    Text(String),
}

impl Value {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

pub type Row = Vec<Value>;

/// A relation: header plus rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub relation: String,
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl Dataset {
    pub fn new(relation: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        Self {
            relation: relation.into(),
            attributes,
            rows: Vec::new(),
        }
    }

    /// Builder-style row append, unchecked until [`Dataset::validate`].
    pub fn with_row(mut self, row: Row) -> Self {
        self.rows.push(row);
        self
    }

    pub fn num_attributes(&self) -> usize {
        self.attributes.len()
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Position of the attribute called `name`.
    pub fn attribute_index(&self, name: &str) -> Result<usize, DatasetError> {
        self.attributes
            .iter()
            .position(|a| a.name == name)
            .ok_or_else(|| DatasetError::UnknownAttribute(name.to_string()))
    }

    /// Check every row against the header.
    pub fn validate(&self) -> Result<(), DatasetError> {
        let expected = self.attributes.len();
        for (row, values) in self.rows.iter().enumerate() {
            if values.len() != expected {
                return Err(DatasetError::RowWidth {
                    row,
                    found: values.len(),
                    expected,
                });
            }
            for (attribute, value) in self.attributes.iter().zip(values) {
                check_value(row, attribute, value)?;
            }
        }
        Ok(())
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let dataset: Self = serde_json::from_str(text)?;
        dataset.validate()?;
        Ok(dataset)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

fn check_value(row: usize, attribute: &Attribute, value: &Value) -> Result<(), DatasetError> {
    let bad = |message: String| DatasetError::BadValue {
        row,
        attribute: attribute.name.clone(),
        message,
    };

    match (&attribute.kind, value) {
        (_, Value::Missing) => Ok(()),
        (AttributeKind::Numeric, Value::Number(_)) => Ok(()),
        (AttributeKind::Numeric, Value::Text(t)) => {
            Err(bad(format!("expected a number, got \"{t}\"")))
        }
        (AttributeKind::String, Value::Text(_)) => Ok(()),
        (AttributeKind::String, Value::Number(n)) => Err(bad(format!("expected text, got {n}"))),
        (AttributeKind::Nominal { values }, Value::Text(t)) => {
            if values.iter().any(|v| v == t) {
                Ok(())
            } else {
                Err(bad(format!("\"{t}\" is not one of the declared values")))
            }
        }
        (AttributeKind::Nominal { .. }, Value::Number(n)) => {
            Err(bad(format!("expected a nominal label, got {n}")))
        }
    }
}
