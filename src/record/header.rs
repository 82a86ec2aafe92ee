use crate::grid::value::Value;
use thiserror::Error;

/// Errors related to header field lookup.
#[derive(Error, Debug)]
pub enum HeaderError {
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),
}

/// An ordered sequence of field names defining the column mapping.
///
/// Field order is column order: field `i` maps to one-based column `i + 1`.
/// Names are expected to be unique; with duplicates, lookup resolves to the
/// first occurrence.
#[derive(Clone, Debug, PartialEq)]
pub struct Header {
    fields: Vec<String>,
}

impl Header {
    /// Creates a header from explicit field names.
    pub fn new<S: Into<String>>(fields: Vec<S>) -> Self {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a header from a raw grid row by rendering each cell as text.
    pub fn from_row(row: &[Value]) -> Self {
        Self {
            fields: row.iter().map(Value::to_field_name).collect(),
        }
    }

    /// Returns the field names in column order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the header has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the zero-based column index of a field, if present.
    pub fn index_of(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|name| name == field)
    }

    /// Returns the zero-based column index of a field, or a column-not-found
    /// error for callers that treat an unknown field as fatal.
    pub fn require(&self, field: &str) -> Result<usize, HeaderError> {
        self.index_of(field)
            .ok_or_else(|| HeaderError::ColumnNotFound(field.to_owned()))
    }
}
