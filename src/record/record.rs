use crate::grid::value::Value;
use std::collections::HashMap;

/// Absolute position of a decoded record's row within its sheet.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RowPosition {
    /// Zero-based row index counted from the top of the grid
    pub index: usize,
    /// One-based absolute sheet row number
    pub number: usize,
}

/// A row viewed as a field-name keyed mapping of cell values.
///
/// Records decoded from a grid carry a [`RowPosition`] so callers can issue
/// targeted writes without re-deriving where the row lives. Records built by
/// hand for insertion carry no position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    values: HashMap<String, Value>,
    position: Option<RowPosition>,
}

impl Record {
    /// Creates an empty record with no position.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field value, replacing any previous value.
    pub fn set<V: Into<Value>>(&mut self, field: &str, value: V) {
        self.values.insert(field.to_owned(), value.into());
    }

    /// Builder-style variant of [`Record::set`].
    pub fn with<V: Into<Value>>(mut self, field: &str, value: V) -> Self {
        self.set(field, value);
        self
    }

    /// Returns a field value, or None when the field is absent.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Returns true if the record holds no fields.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the position of the row this record was decoded from.
    pub fn position(&self) -> Option<RowPosition> {
        self.position
    }

    /// Returns the zero-based row index, for decoded records.
    pub fn row_index(&self) -> Option<usize> {
        self.position.map(|position| position.index)
    }

    /// Returns the one-based absolute sheet row number, for decoded records.
    pub fn row_number(&self) -> Option<usize> {
        self.position.map(|position| position.number)
    }

    pub(crate) fn set_position(&mut self, position: RowPosition) {
        self.position = Some(position);
    }
}
