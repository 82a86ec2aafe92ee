use chrono::NaiveDate;
use chrono::NaiveDateTime;
use std::fmt::Display;

/// A single scalar cell value as stored in a grid.
///
/// Covers the value kinds a spreadsheet host hands back for a data cell:
/// nothing, booleans, doubles, text and naive timestamps.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Empty,
    /// Boolean values (true/false)
    Bool(bool),
    /// Numeric values, stored as double precision
    Number(f64),
    /// Text values
    Text(String),
    /// Date/time values without timezone
    DateTime(NaiveDateTime),
}

impl Value {
    /// Returns true if the cell contains no data.
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    /// Extracts the boolean value if present.
    pub fn get_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Extracts the numeric value if present.
    pub fn get_number(&self) -> Option<f64> {
        match self {
            Value::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Extracts the numeric value as a 64-bit integer.
    /// Returns None for non-numbers and for numbers with a fractional part.
    pub fn get_bigint(&self) -> Option<i64> {
        match self {
            Value::Number(value) if value.fract() == 0.0 => Some(*value as i64),
            _ => None,
        }
    }

    /// Extracts the text value if present.
    pub fn get_text(&self) -> Option<&str> {
        match self {
            Value::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Extracts the date/time value if present.
    pub fn get_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Value::DateTime(value) => Some(*value),
            _ => None,
        }
    }

    /// Renders the value as a field name.
    /// Header cells may legally hold any scalar kind; numbers render without
    /// a trailing `.0` so `1` and `1.0` name the same column.
    pub(crate) fn to_field_name(&self) -> String {
        self.to_string()
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match self {
            Value::Empty => String::new(),
            Value::Bool(value) => value.to_string(),
            Value::Number(value) if value.fract() == 0.0 => (*value as i64).to_string(),
            Value::Number(value) => value.to_string(),
            Value::Text(value) => value.to_owned(),
            Value::DateTime(value) => value.format("%Y-%m-%d %H:%M:%S").to_string(),
        };
        write!(f, "{}", value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(value as f64)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::DateTime(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::DateTime(value.and_hms_opt(0, 0, 0).expect("Midnight literal"))
    }
}
