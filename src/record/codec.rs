use crate::grid::value::Value;
use crate::record::header::Header;
use crate::record::record::Record;
use crate::record::record::RowPosition;

/// Decodes a raw row into a record under the given header.
///
/// Cell `i` is assigned to field `header[i]`. A row shorter than the header
/// leaves the excess fields absent rather than raising; cells beyond the
/// header width are ignored.
pub fn decode_row(header: &Header, row: &[Value], position: Option<RowPosition>) -> Record {
    let mut record = Record::new();
    for (field, value) in header.fields().iter().zip(row.iter()) {
        record.set(field, value.clone());
    }
    if let Some(position) = position {
        record.set_position(position);
    }
    record
}

/// Encodes a record into a raw row in header order.
///
/// A field the record does not hold yields an empty cell at its position,
/// not an error.
pub fn encode_row(header: &Header, record: &Record) -> Vec<Value> {
    header
        .fields()
        .iter()
        .map(|field| record.get(field).cloned().unwrap_or(Value::Empty))
        .collect()
}

/// How a keyed table treats a row its decoder returns nothing for.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum DecodePolicy {
    /// Drop the row silently and keep loading
    #[default]
    Filter,
    /// Fail construction on the first undecodable row
    Strict,
}

/// Caller-supplied conversion between typed records and raw rows.
///
/// Both directions are injected functions, so a table stays usable with any
/// record type without the type having to implement a crate trait for its
/// wire layout.
pub struct RowCodec<T> {
    encode: Box<dyn Fn(&T) -> Vec<Value>>,
    decode: Box<dyn Fn(&[Value]) -> Option<T>>,
}

impl<T> RowCodec<T> {
    /// Creates a codec from an encode and a decode function.
    ///
    /// `decode` returns None for a row that does not form a record; whether
    /// that drops the row or fails the load is the table's
    /// [`DecodePolicy`].
    pub fn new(
        encode: impl Fn(&T) -> Vec<Value> + 'static,
        decode: impl Fn(&[Value]) -> Option<T> + 'static,
    ) -> Self {
        Self {
            encode: Box::new(encode),
            decode: Box::new(decode),
        }
    }

    /// Encodes one record to a raw row.
    pub fn encode(&self, record: &T) -> Vec<Value> {
        (self.encode)(record)
    }

    /// Decodes one raw row, or None when the row does not form a record.
    pub fn decode(&self, row: &[Value]) -> Option<T> {
        (self.decode)(row)
    }
}
