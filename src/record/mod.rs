//! # Row ↔ Record Module
//!
//! Bidirectional conversion between raw grid rows and field-name keyed
//! records, driven by an ordered [`Header`]. The free functions cover the
//! header-mapped direction used by the record mapper; [`RowCodec`] carries
//! caller-supplied conversions for typed keyed tables.
pub(crate) mod codec;
pub(crate) mod header;
pub(crate) mod record;

pub use codec::decode_row;
pub use codec::encode_row;
pub use codec::DecodePolicy;
pub use codec::RowCodec;
pub use header::Header;
pub use header::HeaderError;
pub use record::Record;
pub use record::RowPosition;
