//! # Sheet Mapper
//!
//! A row-oriented data-access layer over two-dimensional tabular grids.
//! The crate translates between raw cell values and typed records through a
//! header-derived column mapping, and keeps the in-memory view consistent
//! with the grid at two different trade-off points.
//!
//! ## Features
//!
//! - **Record mapper**: find/insert/update/delete against one sheet through
//!   a lazily-built, write-invalidated snapshot of positioned records
//! - **Keyed table**: an id-indexed in-memory table read once at
//!   construction, mutated freely and persisted back in one bulk save
//! - **Injected grid I/O**: all cell reads and writes go through the
//!   [`Grid`]/[`Workbook`] traits, so any host backend plugs in; an
//!   in-memory implementation ships with the crate
//! - **Injected row codecs**: typed keyed tables convert rows with
//!   caller-supplied encode/decode functions, no trait impl on the record
//!   type required for its wire layout
//! - **Header handling**: header row parsing, custom header overrides and
//!   configurable header/data row offsets
//!
//! Everything runs single-threaded and blocking; each mapper or table owns
//! exactly one target sheet for the duration of its use.
mod error;
mod grid;
mod mapper;
mod record;
mod table;

pub use crate::error::Result;
pub use crate::error::SheetMapperError;
pub use crate::grid::memory::MemorySheet;
pub use crate::grid::memory::MemoryWorkbook;
pub use crate::grid::value::Value;
pub use crate::grid::Grid;
pub use crate::grid::GridError;
pub use crate::grid::Workbook;
pub use crate::mapper::MapperOptions;
pub use crate::mapper::Patch;
pub use crate::mapper::RecordMapper;
pub use crate::record::decode_row;
pub use crate::record::encode_row;
pub use crate::record::DecodePolicy;
pub use crate::record::Header;
pub use crate::record::HeaderError;
pub use crate::record::Record;
pub use crate::record::RowCodec;
pub use crate::record::RowPosition;
pub use crate::table::Id;
pub use crate::table::Keyed;
pub use crate::table::KeyedTable;
pub use crate::table::Merge;
pub use crate::table::TableError;
pub use crate::table::TableOptions;
