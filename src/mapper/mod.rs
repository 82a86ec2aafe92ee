//! # Record Mapper Module
//!
//! Row-cursor access to one sheet: the full grid is read on first access,
//! decoded into positioned records and cached; every mutation invalidates
//! the cache so the next read reloads. Within one mapper, a read after a
//! mutation therefore always observes that mutation.
use crate::error::Result;
use crate::error::ResultMessage;
use crate::grid::value::Value;
use crate::grid::Grid;
use crate::grid::Workbook;
use crate::record::codec::decode_row;
use crate::record::codec::encode_row;
use crate::record::header::Header;
use crate::record::record::Record;
use crate::record::record::RowPosition;
use tracing::debug;
use tracing::trace;

/// Construction options for a [`RecordMapper`].
#[derive(Clone, Debug)]
pub struct MapperOptions {
    /// One-based row number of the header row (default 1). Rows above it are
    /// ignored entirely.
    pub header_row: usize,
    /// Field names overriding the ones in the header row. The header row
    /// itself is still consumed; only its names are replaced.
    pub custom_header: Option<Header>,
}

impl Default for MapperOptions {
    fn default() -> Self {
        Self {
            header_row: 1,
            custom_header: None,
        }
    }
}

/// An ordered set of field updates applied by [`RecordMapper::update`].
#[derive(Clone, Debug, Default)]
pub struct Patch {
    fields: Vec<(String, Value)>,
}

impl Patch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field update, builder style.
    pub fn set<V: Into<Value>>(mut self, field: &str, value: V) -> Self {
        self.fields.push((field.to_owned(), value.into()));
        self
    }

    /// Returns the updates in insertion order.
    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }
}

/// The cached view of a fully-loaded sheet.
struct Snapshot {
    header: Header,
    records: Vec<Record>,
}

/// Row-oriented find/insert/update/delete over one sheet.
///
/// The mapper holds at most one snapshot of the sheet. It is created lazily
/// by the first read, served to every read after that, and dropped by every
/// mutating call, so the cache never outlives the grid state it was read
/// from.
pub struct RecordMapper<G: Grid> {
    grid: G,
    header_row: usize,
    custom_header: Option<Header>,
    cache: Option<Snapshot>,
}

impl<G: Grid> RecordMapper<G> {
    /// Creates a mapper over a sheet handle with default options.
    pub fn new(grid: G) -> Self {
        Self::with_options(grid, MapperOptions::default())
    }

    /// Creates a mapper over a sheet handle.
    pub fn with_options(grid: G, options: MapperOptions) -> Self {
        Self {
            grid,
            header_row: options.header_row.max(1),
            custom_header: options.custom_header,
            cache: None,
        }
    }

    /// Resolves a sheet by name and creates a mapper over it with default
    /// options. Fails when the name does not resolve.
    pub fn open<W>(workbook: &W, name: &str) -> Result<Self>
    where
        W: Workbook<Sheet = G>,
    {
        Self::open_with_options(workbook, name, MapperOptions::default())
    }

    /// Resolves a sheet by name and creates a mapper over it.
    pub fn open_with_options<W>(workbook: &W, name: &str, options: MapperOptions) -> Result<Self>
    where
        W: Workbook<Sheet = G>,
    {
        Ok(Self::with_options(workbook.resolve(name)?, options))
    }

    /// Returns the first record, or None when the sheet body is empty.
    pub fn first(&mut self) -> Result<Option<Record>> {
        Ok(self.load()?.records.first().cloned())
    }

    /// Returns the first record matching the predicate.
    pub fn find_one(&mut self, predicate: impl Fn(&Record) -> bool) -> Result<Option<Record>> {
        Ok(self
            .load()?
            .records
            .iter()
            .find(|record| predicate(record))
            .cloned())
    }

    /// Returns all records matching the predicate.
    pub fn find_many(&mut self, predicate: impl Fn(&Record) -> bool) -> Result<Vec<Record>> {
        Ok(self
            .load()?
            .records
            .iter()
            .filter(|record| predicate(record))
            .cloned()
            .collect())
    }

    /// Returns all records in sheet order.
    pub fn find_all(&mut self) -> Result<Vec<Record>> {
        Ok(self.load()?.records.clone())
    }

    /// Encodes a record under the current header and appends it as the final
    /// row.
    pub fn create(&mut self, record: &Record) -> Result<()> {
        let header = self.load()?.header.clone();
        let row = encode_row(&header, record);
        // Invalidate before touching the grid so a failed write can never
        // leave a stale snapshot behind.
        self.clear_cache();
        self.grid.append_row(&row)?;
        Ok(())
    }

    /// Applies a patch to every record matching the predicate via targeted
    /// cell writes. Returns the number of matched records.
    ///
    /// Every patched field is resolved against the header before the first
    /// write, so an unknown field name aborts the call with no cell touched.
    pub fn update(&mut self, predicate: impl Fn(&Record) -> bool, patch: &Patch) -> Result<usize> {
        let snapshot = self.load()?;
        let mut columns = Vec::with_capacity(patch.fields().len());
        for (field, value) in patch.fields() {
            columns.push((snapshot.header.require(field)? + 1, value.clone()));
        }
        let row_numbers: Vec<usize> = snapshot
            .records
            .iter()
            .filter(|record| predicate(record))
            .filter_map(Record::row_number)
            .collect();

        self.clear_cache();
        for row in &row_numbers {
            for (col, value) in &columns {
                self.grid.write_cell(*row, *col, value.clone())?;
            }
        }
        debug!(rows = row_numbers.len(), fields = columns.len(), "patched records");
        Ok(row_numbers.len())
    }

    /// Clears every row below the header row in one bulk clear. The next
    /// read reflects an empty data body.
    pub fn clear_data(&mut self) -> Result<()> {
        let last_row = self.grid.last_row();
        let last_col = self.grid.last_col();
        self.clear_cache();
        if last_row > self.header_row && last_col > 0 {
            self.grid
                .clear_block(self.header_row + 1, 1, last_row - self.header_row, last_col)?;
            debug!(rows = last_row - self.header_row, "cleared data body");
        }
        Ok(())
    }

    /// Drops the cached snapshot; the next read reloads from the grid.
    pub fn clear_cache(&mut self) {
        if self.cache.take().is_some() {
            trace!("cache invalidated");
        }
    }

    /// Returns the cached snapshot, loading the full grid on a cache miss.
    fn load(&mut self) -> Result<&Snapshot> {
        if self.cache.is_none() {
            let table = self.grid.read_all().with_prefix("Load sheet failed")?;
            let mut rows = table.into_iter().skip(self.header_row - 1);
            let header_cells = rows.next().unwrap_or_default();
            let header = self
                .custom_header
                .clone()
                .unwrap_or_else(|| Header::from_row(&header_cells));
            let records: Vec<Record> = rows
                .enumerate()
                .map(|(offset, row)| {
                    let index = self.header_row + offset;
                    decode_row(
                        &header,
                        &row,
                        Some(RowPosition {
                            index,
                            number: index + 1,
                        }),
                    )
                })
                .collect();
            debug!(fields = header.len(), records = records.len(), "loaded sheet");
            self.cache = Some(Snapshot { header, records });
        }
        Ok(self.cache.as_ref().expect("Cache filled above"))
    }
}
