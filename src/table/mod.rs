//! # Keyed Table Module
//!
//! Snapshot access to one sheet: the data body is read once at
//! construction, decoded into typed records and indexed by a primary
//! identifier. All mutation happens in memory; the grid is only touched
//! again by an explicit bulk [`KeyedTable::save`], which rewrites the whole
//! data block. Between construction and save, the index and the persisted
//! grid may diverge by design.
use crate::error::Result;
use crate::error::ResultMessage;
use crate::grid::value::Value;
use crate::grid::Grid;
use crate::grid::Workbook;
use crate::record::codec::DecodePolicy;
use crate::record::codec::RowCodec;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::Display;
use thiserror::Error;
use tracing::debug;

/// Errors raised while loading or saving a keyed table.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Row {row} did not decode to a record")]
    Decode { row: usize },
}

/// Primary identifier of a keyed record, text or number.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Id {
    Number(i64),
    Text(String),
}

impl Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Id::Number(value) => write!(f, "{}", value),
            Id::Text(value) => write!(f, "{}", value),
        }
    }
}

impl From<i64> for Id {
    fn from(value: i64) -> Self {
        Id::Number(value)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Id::Text(value.to_owned())
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Id::Text(value)
    }
}

/// A record type exposing its unique identifier.
pub trait Keyed {
    fn id(&self) -> Id;
}

/// Field-wise overlay of one record onto another, for
/// [`KeyedTable::upsert_merge`].
///
/// The implementation decides which fields of `patch` count as present;
/// typically `Option` fields overlay only when `Some`.
pub trait Merge {
    fn merge(&mut self, patch: Self);
}

/// Construction options for a [`KeyedTable`].
#[derive(Copy, Clone, Debug)]
pub struct TableOptions {
    /// One-based row number of the first data row (default 1). Rows above it
    /// are never read, cleared or written.
    pub first_row: usize,
    /// Treatment of rows the decoder returns nothing for.
    pub decode_policy: DecodePolicy,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            first_row: 1,
            decode_policy: DecodePolicy::default(),
        }
    }
}

/// An id-keyed in-memory table over one sheet, persisted in bulk.
///
/// The index preserves order explicitly: insertion order as loaded, until
/// [`KeyedTable::sort_by`] rebuilds it. [`KeyedTable::find_all`] and
/// [`KeyedTable::save`] both follow that order.
pub struct KeyedTable<T: Keyed, G: Grid> {
    grid: G,
    first_row: usize,
    codec: RowCodec<T>,
    order: Vec<Id>,
    entries: HashMap<Id, T>,
}

impl<T: Keyed, G: Grid> KeyedTable<T, G> {
    /// Reads the data body of a sheet handle and builds the index, with
    /// default options.
    pub fn new(grid: G, codec: RowCodec<T>) -> Result<Self> {
        Self::with_options(grid, codec, TableOptions::default())
    }

    /// Reads the data body of a sheet handle and builds the index.
    pub fn with_options(grid: G, codec: RowCodec<T>, options: TableOptions) -> Result<Self> {
        let first_row = options.first_row.max(1);
        let mut table = Self {
            grid,
            first_row,
            codec,
            order: Vec::new(),
            entries: HashMap::new(),
        };
        let rows = table.grid.read_all().with_prefix("Load keyed table failed")?;
        for (offset, row) in rows.into_iter().skip(first_row - 1).enumerate() {
            let number = first_row + offset;
            match table.codec.decode(&row) {
                Some(record) => table.insert(record),
                None => match options.decode_policy {
                    DecodePolicy::Filter => {
                        debug!(row = number, "skipped undecodable row");
                    }
                    DecodePolicy::Strict => {
                        return Err(TableError::Decode { row: number }.into());
                    }
                },
            }
        }
        debug!(records = table.order.len(), "loaded keyed table");
        Ok(table)
    }

    /// Resolves a sheet by name and builds a table over it with default
    /// options. Fails when the name does not resolve.
    pub fn open<W>(workbook: &W, name: &str, codec: RowCodec<T>) -> Result<Self>
    where
        W: Workbook<Sheet = G>,
    {
        Self::open_with_options(workbook, name, codec, TableOptions::default())
    }

    /// Resolves a sheet by name and builds a table over it.
    pub fn open_with_options<W>(
        workbook: &W,
        name: &str,
        codec: RowCodec<T>,
        options: TableOptions,
    ) -> Result<Self>
    where
        W: Workbook<Sheet = G>,
    {
        Self::with_options(workbook.resolve(name)?, codec, options)
    }

    /// Inserts or wholesale replaces the entry for the record's id. An
    /// existing id keeps its position in the order; a new id appends.
    pub fn upsert_replace(&mut self, record: T) {
        self.insert(record);
    }

    /// Removes the entry for an id. Absent ids are a no-op, not an error.
    pub fn delete(&mut self, id: &Id) {
        if self.entries.remove(id).is_some() {
            self.order.retain(|key| key != id);
        }
    }

    /// Returns the entry for an id, if present.
    pub fn find(&self, id: &Id) -> Option<&T> {
        self.entries.get(id)
    }

    /// Returns all entries in index order.
    pub fn find_all(&self) -> Vec<&T> {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id))
            .collect()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true when the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Sorts the entries and rebuilds the index, so iteration and save order
    /// follow the comparator from here on.
    pub fn sort_by(&mut self, mut compare: impl FnMut(&T, &T) -> Ordering) {
        let mut records: Vec<T> = self
            .order
            .iter()
            .filter_map(|id| self.entries.remove(id))
            .collect();
        records.sort_by(&mut compare);
        self.order.clear();
        for record in records {
            self.insert(record);
        }
    }

    /// Encodes all entries in index order and rewrites the data block:
    /// clears the previously-occupied rows from the first data row down,
    /// then writes the new rows in one block.
    ///
    /// With zero entries there is no encoded row to take a width from, so
    /// the call degrades to clearing the existing block and writing nothing.
    pub fn save(&mut self) -> Result<()> {
        let rows: Vec<Vec<Value>> = self
            .order
            .iter()
            .filter_map(|id| self.entries.get(id))
            .map(|record| self.codec.encode(record))
            .collect();
        let last_row = self.grid.last_row();
        let width = match rows.first() {
            Some(row) => row.len(),
            None => self.grid.last_col(),
        };
        if last_row >= self.first_row && width > 0 {
            self.grid
                .clear_block(self.first_row, 1, last_row - self.first_row + 1, width)
                .with_prefix("Save keyed table failed")?;
        }
        if !rows.is_empty() {
            self.grid
                .write_block(self.first_row, 1, &rows)
                .with_prefix("Save keyed table failed")?;
        }
        debug!(records = rows.len(), "saved keyed table");
        Ok(())
    }

    /// Inserts a record, keeping the existing order position of a known id
    /// and appending an unknown one.
    fn insert(&mut self, record: T) {
        let id = record.id();
        if self.entries.insert(id.clone(), record).is_none() {
            self.order.push(id);
        }
    }
}

impl<T: Keyed + Merge, G: Grid> KeyedTable<T, G> {
    /// Overlays a record onto the existing entry for its id via
    /// [`Merge::merge`], or inserts it when the id is absent.
    pub fn upsert_merge(&mut self, record: T) {
        let id = record.id();
        if let Some(existing) = self.entries.get_mut(&id) {
            existing.merge(record);
        } else {
            self.insert(record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SheetMapperError;
    use crate::grid::memory::MemorySheet;
    use crate::grid::memory::MemoryWorkbook;

    #[derive(Clone, Debug, PartialEq)]
    struct Player {
        id: i64,
        name: Option<String>,
        score: Option<f64>,
    }

    impl Player {
        fn new(id: i64, name: &str, score: f64) -> Self {
            Self {
                id,
                name: Some(name.to_owned()),
                score: Some(score),
            }
        }
    }

    impl Keyed for Player {
        fn id(&self) -> Id {
            Id::Number(self.id)
        }
    }

    impl Merge for Player {
        fn merge(&mut self, patch: Player) {
            if patch.name.is_some() {
                self.name = patch.name;
            }
            if patch.score.is_some() {
                self.score = patch.score;
            }
        }
    }

    fn codec() -> RowCodec<Player> {
        RowCodec::new(
            |player: &Player| {
                vec![
                    Value::from(player.id),
                    player.name.clone().map(Value::from).unwrap_or_default(),
                    player.score.map(Value::from).unwrap_or_default(),
                ]
            },
            |row: &[Value]| {
                Some(Player {
                    id: row.first()?.get_bigint()?,
                    name: row.get(1).and_then(|value| value.get_text()).map(str::to_owned),
                    score: row.get(2).and_then(Value::get_number),
                })
            },
        )
    }

    fn players_sheet() -> MemorySheet {
        MemorySheet::with_rows(vec![
            vec![Value::from(1i64), Value::from("a"), Value::from(10i64)],
            vec![Value::from(2i64), Value::from("b"), Value::from(20i64)],
            vec![Value::from(3i64), Value::from("c"), Value::from(30i64)],
        ])
    }

    #[test]
    fn construction_indexes_the_body() {
        let table = KeyedTable::new(players_sheet(), codec()).expect("load");
        assert_eq!(table.len(), 3);
        let player = table.find(&Id::Number(2)).expect("entry");
        assert_eq!(player.name.as_deref(), Some("b"));
        assert!(table.find(&Id::Number(9)).is_none());
    }

    #[test]
    fn first_row_offset_skips_a_header() {
        let sheet = MemorySheet::with_rows(vec![
            vec![Value::from("id"), Value::from("name"), Value::from("score")],
            vec![Value::from(1i64), Value::from("a"), Value::from(10i64)],
        ]);
        let options = TableOptions {
            first_row: 2,
            ..TableOptions::default()
        };
        let table = KeyedTable::with_options(sheet, codec(), options).expect("load");
        assert_eq!(table.len(), 1);
        assert!(table.find(&Id::Number(1)).is_some());
    }

    #[test]
    fn filter_policy_drops_undecodable_rows() {
        let sheet = MemorySheet::with_rows(vec![
            vec![Value::from(1i64), Value::from("a"), Value::from(10i64)],
            vec![Value::from("oops"), Value::from("b"), Value::from(20i64)],
        ]);
        let table = KeyedTable::new(sheet, codec()).expect("load");
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn strict_policy_fails_on_undecodable_rows() {
        let sheet = MemorySheet::with_rows(vec![
            vec![Value::from(1i64), Value::from("a"), Value::from(10i64)],
            vec![Value::from("oops"), Value::from("b"), Value::from(20i64)],
        ]);
        let options = TableOptions {
            decode_policy: DecodePolicy::Strict,
            ..TableOptions::default()
        };
        let result = KeyedTable::with_options(sheet, codec(), options);
        assert!(matches!(
            result,
            Err(SheetMapperError::TableError(TableError::Decode { row: 2 }))
        ));
    }

    #[test]
    fn duplicate_ids_keep_first_position_last_value() {
        let sheet = MemorySheet::with_rows(vec![
            vec![Value::from(1i64), Value::from("a"), Value::from(10i64)],
            vec![Value::from(2i64), Value::from("b"), Value::from(20i64)],
            vec![Value::from(1i64), Value::from("late"), Value::from(11i64)],
        ]);
        let table = KeyedTable::new(sheet, codec()).expect("load");
        assert_eq!(table.len(), 2);
        let all = table.find_all();
        assert_eq!(all[0].id, 1);
        assert_eq!(all[0].name.as_deref(), Some("late"));
        assert_eq!(all[1].id, 2);
    }

    #[test]
    fn upsert_replace_and_find() {
        let mut table = KeyedTable::new(players_sheet(), codec()).expect("load");
        table.upsert_replace(Player::new(4, "d", 40.0));
        assert_eq!(table.len(), 4);
        assert_eq!(table.find_all()[3].id, 4);

        table.upsert_replace(Player {
            id: 2,
            name: Some("b2".to_owned()),
            score: None,
        });
        let player = table.find(&Id::Number(2)).expect("entry");
        // Replace is wholesale, not a field overlay.
        assert_eq!(player.score, None);
        assert_eq!(table.find_all()[1].id, 2);
    }

    #[test]
    fn upsert_merge_overlays_present_fields() {
        let mut table = KeyedTable::new(players_sheet(), codec()).expect("load");
        table.upsert_merge(Player {
            id: 2,
            name: None,
            score: Some(99.0),
        });
        let player = table.find(&Id::Number(2)).expect("entry");
        assert_eq!(player.name.as_deref(), Some("b"));
        assert_eq!(player.score, Some(99.0));

        table.upsert_merge(Player::new(5, "e", 50.0));
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn delete_is_idempotent() {
        let mut table = KeyedTable::new(players_sheet(), codec()).expect("load");
        table.delete(&Id::Number(2));
        assert_eq!(table.len(), 2);
        assert!(table.find(&Id::Number(2)).is_none());
        table.delete(&Id::Number(2));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn sort_orders_iteration_and_save() {
        let sheet = players_sheet();
        let mut table = KeyedTable::new(sheet.clone(), codec()).expect("load");
        table.sort_by(|a, b| b.score.partial_cmp(&a.score).expect("comparable scores"));

        let ids: Vec<i64> = table.find_all().iter().map(|player| player.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);

        table.save().expect("save");
        let rows = sheet.raw_rows();
        assert_eq!(rows[0][0], Value::from(3i64));
        assert_eq!(rows[2][0], Value::from(1i64));
    }

    #[test]
    fn save_rewrites_the_block_and_clears_leftovers() {
        let sheet = players_sheet();
        let mut table = KeyedTable::new(sheet.clone(), codec()).expect("load");
        table.delete(&Id::Number(1));
        table.upsert_replace(Player {
            id: 2,
            name: Some("b2".to_owned()),
            score: Some(21.0),
        });
        table.save().expect("save");

        // Two rows remain; the third old row is cleared, not left behind.
        assert_eq!(sheet.last_row(), 2);
        let rows = sheet.raw_rows();
        assert_eq!(rows[0][0], Value::from(2i64));
        assert_eq!(rows[0][1], Value::from("b2"));
        assert_eq!(rows[1][0], Value::from(3i64));
    }

    #[test]
    fn save_preserves_rows_above_first_row() {
        let sheet = MemorySheet::with_rows(vec![
            vec![Value::from("id"), Value::from("name"), Value::from("score")],
            vec![Value::from(1i64), Value::from("a"), Value::from(10i64)],
            vec![Value::from(2i64), Value::from("b"), Value::from(20i64)],
        ]);
        let options = TableOptions {
            first_row: 2,
            ..TableOptions::default()
        };
        let mut table =
            KeyedTable::with_options(sheet.clone(), codec(), options).expect("load");
        table.delete(&Id::Number(1));
        table.save().expect("save");

        let rows = sheet.raw_rows();
        assert_eq!(rows[0][0], Value::from("id"));
        assert_eq!(rows[1][0], Value::from(2i64));
        assert_eq!(sheet.last_row(), 2);
    }

    #[test]
    fn empty_save_clears_and_writes_nothing() {
        let sheet = players_sheet();
        let mut table = KeyedTable::new(sheet.clone(), codec()).expect("load");
        for id in [1, 2, 3] {
            table.delete(&Id::Number(id));
        }
        table.save().expect("save");
        assert_eq!(sheet.last_row(), 0);
    }

    #[test]
    fn empty_grid_body_loads_and_saves_empty() {
        let mut table = KeyedTable::new(MemorySheet::new(), codec()).expect("load");
        assert!(table.is_empty());
        assert!(table.find_all().is_empty());
        table.save().expect("save");
    }

    #[test]
    fn open_resolves_by_name() {
        let mut workbook = MemoryWorkbook::new();
        workbook.add_sheet("players", players_sheet().raw_rows());

        let table = KeyedTable::open(&workbook, "players", codec()).expect("open");
        assert_eq!(table.len(), 3);

        assert!(KeyedTable::<Player, _>::open(&workbook, "missing", codec()).is_err());
    }
}
