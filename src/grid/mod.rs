//! # Grid I/O Module
//!
//! This module defines the seam between the record layers and whatever host
//! actually stores the cells. A host backend (an in-memory store, a
//! spreadsheet service client) implements [`Grid`] for one sheet of cells
//! and [`Workbook`] for resolving sheets by name. All addressing on this
//! seam is one-based in both row and column, matching spreadsheet
//! convention.
use crate::grid::value::Value;
use thiserror::Error;

pub mod memory;
pub(crate) mod reference;
pub mod value;

/// Errors raised on the grid I/O seam.
#[derive(Error, Debug)]
pub enum GridError {
    /// Requested sheet name does not resolve to a sheet
    #[error("Sheet '{name}' not found")]
    SheetNotFound { name: String },

    /// A targeted write or clear addressed a cell outside the grid
    #[error("Cell reference '{reference}' is out of bounds")]
    OutOfBounds { reference: String },

    /// Backend-specific failure surfaced by a host adapter
    #[error("Grid backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

/// One sheet of cells, row-major, one-based addressing.
///
/// Reads are snapshots: [`Grid::read_all`] returns the full rectangular data
/// block in one call and implementations must not hand out live views.
/// Writes are blocking and unbuffered; a write either completes or raises,
/// and the caller owns any retry policy.
pub trait Grid {
    /// Reads the full rectangular data snapshot, row-major.
    fn read_all(&self) -> Result<Vec<Vec<Value>>, GridError>;

    /// Appends one row after the current last row.
    fn append_row(&mut self, row: &[Value]) -> Result<(), GridError>;

    /// Writes a single cell at a one-based row/column position.
    fn write_cell(&mut self, row: usize, col: usize, value: Value) -> Result<(), GridError>;

    /// Writes a rectangular block with its top-left cell at the given
    /// one-based position.
    fn write_block(&mut self, row: usize, col: usize, rows: &[Vec<Value>]) -> Result<(), GridError>;

    /// Clears a rectangular block of cells to empty.
    fn clear_block(
        &mut self,
        row: usize,
        col: usize,
        row_count: usize,
        col_count: usize,
    ) -> Result<(), GridError>;

    /// Returns the one-based number of the last row holding data, 0 when empty.
    fn last_row(&self) -> usize;

    /// Returns the one-based number of the last column holding data, 0 when empty.
    fn last_col(&self) -> usize;
}

/// A collection of named sheets.
pub trait Workbook {
    /// The sheet handle type this workbook resolves to.
    type Sheet: Grid;

    /// Resolves a sheet by name.
    ///
    /// Fails with [`GridError::SheetNotFound`] when the name does not
    /// resolve; the record layers surface this at construction.
    fn resolve(&self, name: &str) -> Result<Self::Sheet, GridError>;
}
