//! In-memory implementation of the grid seam.
//!
//! [`MemorySheet`] stores cells in a ragged row-major vector behind a shared
//! handle, so a sheet can stay observable from a test or an embedding host
//! while a mapper owns a clone of the handle and mutates it. The core runs
//! single-threaded against one sheet, so the handle is `Rc`-based rather
//! than locked.
use crate::grid::value::Value;
use crate::grid::Grid;
use crate::grid::GridError;
use crate::grid::Workbook;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// One in-memory sheet behind a cloneable shared handle.
#[derive(Clone, Default)]
pub struct MemorySheet {
    cells: Rc<RefCell<Vec<Vec<Value>>>>,
}

impl MemorySheet {
    /// Creates an empty sheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sheet seeded with the given rows.
    pub fn with_rows(rows: Vec<Vec<Value>>) -> Self {
        Self {
            cells: Rc::new(RefCell::new(rows)),
        }
    }

    /// Returns a clone of the raw cell store, ragged, without padding.
    pub fn raw_rows(&self) -> Vec<Vec<Value>> {
        self.cells.borrow().clone()
    }

    /// Ensures the store covers the given one-based cell position.
    fn grow_to(&self, row: usize, col: usize) {
        let mut cells = self.cells.borrow_mut();
        while cells.len() < row {
            cells.push(Vec::new());
        }
        let stored = &mut cells[row - 1];
        while stored.len() < col {
            stored.push(Value::Empty);
        }
    }

    /// Rejects zero coordinates, which cannot exist in one-based addressing.
    fn check_origin(row: usize, col: usize) -> Result<(), GridError> {
        if row == 0 || col == 0 {
            return Err(GridError::OutOfBounds {
                reference: super::reference::cell_reference(row, col),
            });
        }
        Ok(())
    }
}

impl Grid for MemorySheet {
    fn read_all(&self) -> Result<Vec<Vec<Value>>, GridError> {
        // Snapshot of the data rectangle, padded out to the widest column
        // the way spreadsheet hosts return their data range.
        let rows = self.last_row();
        let cols = self.last_col();
        let cells = self.cells.borrow();
        let mut table = Vec::with_capacity(rows);
        for row in 0..rows {
            let stored = cells.get(row).map(Vec::as_slice).unwrap_or(&[]);
            let mut record = Vec::with_capacity(cols);
            for col in 0..cols {
                record.push(stored.get(col).cloned().unwrap_or(Value::Empty));
            }
            table.push(record);
        }
        Ok(table)
    }

    fn append_row(&mut self, row: &[Value]) -> Result<(), GridError> {
        self.cells.borrow_mut().push(row.to_vec());
        Ok(())
    }

    fn write_cell(&mut self, row: usize, col: usize, value: Value) -> Result<(), GridError> {
        Self::check_origin(row, col)?;
        self.grow_to(row, col);
        self.cells.borrow_mut()[row - 1][col - 1] = value;
        Ok(())
    }

    fn write_block(&mut self, row: usize, col: usize, rows: &[Vec<Value>]) -> Result<(), GridError> {
        Self::check_origin(row, col)?;
        for (offset, values) in rows.iter().enumerate() {
            if !values.is_empty() {
                self.grow_to(row + offset, col + values.len() - 1);
            }
            let mut cells = self.cells.borrow_mut();
            for (index, value) in values.iter().enumerate() {
                cells[row + offset - 1][col + index - 1] = value.clone();
            }
        }
        Ok(())
    }

    fn clear_block(
        &mut self,
        row: usize,
        col: usize,
        row_count: usize,
        col_count: usize,
    ) -> Result<(), GridError> {
        Self::check_origin(row, col)?;
        let mut cells = self.cells.borrow_mut();
        for stored in cells.iter_mut().skip(row - 1).take(row_count) {
            for value in stored.iter_mut().skip(col - 1).take(col_count) {
                *value = Value::Empty;
            }
        }
        Ok(())
    }

    fn last_row(&self) -> usize {
        let cells = self.cells.borrow();
        cells
            .iter()
            .rposition(|row| row.iter().any(|value| !value.is_empty()))
            .map(|index| index + 1)
            .unwrap_or(0)
    }

    fn last_col(&self) -> usize {
        let cells = self.cells.borrow();
        cells
            .iter()
            .filter_map(|row| row.iter().rposition(|value| !value.is_empty()))
            .map(|index| index + 1)
            .max()
            .unwrap_or(0)
    }
}

/// A named collection of in-memory sheets.
#[derive(Default)]
pub struct MemoryWorkbook {
    sheets: HashMap<String, MemorySheet>,
}

impl MemoryWorkbook {
    /// Creates an empty workbook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sheet seeded with the given rows, replacing any previous sheet
    /// of the same name. Returns a handle to the new sheet.
    pub fn add_sheet(&mut self, name: &str, rows: Vec<Vec<Value>>) -> MemorySheet {
        let sheet = MemorySheet::with_rows(rows);
        self.sheets.insert(name.to_owned(), sheet.clone());
        sheet
    }
}

impl Workbook for MemoryWorkbook {
    type Sheet = MemorySheet;

    fn resolve(&self, name: &str) -> Result<MemorySheet, GridError> {
        self.sheets
            .get(name)
            .cloned()
            .ok_or_else(|| GridError::SheetNotFound {
                name: name.to_owned(),
            })
    }
}
