//! Immutable sheet snapshot and the typed cell accessors built on it.
//!
//! Cells are stored sparsely by zero-based `(row, col)`. Every accessor treats
//! a missing row, a missing cell and an `Empty` cell the same way: the read
//! yields a neutral result and never fails.

use sheetmaster_common::{CellRef, CellValue};
use std::collections::BTreeMap;
use std::ops::Bound;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SheetData {
    pub name: String,
    pub cells: BTreeMap<(u32, u32), CellValue>,
    /// `(rows, cols)` as reported by the backend, when known.
    pub dimensions: Option<(u32, u32)>,
    pub hidden: bool,
}

impl SheetData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Build a sheet from `(row, col, value)` triples. Later duplicates win.
    pub fn from_cells<I, V>(name: impl Into<String>, cells: I) -> Self
    where
        I: IntoIterator<Item = (u32, u32, V)>,
        V: Into<CellValue>,
    {
        let mut sheet = Self::new(name);
        for (row, col, value) in cells {
            sheet.set(row, col, value);
        }
        sheet
    }

    /// Store a cell. Empty values remove the cell instead.
    pub fn set(&mut self, row: u32, col: u32, value: impl Into<CellValue>) {
        let value = value.into();
        if value == CellValue::Empty {
            self.cells.remove(&(row, col));
        } else {
            self.cells.insert((row, col), value);
        }
    }

    /// The cell at `(row, col)`, or `None` when the row or cell is absent.
    pub fn cell(&self, row: u32, col: u32) -> Option<&CellValue> {
        self.cells
            .get(&(row, col))
            .filter(|value| !matches!(value, CellValue::Empty))
    }

    /// String view of a cell.
    ///
    /// Text is returned as-is and booleans are stringified; anything else,
    /// including numbers and absent cells, reads as the empty string.
    pub fn cell_as_string(&self, row: u32, col: u32) -> String {
        match self.cell(row, col) {
            Some(CellValue::Text(s)) => s.clone(),
            Some(CellValue::Boolean(b)) => b.to_string(),
            _ => String::new(),
        }
    }

    /// Numeric payload of a number or integer cell.
    pub fn cell_as_number(&self, row: u32, col: u32) -> Option<f64> {
        self.cell(row, col).and_then(CellValue::as_f64)
    }

    pub fn cell_as_bool(&self, row: u32, col: u32) -> Option<bool> {
        self.cell(row, col).and_then(CellValue::as_bool)
    }

    /// Index of the last row holding any populated cell.
    pub fn last_row(&self) -> Option<u32> {
        self.cells.keys().next_back().map(|&(row, _)| row)
    }

    /// Index of the last populated column in `row`.
    pub fn last_col(&self, row: u32) -> Option<u32> {
        self.row_cells(row).last().map(|(col, _)| col)
    }

    /// Populated cells of one row, in column order.
    pub fn row_cells(&self, row: u32) -> impl Iterator<Item = (u32, &CellValue)> + '_ {
        self.cells
            .range((Bound::Included((row, 0)), Bound::Included((row, u32::MAX))))
            .filter(|(_, value)| !matches!(value, CellValue::Empty))
            .map(|(&(_, col), value)| (col, value))
    }

    /// Populated cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellRef, &CellValue)> + '_ {
        self.cells
            .iter()
            .filter(|(_, value)| !matches!(value, CellValue::Empty))
            .map(|(&(row, col), value)| (CellRef::new(row, col), value))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}
