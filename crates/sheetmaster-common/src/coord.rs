//! Zero-based cell coordinates.
//!
//! Every backend normalizes to `(row, col)` starting at `(0, 0)` for the
//! top-left cell. A1 notation is only produced for diagnostics.

use core::fmt;

/// Convert a zero-based column index to spreadsheet letters (`0 -> A`, `26 -> AA`).
pub fn col_to_letters(col: u32) -> String {
    let mut n = col as u64 + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push(b'A' + rem);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Zero-based cell position within one sheet.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct CellRef {
    pub row: u32,
    pub col: u32,
}

impl CellRef {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// A1-style label (`(0, 0)` is `A1`).
    pub fn to_a1(self) -> String {
        format!("{}{}", col_to_letters(self.col), self.row + 1)
    }
}

impl From<(u32, u32)> for CellRef {
    fn from((row, col): (u32, u32)) -> Self {
        Self { row, col }
    }
}

impl From<CellRef> for (u32, u32) {
    fn from(cell: CellRef) -> Self {
        (cell.row, cell.col)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1())
    }
}
