//! Workbook access for the master-data compiler.
//!
//! A workbook is opened through a [`WorkbookReader`] backend, read one sheet at
//! a time into an immutable [`SheetData`] snapshot, and queried through the
//! absence-tolerant accessors on that snapshot.

pub mod backends;
pub mod discover;
pub mod error;
pub mod sheet;
pub mod traits;

#[cfg(feature = "calamine")]
pub use backends::CalamineAdapter;
#[cfg(feature = "json")]
pub use backends::JsonAdapter;
pub use discover::{AnyWorkbook, WorkbookFormat, list_workbooks, open_workbook};
pub use error::IoError;
pub use sheet::SheetData;
pub use traits::WorkbookReader;

// Re-export for convenience
pub use sheetmaster_common::{CellRef, CellValue};
