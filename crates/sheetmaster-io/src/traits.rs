use crate::sheet::SheetData;
use std::path::Path;

/// Read-only access to a workbook's sheets.
///
/// Backends load a whole sheet at a time; callers read the sheets they need
/// and drop the reader as soon as they are done with the file.
pub trait WorkbookReader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Short backend label used in diagnostics.
    fn backend_name(&self) -> &'static str;

    /// Sheet names in workbook order.
    fn sheet_names(&self) -> Result<Vec<String>, Self::Error>;

    fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, Self::Error>
    where
        Self: Sized;

    fn open_bytes(data: Vec<u8>) -> Result<Self, Self::Error>
    where
        Self: Sized;

    fn read_sheet(&mut self, sheet: &str) -> Result<SheetData, Self::Error>;
}
