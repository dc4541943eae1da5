//! Picking a backend for a file and finding workbooks in a folder.

use crate::IoError;
use crate::sheet::SheetData;
use crate::traits::WorkbookReader;
use std::path::{Path, PathBuf};

#[cfg(feature = "calamine")]
use crate::backends::CalamineAdapter;
#[cfg(feature = "json")]
use crate::backends::JsonAdapter;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WorkbookFormat {
    Xlsx,
    Xlsm,
    Xlsb,
    Xls,
    Ods,
    Json,
}

impl WorkbookFormat {
    /// Format implied by the file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "xlsx" => Some(Self::Xlsx),
            "xlsm" => Some(Self::Xlsm),
            "xlsb" => Some(Self::Xlsb),
            "xls" => Some(Self::Xls),
            "ods" => Some(Self::Ods),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Whether this build carries a backend able to read the format.
    pub fn is_enabled(self) -> bool {
        match self {
            Self::Json => cfg!(feature = "json"),
            _ => cfg!(feature = "calamine"),
        }
    }
}

/// A workbook opened through whichever backend fits its format.
pub enum AnyWorkbook {
    #[cfg(feature = "calamine")]
    Calamine(CalamineAdapter),
    #[cfg(feature = "json")]
    Json(JsonAdapter),
}

impl WorkbookReader for AnyWorkbook {
    type Error = IoError;

    fn backend_name(&self) -> &'static str {
        match self {
            #[cfg(feature = "calamine")]
            AnyWorkbook::Calamine(inner) => inner.backend_name(),
            #[cfg(feature = "json")]
            AnyWorkbook::Json(inner) => inner.backend_name(),
        }
    }

    fn sheet_names(&self) -> Result<Vec<String>, Self::Error> {
        match self {
            #[cfg(feature = "calamine")]
            AnyWorkbook::Calamine(inner) => inner
                .sheet_names()
                .map_err(|e| IoError::from_backend("calamine", e)),
            #[cfg(feature = "json")]
            AnyWorkbook::Json(inner) => inner.sheet_names(),
        }
    }

    fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, Self::Error>
    where
        Self: Sized,
    {
        let path = path.as_ref();
        match WorkbookFormat::from_path(path) {
            #[cfg(feature = "json")]
            Some(WorkbookFormat::Json) => JsonAdapter::open_path(path)
                .map(AnyWorkbook::Json)
                .map_err(|e| IoError::open(path, e)),
            #[cfg(feature = "calamine")]
            Some(format) if format != WorkbookFormat::Json => CalamineAdapter::open_path(path)
                .map(AnyWorkbook::Calamine)
                .map_err(|e| IoError::open(path, e)),
            _ => Err(IoError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Only the JSON format can be read from memory.
    fn open_bytes(data: Vec<u8>) -> Result<Self, Self::Error>
    where
        Self: Sized,
    {
        #[cfg(feature = "json")]
        {
            JsonAdapter::open_bytes(data).map(AnyWorkbook::Json)
        }
        #[cfg(not(feature = "json"))]
        {
            let _ = data;
            Err(IoError::from_backend("any", "in-memory workbooks need the json feature"))
        }
    }

    fn read_sheet(&mut self, sheet: &str) -> Result<SheetData, Self::Error> {
        match self {
            #[cfg(feature = "calamine")]
            AnyWorkbook::Calamine(inner) => {
                let known = inner
                    .sheet_names()
                    .map_err(|e| IoError::from_backend("calamine", e))?;
                if !known.iter().any(|name| name == sheet) {
                    return Err(IoError::MissingSheet {
                        sheet: sheet.to_string(),
                    });
                }
                inner
                    .read_sheet(sheet)
                    .map_err(|e| IoError::from_backend("calamine", e))
            }
            #[cfg(feature = "json")]
            AnyWorkbook::Json(inner) => inner.read_sheet(sheet),
        }
    }
}

/// Open `path` with the backend its extension selects.
pub fn open_workbook(path: impl AsRef<Path>) -> Result<AnyWorkbook, IoError> {
    let path = path.as_ref();
    let workbook = AnyWorkbook::open_path(path)?;
    tracing::debug!(
        path = %path.display(),
        backend = workbook.backend_name(),
        "opened workbook"
    );
    Ok(workbook)
}

/// Workbook files directly inside `dir`, sorted by file name.
///
/// Files whose name contains `~` are editor lock or backup files and are
/// skipped, as are files with an extension no enabled backend reads.
pub fn list_workbooks(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, IoError> {
    let mut found = Vec::new();
    for entry in std::fs::read_dir(dir.as_ref())? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.contains('~') {
            tracing::trace!(file = name, "skipping lock file");
            continue;
        }
        match WorkbookFormat::from_path(&path) {
            Some(format) if format.is_enabled() => found.push(path),
            _ => {}
        }
    }
    found.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(found)
}
