use crate::schema::ANCHOR;
use sheetmaster_common::CellRef;
use sheetmaster_io::{IoError, SheetData, WorkbookReader, open_workbook};
use std::path::Path;

/// One anchored sheet, handed to the scan callback.
#[derive(Clone, Copy, Debug)]
pub struct ScanHit<'a> {
    pub workbook: &'a Path,
    pub sheet: &'a SheetData,
    pub anchor: CellRef,
}

/// First `@` text cell in row-major order.
pub fn find_anchor(sheet: &SheetData) -> Option<CellRef> {
    sheet
        .iter()
        .find(|(_, value)| value.as_text() == Some(ANCHOR))
        .map(|(at, _)| at)
}

/// Scan every sheet of an opened workbook, in workbook order.
///
/// Returns the number of anchored sheets. An error from `on_found` stops the
/// scan and is returned as-is.
pub fn scan_workbook<R, E, F>(workbook: &Path, reader: &mut R, on_found: &mut F) -> Result<usize, E>
where
    R: WorkbookReader<Error = IoError>,
    E: From<IoError>,
    F: FnMut(ScanHit<'_>) -> Result<(), E>,
{
    let mut found = 0;
    let names = reader.sheet_names().map_err(|e| e.in_workbook(workbook))?;
    for name in names {
        let sheet = reader
            .read_sheet(&name)
            .map_err(|e| e.in_workbook(workbook))?;
        let Some(anchor) = find_anchor(&sheet) else {
            tracing::debug!(sheet = %name, "no anchor on sheet");
            continue;
        };
        tracing::debug!(sheet = %name, anchor = %anchor, "anchor found");
        found += 1;
        on_found(ScanHit {
            workbook,
            sheet: &sheet,
            anchor,
        })?;
    }
    Ok(found)
}

/// Open, scan and close each workbook in turn.
pub fn scan<P, E, F>(workbooks: &[P], mut on_found: F) -> Result<(), E>
where
    P: AsRef<Path>,
    E: From<IoError>,
    F: FnMut(ScanHit<'_>) -> Result<(), E>,
{
    for path in workbooks {
        let path = path.as_ref();
        let _span = tracing::debug_span!("scan", workbook = %path.display()).entered();
        let mut reader = open_workbook(path)?;
        let found = scan_workbook(path, &mut reader, &mut on_found)?;
        tracing::debug!(masters = found, "workbook scanned");
    }
    Ok(())
}
