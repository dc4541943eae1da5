#![cfg(feature = "calamine")]

use crate::sheet::SheetData;
use crate::traits::WorkbookReader;
use sheetmaster_common::CellValue;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{Data, Range, Reader, Sheets, open_workbook_auto};

/// Reader for xlsx/xlsm/xlsb/xls/ods files.
pub struct CalamineAdapter {
    workbook: Sheets<BufReader<File>>,
}

impl CalamineAdapter {
    fn convert_value(data: &Data) -> CellValue {
        match data {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Int(*i),
            Data::Bool(b) => CellValue::Boolean(*b),
            Data::Error(e) => CellValue::Error(e.to_string()),
            // Keep the serial number; the master data types have no date kind.
            Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
            Data::DateTimeIso(s) => CellValue::Text(s.clone()),
            Data::DurationIso(s) => CellValue::Text(s.clone()),
        }
    }

    fn range_to_cells(range: &Range<Data>) -> BTreeMap<(u32, u32), CellValue> {
        let mut cells = BTreeMap::new();

        // used_cells() positions are relative to the range start
        let (start_row, start_col) = range.start().unwrap_or_default();

        for (row, col, val) in range.used_cells() {
            let value = match val {
                Data::Empty => continue,
                Data::String(s) if s.is_empty() => continue,
                _ => Self::convert_value(val),
            };
            cells.insert((start_row + row as u32, start_col + col as u32), value);
        }

        cells
    }
}

impl WorkbookReader for CalamineAdapter {
    type Error = calamine::Error;

    fn backend_name(&self) -> &'static str {
        "calamine"
    }

    fn sheet_names(&self) -> Result<Vec<String>, Self::Error> {
        Ok(self.workbook.sheet_names())
    }

    fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, Self::Error>
    where
        Self: Sized,
    {
        let workbook = open_workbook_auto(path)?;
        Ok(Self { workbook })
    }

    fn open_bytes(_data: Vec<u8>) -> Result<Self, Self::Error>
    where
        Self: Sized,
    {
        Err(calamine::Error::Io(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "open_bytes not supported for CalamineAdapter",
        )))
    }

    fn read_sheet(&mut self, sheet: &str) -> Result<SheetData, Self::Error> {
        let range = self.workbook.worksheet_range(sheet)?;
        let dims = (range.height() as u32, range.width() as u32);
        let cells = Self::range_to_cells(&range);

        Ok(SheetData {
            name: sheet.to_string(),
            cells,
            dimensions: Some(dims),
            hidden: false,
        })
    }
}
