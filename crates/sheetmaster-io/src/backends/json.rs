//! Plain-JSON workbook format.
//!
//! Handy for fixtures and for teams that keep master sheets under version
//! control as text. Sheets keep their declared order:
//!
//! ```json
//! {
//!   "version": 1,
//!   "sheets": [
//!     { "name": "Items", "cells": [
//!       { "row": 0, "col": 0, "value": { "type": "Text", "value": "ItemMaster" } }
//!     ] }
//!   ]
//! }
//! ```

use crate::IoError;
use crate::sheet::SheetData;
use crate::traits::WorkbookReader;
use serde::{Deserialize, Serialize};
use sheetmaster_common::CellValue;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone)]
struct JsonWorkbook {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    sheets: Vec<JsonSheet>,
}

impl Default for JsonWorkbook {
    fn default() -> Self {
        Self {
            version: default_version(),
            sheets: Vec::new(),
        }
    }
}

fn default_version() -> u32 {
    1
}

#[derive(Serialize, Deserialize, Debug, Default, Clone)]
struct JsonSheet {
    name: String,
    #[serde(default)]
    cells: Vec<JsonCell>,
    #[serde(default)]
    dimensions: Option<(u32, u32)>,
    #[serde(default)]
    hidden: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct JsonCell {
    row: u32,
    col: u32,
    #[serde(default)]
    value: Option<JsonValue>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type", content = "value")]
enum JsonValue {
    Int(i64),
    Number(f64),
    Text(String),
    Boolean(bool),
    Empty,
    Error(String),
}

fn json_to_cell(v: &JsonValue) -> CellValue {
    match v {
        JsonValue::Int(i) => CellValue::Int(*i),
        JsonValue::Number(n) => CellValue::Number(*n),
        JsonValue::Text(s) => CellValue::Text(s.clone()),
        JsonValue::Boolean(b) => CellValue::Boolean(*b),
        JsonValue::Empty => CellValue::Empty,
        JsonValue::Error(e) => CellValue::Error(e.clone()),
    }
}

fn cell_to_json(v: &CellValue) -> JsonValue {
    match v {
        CellValue::Int(i) => JsonValue::Int(*i),
        CellValue::Number(n) => JsonValue::Number(*n),
        CellValue::Text(s) => JsonValue::Text(s.clone()),
        CellValue::Boolean(b) => JsonValue::Boolean(*b),
        CellValue::Empty => JsonValue::Empty,
        CellValue::Error(e) => JsonValue::Error(e.clone()),
    }
}

#[derive(Default)]
pub struct JsonAdapter {
    data: JsonWorkbook,
}

impl JsonAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    fn to_sheet_data(js: &JsonSheet) -> SheetData {
        let mut sheet = SheetData::new(js.name.clone());
        for c in &js.cells {
            if let Some(value) = &c.value {
                sheet.set(c.row, c.col, json_to_cell(value));
            }
        }
        sheet.dimensions = js.dimensions;
        sheet.hidden = js.hidden;
        sheet
    }

    fn ensure_sheet_mut(&mut self, name: &str) -> &mut JsonSheet {
        let idx = match self.data.sheets.iter().position(|s| s.name == name) {
            Some(idx) => idx,
            None => {
                self.data.sheets.push(JsonSheet {
                    name: name.to_string(),
                    ..JsonSheet::default()
                });
                self.data.sheets.len() - 1
            }
        };
        &mut self.data.sheets[idx]
    }

    /// Append an empty sheet, or leave an existing one untouched.
    pub fn add_sheet(&mut self, name: &str) {
        self.ensure_sheet_mut(name);
    }

    pub fn set_cell(&mut self, sheet: &str, row: u32, col: u32, value: impl Into<CellValue>) {
        let value = cell_to_json(&value.into());
        let js = self.ensure_sheet_mut(sheet);
        if let Some(cell) = js.cells.iter_mut().find(|c| c.row == row && c.col == col) {
            cell.value = Some(value);
        } else {
            js.cells.push(JsonCell {
                row,
                col,
                value: Some(value),
            });
        }
    }

    /// Replace a sheet's contents with a snapshot.
    pub fn put_sheet(&mut self, sheet: &SheetData) {
        let js = self.ensure_sheet_mut(&sheet.name);
        js.cells = sheet
            .cells
            .iter()
            .map(|(&(row, col), value)| JsonCell {
                row,
                col,
                value: Some(cell_to_json(value)),
            })
            .collect();
        js.dimensions = sheet.dimensions;
        js.hidden = sheet.hidden;
    }

    pub fn to_json_string(&self) -> Result<String, IoError> {
        Ok(serde_json::to_string_pretty(&self.data)?)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), IoError> {
        let mut file = File::create(path.as_ref())?;
        file.write_all(self.to_json_string()?.as_bytes())?;
        Ok(())
    }
}

impl WorkbookReader for JsonAdapter {
    type Error = IoError;

    fn backend_name(&self) -> &'static str {
        "json"
    }

    fn sheet_names(&self) -> Result<Vec<String>, Self::Error> {
        Ok(self.data.sheets.iter().map(|s| s.name.clone()).collect())
    }

    fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, Self::Error>
    where
        Self: Sized,
    {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        let data: JsonWorkbook = serde_json::from_reader(reader)?;
        Ok(JsonAdapter { data })
    }

    fn open_bytes(bytes: Vec<u8>) -> Result<Self, Self::Error>
    where
        Self: Sized,
    {
        let data: JsonWorkbook = serde_json::from_slice(&bytes)?;
        Ok(JsonAdapter { data })
    }

    fn read_sheet(&mut self, sheet: &str) -> Result<SheetData, Self::Error> {
        self.data
            .sheets
            .iter()
            .find(|s| s.name == sheet)
            .map(Self::to_sheet_data)
            .ok_or_else(|| IoError::MissingSheet {
                sheet: sheet.to_string(),
            })
    }
}
