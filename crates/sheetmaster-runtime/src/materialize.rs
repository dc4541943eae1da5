//! Turning data rows into records.
//!
//! Primitive, string and boolean columns decode straight from the cell and
//! fall back to the kind's zero value. Enumeration and array columns decode
//! from the cell text; when that fails, and always for opaque columns, the
//! value is carried forward from the prior asset (same row position, same
//! field name) or else zeroed.

use crate::record::{MasterAsset, MasterRecord};
use crate::value::FieldValue;
use sheetmaster_common::CellValue;
use sheetmaster_io::SheetData;
use sheetmaster_schema::{ColumnSchema, FieldKind, MasterSchema, PrimitiveKind};

/// Zero value of a kind: what an absent cell decodes to when nothing is
/// carried forward.
pub fn zero_value(kind: &FieldKind) -> FieldValue {
    match kind {
        FieldKind::Primitive { primitive } => cast_number(*primitive, 0.0),
        FieldKind::String => FieldValue::Text(String::new()),
        FieldKind::Boolean => FieldValue::Bool(false),
        FieldKind::Enumeration { members, .. } => members
            .first()
            .map(|m| FieldValue::Text(m.clone()))
            .unwrap_or(FieldValue::Empty),
        FieldKind::FixedArray { element, len } => {
            FieldValue::Array(vec![zero_value(element); len.unwrap_or(0)])
        }
        FieldKind::Opaque { .. } => FieldValue::Empty,
    }
}

/// Narrowing conversion with `as` semantics (saturating, NaN to zero).
fn cast_number(primitive: PrimitiveKind, n: f64) -> FieldValue {
    match primitive {
        PrimitiveKind::U8 => FieldValue::UInt(n as u8 as u64),
        PrimitiveKind::U16 => FieldValue::UInt(n as u16 as u64),
        PrimitiveKind::U32 => FieldValue::UInt(n as u32 as u64),
        PrimitiveKind::U64 => FieldValue::UInt(n as u64),
        PrimitiveKind::I8 => FieldValue::Int(n as i8 as i64),
        PrimitiveKind::I16 => FieldValue::Int(n as i16 as i64),
        PrimitiveKind::I32 => FieldValue::Int(n as i32 as i64),
        PrimitiveKind::I64 => FieldValue::Int(n as i64),
        PrimitiveKind::F32 => FieldValue::Float(n as f32 as f64),
        PrimitiveKind::F64 => FieldValue::Float(n),
        PrimitiveKind::Char => FieldValue::Char(char::from_u32(n as u32).unwrap_or('\0')),
    }
}

/// Decode one array element from its text form.
fn parse_element(kind: &FieldKind, text: &str) -> Option<FieldValue> {
    match kind {
        FieldKind::Primitive { primitive } => {
            let n = text.trim().parse::<f64>().ok()?;
            Some(cast_number(*primitive, n))
        }
        FieldKind::String => Some(FieldValue::Text(text.to_string())),
        FieldKind::Boolean => match text.trim().to_ascii_lowercase().as_str() {
            "true" => Some(FieldValue::Bool(true)),
            "false" => Some(FieldValue::Bool(false)),
            _ => None,
        },
        FieldKind::Enumeration { members, .. } => {
            let text = text.trim();
            members
                .iter()
                .find(|m| m.as_str() == text)
                .map(|m| FieldValue::Text(m.clone()))
        }
        FieldKind::FixedArray { .. } | FieldKind::Opaque { .. } => None,
    }
}

/// Decode a cell under `kind`. `None` asks for the fallback value.
pub fn decode_cell(kind: &FieldKind, sheet: &SheetData, row: u32, col: u32) -> Option<FieldValue> {
    match kind {
        FieldKind::Primitive { primitive } => Some(cast_number(
            *primitive,
            sheet.cell_as_number(row, col).unwrap_or(0.0),
        )),
        FieldKind::String => Some(FieldValue::Text(sheet.cell_as_string(row, col))),
        FieldKind::Boolean => Some(FieldValue::Bool(sheet.cell_as_bool(row, col).unwrap_or(false))),
        FieldKind::Enumeration { .. } => parse_element(kind, &sheet.cell_as_string(row, col)),
        FieldKind::FixedArray { element, len } => {
            let items = match sheet.cell(row, col)? {
                CellValue::Text(text) if !text.trim().is_empty() => text
                    .split(',')
                    .map(|piece| parse_element(element, piece))
                    .collect::<Option<Vec<_>>>()?,
                // A lone number is a one-element list.
                CellValue::Int(_) | CellValue::Number(_) => {
                    let n = sheet.cell_as_number(row, col)?;
                    match element.as_ref() {
                        FieldKind::Primitive { primitive } => vec![cast_number(*primitive, n)],
                        _ => return None,
                    }
                }
                _ => return None,
            };
            match len {
                Some(n) if items.len() != *n => None,
                _ => Some(FieldValue::Array(items)),
            }
        }
        FieldKind::Opaque { .. } => None,
    }
}

/// Upper bound on rows reserved up front; sparse sheets may claim far more.
const PREALLOCATED_ROWS: usize = 4096;

fn fallback(column: &ColumnSchema, position: usize, prior: Option<&MasterAsset>) -> FieldValue {
    prior
        .and_then(|asset| asset.value_at(position, &column.field_name))
        .cloned()
        .unwrap_or_else(|| zero_value(&column.kind))
}

/// One record per row in `start_row..=last_row`, in row order. Rows are never
/// skipped, however sparse.
pub fn materialize(
    schema: &MasterSchema,
    sheet: &SheetData,
    start_row: u32,
    last_row: u32,
    prior: Option<&MasterAsset>,
) -> Vec<MasterRecord> {
    if last_row < start_row {
        return Vec::new();
    }
    let rows = ((last_row - start_row) as usize).saturating_add(1);
    let mut records = Vec::with_capacity(rows.min(PREALLOCATED_ROWS));
    for (position, row) in (start_row..=last_row).enumerate() {
        let record: MasterRecord = schema
            .fields
            .iter()
            .map(|column| {
                decode_cell(&column.kind, sheet, row, column.column).unwrap_or_else(|| {
                    tracing::debug!(
                        master = %schema.master_name,
                        field = %column.field_name,
                        row,
                        "cell not decodable, using fallback"
                    );
                    fallback(column, position, prior)
                })
            })
            .collect();
        records.push(record);
    }
    records
}

/// [`materialize`] over the schema's data block, through the sheet's last row.
pub fn materialize_sheet(
    schema: &MasterSchema,
    sheet: &SheetData,
    prior: Option<&MasterAsset>,
) -> Vec<MasterRecord> {
    match sheet.last_row() {
        Some(last) => materialize(schema, sheet, schema.data_start_row, last, prior),
        None => Vec::new(),
    }
}
