use crate::error::SchemaError;
use crate::schema::{
    ColumnSchema, DATA_ROW_OFFSET, DESCRIPTION_ROW_OFFSET, MASTER_DESCRIPTION_CELL,
    MASTER_NAME_CELL, MasterSchema, NAME_ROW_OFFSET, SourceRef, TYPE_ROW_OFFSET,
};
use crate::types::TypeTable;
use rustc_hash::FxHashSet;
use sheetmaster_common::CellRef;
use sheetmaster_io::SheetData;

/// Read the header block under `anchor` into a [`MasterSchema`].
///
/// Returns `Ok(None)` when the sheet has no master name in `A1`, when the key
/// column (the anchor's own column) lacks a type or name, or when no column is
/// complete. Columns missing a type or a name are left out.
pub fn extract(
    sheet: &SheetData,
    anchor: CellRef,
    workbook: &str,
    types: &TypeTable,
) -> Result<Option<MasterSchema>, SchemaError> {
    let master_name = sheet
        .cell_as_string(MASTER_NAME_CELL.row, MASTER_NAME_CELL.col)
        .trim()
        .to_string();
    if master_name.is_empty() {
        tracing::debug!(sheet = %sheet.name, "no master name in A1, skipping");
        return Ok(None);
    }
    let master_description =
        sheet.cell_as_string(MASTER_DESCRIPTION_CELL.row, MASTER_DESCRIPTION_CELL.col);

    // The header block plus the first data row must fit below the anchor.
    let Some(data_start_row) = anchor.row.checked_add(DATA_ROW_OFFSET) else {
        tracing::debug!(sheet = %sheet.name, master = %master_name, "anchor too low for a header, skipping");
        return Ok(None);
    };
    let type_row = anchor.row + TYPE_ROW_OFFSET;
    let name_row = anchor.row + NAME_ROW_OFFSET;
    let description_row = anchor.row + DESCRIPTION_ROW_OFFSET;

    let Some(last_col) = sheet.last_col(type_row).filter(|&col| col >= anchor.col) else {
        tracing::debug!(sheet = %sheet.name, master = %master_name, "empty type row, skipping");
        return Ok(None);
    };

    let mut fields = Vec::new();
    let mut seen = FxHashSet::default();
    for col in anchor.col..=last_col {
        let declared = sheet.cell_as_string(type_row, col).trim().to_string();
        let name = sheet.cell_as_string(name_row, col).trim().to_string();
        if declared.is_empty() || name.is_empty() {
            if col == anchor.col {
                tracing::debug!(
                    sheet = %sheet.name,
                    master = %master_name,
                    "key column is incomplete, skipping"
                );
                return Ok(None);
            }
            tracing::debug!(sheet = %sheet.name, column = col, "incomplete column left out");
            continue;
        }
        if !seen.insert(name.clone()) {
            return Err(SchemaError::DuplicateField {
                sheet: sheet.name.clone(),
                field: name,
            });
        }

        let kind = types.classify(&declared);
        if col == anchor.col && !kind.is_hashable() {
            return Err(SchemaError::UnsupportedKeyType {
                sheet: sheet.name.clone(),
                cell: CellRef::new(type_row, col).to_a1(),
                declared,
            });
        }

        fields.push(ColumnSchema {
            column: col,
            declared_type: declared,
            kind,
            field_name: name,
            description: sheet.cell_as_string(description_row, col),
        });
    }

    let Some(key_type) = fields.first().map(|key| key.declared_type.clone()) else {
        return Ok(None);
    };
    Ok(Some(MasterSchema {
        master_name,
        master_description,
        key_type,
        key_column: anchor.col,
        fields,
        source: SourceRef {
            workbook: workbook.to_string(),
            sheet: sheet.name.clone(),
        },
        anchor,
        data_start_row,
    }))
}
