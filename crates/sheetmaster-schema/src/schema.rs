use crate::types::FieldKind;
use serde::{Deserialize, Serialize};
use sheetmaster_common::CellRef;

/// Sentinel text marking the top-left of a master's header block.
pub const ANCHOR: &str = "@";

pub const TYPE_ROW_OFFSET: u32 = 1;
pub const NAME_ROW_OFFSET: u32 = 2;
pub const DESCRIPTION_ROW_OFFSET: u32 = 3;
pub const DATA_ROW_OFFSET: u32 = 4;

pub const MASTER_NAME_CELL: CellRef = CellRef::new(0, 0);
pub const MASTER_DESCRIPTION_CELL: CellRef = CellRef::new(0, 2);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub column: u32,
    pub declared_type: String,
    pub kind: FieldKind,
    pub field_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// Where a master was found.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    /// File name of the workbook, without directories.
    pub workbook: String,
    pub sheet: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterSchema {
    pub master_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub master_description: String,
    /// Declared type of the key column.
    pub key_type: String,
    pub key_column: u32,
    /// Fields in column order. The key is always `fields[0]`.
    pub fields: Vec<ColumnSchema>,
    pub source: SourceRef,
    pub anchor: CellRef,
    pub data_start_row: u32,
}

impl MasterSchema {
    /// The key column, `None` only for a schema with no fields.
    pub fn key_field(&self) -> Option<&ColumnSchema> {
        self.fields.first()
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.field_name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.field_name.as_str())
    }
}
