//! Locating and reading master definitions inside workbooks.
//!
//! A master starts at an anchor cell holding `@`. The three rows below it carry
//! each column's declared type, field name and description; data rows follow.
//! [`scan`] finds anchors, [`extract`] turns one anchor into a
//! [`MasterSchema`], and [`TypeTable`] classifies the declared types.

pub mod error;
pub mod extract;
pub mod scan;
pub mod schema;
pub mod types;

pub use error::SchemaError;
pub use extract::extract;
pub use scan::{ScanHit, find_anchor, scan, scan_workbook};
pub use schema::{
    ANCHOR, ColumnSchema, DATA_ROW_OFFSET, DESCRIPTION_ROW_OFFSET, MASTER_DESCRIPTION_CELL,
    MASTER_NAME_CELL, MasterSchema, NAME_ROW_OFFSET, SourceRef, TYPE_ROW_OFFSET,
};
pub use types::{FieldKind, MAX_FIXED_ARRAY_LEN, PrimitiveKind, TypeTable};
