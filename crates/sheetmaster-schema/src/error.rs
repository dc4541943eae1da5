use sheetmaster_io::IoError;

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The key column's type cannot be hashed (floating point, array, opaque).
    #[error("{sheet}!{cell}: key column type '{declared}' cannot be used as an index key")]
    UnsupportedKeyType {
        sheet: String,
        cell: String,
        declared: String,
    },

    #[error("{sheet}: field '{field}' is declared more than once")]
    DuplicateField { sheet: String, field: String },

    #[error(transparent)]
    Io(#[from] IoError),
}
