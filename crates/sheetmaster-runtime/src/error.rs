use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("asset I/O failed for {path}: {source}")]
    AssetIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("asset {path} is not a valid master asset: {source}")]
    AssetFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{master} is already initialized")]
    AlreadyInitialized { master: String },

    /// The master name cannot be used as an asset file name.
    #[error("master name '{master}' cannot name an asset file")]
    InvalidMasterName { master: String },

    #[error("no asset found for master {master}")]
    MissingAsset { master: String },

    /// The stored field list differs from the one the record type was built for.
    #[error("asset for {master} has fields {found:?}, expected {expected:?}")]
    SchemaMismatch {
        master: String,
        expected: Vec<String>,
        found: Vec<String>,
    },
}

impl RuntimeError {
    pub fn asset_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RuntimeError::AssetIo {
            path: path.into(),
            source,
        }
    }
}
