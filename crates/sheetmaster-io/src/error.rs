use std::path::PathBuf;

/// Failures while opening or reading a workbook.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// The workbook at `path` could not be opened or parsed.
    #[error("failed to open workbook {path}: {message}")]
    Open { path: PathBuf, message: String },

    /// A backend reported an error while reading an already opened workbook.
    #[error("{backend} backend error: {message}")]
    Backend {
        backend: &'static str,
        message: String,
    },

    /// A read failed after the workbook at `path` was opened.
    #[error("failed to read workbook {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: Box<IoError>,
    },

    #[error("workbook has no sheet named '{sheet}'")]
    MissingSheet { sheet: String },

    #[error("unsupported workbook format: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[cfg(feature = "json")]
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl IoError {
    pub fn from_backend<E: std::fmt::Display>(backend: &'static str, err: E) -> Self {
        IoError::Backend {
            backend,
            message: err.to_string(),
        }
    }

    pub fn open<E: std::fmt::Display>(path: impl Into<PathBuf>, err: E) -> Self {
        IoError::Open {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Attach the workbook path to an error raised while reading it. Errors
    /// that already name a file are returned unchanged.
    pub fn in_workbook(self, path: impl Into<PathBuf>) -> Self {
        match self {
            IoError::Open { .. } | IoError::UnsupportedFormat { .. } | IoError::Read { .. } => self,
            other => IoError::Read {
                path: path.into(),
                source: Box::new(other),
            },
        }
    }

    /// Path of the workbook the error concerns, when known.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            IoError::Open { path, .. }
            | IoError::UnsupportedFormat { path }
            | IoError::Read { path, .. } => Some(path),
            _ => None,
        }
    }
}
