use crate::config::ConfigError;
use sheetmaster_common::CellRef;
use sheetmaster_io::IoError;
use sheetmaster_runtime::RuntimeError;
use sheetmaster_schema::SchemaError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to list workbooks in {dir}: {source}")]
    Discover {
        dir: PathBuf,
        #[source]
        source: IoError,
    },

    #[error(transparent)]
    Workbook(#[from] IoError),

    #[error("{workbook}: {source}")]
    Schema {
        workbook: PathBuf,
        #[source]
        source: SchemaError,
    },

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// Two sheets declare masters that would share a name or a module.
    #[error("master {master} is declared twice: {first} and {second}")]
    DuplicateMaster {
        master: String,
        first: String,
        second: String,
    },

    /// A master name the generated code or the asset folder cannot hold.
    #[error("master '{master}' in {origin}: {reason}")]
    InvalidMasterName {
        master: String,
        origin: String,
        reason: String,
    },

    #[error("schema manifest {path}: {message}")]
    Manifest { path: PathBuf, message: String },

    #[error("master {master}: workbook {workbook} has no sheet named '{sheet}'")]
    MissingSheet {
        master: String,
        workbook: PathBuf,
        sheet: String,
    },

    #[error("master {master}: anchor on sheet '{sheet}' moved from {expected} to {}", display_anchor(.found))]
    AnchorMoved {
        master: String,
        sheet: String,
        expected: CellRef,
        found: Option<CellRef>,
    },

    #[error("{} generated file(s) out of date:\n{}", .files.len(), display_files(.files))]
    Stale { files: Vec<PathBuf> },
}

fn display_anchor(found: &Option<CellRef>) -> String {
    match found {
        Some(at) => at.to_string(),
        None => "nowhere".to_string(),
    }
}

fn display_files(files: &[PathBuf]) -> String {
    files
        .iter()
        .map(|f| format!("  {}", f.display()))
        .collect::<Vec<_>>()
        .join("\n")
}

impl CompileError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CompileError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn schema(workbook: impl Into<PathBuf>, source: SchemaError) -> Self {
        match source {
            SchemaError::Io(io) => CompileError::Workbook(io.in_workbook(workbook)),
            source => CompileError::Schema {
                workbook: workbook.into(),
                source,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_read_errors_keep_the_workbook_path() {
        let err = CompileError::schema(
            "workbooks/Items.xlsx",
            SchemaError::Io(IoError::from_backend("calamine", "truncated sheet")),
        );
        match &err {
            CompileError::Workbook(io) => {
                assert_eq!(io.path(), Some(std::path::Path::new("workbooks/Items.xlsx")));
            }
            other => panic!("expected a workbook error, got {other:?}"),
        }
        assert!(err.to_string().contains("workbooks/Items.xlsx"));
    }
}
