//! `masters.json`: the compiled schemas, in compile order.
//!
//! Written by `compile` next to the generated modules and read back by
//! `materialize` and `aggregate`, so neither has to rescan every workbook.

use crate::error::CompileError;
use serde::{Deserialize, Serialize};
use sheetmaster_schema::MasterSchema;
use std::path::Path;

pub const MANIFEST_FILE: &str = "masters.json";
pub const MANIFEST_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaManifest {
    pub version: u32,
    pub masters: Vec<MasterSchema>,
}

impl Default for SchemaManifest {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl SchemaManifest {
    pub fn new(masters: Vec<MasterSchema>) -> Self {
        Self {
            version: MANIFEST_VERSION,
            masters,
        }
    }

    pub fn master_names(&self) -> Vec<&str> {
        self.masters.iter().map(|m| m.master_name.as_str()).collect()
    }

    pub fn to_json_string(&self) -> Result<String, CompileError> {
        let mut text =
            serde_json::to_string_pretty(self).map_err(|e| CompileError::Manifest {
                path: MANIFEST_FILE.into(),
                message: e.to_string(),
            })?;
        text.push('\n');
        Ok(text)
    }

    pub fn from_json_str(text: &str, path: &Path) -> Result<Self, CompileError> {
        let manifest: SchemaManifest =
            serde_json::from_str(text).map_err(|e| CompileError::Manifest {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        manifest.check(path)?;
        Ok(manifest)
    }

    /// Read `masters.json` from the generated-source folder.
    pub fn load(dir: &Path) -> Result<Self, CompileError> {
        let path = dir.join(MANIFEST_FILE);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CompileError::Manifest {
                    path,
                    message: "not found, run `sheetmaster compile` first".into(),
                });
            }
            Err(e) => return Err(CompileError::io(path, e)),
        };
        Self::from_json_str(&text, &path)
    }

    fn check(&self, path: &Path) -> Result<(), CompileError> {
        if self.version != MANIFEST_VERSION {
            return Err(CompileError::Manifest {
                path: path.to_path_buf(),
                message: format!(
                    "version {} is not supported (expected {MANIFEST_VERSION})",
                    self.version
                ),
            });
        }
        if let Some(empty) = self.masters.iter().find(|m| m.fields.is_empty()) {
            return Err(CompileError::Manifest {
                path: path.to_path_buf(),
                message: format!("master {} has no fields", empty.master_name),
            });
        }
        Ok(())
    }
}
