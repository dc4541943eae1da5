//! Where materialized assets live between the compile step and the app.

use crate::error::RuntimeError;
use crate::record::MasterAsset;
use rustc_hash::FxHashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub trait AssetStore {
    /// The stored asset for `master`, or `None` if there is none yet.
    fn load(&self, master: &str) -> Result<Option<MasterAsset>, RuntimeError>;

    /// Replace the stored contents for `asset.master`.
    fn save(&self, asset: &MasterAsset) -> Result<(), RuntimeError>;
}

/// Whether `master` can name an asset file directly inside a store root.
pub fn is_valid_asset_name(master: &str) -> bool {
    !master.trim().is_empty() && !master.contains(['/', '\\', '\0'])
}

/// One pretty-printed `<Master>.json` per master under `root`.
///
/// Saving writes a temporary file next to the target and renames it into
/// place, so readers never see a half-written asset and sidecar files such as
/// `<Master>.json.meta` stay as they are.
#[derive(Debug, Clone)]
pub struct FsAssetStore {
    root: PathBuf,
}

impl FsAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Asset file for `master`. Names that would leave `root` are refused.
    pub fn path_for(&self, master: &str) -> Result<PathBuf, RuntimeError> {
        if !is_valid_asset_name(master) {
            return Err(RuntimeError::InvalidMasterName {
                master: master.to_string(),
            });
        }
        Ok(self.root.join(format!("{master}.json")))
    }
}

impl AssetStore for FsAssetStore {
    fn load(&self, master: &str) -> Result<Option<MasterAsset>, RuntimeError> {
        let path = self.path_for(master)?;
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(RuntimeError::asset_io(path, e)),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| RuntimeError::AssetFormat { path, source })
    }

    fn save(&self, asset: &MasterAsset) -> Result<(), RuntimeError> {
        let path = self.path_for(&asset.master)?;
        std::fs::create_dir_all(&self.root).map_err(|e| RuntimeError::asset_io(&self.root, e))?;

        let text = serde_json::to_string_pretty(asset).map_err(|source| {
            RuntimeError::AssetFormat {
                path: path.clone(),
                source,
            }
        })?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.root)
            .map_err(|e| RuntimeError::asset_io(&self.root, e))?;
        tmp.write_all(text.as_bytes())
            .and_then(|_| tmp.flush())
            .map_err(|e| RuntimeError::asset_io(tmp.path(), e))?;
        tmp.persist(&path)
            .map_err(|e| RuntimeError::asset_io(&path, e.error))?;

        tracing::debug!(path = %path.display(), records = asset.records.len(), "asset saved");
        Ok(())
    }
}

/// In-process store, handy for tests and tools.
#[derive(Debug, Default)]
pub struct MemoryAssetStore {
    assets: Mutex<FxHashMap<String, MasterAsset>>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AssetStore for MemoryAssetStore {
    fn load(&self, master: &str) -> Result<Option<MasterAsset>, RuntimeError> {
        let assets = self.assets.lock().unwrap_or_else(|e| e.into_inner());
        Ok(assets.get(master).cloned())
    }

    fn save(&self, asset: &MasterAsset) -> Result<(), RuntimeError> {
        let mut assets = self.assets.lock().unwrap_or_else(|e| e.into_inner());
        assets.insert(asset.master.clone(), asset.clone());
        Ok(())
    }
}
