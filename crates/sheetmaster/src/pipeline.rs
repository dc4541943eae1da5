//! The three re-runnable stages plus `inspect`.
//!
//! `compile` turns workbook headers into generated modules and the schema
//! manifest. `materialize` turns data rows into one asset per master.
//! `aggregate` rewrites `mod.rs` from the manifest.

use crate::config::Config;
use crate::error::CompileError;
use crate::manifest::{MANIFEST_FILE, SchemaManifest};
use rustc_hash::{FxHashMap, FxHashSet};
use sheetmaster_codegen::naming::is_reserved_type;
use sheetmaster_codegen::{GENERATED_MARKER, module_name, synthesize, synthesize_aggregate, type_name};
use sheetmaster_io::{WorkbookReader, list_workbooks, open_workbook};
use sheetmaster_runtime::{
    AssetStore, FsAssetStore, KeyCollision, MasterAsset, MasterIndex, is_valid_asset_name,
    materialize_sheet,
};
use sheetmaster_schema::{MasterSchema, ScanHit, TypeTable, extract, find_anchor, scan};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const AGGREGATE_FILE: &str = "mod.rs";

/// Whether generated files are written or only compared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WriteMode {
    #[default]
    Apply,
    /// Write nothing; fail with [`CompileError::Stale`] if anything differs.
    Check,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CompileReport {
    /// Compiled masters, in compile order.
    pub masters: Vec<String>,
    /// Files written (or, in check mode, that would be written).
    pub changed: Vec<PathBuf>,
    pub unchanged: usize,
    /// Generated files no master produces any more.
    pub pruned: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MasterReport {
    pub master: String,
    pub records: usize,
    pub collisions: Vec<KeyCollision>,
    pub asset: PathBuf,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct MaterializeReport {
    pub masters: Vec<MasterReport>,
}

impl MaterializeReport {
    pub fn total_collisions(&self) -> usize {
        self.masters.iter().map(|m| m.collisions.len()).sum()
    }
}

/// Tracks what a run writes into the generated-source folder.
struct Outputs {
    mode: WriteMode,
    written: BTreeSet<PathBuf>,
    changed: Vec<PathBuf>,
    unchanged: usize,
}

impl Outputs {
    fn new(mode: WriteMode) -> Self {
        Self {
            mode,
            written: BTreeSet::new(),
            changed: Vec::new(),
            unchanged: 0,
        }
    }

    /// Write `content` to `path` unless it already holds exactly that.
    fn apply_or_check(&mut self, path: &Path, content: &str) -> Result<(), CompileError> {
        self.written.insert(path.to_path_buf());
        let current = fs::read_to_string(path).ok();
        if current.as_deref() == Some(content) {
            self.unchanged += 1;
            return Ok(());
        }

        if self.mode == WriteMode::Apply {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| CompileError::io(parent, e))?;
            }
            fs::write(path, content).map_err(|e| CompileError::io(path, e))?;
            tracing::debug!(path = %path.display(), "written");
        }
        self.changed.push(path.to_path_buf());
        Ok(())
    }

    /// Remove sheetmaster-generated `.rs` files this run did not produce.
    /// Hand-written files in the folder are left alone.
    fn prune(&self, dir: &Path) -> Result<Vec<PathBuf>, CompileError> {
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut pruned = Vec::new();
        let entries = fs::read_dir(dir).map_err(|e| CompileError::io(dir, e))?;
        for entry in entries {
            let path = entry.map_err(|e| CompileError::io(dir, e))?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("rs")
                || self.written.contains(&path)
                || !is_generated(&path)
            {
                continue;
            }
            if self.mode == WriteMode::Apply {
                fs::remove_file(&path).map_err(|e| CompileError::io(&path, e))?;
                tracing::info!(path = %path.display(), "removed stale generated file");
            }
            pruned.push(path);
        }
        pruned.sort();
        Ok(pruned)
    }

    fn finish(self, masters: Vec<String>, pruned: Vec<PathBuf>) -> Result<CompileReport, CompileError> {
        if self.mode == WriteMode::Check && !(self.changed.is_empty() && pruned.is_empty()) {
            let mut files = self.changed;
            files.extend(pruned);
            return Err(CompileError::Stale { files });
        }
        Ok(CompileReport {
            masters,
            changed: self.changed,
            unchanged: self.unchanged,
            pruned,
        })
    }
}

fn is_generated(path: &Path) -> bool {
    let marker = format!("// {GENERATED_MARKER} by sheetmaster");
    fs::read_to_string(path)
        .map(|text| text.lines().next().is_some_and(|first| first.starts_with(&marker)))
        .unwrap_or(false)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Masters seen so far in a run, keyed by generated module and type name.
#[derive(Default)]
struct Registry {
    modules: FxHashMap<String, String>,
    types: FxHashMap<String, String>,
    /// Type names of the configured enums.
    enums: FxHashSet<String>,
}

impl Registry {
    fn new(config: &Config) -> Self {
        Self {
            enums: config.types.enums.keys().map(|name| type_name(name)).collect(),
            ..Self::default()
        }
    }

    /// Reject names that would break the generated code or the asset folder.
    fn check_name(&self, schema: &MasterSchema, origin: &str) -> Result<(), CompileError> {
        let master = &schema.master_name;
        let ty = type_name(master);
        let reason = if !is_valid_asset_name(master) {
            "name contains a path separator and cannot name an asset file".to_string()
        } else if is_reserved_type(&ty) {
            format!("type `{ty}` is reserved by generated code")
        } else if self.enums.contains(&ty) {
            format!("type `{ty}` is also a configured enum")
        } else {
            return Ok(());
        };
        Err(CompileError::InvalidMasterName {
            master: master.clone(),
            origin: origin.to_string(),
            reason,
        })
    }

    fn claim(&mut self, schema: &MasterSchema) -> Result<(), CompileError> {
        let origin = format!("{}/{}", schema.source.workbook, schema.source.sheet);
        self.check_name(schema, &origin)?;
        for (map, name) in [
            (&mut self.modules, module_name(&schema.master_name)),
            (&mut self.types, type_name(&schema.master_name)),
        ] {
            if let Some(first) = map.get(&name) {
                return Err(CompileError::DuplicateMaster {
                    master: schema.master_name.clone(),
                    first: first.clone(),
                    second: origin,
                });
            }
            map.insert(name, origin.clone());
        }
        Ok(())
    }
}

fn extract_hit(hit: ScanHit<'_>, types: &TypeTable) -> Result<Option<MasterSchema>, CompileError> {
    extract(hit.sheet, hit.anchor, &file_name(hit.workbook), types)
        .map_err(|e| CompileError::schema(hit.workbook, e))
}

fn discover(config: &Config) -> Result<Vec<PathBuf>, CompileError> {
    let dir = config.workbooks_dir();
    let workbooks = list_workbooks(&dir).map_err(|source| CompileError::Discover {
        dir: dir.clone(),
        source,
    })?;
    tracing::info!(dir = %dir.display(), workbooks = workbooks.len(), "workbooks discovered");
    Ok(workbooks)
}

/// Scan every workbook and write one module per master, then the manifest
/// and `mod.rs`.
pub fn compile(config: &Config) -> Result<CompileReport, CompileError> {
    compile_with(config, WriteMode::Apply)
}

pub fn compile_with(config: &Config, mode: WriteMode) -> Result<CompileReport, CompileError> {
    let _span = tracing::info_span!("compile").entered();
    let workbooks = discover(config)?;
    let types = config.type_table();
    let options = config.codegen_options();
    let out_dir = config.generated_dir();

    let mut outputs = Outputs::new(mode);
    let mut registry = Registry::new(config);
    let mut schemas = Vec::new();

    scan(&workbooks, |hit| {
        let Some(schema) = extract_hit(hit, &types)? else {
            return Ok(());
        };
        let Some(source) = synthesize(&schema, &options) else {
            return Ok(());
        };
        registry.claim(&schema)?;
        let path = out_dir.join(format!("{}.rs", module_name(&schema.master_name)));
        outputs.apply_or_check(&path, &source)?;
        tracing::info!(
            master = %schema.master_name,
            sheet = %schema.source.sheet,
            fields = schema.fields.len(),
            "master compiled"
        );
        schemas.push(schema);
        Ok::<(), CompileError>(())
    })?;

    let manifest = SchemaManifest::new(schemas);
    let names = manifest.master_names();
    outputs.apply_or_check(&out_dir.join(MANIFEST_FILE), &manifest.to_json_string()?)?;
    outputs.apply_or_check(&out_dir.join(AGGREGATE_FILE), &synthesize_aggregate(&names, &options))?;

    let pruned = outputs.prune(&out_dir)?;
    let masters: Vec<String> = names.iter().map(|n| n.to_string()).collect();
    let report = outputs.finish(masters, pruned)?;
    tracing::info!(
        masters = report.masters.len(),
        changed = report.changed.len(),
        unchanged = report.unchanged,
        pruned = report.pruned.len(),
        "compile finished"
    );
    Ok(report)
}

/// Decode every compiled master's data rows and save one asset per master.
///
/// Workbooks are opened once per run of consecutive manifest entries, in
/// manifest order. Key collisions are reported, not fatal.
pub fn materialize(config: &Config) -> Result<MaterializeReport, CompileError> {
    let _span = tracing::info_span!("materialize").entered();
    let manifest = SchemaManifest::load(&config.generated_dir())?;
    let store = FsAssetStore::new(config.assets_dir());
    let workbooks_dir = config.workbooks_dir();
    let mut report = MaterializeReport::default();

    for group in manifest
        .masters
        .chunk_by(|a, b| a.source.workbook == b.source.workbook)
    {
        let path = workbooks_dir.join(&group[0].source.workbook);
        let _wb = tracing::info_span!("workbook", path = %path.display()).entered();
        let mut reader = open_workbook(&path)?;
        let sheet_names = reader.sheet_names().map_err(|e| e.in_workbook(&path))?;

        for schema in group {
            let master = &schema.master_name;
            if !sheet_names.contains(&schema.source.sheet) {
                return Err(CompileError::MissingSheet {
                    master: master.clone(),
                    workbook: path.clone(),
                    sheet: schema.source.sheet.clone(),
                });
            }
            let sheet = reader
                .read_sheet(&schema.source.sheet)
                .map_err(|e| e.in_workbook(&path))?;
            let found = find_anchor(&sheet);
            if found != Some(schema.anchor) {
                return Err(CompileError::AnchorMoved {
                    master: master.clone(),
                    sheet: schema.source.sheet.clone(),
                    expected: schema.anchor,
                    found,
                });
            }

            let asset_path = store.path_for(master)?;
            let prior = store.load(master)?;
            let records = materialize_sheet(schema, &sheet, prior.as_ref());
            let index = MasterIndex::build(master.clone(), records.iter().cloned());
            let asset = MasterAsset::new(
                master.clone(),
                schema.field_names().map(str::to_string).collect(),
                records,
            );
            store.save(&asset)?;
            tracing::info!(
                master = %master,
                records = asset.records.len(),
                collisions = index.collisions().len(),
                "master materialized"
            );
            report.masters.push(MasterReport {
                master: master.clone(),
                records: asset.records.len(),
                collisions: index.collisions().to_vec(),
                asset: asset_path,
            });
        }
    }

    Ok(report)
}

/// Rewrite `mod.rs` from the manifest. Returns whether the file changed.
pub fn aggregate(config: &Config) -> Result<bool, CompileError> {
    let _span = tracing::info_span!("aggregate").entered();
    let out_dir = config.generated_dir();
    let manifest = SchemaManifest::load(&out_dir)?;
    let mut outputs = Outputs::new(WriteMode::Apply);
    outputs.apply_or_check(
        &out_dir.join(AGGREGATE_FILE),
        &synthesize_aggregate(&manifest.master_names(), &config.codegen_options()),
    )?;
    let changed = !outputs.changed.is_empty();
    tracing::info!(masters = manifest.masters.len(), changed, "aggregate written");
    Ok(changed)
}

/// Schemas one workbook would compile to. Nothing is written.
pub fn inspect(workbook: &Path, types: &TypeTable) -> Result<Vec<MasterSchema>, CompileError> {
    let mut schemas = Vec::new();
    scan(&[workbook], |hit| {
        if let Some(schema) = extract_hit(hit, types)? {
            schemas.push(schema);
        }
        Ok::<(), CompileError>(())
    })?;
    Ok(schemas)
}
