//! `sheetmaster.yaml` project file.
//!
//! ```yaml
//! workbooks: ExcelResources
//! generated_source: src/masters
//! assets: assets/masters
//! runtime_crate: sheetmaster_runtime
//! types:
//!   aliases: { Int32: int }
//!   enums:
//!     CharacterAttribute: [None, Fire, Water, Wind]
//! ```
//!
//! Relative paths resolve against the directory holding the file.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sheetmaster_codegen::CodegenOptions;
use sheetmaster_codegen::naming::{is_identifier, is_reserved_type, type_name};
use sheetmaster_schema::{PrimitiveKind, TypeTable};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "sheetmaster.yaml";

static RUNTIME_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(::[A-Za-z_][A-Za-z0-9_]*)*$")
        .expect("runtime path regex must compile")
});

fn default_runtime_crate() -> String {
    CodegenOptions::default().runtime_crate
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Folder scanned for workbooks.
    pub workbooks: PathBuf,
    /// Folder receiving generated modules, `mod.rs` and `masters.json`.
    pub generated_source: PathBuf,
    /// Folder receiving one `<Master>.json` asset per master.
    pub assets: PathBuf,
    #[serde(default = "default_runtime_crate")]
    pub runtime_crate: String,
    #[serde(default)]
    pub types: TypesConfig,
    #[serde(skip)]
    base_dir: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypesConfig {
    /// Extra type names mapped onto a built-in primitive name.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
    /// Enumeration name to member names. The first member is the default.
    #[serde(default)]
    pub enums: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub path: String,
    pub message: String,
}

impl ConfigIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid config:\n{}", format_issues(.issues))]
    Invalid { issues: Vec<ConfigIssue> },
}

fn format_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("  - {issue}"))
        .collect::<Vec<_>>()
        .join("\n")
}

impl Config {
    pub fn new(
        workbooks: impl Into<PathBuf>,
        generated_source: impl Into<PathBuf>,
        assets: impl Into<PathBuf>,
    ) -> Self {
        Self {
            workbooks: workbooks.into(),
            generated_source: generated_source.into(),
            assets: assets.into(),
            runtime_crate: default_runtime_crate(),
            types: TypesConfig::default(),
            base_dir: PathBuf::new(),
        }
    }

    /// Read, parse and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let config = serde_yaml::from_str::<Config>(&text)
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?
            .with_base_dir(base_dir);
        config.validate()?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn from_yaml_str(text: &str, base_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let config = serde_yaml::from_str::<Config>(text)
            .map_err(|source| ConfigError::Parse {
                path: PathBuf::from("<inline>"),
                source,
            })?
            .with_base_dir(base_dir);
        config.validate()?;
        Ok(config)
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    pub fn workbooks_dir(&self) -> PathBuf {
        self.resolve(&self.workbooks)
    }

    pub fn generated_dir(&self) -> PathBuf {
        self.resolve(&self.generated_source)
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.resolve(&self.assets)
    }

    pub fn codegen_options(&self) -> CodegenOptions {
        CodegenOptions {
            runtime_crate: self.runtime_crate.clone(),
        }
    }

    /// Type table with the configured aliases and enums. Aliases pointing at
    /// unknown primitives are dropped; `validate` reports them.
    pub fn type_table(&self) -> TypeTable {
        let mut table = TypeTable::new();
        for (name, target) in &self.types.aliases {
            if let Some(primitive) = PrimitiveKind::from_name(target) {
                table.add_alias(name.clone(), primitive);
            }
        }
        for (name, members) in &self.types.enums {
            table.add_enum(name.clone(), members.clone());
        }
        table
    }

    /// Check the whole file and report every problem at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut issues = Vec::new();

        for (key, path) in [
            ("workbooks", &self.workbooks),
            ("generated_source", &self.generated_source),
            ("assets", &self.assets),
        ] {
            if path.as_os_str().is_empty() {
                issues.push(ConfigIssue::new(key, "path must not be empty"));
            }
        }

        if !RUNTIME_PATH.is_match(&self.runtime_crate) {
            issues.push(ConfigIssue::new(
                "runtime_crate",
                format!("`{}` is not a Rust path", self.runtime_crate),
            ));
        }

        for (name, target) in &self.types.aliases {
            let path = format!("types.aliases.{name}");
            if PrimitiveKind::from_name(name).is_some() {
                issues.push(ConfigIssue::new(&path, "alias shadows a built-in type"));
            }
            if PrimitiveKind::from_name(target).is_none() {
                issues.push(ConfigIssue::new(
                    &path,
                    format!("`{target}` is not a primitive type name"),
                ));
            }
            if self.types.enums.contains_key(name) {
                issues.push(ConfigIssue::new(&path, "name is also declared as an enum"));
            }
        }

        // Generated type name -> enum it came from.
        let mut enum_types: HashMap<String, &str> = HashMap::new();
        for (name, members) in &self.types.enums {
            let path = format!("types.enums.{name}");
            if !is_identifier(name) {
                issues.push(ConfigIssue::new(&path, "enum name must be a Rust identifier"));
            }
            let ty = type_name(name);
            if is_reserved_type(&ty) {
                issues.push(ConfigIssue::new(
                    &path,
                    format!("type `{ty}` is reserved by generated code"),
                ));
            }
            if let Some(other) = enum_types.insert(ty.clone(), name.as_str()) {
                issues.push(ConfigIssue::new(
                    &path,
                    format!("generates type `{ty}`, as does `{other}`"),
                ));
            }
            if members.is_empty() {
                issues.push(ConfigIssue::new(&path, "enum needs at least one member"));
            }
            // Variant ident -> member it came from.
            let mut variants: HashMap<String, &str> = HashMap::new();
            for (idx, member) in members.iter().enumerate() {
                if !is_identifier(member) {
                    issues.push(ConfigIssue::new(
                        format!("{path}[{idx}]"),
                        format!("`{member}` is not a Rust identifier"),
                    ));
                }
                match variants.insert(type_name(member), member.as_str()) {
                    Some(prev) if prev == member.as_str() => issues.push(ConfigIssue::new(
                        format!("{path}[{idx}]"),
                        format!("duplicate member `{member}`"),
                    )),
                    Some(prev) => issues.push(ConfigIssue::new(
                        format!("{path}[{idx}]"),
                        format!(
                            "`{member}` and `{prev}` generate the same variant `{}`",
                            type_name(member)
                        ),
                    )),
                    None => {}
                }
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid { issues })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetmaster_schema::FieldKind;

    const SAMPLE: &str = r#"
workbooks: ExcelResources
generated_source: src/masters
assets: assets/masters
types:
  aliases: { Int32: int }
  enums:
    CharacterAttribute: [None, Fire, Water, Wind]
"#;

    #[test]
    fn paths_resolve_against_the_config_directory() {
        let config = Config::from_yaml_str(SAMPLE, "/project").unwrap();
        assert_eq!(config.workbooks_dir(), Path::new("/project/ExcelResources"));
        assert_eq!(config.generated_dir(), Path::new("/project/src/masters"));
        assert_eq!(config.assets_dir(), Path::new("/project/assets/masters"));
        assert_eq!(config.runtime_crate, "sheetmaster_runtime");
    }

    #[test]
    fn type_table_carries_aliases_and_enums() {
        let table = Config::from_yaml_str(SAMPLE, "/project").unwrap().type_table();
        assert_eq!(
            table.classify("Int32"),
            FieldKind::primitive(PrimitiveKind::I32)
        );
        assert!(matches!(
            table.classify("CharacterAttribute"),
            FieldKind::Enumeration { .. }
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Config::from_yaml_str("workbooks: a\ngenerated_source: b\nassets: c\nextra: 1\n", ".")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn validation_collects_every_issue() {
        let text = r#"
workbooks: ""
generated_source: out
assets: assets
runtime_crate: "not a path"
types:
  aliases: { Money: decimal, int: long }
  enums:
    Empty: []
    Color: [Red, Red, "Light Blue"]
"#;
        let Err(ConfigError::Invalid { issues }) = Config::from_yaml_str(text, ".") else {
            panic!("expected validation failure");
        };
        let paths: Vec<&str> = issues.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "workbooks",
                "runtime_crate",
                "types.aliases.Money",
                "types.aliases.int",
                "types.enums.Color[1]",
                "types.enums.Color[2]",
                "types.enums.Empty",
            ]
        );
    }

    #[test]
    fn members_must_stay_distinct_as_variants() {
        let text = r#"
workbooks: a
generated_source: b
assets: c
types:
  enums:
    Element: [fire, Fire, a_b, aB, _x, x]
"#;
        let Err(ConfigError::Invalid { issues }) = Config::from_yaml_str(text, ".") else {
            panic!("expected validation failure");
        };
        let paths: Vec<&str> = issues.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "types.enums.Element[1]",
                "types.enums.Element[3]",
                "types.enums.Element[5]",
            ]
        );
        assert!(issues[0].message.contains("same variant `Fire`"), "{}", issues[0]);
    }

    #[test]
    fn enum_types_must_not_clash() {
        let text = r#"
workbooks: a
generated_source: b
assets: c
types:
  enums:
    Keyed: [A]
    Rarity: [Common]
    rarity: [Rare]
    String: [S]
"#;
        let Err(ConfigError::Invalid { issues }) = Config::from_yaml_str(text, ".") else {
            panic!("expected validation failure");
        };
        let paths: Vec<&str> = issues.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["types.enums.Keyed", "types.enums.String", "types.enums.rarity"]
        );
        assert!(issues[2].message.contains("as does `Rarity`"), "{}", issues[2]);
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, SAMPLE).unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.base_dir(), dir.path());
        assert_eq!(config.workbooks_dir(), dir.path().join("ExcelResources"));
    }
}
