//! SheetMaster: spreadsheet master data compiled into typed Rust.
//!
//! Workbooks carry one master per sheet. An `@` cell marks the top-left of a
//! three-row header (types, names, descriptions) with data rows below.
//! [`pipeline::compile`] turns those headers into generated record modules,
//! [`pipeline::materialize`] turns the data rows into JSON assets, and the
//! generated loaders read the assets back into key-indexed
//! [`MasterIndex`](sheetmaster_runtime::MasterIndex)es at startup.

pub mod config;
pub mod error;
pub mod manifest;
pub mod pipeline;

pub use config::{Config, ConfigError, ConfigIssue, DEFAULT_CONFIG_FILE, TypesConfig};
pub use error::CompileError;
pub use manifest::{MANIFEST_FILE, SchemaManifest};
pub use pipeline::{
    AGGREGATE_FILE, CompileReport, MasterReport, MaterializeReport, WriteMode, aggregate, compile,
    compile_with, inspect, materialize,
};
