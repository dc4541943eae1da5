//! Emits Rust source for compiled masters.
//!
//! [`synthesize`] renders one module per master (record struct, key binding,
//! loader) and [`synthesize_aggregate`] renders the `mod.rs` that loads every
//! master in order. Both are pure: the same input always renders the same
//! bytes.

pub mod aggregate;
pub mod naming;
pub mod record;
pub mod writer;

pub use aggregate::{AggregateTemplate, synthesize_aggregate};
pub use naming::{module_name, type_name};
pub use record::{RecordTemplate, synthesize};
pub use writer::SourceWriter;

/// Settings shared by both synthesizers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodegenOptions {
    /// Path generated `use` lines import the runtime traits from.
    pub runtime_crate: String,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            runtime_crate: "sheetmaster_runtime".to_string(),
        }
    }
}

/// Marker every generated file starts with.
pub const GENERATED_MARKER: &str = "@generated";
