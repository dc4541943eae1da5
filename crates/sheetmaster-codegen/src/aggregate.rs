//! The `mod.rs` that ties every generated master together.

use crate::naming::{module_name, type_name};
use crate::writer::SourceWriter;
use crate::{CodegenOptions, GENERATED_MARKER};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregateEntry {
    pub module: String,
    pub type_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregateTemplate {
    pub runtime_crate: String,
    pub entries: Vec<AggregateEntry>,
}

impl AggregateTemplate {
    pub fn new<S: AsRef<str>>(master_names: &[S], options: &CodegenOptions) -> Self {
        Self {
            runtime_crate: options.runtime_crate.clone(),
            entries: master_names
                .iter()
                .map(|name| AggregateEntry {
                    module: module_name(name.as_ref()),
                    type_name: type_name(name.as_ref()),
                })
                .collect(),
        }
    }

    pub fn render(&self) -> String {
        let mut w = SourceWriter::new();
        w.line(format!("// {GENERATED_MARKER} by sheetmaster. Do not edit."));
        w.blank();
        w.inner_doc("Every compiled master, loaded together.");

        if !self.entries.is_empty() {
            w.blank();
            for e in &self.entries {
                w.line(format!("pub mod {};", e.module));
            }
            w.blank();
            for e in &self.entries {
                w.line(format!("pub use {}::{};", e.module, e.type_name));
            }
        }

        w.blank();
        w.line(format!(
            "use {}::{{AssetStore, MasterIndex, MasterSlot, RuntimeError}};",
            self.runtime_crate
        ));

        w.blank();
        w.doc("One index per master.");
        w.line("#[derive(Debug)]");
        w.open("pub struct Masters {");
        for e in &self.entries {
            w.line(format!("pub {}: MasterIndex<{}>,", e.module, e.type_name));
        }
        w.close("}");

        w.blank();
        w.open("impl Masters {");
        w.doc("Load and index every master, in compile order.");
        w.open("pub fn load(store: &dyn AssetStore) -> Result<Self, RuntimeError> {");
        for e in &self.entries {
            w.line(format!(
                "let {} = {}::load_and_index(store)?;",
                e.module, e.module
            ));
        }
        if self.entries.is_empty() {
            w.line("let _ = store;");
            w.line("Ok(Self {})");
        } else {
            w.open("Ok(Self {");
            for e in &self.entries {
                w.line(format!("{},", e.module));
            }
            w.close("})");
        }
        w.close("}");
        w.close("}");

        w.blank();
        w.line("static MASTERS: MasterSlot<Masters> = MasterSlot::new(\"Masters\");");

        w.blank();
        w.doc("Load every master once per process. Later calls return the published set.");
        w.open("pub fn init_masters(store: &dyn AssetStore) -> Result<&'static Masters, RuntimeError> {");
        w.line("MASTERS.get_or_try_init(|| Masters::load(store))");
        w.close("}");

        w.blank();
        w.doc("The published masters, once `init_masters` has succeeded.");
        w.open("pub fn masters() -> Option<&'static Masters> {");
        w.line("MASTERS.get()");
        w.close("}");

        w.finish()
    }
}

/// Rust source of the aggregate loader for `master_names`, in the given order.
pub fn synthesize_aggregate<S: AsRef<str>>(master_names: &[S], options: &CodegenOptions) -> String {
    AggregateTemplate::new(master_names, options).render()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_in_the_given_order() {
        let src = synthesize_aggregate(&["ItemMaster", "CharacterMaster"], &CodegenOptions::default());
        let item = src.find("item_master::load_and_index").unwrap();
        let character = src.find("character_master::load_and_index").unwrap();
        assert!(item < character);
        assert!(src.contains("pub mod item_master;\npub mod character_master;\n"));
        assert!(src.contains("pub use character_master::CharacterMaster;"));
        assert!(src.contains("    pub item_master: MasterIndex<ItemMaster>,"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let names = vec!["A".to_string(), "B".to_string()];
        let options = CodegenOptions::default();
        assert_eq!(
            synthesize_aggregate(&names, &options),
            synthesize_aggregate(&names, &options)
        );
    }

    #[test]
    fn empty_list_still_renders_a_loader() {
        let src = synthesize_aggregate::<&str>(&[], &CodegenOptions::default());
        assert!(src.contains("pub struct Masters {\n}"));
        assert!(src.contains("Ok(Self {})"));
        assert!(!src.contains("pub mod"));
    }

    #[test]
    fn runtime_path_is_configurable() {
        let options = CodegenOptions {
            runtime_crate: "crate::runtime".into(),
        };
        let src = synthesize_aggregate(&["ItemMaster"], &options);
        assert!(src.contains("use crate::runtime::{AssetStore, MasterIndex, MasterSlot, RuntimeError};"));
    }
}
