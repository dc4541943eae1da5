//! Per-master module: record struct, key binding, loader and enums.

use crate::naming::{field_idents, rust_type, str_literal, type_name};
use crate::writer::SourceWriter;
use crate::{CodegenOptions, GENERATED_MARKER};
use sheetmaster_schema::{FieldKind, MasterSchema};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldTemplate {
    pub ident: String,
    pub column_name: String,
    pub rust_type: String,
    pub doc: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumTemplate {
    pub type_name: String,
    /// `(variant ident, member text)` in declaration order.
    pub variants: Vec<(String, String)>,
}

/// Everything the record module renders, resolved from one schema.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordTemplate {
    pub runtime_crate: String,
    pub workbook: String,
    pub sheet: String,
    pub master_name: String,
    pub type_name: String,
    pub doc: String,
    pub fields: Vec<FieldTemplate>,
    pub key_type: String,
    /// Key getter clones instead of copying.
    pub key_clones: bool,
    pub enums: Vec<EnumTemplate>,
    pub uses_opaque: bool,
}

impl RecordTemplate {
    /// `None` for a schema without fields: there is no key to index by.
    pub fn from_schema(schema: &MasterSchema, options: &CodegenOptions) -> Option<Self> {
        let key = schema.key_field()?;
        let idents = field_idents(schema.field_names());
        let fields = schema
            .fields
            .iter()
            .zip(idents)
            .map(|(column, ident)| FieldTemplate {
                ident,
                column_name: column.field_name.clone(),
                rust_type: rust_type(&column.kind),
                doc: column.description.trim().to_string(),
            })
            .collect::<Vec<_>>();

        let mut enums: Vec<EnumTemplate> = Vec::new();
        let mut uses_opaque = false;
        for column in &schema.fields {
            let scalar = match &column.kind {
                FieldKind::FixedArray { element, .. } => element.as_ref(),
                other => other,
            };
            match scalar {
                FieldKind::Enumeration { name, members } => {
                    let enum_type = type_name(name);
                    if enums.iter().all(|e| e.type_name != enum_type) {
                        enums.push(EnumTemplate {
                            type_name: enum_type,
                            variants: members.iter().map(|m| (type_name(m), m.clone())).collect(),
                        });
                    }
                }
                FieldKind::Opaque { .. } => uses_opaque = true,
                _ => {}
            }
        }

        let description = schema.master_description.trim();
        Some(Self {
            runtime_crate: options.runtime_crate.clone(),
            workbook: schema.source.workbook.clone(),
            sheet: schema.source.sheet.clone(),
            master_name: schema.master_name.clone(),
            type_name: type_name(&schema.master_name),
            doc: if description.is_empty() {
                format!("One row of the `{}` master.", schema.master_name)
            } else {
                description.to_string()
            },
            key_type: rust_type(&key.kind),
            key_clones: matches!(key.kind, FieldKind::String),
            fields,
            enums,
            uses_opaque,
        })
    }

    fn imports(&self) -> Vec<&'static str> {
        let mut names = vec![
            "AssetStore",
            "Keyed",
            "MasterIndex",
            "MasterRecord",
            "MasterRow",
            "RuntimeError",
        ];
        if self.uses_opaque || !self.enums.is_empty() {
            names.push("FieldValue");
        }
        if !self.enums.is_empty() {
            names.push("FromFieldValue");
            names.push("UnknownMember");
        }
        names.sort_unstable();
        names
    }

    pub fn render(&self) -> String {
        let mut w = SourceWriter::new();
        w.line(format!(
            "// {GENERATED_MARKER} by sheetmaster from {}, sheet {}. Do not edit.",
            self.workbook,
            str_literal(&self.sheet)
        ));
        w.blank();
        w.inner_doc(&self.doc);
        w.blank();
        w.line(format!(
            "use {}::{{{}}};",
            self.runtime_crate,
            self.imports().join(", ")
        ));

        self.render_struct(&mut w);
        self.render_impls(&mut w);
        for e in &self.enums {
            render_enum(&mut w, e);
        }
        w.finish()
    }

    fn render_struct(&self, w: &mut SourceWriter) {
        w.blank();
        w.doc(&self.doc);
        w.line("#[derive(Clone, Debug, PartialEq)]");
        w.open(format!("pub struct {} {{", self.type_name));
        for field in &self.fields {
            if !field.doc.is_empty() {
                w.doc(&field.doc);
            }
            w.line(format!("pub {}: {},", field.ident, field.rust_type));
        }
        w.close("}");
    }

    fn render_impls(&self, w: &mut SourceWriter) {
        let Some(key) = self.fields.first() else {
            return;
        };

        w.blank();
        w.open(format!("impl Keyed for {} {{", self.type_name));
        w.line(format!("type Key = {};", self.key_type));
        w.blank();
        w.open("fn key(&self) -> Self::Key {");
        if self.key_clones {
            w.line(format!("self.{}.clone()", key.ident));
        } else {
            w.line(format!("self.{}", key.ident));
        }
        w.close("}");
        w.close("}");

        w.blank();
        w.open(format!("impl MasterRow for {} {{", self.type_name));
        w.line(format!(
            "const MASTER_NAME: &'static str = {};",
            str_literal(&self.master_name)
        ));
        w.open("const FIELDS: &'static [&'static str] = &[");
        for field in &self.fields {
            w.line(format!("{},", str_literal(&field.column_name)));
        }
        w.close("];");
        w.blank();
        w.open("fn from_record(record: &MasterRecord) -> Self {");
        w.open("Self {");
        for (idx, field) in self.fields.iter().enumerate() {
            w.line(format!("{}: record.decode({idx}),", field.ident));
        }
        w.close("}");
        w.close("}");
        w.close("}");

        w.blank();
        w.doc(&format!(
            "Load the `{}` asset and index it by `{}`.",
            self.master_name, key.column_name
        ));
        w.open(format!(
            "pub fn load_and_index(store: &dyn AssetStore) -> Result<MasterIndex<{}>, RuntimeError> {{",
            self.type_name
        ));
        w.line(format!(
            "<{} as MasterRow>::load_and_index(store)",
            self.type_name
        ));
        w.close("}");
    }
}

fn render_enum(w: &mut SourceWriter, e: &EnumTemplate) {
    w.blank();
    w.line("#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]");
    w.open(format!("pub enum {} {{", e.type_name));
    for (idx, (variant, _)) in e.variants.iter().enumerate() {
        if idx == 0 {
            w.line("#[default]");
        }
        w.line(format!("{variant},"));
    }
    w.close("}");

    w.blank();
    w.open(format!("impl std::str::FromStr for {} {{", e.type_name));
    w.line("type Err = UnknownMember;");
    w.blank();
    w.open("fn from_str(s: &str) -> Result<Self, Self::Err> {");
    w.open("match s {");
    for (variant, member) in &e.variants {
        w.line(format!("{} => Ok(Self::{variant}),", str_literal(member)));
    }
    w.line(format!(
        "other => Err(UnknownMember::new({}, other)),",
        str_literal(&e.type_name)
    ));
    w.close("}");
    w.close("}");
    w.close("}");

    w.blank();
    w.open(format!("impl FromFieldValue for {} {{", e.type_name));
    w.open("fn from_field_value(value: &FieldValue) -> Option<Self> {");
    w.line("value.as_text()?.parse().ok()");
    w.close("}");
    w.close("}");
}

/// Rust source of the module for one master, or `None` when the schema has
/// no fields to generate.
pub fn synthesize(schema: &MasterSchema, options: &CodegenOptions) -> Option<String> {
    RecordTemplate::from_schema(schema, options).map(|template| template.render())
}
