use sheetmaster_codegen::{CodegenOptions, RecordTemplate, synthesize};
use sheetmaster_common::CellRef;
use sheetmaster_schema::{ColumnSchema, MasterSchema, SourceRef, TypeTable};

fn types() -> TypeTable {
    TypeTable::new().with_enum("Element", ["None", "Fire", "Water"])
}

fn schema(master: &str, description: &str, columns: &[(&str, &str)]) -> MasterSchema {
    let types = types();
    MasterSchema {
        master_name: master.into(),
        master_description: description.into(),
        key_type: columns[0].0.into(),
        key_column: 0,
        fields: columns
            .iter()
            .enumerate()
            .map(|(col, (declared, name))| ColumnSchema {
                column: col as u32,
                declared_type: declared.to_string(),
                kind: types.classify(declared),
                field_name: name.to_string(),
                description: String::new(),
            })
            .collect(),
        source: SourceRef {
            workbook: "Items.xlsx".into(),
            sheet: "Items".into(),
        },
        anchor: CellRef::new(1, 0),
        data_start_row: 5,
    }
}

fn render(schema: &MasterSchema) -> String {
    synthesize(schema, &CodegenOptions::default()).unwrap()
}

#[test]
fn synthesis_is_idempotent() {
    let s = schema(
        "ItemMaster",
        "Items.",
        &[("int", "id"), ("string", "name"), ("Element", "element")],
    );
    assert_eq!(render(&s), render(&s));
    assert_eq!(render(&s), render(&s.clone()));
}

#[test]
fn plain_masters_import_only_what_they_use() {
    let out = render(&schema("ItemMaster", "", &[("int", "id"), ("string", "name")]));
    assert!(out.starts_with(
        "// @generated by sheetmaster from Items.xlsx, sheet \"Items\". Do not edit.\n\n"
    ));
    assert!(out.contains(
        "use sheetmaster_runtime::{AssetStore, Keyed, MasterIndex, MasterRecord, MasterRow, RuntimeError};\n"
    ));
    assert!(out.contains("/// One row of the `ItemMaster` master.\n"));
    assert!(out.contains("    pub id: i32,\n    pub name: String,\n"));
    assert!(out.contains("        self.id\n"));
    assert!(!out.contains("enum"));
}

#[test]
fn string_keys_are_cloned() {
    let out = render(&schema("SkillMaster", "", &[("string", "code"), ("int", "power")]));
    assert!(out.contains("    type Key = String;\n"));
    assert!(out.contains("        self.code.clone()\n"));
    assert!(out.contains("/// Load the `SkillMaster` asset and index it by `code`.\n"));
}

#[test]
fn arrays_and_opaque_fields() {
    let out = render(&schema(
        "DropMaster",
        "",
        &[
            ("int", "id"),
            ("ushort[]", "drops"),
            ("[float; 3]", "offset"),
            ("Vector3", "spawn"),
        ],
    ));
    assert!(out.contains("    pub drops: Vec<u16>,\n"));
    assert!(out.contains("    pub offset: [f32; 3],\n"));
    assert!(out.contains("    pub spawn: FieldValue,\n"));
    assert!(out.contains("use sheetmaster_runtime::{AssetStore, FieldValue, Keyed,"));
    assert!(!out.contains("FromFieldValue"));
    assert!(out.contains("            spawn: record.decode(3),\n"));
}

#[test]
fn enums_render_once_with_the_first_member_as_default() {
    let out = render(&schema(
        "SpellMaster",
        "",
        &[("int", "id"), ("Element", "element"), ("Element[]", "weak_to")],
    ));
    assert_eq!(out.matches("pub enum Element {").count(), 1);
    assert!(out.contains("    pub weak_to: Vec<Element>,\n"));
    assert!(out.contains("    #[default]\n    None,\n    Fire,\n    Water,\n"));
    assert!(out.contains("            \"Fire\" => Ok(Self::Fire),\n"));
    assert!(out.contains("            other => Err(UnknownMember::new(\"Element\", other)),\n"));
    assert!(out.contains("FieldValue, FromFieldValue, Keyed"));
    assert!(out.contains("UnknownMember};"));
}

#[test]
fn awkward_column_names_become_valid_identifiers() {
    let s = schema(
        "ItemMaster",
        "",
        &[("int", "Id"), ("string", "type"), ("int", "Max HP"), ("int", "maxHP")],
    );
    let template = RecordTemplate::from_schema(&s, &CodegenOptions::default()).unwrap();
    let idents: Vec<&str> = template.fields.iter().map(|f| f.ident.as_str()).collect();
    assert_eq!(idents, vec!["id", "r#type", "max_hp", "max_hp_2"]);

    let out = template.render();
    assert!(out.contains("            r#type: record.decode(1),\n"));
    // Column names stay as written in the field list.
    assert!(out.contains("        \"Max HP\",\n"));
}

#[test]
fn sheet_names_are_quoted_in_the_header() {
    let mut s = schema("ItemMaster", "", &[("int", "id")]);
    s.source.sheet = "Items \"v2\"".into();
    let out = render(&s);
    assert!(out.starts_with(
        "// @generated by sheetmaster from Items.xlsx, sheet \"Items \\\"v2\\\"\". Do not edit.\n"
    ));
}

#[test]
fn multi_line_descriptions_become_doc_lines() {
    let out = render(&schema(
        "ItemMaster",
        "Every item.\nSee the design doc.",
        &[("int", "id")],
    ));
    assert!(out.contains("//! Every item.\n//! See the design doc.\n"));
    assert!(out.contains("/// Every item.\n/// See the design doc.\n#[derive"));
}
