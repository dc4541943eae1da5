// Shared workbook fixtures for the integration tests.
#![allow(dead_code)]

use sheetmaster::Config;
use sheetmaster_common::CellValue;
use sheetmaster_io::{JsonAdapter, SheetData};
use sheetmaster_schema::TypeTable;
use std::path::Path;

pub const CONFIG_YAML: &str = r#"
workbooks: workbooks
generated_source: src/masters
assets: assets/masters
types:
  enums:
    CharacterAttribute: [None, Fire, Water, Wind]
"#;

pub fn character_types() -> TypeTable {
    TypeTable::new().with_enum("CharacterAttribute", ["None", "Fire", "Water", "Wind"])
}

const CHARACTER_COLUMNS: [(&str, &str, &str); 9] = [
    ("int", "Id", "Unique character id."),
    ("string", "Name", "Display name."),
    ("int", "HP", "Hit points."),
    ("int", "MP", "Magic points."),
    ("int", "Attack", "Physical attack."),
    ("int", "MagicAttack", "Magic attack."),
    ("int", "Defense", "Physical defense."),
    ("float", "Speed", "Turn order speed."),
    ("CharacterAttribute", "Attribute", "Elemental attribute."),
];

/// Character sheet with its anchor at `B3`. Column A carries row labels.
pub fn character_sheet() -> SheetData {
    let mut sheet = SheetData::new("Character");
    sheet.set(0, 0, "CharacterMaster");
    sheet.set(0, 2, "Characters available to the player.");
    sheet.set(2, 1, "@");
    sheet.set(3, 0, "Type");
    sheet.set(4, 0, "Name");
    sheet.set(5, 0, "Description");
    for (offset, (ty, name, description)) in CHARACTER_COLUMNS.iter().enumerate() {
        let col = 1 + offset as u32;
        sheet.set(3, col, *ty);
        sheet.set(4, col, *name);
        sheet.set(5, col, *description);
    }

    let rows: [(i64, &str, [i64; 5], f64, &str); 3] = [
        (1, "Alice", [120, 30, 15, 8, 10], 1.5, "Fire"),
        (2, "Bram", [200, 0, 22, 0, 18], 0.75, "None"),
        (3, "Cleo", [90, 80, 6, 25, 7], 1.25, "Water"),
    ];
    for (r, (id, name, stats, speed, attribute)) in rows.into_iter().enumerate() {
        let row = 6 + r as u32;
        sheet.set(row, 1, id);
        sheet.set(row, 2, name);
        for (offset, stat) in stats.into_iter().enumerate() {
            sheet.set(row, 3 + offset as u32, stat);
        }
        sheet.set(row, 8, speed);
        sheet.set(row, 9, attribute);
    }
    sheet
}

/// `ItemMaster` with its anchor at `A6` and data on rows 9 and 10 (0-based).
pub fn item_sheet() -> SheetData {
    SheetData::from_cells(
        "Items",
        [
            (0, 0, CellValue::from("ItemMaster")),
            (5, 0, CellValue::from("@")),
            (6, 0, CellValue::from("int")),
            (6, 1, CellValue::from("string")),
            (7, 0, CellValue::from("id")),
            (7, 1, CellValue::from("name")),
            (9, 0, CellValue::from(1i64)),
            (9, 1, CellValue::from("Sword")),
            (10, 0, CellValue::from(2i64)),
            (10, 1, CellValue::from("Shield")),
        ],
    )
}

pub fn write_workbook(path: &Path, sheets: &[SheetData]) {
    let mut adapter = JsonAdapter::new();
    for sheet in sheets {
        adapter.put_sheet(sheet);
    }
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    adapter.save_to_path(path).unwrap();
}

/// A project directory with `sheetmaster.yaml` and an empty workbook folder.
pub fn project(root: &Path) -> Config {
    let config_path = root.join(sheetmaster::DEFAULT_CONFIG_FILE);
    std::fs::write(&config_path, CONFIG_YAML).unwrap();
    std::fs::create_dir_all(root.join("workbooks")).unwrap();
    Config::load(&config_path).unwrap()
}
