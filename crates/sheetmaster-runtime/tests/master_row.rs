use sheetmaster_runtime::{
    AssetStore, FieldValue, FsAssetStore, Keyed, MasterAsset, MasterRecord, MasterRow,
    MemoryAssetStore, RuntimeError,
};

#[derive(Clone, Debug, PartialEq)]
struct ItemMaster {
    id: i32,
    name: String,
    drops: Vec<u16>,
}

impl Keyed for ItemMaster {
    type Key = i32;

    fn key(&self) -> Self::Key {
        self.id
    }
}

impl MasterRow for ItemMaster {
    const MASTER_NAME: &'static str = "ItemMaster";
    const FIELDS: &'static [&'static str] = &["id", "name", "drops"];

    fn from_record(record: &MasterRecord) -> Self {
        Self {
            id: record.decode(0),
            name: record.decode(1),
            drops: record.decode(2),
        }
    }
}

fn row(id: i64, name: &str, drops: Vec<u64>) -> MasterRecord {
    MasterRecord::new(vec![
        FieldValue::Int(id),
        FieldValue::Text(name.into()),
        FieldValue::from(drops),
    ])
}

fn item_asset(records: Vec<MasterRecord>) -> MasterAsset {
    MasterAsset::new(
        "ItemMaster",
        vec!["id".into(), "name".into(), "drops".into()],
        records,
    )
}

#[test]
fn loads_typed_rows_into_an_index() {
    let store = MemoryAssetStore::new();
    store
        .save(&item_asset(vec![
            row(1, "Sword", vec![3, 4]),
            row(2, "Shield", vec![]),
        ]))
        .unwrap();

    let index = ItemMaster::load_and_index(&store).unwrap();
    assert_eq!(index.master_name(), "ItemMaster");
    assert_eq!(index.len(), 2);
    assert_eq!(
        index.get(&1),
        Some(&ItemMaster {
            id: 1,
            name: "Sword".into(),
            drops: vec![3, 4],
        })
    );
    assert!(index.get(&3).is_none());
}

#[test]
fn duplicate_keys_keep_the_later_row() {
    let store = MemoryAssetStore::new();
    store
        .save(&item_asset(vec![row(1, "A", vec![]), row(1, "B", vec![])]))
        .unwrap();

    let index = ItemMaster::load_and_index(&store).unwrap();
    assert_eq!(index.len(), 1);
    assert_eq!(index.get(&1).map(|i| i.name.as_str()), Some("B"));
    assert_eq!(index.collisions().len(), 1);
}

#[test]
fn missing_asset_is_reported() {
    let err = ItemMaster::load_all(&MemoryAssetStore::new()).unwrap_err();
    assert!(matches!(err, RuntimeError::MissingAsset { master } if master == "ItemMaster"));
}

#[test]
fn field_list_must_match() {
    let store = MemoryAssetStore::new();
    store
        .save(&MasterAsset::new(
            "ItemMaster",
            vec!["id".into(), "title".into()],
            vec![],
        ))
        .unwrap();
    let err = ItemMaster::load_all(&store).unwrap_err();
    assert!(matches!(err, RuntimeError::SchemaMismatch { .. }));
}

#[test]
fn filesystem_store_round_trips_for_typed_loading() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsAssetStore::new(dir.path());
    store
        .save(&item_asset(vec![row(5, "Bow", vec![1])]))
        .unwrap();
    assert!(store.path_for("ItemMaster").unwrap().exists());

    let rows = ItemMaster::load_all(&store).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].key(), 5);
}
