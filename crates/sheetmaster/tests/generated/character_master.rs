// @generated by sheetmaster from SampleMaster.xlsx, sheet "Character". Do not edit.

//! Characters available to the player.

use sheetmaster_runtime::{AssetStore, FieldValue, FromFieldValue, Keyed, MasterIndex, MasterRecord, MasterRow, RuntimeError, UnknownMember};

/// Characters available to the player.
#[derive(Clone, Debug, PartialEq)]
pub struct CharacterMaster {
    /// Unique character id.
    pub id: i32,
    /// Display name.
    pub name: String,
    /// Hit points.
    pub hp: i32,
    /// Magic points.
    pub mp: i32,
    /// Physical attack.
    pub attack: i32,
    /// Magic attack.
    pub magic_attack: i32,
    /// Physical defense.
    pub defense: i32,
    /// Turn order speed.
    pub speed: f32,
    /// Elemental attribute.
    pub attribute: CharacterAttribute,
}

impl Keyed for CharacterMaster {
    type Key = i32;

    fn key(&self) -> Self::Key {
        self.id
    }
}

impl MasterRow for CharacterMaster {
    const MASTER_NAME: &'static str = "CharacterMaster";
    const FIELDS: &'static [&'static str] = &[
        "Id",
        "Name",
        "HP",
        "MP",
        "Attack",
        "MagicAttack",
        "Defense",
        "Speed",
        "Attribute",
    ];

    fn from_record(record: &MasterRecord) -> Self {
        Self {
            id: record.decode(0),
            name: record.decode(1),
            hp: record.decode(2),
            mp: record.decode(3),
            attack: record.decode(4),
            magic_attack: record.decode(5),
            defense: record.decode(6),
            speed: record.decode(7),
            attribute: record.decode(8),
        }
    }
}

/// Load the `CharacterMaster` asset and index it by `Id`.
pub fn load_and_index(store: &dyn AssetStore) -> Result<MasterIndex<CharacterMaster>, RuntimeError> {
    <CharacterMaster as MasterRow>::load_and_index(store)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CharacterAttribute {
    #[default]
    None,
    Fire,
    Water,
    Wind,
}

impl std::str::FromStr for CharacterAttribute {
    type Err = UnknownMember;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "None" => Ok(Self::None),
            "Fire" => Ok(Self::Fire),
            "Water" => Ok(Self::Water),
            "Wind" => Ok(Self::Wind),
            other => Err(UnknownMember::new("CharacterAttribute", other)),
        }
    }
}

impl FromFieldValue for CharacterAttribute {
    fn from_field_value(value: &FieldValue) -> Option<Self> {
        value.as_text()?.parse().ok()
    }
}
