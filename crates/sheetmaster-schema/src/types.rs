//! Declared type names and their classification.
//!
//! A header cell carries a free-form type name (`int`, `string`,
//! `CharacterAttribute`, `float[]`, ...). [`TypeTable::classify`] turns it into a
//! [`FieldKind`] once, at extraction time, so later stages dispatch on the kind
//! and never re-parse the name.

use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric and character types read straight from a numeric cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    U8,
    I8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    Char,
}

impl PrimitiveKind {
    /// Built-in spelling lookup. Accepts the spreadsheet-author names
    /// (`byte`, `short`, `int`, ...) as well as Rust names (`u8`, `i16`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "byte" | "u8" => PrimitiveKind::U8,
            "sbyte" | "i8" => PrimitiveKind::I8,
            "short" | "i16" => PrimitiveKind::I16,
            "ushort" | "u16" => PrimitiveKind::U16,
            "int" | "i32" => PrimitiveKind::I32,
            "uint" | "u32" => PrimitiveKind::U32,
            "long" | "i64" => PrimitiveKind::I64,
            "ulong" | "u64" => PrimitiveKind::U64,
            "float" | "f32" => PrimitiveKind::F32,
            "double" | "f64" => PrimitiveKind::F64,
            "char" => PrimitiveKind::Char,
            _ => return None,
        };
        Some(kind)
    }

    /// Rust type used for the field in generated code.
    pub fn rust_name(self) -> &'static str {
        match self {
            PrimitiveKind::U8 => "u8",
            PrimitiveKind::I8 => "i8",
            PrimitiveKind::I16 => "i16",
            PrimitiveKind::U16 => "u16",
            PrimitiveKind::I32 => "i32",
            PrimitiveKind::U32 => "u32",
            PrimitiveKind::I64 => "i64",
            PrimitiveKind::U64 => "u64",
            PrimitiveKind::F32 => "f32",
            PrimitiveKind::F64 => "f64",
            PrimitiveKind::Char => "char",
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, PrimitiveKind::F32 | PrimitiveKind::F64)
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rust_name())
    }
}

/// How a column is decoded and typed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    Primitive { primitive: PrimitiveKind },
    String,
    Boolean,
    Enumeration { name: String, members: Vec<String> },
    /// `T[]` when `len` is `None`, `[T; N]` otherwise.
    FixedArray {
        element: Box<FieldKind>,
        len: Option<usize>,
    },
    /// A named type with no decoding rule; values are only ever carried forward.
    Opaque { name: String },
}

impl FieldKind {
    pub fn primitive(primitive: PrimitiveKind) -> Self {
        FieldKind::Primitive { primitive }
    }

    /// Whether values of this kind can serve as an index key.
    pub fn is_hashable(&self) -> bool {
        match self {
            FieldKind::Primitive { primitive } => !primitive.is_float(),
            FieldKind::String | FieldKind::Boolean | FieldKind::Enumeration { .. } => true,
            FieldKind::FixedArray { .. } | FieldKind::Opaque { .. } => false,
        }
    }

    /// Kinds allowed as array elements.
    fn is_scalar(&self) -> bool {
        !matches!(self, FieldKind::FixedArray { .. } | FieldKind::Opaque { .. })
    }
}

/// Longest `[T; N]` a generated record can hold; longer arrays have no
/// `Default` and are treated as opaque.
pub const MAX_FIXED_ARRAY_LEN: usize = 32;

static FIXED_ARRAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[\s*([^\[\];]+?)\s*;\s*(\d+)\s*\]$").expect("fixed array regex must compile")
});

/// Resolves declared type names to [`FieldKind`]s.
#[derive(Clone, Debug, Default)]
pub struct TypeTable {
    aliases: FxHashMap<String, PrimitiveKind>,
    enums: FxHashMap<String, Vec<String>>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route an extra type name to a primitive kind.
    pub fn with_alias(mut self, name: impl Into<String>, target: PrimitiveKind) -> Self {
        self.aliases.insert(name.into(), target);
        self
    }

    pub fn with_enum<I, S>(mut self, name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enums
            .insert(name.into(), members.into_iter().map(Into::into).collect());
        self
    }

    pub fn add_alias(&mut self, name: impl Into<String>, target: PrimitiveKind) {
        self.aliases.insert(name.into(), target);
    }

    pub fn add_enum(&mut self, name: impl Into<String>, members: Vec<String>) {
        self.enums.insert(name.into(), members);
    }

    pub fn classify(&self, declared: &str) -> FieldKind {
        let declared = declared.trim();

        if let Some(inner) = declared.strip_suffix("[]") {
            return self.array_of(declared, inner.trim(), None);
        }
        if let Some(caps) = FIXED_ARRAY.captures(declared) {
            let len = caps[2].parse::<usize>().ok();
            if let Some(n) = len.filter(|n| *n <= MAX_FIXED_ARRAY_LEN) {
                return self.array_of(declared, &caps[1], Some(n));
            }
            return FieldKind::Opaque {
                name: declared.to_string(),
            };
        }

        self.classify_scalar(declared)
    }

    fn classify_scalar(&self, name: &str) -> FieldKind {
        match name {
            "string" | "String" | "str" => return FieldKind::String,
            "bool" | "boolean" => return FieldKind::Boolean,
            _ => {}
        }
        if let Some(primitive) = PrimitiveKind::from_name(name) {
            return FieldKind::primitive(primitive);
        }
        if let Some(primitive) = self.aliases.get(name) {
            return FieldKind::primitive(*primitive);
        }
        if let Some(members) = self.enums.get(name) {
            return FieldKind::Enumeration {
                name: name.to_string(),
                members: members.clone(),
            };
        }
        FieldKind::Opaque {
            name: name.to_string(),
        }
    }

    fn array_of(&self, declared: &str, element: &str, len: Option<usize>) -> FieldKind {
        let element = self.classify_scalar(element);
        if !element.is_scalar() {
            return FieldKind::Opaque {
                name: declared.to_string(),
            };
        }
        FieldKind::FixedArray {
            element: Box::new(element),
            len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TypeTable {
        TypeTable::new()
            .with_alias("Int32", PrimitiveKind::I32)
            .with_enum("Element", ["None", "Fire", "Water"])
    }

    #[test]
    fn builtin_names_and_rust_spellings_agree() {
        let t = TypeTable::new();
        assert_eq!(t.classify("int"), t.classify("i32"));
        assert_eq!(t.classify("byte"), FieldKind::primitive(PrimitiveKind::U8));
        assert_eq!(t.classify("ulong"), FieldKind::primitive(PrimitiveKind::U64));
        assert_eq!(t.classify("double"), FieldKind::primitive(PrimitiveKind::F64));
        assert_eq!(t.classify("char"), FieldKind::primitive(PrimitiveKind::Char));
        assert_eq!(t.classify(" string "), FieldKind::String);
        assert_eq!(t.classify("bool"), FieldKind::Boolean);
    }

    #[test]
    fn aliases_and_enums_come_from_the_table() {
        let t = table();
        assert_eq!(t.classify("Int32"), FieldKind::primitive(PrimitiveKind::I32));
        match t.classify("Element") {
            FieldKind::Enumeration { name, members } => {
                assert_eq!(name, "Element");
                assert_eq!(members, vec!["None", "Fire", "Water"]);
            }
            other => panic!("expected enumeration, got {other:?}"),
        }
    }

    #[test]
    fn arrays_of_scalars() {
        let t = table();
        assert_eq!(
            t.classify("int[]"),
            FieldKind::FixedArray {
                element: Box::new(FieldKind::primitive(PrimitiveKind::I32)),
                len: None,
            }
        );
        assert_eq!(
            t.classify("[float; 3]"),
            FieldKind::FixedArray {
                element: Box::new(FieldKind::primitive(PrimitiveKind::F32)),
                len: Some(3),
            }
        );
        assert!(matches!(
            t.classify("Element[]"),
            FieldKind::FixedArray { len: None, .. }
        ));
    }

    #[test]
    fn unknown_names_are_opaque() {
        let t = table();
        assert_eq!(
            t.classify("Vector3"),
            FieldKind::Opaque {
                name: "Vector3".into()
            }
        );
        assert_eq!(
            t.classify("Vector3[]"),
            FieldKind::Opaque {
                name: "Vector3[]".into()
            }
        );
        assert_eq!(
            t.classify("[u8; 64]"),
            FieldKind::Opaque {
                name: "[u8; 64]".into()
            }
        );
    }

    #[test]
    fn key_hashability() {
        let t = table();
        assert!(t.classify("int").is_hashable());
        assert!(t.classify("string").is_hashable());
        assert!(t.classify("Element").is_hashable());
        assert!(!t.classify("float").is_hashable());
        assert!(!t.classify("int[]").is_hashable());
        assert!(!t.classify("Vector3").is_hashable());
    }
}
