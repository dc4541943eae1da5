//! Identifier and type spelling shared by both synthesizers.

use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;
use sheetmaster_schema::FieldKind;

static KEYWORDS: Lazy<FxHashSet<&'static str>> = Lazy::new(|| {
    [
        "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
        "extern", "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod",
        "move", "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super",
        "trait", "true", "type", "unsafe", "use", "where", "while", "abstract", "become", "box",
        "do", "final", "macro", "override", "priv", "try", "typeof", "unsized", "virtual",
        "yield",
    ]
    .into_iter()
    .collect()
});

/// Type names generated modules import or declare themselves, plus the
/// prelude types they spell out. Masters and enums cannot take these.
pub const RESERVED_TYPE_NAMES: [&str; 15] = [
    "AssetStore",
    "FieldValue",
    "FromFieldValue",
    "Keyed",
    "MasterIndex",
    "MasterRecord",
    "MasterRow",
    "MasterSlot",
    "Masters",
    "RuntimeError",
    "UnknownMember",
    "Option",
    "Result",
    "String",
    "Vec",
];

pub fn is_reserved_type(name: &str) -> bool {
    RESERVED_TYPE_NAMES.contains(&name)
}

/// Keywords that cannot be written as raw identifiers.
const NO_RAW: [&str; 4] = ["self", "Self", "super", "crate"];

pub fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(name)
}

/// Whether `name` can be used verbatim as a Rust identifier.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    name != "_" && chars.all(|c| c == '_' || c.is_alphanumeric()) && !is_keyword(name)
}

/// `MagicAttack` -> `magic_attack`, `HTTPServer` -> `http_server`.
pub fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_numeric() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(char::is_lowercase),
                _ => false,
            };
            if boundary && !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    let trimmed = out.trim_end_matches('_');
    if trimmed.is_empty() {
        return "field".to_string();
    }
    if trimmed.starts_with(|c: char| c.is_numeric()) {
        return format!("_{trimmed}");
    }
    trimmed.to_string()
}

/// `item_master` -> `ItemMaster`. Names that are already camel case pass through.
pub fn type_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for chunk in name.split(|c: char| !c.is_alphanumeric()) {
        let mut chars = chunk.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    if out.is_empty() {
        return "Master".to_string();
    }
    if out.starts_with(|c: char| c.is_numeric()) {
        out.insert(0, 'M');
    }
    if is_keyword(&out) {
        out.push('_');
    }
    out
}

/// File stem and module name of a master's generated module.
pub fn module_name(master: &str) -> String {
    let name = snake_case(master);
    if is_keyword(&name) {
        format!("{name}_")
    } else {
        name
    }
}

/// Struct field identifier for a column name.
pub fn field_ident(name: &str) -> String {
    let name = snake_case(name);
    if NO_RAW.contains(&name.as_str()) {
        format!("{name}_")
    } else if is_keyword(&name) {
        format!("r#{name}")
    } else {
        name
    }
}

/// Field identifiers for a column list, suffixed `_2`, `_3`, ... where two
/// names collapse to the same identifier.
pub fn field_idents<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = FxHashSet::default();
    names
        .into_iter()
        .map(|name| {
            let base = field_ident(name);
            let mut ident = base.clone();
            let mut n = 2;
            while !seen.insert(ident.clone()) {
                ident = format!("{base}_{n}");
                n += 1;
            }
            ident
        })
        .collect()
}

/// Rust type a field of this kind is declared with.
pub fn rust_type(kind: &FieldKind) -> String {
    match kind {
        FieldKind::Primitive { primitive } => primitive.rust_name().to_string(),
        FieldKind::String => "String".to_string(),
        FieldKind::Boolean => "bool".to_string(),
        FieldKind::Enumeration { name, .. } => type_name(name),
        FieldKind::FixedArray { element, len: None } => format!("Vec<{}>", rust_type(element)),
        FieldKind::FixedArray {
            element,
            len: Some(n),
        } => format!("[{}; {n}]", rust_type(element)),
        FieldKind::Opaque { .. } => "FieldValue".to_string(),
    }
}

/// Rust string literal for `text`.
pub fn str_literal(text: &str) -> String {
    format!("{text:?}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetmaster_schema::PrimitiveKind;

    #[test]
    fn snake_case_splits_words_and_acronyms() {
        assert_eq!(snake_case("Id"), "id");
        assert_eq!(snake_case("HP"), "hp");
        assert_eq!(snake_case("MagicAttack"), "magic_attack");
        assert_eq!(snake_case("HTTPServer"), "http_server");
        assert_eq!(snake_case("Item Name"), "item_name");
        assert_eq!(snake_case("hp2Max"), "hp2_max");
        assert_eq!(snake_case("already_snake"), "already_snake");
        assert_eq!(snake_case("2nd"), "_2nd");
        assert_eq!(snake_case("--"), "field");
    }

    #[test]
    fn type_names_are_upper_camel() {
        assert_eq!(type_name("CharacterMaster"), "CharacterMaster");
        assert_eq!(type_name("item_master"), "ItemMaster");
        assert_eq!(type_name("weapon list"), "WeaponList");
        assert_eq!(type_name("3d"), "M3d");
    }

    #[test]
    fn keywords_are_escaped() {
        assert_eq!(field_ident("Type"), "r#type");
        assert_eq!(field_ident("Self"), "self_");
        assert_eq!(module_name("Match"), "match_");
        assert!(!is_identifier("fn"));
        assert!(is_identifier("Fire"));
        assert!(!is_identifier("Big Fire"));
    }

    #[test]
    fn reserved_types_cover_runtime_names() {
        assert!(is_reserved_type("Keyed"));
        assert!(is_reserved_type(&type_name("field_value")));
        assert!(is_reserved_type("Masters"));
        assert!(!is_reserved_type("ItemMaster"));
    }

    #[test]
    fn clashing_idents_get_suffixes() {
        let idents = field_idents(["Id", "ID", "id", "Name"]);
        assert_eq!(idents, vec!["id", "id_2", "id_3", "name"]);
    }

    #[test]
    fn field_types() {
        let int = FieldKind::primitive(PrimitiveKind::I32);
        assert_eq!(rust_type(&int), "i32");
        assert_eq!(
            rust_type(&FieldKind::FixedArray {
                element: Box::new(int.clone()),
                len: None
            }),
            "Vec<i32>"
        );
        assert_eq!(
            rust_type(&FieldKind::FixedArray {
                element: Box::new(FieldKind::primitive(PrimitiveKind::F32)),
                len: Some(3)
            }),
            "[f32; 3]"
        );
        assert_eq!(
            rust_type(&FieldKind::Opaque {
                name: "Vector3".into()
            }),
            "FieldValue"
        );
    }
}
