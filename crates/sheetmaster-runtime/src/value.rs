use serde::{Deserialize, Serialize};
use std::{
    fmt::{self, Display},
    hash::{Hash, Hasher},
};

/// A decoded field as stored in a master asset.
///
/// Signed integer kinds are held as `Int`, unsigned as `UInt`, both float
/// kinds as `Float`. Enumeration values are stored as their member name in
/// `Text`, so reordering members never changes stored data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum FieldValue {
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    Bool(bool),
    Text(String),
    Array(Vec<FieldValue>),
    #[default]
    Empty,
}

impl Hash for FieldValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            FieldValue::Int(i) => i.hash(state),
            FieldValue::UInt(u) => u.hash(state),
            FieldValue::Float(f) => f.to_bits().hash(state),
            FieldValue::Char(c) => c.hash(state),
            FieldValue::Bool(b) => b.hash(state),
            FieldValue::Text(s) => s.hash(state),
            FieldValue::Array(items) => items.hash(state),
            FieldValue::Empty => {}
        }
    }
}

impl Eq for FieldValue {}

impl Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(i) => write!(f, "{i}"),
            FieldValue::UInt(u) => write!(f, "{u}"),
            FieldValue::Float(x) => write!(f, "{x}"),
            FieldValue::Char(c) => write!(f, "{c:?}"),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Text(s) => write!(f, "{s:?}"),
            FieldValue::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            FieldValue::Empty => f.write_str("<empty>"),
        }
    }
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(i) => Some(*i as f64),
            FieldValue::UInt(u) => Some(*u as f64),
            FieldValue::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Empty)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Int(value as i64)
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::UInt(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<char> for FieldValue {
    fn from(value: char) -> Self {
        FieldValue::Char(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(values: Vec<T>) -> Self {
        FieldValue::Array(values.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn floats_hash_by_bits() {
        let mut set = FxHashSet::default();
        set.insert(FieldValue::Float(0.5));
        set.insert(FieldValue::Float(0.5));
        set.insert(FieldValue::Int(0));
        set.insert(FieldValue::UInt(0));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn display_is_compact() {
        let v = FieldValue::from(vec![1, 2, 3]);
        assert_eq!(v.to_string(), "[1, 2, 3]");
        assert_eq!(FieldValue::from("Sword").to_string(), "\"Sword\"");
    }

    #[test]
    fn serializes_with_type_tags() {
        let json = serde_json::to_string(&FieldValue::Int(7)).unwrap();
        assert_eq!(json, r#"{"type":"Int","value":7}"#);
        let back: FieldValue = serde_json::from_str(r#"{"type":"Empty"}"#).unwrap();
        assert_eq!(back, FieldValue::Empty);
    }
}
