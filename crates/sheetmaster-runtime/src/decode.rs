//! Typed views of stored field values, used by generated `from_record` bodies.

use crate::value::FieldValue;

/// Conversion from a stored value into a field's declared Rust type.
///
/// `None` means the stored value does not fit the type; the caller then uses
/// the type's default.
pub trait FromFieldValue: Sized {
    fn from_field_value(value: &FieldValue) -> Option<Self>;
}

macro_rules! numeric_from_field_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromFieldValue for $ty {
                fn from_field_value(value: &FieldValue) -> Option<Self> {
                    match value {
                        FieldValue::Int(i) => Some(*i as $ty),
                        FieldValue::UInt(u) => Some(*u as $ty),
                        FieldValue::Float(f) => Some(*f as $ty),
                        _ => None,
                    }
                }
            }
        )*
    };
}

numeric_from_field_value!(u8, i8, i16, u16, i32, u32, i64, u64, f32, f64);

impl FromFieldValue for char {
    fn from_field_value(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Char(c) => Some(*c),
            FieldValue::Int(i) => u32::try_from(*i).ok().and_then(char::from_u32),
            FieldValue::UInt(u) => u32::try_from(*u).ok().and_then(char::from_u32),
            _ => None,
        }
    }
}

impl FromFieldValue for bool {
    fn from_field_value(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl FromFieldValue for String {
    fn from_field_value(value: &FieldValue) -> Option<Self> {
        value.as_text().map(str::to_string)
    }
}

impl FromFieldValue for FieldValue {
    fn from_field_value(value: &FieldValue) -> Option<Self> {
        Some(value.clone())
    }
}

impl<T: FromFieldValue> FromFieldValue for Vec<T> {
    fn from_field_value(value: &FieldValue) -> Option<Self> {
        value
            .as_array()?
            .iter()
            .map(T::from_field_value)
            .collect()
    }
}

impl<T: FromFieldValue, const N: usize> FromFieldValue for [T; N] {
    fn from_field_value(value: &FieldValue) -> Option<Self> {
        let items: Vec<T> = Vec::from_field_value(value)?;
        items.try_into().ok()
    }
}

/// A text value that names no member of a generated enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{member}' is not a member of {enum_name}")]
pub struct UnknownMember {
    pub enum_name: &'static str,
    pub member: String,
}

impl UnknownMember {
    pub fn new(enum_name: &'static str, member: &str) -> Self {
        Self {
            enum_name,
            member: member.to_string(),
        }
    }
}
