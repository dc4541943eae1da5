use crate::decode::FromFieldValue;
use crate::value::FieldValue;
use serde::{Deserialize, Serialize};

/// One materialized row: values in schema field order. The key is field 0.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MasterRecord {
    pub values: Vec<FieldValue>,
}

impl MasterRecord {
    pub fn new(values: Vec<FieldValue>) -> Self {
        Self { values }
    }

    pub fn key(&self) -> Option<&FieldValue> {
        self.values.first()
    }

    pub fn get(&self, idx: usize) -> Option<&FieldValue> {
        self.values.get(idx)
    }

    /// Typed value of field `idx`, or the type's default when the field is
    /// missing or holds a value of another shape.
    pub fn decode<T: FromFieldValue + Default>(&self, idx: usize) -> T {
        self.values
            .get(idx)
            .and_then(T::from_field_value)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<FieldValue> for MasterRecord {
    fn from_iter<I: IntoIterator<Item = FieldValue>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Persisted record set of one master.
///
/// Field names travel with the records so a later materialization can carry
/// values forward by name even after columns moved.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MasterAsset {
    pub master: String,
    pub fields: Vec<String>,
    pub records: Vec<MasterRecord>,
}

impl MasterAsset {
    pub fn new(master: impl Into<String>, fields: Vec<String>, records: Vec<MasterRecord>) -> Self {
        Self {
            master: master.into(),
            fields,
            records,
        }
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == name)
    }

    /// Value of field `name` in the record at `position`.
    pub fn value_at(&self, position: usize, name: &str) -> Option<&FieldValue> {
        let idx = self.field_index(name)?;
        self.records.get(position)?.get(idx)
    }
}
