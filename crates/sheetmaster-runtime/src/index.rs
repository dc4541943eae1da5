use crate::record::MasterRecord;
use crate::value::FieldValue;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::borrow::Borrow;
use std::fmt::Debug;
use std::hash::Hash;

/// A record with a lookup key.
pub trait Keyed {
    type Key: Eq + Hash + Clone + Debug;

    fn key(&self) -> Self::Key;

    /// How a key reads in collision reports.
    fn describe_key(key: &Self::Key) -> String {
        format!("{key:?}")
    }
}

impl Keyed for MasterRecord {
    type Key = FieldValue;

    fn key(&self) -> Self::Key {
        MasterRecord::key(self).cloned().unwrap_or_default()
    }

    fn describe_key(key: &FieldValue) -> String {
        key.to_string()
    }
}

/// Two records with the same key. The one at `position` replaced the one
/// first stored at `first_position`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyCollision {
    pub key: String,
    pub first_position: usize,
    pub position: usize,
}

/// Read-only key to record map for one master.
///
/// Built once from the record list in file order. A repeated key is reported
/// as a [`KeyCollision`] and the later record wins.
#[derive(Debug, Clone)]
pub struct MasterIndex<R: Keyed> {
    master: String,
    map: FxHashMap<R::Key, R>,
    collisions: Vec<KeyCollision>,
}

impl<R: Keyed> MasterIndex<R> {
    pub fn build(master: impl Into<String>, records: impl IntoIterator<Item = R>) -> Self {
        let master = master.into();
        let records = records.into_iter();
        let mut map = FxHashMap::with_capacity_and_hasher(records.size_hint().0, Default::default());
        let mut first_seen: FxHashMap<R::Key, usize> = FxHashMap::default();
        let mut collisions = Vec::new();

        for (position, record) in records.enumerate() {
            let key = record.key();
            let first_position = *first_seen.entry(key.clone()).or_insert(position);
            if map.insert(key.clone(), record).is_some() {
                let label = R::describe_key(&key);
                tracing::warn!(
                    master = %master,
                    key = %label,
                    first_position,
                    position,
                    "duplicate key, later record replaces the earlier one"
                );
                collisions.push(KeyCollision {
                    key: label,
                    first_position,
                    position,
                });
            }
        }

        Self {
            master,
            map,
            collisions,
        }
    }

    pub fn master_name(&self) -> &str {
        &self.master
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&R>
    where
        R::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.get(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        R::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Entries in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&R::Key, &R)> {
        self.map.iter()
    }

    pub fn collisions(&self) -> &[KeyCollision] {
        &self.collisions
    }
}
