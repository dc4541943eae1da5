use crate::error::RuntimeError;
use crate::index::{Keyed, MasterIndex};
use crate::record::MasterRecord;
use crate::store::AssetStore;

/// A generated record type bound to one master.
pub trait MasterRow: Keyed + Sized {
    const MASTER_NAME: &'static str;

    /// Column names in schema order, as stored in the asset.
    const FIELDS: &'static [&'static str];

    fn from_record(record: &MasterRecord) -> Self;

    /// Every stored record of this master, in file order.
    fn load_all(store: &dyn AssetStore) -> Result<Vec<Self>, RuntimeError> {
        let asset = store
            .load(Self::MASTER_NAME)?
            .ok_or_else(|| RuntimeError::MissingAsset {
                master: Self::MASTER_NAME.to_string(),
            })?;
        if asset.fields.iter().map(String::as_str).ne(Self::FIELDS.iter().copied()) {
            return Err(RuntimeError::SchemaMismatch {
                master: Self::MASTER_NAME.to_string(),
                expected: Self::FIELDS.iter().map(|f| f.to_string()).collect(),
                found: asset.fields,
            });
        }
        Ok(asset.records.iter().map(Self::from_record).collect())
    }

    fn load_and_index(store: &dyn AssetStore) -> Result<MasterIndex<Self>, RuntimeError> {
        let rows = Self::load_all(store)?;
        let index = MasterIndex::build(Self::MASTER_NAME, rows);
        tracing::debug!(
            master = Self::MASTER_NAME,
            records = index.len(),
            collisions = index.collisions().len(),
            "master indexed"
        );
        Ok(index)
    }
}
