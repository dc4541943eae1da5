//! Runtime side of SheetMaster.
//!
//! The compile step uses [`materialize`] to turn sheet rows into
//! [`MasterRecord`]s and an [`AssetStore`] to persist them. Generated code
//! implements [`MasterRow`] for each record type and loads the assets back
//! into a [`MasterIndex`], published once per process through a
//! [`MasterSlot`].

pub mod decode;
pub mod error;
pub mod index;
pub mod materialize;
pub mod record;
pub mod row;
pub mod slot;
pub mod store;
pub mod value;

pub use decode::{FromFieldValue, UnknownMember};
pub use error::RuntimeError;
pub use index::{KeyCollision, Keyed, MasterIndex};
pub use materialize::{decode_cell, materialize, materialize_sheet, zero_value};
pub use record::{MasterAsset, MasterRecord};
pub use row::MasterRow;
pub use slot::MasterSlot;
pub use store::{AssetStore, FsAssetStore, MemoryAssetStore, is_valid_asset_name};
pub use value::FieldValue;
