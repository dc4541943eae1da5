use crate::error::RuntimeError;
use once_cell::sync::OnceCell;

/// Process-wide, build-once home for a loaded value.
///
/// Readers only ever see a fully built value. The first successful
/// initialization wins; later `get_or_try_init` calls return it without
/// running their closure.
#[derive(Debug)]
pub struct MasterSlot<T> {
    name: &'static str,
    cell: OnceCell<T>,
}

impl<T> MasterSlot<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            cell: OnceCell::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Build the value on first use. A failed build publishes nothing, so a
    /// later call may try again.
    pub fn get_or_try_init<F>(&self, init: F) -> Result<&T, RuntimeError>
    where
        F: FnOnce() -> Result<T, RuntimeError>,
    {
        self.cell.get_or_try_init(|| {
            let value = init()?;
            tracing::info!(slot = self.name, "published");
            Ok(value)
        })
    }

    /// Publish an already built value. Fails if the slot is taken.
    pub fn try_publish(&self, value: T) -> Result<&T, RuntimeError> {
        self.cell.set(value).map_err(|_| RuntimeError::AlreadyInitialized {
            master: self.name.to_string(),
        })?;
        tracing::info!(slot = self.name, "published");
        self.cell.get().ok_or_else(|| RuntimeError::AlreadyInitialized {
            master: self.name.to_string(),
        })
    }
}
