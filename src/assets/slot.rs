use std::fmt;
use std::sync::{Arc, OnceLock};

/// Single-assignment shared cell.
///
/// Starts empty and is filled at most once; every clone observes the same
/// value. A filled slot is never cleared or replaced.
pub struct AssetSlot<T> {
    name: Arc<str>,
    cell: Arc<OnceLock<T>>,
}

impl<T> AssetSlot<T> {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            cell: Arc::new(OnceLock::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Populate the slot. A second fill is rejected and hands the value back.
    pub fn fill(&self, value: T) -> Result<(), T> {
        self.cell.set(value)
    }

    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    pub fn is_filled(&self) -> bool {
        self.cell.get().is_some()
    }

    /// True when both handles refer to the same cell
    pub fn same_slot(&self, other: &AssetSlot<T>) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }
}

impl<T> Clone for AssetSlot<T> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for AssetSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetSlot")
            .field("name", &self.name)
            .field("value", &self.cell.get())
            .finish()
    }
}
