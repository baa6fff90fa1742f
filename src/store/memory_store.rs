use super::MovieStore;
use crate::error::StorageError;
use crate::model::Catalog;
use std::cell::{Cell, RefCell};
use std::io;
use std::path::PathBuf;

/// In-process store. Useful for tests and for running without a file.
#[derive(Default)]
pub struct MemoryStore {
    catalog: RefCell<Catalog>,
    saves: Cell<usize>,
    fail_writes: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(catalog: Catalog) -> Self {
        MemoryStore {
            catalog: RefCell::new(catalog),
            ..Default::default()
        }
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }

    /// Makes every following save fail, like a read-only disk.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }
}

impl MovieStore for MemoryStore {
    fn load(&self) -> Catalog {
        self.catalog.borrow().clone()
    }

    fn save(&self, catalog: &Catalog) -> Result<(), StorageError> {
        if self.fail_writes.get() {
            return Err(StorageError::Io {
                path: PathBuf::from("<memory>"),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "writes disabled"),
            });
        }
        *self.catalog.borrow_mut() = catalog.clone();
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory catalog".to_string()
    }
}
