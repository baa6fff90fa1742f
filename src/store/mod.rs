// Record store: the load/save boundary between a `Catalog` and its
// backing file.
//
// Every store reads and writes the whole catalog at once. Loading never
// fails: a missing file is an empty catalog, malformed content is logged
// and skipped. Saving writes a temporary file next to the target and
// renames it over the old one, so a failed save leaves the previous file
// in place.

mod csv_store;
mod json_store;
mod memory_store;

pub use csv_store::CsvStore;
pub use json_store::JsonStore;
pub use memory_store::MemoryStore;

use crate::error::StorageError;
use crate::model::{Catalog, Schema};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tempfile::NamedTempFile;

pub trait MovieStore {
    /// Reads the full catalog from the backing storage.
    fn load(&self) -> Catalog;

    /// Replaces the backing storage with the given catalog.
    fn save(&self, catalog: &Catalog) -> Result<(), StorageError>;

    /// Human readable location, used in messages.
    fn describe(&self) -> String;
}

impl<S: MovieStore + ?Sized> MovieStore for Box<S> {
    fn load(&self) -> Catalog {
        (**self).load()
    }

    fn save(&self, catalog: &Catalog) -> Result<(), StorageError> {
        (**self).save(catalog)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StorageFormat {
    Json,
    Csv,
}

impl StorageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            StorageFormat::Json => "json",
            StorageFormat::Csv => "csv",
        }
    }

    /// Guesses the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        ext.parse().ok()
    }
}

impl fmt::Display for StorageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for StorageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(StorageFormat::Json),
            "csv" => Ok(StorageFormat::Csv),
            other => Err(format!("unknown storage format '{}'", other)),
        }
    }
}

/// Opens the store implementation for the given format.
pub fn open_store(format: StorageFormat, path: PathBuf, schema: Schema) -> Box<dyn MovieStore> {
    match format {
        StorageFormat::Json => Box::new(JsonStore::new(path, schema)),
        StorageFormat::Csv => Box::new(CsvStore::new(path, schema)),
    }
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Writes `path` through a temporary file in the same directory and an
/// atomic rename. Missing parent directories are created.
fn write_atomically<F>(path: &Path, write: F) -> Result<(), StorageError>
where
    F: FnOnce(&mut NamedTempFile) -> Result<(), StorageError>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(io_error(dir))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_error(dir))?;
    write(&mut tmp)?;
    // The temp file starts out private; keep the mode of the file it replaces.
    if let Ok(existing) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(existing.permissions())
            .map_err(io_error(path))?;
    }
    tmp.as_file().sync_all().map_err(io_error(path))?;
    tmp.persist(path).map_err(|source| StorageError::Persist {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_format_from_extension() {
        assert_eq!(StorageFormat::from_path(Path::new("data/movies.csv")), Some(StorageFormat::Csv));
        assert_eq!(StorageFormat::from_path(Path::new("data.JSON")), Some(StorageFormat::Json));
        assert_eq!(StorageFormat::from_path(Path::new("movies.txt")), None);
        assert_eq!(StorageFormat::from_path(Path::new("movies")), None);
    }

    #[test]
    fn save_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("movies.json");
        let store = open_store(StorageFormat::Json, path.clone(), Schema::Basic);

        store.save(&Catalog::new()).unwrap();

        assert!(path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn save_keeps_permissions_of_the_replaced_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movies.csv");
        fs::write(&path, "").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
        let store = open_store(StorageFormat::Csv, path.clone(), Schema::Basic);

        store.save(&Catalog::new()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }
}
