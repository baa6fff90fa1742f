use super::{io_error, write_atomically, MovieStore};
use crate::error::StorageError;
use crate::model::{is_valid_rating, Catalog, Movie, Schema};
use serde_json::Value;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

/// Catalog stored as one JSON object keyed by title.
pub struct JsonStore {
    file_path: PathBuf,
    schema: Schema,
}

impl JsonStore {
    pub fn new(file_path: impl Into<PathBuf>, schema: Schema) -> Self {
        JsonStore {
            file_path: file_path.into(),
            schema,
        }
    }

    fn parse(&self, content: &str) -> Catalog {
        let data: Value = match serde_json::from_str(content) {
            Ok(data) => data,
            Err(e) => {
                log::warn!("{} contains invalid JSON: {}", self.file_path.display(), e);
                return Catalog::new();
            }
        };

        let Value::Object(entries) = data else {
            log::warn!(
                "Invalid data structure in {}, expected an object keyed by title",
                self.file_path.display()
            );
            return Catalog::new();
        };

        entries
            .into_iter()
            .filter_map(|(title, value)| match serde_json::from_value::<Movie>(value) {
                Ok(Movie {
                    rating: Some(rating),
                    ..
                }) if !is_valid_rating(rating) => {
                    log::warn!("Skipping movie '{}': rating {} is out of range", title, rating);
                    None
                }
                Ok(movie) => Some((title, self.schema.project(&movie))),
                Err(e) => {
                    log::warn!("Skipping movie '{}': {}", title, e);
                    None
                }
            })
            .collect()
    }
}

impl MovieStore for JsonStore {
    fn load(&self) -> Catalog {
        match std::fs::read_to_string(&self.file_path) {
            Ok(content) => self.parse(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!(
                    "{} does not exist yet, starting with an empty catalog",
                    self.file_path.display()
                );
                Catalog::new()
            }
            Err(e) => {
                log::warn!("Could not read {}: {}", self.file_path.display(), e);
                Catalog::new()
            }
        }
    }

    fn save(&self, catalog: &Catalog) -> Result<(), StorageError> {
        let projected: Catalog = catalog
            .iter()
            .map(|(title, movie)| (title.clone(), self.schema.project(movie)))
            .collect();

        write_atomically(&self.file_path, |file| {
            serde_json::to_writer_pretty(&mut *file, &projected)?;
            file.write_all(b"\n").map_err(io_error(&self.file_path))?;
            Ok(())
        })?;
        log::debug!("Saved {} movies to {}", catalog.len(), self.file_path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        format!("JSON file {}", self.file_path.display())
    }
}
