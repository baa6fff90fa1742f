use super::{write_atomically, MovieStore};
use crate::error::StorageError;
use crate::model::{is_valid_rating, Catalog, Movie, Schema};
use csv::{ReaderBuilder, StringRecord, Writer};
use std::path::PathBuf;

const FLAG_SEPARATOR: char = ',';

/// Catalog stored as a CSV table with a header row. The column set is
/// fixed by the configured [`Schema`]; list values are comma-joined.
pub struct CsvStore {
    file_path: PathBuf,
    schema: Schema,
}

/// Positions of the schema columns in the file's header row.
struct Columns {
    title: usize,
    year: usize,
    rating: usize,
    poster: usize,
    note: Option<usize>,
    imdb: Option<usize>,
    flag: Option<usize>,
}

impl Columns {
    fn locate(headers: &StringRecord, schema: Schema) -> Result<Self, String> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let missing: Vec<&str> = schema
            .csv_columns()
            .iter()
            .copied()
            .filter(|name| find(name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(format!("missing columns: {}", missing.join(", ")));
        }

        let required = |name: &str| find(name).unwrap_or_default();
        let extended = |name: &str| match schema {
            Schema::Basic => None,
            Schema::Extended => find(name),
        };
        Ok(Columns {
            title: required("Title"),
            year: required("Year"),
            rating: required("Rating"),
            poster: required("Poster"),
            note: extended("Note"),
            imdb: extended("imdbID"),
            flag: extended("Flag"),
        })
    }
}

fn field(record: &StringRecord, index: usize) -> &str {
    record.get(index).unwrap_or("").trim()
}

fn optional_field(record: &StringRecord, index: Option<usize>) -> Option<String> {
    let value = field(record, index?);
    (!value.is_empty()).then(|| value.to_string())
}

impl CsvStore {
    pub fn new(file_path: impl Into<PathBuf>, schema: Schema) -> Self {
        CsvStore {
            file_path: file_path.into(),
            schema,
        }
    }

    fn parse_row(columns: &Columns, record: &StringRecord) -> Result<(String, Movie), String> {
        let title = field(record, columns.title);
        if title.is_empty() {
            return Err("row without a title".to_string());
        }

        let year = field(record, columns.year)
            .parse::<i32>()
            .map_err(|e| format!("invalid year for '{}': {}", title, e))?;

        let rating = match field(record, columns.rating) {
            "" => None,
            raw => {
                let rating = raw
                    .parse::<f64>()
                    .map_err(|e| format!("invalid rating for '{}': {}", title, e))?;
                if !is_valid_rating(rating) {
                    return Err(format!("rating {} for '{}' is out of range", rating, title));
                }
                Some(rating)
            }
        };

        let flags = columns
            .flag
            .map(|index| {
                field(record, index)
                    .split(FLAG_SEPARATOR)
                    .map(str::trim)
                    .filter(|url| !url.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let movie = Movie {
            year,
            rating,
            poster: optional_field(record, Some(columns.poster)),
            note: optional_field(record, columns.note),
            imdb_link: optional_field(record, columns.imdb),
            flags,
        };
        Ok((title.to_string(), movie))
    }

    fn to_row(&self, title: &str, movie: &Movie) -> Vec<String> {
        let mut row = vec![
            title.to_string(),
            movie.year.to_string(),
            movie.rating.map(|r| r.to_string()).unwrap_or_default(),
            movie.poster.clone().unwrap_or_default(),
        ];
        if self.schema == Schema::Extended {
            row.push(movie.note.clone().unwrap_or_default());
            row.push(movie.imdb_link.clone().unwrap_or_default());
            row.push(movie.flags.join(&FLAG_SEPARATOR.to_string()));
        }
        row
    }
}

impl MovieStore for CsvStore {
    fn load(&self) -> Catalog {
        if !self.file_path.exists() {
            log::info!(
                "{} does not exist yet, starting with an empty catalog",
                self.file_path.display()
            );
            return Catalog::new();
        }

        let mut reader = match ReaderBuilder::new().flexible(true).from_path(&self.file_path) {
            Ok(reader) => reader,
            Err(e) => {
                log::warn!("Could not open {}: {}", self.file_path.display(), e);
                return Catalog::new();
            }
        };

        let columns = match reader
            .headers()
            .map_err(|e| e.to_string())
            .and_then(|headers| Columns::locate(headers, self.schema))
        {
            Ok(columns) => columns,
            Err(e) => {
                log::warn!(
                    "{} does not match the {} schema ({}), starting with an empty catalog",
                    self.file_path.display(),
                    self.schema,
                    e
                );
                return Catalog::new();
            }
        };

        let mut catalog = Catalog::new();
        for (line, record) in reader.records().enumerate() {
            let parsed = record
                .map_err(|e| e.to_string())
                .and_then(|record| Self::parse_row(&columns, &record));
            match parsed {
                Ok((title, movie)) => {
                    catalog.insert(title, movie);
                }
                // +2: one for the header, one for 1-based line numbers
                Err(e) => log::warn!(
                    "Skipping row {} of {}: {}",
                    line + 2,
                    self.file_path.display(),
                    e
                ),
            }
        }
        catalog
    }

    fn save(&self, catalog: &Catalog) -> Result<(), StorageError> {
        write_atomically(&self.file_path, |file| {
            let mut writer = Writer::from_writer(file);
            writer.write_record(self.schema.csv_columns())?;
            for (title, movie) in catalog.iter() {
                writer.write_record(self.to_row(title, movie))?;
            }
            writer.flush().map_err(csv::Error::from)?;
            Ok(())
        })?;
        log::debug!("Saved {} movies to {}", catalog.len(), self.file_path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        format!("CSV file {}", self.file_path.display())
    }
}
