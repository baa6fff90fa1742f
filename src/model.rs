// Data model: a movie record and the catalog that maps titles to records.
// The same `Movie` shape serves both catalog variants; the `Schema`
// decides which fields a store persists and which field "update" edits.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 10.0;
pub const MIN_YEAR: i32 = 1888;
pub const MAX_YEAR: i32 = 2100;

/// One catalog entry. The title is not part of the record, it is the
/// catalog key. Field names match the historical data files.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Movie {
    #[serde(rename = "Year", alias = "year")]
    pub year: i32,
    #[serde(rename = "Rating", alias = "rating", default)]
    pub rating: Option<f64>,
    #[serde(rename = "Poster", default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(rename = "Note", default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(rename = "imdbID", default, skip_serializing_if = "Option::is_none")]
    pub imdb_link: Option<String>,
    #[serde(rename = "Flag", default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
}

impl Movie {
    pub fn new(year: i32, rating: Option<f64>) -> Self {
        Movie {
            year,
            rating,
            ..Default::default()
        }
    }

    /// Rating formatted for display, `N/A` when the movie is unrated.
    pub fn rating_label(&self) -> String {
        match self.rating {
            Some(r) => format!("{:.1}", r),
            None => "N/A".to_string(),
        }
    }
}

pub fn is_valid_rating(rating: f64) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&rating)
}

/// Catalog variant. Fixed per deployment, never detected per record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Schema {
    /// Title, year, rating and poster. "Update" edits the rating.
    Basic,
    /// Adds note, IMDb link and country flags. "Update" edits the note.
    #[default]
    Extended,
}

impl Schema {
    pub fn csv_columns(self) -> &'static [&'static str] {
        match self {
            Schema::Basic => &["Title", "Year", "Rating", "Poster"],
            Schema::Extended => &["Title", "Year", "Rating", "Poster", "Note", "imdbID", "Flag"],
        }
    }

    /// Drops the fields this variant does not persist.
    pub fn project(self, movie: &Movie) -> Movie {
        match self {
            Schema::Basic => Movie {
                year: movie.year,
                rating: movie.rating,
                poster: movie.poster.clone(),
                ..Default::default()
            },
            Schema::Extended => movie.clone(),
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schema::Basic => write!(f, "basic"),
            Schema::Extended => write!(f, "extended"),
        }
    }
}

impl FromStr for Schema {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(Schema::Basic),
            "extended" => Ok(Schema::Extended),
            other => Err(format!("unknown catalog schema '{}'", other)),
        }
    }
}

/// Full set of movies for one session, keyed by exact title.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(transparent)]
pub struct Catalog {
    movies: BTreeMap<String, Movie>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn get(&self, title: &str) -> Option<&Movie> {
        self.movies.get(title)
    }

    pub fn get_mut(&mut self, title: &str) -> Option<&mut Movie> {
        self.movies.get_mut(title)
    }

    pub fn insert(&mut self, title: impl Into<String>, movie: Movie) -> Option<Movie> {
        self.movies.insert(title.into(), movie)
    }

    pub fn remove(&mut self, title: &str) -> Option<Movie> {
        self.movies.remove(title)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Movie)> {
        self.movies.iter()
    }

    pub fn titles(&self) -> impl Iterator<Item = &String> {
        self.movies.keys()
    }

    /// Finds the stored title for a user-typed one: exact match first,
    /// then a trimmed case-insensitive match.
    pub fn resolve_title(&self, title: &str) -> Option<&str> {
        if let Some((key, _)) = self.movies.get_key_value(title) {
            return Some(key.as_str());
        }
        let wanted = normalize_title(title);
        self.movies
            .keys()
            .find(|key| normalize_title(key) == wanted)
            .map(|key| key.as_str())
    }

    pub fn contains_title_ignore_case(&self, title: &str) -> bool {
        self.resolve_title(title).is_some()
    }
}

impl FromIterator<(String, Movie)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (String, Movie)>>(iter: I) -> Self {
        Catalog {
            movies: iter.into_iter().collect(),
        }
    }
}

pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}
