// Metadata lookups: a small blocking HTTP client for OMDb (movie details)
// and REST Countries (country name to ISO code). Both are optional; the
// app falls back to manual entry when no OMDb key is configured.

use crate::error::LookupError;
use crate::model::{is_valid_rating, Movie};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

const OMDB_URL: &str = "http://www.omdbapi.com/";
const COUNTRIES_URL: &str = "https://restcountries.com/v3.1/all";
const FLAG_URL: &str = "https://flagsapi.com";
const IMDB_TITLE_URL: &str = "https://www.imdb.com/title";
const MAX_FLAGS: usize = 3;

/// Movie details as reported by a metadata source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MovieDetails {
    pub title: String,
    pub year: Option<i32>,
    pub rating: Option<f64>,
    pub poster: Option<String>,
    pub countries: Vec<String>,
    pub imdb_id: Option<String>,
}

impl MovieDetails {
    pub fn imdb_link(&self) -> Option<String> {
        self.imdb_id
            .as_ref()
            .map(|id| format!("{}/{}/", IMDB_TITLE_URL, id))
    }

    /// Builds the catalog record, with the given flag URLs attached.
    /// Returns `None` without a release year.
    pub fn to_movie(&self, flags: Vec<String>) -> Option<Movie> {
        Some(Movie {
            year: self.year?,
            rating: self.rating,
            poster: self.poster.clone(),
            note: None,
            imdb_link: self.imdb_link(),
            flags,
        })
    }
}

/// Source of movie metadata, looked up by title.
pub trait MetadataSource {
    fn find_movie(&self, title: &str) -> Result<MovieDetails, LookupError>;

    /// Map of common country name to ISO 3166-1 alpha-2 code.
    fn country_codes(&self) -> Result<HashMap<String, String>, LookupError>;
}

/// Flag image URLs for the first few countries. Countries missing from
/// `codes` are returned separately so the caller can warn about them.
pub fn flag_urls(countries: &[String], codes: &HashMap<String, String>) -> (Vec<String>, Vec<String>) {
    let mut flags = Vec::new();
    let mut unknown = Vec::new();
    for country in countries.iter().take(MAX_FLAGS) {
        match codes.get(country) {
            Some(code) => flags.push(format!("{}/{}/flat/64.png", FLAG_URL, code)),
            None => unknown.push(country.clone()),
        }
    }
    (flags, unknown)
}

#[derive(Deserialize, Debug)]
struct OmdbResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "Country")]
    country: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
}

/// OMDb uses the literal "N/A" for missing values.
fn available(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != "N/A")
}

impl OmdbResponse {
    fn into_details(self, query: &str) -> Result<MovieDetails, LookupError> {
        if !self.response.eq_ignore_ascii_case("true") {
            let reason = self.error.unwrap_or_default();
            log::debug!("OMDb has no match for '{}': {}", query, reason);
            return Err(LookupError::NotFound(query.to_string()));
        }

        let title = available(self.title).ok_or_else(|| LookupError::NotFound(query.to_string()))?;
        // Series report ranges such as "2008–2013"; keep the first year.
        let year = available(self.year).and_then(|y| {
            y.chars()
                .take_while(char::is_ascii_digit)
                .collect::<String>()
                .parse()
                .ok()
        });
        let rating = available(self.imdb_rating)
            .and_then(|r| r.parse::<f64>().ok())
            .filter(|r| is_valid_rating(*r));
        let countries = available(self.country)
            .map(|c| {
                c.split(',')
                    .map(|country| country.trim().to_string())
                    .filter(|country| !country.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(MovieDetails {
            title,
            year,
            rating,
            poster: available(self.poster),
            countries,
            imdb_id: available(self.imdb_id),
        })
    }
}

#[derive(Deserialize, Debug)]
struct CountryName {
    common: Option<String>,
}

#[derive(Deserialize, Debug)]
struct CountryEntry {
    name: Option<CountryName>,
    cca2: Option<String>,
}

fn country_map(entries: Vec<CountryEntry>) -> HashMap<String, String> {
    entries
        .into_iter()
        .filter_map(|entry| Some((entry.name?.common?, entry.cca2?)))
        .collect()
}

/// Blocking OMDb + REST Countries client.
#[derive(Clone)]
pub struct OmdbClient {
    client: Client,
    api_key: String,
}

impl OmdbClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, LookupError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(OmdbClient {
            client,
            api_key: api_key.into(),
        })
    }
}

impl MetadataSource for OmdbClient {
    fn find_movie(&self, title: &str) -> Result<MovieDetails, LookupError> {
        let res = self
            .client
            .get(OMDB_URL)
            .query(&[("apikey", self.api_key.as_str()), ("t", title)])
            .send()?
            .error_for_status()?;
        let body: OmdbResponse = res
            .json()
            .map_err(|e| LookupError::Decode(e.to_string()))?;
        body.into_details(title)
    }

    fn country_codes(&self) -> Result<HashMap<String, String>, LookupError> {
        let res = self
            .client
            .get(COUNTRIES_URL)
            .query(&[("fields", "name,cca2")])
            .send()?
            .error_for_status()?;
        let entries: Vec<CountryEntry> = res
            .json()
            .map_err(|e| LookupError::Decode(e.to_string()))?;
        Ok(country_map(entries))
    }
}
