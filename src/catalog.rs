// Catalog mutations. Each operation re-reads the whole store, validates,
// mutates in memory and writes the whole catalog back. Nothing is cached
// between calls.

use crate::error::CatalogError;
use crate::model::{is_valid_rating, Movie};
use crate::store::MovieStore;

/// Field edited by [`update_movie`]. Which one applies depends on the
/// catalog schema.
#[derive(Debug, Clone, PartialEq)]
pub enum MovieUpdate {
    Rating(Option<f64>),
    /// `None` or a blank note removes the note.
    Note(Option<String>),
}

/// Adds a new movie. Fails without touching the store if a movie with the
/// same title (ignoring case) is already present.
pub fn add_movie<S>(store: &S, title: &str, movie: Movie) -> Result<(), CatalogError>
where
    S: MovieStore + ?Sized,
{
    let title = title.trim();
    if title.is_empty() {
        return Err(CatalogError::EmptyTitle);
    }
    if let Some(rating) = movie.rating {
        if !is_valid_rating(rating) {
            return Err(CatalogError::InvalidRating(rating));
        }
    }

    let mut catalog = store.load();
    if let Some(existing) = catalog.resolve_title(title) {
        return Err(CatalogError::AlreadyExists(existing.to_string()));
    }
    catalog.insert(title, movie);
    store.save(&catalog)?;
    log::info!("Added '{}' to {}", title, store.describe());
    Ok(())
}

/// Removes a movie and returns the title it was stored under.
pub fn delete_movie<S>(store: &S, title: &str) -> Result<String, CatalogError>
where
    S: MovieStore + ?Sized,
{
    let mut catalog = store.load();
    let stored_title = catalog
        .resolve_title(title)
        .map(str::to_string)
        .ok_or_else(|| CatalogError::NotFound(title.trim().to_string()))?;

    catalog.remove(&stored_title);
    store.save(&catalog)?;
    log::info!("Deleted '{}' from {}", stored_title, store.describe());
    Ok(stored_title)
}

/// Changes a single field of an existing movie and returns the title it
/// is stored under. Other fields are left as they are.
pub fn update_movie<S>(store: &S, title: &str, update: MovieUpdate) -> Result<String, CatalogError>
where
    S: MovieStore + ?Sized,
{
    if let MovieUpdate::Rating(Some(rating)) = &update {
        let rating = *rating;
        if !is_valid_rating(rating) {
            return Err(CatalogError::InvalidRating(rating));
        }
    }

    let mut catalog = store.load();
    let stored_title = catalog
        .resolve_title(title)
        .map(str::to_string)
        .ok_or_else(|| CatalogError::NotFound(title.trim().to_string()))?;

    if let Some(movie) = catalog.get_mut(&stored_title) {
        match update {
            MovieUpdate::Rating(rating) => movie.rating = rating,
            MovieUpdate::Note(note) => {
                movie.note = note
                    .map(|n| n.trim().to_string())
                    .filter(|n| !n.is_empty());
            }
        }
    }
    store.save(&catalog)?;
    log::info!("Updated '{}' in {}", stored_title, store.describe());
    Ok(stored_title)
}
