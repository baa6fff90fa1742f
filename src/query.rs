// Read-only queries over a loaded catalog snapshot. None of these touch
// the store.

use crate::fuzzy;
use crate::model::{Catalog, Movie};
use rand::seq::IndexedRandom;
use rand::Rng;
use std::cmp::Ordering;

pub const MIN_SEARCH_LEN: usize = 2;
pub const SEARCH_THRESHOLD: u8 = 60;
pub const SEARCH_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct RatingStats {
    pub average: f64,
    pub median: f64,
    pub best_rating: f64,
    pub worst_rating: f64,
    /// Every movie rated `best_rating`; ties are all kept.
    pub best: Vec<String>,
    /// Every movie rated `worst_rating`; ties are all kept.
    pub worst: Vec<String>,
}

/// Average, median, best and worst over rated movies. `None` when no
/// movie has a rating.
pub fn statistics(catalog: &Catalog) -> Option<RatingStats> {
    let mut ratings: Vec<f64> = catalog.iter().filter_map(|(_, m)| m.rating).collect();
    if ratings.is_empty() {
        return None;
    }
    ratings.sort_by(f64::total_cmp);

    let count = ratings.len();
    let average = ratings.iter().sum::<f64>() / count as f64;
    let median = if count % 2 == 1 {
        ratings[count / 2]
    } else {
        (ratings[count / 2 - 1] + ratings[count / 2]) / 2.0
    };
    let worst_rating = ratings[0];
    let best_rating = ratings[count - 1];

    let titles_rated = |rating: f64| -> Vec<String> {
        catalog
            .iter()
            .filter(|(_, m)| m.rating == Some(rating))
            .map(|(title, _)| title.clone())
            .collect()
    };

    Some(RatingStats {
        average,
        median,
        best_rating,
        worst_rating,
        best: titles_rated(best_rating),
        worst: titles_rated(worst_rating),
    })
}

/// Movies ordered by title, the default listing order.
pub fn all_movies(catalog: &Catalog) -> Vec<(&str, &Movie)> {
    catalog.iter().map(|(t, m)| (t.as_str(), m)).collect()
}

/// Highest rating first. Unrated movies come last; ties keep title order.
pub fn sorted_by_rating(catalog: &Catalog) -> Vec<(&str, &Movie)> {
    let mut movies = all_movies(catalog);
    movies.sort_by(|(_, a), (_, b)| match (a.rating, b.rating) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    movies
}

pub fn sorted_by_year(catalog: &Catalog, latest_first: bool) -> Vec<(&str, &Movie)> {
    let mut movies = all_movies(catalog);
    if latest_first {
        movies.sort_by(|(_, a), (_, b)| b.year.cmp(&a.year));
    } else {
        movies.sort_by_key(|(_, m)| m.year);
    }
    movies
}

/// Optional, inclusive bounds. An absent bound does not constrain.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MovieFilter {
    pub min_rating: Option<f64>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
}

impl MovieFilter {
    pub fn matches(&self, movie: &Movie) -> bool {
        let rating_ok = match self.min_rating {
            None => true,
            Some(min) => movie.rating.is_some_and(|r| r >= min),
        };
        let start_ok = self.start_year.map_or(true, |start| movie.year >= start);
        let end_ok = self.end_year.map_or(true, |end| movie.year <= end);
        rating_ok && start_ok && end_ok
    }
}

pub fn filter_movies<'a>(catalog: &'a Catalog, filter: &MovieFilter) -> Vec<(&'a str, &'a Movie)> {
    all_movies(catalog)
        .into_iter()
        .filter(|(_, movie)| filter.matches(movie))
        .collect()
}

pub fn random_movie<'a, R>(catalog: &'a Catalog, rng: &mut R) -> Option<(&'a str, &'a Movie)>
where
    R: Rng + ?Sized,
{
    all_movies(catalog).choose(rng).copied()
}

#[derive(Debug, PartialEq)]
pub enum SearchOutcome<'a> {
    QueryTooShort,
    Matches(Vec<fuzzy::Match<'a>>),
}

/// Fuzzy title search. Queries shorter than [`MIN_SEARCH_LEN`] characters
/// are refused.
pub fn search<'a>(catalog: &'a Catalog, query: &str) -> SearchOutcome<'a> {
    let query = query.trim();
    if query.chars().count() < MIN_SEARCH_LEN {
        return SearchOutcome::QueryTooShort;
    }
    SearchOutcome::Matches(fuzzy::extract(
        query,
        catalog.titles().map(String::as_str),
        SEARCH_THRESHOLD,
        SEARCH_LIMIT,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn catalog(entries: &[(&str, i32, Option<f64>)]) -> Catalog {
        entries
            .iter()
            .map(|(title, year, rating)| (title.to_string(), Movie::new(*year, *rating)))
            .collect()
    }

    fn titles(movies: &[(&str, &Movie)]) -> Vec<String> {
        movies.iter().map(|(t, _)| t.to_string()).collect()
    }

    #[test]
    fn statistics_of_two_movies() {
        let catalog = catalog(&[("Inception", 2010, Some(8.8)), ("Up", 2009, Some(8.3))]);

        let stats = statistics(&catalog).unwrap();

        assert!((stats.average - 8.55).abs() < 1e-9);
        assert!((stats.median - 8.55).abs() < 1e-9);
        assert_eq!(stats.best, vec!["Inception"]);
        assert_eq!(stats.worst, vec!["Up"]);
    }

    #[test]
    fn statistics_keep_ties_and_skip_unrated() {
        let catalog = catalog(&[
            ("A", 2000, Some(9.0)),
            ("B", 2001, Some(9.0)),
            ("C", 2002, Some(5.0)),
            ("D", 2003, None),
        ]);

        let stats = statistics(&catalog).unwrap();

        assert_eq!(stats.best, vec!["A", "B"]);
        assert_eq!(stats.worst, vec!["C"]);
        assert_eq!(stats.median, 9.0);
    }

    #[test]
    fn statistics_need_a_rating() {
        let unrated = catalog(&[("X", 2000, None)]);
        assert!(statistics(&unrated).is_none());
        assert!(statistics(&Catalog::new()).is_none());
    }

    #[test]
    fn rating_sort_is_descending_with_unrated_last() {
        let catalog = catalog(&[
            ("Low", 2000, Some(3.0)),
            ("Unknown", 2000, None),
            ("High", 2000, Some(9.5)),
        ]);
        assert_eq!(titles(&sorted_by_rating(&catalog)), vec!["High", "Low", "Unknown"]);
    }

    #[test]
    fn year_sort_in_both_directions() {
        let catalog = catalog(&[("B", 1999, None), ("A", 2010, None), ("C", 1950, None)]);
        assert_eq!(titles(&sorted_by_year(&catalog, true)), vec!["A", "B", "C"]);
        assert_eq!(titles(&sorted_by_year(&catalog, false)), vec!["C", "B", "A"]);
    }

    #[test]
    fn filter_by_start_year() {
        let catalog = catalog(&[("Inception", 2010, Some(8.8)), ("Up", 2009, Some(8.3))]);
        let filter = MovieFilter {
            start_year: Some(2010),
            ..Default::default()
        };
        assert_eq!(titles(&filter_movies(&catalog, &filter)), vec!["Inception"]);
    }

    #[test]
    fn min_rating_filter_is_a_subset() {
        let catalog = catalog(&[
            ("A", 1990, Some(6.9)),
            ("B", 2000, Some(7.0)),
            ("C", 2010, Some(9.1)),
            ("D", 2020, None),
        ]);
        let everything = filter_movies(&catalog, &MovieFilter::default());
        let filter = MovieFilter {
            min_rating: Some(7.0),
            ..Default::default()
        };
        let rated = filter_movies(&catalog, &filter);

        assert_eq!(everything.len(), 4);
        assert!(rated.iter().all(|entry| everything.contains(entry)));
        assert!(rated.iter().all(|(_, m)| m.rating.unwrap() >= 7.0));
        assert_eq!(titles(&rated), vec!["B", "C"]);
    }

    #[test]
    fn filter_bounds_are_inclusive_and_combined() {
        let catalog = catalog(&[
            ("A", 1990, Some(8.0)),
            ("B", 2000, Some(8.0)),
            ("C", 2000, Some(6.0)),
            ("D", 2001, Some(9.0)),
        ]);
        let filter = MovieFilter {
            min_rating: Some(8.0),
            start_year: Some(1990),
            end_year: Some(2000),
        };
        assert_eq!(titles(&filter_movies(&catalog, &filter)), vec!["A", "B"]);
    }

    #[test]
    fn random_movie_comes_from_catalog() {
        let catalog = catalog(&[("A", 2000, Some(1.0)), ("B", 2001, Some(2.0))]);
        let mut rng = StdRng::seed_from_u64(7);

        let (title, _) = random_movie(&catalog, &mut rng).unwrap();

        assert!(title == "A" || title == "B");
        assert!(random_movie(&Catalog::new(), &mut rng).is_none());
    }

    #[test]
    fn search_refuses_short_queries() {
        let catalog = catalog(&[("Up", 2009, Some(8.3))]);
        assert_eq!(search(&catalog, "u"), SearchOutcome::QueryTooShort);
        assert_eq!(search(&catalog, "  u "), SearchOutcome::QueryTooShort);
    }

    #[test]
    fn search_finds_partial_titles() {
        let catalog = catalog(&[("Inception", 2010, Some(8.8)), ("Up", 2009, Some(8.3))]);

        let SearchOutcome::Matches(matches) = search(&catalog, "incep") else {
            panic!("expected matches");
        };

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].candidate, "Inception");
    }
}
