//! Approximate title matching for the search command.
//!
//! Scores are in `0..=100`. A title scores the better of its whole-string
//! similarity and its best partial similarity, where the shorter string
//! is compared against every same-length window of the longer one. That
//! way "incep" scores 100 against "Inception".

/// Levenshtein (edit) distance between two strings, by characters.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    levenshtein_chars(&a_chars, &b_chars)
}

fn levenshtein_chars(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev_row: Vec<usize> = (0..=b.len()).collect();
    let mut curr_row: Vec<usize> = vec![0; b.len() + 1];

    for (i, a_char) in a.iter().enumerate() {
        curr_row[0] = i + 1;
        for (j, b_char) in b.iter().enumerate() {
            let cost = if a_char == b_char { 0 } else { 1 };
            curr_row[j + 1] = (prev_row[j + 1] + 1)
                .min(curr_row[j] + 1)
                .min(prev_row[j] + cost);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b.len()]
}

fn ratio_chars(a: &[char], b: &[char]) -> u8 {
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 100;
    }
    let distance = levenshtein_chars(a, b);
    (((longest - distance) * 100) as f64 / longest as f64).round() as u8
}

/// Whole-string similarity, case-insensitive.
pub fn ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    ratio_chars(&a, &b)
}

/// Best similarity of the shorter string against any window of the
/// longer one, case-insensitive.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return if long.is_empty() { 100 } else { 0 };
    }

    long.windows(short.len())
        .map(|window| ratio_chars(&short, window))
        .max()
        .unwrap_or(0)
}

pub fn score(query: &str, candidate: &str) -> u8 {
    ratio(query, candidate).max(partial_ratio(query, candidate))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Match<'a> {
    pub candidate: &'a str,
    pub score: u8,
}

/// Candidates scoring strictly above `threshold`, best first, at most
/// `limit` of them. Equal scores keep the candidates' original order.
pub fn extract<'a, I>(query: &str, candidates: I, threshold: u8, limit: usize) -> Vec<Match<'a>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut matches: Vec<Match<'a>> = candidates
        .into_iter()
        .map(|candidate| Match {
            candidate,
            score: score(query, candidate),
        })
        .filter(|m| m.score > threshold)
        .collect();
    matches.sort_by(|a, b| b.score.cmp(&a.score));
    matches.truncate(limit);
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_counts_edits() {
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("same", "same"), 0);
    }

    #[test]
    fn partial_match_inside_title_scores_full() {
        assert_eq!(partial_ratio("incep", "Inception"), 100);
        assert_eq!(score("MATRIX", "The Matrix"), 100);
    }

    #[test]
    fn typo_still_scores_high() {
        assert!(score("godfathr", "The Godfather") > 80);
        assert!(score("zzzz", "Up") < 60);
    }

    #[test]
    fn extract_ranks_and_caps() {
        let titles = [
            "Star Wars",
            "Star Trek",
            "Stardust",
            "Starship Troopers",
            "A Star Is Born",
            "Star Wars: The Last Jedi",
            "Up",
        ];

        let matches = extract("star", titles.iter().copied(), 60, 5);

        assert_eq!(matches.len(), 5);
        assert!(matches.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(matches.iter().all(|m| m.candidate != "Up"));
    }
}
