// Validated prompts. Every typed question goes through `prompt_parsed`,
// which keeps asking until the parser accepts the answer.

use super::console::{Console, Tone};
use crate::model::{is_valid_rating, MAX_YEAR, MIN_YEAR};
use std::io;

/// Asks `prompt` until `parse` accepts the trimmed answer. Rejections are
/// reported as errors. Returns `Ok(None)` once input is closed.
pub fn prompt_parsed<C, T, F>(console: &mut C, prompt: &str, parse: F) -> io::Result<Option<T>>
where
    C: Console + ?Sized,
    F: Fn(&str) -> Result<T, String>,
{
    loop {
        let Some(line) = console.read_line(prompt)? else {
            return Ok(None);
        };
        match parse(line.trim()) {
            Ok(value) => return Ok(Some(value)),
            Err(message) => console.say(Tone::Error, &message),
        }
    }
}

pub fn parse_title(input: &str) -> Result<String, String> {
    if input.is_empty() {
        Err("Movie name cannot be empty.".to_string())
    } else {
        Ok(input.to_string())
    }
}

pub fn parse_rating(input: &str) -> Result<f64, String> {
    let rating: f64 = input
        .parse()
        .map_err(|_| "Please enter a valid rating.".to_string())?;
    if is_valid_rating(rating) {
        Ok(rating)
    } else {
        Err("Please enter a rating between 0 and 10.".to_string())
    }
}

pub fn parse_year(input: &str) -> Result<i32, String> {
    let year: i32 = input
        .parse()
        .map_err(|_| "Invalid input. Please enter a valid year.".to_string())?;
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        Ok(year)
    } else {
        Err(format!("Please enter a year between {} and {}.", MIN_YEAR, MAX_YEAR))
    }
}

/// Blank input means "no value"; anything else must pass `parse`.
pub fn optional<T>(parse: impl Fn(&str) -> Result<T, String>) -> impl Fn(&str) -> Result<Option<T>, String> {
    move |input: &str| {
        if input.is_empty() {
            Ok(None)
        } else {
            parse(input).map(Some)
        }
    }
}

pub fn parse_text(input: &str) -> Result<String, String> {
    Ok(input.to_string())
}

pub fn parse_yes_no(input: &str) -> Result<bool, String> {
    match input.to_lowercase().as_str() {
        "y" | "yes" => Ok(true),
        "n" | "no" => Ok(false),
        _ => Err("Please enter 'Y' or 'N'".to_string()),
    }
}

/// Menu selection in `0..=max`.
pub fn parse_choice(max: usize) -> impl Fn(&str) -> Result<usize, String> {
    move |input: &str| {
        let error = || format!("Invalid choice. Please enter a number between 0 and {}.", max);
        let choice: usize = input.parse().map_err(|_| error())?;
        if choice <= max {
            Ok(choice)
        } else {
            Err(error())
        }
    }
}
