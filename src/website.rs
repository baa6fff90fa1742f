// Static page generation: fills a template file with one list item per
// movie.

use crate::model::{Catalog, Movie};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const TITLE_PLACEHOLDER: &str = "__TEMPLATE_TITLE__";
pub const GRID_PLACEHOLDER: &str = "__TEMPLATE_MOVIE_GRID__";
pub const PAGE_TITLE: &str = "🎬 My Movie App";
const MAX_FLAGS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct WebsitePaths {
    pub template: PathBuf,
    pub output: PathBuf,
}

impl Default for WebsitePaths {
    fn default() -> Self {
        WebsitePaths {
            template: PathBuf::from("_static/index_template.html"),
            output: PathBuf::from("_static/index.html"),
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn movie_item(title: &str, movie: &Movie) -> String {
    let title = escape_html(title);
    let poster = escape_html(movie.poster.as_deref().unwrap_or(""));
    let link = escape_html(movie.imdb_link.as_deref().unwrap_or("#"));
    let note = escape_html(movie.note.as_deref().unwrap_or(""));
    let flags: String = movie
        .flags
        .iter()
        .take(MAX_FLAGS)
        .map(|url| format!(r#"<img class="flag" src="{}" alt="Flag"/>"#, escape_html(url)))
        .collect();

    format!(
        r#"
    <li>
        <div class="movie">
            <a href="{link}" target="_blank">
                <img class="movie-poster" src="{poster}" alt="{title} poster"/>
            </a>
            <div class="movie-rating"><span class="rating">{rating}</span></div>
            <div class="movie-title">{title}</div>
            <div class="movie-year">{year}</div>
            <div class="flags">{flags}</div>
            <div class="movie-note">{note}</div>
        </div>
    </li>"#,
        rating = movie.rating_label(),
        year = movie.year,
    )
}

/// Substitutes the page title and the generated movie grid into `template`.
pub fn render_page(catalog: &Catalog, template: &str, page_title: &str) -> String {
    let grid: String = catalog
        .iter()
        .map(|(title, movie)| movie_item(title, movie))
        .collect();
    template
        .replace(TITLE_PLACEHOLDER, &escape_html(page_title))
        .replace(GRID_PLACEHOLDER, &grid)
}

/// Reads the template, renders the catalog and writes the output page.
pub fn generate_website(catalog: &Catalog, paths: &WebsitePaths) -> Result<()> {
    let template = fs::read_to_string(&paths.template)
        .with_context(|| format!("Failed to read template {}", paths.template.display()))?;
    let page = render_page(catalog, &template, PAGE_TITLE);

    if let Some(dir) = paths.output.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    write_page(&paths.output, &page)?;
    log::info!("Wrote {} movies to {}", catalog.len(), paths.output.display());
    Ok(())
}

fn write_page(path: &Path, page: &str) -> Result<()> {
    fs::write(path, page).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_every_movie_escaped() {
        let mut catalog = Catalog::new();
        catalog.insert(
            "Tom & Jerry",
            Movie {
                year: 1992,
                rating: Some(5.5),
                note: Some("<b>classic</b>".into()),
                flags: vec!["https://flagsapi.com/US/flat/64.png".into()],
                ..Default::default()
            },
        );
        catalog.insert("Up", Movie::new(2009, None));

        let page = render_page(&catalog, "<h1>__TEMPLATE_TITLE__</h1><ul>__TEMPLATE_MOVIE_GRID__</ul>", "Mine");

        assert!(page.starts_with("<h1>Mine</h1><ul>"));
        assert!(page.contains("Tom &amp; Jerry"));
        assert!(page.contains("&lt;b&gt;classic&lt;/b&gt;"));
        assert!(page.contains(r#"<img class="flag" src="https://flagsapi.com/US/flat/64.png" alt="Flag"/>"#));
        assert!(page.contains(r#"<span class="rating">N/A</span>"#));
        assert_eq!(page.matches("<li>").count(), 2);
        assert!(!page.contains(GRID_PLACEHOLDER));
    }

    #[test]
    fn writes_output_next_to_template() {
        let dir = tempfile::tempdir().unwrap();
        let paths = WebsitePaths {
            template: dir.path().join("template.html"),
            output: dir.path().join("site").join("index.html"),
        };
        fs::write(&paths.template, "__TEMPLATE_TITLE__|__TEMPLATE_MOVIE_GRID__").unwrap();
        let mut catalog = Catalog::new();
        catalog.insert("Up", Movie::new(2009, Some(8.3)));

        generate_website(&catalog, &paths).unwrap();

        let page = fs::read_to_string(&paths.output).unwrap();
        assert!(page.starts_with(PAGE_TITLE));
        assert!(page.contains(r#"<div class="movie-title">Up</div>"#));
    }

    #[test]
    fn missing_template_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let paths = WebsitePaths {
            template: dir.path().join("absent.html"),
            output: dir.path().join("index.html"),
        };
        assert!(generate_website(&Catalog::new(), &paths).is_err());
        assert!(!paths.output.exists());
    }
}
