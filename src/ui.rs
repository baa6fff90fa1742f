// UI layer: the numbered menu loop. `App` owns the store, the console and
// the optional metadata source, maps each menu number to one command and
// keeps a catalog snapshot that is reloaded after every mutation.

pub mod console;
pub mod prompt;

use crate::api::{flag_urls, MetadataSource};
use crate::catalog::{self, MovieUpdate};
use crate::error::CatalogError;
use crate::model::{normalize_title, Catalog, Movie, Schema};
use crate::query::{self, MovieFilter, SearchOutcome};
use crate::store::{MovieStore, StorageFormat};
use crate::website::{self, WebsitePaths};
use console::{Console, Tone};
use prompt::{
    optional, parse_choice, parse_rating, parse_text, parse_title, parse_year, parse_yes_no,
    prompt_parsed,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// One menu entry. The menu number is the position in [`Command::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Exit,
    List,
    Add,
    Delete,
    Update,
    Stats,
    Random,
    Search,
    SortByRating,
    SortByYear,
    Filter,
    GenerateWebsite,
}

impl Command {
    pub const ALL: [Command; 12] = [
        Command::Exit,
        Command::List,
        Command::Add,
        Command::Delete,
        Command::Update,
        Command::Stats,
        Command::Random,
        Command::Search,
        Command::SortByRating,
        Command::SortByYear,
        Command::Filter,
        Command::GenerateWebsite,
    ];

    pub fn from_choice(choice: usize) -> Option<Self> {
        Self::ALL.get(choice).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Command::Exit => "Exit",
            Command::List => "List movies",
            Command::Add => "Add movie",
            Command::Delete => "Delete movie",
            Command::Update => "Update movie",
            Command::Stats => "Stats",
            Command::Random => "Random movie",
            Command::Search => "Search movie",
            Command::SortByRating => "Movies sorted by rating",
            Command::SortByYear => "Movies sorted by year",
            Command::Filter => "Filter movies",
            Command::GenerateWebsite => "Generate website",
        }
    }

    pub fn is_mutating(self) -> bool {
        matches!(self, Command::Add | Command::Delete | Command::Update)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Exited,
}

pub struct App<S: MovieStore, C: Console> {
    store: S,
    console: C,
    schema: Schema,
    metadata: Option<Box<dyn MetadataSource>>,
    website: WebsitePaths,
    rng: StdRng,
    movies: Catalog,
    state: State,
}

impl<S: MovieStore, C: Console> App<S, C> {
    pub fn new(store: S, console: C, schema: Schema) -> Self {
        let movies = store.load();
        App {
            store,
            console,
            schema,
            metadata: None,
            website: WebsitePaths::default(),
            rng: StdRng::from_os_rng(),
            movies,
            state: State::Running,
        }
    }

    /// Adds movies through a metadata lookup instead of manual entry.
    pub fn with_metadata(mut self, source: Box<dyn MetadataSource>) -> Self {
        self.metadata = Some(source);
        self
    }

    pub fn with_website(mut self, paths: WebsitePaths) -> Self {
        self.website = paths;
        self
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn movies(&self) -> &Catalog {
        &self.movies
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Runs the menu loop until the user exits or input is closed.
    pub fn run(&mut self) -> io::Result<()> {
        self.console
            .say(Tone::Heading, "********** My Movies Database **********");
        while self.state == State::Running {
            self.step()?;
        }
        Ok(())
    }

    /// Shows the menu, reads one selection and runs it.
    pub fn step(&mut self) -> io::Result<State> {
        self.print_menu();
        let max = Command::ALL.len() - 1;
        let prompt = format!("Enter choice (0-{})", max);
        let command = prompt_parsed(&mut self.console, &prompt, parse_choice(max))?
            .and_then(Command::from_choice);

        match command {
            None => self.state = State::Exited,
            Some(Command::Exit) => {
                self.console.say(Tone::Plain, "Bye!");
                self.state = State::Exited;
            }
            Some(command) => {
                self.execute(command)?;
                if self.console.read_line("Press enter to continue")?.is_none() {
                    self.state = State::Exited;
                }
            }
        }
        Ok(self.state)
    }

    /// Runs a single command against the current snapshot. The snapshot
    /// is reloaded from the store after add, delete and update.
    pub fn execute(&mut self, command: Command) -> io::Result<()> {
        log::debug!("Running command '{}'", command.label());
        let result = self.dispatch(command);
        if command.is_mutating() {
            self.refresh();
        }
        result
    }

    fn dispatch(&mut self, command: Command) -> io::Result<()> {
        match command {
            Command::Exit => {
                self.state = State::Exited;
                Ok(())
            }
            Command::List => {
                self.list_movies();
                Ok(())
            }
            Command::Add => self.command_add(),
            Command::Delete => self.command_delete(),
            Command::Update => self.command_update(),
            Command::Stats => {
                self.command_statistics();
                Ok(())
            }
            Command::Random => {
                self.command_random_movie();
                Ok(())
            }
            Command::Search => self.command_search(),
            Command::SortByRating => {
                self.command_sorted_by_rating();
                Ok(())
            }
            Command::SortByYear => self.command_sorted_by_year(),
            Command::Filter => self.command_filter(),
            Command::GenerateWebsite => {
                self.command_generate_website();
                Ok(())
            }
        }
    }

    fn refresh(&mut self) {
        self.movies = self.store.load();
    }

    fn print_menu(&mut self) {
        self.console.say(Tone::Plain, "\nMenu:");
        for (number, command) in Command::ALL.iter().enumerate() {
            self.console
                .say(Tone::Plain, &format!("{}. {}", number, command.label()));
        }
    }

    fn is_catalog_empty(&mut self) -> bool {
        if self.movies.is_empty() {
            self.console.say(Tone::Error, "There are no movies available.");
            return true;
        }
        false
    }

    fn print_movie_lines(&mut self, movies: Vec<(String, String)>) {
        for (title, line) in movies {
            self.console.say(Tone::Plain, &format!("{} {}", title, line));
        }
    }

    fn list_movies(&mut self) {
        if self.is_catalog_empty() {
            return;
        }
        self.console.say(
            Tone::Info,
            &format!("{} movies in total", self.movies.len()),
        );
        let lines = query::all_movies(&self.movies)
            .into_iter()
            .map(|(title, movie)| {
                let mut line = format!("({}), {}", movie.year, movie.rating_label());
                if let Some(poster) = &movie.poster {
                    line.push_str(&format!(", {}", poster));
                }
                (title.to_string(), line)
            })
            .collect();
        self.print_movie_lines(lines);
    }

    fn year_and_rating_lines(movies: Vec<(&str, &Movie)>) -> Vec<(String, String)> {
        movies
            .into_iter()
            .map(|(title, movie)| {
                (
                    title.to_string(),
                    format!("({}): {}", movie.year, movie.rating_label()),
                )
            })
            .collect()
    }

    fn command_add(&mut self) -> io::Result<()> {
        match self.metadata.take() {
            Some(source) => {
                let result = self.add_from_source(source.as_ref());
                self.metadata = Some(source);
                result
            }
            None => self.add_manually(),
        }
    }

    fn add_manually(&mut self) -> io::Result<()> {
        let Some(title) = prompt_parsed(&mut self.console, "Enter movie name", parse_title)? else {
            return Ok(());
        };
        if let Some(existing) = self.movies.resolve_title(&title) {
            let message = CatalogError::AlreadyExists(existing.to_string()).to_string();
            self.console.say(Tone::Error, &message);
            return Ok(());
        }
        let Some(year) = prompt_parsed(&mut self.console, "Enter movie year", parse_year)? else {
            return Ok(());
        };
        let Some(rating) = prompt_parsed(
            &mut self.console,
            "Enter movie rating (0-10, leave blank if unknown)",
            optional(parse_rating),
        )?
        else {
            return Ok(());
        };

        let mut movie = Movie::new(year, rating);
        if self.schema == Schema::Extended {
            let Some(poster) = prompt_parsed(
                &mut self.console,
                "Enter poster URL (leave blank to skip)",
                optional(parse_text),
            )?
            else {
                return Ok(());
            };
            movie.poster = poster;
        }
        self.save_new_movie(&title, movie);
        Ok(())
    }

    fn add_from_source(&mut self, source: &dyn MetadataSource) -> io::Result<()> {
        let Some(mut title) = prompt_parsed(&mut self.console, "Enter movie name", parse_title)?
        else {
            return Ok(());
        };

        let details = loop {
            let spinner = self.console.progress(&format!("Looking up '{}'...", title));
            let result = source.find_movie(&title);
            spinner.finish_and_clear();

            let details = match result {
                Ok(details) => details,
                Err(e) => {
                    self.console
                        .say(Tone::Error, &format!("Error fetching movie data: {}", e));
                    return Ok(());
                }
            };
            if normalize_title(&details.title) == normalize_title(&title) {
                break details;
            }

            let question = format!("Did you mean '{}'? (y/n)", details.title);
            match prompt_parsed(&mut self.console, &question, parse_yes_no)? {
                None => return Ok(()),
                Some(true) => break details,
                Some(false) => {
                    self.console.say(
                        Tone::Warning,
                        "Please enter the full movie name or refine the title.",
                    );
                    match prompt_parsed(&mut self.console, "Enter movie name", parse_title)? {
                        Some(next) => title = next,
                        None => return Ok(()),
                    }
                }
            }
        };

        if let Some(existing) = self.movies.resolve_title(&details.title) {
            let message = CatalogError::AlreadyExists(existing.to_string()).to_string();
            self.console.say(Tone::Error, &message);
            return Ok(());
        }

        let flags = if self.schema == Schema::Extended && !details.countries.is_empty() {
            let codes: HashMap<String, String> = match source.country_codes() {
                Ok(codes) => codes,
                Err(e) => {
                    self.console.say(
                        Tone::Error,
                        &format!("Network error occurred while fetching country data: {}", e),
                    );
                    return Ok(());
                }
            };
            let (flags, unknown) = flag_urls(&details.countries, &codes);
            for country in unknown {
                self.console
                    .say(Tone::Warning, &format!("Country '{}' not found.", country));
            }
            flags
        } else {
            Vec::new()
        };

        match details.to_movie(flags) {
            Some(movie) => self.save_new_movie(&details.title, movie),
            None => self.console.say(
                Tone::Error,
                "Some details are missing in the movie data. Please try another movie.",
            ),
        }
        Ok(())
    }

    fn save_new_movie(&mut self, title: &str, movie: Movie) {
        match catalog::add_movie(&self.store, title, movie) {
            Ok(()) => self.console.say(
                Tone::Success,
                &format!("Movie '{}' successfully added!", title.trim()),
            ),
            Err(e) => self.report_catalog_error(e),
        }
    }

    fn report_catalog_error(&mut self, error: CatalogError) {
        if let CatalogError::Storage(source) = &error {
            log::error!("Saving to {} failed: {}", self.store.describe(), source);
        }
        self.console.say(Tone::Error, &error.to_string());
    }

    fn command_delete(&mut self) -> io::Result<()> {
        if self.is_catalog_empty() {
            return Ok(());
        }
        let Some(title) = prompt_parsed(&mut self.console, "Enter movie name", parse_title)? else {
            return Ok(());
        };
        match catalog::delete_movie(&self.store, &title) {
            Ok(stored) => self.console.say(
                Tone::Success,
                &format!("Movie '{}' successfully deleted.", stored),
            ),
            Err(e) => self.report_catalog_error(e),
        }
        Ok(())
    }

    fn command_update(&mut self) -> io::Result<()> {
        if self.is_catalog_empty() {
            return Ok(());
        }
        let Some(title) = prompt_parsed(&mut self.console, "Enter movie name", parse_title)? else {
            return Ok(());
        };
        let Some(stored) = self.movies.resolve_title(&title).map(str::to_string) else {
            self.report_catalog_error(CatalogError::NotFound(title));
            return Ok(());
        };

        let update = match self.schema {
            Schema::Basic => {
                let rating = prompt_parsed(
                    &mut self.console,
                    "Enter new movie rating (0-10)",
                    parse_rating,
                )?;
                match rating {
                    Some(rating) => MovieUpdate::Rating(Some(rating)),
                    None => return Ok(()),
                }
            }
            Schema::Extended => {
                let note = prompt_parsed(
                    &mut self.console,
                    "Enter movie notes (leave blank to remove or skip)",
                    optional(parse_text),
                )?;
                match note {
                    Some(note) => MovieUpdate::Note(note),
                    None => return Ok(()),
                }
            }
        };

        let message = match &update {
            MovieUpdate::Rating(_) => format!("Movie '{}' successfully updated.", stored),
            MovieUpdate::Note(Some(note)) => {
                format!("Movie '{}' successfully updated with note: {}.", stored, note)
            }
            MovieUpdate::Note(None) => format!("The note for movie '{}' was removed.", stored),
        };
        match catalog::update_movie(&self.store, &stored, update) {
            Ok(_) => self.console.say(Tone::Success, &message),
            Err(e) => self.report_catalog_error(e),
        }
        Ok(())
    }

    fn command_statistics(&mut self) {
        if self.is_catalog_empty() {
            return;
        }
        let Some(stats) = query::statistics(&self.movies) else {
            self.console.say(
                Tone::Error,
                "No valid ratings available to calculate statistics.",
            );
            return;
        };

        self.console
            .say(Tone::Plain, &format!("Average rating: {:.2}", stats.average));
        self.console
            .say(Tone::Plain, &format!("Median rating: {:.2}", stats.median));
        for title in &stats.best {
            self.console.say(
                Tone::Plain,
                &format!("Best movie: {}: {:.1}", title, stats.best_rating),
            );
        }
        for title in &stats.worst {
            self.console.say(
                Tone::Plain,
                &format!("Worst movie: {}: {:.1}", title, stats.worst_rating),
            );
        }
    }

    fn command_random_movie(&mut self) {
        if self.is_catalog_empty() {
            return;
        }
        if let Some((title, movie)) = query::random_movie(&self.movies, &mut self.rng) {
            let message = format!(
                "Your movie for tonight: {}, it's rated {}",
                title,
                movie.rating_label()
            );
            self.console.say(Tone::Plain, &message);
        }
    }

    fn command_search(&mut self) -> io::Result<()> {
        if self.is_catalog_empty() {
            return Ok(());
        }
        let Some(part) = prompt_parsed(&mut self.console, "Enter part of movie name", parse_text)?
        else {
            return Ok(());
        };

        let lines: Vec<String> = match query::search(&self.movies, &part) {
            SearchOutcome::QueryTooShort => {
                self.console.say(
                    Tone::Error,
                    &format!(
                        "Please enter at least {} characters for the search.",
                        query::MIN_SEARCH_LEN
                    ),
                );
                return Ok(());
            }
            SearchOutcome::Matches(matches) => matches
                .iter()
                .map(|m| {
                    let rating = self
                        .movies
                        .get(m.candidate)
                        .map(Movie::rating_label)
                        .unwrap_or_default();
                    format!("{}: {}", m.candidate, rating)
                })
                .collect(),
        };

        if lines.is_empty() {
            self.console.say(Tone::Error, "No similar movies found.");
        } else {
            self.console
                .say(Tone::Info, &format!("Movies matching \"{}\":", part));
            for line in lines {
                self.console.say(Tone::Plain, &line);
            }
        }
        Ok(())
    }

    fn command_sorted_by_rating(&mut self) {
        if self.is_catalog_empty() {
            return;
        }
        let lines = Self::year_and_rating_lines(query::sorted_by_rating(&self.movies));
        self.print_movie_lines(lines);
    }

    fn command_sorted_by_year(&mut self) -> io::Result<()> {
        if self.is_catalog_empty() {
            return Ok(());
        }
        let Some(latest_first) = prompt_parsed(
            &mut self.console,
            "Do you want the latest movies first? (Y/N)",
            parse_yes_no,
        )?
        else {
            return Ok(());
        };
        let lines = Self::year_and_rating_lines(query::sorted_by_year(&self.movies, latest_first));
        self.print_movie_lines(lines);
        Ok(())
    }

    fn command_filter(&mut self) -> io::Result<()> {
        if self.is_catalog_empty() {
            return Ok(());
        }
        let Some(min_rating) = prompt_parsed(
            &mut self.console,
            "Enter minimum rating (leave blank for no minimum rating)",
            optional(parse_rating),
        )?
        else {
            return Ok(());
        };
        let Some(start_year) = prompt_parsed(
            &mut self.console,
            "Enter start year (leave blank for no start year)",
            optional(parse_year),
        )?
        else {
            return Ok(());
        };
        let Some(end_year) = prompt_parsed(
            &mut self.console,
            "Enter end year (leave blank for no end year)",
            optional(parse_year),
        )?
        else {
            return Ok(());
        };

        let filter = MovieFilter {
            min_rating,
            start_year,
            end_year,
        };
        let lines = Self::year_and_rating_lines(query::filter_movies(&self.movies, &filter));
        if lines.is_empty() {
            self.console
                .say(Tone::Error, "No movies match the filter criteria.");
        } else {
            self.print_movie_lines(lines);
        }
        Ok(())
    }

    fn command_generate_website(&mut self) {
        let movies = self.store.load();
        match website::generate_website(&movies, &self.website) {
            Ok(()) => self
                .console
                .say(Tone::Success, "Website was generated successfully."),
            Err(e) => self
                .console
                .say(Tone::Error, &format!("Could not generate website: {:#}", e)),
        }
    }
}

/// Asks which backing file to use, the way the app did before command
/// line flags existed. An invalid choice falls back to `data.json`.
pub fn select_storage<C>(console: &mut C, data_dir: &Path) -> io::Result<Option<(PathBuf, StorageFormat)>>
where
    C: Console + ?Sized,
{
    console.say(Tone::Plain, "Select storage type:");
    console.say(Tone::Plain, "1. JSON Storage");
    console.say(Tone::Plain, "2. CSV Storage");

    let Some(choice) = console.read_line("Enter your choice (1 or 2)")? else {
        return Ok(None);
    };
    let (format, example) = match choice.trim() {
        "1" => (StorageFormat::Json, "data"),
        "2" => (StorageFormat::Csv, "movies"),
        _ => {
            console.say(
                Tone::Warning,
                "Invalid choice. Defaulting to JSON Storage with 'data.json'.",
            );
            return Ok(Some((data_dir.join("data.json"), StorageFormat::Json)));
        }
    };

    let prompt = format!(
        "Enter the name of the {} file (without extension, e.g., {})",
        format.extension().to_uppercase(),
        example
    );
    let Some(name) = prompt_parsed(console, &prompt, parse_title)? else {
        return Ok(None);
    };
    Ok(Some((data_dir.join(with_extension(&name, format)), format)))
}

/// Appends the format's extension unless the name already has it.
pub fn with_extension(name: &str, format: StorageFormat) -> String {
    let suffix = format!(".{}", format.extension());
    if name.to_lowercase().ends_with(&suffix) {
        name.to_string()
    } else {
        format!("{}{}", name, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::console::ScriptedConsole;
    use super::*;
    use crate::api::MovieDetails;
    use crate::error::LookupError;
    use crate::store::MemoryStore;

    fn sample_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.insert("Inception", Movie::new(2010, Some(8.8)));
        catalog.insert("Up", Movie::new(2009, Some(8.3)));
        catalog
    }

    fn app(inputs: &[&str], schema: Schema) -> App<MemoryStore, ScriptedConsole> {
        App::new(
            MemoryStore::with_catalog(sample_catalog()),
            ScriptedConsole::new(inputs.iter().copied()),
            schema,
        )
        .with_rng(StdRng::seed_from_u64(1))
    }

    struct FakeOmdb {
        details: MovieDetails,
    }

    impl MetadataSource for FakeOmdb {
        fn find_movie(&self, title: &str) -> Result<MovieDetails, LookupError> {
            if title.eq_ignore_ascii_case("missing") {
                return Err(LookupError::NotFound(title.to_string()));
            }
            Ok(self.details.clone())
        }

        fn country_codes(&self) -> Result<HashMap<String, String>, LookupError> {
            Ok([("United States".to_string(), "US".to_string())].into_iter().collect())
        }
    }

    fn alien_details() -> MovieDetails {
        MovieDetails {
            title: "Alien".into(),
            year: Some(1979),
            rating: Some(8.5),
            poster: Some("https://example.com/alien.jpg".into()),
            countries: vec!["United States".into(), "Nostromo".into()],
            imdb_id: Some("tt0078748".into()),
        }
    }

    #[test]
    fn command_numbers_match_menu() {
        assert_eq!(Command::from_choice(0), Some(Command::Exit));
        assert_eq!(Command::from_choice(11), Some(Command::GenerateWebsite));
        assert_eq!(Command::from_choice(12), None);
    }

    #[test]
    fn invalid_selection_reprompts_then_exits() {
        let mut app = app(&["42", "abc", "0"], Schema::Basic);

        app.run().unwrap();

        assert_eq!(app.state(), State::Exited);
        let console = app.console();
        assert!(console.said_with(Tone::Error, "Invalid choice"));
        assert!(console.said("Bye!"));
        assert_eq!(console.remaining_inputs(), 0);
    }

    #[test]
    fn closed_input_exits_cleanly() {
        let mut app = app(&["1"], Schema::Basic);
        app.run().unwrap();
        assert_eq!(app.state(), State::Exited);
        assert!(app.console().said("2 movies in total"));
    }

    #[test]
    fn manual_add_then_list() {
        let mut app = app(&["2", "Alien", "1979", "8.5", "", "1", "", "0"], Schema::Basic);

        app.run().unwrap();

        let console = app.console();
        assert!(console.said_with(Tone::Success, "Movie 'Alien' successfully added!"));
        assert!(console.said("3 movies in total"));
        assert!(console.said("Alien (1979), 8.5"));
        assert_eq!(app.movies().len(), 3);
        assert_eq!(app.store().save_count(), 1);
    }

    #[test]
    fn manual_add_rejects_existing_title() {
        let mut app = app(&["2", "inception"], Schema::Basic);
        app.run().unwrap();
        assert!(app.console().said_with(Tone::Error, "Movie 'Inception' already exists!"));
        assert_eq!(app.store().save_count(), 0);
    }

    #[test]
    fn extended_manual_add_asks_for_poster() {
        let mut app = app(&["2", "Alien", "1979", "", "https://example.com/a.jpg"], Schema::Extended);
        app.run().unwrap();

        let alien = app.store().load().get("Alien").cloned().unwrap();
        assert_eq!(alien.rating, None);
        assert_eq!(alien.poster.as_deref(), Some("https://example.com/a.jpg"));
    }

    #[test]
    fn delete_unknown_title_reports_and_keeps_catalog() {
        let mut app = app(&["3", "Nonexistent", "", "0"], Schema::Basic);
        app.run().unwrap();

        assert!(app.console().said_with(Tone::Error, "Movie 'Nonexistent' doesn't exist!"));
        assert_eq!(app.store().load(), sample_catalog());
    }

    #[test]
    fn delete_refreshes_snapshot() {
        let mut app = app(&["3", "up", "", "0"], Schema::Basic);
        app.run().unwrap();

        assert!(app.console().said("Movie 'Up' successfully deleted."));
        assert!(app.movies().get("Up").is_none());
    }

    #[test]
    fn update_edits_rating_or_note_by_schema() {
        let mut basic = app(&["4", "UP", "9.1", "", "0"], Schema::Basic);
        basic.run().unwrap();
        assert_eq!(basic.movies().get("Up").unwrap().rating, Some(9.1));

        let mut extended = app(&["4", "up", "with balloons", "", "0"], Schema::Extended);
        extended.run().unwrap();
        let up = extended.movies().get("Up").unwrap();
        assert_eq!(up.note.as_deref(), Some("with balloons"));
        assert_eq!(up.rating, Some(8.3));
    }

    #[test]
    fn update_unknown_title_does_not_prompt_for_value() {
        let mut app = app(&["4", "Nope", "", "0"], Schema::Basic);
        app.run().unwrap();

        assert!(app.console().said_with(Tone::Error, "Movie 'Nope' doesn't exist!"));
        assert!(app.console().said("Bye!"));
        assert_eq!(app.store().save_count(), 0);
    }

    #[test]
    fn statistics_show_average_median_best_worst() {
        let mut app = app(&[], Schema::Basic);
        app.execute(Command::Stats).unwrap();

        let console = app.console();
        assert!(console.said("Average rating: 8.55"));
        assert!(console.said("Median rating: 8.55"));
        assert!(console.said("Best movie: Inception: 8.8"));
        assert!(console.said("Worst movie: Up: 8.3"));
    }

    #[test]
    fn queries_on_empty_catalog_report_it() {
        let mut app = App::new(
            MemoryStore::new(),
            ScriptedConsole::new(Vec::<String>::new()),
            Schema::Basic,
        );
        for command in [Command::List, Command::Stats, Command::Random, Command::SortByRating] {
            app.execute(command).unwrap();
        }
        let errors = app
            .console()
            .messages()
            .iter()
            .filter(|(t, m)| *t == Tone::Error && m == "There are no movies available.")
            .count();
        assert_eq!(errors, 4);
    }

    #[test]
    fn sort_by_year_reprompts_on_bad_answer() {
        let mut app = app(&["maybe", "n"], Schema::Basic);
        app.execute(Command::SortByYear).unwrap();

        let console = app.console();
        assert!(console.said_with(Tone::Error, "Please enter 'Y' or 'N'"));
        let lines: Vec<&str> = console
            .messages()
            .iter()
            .filter(|(t, _)| *t == Tone::Plain)
            .map(|(_, m)| m.as_str())
            .collect();
        assert_eq!(lines, vec!["Up (2009): 8.3", "Inception (2010): 8.8"]);
    }

    #[test]
    fn filter_with_start_year_only() {
        let mut app = app(&["", "2010", ""], Schema::Basic);
        app.execute(Command::Filter).unwrap();

        let console = app.console();
        assert!(console.said("Inception (2010): 8.8"));
        assert!(!console.said("Up (2009)"));
    }

    #[test]
    fn search_needs_two_characters() {
        let mut app = app(&["i", "incep"], Schema::Basic);
        app.execute(Command::Search).unwrap();
        assert!(app.console().said_with(Tone::Error, "at least 2 characters"));

        app.execute(Command::Search).unwrap();
        assert!(app.console().said("Inception: 8.8"));
    }

    #[test]
    fn random_pick_names_a_movie() {
        let mut app = app(&[], Schema::Basic);
        app.execute(Command::Random).unwrap();
        let transcript = app.console().transcript();
        assert!(
            transcript.contains("Your movie for tonight: Inception")
                || transcript.contains("Your movie for tonight: Up")
        );
    }

    #[test]
    fn lookup_add_stores_enriched_movie() {
        let mut app = app(&["alien"], Schema::Extended).with_metadata(Box::new(FakeOmdb {
            details: alien_details(),
        }));

        app.execute(Command::Add).unwrap();

        let console = app.console();
        assert!(console.said_with(Tone::Warning, "Country 'Nostromo' not found."));
        assert!(console.said_with(Tone::Success, "Movie 'Alien' successfully added!"));
        let alien = app.store().load().get("Alien").cloned().unwrap();
        assert_eq!(alien.flags, vec!["https://flagsapi.com/US/flat/64.png"]);
        assert_eq!(alien.imdb_link.as_deref(), Some("https://www.imdb.com/title/tt0078748/"));
    }

    #[test]
    fn lookup_mismatch_can_be_declined() {
        let mut app = app(&["Alienz", "n"], Schema::Extended).with_metadata(Box::new(FakeOmdb {
            details: alien_details(),
        }));

        app.execute(Command::Add).unwrap();

        assert!(app
            .console()
            .prompts()
            .iter()
            .any(|p| p == "Did you mean 'Alien'? (y/n)"));
        assert!(app.console().said_with(Tone::Warning, "refine the title"));
        assert_eq!(app.store().save_count(), 0);
    }

    #[test]
    fn lookup_failure_persists_nothing() {
        let mut app = app(&["missing"], Schema::Extended).with_metadata(Box::new(FakeOmdb {
            details: alien_details(),
        }));

        app.execute(Command::Add).unwrap();

        assert!(app.console().said_with(Tone::Error, "Error fetching movie data"));
        assert_eq!(app.store().save_count(), 0);
    }

    #[test]
    fn save_failure_is_reported_not_fatal() {
        let mut app = app(&["3", "Up", "", "0"], Schema::Basic);
        app.store().fail_writes(true);

        app.run().unwrap();

        assert!(app.console().said_with(Tone::Error, "Could not save the catalog"));
        assert!(app.console().said("Bye!"));
        assert_eq!(app.movies().len(), 2);
    }

    #[test]
    fn storage_selection() {
        let dir = Path::new("data");

        let mut console = ScriptedConsole::new(["2", "movies"]);
        assert_eq!(
            select_storage(&mut console, dir).unwrap(),
            Some((dir.join("movies.csv"), StorageFormat::Csv))
        );

        let mut console = ScriptedConsole::new(["1", "mine.json"]);
        assert_eq!(
            select_storage(&mut console, dir).unwrap(),
            Some((dir.join("mine.json"), StorageFormat::Json))
        );

        let mut console = ScriptedConsole::new(["7"]);
        assert_eq!(
            select_storage(&mut console, dir).unwrap(),
            Some((dir.join("data.json"), StorageFormat::Json))
        );
    }
}
