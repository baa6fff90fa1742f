// Entrypoint for the CLI application.
// - Keeps `main` small: resolve configuration, open the store and hand
//   everything to the menu loop.
// - Returns `anyhow::Result`; only startup and terminal failures end up here.

use anyhow::{Context, Result};
use clap::Parser;
use movie_catalog::api::OmdbClient;
use movie_catalog::config::{CliArgs, Config};
use movie_catalog::store::open_store;
use movie_catalog::ui::console::{Console, TerminalConsole, Tone};
use movie_catalog::ui::{select_storage, App};

mod logging;

fn main() -> Result<()> {
    let env_file = dotenvy::dotenv();
    logging::setup_logging();
    match env_file {
        Ok(path) => log::info!("Loaded environment from {}", path.display()),
        Err(e) => log::debug!("No .env file loaded ({}), relying on environment", e),
    }

    let config = Config::from_env(CliArgs::parse())?;
    let mut console = TerminalConsole::new();
    console.say(Tone::Heading, "Welcome to the Movie Database!");

    let (path, format) = match config.store.clone() {
        Some(location) => location,
        None => match select_storage(&mut console, &config.data_dir)? {
            Some(location) => location,
            None => return Ok(()),
        },
    };
    log::info!("Using {} storage at {}", format, path.display());

    let store = open_store(format, path, config.schema);
    let mut app = App::new(store, console, config.schema).with_website(config.website.clone());

    match &config.omdb_api_key {
        Some(key) => {
            let client = OmdbClient::new(key.as_str()).context("Failed to build HTTP client")?;
            app = app.with_metadata(Box::new(client));
        }
        None => log::info!("No OMDb API key configured, movies are added manually"),
    }

    // Blocks until the user exits.
    app.run().context("Terminal input failed")?;
    Ok(())
}
