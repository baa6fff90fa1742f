// Configuration: command line flags plus environment variables. The
// store location may stay unset, in which case the binary asks for it
// interactively.

use crate::model::Schema;
use crate::store::StorageFormat;
use crate::website::WebsitePaths;
use anyhow::{bail, Result};
use clap::Parser;
use std::env;
use std::path::{Path, PathBuf};

pub const API_KEY_VARS: [&str; 2] = ["OMDB_API_KEY", "API_KEY"];
pub const DATA_DIR_VAR: &str = "MOVIE_CATALOG_DIR";

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Personal movie catalog")]
pub struct CliArgs {
    /// Backing file (.json or .csv). Asked interactively when omitted.
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Storage format; inferred from the file extension by default.
    #[arg(long, value_enum)]
    pub format: Option<StorageFormat>,

    /// Catalog variant stored in the backing file.
    #[arg(long, value_enum, default_value_t = Schema::Extended)]
    pub schema: Schema,

    /// HTML template used by "Generate website".
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Output page written by "Generate website".
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Add movies manually even when an OMDb key is configured.
    #[arg(long)]
    pub offline: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Backing file and its format, when given on the command line.
    pub store: Option<(PathBuf, StorageFormat)>,
    pub schema: Schema,
    pub data_dir: PathBuf,
    pub omdb_api_key: Option<String>,
    pub website: WebsitePaths,
}

impl Config {
    /// Builds the configuration from parsed arguments and the process
    /// environment (after `.env` has been loaded).
    pub fn from_env(args: CliArgs) -> Result<Self> {
        let store = match args.file {
            Some(file) => Some(resolve_store(file, args.format)?),
            None => None,
        };

        let omdb_api_key = if args.offline { None } else { omdb_api_key() };

        let defaults = WebsitePaths::default();
        Ok(Config {
            store,
            schema: args.schema,
            data_dir: data_dir(),
            omdb_api_key,
            website: WebsitePaths {
                template: args.template.unwrap_or(defaults.template),
                output: args.output.unwrap_or(defaults.output),
            },
        })
    }
}

/// Pairs a file with its format, inferring the format from the extension
/// when not given.
pub fn resolve_store(file: PathBuf, format: Option<StorageFormat>) -> Result<(PathBuf, StorageFormat)> {
    let format = match format.or_else(|| StorageFormat::from_path(&file)) {
        Some(format) => format,
        None => bail!(
            "Cannot tell the storage format of {}, pass --format json or --format csv",
            file.display()
        ),
    };
    Ok((file, format))
}

/// First non-empty OMDb key among the supported variables.
pub fn omdb_api_key() -> Option<String> {
    API_KEY_VARS
        .iter()
        .filter_map(|name| env::var(name).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

/// Directory for interactively chosen catalog files: `MOVIE_CATALOG_DIR`,
/// else `./data` when it exists, else the platform data directory.
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = env::var(DATA_DIR_VAR) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    let local = Path::new("data");
    if local.is_dir() {
        return local.to_path_buf();
    }
    dirs::data_local_dir()
        .map(|dir| dir.join("movie-catalog"))
        .unwrap_or_else(|| local.to_path_buf())
}
