// Library root
// -----------
// This crate exposes the movie catalog as a library. The binary
// (`main.rs`) wires configuration, the chosen store and the terminal
// console together and hands them to the interactive menu.
//
// Module responsibilities:
// - `model`: movie record, catalog map and catalog schema.
// - `store`: JSON / CSV / in-memory record stores (whole-file load/save).
// - `catalog`: add, delete and update against a store.
// - `query` and `fuzzy`: read-only statistics, sorting, filtering, search.
// - `api`: OMDb and country lookups used to enrich new movies.
// - `website`: static HTML page generation.
// - `ui`: console abstraction, validated prompts and the menu loop.
// - `config`: command line arguments and environment settings.
pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fuzzy;
pub mod model;
pub mod query;
pub mod store;
pub mod ui;
pub mod website;
