//! CLI module
//!
//! Command-line interface for loading movies.
//!
//! # Commands
//!
//! - `import` - Normalize a file (or TMDB ids) and load it into the store
//! - `normalize` - Print normalized records without touching the store
//! - `verify` - Sample and count stored movies
//! - `enrich` - Back-fill stored movies from TMDB and OMDb
//! - `aliases` - Show the field alias table

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
