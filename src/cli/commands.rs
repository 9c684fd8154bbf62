//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Movie record loader
#[derive(Parser, Debug)]
#[command(name = "reel-loader")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file (YAML); environment variables override it
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Normalize and load movies into the store
    Import {
        /// Input file (.csv or .json); default locations are searched when omitted
        file: Option<PathBuf>,

        /// Import these TMDB ids instead of a file (repeatable)
        #[arg(long = "tmdb-id", conflicts_with = "file")]
        tmdb_ids: Vec<i64>,

        /// Records per bulk write
        #[arg(long)]
        batch_size: Option<usize>,
    },

    /// Print normalized records without writing anything
    Normalize {
        /// Input file (.csv or .json); default locations are searched when omitted
        file: Option<PathBuf>,

        /// Print at most this many records
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Sample and count the stored movies
    Verify {
        /// Rows to sample
        #[arg(long)]
        sample: Option<usize>,
    },

    /// Fill in stored movies that have no overview
    Enrich {
        /// Maximum movies to process
        #[arg(long, default_value = "1900")]
        limit: usize,
    },

    /// Show the field alias table
    Aliases,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
