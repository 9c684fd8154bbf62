// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]

//! # reel-loader
//!
//! Normalizes loosely-structured movie records and loads them into a
//! PostgREST-fronted `movies` table.
//!
//! ## Features
//!
//! - **Schema normalization**: Alias table and per-field coercion from CSV/JSON exports
//! - **Batch ingestion**: Bulk writes with per-record fallback and duplicate detection
//! - **Verification**: Post-import sample and exact row count
//! - **Enrichment**: Back-fill from TMDB and OMDb with request spacing
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use reel_loader::{load_file, run_import, IngestConfig, Normalizer, RestStore, StoreConfig};
//!
//! #[tokio::main]
//! async fn main() -> reel_loader::Result<()> {
//!     let raws = load_file("movies.csv")?;
//!     let store = RestStore::new(StoreConfig::new("https://abc.supabase.co", "service-key"))?;
//!     let summary = run_import(&store, &Normalizer::new()?, &raws, &IngestConfig::default()).await?;
//!     println!("{summary}");
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌────────────┐   ┌──────────────┐   ┌──────────┐
//! │  Loader  │──▶│ Normalizer │──▶│ BatchIngestor│──▶│  Verify  │
//! │ CSV/JSON │   │ alias+coerce│  │ bulk/fallback│   │ sample+N │
//! └──────────┘   └────────────┘   └──────┬───────┘   └──────────┘
//!                      ▲                 │
//! ┌──────────┐         │          ┌──────▼───────┐
//! │ Providers│─────────┘          │  RestStore   │
//! │TMDB/OMDb │                    │  (PostgREST) │
//! └──────────┘                    └──────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Authentication for the store and providers
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Input file loading (CSV, JSON)
pub mod loader;

/// Canonical movie schema and normalizer
pub mod normalize;

/// PostgREST store access
pub mod store;

/// Batch ingestion with per-record fallback
pub mod ingest;

/// Post-import verification
pub mod verify;

/// Normalize, ingest and verify in one call
pub mod pipeline;

/// TMDB and OMDb clients
pub mod providers;

/// Enrichment of stored movies
pub mod enrich;

/// Runtime settings
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use config::Settings;
pub use ingest::{BatchIngestor, IngestConfig, IngestStats};
pub use loader::{discover_input, load_file};
pub use normalize::{normalize, CanonicalRecord, Normalizer, RawRecord, RawValue};
pub use pipeline::{run_import, ImportSummary, StoreCount};
pub use store::{RecordStore, RestStore, StoreConfig, WriteOutcome};
pub use verify::{verify, VerificationReport};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
