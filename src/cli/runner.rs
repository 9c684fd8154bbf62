//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::Settings;
use crate::enrich::Enricher;
use crate::error::{Error, Result, ResultExt};
use crate::loader::{discover_input, load_file};
use crate::normalize::{alias, CanonicalField, RawRecord, RawValue};
use crate::pipeline::{run_import, ImportSummary, StoreCount};
use crate::providers::{OmdbClient, TmdbClient};
use crate::store::RestStore;
use crate::verify::verify;
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Import {
                file,
                tmdb_ids,
                batch_size,
            } => self.import(file.as_deref(), tmdb_ids, *batch_size).await,
            Commands::Normalize { file, limit } => self.normalize(file.as_deref(), *limit),
            Commands::Verify { sample } => self.verify(*sample).await,
            Commands::Enrich { limit } => self.enrich(*limit).await,
            Commands::Aliases => {
                self.aliases();
                Ok(())
            }
        }
    }

    fn settings(&self) -> Result<Settings> {
        Settings::load(self.cli.config.as_deref())
    }

    /// Resolve the input file, searching the default locations when none is given
    fn input_path(file: Option<&Path>) -> Result<PathBuf> {
        if let Some(file) = file {
            return Ok(file.to_path_buf());
        }
        let cwd = std::env::current_dir().context("reading working directory")?;
        discover_input(&cwd).ok_or_else(|| {
            Error::config(format!(
                "No input file found near {}; pass a .csv or .json path",
                cwd.display()
            ))
        })
    }

    /// Import command
    async fn import(
        &self,
        file: Option<&Path>,
        tmdb_ids: &[i64],
        batch_size: Option<usize>,
    ) -> Result<()> {
        let mut settings = self.settings()?;
        if let Some(size) = batch_size {
            settings.ingest.batch_size = size;
            settings.validate()?;
        }

        let started = Instant::now();
        let (source, raws) = if tmdb_ids.is_empty() {
            let path = Self::input_path(file)?;
            let raws = load_file(&path)?;
            (path.display().to_string(), raws)
        } else {
            let raws = Self::fetch_from_tmdb(&settings, tmdb_ids).await?;
            ("tmdb".to_string(), raws)
        };

        let store = RestStore::new(settings.store_config()?)?;
        let normalizer = settings.normalizer()?;
        let summary = run_import(&store, &normalizer, &raws, &settings.ingest).await?;
        info!(
            inserted = summary.stats.inserted,
            skipped = summary.stats.skipped,
            errored = summary.stats.errored,
            "import finished"
        );

        self.output_summary(&summary, &source, started.elapsed().as_millis() as u64);
        Ok(())
    }

    /// Fetch raw records for the given TMDB ids; unknown or failing ids are skipped
    async fn fetch_from_tmdb(settings: &Settings, tmdb_ids: &[i64]) -> Result<Vec<RawRecord>> {
        let tmdb = TmdbClient::new(settings.tmdb_config()?)?;
        let omdb = settings.omdb_config().map(OmdbClient::new).transpose()?;

        let mut raws = Vec::with_capacity(tmdb_ids.len());
        for &tmdb_id in tmdb_ids {
            let mut raw = match tmdb.fetch_movie(tmdb_id).await {
                Ok(Some(raw)) => raw,
                Ok(None) => {
                    warn!(tmdb_id, "movie unknown to TMDB, skipping");
                    continue;
                }
                Err(e) => {
                    warn!(tmdb_id, error = %e, "TMDB lookup failed, skipping");
                    continue;
                }
            };
            let imdb_id = match raw.get("imdb_id") {
                Some(RawValue::Text(id)) => Some(id.clone()),
                _ => None,
            };
            if let (Some(omdb), Some(imdb_id)) = (&omdb, imdb_id) {
                match omdb.fetch_ratings(&imdb_id).await {
                    Ok(Some(ratings)) => raw.extend(ratings),
                    Ok(None) => {}
                    Err(e) => warn!(%imdb_id, error = %e, "OMDb lookup failed"),
                }
            }
            raws.push(raw);
        }
        Ok(raws)
    }

    /// Normalize command: dry run, nothing is written
    fn normalize(&self, file: Option<&Path>, limit: Option<usize>) -> Result<()> {
        let settings = self.settings()?;
        let path = Self::input_path(file)?;
        let raws = load_file(&path)?;
        let outcome = settings.normalizer()?.normalize_all(&raws);

        let shown = limit.unwrap_or(usize::MAX);
        for record in outcome.records.iter().take(shown) {
            self.output_message(&json!({
                "type": "RECORD",
                "record": record
            }));
        }

        self.output_message(&json!({
            "type": "NORMALIZE_SUMMARY",
            "summary": {
                "source": path.display().to_string(),
                "loaded": raws.len(),
                "valid": outcome.records.len(),
                "rejected": outcome.rejected
            }
        }));
        Ok(())
    }

    /// Verify command
    async fn verify(&self, sample: Option<usize>) -> Result<()> {
        let settings = self.settings()?;
        let store = RestStore::new(settings.store_config()?)?;
        let report = verify(&store, sample.unwrap_or(settings.ingest.sample_size)).await?;

        self.output_message(&json!({
            "type": "VERIFICATION",
            "verification": {
                "total": report.total,
                "sample": report.sample
            }
        }));
        Ok(())
    }

    /// Enrich command
    async fn enrich(&self, limit: usize) -> Result<()> {
        let settings = self.settings()?;
        let store = RestStore::new(settings.store_config()?)?;
        let tmdb = TmdbClient::new(settings.tmdb_config()?)?;
        let omdb = settings.omdb_config().map(OmdbClient::new).transpose()?;
        if omdb.is_none() {
            info!("OMDB_API_KEY not set, ratings come from TMDB only");
        }

        let stats = Enricher::new(&store, &tmdb, omdb.as_ref())
            .with_normalizer(settings.normalizer()?)
            .enrich(limit)
            .await?;

        self.output_message(&json!({
            "type": "ENRICH_SUMMARY",
            "summary": {
                "updated": stats.updated,
                "skipped": stats.skipped,
                "errors": stats.errored
            }
        }));
        Ok(())
    }

    /// Aliases command
    fn aliases(&self) {
        let table: Map<String, Value> = CanonicalField::ALL
            .iter()
            .map(|&field| {
                let names: Vec<&str> = alias::aliases_of(field).collect();
                (field.name().to_string(), json!(names))
            })
            .collect();

        self.output_message(&json!({
            "type": "ALIASES",
            "aliases": table
        }));
    }

    /// Print the import summary; pretty output uses the human-readable form
    fn output_summary(&self, summary: &ImportSummary, source: &str, duration_ms: u64) {
        if self.cli.format == OutputFormat::Pretty {
            println!("{summary}");
            return;
        }

        let total_in_store = match &summary.store_count {
            StoreCount::Known(total) => json!(total),
            StoreCount::Unavailable(_) => Value::Null,
        };
        self.output_message(&json!({
            "type": "IMPORT_SUMMARY",
            "summary": {
                "status": if summary.stats.errored == 0 { "SUCCEEDED" } else { "PARTIAL" },
                "source": source,
                "loaded": summary.loaded,
                "rejected": summary.rejected,
                "inserted": summary.stats.inserted,
                "skipped": summary.stats.skipped,
                "errors": summary.stats.errored,
                "total_in_store": total_in_store,
                "duration_ms": duration_ms
            }
        }));
    }

    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => println!("{}", serde_json::to_string(msg).unwrap_or_default()),
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}
