//! Enrichment pass
//!
//! Back-fills stored movies that were imported without an overview. Each
//! row is looked up on TMDB (and on OMDb for ratings, when a key is
//! configured), run through the normalizer and written back in place.

use crate::error::{Error, Result};
use crate::normalize::{Normalizer, RawValue};
use crate::providers::{OmdbClient, TmdbClient};
use crate::store::{RecordStore, StoredMovie, WriteOutcome};
use chrono::{SecondsFormat, Utc};
use std::fmt;
use tracing::{debug, error, info, warn};

/// Counters from an enrichment pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichStats {
    /// Rows written back
    pub updated: usize,
    /// Rows without a tmdb id, or unknown to TMDB
    pub skipped: usize,
    /// Rows whose lookup or update failed
    pub errored: usize,
}

impl fmt::Display for EnrichStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} updated, {} skipped, {} errors",
            self.updated, self.skipped, self.errored
        )
    }
}

enum RowOutcome {
    Updated,
    Skipped,
}

/// Fills in missing metadata for stored movies
pub struct Enricher<'a> {
    store: &'a dyn RecordStore,
    tmdb: &'a TmdbClient,
    omdb: Option<&'a OmdbClient>,
    normalizer: Normalizer,
}

impl<'a> Enricher<'a> {
    /// Create an enricher; without an OMDb client ratings come from TMDB only
    pub fn new(
        store: &'a dyn RecordStore,
        tmdb: &'a TmdbClient,
        omdb: Option<&'a OmdbClient>,
    ) -> Self {
        Self {
            store,
            tmdb,
            omdb,
            normalizer: Normalizer::default(),
        }
    }

    /// Use a specific normalizer
    #[must_use]
    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Enrich up to `limit` rows lacking an overview
    ///
    /// Only the initial row selection can fail the pass; per-row failures
    /// are counted.
    pub async fn enrich(&self, limit: usize) -> Result<EnrichStats> {
        let rows = self.store.select_unenriched(limit).await?;
        info!(rows = rows.len(), "movies to enrich");

        let mut stats = EnrichStats::default();
        for row in &rows {
            match self.enrich_row(row).await {
                Ok(RowOutcome::Updated) => {
                    debug!(id = %row.id, "movie enriched");
                    stats.updated += 1;
                }
                Ok(RowOutcome::Skipped) => stats.skipped += 1,
                Err(e) => {
                    error!(id = %row.id, error = %e, "failed to enrich movie");
                    stats.errored += 1;
                }
            }
        }

        info!(%stats, "enrichment finished");
        Ok(stats)
    }

    async fn enrich_row(&self, row: &StoredMovie) -> Result<RowOutcome> {
        let Some(tmdb_id) = row.tmdb_id else {
            info!(id = %row.id, "skipping movie without tmdb_id");
            return Ok(RowOutcome::Skipped);
        };

        let Some(mut raw) = self.tmdb.fetch_movie(tmdb_id).await? else {
            info!(id = %row.id, tmdb_id, "movie unknown to TMDB, skipping");
            return Ok(RowOutcome::Skipped);
        };

        let imdb_id = match raw.get("imdb_id") {
            Some(RawValue::Text(id)) => Some(id.clone()),
            _ => None,
        };
        if let (Some(omdb), Some(imdb_id)) = (self.omdb, imdb_id) {
            match omdb.fetch_ratings(&imdb_id).await {
                Ok(Some(ratings)) => raw.extend(ratings),
                Ok(None) => debug!(%imdb_id, "no OMDb ratings"),
                Err(e) => warn!(%imdb_id, error = %e, "OMDb lookup failed, keeping TMDB data"),
            }
        }

        if let Some(title) = &row.title {
            raw.entry("title".to_string())
                .or_insert_with(|| RawValue::text(title.as_str()));
        }
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        raw.insert("cached_at".to_string(), RawValue::text(now.as_str()));
        raw.insert("updated_at".to_string(), RawValue::text(now));

        let Some(record) = self.normalizer.normalize(&raw) else {
            warn!(id = %row.id, tmdb_id, "no title available, skipping");
            return Ok(RowOutcome::Skipped);
        };

        match self.store.update(&row.id, &record).await? {
            WriteOutcome::Created => Ok(RowOutcome::Updated),
            outcome => Err(Error::store(format!("update of row {} {outcome}", row.id))),
        }
    }
}
