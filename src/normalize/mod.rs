//! Schema normalizer
//!
//! Maps loosely-typed input records onto the canonical movie schema.
//!
//! # Overview
//!
//! - Field names are resolved through the alias table ([`alias::resolve`])
//! - Missing markers (null, empty text, NaN) are skipped
//! - Each canonical field has its own coercion ([`coerce`]); a value that
//!   does not coerce drops that field only
//! - A record without a usable title is rejected
//!
//! ```rust,ignore
//! use reel_loader::normalize::{normalize, RawRecord, RawValue};
//!
//! let mut raw = RawRecord::new();
//! raw.insert("Title".into(), RawValue::text("Heat"));
//! raw.insert("Release Year".into(), RawValue::text("1995-12-15"));
//! let movie = normalize(&raw).unwrap();
//! assert_eq!(movie.release_year, Some(1995));
//! ```

pub mod alias;
pub mod coerce;
mod types;

pub use types::{raw_from_json, CanonicalField, CanonicalRecord, FieldKey, RawRecord, RawValue};

use crate::error::Result;
use tracing::{debug, trace};

/// Base prepended to root-relative poster paths
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Base prepended to root-relative thumbnail paths
pub const THUMB_BASE_URL: &str = "https://image.tmdb.org/t/p/w300";

/// Result of normalizing a batch of raw records
#[derive(Debug, Clone, Default)]
pub struct NormalizeOutcome {
    /// Records that passed validation, in input order
    pub records: Vec<CanonicalRecord>,
    /// Records rejected for lacking a title
    pub rejected: usize,
}

/// Normalizer holding the image URL bases
#[derive(Debug, Clone)]
pub struct Normalizer {
    poster_base: String,
    thumb_base: String,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            poster_base: POSTER_BASE_URL.to_string(),
            thumb_base: THUMB_BASE_URL.to_string(),
        }
    }
}

impl Normalizer {
    /// Create a normalizer after checking the alias table
    pub fn new() -> Result<Self> {
        alias::validate()?;
        Ok(Self::default())
    }

    /// Override the image URL bases
    #[must_use]
    pub fn with_image_bases(mut self, poster: impl Into<String>, thumb: impl Into<String>) -> Self {
        self.poster_base = poster.into();
        self.thumb_base = thumb.into();
        self
    }

    /// Normalize one raw record; `None` when it has no usable title
    pub fn normalize(&self, raw: &RawRecord) -> Option<CanonicalRecord> {
        let mut record = CanonicalRecord::default();
        let mut title: Option<String> = None;
        let mut filled = std::collections::HashSet::new();

        // Keys spelled exactly like their canonical column take precedence
        // over aliases of the same field.
        let mut pairs: Vec<(FieldKey, bool, &RawValue)> = raw
            .iter()
            .filter(|(_, value)| !value.is_missing())
            .map(|(key, value)| {
                let resolved = alias::resolve(key);
                let exact = matches!(&resolved, FieldKey::Canonical(f) if f.name() == key.as_str());
                (resolved, exact, value)
            })
            .collect();
        pairs.sort_by_key(|(_, exact, _)| !*exact);

        for (key, _, value) in pairs {
            match key {
                FieldKey::Canonical(field) => {
                    if filled.contains(&field) {
                        continue;
                    }
                    let applied = if field == CanonicalField::Title {
                        title = coerce::text(value).filter(|t| !t.trim().is_empty());
                        title.is_some()
                    } else {
                        self.apply(&mut record, field, value)
                    };
                    if applied {
                        filled.insert(field);
                    } else {
                        trace!(field = %field, ?value, "dropping field that failed coercion");
                    }
                }
                FieldKey::Unmapped(name) => {
                    if record.extra.contains_key(&name) {
                        continue;
                    }
                    if let Some(text) = coerce::text(value) {
                        record.extra.insert(name, text);
                    }
                }
            }
        }

        record.title = title?;
        Some(record)
    }

    /// Normalize every record, counting rejections
    pub fn normalize_all(&self, raws: &[RawRecord]) -> NormalizeOutcome {
        let mut outcome = NormalizeOutcome::default();
        for (index, raw) in raws.iter().enumerate() {
            match self.normalize(raw) {
                Some(record) => outcome.records.push(record),
                None => {
                    debug!(index, "rejecting record without a title");
                    outcome.rejected += 1;
                }
            }
        }
        outcome
    }

    fn apply(&self, record: &mut CanonicalRecord, field: CanonicalField, value: &RawValue) -> bool {
        fn set<T>(slot: &mut Option<T>, value: Option<T>) -> bool {
            let applied = value.is_some();
            if applied {
                *slot = value;
            }
            applied
        }

        match field {
            CanonicalField::TmdbId => set(&mut record.tmdb_id, coerce::exact_int(value)),
            CanonicalField::ReleaseYear => set(&mut record.release_year, coerce::year(value)),
            CanonicalField::Runtime => set(&mut record.runtime, coerce::truncated_int(value)),
            CanonicalField::MetacriticScore => {
                set(&mut record.metacritic_score, coerce::truncated_int(value))
            }
            CanonicalField::ImdbRating => set(&mut record.imdb_rating, coerce::float(value)),
            CanonicalField::TmdbRating => set(&mut record.tmdb_rating, coerce::float(value)),
            CanonicalField::Genres => set(&mut record.genres, coerce::string_list(value)),
            CanonicalField::CastList => set(&mut record.cast_list, coerce::string_list(value)),
            CanonicalField::PosterUrl => set(
                &mut record.poster_url,
                coerce::image_url(value, &self.poster_base),
            ),
            CanonicalField::ThumbUrl => set(
                &mut record.thumb_url,
                coerce::image_url(value, &self.thumb_base),
            ),
            CanonicalField::Overview => set(&mut record.overview, coerce::text(value)),
            CanonicalField::MpaaRating => set(&mut record.mpaa_rating, coerce::text(value)),
            CanonicalField::ImdbId => set(&mut record.imdb_id, coerce::text(value)),
            CanonicalField::Director => set(&mut record.director, coerce::text(value)),
            CanonicalField::Title => false,
        }
    }
}

/// Normalize one raw record with the default image bases
pub fn normalize(raw: &RawRecord) -> Option<CanonicalRecord> {
    Normalizer::default().normalize(raw)
}

#[cfg(test)]
mod tests;
