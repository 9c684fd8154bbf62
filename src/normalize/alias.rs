//! Field alias table
//!
//! Maps every known source spelling of a field to its canonical field.
//! Each canonical name maps to itself so canonical records can be fed
//! back through the normalizer unchanged.

use super::types::{CanonicalField, FieldKey};
use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

use super::types::CanonicalField::{
    CastList, Director, Genres, ImdbId, ImdbRating, MetacriticScore, MpaaRating, Overview,
    PosterUrl, ReleaseYear, Runtime, ThumbUrl, Title, TmdbId, TmdbRating,
};

/// Known raw field names and the canonical field each one feeds
pub const ALIASES: &[(&str, CanonicalField)] = &[
    ("tmdb_id", TmdbId),
    ("TMDB_ID", TmdbId),
    ("id", TmdbId),
    ("title", Title),
    ("Title", Title),
    ("overview", Overview),
    ("Overview", Overview),
    ("description", Overview),
    ("release_year", ReleaseYear),
    ("Release Year", ReleaseYear),
    ("year", ReleaseYear),
    ("Year", ReleaseYear),
    ("release_date", ReleaseYear),
    ("Release Date", ReleaseYear),
    ("runtime", Runtime),
    ("Runtime", Runtime),
    ("poster_url", PosterUrl),
    ("Poster URL", PosterUrl),
    ("poster_path", PosterUrl),
    ("thumb_url", ThumbUrl),
    ("Thumb URL", ThumbUrl),
    ("backdrop_path", ThumbUrl),
    ("mpaa_rating", MpaaRating),
    ("MPAA Rating", MpaaRating),
    ("rated", MpaaRating),
    ("Rated", MpaaRating),
    ("imdb_rating", ImdbRating),
    ("IMDB Rating", ImdbRating),
    ("imdbRating", ImdbRating),
    ("tmdb_rating", TmdbRating),
    ("TMDB Rating", TmdbRating),
    ("vote_average", TmdbRating),
    ("metacritic_score", MetacriticScore),
    ("Metacritic Score", MetacriticScore),
    ("Metascore", MetacriticScore),
    ("imdb_id", ImdbId),
    ("IMDB ID", ImdbId),
    ("imdbID", ImdbId),
    ("director", Director),
    ("Director", Director),
    ("cast_list", CastList),
    ("Cast", CastList),
    ("cast", CastList),
    ("genres", Genres),
    ("Genres", Genres),
    ("genre_ids", Genres),
];

static ALIAS_MAP: Lazy<HashMap<&'static str, CanonicalField>> =
    Lazy::new(|| ALIASES.iter().copied().collect());

/// Resolve a raw field name
///
/// Unknown names are lower-cased; a lower-cased name that matches an alias
/// (`"TITLE"`, `"DESCRIPTION"`) still lands on that alias's field.
pub fn resolve(raw_key: &str) -> FieldKey {
    if let Some(field) = ALIAS_MAP.get(raw_key) {
        return FieldKey::Canonical(*field);
    }

    let lowered = raw_key.to_lowercase();
    match ALIAS_MAP.get(lowered.as_str()) {
        Some(field) => FieldKey::Canonical(*field),
        None => FieldKey::Unmapped(lowered),
    }
}

/// All aliases of one canonical field
pub fn aliases_of(field: CanonicalField) -> impl Iterator<Item = &'static str> {
    ALIASES
        .iter()
        .filter(move |(_, target)| *target == field)
        .map(|(alias, _)| *alias)
}

/// Check the table for duplicate spellings and unreachable fields
pub fn validate() -> Result<()> {
    validate_table(ALIASES)
}

pub(crate) fn validate_table(table: &[(&str, CanonicalField)]) -> Result<()> {
    let mut seen = HashSet::new();
    for (alias, _) in table {
        if alias.trim().is_empty() {
            return Err(Error::alias_table("empty alias"));
        }
        if !seen.insert(*alias) {
            return Err(Error::alias_table(format!("duplicate alias '{alias}'")));
        }
    }

    for field in CanonicalField::ALL {
        let self_mapped = table
            .iter()
            .any(|(alias, target)| *alias == field.name() && *target == field);
        if !self_mapped {
            return Err(Error::alias_table(format!(
                "canonical field '{field}' is not mapped by its own name"
            )));
        }
    }

    Ok(())
}
