//! OMDb client
//!
//! Used only for ratings TMDB does not carry: the IMDb rating and the
//! Metacritic score.

use super::provider_client;
use super::types::{OmdbTitle, ProviderConfig};
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::normalize::{RawRecord, RawValue};
use tracing::debug;

/// Public OMDb endpoint
pub const OMDB_BASE_URL: &str = "https://www.omdbapi.com";

/// Looks up ratings on OMDb by IMDb id
#[derive(Debug)]
pub struct OmdbClient {
    client: HttpClient,
}

impl OmdbClient {
    /// Create a client; the key travels as `apikey`
    pub fn new(config: ProviderConfig) -> Result<Self> {
        Ok(Self {
            client: provider_client(&config, "apikey", "OMDB_API_KEY")?,
        })
    }

    /// Ratings for `imdb_id`, or `None` when OMDb has no usable answer
    pub async fn fetch_ratings(&self, imdb_id: &str) -> Result<Option<RawRecord>> {
        let request = RequestConfig::new().query("i", imdb_id);
        let result = self.client.get_json::<OmdbTitle>("/", request).await;

        match result {
            Ok(title) => Ok(omdb_ratings_to_raw(&title)),
            Err(Error::HttpStatus { status, .. }) => {
                debug!(imdb_id, status, "OMDb lookup rejected");
                Ok(None)
            }
            Err(e) => Err(Error::provider("omdb", e.to_string())),
        }
    }
}

/// Ratings from a successful lookup
///
/// `N/A` values are left out; the Metacritic score is taken only when it is
/// all digits.
pub fn omdb_ratings_to_raw(title: &OmdbTitle) -> Option<RawRecord> {
    if title.response != "True" {
        return None;
    }

    let mut raw = RawRecord::new();
    if let Some(rating) = title
        .imdb_rating
        .as_deref()
        .filter(|r| !r.is_empty() && *r != "N/A")
    {
        raw.insert("imdbRating".to_string(), RawValue::text(rating));
    }
    if let Some(score) = title
        .metascore
        .as_deref()
        .filter(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()))
    {
        raw.insert("Metascore".to_string(), RawValue::text(score));
    }
    Some(raw)
}
