//! Provider response types and client settings

use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Default pause between provider calls
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(300);

/// Settings shared by the metadata provider clients
#[derive(Clone)]
pub struct ProviderConfig {
    /// API key, sent as a query parameter
    pub api_key: String,
    /// Endpoint root
    pub base_url: String,
    /// Minimum spacing between calls; zero disables throttling
    pub request_delay: Duration,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ProviderConfig {
    /// Config for `base_url` with the default delay and timeout
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            request_delay: DEFAULT_REQUEST_DELAY,
            timeout: Duration::from_secs(30),
        }
    }

    /// Set the spacing between calls
    #[must_use]
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("request_delay", &self.request_delay)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// TMDB
// ============================================================================

/// `/movie/{id}` with credits, external ids and release dates appended
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TmdbMovie {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub original_title: Option<String>,
    pub overview: Option<String>,
    pub runtime: Option<i64>,
    pub vote_average: Option<f64>,
    pub genres: Vec<TmdbGenre>,
    pub imdb_id: Option<String>,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub external_ids: Option<TmdbExternalIds>,
    pub release_dates: Option<TmdbReleaseDates>,
    pub credits: Option<TmdbCredits>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TmdbGenre {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TmdbExternalIds {
    pub imdb_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TmdbReleaseDates {
    pub results: Vec<TmdbCountryRelease>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TmdbCountryRelease {
    pub iso_3166_1: String,
    pub release_dates: Vec<TmdbRelease>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TmdbRelease {
    pub certification: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TmdbCredits {
    pub cast: Vec<TmdbCastMember>,
    pub crew: Vec<TmdbCrewMember>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TmdbCastMember {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TmdbCrewMember {
    pub name: String,
    pub job: String,
}

// ============================================================================
// OMDb
// ============================================================================

/// The parts of an OMDb title lookup used for ratings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OmdbTitle {
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    #[serde(rename = "Metascore")]
    pub metascore: Option<String>,
}
