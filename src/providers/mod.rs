//! Metadata providers
//!
//! Supports: TMDB (details, credits, certifications), OMDb (ratings)
//!
//! Both clients return raw records keyed by the provider's own field
//! names; the normalizer maps them onto the canonical schema like any
//! other input.

mod omdb;
mod tmdb;
mod types;

pub use omdb::{omdb_ratings_to_raw, OmdbClient, OMDB_BASE_URL};
pub use tmdb::{tmdb_movie_to_raw, TmdbClient, TMDB_BASE_URL};
pub use types::{OmdbTitle, ProviderConfig, TmdbMovie, DEFAULT_REQUEST_DELAY};

use crate::auth::AuthConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig};
use url::Url;

/// HTTP client with query-key auth and call spacing
fn provider_client(config: &ProviderConfig, key_param: &str, setting: &str) -> Result<HttpClient> {
    if config.api_key.trim().is_empty() {
        return Err(Error::missing_setting(setting));
    }
    Url::parse(&config.base_url)?;

    let http_config = HttpClientConfig::new(config.base_url.as_str())
        .with_timeout(config.timeout)
        .with_request_spacing(config.request_delay);
    HttpClient::new(http_config, AuthConfig::query_key(key_param, config.api_key.as_str()))
}
