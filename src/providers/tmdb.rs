//! TMDB client

use super::provider_client;
use super::types::{ProviderConfig, TmdbMovie};
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::normalize::{RawRecord, RawValue};
use tracing::debug;

/// Public TMDB v3 endpoint
pub const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

const APPEND: &str = "credits,external_ids,release_dates";
const TOP_CAST: usize = 5;

/// Looks up movie details on TMDB
#[derive(Debug)]
pub struct TmdbClient {
    client: HttpClient,
}

impl TmdbClient {
    /// Create a client; the key travels as `api_key`
    pub fn new(config: ProviderConfig) -> Result<Self> {
        Ok(Self {
            client: provider_client(&config, "api_key", "TMDB_API_KEY")?,
        })
    }

    /// Details for one movie as a raw record, `None` when TMDB does not know it
    pub async fn fetch_movie(&self, tmdb_id: i64) -> Result<Option<RawRecord>> {
        let request = RequestConfig::new().query("append_to_response", APPEND);
        let result = self
            .client
            .get_json::<TmdbMovie>(&format!("movie/{tmdb_id}"), request)
            .await;

        match result {
            Ok(movie) => Ok(Some(tmdb_movie_to_raw(&movie))),
            Err(Error::HttpStatus { status: 404, .. }) => {
                debug!(tmdb_id, "not found on TMDB");
                Ok(None)
            }
            Err(e) => Err(Error::provider("tmdb", e.to_string())),
        }
    }
}

/// Flatten a TMDB movie into raw fields the normalizer understands
pub fn tmdb_movie_to_raw(movie: &TmdbMovie) -> RawRecord {
    let mut raw = RawRecord::new();
    let mut put = |key: &str, value: Option<RawValue>| {
        if let Some(value) = value {
            raw.insert(key.to_string(), value);
        }
    };

    put("id", movie.id.map(RawValue::Int));
    put(
        "title",
        movie
            .title
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| movie.original_title.clone())
            .filter(|t| !t.is_empty())
            .map(RawValue::Text),
    );
    put("overview", movie.overview.clone().map(RawValue::Text));
    put("runtime", movie.runtime.map(RawValue::Int));
    put("vote_average", movie.vote_average.map(RawValue::Float));
    put("release_date", movie.release_date.clone().map(RawValue::Text));
    put("poster_path", movie.poster_path.clone().map(RawValue::Text));
    put("backdrop_path", movie.backdrop_path.clone().map(RawValue::Text));

    let imdb_id = movie
        .external_ids
        .as_ref()
        .and_then(|ids| ids.imdb_id.clone())
        .filter(|id| !id.is_empty())
        .or_else(|| movie.imdb_id.clone());
    put("imdb_id", imdb_id.map(RawValue::Text));

    if !movie.genres.is_empty() {
        let names: Vec<String> = movie.genres.iter().map(|g| g.name.clone()).collect();
        put("genres", Some(RawValue::from(names)));
    }

    put("mpaa_rating", us_certification(movie).map(RawValue::Text));

    if let Some(credits) = &movie.credits {
        let director = credits
            .crew
            .iter()
            .find(|member| member.job == "Director")
            .map(|member| member.name.clone());
        put("director", director.map(RawValue::Text));

        let cast: Vec<String> = credits
            .cast
            .iter()
            .take(TOP_CAST)
            .map(|member| member.name.clone())
            .collect();
        if !cast.is_empty() {
            put("cast_list", Some(RawValue::from(cast)));
        }
    }

    raw
}

/// First non-empty US certification
fn us_certification(movie: &TmdbMovie) -> Option<String> {
    movie
        .release_dates
        .as_ref()?
        .results
        .iter()
        .find(|country| country.iso_3166_1 == "US")?
        .release_dates
        .iter()
        .map(|release| release.certification.trim())
        .find(|cert| !cert.is_empty())
        .map(str::to_string)
}
