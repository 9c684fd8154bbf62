//! Runtime settings
//!
//! Settings come from an optional YAML file, then environment variables
//! override individual values:
//!
//! | Variable | Setting |
//! |---|---|
//! | `SUPABASE_URL` / `NEXT_PUBLIC_SUPABASE_URL` | `store.url` |
//! | `SUPABASE_SERVICE_ROLE_KEY` | `store.service_key` |
//! | `TMDB_API_KEY` | `providers.tmdb_api_key` |
//! | `OMDB_API_KEY` | `providers.omdb_api_key` |
//! | `REQUEST_DELAY` (seconds) | `providers.request_delay_ms` |
//! | `BATCH_SIZE` | `ingest.batch_size` |
//!
//! Credentials are only demanded by the operations that use them, so
//! `normalize` works without any.

use crate::error::{Error, Result};
use crate::ingest::IngestConfig;
use crate::normalize::{Normalizer, POSTER_BASE_URL, THUMB_BASE_URL};
use crate::providers::{ProviderConfig, OMDB_BASE_URL, TMDB_BASE_URL};
use crate::store::{StoreConfig, DEFAULT_TABLE};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use url::Url;

// ============================================================================
// Top-Level Settings
// ============================================================================

/// Everything the CLI needs to run
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// Remote store
    #[serde(default)]
    pub store: StoreSettings,

    /// Batch and verification sizes
    #[serde(default)]
    pub ingest: IngestConfig,

    /// Metadata providers
    #[serde(default)]
    pub providers: ProviderSettings,

    /// Image URL completion
    #[serde(default)]
    pub images: ImageSettings,
}

// ============================================================================
// Store
// ============================================================================

/// Store connection settings
#[derive(Clone, Deserialize)]
pub struct StoreSettings {
    /// Project URL
    #[serde(default)]
    pub url: Option<String>,

    /// Service-role key
    #[serde(default)]
    pub service_key: Option<String>,

    /// Table name
    #[serde(default = "default_table")]
    pub table: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Retries for transient failures
    #[serde(default)]
    pub max_retries: u32,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            url: None,
            service_key: None,
            table: default_table(),
            timeout_secs: default_timeout(),
            max_retries: 0,
        }
    }
}

impl fmt::Debug for StoreSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreSettings")
            .field("url", &self.url)
            .field("service_key", &self.service_key.as_ref().map(|_| "***"))
            .field("table", &self.table)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

fn default_timeout() -> u64 {
    30
}

// ============================================================================
// Providers
// ============================================================================

/// Metadata provider settings
#[derive(Clone, Deserialize)]
pub struct ProviderSettings {
    /// TMDB v3 API key
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// OMDb API key; ratings lookups are skipped without it
    #[serde(default)]
    pub omdb_api_key: Option<String>,

    /// TMDB endpoint
    #[serde(default = "default_tmdb_url")]
    pub tmdb_base_url: String,

    /// OMDb endpoint
    #[serde(default = "default_omdb_url")]
    pub omdb_base_url: String,

    /// Pause between provider calls in milliseconds
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            tmdb_api_key: None,
            omdb_api_key: None,
            tmdb_base_url: default_tmdb_url(),
            omdb_base_url: default_omdb_url(),
            request_delay_ms: default_request_delay_ms(),
        }
    }
}

impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("tmdb_api_key", &self.tmdb_api_key.as_ref().map(|_| "***"))
            .field("omdb_api_key", &self.omdb_api_key.as_ref().map(|_| "***"))
            .field("tmdb_base_url", &self.tmdb_base_url)
            .field("omdb_base_url", &self.omdb_base_url)
            .field("request_delay_ms", &self.request_delay_ms)
            .finish()
    }
}

fn default_tmdb_url() -> String {
    TMDB_BASE_URL.to_string()
}

fn default_omdb_url() -> String {
    OMDB_BASE_URL.to_string()
}

fn default_request_delay_ms() -> u64 {
    300
}

// ============================================================================
// Images
// ============================================================================

/// Bases prepended to root-relative image paths
#[derive(Debug, Clone, Deserialize)]
pub struct ImageSettings {
    #[serde(default = "default_poster_base")]
    pub poster_base: String,

    #[serde(default = "default_thumb_base")]
    pub thumb_base: String,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            poster_base: default_poster_base(),
            thumb_base: default_thumb_base(),
        }
    }
}

fn default_poster_base() -> String {
    POSTER_BASE_URL.to_string()
}

fn default_thumb_base() -> String {
    THUMB_BASE_URL.to_string()
}

// ============================================================================
// Loading
// ============================================================================

impl Settings {
    /// Parse settings from YAML text
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read the optional YAML file, apply the process environment, validate
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) if !path.is_file() => {
                return Err(Error::FileNotFound {
                    path: path.display().to_string(),
                });
            }
            Some(path) => Self::from_yaml_str(&std::fs::read_to_string(path)?)?,
            None => Self::default(),
        };

        settings.apply_env(|key| std::env::var(key).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    /// Override values from an environment lookup
    ///
    /// Blank variables are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("SUPABASE_URL").or_else(|| get("NEXT_PUBLIC_SUPABASE_URL")) {
            self.store.url = Some(url);
        }
        if let Some(key) = get("SUPABASE_SERVICE_ROLE_KEY") {
            self.store.service_key = Some(key);
        }
        if let Some(key) = get("TMDB_API_KEY") {
            self.providers.tmdb_api_key = Some(key);
        }
        if let Some(key) = get("OMDB_API_KEY") {
            self.providers.omdb_api_key = Some(key);
        }
        if let Some(delay) = get("REQUEST_DELAY") {
            let seconds: f64 = delay.trim().parse().map_err(|_| {
                Error::invalid_setting("REQUEST_DELAY", format!("'{delay}' is not a number"))
            })?;
            if !seconds.is_finite() || seconds < 0.0 {
                return Err(Error::invalid_setting(
                    "REQUEST_DELAY",
                    "must be zero or more seconds",
                ));
            }
            self.providers.request_delay_ms = (seconds * 1000.0).round() as u64;
        }
        if let Some(size) = get("BATCH_SIZE") {
            self.ingest.batch_size = size.trim().parse().map_err(|_| {
                Error::invalid_setting("BATCH_SIZE", format!("'{size}' is not a count"))
            })?;
        }

        Ok(())
    }

    /// Check values that would break every operation
    pub fn validate(&self) -> Result<()> {
        if self.ingest.batch_size == 0 {
            return Err(Error::invalid_setting(
                "ingest.batch_size",
                "must be at least 1",
            ));
        }
        if self.store.timeout_secs == 0 {
            return Err(Error::invalid_setting(
                "store.timeout_secs",
                "must be at least 1",
            ));
        }
        if self.store.table.trim().is_empty() {
            return Err(Error::invalid_setting("store.table", "must not be empty"));
        }

        let urls = [
            ("store.url", self.store.url.as_deref()),
            ("providers.tmdb_base_url", Some(self.providers.tmdb_base_url.as_str())),
            ("providers.omdb_base_url", Some(self.providers.omdb_base_url.as_str())),
            ("images.poster_base", Some(self.images.poster_base.as_str())),
            ("images.thumb_base", Some(self.images.thumb_base.as_str())),
        ];
        for (field, value) in urls {
            if let Some(value) = value {
                Url::parse(value).map_err(|e| Error::invalid_setting(field, e.to_string()))?;
            }
        }

        Ok(())
    }

    // ========================================================================
    // Component configs
    // ========================================================================

    /// Store connection; fails without URL and service key
    pub fn store_config(&self) -> Result<StoreConfig> {
        let url = self
            .store
            .url
            .clone()
            .ok_or_else(|| Error::missing_setting("SUPABASE_URL"))?;
        let key = self
            .store
            .service_key
            .clone()
            .ok_or_else(|| Error::missing_setting("SUPABASE_SERVICE_ROLE_KEY"))?;

        Ok(StoreConfig::new(url, key)
            .with_table(self.store.table.clone())
            .with_timeout(Duration::from_secs(self.store.timeout_secs))
            .with_max_retries(self.store.max_retries))
    }

    /// TMDB client settings; fails without a key
    pub fn tmdb_config(&self) -> Result<ProviderConfig> {
        let key = self
            .providers
            .tmdb_api_key
            .clone()
            .ok_or_else(|| Error::missing_setting("TMDB_API_KEY"))?;
        Ok(ProviderConfig::new(key, self.providers.tmdb_base_url.clone())
            .with_request_delay(self.request_delay()))
    }

    /// OMDb client settings, when a key is configured
    pub fn omdb_config(&self) -> Option<ProviderConfig> {
        let key = self.providers.omdb_api_key.clone()?;
        Some(
            ProviderConfig::new(key, self.providers.omdb_base_url.clone())
                .with_request_delay(self.request_delay()),
        )
    }

    /// Normalizer using the configured image bases
    pub fn normalizer(&self) -> Result<Normalizer> {
        let images = &self.images;
        Ok(Normalizer::new()?.with_image_bases(images.poster_base.clone(), images.thumb_base.clone()))
    }

    fn request_delay(&self) -> Duration {
        Duration::from_millis(self.providers.request_delay_ms)
    }
}
