//! Shared HTTP client
//!
//! One client per remote (store, TMDB, OMDb): a base URL, default headers,
//! credentials and optional call spacing. Every 4xx/5xx answer becomes
//! `Error::HttpStatus` with the response body attached, so callers decide
//! which statuses are outcomes (a 409 conflict, a 404 unknown movie) and
//! which are failures.

use super::rate_limit::RateLimiter;
use crate::auth::AuthConfig;
use crate::error::{Error, Result};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// First retry delay; doubles per attempt
const RETRY_BASE_DELAY: Duration = Duration::from_millis(250);

/// Upper bound for any retry delay, including `Retry-After`
const RETRY_MAX_DELAY: Duration = Duration::from_secs(10);

/// Settings for one remote
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Every request path is joined onto this URL
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Extra attempts after a transient failure (0 = single attempt)
    pub max_retries: u32,
    /// Minimum pause between consecutive calls
    pub request_spacing: Option<Duration>,
    /// Headers sent with every request
    pub headers: Vec<(String, String)>,
}

impl HttpClientConfig {
    /// 30 s timeout, no retries, no spacing
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
            max_retries: 0,
            request_spacing: None,
            headers: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Space calls `delay` apart; a zero delay disables spacing
    #[must_use]
    pub fn with_request_spacing(mut self, delay: Duration) -> Self {
        self.request_spacing = (!delay.is_zero()).then_some(delay);
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Query, headers and body of a single request
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters, sent in insertion order
    pub query: Vec<(String, String)>,
    /// Headers on top of the client defaults
    pub headers: Vec<(String, String)>,
    /// JSON body
    pub body: Option<Value>,
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Authenticated client for one remote
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    auth: AuthConfig,
    limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Build a client that signs every request with `auth`
    pub fn new(config: HttpClientConfig, auth: AuthConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("reel-loader/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let limiter = config.request_spacing.map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            auth,
            limiter,
        })
    }

    pub async fn get(&self, path: &str, request: RequestConfig) -> Result<Response> {
        self.send(Method::GET, path, &request).await
    }

    /// GET and deserialize the JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        request: RequestConfig,
    ) -> Result<T> {
        let response = self.get(path, request).await?;
        Ok(response.json().await?)
    }

    pub async fn post(&self, path: &str, request: RequestConfig) -> Result<Response> {
        self.send(Method::POST, path, &request).await
    }

    pub async fn patch(&self, path: &str, request: RequestConfig) -> Result<Response> {
        self.send(Method::PATCH, path, &request).await
    }

    /// Send with retries for transient failures
    async fn send(&self, method: Method, path: &str, request: &RequestConfig) -> Result<Response> {
        let url = self.url_for(path);
        let mut attempt = 0;

        loop {
            match self.send_once(method.clone(), &url, request).await {
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = retry_delay(&e, attempt);
                    warn!(%method, %url, attempt = attempt + 1, error = %e, ?delay, "retrying request");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn send_once(&self, method: Method, url: &str, request: &RequestConfig) -> Result<Response> {
        if let Some(limiter) = &self.limiter {
            limiter.wait().await;
        }

        let mut req = self.client.request(method.clone(), url);
        for (name, value) in self.config.headers.iter().chain(&request.headers) {
            req = req.header(name.as_str(), value.as_str());
        }
        if !request.query.is_empty() {
            req = req.query(&request.query);
        }
        if let Some(body) = &request.body {
            req = req.json(body);
        }
        req = self.auth.apply(req);

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_ms: self.config.timeout.as_millis() as u64,
                }
            } else {
                Error::Http(e)
            }
        })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::RateLimited {
                retry_after_seconds: retry_after(&response),
            });
        }
        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(status.as_u16(), body));
        }

        debug!(%method, url, status = status.as_u16(), "request done");
        Ok(response)
    }

    fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.config.base_url)
            .field("auth", &self.auth)
            .field("spaced", &self.limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Delay before retry number `attempt + 1`
pub(crate) fn retry_delay(error: &Error, attempt: u32) -> Duration {
    let delay = match error {
        Error::RateLimited {
            retry_after_seconds,
        } => Duration::from_secs(*retry_after_seconds),
        _ => RETRY_BASE_DELAY.saturating_mul(2u32.saturating_pow(attempt)),
    };
    delay.min(RETRY_MAX_DELAY)
}

/// Seconds from a `Retry-After` header, 1 when absent or unparsable
fn retry_after(response: &Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(1)
}
