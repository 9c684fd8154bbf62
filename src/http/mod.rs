//! HTTP client module
//!
//! Provides the HTTP client used by the store and the metadata providers.
//!
//! # Features
//!
//! - **Optional Retries**: exponential backoff for transient failures (off by default)
//! - **Call Spacing**: `governor` bucket with one permit per request delay
//! - **Authentication**: every request is signed with an [`AuthConfig`](crate::auth::AuthConfig)

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, RequestConfig};
pub use rate_limit::RateLimiter;
