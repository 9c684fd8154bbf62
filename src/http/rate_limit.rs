//! Call spacing
//!
//! A single-permit `governor` bucket: each call waits until `period` has
//! passed since the previous one.

use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use std::sync::Arc;
use std::time::Duration;

type DirectLimiter = Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

/// Spaces consecutive calls at least `period` apart
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Option<Arc<DirectLimiter>>,
}

impl RateLimiter {
    /// A zero period never waits
    pub fn new(period: Duration) -> Self {
        Self {
            limiter: Quota::with_period(period).map(|quota| Arc::new(Governor::direct(quota))),
        }
    }

    /// Wait for the next slot
    pub async fn wait(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("active", &self.limiter.is_some())
            .finish()
    }
}
