//! NHL web API client.
//!
//! Read-only, anonymous endpoints. Every request passes through a rate
//! limiter, and transient failures (transport errors, 5xx, 429) are retried
//! with capped exponential backoff. Bodies are decoded separately from the
//! fetch so malformed responses classify as `FeedError::Malformed` rather
//! than blending into transport errors.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::config::{ApiConfig, RateLimitConfig};
use crate::error::FeedError;
use crate::nhl::model::{GameSnapshot, ScheduleWeek};

type Limiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

pub struct NhlClient {
    http: reqwest::Client,
    base_url: String,
    limiter: Arc<Limiter>,
    retry: RateLimitConfig,
}

impl NhlClient {
    pub fn new(api: &ApiConfig, rate_limit: &RateLimitConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(api.request_timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            limiter: create_rate_limiter(rate_limit),
            retry: rate_limit.clone(),
        })
    }

    /// Fetch the week of scheduled games surrounding a date.
    pub async fn schedule(&self, date: NaiveDate) -> Result<ScheduleWeek, FeedError> {
        let url = format!("{}/v1/schedule/{}", self.base_url, date.format("%Y-%m-%d"));
        self.with_retry(|| self.get_json(url.clone())).await
    }

    /// Fetch the live play-by-play document for one game.
    pub async fn play_by_play(&self, game_id: u64) -> Result<GameSnapshot, FeedError> {
        let url = format!("{}/v1/gamecenter/{game_id}/play-by-play", self.base_url);
        self.with_retry(|| self.get_json(url.clone())).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, FeedError> {
        self.limiter.until_ready().await;

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| FeedError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status { url, status });
        }

        let body = response
            .text()
            .await
            .map_err(|source| FeedError::Transport {
                url: url.clone(),
                source,
            })?;

        serde_json::from_str(&body).map_err(|source| FeedError::Malformed { url, source })
    }

    async fn with_retry<F, Fut, T>(&self, operation: F) -> Result<T, FeedError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T, FeedError>>,
    {
        let mut attempt = 0u32;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_transient() && attempt < self.retry.max_retries => {
                    attempt += 1;
                    let backoff_ms = self
                        .retry
                        .backoff_base_ms
                        .saturating_mul(1u64 << (attempt - 1).min(16))
                        .min(self.retry.backoff_max_ms);
                    warn!(
                        error = %e,
                        attempt,
                        backoff_ms,
                        "Transient feed error — retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn create_rate_limiter(config: &RateLimitConfig) -> Arc<Limiter> {
    let rps = NonZeroU32::new(config.requests_per_second)
        .unwrap_or(NonZeroU32::new(2).expect("nonzero literal"));
    let burst =
        NonZeroU32::new(config.burst_size).unwrap_or(NonZeroU32::new(5).expect("nonzero literal"));

    let quota = Quota::per_second(rps).allow_burst(burst);
    Arc::new(RateLimiter::direct(quota))
}
