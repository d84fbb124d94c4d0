//! Retry contract for the page-fetch collaborator.
//!
//! No HTTP client ships with this crate; callers implement [`PageSource`]
//! over whatever transport they use and wrap it with [`fetch_with_retry`].

use std::{thread, time::Duration};

use log::{info, warn};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Worth retrying: timeouts, resets, 5xx responses.
    #[error("transient failure fetching {url}: {reason}")]
    Transient { url: String, reason: String },
    #[error("failed to fetch {url}: {reason}")]
    Fatal { url: String, reason: String },
    #[error("gave up fetching {url} after {attempts} attempt(s)")]
    Exhausted { url: String, attempts: u32 },
}

pub trait PageSource {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Delay unit; the wait after attempt `n` is `n * base_delay`.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }
}

pub fn fetch_with_retry<S: PageSource + ?Sized>(
    source: &S,
    url: &str,
    policy: &RetryPolicy,
) -> Result<String, FetchError> {
    for attempt in 1..=policy.max_attempts {
        match source.fetch(url) {
            Ok(body) => {
                if attempt > 1 {
                    info!("Fetched {url} on attempt {attempt}");
                }
                return Ok(body);
            }
            Err(FetchError::Transient { reason, .. }) => {
                warn!(
                    "Attempt {attempt}/{} for {url} failed: {reason}",
                    policy.max_attempts
                );
                if attempt < policy.max_attempts {
                    thread::sleep(policy.delay_after(attempt));
                }
            }
            Err(other) => return Err(other),
        }
    }
    Err(FetchError::Exhausted {
        url: url.to_string(),
        attempts: policy.max_attempts,
    })
}
