use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::{api::powerfox, prelude::*};

/// Single-day retrieval seam of the backup loop.
#[async_trait]
pub trait FetchDay: Sync {
    async fn fetch_day(&self, device_id: &str, day: NaiveDate) -> Result<serde_json::Value>;
}

#[async_trait]
impl FetchDay for powerfox::Api {
    async fn fetch_day(&self, device_id: &str, day: NaiveDate) -> Result<serde_json::Value> {
        self.get_report_raw(Some(device_id), Some(day)).await
    }
}

pub struct RetryPolicy {
    pub max_attempts: u32,

    /// Backoff unit: the sleep after `n` failed attempts is `n` times this.
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Linear in the attempt count — the first retry waits one unit, the
    /// ninth waits nine.
    fn backoff_after(&self, failed_attempts: u32) -> Duration {
        self.backoff * failed_attempts
    }
}

/// Fetch one day, masking transient failures.
///
/// Any error from the API layer counts as transient. Returns `None` once the
/// retry budget is exhausted; the caller moves on to the next day.
#[instrument(skip_all, fields(device_id = device_id, day = %day))]
pub async fn fetch_day(
    fetcher: &impl FetchDay,
    device_id: &str,
    day: NaiveDate,
    policy: &RetryPolicy,
) -> Option<serde_json::Value> {
    for attempt in 1..=policy.max_attempts {
        match fetcher.fetch_day(device_id, day).await {
            Ok(data) => return Some(data),
            Err(error) => {
                warn!(attempt, "fetch failed: {error:#}");
                if attempt == policy.max_attempts {
                    break;
                }
                tokio::time::sleep(policy.backoff_after(attempt)).await;
            }
        }
    }
    error!(max_attempts = policy.max_attempts, "no data for the day, giving up");
    None
}
