//! Day-by-day backup of the meter's historical reports.

pub mod batch;
pub mod fetch;

use chrono::NaiveDate;

use self::{
    batch::Batch,
    fetch::{FetchDay, RetryPolicy},
};
use crate::prelude::*;

/// Every calendar day in `[since, until)`.
pub fn day_range(since: NaiveDate, until: NaiveDate) -> Vec<NaiveDate> {
    since.iter_days().take_while(|day| *day < until).collect()
}

/// Fetch each day once, in order, and push whatever data came back.
///
/// Strictly sequential: a day's retries and backoff sleeps complete before
/// the next day starts, since the vendor's rate limits are undocumented.
/// A day whose retry budget is exhausted is skipped for good; the vendor
/// keeps aggregating, so a recent gap can still be re-fetched in a later run.
#[instrument(skip_all, fields(device_id = device_id, n_days = days.len()))]
pub async fn back_up(
    fetcher: &impl FetchDay,
    device_id: &str,
    days: &[NaiveDate],
    policy: &RetryPolicy,
    batch: &mut Batch,
) -> Result {
    for day in days {
        if let Some(data) = fetch::fetch_day(fetcher, device_id, *day, policy).await {
            batch.push(*day, data)?;
        }
    }
    batch.flush()
}

#[cfg(test)]
mod tests {
    use std::{fs, time::Duration};

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;

    fn day(string: &str) -> NaiveDate {
        string.parse().unwrap()
    }

    /// Succeeds for every day except the one it is told to fail on.
    struct FakeApi {
        fail_on: Option<NaiveDate>,
    }

    #[async_trait]
    impl FetchDay for FakeApi {
        async fn fetch_day(&self, _device_id: &str, day: NaiveDate) -> Result<serde_json::Value> {
            ensure!(self.fail_on != Some(day), "simulated outage");
            Ok(json!({"Consumption": {"Sum": 1.5}}))
        }
    }

    const POLICY: RetryPolicy = RetryPolicy { max_attempts: 3, backoff: Duration::ZERO };

    #[test]
    fn day_range_is_end_exclusive() {
        let days = day_range(day("2024-02-27"), day("2024-03-02"));
        assert_eq!(
            days,
            [day("2024-02-27"), day("2024-02-28"), day("2024-02-29"), day("2024-03-01")],
        );
    }

    #[test]
    fn day_range_empty_when_dates_coincide() {
        assert!(day_range(day("2024-03-01"), day("2024-03-01")).is_empty());
    }

    #[tokio::test]
    async fn all_days_end_up_in_the_file_in_order() -> Result {
        let directory = tempfile::tempdir()?;
        let path = directory.path().join("backup.jsonl");
        let days = day_range(day("2024-01-01"), day("2024-01-21"));
        let mut batch = Batch::new(path.clone(), 15);

        back_up(&FakeApi { fail_on: None }, "012345678901", &days, &POLICY, &mut batch).await?;

        let contents = fs::read_to_string(&path)?;
        let written: Vec<serde_json::Value> =
            contents.lines().map(serde_json::from_str).collect::<Result<_, _>>()?;
        assert_eq!(written.len(), 20);
        assert_eq!(written[0]["day"], "2024-01-01");
        assert_eq!(written[19]["day"], "2024-01-20");
        assert!(written.windows(2).all(|pair| pair[0]["day"].as_str() < pair[1]["day"].as_str()));
        Ok(())
    }

    #[tokio::test]
    async fn exhausted_day_is_omitted_and_the_run_continues() -> Result {
        let directory = tempfile::tempdir()?;
        let path = directory.path().join("backup.jsonl");
        let days = day_range(day("2024-01-01"), day("2024-01-06"));
        let mut batch = Batch::new(path.clone(), 15);

        let api = FakeApi { fail_on: Some(day("2024-01-03")) };
        back_up(&api, "012345678901", &days, &POLICY, &mut batch).await?;

        let contents = fs::read_to_string(&path)?;
        let written: Vec<serde_json::Value> =
            contents.lines().map(serde_json::from_str).collect::<Result<_, _>>()?;
        assert_eq!(written.len(), 4);
        assert!(written.iter().all(|record| record["day"] != "2024-01-03"));
        Ok(())
    }

    #[tokio::test]
    async fn empty_range_never_touches_the_file() -> Result {
        let directory = tempfile::tempdir()?;
        let path = directory.path().join("backup.jsonl");
        let mut batch = Batch::new(path.clone(), 15);

        back_up(&FakeApi { fail_on: None }, "012345678901", &[], &POLICY, &mut batch).await?;

        assert!(!path.exists());
        Ok(())
    }
}
