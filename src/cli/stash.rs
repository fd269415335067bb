use std::{path::PathBuf, time::Duration};

use chrono::{Local, NaiveDate};
use clap::Parser;

use crate::{
    backup::{self, batch::Batch, fetch::RetryPolicy},
    cli::PowerfoxApiArgs,
    prelude::*,
};

#[derive(Parser)]
pub struct StashArgs {
    #[clap(flatten)]
    pub powerfox_api: PowerfoxApiArgs,

    /// Back up this device instead of the account's main device.
    #[clap(long = "device-id", env = "POWERFOX_DEVICE_ID")]
    pub device_id: Option<String>,

    /// First day to back up. Defaults to the day the device was associated
    /// with the account.
    #[clap(long, env = "STASH_SINCE")]
    pub since: Option<NaiveDate>,

    /// Output file. Defaults to `powerfox-backup-<timestamp>.jsonl` in the
    /// working directory.
    #[clap(long = "output-file", env = "STASH_OUTPUT_FILE")]
    pub output_file: Option<PathBuf>,

    /// Number of fetched days buffered in memory before they are appended to
    /// the output file.
    #[clap(long = "flush-threshold", default_value = "15", env = "STASH_FLUSH_THRESHOLD")]
    pub flush_threshold: usize,

    /// Fetch attempts per day before the day is skipped.
    #[clap(long = "max-attempts", default_value = "10", env = "STASH_MAX_ATTEMPTS")]
    pub max_attempts: u32,

    /// Backoff unit: the sleep before retry number N is N times this.
    #[clap(
        long,
        default_value = "1s",
        value_parser = humantime::parse_duration,
        env = "STASH_BACKOFF"
    )]
    pub backoff: Duration,
}

/// Back up the device's daily reports from its association date through
/// yesterday into a fresh JSON Lines file.
///
/// Each run starts over: there is no checkpoint to resume from and no
/// deduplication against the files of earlier runs.
#[instrument(skip_all)]
pub async fn stash(args: &StashArgs) -> Result {
    let api = args.powerfox_api.new_client()?;

    let devices = api.get_devices().await?;
    ensure!(!devices.is_empty(), "the account has no devices");
    let device = match &args.device_id {
        Some(id) => devices
            .iter()
            .find(|device| &device.id == id)
            .with_context(|| format!("no device `{id}` in the account"))?,
        None => devices.iter().find(|device| device.main_device).unwrap_or(&devices[0]),
    };

    let since = args
        .since
        .unwrap_or_else(|| device.account_associated_since.with_timezone(&Local).date_naive());
    let days = backup::day_range(since, Local::now().date_naive());
    let output_file = args.output_file.clone().unwrap_or_else(default_output_file);
    info!(
        device = %device,
        since = %since,
        n_days = days.len(),
        output_file = %output_file.display(),
        "stashing…"
    );

    let policy = RetryPolicy { max_attempts: args.max_attempts, backoff: args.backoff };
    let mut batch = Batch::new(output_file, args.flush_threshold);
    backup::back_up(&api, &device.id, &days, &policy, &mut batch).await
}

fn default_output_file() -> PathBuf {
    PathBuf::from(format!("powerfox-backup-{}.jsonl", Local::now().format("%Y%m%dT%H%M%S")))
}
