use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::{
    api::powerfox::Unit,
    cli::PowerfoxApiArgs,
    prelude::*,
    tables::{build_devices_table, build_operating_table, build_report_table},
};

#[derive(Parser)]
pub struct PeekArgs {
    #[clap(flatten)]
    pub powerfox_api: PowerfoxApiArgs,

    #[command(subcommand)]
    pub command: PeekCommand,
}

#[derive(Subcommand)]
pub enum PeekCommand {
    /// List the devices associated with the account.
    Devices(DevicesArgs),

    /// Daily report: consumption, feed-in and generation deltas.
    Report(ReportArgs),

    /// Live meter reading.
    Current(CurrentArgs),

    /// Power draw of the last hour, aggregated in 2-minute values.
    Operating(OperatingArgs),
}

#[derive(Parser)]
pub struct DevicesArgs {
    /// Print the raw JSON response instead of a table.
    #[clap(long)]
    pub raw: bool,
}

#[derive(Parser)]
pub struct ReportArgs {
    #[clap(long = "device-id", env = "POWERFOX_DEVICE_ID")]
    pub device_id: Option<String>,

    /// Specific day, otherwise the rolling last 24 hours.
    #[clap(long)]
    pub day: Option<NaiveDate>,

    /// Print the raw JSON response instead of a table.
    #[clap(long)]
    pub raw: bool,
}

#[derive(Parser)]
pub struct CurrentArgs {
    #[clap(long = "device-id", env = "POWERFOX_DEVICE_ID")]
    pub device_id: Option<String>,

    /// Report the meter totals in kilowatt-hours instead of watt-hours.
    #[clap(long)]
    pub kwh: bool,

    /// Print the raw JSON response instead of log lines.
    #[clap(long)]
    pub raw: bool,
}

#[derive(Parser)]
pub struct OperatingArgs {
    #[clap(long = "device-id", env = "POWERFOX_DEVICE_ID")]
    pub device_id: Option<String>,

    /// Print the raw JSON response instead of a table.
    #[clap(long)]
    pub raw: bool,
}

#[instrument(skip_all)]
pub async fn peek(args: &PeekArgs) -> Result {
    let api = args.powerfox_api.new_client()?;

    match &args.command {
        PeekCommand::Devices(args) => {
            if args.raw {
                let devices = api.get_devices_raw().await?;
                println!("{}", serde_json::to_string_pretty(&devices)?);
            } else {
                let devices = api.get_devices().await?;
                println!("{}", build_devices_table(&devices));
            }
        }

        PeekCommand::Report(args) => {
            let device_id = args.device_id.as_deref();
            if args.raw {
                let report = api.get_report_raw(device_id, args.day).await?;
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                let report = api.get_report(device_id, args.day).await?;
                println!("{}", build_report_table(&report));
            }
        }

        PeekCommand::Current(args) => {
            let device_id = args.device_id.as_deref();
            let unit = if args.kwh { Unit::KilowattHours } else { Unit::WattHours };
            if args.raw {
                let reading = api.get_current_raw(device_id, unit).await?;
                println!("{}", serde_json::to_string_pretty(&reading)?);
            } else {
                let reading = api.get_current(device_id, unit).await?;
                info!(
                    watt = %reading.watt,
                    a_plus = reading.a_plus,
                    a_minus = reading.a_minus,
                    outdated = reading.outdated,
                    timestamp = %reading.timestamp,
                    "gotcha"
                );
            }
        }

        PeekCommand::Operating(args) => {
            let device_id = args.device_id.as_deref();
            if args.raw {
                let report = api.get_operating_raw(device_id).await?;
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                let report = api.get_operating(device_id).await?;
                println!("{}", build_operating_table(&report));
            }
        }
    }

    Ok(())
}
