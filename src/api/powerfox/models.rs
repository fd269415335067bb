use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_with::serde_as;

use crate::quantity::{KilowattHours, Watts};

/// Division of a Powerfox device, as the vendor encodes it.
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    derive_more::Display,
    derive_more::TryFrom,
    Deserialize,
)]
#[serde(try_from = "i8")]
#[try_from(repr)]
#[repr(i8)]
pub enum MeterType {
    NotSpecified = -1,
    Power = 0,
    ColdWater = 1,
    WarmWater = 2,
    Heat = 3,
    Gas = 4,
    ColdAndWarmWater = 5,
}

/// Metadata about a single Powerfox device.
#[serde_as]
#[derive(Deserialize, derive_more::Display)]
#[display("{name} ({id})")]
pub struct Device {
    /// When the device was associated with the account.
    #[serde_as(as = "serde_with::TimestampSeconds<i64>")]
    #[serde(rename = "AccountAssociatedSince")]
    pub account_associated_since: DateTime<Utc>,

    #[serde(rename = "DeviceId")]
    pub id: String,

    #[serde(rename = "Division")]
    pub division: MeterType,

    /// Measures consumption — or additionally feed-in, but never feed-in alone.
    #[serde(rename = "MainDevice")]
    pub main_device: bool,

    /// Name of the device as specified in the app.
    #[serde(rename = "Name")]
    pub name: String,

    /// `true` for a bidirectional meter (consumption and feed-in).
    #[serde(rename = "Prosumer")]
    pub prosumer: bool,
}

/// One aggregated energy value over an interval starting at [`Delta::start_time`].
#[serde_as]
#[derive(Deserialize)]
pub struct Delta {
    #[serde(rename = "Delta")]
    pub delta: KilowattHours,

    /// Start of the aggregation interval.
    #[serde_as(as = "serde_with::TimestampSeconds<i64>")]
    #[serde(rename = "Timestamp")]
    pub start_time: DateTime<Utc>,

    /// `true` if the value was measured, `false` if calculated.
    #[serde(rename = "Complete")]
    pub complete: bool,

    /// Undocumented by the vendor.
    #[serde(rename = "DeltaCurrency")]
    pub delta_currency: i64,

    #[serde(rename = "DeviceId")]
    pub device_id: String,

    /// Undocumented by the vendor.
    #[serde(rename = "ValuesType")]
    pub values_type: i64,

    /// High-tariff share, only reported for 2-tariff meters.
    #[serde(rename = "DeltaHT", default)]
    pub delta_ht: Option<KilowattHours>,

    /// Low-tariff share, only reported for 2-tariff meters.
    #[serde(rename = "DeltaNT", default)]
    pub delta_nt: Option<KilowattHours>,
}

/// Deltas of one energy series (consumption, feed-in or generation) with their totals.
#[serde_as]
#[derive(Deserialize)]
pub struct EnergyFigures {
    #[serde(rename = "Sum")]
    pub sum: KilowattHours,

    #[serde(rename = "Max")]
    pub max: KilowattHours,

    #[serde(rename = "ReportValues")]
    pub report_values: Vec<Delta>,

    #[serde_as(as = "serde_with::TimestampSeconds<i64>")]
    #[serde(rename = "StartTime")]
    pub start_time: DateTime<Utc>,

    /// Undocumented by the vendor.
    #[serde(rename = "StartTimeCurrency")]
    pub start_time_currency: i64,

    /// Undocumented by the vendor.
    #[serde(rename = "SumCurrency")]
    pub sum_currency: i64,

    /// Undocumented by the vendor.
    #[serde(rename = "MaxCurrency")]
    pub max_currency: i64,

    /// Undocumented by the vendor.
    #[serde(rename = "MeterReadings")]
    pub meter_readings: Vec<serde_json::Value>,
}

/// Historical energy report: which series are present depends on the device type.
#[derive(Deserialize)]
pub struct Report {
    #[serde(rename = "Consumption")]
    pub consumption: EnergyFigures,

    #[serde(rename = "FeedIn")]
    pub feed_in: EnergyFigures,

    #[serde(rename = "Generation", default)]
    pub generation: Option<EnergyFigures>,
}

/// Current power draw and meter totals.
///
/// The totals are in watt-hours unless kilowatt-hours were requested.
#[serde_as]
#[derive(Deserialize)]
pub struct LiveReading {
    #[serde(rename = "Watt")]
    pub watt: Watts,

    #[serde_as(as = "serde_with::TimestampSeconds<i64>")]
    #[serde(rename = "Timestamp")]
    pub timestamp: DateTime<Utc>,

    /// Consumption total.
    #[serde(rename = "A_Plus")]
    pub a_plus: f64,

    /// Feed-in total.
    #[serde(rename = "A_Minus")]
    pub a_minus: f64,

    /// `true` if the reading is more than 60 seconds old.
    #[serde(rename = "Outdated")]
    pub outdated: bool,

    /// High-tariff consumption total, only reported for 2-tariff meters.
    #[serde(rename = "A_Plus_HT", default)]
    pub a_plus_ht: Option<f64>,

    /// Low-tariff consumption total, only reported for 2-tariff meters.
    #[serde(rename = "A_Plus_NT", default)]
    pub a_plus_nt: Option<f64>,
}

/// Momentary power draw measurement.
#[serde_as]
#[derive(Deserialize)]
pub struct Power {
    #[serde_as(as = "serde_with::TimestampSeconds<i64>")]
    #[serde(rename = "Timestamp")]
    pub timestamp: DateTime<Utc>,

    #[serde(rename = "Value")]
    pub value: Watts,
}

/// Power draw of the last hour, aggregated in 2-minute values.
#[derive(Deserialize)]
pub struct OperatingReport {
    #[serde(rename = "Max")]
    pub max: Watts,

    #[serde(rename = "Min")]
    pub min: Watts,

    #[serde(rename = "Values")]
    pub values: Vec<Power>,

    /// Undocumented by the vendor.
    #[serde(rename = "Avg")]
    pub avg: Watts,

    #[serde(rename = "DeviceId")]
    pub device_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::Result;

    #[test]
    fn devices_ok() -> Result {
        // language=json
        let body = r#"[
            {
                "DeviceId": "012345678901",
                "AccountAssociatedSince": 1577836800,
                "Division": 0,
                "MainDevice": true,
                "Name": "Main meter",
                "Prosumer": false
            },
            {
                "DeviceId": "112345678902",
                "AccountAssociatedSince": 1609459200,
                "Division": 4,
                "MainDevice": false,
                "Name": "Gas meter",
                "Prosumer": false
            }
        ]"#;
        let devices: Vec<Device> = serde_json::from_str(body)?;
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].id, "012345678901");
        assert_eq!(devices[0].division, MeterType::Power);
        assert!(devices[0].main_device);
        assert_eq!(
            devices[0].account_associated_since,
            DateTime::from_timestamp(1_577_836_800, 0).unwrap(),
        );
        assert_eq!(devices[1].division, MeterType::Gas);
        assert_eq!(devices[1].to_string(), "Gas meter (112345678902)");
        Ok(())
    }

    #[test]
    fn unknown_division_fails() {
        // language=json
        let body = r#"{"DeviceId": "x", "AccountAssociatedSince": 0, "Division": 42, "MainDevice": true, "Name": "x", "Prosumer": false}"#;
        assert!(serde_json::from_str::<Device>(body).is_err());
    }

    #[test]
    fn report_ok() -> Result {
        // language=json
        let body = r#"{
            "Consumption": {
                "Sum": 3.5,
                "Max": 0.5,
                "SumCurrency": 0,
                "MaxCurrency": 0,
                "StartTime": 1700000000,
                "StartTimeCurrency": 0,
                "MeterReadings": [],
                "ReportValues": [
                    {
                        "Delta": 0.25,
                        "Timestamp": 1700000000,
                        "Complete": true,
                        "DeltaCurrency": 0,
                        "DeviceId": "012345678901",
                        "ValuesType": 0,
                        "DeltaHT": 0.15,
                        "DeltaNT": 0.1
                    }
                ]
            },
            "FeedIn": {
                "Sum": 0.0,
                "Max": 0.0,
                "SumCurrency": 0,
                "MaxCurrency": 0,
                "StartTime": 1700000000,
                "StartTimeCurrency": 0,
                "MeterReadings": [],
                "ReportValues": []
            }
        }"#;
        let report: Report = serde_json::from_str(body)?;
        assert!(report.generation.is_none());
        assert_eq!(report.consumption.report_values.len(), 1);
        let delta = &report.consumption.report_values[0];
        assert_eq!(delta.delta, KilowattHours(0.25));
        assert!(delta.complete);
        assert_eq!(delta.delta_ht, Some(KilowattHours(0.15)));
        assert!(report.feed_in.report_values.is_empty());
        Ok(())
    }

    #[test]
    fn live_reading_ok() -> Result {
        // language=json
        let body = r#"{
            "Watt": 245,
            "Timestamp": 1700000000,
            "A_Plus": 12345.6,
            "A_Minus": 0.0,
            "Outdated": false
        }"#;
        let reading: LiveReading = serde_json::from_str(body)?;
        assert_eq!(reading.watt, Watts(245.0));
        assert!(!reading.outdated);
        assert!(reading.a_plus_ht.is_none());
        Ok(())
    }

    #[test]
    fn operating_report_ok() -> Result {
        // language=json
        let body = r#"{
            "Max": 500,
            "Min": 100,
            "Avg": 250,
            "DeviceId": "012345678901",
            "Values": [
                {"Timestamp": 1700000000, "Value": 245.0},
                {"Timestamp": 1700000120, "Value": 255.0}
            ]
        }"#;
        let report: OperatingReport = serde_json::from_str(body)?;
        assert_eq!(report.values.len(), 2);
        assert_eq!(report.values[1].value, Watts(255.0));
        Ok(())
    }
}
