//! [Powerfox](https://www.powerfox.energy) customer API client.
//!
//! The customer API uses plain HTTP basic authentication: the username and
//! password are the ones used in the Powerfox app.

mod models;

use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use reqwest::Client;
use serde::{Serialize, de::DeserializeOwned};

pub use self::models::{
    Delta,
    Device,
    EnergyFigures,
    LiveReading,
    MeterType,
    OperatingReport,
    Power,
    Report,
};
use crate::prelude::*;

const BASE_URL: &str = "https://backend.powerfox.energy/api/2.0";

/// Unit of the live meter reading totals.
#[derive(Copy, Clone, Default, Eq, PartialEq)]
pub enum Unit {
    #[default]
    WattHours,

    KilowattHours,
}

pub struct Api {
    client: Client,
    base_url: String,
    username: String,
    password: String,
}

impl Api {
    pub fn new(username: String, password: String) -> Result<Self> {
        Self::with_base_url(BASE_URL.to_string(), username, password)
    }

    pub fn with_base_url(base_url: String, username: String, password: String) -> Result<Self> {
        let client = Client::builder()
            .user_agent("foxden")
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client, base_url, username, password })
    }

    /// Get the devices associated with the account.
    #[instrument(skip_all)]
    pub async fn get_devices(&self) -> Result<Vec<Device>> {
        self.call("my/all/devices", ()).await.context("failed to get the devices")
    }

    /// Same as [`Api::get_devices`], but returns the unparsed response.
    #[instrument(skip_all)]
    pub async fn get_devices_raw(&self) -> Result<Vec<serde_json::Value>> {
        self.call("my/all/devices", ()).await.context("failed to get the devices")
    }

    /// Get the historical consumption, feed-in and generation deltas.
    ///
    /// Without a `day`, the vendor reports the rolling last 24 hours in
    /// 1-hour deltas; with a `day`, the deltas of that calendar day.
    /// `None` for the device addresses the account's main device.
    #[instrument(skip_all, fields(device_id = device_id, day = ?day))]
    pub async fn get_report(
        &self,
        device_id: Option<&str>,
        day: Option<NaiveDate>,
    ) -> Result<Report> {
        self.call(&device_path(device_id, "report"), ReportQuery::new(day))
            .await
            .context("failed to get the report")
    }

    /// Same as [`Api::get_report`], but returns the unparsed response.
    ///
    /// This is what the backup stores: re-serializing the typed report could
    /// silently drop fields the models do not know about.
    #[instrument(skip_all, fields(device_id = device_id, day = ?day))]
    pub async fn get_report_raw(
        &self,
        device_id: Option<&str>,
        day: Option<NaiveDate>,
    ) -> Result<serde_json::Value> {
        self.call(&device_path(device_id, "report"), ReportQuery::new(day))
            .await
            .context("failed to get the report")
    }

    /// Get the live meter reading (current power draw and meter totals).
    #[instrument(skip_all, fields(device_id = device_id))]
    pub async fn get_current(&self, device_id: Option<&str>, unit: Unit) -> Result<LiveReading> {
        self.call(&device_path(device_id, "current"), CurrentQuery::new(unit))
            .await
            .context("failed to get the live reading")
    }

    /// Same as [`Api::get_current`], but returns the unparsed response.
    #[instrument(skip_all, fields(device_id = device_id))]
    pub async fn get_current_raw(
        &self,
        device_id: Option<&str>,
        unit: Unit,
    ) -> Result<serde_json::Value> {
        self.call(&device_path(device_id, "current"), CurrentQuery::new(unit))
            .await
            .context("failed to get the live reading")
    }

    /// Get the power draw of the last hour, aggregated in 2-minute values.
    #[instrument(skip_all, fields(device_id = device_id))]
    pub async fn get_operating(&self, device_id: Option<&str>) -> Result<OperatingReport> {
        self.call(&device_path(device_id, "operating"), ())
            .await
            .context("failed to get the operating report")
    }

    /// Same as [`Api::get_operating`], but returns the unparsed response.
    #[instrument(skip_all, fields(device_id = device_id))]
    pub async fn get_operating_raw(&self, device_id: Option<&str>) -> Result<serde_json::Value> {
        self.call(&device_path(device_id, "operating"), ())
            .await
            .context("failed to get the operating report")
    }

    #[instrument(skip_all, level = Level::DEBUG, fields(path = path))]
    async fn call<Q: Serialize, R: DeserializeOwned>(&self, path: &str, query: Q) -> Result<R> {
        self.client
            .get(format!("{}/{path}", self.base_url))
            .basic_auth(&self.username, Some(&self.password))
            .query(&query)
            .send()
            .await
            .with_context(|| format!("failed to call `{path}`"))?
            .error_for_status()
            .with_context(|| format!("`{path}` failed"))?
            .json()
            .await
            .with_context(|| format!("failed to deserialize the `{path}` response"))
    }
}

fn device_path(device_id: Option<&str>, endpoint: &str) -> String {
    format!("my/{}/{endpoint}", device_id.unwrap_or("main"))
}

#[derive(Serialize)]
struct ReportQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    year: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    month: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    day: Option<u32>,
}

impl ReportQuery {
    fn new(day: Option<NaiveDate>) -> Self {
        match day {
            Some(day) => Self {
                year: Some(day.year()),
                month: Some(day.month()),
                day: Some(day.day()),
            },
            None => Self { year: None, month: None, day: None },
        }
    }
}

#[derive(Serialize)]
struct CurrentQuery {
    /// The vendor defaults to watt-hours when the parameter is absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    unit: Option<&'static str>,
}

impl CurrentQuery {
    const fn new(unit: Unit) -> Self {
        match unit {
            Unit::WattHours => Self { unit: None },
            Unit::KilowattHours => Self { unit: Some("kWh") },
        }
    }
}
