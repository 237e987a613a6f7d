//! # NOAA Tides & Currents Client
//!
//! Network access for the two things the app needs from NOAA:
//!
//! ### Station metadata
//! - **URL**: `mdapi/prod/webapi/stations.json?type=tidepredictions`
//! - **Format**: JSON object with a `stationList` (or `stations`) array of loosely
//!   typed records, normalized by [`crate::catalog`]
//!
//! ### High/low predictions
//! - **URL**: `api/prod/datagetter?product=predictions&interval=hilo&time_zone=gmt`
//! - **Window**: 5 days inclusive, `begin_date` to `begin_date + 4`, as YYYYMMDD
//! - **Format**: `{"predictions": [{"t": "2024-06-01 03:12", "v": "1.234", "type": "H"}]}`
//!   or `{"error": {"message": "..."}}`
//!
//! ## Error Handling
//!
//! - **Network failures and timeouts**: the client carries a per-request timeout;
//!   both surface as [`TideError::Http`]
//! - **Provider errors**: NOAA's own message is kept verbatim
//! - **Parse failures**: malformed JSON surfaces as [`TideError::Parse`]
//!
//! Nothing is retried here. The caller converts errors into status text and
//! the user retries by changing the selection.

use crate::aggregate::{RawPrediction, FORECAST_DAYS};
use crate::config::ApiConfig;
use chrono::{Days, NaiveDate};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Used when NOAA reports a failure without saying why
pub const GENERIC_PREDICTION_ERROR: &str = "Failed to fetch predictions.";

/// Used when the station metadata endpoint answers with a failure status
pub const STATIONS_UNAVAILABLE: &str = "NOAA station metadata is unavailable right now.";

/// Errors that can occur while talking to NOAA.
#[derive(Error, Debug)]
pub enum TideError {
    /// HTTP request failed (network, timeout, or protocol error)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// NOAA answered with an error; the message is shown as-is
    #[error("{0}")]
    Provider(String),

    /// Response body wasn't the JSON we expected
    #[error("malformed response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Inclusive date range of a prediction request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredictionWindow {
    pub begin: NaiveDate,
    pub end: NaiveDate,
}

impl PredictionWindow {
    /// Five consecutive days starting at `begin`.
    pub fn starting(begin: NaiveDate) -> Self {
        let end = begin
            .checked_add_days(Days::new(FORECAST_DAYS - 1))
            .unwrap_or(begin);
        PredictionWindow { begin, end }
    }

    pub fn begin_param(&self) -> String {
        self.begin.format("%Y%m%d").to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format("%Y%m%d").to_string()
    }
}

/// Query-string pairs for a high/low prediction request.
pub fn prediction_query(
    api: &ApiConfig,
    station_id: &str,
    window: PredictionWindow,
) -> Vec<(&'static str, String)> {
    vec![
        ("product", "predictions".to_string()),
        ("application", api.application.clone()),
        ("begin_date", window.begin_param()),
        ("end_date", window.end_param()),
        ("datum", api.datum.clone()),
        ("station", station_id.to_string()),
        ("time_zone", "gmt".to_string()),
        ("interval", "hilo".to_string()),
        ("units", api.units.as_param().to_string()),
        ("format", "json".to_string()),
    ]
}

/// Extract raw station records from a metadata response body.
///
/// Reads `stationList`, then `stations`; anything else yields an empty list.
pub fn parse_station_payload(body: &str) -> Result<Vec<Value>, TideError> {
    let payload: Value = serde_json::from_str(body)?;
    let list = ["stationList", "stations"]
        .iter()
        .filter_map(|key| payload.get(*key))
        .find(|value| !value.is_null());

    Ok(match list {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    })
}

/// Extract predictions from a datagetter response body.
///
/// `success` is whether the HTTP status was 2xx. A body carrying an `error`
/// object fails with its `message`, or the generic message when it has none.
pub fn parse_prediction_payload(
    success: bool,
    body: &str,
) -> Result<Vec<RawPrediction>, TideError> {
    let payload: Value = match serde_json::from_str(body) {
        Ok(payload) => payload,
        Err(_) if !success => {
            return Err(TideError::Provider(GENERIC_PREDICTION_ERROR.to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    let error = payload.get("error").filter(|e| !e.is_null());
    if !success || error.is_some() {
        let message = error
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(GENERIC_PREDICTION_ERROR);
        return Err(TideError::Provider(message.to_string()));
    }

    match payload.get("predictions") {
        Some(Value::Null) | None => Ok(Vec::new()),
        Some(predictions) => Ok(serde_json::from_value(predictions.clone())?),
    }
}

/// Where station metadata and predictions come from.
///
/// [`NoaaClient`] is the real implementation; tests swap in canned data.
#[allow(async_fn_in_trait)]
pub trait TideSource {
    /// Raw, un-normalized station records.
    async fn fetch_stations(&self) -> Result<Vec<Value>, TideError>;

    /// Raw high/low predictions for one station over `window`.
    async fn fetch_predictions(
        &self,
        station_id: &str,
        window: PredictionWindow,
    ) -> Result<Vec<RawPrediction>, TideError>;
}

/// HTTP client for the NOAA Tides & Currents APIs.
pub struct NoaaClient {
    http: reqwest::Client,
    api: ApiConfig,
}

impl NoaaClient {
    pub fn new(api: &ApiConfig) -> Result<Self, TideError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .build()?;
        Ok(NoaaClient {
            http,
            api: api.clone(),
        })
    }
}

impl TideSource for NoaaClient {
    async fn fetch_stations(&self) -> Result<Vec<Value>, TideError> {
        debug!(url = %self.api.stations_url, "fetching station metadata");
        let response = self.http.get(&self.api.stations_url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            debug!(%status, "station metadata request failed");
            return Err(TideError::Provider(STATIONS_UNAVAILABLE.to_string()));
        }
        parse_station_payload(&body)
    }

    async fn fetch_predictions(
        &self,
        station_id: &str,
        window: PredictionWindow,
    ) -> Result<Vec<RawPrediction>, TideError> {
        let query = prediction_query(&self.api, station_id, window);
        debug!(
            station = station_id,
            begin = %window.begin,
            end = %window.end,
            "fetching predictions"
        );

        let response = self
            .http
            .get(&self.api.predictions_url)
            .query(&query)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        parse_prediction_payload(status.is_success(), &body)
    }
}
