//! # Scenario Tests for Tide Finder
//!
//! End-to-end checks of the pipeline the binary drives: fallback catalog,
//! station resolution from command-line choices, and a full report built from
//! a canned NOAA response. No network access is needed.

use chrono::NaiveDate;
use clap::Parser;
use serde_json::{json, Value};
use tide_finder_lib::aggregate::{ingest, RawPrediction};
use tide_finder_lib::config::Config;
use tide_finder_lib::session::{CatalogSource, TideReport, TideSession};
use tide_finder_lib::tide_data::{
    parse_prediction_payload, PredictionWindow, TideError, TideSource,
};
use tide_finder_lib::{fallback, TideKind};

use crate::cli::Cli;
use crate::{resolve_station, StationChoice};

/// Serves the same canned prediction body for every request.
struct CannedNoaa {
    body: &'static str,
}

impl TideSource for CannedNoaa {
    async fn fetch_stations(&self) -> Result<Vec<Value>, TideError> {
        Err(TideError::Provider("metadata feed disabled in tests".to_string()))
    }

    async fn fetch_predictions(
        &self,
        _station_id: &str,
        _window: PredictionWindow,
    ) -> Result<Vec<RawPrediction>, TideError> {
        parse_prediction_payload(true, self.body)
    }
}

const FOUR_EVENTS: &str = r#"{"predictions": [
    {"t": "2024-06-01 03:12", "v": "1.200", "type": "H"},
    {"t": "2024-06-01 09:40", "v": "-0.300", "type": "L"},
    {"t": "2024-06-02 04:01", "v": "1.500", "type": "H"},
    {"t": "2024-06-02 10:22", "v": "-0.100", "type": "L"}
]}"#;

fn june(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
}

fn offline_session(body: &'static str) -> TideSession<CannedNoaa> {
    TideSession::new(
        CannedNoaa { body },
        fallback::catalog(),
        CatalogSource::Fallback,
    )
}

/// The whole pipeline against the fallback catalog, mirroring a user picking
/// Santa Monica for 2024-06-01.
#[tokio::test]
async fn santa_monica_five_day_window() {
    let mut session = offline_session(FOUR_EVENTS);
    let now = june(20).and_hms_opt(12, 0, 0).unwrap();

    let outcome = session
        .on_selection_changed_at("9410840", june(1), now)
        .await;
    let report = outcome.report.expect("report should be built");

    assert_eq!(report.station_label, "Santa Monica, CA");
    assert_eq!(report.events_count(), 2);
    assert_eq!(report.active_events[0].height, 1.2);
    assert_eq!(report.active_events[1].height, -0.3);
    assert_eq!(report.highest.height, 1.2);
    assert_eq!(report.highest.kind, TideKind::High);
    assert_eq!(report.lowest.height, -0.3);
    assert_eq!(report.window.end, june(5));

    let counts: Vec<usize> = report.forecast.iter().map(|d| d.count).collect();
    assert_eq!(counts, vec![2, 2, 0, 0, 0]);
}

/// Provider errors come back as status text, with no report.
#[tokio::test]
async fn provider_error_leaves_empty_state() {
    let mut session = offline_session(r#"{"error": {"message": "Station not found"}}"#);
    let outcome = session.on_selection_changed("0000000", june(1)).await;

    assert_eq!(outcome.status.message, "Could not load tides: Station not found");
    assert!(outcome.report.is_none());
}

/// Bootstrap without a metadata feed lands on the fallback list.
#[tokio::test]
async fn bootstrap_uses_fallback_catalog() {
    let (session, warning) = TideSession::bootstrap(CannedNoaa { body: FOUR_EVENTS }).await;

    assert_eq!(session.catalog_source(), CatalogSource::Fallback);
    assert_eq!(session.catalog().len(), 5);
    assert_eq!(
        warning.unwrap().message,
        "Station catalog warning: metadata feed disabled in tests"
    );
}

#[test]
fn report_from_ingested_events() {
    let raw: Vec<RawPrediction> = serde_json::from_value(json!([
        {"t": "2024-06-01 03:12", "v": 1.0, "type": "H"},
        {"t": "2024-06-01 09:40", "v": 3.0, "type": "H"},
        {"t": "2024-06-01 15:40", "v": 3.0, "type": "H"},
        {"t": "2024-06-01 21:40", "v": 0.5, "type": "L"}
    ]))
    .unwrap();
    let events = ingest(&raw).unwrap();
    let now = june(20).and_hms_opt(0, 0, 0).unwrap();
    let report = TideReport::build(&fallback::catalog(), "9410840", june(1), events, now).unwrap();

    // first of the tied highs
    assert_eq!(report.highest, report.events[1]);
    assert_eq!(report.lowest, report.events[3]);
}

#[test]
fn cli_parses_near_with_negative_longitude() {
    let cli = Cli::try_parse_from(["tide-finder", "--near", "34.0", "-118.5"]).unwrap();
    assert_eq!(cli.near, Some(vec![34.0, -118.5]));

    let choice = StationChoice::from_cli(&cli, &Config::default());
    match choice {
        StationChoice::Near(point) => {
            assert_eq!(point.lat, 34.0);
            assert_eq!(point.lng, -118.5);
        }
        other => panic!("unexpected choice {other:?}"),
    }
}

#[test]
fn cli_parses_date_and_station() {
    let cli =
        Cli::try_parse_from(["tide-finder", "-s", "9414290", "-d", "2024-06-01", "-vv"]).unwrap();
    assert_eq!(cli.date, Some(june(1)));
    assert_eq!(cli.verbose, 2);
    assert_eq!(
        StationChoice::from_cli(&cli, &Config::default()),
        StationChoice::Id("9414290".to_string())
    );

    assert!(Cli::try_parse_from(["tide-finder", "-d", "June 1st"]).is_err());
}

#[test]
fn station_resolution_from_choices() {
    let session = offline_session(FOUR_EVENTS);
    let config = Config::default();

    let by_search = resolve_station(&session, &StationChoice::Search("francisco".into()), &config);
    assert_eq!(by_search.as_deref(), Some("9414290"));

    let no_match = resolve_station(&session, &StationChoice::Search("honolulu".into()), &config);
    assert_eq!(no_match, None);

    let nearest = resolve_station(
        &session,
        &StationChoice::Near(config.reference.clone()),
        &config,
    );
    assert_eq!(nearest.as_deref(), Some("9410840"));

    let default = resolve_station(&session, &StationChoice::Default, &config);
    assert_eq!(default.as_deref(), Some("9410840"));
}
