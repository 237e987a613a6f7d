//! # Tide Session
//!
//! The state a tide display works against: the loaded catalog and a single
//! entry point, [`TideSession::on_selection_changed`], that every way of picking
//! a station (dropdown, search, map click, "nearest" button) funnels into.
//!
//! ## Data Flow
//! 1. **Bootstrap**: fetch station metadata → normalize → fall back to the static
//!    list on any failure or an empty result, with a non-fatal warning
//! 2. **Selection**: fetch the 5-day window → ingest → build a [`TideReport`]
//! 3. **Outcome**: a [`Status`] line plus either a report or nothing; on failure
//!    the display shows an explicit empty state, never stale data
//!
//! The session is driven through `&mut self`, so a second selection can't start
//! while a fetch is outstanding.

use crate::aggregate::{
    active_day_events, curve_bars, extrema_for, forecast, ingest, next_upcoming, CurveBar,
    DaySummary, NoEventsError,
};
use crate::catalog::{normalize, Catalog, EmptyCatalogError};
use crate::fallback;
use crate::tide_data::{PredictionWindow, TideError, TideSource};
use crate::TideEvent;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};

pub const CATALOG_LOADING_MESSAGE: &str = "Loading NOAA tide station locations...";
pub const FETCHING_MESSAGE: &str = "Fetching a 5-day tide window from NOAA...";
pub const LOADED_MESSAGE: &str = "Fresh 5-day tides loaded.";

/// The startup catalog couldn't be used.
#[derive(Error, Debug)]
pub enum CatalogUnavailable {
    #[error(transparent)]
    Fetch(#[from] TideError),
    #[error(transparent)]
    Empty(#[from] EmptyCatalogError),
}

/// Why a selection produced no report.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Choose a station first.")]
    NoStationSelected,

    #[error("{0}")]
    PredictionFetchFailed(#[from] TideError),

    #[error(transparent)]
    NoEvents(#[from] NoEventsError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Ok,
    Error,
}

/// One line of user-facing status text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub message: String,
    pub level: StatusLevel,
}

impl Status {
    pub fn info(message: impl Into<String>) -> Self {
        Status {
            message: message.into(),
            level: StatusLevel::Info,
        }
    }

    pub fn ok(message: impl Into<String>) -> Self {
        Status {
            message: message.into(),
            level: StatusLevel::Ok,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Status {
            message: message.into(),
            level: StatusLevel::Error,
        }
    }
}

/// Where the current catalog came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    Noaa,
    Fallback,
}

/// Everything a display needs for one (station, day) selection.
#[derive(Debug, Clone, PartialEq)]
pub struct TideReport {
    pub station_id: String,
    /// Station name, or the id when the station isn't in the catalog
    pub station_label: String,
    pub selected_day: NaiveDate,
    pub window: PredictionWindow,
    /// Every event in the window, in time order
    pub events: Vec<TideEvent>,
    /// The selected day's events, or all events if the day has none
    pub active_events: Vec<TideEvent>,
    pub highest: TideEvent,
    pub lowest: TideEvent,
    pub next: Option<TideEvent>,
    pub curve: Vec<CurveBar>,
    pub forecast: Vec<DaySummary>,
}

impl TideReport {
    /// Assemble a report from already-ingested events.
    ///
    /// `now` is the current UTC wall-clock time; it decides what "next" means
    /// when the selected day is today.
    pub fn build(
        catalog: &Catalog,
        station_id: &str,
        selected_day: NaiveDate,
        events: Vec<TideEvent>,
        now: NaiveDateTime,
    ) -> Result<Self, NoEventsError> {
        let active_events = active_day_events(&events, selected_day);
        let extrema = extrema_for(&active_events).ok_or(NoEventsError)?;

        Ok(TideReport {
            station_id: station_id.to_string(),
            station_label: catalog.label_for(station_id),
            selected_day,
            window: PredictionWindow::starting(selected_day),
            next: next_upcoming(&events, now, now.date(), selected_day),
            curve: curve_bars(&active_events),
            forecast: forecast(&events, selected_day),
            highest: extrema.highest,
            lowest: extrema.lowest,
            active_events,
            events,
        })
    }

    /// Number of events on the active day.
    pub fn events_count(&self) -> usize {
        self.active_events.len()
    }
}

/// Result of one selection: status text and, on success, the report.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionOutcome {
    pub status: Status,
    pub report: Option<TideReport>,
}

/// Fetch and normalize the station catalog, failing on an empty result.
pub async fn load_catalog<S: TideSource>(source: &S) -> Result<Catalog, CatalogUnavailable> {
    let raw = source.fetch_stations().await?;
    let catalog = normalize(raw.iter()).non_empty()?;
    info!(stations = catalog.len(), "loaded NOAA station catalog");
    Ok(catalog)
}

/// Catalog plus the source used to fetch predictions.
pub struct TideSession<S> {
    source: S,
    catalog: Catalog,
    catalog_source: CatalogSource,
}

impl<S: TideSource> TideSession<S> {
    pub fn new(source: S, catalog: Catalog, catalog_source: CatalogSource) -> Self {
        TideSession {
            source,
            catalog,
            catalog_source,
        }
    }

    /// Load the NOAA catalog, substituting the fallback list if that fails.
    ///
    /// The returned status carries the warning when the fallback was used.
    pub async fn bootstrap(source: S) -> (Self, Option<Status>) {
        match load_catalog(&source).await {
            Ok(catalog) => (Self::new(source, catalog, CatalogSource::Noaa), None),
            Err(e) => {
                warn!("station catalog unavailable, using fallback list: {e}");
                let status = Status::error(format!("Station catalog warning: {e}"));
                (
                    Self::new(source, fallback::catalog(), CatalogSource::Fallback),
                    Some(status),
                )
            }
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn catalog_source(&self) -> CatalogSource {
        self.catalog_source
    }

    /// One-line description of the loaded catalog.
    pub fn catalog_message(&self) -> String {
        match self.catalog_source {
            CatalogSource::Noaa => format!("Loaded {} NOAA tide stations.", self.catalog.len()),
            CatalogSource::Fallback => {
                "Using fallback stations right now (NOAA metadata feed unavailable).".to_string()
            }
        }
    }

    /// Fetch predictions for a station and day and build the report.
    pub async fn fetch_report(
        &self,
        station_id: &str,
        day: NaiveDate,
        now: NaiveDateTime,
    ) -> Result<TideReport, SessionError> {
        let station_id = station_id.trim();
        if station_id.is_empty() {
            return Err(SessionError::NoStationSelected);
        }

        let window = PredictionWindow::starting(day);
        let raw = self.source.fetch_predictions(station_id, window).await?;
        let events = ingest(&raw)?;
        info!(station = station_id, events = events.len(), "predictions loaded");

        Ok(TideReport::build(&self.catalog, station_id, day, events, now)?)
    }

    /// Handle a new (station, day) selection using the current time.
    pub async fn on_selection_changed(&mut self, station_id: &str, day: NaiveDate) -> SelectionOutcome {
        self.on_selection_changed_at(station_id, day, Utc::now().naive_utc())
            .await
    }

    /// As [`Self::on_selection_changed`], with an explicit "now".
    pub async fn on_selection_changed_at(
        &mut self,
        station_id: &str,
        day: NaiveDate,
        now: NaiveDateTime,
    ) -> SelectionOutcome {
        match self.fetch_report(station_id, day, now).await {
            Ok(report) => SelectionOutcome {
                status: Status::ok(LOADED_MESSAGE),
                report: Some(report),
            },
            Err(SessionError::NoStationSelected) => SelectionOutcome {
                status: Status::error(SessionError::NoStationSelected.to_string()),
                report: None,
            },
            Err(e) => {
                warn!(station = station_id, "could not load tides: {e}");
                SelectionOutcome {
                    status: Status::error(format!("Could not load tides: {e}")),
                    report: None,
                }
            }
        }
    }
}
