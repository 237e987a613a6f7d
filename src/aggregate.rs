//! # Tide Event Aggregation
//!
//! Turns NOAA's flat list of high/low predictions into the numbers a tide
//! display needs: events per UTC day, the day's highest and lowest water,
//! the next upcoming tide, and a 5-day forecast.
//!
//! ## Ingestion
//! Heights arrive as strings (`"1.234"`) and are coerced permissively. An item
//! whose height isn't a finite number, or whose timestamp can't be read, is
//! dropped. NOAA returns events in time order; ingestion keeps that order and
//! only re-sorts (stably) if the feed ever isn't ordered.
//!
//! ## Extrema
//! Highest and lowest use strict `>` / `<`, so on equal heights the first event
//! in time order is kept.

use crate::{coerce_finite, TideEvent, TideKind};
use chrono::{Days, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Number of days covered by a prediction window and by the forecast.
pub const FORECAST_DAYS: u64 = 5;

/// Minimum height span used when scaling the bar curve
const MIN_CURVE_SPAN: f64 = 0.2;
/// Pixel height of the shortest bar
const CURVE_BASE_PX: f64 = 10.0;
/// Pixel height added between the lowest and highest bar
const CURVE_RANGE_PX: f64 = 150.0;

/// Nothing usable survived ingestion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("No tide events were returned for this station in the selected range.")]
pub struct NoEventsError;

/// One prediction as NOAA sends it.
///
/// `t` is "YYYY-MM-DD HH:MM" in the requested time zone (always GMT here),
/// `v` is the height as a string or number, `type` is "H" or "L".
///
/// Fields stay untyped so one odd item can't fail the whole payload;
/// [`ingest`] decides per item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPrediction {
    #[serde(default)]
    pub t: Value,
    #[serde(default)]
    pub v: Value,
    #[serde(default, rename = "type")]
    pub kind: Value,
}

/// Highest and lowest water of a set of events.
#[derive(Debug, Clone, PartialEq)]
pub struct Extrema {
    pub highest: TideEvent,
    pub lowest: TideEvent,
}

/// One forecast card.
///
/// `extrema` is `None` when the day has no events, which keeps "no data"
/// distinct from a genuine 0.0 ft tide.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySummary {
    pub day: NaiveDate,
    pub count: usize,
    pub extrema: Option<Extrema>,
}

impl DaySummary {
    pub fn has_data(&self) -> bool {
        self.extrema.is_some()
    }
}

/// One bar of the per-day tide curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveBar {
    pub kind: TideKind,
    pub height: f64,
    /// Rendered bar height in pixels, 10..=160
    pub px: u32,
}

/// Parse a NOAA prediction timestamp.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .ok()
}

/// Convert raw predictions into tide events.
///
/// Fails with [`NoEventsError`] when nothing is left after dropping unusable
/// items; callers should show an explicit empty state, not zeros.
pub fn ingest(raw: &[RawPrediction]) -> Result<Vec<TideEvent>, NoEventsError> {
    let mut events: Vec<TideEvent> = raw
        .iter()
        .filter_map(|item| {
            let height = coerce_finite(&item.v)?;
            let timestamp = item.t.as_str().and_then(parse_timestamp)?;
            let kind = TideKind::from_flag(item.kind.as_str().unwrap_or(""));
            Some(TideEvent::new(timestamp, height, kind))
        })
        .collect();

    if events.is_empty() {
        return Err(NoEventsError);
    }

    if !events.windows(2).all(|w| w[0].timestamp <= w[1].timestamp) {
        events.sort_by_key(|event| event.timestamp);
    }
    Ok(events)
}

/// Bucket events by UTC day, keeping time order inside each day.
pub fn group_by_day(events: &[TideEvent]) -> BTreeMap<NaiveDate, Vec<TideEvent>> {
    let mut days: BTreeMap<NaiveDate, Vec<TideEvent>> = BTreeMap::new();
    for event in events {
        days.entry(event.day_key).or_default().push(event.clone());
    }
    days
}

/// Events on `day`, in time order.
pub fn events_on(events: &[TideEvent], day: NaiveDate) -> Vec<TideEvent> {
    events
        .iter()
        .filter(|event| event.day_key == day)
        .cloned()
        .collect()
}

/// Events on `day`, or every event when that day has none.
pub fn active_day_events(events: &[TideEvent], day: NaiveDate) -> Vec<TideEvent> {
    let on_day = events_on(events, day);
    if on_day.is_empty() {
        events.to_vec()
    } else {
        on_day
    }
}

/// Highest and lowest event, first one winning ties.
///
/// `None` for an empty slice.
pub fn extrema_for(events: &[TideEvent]) -> Option<Extrema> {
    let first = events.first()?;
    let mut highest = first;
    let mut lowest = first;

    for event in &events[1..] {
        if event.height > highest.height {
            highest = event;
        }
        if event.height < lowest.height {
            lowest = event;
        }
    }

    Some(Extrema {
        highest: highest.clone(),
        lowest: lowest.clone(),
    })
}

/// The tide to headline as "next".
///
/// When the selected day is today, that's the first event strictly after
/// `now` anywhere in the window. Otherwise, or when nothing is left today, it
/// is the first event of the selected day, or of the whole window if the day
/// is empty.
pub fn next_upcoming(
    events: &[TideEvent],
    now: NaiveDateTime,
    today: NaiveDate,
    selected: NaiveDate,
) -> Option<TideEvent> {
    if selected == today {
        if let Some(event) = events.iter().find(|event| event.timestamp > now) {
            return Some(event.clone());
        }
    }
    active_day_events(events, selected).into_iter().next()
}

/// Summaries for `FORECAST_DAYS` consecutive days starting at `anchor`.
pub fn forecast(events: &[TideEvent], anchor: NaiveDate) -> Vec<DaySummary> {
    let by_day = group_by_day(events);
    (0..FORECAST_DAYS)
        .filter_map(|offset| anchor.checked_add_days(Days::new(offset)))
        .map(|day| {
            let on_day = by_day.get(&day).map(Vec::as_slice).unwrap_or(&[]);
            DaySummary {
                day,
                count: on_day.len(),
                extrema: extrema_for(on_day),
            }
        })
        .collect()
}

/// Scale events into bars: the lowest event gets 10 px, the highest 160 px.
///
/// Spans under 0.2 height units are stretched to 0.2 so a flat day doesn't
/// blow up into full-height bars.
pub fn curve_bars(events: &[TideEvent]) -> Vec<CurveBar> {
    let Some(extrema) = extrema_for(events) else {
        return Vec::new();
    };
    let min = extrema.lowest.height;
    let span = (extrema.highest.height - min).max(MIN_CURVE_SPAN);

    events
        .iter()
        .map(|event| CurveBar {
            kind: event.kind,
            height: event.height,
            px: (CURVE_BASE_PX + (event.height - min) / span * CURVE_RANGE_PX).round() as u32,
        })
        .collect()
}
