//! # Tide Report Rendering
//!
//! Plain-text rendering of a [`TideReport`] for the terminal: headline numbers,
//! the day's timeline, a bar curve, and the 5-day forecast cards. Every
//! function returns a `String`; only [`draw_ascii`] prints.
//!
//! Times are shown in UTC, the zone NOAA was queried in.

use crate::aggregate::{CurveBar, DaySummary};
use crate::catalog::option_label;
use crate::config::{ReferencePoint, Units};
use crate::geo::km_to_miles;
use crate::session::TideReport;
use crate::{RankedStation, Station, TideEvent, TideKind};
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt::Write;

/// Rows available to the tallest curve bar
const CURVE_ROWS: u32 = 8;
/// Pixel height of the tallest bar produced by [`crate::aggregate::curve_bars`]
const CURVE_MAX_PX: u32 = 160;

/// Format a height with two decimals and its unit, e.g. `-0.30 ft`.
pub fn format_height(height: f64, units: Units) -> String {
    format!("{:.2} {}", height, units.suffix())
}

/// Format a height for chart labels with appropriate precision and sign
fn format_tide_height(height: f64) -> String {
    if height == 0.0 {
        " 0 ".to_string()
    } else if height > 0.0 {
        if height.fract() == 0.0 {
            format!("+{:.0}", height)
        } else {
            format!("+{:.1}", height)
        }
    } else if height.fract() == 0.0 {
        format!("{:.0}", height)
    } else {
        format!("{:.1}", height)
    }
}

/// e.g. `Sat 03:12 UTC`
pub fn format_event_time(timestamp: NaiveDateTime) -> String {
    timestamp.format("%a %H:%M UTC").to_string()
}

/// e.g. `Sat, Jun 1`
pub fn format_day(day: NaiveDate) -> String {
    day.format("%a, %b %-d").to_string()
}

fn kind_marker(kind: TideKind) -> char {
    match kind {
        TideKind::High => '▲',
        TideKind::Low => '▼',
    }
}

fn describe_event(event: &TideEvent, units: Units) -> String {
    format!(
        "{} at {}",
        format_event_time(event.timestamp),
        format_height(event.height, units)
    )
}

/// One timeline row per event.
pub fn render_timeline(events: &[TideEvent], units: Units) -> String {
    if events.is_empty() {
        return "No tide events available for this day.\n".to_string();
    }

    let mut out = String::new();
    for event in events {
        let _ = writeln!(
            out,
            "  {} {:<10} {:<14} {:>9}",
            kind_marker(event.kind),
            format!("{} Tide", event.kind.label()),
            format_event_time(event.timestamp),
            format_height(event.height, units)
        );
    }
    out
}

/// Vertical bars, one column per event, with the height printed underneath.
pub fn render_curve(bars: &[CurveBar]) -> String {
    if bars.is_empty() {
        return "No values to chart.\n".to_string();
    }

    let filled: Vec<u32> = bars
        .iter()
        .map(|bar| (bar.px * CURVE_ROWS).div_ceil(CURVE_MAX_PX).clamp(1, CURVE_ROWS))
        .collect();

    let mut out = String::new();
    for level in (1..=CURVE_ROWS).rev() {
        let row: String = filled
            .iter()
            .map(|&rows| if rows >= level { " ██  " } else { "     " })
            .collect();
        let _ = writeln!(out, "  {}", row.trim_end());
    }

    let kinds: String = bars
        .iter()
        .map(|bar| format!("  {}  ", kind_marker(bar.kind)))
        .collect();
    let _ = writeln!(out, "  {}", kinds.trim_end());

    let labels: String = bars
        .iter()
        .map(|bar| format!("{:^5}", format_tide_height(bar.height)))
        .collect();
    let _ = writeln!(out, "  {}", labels.trim_end());
    out
}

/// One line per forecast day. Days without data say so instead of showing 0.
pub fn render_forecast(days: &[DaySummary], units: Units) -> String {
    let mut out = String::new();
    for summary in days {
        let range = match &summary.extrema {
            Some(extrema) => format!(
                "High {:>9}  Low {:>9}",
                format_height(extrema.highest.height, units),
                format_height(extrema.lowest.height, units)
            ),
            None => "No prediction data".to_string(),
        };
        let _ = writeln!(
            out,
            "  {:<12} {:<30} {} Events",
            format_day(summary.day),
            range,
            summary.count
        );
    }
    out
}

/// Full report: headline, timeline, curve, forecast.
pub fn render_report(report: &TideReport, units: Units) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{} ({})", report.station_label, report.station_id);
    let _ = writeln!(
        out,
        "Window: {} to {}",
        format_day(report.window.begin),
        format_day(report.window.end)
    );

    match &report.next {
        Some(next) => {
            let _ = writeln!(
                out,
                "Next tide: {} {}",
                next.kind.label(),
                describe_event(next, units)
            );
        }
        None => {
            let _ = writeln!(out, "Next tide: - No upcoming tides in this range.");
        }
    }

    let _ = writeln!(
        out,
        "Highest: {}   Lowest: {}   Events: {}",
        format_height(report.highest.height, units),
        format_height(report.lowest.height, units),
        report.events_count()
    );

    let _ = writeln!(out, "\nTimeline ({})", format_day(report.selected_day));
    out.push_str(&render_timeline(&report.active_events, units));

    let _ = writeln!(out, "\nCurve");
    out.push_str(&render_curve(&report.curve));

    let _ = writeln!(out, "\n5-day forecast");
    out.push_str(&render_forecast(&report.forecast, units));

    out
}

/// The empty state shown after a failed selection.
pub fn render_empty() -> String {
    "Next tide: - No data loaded.\nHighest: -   Lowest: -   Events: -\n".to_string()
}

/// Stations near a reference point, with distances in miles.
pub fn render_nearby(ranked: &[RankedStation], reference: &ReferencePoint) -> String {
    let mut out = format!("Tide stations near {}\n", reference.name);
    for entry in ranked {
        let _ = writeln!(
            out,
            "  {:<8} {} ({:.1} mi)",
            entry.station.id,
            entry.station.name,
            km_to_miles(entry.distance_km)
        );
    }
    out
}

/// Dropdown-style station list.
pub fn render_station_list(stations: &[&Station]) -> String {
    if stations.is_empty() {
        return "No stations match your search\n".to_string();
    }
    let mut out = String::new();
    for station in stations {
        let _ = writeln!(out, "  {}", option_label(station));
    }
    out
}

/// Render tide report to ASCII terminal.
pub fn draw_ascii(report: &TideReport, units: Units) {
    print!("{}", render_report(report, units));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{curve_bars, ingest, RawPrediction};
    use crate::fallback;
    use serde_json::json;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn test_report() -> TideReport {
        let raw: Vec<RawPrediction> = [
            ("2024-06-01 03:12", "1.2", "H"),
            ("2024-06-01 09:40", "-0.3", "L"),
            ("2024-06-02 04:01", "1.5", "H"),
            ("2024-06-02 10:22", "-0.1", "L"),
        ]
        .iter()
        .map(|(t, v, kind)| RawPrediction {
            t: json!(t),
            v: json!(v),
            kind: json!(kind),
        })
        .collect();
        let events = ingest(&raw).unwrap();
        let now = day(10).and_hms_opt(0, 0, 0).unwrap();
        TideReport::build(&fallback::catalog(), "9410840", day(1), events, now).unwrap()
    }

    #[test]
    fn test_format_height() {
        assert_eq!(format_height(1.2, Units::English), "1.20 ft");
        assert_eq!(format_height(-0.3, Units::Metric), "-0.30 m");
    }

    #[test]
    fn test_format_tide_height() {
        // Test zero
        assert_eq!(format_tide_height(0.0), " 0 ");

        // Test positive values
        assert_eq!(format_tide_height(1.0), "+1");
        assert_eq!(format_tide_height(1.5), "+1.5");

        // Test negative values
        assert_eq!(format_tide_height(-1.0), "-1");
        assert_eq!(format_tide_height(-0.3), "-0.3");
    }

    #[test]
    fn test_format_dates() {
        let ts = day(1).and_hms_opt(3, 12, 0).unwrap();
        assert_eq!(format_event_time(ts), "Sat 03:12 UTC");
        assert_eq!(format_day(day(1)), "Sat, Jun 1");
    }

    #[test]
    fn test_render_report() {
        let text = render_report(&test_report(), Units::English);

        assert!(text.starts_with("Santa Monica, CA (9410840)\n"));
        assert!(text.contains("Next tide: High Sat 03:12 UTC at 1.20 ft"));
        assert!(text.contains("Highest: 1.20 ft   Lowest: -0.30 ft   Events: 2"));
        assert!(text.contains("High Tide"));
        assert!(text.contains("Low Tide"));
        assert!(text.contains("No prediction data"));
        assert!(text.contains("0 Events"));
    }

    #[test]
    fn test_forecast_no_data_is_not_zero() {
        let report = test_report();
        let text = render_forecast(&report.forecast, Units::English);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("  Sat, Jun 1"));
        assert!(lines[0].contains("High   1.20 ft"));
        assert!(lines[0].contains("Low  -0.30 ft"));
        assert!(lines[2].contains("No prediction data"));
        assert!(!lines[2].contains("0.00"));
    }

    #[test]
    fn test_render_curve() {
        let report = test_report();
        let text = render_curve(&curve_bars(&report.active_events));
        let lines: Vec<&str> = text.lines().collect();

        // 8 bar rows, markers, labels
        assert_eq!(lines.len(), 10);
        // only the high tide reaches the top row
        assert_eq!(lines[0].matches('█').count(), 2);
        // both bars show on the bottom row
        assert_eq!(lines[7].matches('█').count(), 4);
        assert!(lines[9].contains("+1.2"));
        assert!(lines[9].contains("-0.3"));

        assert_eq!(render_curve(&[]), "No values to chart.\n");
    }

    #[test]
    fn test_render_timeline_empty() {
        assert_eq!(
            render_timeline(&[], Units::English),
            "No tide events available for this day.\n"
        );
    }

    #[test]
    fn test_render_empty() {
        assert!(render_empty().contains("No data loaded."));
    }

    #[test]
    fn test_render_nearby() {
        let catalog = fallback::catalog();
        let reference = ReferencePoint::default();
        let ranked = crate::ranking::rank(&catalog, reference.lat, reference.lng, 2, 180.0);
        let text = render_nearby(&ranked, &reference);

        assert!(text.starts_with("Tide stations near Santa Monica, CA\n"));
        assert!(text.contains("9410840"));
        assert!(text.contains(" mi)"));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_render_station_list() {
        let catalog = fallback::catalog();
        let text = render_station_list(&catalog.search("jolla"));
        assert_eq!(text, "  La Jolla, CA, CA (9410230)\n");
        assert_eq!(render_station_list(&[]), "No stations match your search\n");
    }
}
