use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use tide_finder_lib::config::CONFIG_FILE;

/// Find NOAA tide stations and show a 5-day high/low tide window.
#[derive(Parser, Debug)]
#[command(
    name = "tide-finder",
    version,
    about = "NOAA tide station finder with a 5-day high/low tide window"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to TOML configuration file.
    #[arg(short, long, default_value = CONFIG_FILE)]
    pub config: PathBuf,

    /// NOAA station id to show (default: configured station).
    #[arg(short, long)]
    pub station: Option<String>,

    /// First day of the 5-day window, YYYY-MM-DD (default: today, UTC).
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// Filter stations by name, state or id; the first match is selected.
    #[arg(long)]
    pub search: Option<String>,

    /// Rank stations near a point and select the nearest.
    #[arg(
        long,
        num_args = 2,
        value_names = ["LAT", "LNG"],
        allow_negative_numbers = true
    )]
    pub near: Option<Vec<f64>>,

    /// Select the station nearest the configured reference point.
    #[arg(long, conflicts_with = "near")]
    pub nearest: bool,

    /// Skip the NOAA metadata feed and use the built-in station list.
    #[arg(long)]
    pub offline_catalog: bool,

    /// Write the effective configuration to the config path and exit.
    #[arg(long)]
    pub init_config: bool,
}
