//! # Tide Finder Application Entry Point
//!
//! This binary crate wires the library together for the terminal: it loads the
//! station catalog, resolves a station from the command line (id, search, or
//! proximity), fetches the 5-day window and prints the report.

// Test modules
#[cfg(test)]
mod tests;

mod cli;
mod logging;

use chrono::Utc;
use clap::Parser;
use cli::Cli;
use tide_finder_lib::{
    config::{Config, ReferencePoint},
    fallback,
    ranking::{initial_station, rank},
    renderer::{draw_ascii, render_empty, render_nearby, render_station_list},
    session::{
        CatalogSource, Status, StatusLevel, TideSession, CATALOG_LOADING_MESSAGE,
        FETCHING_MESSAGE,
    },
    tide_data::{NoaaClient, TideSource},
};
use tracing::info;

fn print_status(status: &Status) {
    match status.level {
        StatusLevel::Error => eprintln!("⚠ {}", status.message),
        StatusLevel::Ok => println!("✓ {}", status.message),
        StatusLevel::Info => println!("{}", status.message),
    }
}

/// Where the station to show comes from.
#[derive(Debug, PartialEq)]
enum StationChoice {
    Id(String),
    Search(String),
    Near(ReferencePoint),
    Default,
}

impl StationChoice {
    fn from_cli(cli: &Cli, config: &Config) -> Self {
        if let Some(id) = &cli.station {
            return StationChoice::Id(id.clone());
        }
        if let Some(query) = &cli.search {
            return StationChoice::Search(query.clone());
        }
        if let Some([lat, lng]) = cli.near.as_deref() {
            return StationChoice::Near(ReferencePoint {
                name: format!("{lat:.4}, {lng:.4}"),
                lat: *lat,
                lng: *lng,
            });
        }
        if cli.nearest {
            return StationChoice::Near(config.reference.clone());
        }
        StationChoice::Default
    }
}

/// Resolve the station id to fetch, printing any list the choice produces.
fn resolve_station<S: TideSource>(
    session: &TideSession<S>,
    choice: &StationChoice,
    config: &Config,
) -> Option<String> {
    let catalog = session.catalog();
    match choice {
        StationChoice::Id(id) => Some(id.clone()),
        StationChoice::Search(query) => {
            let matches = catalog.search(query);
            print!("{}", render_station_list(&matches));
            matches.first().map(|station| station.id.clone())
        }
        StationChoice::Near(point) => {
            let nearby = rank(
                catalog,
                point.lat,
                point.lng,
                config.nearby.limit,
                config.nearby.radius_km,
            );
            print!("{}", render_nearby(&nearby, point));
            let nearest = nearby.first()?;
            print_status(&Status::ok(format!(
                "Centered on tide stations near {}.",
                point.name
            )));
            Some(nearest.station.id.clone())
        }
        StationChoice::Default => {
            let reference = &config.reference;
            let nearby = rank(
                catalog,
                reference.lat,
                reference.lng,
                config.nearby.limit,
                config.nearby.radius_km,
            );
            print!("{}", render_nearby(&nearby, reference));
            initial_station(catalog, &config.station.default_id, reference)
                .map(|station| station.id.clone())
        }
    }
}

async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    let client = NoaaClient::new(&config.api)?;

    let mut session = if cli.offline_catalog {
        TideSession::new(client, fallback::catalog(), CatalogSource::Fallback)
    } else {
        print_status(&Status::info(CATALOG_LOADING_MESSAGE));
        let (session, warning) = TideSession::bootstrap(client).await;
        if let Some(warning) = warning {
            print_status(&warning);
        }
        session
    };
    println!("{}", session.catalog_message());

    let choice = StationChoice::from_cli(&cli, &config);
    let Some(station_id) = resolve_station(&session, &choice, &config) else {
        print_status(&Status::error("Choose a station first."));
        return Ok(());
    };

    let day = cli.date.unwrap_or_else(|| Utc::now().date_naive());
    info!(station = %station_id, %day, "selection changed");

    println!();
    print_status(&Status::info(FETCHING_MESSAGE));
    let outcome = session.on_selection_changed(&station_id, day).await;
    print_status(&outcome.status);
    println!();

    match &outcome.report {
        Some(report) => draw_ascii(report, config.api.units),
        None => print!("{}", render_empty()),
    }
    Ok(())
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = Config::load_from_path(&cli.config);
    if cli.init_config {
        config.save_to_path(&cli.config)?;
        println!("Configuration written to {}", cli.config.display());
        return Ok(());
    }

    // Create Tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(cli, config))
}
