use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use skycast_core::{AppError, Config, ConfigError};
use skycast_dashboard::{render, DashboardController, DashboardError, ToggleOutcome};
use skycast_weather::{FileStorage, Location};

#[derive(Parser)]
#[command(name = "skycast", version, about = "Current weather, 5-day forecast and favorite locations")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Look up a city and show its weather
    Search {
        /// City name, e.g. "Lisbon" or "Portland, US"
        query: String,
    },
    /// Show weather for a coordinate pair
    Here(Coordinates),
    /// Manage favorite locations
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// List saved favorites
    List,
    /// Add a location, or remove it if already saved
    Toggle {
        /// City name to look up
        #[arg(conflicts_with_all = ["lat", "lon"], required_unless_present = "lat")]
        query: Option<String>,
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
    },
    /// Show weather for a favorite by its list number
    Show {
        /// Number shown by `favorites list`
        number: usize,
    },
    /// Remove all favorites
    Clear,
}

#[derive(Args)]
struct Coordinates {
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,
}

type Dashboard = DashboardController<FileStorage>;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = skycast_core::init() {
        eprintln!("{}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let (config, _warnings) = Config::load_validated()
        .map_err(|e: anyhow::Error| AppError::Config(ConfigError::from_load_error(&e)))?;
    let mut dashboard = DashboardController::from_config(&config)?;

    if let Some(e) = dashboard.favorites_load_error() {
        tracing::warn!("{}", e);
        eprintln!("Warning: saved favorites could not be read; changes will not be saved.");
    }

    match cli.command {
        Some(Command::Search { query }) => {
            dashboard.search(&query).await?;
            print_dashboard(&dashboard);
        }
        Some(Command::Here(coords)) => {
            dashboard.use_coordinates(coords.lat, coords.lon).await?;
            print_dashboard(&dashboard);
        }
        Some(Command::Favorites { action }) => favorites(&mut dashboard, action).await?,
        None => match &config.dashboard.default_location {
            Some(home) => {
                dashboard
                    .show(Location::new(home.name.clone(), home.lat, home.lon))
                    .await?;
                print_dashboard(&dashboard);
            }
            None => println!("{}", render::favorites_list(dashboard.favorites())),
        },
    }

    Ok(())
}

async fn favorites(dashboard: &mut Dashboard, action: FavoritesAction) -> Result<(), AppError> {
    match action {
        FavoritesAction::List => println!("{}", render::favorites_list(dashboard.favorites())),
        FavoritesAction::Toggle { query, lat, lon } => {
            let location = match (query, lat, lon) {
                (_, Some(lat), Some(lon)) => Dashboard::device_location(lat, lon)?,
                (Some(query), _, _) => dashboard.resolve(&query).await?,
                _ => return Err(DashboardError::NoSelection.into()),
            };
            report_toggle(&dashboard.toggle_favorite(location));
        }
        FavoritesAction::Show { number } => {
            let index = number
                .checked_sub(1)
                .ok_or(DashboardError::NoSuchFavorite(number))?;
            dashboard
                .select_favorite(index)
                .await
                .map_err(|e| match e {
                    DashboardError::NoSuchFavorite(_) => DashboardError::NoSuchFavorite(number),
                    other => other,
                })?;
            print_dashboard(dashboard);
        }
        FavoritesAction::Clear => {
            dashboard.clear_favorites()?;
            println!("Favorites cleared.");
        }
    }

    Ok(())
}

fn report_toggle(outcome: &ToggleOutcome) {
    let name = outcome.location.name();
    if outcome.added {
        println!("{} has been added to your favorites.", name);
    } else {
        println!("{} has been removed from your favorites.", name);
    }
    if let Some(e) = &outcome.save_error {
        tracing::debug!("Save error detail: {}", e);
        eprintln!("Warning: favorites could not be saved; the change lasts for this session only.");
    }
}

fn print_dashboard(dashboard: &Dashboard) {
    println!(
        "{}",
        render::dashboard(dashboard.state(), dashboard.is_current_favorite())
    );
}
