// Command line entry point.
// `serve` runs the weather proxy service, `browse` opens the terminal viewer.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::runtime::Handle;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cityweather::api::ViewerClient;
use cityweather::app::App;
use cityweather::config::{self, Config};
use cityweather::server;
use cityweather::state::{BootstrapSlot, SelectionSynchronizer, SessionConfig};

const DEFAULT_FILTER: &str = "cityweather=info,tower_http=info";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file, defaults to the platform config directory
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the caching weather proxy service
    Serve,
    /// Open the terminal viewer against a running service
    Browse {
        /// Open a city directly, as "Name,CC"
        #[arg(long, value_name = "CITY")]
        city: Option<String>,
    },
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve => {
            tracing_subscriber::fmt().with_env_filter(env_filter()).init();
            server::run(&config).await?;
        }
        Commands::Browse { city } => {
            init_file_logging()?;
            browse(&config, city.as_deref()).await?;
        }
    }

    Ok(())
}

/// The viewer owns the terminal, so logs go to a file.
fn init_file_logging() -> anyhow::Result<()> {
    let Some(path) = config::browse_log_path() else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = File::create(&path).with_context(|| format!("opening {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn browse(config: &Config, city: Option<&str>) -> anyhow::Result<()> {
    let client = ViewerClient::new(&config.viewer.server_url)?;
    info!(server = client.base_url(), "starting viewer");

    let mut startup_errors = Vec::new();
    let cities = match client.cities().await {
        Ok(cities) => cities,
        Err(e) => {
            warn!("failed to load cities: {}", e);
            startup_errors.push(format!("Failed to load cities: {}", e));
            Vec::new()
        }
    };

    let mut bootstrap = match city.and_then(|query| query.rsplit_once(',')) {
        Some((name, country)) => match client.deep_link(name.trim(), country.trim()).await {
            Ok(slot) => slot,
            Err(e) => {
                warn!("deep link for {:?} failed: {}", city, e);
                startup_errors.push(format!("Could not open {}: {}", name.trim(), e));
                BootstrapSlot::empty()
            }
        },
        None => {
            if let Some(query) = city {
                startup_errors.push(format!("Expected \"Name,CC\", got {:?}", query));
            }
            BootstrapSlot::empty()
        }
    };

    let mut session = SelectionSynchronizer::new(SessionConfig::from_viewer(&config.viewer));
    let request = session.load(cities, &mut bootstrap);

    let mut app = App::new(session, client, Handle::current());
    for message in startup_errors {
        app.console.log_error(message);
    }
    app.dispatch(request);

    let mut terminal = ratatui::init();
    let result = tokio::task::block_in_place(|| app.run(&mut terminal));
    ratatui::restore();
    result?;
    Ok(())
}
