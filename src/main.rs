//! Amanda Search: a thin web search front-end over Google Custom Search
//!
//! This is the main entry point for the application.

use amanda_search::{
    config,
    network::HttpClient,
    providers::ProviderLoader,
    web::{create_router, AppState},
};
use anyhow::{bail, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let Some(config_path) = parse_args()? else {
        return Ok(());
    };

    // Load configuration before logging so `general.debug` can pick the level
    let settings_path = config::locate(config_path.as_deref());
    let settings = config::load(settings_path.as_deref())?;

    let default_level = if settings.general.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting Amanda Search v{}", amanda_search::VERSION);

    match settings_path {
        Some(ref path) => info!("Loaded settings from: {}", path.display()),
        None => info!("No settings file found, using defaults"),
    }
    settings.validate()?;
    info!(
        "Loaded configuration for instance: {}",
        settings.general.instance_name
    );

    // Initialize HTTP client
    let client = HttpClient::with_settings(&settings.outgoing)?;
    info!("HTTP client initialized");

    let provider = ProviderLoader::load(&settings, client)?;

    // Create application state
    let state = AppState::new(settings.clone(), provider)?;
    info!("Application state initialized");

    let app = create_router(state);

    let addr = SocketAddr::new(settings.server.bind_address.parse()?, settings.server.port);

    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Returns the `--config` path, or `None` when the process should exit
fn parse_args() -> Result<Option<Option<PathBuf>>> {
    let mut args = std::env::args().skip(1);
    let mut config_path = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" | "--config" => match args.next() {
                Some(path) => config_path = Some(PathBuf::from(path)),
                None => bail!("{} requires a file path", arg),
            },
            "-h" | "--help" => {
                print_usage();
                return Ok(None);
            }
            "-V" | "--version" => {
                println!("amanda-search {}", amanda_search::VERSION);
                return Ok(None);
            }
            other => {
                print_usage();
                bail!("unknown argument: {}", other);
            }
        }
    }

    Ok(Some(config_path))
}

/// Print usage information
fn print_usage() {
    println!(
        r#"
Amanda Search v{}
A web search front-end over Google Custom Search

USAGE:
    amanda-search [OPTIONS]

OPTIONS:
    -c, --config <FILE>    Path to configuration file
    -h, --help             Print help information
    -V, --version          Print version information

ENVIRONMENT VARIABLES:
    AMANDA_SETTINGS_PATH   Path to settings.yml
    AMANDA_DEBUG           Enable debug mode (true/false)
    AMANDA_PORT            Server port
    AMANDA_BIND_ADDRESS    Bind address
    AMANDA_PROVIDER        remote_api, embedded_widget or mock
    GOOGLE_API_KEY         Custom Search API key
    GOOGLE_CSE_ID          Programmable Search Engine id
    RUST_LOG               Log filter (overrides the debug flag)
"#,
        amanda_search::VERSION
    );
}
