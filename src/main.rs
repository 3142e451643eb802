//! Game Catalog Crawler main entry point
//!
//! This is the command-line interface for the game catalog crawler.

use clap::Parser;
use game_catalog_crawler::browser::ChromeDriver;
use game_catalog_crawler::config::{load_config_with_hash, validate, Config};
use game_catalog_crawler::crawler::Coordinator;
use game_catalog_crawler::output::print_summary;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Exit status used when a second signal forces an immediate exit
const FORCED_EXIT_CODE: i32 = 130;

/// Game Catalog Crawler: a headless-browser crawler for game listings
///
/// Walks the configured listing pages, extracts every game it finds and
/// appends one CSV row per game as it goes. A tag listing pass runs once
/// the listings are done.
#[derive(Parser, Debug)]
#[command(name = "game-catalog-crawler")]
#[command(version = "1.0.0")]
#[command(about = "A headless-browser crawler for game listings", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Only extract the tag listing
    #[arg(long)]
    tags: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_configuration(cli.config.as_deref())?;

    let cancel = CancellationToken::new();
    spawn_signal_handler(cancel.clone());
    spawn_deadline(cancel.clone(), config.crawler.run_deadline());

    tracing::info!(headless = config.browser.headless, "Launching browser");
    let driver = Arc::new(ChromeDriver::launch(&config.browser).await?);

    let mut coordinator = Coordinator::new(config, driver, cancel)?;

    let result = if cli.tags {
        coordinator.run_tags_only().await
    } else {
        coordinator.run().await
    };

    match result {
        Ok(summary) => {
            print_summary(&summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("game_catalog_crawler=info,warn"),
            1 => EnvFilter::new("game_catalog_crawler=debug,info"),
            2 => EnvFilter::new("game_catalog_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file, or validates the built-in defaults
fn load_configuration(path: Option<&std::path::Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        tracing::info!("No configuration file given, using built-in defaults");
        let config = Config::default();
        validate(&config)?;
        return Ok(config);
    };

    tracing::info!("Loading configuration from: {}", path.display());
    match load_config_with_hash(path) {
        Ok((config, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            Err(e.into())
        }
    }
}

/// Waits for SIGINT, or SIGTERM on Unix
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = terminate.recv() => {}
                }
            }
            Err(e) => {
                tracing::warn!("Cannot listen for SIGTERM: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

/// First signal cancels the run gracefully. Second signal exits immediately.
fn spawn_signal_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::warn!("Received shutdown signal, finishing current step (signal again to force quit)");
        cancel.cancel();

        shutdown_signal().await;
        eprintln!("\nForce quit requested, exiting immediately...");
        std::process::exit(FORCED_EXIT_CODE);
    });
}

/// Cancels the run once `deadline` has elapsed
fn spawn_deadline(cancel: CancellationToken, deadline: Duration) {
    tokio::spawn(async move {
        tokio::select! {
            _ = cancel.cancelled() => {}
            _ = tokio::time::sleep(deadline) => {
                tracing::warn!(deadline_secs = deadline.as_secs(), "Run deadline reached, cancelling");
                cancel.cancel();
            }
        }
    });
}
