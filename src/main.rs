//! Page-Weight main entry point
//!
//! This is the command-line interface for the Page-Weight estimator.

use anyhow::Context;
use clap::Parser;
use page_weight::config::{load_config_with_hash, Config};
use page_weight::output::{print_report, PageWeightResponse};
use page_weight::{ErrorKind, PageWeightService};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Page-Weight: estimates the network weight of a web page
///
/// Page-Weight fetches a page, discovers its images, stylesheets, scripts
/// and CSS-declared images, fetches them concurrently and reports the total
/// size broken down by category.
#[derive(Parser, Debug)]
#[command(name = "page-weight")]
#[command(version)]
#[command(about = "Estimates the network weight of a web page", long_about = None)]
struct Cli {
    /// URL of the page to weigh (http:// is assumed when no scheme is given)
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the JSON response instead of a text summary
    #[arg(long)]
    json: bool,

    /// List every fetched resource with its size
    #[arg(long)]
    breakdown: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::from(1)
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so that stdout only carries the report.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("page_weight=info,warn"),
            1 => EnvFilter::new("page_weight=debug,info"),
            2 => EnvFilter::new("page_weight=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file if one was given, defaults otherwise
fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::debug!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    Ok(config)
}

/// Weighs one page and prints the result
async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = load_config(cli.config.as_deref())?;
    if cli.breakdown {
        config.report.include_breakdown = true;
    }

    let service = PageWeightService::new(config).context("Failed to initialize page weigher")?;

    // Dropping the request future aborts every in-flight fetch
    let result = tokio::select! {
        result = service.compute(&cli.url) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted, request cancelled");
            return Ok(ExitCode::from(1));
        }
    };

    let code = match &result {
        Ok(_) => 0,
        Err(e) => exit_code(e.kind()),
    };

    if cli.json {
        let response = PageWeightResponse::from(result);
        println!("{}", response.to_json().context("Failed to serialize response")?);
    } else {
        match result {
            Ok(report) => print_report(&cli.url, &report, cli.breakdown),
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    Ok(ExitCode::from(code))
}

fn exit_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::BadInput => 2,
        ErrorKind::UpstreamFetch => 3,
        ErrorKind::Internal => 1,
    }
}
