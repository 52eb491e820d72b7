//! Pagehaul main entry point
//!
//! Command-line interface for the batch page fetcher.

use clap::Parser;
use pagehaul::config::{load_config, load_url_file, Config};
use pagehaul::output::write_report;
use pagehaul::scraper::scrape;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Pagehaul: fetch a batch of web pages concurrently
///
/// Pagehaul fetches a fixed list of URLs with bounded parallelism, a global
/// rate limit, and per-URL retry with exponential backoff, then writes the
/// extracted content and a run report in several formats.
#[derive(Parser, Debug)]
#[command(name = "pagehaul")]
#[command(version = "1.0.0")]
#[command(about = "A batch web page fetcher", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Path to a newline-delimited URL file (overrides the config's url list)
    #[arg(long, value_name = "FILE")]
    urls: Option<PathBuf>,

    /// Output directory (overrides the config's output directory)
    #[arg(long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be fetched without fetching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let mut config = match load_config(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // CLI overrides
    if let Some(url_file) = &cli.urls {
        tracing::info!("Loading URL list from: {}", url_file.display());
        config.urls = load_url_file(url_file)?;
    }
    if let Some(output_dir) = &cli.output {
        config.output.directory = output_dir.display().to_string();
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_scrape(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("pagehaul=info,warn"),
            1 => EnvFilter::new("pagehaul=debug,info"),
            2 => EnvFilter::new("pagehaul=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would run
fn handle_dry_run(config: &Config) {
    println!("=== Pagehaul Dry Run ===\n");

    println!("Scraper Configuration:");
    println!("  Concurrency: {}", config.scraper.concurrency);
    println!("  Max attempts: {}", config.scraper.max_attempts);
    println!(
        "  Backoff: {}ms base, {}ms cap",
        config.scraper.base_delay_ms, config.scraper.max_delay_ms
    );
    println!(
        "  Min request interval: {}ms",
        config.scraper.min_request_interval_ms
    );
    println!(
        "  Request timeout: {}s",
        config.scraper.request_timeout_secs
    );
    println!("  Dedup targets: {}", config.scraper.dedup_targets);

    println!("\nOutput directory: {}", config.output.directory);

    println!("\nTargets ({}):", config.urls.len());
    for url in &config.urls {
        println!("  - {}", url);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would fetch {} URLs", config.urls.len());
}

/// Handles the main scrape operation
async fn handle_scrape(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let targets = config.urls.clone();
    let output_dir = PathBuf::from(&config.output.directory);

    let report = match scrape(config, targets).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            return Err(e.into());
        }
    };

    write_report(&report, &output_dir)?;

    // Partial failure is normal; report it and exit successfully
    tracing::info!("Total URLs: {}", report.total);
    tracing::info!("Successful: {}", report.succeeded);
    tracing::info!("Failed: {}", report.failed);
    tracing::info!("Duration: {} seconds", report.duration_seconds());

    Ok(())
}
