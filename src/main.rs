//! Catalog-Scraper main entry point
//!
//! This is the command-line interface for the Catalog-Scraper product scraper.

use anyhow::Context;
use catalog_scraper::config::{load_config_with_hash, Config};
use catalog_scraper::output::{print_summary, summarize_file};
use catalog_scraper::storage::OutputLayout;
use catalog_scraper::Coordinator;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Catalog-Scraper: a resilient product catalog scraper
///
/// Catalog-Scraper fetches the configured collection pages, follows every
/// product link, extracts product records, caches product images and writes
/// the dataset as a single JSON file.
#[derive(Parser, Debug)]
#[command(name = "catalog-scraper")]
#[command(version)]
#[command(about = "A resilient product catalog scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Override the output root directory from the config
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Validate config and show what would be scraped without scraping
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Summarize the existing products file and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if let Some(dir) = &cli.output_dir {
        config.output.root_dir = dir.display().to_string();
    }

    if cli.dry_run {
        handle_dry_run(&config)
    } else if cli.stats {
        handle_stats(&config)
    } else {
        handle_scrape(config, config_hash).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("catalog_scraper=info,warn"),
            1 => EnvFilter::new("catalog_scraper=debug,info"),
            2 => EnvFilter::new("catalog_scraper=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be scraped
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let coordinator = Coordinator::new(config.clone())?;
    let layout = coordinator.layout();

    println!("=== Catalog-Scraper Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Product links: {}", config.site.product_link_selector);
    println!("  Product path marker: {}", config.site.product_path_marker);
    println!("  Price: {}", config.site.price_selector);

    println!("\nFetch:");
    println!("  Timeout: {}s", config.fetch.timeout_secs);
    println!("  Max retries: {}", config.fetch.max_retries);
    println!("  Page backoff: {}ms", config.fetch.page_backoff_ms);
    println!("  Image backoff: {}ms", config.fetch.image_backoff_ms);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Root: {}", layout.root().display());
    println!("  Images: {}", layout.images_dir().display());
    println!("  Products: {}", layout.products_path().display());

    let collections = coordinator.collection_urls();
    println!("\nCollections ({}):", collections.len());
    for url in &collections {
        println!("  - {}", url);
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the --stats mode: summarizes the existing products file
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let path = OutputLayout::from_config(&config.output).products_path();
    let summary = summarize_file(&path)
        .with_context(|| format!("failed to read products file {}", path.display()))?;

    print_summary(&summary);

    Ok(())
}

/// Handles the main scrape operation
async fn handle_scrape(config: Config, config_hash: String) -> anyhow::Result<()> {
    tracing::info!(
        "Scraping {} collections from {}",
        config.site.collections.len(),
        config.site.base_url
    );

    let coordinator = Coordinator::new(config)?.with_config_hash(config_hash);

    match coordinator.run().await {
        Ok(summary) => {
            tracing::info!("Scrape completed");
            print_summary(&summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            Err(e.into())
        }
    }
}
