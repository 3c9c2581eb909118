//! Img-Scout main entry point
//!
//! This is the command-line interface for the Img-Scout image scraper.

use clap::Parser;
use img_scout::config::load_config;
use img_scout::extract::{FetchEngine, Orchestrator};
use img_scout::output::{print_stats, write_records};
use img_scout::render::HttpRenderer;
use img_scout::sites::SelectorSite;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Img-Scout: image metadata extraction from product-search pages
///
/// Img-Scout renders each configured site's search page, discovers
/// detail-page links, and fetches image metadata concurrently under a
/// bounded worker pool. Per-page failures are logged and skipped; a scrape
/// always returns whatever succeeded.
#[derive(Parser, Debug)]
#[command(name = "img-scout")]
#[command(version = "1.0.0")]
#[command(about = "Image metadata scraper for product-search pages", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Search query to scrape for
    #[arg(short = 'Q', long, default_value = "")]
    query: String,

    /// Only scrape the site with this website identifier
    #[arg(long, value_name = "WEBSITE")]
    site: Option<String>,

    /// Write extracted records to this JSON Lines file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be scraped without scraping
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config, cli.site.as_deref());
        return Ok(());
    }

    handle_scrape(config, &cli).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("img_scout=info,warn"),
            1 => EnvFilter::new("img_scout=debug,info"),
            2 => EnvFilter::new("img_scout=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be
/// scraped
fn handle_dry_run(config: &img_scout::Config, site_filter: Option<&str>) {
    println!("=== Img-Scout Dry Run ===\n");

    println!("Engine Configuration:");
    println!("  Max workers: {}", config.engine.max_workers);
    println!(
        "  Navigation timeout: {}ms",
        config.engine.navigation_timeout_ms
    );
    println!(
        "  Selector timeout: {}ms",
        config.engine.selector_timeout_ms
    );

    let sites: Vec<_> = config
        .sites
        .iter()
        .filter(|s| site_filter.map_or(true, |f| s.website == f))
        .collect();

    println!("\nSites ({}):", sites.len());
    for site in &sites {
        println!("  - {}", site.website);
        println!("    Search URL: {}", site.search_url);
        if let Some(extra) = &site.search_url_extra {
            println!("    Extra: {}", extra);
        }
        println!("    Readiness selector: {}", site.selector);
        println!("    Link selector: {}", site.link_selector);
        println!("    Image selector: {}", site.image_selector);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would scrape {} site(s)", sites.len());
}

/// Handles the main scrape operation across all configured sites
async fn handle_scrape(config: img_scout::Config, cli: &Cli) -> anyhow::Result<()> {
    let renderer: Arc<dyn img_scout::render::PageRenderer> =
        Arc::new(HttpRenderer::new(&config.engine)?);
    let engine = FetchEngine::new(config.engine.max_workers);

    let sites: Vec<_> = config
        .sites
        .into_iter()
        .filter(|s| cli.site.as_deref().map_or(true, |f| s.website == f))
        .collect();

    if sites.is_empty() {
        anyhow::bail!(
            "no configured site matches '{}'",
            cli.site.as_deref().unwrap_or("")
        );
    }

    tracing::info!(
        "Scraping {} site(s) with {} workers",
        sites.len(),
        engine.max_workers()
    );

    let mut all_records = Vec::new();

    for site in sites {
        let website = site.website.clone();
        let scraper = Arc::new(SelectorSite::new(site, Arc::clone(&renderer)));
        let orchestrator = Orchestrator::new(Arc::clone(&renderer), scraper, engine.clone());

        // Per-site failures already degraded to empty result sets inside the
        // orchestrator; only engine-level faults land here
        match orchestrator.scrape(&cli.query).await {
            Ok(report) => {
                if !cli.quiet {
                    print_stats(&report.stats);
                    println!();
                }
                all_records.extend(report.records);
            }
            Err(e) => {
                tracing::error!("Engine failure while scraping {}: {}", website, e);
                return Err(e.into());
            }
        }
    }

    if let Some(path) = &cli.output {
        write_records(&all_records, path)?;
        tracing::info!(
            "Wrote {} record(s) to {}",
            all_records.len(),
            path.display()
        );
    } else {
        for record in &all_records {
            println!("{}", serde_json::to_string(record)?);
        }
    }

    Ok(())
}
