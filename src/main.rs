//! Sitewalk main entry point
//!
//! This is the command-line interface for the Sitewalk site traversal engine.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use sitewalk::config::{load_config, Config};
use sitewalk::output::json::write_report;
use sitewalk::output::{print_statistics, CrawlStatistics};
use sitewalk::url::{parse_seed, UrlPolicy};
use sitewalk::{Crawler, TracingObserver};
use tracing_subscriber::EnvFilter;

/// Sitewalk: a bounded site crawler
///
/// Sitewalk starts from a seed URL, follows links inside the seed's site
/// (including subdomains) up to a depth and page budget, and records every
/// visited page with its title, meta tags, headings, text, links and images.
#[derive(Parser, Debug)]
#[command(name = "sitewalk")]
#[command(version)]
#[command(about = "A bounded site crawler", long_about = None)]
struct Cli {
    /// Seed URL (http, https or file)
    #[arg(value_name = "SEED")]
    seed: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum link depth from the seed
    #[arg(short = 'd', long)]
    max_depth: Option<u32>,

    /// Maximum number of pages to fetch
    #[arg(short = 'm', long)]
    max_pages: Option<usize>,

    /// Delay between requests in seconds
    #[arg(long, value_name = "SECONDS")]
    delay: Option<f64>,

    /// Crawl each level with a pool of workers
    #[arg(long)]
    concurrent: bool,

    /// Number of workers for concurrent crawling
    #[arg(short, long)]
    workers: Option<usize>,

    /// Write the crawl report as JSON to this file
    #[arg(short, long, value_name = "OUTPUT.json")]
    output: Option<PathBuf>,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the loaded configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(depth) = self.max_depth {
            config.crawler.max_depth = depth;
        }
        if let Some(pages) = self.max_pages {
            config.crawler.max_pages = pages;
        }
        if let Some(delay) = self.delay {
            config.crawler.delay_seconds = delay;
        }
        if self.concurrent {
            config.crawler.concurrent = true;
        }
        if let Some(workers) = self.workers {
            config.crawler.workers = workers;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };
    cli.apply_overrides(&mut config);
    config.validate().context("Invalid configuration")?;

    if cli.dry_run {
        handle_dry_run(&config, &cli.seed)?;
    } else {
        handle_crawl(config, &cli).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitewalk=info,warn"),
            1 => EnvFilter::new("sitewalk=debug,info"),
            2 => EnvFilter::new("sitewalk=trace,debug"),
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

/// Handles the --dry-run mode: validates the seed and shows what would be crawled
fn handle_dry_run(config: &Config, seed: &str) -> anyhow::Result<()> {
    let seed = parse_seed(seed).context("Invalid seed URL")?;
    let policy = UrlPolicy::for_seed(&seed, &config.policy);

    println!("=== Sitewalk Dry Run ===\n");

    println!("Seed:");
    println!("  URL: {}", seed);
    if policy.site_host().is_empty() {
        println!("  Site: (local file, seed only)");
    } else {
        println!("  Site: {} and subdomains", policy.site_host());
    }

    println!("\nCrawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Delay: {}s", config.crawler.delay_seconds);
    if config.crawler.concurrent {
        println!("  Strategy: concurrent ({} workers)", config.crawler.workers);
    } else {
        println!("  Strategy: sequential");
    }

    println!("\nHTTP:");
    println!("  Client identity: {}", config.http.client_identity);
    println!("  Accept-Language: {}", config.http.accept_language);
    println!("  Timeout: {}s", config.http.timeout_seconds);
    println!("  Follow redirects: {}", config.http.follow_redirects);

    println!(
        "\nIgnored extensions ({}): {}",
        config.policy.ignore_extensions.len(),
        config.policy.ignore_extensions.join(" ")
    );

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the normal crawl mode
async fn handle_crawl(config: Config, cli: &Cli) -> anyhow::Result<()> {
    let crawler = Crawler::new(config)
        .context("Failed to initialize crawler")?
        .with_observer(Arc::new(TracingObserver));

    let report = crawler
        .run(&cli.seed)
        .await
        .with_context(|| format!("Crawl of {} failed", cli.seed))?;

    tracing::info!(
        "Crawl finished ({}) in {}s",
        report.outcome,
        report.duration().num_milliseconds() as f64 / 1000.0
    );

    if let Some(path) = &cli.output {
        write_report(&report, path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        tracing::info!("Report written to: {}", path.display());
    }

    if !cli.quiet {
        print_statistics(&CrawlStatistics::from_report(&report));
    }

    Ok(())
}
