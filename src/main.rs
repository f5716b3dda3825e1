//! webglean main entry point
//!
//! This is the command-line interface for the webglean page scraper.

use anyhow::{bail, Context};
use chrono::Local;
use clap::{Parser, ValueEnum};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use webglean::config::{load_config, validate, Config, EngineKind};
use webglean::output::{default_export_path, flatten_report, print_statistics};
use webglean::{OutputFormat, ScrapeOptions, ScrapeReport, Scraper};

/// webglean: scrape structured data from rendered web pages
///
/// Each URL is loaded in headless Chrome (or over plain HTTP), and its
/// metadata, text, tables, lists, links, article body and JSON-LD are
/// extracted along with any custom CSS selector fields.
#[derive(Parser, Debug)]
#[command(name = "webglean")]
#[command(version = "1.0.0")]
#[command(about = "Scrape structured data from rendered web pages", long_about = None)]
struct Cli {
    /// URLs to scrape
    #[arg(value_name = "URL")]
    urls: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Custom field as NAME=CSS (repeatable)
    #[arg(short, long = "selector", value_name = "NAME=CSS", value_parser = parse_selector)]
    selectors: Vec<(String, String)>,

    /// Wait for this CSS selector before reading the page
    #[arg(long, value_name = "CSS")]
    wait_for: Option<String>,

    /// Scroll through each page to trigger lazy loading
    #[arg(long)]
    scroll: bool,

    /// Save a full-page screenshot of each page into DIR (chrome engine only)
    #[arg(long, value_name = "DIR")]
    screenshot: Option<PathBuf>,

    /// Ignore cached results
    #[arg(long)]
    no_cache: bool,

    /// Only extract the custom selector fields
    #[arg(long, requires = "selectors")]
    custom_only: bool,

    /// Page loading engine (overrides the config file)
    #[arg(long, value_enum)]
    engine: Option<Engine>,

    /// Output file (default: <output dir>/crawled_data_<timestamp>.<format>)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Output format: json or csv (overrides the config file)
    #[arg(short, long, value_name = "FORMAT")]
    format: Option<OutputFormat>,

    /// Print session statistics after scraping
    #[arg(long)]
    stats: bool,

    /// Validate config and show what would be scraped without fetching anything
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Engine {
    Chrome,
    Http,
}

impl From<Engine> for EngineKind {
    fn from(engine: Engine) -> Self {
        match engine {
            Engine::Chrome => EngineKind::Chrome,
            Engine::Http => EngineKind::Http,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;
    let format = match cli.format {
        Some(format) => format,
        None => config
            .output
            .format
            .parse::<OutputFormat>()
            .map_err(anyhow::Error::msg)?,
    };
    let options = ScrapeOptions {
        use_cache: !cli.no_cache,
        extract_all: config.scraper.extract_all && !cli.custom_only,
        wait_for: cli.wait_for.clone(),
        scroll: cli.scroll,
        screenshot_dir: cli.screenshot.clone(),
        ..ScrapeOptions::from_config(&config)
    };

    if cli.dry_run {
        handle_dry_run(&config, &cli.urls, &options, format);
        return Ok(());
    }

    if cli.urls.is_empty() {
        bail!("No URLs given; pass at least one URL to scrape");
    }

    let output_path = cli.output.clone().unwrap_or_else(|| {
        default_export_path(
            Path::new(&config.output.directory),
            format,
            Local::now().naive_local(),
        )
    });

    handle_scrape(config, &cli.urls, &options, &output_path, format, cli.stats).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("webglean=info,warn"),
            1 => EnvFilter::new("webglean=debug,info"),
            2 => EnvFilter::new("webglean=trace,debug"),
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

/// Parses a `NAME=CSS` selector argument
fn parse_selector(arg: &str) -> Result<(String, String), String> {
    let (name, css) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=CSS, got '{}'", arg))?;

    let (name, css) = (name.trim(), css.trim());
    if name.is_empty() || css.is_empty() {
        return Err(format!("expected NAME=CSS, got '{}'", arg));
    }

    Ok((name.to_string(), css.to_string()))
}

/// Loads the config file (if any) and applies command line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(engine) = cli.engine {
        config.browser.engine = engine.into();
    }

    let cli_selectors: BTreeMap<String, String> = cli.selectors.iter().cloned().collect();
    config.selectors.extend(cli_selectors);

    validate(&config).context("Invalid configuration")?;

    if cli.screenshot.is_some() && config.browser.engine == EngineKind::Http {
        bail!("--screenshot needs the chrome engine");
    }

    Ok(config)
}

/// Handles the --dry-run mode: validates config and shows what would be scraped
fn handle_dry_run(config: &Config, urls: &[String], options: &ScrapeOptions, format: OutputFormat) {
    println!("=== webglean Dry Run ===\n");

    println!("Scraper Configuration:");
    println!("  Engine: {:?}", config.browser.engine);
    println!("  Requests per minute: {}", config.scraper.requests_per_minute);
    println!(
        "  Backoff: x{} per failure, max {}x",
        config.scraper.backoff_factor, config.scraper.max_backoff
    );
    println!("  Extract all: {}", options.extract_all);
    println!(
        "  Cache: {}",
        if config.cache.enabled && options.use_cache {
            format!("{}h TTL", config.cache.ttl_hours)
        } else {
            "off".to_string()
        }
    );
    println!("  Output format: {}", format);

    if let Some(selector) = &options.wait_for {
        println!("  Wait for: {}", selector);
    }
    if options.scroll {
        println!("  Scroll steps: {}", config.browser.scroll_steps);
    }
    if let Some(dir) = &options.screenshot_dir {
        println!("  Screenshots: {}", dir.display());
    }

    println!("\nCustom Selectors ({}):", config.selectors.len());
    for (name, css) in &config.selectors {
        println!("  - {} = {}", name, css);
    }

    println!("\nURLs ({}):", urls.len());
    for url in urls {
        println!("  - {}", url);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main scrape operation
async fn handle_scrape(
    config: Config,
    urls: &[String],
    options: &ScrapeOptions,
    output_path: &Path,
    format: OutputFormat,
    show_stats: bool,
) -> anyhow::Result<()> {
    let mut scraper = Scraper::new(config)?;

    tracing::info!("Scraping {} URLs", urls.len());
    let reports = scraper.scrape_many(urls, options).await;
    scraper.close().await;

    write_reports(&scraper, &reports, output_path, format)?;

    let succeeded = reports.iter().filter(|r| r.is_success()).count();
    println!(
        "✓ Scraped {}/{} pages, results written to {}",
        succeeded,
        reports.len(),
        output_path.display()
    );

    if show_stats {
        println!();
        print_statistics(&scraper.stats());
    }

    if succeeded == 0 {
        bail!("All {} URLs failed", reports.len());
    }

    Ok(())
}

fn write_reports(
    scraper: &Scraper,
    reports: &[ScrapeReport],
    path: &Path,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => scraper.export(reports, path, format)?,
        OutputFormat::Csv => {
            let rows: Vec<_> = reports.iter().map(flatten_report).collect();
            scraper.export(&rows, path, format)?;
        }
    }
    Ok(())
}
