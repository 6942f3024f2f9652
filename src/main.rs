//! Burrow main entry point
//!
//! Command-line interface for the Burrow same-site crawler.

use burrow::config::{default_config, load_config};
use burrow::crawler::{crawl, CrawlEnd};
use burrow::url::SiteBase;
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

/// Burrow: a frontier-driven same-site crawler
///
/// Burrow walks a single site outward from a seed URL, persisting its
/// pending/visited frontier so an interrupted crawl can resume, pacing
/// its own request rate, and storing every fetched page.
#[derive(Parser, Debug)]
#[command(name = "burrow")]
#[command(version = "0.3.0")]
#[command(about = "A frontier-driven same-site crawler", long_about = None)]
struct Cli {
    /// Seed URL to crawl; its host defines the site boundary
    #[arg(value_name = "SEED_URL")]
    seed: String,

    /// Path to TOML configuration file (defaults used when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Resume a previous crawl instead of starting fresh
    #[arg(long)]
    resume: bool,

    /// Validate configuration and show the crawl plan without fetching
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    // Reject schemeless seeds before touching any state on disk.
    if !cli.seed.starts_with("http") {
        anyhow::bail!(
            "Seed URL must include an explicit http/https scheme: {}",
            cli.seed
        );
    }

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => {
            tracing::info!("No config file given, using defaults");
            default_config()?
        }
    };

    if cli.dry_run {
        return handle_dry_run(&config, &cli.seed);
    }

    let shutdown = spawn_shutdown_watcher();

    if cli.resume {
        tracing::info!("Resuming previous crawl state");
    } else {
        tracing::info!("Starting fresh crawl (previous state cleared)");
    }

    let summary = crawl(config, &cli.seed, !cli.resume, shutdown).await?;

    match summary.end {
        CrawlEnd::Done => println!("Crawl complete: frontier drained."),
        CrawlEnd::PageCapReached => println!("Crawl stopped: page cap reached."),
        CrawlEnd::Aborted => println!("Crawl interrupted; state saved for --resume."),
    }
    println!(
        "  {} pages fetched, {} forfeited, {} still pending",
        summary.fetched, summary.skipped, summary.remaining
    );

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("burrow=info,warn"),
            1 => EnvFilter::new("burrow=debug,info"),
            2 => EnvFilter::new("burrow=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows the crawl plan
fn handle_dry_run(config: &burrow::Config, seed: &str) -> anyhow::Result<()> {
    let site = SiteBase::parse(seed, config.crawler.host_match)?;

    println!("=== Burrow Dry Run ===\n");

    println!("Site:");
    println!("  Seed: {}", seed);
    println!("  Base URL: {}", site.base_url);
    println!("  Host boundary: {} ({:?})", site.strip_host, site.host_match);

    println!("\nCrawler:");
    println!(
        "  Pause window: {}-{}s (break every {} URLs)",
        config.crawler.pause_floor_secs,
        config.crawler.pause_ceiling_secs,
        config.crawler.break_interval
    );
    println!("  Page cap: {}", config.crawler.max_pages);
    println!("  Fetch timeout: {}s", config.crawler.fetch_timeout_secs);

    println!("\nIdentity:");
    if config.identity.use_proxy {
        println!(
            "  Proxies: {} (rotate every {} requests)",
            config.identity.proxy_list_path, config.identity.rotate_every
        );
    } else {
        println!("  Proxies: disabled");
    }
    match &config.identity.user_agent_list_path {
        Some(path) => println!("  User agents: {}", path),
        None => println!("  User agents: built-in pool"),
    }

    println!("\nStorage:");
    println!("  Database: {}", config.storage.database_path);
    match &config.storage.pages_dir {
        Some(dir) => println!("  Pages dir: {}", dir),
        None => println!("  Pages dir: disabled"),
    }

    println!(
        "\nFilter: excluding {} media categories",
        config.filter.excluded_media_types.len()
    );

    println!("\n✓ Configuration is valid");
    Ok(())
}

/// Installs a Ctrl-C handler that flips the shutdown channel
fn spawn_shutdown_watcher() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, finishing current URL and stopping");
            let _ = tx.send(true);
        }
        // Keep the sender alive so the receiver never sees a close.
        std::future::pending::<()>().await;
    });
    rx
}
