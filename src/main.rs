//! Sumi-Sweep main entry point
//!
//! This is the command-line interface for the Sumi-Sweep origin sweeper.
//! Discovered URLs go to stdout; every diagnostic goes to stderr.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use sumi_sweep::config::{load_config, Config, Overrides};
use sumi_sweep::{crawl, CrawlOutcome, SweepError, EXIT_SUCCESS};
use tracing_subscriber::EnvFilter;

/// Sumi-Sweep: a time-boxed origin sweeper
///
/// Sumi-Sweep prints every URL it can reach beneath a target origin within a
/// fixed time budget, honoring the wildcard rules of the target's robots.txt.
/// If robots.txt names a sitemap, the sitemap is printed instead.
#[derive(Parser, Debug)]
#[command(name = "sumi-sweep")]
#[command(version)]
#[command(about = "A time-boxed origin sweeper", long_about = None)]
struct Cli {
    /// Origin to crawl, e.g. https://example.com
    #[arg(long, value_name = "URL")]
    target: Option<String>,

    /// Crawl duration in seconds [default: 5]
    #[arg(long, value_name = "SECS")]
    duration: Option<u64>,

    /// Maximum concurrent fetches [default: 10]
    #[arg(long, value_name = "N")]
    conc: Option<usize>,

    /// Pause after each fetch while still holding its slot [default: 0]
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Path to a TOML configuration file supplying defaults
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            target: self.target.clone(),
            duration: self.duration,
            concurrency: self.conc,
            fetch_delay_ms: self.delay_ms,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(&cli).await {
        Ok(outcome) => {
            match outcome {
                CrawlOutcome::Crawled(stats) => {
                    tracing::info!("Crawl finished after {:?}", stats.elapsed)
                }
                CrawlOutcome::Sitemap { entries } => {
                    tracing::debug!("Printed {} site map entries", entries.len())
                }
            }
            exit_code(EXIT_SUCCESS)
        }
        Err(e) => {
            tracing::error!("{}", e);
            exit_code(e.exit_code())
        }
    }
}

/// Builds the configuration and runs the crawl against stdout
async fn run(cli: &Cli) -> Result<CrawlOutcome, SweepError> {
    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => Config::default(),
    };
    let config = config.apply_overrides(cli.overrides());

    let mut stdout = std::io::stdout().lock();
    crawl(config, &mut stdout).await
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Output goes to stderr so stdout carries nothing but URLs.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_sweep=info,warn"),
            1 => EnvFilter::new("sumi_sweep=debug,info"),
            2 => EnvFilter::new("sumi_sweep=trace,debug"),
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
