//! pricehist CLI — fetch historical price tables and convert period dates.
//!
//! Commands:
//! - `fetch` — scrape the history page for one or more symbols (one after
//!   another) and append each series to `{symbol}_historical_prices.json`
//! - `epoch` — print the epoch-second value the history URL uses for a date

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pricehist_core::errlog::FileErrorLog;
use pricehist_core::period::{self, TimeBasis};
use pricehist_core::scrape::{Extraction, RowPolicy};
use pricehist_core::{HistoryScraper, ScraperConfig};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "pricehist",
    about = "pricehist — scrape daily historical prices into JSON"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape historical prices and append them to {SYMBOL}_historical_prices.json.
    Fetch {
        /// Symbols to fetch (e.g., AMZN AAPL).
        #[arg(required = true)]
        symbols: Vec<String>,

        /// First day of the period (MM/DD/YYYY).
        #[arg(long)]
        from: String,

        /// Last day of the period (MM/DD/YYYY).
        #[arg(long)]
        to: String,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory for the JSON output. Overrides the config file.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Directory for error logs. Overrides the config file.
        #[arg(long)]
        log_dir: Option<PathBuf>,

        /// Fail the whole symbol on the first row that is not a price row.
        #[arg(long, default_value_t = false)]
        strict: bool,

        /// Take period boundaries at UTC midnight instead of local midnight.
        #[arg(long, default_value_t = false)]
        utc: bool,

        /// Never fail: write errors to {operation}_{MM_DD_YYYY}_error.log instead.
        #[arg(long, default_value_t = false)]
        silent: bool,
    },
    /// Print the epoch-second timestamp for a MM/DD/YYYY date.
    Epoch {
        /// Date (MM/DD/YYYY).
        date: String,

        /// Use UTC midnight instead of local midnight.
        #[arg(long, default_value_t = false)]
        utc: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch {
            symbols,
            from,
            to,
            config,
            output_dir,
            log_dir,
            strict,
            utc,
            silent,
        } => {
            let mut cfg = match config {
                Some(path) => ScraperConfig::from_file(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => ScraperConfig::default(),
            };
            if let Some(dir) = output_dir {
                cfg.output_dir = dir;
            }
            if let Some(dir) = log_dir {
                cfg.log_dir = dir;
            }
            if strict {
                cfg.row_policy = RowPolicy::Strict;
            }
            if utc {
                cfg.time_basis = TimeBasis::Utc;
            }

            if silent {
                run_fetch_silent(&symbols, &from, &to, cfg)
            } else {
                run_fetch(&symbols, &from, &to, cfg)
            }
        }
        Commands::Epoch { date, utc } => {
            let basis = if utc { TimeBasis::Utc } else { TimeBasis::Local };
            println!("{}", period::convert_date_to_timestamp(&date, basis)?);
            Ok(())
        }
    }
}

fn run_fetch(symbols: &[String], from: &str, to: &str, cfg: ScraperConfig) -> Result<()> {
    for symbol in symbols {
        let mut scraper = HistoryScraper::new(symbol.as_str(), cfg.clone())?;
        let period1 = scraper.convert_date_to_timestamp(from)?;
        let period2 = scraper.convert_date_to_timestamp(to)?;

        scraper
            .extract_financial_data(&period1, &period2)
            .with_context(|| format!("extracting {symbol}"))?;
        let path = scraper
            .export_as_json()
            .with_context(|| format!("exporting {symbol}"))?;

        if let Some(extraction) = scraper.extraction() {
            print_summary(symbol, extraction, &path);
        }
    }
    Ok(())
}

/// Every step goes through the error log; nothing propagates.
fn run_fetch_silent(symbols: &[String], from: &str, to: &str, cfg: ScraperConfig) -> Result<()> {
    std::fs::create_dir_all(&cfg.log_dir)
        .with_context(|| format!("creating log dir {}", cfg.log_dir.display()))?;
    let log = FileErrorLog::new(&cfg.log_dir);

    for symbol in symbols {
        let mut scraper = HistoryScraper::new(symbol.as_str(), cfg.clone())?;
        let mut guarded = scraper.guarded(&log);

        let periods = (
            guarded.convert_date_to_timestamp(from),
            guarded.convert_date_to_timestamp(to),
        );
        if let (Some(period1), Some(period2)) = periods {
            guarded.extract_financial_data(&period1, &period2);
        }
        let exported = guarded.export_as_json();

        match (exported, scraper.extraction()) {
            (Some(path), Some(extraction)) => print_summary(symbol, extraction, &path),
            _ => info!("{symbol}: see error logs in {}", log.dir().display()),
        }
    }
    Ok(())
}

fn print_summary(symbol: &str, extraction: &Extraction, path: &std::path::Path) {
    println!(
        "{symbol}: {} observations -> {}",
        extraction.series.len(),
        path.display()
    );
    for action in &extraction.actions {
        let date = action
            .date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "?".into());
        println!("  {date}: {}", action.detail);
    }
    for row in &extraction.skipped {
        println!("  skipped row {}: {}", row.index, row.reason);
    }
}
