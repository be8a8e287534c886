//! pricehist core — scrape a historical-prices page into typed records.
//!
//! Pipeline for one symbol:
//! - period dates (`MM/DD/YYYY`) converted to epoch-second boundaries
//! - one blocking GET of the history page
//! - the `historical-prices` table walked row by row into validated
//!   `PriceObservation`s, dividend/split rows classified separately
//! - the series appended as JSON to `{symbol}_historical_prices.json`
//!
//! Operations return `Result<_, ScrapeError>`; `errlog::guard` turns any of
//! them into a log-and-return-`None` call backed by per-day error log files.

pub mod config;
pub mod domain;
pub mod errlog;
pub mod error;
pub mod export;
pub mod history;
pub mod period;
pub mod scrape;

pub use config::ScraperConfig;
pub use domain::{ObservationSeries, PriceObservation};
pub use error::{ScrapeError, ValidationError};
pub use history::{GuardedScraper, HistoryScraper};
