//! Extraction pipeline: build the URL, fetch the page, parse the table.

pub mod fetch;
pub mod request;
pub mod table;

pub use fetch::{HttpFetcher, PageFetcher, DEFAULT_USER_AGENT};
pub use request::{history_path, history_url, DEFAULT_BASE_URL};
pub use table::{
    classify_row, parse_history_table, strip_separators, ActionKind, CorporateAction, Extraction,
    RowKind, RowPolicy, SkippedRow,
};

use crate::error::ScrapeError;
use tracing::info;

/// One fetch-and-parse run for `symbol` between two epoch-second boundaries.
pub fn extract(
    fetcher: &dyn PageFetcher,
    base_url: &str,
    symbol: &str,
    period1: &str,
    period2: &str,
    policy: RowPolicy,
) -> Result<Extraction, ScrapeError> {
    let url = history_url(base_url, symbol, period1, period2);
    let body = fetcher.fetch(&url)?;
    let extraction = parse_history_table(&body, symbol, policy)?;
    info!(
        "{symbol}: {} observations, {} corporate actions, {} rows skipped",
        extraction.series.len(),
        extraction.actions.len(),
        extraction.skipped.len()
    );
    Ok(extraction)
}
