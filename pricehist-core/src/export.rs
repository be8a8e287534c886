//! JSON export of an observation series.
//!
//! Output goes to `{dir}/{symbol}_historical_prices.json`, opened in append
//! mode: each export adds one `{"history": [...]}` document after whatever the
//! file already holds. A file written twice is therefore two concatenated
//! documents; [`read_payloads`] reads such a file back.

use crate::domain::ObservationSeries;
use crate::error::ScrapeError;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// `{symbol}_historical_prices.json`
pub fn file_name(symbol: &str) -> String {
    format!("{symbol}_historical_prices.json")
}

/// Append `series` as one JSON document to the symbol's export file.
pub fn write_json(
    series: &ObservationSeries,
    symbol: &str,
    dir: &Path,
) -> Result<PathBuf, ScrapeError> {
    fs::create_dir_all(dir).map_err(|e| ScrapeError::io(dir, e))?;
    let path = dir.join(file_name(symbol));
    let payload = serde_json::to_string(series)?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| ScrapeError::io(&path, e))?;
    file.write_all(payload.as_bytes())
        .map_err(|e| ScrapeError::io(&path, e))?;

    info!("{symbol}: wrote {} observations to {}", series.len(), path.display());
    Ok(path)
}

/// Read every concatenated series document in an export file.
pub fn read_payloads(path: &Path) -> Result<Vec<ObservationSeries>, ScrapeError> {
    let content = fs::read_to_string(path).map_err(|e| ScrapeError::io(path, e))?;
    serde_json::Deserializer::from_str(&content)
        .into_iter::<ObservationSeries>()
        .map(|doc| doc.map_err(ScrapeError::from))
        .collect()
}
