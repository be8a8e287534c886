//! History page URL construction.

/// Host serving the history pages.
pub const DEFAULT_BASE_URL: &str = "https://finance.yahoo.com";

/// Path and query for daily bars with adjusted close between two epoch
/// boundaries.
pub fn history_path(symbol: &str, period1: &str, period2: &str) -> String {
    format!(
        "/quote/{symbol}/history?period1={period1}&period2={period2}\
         &interval=1d&filter=history&frequency=1d&includeAdjustedClose=true"
    )
}

/// Full URL: `base_url` (trailing slash tolerated) plus [`history_path`].
pub fn history_url(base_url: &str, symbol: &str, period1: &str, period2: &str) -> String {
    format!(
        "{}{}",
        base_url.trim_end_matches('/'),
        history_path(symbol, period1, period2)
    )
}
