//! HistoryScraper — one symbol, one pipeline, its last extracted series.
//!
//! The plain methods return `Result`. [`HistoryScraper::guarded`] wraps the
//! same operations so failures land in an [`ErrorLog`] and the caller gets
//! `None`, which is how the scraper behaves when run unattended.

use crate::config::ScraperConfig;
use crate::domain::{PriceObservation, Symbol};
use crate::errlog::{guard, ErrorLog};
use crate::error::ScrapeError;
use crate::export;
use crate::period;
use crate::scrape::{self, Extraction, HttpFetcher, PageFetcher};
use std::path::PathBuf;

pub struct HistoryScraper<F: PageFetcher = HttpFetcher> {
    symbol: Symbol,
    config: ScraperConfig,
    fetcher: F,
    last: Option<Extraction>,
}

impl HistoryScraper<HttpFetcher> {
    /// Scraper for `symbol` using a real HTTP client.
    pub fn new(symbol: impl Into<Symbol>, config: ScraperConfig) -> Result<Self, ScrapeError> {
        let fetcher = HttpFetcher::new(&config.user_agent)?;
        Ok(Self::with_fetcher(symbol, config, fetcher))
    }
}

impl<F: PageFetcher> HistoryScraper<F> {
    pub fn with_fetcher(symbol: impl Into<Symbol>, config: ScraperConfig, fetcher: F) -> Self {
        Self {
            symbol: symbol.into(),
            config,
            fetcher,
            last: None,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// `MM/DD/YYYY` to an epoch-second string, in the configured time basis.
    pub fn convert_date_to_timestamp(&self, date: &str) -> Result<String, ScrapeError> {
        period::convert_date_to_timestamp(date, self.config.time_basis)
    }

    /// Fetch and parse the history table between two epoch boundaries.
    ///
    /// On success the extraction replaces the stored one. On failure the
    /// previous extraction, if any, is left in place.
    pub fn extract_financial_data(
        &mut self,
        period1: &str,
        period2: &str,
    ) -> Result<&[PriceObservation], ScrapeError> {
        let extraction = scrape::extract(
            &self.fetcher,
            &self.config.base_url,
            &self.symbol,
            period1,
            period2,
            self.config.row_policy,
        )?;
        let stored = self.last.insert(extraction);
        Ok(stored.series.history())
    }

    /// Last successful extraction.
    pub fn extraction(&self) -> Option<&Extraction> {
        self.last.as_ref()
    }

    /// Append the last extracted series to the symbol's JSON file.
    pub fn export_as_json(&self) -> Result<PathBuf, ScrapeError> {
        let extraction = self.last.as_ref().ok_or_else(|| ScrapeError::NothingExtracted {
            symbol: self.symbol.clone(),
        })?;
        export::write_json(&extraction.series, &self.symbol, &self.config.output_dir)
    }

    /// View whose operations log failures to `log` and return `None`.
    pub fn guarded<'a>(&'a mut self, log: &'a dyn ErrorLog) -> GuardedScraper<'a, F> {
        GuardedScraper { inner: self, log }
    }
}

/// Log-and-swallow wrapper over a [`HistoryScraper`].
pub struct GuardedScraper<'a, F: PageFetcher> {
    inner: &'a mut HistoryScraper<F>,
    log: &'a dyn ErrorLog,
}

impl<'a, F: PageFetcher> GuardedScraper<'a, F> {
    pub fn convert_date_to_timestamp(&self, date: &str) -> Option<String> {
        guard(self.log, "convert_date_to_timestamp", || {
            self.inner.convert_date_to_timestamp(date)
        })
    }

    pub fn extract_financial_data(
        &mut self,
        period1: &str,
        period2: &str,
    ) -> Option<&[PriceObservation]> {
        let inner = &mut *self.inner;
        guard(self.log, "extract_financial_data", move || {
            inner.extract_financial_data(period1, period2)
        })
    }

    pub fn export_as_json(&self) -> Option<PathBuf> {
        guard(self.log, "export_as_json", || self.inner.export_as_json())
    }

    pub fn scraper(&self) -> &HistoryScraper<F> {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errlog::MemoryErrorLog;
    use crate::period::TimeBasis;
    use std::cell::RefCell;

    const PAGE: &str = r#"<table data-test="historical-prices">
        <tr><th><span>Date</span></th></tr>
        <tr><td><span>Jan 29, 2021</span></td><td><span>1</span></td><td><span>2</span></td>
            <td><span>0.5</span></td><td><span>1.5</span></td><td><span>1.5</span></td>
            <td><span>1,000</span></td></tr>
        <tr><td><span>*Close price adjusted for splits.</span></td></tr>
        </table>"#;

    fn config() -> ScraperConfig {
        ScraperConfig {
            base_url: "http://test.invalid".into(),
            time_basis: TimeBasis::Utc,
            ..ScraperConfig::default()
        }
    }

    #[test]
    fn extract_requests_expected_url_and_stores_series() {
        let seen = RefCell::new(Vec::new());
        let fetcher = |url: &str| {
            seen.borrow_mut().push(url.to_string());
            Ok::<_, ScrapeError>(PAGE.to_string())
        };
        let mut scraper = HistoryScraper::with_fetcher("AMZN", config(), fetcher);
        let p1 = scraper.convert_date_to_timestamp("01/01/2021").unwrap();
        let p2 = scraper.convert_date_to_timestamp("01/31/2021").unwrap();

        let history = scraper.extract_financial_data(&p1, &p2).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].volume(), 1000.0);
        assert_eq!(
            *seen.borrow(),
            vec!["http://test.invalid/quote/AMZN/history?period1=1609459200&period2=1612051200\
                  &interval=1d&filter=history&frequency=1d&includeAdjustedClose=true"
                .to_string()]
        );
        assert!(scraper.extraction().is_some());
    }

    #[test]
    fn export_before_extract_is_nothing_extracted() {
        let fetcher = |_: &str| Ok::<_, ScrapeError>(PAGE.to_string());
        let scraper = HistoryScraper::with_fetcher("AMZN", config(), fetcher);
        assert!(matches!(
            scraper.export_as_json(),
            Err(ScrapeError::NothingExtracted { .. })
        ));
    }

    #[test]
    fn guarded_calls_log_instead_of_failing() {
        let fetcher = |url: &str| {
            Err::<String, _>(ScrapeError::HttpStatus {
                url: url.to_string(),
                status: 404,
            })
        };
        let mut scraper = HistoryScraper::with_fetcher("NOPE", config(), fetcher);
        let log = MemoryErrorLog::new();
        let mut guarded = scraper.guarded(&log);

        assert!(guarded.convert_date_to_timestamp("31/01/2021").is_none());
        assert!(guarded.extract_financial_data("1", "2").is_none());
        assert!(guarded.export_as_json().is_none());

        let ops: Vec<String> = log.entries().into_iter().map(|(op, _)| op).collect();
        assert_eq!(
            ops,
            ["convert_date_to_timestamp", "extract_financial_data", "export_as_json"]
        );
    }
}
