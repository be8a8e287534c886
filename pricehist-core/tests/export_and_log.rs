//! Export append semantics and the file-backed error log, end to end.

use chrono::Local;
use pricehist_core::errlog::FileErrorLog;
use pricehist_core::export;
use pricehist_core::period::TimeBasis;
use pricehist_core::scrape::RowPolicy;
use pricehist_core::{HistoryScraper, ScrapeError, ScraperConfig};
use std::path::Path;
use tempfile::TempDir;

const PAGE: &str = r#"<table data-test="historical-prices">
    <tr><th><span>Date</span></th></tr>
    <tr><td><span>Jan 29, 2021</span></td><td><span>3,230.00</span></td><td><span>3,236.99</span></td>
        <td><span>3,184.55</span></td><td><span>3,206.20</span></td><td><span>3,206.20</span></td>
        <td><span>4,293,600</span></td></tr>
    <tr><td><span>Jan 28, 2021</span></td><td><span>3,235.04</span></td><td><span>3,301.68</span></td>
        <td><span>3,228.69</span></td><td><span>3,237.62</span></td><td><span>3,237.62</span></td>
        <td><span>3,149,200</span></td></tr>
    <tr><td><span>*Close price adjusted for splits.</span></td></tr>
    </table>"#;

fn page_fetcher(_url: &str) -> Result<String, ScrapeError> {
    Ok(PAGE.to_string())
}

fn config(dir: &Path) -> ScraperConfig {
    ScraperConfig {
        base_url: "http://fixture.invalid".into(),
        output_dir: dir.join("out"),
        log_dir: dir.join("logs"),
        row_policy: RowPolicy::Strict,
        time_basis: TimeBasis::Utc,
        ..ScraperConfig::default()
    }
}

#[test]
fn two_exports_concatenate_two_payloads() {
    let tmp = TempDir::new().unwrap();
    let mut scraper = HistoryScraper::with_fetcher("AMZN", config(tmp.path()), page_fetcher);
    let p1 = scraper.convert_date_to_timestamp("01/01/2021").unwrap();
    let p2 = scraper.convert_date_to_timestamp("01/31/2021").unwrap();
    assert_eq!(scraper.extract_financial_data(&p1, &p2).unwrap().len(), 2);

    let first = scraper.export_as_json().unwrap();
    let second = scraper.export_as_json().unwrap();
    assert_eq!(first, second);
    assert_eq!(first, tmp.path().join("out").join("AMZN_historical_prices.json"));

    let payloads = export::read_payloads(&first).unwrap();
    assert_eq!(payloads.len(), 2);
    assert_eq!(payloads[0], payloads[1]);
    assert_eq!(payloads[0].history()[0].price_open(), 3230.0);
    assert_eq!(payloads[0].history()[1].volume(), 3_149_200.0);

    let text = std::fs::read_to_string(&first).unwrap();
    assert!(text.starts_with(r#"{"history":[{"symbol":"AMZN","date":"2021-01-29""#));
    assert!(text.contains(r#"]}{"history":"#));
}

#[test]
fn export_without_extraction_is_logged_not_raised() {
    let tmp = TempDir::new().unwrap();
    let cfg = config(tmp.path());
    std::fs::create_dir_all(&cfg.log_dir).unwrap();
    let log = FileErrorLog::new(&cfg.log_dir);
    let mut scraper = HistoryScraper::with_fetcher("AMZN", cfg, page_fetcher);

    assert!(scraper.guarded(&log).export_as_json().is_none());
    assert!(scraper.guarded(&log).export_as_json().is_none());

    let log_path = log.path_for("export_as_json", Local::now().date_naive());
    let content = std::fs::read_to_string(log_path).unwrap();
    assert_eq!(content.matches("export_as_json failed").count(), 2);
    assert!(content.contains("nothing extracted yet for AMZN"));
    assert!(!tmp.path().join("out").join("AMZN_historical_prices.json").exists());
}

#[test]
fn bad_period_date_is_logged_under_its_operation() {
    let tmp = TempDir::new().unwrap();
    let log = FileErrorLog::new(tmp.path());
    let mut scraper = HistoryScraper::with_fetcher("AMZN", config(tmp.path()), page_fetcher);

    assert_eq!(
        scraper.guarded(&log).convert_date_to_timestamp("01/01/2021").as_deref(),
        Some("1609459200")
    );
    assert!(scraper.guarded(&log).convert_date_to_timestamp("2021-01-01").is_none());

    let today = Local::now().date_naive();
    let content =
        std::fs::read_to_string(log.path_for("convert_date_to_timestamp", today)).unwrap();
    assert!(content.contains(r#"cannot parse date "2021-01-01""#));
    assert!(content.contains("Caused by:"));
    assert!(!log.path_for("extract_financial_data", today).exists());
}
