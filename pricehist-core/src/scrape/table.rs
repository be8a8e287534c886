//! Historical-prices table parsing.
//!
//! The page lists one row per trading day, most recent first, between a
//! header row and a trailing summary row ("*Close price adjusted for
//! splits..."). Dividend and stock-split announcements are interleaved as
//! short rows with a single wide cell; they are classified separately
//! instead of being forced through the price mapping.

use crate::domain::{FieldValue, ObservationFields, ObservationSeries, PriceObservation};
use crate::error::ScrapeError;
use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// The one table on the page that carries daily prices.
pub const TABLE_SELECTOR: &str = r#"table[data-test="historical-prices"]"#;

/// Row date format once thousands/day commas are stripped ("Jan 29 2021").
pub const ROW_DATE_FORMAT: &str = "%b %d %Y";

/// Cells in a price row: date, open, high, low, close, adj close, volume.
pub const PRICE_ROW_CELLS: usize = 7;

/// What to do with a data row that cannot become an observation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowPolicy {
    /// First bad row fails the whole extraction.
    Strict,
    /// Bad rows are reported and skipped.
    #[default]
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Dividend,
    StockSplit,
}

/// A dividend or split announcement row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorporateAction {
    pub date: Option<NaiveDate>,
    pub kind: ActionKind,
    /// Row text after the date, e.g. "0.205 Dividend" or "4:1 Stock Split".
    pub detail: String,
}

/// Classification of one data row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowKind {
    Price(Vec<String>),
    Event(CorporateAction),
    Unknown(Vec<String>),
}

/// A data row left out of the series.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// Row position in the table, header row being 0.
    pub index: usize,
    pub reason: String,
    pub cells: Vec<String>,
}

/// Everything one pass over the table produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub series: ObservationSeries,
    pub skipped: Vec<SkippedRow>,
    pub actions: Vec<CorporateAction>,
}

/// Strip thousands separators: "1,234.56" -> "1234.56".
pub fn strip_separators(text: &str) -> String {
    text.replace(',', "")
}

fn selector(css: &'static str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::Selector {
        css,
        reason: e.to_string(),
    })
}

fn element_text(el: ElementRef<'_>) -> String {
    let joined: String = el.text().collect();
    let cleaned = strip_separators(&joined);
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Classify a row from its cell texts and whole-row text.
pub fn classify_row(cells: Vec<String>, row_text: &str) -> RowKind {
    let kind = if row_text.contains("Dividend") {
        Some(ActionKind::Dividend)
    } else if row_text.contains("Stock Split") {
        Some(ActionKind::StockSplit)
    } else {
        None
    };

    if let Some(kind) = kind {
        let date_text = cells.first().map(String::as_str).unwrap_or("");
        let date = NaiveDate::parse_from_str(date_text, ROW_DATE_FORMAT).ok();
        let detail = match date {
            Some(_) => row_text.strip_prefix(date_text).unwrap_or(row_text),
            None => row_text,
        };
        return RowKind::Event(CorporateAction {
            date,
            kind,
            detail: detail.trim().to_string(),
        });
    }

    if cells.len() == PRICE_ROW_CELLS {
        RowKind::Price(cells)
    } else {
        RowKind::Unknown(cells)
    }
}

/// Map seven price cells onto an observation for `symbol`.
pub fn price_observation(
    index: usize,
    symbol: &str,
    cells: &[String],
) -> Result<PriceObservation, ScrapeError> {
    if cells.len() != PRICE_ROW_CELLS {
        return Err(ScrapeError::MalformedRow {
            index,
            reason: format!("expected {PRICE_ROW_CELLS} cells, found {}", cells.len()),
        });
    }

    let date = NaiveDate::parse_from_str(&cells[0], ROW_DATE_FORMAT).map_err(|e| {
        ScrapeError::MalformedRow {
            index,
            reason: format!("unparseable date {:?}: {e}", cells[0]),
        }
    })?;

    let text = |i: usize| Some(FieldValue::Text(cells[i].clone()));
    let fields = ObservationFields {
        symbol: Some(FieldValue::Text(symbol.to_string())),
        date: Some(FieldValue::Date(date)),
        price_open: text(1),
        price_high: text(2),
        price_low: text(3),
        price_close: text(4),
        price_adj_close: text(5),
        volume: text(6),
    };

    PriceObservation::from_fields(&fields)
        .map_err(|source| ScrapeError::RowValidation { index, source })
}

/// Parse a history page into observations for `symbol`.
///
/// The header (first) and summary (last) rows are never data. Rows that
/// are not well-formed price rows are handled per `policy`.
pub fn parse_history_table(
    html: &str,
    symbol: &str,
    policy: RowPolicy,
) -> Result<Extraction, ScrapeError> {
    let document = Html::parse_document(html);
    let table_sel = selector(TABLE_SELECTOR)?;
    let row_sel = selector("tr")?;
    let span_sel = selector("span")?;
    let cell_sel = selector("td")?;

    let table = document
        .select(&table_sel)
        .next()
        .ok_or_else(|| ScrapeError::TableNotFound {
            symbol: symbol.to_string(),
        })?;

    let rows: Vec<ElementRef<'_>> = table.select(&row_sel).collect();
    let data_rows = rows.len().saturating_sub(2);

    let mut out = Extraction::default();
    for (index, row) in rows.iter().enumerate().skip(1).take(data_rows) {
        let mut cells: Vec<String> = row.select(&span_sel).map(element_text).collect();
        if cells.is_empty() {
            cells = row.select(&cell_sel).map(element_text).collect();
        }
        let row_text = element_text(*row);

        let failure = match classify_row(cells, &row_text) {
            RowKind::Price(cells) => match price_observation(index, symbol, &cells) {
                Ok(obs) => {
                    out.series.push(obs);
                    continue;
                }
                Err(e) => (e, cells),
            },
            RowKind::Event(action) => {
                if policy == RowPolicy::Strict {
                    return Err(ScrapeError::MalformedRow {
                        index,
                        reason: format!("{:?} row: {}", action.kind, action.detail),
                    });
                }
                out.actions.push(action);
                continue;
            }
            RowKind::Unknown(cells) => (
                ScrapeError::MalformedRow {
                    index,
                    reason: format!(
                        "expected {PRICE_ROW_CELLS} cells, found {}",
                        cells.len()
                    ),
                },
                cells,
            ),
        };

        let (err, cells) = failure;
        if policy == RowPolicy::Strict {
            return Err(err);
        }
        let reason = describe(&err);
        warn!("{symbol}: skipping row {index}: {reason}");
        out.skipped.push(SkippedRow {
            index,
            reason,
            cells,
        });
    }

    Ok(out)
}

/// Error plus its causes on one line.
fn describe(err: &ScrapeError) -> String {
    let mut text = err.to_string();
    let mut cause = std::error::Error::source(err);
    while let Some(e) = cause {
        text.push_str(": ");
        text.push_str(&e.to_string());
        cause = e.source();
    }
    text
}
