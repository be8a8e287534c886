//! PriceObservation — one day of prices for one ticker.

use crate::error::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily open/high/low/close/adj-close/volume for a single symbol.
///
/// Fields are private: construction through [`PriceObservation::new`] or
/// [`PriceObservation::from_fields`] is the only way to obtain one, so every
/// instance has passed validation and cannot change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ObservationRecord")]
pub struct PriceObservation {
    symbol: String,
    date: NaiveDate,
    price_open: f64,
    price_high: f64,
    price_low: f64,
    price_close: f64,
    price_adj_close: f64,
    volume: f64,
}

/// Unvalidated wire shape, used when reading exported files back.
#[derive(Debug, Deserialize)]
struct ObservationRecord {
    symbol: String,
    date: NaiveDate,
    price_open: f64,
    price_high: f64,
    price_low: f64,
    price_close: f64,
    price_adj_close: f64,
    volume: f64,
}

impl TryFrom<ObservationRecord> for PriceObservation {
    type Error = ValidationError;

    fn try_from(r: ObservationRecord) -> Result<Self, Self::Error> {
        PriceObservation::new(
            r.symbol,
            r.date,
            [
                r.price_open,
                r.price_high,
                r.price_low,
                r.price_close,
                r.price_adj_close,
                r.volume,
            ],
        )
    }
}

/// Names of the six numeric fields, in table column order.
pub const NUMERIC_FIELDS: [&str; 6] = [
    "price_open",
    "price_high",
    "price_low",
    "price_close",
    "price_adj_close",
    "volume",
];

impl PriceObservation {
    /// Build an observation from typed values.
    ///
    /// `values` holds open, high, low, close, adjusted close and volume in
    /// that order. Each must be finite and non-negative.
    pub fn new(
        symbol: impl Into<String>,
        date: NaiveDate,
        values: [f64; 6],
    ) -> Result<Self, ValidationError> {
        let symbol = symbol.into();
        if symbol.trim().is_empty() {
            return Err(ValidationError::EmptySymbol);
        }
        for (field, value) in NUMERIC_FIELDS.into_iter().zip(values) {
            check_decimal(field, value)?;
        }
        let [price_open, price_high, price_low, price_close, price_adj_close, volume] = values;
        Ok(Self {
            symbol,
            date,
            price_open,
            price_high,
            price_low,
            price_close,
            price_adj_close,
            volume,
        })
    }

    /// Build an observation from a mapping of named fields.
    ///
    /// Decimal fields accept either a [`FieldValue::Decimal`] or a
    /// [`FieldValue::Text`] holding a plain decimal literal. Fails on the
    /// first missing or ill-typed field; nothing is constructed in that case.
    pub fn from_fields(fields: &ObservationFields) -> Result<Self, ValidationError> {
        let symbol = match required("symbol", &fields.symbol)? {
            FieldValue::Text(s) => s.clone(),
            other => return Err(wrong_type("symbol", "text", other)),
        };
        let date = match required("date", &fields.date)? {
            FieldValue::Date(d) => *d,
            other => return Err(wrong_type("date", "date", other)),
        };

        let slots = [
            &fields.price_open,
            &fields.price_high,
            &fields.price_low,
            &fields.price_close,
            &fields.price_adj_close,
            &fields.volume,
        ];
        let mut values = [0.0; 6];
        for ((slot, field), out) in slots.iter().zip(NUMERIC_FIELDS).zip(values.iter_mut()) {
            *out = decimal(field, required(field, slot)?)?;
        }

        Self::new(symbol, date, values)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn price_open(&self) -> f64 {
        self.price_open
    }

    pub fn price_high(&self) -> f64 {
        self.price_high
    }

    pub fn price_low(&self) -> f64 {
        self.price_low
    }

    pub fn price_close(&self) -> f64 {
        self.price_close
    }

    pub fn price_adj_close(&self) -> f64 {
        self.price_adj_close
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }
}

/// A single named value handed to the record model.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Date(NaiveDate),
    Decimal(f64),
}

impl FieldValue {
    fn kind(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Date(_) => "date",
            FieldValue::Decimal(_) => "decimal",
        }
    }
}

/// Named fields for one observation; any of them may be absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationFields {
    pub symbol: Option<FieldValue>,
    pub date: Option<FieldValue>,
    pub price_open: Option<FieldValue>,
    pub price_high: Option<FieldValue>,
    pub price_low: Option<FieldValue>,
    pub price_close: Option<FieldValue>,
    pub price_adj_close: Option<FieldValue>,
    pub volume: Option<FieldValue>,
}

fn required<'a>(
    field: &'static str,
    slot: &'a Option<FieldValue>,
) -> Result<&'a FieldValue, ValidationError> {
    slot.as_ref().ok_or(ValidationError::Missing { field })
}

fn wrong_type(field: &'static str, expected: &'static str, found: &FieldValue) -> ValidationError {
    ValidationError::WrongType {
        field,
        expected,
        found: found.kind(),
    }
}

fn decimal(field: &'static str, value: &FieldValue) -> Result<f64, ValidationError> {
    match value {
        FieldValue::Decimal(v) => Ok(*v),
        FieldValue::Text(text) => {
            text.trim()
                .parse::<f64>()
                .map_err(|_| ValidationError::NotADecimal {
                    field,
                    text: text.clone(),
                })
        }
        other => Err(wrong_type(field, "decimal", other)),
    }
}

fn check_decimal(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 1, 29).unwrap()
    }

    fn full_fields() -> ObservationFields {
        ObservationFields {
            symbol: Some(FieldValue::Text("AMZN".into())),
            date: Some(FieldValue::Date(date())),
            price_open: Some(FieldValue::Text("3230.00".into())),
            price_high: Some(FieldValue::Decimal(3236.99)),
            price_low: Some(FieldValue::Text("3184.55".into())),
            price_close: Some(FieldValue::Text("3206.20".into())),
            price_adj_close: Some(FieldValue::Text("3206.20".into())),
            volume: Some(FieldValue::Text("4293600".into())),
        }
    }

    #[test]
    fn from_fields_builds_observation() {
        let obs = PriceObservation::from_fields(&full_fields()).unwrap();
        assert_eq!(obs.symbol(), "AMZN");
        assert_eq!(obs.date(), date());
        assert_eq!(obs.price_open(), 3230.0);
        assert_eq!(obs.price_high(), 3236.99);
        assert_eq!(obs.volume(), 4_293_600.0);
    }

    #[test]
    fn missing_field_is_rejected() {
        let mut fields = full_fields();
        fields.price_low = None;
        assert_eq!(
            PriceObservation::from_fields(&fields).unwrap_err(),
            ValidationError::Missing { field: "price_low" }
        );
    }

    #[test]
    fn unparseable_decimal_is_rejected() {
        let mut fields = full_fields();
        fields.volume = Some(FieldValue::Text("-".into()));
        assert!(matches!(
            PriceObservation::from_fields(&fields),
            Err(ValidationError::NotADecimal { field: "volume", .. })
        ));
    }

    #[test]
    fn wrong_shape_is_rejected() {
        let mut fields = full_fields();
        fields.date = Some(FieldValue::Text("Jan 29 2021".into()));
        assert_eq!(
            PriceObservation::from_fields(&fields).unwrap_err(),
            ValidationError::WrongType {
                field: "date",
                expected: "date",
                found: "text"
            }
        );
    }

    #[test]
    fn negative_and_nan_values_are_rejected() {
        let err = PriceObservation::new("AMZN", date(), [1.0, 1.0, -1.0, 1.0, 1.0, 1.0]);
        assert!(matches!(
            err,
            Err(ValidationError::OutOfRange { field: "price_low", .. })
        ));
        let err = PriceObservation::new("AMZN", date(), [1.0, 1.0, 1.0, 1.0, 1.0, f64::NAN]);
        assert!(matches!(
            err,
            Err(ValidationError::OutOfRange { field: "volume", .. })
        ));
    }

    #[test]
    fn empty_symbol_is_rejected() {
        let err = PriceObservation::new("  ", date(), [1.0; 6]).unwrap_err();
        assert_eq!(err, ValidationError::EmptySymbol);
    }

    #[test]
    fn serializes_with_source_field_names() {
        let obs = PriceObservation::from_fields(&full_fields()).unwrap();
        let json = serde_json::to_value(&obs).unwrap();
        assert_eq!(json["symbol"], "AMZN");
        assert_eq!(json["date"], "2021-01-29");
        assert_eq!(json["price_adj_close"], 3206.2);
        assert_eq!(json["volume"], 4293600.0);
    }

    #[test]
    fn deserialization_revalidates() {
        let bad = r#"{"symbol":"AMZN","date":"2021-01-29","price_open":1.0,"price_high":1.0,
            "price_low":1.0,"price_close":-5.0,"price_adj_close":1.0,"volume":1.0}"#;
        assert!(serde_json::from_str::<PriceObservation>(bad).is_err());
    }
}
