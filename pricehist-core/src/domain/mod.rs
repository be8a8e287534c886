//! Domain types: the record model for scraped prices.

pub mod observation;
pub mod series;

pub use observation::{FieldValue, ObservationFields, PriceObservation};
pub use series::ObservationSeries;

/// Symbol type alias
pub type Symbol = String;
