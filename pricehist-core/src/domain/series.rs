//! ObservationSeries — the ordered output of one extraction run.

use super::observation::PriceObservation;
use serde::{Deserialize, Serialize};

/// Observations in source-table order (most recent first).
///
/// Serializes as `{"history": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservationSeries {
    history: Vec<PriceObservation>,
}

impl ObservationSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one observation; order of calls is the series order.
    pub fn push(&mut self, observation: PriceObservation) {
        self.history.push(observation);
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn history(&self) -> &[PriceObservation] {
        &self.history
    }

    pub fn into_history(self) -> Vec<PriceObservation> {
        self.history
    }

    /// Symbol of the first observation, if any.
    pub fn symbol(&self) -> Option<&str> {
        self.history.first().map(|o| o.symbol())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PriceObservation> {
        self.history.iter()
    }
}

impl From<Vec<PriceObservation>> for ObservationSeries {
    fn from(history: Vec<PriceObservation>) -> Self {
        Self { history }
    }
}

impl<'a> IntoIterator for &'a ObservationSeries {
    type Item = &'a PriceObservation;
    type IntoIter = std::slice::Iter<'a, PriceObservation>;

    fn into_iter(self) -> Self::IntoIter {
        self.history.iter()
    }
}
