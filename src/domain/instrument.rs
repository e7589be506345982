//! Tradable instruments and their sparse price history.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceObservation {
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub price: f64,
}

/// Price observations for one instrument, ordered by timestamp.
///
/// Holds at most one observation per timestamp; recording a second price at
/// the same timestamp replaces the first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    points: BTreeMap<i64, f64>,
}

impl PriceSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the price previously stored at `timestamp`, if any.
    pub fn insert(&mut self, timestamp: i64, price: f64) -> Option<f64> {
        self.points.insert(timestamp, price)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<PriceObservation> {
        self.points
            .first_key_value()
            .map(|(&timestamp, &price)| PriceObservation { timestamp, price })
    }

    pub fn last(&self) -> Option<PriceObservation> {
        self.points
            .last_key_value()
            .map(|(&timestamp, &price)| PriceObservation { timestamp, price })
    }

    /// Latest observation with `timestamp <= t`.
    pub fn last_at_or_before(&self, t: i64) -> Option<PriceObservation> {
        self.points
            .range(..=t)
            .next_back()
            .map(|(&timestamp, &price)| PriceObservation { timestamp, price })
    }

    /// Observations in ascending timestamp order.
    pub fn iter(&self) -> impl Iterator<Item = PriceObservation> + '_ {
        self.points
            .iter()
            .map(|(&timestamp, &price)| PriceObservation { timestamp, price })
    }

    pub fn timestamps(&self) -> impl Iterator<Item = i64> + '_ {
        self.points.keys().copied()
    }
}

impl FromIterator<PriceObservation> for PriceSeries {
    fn from_iter<I: IntoIterator<Item = PriceObservation>>(iter: I) -> Self {
        let mut series = PriceSeries::new();
        for obs in iter {
            series.insert(obs.timestamp, obs.price);
        }
        series
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Instrument {
    /// Upper-cased identifier, unique within a snapshot.
    pub symbol: String,
    pub name: String,
    pub prices: PriceSeries,
}

impl Instrument {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Instrument {
            symbol: symbol.into(),
            name: name.into(),
            prices: PriceSeries::new(),
        }
    }

    pub fn with_price(mut self, timestamp: i64, price: f64) -> Self {
        self.prices.insert(timestamp, price);
        self
    }
}
