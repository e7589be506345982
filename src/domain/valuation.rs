//! Portfolio valuation: cost basis, current value, and historical series.
//!
//! A purchase whose instrument has no price at all (never priced, or the
//! instrument was removed) contributes nothing to any sum. [`Totals`] reports
//! how many purchases were dropped this way.

use std::collections::{BTreeSet, HashMap};

use super::holdings::quantity_by_symbol;
use super::instrument::Instrument;
use super::price_resolver::{latest_price, price_at};
use super::purchase::Purchase;
use super::snapshot::index_instruments;

#[derive(Debug, Clone, PartialEq)]
pub struct Totals {
    pub invested: f64,
    pub current: f64,
    pub profit_loss: f64,
    /// Percent of `invested`; 0 when nothing was invested.
    pub profit_loss_pct: f64,
    pub skipped_purchases: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub timestamp: i64,
    pub value: f64,
}

/// Market value and cumulative contributions sampled at the same timestamps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueHistory {
    pub value: Vec<SeriesPoint>,
    pub invested: Vec<SeriesPoint>,
}

impl ValueHistory {
    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// Per-instrument position, for every symbol that has purchases.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldingRow {
    pub symbol: String,
    /// `None` when the instrument no longer exists.
    pub name: Option<String>,
    pub quantity: f64,
    pub latest_price: Option<f64>,
    pub invested: f64,
    pub value: f64,
}

type Index<'a> = HashMap<&'a str, &'a Instrument>;

fn purchase_cost(index: &Index<'_>, purchase: &Purchase) -> Option<f64> {
    index
        .get(purchase.symbol.as_str())
        .and_then(|inst| price_at(inst, purchase.timestamp))
        .map(|price| purchase.quantity * price)
}

fn invested_with(index: &Index<'_>, purchases: &[Purchase], t: i64) -> f64 {
    purchases
        .iter()
        .filter(|p| p.is_effective_at(t))
        .filter_map(|p| purchase_cost(index, p))
        .sum()
}

fn value_with(index: &Index<'_>, purchases: &[Purchase], t: i64) -> f64 {
    quantity_by_symbol(purchases, t)
        .iter()
        .filter_map(|(symbol, qty)| {
            index
                .get(symbol.as_str())
                .and_then(|inst| price_at(inst, t))
                .map(|price| qty * price)
        })
        .sum()
}

fn current_with(index: &Index<'_>, purchases: &[Purchase]) -> f64 {
    quantity_by_symbol(purchases, i64::MAX)
        .iter()
        .filter_map(|(symbol, qty)| {
            index
                .get(symbol.as_str())
                .and_then(|inst| latest_price(inst))
                .map(|price| qty * price)
        })
        .sum()
}

/// Sum of `quantity * price_at(purchase time)` over all purchases.
pub fn cost_basis(purchases: &[Purchase], instruments: &[Instrument]) -> f64 {
    invested_with(&index_instruments(instruments), purchases, i64::MAX)
}

/// Sum of `quantity * latest_price` over all purchases, grouped per symbol.
pub fn current_value(purchases: &[Purchase], instruments: &[Instrument]) -> f64 {
    current_with(&index_instruments(instruments), purchases)
}

pub fn totals(purchases: &[Purchase], instruments: &[Instrument]) -> Totals {
    let index = index_instruments(instruments);
    let invested = invested_with(&index, purchases, i64::MAX);
    let current = current_with(&index, purchases);
    let profit_loss = current - invested;
    let profit_loss_pct = if invested > 0.0 {
        profit_loss / invested * 100.0
    } else {
        0.0
    };

    let unpriced: Vec<&Purchase> = purchases
        .iter()
        .filter(|p| purchase_cost(&index, p).is_none())
        .collect();
    if !unpriced.is_empty() {
        let symbols: BTreeSet<&str> = unpriced.iter().map(|p| p.symbol.as_str()).collect();
        tracing::warn!(
            skipped = unpriced.len(),
            symbols = ?symbols,
            "purchases without any price history excluded from totals"
        );
    }

    Totals {
        invested,
        current,
        profit_loss,
        profit_loss_pct,
        skipped_purchases: unpriced.len(),
    }
}

/// Market value at `t` of everything bought at or before `t`, priced as of `t`.
pub fn value_at(purchases: &[Purchase], instruments: &[Instrument], t: i64) -> f64 {
    value_with(&index_instruments(instruments), purchases, t)
}

/// Cost basis of purchases made at or before `t`, each at its own purchase price.
pub fn invested_at(purchases: &[Purchase], instruments: &[Instrument], t: i64) -> f64 {
    invested_with(&index_instruments(instruments), purchases, t)
}

/// Evaluates [`value_at`] and [`invested_at`] at each of `timestamps`.
pub fn history(
    purchases: &[Purchase],
    instruments: &[Instrument],
    timestamps: &[i64],
) -> ValueHistory {
    let index = index_instruments(instruments);
    let mut history = ValueHistory {
        value: Vec::with_capacity(timestamps.len()),
        invested: Vec::with_capacity(timestamps.len()),
    };
    for &timestamp in timestamps {
        history.value.push(SeriesPoint {
            timestamp,
            value: value_with(&index, purchases, timestamp),
        });
        history.invested.push(SeriesPoint {
            timestamp,
            value: invested_with(&index, purchases, timestamp),
        });
    }
    history
}

pub fn holdings(purchases: &[Purchase], instruments: &[Instrument]) -> Vec<HoldingRow> {
    let index = index_instruments(instruments);
    quantity_by_symbol(purchases, i64::MAX)
        .into_iter()
        .map(|(symbol, quantity)| {
            let instrument = index.get(symbol.as_str());
            let latest = instrument.and_then(|inst| latest_price(inst));
            let invested = purchases
                .iter()
                .filter(|p| p.symbol == symbol)
                .filter_map(|p| purchase_cost(&index, p))
                .sum();
            HoldingRow {
                name: instrument.map(|inst| inst.name.clone()),
                quantity,
                latest_price: latest,
                invested,
                value: latest.map(|price| quantity * price).unwrap_or(0.0),
                symbol,
            }
        })
        .collect()
}
