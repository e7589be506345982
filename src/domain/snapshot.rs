//! In-memory portfolio state handed to every engine call.

use std::collections::HashMap;

use super::error::FolioError;
use super::goal::Goal;
use super::instrument::Instrument;
use super::purchase::Purchase;
use super::validation::{
    normalize_symbol, validate_amount, validate_price, validate_quantity, validate_target,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortfolioSnapshot {
    pub instruments: Vec<Instrument>,
    pub purchases: Vec<Purchase>,
    pub goals: Vec<Goal>,
}

impl PortfolioSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last instrument with `symbol`, the same one [`index_instruments`] keeps.
    pub fn instrument(&self, symbol: &str) -> Option<&Instrument> {
        self.instruments.iter().rev().find(|i| i.symbol == symbol)
    }

    fn instrument_mut(&mut self, symbol: &str) -> Option<&mut Instrument> {
        self.instruments.iter_mut().rev().find(|i| i.symbol == symbol)
    }

    /// Adds an instrument, or renames it when the symbol is already known.
    /// Returns the normalized symbol.
    pub fn upsert_instrument(&mut self, symbol: &str, name: &str) -> Result<String, FolioError> {
        let symbol = normalize_symbol(symbol)?;
        let name = name.trim();
        match self.instrument_mut(&symbol) {
            Some(existing) => {
                if !name.is_empty() {
                    existing.name = name.to_string();
                }
            }
            None => self.instruments.push(Instrument::new(symbol.clone(), name)),
        }
        Ok(symbol)
    }

    /// Records a price observation, replacing any price at the same timestamp.
    pub fn record_price(
        &mut self,
        symbol: &str,
        timestamp: i64,
        price: f64,
    ) -> Result<Option<f64>, FolioError> {
        let symbol = normalize_symbol(symbol)?;
        let price = validate_price(price)?;
        let instrument = self
            .instrument_mut(&symbol)
            .ok_or(FolioError::UnknownInstrument { symbol })?;
        Ok(instrument.prices.insert(timestamp, price))
    }

    /// Purchases may reference symbols that have no instrument yet.
    pub fn record_purchase(
        &mut self,
        symbol: &str,
        timestamp: i64,
        quantity: f64,
    ) -> Result<(), FolioError> {
        let symbol = normalize_symbol(symbol)?;
        let quantity = validate_quantity(quantity)?;
        self.purchases.push(Purchase::new(symbol, timestamp, quantity));
        Ok(())
    }

    /// Removes an instrument. Its purchases stay and drop out of valuations.
    pub fn remove_instrument(&mut self, symbol: &str) -> Result<Instrument, FolioError> {
        let symbol = normalize_symbol(symbol)?;
        let pos = self
            .instruments
            .iter()
            .position(|i| i.symbol == symbol)
            .ok_or(FolioError::UnknownInstrument { symbol })?;
        Ok(self.instruments.remove(pos))
    }

    pub fn add_goal(
        &mut self,
        id: String,
        name: &str,
        target: f64,
        monthly: f64,
    ) -> Result<(), FolioError> {
        let goal = Goal {
            id,
            name: name.trim().to_string(),
            target: validate_target(target)?,
            monthly: validate_amount("monthly", monthly)?,
        };
        self.goals.push(goal);
        Ok(())
    }

    pub fn remove_goal(&mut self, id: &str) -> Result<Goal, FolioError> {
        let pos = self
            .goals
            .iter()
            .position(|g| g.id == id)
            .ok_or_else(|| FolioError::UnknownGoal { id: id.to_string() })?;
        Ok(self.goals.remove(pos))
    }
}

/// Later duplicates win, matching a last-write-wins store.
pub fn index_instruments(instruments: &[Instrument]) -> HashMap<&str, &Instrument> {
    instruments
        .iter()
        .map(|inst| (inst.symbol.as_str(), inst))
        .collect()
}
