#![allow(dead_code)]

use chrono::NaiveDate;
use simfolio::domain::error::FolioError;
use simfolio::domain::instrument::Instrument;
use simfolio::domain::purchase::Purchase;
use simfolio::domain::snapshot::PortfolioSnapshot;
use simfolio::domain::timeline::start_of_day_millis;
use simfolio::ports::state_port::StatePort;
use std::cell::{Cell, RefCell};
use std::io::Write;

/// In-memory [`StatePort`] that counts saves and can be told to fail.
pub struct MockStatePort {
    pub stored: RefCell<Option<PortfolioSnapshot>>,
    pub saves: Cell<usize>,
    pub fail_save: Option<String>,
}

impl MockStatePort {
    pub fn new() -> Self {
        Self {
            stored: RefCell::new(None),
            saves: Cell::new(0),
            fail_save: None,
        }
    }

    pub fn with_snapshot(snapshot: PortfolioSnapshot) -> Self {
        let port = Self::new();
        *port.stored.borrow_mut() = Some(snapshot);
        port
    }

    pub fn failing(mut self, reason: &str) -> Self {
        self.fail_save = Some(reason.to_string());
        self
    }

    pub fn current(&self) -> Option<PortfolioSnapshot> {
        self.stored.borrow().clone()
    }
}

impl StatePort for MockStatePort {
    fn load(&self) -> Result<Option<PortfolioSnapshot>, FolioError> {
        Ok(self.stored.borrow().clone())
    }

    fn save(&self, snapshot: &PortfolioSnapshot) -> Result<(), FolioError> {
        if let Some(reason) = &self.fail_save {
            return Err(FolioError::Storage {
                reason: reason.clone(),
            });
        }
        self.saves.set(self.saves.get() + 1);
        *self.stored.borrow_mut() = Some(snapshot.clone());
        Ok(())
    }
}

pub fn day(y: i32, m: u32, d: u32) -> i64 {
    start_of_day_millis(NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

pub fn make_instrument(symbol: &str, prices: &[(i64, f64)]) -> Instrument {
    prices
        .iter()
        .fold(Instrument::new(symbol, format!("{symbol} ETF")), |inst, &(t, p)| {
            inst.with_price(t, p)
        })
}

pub fn make_purchase(symbol: &str, timestamp: i64, quantity: f64) -> Purchase {
    Purchase::new(symbol, timestamp, quantity)
}

/// Two instruments with monthly prices through the first quarter of 2024 and
/// three purchases.
pub fn sample_snapshot() -> PortfolioSnapshot {
    let mut snapshot = PortfolioSnapshot::new();
    snapshot.instruments.push(make_instrument(
        "VWCE",
        &[
            (day(2024, 1, 1), 100.0),
            (day(2024, 2, 1), 105.0),
            (day(2024, 3, 1), 110.0),
        ],
    ));
    snapshot.instruments.push(make_instrument(
        "EMIM",
        &[(day(2024, 1, 15), 30.0), (day(2024, 3, 15), 27.0)],
    ));
    snapshot.purchases.push(make_purchase("VWCE", day(2024, 1, 1), 2.0));
    snapshot.purchases.push(make_purchase("EMIM", day(2024, 2, 1), 10.0));
    snapshot.purchases.push(make_purchase("VWCE", day(2024, 3, 1), 1.0));
    snapshot
}

pub fn write_temp_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
