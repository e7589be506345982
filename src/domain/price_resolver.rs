//! Point-in-time and latest price lookups over an instrument's history.

use super::instrument::Instrument;

/// Price of the most recent observation, or `None` when there are none.
pub fn latest_price(instrument: &Instrument) -> Option<f64> {
    instrument.prices.last().map(|obs| obs.price)
}

/// As-of price: the latest observation at or before `t`.
///
/// When `t` precedes every observation, falls back to the observation
/// closest to `t` in absolute distance. Equal distances resolve to the
/// earlier timestamp. `None` only when the instrument has no prices.
pub fn price_at(instrument: &Instrument, t: i64) -> Option<f64> {
    if let Some(obs) = instrument.prices.last_at_or_before(t) {
        return Some(obs.price);
    }
    nearest_price(instrument, t)
}

fn nearest_price(instrument: &Instrument, t: i64) -> Option<f64> {
    let mut best: Option<(u64, f64)> = None;
    for obs in instrument.prices.iter() {
        let distance = obs.timestamp.abs_diff(t);
        // strict `<` keeps the earlier of two equidistant observations
        if best.is_none_or(|(d, _)| distance < d) {
            best = Some((distance, obs.price));
        }
    }
    best.map(|(_, price)| price)
}
