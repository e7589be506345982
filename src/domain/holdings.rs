//! Cumulative quantity held per instrument as of a point in time.

use std::collections::BTreeMap;

use super::purchase::Purchase;

/// Total purchased quantity per symbol over purchases with `timestamp <= as_of`.
///
/// Symbols without any purchase in range are absent rather than zero.
pub fn quantity_by_symbol(purchases: &[Purchase], as_of: i64) -> BTreeMap<String, f64> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for purchase in purchases.iter().filter(|p| p.is_effective_at(as_of)) {
        *totals.entry(purchase.symbol.clone()).or_insert(0.0) += purchase.quantity;
    }
    totals
}
