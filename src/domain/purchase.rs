//! Purchase events.

#[derive(Debug, Clone, PartialEq)]
pub struct Purchase {
    /// Symbol of the instrument bought. The instrument may no longer exist,
    /// in which case the purchase has no price and drops out of valuations.
    pub symbol: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub quantity: f64,
}

impl Purchase {
    pub fn new(symbol: impl Into<String>, timestamp: i64, quantity: f64) -> Self {
        Purchase {
            symbol: symbol.into(),
            timestamp,
            quantity,
        }
    }

    pub fn is_effective_at(&self, t: i64) -> bool {
        self.timestamp <= t
    }
}
