//! Built-in starting document, used when no state has been stored yet.

const DEFAULT_STATE: &str = r#"{
  "$schema": "simple-investor-portfolio.v1",
  "etfs": [
    { "symbol": "VWCE", "name": "Vanguard FTSE All-World UCITS ETF (Acc)", "prices": [] },
    { "symbol": "IWDA", "name": "iShares Core MSCI World UCITS ETF (Acc)", "prices": [] },
    { "symbol": "EMIM", "name": "iShares Core MSCI EM IMI UCITS ETF (Acc)", "prices": [] }
  ],
  "purchases": [],
  "goals": []
}
"#;

pub fn document() -> &'static str {
    DEFAULT_STATE
}
