//! JSON portfolio document: the persisted and exported shape of the state.
//!
//! ```json
//! { "$schema": "simple-investor-portfolio.v1",
//!   "etfs": [ { "symbol": "VWCE", "name": "...", "prices": [ { "ts": 0, "price": 1.0 } ] } ],
//!   "purchases": [ { "ts": 0, "symbol": "VWCE", "qty": 1.0 } ],
//!   "goals": [ { "id": "...", "name": "...", "target": 1.0, "monthly": 1.0 } ] }
//! ```
//!
//! Parsing converts the document into a validated [`PortfolioSnapshot`] in
//! one pass, so a document is either accepted whole or rejected whole.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::FolioError;
use crate::domain::snapshot::PortfolioSnapshot;

pub const SCHEMA: &str = "simple-investor-portfolio.v1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateDocument {
    #[serde(rename = "$schema", default = "default_schema")]
    pub schema: String,
    pub etfs: Vec<EtfRecord>,
    pub purchases: Vec<PurchaseRecord>,
    #[serde(default)]
    pub goals: Vec<GoalRecord>,
    #[serde(
        rename = "generatedAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub generated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EtfRecord {
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub prices: Vec<PriceRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub ts: i64,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub ts: i64,
    pub symbol: String,
    pub qty: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalRecord {
    pub id: String,
    pub name: String,
    pub target: f64,
    pub monthly: f64,
}

fn default_schema() -> String {
    SCHEMA.to_string()
}

fn invalid(reason: impl Into<String>) -> FolioError {
    FolioError::InvalidDocument {
        reason: reason.into(),
    }
}

fn at(location: String) -> impl FnOnce(FolioError) -> FolioError {
    move |err| invalid(format!("{location}: {err}"))
}

/// Parses and validates a document.
///
/// `etfs` and `purchases` must be present as arrays; `goals` may be omitted.
pub fn parse_document(text: &str) -> Result<PortfolioSnapshot, FolioError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| invalid(format!("not valid JSON: {e}")))?;

    let object = value
        .as_object()
        .ok_or_else(|| invalid("top level must be an object"))?;
    for key in ["etfs", "purchases"] {
        if !object.get(key).is_some_and(serde_json::Value::is_array) {
            return Err(invalid(format!("\"{key}\" must be an array")));
        }
    }

    let document: StateDocument =
        serde_json::from_value(value).map_err(|e| invalid(e.to_string()))?;
    if document.schema != SCHEMA {
        tracing::warn!(
            schema = %document.schema,
            expected = SCHEMA,
            "document schema differs, reading it anyway"
        );
    }
    into_snapshot(document)
}

pub fn into_snapshot(document: StateDocument) -> Result<PortfolioSnapshot, FolioError> {
    let mut snapshot = PortfolioSnapshot::new();

    for (i, etf) in document.etfs.iter().enumerate() {
        if snapshot.instrument(etf.symbol.trim().to_uppercase().as_str()).is_some() {
            tracing::warn!(symbol = %etf.symbol, "duplicate instrument in document, merging prices");
        }
        let symbol = snapshot
            .upsert_instrument(&etf.symbol, &etf.name)
            .map_err(at(format!("etfs[{i}]")))?;
        for (j, price) in etf.prices.iter().enumerate() {
            snapshot
                .record_price(&symbol, price.ts, price.price)
                .map_err(at(format!("etfs[{i}].prices[{j}]")))?;
        }
    }

    for (i, purchase) in document.purchases.iter().enumerate() {
        snapshot
            .record_purchase(&purchase.symbol, purchase.ts, purchase.qty)
            .map_err(at(format!("purchases[{i}]")))?;
    }

    for (i, goal) in document.goals.iter().enumerate() {
        snapshot
            .add_goal(goal.id.clone(), &goal.name, goal.target, goal.monthly)
            .map_err(at(format!("goals[{i}]")))?;
    }

    Ok(snapshot)
}

pub fn to_document(snapshot: &PortfolioSnapshot) -> StateDocument {
    StateDocument {
        schema: SCHEMA.to_string(),
        etfs: snapshot
            .instruments
            .iter()
            .map(|inst| EtfRecord {
                symbol: inst.symbol.clone(),
                name: inst.name.clone(),
                prices: inst
                    .prices
                    .iter()
                    .map(|obs| PriceRecord {
                        ts: obs.timestamp,
                        price: obs.price,
                    })
                    .collect(),
            })
            .collect(),
        purchases: snapshot
            .purchases
            .iter()
            .map(|p| PurchaseRecord {
                ts: p.timestamp,
                symbol: p.symbol.clone(),
                qty: p.quantity,
            })
            .collect(),
        goals: snapshot
            .goals
            .iter()
            .map(|g| GoalRecord {
                id: g.id.clone(),
                name: g.name.clone(),
                target: g.target,
                monthly: g.monthly,
            })
            .collect(),
        generated_at: None,
    }
}

pub fn render_document(snapshot: &PortfolioSnapshot) -> Result<String, FolioError> {
    Ok(serde_json::to_string_pretty(&to_document(snapshot))?)
}

/// Export form of the document, stamped with when it was generated.
pub fn export_document(
    snapshot: &PortfolioSnapshot,
    generated_at: DateTime<Utc>,
) -> Result<String, FolioError> {
    let mut document = to_document(snapshot);
    document.generated_at = Some(generated_at.to_rfc3339_opts(SecondsFormat::Millis, true));
    Ok(serde_json::to_string_pretty(&document)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::instrument::Instrument;
    use crate::domain::goal::{project_goals, Projection};
    use crate::domain::purchase::Purchase;

    const SAMPLE: &str = r#"{
        "$schema": "simple-investor-portfolio.v1",
        "etfs": [
            { "symbol": "aaa", "name": "Alpha", "prices": [
                { "ts": 200, "price": 20 },
                { "ts": 100, "price": 10.5 }
            ] },
            { "symbol": "BBB", "name": "Beta", "prices": [] }
        ],
        "purchases": [ { "ts": 150, "symbol": "aaa", "qty": 5 } ],
        "goals": [ { "id": "g1", "name": "House", "target": 1200, "monthly": 100 } ]
    }"#;

    #[test]
    fn parses_sample_document() {
        let snap = parse_document(SAMPLE).unwrap();

        assert_eq!(snap.instruments.len(), 2);
        let aaa = snap.instrument("AAA").unwrap();
        assert_eq!(aaa.name, "Alpha");
        assert_eq!(aaa.prices.first().unwrap().price, 10.5);
        assert_eq!(aaa.prices.last().unwrap().price, 20.0);

        assert_eq!(snap.purchases, vec![Purchase::new("AAA", 150, 5.0)]);
        assert_eq!(snap.goals.len(), 1);
        assert_eq!(snap.goals[0].id, "g1");
    }

    #[test]
    fn goals_are_optional() {
        let snap = parse_document(r#"{ "etfs": [], "purchases": [] }"#).unwrap();
        assert!(snap.goals.is_empty());
    }

    #[test]
    fn rejects_missing_etfs() {
        let err = parse_document(r#"{ "purchases": [] }"#).unwrap_err();
        assert!(matches!(err, FolioError::InvalidDocument { ref reason } if reason.contains("etfs")));
    }

    #[test]
    fn rejects_non_array_purchases() {
        let err = parse_document(r#"{ "etfs": [], "purchases": {} }"#).unwrap_err();
        assert!(
            matches!(err, FolioError::InvalidDocument { ref reason } if reason.contains("purchases"))
        );
    }

    #[test]
    fn rejects_non_object_and_garbage() {
        assert!(matches!(
            parse_document("[1, 2]"),
            Err(FolioError::InvalidDocument { .. })
        ));
        assert!(matches!(
            parse_document("not json"),
            Err(FolioError::InvalidDocument { .. })
        ));
    }

    #[test]
    fn rejects_invalid_record_with_location() {
        let text = r#"{ "etfs": [ { "symbol": "A", "prices": [ { "ts": 1, "price": -3 } ] } ],
                        "purchases": [] }"#;
        let err = parse_document(text).unwrap_err();
        let FolioError::InvalidDocument { reason } = err else {
            panic!("expected InvalidDocument");
        };
        assert!(reason.starts_with("etfs[0].prices[0]"), "{reason}");
    }

    #[test]
    fn rejects_non_positive_quantity() {
        let text = r#"{ "etfs": [], "purchases": [ { "ts": 1, "symbol": "A", "qty": 0 } ] }"#;
        assert!(parse_document(text).is_err());
    }

    #[test]
    fn accepts_other_schema_tag() {
        let text = r#"{ "$schema": "something-else", "etfs": [], "purchases": [] }"#;
        assert!(parse_document(text).is_ok());
    }

    #[test]
    fn purchases_for_unknown_instruments_are_kept() {
        let text = r#"{ "etfs": [], "purchases": [ { "ts": 1, "symbol": "gone", "qty": 2 } ] }"#;
        let snap = parse_document(text).unwrap();
        assert_eq!(snap.purchases[0].symbol, "GONE");
    }

    #[test]
    fn negative_goal_target_projects_to_zero_months() {
        let text = r#"{ "etfs": [], "purchases": [],
            "goals": [ { "id": "g", "name": "n", "target": -5, "monthly": 10 } ] }"#;
        let snap = parse_document(text).unwrap();
        let rows = project_goals(&snap.goals);
        assert_eq!(rows[0].months, Projection::Months(0));
    }

    #[test]
    fn duplicate_etfs_are_merged() {
        let text = r#"{ "etfs": [
                { "symbol": "A", "name": "First", "prices": [ { "ts": 1, "price": 1 } ] },
                { "symbol": "a", "name": "Second", "prices": [ { "ts": 2, "price": 2 } ] }
            ], "purchases": [] }"#;
        let snap = parse_document(text).unwrap();
        assert_eq!(snap.instruments.len(), 1);
        assert_eq!(snap.instruments[0].name, "Second");
        assert_eq!(snap.instruments[0].prices.len(), 2);
    }

    #[test]
    fn rendered_document_reads_back() {
        let mut snap = PortfolioSnapshot::new();
        snap.instruments.push(Instrument::new("AAA", "Alpha").with_price(100, 10.0));
        snap.purchases.push(Purchase::new("AAA", 150, 5.0));
        snap.add_goal("g1".into(), "House", 1200.0, 100.0).unwrap();

        let text = render_document(&snap).unwrap();
        assert!(text.contains("\"$schema\": \"simple-investor-portfolio.v1\""));
        assert!(!text.contains("generatedAt"));
        assert_eq!(parse_document(&text).unwrap(), snap);
    }

    #[test]
    fn export_stamps_generation_time() {
        let when = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let text = export_document(&PortfolioSnapshot::new(), when).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["generatedAt"], "2024-05-01T12:00:00.000Z");
        assert_eq!(value["etfs"], serde_json::json!([]));
    }
}
