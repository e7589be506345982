//! Loading, seeding and importing state through a [`StatePort`].

use crate::adapters::default_state;
use crate::adapters::state_document::parse_document;
use crate::domain::error::FolioError;
use crate::domain::snapshot::PortfolioSnapshot;
use crate::ports::state_port::StatePort;

/// Loads the stored snapshot, seeding the store from the built-in default
/// document the first time.
pub fn load_or_seed(port: &dyn StatePort) -> Result<PortfolioSnapshot, FolioError> {
    if let Some(snapshot) = port.load()? {
        return Ok(snapshot);
    }
    tracing::info!("no stored state, seeding from default document");
    let snapshot = parse_document(default_state::document())?;
    port.save(&snapshot)?;
    Ok(snapshot)
}

/// Replaces the stored state with an imported document.
///
/// The document is fully parsed and validated before anything is written;
/// on error the store is left as it was.
pub fn import_into(port: &dyn StatePort, text: &str) -> Result<PortfolioSnapshot, FolioError> {
    let snapshot = parse_document(text)?;
    port.save(&snapshot)?;
    tracing::info!(
        instruments = snapshot.instruments.len(),
        purchases = snapshot.purchases.len(),
        goals = snapshot.goals.len(),
        "imported document"
    );
    Ok(snapshot)
}
