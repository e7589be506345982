//! Portfolio state persistence port.

use crate::domain::error::FolioError;
use crate::domain::snapshot::PortfolioSnapshot;

pub trait StatePort {
    /// Returns `None` when nothing has been stored yet.
    fn load(&self) -> Result<Option<PortfolioSnapshot>, FolioError>;

    /// Replaces the stored state with `snapshot` as a whole.
    fn save(&self, snapshot: &PortfolioSnapshot) -> Result<(), FolioError>;
}
