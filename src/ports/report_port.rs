//! Report output port.

use crate::domain::error::FolioError;
use crate::domain::valuation::ValueHistory;

/// Port for writing a value history to some sink.
pub trait ReportPort {
    fn write_history(&self, history: &ValueHistory) -> Result<(), FolioError>;
}
