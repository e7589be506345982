//! Portfolio state stored as a single JSON document on disk.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::adapters::state_document::{parse_document, render_document};
use crate::domain::error::FolioError;
use crate::domain::snapshot::PortfolioSnapshot;
use crate::ports::state_port::StatePort;

pub struct JsonFileStateAdapter {
    path: PathBuf,
}

impl JsonFileStateAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StatePort for JsonFileStateAdapter {
    fn load(&self) -> Result<Option<PortfolioSnapshot>, FolioError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no stored state");
                return Ok(None);
            }
            Err(e) => {
                return Err(FolioError::Storage {
                    reason: format!("failed to read {}: {}", self.path.display(), e),
                });
            }
        };
        let snapshot = parse_document(&text)?;
        tracing::debug!(
            path = %self.path.display(),
            instruments = snapshot.instruments.len(),
            purchases = snapshot.purchases.len(),
            "loaded state"
        );
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &PortfolioSnapshot) -> Result<(), FolioError> {
        let text = render_document(snapshot)?;
        let tmp = self.temp_path();
        fs::write(&tmp, text).map_err(|e| FolioError::Storage {
            reason: format!("failed to write {}: {}", tmp.display(), e),
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| FolioError::Storage {
            reason: format!("failed to replace {}: {}", self.path.display(), e),
        })?;
        tracing::debug!(path = %self.path.display(), "saved state");
        Ok(())
    }
}
