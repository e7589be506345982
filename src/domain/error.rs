//! Domain error types.

/// Top-level error type for simfolio.
///
/// The valuation engine itself never fails; these errors come from the
/// boundaries around it (configuration, storage, imported documents and
/// user-entered values).
#[derive(Debug, thiserror::Error)]
pub enum FolioError {
    #[error("storage error: {reason}")]
    Storage { reason: String },

    #[error("storage query error: {reason}")]
    StorageQuery { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid portfolio document: {reason}")]
    InvalidDocument { reason: String },

    #[error("invalid {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("unknown instrument {symbol}")]
    UnknownInstrument { symbol: String },

    #[error("unknown goal {id}")]
    UnknownGoal { id: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FolioError {
    pub fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        FolioError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&FolioError> for std::process::ExitCode {
    fn from(err: &FolioError) -> Self {
        let code: u8 = match err {
            FolioError::Io(_) | FolioError::Csv(_) => 1,
            FolioError::ConfigParse { .. }
            | FolioError::ConfigMissing { .. }
            | FolioError::ConfigInvalid { .. } => 2,
            FolioError::Storage { .. } | FolioError::StorageQuery { .. } => 3,
            FolioError::InvalidDocument { .. } | FolioError::Json(_) => 4,
            FolioError::InvalidInput { .. }
            | FolioError::UnknownInstrument { .. }
            | FolioError::UnknownGoal { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
