//! Concrete adapter implementations for ports.

pub mod bootstrap;
pub mod csv_adapter;
pub mod default_state;
pub mod file_config_adapter;
pub mod json_state_adapter;
#[cfg(feature = "sqlite")]
pub mod sqlite_state_adapter;
pub mod state_document;
