//! Core domain types and the valuation engine.

pub mod instrument;
pub mod purchase;
pub mod goal;
pub mod snapshot;
pub mod validation;
pub mod price_resolver;
pub mod holdings;
pub mod valuation;
pub mod timeline;
pub mod config_validation;
pub mod error;
