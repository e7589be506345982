//! simfolio: personal investment portfolio valuation.
//!
//! Hexagonal architecture: the pure valuation engine and entities live in
//! [`domain`], I/O seams are traits in [`ports`], concrete storage, config and
//! report implementations are in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
