//! Port traits at the I/O seams of the engine.

pub mod config_port;
pub mod state_port;
pub mod report_port;
