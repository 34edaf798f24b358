//! Port traits at every I/O seam.

pub mod config_port;
pub mod price_port;
pub mod signal_port;
pub mod report_port;
