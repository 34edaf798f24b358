//! Core domain types and logic.

pub mod signal;
pub mod sequencer;
pub mod pair_prices;
pub mod simulator;
pub mod performance;
pub mod evaluation;
pub mod config_validation;
pub mod error;
