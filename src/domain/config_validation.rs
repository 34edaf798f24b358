//! Configuration validation.
//!
//! Validates all config fields before an evaluation runs.

use crate::domain::error::PairtraderError;
use crate::domain::evaluation::parse_rates;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_evaluation_config(config: &dyn ConfigPort) -> Result<(), PairtraderError> {
    validate_data_paths(config)?;
    validate_legs(config)?;
    validate_dates(config)?;
    validate_rates(config)?;
    Ok(())
}

fn require(config: &dyn ConfigPort, section: &str, key: &str) -> Result<String, PairtraderError> {
    match config.get_string(section, key) {
        Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(PairtraderError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }),
    }
}

fn validate_data_paths(config: &dyn ConfigPort) -> Result<(), PairtraderError> {
    require(config, "data", "prices")?;
    require(config, "data", "signals")?;
    Ok(())
}

fn validate_legs(config: &dyn ConfigPort) -> Result<(), PairtraderError> {
    let leg_a = require(config, "pair", "leg_a")?;
    let leg_b = require(config, "pair", "leg_b")?;
    validate_pair(&leg_a, &leg_b)
}

/// Rejects a pair whose legs name the same ticker.
pub fn validate_pair(leg_a: &str, leg_b: &str) -> Result<(), PairtraderError> {
    if leg_a.trim().eq_ignore_ascii_case(leg_b.trim()) {
        return Err(PairtraderError::ConfigInvalid {
            section: "pair".to_string(),
            key: "leg_b".to_string(),
            reason: "leg_b must differ from leg_a".to_string(),
        });
    }
    Ok(())
}

pub fn parse_optional_date(
    config: &dyn ConfigPort,
    key: &str,
) -> Result<Option<NaiveDate>, PairtraderError> {
    match config.get_string("pair", key) {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| PairtraderError::ConfigInvalid {
                section: "pair".to_string(),
                key: key.to_string(),
                reason: format!("invalid {} format, expected YYYY-MM-DD", key),
            }),
    }
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), PairtraderError> {
    let start = parse_optional_date(config, "start_date")?;
    let end = parse_optional_date(config, "end_date")?;
    if let (Some(start), Some(end)) = (start, end) {
        if start >= end {
            return Err(PairtraderError::ConfigInvalid {
                section: "pair".to_string(),
                key: "start_date".to_string(),
                reason: "start_date must be before end_date".to_string(),
            });
        }
    }
    Ok(())
}

fn validate_rates(config: &dyn ConfigPort) -> Result<(), PairtraderError> {
    if let Some(rates) = config.get_string("performance", "rates") {
        parse_rates(&rates).map_err(|reason| PairtraderError::ConfigInvalid {
            section: "performance".to_string(),
            key: "rates".to_string(),
            reason,
        })?;
    }
    Ok(())
}
