#![allow(dead_code)]

use chrono::NaiveDate;
use pairtrader::domain::error::PairtraderError;
use pairtrader::domain::evaluation::EvaluationResult;
use pairtrader::domain::pair_prices::{PairPrices, PriceLeg};
use pairtrader::domain::signal::{EventStream, SignalSet, TaggedEntries};
use pairtrader::ports::price_port::PricePort;
use pairtrader::ports::report_port::ReportPort;
use pairtrader::ports::signal_port::SignalPort;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

pub struct MockPricePort {
    pub prices: Option<PairPrices>,
    pub error: Option<String>,
}

impl MockPricePort {
    pub fn with_prices(prices: PairPrices) -> Self {
        Self {
            prices: Some(prices),
            error: None,
        }
    }

    pub fn with_error(reason: &str) -> Self {
        Self {
            prices: None,
            error: Some(reason.to_string()),
        }
    }
}

impl PricePort for MockPricePort {
    fn fetch_pair(
        &self,
        _leg_a: &str,
        _leg_b: &str,
        _start_date: Option<NaiveDate>,
        _end_date: Option<NaiveDate>,
    ) -> Result<PairPrices, PairtraderError> {
        if let Some(reason) = &self.error {
            return Err(PairtraderError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self.prices.clone().unwrap_or_else(|| pair(&[], &[])))
    }

    fn list_tickers(&self) -> Result<Vec<String>, PairtraderError> {
        Ok(self
            .prices
            .iter()
            .flat_map(|p| [p.leg_a.ticker.clone(), p.leg_b.ticker.clone()])
            .collect())
    }
}

pub struct MockSignalPort {
    pub signals: SignalSet,
}

impl SignalPort for MockSignalPort {
    fn fetch_signals(&self) -> Result<SignalSet, PairtraderError> {
        Ok(self.signals.clone())
    }
}

/// Captures the last written result instead of touching the filesystem.
#[derive(Default)]
pub struct RecordingReportPort {
    pub written: RefCell<Option<(EvaluationResult, PathBuf)>>,
}

impl ReportPort for RecordingReportPort {
    fn write(
        &self,
        result: &EvaluationResult,
        _prices: &PairPrices,
        output_dir: &Path,
    ) -> Result<(), PairtraderError> {
        *self.written.borrow_mut() = Some((result.clone(), output_dir.to_path_buf()));
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Consecutive calendar days starting 2024-01-01.
pub fn pair(a: &[f64], b: &[f64]) -> PairPrices {
    let start = date(2024, 1, 1);
    let dates = (0..a.len())
        .map(|i| start + chrono::Duration::days(i as i64))
        .collect();
    PairPrices::new(dates, PriceLeg::dense("KO", a), PriceLeg::dense("PEP", b)).unwrap()
}

pub fn signals(long: &[usize], short: &[usize], exits: &[usize]) -> SignalSet {
    SignalSet {
        entries: TaggedEntries::new(
            EventStream::from_unsorted(long.to_vec()),
            EventStream::from_unsorted(short.to_vec()),
        ),
        exits: EventStream::from_unsorted(exits.to_vec()),
    }
}

pub fn exit_code_is(code: ExitCode, expected: u8) -> bool {
    format!("{code:?}") == format!("{:?}", ExitCode::from(expected))
}
