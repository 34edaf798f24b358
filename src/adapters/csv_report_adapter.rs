//! CSV report adapter.
//!
//! Writes three files into the output directory:
//! - `trades.csv`: one row per trade interval, with direction and dates
//! - `valuation.csv`: the de-duplicated valuation series, one row per date
//! - `performance.csv`: one row per swept risk-free rate
//!
//! Undefined metrics are written as `NaN`.

use crate::domain::error::PairtraderError;
use crate::domain::evaluation::EvaluationResult;
use crate::domain::pair_prices::PairPrices;
use crate::domain::signal::TimeIndex;
use crate::ports::report_port::ReportPort;
use std::fs;
use std::path::Path;

pub const TRADES_FILE: &str = "trades.csv";
pub const VALUATION_FILE: &str = "valuation.csv";
pub const PERFORMANCE_FILE: &str = "performance.csv";

#[derive(Debug, Default)]
pub struct CsvReportAdapter;

fn report_err(path: &Path, e: impl std::fmt::Display) -> PairtraderError {
    PairtraderError::Report {
        reason: format!("{}: {}", path.display(), e),
    }
}

fn date_label(prices: &PairPrices, index: TimeIndex) -> String {
    prices
        .date_at(index)
        .map(|d| d.to_string())
        .unwrap_or_default()
}

fn write_rows(path: &Path, header: &[&str], rows: Vec<Vec<String>>) -> Result<(), PairtraderError> {
    let mut wtr = csv::Writer::from_path(path).map_err(|e| report_err(path, e))?;
    wtr.write_record(header).map_err(|e| report_err(path, e))?;
    for row in rows {
        wtr.write_record(&row).map_err(|e| report_err(path, e))?;
    }
    wtr.flush().map_err(|e| report_err(path, e))?;
    Ok(())
}

impl ReportPort for CsvReportAdapter {
    fn write(
        &self,
        result: &EvaluationResult,
        prices: &PairPrices,
        output_dir: &Path,
    ) -> Result<(), PairtraderError> {
        fs::create_dir_all(output_dir).map_err(|e| report_err(output_dir, e))?;

        let trades = result
            .trades
            .iter()
            .map(|(interval, direction)| {
                vec![
                    interval.entry.to_string(),
                    interval.exit.to_string(),
                    date_label(prices, interval.entry),
                    date_label(prices, interval.exit),
                    direction.to_string(),
                ]
            })
            .collect();
        write_rows(
            &output_dir.join(TRADES_FILE),
            &["entry", "exit", "entry_date", "exit_date", "direction"],
            trades,
        )?;

        let valuation = result
            .valuation
            .deduplicated()
            .points
            .iter()
            .map(|p| {
                vec![
                    p.time.to_string(),
                    date_label(prices, p.time),
                    p.value.to_string(),
                ]
            })
            .collect();
        write_rows(
            &output_dir.join(VALUATION_FILE),
            &["index", "date", "value"],
            valuation,
        )?;

        let performance = result
            .performance
            .iter()
            .map(|s| {
                vec![
                    s.risk_free_rate.to_string(),
                    s.excess_return.to_string(),
                    s.sharpe.to_string(),
                    s.sortino.to_string(),
                ]
            })
            .collect();
        write_rows(
            &output_dir.join(PERFORMANCE_FILE),
            &["risk_free_rate", "excess_return", "sharpe", "sortino"],
            performance,
        )?;

        tracing::info!(dir = %output_dir.display(), "report written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::evaluation::{run_evaluation, EvaluationConfig};
    use crate::domain::pair_prices::PriceLeg;
    use crate::domain::signal::{SignalSet, TaggedEntries};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn sample() -> (PairPrices, EvaluationResult) {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let dates = (0..6)
            .map(|i| start + chrono::Duration::days(i))
            .collect();
        let prices = PairPrices::new(
            dates,
            PriceLeg::dense("KO", &[100.0, 100.0, 104.0, 102.0, 101.0, 100.0]),
            PriceLeg::dense("PEP", &[50.0, 50.0, 50.0, 51.0, 50.0, 50.0]),
        )
        .unwrap();
        let signals = SignalSet {
            entries: TaggedEntries::new(vec![1].into(), Default::default()),
            exits: vec![3].into(),
        };
        let config = EvaluationConfig {
            rates: vec![0.0, 0.05],
            ..EvaluationConfig::new("KO", "PEP")
        };
        let result = run_evaluation(&prices, &signals, &config).unwrap();
        (prices, result)
    }

    #[test]
    fn writes_all_three_files() {
        let dir = TempDir::new().unwrap();
        let (prices, result) = sample();
        CsvReportAdapter.write(&result, &prices, dir.path()).unwrap();

        let trades = fs::read_to_string(dir.path().join(TRADES_FILE)).unwrap();
        assert_eq!(
            trades,
            "entry,exit,entry_date,exit_date,direction\n1,3,2024-03-02,2024-03-04,long\n"
        );

        let valuation = fs::read_to_string(dir.path().join(VALUATION_FILE)).unwrap();
        let lines: Vec<&str> = valuation.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "index,date,value");
        assert_eq!(lines[1], "0,2024-03-01,1");
        assert!(lines[6].starts_with("5,2024-03-06,"));

        let performance = fs::read_to_string(dir.path().join(PERFORMANCE_FILE)).unwrap();
        let lines: Vec<&str> = performance.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("0,"));
        assert!(lines[2].starts_with("0.05,"));
    }

    #[test]
    fn creates_missing_output_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("reports").join("ko_pep");
        let (prices, result) = sample();
        CsvReportAdapter.write(&result, &prices, &nested).unwrap();
        assert!(nested.join(PERFORMANCE_FILE).exists());
    }
}
