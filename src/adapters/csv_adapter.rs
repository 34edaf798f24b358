//! CSV file price and signal adapters.
//!
//! Prices are one wide file: a `date` column followed by one close column per
//! ticker. An empty cell is a missing close. Signals are a long file of
//! `index,kind` rows where kind is `long_entry`, `short_entry` or `exit`.

use crate::domain::error::PairtraderError;
use crate::domain::pair_prices::{PairPrices, PriceLeg};
use crate::domain::signal::{EventStream, SignalSet, TaggedEntries, TimeIndex};
use crate::ports::price_port::PricePort;
use crate::ports::signal_port::SignalPort;
use chrono::NaiveDate;
use std::path::PathBuf;

fn data_err(reason: impl Into<String>) -> PairtraderError {
    PairtraderError::Data {
        reason: reason.into(),
    }
}

pub struct CsvPriceAdapter {
    path: PathBuf,
}

impl CsvPriceAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn reader(&self) -> Result<csv::Reader<std::fs::File>, PairtraderError> {
        csv::Reader::from_path(&self.path)
            .map_err(|e| data_err(format!("failed to read {}: {}", self.path.display(), e)))
    }

    fn column(headers: &csv::StringRecord, ticker: &str) -> Result<usize, PairtraderError> {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(ticker))
            .ok_or_else(|| data_err(format!("no price column for {}", ticker)))
    }
}

fn parse_close(
    cell: Option<&str>,
    ticker: &str,
    date: NaiveDate,
) -> Result<Option<f64>, PairtraderError> {
    match cell.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse::<f64>()
            .map(Some)
            .map_err(|e| data_err(format!("invalid {} close on {}: {}", ticker, date, e))),
    }
}

impl PricePort for CsvPriceAdapter {
    fn fetch_pair(
        &self,
        leg_a: &str,
        leg_b: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PairPrices, PairtraderError> {
        let mut rdr = self.reader()?;
        let headers = rdr
            .headers()
            .map_err(|e| data_err(format!("CSV header error: {}", e)))?
            .clone();
        let col_a = Self::column(&headers, leg_a)?;
        let col_b = Self::column(&headers, leg_b)?;

        let mut rows: Vec<(NaiveDate, Option<f64>, Option<f64>)> = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| data_err(format!("CSV parse error: {}", e)))?;

            let date_str = record.get(0).ok_or_else(|| data_err("missing date column"))?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
                .map_err(|e| data_err(format!("invalid date format: {}", e)))?;

            if start_date.is_some_and(|s| date < s) || end_date.is_some_and(|e| date > e) {
                continue;
            }

            let a = parse_close(record.get(col_a), leg_a, date)?;
            let b = parse_close(record.get(col_b), leg_b, date)?;
            rows.push((date, a, b));
        }

        rows.sort_by_key(|(date, _, _)| *date);
        if rows.windows(2).any(|w| w[0].0 == w[1].0) {
            return Err(data_err(format!(
                "duplicate dates in {}",
                self.path.display()
            )));
        }

        tracing::debug!(
            path = %self.path.display(),
            leg_a,
            leg_b,
            rows = rows.len(),
            "loaded pair prices"
        );

        let dates = rows.iter().map(|(d, _, _)| *d).collect();
        let closes_a = rows.iter().map(|(_, a, _)| *a).collect();
        let closes_b = rows.iter().map(|(_, _, b)| *b).collect();
        PairPrices::new(
            dates,
            PriceLeg::new(leg_a, closes_a),
            PriceLeg::new(leg_b, closes_b),
        )
    }

    fn list_tickers(&self) -> Result<Vec<String>, PairtraderError> {
        let mut rdr = self.reader()?;
        let headers = rdr
            .headers()
            .map_err(|e| data_err(format!("CSV header error: {}", e)))?;
        let mut tickers: Vec<String> = headers
            .iter()
            .skip(1)
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .collect();
        tickers.sort();
        Ok(tickers)
    }
}

pub struct CsvSignalAdapter {
    path: PathBuf,
}

impl CsvSignalAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SignalPort for CsvSignalAdapter {
    fn fetch_signals(&self) -> Result<SignalSet, PairtraderError> {
        let mut rdr = csv::Reader::from_path(&self.path)
            .map_err(|e| data_err(format!("failed to read {}: {}", self.path.display(), e)))?;

        let mut long: Vec<TimeIndex> = Vec::new();
        let mut short: Vec<TimeIndex> = Vec::new();
        let mut exits: Vec<TimeIndex> = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| data_err(format!("CSV parse error: {}", e)))?;

            let index: TimeIndex = record
                .get(0)
                .ok_or_else(|| data_err("missing index column"))?
                .trim()
                .parse()
                .map_err(|e| data_err(format!("invalid signal index: {}", e)))?;

            let kind = record
                .get(1)
                .ok_or_else(|| data_err("missing kind column"))?
                .trim()
                .to_lowercase();

            match kind.as_str() {
                "long_entry" => long.push(index),
                "short_entry" => short.push(index),
                "exit" => exits.push(index),
                other => return Err(data_err(format!("unknown signal kind '{}'", other))),
            }
        }

        tracing::debug!(
            path = %self.path.display(),
            long = long.len(),
            short = short.len(),
            exits = exits.len(),
            "loaded signals"
        );

        Ok(SignalSet {
            entries: TaggedEntries::new(
                EventStream::from_unsorted(long),
                EventStream::from_unsorted(short),
            ),
            exits: EventStream::from_unsorted(exits),
        })
    }
}
