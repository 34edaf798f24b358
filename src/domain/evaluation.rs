//! Evaluation pipeline: sequencing, valuation, then the performance sweep.

use chrono::NaiveDate;

use super::error::PairtraderError;
use super::pair_prices::PairPrices;
use super::performance::{self, PerformanceSample};
use super::sequencer::{self, SequencedTrades};
use super::signal::SignalSet;
use super::simulator::{self, ValuationSeries};

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationConfig {
    pub leg_a: String,
    pub leg_b: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub drop_coincident_exits: bool,
    pub rates: Vec<f64>,
}

impl EvaluationConfig {
    pub fn new(leg_a: impl Into<String>, leg_b: impl Into<String>) -> Self {
        EvaluationConfig {
            leg_a: leg_a.into(),
            leg_b: leg_b.into(),
            start_date: None,
            end_date: None,
            drop_coincident_exits: true,
            rates: performance::default_rate_grid(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResult {
    pub horizon: usize,
    pub trades: SequencedTrades,
    /// Raw simulator output, boundary duplicates included.
    pub valuation: ValuationSeries,
    pub performance: Vec<PerformanceSample>,
}

impl EvaluationResult {
    pub fn final_value(&self) -> f64 {
        self.valuation.final_value().unwrap_or(1.0)
    }

    pub fn total_return(&self) -> f64 {
        self.final_value() - 1.0
    }
}

/// Parses a comma-separated list of annual rates given as fractions.
pub fn parse_rates(input: &str) -> Result<Vec<f64>, String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| match s.parse::<f64>() {
            Ok(rate) if rate.is_finite() => Ok(rate),
            _ => Err(format!("invalid rate '{s}'")),
        })
        .collect()
}

pub fn run_evaluation(
    prices: &PairPrices,
    signals: &SignalSet,
    config: &EvaluationConfig,
) -> Result<EvaluationResult, PairtraderError> {
    let horizon = prices.len();

    let exits = if config.drop_coincident_exits {
        signals.non_coincident_exits()
    } else {
        signals.exits.clone()
    };

    let trades = sequencer::sequence_tagged(&signals.entries, &exits);
    tracing::info!(
        trades = trades.len(),
        dropped_exits = signals.exits.len() - exits.len(),
        "sequenced signals"
    );

    let valuation = simulator::simulate(&trades.intervals, &trades.directions, prices, horizon)?;
    let performance = performance::sweep(&valuation, &config.rates);
    tracing::info!(
        horizon,
        rates = performance.len(),
        final_value = ?valuation.final_value(),
        "evaluated pair"
    );

    Ok(EvaluationResult {
        horizon,
        trades,
        valuation,
        performance,
    })
}
