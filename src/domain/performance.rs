//! Risk-adjusted performance over a sweep of risk-free rates.

use super::simulator::ValuationSeries;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Sentinel for a metric whose denominator is zero or whose input is too short.
pub const UNDEFINED_METRIC: f64 = f64::NAN;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceSample {
    pub risk_free_rate: f64,
    pub excess_return: f64,
    pub sharpe: f64,
    pub sortino: f64,
}

impl PerformanceSample {
    fn undefined(risk_free_rate: f64) -> Self {
        PerformanceSample {
            risk_free_rate,
            excess_return: UNDEFINED_METRIC,
            sharpe: UNDEFINED_METRIC,
            sortino: UNDEFINED_METRIC,
        }
    }

    /// True when every metric is a number.
    pub fn is_defined(&self) -> bool {
        !(self.excess_return.is_nan() || self.sharpe.is_nan() || self.sortino.is_nan())
    }
}

/// Integer percentage rates from -1% to 9% inclusive, as fractions.
pub fn default_rate_grid() -> Vec<f64> {
    (-1..=9).map(|pct| pct as f64 / 100.0).collect()
}

/// Period-over-period fractional change, after resolving duplicate time
/// indices. The first point has no return and is dropped.
pub fn daily_returns(valuation: &ValuationSeries) -> Vec<f64> {
    valuation
        .deduplicated()
        .points
        .windows(2)
        .map(|w| (w[1].value - w[0].value) / w[0].value)
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator). Exactly zero for a
/// constant series.
fn stdev(values: &[f64]) -> f64 {
    if values.iter().all(|&v| v == values[0]) {
        return 0.0;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() as f64 - 1.0);
    variance.sqrt()
}

fn annualized_ratio(mean_excess: f64, deviation: f64) -> f64 {
    if deviation > 0.0 && deviation.is_finite() {
        TRADING_DAYS_PER_YEAR.sqrt() * mean_excess / deviation
    } else {
        UNDEFINED_METRIC
    }
}

/// Geometric daily equivalent of an annual rate.
pub fn daily_risk_free(rate: f64) -> f64 {
    (1.0 + rate).powf(1.0 / TRADING_DAYS_PER_YEAR) - 1.0
}

pub fn excess_returns(rate: f64, daily_returns: &[f64]) -> Vec<f64> {
    let daily_rf = daily_risk_free(rate);
    daily_returns.iter().map(|r| r - daily_rf).collect()
}

/// Annualized excess return, Sharpe and Sortino for one annual risk-free rate.
pub fn metrics(rate: f64, daily_returns: &[f64]) -> PerformanceSample {
    if daily_returns.len() < 2 {
        return PerformanceSample::undefined(rate);
    }

    let excess = excess_returns(rate, daily_returns);
    let mean_excess = mean(&excess);

    let downside: Vec<f64> = excess.iter().map(|&e| if e > 0.0 { 0.0 } else { e }).collect();

    PerformanceSample {
        risk_free_rate: rate,
        excess_return: (1.0 + mean_excess).powf(TRADING_DAYS_PER_YEAR) - 1.0,
        sharpe: annualized_ratio(mean_excess, stdev(&excess)),
        sortino: annualized_ratio(mean_excess, stdev(&downside)),
    }
}

/// Evaluates [`metrics`] once per rate, in the given order.
pub fn sweep(valuation: &ValuationSeries, rates: &[f64]) -> Vec<PerformanceSample> {
    let returns = daily_returns(valuation);
    tracing::debug!(
        returns = returns.len(),
        rates = rates.len(),
        "sweeping risk-free rates"
    );
    rates.iter().map(|&rate| metrics(rate, &returns)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::simulator::ValuationPoint;
    use approx::assert_relative_eq;

    fn series(values: &[f64]) -> ValuationSeries {
        ValuationSeries {
            points: values
                .iter()
                .enumerate()
                .map(|(time, &value)| ValuationPoint { value, time })
                .collect(),
        }
    }

    #[test]
    fn default_grid_has_eleven_points() {
        let grid = default_rate_grid();
        assert_eq!(grid.len(), 11);
        assert_relative_eq!(grid[0], -0.01);
        assert_relative_eq!(grid[1], 0.0);
        assert_relative_eq!(grid[10], 0.09);
    }

    #[test]
    fn zero_rate_excess_equals_returns() {
        let returns = [0.01, -0.01, 0.01, -0.01];
        assert_eq!(excess_returns(0.0, &returns), returns.to_vec());
        let sample = metrics(0.0, &returns);

        // mean is zero, so every ratio is zero and excess return is zero
        let sd = stdev(&returns);
        assert_relative_eq!(sd, (0.0004f64 / 3.0).sqrt(), epsilon = 1e-15);
        assert_relative_eq!(sample.excess_return, 0.0, epsilon = 1e-12);
        assert_relative_eq!(sample.sharpe, 0.0, epsilon = 1e-12);
        assert_relative_eq!(sample.sortino, 0.0, epsilon = 1e-12);
        assert!(sample.is_defined());
    }

    #[test]
    fn hand_computed_ratios() {
        let returns = [0.02, -0.01, 0.03, 0.0];
        let sample = metrics(0.0, &returns);

        let m = 0.01;
        let sd = ((0.01f64.powi(2) + 0.02f64.powi(2) + 0.02f64.powi(2) + 0.01f64.powi(2)) / 3.0)
            .sqrt();
        // downside = [0, -0.01, 0, 0], mean -0.0025
        let dm: f64 = -0.0025;
        let dsd = ((3.0 * dm.powi(2) + (-0.01 - dm).powi(2)) / 3.0).sqrt();

        assert_relative_eq!(sample.excess_return, 1.01f64.powf(252.0) - 1.0, epsilon = 1e-9);
        assert_relative_eq!(sample.sharpe, 252f64.sqrt() * m / sd, epsilon = 1e-9);
        assert_relative_eq!(sample.sortino, 252f64.sqrt() * m / dsd, epsilon = 1e-9);
    }

    #[test]
    fn daily_risk_free_compounds_to_annual() {
        let daily = daily_risk_free(0.05);
        assert_relative_eq!((1.0 + daily).powf(252.0), 1.05, epsilon = 1e-12);
        assert_eq!(daily_risk_free(0.0), 0.0);
    }

    #[test]
    fn higher_rate_lowers_every_metric() {
        let returns = [0.02, -0.01, 0.03, 0.0, 0.01];
        let low = metrics(0.0, &returns);
        let high = metrics(0.05, &returns);
        assert!(high.excess_return < low.excess_return);
        assert!(high.sharpe < low.sharpe);
        assert!(high.sortino < low.sortino);
    }

    #[test]
    fn constant_returns_are_undefined_ratios() {
        let sample = metrics(0.0, &[0.01, 0.01, 0.01]);
        assert!(sample.excess_return.is_finite());
        assert!(sample.sharpe.is_nan());
        assert!(sample.sortino.is_nan());
        assert!(!sample.is_defined());
    }

    #[test]
    fn no_downside_leaves_sortino_undefined() {
        let sample = metrics(0.0, &[0.01, 0.02, 0.03]);
        assert!(sample.sharpe.is_finite());
        assert!(sample.sortino.is_nan());
    }

    #[test]
    fn short_inputs_are_undefined() {
        for returns in [&[][..], &[0.01][..]] {
            let sample = metrics(0.03, returns);
            assert_eq!(sample.risk_free_rate, 0.03);
            assert!(sample.excess_return.is_nan());
            assert!(sample.sharpe.is_nan());
            assert!(sample.sortino.is_nan());
        }
    }

    #[test]
    fn daily_returns_drop_first_point() {
        let returns = daily_returns(&series(&[1.0, 1.1, 0.99]));
        assert_eq!(returns.len(), 2);
        assert_relative_eq!(returns[0], 0.1, epsilon = 1e-12);
        assert_relative_eq!(returns[1], -0.1, epsilon = 1e-12);
    }

    #[test]
    fn daily_returns_resolve_duplicates_first() {
        let raw = ValuationSeries {
            points: vec![
                ValuationPoint { value: 1.0, time: 0 },
                ValuationPoint { value: 1.0, time: 0 },
                ValuationPoint { value: 1.0, time: 1 },
                ValuationPoint { value: 1.2, time: 1 },
                ValuationPoint { value: 1.2, time: 2 },
            ],
        };
        let returns = daily_returns(&raw);
        assert_eq!(returns.len(), 2);
        assert_relative_eq!(returns[0], 0.2, epsilon = 1e-12);
        assert_relative_eq!(returns[1], 0.0);
    }

    #[test]
    fn sweep_follows_rate_order() {
        let valuation = series(&[1.0, 1.02, 1.01, 1.04, 1.04, 1.05]);
        let rates = [0.05, -0.01, 0.02];
        let samples = sweep(&valuation, &rates);
        let got: Vec<f64> = samples.iter().map(|s| s.risk_free_rate).collect();
        assert_eq!(got, rates.to_vec());
    }

    #[test]
    fn sweep_without_rates_is_empty() {
        assert!(sweep(&series(&[1.0, 1.1, 1.2]), &[]).is_empty());
    }

    #[test]
    fn flat_valuation_sweeps_to_sentinels() {
        let samples = sweep(&series(&[1.0; 10]), &default_rate_grid());
        assert_eq!(samples.len(), 11);
        assert!(samples.iter().all(|s| s.sharpe.is_nan() && s.sortino.is_nan()));
    }

    #[test]
    fn metrics_are_deterministic() {
        let returns = [0.004, -0.002, 0.011, -0.007, 0.003];
        let a = metrics(0.02, &returns);
        let b = metrics(0.02, &returns);
        assert_eq!(a.excess_return.to_bits(), b.excess_return.to_bits());
        assert_eq!(a.sharpe.to_bits(), b.sharpe.to_bits());
        assert_eq!(a.sortino.to_bits(), b.sortino.to_bits());
    }
}
