//! Portfolio valuation over the full observed horizon.
//!
//! The simulated portfolio starts at 1.0 and holds at most one dollar-neutral
//! pair position at a time. Between trades the value is carried flat. During
//! a trade each step is valued against the legs' closes at entry:
//!
//! ```text
//! pair_return = 1 + sign * (A[t] / A[entry] - B[t] / B[entry]) / 2
//! ```
//!
//! The raw series intentionally repeats the time index at every boundary
//! (the seed at 0, each trade's entry and each trade's exit). Use
//! [`deduplicate`] to get one point per time index, last write winning.

use super::error::PairtraderError;
use super::pair_prices::PairPrices;
use super::sequencer::TradeInterval;
use super::signal::{Direction, TimeIndex};
use std::collections::BTreeMap;

const INITIAL_VALUE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValuationPoint {
    pub value: f64,
    pub time: TimeIndex,
}

/// Ordered valuation points, possibly with repeated time indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValuationSeries {
    pub points: Vec<ValuationPoint>,
}

impl ValuationSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    pub fn final_value(&self) -> Option<f64> {
        self.points.last().map(|p| p.value)
    }

    /// Returns a copy keeping only the last point written for each time index.
    pub fn deduplicated(&self) -> ValuationSeries {
        ValuationSeries {
            points: deduplicate(&self.points),
        }
    }
}

/// Keeps the last point written for each time index, ordered by time.
pub fn deduplicate(points: &[ValuationPoint]) -> Vec<ValuationPoint> {
    let latest: BTreeMap<TimeIndex, f64> = points.iter().map(|p| (p.time, p.value)).collect();
    latest
        .into_iter()
        .map(|(time, value)| ValuationPoint { value, time })
        .collect()
}

fn pair_return(
    prices: &PairPrices,
    entry: TimeIndex,
    t: TimeIndex,
    direction: Direction,
) -> Result<f64, PairtraderError> {
    let (a0, b0) = prices.closes_at(entry)?;
    let (a, b) = prices.closes_at(t)?;
    Ok(1.0 + direction.sign() * (a / a0 - b / b0) / 2.0)
}

/// Values the portfolio at every time index in `[0, horizon)`.
///
/// Fails with [`PairtraderError::DataGap`] when a trade touches a time index
/// with no usable close on either leg or extends past the horizon.
pub fn simulate(
    intervals: &[TradeInterval],
    directions: &[Direction],
    prices: &PairPrices,
    horizon: usize,
) -> Result<ValuationSeries, PairtraderError> {
    if intervals.len() != directions.len() {
        return Err(PairtraderError::LengthMismatch {
            intervals: intervals.len(),
            directions: directions.len(),
        });
    }
    if horizon == 0 {
        return Ok(ValuationSeries::default());
    }

    let mut points = Vec::with_capacity(horizon + 2 * intervals.len() + 1);
    let mut carry = INITIAL_VALUE;
    let mut cursor: TimeIndex = 0;
    points.push(ValuationPoint {
        value: carry,
        time: cursor,
    });

    for (interval, &direction) in intervals.iter().zip(directions) {
        if interval.exit >= horizon {
            return Err(PairtraderError::DataGap {
                leg: prices.leg_a.ticker.clone(),
                index: interval.exit,
            });
        }

        points.extend((cursor..=interval.entry).map(|time| ValuationPoint { value: carry, time }));

        let start_value = carry;
        for t in interval.entry..=interval.exit {
            let value = start_value * pair_return(prices, interval.entry, t, direction)?;
            points.push(ValuationPoint { value, time: t });
            carry = value;
        }
        cursor = interval.exit;
    }

    points.extend((cursor..horizon).map(|time| ValuationPoint { value: carry, time }));

    tracing::debug!(
        intervals = intervals.len(),
        horizon,
        points = points.len(),
        final_value = carry,
        "simulated portfolio valuation"
    );
    Ok(ValuationSeries { points })
}
