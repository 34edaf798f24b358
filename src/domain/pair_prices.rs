//! Two-leg close price series indexed by time index.

use super::error::PairtraderError;
use super::signal::TimeIndex;
use chrono::NaiveDate;

/// One leg of a pair: a ticker and its close per time index. `None` marks a
/// missing close.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceLeg {
    pub ticker: String,
    pub closes: Vec<Option<f64>>,
}

impl PriceLeg {
    pub fn new(ticker: impl Into<String>, closes: Vec<Option<f64>>) -> Self {
        Self {
            ticker: ticker.into(),
            closes,
        }
    }

    /// Builds a leg with no missing closes.
    pub fn dense(ticker: impl Into<String>, closes: &[f64]) -> Self {
        Self::new(ticker, closes.iter().copied().map(Some).collect())
    }

    /// Close at `index`. Missing, non-finite and non-positive closes are all
    /// reported as a data gap.
    pub fn close(&self, index: TimeIndex) -> Result<f64, PairtraderError> {
        match self.closes.get(index).copied().flatten() {
            Some(price) if price.is_finite() && price > 0.0 => Ok(price),
            _ => Err(PairtraderError::DataGap {
                leg: self.ticker.clone(),
                index,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PairPrices {
    pub dates: Vec<NaiveDate>,
    pub leg_a: PriceLeg,
    pub leg_b: PriceLeg,
}

impl PairPrices {
    /// Builds the series, rejecting legs whose length disagrees with the date axis.
    pub fn new(
        dates: Vec<NaiveDate>,
        leg_a: PriceLeg,
        leg_b: PriceLeg,
    ) -> Result<Self, PairtraderError> {
        for leg in [&leg_a, &leg_b] {
            if leg.closes.len() != dates.len() {
                return Err(PairtraderError::Data {
                    reason: format!(
                        "{} has {} closes for {} dates",
                        leg.ticker,
                        leg.closes.len(),
                        dates.len()
                    ),
                });
            }
        }
        Ok(Self {
            dates,
            leg_a,
            leg_b,
        })
    }

    /// Number of time indices covered.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn closes_at(&self, index: TimeIndex) -> Result<(f64, f64), PairtraderError> {
        Ok((self.leg_a.close(index)?, self.leg_b.close(index)?))
    }

    /// Calendar date for a time index, for presentation only.
    pub fn date_at(&self, index: TimeIndex) -> Option<NaiveDate> {
        self.dates.get(index).copied()
    }
}
