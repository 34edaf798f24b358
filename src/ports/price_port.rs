//! Price access port trait.

use crate::domain::error::PairtraderError;
use crate::domain::pair_prices::PairPrices;
use chrono::NaiveDate;

pub trait PricePort {
    /// Dense closes for two tickers, optionally restricted to an inclusive
    /// date range.
    fn fetch_pair(
        &self,
        leg_a: &str,
        leg_b: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PairPrices, PairtraderError>;

    fn list_tickers(&self) -> Result<Vec<String>, PairtraderError>;
}
