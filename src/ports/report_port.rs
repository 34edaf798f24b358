//! Report generation port trait.

use crate::domain::error::PairtraderError;
use crate::domain::evaluation::EvaluationResult;
use crate::domain::pair_prices::PairPrices;
use std::path::Path;

/// Port for writing evaluation reports.
pub trait ReportPort {
    fn write(
        &self,
        result: &EvaluationResult,
        prices: &PairPrices,
        output_dir: &Path,
    ) -> Result<(), PairtraderError>;
}
