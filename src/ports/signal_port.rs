//! Signal access port trait.

use crate::domain::error::PairtraderError;
use crate::domain::signal::SignalSet;

pub trait SignalPort {
    fn fetch_signals(&self) -> Result<SignalSet, PairtraderError>;
}
