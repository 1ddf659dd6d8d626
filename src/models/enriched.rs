use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Stable render key for a balance: `(chain, currency)`.
///
/// Positional indices change whenever the list is re-sorted, so presentation
/// code keys rows by this instead.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BalanceKey {
    pub chain: String,
    pub currency: String,
}

impl fmt::Display for BalanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chain, self.currency)
    }
}

/// A positive balance with its resolved priority and display fields attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedBalance {
    pub currency: String,
    pub amount: Decimal,
    pub chain: String,
    pub priority: i32,
    /// `amount` rounded half away from zero to a fixed number of places.
    pub formatted_amount: String,
    /// `amount * price`; zero when the currency has no price.
    pub usd_value: Decimal,
}

impl EnrichedBalance {
    pub fn key(&self) -> BalanceKey {
        BalanceKey {
            chain: self.chain.clone(),
            currency: self.currency.clone(),
        }
    }
}
