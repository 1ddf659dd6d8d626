mod balance;
mod enriched;

pub use balance::BalanceRecord;
pub use enriched::{BalanceKey, EnrichedBalance};
