//! Balance normalization: priority lookup, filter, sort and enrichment.
//!
//! Everything here is synchronous and free of shared state. The price and
//! priority tables are explicit arguments so callers can swap policies per
//! call and test the pipeline in isolation.

mod error;
mod memo;
mod pipeline;
mod prices;
mod priority;

pub use error::NormalizeError;
pub use memo::MemoizedNormalizer;
pub use pipeline::{compare_by_priority, normalize, Normalizer, DEFAULT_AMOUNT_DECIMALS};
pub use prices::PriceTable;
pub use priority::{PriorityTable, SENTINEL_PRIORITY};
