//! Price collaborators for the normalizer: sources, retry and the cached feed.

mod feed;
mod quote;
pub mod providers;
mod retry;
mod source;

pub use feed::{PriceFeed, PriceFeedError};
pub use quote::{latest_quotes, PriceQuote};
pub use retry::RetryPolicy;
pub use source::PriceSource;

/// Token price list published for the wallet.
pub const DEFAULT_PRICE_LIST_URL: &str = "https://interview.switcheo.com/prices.json";
