use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One observed USD price for a currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub currency: String,
    pub price: Decimal,
    pub timestamp: DateTime<Utc>,
    pub source: String,
}

/// Reduce quotes to one per currency (compared upper-cased).
///
/// Negative prices are dropped first, so they never displace a valid quote.
/// The newest timestamp wins; for equal timestamps the later quote in the
/// input wins. Output is ordered by currency.
pub fn latest_quotes(quotes: impl IntoIterator<Item = PriceQuote>) -> Vec<PriceQuote> {
    let mut latest: BTreeMap<String, PriceQuote> = BTreeMap::new();

    for quote in quotes {
        if quote.price.is_sign_negative() && !quote.price.is_zero() {
            warn!(
                currency = %quote.currency,
                price = %quote.price,
                source = %quote.source,
                "skipping negative price quote"
            );
            continue;
        }
        let key = quote.currency.trim().to_uppercase();
        match latest.get(&key) {
            Some(existing) if existing.timestamp > quote.timestamp => {}
            _ => {
                latest.insert(key, quote);
            }
        }
    }

    latest.into_values().collect()
}
