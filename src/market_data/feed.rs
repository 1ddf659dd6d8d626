use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{latest_quotes, PriceQuote, PriceSource, RetryPolicy};
use crate::clock::{Clock, SystemClock};
use crate::normalize::PriceTable;

#[derive(Debug, thiserror::Error)]
pub enum PriceFeedError {
    #[error("price source {source_name} failed after {attempts} attempt(s): {message}")]
    Upstream {
        source_name: String,
        attempts: u32,
        message: String,
    },
}

/// Latest known prices from a [`PriceSource`].
///
/// Reading the table never waits for a fetch: until the first successful
/// refresh it is empty, and a failed refresh keeps the previous quotes.
pub struct PriceFeed {
    source: Arc<dyn PriceSource>,
    retry: RetryPolicy,
    /// Quotes older than this are left out of the table. None keeps all.
    staleness: Option<Duration>,
    clock: Arc<dyn Clock>,
    quotes: RwLock<Option<Vec<PriceQuote>>>,
}

impl PriceFeed {
    pub fn new(source: Arc<dyn PriceSource>) -> Self {
        Self {
            source,
            retry: RetryPolicy::default(),
            staleness: None,
            clock: Arc::new(SystemClock),
            quotes: RwLock::new(None),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_staleness(mut self, staleness: Duration) -> Self {
        self.staleness = Some(staleness);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Fetch from the source (with retry) and replace the cached quotes.
    ///
    /// Returns the number of distinct currencies now cached.
    pub async fn refresh(&self) -> Result<usize, PriceFeedError> {
        let source_name = self.source.name().to_string();
        let fetched = self
            .retry
            .run(&source_name, || self.source.fetch_prices())
            .await
            .map_err(|e| PriceFeedError::Upstream {
                source_name: source_name.clone(),
                attempts: self.retry.attempts(),
                message: format!("{e:#}"),
            })?;

        let quotes = latest_quotes(fetched);
        let count = quotes.len();
        *self.quotes.write().await = Some(quotes);

        info!(source = %source_name, currencies = count, "price feed refreshed");
        Ok(count)
    }

    /// Start a refresh in the background. The table stays readable meanwhile.
    pub fn spawn_refresh(self: &Arc<Self>) -> JoinHandle<Result<usize, PriceFeedError>> {
        let feed = Arc::clone(self);
        tokio::spawn(async move { feed.refresh().await })
    }

    /// Whether any refresh has succeeded yet.
    pub async fn is_loaded(&self) -> bool {
        self.quotes.read().await.is_some()
    }

    pub async fn quotes(&self) -> Vec<PriceQuote> {
        self.quotes.read().await.clone().unwrap_or_default()
    }

    /// Price table built from the cached quotes that are not stale.
    pub async fn table(&self) -> PriceTable {
        let now = self.clock.now();
        let guard = self.quotes.read().await;
        let Some(quotes) = guard.as_ref() else {
            debug!("price feed not loaded yet, using empty table");
            return PriceTable::new();
        };

        let mut table = PriceTable::new();
        for quote in quotes {
            if !self.is_fresh(quote.timestamp, now) {
                debug!(currency = %quote.currency, timestamp = %quote.timestamp, "dropping stale quote");
                continue;
            }
            if let Err(e) = table.try_insert(&quote.currency, quote.price) {
                warn!(error = %e, "ignoring invalid quote");
            }
        }
        table
    }

    fn is_fresh(&self, timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let Some(staleness) = self.staleness else {
            return true;
        };
        match chrono::Duration::from_std(staleness) {
            Ok(max_age) => now.signed_duration_since(timestamp) <= max_age,
            Err(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::market_data::providers::StaticPriceSource;
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    fn quote(currency: &str, price: Decimal, timestamp: DateTime<Utc>) -> PriceQuote {
        PriceQuote {
            currency: currency.to_string(),
            price,
            timestamp,
            source: "static".to_string(),
        }
    }

    #[tokio::test]
    async fn table_is_empty_before_first_refresh() {
        let feed = PriceFeed::new(Arc::new(StaticPriceSource::default()));
        assert!(!feed.is_loaded().await);
        assert!(feed.table().await.is_empty());
    }

    #[tokio::test]
    async fn drops_stale_quotes() -> anyhow::Result<()> {
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap();
        let source = StaticPriceSource::new(vec![
            quote("SWTH", Decimal::new(1, 1), now - chrono::Duration::minutes(30)),
            quote("ETH", Decimal::new(1645, 0), now - chrono::Duration::hours(3)),
        ]);
        let clock = Arc::new(FixedClock::new(now));
        let feed = PriceFeed::new(Arc::new(source))
            .with_staleness(Duration::from_secs(60 * 60))
            .with_clock(clock.clone());

        assert_eq!(feed.refresh().await?, 2);
        assert_eq!(feed.quotes().await.len(), 2);
        let table = feed.table().await;
        assert_eq!(table.price_of("SWTH"), Decimal::new(1, 1));
        assert_eq!(table.get("ETH"), None);

        clock.advance(chrono::Duration::hours(1));
        assert!(feed.table().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn negative_quotes_are_left_out() -> anyhow::Result<()> {
        let now = Utc::now();
        let source = StaticPriceSource::new(vec![
            quote("BAD", Decimal::new(-1, 0), now),
            quote("OK", Decimal::ONE, now),
        ]);
        let feed = PriceFeed::new(Arc::new(source));
        assert_eq!(feed.refresh().await?, 1);

        let table = feed.table().await;
        assert_eq!(table.len(), 1);
        assert_eq!(table.price_of("OK"), Decimal::ONE);
        Ok(())
    }
}
