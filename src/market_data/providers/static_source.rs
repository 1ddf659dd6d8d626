use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::market_data::{PriceQuote, PriceSource};
use crate::normalize::PriceTable;

/// Serves a fixed set of quotes. Useful for offline runs and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticPriceSource {
    quotes: Vec<PriceQuote>,
}

impl StaticPriceSource {
    pub fn new(quotes: Vec<PriceQuote>) -> Self {
        Self { quotes }
    }

    /// Quote every entry of `table` at `timestamp`.
    pub fn from_table(table: &PriceTable, timestamp: DateTime<Utc>) -> Self {
        let quotes = table
            .iter()
            .map(|(currency, price)| PriceQuote {
                currency: currency.to_string(),
                price,
                timestamp,
                source: "static".to_string(),
            })
            .collect();
        Self { quotes }
    }
}

#[async_trait::async_trait]
impl PriceSource for StaticPriceSource {
    async fn fetch_prices(&self) -> Result<Vec<PriceQuote>> {
        Ok(self.quotes.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn serves_table_entries() -> Result<()> {
        let table = PriceTable::from_entries([("SWTH", Decimal::new(1, 1)), ("ETH", Decimal::new(1645, 0))])?;
        let source = StaticPriceSource::from_table(&table, Utc::now());

        let quotes = source.fetch_prices().await?;
        assert_eq!(quotes.len(), 2);
        assert!(quotes.iter().all(|q| q.source == "static"));
        Ok(())
    }
}
