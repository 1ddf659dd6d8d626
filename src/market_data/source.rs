use anyhow::Result;

use super::PriceQuote;

/// Remote or local supplier of USD price quotes.
#[async_trait::async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch every quote the source knows about. Duplicates per currency are
    /// allowed; callers reduce them with [`super::latest_quotes`].
    async fn fetch_prices(&self) -> Result<Vec<PriceQuote>>;

    fn name(&self) -> &str;
}
