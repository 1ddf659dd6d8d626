//! HTTP price list provider.
//!
//! Fetches a JSON array of `{ "currency", "date", "price" }` objects, the
//! format published by the wallet's token price endpoint. A currency can
//! appear several times with different dates.

use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::market_data::{PriceQuote, PriceSource, DEFAULT_PRICE_LIST_URL};

#[derive(Debug, Deserialize)]
struct PriceListEntry {
    currency: String,
    date: DateTime<Utc>,
    price: serde_json::Number,
}

pub struct HttpPriceListSource {
    client: reqwest::Client,
    url: String,
}

impl HttpPriceListSource {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            url: DEFAULT_PRICE_LIST_URL.to_string(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for HttpPriceListSource {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_price(number: &serde_json::Number) -> Option<Decimal> {
    let raw = number.to_string();
    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .ok()
}

/// Convert raw entries into quotes, skipping unusable prices.
fn entries_to_quotes(entries: Vec<PriceListEntry>, source: &str) -> Vec<PriceQuote> {
    let mut quotes = Vec::with_capacity(entries.len());
    for entry in entries {
        match parse_price(&entry.price) {
            Some(price) if !price.is_sign_negative() || price.is_zero() => {
                quotes.push(PriceQuote {
                    currency: entry.currency,
                    price,
                    timestamp: entry.date,
                    source: source.to_string(),
                });
            }
            _ => {
                warn!(
                    currency = %entry.currency,
                    price = %entry.price,
                    "Skipping unusable price list entry"
                );
            }
        }
    }
    quotes
}

#[async_trait::async_trait]
impl PriceSource for HttpPriceListSource {
    async fn fetch_prices(&self) -> Result<Vec<PriceQuote>> {
        debug!(url = %self.url, "fetching price list");

        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .header("User-Agent", concat!("balancebook/", env!("CARGO_PKG_VERSION")))
            .send()
            .await
            .with_context(|| format!("Failed to request price list from {}", self.url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Price list API error: {} - {}", status, body));
        }

        let entries: Vec<PriceListEntry> = response
            .json()
            .await
            .context("Failed to parse price list response")?;

        Ok(entries_to_quotes(entries, self.name()))
    }

    fn name(&self) -> &str {
        "price-list"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RESPONSE: &str = r#"[
        {"currency":"BLUR","date":"2023-08-29T07:10:40.000Z","price":0.2081152},
        {"currency":"USD","date":"2023-08-29T07:10:30.000Z","price":1},
        {"currency":"SWTH","date":"2023-08-29T07:10:52.000Z","price":0.004039850455012084},
        {"currency":"BAD","date":"2023-08-29T07:10:52.000Z","price":-3.5}
    ]"#;

    #[test]
    fn parses_sample_response() {
        let entries: Vec<PriceListEntry> = serde_json::from_str(SAMPLE_RESPONSE).unwrap();
        let quotes = entries_to_quotes(entries, "price-list");

        assert_eq!(quotes.len(), 3);
        assert_eq!(quotes[0].currency, "BLUR");
        assert_eq!(quotes[0].price, Decimal::from_str("0.2081152").unwrap());
        assert_eq!(quotes[1].price, Decimal::ONE);
        assert_eq!(quotes[2].timestamp.to_rfc3339(), "2023-08-29T07:10:52+00:00");
    }

    #[test]
    fn parses_scientific_notation() {
        let n: serde_json::Number = serde_json::from_str("1.5e-7").unwrap();
        assert_eq!(parse_price(&n), Some(Decimal::from_str("0.00000015").unwrap()));
    }

    #[test]
    fn defaults() {
        let source = HttpPriceListSource::default();
        assert_eq!(source.url(), DEFAULT_PRICE_LIST_URL);
        assert_eq!(source.name(), "price-list");
    }
}
