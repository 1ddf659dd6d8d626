#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use balancebook::market_data::{PriceQuote, PriceSource};
use balancebook::models::BalanceRecord;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

pub fn record(currency: &str, amount: &str, chain: &str) -> BalanceRecord {
    BalanceRecord::new(currency, amount, chain)
}

pub fn price_quote(currency: &str, price: &str, timestamp: DateTime<Utc>) -> PriceQuote {
    PriceQuote {
        currency: currency.to_string(),
        price: price.parse::<Decimal>().expect("valid decimal"),
        timestamp,
        source: "mock".to_string(),
    }
}

/// Price source that fails a configurable number of times before answering.
pub struct MockPriceSource {
    quotes: Mutex<Vec<PriceQuote>>,
    failures_remaining: AtomicU32,
    calls: AtomicU32,
}

impl MockPriceSource {
    pub fn new(quotes: Vec<PriceQuote>) -> Self {
        Self {
            quotes: Mutex::new(quotes),
            failures_remaining: AtomicU32::new(0),
            calls: AtomicU32::new(0),
        }
    }

    pub fn failing(self, times: u32) -> Self {
        self.failures_remaining.store(times, Ordering::SeqCst);
        self
    }

    pub fn fail_next(&self, times: u32) {
        self.failures_remaining.store(times, Ordering::SeqCst);
    }

    pub fn set_quotes(&self, quotes: Vec<PriceQuote>) {
        *self.quotes.lock().expect("quotes lock") = quotes;
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PriceSource for MockPriceSource {
    async fn fetch_prices(&self) -> Result<Vec<PriceQuote>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failures_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_remaining.store(remaining - 1, Ordering::SeqCst);
            anyhow::bail!("mock upstream unavailable");
        }
        let quotes = self.quotes.lock().expect("quotes lock").clone();
        Ok(quotes)
    }

    fn name(&self) -> &str {
        "mock"
    }
}
