use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::NormalizeError;

fn normalize_currency(currency: &str) -> String {
    currency.trim().to_uppercase()
}

/// USD unit price per currency.
///
/// Keys are stored trimmed and upper-cased, so `"swth"` and `"SWTH"` refer to
/// the same entry. A missing entry reads as price zero ("unpriced").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, Decimal>",
    into = "BTreeMap<String, Decimal>"
)]
pub struct PriceTable {
    prices: BTreeMap<String, Decimal>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table, rejecting negative prices. Later duplicates win.
    pub fn from_entries<I, S>(entries: I) -> Result<Self, NormalizeError>
    where
        I: IntoIterator<Item = (S, Decimal)>,
        S: AsRef<str>,
    {
        let mut table = Self::new();
        for (currency, price) in entries {
            table.try_insert(currency.as_ref(), price)?;
        }
        Ok(table)
    }

    pub fn try_insert(&mut self, currency: &str, price: Decimal) -> Result<(), NormalizeError> {
        if price.is_sign_negative() && !price.is_zero() {
            return Err(NormalizeError::InvalidPrice {
                currency: currency.to_string(),
                price,
            });
        }
        self.prices.insert(normalize_currency(currency), price);
        Ok(())
    }

    pub fn get(&self, currency: &str) -> Option<Decimal> {
        self.prices.get(&normalize_currency(currency)).copied()
    }

    /// Price for `currency`, zero when unknown.
    pub fn price_of(&self, currency: &str) -> Decimal {
        self.get(currency).unwrap_or(Decimal::ZERO)
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Entries in currency order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.prices.iter().map(|(c, p)| (c.as_str(), *p))
    }
}

impl TryFrom<BTreeMap<String, Decimal>> for PriceTable {
    type Error = NormalizeError;

    fn try_from(value: BTreeMap<String, Decimal>) -> Result<Self, Self::Error> {
        Self::from_entries(value)
    }
}

impl From<PriceTable> for BTreeMap<String, Decimal> {
    fn from(value: PriceTable) -> Self {
        value.prices
    }
}
