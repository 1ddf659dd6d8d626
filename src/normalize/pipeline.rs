use std::cmp::Ordering;
use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::debug;

use super::{NormalizeError, PriceTable, PriorityTable};
use crate::format::try_format_fixed;
use crate::models::{BalanceRecord, EnrichedBalance};

pub const DEFAULT_AMOUNT_DECIMALS: u32 = 2;

/// Orders balances by descending priority.
///
/// Equal priorities compare `Equal`; with a stable sort this keeps tied
/// balances in input order.
pub fn compare_by_priority(a: &EnrichedBalance, b: &EnrichedBalance) -> Ordering {
    b.priority.cmp(&a.priority)
}

/// Normalize with default options (amounts formatted to 2 decimal places).
pub fn normalize(
    records: &[BalanceRecord],
    prices: &PriceTable,
    priorities: &PriorityTable,
) -> Result<Vec<EnrichedBalance>, NormalizeError> {
    Normalizer::default().normalize(records, prices, priorities)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalizer {
    amount_decimals: u32,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            amount_decimals: DEFAULT_AMOUNT_DECIMALS,
        }
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_amount_decimals(mut self, dp: u32) -> Self {
        self.amount_decimals = dp;
        self
    }

    pub fn amount_decimals(&self) -> u32 {
        self.amount_decimals
    }

    /// Turn raw wallet balances into the ordered, display-ready list.
    ///
    /// Every record is validated first, including ones the filter would drop,
    /// so a malformed snapshot fails as a whole. Only strictly positive amounts
    /// are kept.
    pub fn normalize(
        &self,
        records: &[BalanceRecord],
        prices: &PriceTable,
        priorities: &PriorityTable,
    ) -> Result<Vec<EnrichedBalance>, NormalizeError> {
        let mut enriched = Vec::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            let amount = parse_record(index, record)?;
            if amount <= Decimal::ZERO {
                continue;
            }

            let invalid_amount = |reason: String| NormalizeError::InvalidInput {
                index,
                field: "amount",
                value: record.amount.clone(),
                reason,
            };

            let formatted_amount = try_format_fixed(amount, self.amount_decimals).ok_or_else(|| {
                invalid_amount(format!(
                    "cannot be shown with {} decimal places",
                    self.amount_decimals
                ))
            })?;

            let price = prices.price_of(&record.currency);
            let usd_value = amount
                .checked_mul(price)
                .ok_or_else(|| invalid_amount(format!("USD value at price {price} overflows")))?;

            enriched.push(EnrichedBalance {
                currency: record.currency.clone(),
                amount,
                chain: record.chain.clone(),
                priority: priorities.resolve(&record.chain),
                formatted_amount,
                usd_value,
            });
        }

        enriched.sort_by(compare_by_priority);

        debug!(
            records = records.len(),
            kept = enriched.len(),
            priced = prices.len(),
            "normalized balances"
        );

        Ok(enriched)
    }
}

fn parse_record(index: usize, record: &BalanceRecord) -> Result<Decimal, NormalizeError> {
    let invalid = |field: &'static str, value: &str, reason: String| NormalizeError::InvalidInput {
        index,
        field,
        value: value.to_string(),
        reason,
    };

    if record.currency.trim().is_empty() {
        return Err(invalid("currency", &record.currency, "must not be blank".to_string()));
    }
    if record.chain.trim().is_empty() {
        return Err(invalid("chain", &record.chain, "must not be blank".to_string()));
    }

    Decimal::from_str(record.amount.trim())
        .map_err(|e| invalid("amount", &record.amount, e.to_string()))
}
