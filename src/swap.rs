//! Currency swap quoting and the swap form's token selector state.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::normalize::PriceTable;

/// Which side of the swap form a token selector edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapField {
    Send,
    Receive,
}

/// Token selector dialog state: closed, or open for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectorState {
    #[default]
    Closed,
    Open { target: SwapField },
}

impl SelectorState {
    pub fn open(target: SwapField) -> Self {
        SelectorState::Open { target }
    }

    pub fn close(self) -> Self {
        SelectorState::Closed
    }

    pub fn is_open(&self) -> bool {
        matches!(self, SelectorState::Open { .. })
    }

    pub fn target(&self) -> Option<SwapField> {
        match self {
            SelectorState::Open { target } => Some(*target),
            SelectorState::Closed => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SwapError {
    #[error("invalid amount {0:?}")]
    InvalidAmount(String),

    #[error("amount must be greater than zero")]
    NonPositiveAmount,

    #[error("cannot swap {0} for itself")]
    SameCurrency(String),

    #[error("no price available for {0}")]
    MissingPrice(String),
}

/// What the user typed into the swap form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRequest {
    pub from: String,
    pub to: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapQuote {
    pub from: String,
    pub to: String,
    pub send_amount: Decimal,
    pub receive_amount: Decimal,
    /// Units of `to` received per unit of `from`.
    pub rate: Decimal,
}

impl SwapRequest {
    pub fn new(from: impl Into<String>, to: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            amount: amount.into(),
        }
    }

    /// Price the swap through USD. Unlike normalization, a missing or zero
    /// price is an error here since no meaningful quote exists.
    pub fn quote(&self, prices: &PriceTable) -> Result<SwapQuote, SwapError> {
        let send_amount = Decimal::from_str(self.amount.trim())
            .map_err(|_| SwapError::InvalidAmount(self.amount.clone()))?;
        if send_amount <= Decimal::ZERO {
            return Err(SwapError::NonPositiveAmount);
        }

        let from = self.from.trim().to_uppercase();
        let to = self.to.trim().to_uppercase();
        if from == to {
            return Err(SwapError::SameCurrency(from));
        }

        let from_price = usable_price(prices, &from)?;
        let to_price = usable_price(prices, &to)?;

        let rate = from_price
            .checked_div(to_price)
            .ok_or_else(|| SwapError::MissingPrice(to.clone()))?;
        let receive_amount = send_amount
            .checked_mul(rate)
            .ok_or_else(|| SwapError::InvalidAmount(self.amount.clone()))?;

        Ok(SwapQuote {
            from,
            to,
            send_amount,
            receive_amount,
            rate,
        })
    }
}

fn usable_price(prices: &PriceTable, currency: &str) -> Result<Decimal, SwapError> {
    match prices.get(currency) {
        Some(price) if price > Decimal::ZERO => Ok(price),
        _ => Err(SwapError::MissingPrice(currency.to_string())),
    }
}
