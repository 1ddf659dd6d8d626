use serde::{Deserialize, Serialize};

/// One wallet balance as reported by the balance source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRecord {
    /// Ticker symbol, e.g. `SWTH`.
    pub currency: String,
    /// Amount as string to avoid floating point precision issues.
    /// Zero and negative values are legal input.
    pub amount: String,
    /// Ledger/network the balance lives on, e.g. `Ethereum`.
    pub chain: String,
}

impl BalanceRecord {
    pub fn new(
        currency: impl Into<String>,
        amount: impl Into<String>,
        chain: impl Into<String>,
    ) -> Self {
        Self {
            currency: currency.into(),
            amount: amount.into(),
            chain: chain.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_wallet_json() {
        let json = r#"{"currency":"SWTH","amount":"10.5","chain":"Zilliqa"}"#;
        let record: BalanceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record, BalanceRecord::new("SWTH", "10.5", "Zilliqa"));
    }
}
