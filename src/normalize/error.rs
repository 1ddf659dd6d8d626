use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    /// A balance record field could not be used. The whole call fails rather
    /// than coercing the value to zero.
    #[error("invalid {field} {value:?} in balance record {index}: {reason}")]
    InvalidInput {
        index: usize,
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid price {price} for {currency}: prices must be non-negative")]
    InvalidPrice { currency: String, price: Decimal },
}
