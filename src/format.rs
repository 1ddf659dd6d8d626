use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::DisplayConfig;

/// Most fractional digits a `Decimal` can carry.
pub const MAX_DECIMAL_PLACES: u32 = 28;

fn round_fixed(value: Decimal, dp: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded
}

/// Round `value` half away from zero to `dp` decimal places.
///
/// `10` becomes `"10.00"` and `1.005` becomes `"1.01"` for `dp = 2`. A value
/// that rounds to zero is rendered without a sign. Values too wide to carry
/// `dp` fractional digits keep as many as fit; use [`try_format_fixed`] when
/// the width is part of the contract.
pub fn format_fixed(value: Decimal, dp: u32) -> String {
    round_fixed(value, dp).to_string()
}

/// Like [`format_fixed`], but `None` unless the result has exactly `dp`
/// fractional digits.
pub fn try_format_fixed(value: Decimal, dp: u32) -> Option<String> {
    let rounded = round_fixed(value, dp);
    (rounded.scale() == dp).then(|| rounded.to_string())
}

fn group_thousands(int_digits: &str) -> String {
    let len = int_digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in int_digits.chars().enumerate() {
        out.push(ch);
        let remaining = len - i - 1;
        if remaining > 0 && remaining % 3 == 0 {
            out.push(',');
        }
    }
    out
}

/// Format a USD value for human display using the display settings.
///
/// Canonical JSON fields never go through this; it is for CLI tables and UI
/// surfaces only.
pub fn format_usd_display(value: Decimal, display: &DisplayConfig) -> String {
    let fixed = format_fixed(value, display.usd_decimals);
    let (negative, digits) = match fixed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, fixed.as_str()),
    };

    let body = if display.grouping {
        match digits.split_once('.') {
            Some((int_part, frac)) => format!("{}.{frac}", group_thousands(int_part)),
            None => group_thousands(digits),
        }
    } else {
        digits.to_string()
    };

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    if let Some(sym) = &display.usd_symbol {
        out.push_str(sym);
    }
    out.push_str(&body);
    out
}
