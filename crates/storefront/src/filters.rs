//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use rust_decimal::Decimal;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Format a decimal amount as a dollar string with two decimal places.
///
/// Shared by the `price` filter and view structs that pre-format totals.
#[must_use]
pub fn money(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_money_two_decimal_places() {
        assert_eq!(money("4.5".parse().unwrap()), "$4.50");
        assert_eq!(money("12".parse().unwrap()), "$12.00");
        assert_eq!(money("3.999".parse().unwrap()), "$4.00");
    }
}
