//! Price text parsing for cross-store comparison.
//!
//! Store pages show prices in Ukrainian retail formatting: a comma decimal
//! separator, optional space (or NBSP / narrow NBSP) thousands separators
//! and a hryvnia sign or abbreviation, e.g. `"1 234,50 ₴"` or `"899 грн."`.
//! A dot-decimal price without thousands separators (`"24.99 $"`) also
//! parses. Comma thousands separators (`"1,234.50"`) are not supported.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Currency markers removed before parsing. Longer tokens come first so
/// `"грн."` is removed before `"грн"`.
const CURRENCY_TOKENS: [&str; 8] = ["грн.", "грн", "uah", "₴", "$", "€", "£", "zł"];

/// Parses a scraped price string into a decimal amount.
///
/// Returns `None` when the text does not reduce to a number, for example
/// the `"unknown"` placeholder or `"Невідомо"`.
#[must_use]
pub fn parse_price(text: &str) -> Option<Decimal> {
    let mut cleaned = text.to_lowercase();
    for token in CURRENCY_TOKENS {
        cleaned = cleaned.replace(token, "");
    }

    let cleaned: String = cleaned
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(&cleaned).ok()
}
