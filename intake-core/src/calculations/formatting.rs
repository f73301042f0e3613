use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;
use tracing::warn;

use super::common::{group_thousands, round_half_up};

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid number '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Normalizes input for decimal parsing: trims whitespace and removes commas (thousands separator).
fn normalize_decimal_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses a plain numeric field (acreage, rates, years).
///
/// Handles comma as thousands separator (e.g. `"1,234.56"`).
/// Empty or whitespace-only input is treated as 0.
pub fn parse_number(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| {
        warn!(input = %s, "invalid number: {}", e);
        ParseDecimalError {
            input: s.to_string(),
            source: e,
        }
    })
}

/// Applies the currency keystroke rule to raw text.
///
/// Every non-digit character is dropped and the remaining digits are read as
/// a whole number of cents, so `"1234"` becomes `12.34` and `"$1,234.50"`
/// becomes `1234.50`. Returns `None` when there are no digits, or when the
/// digit string is too long to represent.
pub fn parse_currency_input(raw: &str) -> Option<Decimal> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    match digits.parse::<Decimal>() {
        Ok(cents) => Some(cents / Decimal::from(100)),
        Err(e) => {
            warn!(input = %raw, "currency input out of range: {}", e);
            None
        }
    }
}

/// Renders an amount with two decimals and `,` thousands separators.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = round_half_up(amount);
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{}.{cents}", group_thousands(whole))
}

/// What the currency input shows while the user types. No digits, no text.
pub fn format_currency_input(raw: &str) -> String {
    parse_currency_input(raw)
        .map(format_amount)
        .unwrap_or_default()
}

/// Display form of a stored amount. Zero and negative values render blank.
pub fn display_amount(amount: Decimal) -> String {
    if amount <= Decimal::ZERO {
        String::new()
    } else {
        format_amount(amount)
    }
}

/// Human-readable size: bytes under 1 KB, otherwise KB or MB with one decimal.
pub fn format_file_size(bytes: u64) -> String {
    if bytes < KIB {
        return format!("{bytes} B");
    }
    let (unit, divisor) = if bytes < MIB { ("KB", KIB) } else { ("MB", MIB) };
    let scaled = (Decimal::from(bytes) / Decimal::from(divisor))
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{scaled:.1} {unit}")
}
