//! Exact decimal parsing and monetary rounding.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::BillingError;

/// Unsigned number with either `.` or `,` as the fractional separator.
pub const NUMBER_PATTERN: &str = r"[0-9]+(?:[.,][0-9]+)?";

/// Same as [`NUMBER_PATTERN`] with an optional leading minus.
pub const SIGNED_NUMBER_PATTERN: &str = r"-?[0-9]+(?:[.,][0-9]+)?";

/// Money is kept in kopecks.
const MONEY_SCALE: u32 = 2;

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{NUMBER_PATTERN}$")).unwrap());

/// Normalize `59,8` or `59.8` into an exact decimal.
///
/// Surrounding whitespace is ignored. Anything else than digits with at most one fractional part
/// is rejected, including signs and exponents. So are values which cannot be represented exactly.
pub fn normalize(value: &str) -> Result<Decimal, BillingError> {
    let value = value.trim();
    if !NUMBER.is_match(value) {
        return Err(BillingError::MalformedNumber(value.to_owned()));
    }
    Decimal::from_str_exact(&value.replace(',', "."))
        .map_err(|_| BillingError::MalformedNumber(value.to_owned()))
}

/// Like [`normalize`], but accepts a leading `-`.
pub fn normalize_signed(value: &str) -> Result<Decimal, BillingError> {
    let value = value.trim();
    match value.strip_prefix('-') {
        Some(magnitude) => normalize(magnitude).map(|magnitude| -magnitude),
        None => normalize(value),
    }
}

/// Round half away from zero to kopecks, always keeping exactly two fractional digits.
#[must_use]
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}
