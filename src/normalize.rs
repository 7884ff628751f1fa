use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

pub fn normalize_percent(value: Decimal) -> Decimal {
    value.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
}

pub fn round_score(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

/// `part / whole * 100`, saturating on overflow, or `None` when `whole` is
/// not positive.
pub fn ratio_percent(part: Decimal, whole: Decimal) -> Option<Decimal> {
    if whole <= Decimal::ZERO {
        return None;
    }
    let saturated = if part.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    };
    let percent = part
        .checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED));
    Some(percent.unwrap_or(saturated))
}

pub fn weighted_share(value: Decimal, weight: Decimal) -> Option<Decimal> {
    value
        .checked_mul(weight)?
        .checked_div(Decimal::ONE_HUNDRED)
}

pub fn renormalize(total: Decimal, weights_sum: Decimal) -> Option<Decimal> {
    if weights_sum <= Decimal::ZERO {
        return None;
    }
    total.checked_div(weights_sum.checked_div(Decimal::ONE_HUNDRED)?)
}

pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

pub fn decimal_from_json(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s),
        _ => None,
    }
}

pub fn score_floor(value: Decimal) -> i64 {
    value.trunc().to_i64().unwrap_or(0)
}
