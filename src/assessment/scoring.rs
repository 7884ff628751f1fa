use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use crate::catalog::{Question, QuestionType};
use crate::normalize::decimal_from_json;

/// Raw, unweighted points for one answer. Missing or non-numeric input
/// contributes zero.
pub fn question_points(question: &Question, payload: Option<&Value>) -> Decimal {
    let Some(payload) = payload else {
        return Decimal::ZERO;
    };
    match question.kind {
        QuestionType::SingleChoice | QuestionType::Nps => scalar(payload)
            .and_then(option_key)
            .and_then(|key| question.options.iter().find(|o| o.value == key))
            .map(|option| option.points)
            .unwrap_or(Decimal::ZERO),
        QuestionType::MultiChoice => {
            let selected = selections(payload);
            checked_sum(
                question
                    .options
                    .iter()
                    .filter(|option| selected.contains(&option.value))
                    .map(|option| Some(option.points)),
            )
            .unwrap_or_else(|| overflowed(question))
        }
        QuestionType::Slider | QuestionType::Rating => scalar(payload)
            .and_then(decimal_from_json)
            .unwrap_or(Decimal::ZERO),
        QuestionType::MultiSlider => {
            let Some(Value::Object(values)) = payload.get("values") else {
                return Decimal::ZERO;
            };
            checked_sum(question.dimensions.iter().filter_map(|dim| {
                let amount = values.get(&dim.code).and_then(decimal_from_json)?;
                Some(
                    amount
                        .checked_mul(dim.points_per_unit)
                        .and_then(|p| p.checked_mul(dim.weight)),
                )
            }))
            .unwrap_or_else(|| overflowed(question))
        }
    }
}

pub fn max_points(question: &Question) -> Decimal {
    match question.kind {
        QuestionType::SingleChoice | QuestionType::Nps => question
            .options
            .iter()
            .map(|o| o.points)
            .max()
            .unwrap_or(Decimal::ZERO),
        QuestionType::MultiChoice => {
            checked_sum(question.options.iter().map(|o| Some(o.points)))
                .unwrap_or_else(|| overflowed(question))
        }
        QuestionType::Slider | QuestionType::Rating => question.scale_max(),
        QuestionType::MultiSlider => checked_sum(question.dimensions.iter().map(|d| {
            Decimal::from(d.max_value)
                .checked_mul(d.points_per_unit)
                .and_then(|p| p.checked_mul(d.weight))
        }))
        .unwrap_or_else(|| overflowed(question)),
    }
}

fn checked_sum(terms: impl Iterator<Item = Option<Decimal>>) -> Option<Decimal> {
    terms.fold(Some(Decimal::ZERO), |acc, term| acc?.checked_add(term?))
}

fn overflowed(question: &Question) -> Decimal {
    debug!(question = %question.code, "points overflowed, counted as zero");
    Decimal::ZERO
}

fn scalar(payload: &Value) -> Option<&Value> {
    match payload {
        Value::Object(map) => map.get("value"),
        other => Some(other),
    }
}

fn option_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn selections(payload: &Value) -> Vec<String> {
    let raw = match payload {
        Value::Object(map) => map.get("values").or_else(|| map.get("value")),
        other => Some(other),
    };
    match raw {
        Some(Value::Array(items)) => items.iter().filter_map(option_key).collect(),
        Some(single) => option_key(single).into_iter().collect(),
        None => Vec::new(),
    }
}
