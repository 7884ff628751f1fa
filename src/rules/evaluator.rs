use std::cmp::Ordering;
use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde_json::Value;
use tracing::trace;

use crate::assessment::AnswerMap;
use crate::normalize::decimal_from_json;
use crate::rules::{Condition, Operator, Rule};

/// Comparable view of a JSON value.
///
/// Stored answers are unwrapped before comparison: `{"value": x}` becomes
/// `x`, `{"values": [..]}` becomes a [`Operand::Set`] and
/// `{"values": {..}}` becomes a [`Operand::Map`].
#[derive(Debug, Clone)]
enum Operand {
    Null,
    Bool(bool),
    Number(Decimal),
    Text(String),
    List(Vec<Operand>),
    Set(Vec<Operand>),
    Map(BTreeMap<String, Operand>),
}

impl Operand {
    fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => decimal_from_json(value)
                .map(Self::Number)
                .unwrap_or_else(|| Self::Text(n.to_string())),
            Value::String(s) => Self::Text(s.clone()),
            Value::Array(items) => Self::List(items.iter().map(Self::from_json).collect()),
            Value::Object(map) => Self::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), Self::from_json(v)))
                    .collect(),
            ),
        }
    }

    fn from_answer(payload: Option<&Value>) -> Self {
        let Some(payload) = payload else {
            return Self::Null;
        };
        let inner = match payload {
            Value::Object(map) => map
                .get("value")
                .or_else(|| map.get("values"))
                .unwrap_or(payload),
            other => other,
        };
        match Self::from_json(inner) {
            Self::List(items) => {
                let mut set: Vec<Operand> = Vec::with_capacity(items.len());
                for item in items {
                    if !set.iter().any(|existing| loose_eq(existing, &item)) {
                        set.push(item);
                    }
                }
                Self::Set(set)
            }
            other => other,
        }
    }
}

pub fn evaluate(rule: &Rule, answers: &AnswerMap) -> bool {
    match rule {
        Rule::Permissive(raw) => {
            trace!(rule = %raw, "permissive rule passes");
            true
        }
        Rule::Leaf(condition) => evaluate_condition(condition, answers),
        Rule::All(children) => children.iter().all(|child| evaluate(child, answers)),
        Rule::Any(children) => children.iter().any(|child| evaluate(child, answers)),
        Rule::Not(inner) => !evaluate(inner, answers),
    }
}

pub fn evaluate_condition(condition: &Condition, answers: &AnswerMap) -> bool {
    let left = Operand::from_answer(answers.get(&condition.question));
    let right = Operand::from_json(&condition.value);
    apply(&left, &condition.op, &right)
}

fn apply(left: &Operand, op: &Operator, right: &Operand) -> bool {
    match op {
        Operator::Eq => loose_eq(left, right),
        Operator::Ne => !loose_eq(left, right),
        Operator::Gt => compare(left, right).is_some_and(|o| o == Ordering::Greater),
        Operator::Gte => compare(left, right).is_some_and(|o| o != Ordering::Less),
        Operator::Lt => compare(left, right).is_some_and(|o| o == Ordering::Less),
        Operator::Lte => compare(left, right).is_some_and(|o| o != Ordering::Greater),
        Operator::In => match right {
            Operand::List(items) | Operand::Set(items) => {
                items.iter().any(|item| loose_eq(left, item))
            }
            _ => false,
        },
        Operator::Nin => match right {
            Operand::List(items) | Operand::Set(items) => {
                !items.iter().any(|item| loose_eq(left, item))
            }
            _ => false,
        },
        Operator::Contains => contains(left, right),
        Operator::Unknown(name) => {
            trace!(operator = %name, "unsupported operator never matches");
            false
        }
    }
}

fn loose_eq(left: &Operand, right: &Operand) -> bool {
    match (left, right) {
        (Operand::Null, Operand::Null) => true,
        (Operand::Bool(a), Operand::Bool(b)) => a == b,
        (Operand::Number(a), Operand::Number(b)) => a == b,
        (Operand::Bool(b), Operand::Number(n)) | (Operand::Number(n), Operand::Bool(b)) => {
            *n == if *b { Decimal::ONE } else { Decimal::ZERO }
        }
        (Operand::Text(a), Operand::Text(b)) => a == b,
        (Operand::List(a), Operand::List(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| loose_eq(x, y))
        }
        (Operand::Set(a), Operand::Set(b)) => {
            a.len() == b.len() && a.iter().all(|x| b.iter().any(|y| loose_eq(x, y)))
        }
        (Operand::Map(a), Operand::Map(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(k, v)| b.get(k).is_some_and(|other| loose_eq(v, other)))
        }
        _ => false,
    }
}

/// Ordering is only defined between two numbers or two strings.
fn compare(left: &Operand, right: &Operand) -> Option<Ordering> {
    match (left, right) {
        (Operand::Number(a), Operand::Number(b)) => Some(a.cmp(b)),
        (Operand::Text(a), Operand::Text(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn contains(left: &Operand, right: &Operand) -> bool {
    match left {
        Operand::Map(entries) => match right {
            Operand::Map(expected) => expected
                .iter()
                .all(|(k, v)| entries.get(k).is_some_and(|actual| loose_eq(actual, v))),
            Operand::Text(key) => entries.contains_key(key),
            _ => false,
        },
        Operand::Set(items) | Operand::List(items) => {
            items.iter().any(|item| loose_eq(item, right))
        }
        Operand::Text(haystack) => match right {
            Operand::Text(needle) => haystack.contains(needle.as_str()),
            _ => false,
        },
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use crate::assessment::AnswerMap;
    use crate::rules::{evaluate, Rule};

    fn answers(pairs: &[(&str, Value)]) -> AnswerMap {
        pairs
            .iter()
            .map(|(code, payload)| (code.to_string(), payload.clone()))
            .collect()
    }

    fn check(rule: Value, answers: &AnswerMap) -> bool {
        evaluate(&Rule::parse(&rule), answers)
    }

    #[test]
    fn empty_and_malformed_rules_pass() {
        let empty = AnswerMap::new();
        assert!(check(json!({}), &empty));
        assert!(check(json!(null), &empty));
        assert!(check(json!({"q": "IMP_Q1", "val": "YES"}), &empty));
        assert!(check(json!({"op": "eq", "val": "YES"}), &empty));
        assert!(!check(json!({"q": "IMP_Q1", "op": "between", "val": 1}), &empty));
    }

    #[test]
    fn ordering_against_missing_answer_is_false() {
        let empty = AnswerMap::new();
        for op in ["gt", "gte", "lt", "lte"] {
            assert!(!check(json!({"q": "RET_Q3", "op": op, "val": 7}), &empty));
            assert!(!check(json!({"q": "RET_Q3", "op": op, "val": null}), &empty));
        }
        assert!(check(json!({"q": "RET_Q3", "op": "eq", "val": null}), &empty));
        assert!(check(json!({"q": "RET_Q3", "op": "eq"}), &empty));
        assert!(!check(json!({"q": "RET_Q3", "op": "eq", "val": 7}), &empty));
        assert!(check(json!({"q": "RET_Q3", "op": "ne", "val": 7}), &empty));
    }

    #[test]
    fn scalar_comparisons() {
        let a = answers(&[
            ("IMP_Q1", json!({"value": "YES"})),
            ("RET_Q3", json!({"value": 7})),
        ]);
        assert!(check(json!({"q": "IMP_Q1", "op": "eq", "val": "YES"}), &a));
        assert!(check(json!({"q": "RET_Q3", "op": "eq", "val": 7.0}), &a));
        assert!(check(json!({"q": "RET_Q3", "op": "gte", "val": 7}), &a));
        assert!(!check(json!({"q": "RET_Q3", "op": "gt", "val": 7}), &a));
        assert!(check(json!({"q": "RET_Q3", "op": "lt", "val": 10}), &a));
        assert!(!check(json!({"q": "RET_Q3", "op": "gt", "val": "5"}), &a));
        assert!(check(json!({"q": "IMP_Q1", "op": "gt", "val": "NO"}), &a));
    }

    #[test]
    fn membership_requires_list_on_the_right() {
        let a = answers(&[("RISK_Q2", json!({"value": "A"}))]);
        assert!(check(json!({"q": "RISK_Q2", "op": "in", "val": ["A", "B"]}), &a));
        assert!(!check(json!({"q": "RISK_Q2", "op": "in", "val": "AB"}), &a));
        assert!(!check(json!({"q": "RISK_Q2", "op": "nin", "val": ["A", "B"]}), &a));
        assert!(check(json!({"q": "RISK_Q2", "op": "nin", "val": ["C"]}), &a));
        assert!(!check(json!({"q": "RISK_Q2", "op": "nin", "val": "C"}), &a));
    }

    #[test]
    fn contains_is_polymorphic() {
        let a = answers(&[
            ("RISK_Q1", json!({"values": ["OP", "FIN", "OP"]})),
            ("IMP_Q4", json!({"values": {"reach": 5, "depth": 7}})),
            ("ORG_NAME", json!({"value": "Green Fields Trust"})),
        ]);
        assert!(check(json!({"q": "RISK_Q1", "op": "contains", "val": "FIN"}), &a));
        assert!(!check(json!({"q": "RISK_Q1", "op": "contains", "val": "LEGAL"}), &a));
        assert!(check(json!({"q": "IMP_Q4", "op": "contains", "val": "reach"}), &a));
        assert!(check(json!({"q": "IMP_Q4", "op": "contains", "val": {"reach": 5}}), &a));
        assert!(!check(json!({"q": "IMP_Q4", "op": "contains", "val": {"reach": 6}}), &a));
        assert!(!check(json!({"q": "IMP_Q4", "op": "contains", "val": {"width": 1}}), &a));
        assert!(check(json!({"q": "ORG_NAME", "op": "contains", "val": "Fields"}), &a));
        assert!(!check(json!({"q": "ORG_NAME", "op": "contains", "val": 5}), &a));
        assert!(!check(json!({"q": "MISSING", "op": "contains", "val": "x"}), &a));
    }

    #[test]
    fn multi_choice_answers_compare_as_sets() {
        let a = answers(&[("RISK_Q1", json!({"values": ["FIN", "OP"]}))]);
        assert!(!check(json!({"q": "RISK_Q1", "op": "eq", "val": ["OP", "FIN"]}), &a));
        assert!(check(json!({"q": "RISK_Q1", "op": "ne", "val": ["OP", "FIN"]}), &a));
    }

    #[test]
    fn combinators_follow_boolean_logic() {
        let a = answers(&[
            ("IMP_Q1", json!({"value": "YES"})),
            ("RET_Q3", json!({"value": 4})),
        ]);
        let yes = json!({"q": "IMP_Q1", "op": "eq", "val": "YES"});
        let high = json!({"q": "RET_Q3", "op": "gte", "val": 7});
        assert!(!check(json!({"all": [yes.clone(), high.clone()]}), &a));
        assert!(check(json!({"any": [yes.clone(), high.clone()]}), &a));
        assert!(check(json!({"not": high}), &a));
        assert!(check(json!({"all": []}), &a));
        assert!(!check(json!({"any": []}), &a));
        assert!(!check(json!({"not": {}}), &a));
    }
}
