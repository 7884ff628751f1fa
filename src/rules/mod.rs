pub mod evaluator;
pub mod refs;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub use evaluator::evaluate;
pub use refs::{referenced_questions, unknown_operators};

/// Branching condition attached to a question.
///
/// Rules are authored as JSON trees (`{"q", "op", "val"}` leaves combined
/// with `all`, `any` and `not`). Anything that does not parse into one of
/// those shapes becomes [`Rule::Permissive`], which always evaluates to
/// true: an authoring mistake makes a question visible instead of hiding it
/// or failing the submission. The authored JSON is kept so the rule
/// serializes back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum Rule {
    Permissive(Value),
    Leaf(Condition),
    All(Vec<Rule>),
    Any(Vec<Rule>),
    Not(Box<Rule>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub question: String,
    pub op: Operator,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    Nin,
    Contains,
    /// Named but unsupported; never matches.
    Unknown(String),
}

impl Operator {
    pub const SUPPORTED: [Operator; 9] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::In,
        Operator::Nin,
        Operator::Contains,
    ];

    /// Lenient parse used for authored rules: unsupported names are kept
    /// as [`Operator::Unknown`].
    pub fn parse(name: &str) -> Self {
        name.parse()
            .unwrap_or_else(|OperatorParseError(name)| Self::Unknown(name))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::In => "in",
            Self::Nin => "nin",
            Self::Contains => "contains",
            Self::Unknown(name) => name,
        }
    }
}

#[derive(Debug, Error)]
#[error("unsupported rule operator: {0}")]
pub struct OperatorParseError(pub String);

impl FromStr for Operator {
    type Err = OperatorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::SUPPORTED
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| OperatorParseError(s.to_string()))
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Rule {
    pub fn leaf(question: impl Into<String>, op: Operator, value: Value) -> Self {
        Self::Leaf(Condition {
            question: question.into(),
            op,
            value,
        })
    }

    pub fn parse(value: &Value) -> Self {
        let Value::Object(node) = value else {
            return Self::Permissive(value.clone());
        };
        if node.is_empty() {
            return Self::Permissive(value.clone());
        }

        if let Some(children) = node.get("all") {
            return match children {
                Value::Array(items) => Self::All(items.iter().map(Self::parse).collect()),
                _ => Self::Permissive(value.clone()),
            };
        }
        if let Some(children) = node.get("any") {
            return match children {
                Value::Array(items) => Self::Any(items.iter().map(Self::parse).collect()),
                _ => Self::Permissive(value.clone()),
            };
        }
        if let Some(inner) = node.get("not") {
            return Self::Not(Box::new(Self::parse(inner)));
        }

        let question = node.get("q").and_then(Value::as_str).unwrap_or_default();
        let op = node.get("op").and_then(Value::as_str).unwrap_or_default();
        if question.is_empty() || op.is_empty() {
            return Self::Permissive(value.clone());
        }
        Self::leaf(
            question,
            Operator::parse(op),
            node.get("val").cloned().unwrap_or(Value::Null),
        )
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Permissive(raw) => raw.clone(),
            Self::Leaf(condition) => {
                let mut node = Map::new();
                node.insert("q".to_string(), Value::String(condition.question.clone()));
                node.insert("op".to_string(), Value::String(condition.op.to_string()));
                node.insert("val".to_string(), condition.value.clone());
                Value::Object(node)
            }
            Self::All(items) => combinator("all", items),
            Self::Any(items) => combinator("any", items),
            Self::Not(inner) => {
                let mut node = Map::new();
                node.insert("not".to_string(), inner.to_value());
                Value::Object(node)
            }
        }
    }
}

fn combinator(key: &str, items: &[Rule]) -> Value {
    let mut node = Map::new();
    node.insert(
        key.to_string(),
        Value::Array(items.iter().map(Rule::to_value).collect()),
    );
    Value::Object(node)
}

impl From<Value> for Rule {
    fn from(value: Value) -> Self {
        Self::parse(&value)
    }
}

impl From<Rule> for Value {
    fn from(rule: Rule) -> Self {
        rule.to_value()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::rules::{Operator, Rule};

    #[test]
    fn parses_leaves_and_combinators() {
        let rule = Rule::parse(&json!({
            "all": [
                {"q": "IMP_Q1", "op": "eq", "val": "YES"},
                {"not": {"q": "RISK_Q2", "op": "in", "val": ["A", "B"]}}
            ]
        }));
        let Rule::All(children) = &rule else {
            panic!("expected all combinator, got {rule:?}");
        };
        assert_eq!(children.len(), 2);
        assert!(matches!(&children[0], Rule::Leaf(c) if c.op == Operator::Eq));
        assert!(matches!(&children[1], Rule::Not(_)));
    }

    #[test]
    fn malformed_shapes_become_permissive() {
        assert!(matches!(Rule::parse(&json!({})), Rule::Permissive(_)));
        assert!(matches!(Rule::parse(&json!(null)), Rule::Permissive(_)));
        assert!(matches!(
            Rule::parse(&json!({"q": "IMP_Q1", "val": 3})),
            Rule::Permissive(_)
        ));
        assert!(matches!(
            Rule::parse(&json!({"op": "eq", "val": 3})),
            Rule::Permissive(_)
        ));
        assert!(matches!(
            Rule::parse(&json!({"all": {"q": "IMP_Q1"}})),
            Rule::Permissive(_)
        ));
    }

    #[test]
    fn unknown_operator_is_kept_by_name() {
        let rule = Rule::parse(&json!({"q": "IMP_Q1", "op": "between", "val": [1, 2]}));
        assert!(matches!(&rule, Rule::Leaf(c) if c.op == Operator::Unknown("between".into())));
    }

    #[test]
    fn strict_parse_rejects_unsupported_names() {
        assert_eq!("nin".parse::<Operator>().expect("nin is supported"), Operator::Nin);
        let err = "between".parse::<Operator>().expect_err("between is unsupported");
        assert_eq!(err.0, "between");
    }

    #[test]
    fn serde_round_trips_authored_json() {
        let raw = json!({"any": [{"q": "RET_Q3", "op": "gte", "val": 7}, {"oops": true}]});
        let rule: Rule = serde_json::from_value(raw.clone()).expect("rule should deserialize");
        assert_eq!(serde_json::to_value(&rule).expect("rule should serialize"), raw);
    }
}
