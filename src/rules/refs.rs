use std::collections::BTreeSet;

use serde_json::Value;

use crate::rules::{Operator, Rule};

/// Question codes a rule tree mentions, including those inside malformed
/// nodes that evaluate permissively.
pub fn referenced_questions(rule: &Rule) -> BTreeSet<String> {
    let mut refs = BTreeSet::new();
    collect(rule, &mut refs);
    refs
}

pub fn unknown_operators(rule: &Rule) -> BTreeSet<String> {
    match rule {
        Rule::Leaf(condition) => match &condition.op {
            Operator::Unknown(name) => BTreeSet::from([name.clone()]),
            _ => BTreeSet::new(),
        },
        Rule::All(children) | Rule::Any(children) => {
            children.iter().flat_map(unknown_operators).collect()
        }
        Rule::Not(inner) => unknown_operators(inner),
        Rule::Permissive(_) => BTreeSet::new(),
    }
}

fn collect(rule: &Rule, refs: &mut BTreeSet<String>) {
    match rule {
        Rule::Leaf(condition) => {
            refs.insert(condition.question.clone());
        }
        Rule::All(children) | Rule::Any(children) => {
            for child in children {
                collect(child, refs);
            }
        }
        Rule::Not(inner) => collect(inner, refs),
        Rule::Permissive(raw) => collect_raw(raw, refs),
    }
}

fn collect_raw(value: &Value, refs: &mut BTreeSet<String>) {
    let Value::Object(node) = value else {
        return;
    };
    if let Some(Value::String(code)) = node.get("q") {
        if !code.is_empty() {
            refs.insert(code.clone());
        }
    }
    for key in ["all", "any"] {
        if let Some(Value::Array(children)) = node.get(key) {
            for child in children {
                collect_raw(child, refs);
            }
        }
    }
    if let Some(inner) = node.get("not") {
        collect_raw(inner, refs);
    }
}
