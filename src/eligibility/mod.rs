pub mod evaluator;
pub mod service;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use evaluator::{evaluate_eligibility, evaluate_gate};
pub use service::eligibility_check;

pub const REASON_NO_SCORES: &str = "Scores not available";
pub const REASON_NO_WEIGHTS: &str = "No applicable rules or weights defined.";
pub const REASON_GATES_FAILED: &str = "One or more section gates failed.";

pub fn below_threshold_reason(threshold: Decimal) -> String {
    format!("Overall score below threshold {threshold:.1}.")
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EligibilityResult {
    pub assessment_id: String,
    pub overall_score: Decimal,
    pub is_eligible: bool,
    pub matched_instrument: Option<String>,
    pub details: EligibilityDetails,
    pub evaluated_at: DateTime<Utc>,
}

impl EligibilityResult {
    pub fn passed_count(&self) -> usize {
        self.details.sections.values().filter(|g| g.gate_pass).count()
    }

    pub fn failed_count(&self) -> usize {
        self.details
            .sections
            .len()
            .saturating_sub(self.passed_count())
    }

    pub fn reason(&self) -> Option<&str> {
        self.details.reason.as_deref()
    }
}

/// Audit record of one evaluation. Replaced wholesale on every check.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EligibilityDetails {
    pub sections: BTreeMap<String, SectionGate>,
    pub overall_threshold: Decimal,
    pub weights_sum: Decimal,
    pub total_weighted: Decimal,
    pub all_gates_pass: bool,
    pub reason: Option<String>,
    pub catalog_fingerprint: String,
}

impl EligibilityDetails {
    pub fn normalized_or_zero(&self, section: &str) -> Decimal {
        self.sections
            .get(section)
            .and_then(|gate| gate.normalized)
            .unwrap_or(Decimal::ZERO)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectionGate {
    pub normalized: Option<Decimal>,
    pub min_threshold: Decimal,
    pub max_threshold: Decimal,
    pub weight: Decimal,
    pub gate_pass: bool,
    pub contribution: Decimal,
    #[serde(default)]
    pub criteria: Value,
    #[serde(default)]
    pub recommendation: String,
}
