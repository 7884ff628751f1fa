use chrono::Utc;
use rust_decimal::Decimal;
use tracing::debug;

use crate::assessment::ScoreResult;
use crate::catalog::{Catalog, EligibilityRule};
use crate::eligibility::{
    below_threshold_reason, EligibilityDetails, EligibilityResult, SectionGate,
    REASON_GATES_FAILED, REASON_NO_SCORES, REASON_NO_WEIGHTS,
};
use crate::normalize::{normalize_percent, renormalize, round_score, weighted_share};

/// Applies every eligibility rule to the section scores. Never fails: absent
/// scores, absent rules and zero weights all resolve to an ineligible result
/// carrying a reason.
pub fn evaluate_eligibility(
    assessment_id: &str,
    scores: Option<&ScoreResult>,
    catalog: &Catalog,
    overall_threshold: Decimal,
) -> EligibilityResult {
    let mut details = EligibilityDetails {
        overall_threshold,
        catalog_fingerprint: catalog.fingerprint.clone(),
        ..EligibilityDetails::default()
    };

    let Some(scores) = scores.filter(|s| !s.sections.is_empty()) else {
        details.reason = Some(REASON_NO_SCORES.to_string());
        return EligibilityResult {
            assessment_id: assessment_id.to_string(),
            overall_score: Decimal::ZERO,
            is_eligible: false,
            matched_instrument: None,
            details,
            evaluated_at: Utc::now(),
        };
    };

    for rule in catalog.rules_in_order() {
        let gate = evaluate_gate(rule, scores.section(&rule.section));
        if gate.normalized.is_some() && rule.weight > Decimal::ZERO {
            let totals = details
                .total_weighted
                .checked_add(gate.contribution)
                .zip(details.weights_sum.checked_add(rule.weight));
            match totals {
                Some((total, weights_sum)) => {
                    details.total_weighted = total;
                    details.weights_sum = weights_sum;
                }
                None => debug!(section = %rule.section, "weighted total overflowed, skipped"),
            }
        }
        if !gate.gate_pass {
            debug!(section = %rule.section, score = ?gate.normalized, "section gate failed");
        }
        details.sections.insert(rule.section.clone(), gate);
    }
    details.all_gates_pass = details.sections.values().all(|gate| gate.gate_pass);

    let overall_score = renormalize(details.total_weighted, details.weights_sum)
        .map(|overall| round_score(normalize_percent(overall)))
        .unwrap_or(Decimal::ZERO);

    details.reason = if details.weights_sum <= Decimal::ZERO {
        Some(REASON_NO_WEIGHTS.to_string())
    } else if !details.all_gates_pass {
        Some(REASON_GATES_FAILED.to_string())
    } else if overall_score < overall_threshold {
        Some(below_threshold_reason(overall_threshold))
    } else {
        None
    };

    EligibilityResult {
        assessment_id: assessment_id.to_string(),
        overall_score,
        is_eligible: details.reason.is_none(),
        matched_instrument: None,
        details,
        evaluated_at: Utc::now(),
    }
}

/// Symmetric band test. A missing score fails the gate but is still
/// recorded.
pub fn evaluate_gate(rule: &EligibilityRule, score: Option<Decimal>) -> SectionGate {
    let gate_pass =
        score.is_some_and(|s| rule.min_threshold <= s && s <= rule.max_threshold);
    let contribution = match score {
        Some(s) if rule.weight > Decimal::ZERO => {
            weighted_share(s, rule.weight).unwrap_or_else(|| {
                debug!(section = %rule.section, "contribution overflowed, counted as zero");
                Decimal::ZERO
            })
        }
        _ => Decimal::ZERO,
    };
    SectionGate {
        normalized: score,
        min_threshold: rule.min_threshold,
        max_threshold: rule.max_threshold,
        weight: rule.weight,
        gate_pass,
        contribution,
        criteria: rule.criteria.clone(),
        recommendation: rule.recommendation.clone(),
    }
}
