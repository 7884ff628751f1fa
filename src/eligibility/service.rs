use anyhow::Result;
use rust_decimal::Decimal;
use tracing::info;

use crate::assessment::Assessment;
use crate::catalog::Catalog;
use crate::eligibility::{evaluate_eligibility, EligibilityResult};
use crate::instruments::pick_instrument;
use crate::snapshot::ResultStore;

/// Evaluates, matches an instrument for eligible results, and replaces the
/// stored result for the assessment. Only storage failures are errors.
pub fn eligibility_check(
    assessment: &Assessment,
    catalog: &Catalog,
    store: &mut dyn ResultStore,
    overall_threshold: Decimal,
) -> Result<EligibilityResult> {
    let mut result = evaluate_eligibility(
        &assessment.id,
        assessment.scores.as_ref(),
        catalog,
        overall_threshold,
    );
    if result.is_eligible {
        result.matched_instrument = pick_instrument(&result.details, store)?.map(|r| r.name);
    }
    store.upsert_result(&result)?;
    info!(
        assessment = %result.assessment_id,
        overall = %result.overall_score,
        eligible = result.is_eligible,
        instrument = ?result.matched_instrument,
        "eligibility evaluated"
    );
    Ok(result)
}
