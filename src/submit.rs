use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::assessment::progress::{compute_progress, missing_sections};
use crate::assessment::sections::compute_scores;
use crate::assessment::{Assessment, AssessmentStatus, Progress, ScoreBreakdown, ScoreResult};
use crate::catalog::Catalog;
use crate::config::Config;
use crate::eligibility::{eligibility_check, EligibilityResult};
use crate::snapshot::ResultStore;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("assessment is {status}, only drafts can be submitted")]
    NotDraft { status: AssessmentStatus },
    #[error("required answers missing in sections: {}", sections.join(", "))]
    MissingAnswers { sections: Vec<String> },
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub assessment_id: String,
    pub submitted_at: DateTime<Utc>,
    pub cooldown_until: DateTime<Utc>,
    pub progress: Progress,
    pub scores: ScoreResult,
    pub breakdown: ScoreBreakdown,
    pub eligibility: EligibilityResult,
}

/// Scores a complete draft and records its eligibility.
///
/// Scores are written before the eligibility result. If the second write
/// fails the stored scores stand alone and a later check re-evaluates them.
/// The assessment is only marked submitted once both writes succeed.
pub fn submit(
    catalog: &Catalog,
    assessment: &mut Assessment,
    config: &Config,
    store: &mut dyn ResultStore,
) -> Result<Submission, SubmitError> {
    if assessment.status != AssessmentStatus::Draft {
        warn!(
            assessment = %assessment.id,
            status = %assessment.status,
            "submit refused, not a draft"
        );
        return Err(SubmitError::NotDraft {
            status: assessment.status,
        });
    }
    let progress = compute_progress(catalog, assessment);
    let missing = missing_sections(&progress);
    if !missing.is_empty() {
        warn!(
            assessment = %assessment.id,
            sections = ?missing,
            "submit refused, required answers missing"
        );
        return Err(SubmitError::MissingAnswers { sections: missing });
    }

    let (scores, breakdown) = compute_scores(catalog, assessment, &config.scoring);
    store.upsert_scores(&assessment.id, &scores)?;
    assessment.scores = Some(scores.clone());

    let eligibility = eligibility_check(
        assessment,
        catalog,
        store,
        config.eligibility.threshold(),
    )?;

    let submitted_at = Utc::now();
    // a century caps misconfigured cooldowns
    let cooldown = Duration::days(config.submission.cooldown_days.clamp(0, 36_500));
    let cooldown_until = submitted_at
        .checked_add_signed(cooldown)
        .unwrap_or(submitted_at);
    assessment.status = AssessmentStatus::Submitted;
    assessment.submitted_at = Some(submitted_at);
    assessment.cooldown_until = Some(cooldown_until);
    info!(
        assessment = %assessment.id,
        overall = %scores.overall,
        eligible = eligibility.is_eligible,
        "assessment submitted"
    );

    Ok(Submission {
        assessment_id: assessment.id.clone(),
        submitted_at,
        cooldown_until,
        progress,
        scores,
        breakdown,
        eligibility,
    })
}
