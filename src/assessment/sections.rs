use rust_decimal::Decimal;
use tracing::debug;

use crate::assessment::scoring::{max_points, question_points};
use crate::assessment::visibility::visible_questions;
use crate::assessment::{
    Assessment, QuestionBreakdown, ScoreBreakdown, ScoreResult, SectionBreakdown,
};
use crate::catalog::Catalog;
use crate::config::ScoringConfig;
use crate::normalize::{
    normalize_percent, ratio_percent, renormalize, round_score, weighted_share,
};

/// Section scores as a share of the weighted maximum, plus an overall score
/// renormalized by the rule weights actually present.
///
/// Only visible, answered questions count. A section with nothing possible
/// is left out of the result rather than scored as zero.
pub fn compute_scores(
    catalog: &Catalog,
    assessment: &Assessment,
    config: &ScoringConfig,
) -> (ScoreResult, ScoreBreakdown) {
    let mut result = ScoreResult::default();
    let mut breakdown = ScoreBreakdown::default();

    for section in catalog.sections_in_order() {
        if config.is_excluded(&section.code) {
            continue;
        }
        let mut entry = SectionBreakdown {
            code: section.code.clone(),
            earned: Decimal::ZERO,
            possible: Decimal::ZERO,
            score: None,
            questions: Vec::new(),
        };
        let visible = visible_questions(
            catalog,
            &section.code,
            &assessment.answers,
            assessment.sector.as_deref(),
        );
        for question in visible {
            let Some(payload) = assessment.answer(&question.code) else {
                continue;
            };
            let raw_points = question_points(question, Some(payload));
            let max = max_points(question);
            let Some(possible) = max
                .checked_mul(question.weight)
                .and_then(|p| entry.possible.checked_add(p))
            else {
                debug!(question = %question.code, "maximum points overflowed, question skipped");
                continue;
            };
            let weighted_points = match raw_points
                .checked_mul(question.weight)
                .filter(|w| entry.earned.checked_add(*w).is_some())
            {
                Some(points) => points,
                None => {
                    debug!(question = %question.code, "points overflowed, counted as zero");
                    Decimal::ZERO
                }
            };
            entry.earned += weighted_points;
            entry.possible = possible;
            entry.questions.push(QuestionBreakdown {
                code: question.code.clone(),
                raw_points,
                max_points: max,
                weight: question.weight,
                weighted_points,
            });
        }

        entry.score = ratio_percent(entry.earned, entry.possible)
            .map(|pct| round_score(normalize_percent(pct)));
        match entry.score {
            Some(score) => {
                result.sections.insert(section.code.clone(), score);
            }
            None => debug!(section = %section.code, "section has nothing possible, omitted"),
        }
        breakdown.sections.push(entry);
    }

    for section in catalog.sections_in_order() {
        let score = result.section(&section.code);
        let (Some(score), Some(rule)) = (score, catalog.rule_for(&section.code)) else {
            continue;
        };
        let totals = weighted_share(score, rule.weight).and_then(|share| {
            Some((
                breakdown.weighted_contribution.checked_add(share)?,
                breakdown.weights_sum.checked_add(rule.weight)?,
            ))
        });
        match totals {
            Some((contribution, weights_sum)) => {
                breakdown.weighted_contribution = contribution;
                breakdown.weights_sum = weights_sum;
            }
            None => debug!(section = %section.code, "weighted contribution overflowed, skipped"),
        }
    }

    result.overall = renormalize(breakdown.weighted_contribution, breakdown.weights_sum)
        .map(|overall| round_score(normalize_percent(overall)))
        .unwrap_or(Decimal::ZERO);
    (result, breakdown)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use crate::assessment::sections::compute_scores;
    use crate::assessment::Assessment;
    use crate::catalog::{Catalog, EligibilityRule, Question, QuestionType, Section};
    use crate::config::ScoringConfig;

    fn catalog() -> Catalog {
        Catalog::with_hash(
            vec![
                Section::new("IMPACT", 1),
                Section::new("RISK", 2),
                Section::new("RETURN", 3),
                Section::new("FEEDBACK", 4),
            ],
            vec![
                Question::new("IMP_Q1", "IMPACT", QuestionType::SingleChoice)
                    .with_option("YES", Decimal::from(10))
                    .with_option("NO", Decimal::ZERO),
                Question::new("IMP_Q2", "IMPACT", QuestionType::Slider)
                    .with_weight(Decimal::from(2)),
                Question::new("RISK_Q1", "RISK", QuestionType::Rating),
                Question::new("RET_Q1", "RETURN", QuestionType::Slider),
                Question::new("FB_Q1", "FEEDBACK", QuestionType::Rating),
            ],
            vec![
                EligibilityRule::new("IMPACT", 60, 100, 40),
                EligibilityRule::new("RISK", 0, 40, 30),
                EligibilityRule::new("RETURN", 50, 100, 30),
            ],
        )
    }

    #[test]
    fn weights_questions_and_renormalizes_overall() {
        let assessment = Assessment::new("a-1")
            .with_answer("IMP_Q1", json!({"value": "YES"}))
            .with_answer("IMP_Q2", json!({"value": 5}))
            .with_answer("RISK_Q1", json!({"value": 1}))
            .with_answer("FB_Q1", json!({"value": 5}));
        let (scores, breakdown) =
            compute_scores(&catalog(), &assessment, &ScoringConfig::default());

        // IMPACT: (10 + 5*2) / (10 + 10*2) = 66.666..
        assert_eq!(scores.section("IMPACT"), Some(Decimal::new(6667, 2)));
        assert_eq!(scores.section("RISK"), Some(Decimal::from(20)));
        assert!(scores.section("RETURN").is_none());
        assert!(scores.section("FEEDBACK").is_none());

        // (66.67*0.4 + 20*0.3) / 0.7
        assert_eq!(breakdown.weights_sum, Decimal::from(70));
        assert_eq!(scores.overall, Decimal::new(4667, 2));

        let impact = &breakdown.sections[0];
        assert_eq!(impact.earned, Decimal::from(20));
        assert_eq!(impact.possible, Decimal::from(30));
        assert_eq!(impact.questions.len(), 2);
        assert!(breakdown.sections.iter().all(|s| s.code != "FEEDBACK"));
    }

    #[test]
    fn oversized_slider_answer_contributes_zero() {
        let assessment = Assessment::new("a-1")
            .with_answer("IMP_Q1", json!({"value": "YES"}))
            .with_answer("IMP_Q2", json!({"value": "50000000000000000000000000000"}));
        let (scores, breakdown) =
            compute_scores(&catalog(), &assessment, &ScoringConfig::default());

        // 10 / (10 + 10*2)
        assert_eq!(scores.section("IMPACT"), Some(Decimal::new(3333, 2)));
        let impact = &breakdown.sections[0];
        assert_eq!(impact.questions[1].weighted_points, Decimal::ZERO);
        assert_eq!(impact.possible, Decimal::from(30));
    }

    #[test]
    fn nothing_answered_gives_hard_zero() {
        let (scores, _) = compute_scores(
            &catalog(),
            &Assessment::new("a-1"),
            &ScoringConfig::default(),
        );
        assert!(scores.sections.is_empty());
        assert_eq!(scores.overall, Decimal::ZERO);
    }

    #[test]
    fn sections_without_rules_score_but_do_not_weigh() {
        let config = ScoringConfig {
            excluded_sections: vec![],
        };
        let assessment = Assessment::new("a-1").with_answer("FB_Q1", json!({"value": 4}));
        let (scores, breakdown) = compute_scores(&catalog(), &assessment, &config);
        assert_eq!(scores.section("FEEDBACK"), Some(Decimal::from(80)));
        assert_eq!(breakdown.weights_sum, Decimal::ZERO);
        assert_eq!(scores.overall, Decimal::ZERO);
    }
}
