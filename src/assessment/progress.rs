use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::assessment::visibility::visible_questions;
use crate::assessment::{Assessment, Progress, SectionProgress};
use crate::catalog::Catalog;

/// Completion counts over every catalog section.
///
/// Each section resolves its own visible questions. `required` counts
/// required and visible questions; `answered` counts visible questions with
/// a non-empty stored answer whether or not they are required, so a section
/// can report more answered than required.
pub fn compute_progress(catalog: &Catalog, assessment: &Assessment) -> Progress {
    let mut progress = Progress {
        last_section: assessment.last_section.clone(),
        ..Progress::default()
    };

    for section in catalog.sections_in_order() {
        let visible = visible_questions(
            catalog,
            &section.code,
            &assessment.answers,
            assessment.sector.as_deref(),
        );
        let mut counts = SectionProgress::default();
        for question in visible {
            if question.required {
                counts.required += 1;
            }
            if assessment.answer(&question.code).is_some() {
                counts.answered += 1;
            }
        }
        progress.answered += counts.answered;
        progress.required += counts.required;
        progress.by_section.insert(section.code.clone(), counts);
    }

    progress.percent = completion_percent(progress.answered, progress.required);
    progress
}

fn completion_percent(answered: u32, required: u32) -> u32 {
    if required == 0 {
        return 0;
    }
    let ratio = Decimal::from(answered) * Decimal::ONE_HUNDRED / Decimal::from(required);
    ratio
        .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
        .to_u32()
        .unwrap_or(0)
}

pub fn missing_sections(progress: &Progress) -> Vec<String> {
    progress
        .by_section
        .iter()
        .filter(|(_, counts)| counts.answered < counts.required)
        .map(|(code, _)| code.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::assessment::progress::{compute_progress, missing_sections};
    use crate::assessment::Assessment;
    use crate::catalog::{Catalog, Question, QuestionType, Section};
    use crate::rules::Rule;

    fn catalog() -> Catalog {
        Catalog::with_hash(
            vec![Section::new("IMPACT", 1), Section::new("RISK", 2)],
            vec![
                Question::new("IMP_Q1", "IMPACT", QuestionType::SingleChoice),
                Question::new("IMP_Q2", "IMPACT", QuestionType::Slider).optional(),
                Question::new("IMP_Q3", "IMPACT", QuestionType::Slider).with_condition(
                    Rule::parse(&json!({"q": "IMP_Q1", "op": "eq", "val": "YES"})),
                ),
                Question::new("RISK_Q1", "RISK", QuestionType::Rating),
            ],
            vec![],
        )
    }

    #[test]
    fn counts_optional_answers_beyond_required() {
        let assessment = Assessment::new("a-1")
            .with_answer("IMP_Q1", json!({"value": "NO"}))
            .with_answer("IMP_Q2", json!({"value": 4}));
        let progress = compute_progress(&catalog(), &assessment);
        let impact = &progress.by_section["IMPACT"];
        assert_eq!(impact.required, 1);
        assert_eq!(impact.answered, 2);
        assert_eq!(progress.required, 2);
        assert_eq!(progress.answered, 2);
        assert_eq!(progress.percent, 100);
        assert_eq!(missing_sections(&progress), vec!["RISK".to_string()]);
    }

    #[test]
    fn conditional_question_becomes_required_once_visible() {
        let assessment = Assessment::new("a-1").with_answer("IMP_Q1", json!({"value": "YES"}));
        let progress = compute_progress(&catalog(), &assessment);
        assert_eq!(progress.by_section["IMPACT"].required, 2);
        assert_eq!(progress.required, 3);
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.percent, 33);
    }

    #[test]
    fn empty_catalog_reports_zero_percent() {
        let empty = Catalog::with_hash(vec![], vec![], vec![]);
        let mut assessment = Assessment::new("a-1");
        assessment.last_section = Some("RISK".into());
        let progress = compute_progress(&empty, &assessment);
        assert_eq!(progress.percent, 0);
        assert_eq!(progress.last_section.as_deref(), Some("RISK"));
        assert!(missing_sections(&progress).is_empty());
    }
}
