use tracing::debug;

use crate::assessment::AnswerMap;
use crate::catalog::{Catalog, Question};
use crate::rules::evaluate;

/// A question with no sector tag applies everywhere, and so does an
/// assessment with no sector.
pub fn applies_to_sector(question: &Question, sector: Option<&str>) -> bool {
    match (question.sector.as_deref(), sector) {
        (Some(tag), Some(sector)) => tag.trim().eq_ignore_ascii_case(sector.trim()),
        _ => true,
    }
}

/// Visible iff the question has no conditions or any of them holds.
pub fn is_visible(question: &Question, answers: &AnswerMap) -> bool {
    question.conditions.is_empty()
        || question
            .conditions
            .iter()
            .any(|condition| evaluate(condition, answers))
}

pub fn visible_questions<'a>(
    catalog: &'a Catalog,
    section_code: &str,
    answers: &AnswerMap,
    sector: Option<&str>,
) -> Vec<&'a Question> {
    let mut visible: Vec<&Question> = catalog
        .questions_in_section(section_code)
        .into_iter()
        .filter(|q| applies_to_sector(q, sector))
        .filter(|q| {
            let shown = is_visible(q, answers);
            if !shown {
                debug!(question = %q.code, section = section_code, "question hidden by conditions");
            }
            shown
        })
        .collect();
    visible.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.code.cmp(&b.code)));
    visible
}
