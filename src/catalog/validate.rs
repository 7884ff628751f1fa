use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::schema::{Catalog, QuestionType};
use crate::rules::{referenced_questions, unknown_operators};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum CatalogWarning {
    DuplicateSection { code: String },
    DuplicateQuestion { code: String },
    DuplicateRule { section: String },
    UnknownSection { question: String, section: String },
    UnknownConditionReference { question: String, referenced: String },
    UnknownOperator { question: String, operator: String },
    RuleForUnknownSection { section: String },
    ThresholdOutOfRange { section: String },
    InvertedThresholds { section: String },
    MissingOptions { question: String },
    MissingDimensions { question: String },
    WeightsDoNotSumTo100 { total: Decimal },
}

impl Display for CatalogWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateSection { code } => write!(f, "section {code} is defined twice"),
            Self::DuplicateQuestion { code } => write!(f, "question {code} is defined twice"),
            Self::DuplicateRule { section } => {
                write!(f, "section {section} has more than one eligibility rule")
            }
            Self::UnknownSection { question, section } => {
                write!(f, "question {question} belongs to unknown section {section}")
            }
            Self::UnknownConditionReference {
                question,
                referenced,
            } => write!(
                f,
                "question {question} has a condition on unknown question {referenced}"
            ),
            Self::UnknownOperator { question, operator } => write!(
                f,
                "question {question} uses unsupported operator {operator}; the condition never matches"
            ),
            Self::RuleForUnknownSection { section } => {
                write!(f, "eligibility rule targets unknown section {section}")
            }
            Self::ThresholdOutOfRange { section } => {
                write!(f, "eligibility rule for {section} has a threshold outside 0..100")
            }
            Self::InvertedThresholds { section } => {
                write!(f, "eligibility rule for {section} has min above max")
            }
            Self::MissingOptions { question } => {
                write!(f, "choice question {question} has no options")
            }
            Self::MissingDimensions { question } => {
                write!(f, "multi-slider question {question} has no dimensions")
            }
            Self::WeightsDoNotSumTo100 { total } => {
                write!(f, "eligibility rule weights sum to {total}, expected 100")
            }
        }
    }
}

impl Catalog {
    pub fn validate(&self) -> Vec<CatalogWarning> {
        validate_catalog(self)
    }
}

/// Authoring checks. None of these stop scoring; they are reported so a
/// catalog author can fix them.
pub fn validate_catalog(catalog: &Catalog) -> Vec<CatalogWarning> {
    let mut warnings = Vec::new();

    let mut section_codes = BTreeSet::new();
    for section in &catalog.sections {
        if !section_codes.insert(section.code.as_str()) {
            warnings.push(CatalogWarning::DuplicateSection {
                code: section.code.clone(),
            });
        }
    }

    let mut question_codes = BTreeSet::new();
    for question in &catalog.questions {
        if !question_codes.insert(question.code.as_str()) {
            warnings.push(CatalogWarning::DuplicateQuestion {
                code: question.code.clone(),
            });
        }
    }

    for question in &catalog.questions {
        if !section_codes.contains(question.section.as_str()) {
            warnings.push(CatalogWarning::UnknownSection {
                question: question.code.clone(),
                section: question.section.clone(),
            });
        }
        if question.kind.uses_options() && question.options.is_empty() {
            warnings.push(CatalogWarning::MissingOptions {
                question: question.code.clone(),
            });
        }
        if question.kind == QuestionType::MultiSlider && question.dimensions.is_empty() {
            warnings.push(CatalogWarning::MissingDimensions {
                question: question.code.clone(),
            });
        }
        let referenced: BTreeSet<String> = question
            .conditions
            .iter()
            .flat_map(referenced_questions)
            .collect();
        for code in referenced {
            if !question_codes.contains(code.as_str()) {
                warnings.push(CatalogWarning::UnknownConditionReference {
                    question: question.code.clone(),
                    referenced: code,
                });
            }
        }
        let operators: BTreeSet<String> = question
            .conditions
            .iter()
            .flat_map(unknown_operators)
            .collect();
        for operator in operators {
            warnings.push(CatalogWarning::UnknownOperator {
                question: question.code.clone(),
                operator,
            });
        }
    }

    let mut ruled_sections = BTreeSet::new();
    let mut total_weight = Decimal::ZERO;
    for rule in &catalog.rules {
        if !ruled_sections.insert(rule.section.as_str()) {
            warnings.push(CatalogWarning::DuplicateRule {
                section: rule.section.clone(),
            });
        }
        if !section_codes.contains(rule.section.as_str()) {
            warnings.push(CatalogWarning::RuleForUnknownSection {
                section: rule.section.clone(),
            });
        }
        let in_range = |v: Decimal| (Decimal::ZERO..=Decimal::ONE_HUNDRED).contains(&v);
        if !in_range(rule.min_threshold) || !in_range(rule.max_threshold) {
            warnings.push(CatalogWarning::ThresholdOutOfRange {
                section: rule.section.clone(),
            });
        }
        if rule.min_threshold > rule.max_threshold {
            warnings.push(CatalogWarning::InvertedThresholds {
                section: rule.section.clone(),
            });
        }
        total_weight += rule.weight;
    }
    if !catalog.rules.is_empty() && total_weight != Decimal::ONE_HUNDRED {
        warnings.push(CatalogWarning::WeightsDoNotSumTo100 {
            total: total_weight,
        });
    }

    warnings
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use crate::catalog::{
        validate_catalog, Catalog, CatalogWarning, EligibilityRule, Question, QuestionType,
        Section,
    };
    use crate::rules::Rule;

    #[test]
    fn clean_catalog_has_no_warnings() {
        let catalog = Catalog::with_hash(
            vec![Section::new("IMPACT", 1)],
            vec![
                Question::new("IMP_Q1", "IMPACT", QuestionType::SingleChoice)
                    .with_option("YES", Decimal::from(10)),
                Question::new("IMP_Q2", "IMPACT", QuestionType::Slider).with_condition(
                    Rule::parse(&json!({"q": "IMP_Q1", "op": "eq", "val": "YES"})),
                ),
            ],
            vec![EligibilityRule::new("IMPACT", 60, 100, 100)],
        );
        assert!(validate_catalog(&catalog).is_empty());
    }

    #[test]
    fn reports_authoring_mistakes() {
        let catalog = Catalog::with_hash(
            vec![Section::new("IMPACT", 1)],
            vec![
                Question::new("IMP_Q1", "IMPACT", QuestionType::MultiChoice),
                Question::new("RISK_Q1", "RISK", QuestionType::MultiSlider)
                    .with_condition(Rule::parse(&json!({"q": "GHOST", "op": "eq", "val": 1})))
                    .with_condition(Rule::parse(
                        &json!({"q": "IMP_Q1", "op": "between", "val": [1, 2]}),
                    )),
            ],
            vec![
                EligibilityRule::new("IMPACT", 80, 60, 40),
                EligibilityRule::new("RISK", 0, 140, 30),
            ],
        );
        let warnings = validate_catalog(&catalog);
        assert!(warnings.contains(&CatalogWarning::MissingOptions {
            question: "IMP_Q1".into()
        }));
        assert!(warnings.contains(&CatalogWarning::MissingDimensions {
            question: "RISK_Q1".into()
        }));
        assert!(warnings.contains(&CatalogWarning::UnknownSection {
            question: "RISK_Q1".into(),
            section: "RISK".into()
        }));
        assert!(warnings.contains(&CatalogWarning::UnknownConditionReference {
            question: "RISK_Q1".into(),
            referenced: "GHOST".into()
        }));
        assert!(warnings.contains(&CatalogWarning::UnknownOperator {
            question: "RISK_Q1".into(),
            operator: "between".into()
        }));
        assert!(warnings.contains(&CatalogWarning::InvertedThresholds {
            section: "IMPACT".into()
        }));
        assert!(warnings.contains(&CatalogWarning::ThresholdOutOfRange {
            section: "RISK".into()
        }));
        assert!(warnings.contains(&CatalogWarning::RuleForUnknownSection {
            section: "RISK".into()
        }));
        assert!(warnings.contains(&CatalogWarning::WeightsDoNotSumTo100 {
            total: Decimal::from(70)
        }));
    }
}
