use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::rules::Rule;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    SingleChoice,
    MultiChoice,
    Slider,
    MultiSlider,
    Rating,
    Nps,
}

impl QuestionType {
    pub const ALL: [QuestionType; 6] = [
        QuestionType::SingleChoice,
        QuestionType::MultiChoice,
        QuestionType::Slider,
        QuestionType::MultiSlider,
        QuestionType::Rating,
        QuestionType::Nps,
    ];

    pub fn as_code(&self) -> &'static str {
        match self {
            Self::SingleChoice => "SINGLE_CHOICE",
            Self::MultiChoice => "MULTI_CHOICE",
            Self::Slider => "SLIDER",
            Self::MultiSlider => "MULTI_SLIDER",
            Self::Rating => "RATING",
            Self::Nps => "NPS",
        }
    }

    pub fn uses_options(&self) -> bool {
        matches!(self, Self::SingleChoice | Self::MultiChoice | Self::Nps)
    }
}

impl Display for QuestionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

#[derive(Debug, Error)]
#[error("unknown question type: {0}")]
pub struct QuestionTypeParseError(pub String);

impl FromStr for QuestionType {
    type Err = QuestionTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_code() == normalized)
            .ok_or_else(|| QuestionTypeParseError(s.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnswerOption {
    pub value: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub points: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dimension {
    pub code: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub min_value: i64,
    #[serde(default = "default_dimension_max")]
    pub max_value: i64,
    #[serde(default = "default_unit")]
    pub points_per_unit: Decimal,
    #[serde(default = "default_unit")]
    pub weight: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Question {
    pub code: String,
    pub section: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_unit")]
    pub weight: Decimal,
    #[serde(default = "default_true")]
    pub required: bool,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub max_score: Option<Decimal>,
    #[serde(default)]
    pub options: Vec<AnswerOption>,
    #[serde(default)]
    pub dimensions: Vec<Dimension>,
    #[serde(default)]
    pub conditions: Vec<Rule>,
}

impl Question {
    pub fn new(code: &str, section: &str, kind: QuestionType) -> Self {
        Self {
            code: code.to_string(),
            section: section.to_string(),
            kind,
            text: String::new(),
            weight: Decimal::ONE,
            required: true,
            order: 0,
            sector: None,
            max_score: None,
            options: Vec::new(),
            dimensions: Vec::new(),
            conditions: Vec::new(),
        }
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }

    pub fn with_weight(mut self, weight: Decimal) -> Self {
        self.weight = weight;
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_sector(mut self, sector: &str) -> Self {
        self.sector = Some(sector.to_string());
        self
    }

    pub fn with_max_score(mut self, max_score: Decimal) -> Self {
        self.max_score = Some(max_score);
        self
    }

    pub fn with_option(mut self, value: &str, points: Decimal) -> Self {
        self.options.push(AnswerOption {
            value: value.to_string(),
            label: value.to_string(),
            points,
        });
        self
    }

    pub fn with_dimension(
        mut self,
        code: &str,
        max_value: i64,
        points_per_unit: Decimal,
        weight: Decimal,
    ) -> Self {
        self.dimensions.push(Dimension {
            code: code.to_string(),
            label: code.to_string(),
            min_value: 0,
            max_value,
            points_per_unit,
            weight,
        });
        self
    }

    pub fn with_condition(mut self, rule: Rule) -> Self {
        self.conditions.push(rule);
        self
    }

    pub fn scale_max(&self) -> Decimal {
        match (self.max_score, self.kind) {
            (Some(max), _) => max,
            (None, QuestionType::Rating) => Decimal::from(5),
            (None, _) => Decimal::from(10),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Section {
    pub code: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub order: u32,
}

impl Section {
    pub fn new(code: &str, order: u32) -> Self {
        Self {
            code: code.to_string(),
            title: code.to_string(),
            order,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EligibilityRule {
    pub section: String,
    #[serde(default)]
    pub min_threshold: Decimal,
    #[serde(default = "default_max_threshold")]
    pub max_threshold: Decimal,
    #[serde(default)]
    pub weight: Decimal,
    #[serde(default)]
    pub criteria: Value,
    #[serde(default)]
    pub recommendation: String,
}

impl EligibilityRule {
    pub fn new(section: &str, min_threshold: i64, max_threshold: i64, weight: i64) -> Self {
        Self {
            section: section.to_string(),
            min_threshold: Decimal::from(min_threshold),
            max_threshold: Decimal::from(max_threshold),
            weight: Decimal::from(weight),
            criteria: Value::Null,
            recommendation: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Catalog {
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub rules: Vec<EligibilityRule>,
    #[serde(default)]
    pub fingerprint: String,
}

impl Catalog {
    pub fn with_hash(
        sections: Vec<Section>,
        questions: Vec<Question>,
        rules: Vec<EligibilityRule>,
    ) -> Self {
        let mut catalog = Self {
            sections,
            questions,
            rules,
            fingerprint: String::new(),
        };
        catalog.fingerprint = catalog.compute_fingerprint();
        catalog
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed reading catalog: {}", path.display()))?;
        let parsed: Self = serde_json::from_str(&data)
            .with_context(|| format!("failed parsing catalog JSON: {}", path.display()))?;
        Ok(Self::with_hash(parsed.sections, parsed.questions, parsed.rules))
    }

    fn compute_fingerprint(&self) -> String {
        let canonical =
            serde_json::to_string(&(&self.sections, &self.questions, &self.rules))
                .unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    pub fn sections_in_order(&self) -> Vec<&Section> {
        let mut sections: Vec<&Section> = self.sections.iter().collect();
        sections.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.code.cmp(&b.code)));
        sections
    }

    pub fn section(&self, code: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.code == code)
    }

    pub fn questions_in_section(&self, section_code: &str) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|q| q.section == section_code)
            .collect()
    }

    pub fn rule_for(&self, section_code: &str) -> Option<&EligibilityRule> {
        self.rules.iter().find(|r| r.section == section_code)
    }

    /// Rules in section order; rules for sections the catalog does not
    /// define come last, by code.
    pub fn rules_in_order(&self) -> Vec<&EligibilityRule> {
        let mut known = Vec::new();
        for section in self.sections_in_order() {
            if let Some(rule) = self.rule_for(&section.code) {
                known.push(rule);
            }
        }
        let mut orphans: Vec<&EligibilityRule> = self
            .rules
            .iter()
            .filter(|r| self.section(&r.section).is_none())
            .collect();
        orphans.sort_by(|a, b| a.section.cmp(&b.section));
        orphans.dedup_by(|a, b| a.section == b.section);
        known.extend(orphans);
        known
    }
}

fn default_unit() -> Decimal {
    Decimal::ONE
}

fn default_true() -> bool {
    true
}

fn default_dimension_max() -> i64 {
    10
}

fn default_max_threshold() -> Decimal {
    Decimal::ONE_HUNDRED
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use serde_json::json;

    use crate::catalog::{Catalog, EligibilityRule, Question, QuestionType, Section};

    #[test]
    fn parses_question_types_leniently() {
        assert_eq!(
            QuestionType::from_str("multi-slider").expect("type should parse"),
            QuestionType::MultiSlider
        );
        assert_eq!(
            QuestionType::from_str("nps").expect("type should parse"),
            QuestionType::Nps
        );
        assert!(QuestionType::from_str("essay").is_err());
    }

    #[test]
    fn deserializes_authored_question_with_defaults() {
        let question: Question = serde_json::from_value(json!({
            "code": "RET_Q1",
            "section": "RETURN",
            "type": "SLIDER",
            "conditions": [{"q": "IMP_Q1", "op": "eq", "val": "YES"}]
        }))
        .expect("question should deserialize");
        assert_eq!(question.kind, QuestionType::Slider);
        assert_eq!(question.weight, Decimal::ONE);
        assert!(question.required);
        assert_eq!(question.scale_max(), Decimal::from(10));
        assert_eq!(question.conditions.len(), 1);
    }

    #[test]
    fn rating_scale_defaults_to_five() {
        let rating = Question::new("FB_Q2", "FEEDBACK", QuestionType::Rating);
        assert_eq!(rating.scale_max(), Decimal::from(5));
        let capped = rating.with_max_score(Decimal::from(7));
        assert_eq!(capped.scale_max(), Decimal::from(7));
    }

    #[test]
    fn fingerprint_tracks_content() {
        let a = Catalog::with_hash(
            vec![Section::new("IMPACT", 1)],
            Vec::new(),
            vec![EligibilityRule::new("IMPACT", 60, 100, 40)],
        );
        let b = Catalog::with_hash(
            vec![Section::new("IMPACT", 1)],
            Vec::new(),
            vec![EligibilityRule::new("IMPACT", 60, 100, 50)],
        );
        assert_eq!(a.fingerprint.len(), 64);
        assert_ne!(a.fingerprint, b.fingerprint);
    }

    #[test]
    fn questions_are_grouped_by_section() {
        let catalog = Catalog::with_hash(
            vec![Section::new("IMPACT", 1), Section::new("RISK", 2)],
            vec![
                Question::new("IMP_Q1", "IMPACT", QuestionType::Slider),
                Question::new("RISK_Q1", "RISK", QuestionType::Slider),
                Question::new("IMP_Q2", "IMPACT", QuestionType::Rating),
            ],
            vec![],
        );
        let impact = catalog.questions_in_section("IMPACT");
        let codes: Vec<&str> = impact.iter().map(|q| q.code.as_str()).collect();
        assert_eq!(codes, vec!["IMP_Q1", "IMP_Q2"]);
        assert!(catalog.questions_in_section("RETURN").is_empty());
    }

    #[test]
    fn rules_follow_section_order_then_orphans() {
        let catalog = Catalog::with_hash(
            vec![Section::new("RISK", 2), Section::new("IMPACT", 1)],
            Vec::new(),
            vec![
                EligibilityRule::new("ZETA", 0, 100, 0),
                EligibilityRule::new("RISK", 0, 40, 30),
                EligibilityRule::new("IMPACT", 60, 100, 40),
            ],
        );
        let order: Vec<&str> = catalog
            .rules_in_order()
            .iter()
            .map(|r| r.section.as_str())
            .collect();
        assert_eq!(order, vec!["IMPACT", "RISK", "ZETA"]);
    }
}
