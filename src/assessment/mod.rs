pub mod progress;
pub mod scoring;
pub mod sections;
pub mod visibility;

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stored answers keyed by question code. Payloads are
/// `{"value": x}`, `{"values": [..]}` or `{"values": {dim: n}}`.
pub type AnswerMap = BTreeMap<String, Value>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssessmentStatus {
    #[default]
    Draft,
    Submitted,
}

impl AssessmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Submitted => "SUBMITTED",
        }
    }
}

impl fmt::Display for AssessmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Assessment {
    pub id: String,
    #[serde(default)]
    pub status: AssessmentStatus,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub answers: AnswerMap,
    #[serde(default)]
    pub last_section: Option<String>,
    #[serde(default)]
    pub scores: Option<ScoreResult>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cooldown_until: Option<DateTime<Utc>>,
}

fn default_version() -> String {
    "v1".to_string()
}

impl Assessment {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            status: AssessmentStatus::Draft,
            version: default_version(),
            sector: None,
            answers: AnswerMap::new(),
            last_section: None,
            scores: None,
            submitted_at: None,
            cooldown_until: None,
        }
    }

    pub fn with_sector(mut self, sector: &str) -> Self {
        self.sector = Some(sector.to_string());
        self
    }

    pub fn with_answer(mut self, question_code: &str, payload: Value) -> Self {
        self.answers.insert(question_code.to_string(), payload);
        self
    }

    pub fn with_scores(mut self, scores: ScoreResult) -> Self {
        self.scores = Some(scores);
        self
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed reading assessment: {}", path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("failed parsing assessment JSON: {}", path.display()))
    }

    pub fn answer(&self, question_code: &str) -> Option<&Value> {
        self.answers
            .get(question_code)
            .filter(|payload| is_answered(payload))
    }
}

/// Truthiness of a stored payload: null, empty containers, empty strings,
/// `false` and zero are all unanswered.
pub fn is_answered(payload: &Value) -> bool {
    match payload {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScoreResult {
    pub sections: BTreeMap<String, Decimal>,
    pub overall: Decimal,
}

impl ScoreResult {
    pub fn section(&self, code: &str) -> Option<Decimal> {
        self.sections.get(code).copied()
    }

    pub fn with_section(mut self, code: &str, score: i64) -> Self {
        self.sections.insert(code.to_string(), Decimal::from(score));
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScoreBreakdown {
    pub sections: Vec<SectionBreakdown>,
    pub weights_sum: Decimal,
    pub weighted_contribution: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectionBreakdown {
    pub code: String,
    pub earned: Decimal,
    pub possible: Decimal,
    pub score: Option<Decimal>,
    pub questions: Vec<QuestionBreakdown>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestionBreakdown {
    pub code: String,
    pub raw_points: Decimal,
    pub max_points: Decimal,
    pub weight: Decimal,
    pub weighted_points: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SectionProgress {
    pub answered: u32,
    pub required: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Progress {
    pub answered: u32,
    pub required: u32,
    pub percent: u32,
    pub by_section: BTreeMap<String, SectionProgress>,
    pub last_section: Option<String>,
}
