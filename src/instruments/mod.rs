pub mod audit;
pub mod matcher;
pub mod table;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use audit::{audit_table, TableAudit};
pub use matcher::{match_rule, pick_instrument, score_point};
pub use table::INSTRUMENT_TABLE;

pub const IMPACT_SECTION: &str = "IMPACT";
pub const RISK_SECTION: &str = "RISK";
pub const RETURN_SECTION: &str = "RETURN";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Band {
    pub min: i64,
    pub max: i64,
}

impl Band {
    pub const SCORE_DOMAIN: Band = Band { min: 0, max: 100 };

    pub fn contains(&self, score: i64) -> bool {
        self.min <= score && score <= self.max
    }

    pub fn intersects(&self, other: &Band) -> bool {
        self.min.max(other.min) <= self.max.min(other.max)
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct InstrumentRule {
    pub name: &'static str,
    pub impact: Band,
    pub risk: Band,
    pub returns: Band,
    pub narrative: &'static str,
}

impl InstrumentRule {
    pub fn matches(&self, point: &ScorePoint) -> bool {
        self.impact.contains(point.impact)
            && self.risk.contains(point.risk)
            && self.returns.contains(point.returns)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScorePoint {
    pub impact: i64,
    pub risk: i64,
    pub returns: i64,
}

/// Stored instrument. The description is refreshed from the table narrative
/// whenever the instrument is matched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstrumentRecord {
    pub name: String,
    pub description: String,
    pub updated_at: DateTime<Utc>,
}
