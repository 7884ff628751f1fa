use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use crate::assessment::ScoreResult;
use crate::eligibility::EligibilityResult;
use crate::instruments::InstrumentRecord;
use crate::snapshot::migrations::BASE_MIGRATION;
use crate::snapshot::ResultStore;

pub struct SnapshotStore {
    conn: Connection,
}

impl SnapshotStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("failed opening result store: {}", path.display()))?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.migrate()?;
        Ok(store)
    }

    pub fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(BASE_MIGRATION)?;
        Ok(())
    }
}

struct ResultRow {
    assessment_id: String,
    overall_score: String,
    is_eligible: i64,
    matched_instrument: Option<String>,
    details_json: String,
    evaluated_at: String,
}

impl ResultRow {
    fn into_result(self) -> Result<EligibilityResult> {
        Ok(EligibilityResult {
            overall_score: Decimal::from_str(&self.overall_score).with_context(|| {
                format!("bad overall_score for assessment {}", self.assessment_id)
            })?,
            is_eligible: self.is_eligible != 0,
            matched_instrument: self.matched_instrument,
            details: serde_json::from_str(&self.details_json)?,
            evaluated_at: parse_timestamp(&self.evaluated_at),
            assessment_id: self.assessment_id,
        })
    }
}

impl ResultStore for SnapshotStore {
    fn upsert_result(&mut self, result: &EligibilityResult) -> Result<()> {
        self.conn.execute(
            r#"
INSERT INTO eligibility_results(
    assessment_id, overall_score, is_eligible, matched_instrument, details_json, evaluated_at
) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
ON CONFLICT(assessment_id) DO UPDATE SET
    overall_score = excluded.overall_score,
    is_eligible = excluded.is_eligible,
    matched_instrument = excluded.matched_instrument,
    details_json = excluded.details_json,
    evaluated_at = excluded.evaluated_at
"#,
            params![
                result.assessment_id,
                result.overall_score.to_string(),
                if result.is_eligible { 1 } else { 0 },
                result.matched_instrument,
                serde_json::to_string(&result.details)?,
                result.evaluated_at.to_rfc3339()
            ],
        )?;
        Ok(())
    }

    fn load_result(&self, assessment_id: &str) -> Result<Option<EligibilityResult>> {
        let row = self
            .conn
            .query_row(
                r#"
SELECT assessment_id, overall_score, is_eligible, matched_instrument, details_json, evaluated_at
FROM eligibility_results
WHERE assessment_id = ?1
"#,
                params![assessment_id],
                |row| {
                    Ok(ResultRow {
                        assessment_id: row.get(0)?,
                        overall_score: row.get(1)?,
                        is_eligible: row.get(2)?,
                        matched_instrument: row.get(3)?,
                        details_json: row.get(4)?,
                        evaluated_at: row.get(5)?,
                    })
                },
            )
            .optional()?;
        row.map(ResultRow::into_result).transpose()
    }

    fn result_count(&self) -> Result<usize> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM eligibility_results", [], |row| {
                    row.get(0)
                })?;
        Ok(count as usize)
    }

    fn upsert_instrument(&mut self, record: &InstrumentRecord) -> Result<()> {
        self.conn.execute(
            r#"
INSERT INTO instruments(name, description, updated_at)
VALUES (?1, ?2, ?3)
ON CONFLICT(name) DO UPDATE SET
    description = excluded.description,
    updated_at = excluded.updated_at
"#,
            params![
                record.name,
                record.description,
                record.updated_at.to_rfc3339()
            ],
        )?;
        Ok(())
    }

    fn load_instrument(&self, name: &str) -> Result<Option<InstrumentRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT name, description, updated_at FROM instruments WHERE name = ?1",
                params![name],
                row_to_instrument,
            )
            .optional()?;
        Ok(record)
    }

    fn list_instruments(&self) -> Result<Vec<InstrumentRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, description, updated_at FROM instruments ORDER BY name")?;
        let rows = stmt
            .query_map([], row_to_instrument)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn upsert_scores(&mut self, assessment_id: &str, scores: &ScoreResult) -> Result<()> {
        self.conn.execute(
            r#"
INSERT INTO assessment_scores(assessment_id, scores_json, computed_at)
VALUES (?1, ?2, ?3)
ON CONFLICT(assessment_id) DO UPDATE SET
    scores_json = excluded.scores_json,
    computed_at = excluded.computed_at
"#,
            params![
                assessment_id,
                serde_json::to_string(scores)?,
                Utc::now().to_rfc3339()
            ],
        )?;
        Ok(())
    }

    fn load_scores(&self, assessment_id: &str) -> Result<Option<ScoreResult>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT scores_json FROM assessment_scores WHERE assessment_id = ?1",
                params![assessment_id],
                |row| row.get(0),
            )
            .optional()?;
        json.map(|raw| serde_json::from_str(&raw).map_err(anyhow::Error::from))
            .transpose()
    }
}

fn row_to_instrument(row: &rusqlite::Row<'_>) -> rusqlite::Result<InstrumentRecord> {
    let updated_at_raw: String = row.get(2)?;
    Ok(InstrumentRecord {
        name: row.get(0)?,
        description: row.get(1)?,
        updated_at: parse_timestamp(&updated_at_raw),
    })
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
