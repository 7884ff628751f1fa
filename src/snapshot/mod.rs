pub mod migrations;
pub mod store;

use std::collections::BTreeMap;

use anyhow::Result;

use crate::assessment::ScoreResult;
use crate::eligibility::EligibilityResult;
use crate::instruments::InstrumentRecord;

pub use store::SnapshotStore;

/// Persistence for computed results. Every write replaces the previous row
/// for the same key.
pub trait ResultStore {
    fn upsert_result(&mut self, result: &EligibilityResult) -> Result<()>;
    fn load_result(&self, assessment_id: &str) -> Result<Option<EligibilityResult>>;
    fn result_count(&self) -> Result<usize>;

    fn upsert_instrument(&mut self, record: &InstrumentRecord) -> Result<()>;
    fn load_instrument(&self, name: &str) -> Result<Option<InstrumentRecord>>;
    fn list_instruments(&self) -> Result<Vec<InstrumentRecord>>;

    fn upsert_scores(&mut self, assessment_id: &str, scores: &ScoreResult) -> Result<()>;
    fn load_scores(&self, assessment_id: &str) -> Result<Option<ScoreResult>>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    results: BTreeMap<String, EligibilityResult>,
    instruments: BTreeMap<String, InstrumentRecord>,
    scores: BTreeMap<String, ScoreResult>,
}

impl ResultStore for MemoryStore {
    fn upsert_result(&mut self, result: &EligibilityResult) -> Result<()> {
        self.results
            .insert(result.assessment_id.clone(), result.clone());
        Ok(())
    }

    fn load_result(&self, assessment_id: &str) -> Result<Option<EligibilityResult>> {
        Ok(self.results.get(assessment_id).cloned())
    }

    fn result_count(&self) -> Result<usize> {
        Ok(self.results.len())
    }

    fn upsert_instrument(&mut self, record: &InstrumentRecord) -> Result<()> {
        self.instruments.insert(record.name.clone(), record.clone());
        Ok(())
    }

    fn load_instrument(&self, name: &str) -> Result<Option<InstrumentRecord>> {
        Ok(self.instruments.get(name).cloned())
    }

    fn list_instruments(&self) -> Result<Vec<InstrumentRecord>> {
        Ok(self.instruments.values().cloned().collect())
    }

    fn upsert_scores(&mut self, assessment_id: &str, scores: &ScoreResult) -> Result<()> {
        self.scores.insert(assessment_id.to_string(), scores.clone());
        Ok(())
    }

    fn load_scores(&self, assessment_id: &str) -> Result<Option<ScoreResult>> {
        Ok(self.scores.get(assessment_id).cloned())
    }
}
