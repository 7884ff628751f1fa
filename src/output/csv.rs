use anyhow::Result;

use crate::assessment::{Progress, ScoreBreakdown};
use crate::eligibility::EligibilityResult;
use crate::instruments::InstrumentRule;

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn progress_to_csv(progress: &Progress) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["section", "answered", "required"])?;
    for (code, counts) in &progress.by_section {
        writer.write_record([
            code.clone(),
            counts.answered.to_string(),
            counts.required.to_string(),
        ])?;
    }
    writer.write_record([
        "TOTAL".to_string(),
        progress.answered.to_string(),
        progress.required.to_string(),
    ])?;
    finish(writer)
}

pub fn scores_to_csv(breakdown: &ScoreBreakdown) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["section", "earned", "possible", "score"])?;
    for section in &breakdown.sections {
        writer.write_record([
            section.code.clone(),
            section.earned.to_string(),
            section.possible.to_string(),
            section.score.map(|s| s.to_string()).unwrap_or_default(),
        ])?;
    }
    finish(writer)
}

pub fn eligibility_to_csv(result: &EligibilityResult) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "section",
        "score",
        "min_threshold",
        "max_threshold",
        "weight",
        "gate_pass",
        "contribution",
    ])?;
    for (code, gate) in &result.details.sections {
        writer.write_record([
            code.clone(),
            gate.normalized.map(|s| s.to_string()).unwrap_or_default(),
            gate.min_threshold.to_string(),
            gate.max_threshold.to_string(),
            gate.weight.to_string(),
            gate.gate_pass.to_string(),
            gate.contribution.to_string(),
        ])?;
    }
    finish(writer)
}

pub fn instruments_to_csv(table: &[InstrumentRule]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "name",
        "impact_min",
        "impact_max",
        "risk_min",
        "risk_max",
        "return_min",
        "return_max",
    ])?;
    for rule in table {
        writer.write_record([
            rule.name.to_string(),
            rule.impact.min.to_string(),
            rule.impact.max.to_string(),
            rule.risk.min.to_string(),
            rule.risk.max.to_string(),
            rule.returns.min.to_string(),
            rule.returns.max.to_string(),
        ])?;
    }
    finish(writer)
}
