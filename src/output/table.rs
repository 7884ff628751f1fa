use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};
use rust_decimal::Decimal;

use crate::assessment::{Progress, ScoreBreakdown, ScoreResult};
use crate::catalog::{CatalogWarning, Question};
use crate::eligibility::EligibilityResult;
use crate::graph::GraphPayload;
use crate::instruments::{InstrumentRule, TableAudit};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn yes_no(flag: bool) -> Cell {
    if flag {
        Cell::new("YES").fg(Color::Green)
    } else {
        Cell::new("NO").fg(Color::Red)
    }
}

fn score_text(score: Option<Decimal>) -> String {
    score
        .map(|s| format!("{s:.2}"))
        .unwrap_or_else(|| "-".to_string())
}

pub fn render_progress_table(progress: &Progress) -> String {
    let mut table = new_table();
    table.set_header(vec!["Section", "Answered", "Required"]);
    for (code, counts) in &progress.by_section {
        let answered = if counts.answered < counts.required {
            Cell::new(counts.answered).fg(Color::Yellow)
        } else {
            Cell::new(counts.answered)
        };
        table.add_row(Row::from(vec![
            Cell::new(code),
            answered,
            Cell::new(counts.required),
        ]));
    }
    table.add_row(vec![
        "TOTAL".to_string(),
        progress.answered.to_string(),
        progress.required.to_string(),
    ]);
    format!(
        "{table}\nComplete: {}%  Resume at: {}",
        progress.percent,
        progress.last_section.as_deref().unwrap_or("-")
    )
}

pub fn render_visible_table(questions: &[&Question]) -> String {
    let mut table = new_table();
    table.set_header(vec!["Order", "Code", "Type", "Required", "Weight", "Text"]);
    for q in questions {
        table.add_row(vec![
            q.order.to_string(),
            q.code.clone(),
            q.kind.to_string(),
            if q.required { "yes" } else { "no" }.to_string(),
            q.weight.to_string(),
            q.text.clone(),
        ]);
    }
    table.to_string()
}

pub fn render_scores_table(scores: &ScoreResult, breakdown: &ScoreBreakdown) -> String {
    let mut table = new_table();
    table.set_header(vec!["Section", "Questions", "Earned", "Possible", "Score"]);
    for section in &breakdown.sections {
        table.add_row(vec![
            section.code.clone(),
            section.questions.len().to_string(),
            section.earned.to_string(),
            section.possible.to_string(),
            score_text(section.score),
        ]);
    }
    format!(
        "{table}\nOverall: {:.2} (rule weights present: {})",
        scores.overall, breakdown.weights_sum
    )
}

pub fn render_eligibility_table(result: &EligibilityResult) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "Section", "Score", "Band", "Weight", "Gate", "Contribution",
    ]);
    for (code, gate) in &result.details.sections {
        table.add_row(Row::from(vec![
            Cell::new(code),
            Cell::new(score_text(gate.normalized)),
            Cell::new(format!("{}..{}", gate.min_threshold, gate.max_threshold)),
            Cell::new(gate.weight),
            yes_no(gate.gate_pass),
            Cell::new(format!("{:.2}", gate.contribution)),
        ]));
    }

    let mut summary = new_table();
    summary.set_header(vec!["Overall", "Threshold", "Eligible", "Instrument", "Reason"]);
    summary.add_row(Row::from(vec![
        Cell::new(format!("{:.2}", result.overall_score)),
        Cell::new(format!("{:.1}", result.details.overall_threshold)),
        yes_no(result.is_eligible),
        Cell::new(result.matched_instrument.as_deref().unwrap_or("-")),
        Cell::new(result.reason().unwrap_or("-")),
    ]));
    format!("{table}\n{summary}")
}

pub fn render_instruments_table(rules: &[InstrumentRule]) -> String {
    let mut table = new_table();
    table.set_header(vec!["#", "Instrument", "Impact", "Risk", "Return"]);
    for (idx, rule) in rules.iter().enumerate() {
        table.add_row(vec![
            (idx + 1).to_string(),
            rule.name.to_string(),
            format!("{}-{}", rule.impact.min, rule.impact.max),
            format!("{}-{}", rule.risk.min, rule.risk.max),
            format!("{}-{}", rule.returns.min, rule.returns.max),
        ]);
    }
    table.to_string()
}

pub fn render_audit_table(audit: &TableAudit) -> String {
    if audit.is_clean() {
        return format!(
            "{} entries, no overlaps, full coverage of the score domain",
            audit.entries
        );
    }
    let mut table = new_table();
    table.set_header(vec!["Problem", "Detail"]);
    for overlap in &audit.overlaps {
        table.add_row(vec![
            "overlap".to_string(),
            format!(
                "#{} {} shadows #{} {}",
                overlap.first + 1,
                overlap.first_name,
                overlap.second + 1,
                overlap.second_name
            ),
        ]);
    }
    for gap in &audit.gaps {
        table.add_row(vec![
            "gap".to_string(),
            format!(
                "impact {}-{}, risk {}-{}, return {}-{}",
                gap.impact.min,
                gap.impact.max,
                gap.risk.min,
                gap.risk.max,
                gap.returns.min,
                gap.returns.max
            ),
        ]);
    }
    table.to_string()
}

pub fn render_warnings_table(warnings: &[CatalogWarning]) -> String {
    if warnings.is_empty() {
        return "catalog OK".to_string();
    }
    let mut table = new_table();
    table.set_header(vec!["#", "Warning"]);
    for (idx, warning) in warnings.iter().enumerate() {
        table.add_row(vec![(idx + 1).to_string(), warning.to_string()]);
    }
    table.to_string()
}

pub fn render_graph_table(graph: &GraphPayload) -> String {
    let mut table = new_table();
    table.set_header(vec!["Axis", "Raw", "Plotted"]);
    table.add_row(vec![
        "Risk (x)".to_string(),
        score_text(graph.point.raw.risk),
        score_text(graph.point.x),
    ]);
    table.add_row(vec![
        "Impact (y left)".to_string(),
        score_text(graph.point.raw.impact),
        score_text(graph.point.y_left),
    ]);
    table.add_row(vec![
        "Return (y right)".to_string(),
        score_text(graph.point.raw.returns),
        score_text(graph.point.y_right),
    ]);
    table.to_string()
}
