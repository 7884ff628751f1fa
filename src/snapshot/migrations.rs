pub const BASE_MIGRATION: &str = r#"
CREATE TABLE IF NOT EXISTS eligibility_results (
    assessment_id TEXT PRIMARY KEY,
    overall_score TEXT NOT NULL,
    is_eligible INTEGER NOT NULL,
    matched_instrument TEXT,
    details_json TEXT NOT NULL,
    evaluated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS instruments (
    name TEXT PRIMARY KEY,
    description TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS assessment_scores (
    assessment_id TEXT PRIMARY KEY,
    scores_json TEXT NOT NULL,
    computed_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_results_matched_instrument
    ON eligibility_results(matched_instrument);
"#;
