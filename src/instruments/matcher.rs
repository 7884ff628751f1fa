use anyhow::Result;
use chrono::Utc;
use tracing::{debug, info};

use crate::eligibility::EligibilityDetails;
use crate::instruments::{
    InstrumentRecord, InstrumentRule, ScorePoint, IMPACT_SECTION, INSTRUMENT_TABLE,
    RETURN_SECTION, RISK_SECTION,
};
use crate::normalize::score_floor;
use crate::snapshot::ResultStore;

/// Absent sections read as zero; scores are truncated, not rounded.
pub fn score_point(details: &EligibilityDetails) -> ScorePoint {
    ScorePoint {
        impact: score_floor(details.normalized_or_zero(IMPACT_SECTION)),
        risk: score_floor(details.normalized_or_zero(RISK_SECTION)),
        returns: score_floor(details.normalized_or_zero(RETURN_SECTION)),
    }
}

pub fn match_rule<'a>(
    table: &'a [InstrumentRule],
    point: &ScorePoint,
) -> Option<&'a InstrumentRule> {
    table.iter().find(|rule| rule.matches(point))
}

/// Matches the details against the shipped table and upserts the named
/// instrument, refreshing its description when the narrative changed.
pub fn pick_instrument(
    details: &EligibilityDetails,
    store: &mut dyn ResultStore,
) -> Result<Option<InstrumentRecord>> {
    let point = score_point(details);
    let Some(rule) = match_rule(INSTRUMENT_TABLE, &point) else {
        debug!(?point, "no instrument band matched");
        return Ok(None);
    };

    if let Some(existing) = store.load_instrument(rule.name)? {
        if existing.description == rule.narrative {
            return Ok(Some(existing));
        }
    }

    let record = InstrumentRecord {
        name: rule.name.to_string(),
        description: rule.narrative.to_string(),
        updated_at: Utc::now(),
    };
    store.upsert_instrument(&record)?;
    info!(instrument = rule.name, ?point, "matched instrument");
    Ok(Some(record))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use crate::eligibility::{EligibilityDetails, SectionGate};
    use crate::instruments::{
        match_rule, pick_instrument, score_point, InstrumentRecord, ScorePoint, INSTRUMENT_TABLE,
    };
    use crate::snapshot::{MemoryStore, ResultStore};

    fn gate(score: Decimal) -> SectionGate {
        SectionGate {
            normalized: Some(score),
            min_threshold: Decimal::ZERO,
            max_threshold: Decimal::ONE_HUNDRED,
            weight: Decimal::from(30),
            gate_pass: true,
            contribution: Decimal::ZERO,
            criteria: serde_json::Value::Null,
            recommendation: String::new(),
        }
    }

    fn details(impact: Decimal, risk: Decimal, returns: Decimal) -> EligibilityDetails {
        let mut details = EligibilityDetails::default();
        details.sections.insert("IMPACT".into(), gate(impact));
        details.sections.insert("RISK".into(), gate(risk));
        details.sections.insert("RETURN".into(), gate(returns));
        details
    }

    #[test]
    fn truncates_scores_and_defaults_missing_sections() {
        let point = score_point(&details(
            Decimal::new(7999, 2),
            Decimal::new(2099, 2),
            Decimal::from(100),
        ));
        assert_eq!(
            point,
            ScorePoint {
                impact: 79,
                risk: 20,
                returns: 100
            }
        );
        let point = score_point(&EligibilityDetails::default());
        assert_eq!(
            point,
            ScorePoint {
                impact: 0,
                risk: 0,
                returns: 0
            }
        );
    }

    #[test]
    fn first_match_wins_deterministically() {
        let point = ScorePoint {
            impact: 100,
            risk: 10,
            returns: 95,
        };
        let first = match_rule(INSTRUMENT_TABLE, &point).expect("point should match");
        let second = match_rule(INSTRUMENT_TABLE, &point).expect("point should match");
        assert_eq!(first.name, "Impact Equity");
        assert_eq!(first.name, second.name);
    }

    #[test]
    fn out_of_domain_point_matches_nothing() {
        let point = ScorePoint {
            impact: 150,
            risk: 10,
            returns: 95,
        };
        assert!(match_rule(INSTRUMENT_TABLE, &point).is_none());
    }

    #[test]
    fn pick_refreshes_stale_description() {
        let mut store = MemoryStore::default();
        store
            .upsert_instrument(&InstrumentRecord {
                name: "Impact Equity".into(),
                description: "stale".into(),
                updated_at: Utc::now(),
            })
            .expect("seed instrument");

        let details = details(Decimal::from(100), Decimal::from(10), Decimal::from(95));
        let picked = pick_instrument(&details, &mut store)
            .expect("pick should succeed")
            .expect("instrument should match");
        assert_eq!(picked.name, "Impact Equity");
        assert_ne!(picked.description, "stale");

        let stored = store
            .load_instrument("Impact Equity")
            .expect("load instrument")
            .expect("instrument stored");
        assert_eq!(stored.description, picked.description);

        let again = pick_instrument(&details, &mut store)
            .expect("pick should succeed")
            .expect("instrument should match");
        assert_eq!(again, stored);
        assert_eq!(store.list_instruments().expect("list").len(), 1);
    }
}
