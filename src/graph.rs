use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::assessment::ScoreResult;
use crate::config::{AxisRange, GraphConfig};
use crate::instruments::{IMPACT_SECTION, RETURN_SECTION, RISK_SECTION};
use crate::normalize::{normalize_percent, round_score};

pub const GRAPH_KIND: &str = "risk-return-impact-scatter";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GraphPayload {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub axes: GraphAxes,
    pub point: GraphPoint,
    pub meta: GraphMeta,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Axis {
    pub label: &'static str,
    pub min: u32,
    pub max: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GraphAxes {
    pub x: Axis,
    pub y_left: Axis,
    pub y_right: Axis,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RawScores {
    pub risk: Option<Decimal>,
    pub impact: Option<Decimal>,
    #[serde(rename = "return")]
    pub returns: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GraphPoint {
    pub x: Option<Decimal>,
    pub y_left: Option<Decimal>,
    pub y_right: Option<Decimal>,
    pub raw: RawScores,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GraphMeta {
    pub overall: Option<Decimal>,
    pub instrument: Option<String>,
    pub version: String,
    pub ranges_used: GraphConfig,
}

fn axis(label: &'static str) -> Axis {
    Axis {
        label,
        min: 0,
        max: 100,
    }
}

/// Scatter point with risk on x, impact on the left y axis and return on
/// the right, each mapped onto 0..100.
pub fn build_graph(
    scores: Option<&ScoreResult>,
    instrument: Option<&str>,
    version: &str,
    ranges: &GraphConfig,
) -> GraphPayload {
    let raw = RawScores {
        risk: scores.and_then(|s| s.section(RISK_SECTION)),
        impact: scores.and_then(|s| s.section(IMPACT_SECTION)),
        returns: scores.and_then(|s| s.section(RETURN_SECTION)),
    };
    GraphPayload {
        kind: GRAPH_KIND,
        axes: GraphAxes {
            x: axis("Risk"),
            y_left: axis("Impact"),
            y_right: axis("Return"),
        },
        point: GraphPoint {
            x: raw.risk.map(|v| scale_to_axis(v, ranges.risk)),
            y_left: raw.impact.map(|v| scale_to_axis(v, ranges.impact)),
            y_right: raw.returns.map(|v| scale_to_axis(v, ranges.returns)),
            raw,
        },
        meta: GraphMeta {
            overall: scores.map(|s| s.overall),
            instrument: instrument.map(str::to_string),
            version: version.to_string(),
            ranges_used: ranges.clone(),
        },
    }
}

/// Linear map of `range` onto 0..100, clamped. A degenerate range maps
/// everything to zero.
pub fn scale_to_axis(value: Decimal, range: AxisRange) -> Decimal {
    let (Some(lo), Some(hi)) = (Decimal::from_f64(range.min), Decimal::from_f64(range.max)) else {
        return Decimal::ZERO;
    };
    if hi <= lo {
        return Decimal::ZERO;
    }
    let scaled = value
        .checked_sub(lo)
        .and_then(|offset| offset.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|offset| offset.checked_div(hi - lo));
    match scaled {
        Some(scaled) => round_score(normalize_percent(scaled)),
        None if value > hi => Decimal::ONE_HUNDRED,
        None => Decimal::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::assessment::ScoreResult;
    use crate::config::{AxisRange, GraphConfig};
    use crate::graph::{build_graph, scale_to_axis, GRAPH_KIND};

    #[test]
    fn scales_and_clamps_against_ranges() {
        let risk = AxisRange {
            min: -20.0,
            max: 100.0,
        };
        assert_eq!(scale_to_axis(Decimal::from(40), risk), Decimal::from(50));
        assert_eq!(scale_to_axis(Decimal::from(-50), risk), Decimal::ZERO);
        assert_eq!(scale_to_axis(Decimal::from(500), risk), Decimal::ONE_HUNDRED);
        let flat = AxisRange { min: 5.0, max: 5.0 };
        assert_eq!(scale_to_axis(Decimal::from(40), flat), Decimal::ZERO);
        assert_eq!(scale_to_axis(Decimal::MAX, risk), Decimal::ONE_HUNDRED);
        assert_eq!(scale_to_axis(Decimal::MIN, risk), Decimal::ZERO);
    }

    #[test]
    fn missing_scores_become_null_points() {
        let scores = ScoreResult::default()
            .with_section("RISK", 40)
            .with_section("IMPACT", 1000);
        let graph = build_graph(
            Some(&scores),
            Some("Impact Equity"),
            "v1",
            &GraphConfig::default(),
        );
        assert_eq!(graph.kind, GRAPH_KIND);
        assert_eq!(graph.point.x, Some(Decimal::from(50)));
        assert_eq!(graph.point.y_left, Some(Decimal::from(50)));
        assert_eq!(graph.point.y_right, None);

        let json = serde_json::to_value(&graph).expect("serialize graph");
        assert_eq!(json["type"], "risk-return-impact-scatter");
        assert!(json["point"]["raw"]["return"].is_null());
        assert_eq!(json["meta"]["instrument"], "Impact Equity");
        assert_eq!(json["meta"]["version"], "v1");

        let empty = build_graph(None, None, "v1", &GraphConfig::default());
        assert!(empty.point.x.is_none());
        assert!(empty.meta.overall.is_none());
    }
}
