use std::collections::BTreeSet;

use serde::Serialize;

use crate::instruments::{Band, InstrumentRule};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Overlap {
    pub first: usize,
    pub second: usize,
    pub first_name: &'static str,
    pub second_name: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Gap {
    pub impact: Band,
    pub risk: Band,
    pub returns: Band,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct TableAudit {
    pub entries: usize,
    pub overlaps: Vec<Overlap>,
    pub gaps: Vec<Gap>,
}

impl TableAudit {
    pub fn is_clean(&self) -> bool {
        self.overlaps.is_empty() && self.gaps.is_empty()
    }
}

/// Offline check of a decision table over `domain` on every axis.
///
/// Overlaps are entry pairs whose boxes intersect, so the later entry is
/// partly shadowed. Gaps are found on the grid of band edges, so each
/// reported box is uncovered as a whole.
pub fn audit_table(table: &[InstrumentRule], domain: Band) -> TableAudit {
    let mut overlaps = Vec::new();
    for (i, a) in table.iter().enumerate() {
        for (j, b) in table.iter().enumerate().skip(i + 1) {
            if a.impact.intersects(&b.impact)
                && a.risk.intersects(&b.risk)
                && a.returns.intersects(&b.returns)
            {
                overlaps.push(Overlap {
                    first: i,
                    second: j,
                    first_name: a.name,
                    second_name: b.name,
                });
            }
        }
    }

    let impact_cells = cells(table.iter().map(|r| r.impact), domain);
    let risk_cells = cells(table.iter().map(|r| r.risk), domain);
    let return_cells = cells(table.iter().map(|r| r.returns), domain);

    let mut gaps = Vec::new();
    for impact in &impact_cells {
        for risk in &risk_cells {
            for returns in &return_cells {
                let covered = table.iter().any(|rule| {
                    rule.impact.contains(impact.min)
                        && rule.risk.contains(risk.min)
                        && rule.returns.contains(returns.min)
                });
                if !covered {
                    gaps.push(Gap {
                        impact: *impact,
                        risk: *risk,
                        returns: *returns,
                    });
                }
            }
        }
    }

    TableAudit {
        entries: table.len(),
        overlaps,
        gaps,
    }
}

/// Splits `domain` at every band edge. Within one cell every entry either
/// contains all values or none.
fn cells(bands: impl Iterator<Item = Band>, domain: Band) -> Vec<Band> {
    let mut starts = BTreeSet::from([domain.min, domain.max + 1]);
    for band in bands {
        for edge in [band.min, band.max + 1] {
            if domain.min < edge && edge <= domain.max {
                starts.insert(edge);
            }
        }
    }
    let starts: Vec<i64> = starts.into_iter().collect();
    starts
        .windows(2)
        .map(|w| Band {
            min: w[0],
            max: w[1] - 1,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::instruments::{audit_table, Band, InstrumentRule, INSTRUMENT_TABLE};

    const fn rule(name: &'static str, impact: (i64, i64)) -> InstrumentRule {
        InstrumentRule {
            name,
            impact: Band {
                min: impact.0,
                max: impact.1,
            },
            risk: Band::SCORE_DOMAIN,
            returns: Band::SCORE_DOMAIN,
            narrative: "",
        }
    }

    #[test]
    fn shipped_table_is_disjoint_and_complete() {
        let audit = audit_table(INSTRUMENT_TABLE, Band::SCORE_DOMAIN);
        assert!(audit.overlaps.is_empty(), "overlaps: {:?}", audit.overlaps);
        assert!(audit.gaps.is_empty(), "gaps: {:?}", audit.gaps);
        assert!(audit.is_clean());
        assert!(audit.entries >= 60);
    }

    #[test]
    fn reports_overlaps_and_gaps() {
        let table = [rule("A", (0, 50)), rule("B", (40, 70)), rule("C", (90, 100))];
        let audit = audit_table(&table, Band::SCORE_DOMAIN);
        assert_eq!(audit.overlaps.len(), 1);
        assert_eq!(audit.overlaps[0].first_name, "A");
        assert_eq!(audit.overlaps[0].second_name, "B");
        assert_eq!(audit.gaps.len(), 1);
        assert_eq!(audit.gaps[0].impact, Band { min: 71, max: 89 });
        assert!(!audit.is_clean());
    }
}
