use crate::instruments::{Band, InstrumentRule};

const fn band(min: i64, max: i64) -> Band {
    Band { min, max }
}

const fn entry(
    name: &'static str,
    impact: Band,
    risk: Band,
    returns: Band,
    narrative: &'static str,
) -> InstrumentRule {
    InstrumentRule {
        name,
        impact,
        risk,
        returns,
        narrative,
    }
}

/// Instrument decision table, scanned top to bottom.
///
/// Impact bands run from strongest to weakest, then risk from lowest to
/// highest, then return from strongest to weakest. Entries are disjoint and
/// cover every integer score triple in 0..=100.
pub static INSTRUMENT_TABLE: &[InstrumentRule] = &[
    entry(
        "Impact Equity",
        band(80, 100),
        band(0, 20),
        band(70, 100),
        "Exceptional impact, low risk and strong return. Take a growth equity position alongside an impact measurement plan.",
    ),
    entry(
        "Commercial Debt with Impact",
        band(80, 100),
        band(0, 20),
        band(50, 69),
        "Exceptional impact, low risk and healthy return. Provide market-rate debt with impact covenants and annual reporting.",
    ),
    entry(
        "Social Impact Bond",
        band(80, 100),
        band(0, 20),
        band(30, 49),
        "Exceptional impact, low risk and modest return. Bring in outcome payers through a social impact bond with independent verification.",
    ),
    entry(
        "Outcome-Based Loan",
        band(80, 100),
        band(0, 20),
        band(0, 29),
        "Exceptional impact, low risk and thin return. Link the interest rate to verified impact outcomes through an outcome-based loan.",
    ),
    entry(
        "Commercial Debt with Impact",
        band(80, 100),
        band(21, 40),
        band(70, 100),
        "Exceptional impact, moderate risk and strong return. Provide market-rate debt with impact covenants and annual reporting.",
    ),
    entry(
        "Outcome-Based Loan",
        band(80, 100),
        band(21, 40),
        band(50, 69),
        "Exceptional impact, moderate risk and healthy return. Link the interest rate to verified impact outcomes through an outcome-based loan.",
    ),
    entry(
        "Blended Finance Facility",
        band(80, 100),
        band(21, 40),
        band(30, 49),
        "Exceptional impact, moderate risk and modest return. Combine concessional and commercial tranches in a blended finance facility.",
    ),
    entry(
        "Concessional Loan",
        band(80, 100),
        band(21, 40),
        band(0, 29),
        "Exceptional impact, moderate risk and thin return. Extend a concessional loan with below-market pricing and a grace period.",
    ),
    entry(
        "Convertible Note",
        band(80, 100),
        band(41, 60),
        band(70, 100),
        "Exceptional impact, elevated risk and strong return. Issue a convertible note that rewards upside while deferring valuation.",
    ),
    entry(
        "Concessional Loan",
        band(80, 100),
        band(41, 60),
        band(50, 69),
        "Exceptional impact, elevated risk and healthy return. Extend a concessional loan with below-market pricing and a grace period.",
    ),
    entry(
        "Concessional Loan",
        band(80, 100),
        band(41, 60),
        band(30, 49),
        "Exceptional impact, elevated risk and modest return. Extend a concessional loan with below-market pricing and a grace period.",
    ),
    entry(
        "Recoverable Grant",
        band(80, 100),
        band(41, 60),
        band(0, 29),
        "Exceptional impact, elevated risk and thin return. Offer a recoverable grant that converts to repayment only if revenue milestones are met.",
    ),
    entry(
        "First-Loss Capital",
        band(80, 100),
        band(61, 100),
        band(70, 100),
        "Exceptional impact, high risk and strong return. Anchor a blended structure with first-loss capital so senior lenders can participate.",
    ),
    entry(
        "First-Loss Capital",
        band(80, 100),
        band(61, 100),
        band(50, 69),
        "Exceptional impact, high risk and healthy return. Anchor a blended structure with first-loss capital so senior lenders can participate.",
    ),
    entry(
        "Grant",
        band(80, 100),
        band(61, 100),
        band(30, 49),
        "Exceptional impact, high risk and modest return. Fund the programme with non-repayable grant capital and track outcomes rather than repayments.",
    ),
    entry(
        "Grant",
        band(80, 100),
        band(61, 100),
        band(0, 29),
        "Exceptional impact, high risk and thin return. Fund the programme with non-repayable grant capital and track outcomes rather than repayments.",
    ),
    entry(
        "Impact Equity",
        band(60, 79),
        band(0, 20),
        band(70, 100),
        "Solid impact, low risk and strong return. Take a growth equity position alongside an impact measurement plan.",
    ),
    entry(
        "Commercial Debt with Impact",
        band(60, 79),
        band(0, 20),
        band(50, 69),
        "Solid impact, low risk and healthy return. Provide market-rate debt with impact covenants and annual reporting.",
    ),
    entry(
        "Outcome-Based Loan",
        band(60, 79),
        band(0, 20),
        band(30, 49),
        "Solid impact, low risk and modest return. Link the interest rate to verified impact outcomes through an outcome-based loan.",
    ),
    entry(
        "Blended Finance Facility",
        band(60, 79),
        band(0, 20),
        band(0, 29),
        "Solid impact, low risk and thin return. Combine concessional and commercial tranches in a blended finance facility.",
    ),
    entry(
        "Commercial Debt with Impact",
        band(60, 79),
        band(21, 40),
        band(70, 100),
        "Solid impact, moderate risk and strong return. Provide market-rate debt with impact covenants and annual reporting.",
    ),
    entry(
        "Revenue-Based Financing",
        band(60, 79),
        band(21, 40),
        band(50, 69),
        "Solid impact, moderate risk and healthy return. Repay through a fixed share of monthly revenue until a capped multiple is reached.",
    ),
    entry(
        "Blended Finance Facility",
        band(60, 79),
        band(21, 40),
        band(30, 49),
        "Solid impact, moderate risk and modest return. Combine concessional and commercial tranches in a blended finance facility.",
    ),
    entry(
        "Concessional Loan",
        band(60, 79),
        band(21, 40),
        band(0, 29),
        "Solid impact, moderate risk and thin return. Extend a concessional loan with below-market pricing and a grace period.",
    ),
    entry(
        "Convertible Note",
        band(60, 79),
        band(41, 60),
        band(70, 100),
        "Solid impact, elevated risk and strong return. Issue a convertible note that rewards upside while deferring valuation.",
    ),
    entry(
        "Concessional Loan",
        band(60, 79),
        band(41, 60),
        band(50, 69),
        "Solid impact, elevated risk and healthy return. Extend a concessional loan with below-market pricing and a grace period.",
    ),
    entry(
        "Concessional Loan",
        band(60, 79),
        band(41, 60),
        band(30, 49),
        "Solid impact, elevated risk and modest return. Extend a concessional loan with below-market pricing and a grace period.",
    ),
    entry(
        "Recoverable Grant",
        band(60, 79),
        band(41, 60),
        band(0, 29),
        "Solid impact, elevated risk and thin return. Offer a recoverable grant that converts to repayment only if revenue milestones are met.",
    ),
    entry(
        "First-Loss Capital",
        band(60, 79),
        band(61, 100),
        band(70, 100),
        "Solid impact, high risk and strong return. Anchor a blended structure with first-loss capital so senior lenders can participate.",
    ),
    entry(
        "First-Loss Capital",
        band(60, 79),
        band(61, 100),
        band(50, 69),
        "Solid impact, high risk and healthy return. Anchor a blended structure with first-loss capital so senior lenders can participate.",
    ),
    entry(
        "Grant",
        band(60, 79),
        band(61, 100),
        band(30, 49),
        "Solid impact, high risk and modest return. Fund the programme with non-repayable grant capital and track outcomes rather than repayments.",
    ),
    entry(
        "Grant",
        band(60, 79),
        band(61, 100),
        band(0, 29),
        "Solid impact, high risk and thin return. Fund the programme with non-repayable grant capital and track outcomes rather than repayments.",
    ),
    entry(
        "Commercial Debt",
        band(40, 59),
        band(0, 20),
        band(70, 100),
        "Emerging impact, low risk and strong return. Provide standard commercial debt; impact is not a deciding factor at this profile.",
    ),
    entry(
        "Commercial Debt",
        band(40, 59),
        band(0, 20),
        band(50, 69),
        "Emerging impact, low risk and healthy return. Provide standard commercial debt; impact is not a deciding factor at this profile.",
    ),
    entry(
        "Working Capital Line",
        band(40, 59),
        band(0, 20),
        band(30, 49),
        "Emerging impact, low risk and modest return. Open a short-tenor working capital line sized to receivables.",
    ),
    entry(
        "Working Capital Line",
        band(40, 59),
        band(0, 20),
        band(0, 29),
        "Emerging impact, low risk and thin return. Open a short-tenor working capital line sized to receivables.",
    ),
    entry(
        "Working Capital Line",
        band(40, 59),
        band(21, 40),
        band(70, 100),
        "Emerging impact, moderate risk and strong return. Open a short-tenor working capital line sized to receivables.",
    ),
    entry(
        "Revenue-Based Financing",
        band(40, 59),
        band(21, 40),
        band(50, 69),
        "Emerging impact, moderate risk and healthy return. Repay through a fixed share of monthly revenue until a capped multiple is reached.",
    ),
    entry(
        "Guarantee-Backed Loan",
        band(40, 59),
        band(21, 40),
        band(30, 49),
        "Emerging impact, moderate risk and modest return. Lend against a partial credit guarantee to offset the elevated risk.",
    ),
    entry(
        "Technical Assistance",
        band(40, 59),
        band(21, 40),
        band(0, 29),
        "Emerging impact, moderate risk and thin return. Provide technical assistance to strengthen operations before any capital is committed.",
    ),
    entry(
        "Mezzanine Debt",
        band(40, 59),
        band(41, 60),
        band(70, 100),
        "Emerging impact, elevated risk and strong return. Structure subordinated mezzanine debt priced for the risk taken.",
    ),
    entry(
        "Guarantee-Backed Loan",
        band(40, 59),
        band(41, 60),
        band(50, 69),
        "Emerging impact, elevated risk and healthy return. Lend against a partial credit guarantee to offset the elevated risk.",
    ),
    entry(
        "Guarantee-Backed Loan",
        band(40, 59),
        band(41, 60),
        band(30, 49),
        "Emerging impact, elevated risk and modest return. Lend against a partial credit guarantee to offset the elevated risk.",
    ),
    entry(
        "Technical Assistance",
        band(40, 59),
        band(41, 60),
        band(0, 29),
        "Emerging impact, elevated risk and thin return. Provide technical assistance to strengthen operations before any capital is committed.",
    ),
    entry(
        "Venture Equity",
        band(40, 59),
        band(61, 100),
        band(70, 100),
        "Emerging impact, high risk and strong return. Consider minority venture equity with board observation rights to manage downside.",
    ),
    entry(
        "Venture Equity",
        band(40, 59),
        band(61, 100),
        band(50, 69),
        "Emerging impact, high risk and healthy return. Consider minority venture equity with board observation rights to manage downside.",
    ),
    entry(
        "Technical Assistance",
        band(40, 59),
        band(61, 100),
        band(30, 49),
        "Emerging impact, high risk and modest return. Provide technical assistance to strengthen operations before any capital is committed.",
    ),
    entry(
        "Technical Assistance",
        band(40, 59),
        band(61, 100),
        band(0, 29),
        "Emerging impact, high risk and thin return. Provide technical assistance to strengthen operations before any capital is committed.",
    ),
    entry(
        "Commercial Debt",
        band(0, 39),
        band(0, 20),
        band(70, 100),
        "Limited impact, low risk and strong return. Provide standard commercial debt; impact is not a deciding factor at this profile.",
    ),
    entry(
        "Commercial Debt",
        band(0, 39),
        band(0, 20),
        band(50, 69),
        "Limited impact, low risk and healthy return. Provide standard commercial debt; impact is not a deciding factor at this profile.",
    ),
    entry(
        "Working Capital Line",
        band(0, 39),
        band(0, 20),
        band(30, 49),
        "Limited impact, low risk and modest return. Open a short-tenor working capital line sized to receivables.",
    ),
    entry(
        "Working Capital Line",
        band(0, 39),
        band(0, 20),
        band(0, 29),
        "Limited impact, low risk and thin return. Open a short-tenor working capital line sized to receivables.",
    ),
    entry(
        "Working Capital Line",
        band(0, 39),
        band(21, 40),
        band(70, 100),
        "Limited impact, moderate risk and strong return. Open a short-tenor working capital line sized to receivables.",
    ),
    entry(
        "Revenue-Based Financing",
        band(0, 39),
        band(21, 40),
        band(50, 69),
        "Limited impact, moderate risk and healthy return. Repay through a fixed share of monthly revenue until a capped multiple is reached.",
    ),
    entry(
        "Guarantee-Backed Loan",
        band(0, 39),
        band(21, 40),
        band(30, 49),
        "Limited impact, moderate risk and modest return. Lend against a partial credit guarantee to offset the elevated risk.",
    ),
    entry(
        "Technical Assistance",
        band(0, 39),
        band(21, 40),
        band(0, 29),
        "Limited impact, moderate risk and thin return. Provide technical assistance to strengthen operations before any capital is committed.",
    ),
    entry(
        "Mezzanine Debt",
        band(0, 39),
        band(41, 60),
        band(70, 100),
        "Limited impact, elevated risk and strong return. Structure subordinated mezzanine debt priced for the risk taken.",
    ),
    entry(
        "Guarantee-Backed Loan",
        band(0, 39),
        band(41, 60),
        band(50, 69),
        "Limited impact, elevated risk and healthy return. Lend against a partial credit guarantee to offset the elevated risk.",
    ),
    entry(
        "Guarantee-Backed Loan",
        band(0, 39),
        band(41, 60),
        band(30, 49),
        "Limited impact, elevated risk and modest return. Lend against a partial credit guarantee to offset the elevated risk.",
    ),
    entry(
        "Technical Assistance",
        band(0, 39),
        band(41, 60),
        band(0, 29),
        "Limited impact, elevated risk and thin return. Provide technical assistance to strengthen operations before any capital is committed.",
    ),
    entry(
        "Venture Equity",
        band(0, 39),
        band(61, 100),
        band(70, 100),
        "Limited impact, high risk and strong return. Consider minority venture equity with board observation rights to manage downside.",
    ),
    entry(
        "Venture Equity",
        band(0, 39),
        band(61, 100),
        band(50, 69),
        "Limited impact, high risk and healthy return. Consider minority venture equity with board observation rights to manage downside.",
    ),
    entry(
        "Technical Assistance",
        band(0, 39),
        band(61, 100),
        band(30, 49),
        "Limited impact, high risk and modest return. Provide technical assistance to strengthen operations before any capital is committed.",
    ),
    entry(
        "Technical Assistance",
        band(0, 39),
        band(61, 100),
        band(0, 29),
        "Limited impact, high risk and thin return. Provide technical assistance to strengthen operations before any capital is committed.",
    ),
];
