//! Rule-based natural-language query routing.
//!
//! An ordered list of (keywords, handler) pairs evaluated first-match-wins
//! against the trimmed, lowercased input. Order is load-bearing: the
//! patterns are not mutually exclusive ("npa and liquidity" must route to
//! the NPA handler because it is tested first) — do not reorder.

use crate::derived::DerivedView;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub narrative: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_chart: Option<String>,
}

struct Pattern {
    keywords: &'static [&'static str],
    handler: fn(&DerivedView) -> QueryResult,
}

/// Evaluation order per family: NPA, liquidity, churn, fraud, growth,
/// region, compliance.
const PATTERNS: &[Pattern] = &[
    Pattern {
        keywords: &[
            "npa",
            "npl",
            "non-performing",
            "non performing",
            "nonperforming",
            "bad loan",
            "bad-loan",
        ],
        handler: npa_narrative,
    },
    Pattern {
        keywords: &["liquidity", "lcr", "nsfr", "alm"],
        handler: liquidity_narrative,
    },
    Pattern {
        keywords: &["churn", "customer", "attrition"],
        handler: churn_narrative,
    },
    Pattern {
        keywords: &["fraud", "anomaly", "velocity"],
        handler: fraud_narrative,
    },
    Pattern {
        keywords: &["growth", "advances", "nim"],
        handler: growth_narrative,
    },
    Pattern {
        keywords: &["north", "south", "east", "west", "region"],
        handler: region_narrative,
    },
    Pattern {
        keywords: &["compliance", "regulatory", "rbi", "aml", "filing"],
        handler: compliance_narrative,
    },
];

/// Route a free-text query against the latest view.
///
/// Empty input returns the generic help narrative pointed at the default
/// drill-down; an unmatched query returns help with no destination.
pub fn route(text: &str, view: &DerivedView) -> QueryResult {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return QueryResult {
            narrative: "Ask a question about NPA, liquidity, churn, fraud, growth, regions, \
                        or compliance."
                .to_string(),
            suggested_chart: Some("credit-risk".to_string()),
        };
    }

    let lowered = trimmed.to_lowercase();
    for pattern in PATTERNS {
        if pattern
            .keywords
            .iter()
            .any(|keyword| lowered.contains(keyword))
        {
            return (pattern.handler)(view);
        }
    }

    QueryResult {
        narrative: "Try asking about NPA, liquidity, customer churn, fraud, growth, regional \
                    performance, or compliance. For example: 'What's driving NPA in the North?'"
            .to_string(),
        suggested_chart: None,
    }
}

fn npa_narrative(view: &DerivedView) -> QueryResult {
    QueryResult {
        narrative: format!(
            "Gross NPA stands at {:.2}%. The {} region shows elevated NPA levels. Retail and \
             MSME sectors are the primary contributors. Slippage rate is {:.2}%. Consider \
             tightening underwriting in high-risk segments.",
            view.snapshot.kpis.gross_npa_percent, view.top_risk_region, view.slippage_rate
        ),
        suggested_chart: Some("credit-risk".to_string()),
    }
}

fn liquidity_narrative(view: &DerivedView) -> QueryResult {
    let buffer = if view.snapshot.kpis.lcr_percent >= 100.0 {
        "Liquidity buffer remains strong."
    } else {
        "Monitor short-term maturity gaps."
    };
    QueryResult {
        narrative: format!(
            "LCR is at {:.2}%, NSFR at {:.2}%. {buffer} The 31-90 day gap is ₹{:.0}K Cr. HQLA \
             stands at ₹{:.0}K Cr.",
            view.snapshot.kpis.lcr_percent,
            view.nsfr_percent,
            view.gap_31_90 / 1_000.0,
            view.hqla / 1_000.0
        ),
        suggested_chart: Some("liquidity".to_string()),
    }
}

fn churn_narrative(view: &DerivedView) -> QueryResult {
    QueryResult {
        narrative: format!(
            "Churn risk is {:.2}%. {} high-value customers show early churn signals. Cross-sell \
             ratio is {:.2}. Focus on Prime Retail and Affluent segments for retention.",
            view.snapshot.kpis.churn_risk_percent, view.at_risk_hv_customers, view.cross_sell_ratio
        ),
        suggested_chart: Some("customer-profitability".to_string()),
    }
}

fn fraud_narrative(view: &DerivedView) -> QueryResult {
    QueryResult {
        narrative: format!(
            "Fraud signals: {} anomalies detected, {} velocity breaches, {} geo hotspots. \
             Prioritise case review in high-severity locations.",
            view.anomaly_count, view.velocity_breaches, view.geo_hotspots
        ),
        suggested_chart: Some("fraud".to_string()),
    }
}

fn growth_narrative(view: &DerivedView) -> QueryResult {
    QueryResult {
        narrative: format!(
            "Advances growth at {:.2}%. NIM is {:.2}%. CASA ratio {:.2}%, digital adoption \
             {:.2}%. Mobile leads channel mix.",
            view.snapshot.growth.advances_growth,
            view.snapshot.kpis.nim_percent,
            view.snapshot.growth.casa_ratio,
            view.snapshot.growth.digital_adoption
        ),
        suggested_chart: Some("growth".to_string()),
    }
}

fn region_narrative(view: &DerivedView) -> QueryResult {
    QueryResult {
        narrative: format!(
            "Regional NPA: {} is the top risk region. Sector-wise, Retail and MSME show higher \
             delinquency in Tier-2 exposure. Consider regional portfolio rebalancing.",
            view.top_risk_region
        ),
        suggested_chart: Some("credit-risk".to_string()),
    }
}

fn compliance_narrative(view: &DerivedView) -> QueryResult {
    QueryResult {
        narrative: format!(
            "Compliance: {}% compliant. {} filings pending. AML alert queue requires attention. \
             Review filing calendar for upcoming RBI LCR and IFRS 9 deadlines.",
            view.compliant_percent, view.pending_filings
        ),
        suggested_chart: Some("compliance".to_string()),
    }
}
