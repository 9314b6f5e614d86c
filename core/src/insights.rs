//! Canned executive narratives — short action-oriented bullets selected
//! from fixed per-domain template tables, conditioned on the live view.
//!
//! Selection is seeded by the caller; nothing here reads a clock.

use crate::{catalog, derived::DerivedView, snapshot::Severity};

const CREDIT_RISK: [&str; 4] = [
    "Retail NPAs rising in unsecured personal loans across Tier-2 cities.",
    "Sector-wise stress visible in MSME and real estate portfolios.",
    "North and West regions show early warning signals on delinquency.",
    "Corporate segment remains stable; monitor agriculture slippages.",
];

const LIQUIDITY: [&str; 4] = [
    "Liquidity buffer remains strong but short-term maturity gaps widening.",
    "LCR comfortably above regulatory minimum; NSFR within target.",
    "31-90 day bucket shows marginal pressure—review funding mix.",
    "Stress scenario impact within acceptable tolerance.",
];

const CUSTOMER: [&str; 4] = [
    "High-value customers show early churn signals due to digital friction.",
    "Prime Retail segment profitability improving; cross-sell opportunities.",
    "Affluent segment at-risk—prioritize relationship manager outreach.",
    "SME segment growth potential; product bundling recommended.",
];

const FRAUD: [&str; 4] = [
    "Transaction anomalies elevated in Mumbai and Bangalore corridors.",
    "Velocity breaches contained; geo-risk patterns under monitoring.",
    "Fraud pulse trending within normal bounds—maintain vigilance.",
    "High-severity alerts down 12% vs prior period.",
];

const GROWTH: [&str; 4] = [
    "Advances growth above industry; CASA ratio stable.",
    "Digital adoption accelerating; mobile channel leads.",
    "Channel mix shifting—branch footfall declining as expected.",
    "Growth momentum strong; maintain risk discipline.",
];

const COLLECTIONS: [&str; 4] = [
    "Collections recovery improving in 0-30 DPD bucket; focus on 180+ aging.",
    "Write-offs trending down; collection efficiency above target.",
    "High-value recoverable accounts in 61-90 bucket—prioritise outreach.",
    "DPD aging pyramid shifting; early-stage buckets under control.",
];

const TREASURY: [&str; 4] = [
    "VaR within limits; FX exposure elevated—review hedging strategy.",
    "Duration gap stable; MTM P&L positive for the period.",
    "Market risk appetite utilisation at 78%; headroom available.",
    "FX net open position approaching limit—consider rebalancing.",
];

const BRANCH_NETWORK: [&str; 4] = [
    "Branch productivity strong in North; South region needs attention.",
    "ATM utilisation improving; digital migration reducing branch footfall.",
    "Cross-sell metrics above target in Central and West regions.",
    "Underperforming branches identified; right-sizing review recommended.",
];

const COMPLIANCE: [&str; 4] = [
    "AML alert queue elevated; prioritise case review before month-end.",
    "Regulatory filings on track; RBI LCR submission due 15 Mar.",
    "Sanctions screening hits within normal range; no false positives.",
    "Compliance scorecard green; one pending audit finding to close.",
];

const OPERATIONAL_RISK: [&str; 4] = [
    "Operational incidents up in IT category; root cause analysis underway.",
    "KRI traffic lights: two categories in amber—escalate to risk committee.",
    "Loss trend within appetite; near-misses down 15% vs prior quarter.",
    "Process and Cyber categories stable; external risk monitoring active.",
];

fn templates_for(slug: &str) -> Option<&'static [&'static str; 4]> {
    match slug {
        "credit-risk" => Some(&CREDIT_RISK),
        "liquidity" => Some(&LIQUIDITY),
        "customer-profitability" => Some(&CUSTOMER),
        "fraud" => Some(&FRAUD),
        "growth" => Some(&GROWTH),
        "collections" => Some(&COLLECTIONS),
        "treasury" => Some(&TREASURY),
        "branch-network" => Some(&BRANCH_NETWORK),
        "compliance" => Some(&COMPLIANCE),
        "operational-risk" => Some(&OPERATIONAL_RISK),
        _ => None,
    }
}

/// Deterministic selection: the seed decides whether the table is read
/// forward or reversed, then the first `count` bullets are taken.
fn select(templates: &[&str], count: usize, seed: u64) -> Vec<String> {
    let mut ordered: Vec<&str> = templates.to_vec();
    if (seed as f64).sin() > 0.0 {
        ordered.reverse();
    }
    ordered
        .into_iter()
        .take(count)
        .map(str::to_string)
        .collect()
}

fn max_cell_npa(view: &DerivedView) -> f64 {
    view.snapshot
        .credit_risk
        .iter()
        .map(|cell| cell.npa_percent)
        .fold(f64::MIN, f64::max)
}

fn max_churn(view: &DerivedView) -> f64 {
    view.snapshot
        .customer_intelligence
        .iter()
        .map(|segment| segment.churn_probability)
        .fold(f64::MIN, f64::max)
}

/// Up to five bullets for the executive overview: credit, liquidity,
/// customer, fraud, plus one rotating extra domain.
pub fn executive_insights(view: &DerivedView, seed: u64) -> Vec<String> {
    let mut insights = Vec::with_capacity(5);

    if max_cell_npa(view) >= 5.0 {
        insights.push(CREDIT_RISK[0].to_string());
    } else {
        insights.extend(select(&CREDIT_RISK, 1, seed));
    }

    insights.extend(select(&LIQUIDITY, 1, seed + 1));

    if max_churn(view) >= 15.0 {
        insights.push(CUSTOMER[0].to_string());
    } else {
        insights.extend(select(&CUSTOMER, 1, seed + 2));
    }

    insights.extend(select(&FRAUD, 1, seed + 3));

    let extras: [&[&str; 4]; 5] = [
        &COLLECTIONS,
        &TREASURY,
        &BRANCH_NETWORK,
        &COMPLIANCE,
        &OPERATIONAL_RISK,
    ];
    let extra = extras[(seed as usize / 200) % extras.len()];
    insights.extend(select(extra, 1, seed + 4));

    insights.truncate(5);
    insights
}

/// Up to four bullets for one drill-down dashboard. Unknown slugs yield
/// an empty list.
pub fn dashboard_insights(slug: &str, view: &DerivedView, seed: u64) -> Vec<String> {
    let Some(templates) = templates_for(slug) else {
        return Vec::new();
    };
    let mut insights: Vec<String> = Vec::with_capacity(4);

    match slug {
        "credit-risk" => {
            let worst_npa = max_cell_npa(view);
            if worst_npa >= 5.0 {
                insights.push(templates[0].to_string());
            } else {
                insights.extend(select(templates.as_slice(), 1, seed));
            }
            if let Some(worst) = view
                .snapshot
                .credit_risk
                .iter()
                .find(|cell| cell.npa_percent == worst_npa)
            {
                insights.push(format!(
                    "{} and {} show highest NPA at {:.2}%—prioritise review.",
                    worst.region, worst.sector, worst.npa_percent
                ));
            }
            push_filtered(&mut insights, select(templates.as_slice(), 2, seed + 1));
        }
        "liquidity" => {
            if view.snapshot.kpis.lcr_percent < 100.0 {
                insights
                    .push("LCR below regulatory minimum—urgent funding action required.".to_string());
            } else {
                insights.extend(select(templates.as_slice(), 1, seed));
            }
            if view.stress_scenarios.iter().any(|s| s.lcr_impact < 80.0) {
                insights.push(
                    "Combined stress scenario pushes LCR below 80%—review contingency funding."
                        .to_string(),
                );
            }
            push_filtered(&mut insights, select(templates.as_slice(), 2, seed + 2));
        }
        "customer-profitability" => {
            let worst_churn = max_churn(view);
            if worst_churn >= 15.0 {
                insights.push(templates[0].to_string());
            } else {
                insights.extend(select(templates.as_slice(), 1, seed));
            }
            if let Some(at_risk) = view
                .snapshot
                .customer_intelligence
                .iter()
                .find(|segment| segment.churn_probability == worst_churn)
            {
                insights.push(format!(
                    "{} segment shows {:.2}% churn risk—outreach recommended.",
                    at_risk.segment, at_risk.churn_probability
                ));
            }
            push_filtered(&mut insights, select(templates.as_slice(), 2, seed + 3));
        }
        "fraud" => {
            let high_count = view
                .snapshot
                .fraud_signals
                .iter()
                .filter(|signal| signal.severity == Severity::High)
                .count();
            if high_count >= 3 {
                insights
                    .push("Multiple high-severity geo hotspots—escalate to fraud team.".to_string());
            } else {
                insights.extend(select(templates.as_slice(), 1, seed));
            }
            insights.extend(select(templates.as_slice(), 3, seed + 4));
        }
        _ => insights.extend(select(templates.as_slice(), 4, seed)),
    }

    insights.truncate(4);
    insights
}

fn push_filtered(insights: &mut Vec<String>, candidates: Vec<String>) {
    for candidate in candidates {
        if !insights.contains(&candidate) {
            insights.push(candidate);
        }
    }
}

/// True when `slug` names one of the ten drill-down dashboards.
pub fn is_dashboard_slug(slug: &str) -> bool {
    catalog::DASHBOARD_SLUGS.contains(&slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derived::derive;
    use crate::generator::MetricsGenerator;
    use crate::rng::{DomainSlot, RngBank};

    fn view(seed: u64) -> DerivedView {
        let snapshot = MetricsGenerator::new(seed).generate();
        let mut rng = RngBank::new(seed).for_domain(DomainSlot::Derived);
        derive(snapshot, &mut rng)
    }

    #[test]
    fn executive_insights_are_capped_at_five() {
        let view = view(2);
        for seed in 0..50 {
            let insights = executive_insights(&view, seed);
            assert!(!insights.is_empty());
            assert!(insights.len() <= 5);
        }
    }

    #[test]
    fn dashboard_insights_are_capped_at_four() {
        let view = view(2);
        for slug in crate::catalog::DASHBOARD_SLUGS {
            let insights = dashboard_insights(slug, &view, 123);
            assert!(!insights.is_empty(), "no insights for {slug}");
            assert!(insights.len() <= 4);
        }
    }

    #[test]
    fn unknown_slug_yields_nothing() {
        let view = view(2);
        assert!(dashboard_insights("market-share", &view, 9).is_empty());
    }

    #[test]
    fn selection_is_deterministic() {
        let view = view(5);
        assert_eq!(
            executive_insights(&view, 777),
            executive_insights(&view, 777)
        );
    }
}
