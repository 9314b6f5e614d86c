//! Derived metrics — roll-ups, trend series, composite scoring, rankings,
//! and peer benchmark deltas computed from a base snapshot.
//!
//! RULES:
//!   - Every derived field is a function of the snapshot's fields and the
//!     explicitly injected RNG stream. No hidden state.
//!   - The responsibilities below are independent of one another; none
//!     reads another's output.

use crate::{
    catalog,
    generator::{round1, round2},
    rng::DomainRng,
    snapshot::{ExecutiveKpis, KriStatus, MetricsSnapshot, Severity},
    types::KpiKey,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarlyWarning {
    /// Rounded mean of the four sub-scores.
    pub composite: u32,
    pub credit: u32,
    pub liquidity: u32,
    pub fraud: u32,
    pub ops: u32,
}

/// Whether the bank beats the peer median on a benchmark metric,
/// honouring the metric's comparison direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeerStanding {
    Ahead,
    Behind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerBenchmark {
    pub metric: String,
    pub bank_value: f64,
    pub peer_median: f64,
    pub peer_p25: f64,
    pub peer_p75: f64,
    pub standing: PeerStanding,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiHistory {
    pub key: KpiKey,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorAggregate {
    pub sector: String,
    pub exposure: f64,
    pub npa_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorNpaPoint {
    pub sector: String,
    pub month: String,
    pub npa_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StressScenario {
    pub scenario: String,
    pub lcr_impact: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductHolding {
    pub segment: String,
    pub product: String,
    pub penetration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FraudTimelinePoint {
    pub date: String,
    pub count: u32,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPoint {
    pub month: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryTrendPoint {
    pub bucket: String,
    pub month: String,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VarHistoryPoint {
    pub date: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchRank {
    pub branch_id: String,
    pub region: String,
    pub score: f64,
    pub deposits: f64,
    pub advances: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    OnTrack,
    AtRisk,
    Overdue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilingEntry {
    pub name: String,
    pub due: String,
    pub status: FilingStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentTrendPoint {
    pub category: String,
    pub month: String,
    pub count: u32,
}

/// A snapshot plus everything computed from it. Composes the base
/// snapshot rather than extending it; `flatten` keeps the wire document
/// a single flat object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedView {
    #[serde(flatten)]
    pub snapshot: MetricsSnapshot,

    pub early_warning: EarlyWarning,
    pub peer_benchmarks: Vec<PeerBenchmark>,
    pub kpi_history: Vec<KpiHistory>,

    // Credit risk
    pub sector_npa_trend: Vec<SectorNpaPoint>,
    pub sector_aggregate: Vec<SectorAggregate>,
    pub net_npa_percent: f64,
    pub slippage_rate: f64,
    pub provision_coverage: f64,
    pub top_risk_region: String,

    // Liquidity
    pub nsfr_percent: f64,
    pub stress_scenarios: Vec<StressScenario>,
    #[serde(rename = "gap3190")]
    pub gap_31_90: f64,
    pub hqla: f64,

    // Customer
    pub product_holding: Vec<ProductHolding>,
    pub cross_sell_ratio: f64,
    pub at_risk_hv_customers: u32,

    // Fraud
    pub fraud_timeline: Vec<FraudTimelinePoint>,
    pub anomaly_count: u32,
    pub velocity_breaches: u32,
    pub geo_hotspots: u32,

    // Growth
    pub advances_trend: Vec<MonthlyPoint>,
    pub casa_trend: Vec<MonthlyPoint>,

    // Collections
    pub recovery_trend: Vec<RecoveryTrendPoint>,
    #[serde(rename = "dpd180Exposure")]
    pub dpd_180_exposure: f64,

    // Treasury
    pub var_history: Vec<VarHistoryPoint>,

    // Branch network
    pub branch_ranking: Vec<BranchRank>,
    pub underperformers: u32,

    // Compliance
    pub filing_calendar: Vec<FilingEntry>,
    pub compliant_percent: u32,
    pub pending_filings: u32,

    // Operational risk
    pub incident_trend: Vec<IncidentTrendPoint>,
    pub kri_red_count: u32,
}

/// Compute the full derived view. Consumes the snapshot — it lives on
/// inside the view; nothing retains the base record separately.
pub fn derive(snapshot: MetricsSnapshot, rng: &mut DomainRng) -> DerivedView {
    let sector_aggregate = aggregate_sectors(&snapshot);
    let top_risk_region = top_risk_region(&snapshot);
    let sector_npa_trend = sector_npa_trend(rng);

    let net_npa_percent = round2(snapshot.kpis.gross_npa_percent * 0.65);
    let slippage_rate = round2(rng.vary(0.8, 0.2));
    let provision_coverage = round2(rng.vary(72.0, 5.0));

    let nsfr_percent = round2(rng.vary(108.0, 5.0));
    let stress_scenarios = vec![
        StressScenario {
            scenario: "7-day run".to_string(),
            lcr_impact: round2(rng.vary(95.0, 5.0)),
        },
        StressScenario {
            scenario: "30-day stress".to_string(),
            lcr_impact: round2(rng.vary(88.0, 6.0)),
        },
        StressScenario {
            scenario: "Combined shock".to_string(),
            lcr_impact: round2(rng.vary(82.0, 8.0)),
        },
    ];
    let gap_31_90 = snapshot
        .liquidity
        .iter()
        .find(|bucket| bucket.maturity_bucket == "31-90 days")
        .map(|bucket| bucket.gap)
        .unwrap_or_else(|| round2(rng.vary(2_000.0, 500.0)));
    let hqla = round2(rng.vary(85_000.0, 5_000.0));

    let product_holding = product_holding(rng);
    let cross_sell_ratio = round2(rng.vary(2.8, 0.4));
    let at_risk_hv_customers = rng.vary(120.0, 30.0).round() as u32;

    let fraud_timeline = fraud_timeline(rng);
    let anomaly_count: u32 = snapshot
        .fraud_signals
        .iter()
        .map(|signal| (signal.anomaly_score * 100.0).round() as u32)
        .sum();
    let velocity_breaches = rng.vary(3.0, 2.0).round() as u32;
    let geo_hotspots = snapshot
        .fraud_signals
        .iter()
        .filter(|signal| signal.severity == Severity::High)
        .count() as u32;

    let advances_trend: Vec<MonthlyPoint> = catalog::TREND_MONTHS
        .iter()
        .enumerate()
        .map(|(i, month)| {
            let base = 450_000.0 + i as f64 * 6_000.0 + rng.uniform(0.0, 3_000.0);
            MonthlyPoint {
                month: month.to_string(),
                value: round2(rng.vary(base, 2_000.0)),
            }
        })
        .collect();
    let casa_trend: Vec<MonthlyPoint> = catalog::TREND_MONTHS
        .iter()
        .enumerate()
        .map(|(i, month)| {
            let base = 40.0 + i as f64 * 0.5 + rng.uniform(0.0, 2.0);
            MonthlyPoint {
                month: month.to_string(),
                value: round2(rng.vary(base, 1.0)),
            }
        })
        .collect();

    let recovery_trend = recovery_trend(rng);
    let dpd_180_exposure = snapshot
        .collections
        .iter()
        .find(|bucket| bucket.bucket == "180+")
        .map(|bucket| (bucket.write_off_amount * 1.5).round())
        .unwrap_or(350.0);

    let var_history: Vec<VarHistoryPoint> = catalog::TIMELINE_DATES[1..]
        .iter()
        .enumerate()
        .map(|(i, date)| {
            let base = 115.0 + i as f64 * 2.0 + rng.uniform(0.0, 15.0);
            VarHistoryPoint {
                date: date.to_string(),
                value: round2(rng.vary(base, 5.0)),
            }
        })
        .collect();

    let branch_ranking = rank_branches(&snapshot);
    let underperformers = snapshot
        .branch_network
        .iter()
        .filter(|branch| branch.footfall_conversion < 15.0)
        .count() as u32;

    let filing_calendar = filing_calendar(rng);
    let compliant_count = snapshot
        .compliance
        .iter()
        .filter(|record| record.status == crate::snapshot::ComplianceStatus::Compliant)
        .count();
    let compliant_percent =
        ((compliant_count as f64 / snapshot.compliance.len() as f64) * 100.0).round() as u32;
    let pending_filings = (snapshot.compliance.len() - compliant_count) as u32;

    let incident_trend = incident_trend(rng);
    let kri_red_count = snapshot
        .operational_risk
        .iter()
        .filter(|record| record.kri_status == KriStatus::Red)
        .count() as u32;

    let early_warning = early_warning(&snapshot);
    let peer_benchmarks = peer_benchmarks(&snapshot.kpis, rng);
    let kpi_history = kpi_history(
        &snapshot,
        &advances_trend,
        &casa_trend,
        &sector_npa_trend,
        &var_history,
    );

    DerivedView {
        snapshot,
        early_warning,
        peer_benchmarks,
        kpi_history,
        sector_npa_trend,
        sector_aggregate,
        net_npa_percent,
        slippage_rate,
        provision_coverage,
        top_risk_region,
        nsfr_percent,
        stress_scenarios,
        gap_31_90,
        hqla,
        product_holding,
        cross_sell_ratio,
        at_risk_hv_customers,
        fraud_timeline,
        anomaly_count,
        velocity_breaches,
        geo_hotspots,
        advances_trend,
        casa_trend,
        recovery_trend,
        dpd_180_exposure,
        var_history,
        branch_ranking,
        underperformers,
        filing_calendar,
        compliant_percent,
        pending_filings,
        incident_trend,
        kri_red_count,
    }
}

/// Sector-level exposure totals and average NPA. All six sectors appear;
/// the two without regional cells aggregate to zero.
fn aggregate_sectors(snapshot: &MetricsSnapshot) -> Vec<SectorAggregate> {
    catalog::SECTORS
        .iter()
        .map(|sector| {
            let cells: Vec<_> = snapshot
                .credit_risk
                .iter()
                .filter(|cell| cell.sector == *sector)
                .collect();
            let exposure: f64 = cells.iter().map(|cell| cell.exposure).sum();
            let npa_percent = if cells.is_empty() {
                0.0
            } else {
                round2(cells.iter().map(|cell| cell.npa_percent).sum::<f64>() / cells.len() as f64)
            };
            SectorAggregate {
                sector: sector.to_string(),
                exposure,
                npa_percent,
            }
        })
        .collect()
}

/// The region with the highest average NPA across its cells.
/// Ties resolve to the region listed first in the catalog — strict
/// greater-than keeps the earlier region.
fn top_risk_region(snapshot: &MetricsSnapshot) -> String {
    let mut top = catalog::REGIONS[0];
    let mut top_avg = f64::MIN;
    for region in catalog::REGIONS {
        let cells: Vec<_> = snapshot
            .credit_risk
            .iter()
            .filter(|cell| cell.region == region)
            .collect();
        if cells.is_empty() {
            continue;
        }
        let avg = cells.iter().map(|cell| cell.npa_percent).sum::<f64>() / cells.len() as f64;
        if avg > top_avg {
            top_avg = avg;
            top = region;
        }
    }
    top.to_string()
}

/// Six-month random walk per credit sector, clamped to the NPA band.
fn sector_npa_trend(rng: &mut DomainRng) -> Vec<SectorNpaPoint> {
    let mut points = Vec::with_capacity(catalog::CREDIT_SECTOR_COUNT * catalog::TREND_MONTHS.len());
    for sector in &catalog::SECTORS[..catalog::CREDIT_SECTOR_COUNT] {
        let mut level = rng.vary(2.5, 0.5);
        for month in catalog::TREND_MONTHS {
            level = (level + rng.uniform(-0.4, 0.4)).clamp(1.0, 8.0);
            points.push(SectorNpaPoint {
                sector: sector.to_string(),
                month: month.to_string(),
                npa_percent: round2(level),
            });
        }
    }
    points
}

fn product_holding(rng: &mut DomainRng) -> Vec<ProductHolding> {
    let mut holdings =
        Vec::with_capacity(catalog::CUSTOMER_SEGMENTS.len() * catalog::HOLDING_PRODUCT_COUNT);
    for segment in catalog::CUSTOMER_SEGMENTS {
        for product in &catalog::PRODUCTS[..catalog::HOLDING_PRODUCT_COUNT] {
            let base = 15.0 + rng.uniform(0.0, 60.0);
            holdings.push(ProductHolding {
                segment: segment.to_string(),
                product: product.to_string(),
                penetration: round2(rng.vary(base, 8.0)),
            });
        }
    }
    holdings
}

fn fraud_timeline(rng: &mut DomainRng) -> Vec<FraudTimelinePoint> {
    const SEVERITIES: [Severity; 3] = [Severity::Low, Severity::Medium, Severity::High];
    catalog::TIMELINE_DATES
        .iter()
        .enumerate()
        .map(|(i, date)| {
            let base = 8.0 + i as f64 * 2.0 + rng.uniform(0.0, 10.0);
            FraudTimelinePoint {
                date: date.to_string(),
                count: rng.vary(base, 3.0).round().max(0.0) as u32,
                severity: *rng.pick(&SEVERITIES),
            }
        })
        .collect()
}

/// Six-month recovery-rate walk per DPD bucket, clamped to [1, 90].
fn recovery_trend(rng: &mut DomainRng) -> Vec<RecoveryTrendPoint> {
    let mut points = Vec::with_capacity(catalog::DPD_BUCKETS.len() * catalog::TREND_MONTHS.len());
    for bucket in catalog::DPD_BUCKETS {
        let mut level = rng.vary(50.0, 10.0);
        for month in catalog::TREND_MONTHS {
            level = (level + rng.uniform(-2.5, 2.5)).clamp(1.0, 90.0);
            points.push(RecoveryTrendPoint {
                bucket: bucket.to_string(),
                month: month.to_string(),
                rate: round2(level),
            });
        }
    }
    points
}

/// Score every branch, sort descending, keep the top ten. The sort is
/// stable, so branches with equal scores keep their input order.
fn rank_branches(snapshot: &MetricsSnapshot) -> Vec<BranchRank> {
    let mut ranked: Vec<BranchRank> = snapshot
        .branch_network
        .iter()
        .map(|branch| BranchRank {
            branch_id: branch.branch_id.clone(),
            region: branch.region.clone(),
            score: round2(
                branch.deposits / 1_000.0
                    + branch.advances / 1_000.0
                    + branch.cross_sell_count * 10.0,
            ),
            deposits: branch.deposits,
            advances: branch.advances,
        })
        .collect();
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).expect("scores are finite"));
    ranked.truncate(10);
    ranked
}

fn filing_calendar(rng: &mut DomainRng) -> Vec<FilingEntry> {
    const ALL: [FilingStatus; 3] = [
        FilingStatus::OnTrack,
        FilingStatus::AtRisk,
        FilingStatus::Overdue,
    ];
    const EARLY: [FilingStatus; 2] = [FilingStatus::OnTrack, FilingStatus::AtRisk];
    vec![
        FilingEntry {
            name: "RBI LCR".to_string(),
            due: "2025-03-15".to_string(),
            status: *rng.pick(&ALL),
        },
        FilingEntry {
            name: "IFRS 9".to_string(),
            due: "2025-03-31".to_string(),
            status: *rng.pick(&EARLY),
        },
        FilingEntry {
            name: "AML/KYC".to_string(),
            due: "2025-04-10".to_string(),
            status: *rng.pick(&EARLY),
        },
        FilingEntry {
            name: "BASEL III".to_string(),
            due: "2025-04-30".to_string(),
            status: FilingStatus::OnTrack,
        },
    ]
}

fn incident_trend(rng: &mut DomainRng) -> Vec<IncidentTrendPoint> {
    let mut points =
        Vec::with_capacity(catalog::OPS_RISK_CATEGORIES.len() * catalog::TREND_MONTHS.len());
    for category in catalog::OPS_RISK_CATEGORIES {
        let mut level = rng.vary(2.0, 1.0);
        for month in catalog::TREND_MONTHS {
            level = (level + rng.uniform(-1.0, 1.0)).max(0.0);
            points.push(IncidentTrendPoint {
                category: category.to_string(),
                month: month.to_string(),
                count: level.round() as u32,
            });
        }
    }
    points
}

/// The early-warning scorecard: four weighted sub-scores clamped to
/// [0, 100], composite = rounded mean of the clamped four. Weights and
/// clamp bounds are fixed, not configurable.
fn early_warning(snapshot: &MetricsSnapshot) -> EarlyWarning {
    let avg_cell_npa = snapshot
        .credit_risk
        .iter()
        .map(|cell| cell.npa_percent)
        .sum::<f64>()
        / snapshot.credit_risk.len() as f64;
    let gross_step = if snapshot.kpis.gross_npa_percent >= 6.0 {
        25.0
    } else if snapshot.kpis.gross_npa_percent >= 4.0 {
        15.0
    } else {
        5.0
    };
    let credit = (avg_cell_npa * 15.0 + gross_step).round().clamp(0.0, 100.0);

    let liquidity: f64 = if snapshot.kpis.lcr_percent < 90.0 {
        30.0
    } else if snapshot.kpis.lcr_percent < 100.0 {
        20.0
    } else {
        10.0
    };

    let high_severity = snapshot
        .fraud_signals
        .iter()
        .filter(|signal| signal.severity == Severity::High)
        .count() as f64;
    let anomaly_sum: f64 = snapshot
        .fraud_signals
        .iter()
        .map(|signal| signal.anomaly_score * 10.0)
        .sum();
    let fraud = (high_severity * 8.0 + anomaly_sum).round().clamp(0.0, 100.0);

    let red = snapshot
        .operational_risk
        .iter()
        .filter(|record| record.kri_status == KriStatus::Red)
        .count() as f64;
    let amber = snapshot
        .operational_risk
        .iter()
        .filter(|record| record.kri_status == KriStatus::Amber)
        .count() as f64;
    let ops = (red * 15.0 + amber * 5.0).clamp(0.0, 100.0);

    EarlyWarning {
        composite: ((credit + liquidity + fraud + ops) / 4.0).round() as u32,
        credit: credit as u32,
        liquidity: liquidity as u32,
        fraud: fraud as u32,
        ops: ops as u32,
    }
}

/// Peer medians are drawn fresh each cycle; the standing honours each
/// metric's direction (lower NPA is better, higher NIM/LCR is better).
fn peer_benchmarks(kpis: &ExecutiveKpis, rng: &mut DomainRng) -> Vec<PeerBenchmark> {
    let npa_median = round2(rng.vary(4.5, 0.5));
    let nim_median = round2(rng.vary(3.6, 0.3));
    let lcr_median = round2(rng.vary(115.0, 5.0));
    vec![
        PeerBenchmark {
            metric: "Gross NPA %".to_string(),
            bank_value: kpis.gross_npa_percent,
            peer_median: npa_median,
            peer_p25: 3.2,
            peer_p75: 5.8,
            standing: if kpis.gross_npa_percent <= npa_median {
                PeerStanding::Ahead
            } else {
                PeerStanding::Behind
            },
        },
        PeerBenchmark {
            metric: "NIM %".to_string(),
            bank_value: kpis.nim_percent,
            peer_median: nim_median,
            peer_p25: 3.2,
            peer_p75: 4.0,
            standing: if kpis.nim_percent >= nim_median {
                PeerStanding::Ahead
            } else {
                PeerStanding::Behind
            },
        },
        PeerBenchmark {
            metric: "LCR %".to_string(),
            bank_value: kpis.lcr_percent,
            peer_median: lcr_median,
            peer_p25: 108.0,
            peer_p75: 125.0,
            standing: if kpis.lcr_percent >= lcr_median {
                PeerStanding::Ahead
            } else {
                PeerStanding::Behind
            },
        },
    ]
}

/// Six-point sparkline series per executive KPI, stitched from the trend
/// series so the header bar matches the drill-down charts.
fn kpi_history(
    snapshot: &MetricsSnapshot,
    advances_trend: &[MonthlyPoint],
    casa_trend: &[MonthlyPoint],
    sector_npa_trend: &[SectorNpaPoint],
    var_history: &[VarHistoryPoint],
) -> Vec<KpiHistory> {
    let retail_npa: Vec<f64> = sector_npa_trend
        .iter()
        .filter(|point| point.sector == "Retail")
        .map(|point| point.npa_percent)
        .collect();
    let npa_values = if retail_npa.len() >= 6 {
        retail_npa[retail_npa.len() - 6..].to_vec()
    } else {
        vec![3.5, 3.8, 4.0, 4.1, 4.0, snapshot.kpis.gross_npa_percent]
    };

    let mut churn_values: Vec<f64> = snapshot
        .customer_intelligence
        .iter()
        .take(5)
        .map(|segment| segment.churn_probability)
        .collect();
    churn_values.push(snapshot.kpis.churn_risk_percent);

    let mut risk_values: Vec<f64> = var_history
        .iter()
        .take(5)
        .map(|point| round1(58.0 + point.value / 20.0))
        .collect();
    risk_values.push(snapshot.kpis.enterprise_risk_index);

    vec![
        KpiHistory {
            key: KpiKey::TotalAdvances,
            values: advances_trend
                .iter()
                .map(|point| round2(point.value / 1_000.0))
                .collect(),
        },
        KpiHistory {
            key: KpiKey::GrossNpaPercent,
            values: npa_values,
        },
        KpiHistory {
            key: KpiKey::NimPercent,
            values: casa_trend
                .iter()
                .map(|point| round2(3.2 + point.value / 100.0))
                .collect(),
        },
        KpiHistory {
            key: KpiKey::LcrPercent,
            values: vec![115.0, 116.0, 117.0, 116.0, 117.0, snapshot.kpis.lcr_percent],
        },
        KpiHistory {
            key: KpiKey::ChurnRiskPercent,
            values: churn_values,
        },
        KpiHistory {
            key: KpiKey::EnterpriseRiskIndex,
            values: risk_values,
        },
    ]
}
