//! The synthetic metrics generator.
//!
//! RULES:
//!   - generate() cannot fail. It is pure computation over the fixed
//!     catalog enumerations and the generator's own RNG streams.
//!   - Every varied field is produced by DomainRng::vary and therefore
//!     lies within [base - variance, base + variance].
//!   - Currency and percentage fields round to 2 decimals, index scores
//!     to 1, counts to whole numbers.
//!
//! Each domain draws from its own persistent stream, so consecutive
//! snapshots differ while the whole sequence stays reproducible from the
//! master seed.

use crate::{
    catalog,
    rng::{DomainRng, DomainSlot, RngBank},
    snapshot::{
        BranchRecord, ChannelShare, CollectionsBucket, ComplianceRecord, ComplianceStatus,
        CreditRiskCell, CustomerSegment, DelinquencyTrend, ExecutiveKpis, FraudSignal,
        GrowthRecord, KriStatus, LiquidityBucket, MetricsSnapshot, OperationalRiskRecord,
        Severity, TreasuryDesk,
    },
};

pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

pub(crate) fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

const TRENDS: [DelinquencyTrend; 3] = [
    DelinquencyTrend::Improving,
    DelinquencyTrend::Stable,
    DelinquencyTrend::Worsening,
];

const SEVERITIES: [Severity; 3] = [Severity::Low, Severity::Medium, Severity::High];

const COMPLIANCE_STATUSES: [ComplianceStatus; 3] = [
    ComplianceStatus::Compliant,
    ComplianceStatus::Pending,
    ComplianceStatus::Overdue,
];

const KRI_STATUSES: [KriStatus; 3] = [KriStatus::Green, KriStatus::Amber, KriStatus::Red];

pub struct MetricsGenerator {
    kpis: DomainRng,
    credit: DomainRng,
    liquidity: DomainRng,
    customer: DomainRng,
    fraud: DomainRng,
    collections: DomainRng,
    treasury: DomainRng,
    branch: DomainRng,
    compliance: DomainRng,
    ops_risk: DomainRng,
    growth: DomainRng,
}

impl MetricsGenerator {
    pub fn new(master_seed: u64) -> Self {
        let bank = RngBank::new(master_seed);
        Self {
            kpis: bank.for_domain(DomainSlot::Kpis),
            credit: bank.for_domain(DomainSlot::CreditRisk),
            liquidity: bank.for_domain(DomainSlot::Liquidity),
            customer: bank.for_domain(DomainSlot::Customer),
            fraud: bank.for_domain(DomainSlot::Fraud),
            collections: bank.for_domain(DomainSlot::Collections),
            treasury: bank.for_domain(DomainSlot::Treasury),
            branch: bank.for_domain(DomainSlot::Branch),
            compliance: bank.for_domain(DomainSlot::Compliance),
            ops_risk: bank.for_domain(DomainSlot::OpsRisk),
            growth: bank.for_domain(DomainSlot::Growth),
        }
    }

    /// Produce one full snapshot. Advances every domain stream.
    pub fn generate(&mut self) -> MetricsSnapshot {
        let snapshot = MetricsSnapshot {
            kpis: self.generate_kpis(),
            credit_risk: self.generate_credit_risk(),
            liquidity: self.generate_liquidity(),
            customer_intelligence: self.generate_customers(),
            fraud_signals: self.generate_fraud(),
            collections: self.generate_collections(),
            treasury: self.generate_treasury(),
            branch_network: self.generate_branches(),
            compliance: self.generate_compliance(),
            operational_risk: self.generate_ops_risk(),
            growth: self.generate_growth(),
        };
        log::debug!(
            "snapshot: advances={:.0} gross_npa={:.2} lcr={:.2}",
            snapshot.kpis.total_advances,
            snapshot.kpis.gross_npa_percent,
            snapshot.kpis.lcr_percent
        );
        snapshot
    }

    fn generate_kpis(&mut self) -> ExecutiveKpis {
        let rng = &mut self.kpis;
        ExecutiveKpis {
            // ₹ Cr
            total_advances: round2(rng.vary(485_000.0, 8_000.0)),
            gross_npa_percent: round2(rng.vary(4.2, 0.3)),
            nim_percent: round2(rng.vary(3.85, 0.1)),
            lcr_percent: round2(rng.vary(118.0, 4.0)),
            churn_risk_percent: round2(rng.vary(12.4, 1.2)),
            enterprise_risk_index: round1(rng.vary(62.0, 5.0)),
        }
    }

    /// One cell per (region, sector) pair; only the first four sectors
    /// carry regional exposure.
    fn generate_credit_risk(&mut self) -> Vec<CreditRiskCell> {
        let rng = &mut self.credit;
        let mut cells = Vec::with_capacity(catalog::REGIONS.len() * catalog::CREDIT_SECTOR_COUNT);
        for region in catalog::REGIONS {
            for sector in &catalog::SECTORS[..catalog::CREDIT_SECTOR_COUNT] {
                let exposure_base = 8_000.0 + rng.uniform(0.0, 12_000.0);
                let npa_base = 2.0 + rng.uniform(0.0, 5.0);
                cells.push(CreditRiskCell {
                    region: region.to_string(),
                    sector: sector.to_string(),
                    exposure: round2(rng.vary(exposure_base, 1_500.0)),
                    npa_percent: round2(rng.vary(npa_base, 0.5)),
                    delinquency_trend: *rng.pick(&TRENDS),
                });
            }
        }
        cells
    }

    fn generate_liquidity(&mut self) -> Vec<LiquidityBucket> {
        let rng = &mut self.liquidity;
        catalog::MATURITY_BUCKETS
            .iter()
            .enumerate()
            .map(|(i, bucket)| {
                let assets = round2(rng.vary(15_000.0 + i as f64 * 8_000.0, 2_000.0));
                let liabilities = round2(rng.vary(12_000.0 + i as f64 * 7_000.0, 1_800.0));
                LiquidityBucket {
                    maturity_bucket: bucket.to_string(),
                    assets,
                    liabilities,
                    gap: round2(assets - liabilities),
                }
            })
            .collect()
    }

    fn generate_customers(&mut self) -> Vec<CustomerSegment> {
        let rng = &mut self.customer;
        catalog::CUSTOMER_SEGMENTS
            .iter()
            .map(|segment| {
                let balance_base = 250_000.0 + rng.uniform(0.0, 1_500_000.0);
                let profit_base = 8.0 + rng.uniform(0.0, 12.0);
                let churn_base = 5.0 + rng.uniform(0.0, 15.0);
                CustomerSegment {
                    segment: segment.to_string(),
                    avg_balance: round2(rng.vary(balance_base, 50_000.0)),
                    profitability: round2(rng.vary(profit_base, 1.0)),
                    churn_probability: round2(rng.vary(churn_base, 2.0)),
                }
            })
            .collect()
    }

    fn generate_fraud(&mut self) -> Vec<FraudSignal> {
        let rng = &mut self.fraud;
        catalog::FRAUD_CITIES
            .iter()
            .map(|city| {
                let volume_base = 500.0 + rng.uniform(0.0, 2_000.0);
                let anomaly_base = 0.2 + rng.uniform(0.0, 0.6);
                FraudSignal {
                    transaction_volume: rng.vary(volume_base, 200.0).round() as u32,
                    anomaly_score: round2(rng.vary(anomaly_base, 0.1)),
                    geo_location: city.to_string(),
                    severity: *rng.pick(&SEVERITIES),
                }
            })
            .collect()
    }

    /// Recovery rate falls as the DPD band ages; write-offs rise.
    fn generate_collections(&mut self) -> Vec<CollectionsBucket> {
        let rng = &mut self.collections;
        catalog::DPD_BUCKETS
            .iter()
            .enumerate()
            .map(|(i, bucket)| {
                let efficiency_base = 72.0 + rng.uniform(0.0, 15.0);
                CollectionsBucket {
                    bucket: bucket.to_string(),
                    recovery_rate: round2(rng.vary(45.0 + (4 - i) as f64 * 12.0, 4.0)),
                    dpd_days: catalog::DPD_DAYS[i],
                    collection_efficiency: round2(rng.vary(efficiency_base, 5.0)),
                    write_off_amount: round2(rng.vary(50.0 + i as f64 * 80.0, 20.0)),
                }
            })
            .collect()
    }

    fn generate_treasury(&mut self) -> TreasuryDesk {
        let rng = &mut self.treasury;
        TreasuryDesk {
            var_value: round2(rng.vary(125.0, 15.0)),
            duration_gap: round2(rng.vary(0.8, 0.2)),
            fx_exposure: round2(rng.vary(450.0, 80.0)),
            mtm_pnl: round2(rng.vary(12.5, 5.0)),
        }
    }

    fn generate_branches(&mut self) -> Vec<BranchRecord> {
        let rng = &mut self.branch;
        let mut branches =
            Vec::with_capacity(catalog::BRANCH_REGIONS.len() * catalog::BRANCHES_PER_REGION);
        for (ri, region) in catalog::BRANCH_REGIONS.iter().enumerate() {
            for bi in 0..catalog::BRANCHES_PER_REGION {
                let deposits_base = 8_000.0 + rng.uniform(0.0, 12_000.0);
                let advances_base = 6_000.0 + rng.uniform(0.0, 10_000.0);
                let cross_sell_base = 2.5 + rng.uniform(0.0, 3.0);
                let atm_base = 55.0 + rng.uniform(0.0, 35.0);
                let footfall_base = 18.0 + rng.uniform(0.0, 12.0);
                branches.push(BranchRecord {
                    branch_id: format!(
                        "{}-{}",
                        &region[..2],
                        ri * catalog::BRANCHES_PER_REGION + bi + 1
                    ),
                    region: region.to_string(),
                    deposits: round2(rng.vary(deposits_base, 1_500.0)),
                    advances: round2(rng.vary(advances_base, 1_200.0)),
                    cross_sell_count: round2(rng.vary(cross_sell_base, 0.5)),
                    atm_utilisation: round2(rng.vary(atm_base, 8.0)),
                    footfall_conversion: round2(rng.vary(footfall_base, 3.0)),
                });
            }
        }
        branches
    }

    fn generate_compliance(&mut self) -> Vec<ComplianceRecord> {
        let rng = &mut self.compliance;
        catalog::REGULATIONS
            .iter()
            .map(|regulation| {
                let is_aml = *regulation == "AML/KYC";
                ComplianceRecord {
                    regulation: regulation.to_string(),
                    status: *rng.pick(&COMPLIANCE_STATUSES),
                    aml_alert_count: if is_aml {
                        rng.vary(24.0, 8.0).round() as u32
                    } else {
                        0
                    },
                    sanctions_hits: if is_aml {
                        rng.vary(3.0, 2.0).round() as u32
                    } else {
                        0
                    },
                    filing_due_date: match *regulation {
                        "RBI LCR" => "2025-03-15",
                        "IFRS 9" => "2025-03-31",
                        _ => "2025-04-10",
                    }
                    .to_string(),
                }
            })
            .collect()
    }

    fn generate_ops_risk(&mut self) -> Vec<OperationalRiskRecord> {
        let rng = &mut self.ops_risk;
        catalog::OPS_RISK_CATEGORIES
            .iter()
            .map(|category| {
                let incident_base = 2.0 + rng.uniform(0.0, 8.0);
                let loss_base = 5.0 + rng.uniform(0.0, 45.0);
                OperationalRiskRecord {
                    category: category.to_string(),
                    incident_count: rng.vary(incident_base, 2.0).round().max(0.0) as u32,
                    loss_amount: round2(rng.vary(loss_base, 10.0).max(0.0)),
                    kri_status: *rng.pick(&KRI_STATUSES),
                }
            })
            .collect()
    }

    fn generate_growth(&mut self) -> GrowthRecord {
        let rng = &mut self.growth;
        let channel_split = [(0, 45.0, 3.0), (1, 28.0, 2.0), (2, 18.0, 2.0), (3, 9.0, 1.0)]
            .iter()
            .map(|&(ci, base, variance)| ChannelShare {
                channel: catalog::CHANNELS[ci].to_string(),
                share: round2(rng.vary(base, variance)),
            })
            .collect();
        GrowthRecord {
            advances_growth: round2(rng.vary(12.5, 1.5)),
            casa_ratio: round2(rng.vary(42.0, 3.0)),
            digital_adoption: round2(rng.vary(68.0, 5.0)),
            channel_split,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_helpers() {
        assert_eq!(round2(4.2345), 4.23);
        assert_eq!(round2(4.2355), 4.24);
        assert_eq!(round1(62.47), 62.5);
    }

    #[test]
    fn branch_ids_follow_region_prefix() {
        let mut generator = MetricsGenerator::new(11);
        let snapshot = generator.generate();
        let first = &snapshot.branch_network[0];
        assert_eq!(first.branch_id, "No-1");
        assert_eq!(first.region, "North");
        let last = snapshot.branch_network.last().unwrap();
        assert_eq!(last.branch_id, "Ce-15");
    }

    #[test]
    fn consecutive_snapshots_differ() {
        let mut generator = MetricsGenerator::new(5);
        let a = generator.generate();
        let b = generator.generate();
        assert_ne!(a, b);
    }
}
