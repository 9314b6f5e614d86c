//! The metrics snapshot — one immutable record per refresh cycle.
//!
//! A snapshot is created fresh on every refresh, never mutated after
//! creation, and discarded when the next one supersedes it. Field names
//! serialize in camelCase to match the dashboard wire document.

use crate::types::KpiKey;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutiveKpis {
    pub total_advances: f64,
    pub gross_npa_percent: f64,
    pub nim_percent: f64,
    pub lcr_percent: f64,
    pub churn_risk_percent: f64,
    pub enterprise_risk_index: f64,
}

impl ExecutiveKpis {
    /// Scalar lookup by key. Keeps threshold/alert code free of field matches.
    pub fn value(&self, key: KpiKey) -> f64 {
        match key {
            KpiKey::TotalAdvances => self.total_advances,
            KpiKey::GrossNpaPercent => self.gross_npa_percent,
            KpiKey::NimPercent => self.nim_percent,
            KpiKey::LcrPercent => self.lcr_percent,
            KpiKey::ChurnRiskPercent => self.churn_risk_percent,
            KpiKey::EnterpriseRiskIndex => self.enterprise_risk_index,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DelinquencyTrend {
    Improving,
    Stable,
    Worsening,
}

/// One cell of the region × sector credit-risk map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditRiskCell {
    pub region: String,
    pub sector: String,
    pub exposure: f64,
    pub npa_percent: f64,
    pub delinquency_trend: DelinquencyTrend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidityBucket {
    pub maturity_bucket: String,
    pub assets: f64,
    pub liabilities: f64,
    /// Always assets - liabilities; stored so the wire document carries it.
    pub gap: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSegment {
    pub segment: String,
    pub avg_balance: f64,
    pub profitability: f64,
    pub churn_probability: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FraudSignal {
    pub transaction_volume: u32,
    pub anomaly_score: f64,
    pub geo_location: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionsBucket {
    pub bucket: String,
    pub recovery_rate: f64,
    pub dpd_days: u32,
    pub collection_efficiency: f64,
    pub write_off_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreasuryDesk {
    pub var_value: f64,
    pub duration_gap: f64,
    pub fx_exposure: f64,
    pub mtm_pnl: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchRecord {
    pub branch_id: String,
    pub region: String,
    pub deposits: f64,
    pub advances: f64,
    pub cross_sell_count: f64,
    pub atm_utilisation: f64,
    pub footfall_conversion: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplianceStatus {
    Compliant,
    Pending,
    Overdue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceRecord {
    pub regulation: String,
    pub status: ComplianceStatus,
    /// Non-zero only on the AML/KYC row.
    pub aml_alert_count: u32,
    /// Non-zero only on the AML/KYC row.
    pub sanctions_hits: u32,
    pub filing_due_date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KriStatus {
    Green,
    Amber,
    Red,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationalRiskRecord {
    pub category: String,
    pub incident_count: u32,
    pub loss_amount: f64,
    pub kri_status: KriStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelShare {
    pub channel: String,
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthRecord {
    pub advances_growth: f64,
    pub casa_ratio: f64,
    pub digital_adoption: f64,
    pub channel_split: Vec<ChannelShare>,
}

/// Everything one refresh cycle produces, before derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub kpis: ExecutiveKpis,
    pub credit_risk: Vec<CreditRiskCell>,
    pub liquidity: Vec<LiquidityBucket>,
    pub customer_intelligence: Vec<CustomerSegment>,
    pub fraud_signals: Vec<FraudSignal>,
    pub collections: Vec<CollectionsBucket>,
    pub treasury: TreasuryDesk,
    pub branch_network: Vec<BranchRecord>,
    pub compliance: Vec<ComplianceRecord>,
    pub operational_risk: Vec<OperationalRiskRecord>,
    pub growth: GrowthRecord,
}
