//! Shared primitive types used across the entire crate.

use serde::{Deserialize, Serialize};

/// The six executive KPIs shown on the command-centre header bar.
///
/// Serialized names match the wire document field names, so a `KpiKey`
/// round-trips through JSON as `"grossNpaPercent"` etc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KpiKey {
    TotalAdvances,
    GrossNpaPercent,
    NimPercent,
    LcrPercent,
    ChurnRiskPercent,
    EnterpriseRiskIndex,
}

impl KpiKey {
    /// The five keys covered by threshold alerting.
    /// TotalAdvances is informational only and has no thresholds.
    pub const TRACKED: [KpiKey; 5] = [
        KpiKey::GrossNpaPercent,
        KpiKey::NimPercent,
        KpiKey::LcrPercent,
        KpiKey::ChurnRiskPercent,
        KpiKey::EnterpriseRiskIndex,
    ];

    /// Human-readable label used in alert entries and narratives.
    pub fn label(&self) -> &'static str {
        match self {
            KpiKey::TotalAdvances => "Total Advances",
            KpiKey::GrossNpaPercent => "Gross NPA %",
            KpiKey::NimPercent => "NIM %",
            KpiKey::LcrPercent => "LCR %",
            KpiKey::ChurnRiskPercent => "Churn Risk %",
            KpiKey::EnterpriseRiskIndex => "Enterprise Risk Index",
        }
    }
}

/// Traffic-light classification of a KPI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskStatus {
    Normal,
    Warning,
    Critical,
}

impl RiskStatus {
    /// Warning and critical count as breaches; normal does not.
    pub fn is_breach(&self) -> bool {
        matches!(self, RiskStatus::Warning | RiskStatus::Critical)
    }
}
