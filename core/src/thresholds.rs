//! Threshold engine — classifies KPI values into traffic-light statuses
//! against configurable per-KPI bounds.
//!
//! The comparison direction is part of each KPI's fixed classification
//! rule, never part of the configuration: NPA, churn, and the risk index
//! breach upward; NIM and LCR breach downward. Only the numeric bounds
//! are user-configurable, and overrides merge field-by-field over the
//! hardcoded defaults.

use crate::{
    store::{KvStore, THRESHOLDS_KEY},
    types::{KpiKey, RiskStatus},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPair {
    pub warning: f64,
    pub critical: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdConfig {
    pub gross_npa_percent: ThresholdPair,
    pub nim_percent: ThresholdPair,
    pub lcr_percent: ThresholdPair,
    pub churn_risk_percent: ThresholdPair,
    pub enterprise_risk_index: ThresholdPair,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            gross_npa_percent: ThresholdPair {
                warning: 4.5,
                critical: 6.0,
            },
            nim_percent: ThresholdPair {
                warning: 3.2,
                critical: 2.5,
            },
            lcr_percent: ThresholdPair {
                warning: 100.0,
                critical: 90.0,
            },
            churn_risk_percent: ThresholdPair {
                warning: 14.0,
                critical: 18.0,
            },
            enterprise_risk_index: ThresholdPair {
                warning: 65.0,
                critical: 75.0,
            },
        }
    }
}

impl ThresholdConfig {
    /// The bounds for a tracked key; None for TotalAdvances.
    pub fn pair(&self, key: KpiKey) -> Option<ThresholdPair> {
        match key {
            KpiKey::TotalAdvances => None,
            KpiKey::GrossNpaPercent => Some(self.gross_npa_percent),
            KpiKey::NimPercent => Some(self.nim_percent),
            KpiKey::LcrPercent => Some(self.lcr_percent),
            KpiKey::ChurnRiskPercent => Some(self.churn_risk_percent),
            KpiKey::EnterpriseRiskIndex => Some(self.enterprise_risk_index),
        }
    }

    /// Apply a partial override on top of this config, field-by-field.
    /// Keys missing from the override keep their current bounds.
    pub fn merged(&self, overrides: &ThresholdOverrides) -> ThresholdConfig {
        ThresholdConfig {
            gross_npa_percent: overrides.gross_npa_percent.unwrap_or(self.gross_npa_percent),
            nim_percent: overrides.nim_percent.unwrap_or(self.nim_percent),
            lcr_percent: overrides.lcr_percent.unwrap_or(self.lcr_percent),
            churn_risk_percent: overrides
                .churn_risk_percent
                .unwrap_or(self.churn_risk_percent),
            enterprise_risk_index: overrides
                .enterprise_risk_index
                .unwrap_or(self.enterprise_risk_index),
        }
    }
}

/// A partial threshold record, as stored and as accepted from callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gross_npa_percent: Option<ThresholdPair>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nim_percent: Option<ThresholdPair>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lcr_percent: Option<ThresholdPair>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub churn_risk_percent: Option<ThresholdPair>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enterprise_risk_index: Option<ThresholdPair>,
}

/// Classify a KPI value. Total: unrecognized/untracked keys are Normal.
/// The critical bound always dominates — a value past critical is never
/// reported as warning.
pub fn classify(key: KpiKey, value: f64, config: &ThresholdConfig) -> RiskStatus {
    let Some(pair) = config.pair(key) else {
        return RiskStatus::Normal;
    };
    match key {
        // Higher is worse.
        KpiKey::GrossNpaPercent | KpiKey::ChurnRiskPercent | KpiKey::EnterpriseRiskIndex => {
            if value >= pair.critical {
                RiskStatus::Critical
            } else if value >= pair.warning {
                RiskStatus::Warning
            } else {
                RiskStatus::Normal
            }
        }
        // Lower is worse.
        KpiKey::NimPercent | KpiKey::LcrPercent => {
            if value < pair.critical {
                RiskStatus::Critical
            } else if value < pair.warning {
                RiskStatus::Warning
            } else {
                RiskStatus::Normal
            }
        }
        KpiKey::TotalAdvances => RiskStatus::Normal,
    }
}

/// Stored overrides merged over defaults. Storage failures and corrupt
/// records degrade to the defaults — never an error.
pub fn get_thresholds(store: &dyn KvStore) -> ThresholdConfig {
    let defaults = ThresholdConfig::default();
    match store.get(THRESHOLDS_KEY) {
        Ok(Some(raw)) => match serde_json::from_str::<ThresholdOverrides>(&raw) {
            Ok(overrides) => defaults.merged(&overrides),
            Err(err) => {
                log::warn!("threshold record unreadable, using defaults: {err}");
                defaults
            }
        },
        Ok(None) => defaults,
        Err(err) => {
            log::warn!("threshold store unavailable, using defaults: {err}");
            defaults
        }
    }
}

/// Merge a partial override into the current config and persist the
/// merged record. Storage failures are swallowed.
pub fn set_thresholds(store: &dyn KvStore, overrides: &ThresholdOverrides) {
    let merged = get_thresholds(store).merged(overrides);
    match serde_json::to_string(&merged) {
        Ok(raw) => {
            if let Err(err) = store.set(THRESHOLDS_KEY, &raw) {
                log::warn!("threshold store write failed: {err}");
            }
        }
        Err(err) => log::warn!("threshold record serialization failed: {err}"),
    }
}

/// Drop all overrides; subsequent reads return the defaults.
pub fn reset_thresholds(store: &dyn KvStore) {
    if let Err(err) = store.remove(THRESHOLDS_KEY) {
        log::warn!("threshold store reset failed: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn higher_is_worse_keys() {
        let config = ThresholdConfig::default();
        assert_eq!(
            classify(KpiKey::GrossNpaPercent, 3.0, &config),
            RiskStatus::Normal
        );
        assert_eq!(
            classify(KpiKey::GrossNpaPercent, 4.5, &config),
            RiskStatus::Warning
        );
        assert_eq!(
            classify(KpiKey::GrossNpaPercent, 6.0, &config),
            RiskStatus::Critical
        );
    }

    #[test]
    fn lower_is_worse_keys() {
        let config = ThresholdConfig::default();
        assert_eq!(
            classify(KpiKey::NimPercent, 3.5, &config),
            RiskStatus::Normal
        );
        assert_eq!(
            classify(KpiKey::NimPercent, 3.0, &config),
            RiskStatus::Warning
        );
        assert_eq!(
            classify(KpiKey::NimPercent, 2.4, &config),
            RiskStatus::Critical
        );
    }

    #[test]
    fn total_advances_never_breaches() {
        let config = ThresholdConfig::default();
        assert_eq!(
            classify(KpiKey::TotalAdvances, f64::MAX, &config),
            RiskStatus::Normal
        );
    }
}
