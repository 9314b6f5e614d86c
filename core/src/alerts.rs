//! Alert history — an append-only, size-bounded log of threshold
//! status transitions.
//!
//! An entry is recorded only when a KPI's classified status is warning
//! or critical AND the transition is new: either the previous status was
//! a different non-critical status, or the KPI escalated from warning to
//! critical. A KPI sitting continuously in critical never re-logs, and
//! dropping back from critical to warning does not log either.
//!
//! With no previous snapshot (first refresh after startup) a breach is
//! eligible for logging.

use crate::{
    snapshot::ExecutiveKpis,
    store::{KvStore, ALERT_HISTORY_KEY},
    thresholds::{classify, ThresholdConfig},
    types::{KpiKey, RiskStatus},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The log keeps only the most recent entries.
pub const MAX_ALERT_ENTRIES: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertHistoryEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub kpi_key: KpiKey,
    pub kpi_label: String,
    pub value: f64,
    pub status: RiskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_status: Option<RiskStatus>,
}

fn load_history(store: &dyn KvStore) -> Vec<AlertHistoryEntry> {
    match store.get(ALERT_HISTORY_KEY) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|err| {
            log::warn!("alert history unreadable, starting empty: {err}");
            Vec::new()
        }),
        Ok(None) => Vec::new(),
        Err(err) => {
            log::warn!("alert history store unavailable: {err}");
            Vec::new()
        }
    }
}

fn save_history(store: &dyn KvStore, entries: &[AlertHistoryEntry]) {
    let bounded = &entries[..entries.len().min(MAX_ALERT_ENTRIES)];
    match serde_json::to_string(bounded) {
        Ok(raw) => {
            if let Err(err) = store.set(ALERT_HISTORY_KEY, &raw) {
                log::warn!("alert history write failed: {err}");
            }
        }
        Err(err) => log::warn!("alert history serialization failed: {err}"),
    }
}

/// Read the log, most recent first.
pub fn alert_history(store: &dyn KvStore) -> Vec<AlertHistoryEntry> {
    let mut entries = load_history(store);
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    entries
}

/// Classify every tracked KPI in `current` against `previous` and append
/// an entry per new breach or escalation. New entries are prepended; the
/// log is pruned from the tail past the bound. Returns the new entries.
pub fn record_breaches(
    store: &dyn KvStore,
    current: &ExecutiveKpis,
    previous: Option<&ExecutiveKpis>,
    config: &ThresholdConfig,
    now: DateTime<Utc>,
) -> Vec<AlertHistoryEntry> {
    let mut entries = Vec::new();

    for key in KpiKey::TRACKED {
        let value = current.value(key);
        let status = classify(key, value, config);
        let previous_status = previous.map(|kpis| classify(key, kpis.value(key), config));

        if !status.is_breach() {
            continue;
        }

        let is_new_breach = previous_status != Some(status)
            && previous_status != Some(RiskStatus::Critical);
        let is_escalation = previous_status == Some(RiskStatus::Warning)
            && status == RiskStatus::Critical;
        if !(is_new_breach || is_escalation) {
            continue;
        }

        log::info!(
            "alert: {} {:?} -> {:?} at {value}",
            key.label(),
            previous_status,
            status
        );
        entries.push(AlertHistoryEntry {
            id: format!("alert-{}", Uuid::new_v4()),
            timestamp: now,
            kpi_key: key,
            kpi_label: key.label().to_string(),
            value,
            status,
            previous_status,
        });
    }

    if !entries.is_empty() {
        let mut history = entries.clone();
        history.extend(load_history(store));
        save_history(store, &history);
    }

    entries
}

/// Drop the whole log. Explicit user action only.
pub fn clear_alert_history(store: &dyn KvStore) {
    if let Err(err) = store.remove(ALERT_HISTORY_KEY) {
        log::warn!("alert history clear failed: {err}");
    }
}
