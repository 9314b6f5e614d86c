use centre_core::store::MemoryStore;
use centre_core::thresholds::{
    classify, get_thresholds, reset_thresholds, set_thresholds, ThresholdConfig, ThresholdOverrides,
    ThresholdPair,
};
use centre_core::types::{KpiKey, RiskStatus};

#[test]
fn lcr_classification_against_defaults() {
    let defaults = ThresholdConfig::default();
    assert_eq!(
        classify(KpiKey::LcrPercent, 85.0, &defaults),
        RiskStatus::Critical
    );
    assert_eq!(
        classify(KpiKey::LcrPercent, 95.0, &defaults),
        RiskStatus::Warning
    );
    assert_eq!(
        classify(KpiKey::LcrPercent, 110.0, &defaults),
        RiskStatus::Normal
    );
}

#[test]
fn classify_is_deterministic() {
    let defaults = ThresholdConfig::default();
    for _ in 0..10 {
        assert_eq!(
            classify(KpiKey::ChurnRiskPercent, 15.0, &defaults),
            RiskStatus::Warning
        );
    }
}

#[test]
fn critical_always_dominates_warning() {
    let defaults = ThresholdConfig::default();
    // Sweep a wide value range on every tracked key: any value that
    // satisfies the critical predicate must never come back as warning.
    for key in KpiKey::TRACKED {
        let pair = defaults.pair(key).unwrap();
        for step in -400..400 {
            let value = step as f64 * 0.5;
            let status = classify(key, value, &defaults);
            let critical = match key {
                KpiKey::NimPercent | KpiKey::LcrPercent => value < pair.critical,
                _ => value >= pair.critical,
            };
            if critical {
                assert_eq!(status, RiskStatus::Critical, "{key:?} at {value}");
            }
        }
    }
}

#[test]
fn unrecognized_key_is_always_normal() {
    let defaults = ThresholdConfig::default();
    for value in [-1e9, 0.0, 1e9] {
        assert_eq!(
            classify(KpiKey::TotalAdvances, value, &defaults),
            RiskStatus::Normal
        );
    }
}

#[test]
fn partial_override_round_trips_merged_over_defaults() {
    let store = MemoryStore::new();
    let partial = ThresholdOverrides {
        gross_npa_percent: Some(ThresholdPair {
            warning: 5.0,
            critical: 7.0,
        }),
        ..Default::default()
    };
    set_thresholds(&store, &partial);

    let loaded = get_thresholds(&store);
    let mut expected = ThresholdConfig::default();
    expected.gross_npa_percent = ThresholdPair {
        warning: 5.0,
        critical: 7.0,
    };
    assert_eq!(loaded, expected);
}

#[test]
fn empty_override_round_trips_to_defaults() {
    let store = MemoryStore::new();
    set_thresholds(&store, &ThresholdOverrides::default());
    assert_eq!(get_thresholds(&store), ThresholdConfig::default());
}

#[test]
fn missing_keys_in_stored_record_keep_defaults() {
    let store = MemoryStore::new();
    // A sparse record written by an older client must not null out the
    // keys it omits.
    centre_core::store::KvStore::set(
        &store,
        centre_core::store::THRESHOLDS_KEY,
        r#"{"lcrPercent":{"warning":105.0,"critical":95.0}}"#,
    )
    .unwrap();

    let loaded = get_thresholds(&store);
    assert_eq!(loaded.lcr_percent.warning, 105.0);
    assert_eq!(loaded.lcr_percent.critical, 95.0);
    assert_eq!(
        loaded.gross_npa_percent,
        ThresholdConfig::default().gross_npa_percent
    );
}

#[test]
fn overrides_stack_across_writes() {
    let store = MemoryStore::new();
    set_thresholds(
        &store,
        &ThresholdOverrides {
            lcr_percent: Some(ThresholdPair {
                warning: 102.0,
                critical: 92.0,
            }),
            ..Default::default()
        },
    );
    set_thresholds(
        &store,
        &ThresholdOverrides {
            churn_risk_percent: Some(ThresholdPair {
                warning: 15.0,
                critical: 20.0,
            }),
            ..Default::default()
        },
    );

    let loaded = get_thresholds(&store);
    assert_eq!(loaded.lcr_percent.warning, 102.0);
    assert_eq!(loaded.churn_risk_percent.critical, 20.0);
}

#[test]
fn reset_restores_defaults() {
    let store = MemoryStore::new();
    set_thresholds(
        &store,
        &ThresholdOverrides {
            enterprise_risk_index: Some(ThresholdPair {
                warning: 50.0,
                critical: 60.0,
            }),
            ..Default::default()
        },
    );
    reset_thresholds(&store);
    assert_eq!(get_thresholds(&store), ThresholdConfig::default());
}

#[test]
fn overridden_bounds_change_classification() {
    let store = MemoryStore::new();
    set_thresholds(
        &store,
        &ThresholdOverrides {
            gross_npa_percent: Some(ThresholdPair {
                warning: 3.0,
                critical: 4.0,
            }),
            ..Default::default()
        },
    );
    let config = get_thresholds(&store);
    assert_eq!(
        classify(KpiKey::GrossNpaPercent, 4.2, &config),
        RiskStatus::Critical
    );
}
