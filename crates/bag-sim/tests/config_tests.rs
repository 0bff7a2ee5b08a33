// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
use bag_sim::{
    ConfigError, ConfigService, ConfigStore, MemoryConfigStore, OrientationMode, SimConfig,
    SIM_CONFIG_KEY,
};

#[test]
fn defaults_are_valid() {
    let cfg = SimConfig::default();
    cfg.validate().expect("defaults validate");
    assert!((cfg.stiffness - 5.0 / 9.8).abs() < 1e-6);
    assert_eq!(cfg.damping, 4.0);
    assert_eq!(cfg.punch_force, 0.05);
    assert_eq!(cfg.impact_threshold, 0.5);
    assert_eq!(cfg.orientation_update, OrientationMode::PerStep);
}

#[test]
fn missing_key_yields_defaults() {
    let svc = ConfigService::new(MemoryConfigStore::default());
    assert_eq!(svc.load_sim_config().expect("load"), SimConfig::default());
}

#[test]
fn round_trip_through_memory_store() {
    let svc = ConfigService::new(MemoryConfigStore::default());
    let cfg = SimConfig {
        punch_force: 0.08,
        orientation_update: OrientationMode::TimeScaled,
        initial_tilt: [0.0, 0.25],
        ..SimConfig::default()
    };
    svc.save_sim_config(&cfg).expect("save");
    assert_eq!(svc.load_sim_config().expect("load"), cfg);
}

#[test]
fn partial_document_fills_in_defaults() {
    let store = MemoryConfigStore::default();
    store
        .save_raw(
            SIM_CONFIG_KEY,
            br#"{ "damping": 6.0, "orientation_update": "time_scaled" }"#,
        )
        .expect("save raw");
    let cfg = ConfigService::new(store).load_sim_config().expect("load");
    assert_eq!(cfg.damping, 6.0);
    assert_eq!(cfg.orientation_update, OrientationMode::TimeScaled);
    assert_eq!(cfg.dt, SimConfig::default().dt);
    assert_eq!(cfg.right, SimConfig::default().right);
}

#[test]
fn invalid_values_are_rejected_on_save_and_load() {
    let svc = ConfigService::new(MemoryConfigStore::default());
    let bad = SimConfig {
        dt: 0.0,
        ..SimConfig::default()
    };
    assert!(matches!(
        svc.save_sim_config(&bad),
        Err(ConfigError::Invalid { field: "dt", .. })
    ));

    // Bypass the checked save and plant a broken document directly.
    svc.save(SIM_CONFIG_KEY, &bad).expect("unchecked save");
    assert!(matches!(
        svc.load_sim_config(),
        Err(ConfigError::Invalid { field: "dt", .. })
    ));
}

#[test]
fn negative_glove_extent_is_rejected() {
    let mut cfg = SimConfig::default();
    cfg.left.glove.half_extents[1] = -0.1;
    assert!(matches!(
        cfg.validate(),
        Err(ConfigError::Invalid {
            field: "left.glove",
            ..
        })
    ));
}

#[test]
fn garbage_document_is_a_serde_error() {
    let store = MemoryConfigStore::default();
    store.save_raw(SIM_CONFIG_KEY, b"not json").expect("save raw");
    assert!(matches!(
        ConfigService::new(store).load_sim_config(),
        Err(ConfigError::Serde(_))
    ));
}
