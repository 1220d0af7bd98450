use std::str::FromStr;

use rstest::*;

use crate::{
    prelude::{
        Config, ConfigError, NavigationMode, OverrideConfig, OverrideRegistry, ReceiverClass,
        Solver, Term, UdreVariance, K_H_NPA, K_H_PA,
    },
    tests::init_logger,
};

fn registry() -> OverrideRegistry {
    let mut registry = OverrideRegistry::default();
    registry.register_tropo("flat-tropo", |_| 0.25);
    registry.register_cnmp("flat-cnmp", |_| 0.5);
    registry.register_udre("flat-udre", |_, _, _| UdreVariance::Usable(1.0));
    registry.register_flt("no-flt", |_, _, _| 0.0);
    registry
}

#[test]
fn default_config() {
    let cfg = Config::default();
    assert_eq!(cfg.class, ReceiverClass::A);
    assert_eq!(cfg.mode, NavigationMode::PrecisionApproach);
    assert_eq!(cfg.shell_height_km, 350.0);
    assert_eq!(cfg.k_v, 5.33);
    assert_eq!(cfg.k_h(), K_H_PA);
    assert!(cfg.alert_limits.is_none());
    assert!(cfg.validate().is_ok());

    let npa = cfg.with_navigation_mode(NavigationMode::NonPrecisionApproach);
    assert_eq!(npa.k_h(), K_H_NPA);
}

#[rstest]
#[case("A", ReceiverClass::A)]
#[case("aad-b", ReceiverClass::B)]
#[case(" b ", ReceiverClass::B)]
fn receiver_class_parsing(#[case] s: &str, #[case] expected: ReceiverClass) {
    assert_eq!(ReceiverClass::from_str(s), Ok(expected));
}

#[rstest]
#[case("PA", NavigationMode::PrecisionApproach)]
#[case("npa", NavigationMode::NonPrecisionApproach)]
#[case("en-route", NavigationMode::NonPrecisionApproach)]
fn navigation_mode_parsing(#[case] s: &str, #[case] expected: NavigationMode) {
    assert_eq!(NavigationMode::from_str(s), Ok(expected));
    assert_eq!(NavigationMode::from_str(&expected.to_string()), Ok(expected));
}

#[test]
fn invalid_enums() {
    assert_eq!(
        ReceiverClass::from_str("C"),
        Err(ConfigError::InvalidReceiverClass)
    );
    assert_eq!(
        NavigationMode::from_str("landing"),
        Err(ConfigError::UnknownNavigationMode)
    );
}

#[test]
fn override_resolution() {
    init_logger();

    let registry = registry();
    assert_eq!(registry.len(), 4);

    let overrides = OverrideConfig {
        tropo: Some("flat-tropo".to_string()),
        udre: Some("flat-udre".to_string()),
        ..Default::default()
    };

    let cfg = Config::default().with_overrides(overrides);
    let model = cfg.variance_model(&registry).unwrap();

    assert!(model.tropo.is_some());
    assert!(model.cnmp.is_none());
    assert!(model.udre.is_some());
    assert!(model.flt.is_none());
}

#[test]
fn unknown_override() {
    init_logger();

    let overrides = OverrideConfig {
        cnmp: Some("missing".to_string()),
        ..Default::default()
    };
    let cfg = Config::default().with_overrides(overrides);

    assert_eq!(
        cfg.variance_model(&registry()).err(),
        Some(ConfigError::UnknownOverride("missing".to_string()))
    );
    assert!(Solver::new(&cfg, &registry()).is_err());
}

#[test]
fn mismatching_override() {
    let overrides = OverrideConfig {
        flt: Some("flat-tropo".to_string()),
        ..Default::default()
    };
    let cfg = Config::default().with_overrides(overrides);

    assert_eq!(
        cfg.variance_model(&registry()).err(),
        Some(ConfigError::OverrideTerm {
            name: "flat-tropo".to_string(),
            expected: Term::Flt,
            found: Term::Tropo,
        })
    );
}

#[test]
fn override_fallback() {
    init_logger();

    let overrides = OverrideConfig {
        tropo: Some("missing".to_string()),
        flt: Some("flat-udre".to_string()),
        cnmp: Some("flat-cnmp".to_string()),
        allow_fallback: true,
        ..Default::default()
    };
    let cfg = Config::default().with_overrides(overrides);
    let model = cfg.variance_model(&registry()).unwrap();

    // built-in models where resolution failed
    assert!(model.tropo.is_none());
    assert!(model.flt.is_none());
    assert!(model.cnmp.is_some());
}

#[rstest]
#[case(0.0)]
#[case(-1.0)]
#[case(f64::NAN)]
fn invalid_multiplier(#[case] k: f64) {
    let mut cfg = Config::default();
    cfg.k_v = k;
    assert!(matches!(
        cfg.validate(),
        Err(ConfigError::InvalidMultiplier(_))
    ));
    assert!(Solver::new(&cfg, &OverrideRegistry::default()).is_err());
}

#[test]
fn invalid_shell_height() {
    let cfg = Config::default().with_shell_height_km(-350.0);
    assert_eq!(
        cfg.validate(),
        Err(ConfigError::InvalidShellHeight(-350.0))
    );
}

#[cfg(feature = "serde")]
#[test]
fn deserialize_config() {
    use crate::prelude::AlertLimits;

    let content = r#"
        {
            "class": "B",
            "mode": "NonPrecisionApproach",
            "min_elevation_deg": 10.0,
            "overrides": {
                "tropo": "flat-tropo",
                "allow_fallback": true
            },
            "alert_limits": {
                "hal_m": 556.0,
                "val_m": null
            }
        }"#;

    let cfg: Config = serde_json::from_str(content).unwrap();

    assert_eq!(cfg.class, ReceiverClass::B);
    assert_eq!(cfg.mode, NavigationMode::NonPrecisionApproach);
    assert_eq!(cfg.min_elevation_deg, 10.0);
    assert_eq!(cfg.shell_height_km, 350.0);
    assert_eq!(cfg.k_h(), K_H_NPA);
    assert_eq!(cfg.overrides.tropo.as_deref(), Some("flat-tropo"));
    assert!(cfg.overrides.allow_fallback);
    assert_eq!(cfg.alert_limits, Some(AlertLimits::NPA));

    let serialized = serde_json::to_string(&cfg).unwrap();
    let parsed: Config = serde_json::from_str(&serialized).unwrap();
    assert_eq!(parsed, cfg);
}
