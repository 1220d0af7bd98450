use nalgebra::Matrix4;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use rstest::*;

use crate::{
    prelude::{
        cnmp_variance, flt_variance, tropo_variance, udre_variance, ClockEphemerisCovariance,
        DegradationFactor, DegradationRecord, Epoch, Exclusion, FastCorrectionAging,
        GeodeticPosition, LineOfSight, LongTermAging, NavigationMode, RangeRateAging,
        ReceiverClass, UdreVariance, Udrei, VarianceModel, VarianceRuntime,
    },
    tests::{gps, init_logger, t0, user},
    Error,
};

fn runtime<'a>(
    t: Epoch,
    user: &'a GeodeticPosition,
    los: &'a LineOfSight,
    class: ReceiverClass,
) -> VarianceRuntime<'a> {
    VarianceRuntime {
        t,
        user,
        los,
        class,
        mode: NavigationMode::PrecisionApproach,
    }
}

#[rstest]
#[case(90.0, 0.0144)]
#[case(5.0, 1.5035)]
fn tropo_sea_level(#[case] elevation_deg: f64, #[case] expected: f64) {
    let user = GeodeticPosition::new(0.0, 0.0, 0.0);
    let los = LineOfSight::from_elevation_azimuth(gps(1), elevation_deg, 0.0);
    let rtm = runtime(t0(), &user, &los, ReceiverClass::A);
    let sigma2 = tropo_variance(&rtm);
    assert!(
        (sigma2 - expected).abs() < 1.0E-3,
        "σ²tropo={} expecting {}",
        sigma2,
        expected
    );
}

#[test]
fn tropo_decreases_with_altitude() {
    let los = LineOfSight::from_elevation_azimuth(gps(1), 20.0, 0.0);
    let mut prev = f64::INFINITY;
    for alt_m in [0.0, 1_000.0, 5_000.0, 10_000.0, 40_000.0, 50_000.0] {
        let user = GeodeticPosition::new(10.0, 10.0, alt_m);
        let sigma2 = tropo_variance(&runtime(t0(), &user, &los, ReceiverClass::A));
        assert!(sigma2 >= 0.0);
        assert!(sigma2 <= prev);
        prev = sigma2;
    }
    assert_eq!(prev, 0.0, "no tropospheric error above the troposphere");
}

#[rstest]
#[case(ReceiverClass::A, 90.0, 0.36_f64.powi(2) + (0.13_f64 + 0.53 * (-9.0_f64).exp()).powi(2))]
#[case(ReceiverClass::B, 90.0, 0.15_f64.powi(2) + (0.13_f64 + 0.53 * (-9.0_f64).exp()).powi(2))]
#[case(ReceiverClass::A, 10.0, 0.36_f64.powi(2) + (0.13_f64 + 0.53 * (-1.0_f64).exp()).powi(2))]
fn cnmp(#[case] class: ReceiverClass, #[case] elevation_deg: f64, #[case] expected: f64) {
    let user = user();
    let los = LineOfSight::from_elevation_azimuth(gps(1), elevation_deg, 0.0);
    let sigma2 = cnmp_variance(&runtime(t0(), &user, &los, class));
    assert!((sigma2 - expected).abs() < 1.0E-12);
}

#[rstest]
#[case(0, 0.0520)]
#[case(4, 0.4678)]
#[case(13, 2078.695)]
fn udre_lookup(#[case] udrei: u8, #[case] expected: f64) {
    let user = user();
    let los = LineOfSight::from_elevation_azimuth(gps(1), 45.0, 0.0);
    let rtm = runtime(t0(), &user, &los, ReceiverClass::A);
    let udrei = Udrei::new(udrei).unwrap();
    assert_eq!(
        udre_variance(&rtm, udrei, &DegradationRecord::default()),
        UdreVariance::Usable(expected)
    );
}

#[test]
fn udrei_unusable() {
    let user = user();
    let los = LineOfSight::from_elevation_azimuth(gps(1), 45.0, 0.0);
    let rtm = runtime(t0(), &user, &los, ReceiverClass::A);

    // whatever the degradation data
    let record = DegradationRecord {
        covariance: Some(ClockEphemerisCovariance {
            mask_number: 1,
            scale_exponent: 5,
            r: Matrix4::identity(),
        }),
        c_covariance: 1.0,
        rss_udre: true,
        ..Default::default()
    };

    for record in [DegradationRecord::default(), record] {
        assert_eq!(
            udre_variance(&rtm, Udrei::DO_NOT_USE, &record),
            UdreVariance::Unusable(Exclusion::DoNotUse)
        );
        assert_eq!(
            udre_variance(&rtm, Udrei::NOT_MONITORED, &record),
            UdreVariance::Unusable(Exclusion::NotMonitored)
        );
    }

    assert!(Udrei::new(16).is_none());
    assert!(Udrei::DO_NOT_USE.is_unusable());
    assert!(Udrei::DO_NOT_USE.sigma2_m2().is_none());
}

#[test]
fn delta_udre_scaling() {
    let user = user();
    let los = LineOfSight::from_elevation_azimuth(gps(1), 45.0, 30.0);
    let rtm = runtime(t0(), &user, &los, ReceiverClass::A);

    // C = I: IᵀCI = |los|² + 1 = 2
    let record = DegradationRecord {
        covariance: Some(ClockEphemerisCovariance {
            mask_number: 1,
            scale_exponent: 5,
            r: Matrix4::identity(),
        }),
        c_covariance: 0.5,
        ..Default::default()
    };

    let delta = 2.0_f64.sqrt() + 0.5;
    let sigma2 = udre_variance(&rtm, Udrei::new(5).unwrap(), &record)
        .sigma2_m2()
        .unwrap();
    assert!((sigma2 - 0.8315 * delta.powi(2)).abs() < 1.0E-9);
}

#[test]
fn flt_inflation() {
    let user = user();
    let los = LineOfSight::from_elevation_azimuth(gps(1), 45.0, 0.0);
    let rtm = runtime(t0(), &user, &los, ReceiverClass::A);

    // no degradation data: no inflation
    assert_eq!(flt_variance(&rtm, 1.0, &DegradationRecord::default()), 0.0);

    let fast = FastCorrectionAging {
        factor: DegradationFactor::from_bits(5), // 0.0002 m/s²
        latency_s: 2.0,
        age_s: 8.0,
        rrc: None,
    };
    let eps_fc = 0.0002 * 10.0_f64.powi(2) / 2.0;
    assert!((fast.epsilon_fc_m() - eps_fc).abs() < 1.0E-12);

    let long_term = LongTermAging::VelocityCode0 {
        c_ltc_v0_m: 0.1,
        i_ltc_v0_s: 60.0,
        age_s: 130.0,
    };
    assert!((long_term.epsilon_ltc_m() - 0.2).abs() < 1.0E-12);

    let rss = DegradationRecord {
        fast: Some(fast),
        long_term: Some(long_term),
        rss_udre: true,
        ..Default::default()
    };
    let expected = eps_fc.powi(2) + 0.2_f64.powi(2);
    assert!((flt_variance(&rtm, 1.0, &rss) - expected).abs() < 1.0E-12);

    // linear: (σUDRE + Σε)² - σ²UDRE
    let linear = DegradationRecord {
        rss_udre: false,
        ..rss
    };
    let sigma_udre = 2.0_f64;
    let sum = eps_fc + 0.2;
    let expected = (sigma_udre + sum).powi(2) - sigma_udre.powi(2);
    assert!((flt_variance(&rtm, 4.0, &linear) - expected).abs() < 1.0E-12);
}

#[test]
fn flt_en_route() {
    let user = user();
    let los = LineOfSight::from_elevation_azimuth(gps(1), 45.0, 0.0);
    let rtm = runtime(t0(), &user, &los, ReceiverClass::A);

    let record = DegradationRecord {
        c_er_m: 2.5,
        en_route: false,
        rss_udre: true,
        ..Default::default()
    };
    assert_eq!(flt_variance(&rtm, 1.0, &record), 0.0);

    let record = DegradationRecord {
        en_route: true,
        ..record
    };
    assert_eq!(flt_variance(&rtm, 1.0, &record), 6.25);
}

#[test]
fn flt_range_rate() {
    let user = user();
    let los = LineOfSight::from_elevation_azimuth(gps(1), 45.0, 0.0);
    let pa = runtime(t0(), &user, &los, ReceiverClass::A);
    let npa = VarianceRuntime {
        mode: NavigationMode::NonPrecisionApproach,
        ..pa
    };

    // 0.0002 m/s², time-out 78 s (PA) and 117 s (NPA)
    let fast = FastCorrectionAging {
        factor: DegradationFactor::from_bits(5),
        latency_s: 2.0,
        age_s: 10.0,
        rrc: Some(RangeRateAging {
            b_rrc_m: 0.01,
            interval_s: 5.0,
        }),
    };

    let eps_fc = 0.0002 * 12.0_f64.powi(2) / 2.0;
    let eps_rrc_pa = (0.0002 * 78.0 / 4.0 + 0.01 / 5.0) * 10.0;
    let eps_rrc_npa = (0.0002 * 117.0 / 4.0 + 0.01 / 5.0) * 10.0;

    let eps_rrc = fast.epsilon_rrc_m(NavigationMode::PrecisionApproach);
    assert!((eps_rrc - eps_rrc_pa).abs() < 1.0E-12);

    let eps_rrc = fast.epsilon_rrc_m(NavigationMode::NonPrecisionApproach);
    assert!((eps_rrc - eps_rrc_npa).abs() < 1.0E-12);

    let rss = DegradationRecord {
        fast: Some(fast),
        rss_udre: true,
        ..Default::default()
    };

    let expected = eps_fc.powi(2) + eps_rrc_pa.powi(2);
    assert!((flt_variance(&pa, 1.0, &rss) - expected).abs() < 1.0E-12);

    let expected = eps_fc.powi(2) + eps_rrc_npa.powi(2);
    assert!((flt_variance(&npa, 1.0, &rss) - expected).abs() < 1.0E-12);

    let linear = DegradationRecord {
        rss_udre: false,
        ..rss.clone()
    };
    let sigma_udre = 1.5_f64;
    let sum = eps_fc + eps_rrc_pa;
    let expected = (sigma_udre + sum).powi(2) - sigma_udre.powi(2);
    assert!((flt_variance(&pa, 2.25, &linear) - expected).abs() < 1.0E-12);

    // a single fast correction: no range rate estimate yet
    let first = DegradationRecord {
        fast: Some(FastCorrectionAging {
            rrc: Some(RangeRateAging {
                b_rrc_m: 0.01,
                interval_s: 0.0,
            }),
            ..fast
        }),
        ..rss
    };
    assert!((flt_variance(&pa, 1.0, &first) - eps_fc.powi(2)).abs() < 1.0E-12);
}

#[test]
fn long_term_velocity_code_1() {
    let inside = LongTermAging::VelocityCode1 {
        c_ltc_lsb_m: 0.05,
        c_ltc_v1_m_s: 0.001,
        i_ltc_v1_s: 240.0,
        t_minus_t0_s: 100.0,
    };
    assert!((inside.epsilon_ltc_m() - 0.05).abs() < 1.0E-12);

    let after = LongTermAging::VelocityCode1 {
        c_ltc_lsb_m: 0.05,
        c_ltc_v1_m_s: 0.001,
        i_ltc_v1_s: 240.0,
        t_minus_t0_s: 300.0,
    };
    assert!((after.epsilon_ltc_m() - 0.11).abs() < 1.0E-12);

    let before = LongTermAging::VelocityCode1 {
        c_ltc_lsb_m: 0.05,
        c_ltc_v1_m_s: 0.001,
        i_ltc_v1_s: 240.0,
        t_minus_t0_s: -20.0,
    };
    assert!((before.epsilon_ltc_m() - 0.07).abs() < 1.0E-12);
}

#[test]
fn built_in_models_are_non_negative() {
    init_logger();

    let mut rng = SmallRng::seed_from_u64(1234);
    let model = VarianceModel::default();

    for _ in 0..500 {
        let user = GeodeticPosition::new(
            rng.random_range(-90.0..=90.0),
            rng.random_range(-180.0..=180.0),
            rng.random_range(-100.0..60_000.0),
        );
        let los = LineOfSight::from_elevation_azimuth(
            gps(rng.random_range(1..=32)),
            rng.random_range(0.0..=90.0),
            rng.random_range(0.0..360.0),
        );
        let class = if rng.random_bool(0.5) {
            ReceiverClass::A
        } else {
            ReceiverClass::B
        };
        let rtm = runtime(t0(), &user, &los, class);

        let record = DegradationRecord {
            fast: Some(FastCorrectionAging {
                factor: DegradationFactor::from_bits(rng.random_range(0..16)),
                latency_s: rng.random_range(0.0..16.0),
                age_s: rng.random_range(0.0..200.0),
                rrc: None,
            }),
            long_term: Some(LongTermAging::VelocityCode0 {
                c_ltc_v0_m: rng.random_range(0.0..2.0),
                i_ltc_v0_s: rng.random_range(0.0..512.0),
                age_s: rng.random_range(0.0..600.0),
            }),
            c_er_m: rng.random_range(0.0..32.0),
            en_route: rng.random_bool(0.5),
            rss_udre: rng.random_bool(0.5),
            ..Default::default()
        };

        let udrei = Udrei::new(rng.random_range(0..16)).unwrap();

        assert!(model.tropo(&rtm).unwrap() >= 0.0);
        assert!(model.cnmp(&rtm).unwrap() >= 0.0);

        match model.udre(&rtm, udrei, &record).unwrap() {
            UdreVariance::Usable(sig2_udre) => {
                assert!(sig2_udre >= 0.0);
                assert!(model.flt(&rtm, sig2_udre, &record).unwrap() >= 0.0);
            },
            UdreVariance::Unusable(_) => assert!(udrei.is_unusable()),
        }
    }
}

#[test]
fn overrides_replace_built_in_models() {
    let user = user();
    let los = LineOfSight::from_elevation_azimuth(gps(1), 45.0, 0.0);
    let rtm = runtime(t0(), &user, &los, ReceiverClass::A);
    let record = DegradationRecord::default();
    let udrei = Udrei::new(15).unwrap();

    let model = VarianceModel::default()
        .with_tropo(|_| 1.0)
        .with_cnmp(|rtm| rtm.los.elevation_deg / 100.0)
        .with_udre(|_, _, _| UdreVariance::Usable(2.0))
        .with_flt(|_, sig2_udre, _| sig2_udre * 0.75);

    assert_eq!(model.tropo(&rtm), Ok(1.0));
    assert_eq!(model.cnmp(&rtm), Ok(0.45));
    // the override decides, even for UDREI 15
    assert_eq!(model.udre(&rtm, udrei, &record), Ok(UdreVariance::Usable(2.0)));
    assert_eq!(model.flt(&rtm, 2.0, &record), Ok(1.5));
}

#[rstest]
#[case(-1.0)]
#[case(f64::NAN)]
#[case(f64::INFINITY)]
fn invalid_override_output(#[case] value: f64) {
    let user = user();
    let los = LineOfSight::from_elevation_azimuth(gps(1), 45.0, 0.0);
    let rtm = runtime(t0(), &user, &los, ReceiverClass::A);

    let model = VarianceModel::default()
        .with_tropo(move |_| value)
        .with_udre(move |_, _, _| UdreVariance::Usable(value));

    assert!(matches!(
        model.tropo(&rtm),
        Err(Error::InvalidVariance { term: "tropo", .. })
    ));
    assert!(matches!(
        model.udre(&rtm, Udrei::new(1).unwrap(), &DegradationRecord::default()),
        Err(Error::InvalidVariance { term: "udre", .. })
    ));
}
