use crate::{
    prelude::{
        BroadcastMasterStation, Constellation, DegradationRecord, Duration, MasterStation,
        MessageTables, NavigationMode, SV,
    },
    tests::{gps, init_logger, mt1, mt10, mt28, mt2_5, mt6, mt7, t0},
};

/// Mask: GPS 1, 3, 5, 7 and SBAS 123
fn tables() -> MessageTables {
    let t = t0();
    let mut udrei = [14_u8; 13];
    udrei[..5].copy_from_slice(&[2, 4, 6, 15, 1]);

    let messages = vec![
        mt1(t, 1, &[1, 3, 5, 7, 123]),
        mt2_5(t, 2, 0, 1, &[0; 13], &udrei),
        mt7(t, 2, 1, &[5, 5, 5, 5, 5]),
        mt10(t, 4, true, 10),
        mt28(t, 1, [Some((2, 5, [1, 0, 0, 1], [0; 6])), None]),
    ];

    let mut tables = MessageTables::default();
    assert_eq!(tables.ingest(messages.iter()), 5);
    tables
}

#[test]
fn udrei_from_fast_corrections() {
    init_logger();

    let tables = tables();
    let master = BroadcastMasterStation::new(&tables, NavigationMode::PrecisionApproach);
    let t = t0() + Duration::from_seconds(10.0);

    assert_eq!(master.udrei(t, gps(1)).map(|u| u.value()), Some(2));
    assert_eq!(master.udrei(t, gps(3)).map(|u| u.value()), Some(4));
    assert_eq!(master.udrei(t, gps(7)).map(|u| u.value()), Some(15));
    assert_eq!(
        master
            .udrei(t, SV::new(Constellation::SBAS, 23))
            .map(|u| u.value()),
        Some(1)
    );

    // not in the mask
    assert!(master.udrei(t, gps(2)).is_none());
}

#[test]
fn most_recent_integrity() {
    init_logger();

    let mut tables = tables();
    let later = t0() + Duration::from_seconds(6.0);
    tables.decode(&mt6(later, [0; 4], &[9, 9, 9, 9, 9])).unwrap();

    let master = BroadcastMasterStation::new(&tables, NavigationMode::PrecisionApproach);
    let t = t0() + Duration::from_seconds(10.0);
    assert_eq!(master.udrei(t, gps(1)).map(|u| u.value()), Some(9));

    // fast corrections received after MT6 take over again
    let mut udrei = [3_u8; 13];
    udrei[0] = 7;
    tables
        .decode(&mt2_5(t0() + Duration::from_seconds(8.0), 2, 1, 1, &[0; 13], &udrei))
        .unwrap();
    let master = BroadcastMasterStation::new(&tables, NavigationMode::PrecisionApproach);
    assert_eq!(master.udrei(t, gps(1)).map(|u| u.value()), Some(7));
}

#[test]
fn fast_correction_timeout() {
    init_logger();

    let tables = tables();

    // degradation factor 5: PA time-out 78 s, NPA time-out 117 s
    let pa = BroadcastMasterStation::new(&tables, NavigationMode::PrecisionApproach);
    let npa = BroadcastMasterStation::new(&tables, NavigationMode::NonPrecisionApproach);

    let t = t0() + Duration::from_seconds(77.0);
    assert!(pa.udrei(t, gps(1)).is_some());

    let t = t0() + Duration::from_seconds(100.0);
    assert!(pa.udrei(t, gps(1)).is_none());
    assert!(npa.udrei(t, gps(1)).is_some());

    // en route term applies once the PA time-out has expired
    assert!(npa.degradation(t, gps(1)).en_route);
    assert!(!npa.degradation(t0(), gps(1)).en_route);

    let t = t0() + Duration::from_seconds(120.0);
    assert!(npa.udrei(t, gps(1)).is_none());
}

#[test]
fn degradation_record() {
    init_logger();

    let tables = tables();
    let master = BroadcastMasterStation::new(&tables, NavigationMode::PrecisionApproach);
    let t = t0() + Duration::from_seconds(10.0);

    let record = master.degradation(t, gps(3));
    assert!(record.rss_udre);
    assert_eq!(record.c_er_m, 2.0);
    assert!((record.c_covariance - 1.0).abs() < 1.0E-12);
    assert!(!record.en_route);

    // mask number 2
    let cov = record.covariance.expect("covariance should be available");
    assert_eq!(cov.mask_number, 2);

    let fast = record.fast.expect("fast correction aging should be available");
    assert_eq!(fast.latency_s, 2.0);
    assert_eq!(fast.age_s, 10.0);
    assert_eq!(fast.factor.indicator(), 5);
    assert!(fast.rrc.is_none());

    // no covariance for mask number 1
    assert!(master.degradation(t, gps(1)).covariance.is_none());

    // not in the mask: nothing
    assert_eq!(master.degradation(t, gps(2)), DegradationRecord::default());
}

#[test]
fn empty_tables() {
    let tables = MessageTables::default();
    let master = BroadcastMasterStation::new(&tables, NavigationMode::PrecisionApproach);
    assert!(master.udrei(t0(), gps(1)).is_none());
    assert_eq!(master.degradation(t0(), gps(1)), DegradationRecord::default());
}
