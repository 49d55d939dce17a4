use rinex::prelude::*;

#[test]
fn filter_rejects_unselected_system() {
    let mut header = Header::new();
    let mut filter = Filter::new();
    let entry = header.system_entry(Constellation::GPS);
    entry.observables.push(Observable::new("C1C"));
    assert!(filter.set_filter(&header, &["G01".to_string()], &["C1C".to_string()]));

    let epoch = rinex::epoch::gpst_epoch(1800, 0.0);
    let mut store = ObservationStore::new();
    store.push(ObservationRecord {
        epoch,
        flag: EpochFlag::Ok,
        sv: Sv::new(Constellation::GPS, 1),
        observable: Observable::new("C1C"),
        value: 1.0,
        lli: None,
        snr: None,
    });
    store.push(ObservationRecord {
        epoch,
        flag: EpochFlag::Ok,
        sv: Sv::new(Constellation::Glonass, 1),
        observable: Observable::new("C1C"),
        value: 2.0,
        lli: None,
        snr: None,
    });

    filter.apply_to_observations(&mut store);
    assert_eq!(store.iter().count(), 1);
    assert_eq!(store.iter().next().unwrap().sv.constellation, Constellation::GPS);
}
