//! Event -> Rinex glue: folds C5's decoded events into an observation
//! [Rinex] and a navigation [Rinex], mirroring the dispatcher's own epoch
//! and ephemeris boundaries.
use osp::dispatcher::{Dispatcher, Ephemeris, Event, Observation};
use rinex::prelude::*;

use crate::rtk;

/// Accumulates decoded events into the two output stores plus whatever RTK
/// solution lines `--rtk` asked for.
pub struct Collector {
    pub observation: Rinex,
    pub navigation: Rinex,
    pub solution: rtk::Solution,
    pub receiver_version: Option<String>,
    epochs_seen: u64,
}

impl Collector {
    pub fn new() -> Self {
        Self {
            observation: Rinex::new(Type::ObservationData),
            navigation: Rinex::new(Type::NavigationData),
            solution: rtk::Solution::new(),
            receiver_version: None,
            epochs_seen: 0,
        }
    }

    pub fn epochs_seen(&self) -> u64 {
        self.epochs_seen
    }

    /// Folds one dispatcher event into the accumulated stores. `dispatcher`
    /// supplies the current `(week, tow)` used to timestamp ephemeris
    /// events, which carry no time tag of their own (§4.5).
    pub fn ingest(&mut self, event: Event, dispatcher: &Dispatcher) {
        match event {
            Event::ApproxPosition { x, y, z, week, tow, nsv } => {
                self.observation
                    .header
                    .push(Label::ApproxPosition, Payload::Position { x, y, z });
                // Quality is left unclassified: the OSP mode bytes that
                // would encode a fix type are skipped by C1's field table.
                self.solution.push(rtk::Fix { week, tow: tow as f64, x, y, z, quality: 0, nsv });
            }
            Event::ReceiverVersion(identification) => {
                let comment = format!("receiver: {}", identification.trim());
                self.observation
                    .header
                    .push(Label::Comment, Payload::Text(comment.clone()));
                self.navigation.header.push(Label::Comment, Payload::Text(comment));
                self.receiver_version = Some(identification);
            }
            Event::ObservationEpoch { week, tow, observations } => {
                self.ingest_epoch(week, tow, &observations);
                self.epochs_seen += 1;
            }
            Event::Ephemeris(eph) => self.ingest_ephemeris(eph, dispatcher),
        }
    }

    fn ingest_epoch(&mut self, week: u16, tow: f64, observations: &[Observation]) {
        let epoch = rinex::epoch::gpst_epoch(week, tow);
        self.observation.header.first_obs.get_or_insert(epoch);
        self.observation.header.last_obs = Some(epoch);
        let store = self
            .observation
            .record
            .as_mut_obs()
            .expect("observation rinex always holds an ObservationStore");
        for obs in observations {
            let Ok(constellation) = obs.system.to_string().parse::<Constellation>() else {
                continue;
            };
            let sv = Sv::new(constellation, obs.sat);
            let entry = self.observation.header.system_entry(constellation);
            for (code, value) in [
                ("C1C", obs.pseudorange),
                ("L1C", obs.carrier_phase),
                ("D1C", obs.doppler),
                ("S1C", obs.signal_strength as f64),
            ] {
                let observable = Observable::new(code);
                if !entry.observables.contains(&observable) {
                    entry.observables.push(observable.clone());
                }
                store.push(ObservationRecord {
                    epoch,
                    flag: EpochFlag::Ok,
                    sv,
                    observable,
                    value,
                    lli: None,
                    snr: Some(obs.signal_strength),
                });
            }
        }
    }

    fn ingest_ephemeris(&mut self, eph: Ephemeris, dispatcher: &Dispatcher) {
        let (week, tow) = dispatcher.current_week_tow();
        let epoch = rinex::epoch::gpst_epoch(week, tow);
        let store = self
            .navigation
            .record
            .as_mut_nav()
            .expect("navigation rinex always holds a NavigationStore");
        match eph {
            Ephemeris::Gps { sat, matrix } => {
                store.insert(NavigationRecord {
                    epoch,
                    sv: Sv::new(Constellation::GPS, sat),
                    orbit: matrix,
                });
            }
            Ephemeris::Glonass { slot, matrix } => {
                // Only the first 4 rows are meaningful for GLONASS (§4.4).
                let mut orbit = [[0.0; 4]; 8];
                orbit[..4].copy_from_slice(&matrix);
                let sv = Sv::new(Constellation::Glonass, slot);
                if store.insert(NavigationRecord { epoch, sv, orbit }) {
                    if let Some(freq) = dispatcher.glonass_carrier_frequency(slot) {
                        self.navigation.header.glonass_freq_nums.insert(sv, freq);
                    }
                }
            }
        }
    }
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}
