//! Selection predicates applied just before writing (C9)
use std::str::FromStr;

use hifitime::Epoch;

#[cfg(feature = "log")]
use log::warn;

use crate::{
    constellation::Constellation,
    header::Header,
    navigation::NavigationStore,
    observable::Observable,
    observation::ObservationStore,
    sv::Sv,
};

/// One validated `"system[prn]"` token, e.g. `G` (bare, matches every GPS
/// satellite) or `G01` (matches only PRN 1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemSatToken {
    pub system: Constellation,
    pub prn: Option<u8>,
}

impl SystemSatToken {
    pub fn matches(&self, sv: Sv) -> bool {
        self.system == sv.constellation && self.prn.map(|prn| prn == sv.prn).unwrap_or(true)
    }
}

impl FromStr for SystemSatToken {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(());
        }
        if s.len() == 1 {
            let system = Constellation::from_str(s).map_err(|_| ())?;
            return Ok(Self { system, prn: None });
        }
        let sv = Sv::from_str(s).map_err(|_| ())?;
        Ok(Self {
            system: sv.constellation,
            prn: Some(sv.prn),
        })
    }
}

/// An optional epoch-time window, `start..=end` inclusive on both ends.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeWindow {
    pub start: Epoch,
    pub end: Epoch,
}

impl TimeWindow {
    pub fn contains(&self, epoch: Epoch) -> bool {
        epoch >= self.start && epoch <= self.end
    }
}

/// Validated selection state: system/satellite tokens, observable types,
/// and an optional time window. Never mutated by the save path -- only by
/// [Filter::set_filter].
#[derive(Debug, Clone, Default)]
pub struct Filter {
    sys_sat: Vec<SystemSatToken>,
    observables: Vec<Observable>,
    window: Option<TimeWindow>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_window(mut self, window: TimeWindow) -> Self {
        self.window = Some(window);
        self
    }

    /// Validates each token against the header's declared systems and
    /// observables. Unknown tokens are logged as warnings; the call
    /// returns `false` in that case, but already-validated state from a
    /// prior successful call is left untouched.
    pub fn set_filter(&mut self, header: &Header, sel_sys_sat: &[String], sel_obs: &[String]) -> bool {
        let mut sys_sat = Vec::new();
        let mut ok = true;
        for token in sel_sys_sat {
            match SystemSatToken::from_str(token) {
                Ok(parsed) if header.systems.contains_key(&parsed.system) => sys_sat.push(parsed),
                _ => {
                    #[cfg(feature = "log")]
                    warn!("unknown system/satellite filter token \"{}\"", token);
                    ok = false;
                }
            }
        }
        let mut observables = Vec::new();
        for token in sel_obs {
            match Observable::from_str(token) {
                Ok(parsed)
                    if header
                        .systems
                        .values()
                        .any(|entry| entry.observables.contains(&parsed)) =>
                {
                    observables.push(parsed)
                }
                _ => {
                    #[cfg(feature = "log")]
                    warn!("unknown observable filter token \"{}\"", token);
                    ok = false;
                }
            }
        }
        if !ok {
            return false;
        }
        self.sys_sat = sys_sat;
        self.observables = observables;
        true
    }

    fn obs_sv_allowed(&self, sv: Sv) -> bool {
        if self.sys_sat.is_empty() {
            return true;
        }
        self.sys_sat.iter().any(|t| t.matches(sv))
    }

    fn observable_allowed(&self, observable: &Observable) -> bool {
        self.observables.is_empty() || self.observables.contains(observable)
    }

    /// Removes entries whose system/satellite is unselected, whose
    /// observable type is unselected, or that fall outside the time
    /// window; an empty selection list accepts everything.
    pub fn apply_to_observations(&self, store: &mut ObservationStore) {
        store.retain(|record| {
            self.obs_sv_allowed(record.sv)
                && self.observable_allowed(&record.observable)
                && self
                    .window
                    .as_ref()
                    .map(|w| w.contains(record.epoch))
                    .unwrap_or(true)
        });
    }

    /// Removes navigation entries whose `"system[PRN]"` does not appear as
    /// a prefix in the selected list; a bare `"G"` matches every GPS
    /// satellite.
    pub fn apply_to_navigation(&self, store: &mut NavigationStore) {
        store.retain(|record| {
            self.obs_sv_allowed(record.sv)
                && self
                    .window
                    .as_ref()
                    .map(|w| w.contains(record.epoch))
                    .unwrap_or(true)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{epoch::EpochFlag, epoch::gpst_epoch, header::SystemEntry, observation::Record};

    fn header_with_gps() -> Header {
        let mut header = Header::new();
        let mut entry = SystemEntry::default();
        entry.observables.push(Observable::new("C1C"));
        header.systems.insert(Constellation::GPS, entry);
        header
    }

    #[test]
    fn bare_system_token_matches_every_prn() {
        let token = SystemSatToken::from_str("G").unwrap();
        assert!(token.matches(Sv::new(Constellation::GPS, 1)));
        assert!(token.matches(Sv::new(Constellation::GPS, 30)));
        assert!(!token.matches(Sv::new(Constellation::Glonass, 1)));
    }

    #[test]
    fn set_filter_rejects_unknown_token_without_clearing_prior_state() {
        let header = header_with_gps();
        let mut filter = Filter::new();
        assert!(filter.set_filter(&header, &["G01".to_string()], &[]));
        assert_eq!(filter.sys_sat.len(), 1);
        assert!(!filter.set_filter(&header, &["Z99".to_string()], &[]));
        assert_eq!(filter.sys_sat.len(), 1);
    }

    #[test]
    fn observation_filter_drops_unselected_prn() {
        let header = header_with_gps();
        let mut filter = Filter::new();
        filter.set_filter(&header, &["G01".to_string()], &[]);
        let epoch = gpst_epoch(1800, 0.0);
        let mut store = ObservationStore::new();
        store.push(Record {
            epoch,
            flag: EpochFlag::Ok,
            sv: Sv::new(Constellation::GPS, 1),
            observable: Observable::new("C1C"),
            value: 1.0,
            lli: None,
            snr: None,
        });
        store.push(Record {
            epoch,
            flag: EpochFlag::Ok,
            sv: Sv::new(Constellation::GPS, 2),
            observable: Observable::new("C1C"),
            value: 2.0,
            lli: None,
            snr: None,
        });
        filter.apply_to_observations(&mut store);
        assert_eq!(store.iter().count(), 1);
    }
}
