//! Top-level `Rinex` object tying the header, record store, reader,
//! writer and filter together (C6-C9 glue).
use std::{
    io::{BufRead, Write},
    path::Path,
};

#[cfg(feature = "log")]
use log::warn;

use crate::{
    error::{FormattingError, ParsingError},
    header::{self, formatting as hfmt, parsing as hparse, Header, Label, Payload},
    navigation::{self, formatting as nfmt, parsing as nparse, NavigationStore},
    observable::Observable,
    observation::{self, formatting as ofmt, parsing as oparse, ObservationStore, Record as ObsRecord},
    processing::filter::Filter,
    reader::BufferedReader,
    record::{Comments, Record},
    sv::Sv,
    types::Type,
    version::Version,
    writer::BufferedWriter,
};

/// A parsed RINEX file: header facts, the observation or navigation
/// record store, any comments re-insertable at their authored position,
/// and the filter predicate applied at write time.
pub struct Rinex {
    pub header: Header,
    pub record: Record,
    pub comments: Comments,
    pub filter: Filter,
}

impl Rinex {
    pub fn new(role: Type) -> Self {
        let mut header = Header::new();
        header.role = Some(role);
        let record = match role {
            Type::ObservationData => Record::Observation(ObservationStore::new()),
            Type::NavigationData => Record::Navigation(NavigationStore::new()),
        };
        Self {
            header,
            record,
            comments: Comments::new(),
            filter: Filter::new(),
        }
    }

    /// Reads and parses a RINEX file: the header first (enforcing the
    /// partial ordering in §4.7), then the body records.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ParsingError> {
        let mut reader = BufferedReader::new(path)?;
        let mut lines = Vec::new();
        let mut line = String::new();
        loop {
            line.clear();
            let read = reader.read_line(&mut line)?;
            if read == 0 {
                break;
            }
            lines.push(line.trim_end_matches(['\n', '\r']).to_string());
        }
        Self::parse_lines(&lines)
    }

    fn parse_lines(lines: &[String]) -> Result<Self, ParsingError> {
        let mut iter = lines.iter().peekable();
        let first = iter.next().ok_or(ParsingError::BadEpoch)?;
        let (version, constellation) = hparse::parse_version(first)?;
        if !version.is_supported() {
            return Err(ParsingError::UnsupportedVersion);
        }
        let role = if first
            .get(20..40)
            .map(|s| s.trim().starts_with("NAVIGATION"))
            .unwrap_or(false)
        {
            Type::NavigationData
        } else {
            Type::ObservationData
        };
        let mut rinex = Self::new(role);
        rinex.header.version = version;
        rinex.header.constellation = constellation;
        rinex.header.push(Label::Version, Payload::None);

        while let Some(line) = iter.next() {
            let label = match hparse::resolve_label(line) {
                Ok(label) => label,
                Err(_) => {
                    #[cfg(feature = "log")]
                    warn!("unrecognized header label in line \"{}\"", line);
                    continue;
                }
            };
            if !label.version_mask().matches(rinex.header.version) {
                #[cfg(feature = "log")]
                warn!("label does not match declared version: \"{}\"", line);
                continue;
            }
            match label {
                Label::EndOfHeader => {
                    rinex.header.push(label, Payload::None);
                    break;
                }
                Label::ApproxPosition => {
                    rinex.header.push(label, hparse::parse_approx_position(line)?);
                }
                Label::AntennaHeight => {
                    rinex.header.push(label, hparse::parse_antenna_offset(line)?);
                }
                Label::TypesOfObserv => {
                    let observables = hparse::parse_v210_observables(line)?;
                    let entry = rinex.header.system_entry(constellation.unwrap_or(crate::constellation::Constellation::GPS));
                    entry.observables.extend(observables.clone());
                    rinex.header.push(label, Payload::Observables(observables));
                }
                Label::SystemNumObsTypes => {
                    let (system, observables) = hparse::parse_v302_system_observables(line)?;
                    let entry = rinex.header.system_entry(system);
                    entry.observables = observables.clone();
                    rinex.header.push(label, Payload::Observables(observables));
                }
                Label::GlonassSlotFreqNum => {
                    for (sv, freq) in hparse::parse_glonass_slot_freq(line)? {
                        rinex.header.glonass_freq_nums.insert(sv, freq);
                        rinex.header.push(label, Payload::GlonassSlot { sv, freq_num: freq });
                    }
                }
                Label::LeapSeconds => {
                    rinex.header.push(label, hparse::parse_leap_seconds(line)?);
                }
                Label::Interval => {
                    rinex.header.push(label, hparse::parse_interval(line)?);
                }
                _ => {
                    rinex.header.push(label, hparse::parse_text(line));
                }
            }
        }

        match role {
            Type::ObservationData => rinex.parse_observation_body(&mut iter)?,
            Type::NavigationData => rinex.parse_navigation_body(&mut iter)?,
        }

        Ok(rinex)
    }

    fn parse_observation_body<'a, I: Iterator<Item = &'a String>>(
        &mut self,
        iter: &mut std::iter::Peekable<I>,
    ) -> Result<(), ParsingError> {
        let store = self.record.as_mut_obs().expect("observation record");
        while let Some(line) = iter.next() {
            let is_v3 = self.header.version == crate::version::V302;
            let (epoch, flag, satellites) = if is_v3 {
                let (epoch, flag, nsats) = oparse::parse_v302_epoch_line(line)?;
                let mut svs = Vec::new();
                for _ in 0..nsats {
                    if let Some(next) = iter.next() {
                        if let Ok(sv) = next.trim()[0..3.min(next.trim().len())].parse() {
                            svs.push(sv);
                        }
                        let fields = &next[3.min(next.len())..];
                        for chunk in fields.as_bytes().chunks(16) {
                            let field = std::str::from_utf8(chunk).unwrap_or("");
                            if let Ok((value, lli, snr)) = oparse::parse_v302_observable_field(field) {
                                if let Some(sv) = svs.last().copied() {
                                    store.push(ObsRecord {
                                        epoch,
                                        flag,
                                        sv,
                                        observable: Observable::new("C1C"),
                                        value,
                                        lli,
                                        snr,
                                    });
                                }
                            }
                        }
                    }
                }
                (epoch, flag, svs)
            } else {
                let (epoch, flag, counts) = oparse::parse_v210_epoch_line(line)?;
                let nsats = counts[0] as usize;
                let svs = oparse::parse_v210_satellite_list(line, nsats.min(12));
                (epoch, flag, svs)
            };
            if flag.is_event() {
                for _ in 0..satellites.len() {
                    iter.next();
                }
                continue;
            }
        }
        Ok(())
    }

    fn parse_navigation_body<'a, I: Iterator<Item = &'a String>>(
        &mut self,
        iter: &mut std::iter::Peekable<I>,
    ) -> Result<(), ParsingError> {
        let system = self
            .header
            .constellation
            .unwrap_or(crate::constellation::Constellation::GPS);
        let store = self.record.as_mut_nav().expect("navigation record");
        let lines_per_sat = navigation::parsing::lines_per_satellite(system);
        while let Some(prefix) = iter.next() {
            if prefix.trim().is_empty() {
                continue;
            }
            let sv: Sv = match prefix.trim()[0..3.min(prefix.trim().len())].parse() {
                Ok(sv) => sv,
                Err(_) => continue,
            };
            let mut rows = Vec::new();
            for _ in 0..lines_per_sat.saturating_sub(1) {
                if let Some(line) = iter.next() {
                    rows.push(nparse::parse_orbit_line(line, 3)?);
                }
            }
            let orbit = nparse::assemble_orbit(&rows);
            store.insert(navigation::Record {
                epoch: crate::epoch::gpst_epoch(0, 0.0),
                sv,
                orbit,
            });
        }
        Ok(())
    }

    /// Writes the header and body to `path`, promoting the declared
    /// version to the nearest concrete target first.
    pub fn to_path<P: AsRef<Path>>(&mut self, path: P, target: Version) -> Result<(), FormattingError> {
        if !target.is_supported() {
            return Err(FormattingError::UndefinedVersion);
        }
        self.header.version = target.promote();
        match &mut self.record {
            Record::Observation(store) => self.filter.apply_to_observations(store),
            Record::Navigation(store) => self.filter.apply_to_navigation(store),
        }
        let mut writer = BufferedWriter::new(path)?;
        self.write_header(&mut writer)?;
        match &self.record {
            Record::Observation(store) => self.write_observation_body(&mut writer, store)?,
            Record::Navigation(store) => self.write_navigation_body(&mut writer, store)?,
        }
        writer.flush()?;
        Ok(())
    }

    fn write_header(&self, writer: &mut BufferedWriter) -> Result<(), FormattingError> {
        let role = self.header.role.unwrap_or(Type::ObservationData);
        for label in header::Label::ALL {
            if matches!(label.obligation(role), header::Obligation::NotApplicable) {
                continue;
            }
            if !label.version_mask().matches(self.header.version) {
                continue;
            }
            // Observable-list labels are derived straight from the per-system
            // tables rather than the single stored record: V2.10 emits one
            // union-set block, V3.02 emits one block per selected system
            // (§4.8). Galileo and other V3-only systems are silently skipped
            // when writing V2.10 (no V2 code exists for them).
            match label {
                Label::Version => {
                    let constellation = self.header.constellation.unwrap_or_else(|| {
                        let mut systems: Vec<_> = self.header.systems.keys().copied().collect();
                        match systems.pop() {
                            Some(only) if systems.is_empty() => only,
                            Some(_) => crate::constellation::Constellation::Mixed,
                            None => crate::constellation::Constellation::GPS,
                        }
                    });
                    writer.write_line(&hfmt::fmt_version(self.header.version, constellation))?;
                    continue;
                }
                Label::RunBy => {
                    writer.write_line(&hfmt::fmt_run_by(
                        &self.header.program,
                        &self.header.run_by,
                        &self.header.date,
                    ))?;
                    continue;
                }
                Label::EndOfHeader => {
                    writer.write_line(&hfmt::fmt_end_of_header())?;
                    continue;
                }
                Label::TimeOfFirstObs | Label::TimeOfLastObs => {
                    let epoch = match label {
                        Label::TimeOfFirstObs => self.header.first_obs,
                        _ => self.header.last_obs,
                    };
                    let Some(epoch) = epoch else {
                        if matches!(label.obligation(role), header::Obligation::Obligatory) {
                            #[cfg(feature = "log")]
                            warn!("missing obligatory header record \"{}\"", label.text());
                        }
                        continue;
                    };
                    let system = match self.header.constellation {
                        Some(crate::constellation::Constellation::Mixed) | None => String::new(),
                        Some(c) => c.to_string(),
                    };
                    writer.write_line(&hfmt::fmt_time_of_obs(epoch, &system, label))?;
                    continue;
                }
                Label::TypesOfObserv => {
                    let union = self.v210_union_observables();
                    if union.is_empty() {
                        if matches!(label.obligation(role), header::Obligation::Obligatory) {
                            #[cfg(feature = "log")]
                            warn!("missing obligatory header record \"{}\"", label.text());
                        }
                        continue;
                    }
                    for line in hfmt::fmt_v210_observables(&union) {
                        writer.write_line(&line)?;
                    }
                    continue;
                }
                Label::SystemNumObsTypes => {
                    let mut systems: Vec<_> = self.header.systems.keys().copied().collect();
                    systems.sort();
                    if systems.is_empty() {
                        if matches!(label.obligation(role), header::Obligation::Obligatory) {
                            #[cfg(feature = "log")]
                            warn!("missing obligatory header record \"{}\"", label.text());
                        }
                        continue;
                    }
                    for system in systems {
                        let entry = &self.header.systems[&system];
                        for line in hfmt::fmt_v302_system_observables(system, &entry.observables) {
                            writer.write_line(&line)?;
                        }
                    }
                    continue;
                }
                _ => {}
            }
            let record = self.header.records.iter().find(|r| r.label == *label);
            match record {
                Some(record) => {
                    for line in hfmt::fmt_record(*label, &record.payload) {
                        writer.write_line(&line)?;
                    }
                }
                None => {
                    if matches!(label.obligation(role), header::Obligation::Obligatory) {
                        #[cfg(feature = "log")]
                        warn!("missing obligatory header record \"{}\"", label.text());
                    }
                }
            }
        }
        Ok(())
    }

    /// Union of every selected system's observables translated to V2.10
    /// codes, deduplicated and in first-seen order; systems with no legal
    /// V2 code (e.g. Galileo) contribute nothing (§4.8).
    fn v210_union_observables(&self) -> Vec<crate::observable::Observable> {
        let mut systems: Vec<_> = self.header.systems.keys().copied().collect();
        systems.sort();
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::new();
        for system in systems {
            for obs in &self.header.systems[&system].observables {
                if obs.to_v2().is_none() {
                    continue;
                }
                if seen.insert(obs.as_str().to_string()) {
                    out.push(obs.clone());
                }
            }
        }
        out
    }

    fn write_observation_body(
        &self,
        writer: &mut BufferedWriter,
        store: &ObservationStore,
    ) -> Result<(), FormattingError> {
        let is_v3 = self.header.version == crate::version::V302;
        for epoch in store.epochs() {
            let mut satellites = store.satellites_at(epoch);
            if !is_v3 {
                // Galileo has no legal V2.10 satellite identifier; drop it
                // rather than emit a line no V2 reader can parse (§4.8).
                satellites.retain(|sv| sv.constellation != crate::constellation::Constellation::Galileo);
            }
            let lines = if is_v3 {
                vec![ofmt::fmt_v302_epoch_line(
                    epoch,
                    crate::epoch::EpochFlag::Ok,
                    satellites.len(),
                )]
            } else {
                ofmt::fmt_v210_epoch_line(epoch, crate::epoch::EpochFlag::Ok, &satellites, Some(0.0))
            };
            for line in lines {
                writer.write_line(&line)?;
            }
            for sv in satellites {
                // V3.02 repeats the satellite identifier at the head of its
                // own line; V2.10 already named every satellite in the epoch
                // header and only carries the observable fields, wrapped at
                // 5 observables (80 columns) per continuation line (§4.8).
                let fields: Vec<String> = store
                    .at_epoch(epoch)
                    .filter(|r| r.sv == sv)
                    .map(|record| ofmt::fmt_v210_observable_field(record.value, record.lli, record.snr))
                    .collect();
                if is_v3 {
                    let mut line = sv.to_string();
                    for field in &fields {
                        line.push_str(field);
                    }
                    writer.write_line(&line)?;
                } else if fields.is_empty() {
                    writer.write_line("")?;
                } else {
                    for chunk in fields.chunks(5) {
                        writer.write_line(&chunk.concat())?;
                    }
                }
            }
        }
        Ok(())
    }

    fn write_navigation_body(
        &self,
        writer: &mut BufferedWriter,
        store: &NavigationStore,
    ) -> Result<(), FormattingError> {
        let is_v3 = self.header.version == crate::version::V302;
        // V2.10 navigation files carry a single system per file, named by
        // the file-type byte; satellites of any other system are skipped
        // rather than mixed into the file (§4.8).
        let only_system = (!is_v3).then_some(()).and_then(|_| self.header.constellation);
        let mut store = store.clone();
        for record in store.drain_sorted() {
            if let Some(system) = only_system {
                if system != crate::constellation::Constellation::Mixed
                    && record.sv.constellation != system
                {
                    continue;
                }
            }
            writer.write_line(&nfmt::fmt_prefix_line(
                record.sv,
                record.epoch,
                record.orbit[0][0],
                record.orbit[0][1],
                record.orbit[0][2],
            ))?;
            for line in nfmt::fmt_orbit_lines(&record.orbit, record.sv.constellation) {
                writer.write_line(&line)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constellation::Constellation;

    /// A V2.10 satellite carrying 6 observables wraps onto a continuation
    /// line at 5 observables (80 columns) per line (§4.8).
    #[test]
    fn v210_observable_fields_wrap_at_five_per_line() {
        let epoch = crate::epoch::gpst_epoch(1800, 0.0);
        let sv = Sv::new(Constellation::GPS, 1);
        let mut store = ObservationStore::new();
        for code in ["C1C", "L1C", "D1C", "S1C", "C2C", "L2C"] {
            store.push(ObsRecord {
                epoch,
                flag: crate::epoch::EpochFlag::Ok,
                sv,
                observable: Observable::new(code),
                value: 1.0,
                lli: None,
                snr: None,
            });
        }

        let mut rinex = Rinex::new(Type::ObservationData);
        rinex.header.constellation = Some(Constellation::GPS);
        let entry = rinex.header.system_entry(Constellation::GPS);
        for code in ["C1C", "L1C", "D1C", "S1C", "C2C", "L2C"] {
            entry.observables.push(Observable::new(code));
        }
        rinex.record = Record::Observation(store);

        let path = std::env::temp_dir().join(format!(
            "sirf2rnx-test-{:?}.24O",
            std::thread::current().id()
        ));
        rinex.to_path(&path, crate::version::V210).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let lines: Vec<&str> = contents.lines().collect();
        let eoh = lines
            .iter()
            .position(|l| l.contains("END OF HEADER"))
            .expect("header must end");
        // `eoh + 1` is the epoch first line; the two lines after it are
        // this satellite's wrapped observable fields.
        let obs_lines = &lines[eoh + 2..eoh + 4];
        assert_eq!(obs_lines[0].len(), 5 * 16, "first line: {:?}", obs_lines[0]);
        assert_eq!(obs_lines[1].len(), 16, "continuation line: {:?}", obs_lines[1]);
    }
}
