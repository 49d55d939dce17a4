//! Header record model (C6)
use std::collections::HashMap;

use crate::{
    constellation::Constellation, observable::Observable, sv::Sv, types::Type, version::Version,
};

pub mod formatting;
pub mod parsing;

/// Which of the two target revisions a header label is legal in.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VersionMask {
    V210Only,
    V302Only,
    Both,
}

impl VersionMask {
    pub fn matches(&self, target: Version) -> bool {
        match self {
            Self::V210Only => target == crate::version::V210,
            Self::V302Only => target == crate::version::V302,
            Self::Both => true,
        }
    }
}

/// Whether a label is required, optional, or meaningless for a given file role.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Obligation {
    Obligatory,
    Optional,
    NotApplicable,
}

/// The ~40 stable header labels. Variants carry the exact label printed in
/// columns 61-80, the revisions it is legal in, and whether it is
/// obligatory/optional/not-applicable for each of the two file roles.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Label {
    Version,
    RunBy,
    Comment,
    MarkerName,
    ApproxPosition,
    AntennaHeight,
    TypesOfObserv,
    SystemNumObsTypes,
    Interval,
    TimeOfFirstObs,
    TimeOfLastObs,
    WavelengthFactL1L2,
    SystemScaleFactor,
    PrnNumObs,
    IonosphericCorr,
    TimeSystemCorr,
    LeapSeconds,
    GlonassSlotFreqNum,
    EndOfHeader,
}

impl Label {
    /// The ordered list understood by the reader/writer; defines the
    /// canonical iteration order used by `first_label`/`next_label`.
    pub const ALL: &'static [Label] = &[
        Label::Version,
        Label::RunBy,
        Label::Comment,
        Label::MarkerName,
        Label::ApproxPosition,
        Label::AntennaHeight,
        Label::TypesOfObserv,
        Label::SystemNumObsTypes,
        Label::WavelengthFactL1L2,
        Label::SystemScaleFactor,
        Label::PrnNumObs,
        Label::Interval,
        Label::TimeOfFirstObs,
        Label::TimeOfLastObs,
        Label::IonosphericCorr,
        Label::TimeSystemCorr,
        Label::LeapSeconds,
        Label::GlonassSlotFreqNum,
        Label::EndOfHeader,
    ];

    /// Exact text written right-justified in columns 61-80.
    pub const fn text(&self) -> &'static str {
        match self {
            Self::Version => "RINEX VERSION / TYPE",
            Self::RunBy => "PGM / RUN BY / DATE",
            Self::Comment => "COMMENT",
            Self::MarkerName => "MARKER NAME",
            Self::ApproxPosition => "APPROX POSITION XYZ",
            Self::AntennaHeight => "ANTENNA: DELTA H/E/N",
            Self::TypesOfObserv => "# / TYPES OF OBSERV",
            Self::SystemNumObsTypes => "SYS / # / OBS TYPES",
            Self::Interval => "INTERVAL",
            Self::TimeOfFirstObs => "TIME OF FIRST OBS",
            Self::TimeOfLastObs => "TIME OF LAST OBS",
            Self::WavelengthFactL1L2 => "WAVELENGTH FACT L1/2",
            Self::SystemScaleFactor => "SYS / SCALE FACTOR",
            Self::PrnNumObs => "PRN / # OF OBS",
            Self::IonosphericCorr => "IONOSPHERIC CORR",
            Self::TimeSystemCorr => "TIME SYSTEM CORR",
            Self::LeapSeconds => "LEAP SECONDS",
            Self::GlonassSlotFreqNum => "GLONASS SLOT / FRQ #",
            Self::EndOfHeader => "END OF HEADER",
        }
    }

    pub fn version_mask(&self) -> VersionMask {
        match self {
            Self::TypesOfObserv | Self::WavelengthFactL1L2 => VersionMask::V210Only,
            Self::SystemNumObsTypes | Self::SystemScaleFactor | Self::GlonassSlotFreqNum => {
                VersionMask::V302Only
            }
            _ => VersionMask::Both,
        }
    }

    pub fn obligation(&self, role: Type) -> Obligation {
        use Obligation::*;
        use Type::*;
        match (self, role) {
            (Self::Version, _) => Obligatory,
            (Self::RunBy, _) => Obligatory,
            (Self::Comment, _) => Optional,
            (Self::MarkerName, ObservationData) => Obligatory,
            (Self::MarkerName, NavigationData) => NotApplicable,
            (Self::ApproxPosition, ObservationData) => Optional,
            (Self::ApproxPosition, NavigationData) => NotApplicable,
            (Self::AntennaHeight, ObservationData) => Obligatory,
            (Self::AntennaHeight, NavigationData) => NotApplicable,
            (Self::TypesOfObserv, ObservationData) => Obligatory,
            (Self::TypesOfObserv, NavigationData) => NotApplicable,
            (Self::SystemNumObsTypes, ObservationData) => Obligatory,
            (Self::SystemNumObsTypes, NavigationData) => NotApplicable,
            (Self::WavelengthFactL1L2, ObservationData) => Optional,
            (Self::WavelengthFactL1L2, NavigationData) => NotApplicable,
            (Self::SystemScaleFactor, ObservationData) => Optional,
            (Self::SystemScaleFactor, NavigationData) => NotApplicable,
            (Self::PrnNumObs, ObservationData) => Optional,
            (Self::PrnNumObs, NavigationData) => NotApplicable,
            (Self::Interval, ObservationData) => Optional,
            (Self::Interval, NavigationData) => NotApplicable,
            (Self::TimeOfFirstObs, ObservationData) => Obligatory,
            (Self::TimeOfFirstObs, NavigationData) => NotApplicable,
            (Self::TimeOfLastObs, _) => Optional,
            (Self::IonosphericCorr, ObservationData) => NotApplicable,
            (Self::IonosphericCorr, NavigationData) => Optional,
            (Self::TimeSystemCorr, ObservationData) => NotApplicable,
            (Self::TimeSystemCorr, NavigationData) => Optional,
            (Self::LeapSeconds, _) => Optional,
            (Self::GlonassSlotFreqNum, ObservationData) => NotApplicable,
            (Self::GlonassSlotFreqNum, NavigationData) => Optional,
            (Self::EndOfHeader, _) => Obligatory,
        }
    }
}

/// Payload of a single header record; shape depends on the [Label].
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    Position { x: f64, y: f64, z: f64 },
    AntennaOffset { h: f64, e: f64, n: f64 },
    Observables(Vec<Observable>),
    Integer(i64),
    Float(f64),
    GlonassSlot { sv: Sv, freq_num: i8 },
    None,
}

/// A header record: a label, its payload, and whether it carries data
/// ("has data" is always true for `EOH`).
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub label: Label,
    pub payload: Payload,
    pub has_data: bool,
}

impl Record {
    pub fn new(label: Label, payload: Payload) -> Self {
        let has_data = !matches!(payload, Payload::None) || label == Label::EndOfHeader;
        Self {
            label,
            payload,
            has_data,
        }
    }
}

/// A GNSS system entry: the ordered observable list valid for it, a
/// selection flag per observable, and an optional explicit PRN selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SystemEntry {
    pub observables: Vec<Observable>,
    pub selected_observables: Vec<bool>,
    pub selected_prns: Vec<u8>,
}

impl SystemEntry {
    pub fn is_observable_selected(&self, observable: &Observable) -> bool {
        match self.observables.iter().position(|o| o == observable) {
            Some(idx) => self.selected_observables.get(idx).copied().unwrap_or(true),
            None => false,
        }
    }
}

/// The RINEX header: an ordered record list plus per-system observable
/// tables. Ordering of `records` is load-bearing -- it drives both
/// comment placement and writer emission order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    pub version: Version,
    pub role: Option<Type>,
    pub constellation: Option<Constellation>,
    pub records: Vec<Record>,
    pub systems: HashMap<Constellation, SystemEntry>,
    pub glonass_freq_nums: HashMap<Sv, i8>,
    /// `PGM / RUN BY / DATE` fields; always re-derived by the writer rather
    /// than read back from `records`, so they stay correct across a
    /// version promotion.
    pub program: String,
    pub run_by: String,
    pub date: String,
    /// Time tag of the earliest/latest buffered observation; feeds
    /// `TIME OF FIRST/LAST OBS`, re-derived by the writer like `VERSION`.
    pub first_obs: Option<hifitime::Epoch>,
    pub last_obs: Option<hifitime::Epoch>,
}

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    /// First label carrying data, honoring the ordering in [Label::ALL].
    pub fn first_label(&self) -> Option<&Record> {
        self.records.iter().find(|r| r.has_data)
    }

    /// Next record carrying data after `label`, in canonical label order.
    pub fn next_label(&self, after: Label) -> Option<&Record> {
        let start = Label::ALL.iter().position(|l| *l == after)? + 1;
        Label::ALL[start..]
            .iter()
            .filter_map(|l| self.records.iter().find(|r| r.label == *l && r.has_data))
            .next()
    }

    pub fn push(&mut self, label: Label, payload: Payload) {
        self.records.push(Record::new(label, payload));
    }

    pub fn system_entry(&mut self, c: Constellation) -> &mut SystemEntry {
        self.systems.entry(c).or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eoh_always_has_data() {
        let r = Record::new(Label::EndOfHeader, Payload::None);
        assert!(r.has_data);
    }

    #[test]
    fn obligatory_table_matches_role() {
        assert_eq!(
            Label::MarkerName.obligation(Type::ObservationData),
            Obligation::Obligatory
        );
        assert_eq!(
            Label::MarkerName.obligation(Type::NavigationData),
            Obligation::NotApplicable
        );
    }

    #[test]
    fn version_mask_gates_v210_only_labels() {
        assert!(Label::TypesOfObserv
            .version_mask()
            .matches(crate::version::V210));
        assert!(!Label::TypesOfObserv
            .version_mask()
            .matches(crate::version::V302));
    }
}
