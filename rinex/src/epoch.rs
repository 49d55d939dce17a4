//! Epoch flags and GPS week/TOW time tags
use hifitime::{Epoch, Unit};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Seconds in a GPS week, used to fold `(week, tow)` into the single
/// seconds-since-GPS-epoch time tag the observation/navigation stores key on.
pub const SECONDS_PER_WEEK: f64 = 604_800.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParsingError {
    #[error("unknown epoch flag \"{0}\"")]
    UnknownFlag(String),
}

/// RINEX epoch flag: fixed integer meanings per the standard.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EpochFlag {
    #[default]
    Ok,
    PowerFailure,
    AntennaBeingMoved,
    NewSiteOccupation,
    HeaderInformationFollows,
    ExternalEvent,
    CycleSlip,
}

impl EpochFlag {
    /// True for the "special event" flags (2-5): the epoch first line is
    /// followed by `nSatsEpoch` header-style records rather than measurements.
    pub const fn is_event(&self) -> bool {
        matches!(
            self,
            Self::AntennaBeingMoved
                | Self::NewSiteOccupation
                | Self::HeaderInformationFollows
                | Self::ExternalEvent
        )
    }

    pub const fn to_u8(&self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::PowerFailure => 1,
            Self::AntennaBeingMoved => 2,
            Self::NewSiteOccupation => 3,
            Self::HeaderInformationFollows => 4,
            Self::ExternalEvent => 5,
            Self::CycleSlip => 6,
        }
    }

    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Ok),
            1 => Some(Self::PowerFailure),
            2 => Some(Self::AntennaBeingMoved),
            3 => Some(Self::NewSiteOccupation),
            4 => Some(Self::HeaderInformationFollows),
            5 => Some(Self::ExternalEvent),
            6 => Some(Self::CycleSlip),
            _ => None,
        }
    }
}

impl std::fmt::Display for EpochFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.to_u8())
    }
}

impl std::str::FromStr for EpochFlag {
    type Err = ParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let value = s
            .parse::<u8>()
            .map_err(|_| ParsingError::UnknownFlag(s.to_string()))?;
        Self::from_u8(value).ok_or_else(|| ParsingError::UnknownFlag(s.to_string()))
    }
}

/// Folds a receiver's `(extended-GPS-week, time-of-week-seconds)` pair into
/// the single time tag observation/navigation records key on, and back.
pub fn gpst_epoch(week: u16, tow: f64) -> Epoch {
    Epoch::from_gpst_seconds(week as f64 * SECONDS_PER_WEEK + tow)
}

/// Recovers `(week, tow)` from a GPS-timescale [Epoch], the inverse of
/// [gpst_epoch].
pub fn week_tow(epoch: Epoch) -> (u16, f64) {
    let total = epoch.to_gpst_seconds();
    let week = (total / SECONDS_PER_WEEK).floor();
    let tow = total - week * SECONDS_PER_WEEK;
    (week as u16, tow)
}

/// GLONASS time tags are given as `(N4, NT, tb)` and interpreted as UTC,
/// offset by the fixed 3 hour GLONASS/UTC bias, then converted to GPS time
/// for storage (§4.3).
pub fn glonass_epoch(n4: u8, nt: u16, tb_minutes: f64) -> Epoch {
    let four_year_cycle_start = Epoch::from_gregorian_utc_at_midnight(
        1996 + (n4 as i32 - 1) * 4,
        1,
        1,
    );
    let day_of_cycle = nt.saturating_sub(1) as f64;
    let utc = four_year_cycle_start
        + day_of_cycle * Unit::Day
        + tb_minutes * Unit::Minute
        - 3.0 * Unit::Hour;
    utc
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn flag_roundtrip() {
        for v in 0..=6u8 {
            let flag = EpochFlag::from_u8(v).unwrap();
            assert_eq!(EpochFlag::from_str(&flag.to_string()).unwrap(), flag);
        }
    }

    #[test]
    fn events_are_2_through_5() {
        assert!(!EpochFlag::Ok.is_event());
        assert!(!EpochFlag::PowerFailure.is_event());
        assert!(EpochFlag::AntennaBeingMoved.is_event());
        assert!(EpochFlag::NewSiteOccupation.is_event());
        assert!(EpochFlag::HeaderInformationFollows.is_event());
        assert!(EpochFlag::ExternalEvent.is_event());
        assert!(!EpochFlag::CycleSlip.is_event());
    }

    #[test]
    fn week_tow_roundtrip() {
        let e = gpst_epoch(1800, 43200.0);
        let (week, tow) = week_tow(e);
        assert_eq!(week, 1800);
        assert!((tow - 43200.0).abs() < 1e-3);
    }

    #[test]
    fn rejects_out_of_range_flag() {
        assert!(EpochFlag::from_str("9").is_err());
    }
}
