//! Observation epoch parsing (C7)
use std::str::FromStr;

use hifitime::Epoch;

use crate::{
    epoch::EpochFlag,
    error::ParsingError,
    observable::Observable,
    observation::Record,
    sv::Sv,
    version::{Version, V210, V302},
};

/// The small integer result space for one epoch read, mirrored 1:1 from
/// the status codes a single `read_obs_epoch` call reports.
#[derive(Debug, Clone, PartialEq)]
pub enum EpochStatus {
    EndOfFile,
    Ok,
    OkNewEpoch,
    BadObs,
    BadEpoch,
    SiteEventMissingMarker,
    SpecialRecordError,
    ExternalEventMissingDate,
    BadFlag,
    UnsupportedVersion,
}

/// One decoded epoch block: the header line's time/flag/satellite list and
/// the per-satellite measurement records (empty for event epochs).
#[derive(Debug, Clone, PartialEq)]
pub struct EpochBlock {
    pub epoch: Epoch,
    pub flag: EpochFlag,
    pub satellites: Vec<Sv>,
    pub clock_offset: Option<f64>,
    pub records: Vec<Record>,
    pub event_lines: Vec<String>,
}

fn gps_time_from_ymdhms(
    year: i32,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: f64,
) -> Epoch {
    let utc = Epoch::from_gregorian_utc(year, month, day, hour, minute, second as u8, 0);
    utc
}

/// Parses the V2.10 epoch first line: `YY MM DD HH MM SS.sssssss  flag nSats [sat triples]`.
pub fn parse_v210_epoch_line(line: &str) -> Result<(Epoch, EpochFlag, Vec<u16>), ParsingError> {
    if line.len() < 26 {
        return Err(ParsingError::BadEpoch);
    }
    let yy = line[1..3].trim().parse::<i32>().map_err(|_| ParsingError::BadEpoch)?;
    let year = if yy < 80 { 2000 + yy } else { 1900 + yy };
    let month = line[4..6].trim().parse::<u8>().map_err(|_| ParsingError::BadEpoch)?;
    let day = line[7..9].trim().parse::<u8>().map_err(|_| ParsingError::BadEpoch)?;
    let hour = line[10..12].trim().parse::<u8>().map_err(|_| ParsingError::BadEpoch)?;
    let minute = line[13..15].trim().parse::<u8>().map_err(|_| ParsingError::BadEpoch)?;
    let second = line[15..26]
        .trim()
        .parse::<f64>()
        .map_err(|_| ParsingError::BadEpoch)?;
    let flag_str = line.get(26..29).unwrap_or("").trim();
    let flag = EpochFlag::from_str(flag_str).map_err(|_| ParsingError::BadFlag)?;
    let nsats = line.get(29..32).unwrap_or("").trim();
    let nsats: u16 = if nsats.is_empty() {
        0
    } else {
        nsats.parse().map_err(|_| ParsingError::BadEpoch)?
    };
    let epoch = gps_time_from_ymdhms(year, month, day, hour, minute, second);
    Ok((epoch, flag, vec![nsats]))
}

/// Parses the satellite triples following a V2.10 epoch line (and its
/// continuation lines): groups of 3 columns, `Gnn`/`Rnn`/etc, up to 12 per
/// line.
pub fn parse_v210_satellite_list(line: &str, max: usize) -> Vec<Sv> {
    let mut out = Vec::new();
    let mut col = 32;
    while out.len() < max && col + 3 <= line.len() {
        let token = line[col..col + 3].trim();
        if !token.is_empty() {
            if let Ok(sv) = Sv::from_str(token) {
                out.push(sv);
            }
        }
        col += 3;
    }
    out
}

/// Parses the V3.02 epoch first line: `> YYYY MM DD HH MM SS.sssssss  flag nSats`.
pub fn parse_v302_epoch_line(line: &str) -> Result<(Epoch, EpochFlag, u16), ParsingError> {
    if !line.starts_with('>') || line.len() < 35 {
        return Err(ParsingError::BadEpoch);
    }
    let year = line[2..6].trim().parse::<i32>().map_err(|_| ParsingError::BadEpoch)?;
    let month = line[7..9].trim().parse::<u8>().map_err(|_| ParsingError::BadEpoch)?;
    let day = line[10..12].trim().parse::<u8>().map_err(|_| ParsingError::BadEpoch)?;
    let hour = line[13..15].trim().parse::<u8>().map_err(|_| ParsingError::BadEpoch)?;
    let minute = line[16..18].trim().parse::<u8>().map_err(|_| ParsingError::BadEpoch)?;
    let second = line[18..29]
        .trim()
        .parse::<f64>()
        .map_err(|_| ParsingError::BadEpoch)?;
    let flag_str = line.get(30..32).unwrap_or("").trim();
    let flag = EpochFlag::from_str(flag_str).map_err(|_| ParsingError::BadFlag)?;
    let nsats = line.get(32..35).unwrap_or("").trim();
    let nsats: u16 = if nsats.is_empty() {
        0
    } else {
        nsats.parse().map_err(|_| ParsingError::BadEpoch)?
    };
    let epoch = gps_time_from_ymdhms(year, month, day, hour, minute, second);
    Ok((epoch, flag, nsats))
}

/// Parses one V2.10 observable field: 14 columns value, 1 LLI, 1 strength.
/// An empty 14-column field means a missing observable (stored as zero).
pub fn parse_v210_observable_field(field: &str) -> Result<(f64, Option<u8>, Option<u8>), ParsingError> {
    if field.len() < 14 {
        return Ok((0.0, None, None));
    }
    let value_str = field[0..14].trim();
    let value = if value_str.is_empty() {
        0.0
    } else {
        value_str
            .parse::<f64>()
            .map_err(|_| ParsingError::ParseFloatError(value_str.to_string()))?
    };
    let lli = field
        .get(14..15)
        .and_then(|s| s.trim().parse::<u8>().ok());
    let snr = field
        .get(15..16)
        .and_then(|s| s.trim().parse::<u8>().ok());
    Ok((value, lli, snr))
}

/// Parses one V3.02 observable field: identical 14+1+1 layout, but packed
/// 16 columns per observable with no satellite prefix.
pub fn parse_v302_observable_field(field: &str) -> Result<(f64, Option<u8>, Option<u8>), ParsingError> {
    parse_v210_observable_field(field)
}

#[allow(unused_variables)]
pub fn apply_version_gate(version: Version) -> Result<(), ParsingError> {
    if version == V210 || version == V302 {
        Ok(())
    } else {
        Err(ParsingError::UnsupportedVersion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_v210_epoch_header() {
        let line = " 21  6 15  0  0  0.0000000  0 12";
        let (_epoch, flag, counts) = parse_v210_epoch_line(line).unwrap();
        assert_eq!(flag, EpochFlag::Ok);
        assert_eq!(counts[0], 12);
    }

    #[test]
    fn parses_v302_epoch_header() {
        let line = "> 2021  6 15  0  0  0.0000000  0 12";
        let (_epoch, flag, nsats) = parse_v302_epoch_line(line).unwrap();
        assert_eq!(flag, EpochFlag::Ok);
        assert_eq!(nsats, 12);
    }

    #[test]
    fn missing_observable_field_is_zero() {
        let field = "              ";
        let (value, lli, snr) = parse_v210_observable_field(field).unwrap();
        assert_eq!(value, 0.0);
        assert_eq!(lli, None);
        assert_eq!(snr, None);
    }

    #[test]
    fn rejects_short_epoch_line() {
        assert!(parse_v210_epoch_line("too short").is_err());
    }
}
