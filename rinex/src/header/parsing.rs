//! Fixed-column header record parsing (C7)
use std::str::FromStr;

use crate::{
    constellation::Constellation,
    error::ParsingError,
    header::{Label, Payload},
    observable::Observable,
    sv::Sv,
    version::Version,
};

/// Header lines are fixed-column: the label occupies columns 61-80
/// (1-indexed), the rest of the line is label-specific payload.
const LABEL_COLUMN: usize = 60;

fn label_text(line: &str) -> &str {
    if line.len() > LABEL_COLUMN {
        line[LABEL_COLUMN..].trim_end()
    } else {
        ""
    }
}

fn payload_columns(line: &str) -> &str {
    if line.len() > LABEL_COLUMN {
        &line[..LABEL_COLUMN]
    } else {
        line
    }
}

fn parse_f64_field(field: &str) -> Result<f64, ParsingError> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    trimmed
        .replace('D', "E")
        .parse::<f64>()
        .map_err(|_| ParsingError::ParseFloatError(trimmed.to_string()))
}

/// Resolves the label printed in columns 61-80 to a known [Label], failing
/// with `NoLabel` for anything the reader does not recognize.
pub fn resolve_label(line: &str) -> Result<Label, ParsingError> {
    let text = label_text(line);
    Label::ALL
        .iter()
        .find(|l| l.text() == text)
        .copied()
        .ok_or_else(|| ParsingError::NoLabel(text.to_string()))
}

/// Parses the `RINEX VERSION / TYPE` record (must be the first record of
/// any file).
pub fn parse_version(line: &str) -> Result<(Version, Option<Constellation>), ParsingError> {
    let payload = payload_columns(line);
    let version = Version::from_str(payload[0..9].trim())?;
    let constellation = if payload.len() > 40 {
        Constellation::from_str(payload[40..41].trim()).ok()
    } else {
        None
    };
    Ok((version, constellation))
}

/// Parses `APPROX POSITION XYZ`: three 14.4 fields.
pub fn parse_approx_position(line: &str) -> Result<Payload, ParsingError> {
    let payload = payload_columns(line);
    let x = parse_f64_field(payload.get(0..14).unwrap_or(""))?;
    let y = parse_f64_field(payload.get(14..28).unwrap_or(""))?;
    let z = parse_f64_field(payload.get(28..42).unwrap_or(""))?;
    Ok(Payload::Position { x, y, z })
}

/// Parses `ANTENNA: DELTA H/E/N`: three 14.4 fields.
pub fn parse_antenna_offset(line: &str) -> Result<Payload, ParsingError> {
    let payload = payload_columns(line);
    let h = parse_f64_field(payload.get(0..14).unwrap_or(""))?;
    let e = parse_f64_field(payload.get(14..28).unwrap_or(""))?;
    let n = parse_f64_field(payload.get(28..42).unwrap_or(""))?;
    Ok(Payload::AntennaOffset { h, e, n })
}

/// Parses a V2.10 `# / TYPES OF OBSERV` record (continuation lines are the
/// caller's concern: each call only resolves the observables on one line).
pub fn parse_v210_observables(line: &str) -> Result<Vec<Observable>, ParsingError> {
    let payload = payload_columns(line);
    let mut observables = Vec::new();
    let mut col = 6;
    while col + 2 <= payload.len() {
        let code = payload[col..col + 2].trim();
        if !code.is_empty() {
            if let Some(obs) = Observable::from_v2(code) {
                observables.push(obs);
            }
        }
        col += 6;
    }
    Ok(observables)
}

/// Parses a V3.02 `SYS / # / OBS TYPES` record: leading system letter then
/// 3-letter observable codes.
pub fn parse_v302_system_observables(
    line: &str,
) -> Result<(Constellation, Vec<Observable>), ParsingError> {
    let payload = payload_columns(line);
    let system = Constellation::from_str(payload.get(0..1).unwrap_or(""))?;
    let mut observables = Vec::new();
    let mut col = 6;
    while col + 3 <= payload.len() {
        let code = payload[col..col + 3].trim();
        if !code.is_empty() {
            observables.push(Observable::new(code));
        }
        col += 4;
    }
    Ok((system, observables))
}

/// Parses a `GLONASS SLOT / FRQ #` record: up to 8 `(slot, freq)` pairs.
pub fn parse_glonass_slot_freq(line: &str) -> Result<Vec<(Sv, i8)>, ParsingError> {
    let payload = payload_columns(line);
    let mut out = Vec::new();
    let mut col = 4;
    while col + 7 <= payload.len() {
        let sv_text = payload[col..col + 3].trim();
        if sv_text.is_empty() {
            break;
        }
        let sv = Sv::from_str(sv_text)?;
        let freq_text = payload[col + 3..col + 7].trim();
        let freq = freq_text
            .parse::<i8>()
            .map_err(|_| ParsingError::ParseIntError(freq_text.to_string()))?;
        out.push((sv, freq));
        col += 7;
    }
    Ok(out)
}

/// Parses `LEAP SECONDS`: a single integer in the first 6 columns.
pub fn parse_leap_seconds(line: &str) -> Result<Payload, ParsingError> {
    let payload = payload_columns(line);
    let field = payload.get(0..6).unwrap_or("").trim();
    let value = field
        .parse::<i64>()
        .map_err(|_| ParsingError::ParseIntError(field.to_string()))?;
    Ok(Payload::Integer(value))
}

/// Parses `INTERVAL`: a single float in the first 10 columns.
pub fn parse_interval(line: &str) -> Result<Payload, ParsingError> {
    let payload = payload_columns(line);
    Ok(Payload::Float(parse_f64_field(
        payload.get(0..10).unwrap_or(""),
    )?))
}

/// Parses a free-text record (`COMMENT`, `MARKER NAME`, `PGM / RUN BY / DATE`).
pub fn parse_text(line: &str) -> Payload {
    Payload::Text(payload_columns(line).trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_end_of_header() {
        let line = format!("{:<60}{}", "", Label::EndOfHeader.text());
        assert_eq!(resolve_label(&line).unwrap(), Label::EndOfHeader);
    }

    #[test]
    fn unknown_label_is_no_label() {
        let line = format!("{:<60}{}", "", "NOT A REAL LABEL");
        assert!(matches!(
            resolve_label(&line),
            Err(ParsingError::NoLabel(_))
        ));
    }

    #[test]
    fn parses_approx_position() {
        let line = format!(
            "{:>14.4}{:>14.4}{:>14.4}{:<32}{}",
            1234.5678,
            -2345.6789,
            3456.789,
            "",
            Label::ApproxPosition.text()
        );
        let payload = parse_approx_position(&line).unwrap();
        match payload {
            Payload::Position { x, y, z } => {
                assert!((x - 1234.5678).abs() < 1e-3);
                assert!((y + 2345.6789).abs() < 1e-3);
                assert!((z - 3456.789).abs() < 1e-3);
            }
            _ => panic!("wrong payload variant"),
        }
    }

    #[test]
    fn parses_v302_system_observables() {
        let line = "G   12 C1C L1C D1C S1C C2P L2P D2P S2P                    SYS / # / OBS TYPES";
        let (system, observables) = parse_v302_system_observables(line).unwrap();
        assert_eq!(system, Constellation::GPS);
        assert!(observables.iter().any(|o| o.as_str() == "C1C"));
    }
}
