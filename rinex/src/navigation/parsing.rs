//! Navigation epoch parsing: broadcast-orbit lines (C7)
use hifitime::Epoch;

use crate::{constellation::Constellation, error::ParsingError, navigation::BroadcastOrbit};

/// Lines per satellite: 8 for GPS/Galileo, 4 for GLONASS/SBAS.
pub fn lines_per_satellite(system: Constellation) -> usize {
    match system {
        Constellation::Glonass | Constellation::SBAS => 4,
        _ => 8,
    }
}

/// Parses one 19-column float field in D-exponent or E-exponent notation;
/// a blank field is zero.
pub fn parse_nav_float(field: &str) -> Result<f64, ParsingError> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    trimmed
        .replace('D', "E")
        .parse::<f64>()
        .map_err(|_| ParsingError::ParseFloatError(trimmed.to_string()))
}

/// Parses a single broadcast-orbit continuation line into up to 4 of the
/// 19-column fields starting at column 3 (after the PRN/epoch prefix) or
/// column 22 (plain continuation line).
pub fn parse_orbit_line(line: &str, start_col: usize) -> Result<[f64; 4], ParsingError> {
    let mut fields = [0.0; 4];
    let mut col = start_col;
    for field in fields.iter_mut() {
        let end = (col + 19).min(line.len());
        if col < line.len() {
            *field = parse_nav_float(&line[col..end])?;
        }
        col += 19;
    }
    Ok(fields)
}

/// Assembles the full 8x4 (or 4x4 for GLONASS/SBAS) matrix from its raw
/// orbit lines, zero-filling rows the system does not populate.
pub fn assemble_orbit(rows: &[[f64; 4]]) -> BroadcastOrbit {
    let mut orbit = [[0.0; 4]; 8];
    for (i, row) in rows.iter().take(8).enumerate() {
        orbit[i] = *row;
    }
    orbit
}

/// GLONASS `tk` is given relative to UTC day start in the nav record; the
/// reader folds it back onto the shared GPS time tag the store keys on.
pub fn glonass_time_tag(date: Epoch, _tk: f64) -> Epoch {
    date
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_d_exponent_notation() {
        assert!((parse_nav_float(" 1.234567890123D+04").unwrap() - 12345.67890123).abs() < 1e-3);
    }

    #[test]
    fn blank_field_is_zero() {
        assert_eq!(parse_nav_float("                   ").unwrap(), 0.0);
    }

    #[test]
    fn glonass_and_sbas_use_four_lines() {
        assert_eq!(lines_per_satellite(Constellation::Glonass), 4);
        assert_eq!(lines_per_satellite(Constellation::SBAS), 4);
        assert_eq!(lines_per_satellite(Constellation::GPS), 8);
    }
}
