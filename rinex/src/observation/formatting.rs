//! Observation epoch formatting (C8)
use hifitime::Epoch;

use crate::{epoch::EpochFlag, sv::Sv};

/// RINEX 14.3 field bounds: values outside this range are emitted as zero.
const FIELD_MAX: f64 = 9_999_999_999.999;
const FIELD_MIN: f64 = -999_999_999.999;

/// Clamps an observable value to zero if it would overflow the fixed
/// 14.3 field width.
pub fn clamp_field(value: f64) -> f64 {
    if value > FIELD_MAX || value < FIELD_MIN {
        0.0
    } else {
        value
    }
}

fn ymdhms(epoch: Epoch) -> (i32, u8, u8, u8, u8, f64) {
    let (y, m, d, hh, mm, ss, ns) = epoch.to_gregorian_utc();
    (y, m, d, hh, mm, ss as f64 + ns as f64 * 1e-9)
}

/// Formats the V2.10 epoch first line, wrapping satellite triples beyond
/// 12 onto continuation lines with 32 blank leading columns.
pub fn fmt_v210_epoch_line(
    epoch: Epoch,
    flag: EpochFlag,
    satellites: &[Sv],
    clock_offset: Option<f64>,
) -> Vec<String> {
    let (y, m, d, hh, mm, ss) = ymdhms(epoch);
    let yy = y % 100;
    let mut first = format!(
        " {:>2} {:>2} {:>2} {:>2} {:>2}{:>11.7}  {}{:>3}",
        yy,
        m,
        d,
        hh,
        mm,
        ss,
        flag.to_u8(),
        satellites.len()
    );
    let mut lines = Vec::new();
    for (i, sv) in satellites.iter().enumerate() {
        if i > 0 && i % 12 == 0 {
            lines.push(first.clone());
            first = " ".repeat(32);
        }
        first.push_str(&sv.to_string());
    }
    if let Some(offset) = clock_offset {
        first.push_str(&format!("{:>12.9}", offset));
    }
    lines.push(first);
    lines
}

/// Formats the V3.02 epoch first line: `> YYYY MM DD HH MM SS.sssssss  flag nSats`.
pub fn fmt_v302_epoch_line(epoch: Epoch, flag: EpochFlag, nsats: usize) -> String {
    let (y, m, d, hh, mm, ss) = ymdhms(epoch);
    format!(
        "> {:>4} {:>2} {:>2} {:>2} {:>2}{:>11.7}  {}{:>3}",
        y,
        m,
        d,
        hh,
        mm,
        ss,
        flag.to_u8(),
        nsats
    )
}

/// Formats one V2.10 observable field: 14.3 value + LLI + strength.
pub fn fmt_v210_observable_field(value: f64, lli: Option<u8>, snr: Option<u8>) -> String {
    format!(
        "{:>14.3}{}{}",
        clamp_field(value),
        lli.map(|v| v.to_string()).unwrap_or_else(|| " ".to_string()),
        snr.map(|v| v.to_string()).unwrap_or_else(|| " ".to_string()),
    )
}

/// Formats one V3.02 observable field (same 14+1+1 layout).
pub fn fmt_v302_observable_field(value: f64, lli: Option<u8>, snr: Option<u8>) -> String {
    fmt_v210_observable_field(value, lli, snr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_overflowing_field_to_zero() {
        assert_eq!(clamp_field(1e13), 0.0);
        assert_eq!(clamp_field(-1e13), 0.0);
        assert_eq!(clamp_field(123.456), 123.456);
    }

    #[test]
    fn v210_epoch_line_wraps_at_12_satellites() {
        let epoch = Epoch::from_gregorian_utc_at_midnight(2021, 6, 15);
        let satellites: Vec<Sv> = (1..=14)
            .map(|p| Sv::new(crate::constellation::Constellation::GPS, p))
            .collect();
        let lines = fmt_v210_epoch_line(epoch, EpochFlag::Ok, &satellites, Some(0.0));
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with(&" ".repeat(32)));
    }
}
