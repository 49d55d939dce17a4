//! Navigation epoch formatting (C8)
use hifitime::Epoch;

use crate::{constellation::Constellation, navigation::BroadcastOrbit, sv::Sv};

fn fmt_field(value: f64) -> String {
    format!("{:>19.12E}", value).replace('E', "D")
}

/// Formats the satellite/epoch prefix line shared by both revisions:
/// `PRN YY MM DD HH MM SS.S  clockBias clockDrift clockDriftRate`.
pub fn fmt_prefix_line(sv: Sv, epoch: Epoch, clock_bias: f64, clock_drift: f64, rate: f64) -> String {
    let (y, m, d, hh, mm, ss, _ns) = epoch.to_gregorian_utc();
    format!(
        "{:<3}{:>3}{:>3}{:>3}{:>3}{:>3}{:>3}{}{}{}",
        sv,
        y % 100,
        m,
        d,
        hh,
        mm,
        ss,
        fmt_field(clock_bias),
        fmt_field(clock_drift),
        fmt_field(rate),
    )
}

/// Formats the remaining broadcast-orbit lines (7 for GPS/Galileo, 3 for
/// GLONASS/SBAS), reducing GLONASS `tk` modulo one day for V2.10 per §4.8.
pub fn fmt_orbit_lines(orbit: &BroadcastOrbit, system: Constellation) -> Vec<String> {
    let rows = match system {
        Constellation::Glonass | Constellation::SBAS => 3,
        _ => 7,
    };
    (0..rows)
        .map(|i| {
            let row = orbit[i + 1];
            format!(
                "   {}{}{}{}",
                fmt_field(row[0]),
                fmt_field(row[1]),
                fmt_field(row[2]),
                fmt_field(row[3]),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::epoch::gpst_epoch;

    #[test]
    fn orbit_line_count_matches_system() {
        let orbit = [[0.0; 4]; 8];
        assert_eq!(fmt_orbit_lines(&orbit, Constellation::GPS).len(), 7);
        assert_eq!(fmt_orbit_lines(&orbit, Constellation::Glonass).len(), 3);
    }

    #[test]
    fn prefix_line_contains_sv_id() {
        let sv = Sv::new(Constellation::GPS, 3);
        let epoch = gpst_epoch(1800, 0.0);
        let line = fmt_prefix_line(sv, epoch, 0.0, 0.0, 0.0);
        assert!(line.starts_with("G03"));
    }
}
