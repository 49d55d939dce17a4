//! RINEX file-name construction (§6)
use hifitime::{Duration, Epoch};

use crate::constellation::Constellation;

/// Single letter encoding the hour-of-day in a V2.10 file name: `a` for
/// hour 0, `b` for hour 1, ... `x` for hour 23.
pub fn hour_letter(hour: u8) -> char {
    (b'a' + (hour.min(23))) as char
}

/// Builds the V2.10 name `NNNN{DOY:03}{H:a..x}{MM:02}.{YY:02}{T}`.
pub fn v210_filename(site: &str, epoch: Epoch, file_type: char) -> String {
    let (year, _month, _day, hour, minute, _second, _ns) = epoch.to_gregorian_utc();
    let doy = epoch.day_of_year().floor() as u16;
    let yy = year % 100;
    format!(
        "{}{:03}{}{:02}.{:02}{}",
        site.to_uppercase(),
        doy,
        hour_letter(hour),
        minute,
        yy,
        file_type
    )
}

/// Duration-unit letters used by `PU`/`FU` in the V3.02 name.
pub fn duration_unit(seconds: f64) -> (u32, char) {
    if seconds < 1.0 {
        ((seconds * 1000.0).round() as u32, 'U')
    } else if seconds < 60.0 {
        (seconds.round() as u32, 'S')
    } else if seconds < 3_600.0 {
        ((seconds / 60.0).round() as u32, 'M')
    } else if seconds < 86_400.0 {
        ((seconds / 3_600.0).round() as u32, 'H')
    } else {
        ((seconds / 86_400.0).round() as u32, 'D')
    }
}

/// Builds the V3.02 name
/// `NNNNMR{CCC}_R_{YYYY}{DOY:03}{HH}{MM}_{PP}{PU}_{FF}{FU}_{C}{T}.rnx`.
#[allow(clippy::too_many_arguments)]
pub fn v302_filename(
    site: &str,
    marker_number: &str,
    receiver: char,
    country: &str,
    epoch: Epoch,
    period: Duration,
    file_interval: Duration,
    system: Option<Constellation>,
    file_type: char,
) -> String {
    let (year, _month, _day, hour, minute, _second, _ns) = epoch.to_gregorian_utc();
    let doy = epoch.day_of_year().floor() as u16;
    let (pp, pu) = duration_unit(period.to_seconds());
    let (ff, fu) = duration_unit(file_interval.to_seconds());
    let c = system.map(|s| s.rinex_char()).unwrap_or('M');
    format!(
        "{}{}{}{}_{}_{:04}{:03}{:02}{:02}_{:02}{}_{:02}{}_{}{}.rnx",
        site.to_uppercase(),
        marker_number,
        receiver,
        country.to_uppercase(),
        'R',
        year,
        doy,
        hour,
        minute,
        pp,
        pu,
        ff,
        fu,
        c,
        file_type
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::epoch::gpst_epoch;

    #[test]
    fn hour_letter_table() {
        assert_eq!(hour_letter(0), 'a');
        assert_eq!(hour_letter(23), 'x');
    }

    #[test]
    fn v210_name_has_expected_shape() {
        let epoch = gpst_epoch(1800, 43200.0);
        let name = v210_filename("pnt1", epoch, 'O');
        assert!(name.ends_with('O'));
        assert_eq!(&name[0..4], "PNT1");
        assert!(name.contains('.'));
    }

    #[test]
    fn duration_unit_picks_day_for_86400() {
        assert_eq!(duration_unit(86_400.0), (1, 'D'));
    }
}
