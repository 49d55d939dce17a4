//! RTKLIB-style position solution text (C10): a fixed header template plus
//! one line per `(week, tow, x, y, z, quality, nsv)` position fix.
use std::io::Write;

use osp::dispatcher::Config as DispatcherConfig;

/// One position fix, fed from C5's `Event::ApproxPosition`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fix {
    pub week: u16,
    pub tow: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub quality: u8,
    pub nsv: u8,
}

/// Accumulates fixes across a run and formats them RTKLIB-style.
#[derive(Debug, Clone, Default)]
pub struct Solution {
    fixes: Vec<Fix>,
}

impl Solution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, fix: Fix) {
        self.fixes.push(fix);
    }

    pub fn is_empty(&self) -> bool {
        self.fixes.is_empty()
    }

    /// Fixed header template interpolating position mode, mask values,
    /// ephemeris source, and the `start_time`/`end_time` window derived
    /// from the first/last fix's GPS week+TOW (§4.10).
    fn header_lines(&self, config: &DispatcherConfig) -> Vec<String> {
        let mode = if config.apply_bias_correction {
            "kinematic, clock-bias corrected"
        } else {
            "kinematic, uncorrected"
        };
        let (start, end) = match (self.fixes.first(), self.fixes.last()) {
            (Some(first), Some(last)) => (
                format!("week {:>4} tow {:>10.3}", first.week, first.tow),
                format!("week {:>4} tow {:>10.3}", last.week, last.tow),
            ),
            _ => ("n/a".to_string(), "n/a".to_string()),
        };
        vec![
            "% program   : sirf2rnx".to_string(),
            format!("% pos mode  : {}", mode),
            format!("% min nsv   : {}", config.min_nsv),
            "% ephemeris : broadcast (SiRF OSP MID 8 / MID 15 / MID 70)".to_string(),
            format!("% start     : {}", start),
            format!("% end       : {}", end),
            "%  GPSW      GPST           x-ecef(m)      y-ecef(m)      z-ecef(m)   Q  ns   sdx(m)   sdy(m)   sdz(m)  sdxy(m)  sdyz(m)  sdzx(m) age(s)  ratio".to_string(),
        ]
    }

    /// One line per fix: position, quality, satellite count, six
    /// zero-valued standard-deviation placeholders, zero age and zero
    /// ratio -- the core does not estimate any of these (§4.10).
    fn line(fix: &Fix) -> String {
        format!(
            "{:>6} {:>12.3}  {:>14.4} {:>14.4} {:>14.4} {:>3} {:>3} {:>8.4} {:>8.4} {:>8.4} {:>8.4} {:>8.4} {:>8.4} {:>6.2} {:>6.1}",
            fix.week,
            fix.tow,
            fix.x,
            fix.y,
            fix.z,
            fix.quality,
            fix.nsv,
            0.0,
            0.0,
            0.0,
            0.0,
            0.0,
            0.0,
            0.0,
            0.0,
        )
    }

    /// Writes the header template followed by one line per accumulated fix.
    pub fn write<W: Write>(&self, writer: &mut W, config: &DispatcherConfig) -> std::io::Result<()> {
        for line in self.header_lines(config) {
            writeln!(writer, "{}", line)?;
        }
        for fix in &self.fixes {
            writeln!(writer, "{}", Self::line(fix))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_solution_emits_header_only() {
        let solution = Solution::new();
        let mut buf = Vec::new();
        solution.write(&mut buf, &DispatcherConfig::default()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 7);
    }

    #[test]
    fn one_fix_per_line() {
        let mut solution = Solution::new();
        solution.push(Fix { week: 2200, tow: 86400.0, x: 1.0, y: 2.0, z: 3.0, quality: 0, nsv: 8 });
        solution.push(Fix { week: 2200, tow: 86401.0, x: 1.0, y: 2.0, z: 3.0, quality: 0, nsv: 8 });
        let mut buf = Vec::new();
        solution.write(&mut buf, &DispatcherConfig::default()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 9);
    }
}
