//! MID 2: Measure Navigation Data Out (position fix).
use crate::cursor::Cursor;
use crate::error::CursorError;

/// ECEF position/velocity fix, §6 MID-2.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionFix {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub vx: i16,
    pub vy: i16,
    pub vz: i16,
    pub week: u16,
    pub tow: u32,
    pub nsv: u8,
}

impl PositionFix {
    pub fn parse(payload: &[u8]) -> Result<Self, CursorError> {
        let mut c = Cursor::new(payload);
        let x = c.read_i32()?;
        let y = c.read_i32()?;
        let z = c.read_i32()?;
        let vx = c.read_i16()?;
        let vy = c.read_i16()?;
        let vz = c.read_i16()?;
        c.skip(1)?; // mode1
        c.skip(1)?; // hdop
        c.skip(1)?; // mode2
        let week = c.read_u16()?;
        let tow = c.read_u32()?;
        let nsv = c.read_u8()?;
        Ok(Self { x, y, z, vx, vy, vz, week, tow, nsv })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_payload() -> Vec<u8> {
        let mut v = Vec::new();
        v.extend_from_slice(&100i32.to_be_bytes());
        v.extend_from_slice(&200i32.to_be_bytes());
        v.extend_from_slice(&300i32.to_be_bytes());
        v.extend_from_slice(&1i16.to_be_bytes());
        v.extend_from_slice(&2i16.to_be_bytes());
        v.extend_from_slice(&3i16.to_be_bytes());
        v.push(0); // mode1
        v.push(0); // hdop
        v.push(0); // mode2
        v.extend_from_slice(&2200u16.to_be_bytes());
        v.extend_from_slice(&123456u32.to_be_bytes());
        v.push(8);
        v
    }

    #[test]
    fn parses_fixed_layout() {
        let fix = PositionFix::parse(&sample_payload()).unwrap();
        assert_eq!(fix.x, 100);
        assert_eq!(fix.week, 2200);
        assert_eq!(fix.nsv, 8);
    }

    #[test]
    fn rejects_short_payload() {
        assert_eq!(
            PositionFix::parse(&[0u8; 4]).unwrap_err(),
            CursorError::Truncated
        );
    }
}
