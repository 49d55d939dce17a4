//! MID 7: Clock Status Data -- closes the active observation epoch.
use crate::cursor::Cursor;
use crate::error::CursorError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockStatus {
    pub week: u16,
    pub tow: u32,
    pub nsv: u8,
    pub drift: u32,
    pub bias: u32,
}

impl ClockStatus {
    pub fn parse(payload: &[u8]) -> Result<Self, CursorError> {
        let mut c = Cursor::new(payload);
        let week = c.read_u16()?;
        let tow = c.read_u32()?;
        let nsv = c.read_u8()?;
        let drift = c.read_u32()?;
        let bias = c.read_u32()?;
        Ok(Self { week, tow, nsv, drift, bias })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fixed_layout() {
        let mut v = Vec::new();
        v.extend_from_slice(&2200u16.to_be_bytes());
        v.extend_from_slice(&123456u32.to_be_bytes());
        v.push(7);
        v.extend_from_slice(&10u32.to_be_bytes());
        v.extend_from_slice(&20u32.to_be_bytes());
        let status = ClockStatus::parse(&v).unwrap();
        assert_eq!(status.week, 2200);
        assert_eq!(status.nsv, 7);
        assert_eq!(status.bias, 20);
    }
}
