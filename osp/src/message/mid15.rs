//! MID 15: Ephemeris Data, already receiver-validated (forwarded to C4
//! without a parity check, §4.5).
use crate::cursor::Cursor;
use crate::error::CursorError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackedEphemeris {
    pub sv: u8,
    pub half_words: [[u16; 15]; 3],
}

impl PackedEphemeris {
    pub fn parse(payload: &[u8]) -> Result<Self, CursorError> {
        let mut c = Cursor::new(payload);
        let sv = c.read_u8()?;
        let mut half_words = [[0u16; 15]; 3];
        for subframe in half_words.iter_mut() {
            for half in subframe.iter_mut() {
                *half = c.read_u16()?;
            }
        }
        Ok(Self { sv, half_words })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_three_subframes_of_halfwords() {
        let mut v = vec![5u8];
        for i in 0..45u16 {
            v.extend_from_slice(&i.to_be_bytes());
        }
        let eph = PackedEphemeris::parse(&v).unwrap();
        assert_eq!(eph.sv, 5);
        assert_eq!(eph.half_words[0][0], 0);
        assert_eq!(eph.half_words[2][14], 44);
    }
}
