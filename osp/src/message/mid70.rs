//! MID 70: GLONASS ephemeris response, SID 12 (§4.5). Parses each valid SV's
//! ephemeris block directly into the 4x4 mantissa shape [crate::ephemeris]
//! expects, bypassing the string-by-string reassembler.
use crate::cursor::Cursor;
use crate::error::CursorError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlonassEphemerisResponse {
    pub slot: u8,
    pub valid: bool,
    pub strings: [[u32; 3]; 5],
}

/// Response payload: `sid:u8(=12), count:u8, count x {slot:u8, valid:u8,
/// strings[5] x [u32;3]}`.
pub fn parse(payload: &[u8]) -> Result<Vec<GlonassEphemerisResponse>, CursorError> {
    let mut c = Cursor::new(payload);
    c.skip(1)?; // SID, already used to route here
    let count = c.read_u8()?;
    let mut out = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let slot = c.read_u8()?;
        let valid = c.read_u8()? != 0;
        let mut strings = [[0u32; 3]; 5];
        for s in strings.iter_mut() {
            for word in s.iter_mut() {
                *word = c.read_u32()?;
            }
        }
        out.push(GlonassEphemerisResponse { slot, valid, strings });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_one_valid_sv_block() {
        let mut v = vec![12u8, 1, 9, 1];
        for _ in 0..15 {
            v.extend_from_slice(&7u32.to_be_bytes());
        }
        let blocks = parse(&v).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].slot, 9);
        assert!(blocks[0].valid);
        assert_eq!(blocks[0].strings[4][2], 7);
    }

    #[test]
    fn skips_invalid_blocks_by_flag_only() {
        let mut v = vec![12u8, 1, 3, 0];
        v.extend_from_slice(&vec![0u8; 15 * 4]);
        let blocks = parse(&v).unwrap();
        assert!(!blocks[0].valid);
    }
}
