//! MID 19: Receiver manufacturer parameters (elevation/SNR masks).
use crate::cursor::Cursor;
use crate::error::CursorError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReceiverMasks {
    /// Elevation mask, tenths of a degree (scaled by 10 on the wire).
    pub elevation_mask_tenths: i16,
    pub snr_mask: u8,
}

impl ReceiverMasks {
    pub fn parse(payload: &[u8]) -> Result<Self, CursorError> {
        let mut c = Cursor::new(payload);
        c.skip(11)?; // leading mode/DGPS/altitude fields this crate ignores
        let elevation_mask_tenths = c.read_i16()?;
        let snr_mask = c.read_u8()?;
        Ok(Self { elevation_mask_tenths, snr_mask })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_masks_past_leading_fields() {
        let mut v = vec![0u8; 11];
        v.extend_from_slice(&50i16.to_be_bytes());
        v.push(28);
        let masks = ReceiverMasks::parse(&v).unwrap();
        assert_eq!(masks.elevation_mask_tenths, 50);
        assert_eq!(masks.snr_mask, 28);
    }
}
