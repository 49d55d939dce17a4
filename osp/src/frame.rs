//! OSP frame reader (C2): pulls one framed message from a byte source.
use std::io::{ErrorKind, Read};

use crate::{cursor::Cursor, error::FrameError};

/// Payloads larger than this are rejected with [FrameError::BadLength]; also
/// the bound on subframe/ephemeris buffer sizing elsewhere in this crate.
pub const MAX_PAYLOAD: usize = 2048;

fn read_exact_or_eof<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<(), FrameError> {
    match reader.read_exact(buf) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(FrameError::Truncated),
        Err(e) => Err(e.into()),
    }
}

fn read_u16_be<R: Read>(reader: &mut R) -> Result<u16, FrameError> {
    let mut b = [0u8; 2];
    match reader.read_exact(&mut b) {
        Ok(()) => Ok(u16::from_be_bytes(b)),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(FrameError::Eof),
        Err(e) => Err(e.into()),
    }
}

/// Reads already-decapsulated files: a stream of `{length: u16 BE, payload}`
/// records with no framing bytes, checksum, or synchronization needed.
pub struct StrippedReader<R: Read> {
    reader: R,
}

impl<R: Read> StrippedReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Reads one message; `Err(Eof)` only when the length field itself could
    /// not be read (a clean end of stream between messages).
    pub fn read_message(&mut self) -> Result<Vec<u8>, FrameError> {
        let len = read_u16_be(&mut self.reader)?;
        if len == 0 || len as usize > MAX_PAYLOAD {
            return Err(FrameError::BadLength);
        }
        let mut payload = vec![0u8; len as usize];
        read_exact_or_eof(&mut self.reader, &mut payload)?;
        Ok(payload)
    }
}

/// Synchronization automaton states for [FramedReader::sync]. Kept as two
/// properly separated states per §9: a byte that breaks the `A0 A2` sequence
/// is re-tested as a possible new `A0`, but falling through both match arms
/// on the same byte (the source tool's bug) never happens here.
enum SyncState {
    SearchA0,
    SearchA2,
}

/// Reads live-serial or raw-packet framed streams:
/// `A0 A2 {len:2} {payload} {checksum:2} B0 B3`.
pub struct FramedReader<R: Read> {
    reader: R,
    patience: usize,
}

impl<R: Read> FramedReader<R> {
    /// `patience` bounds the number of bytes/failed reads [Self::sync]
    /// tolerates before giving up with [FrameError::SyncLost].
    pub fn new(reader: R, patience: usize) -> Self {
        Self { reader, patience }
    }

    fn sync(&mut self) -> Result<(), FrameError> {
        let mut state = SyncState::SearchA0;
        let mut budget = self.patience;
        loop {
            if budget == 0 {
                return Err(FrameError::SyncLost);
            }
            let mut b = [0u8; 1];
            match self.reader.read_exact(&mut b) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Err(FrameError::Eof),
                Err(e) => return Err(e.into()),
            }
            budget -= 1;
            match state {
                SyncState::SearchA0 => {
                    if b[0] == 0xA0 {
                        state = SyncState::SearchA2;
                    }
                }
                SyncState::SearchA2 => {
                    if b[0] == 0xA2 {
                        return Ok(());
                    } else if b[0] == 0xA0 {
                        state = SyncState::SearchA2;
                    } else {
                        state = SyncState::SearchA0;
                    }
                }
            }
        }
    }

    /// Reads one framed message. On [FrameError::BadChecksum] the reader is
    /// left positioned past the bad frame (the checksum field and the `B0
    /// B3` trailer are consumed before the mismatch is reported).
    pub fn read_message(&mut self) -> Result<Vec<u8>, FrameError> {
        self.sync()?;
        let len = read_u16_be(&mut self.reader).map_err(|e| match e {
            FrameError::Eof => FrameError::Truncated,
            other => other,
        })?;
        if len == 0 || len as usize > MAX_PAYLOAD {
            return Err(FrameError::BadLength);
        }
        let mut payload = vec![0u8; len as usize];
        read_exact_or_eof(&mut self.reader, &mut payload)?;
        let checksum = read_u16_be(&mut self.reader).map_err(|e| match e {
            FrameError::Eof => FrameError::Truncated,
            other => other,
        })?;
        let mut trailer = [0u8; 2];
        read_exact_or_eof(&mut self.reader, &mut trailer)?;
        let computed = checksum_of(&payload);
        if computed != checksum {
            return Err(FrameError::BadChecksum);
        }
        Ok(payload)
    }
}

/// `(Σ payload) mod 0x8000`, big-endian on the wire.
pub fn checksum_of(payload: &[u8]) -> u16 {
    let sum: u32 = payload.iter().map(|b| *b as u32).sum();
    (sum % 0x8000) as u16
}

/// Encodes a full framed packet around `payload`; the inverse of
/// [FramedReader::read_message], used by the round-trip test and by any
/// future encoder.
pub fn encode_frame(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + 8);
    out.extend_from_slice(&[0xA0, 0xA2]);
    out.extend_from_slice(&(payload.len() as u16).to_be_bytes());
    out.extend_from_slice(payload);
    out.extend_from_slice(&checksum_of(payload).to_be_bytes());
    out.extend_from_slice(&[0xB0, 0xB3]);
    out
}

/// Borrows a [Cursor] over a decoded payload (the "typed view" both reader
/// modes expose, per C2).
pub fn cursor(payload: &[u8]) -> Cursor<'_> {
    Cursor::new(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor as IoCursor;

    #[test]
    fn stripped_reader_reads_one_message() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&4u16.to_be_bytes());
        buf.extend_from_slice(&[0x02, 0x00, 0x00, 0x01]);
        let mut reader = StrippedReader::new(IoCursor::new(buf));
        let payload = reader.read_message().unwrap();
        assert_eq!(payload, vec![0x02, 0x00, 0x00, 0x01]);
    }

    #[test]
    fn stripped_reader_rejects_zero_length() {
        let buf = 0u16.to_be_bytes().to_vec();
        let mut reader = StrippedReader::new(IoCursor::new(buf));
        assert_eq!(reader.read_message().unwrap_err(), FrameError::BadLength);
    }

    #[test]
    fn stripped_reader_rejects_oversized_length() {
        let buf = (MAX_PAYLOAD as u16 + 1).to_be_bytes().to_vec();
        let mut reader = StrippedReader::new(IoCursor::new(buf));
        assert_eq!(reader.read_message().unwrap_err(), FrameError::BadLength);
    }

    #[test]
    fn stripped_reader_detects_short_payload() {
        let mut buf = 4u16.to_be_bytes().to_vec();
        buf.extend_from_slice(&[0x01, 0x02]);
        let mut reader = StrippedReader::new(IoCursor::new(buf));
        assert_eq!(reader.read_message().unwrap_err(), FrameError::Truncated);
    }

    #[test]
    fn framed_round_trip_s1() {
        // S1: MID=2, payload = 02 00 00 01, checksum 0x0003.
        let frame = [0xA0, 0xA2, 0x00, 0x04, 0x02, 0x00, 0x00, 0x01, 0x00, 0x03, 0xB0, 0xB3];
        let mut reader = FramedReader::new(IoCursor::new(frame.to_vec()), 64);
        let payload = reader.read_message().unwrap();
        assert_eq!(payload, vec![0x02, 0x00, 0x00, 0x01]);
        let mut c = cursor(&payload);
        assert_eq!(c.read_u8().unwrap(), 2);
        assert_eq!(c.read_u32().unwrap(), 1);
    }

    #[test]
    fn decode_encode_round_trip_is_identity() {
        let payload = vec![0x07u8, 0x01, 0x02, 0x03, 0x04, 0x05];
        let frame = encode_frame(&payload);
        let mut reader = FramedReader::new(IoCursor::new(frame), 64);
        assert_eq!(reader.read_message().unwrap(), payload);
    }

    #[test]
    fn framed_reader_detects_bad_checksum() {
        let mut frame = encode_frame(&[0x07, 0x01, 0x02]);
        // Corrupt the checksum high byte.
        let n = frame.len();
        frame[n - 4] ^= 0xFF;
        let mut reader = FramedReader::new(IoCursor::new(frame), 64);
        assert_eq!(reader.read_message().unwrap_err(), FrameError::BadChecksum);
    }

    #[test]
    fn framed_reader_recovers_sync_after_garbage() {
        let mut stream = vec![0xFF, 0xA0, 0x00, 0xA0]; // garbage, partial false-starts
        stream.extend_from_slice(&encode_frame(&[0x06, 0x01]));
        let mut reader = FramedReader::new(IoCursor::new(stream), 64);
        let payload = reader.read_message().unwrap();
        assert_eq!(payload, vec![0x06, 0x01]);
    }

    #[test]
    fn framed_reader_gives_up_after_patience_exhausted() {
        let stream = vec![0xFFu8; 10];
        let mut reader = FramedReader::new(IoCursor::new(stream), 5);
        assert_eq!(reader.read_message().unwrap_err(), FrameError::SyncLost);
    }

    #[test]
    fn truncated_frame_never_reports_ok() {
        let frame = [0xA0, 0xA2, 0x00, 0x04, 0x02, 0x00];
        let mut reader = FramedReader::new(IoCursor::new(frame.to_vec()), 64);
        assert!(matches!(
            reader.read_message(),
            Err(FrameError::Truncated) | Err(FrameError::Eof)
        ));
    }
}
