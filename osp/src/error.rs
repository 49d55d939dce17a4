//! Crate-wide error aggregation
use thiserror::Error;

/// Errors a single [crate::cursor::Cursor] read can raise. Every over-read
/// fails with `Truncated`; nothing in this crate panics on malformed input.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorError {
    #[error("attempted to read past the end of the payload buffer")]
    Truncated,
}

/// Outcome of one [crate::frame::StrippedReader]/[crate::frame::FramedReader] read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("end of stream")]
    Eof,
    #[error("synchronization lost: patience budget exhausted before A0 A2")]
    SyncLost,
    #[error("declared payload length is zero or exceeds the 2048 byte bound")]
    BadLength,
    #[error("frame checksum mismatch")]
    BadChecksum,
    #[error("stream ended mid-frame")]
    Truncated,
    #[error("i/o error: {0}")]
    Io(String),
}

impl From<std::io::Error> for FrameError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

/// Errors raised while reassembling navigation subframes/strings (C3).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubframeError {
    #[error("GPS parity check failed")]
    BadParity,
    #[error("payload too short for a 10-word subframe")]
    Truncated,
}

/// Errors the message dispatcher (C5) reports for a single MID. Every
/// variant is recoverable at the element or epoch level (§7); none of them
/// propagate past the message boundary.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
    #[error("payload length does not match the MID's fixed layout")]
    BadLength,
    #[error("fix reports fewer satellites than the configured minimum")]
    InsufficientSats,
    #[error("receiver-assigned satellite id is out of every known range")]
    UnknownSatellite,
}
