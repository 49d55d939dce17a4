//! Crate-wide error aggregation
use thiserror::Error;

use crate::{constellation, epoch, observable, sv, types, version};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParsingError {
    #[error("no such header label \"{0}\"")]
    NoLabel(String),
    #[error("label \"{0}\" does not match declared file version")]
    DoesNotMatch(String),
    #[error("unsupported rinex version")]
    UnsupportedVersion,
    #[error("bad epoch flag")]
    BadFlag,
    #[error("bad epoch")]
    BadEpoch,
    #[error("bad observation")]
    BadObs,
    #[error("site event missing marker name")]
    SiteEventMissingMarker,
    #[error("special record error")]
    SpecialRecordError,
    #[error("external event missing date")]
    ExternalEventMissingDate,
    #[error("unparseable float \"{0}\"")]
    ParseFloatError(String),
    #[error("unparseable integer \"{0}\"")]
    ParseIntError(String),
    #[error(transparent)]
    Version(#[from] version::ParsingError),
    #[error(transparent)]
    Constellation(#[from] constellation::ParsingError),
    #[error(transparent)]
    Sv(#[from] sv::ParsingError),
    #[error(transparent)]
    Observable(#[from] observable::ParsingError),
    #[error(transparent)]
    Epoch(#[from] epoch::ParsingError),
    #[error(transparent)]
    Type(#[from] types::ParsingError),
    #[error(transparent)]
    Io(#[from] std::sync::Arc<std::io::Error>),
}

impl From<std::io::Error> for ParsingError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(std::sync::Arc::new(e))
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormattingError {
    #[error("target version is not defined")]
    UndefinedVersion,
    #[error("header is missing a declared system/observable list")]
    MissingObservables,
    #[error(transparent)]
    Io(#[from] std::sync::Arc<std::io::Error>),
}

impl From<std::io::Error> for FormattingError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(std::sync::Arc::new(e))
    }
}
