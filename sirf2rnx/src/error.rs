//! Top-level error type and the §7 exit-code mapping
use thiserror::Error;

/// Every failure mode the driver can report, each carrying its own exit
/// code per the CLI contract.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot open input stream: {0}")]
    CannotOpenInput(#[source] std::io::Error),
    #[error("cannot create output file: {0}")]
    CannotCreateOutput(#[source] std::io::Error),
    #[error("no epochs were decoded from the input stream")]
    NoEpochs,
    #[error("the selection filter rejected every decoded record")]
    FilterRejectedAll,
    #[error("epoch-level decode errors dominated the conversion")]
    EpochErrorsDominated,
    #[error("failed to write output: {0}")]
    OutputWrite(#[from] rinex::error::FormattingError),
    #[error("internal consistency failure: {0}")]
    Internal(String),
}

impl Error {
    /// Maps this error onto the exit-code space: `0` success is returned
    /// directly by `main`, never constructed here.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CannotOpenInput(_) => 2,
            Self::CannotCreateOutput(_) | Self::NoEpochs => 3,
            Self::FilterRejectedAll => 4,
            Self::EpochErrorsDominated => 5,
            Self::OutputWrite(_) => 6,
            Self::Internal(_) => 7,
        }
    }
}
