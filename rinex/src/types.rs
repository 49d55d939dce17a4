//! RINEX file role
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParsingError {
    #[error("unknown rinex file type \"{0}\"")]
    Unknown(String),
}

/// The two file roles this codec reads and writes; each header label is
/// obligatory/optional/not-applicable with respect to one of these.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Type {
    ObservationData,
    NavigationData,
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::ObservationData => write!(f, "OBSERVATION DATA"),
            Self::NavigationData => write!(f, "NAVIGATION DATA"),
        }
    }
}

impl std::str::FromStr for Type {
    type Err = ParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with("OBSERVATION") {
            Ok(Self::ObservationData)
        } else if s.starts_with("NAVIGATION") {
            Ok(Self::NavigationData)
        } else {
            Err(ParsingError::Unknown(s.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn roundtrip() {
        for t in [Type::ObservationData, Type::NavigationData] {
            assert_eq!(Type::from_str(&t.to_string()).unwrap(), t);
        }
    }
}
