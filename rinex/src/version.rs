//! RINEX revision description
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The two target revisions this codec reads and writes.
pub const V210: Version = Version { major: 2, minor: 10 };
pub const V302: Version = Version { major: 3, minor: 2 };

/// Version is used to describe RINEX standard revisions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Version {
    /// Version major number
    pub major: u8,
    /// Version minor number
    pub minor: u8,
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ParsingError {
    #[error("non supported version \"{0}\"")]
    NotSupported(String),
    #[error("failed to parse version")]
    ParseIntError,
}

impl Default for Version {
    fn default() -> Self {
        V302
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.major, self.minor)
    }
}

impl std::str::FromStr for Version {
    type Err = ParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (major, minor) = if let Some((maj, min)) = s.split_once('.') {
            let major = maj
                .trim()
                .parse::<u8>()
                .map_err(|_| ParsingError::ParseIntError)?;
            let minor = min
                .trim()
                .parse::<u8>()
                .map_err(|_| ParsingError::ParseIntError)?;
            (major, minor)
        } else {
            (
                s.parse::<u8>().map_err(|_| ParsingError::ParseIntError)?,
                0,
            )
        };
        Ok(Self { major, minor })
    }
}

impl Version {
    pub fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    /// True if this is one of the two revisions this codec knows how to emit.
    pub fn is_supported(&self) -> bool {
        *self == V210 || *self == V302
    }

    /// Rounds an arbitrary parsed version onto the nearest of the two
    /// concrete target revisions the writer knows how to emit.
    pub fn promote(&self) -> Version {
        if self.major < 3 {
            V210
        } else {
            V302
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn parses_major_minor() {
        let v = Version::from_str("3.02").unwrap();
        assert_eq!(v, V302);
        let v = Version::from_str("2.10").unwrap();
        assert_eq!(v, V210);
    }

    #[test]
    fn rejects_garbage() {
        assert!(Version::from_str("a.b").is_err());
    }

    #[test]
    fn promotes_to_nearest_target() {
        assert_eq!(Version::new(2, 11).promote(), V210);
        assert_eq!(Version::new(3, 0).promote(), V302);
        assert_eq!(Version::new(4, 0).promote(), V302);
    }

    #[test]
    fn display_pads_minor() {
        assert_eq!(V210.to_string(), "2.10");
    }
}
