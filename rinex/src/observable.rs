//! Observable-type codes (`C1C`, `L1C`, `D1C`, `S1C`, ...)
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParsingError {
    #[error("observable code too short")]
    TooShort,
    #[error("unknown observable kind \"{0}\"")]
    UnknownKind(char),
}

/// Physical quantity an [Observable] represents, used to pick the scaling
/// applied at save time (§6: `C1C *= 1`, `L1C *= f_L1/c`, `D1C *= f_L1/c`,
/// `S1C` unchanged) and to translate V2 one/two-letter codes into the V3
/// three-letter form.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Kind {
    PseudoRange,
    Phase,
    Doppler,
    SignalStrength,
}

/// A V3-style three letter observable code: quantity, RINEX frequency band
/// and tracking-channel letter (e.g. `C1C`, `L1C`, `D1C`, `S1C`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Observable(String);

impl Observable {
    pub fn new(code: &str) -> Self {
        Self(code.to_string())
    }

    pub fn kind(&self) -> Option<Kind> {
        match self.0.chars().next() {
            Some('C') | Some('P') => Some(Kind::PseudoRange),
            Some('L') => Some(Kind::Phase),
            Some('D') => Some(Kind::Doppler),
            Some('S') => Some(Kind::SignalStrength),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Translates a V3 observable into its V2 code, in the context of the
    /// given [Constellation] letter (the V2 `P1`/`P2` codes are only legal
    /// in a GPS context per §4.6).
    pub fn to_v2(&self) -> Option<&'static str> {
        match self.0.as_str() {
            "L1C" => Some("L1"),
            "L2P" => Some("L2"),
            "C1C" => Some("C1"),
            "C1P" => Some("P1"),
            "C2P" => Some("P2"),
            "D1C" => Some("D1"),
            "D2P" => Some("D2"),
            "S1C" => Some("S1"),
            "S2P" => Some("S2"),
            _ => None,
        }
    }

    /// Translates a V2 observable code back into its V3 form.
    pub fn from_v2(code: &str) -> Option<Self> {
        let v3 = match code {
            "L1" => "L1C",
            "L2" => "L2P",
            "C1" => "C1C",
            "P1" => "C1P",
            "P2" => "C2P",
            "D1" => "D1C",
            "D2" => "D2P",
            "S1" => "S1C",
            "S2" => "S2P",
            _ => return None,
        };
        Some(Self::new(v3))
    }
}

impl std::fmt::Display for Observable {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Observable {
    type Err = ParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParsingError::TooShort);
        }
        let c = s.chars().next().unwrap();
        if !matches!(c, 'C' | 'P' | 'L' | 'D' | 'S') {
            return Err(ParsingError::UnknownKind(c));
        }
        Ok(Self(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn v2_v3_roundtrip_table() {
        let pairs = [
            ("L1", "L1C"),
            ("L2", "L2P"),
            ("C1", "C1C"),
            ("P1", "C1P"),
            ("P2", "C2P"),
            ("D1", "D1C"),
            ("D2", "D2P"),
            ("S1", "S1C"),
            ("S2", "S2P"),
        ];
        for (v2, v3) in pairs {
            let from_v2 = Observable::from_v2(v2).unwrap();
            assert_eq!(from_v2.as_str(), v3);
            assert_eq!(from_v2.to_v2().unwrap(), v2);
        }
    }

    #[test]
    fn kind_classification() {
        assert_eq!(Observable::from_str("C1C").unwrap().kind(), Some(Kind::PseudoRange));
        assert_eq!(Observable::from_str("L1C").unwrap().kind(), Some(Kind::Phase));
        assert_eq!(Observable::from_str("D1C").unwrap().kind(), Some(Kind::Doppler));
        assert_eq!(Observable::from_str("S1C").unwrap().kind(), Some(Kind::SignalStrength));
    }

    #[test]
    fn unknown_kind_rejected() {
        assert!(Observable::from_str("X1C").is_err());
    }
}
