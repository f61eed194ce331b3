//! ASIC generation identifiers.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// ASIC generation a device belongs to.
///
/// Memory geometry and address bit layouts are fixed per generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChipFamily {
    /// First generation RMT pipeline.
    #[default]
    Tofino,
    /// Second generation.
    Tofino2,
    /// Third generation.
    Tofino3,
}

impl ChipFamily {
    /// Returns the generation number (1-based).
    pub const fn generation(&self) -> u8 {
        match self {
            ChipFamily::Tofino => 1,
            ChipFamily::Tofino2 => 2,
            ChipFamily::Tofino3 => 3,
        }
    }
}

impl fmt::Display for ChipFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChipFamily::Tofino => "tofino",
            ChipFamily::Tofino2 => "tofino2",
            ChipFamily::Tofino3 => "tofino3",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ChipFamily {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tofino" | "tofino1" | "tf1" => Ok(ChipFamily::Tofino),
            "tofino2" | "tf2" => Ok(ChipFamily::Tofino2),
            "tofino3" | "tf3" => Ok(ChipFamily::Tofino3),
            _ => Err(ParseError::InvalidChipFamily(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse() {
        assert_eq!("tofino".parse::<ChipFamily>().unwrap(), ChipFamily::Tofino);
        assert_eq!("TF2".parse::<ChipFamily>().unwrap(), ChipFamily::Tofino2);
        assert!("trident".parse::<ChipFamily>().is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        for chip in [ChipFamily::Tofino, ChipFamily::Tofino2, ChipFamily::Tofino3] {
            assert_eq!(chip.to_string().parse::<ChipFamily>().unwrap(), chip);
        }
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&ChipFamily::Tofino2).unwrap();
        assert_eq!(json, "\"tofino2\"");
    }
}
