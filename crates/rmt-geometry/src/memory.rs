//! On-chip memory arrays and their unit dimensions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// On-chip memory array kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryKind {
    /// Exact-match SRAM.
    ExactMatch,
    /// Ternary CAM.
    Tcam,
    /// Map RAM.
    MapRam,
    /// Statistics RAM.
    Stats,
    /// Meter RAM.
    Meter,
    /// Selector RAM.
    Selector,
    /// Idle-timeout RAM.
    IdleTimeout,
    /// Action-data RAM.
    ActionData,
    /// Phase-0 RAM.
    Phase0,
}

impl MemoryKind {
    /// All memory kinds, in declaration order.
    pub const ALL: [MemoryKind; 9] = [
        MemoryKind::ExactMatch,
        MemoryKind::Tcam,
        MemoryKind::MapRam,
        MemoryKind::Stats,
        MemoryKind::Meter,
        MemoryKind::Selector,
        MemoryKind::IdleTimeout,
        MemoryKind::ActionData,
        MemoryKind::Phase0,
    ];

    /// Returns true if the array is built from SRAM units.
    pub const fn is_sram(&self) -> bool {
        matches!(
            self,
            MemoryKind::ExactMatch
                | MemoryKind::Stats
                | MemoryKind::Meter
                | MemoryKind::Selector
                | MemoryKind::ActionData
        )
    }

    /// Returns the human-readable name for this memory kind.
    pub const fn name(&self) -> &'static str {
        match self {
            MemoryKind::ExactMatch => "exact_match",
            MemoryKind::Tcam => "tcam",
            MemoryKind::MapRam => "map_ram",
            MemoryKind::Stats => "stats",
            MemoryKind::Meter => "meter",
            MemoryKind::Selector => "selector",
            MemoryKind::IdleTimeout => "idle_timeout",
            MemoryKind::ActionData => "action_data",
            MemoryKind::Phase0 => "phase0",
        }
    }
}

impl fmt::Display for MemoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Dimensions of one physical memory unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemUnit {
    /// Word width in bits.
    pub width_bits: u32,
    /// Number of words.
    pub depth: u32,
}

impl MemUnit {
    /// Creates a unit description.
    pub const fn new(width_bits: u32, depth: u32) -> Self {
        Self { width_bits, depth }
    }

    /// Total capacity of the unit in bits.
    pub const fn total_bits(&self) -> u64 {
        self.width_bits as u64 * self.depth as u64
    }

    /// Number of address bits needed to select a word.
    pub const fn line_bits(&self) -> u32 {
        if self.depth <= 1 {
            0
        } else {
            u32::BITS - (self.depth - 1).leading_zeros()
        }
    }
}

/// Unit dimensions of the physical memories backing each array kind.
///
/// Stats, meter, selector, action-data and exact-match arrays are all carved
/// out of SRAM units; idle-timeout state lives in map RAM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemUnits {
    /// SRAM unit.
    pub sram: MemUnit,
    /// TCAM unit.
    pub tcam: MemUnit,
    /// Map RAM unit.
    pub map_ram: MemUnit,
    /// Phase-0 RAM unit.
    pub phase0: MemUnit,
}

impl MemUnits {
    /// Returns the unit backing `kind`.
    pub const fn unit(&self, kind: MemoryKind) -> MemUnit {
        match kind {
            MemoryKind::ExactMatch
            | MemoryKind::Stats
            | MemoryKind::Meter
            | MemoryKind::Selector
            | MemoryKind::ActionData => self.sram,
            MemoryKind::Tcam => self.tcam,
            MemoryKind::MapRam | MemoryKind::IdleTimeout => self.map_ram,
            MemoryKind::Phase0 => self.phase0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_line_bits() {
        assert_eq!(MemUnit::new(128, 1024).line_bits(), 10);
        assert_eq!(MemUnit::new(44, 512).line_bits(), 9);
        assert_eq!(MemUnit::new(32, 1).line_bits(), 0);
        assert_eq!(MemUnit::new(11, 1000).line_bits(), 10);
    }

    #[test]
    fn test_total_bits() {
        assert_eq!(MemUnit::new(128, 1024).total_bits(), 131_072);
    }

    #[test]
    fn test_sram_classification() {
        assert!(MemoryKind::Stats.is_sram());
        assert!(MemoryKind::ExactMatch.is_sram());
        assert!(!MemoryKind::Tcam.is_sram());
        assert!(!MemoryKind::IdleTimeout.is_sram());
    }

    #[test]
    fn test_unit_mapping() {
        let units = MemUnits {
            sram: MemUnit::new(128, 1024),
            tcam: MemUnit::new(44, 512),
            map_ram: MemUnit::new(11, 1024),
            phase0: MemUnit::new(32, 1),
        };
        assert_eq!(units.unit(MemoryKind::Meter), units.sram);
        assert_eq!(units.unit(MemoryKind::IdleTimeout), units.map_ram);
        assert_eq!(units.unit(MemoryKind::Phase0).depth, 1);
    }
}
