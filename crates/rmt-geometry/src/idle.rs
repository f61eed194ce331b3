//! Idle-timeout counter bounds.

use crate::error::{GeometryError, GeometryResult};
use crate::layout::AddressKind;
use serde::{Deserialize, Serialize};

/// Range of counter bits the idle-timeout sweep can be driven from.
///
/// A counter bit `b` yields a sweep period of `2^b` clocks. The lowest
/// usable bit is `min_counter_bit`; up to `max_counter_width` further bits
/// may be selected above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdleTimeGeometry {
    /// Lowest selectable counter bit.
    pub min_counter_bit: u32,
    /// Number of selectable bits above the minimum.
    pub max_counter_width: u32,
}

impl IdleTimeGeometry {
    /// Highest selectable counter bit.
    pub const fn max_counter_bit(&self) -> u32 {
        self.min_counter_bit.saturating_add(self.max_counter_width)
    }

    /// Shortest and longest sweep period in clocks. Saturates at
    /// `u64::MAX` for bounds that fail [`validate`](Self::validate).
    pub const fn counter_period_range(&self) -> (u64, u64) {
        (period(self.min_counter_bit), period(self.max_counter_bit()))
    }

    /// Accepts `bit` if it lies within `min_counter_bit..=max_counter_bit`.
    pub fn check_counter_bit(&self, bit: u32) -> GeometryResult<u32> {
        if bit < self.min_counter_bit || bit > self.max_counter_bit() {
            return Err(GeometryError::out_of_range(
                AddressKind::IdleTimeout,
                "counter_bit",
                bit.into(),
                self.max_counter_bit().into(),
            ));
        }
        Ok(bit)
    }

    /// Smallest counter bit whose period covers `clocks`.
    ///
    /// # Errors
    ///
    /// Returns a range error if no selectable bit is long enough.
    pub fn counter_bit_for_period(&self, clocks: u64) -> GeometryResult<u32> {
        let needed = if clocks <= 1 {
            0
        } else {
            u64::BITS - (clocks - 1).leading_zeros()
        };
        self.check_counter_bit(needed.max(self.min_counter_bit))
    }

    pub(crate) fn validate(&self) -> GeometryResult<()> {
        if self.min_counter_bit.checked_add(self.max_counter_width).is_none() {
            return Err(GeometryError::invalid(format!(
                "idle counter bounds {}+{} overflow",
                self.min_counter_bit, self.max_counter_width
            )));
        }
        if self.max_counter_bit() >= u64::BITS {
            return Err(GeometryError::invalid(format!(
                "idle counter bit {} does not fit in 64 bits",
                self.max_counter_bit()
            )));
        }
        Ok(())
    }
}

const fn period(bit: u32) -> u64 {
    match 1u64.checked_shl(bit) {
        Some(clocks) => clocks,
        None => u64::MAX,
    }
}
