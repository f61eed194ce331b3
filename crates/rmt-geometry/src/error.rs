//! Error types for geometry lookups and address packing.

use crate::AddressKind;
use rmt_types::ChipFamily;
use thiserror::Error;

/// Result type alias for geometry operations.
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Errors raised by the geometry registry.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// A value does not fit the bit field it is packed into.
    #[error("{kind} address field '{field}' value {value} out of range (max {max})")]
    OutOfRange {
        /// Address kind being packed.
        kind: AddressKind,
        /// Field name (vpn, line, subword, ...).
        field: &'static str,
        /// Offending value.
        value: u64,
        /// Largest accepted value.
        max: u64,
    },

    /// The layout has no such field (e.g. a PFE bit on statistics addresses).
    #[error("{kind} addresses have no '{field}' field")]
    NoSuchField {
        /// Address kind being packed.
        kind: AddressKind,
        /// Field name.
        field: &'static str,
    },

    /// Two bit fields of one layout overlap.
    #[error("{kind} address layout: '{first}' overlaps '{second}'")]
    Overlap {
        /// Address kind of the broken layout.
        kind: AddressKind,
        /// First field name.
        first: &'static str,
        /// Second field name.
        second: &'static str,
    },

    /// Layout fields exceed the declared address width.
    #[error("{kind} address layout: field '{field}' ends at bit {end}, address is {addr_bits} bits")]
    TooWide {
        /// Address kind of the broken layout.
        kind: AddressKind,
        /// Field name.
        field: &'static str,
        /// One past the highest bit used by the field.
        end: u32,
        /// Declared address width.
        addr_bits: u32,
    },

    /// No geometry is known for the requested chip family.
    #[error("no geometry registered for chip family {0}")]
    UnsupportedFamily(ChipFamily),

    /// Geometry record failed a consistency check.
    #[error("invalid geometry: {message}")]
    Invalid {
        /// Error message.
        message: String,
    },

    /// Geometry record could not be parsed.
    #[error("failed to parse geometry: {source}")]
    Config {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}

impl GeometryError {
    /// Creates an out-of-range error.
    pub fn out_of_range(kind: AddressKind, field: &'static str, value: u64, max: u64) -> Self {
        Self::OutOfRange {
            kind,
            field,
            value,
            max,
        }
    }

    /// Creates an invalid geometry error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Returns true if this error rejects a caller supplied value rather
    /// than a broken geometry record.
    pub fn is_range_error(&self) -> bool {
        matches!(
            self,
            GeometryError::OutOfRange { .. } | GeometryError::NoSuchField { .. }
        )
    }
}
