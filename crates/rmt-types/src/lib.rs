//! Common types shared by the RMT pipeline driver crates.
//!
//! This crate provides type-safe representations of the identifiers that
//! flow between the geometry registry and the table key layer:
//!
//! - [`ChipFamily`]: ASIC generation a device belongs to
//! - [`DevPort`]: device port number (pipe + pipe-local port)
//! - [`PortHandle`]: front-panel connector/channel pair
//! - [`FrontPanelIndex`]: chassis front-panel port index

mod chip;
mod port;

pub use chip::ChipFamily;
pub use port::{DevPort, FrontPanelIndex, PortHandle};

/// Common error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid chip family: {0}")]
    InvalidChipFamily(String),

    #[error("invalid device port: {0}")]
    InvalidDevPort(String),

    #[error("invalid port handle: {0} (expected <conn>/<chnl>)")]
    InvalidPortHandle(String),

    #[error("invalid front-panel index: {0}")]
    InvalidFrontPanelIndex(String),
}
