//! Port identifier types used as table keys.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Device port number.
///
/// A device port packs the pipe index above a 7-bit pipe-local port:
///
/// ```text
///  8     7 6             0
/// ┌───────┬───────────────┐
/// │ pipe  │  local port   │
/// └───────┴───────────────┘
/// ```
///
/// # Examples
///
/// ```
/// use rmt_types::DevPort;
///
/// let port = DevPort::new(1, 4).unwrap();
/// assert_eq!(port.as_u32(), 132);
/// assert_eq!(port.pipe(), 1);
/// assert_eq!(port.local_port(), 4);
///
/// // The pipe field is only two bits wide
/// assert!(DevPort::new(4, 0).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(from = "u32", into = "u32")]
pub struct DevPort(u32);

impl DevPort {
    /// Number of bits holding the pipe-local port.
    pub const LOCAL_PORT_BITS: u32 = 7;

    /// Number of bits holding the pipe index.
    pub const PIPE_BITS: u32 = 2;

    /// Mask selecting the pipe-local port.
    pub const LOCAL_PORT_MASK: u32 = (1 << Self::LOCAL_PORT_BITS) - 1;

    /// Creates a device port from a pipe index and a pipe-local port.
    ///
    /// # Errors
    ///
    /// Returns an error if either component does not fit its bit field.
    pub fn new(pipe: u32, local_port: u32) -> Result<Self, ParseError> {
        if pipe >= (1 << Self::PIPE_BITS) || local_port > Self::LOCAL_PORT_MASK {
            return Err(ParseError::InvalidDevPort(format!(
                "pipe {} port {}",
                pipe, local_port
            )));
        }
        Ok(DevPort((pipe << Self::LOCAL_PORT_BITS) | local_port))
    }

    /// Wraps a raw device port number as stored in a table key.
    pub const fn from_raw(raw: u32) -> Self {
        DevPort(raw)
    }

    /// Returns the raw device port number.
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    /// Returns the pipe index.
    pub const fn pipe(&self) -> u32 {
        self.0 >> Self::LOCAL_PORT_BITS
    }

    /// Returns the pipe-local port.
    pub const fn local_port(&self) -> u32 {
        self.0 & Self::LOCAL_PORT_MASK
    }
}

impl fmt::Display for DevPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DevPort {
    type Err = ParseError;

    /// Accepts either a raw number ("132") or "pipe/port" ("1/4").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidDevPort(s.to_string());
        match s.split_once('/') {
            Some((pipe, port)) => {
                let pipe = pipe.trim().parse().map_err(|_| invalid())?;
                let port = port.trim().parse().map_err(|_| invalid())?;
                DevPort::new(pipe, port)
            }
            None => s.trim().parse().map(DevPort).map_err(|_| invalid()),
        }
    }
}

impl From<u32> for DevPort {
    fn from(raw: u32) -> Self {
        DevPort(raw)
    }
}

impl From<DevPort> for u32 {
    fn from(port: DevPort) -> u32 {
        port.0
    }
}

/// Front-panel port handle: connector id plus channel id.
///
/// Written as `<conn>/<chnl>`, e.g. `"3/0"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct PortHandle {
    /// Front-panel connector id.
    pub conn_id: u32,
    /// Channel within the connector.
    pub chnl_id: u32,
}

impl PortHandle {
    /// Creates a new port handle.
    pub const fn new(conn_id: u32, chnl_id: u32) -> Self {
        Self { conn_id, chnl_id }
    }
}

impl fmt::Display for PortHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.conn_id, self.chnl_id)
    }
}

impl FromStr for PortHandle {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidPortHandle(s.to_string());
        let (conn, chnl) = s.split_once('/').ok_or_else(invalid)?;
        Ok(PortHandle {
            conn_id: conn.trim().parse().map_err(|_| invalid())?,
            chnl_id: chnl.trim().parse().map_err(|_| invalid())?,
        })
    }
}

/// Physical port index as printed on the chassis.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(from = "u32", into = "u32")]
pub struct FrontPanelIndex(u32);

impl FrontPanelIndex {
    /// Creates a front-panel index.
    pub const fn new(index: u32) -> Self {
        FrontPanelIndex(index)
    }

    /// Returns the index as a u32.
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for FrontPanelIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FrontPanelIndex {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse()
            .map(FrontPanelIndex)
            .map_err(|_| ParseError::InvalidFrontPanelIndex(s.to_string()))
    }
}

impl From<u32> for FrontPanelIndex {
    fn from(index: u32) -> Self {
        FrontPanelIndex(index)
    }
}

impl From<FrontPanelIndex> for u32 {
    fn from(index: FrontPanelIndex) -> u32 {
        index.0
    }
}
