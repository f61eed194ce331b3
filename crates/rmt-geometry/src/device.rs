//! Per-generation device geometry record.

use crate::error::{GeometryError, GeometryResult};
use crate::idle::IdleTimeGeometry;
use crate::layout::{AddressFields, AddressKind, AddressLayout, SelectorAddress, VirtualLocation};
use crate::memory::{MemUnit, MemUnits, MemoryKind};
use crate::tofino;
use rmt_types::{ChipFamily, DevPort};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Parser memory depths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserGeometry {
    /// Parser TCAM/RAM depth.
    pub depth: u32,
    /// Parser init RAM depth.
    pub init_ram_depth: u32,
    /// Checksum engine depth.
    pub csum_depth: u32,
    /// Parser register depth.
    pub reg_depth: u32,
}

/// Port numbering bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortGeometry {
    /// Local ports per pipe.
    pub ports_per_pipe: u32,
    /// Channels per port.
    pub channels_per_port: u32,
}

impl PortGeometry {
    /// Accepts `port` if its pipe-local part is a valid port.
    pub fn check_dev_port(&self, port: DevPort) -> GeometryResult<DevPort> {
        if port.local_port() >= self.ports_per_pipe {
            return Err(GeometryError::invalid(format!(
                "dev port {} local port {} exceeds {} ports per pipe",
                port,
                port.local_port(),
                self.ports_per_pipe
            )));
        }
        Ok(port)
    }

    /// Accepts `channel` if it is below `channels_per_port`.
    pub fn check_channel(&self, channel: u32) -> GeometryResult<u32> {
        if channel >= self.channels_per_port {
            return Err(GeometryError::invalid(format!(
                "channel {} exceeds {} channels per port",
                channel, self.channels_per_port
            )));
        }
        Ok(channel)
    }
}

/// Immutable geometry record of one chip generation.
///
/// Built once when a device attaches and shared by reference with every
/// pipe and table on that device. All methods are pure.
///
/// # Example
///
/// ```
/// use rmt_geometry::{AddressKind, DeviceGeometry, VirtualLocation};
///
/// let geometry = DeviceGeometry::tofino();
/// let addr = geometry
///     .encode_address(AddressKind::Stats, VirtualLocation::new(5, 2))
///     .unwrap();
/// assert_eq!(addr, (5 << 13) | 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceGeometry {
    /// Chip generation.
    pub chip: ChipFamily,
    /// Physical unit dimensions.
    pub units: MemUnits,
    /// Number of TCAM rows.
    pub tcam_rows: u32,
    /// Widest action data entry in bytes.
    pub max_action_data_bytes: u32,
    /// Statistics address layout.
    pub stats: AddressLayout,
    /// Meter address layout.
    pub meter: AddressLayout,
    /// Selector address layout.
    pub selector: AddressLayout,
    /// Idle-timeout address layout.
    pub idle: AddressLayout,
    /// Exact-match address layout.
    pub exm: AddressLayout,
    /// Action-data address layout.
    pub adt: AddressLayout,
    /// Idle-timeout counter bounds.
    pub idle_time: IdleTimeGeometry,
    /// Parser depths.
    pub parser: ParserGeometry,
    /// Port numbering bounds.
    pub ports: PortGeometry,
}

impl DeviceGeometry {
    /// The Tofino geometry.
    pub fn tofino() -> Self {
        tofino::geometry()
    }

    /// Returns the built-in geometry for `chip`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::UnsupportedFamily`] for generations without
    /// built-in constants; load those with [`from_json`](Self::from_json).
    pub fn for_family(chip: ChipFamily) -> GeometryResult<Self> {
        match chip {
            ChipFamily::Tofino => Ok(Self::tofino()),
            other => Err(GeometryError::UnsupportedFamily(other)),
        }
    }

    /// Parses and validates a geometry record.
    pub fn from_json(json: &str) -> GeometryResult<Self> {
        let geometry: DeviceGeometry = serde_json::from_str(json)?;
        geometry.validate()?;
        Ok(geometry)
    }

    /// Serializes the record to pretty-printed JSON.
    pub fn to_json(&self) -> GeometryResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks internal consistency of every layout and unit.
    pub fn validate(&self) -> GeometryResult<()> {
        for kind in MemoryKind::ALL {
            let unit = self.unit(kind);
            if unit.width_bits == 0 || unit.depth == 0 {
                return Err(GeometryError::invalid(format!(
                    "{} unit {}x{} is empty",
                    kind, unit.width_bits, unit.depth
                )));
            }
        }
        for kind in AddressKind::ALL {
            let layout = self.layout(kind);
            if layout.kind != kind {
                return Err(GeometryError::invalid(format!(
                    "{} slot holds a {} layout",
                    kind, layout.kind
                )));
            }
            layout.validate()?;
        }
        self.idle_time.validate()?;
        debug!(chip = %self.chip, "device geometry validated");
        Ok(())
    }

    /// Unit dimensions backing `kind`.
    pub fn unit(&self, kind: MemoryKind) -> MemUnit {
        self.units.unit(kind)
    }

    /// Address layout of `kind`.
    pub fn layout(&self, kind: AddressKind) -> &AddressLayout {
        match kind {
            AddressKind::Stats => &self.stats,
            AddressKind::Meter => &self.meter,
            AddressKind::Selector => &self.selector,
            AddressKind::IdleTimeout => &self.idle,
            AddressKind::ExactMatch => &self.exm,
            AddressKind::ActionData => &self.adt,
        }
    }

    /// Packs a location into a `kind` virtual address.
    pub fn encode_address(&self, kind: AddressKind, location: VirtualLocation) -> GeometryResult<u32> {
        self.layout(kind).encode(location)
    }

    /// Recovers the location from a `kind` virtual address.
    pub fn decode_address(&self, kind: AddressKind, addr: u32) -> GeometryResult<VirtualLocation> {
        self.layout(kind).decode(addr)
    }

    /// Packs a meter address including PFE and meter type.
    pub fn encode_meter(&self, fields: &AddressFields) -> GeometryResult<u32> {
        self.meter.encode_fields(fields)
    }

    /// Unpacks a meter address.
    pub fn decode_meter(&self, addr: u32) -> GeometryResult<AddressFields> {
        self.meter.decode_fields(addr)
    }

    /// Packs an action-data address, optionally setting the PFE bit.
    pub fn encode_action(&self, location: VirtualLocation, pfe: bool) -> GeometryResult<u32> {
        self.adt
            .encode_fields(&AddressFields::new(location).with_pfe(pfe))
    }

    /// Unpacks an action-data address into its location and PFE bit.
    pub fn decode_action(&self, addr: u32) -> GeometryResult<(VirtualLocation, bool)> {
        let fields = self.adt.decode_fields(addr)?;
        Ok((fields.location, fields.pfe))
    }

    /// Packs a selector address with its huffman overhead.
    pub fn encode_selector(
        &self,
        location: VirtualLocation,
        huffman: u8,
    ) -> GeometryResult<SelectorAddress> {
        self.selector.encode_selector(location, huffman)
    }

    /// Unpacks a selector address.
    pub fn decode_selector(&self, sel: SelectorAddress) -> GeometryResult<(VirtualLocation, u8)> {
        self.selector.decode_selector(sel)
    }
}
