//! Memory geometry and virtual address layouts for RMT pipeline ASICs.
//!
//! The ASIC exposes several independent on-chip memory arrays, each with its
//! own word width, depth and virtual addressing scheme. This crate describes
//! them per chip generation and packs/unpacks the virtual addresses the
//! hardware expects:
//!
//! - [`DeviceGeometry`]: immutable per-generation record
//! - [`GeometryRegistry`]: explicit lookup of records by [`ChipFamily`]
//! - [`AddressLayout`]: bit layout of one address kind, with `encode`/`decode`
//! - [`tofino`]: Tofino constants
//!
//! Everything here is a pure function of its inputs; records are never
//! mutated after construction and may be shared freely across threads.
//!
//! # Example
//!
//! ```
//! use rmt_geometry::{AddressFields, DeviceGeometry, VirtualLocation};
//!
//! let geometry = DeviceGeometry::tofino();
//! let fields = AddressFields::new(VirtualLocation::new(3, 0))
//!     .with_pfe(true)
//!     .with_type(0b101);
//! let addr = geometry.encode_meter(&fields).unwrap();
//! assert_eq!(geometry.decode_meter(addr).unwrap(), fields);
//! assert!(geometry.meter.is_selector_type(0b101));
//! ```

mod device;
mod error;
mod idle;
mod layout;
mod memory;
mod registry;
pub mod tofino;

pub use device::{DeviceGeometry, ParserGeometry, PortGeometry};
pub use error::{GeometryError, GeometryResult};
pub use idle::IdleTimeGeometry;
pub use layout::{
    AddressFields, AddressKind, AddressLayout, BitField, SelectorAddress, VirtualLocation,
};
pub use memory::{MemUnit, MemUnits, MemoryKind};
pub use registry::GeometryRegistry;

pub use rmt_types::ChipFamily;
