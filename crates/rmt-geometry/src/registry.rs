//! Geometry lookup by chip family.

use crate::device::DeviceGeometry;
use crate::error::{GeometryError, GeometryResult};
use rmt_types::ChipFamily;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Read-only set of geometry records keyed by chip family.
///
/// The registry is an explicitly constructed value; callers hand it (or a
/// record fetched from it) to whatever needs geometry. Records are shared
/// through `Arc` so every pipe and table of a device sees the same value.
#[derive(Debug, Clone, Default)]
pub struct GeometryRegistry {
    entries: HashMap<ChipFamily, Arc<DeviceGeometry>>,
}

impl GeometryRegistry {
    /// Builds a registry from the given records.
    ///
    /// Every record is validated; a later record for the same family
    /// replaces an earlier one.
    pub fn new(geometries: impl IntoIterator<Item = DeviceGeometry>) -> GeometryResult<Self> {
        let mut entries = HashMap::new();
        for geometry in geometries {
            geometry.validate()?;
            debug!(chip = %geometry.chip, "registering device geometry");
            entries.insert(geometry.chip, Arc::new(geometry));
        }
        Ok(Self { entries })
    }

    /// Registry holding every built-in geometry.
    pub fn builtin() -> GeometryResult<Self> {
        Self::new([DeviceGeometry::tofino()])
    }

    /// Returns the geometry of `chip`.
    pub fn get(&self, chip: ChipFamily) -> GeometryResult<Arc<DeviceGeometry>> {
        self.entries
            .get(&chip)
            .cloned()
            .ok_or(GeometryError::UnsupportedFamily(chip))
    }

    /// Returns true if a geometry is registered for `chip`.
    pub fn contains(&self, chip: ChipFamily) -> bool {
        self.entries.contains_key(&chip)
    }

    /// Number of registered generations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
