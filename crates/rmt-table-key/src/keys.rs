//! Key objects for the fixed port tables.
//!
//! Each key type wraps a [`KeyEngine`] configured by a static layout and
//! adds typed accessors for its fields. The uniform get/set surface is
//! provided by the [`TableKey`], [`FixedWidthKey`] and [`FieldKey`] traits.

use crate::engine::{FieldBinding, KeyEngine, KeyLayout, SlotDef, SlotKind};
use crate::error::KeyResult;
use crate::schema::{self, FieldId, KeyFieldInfo, TableInfo};
use crate::value::KeyFieldValue;
use crate::wire::U32_WIRE_BYTES;
use rmt_types::{DevPort, FrontPanelIndex, PortHandle};

/// Uniform get/set contract of every table key.
pub trait TableKey {
    /// Schema this key is validated against.
    fn table(&self) -> &TableInfo;

    /// Zeroes every field; string fields become empty.
    fn reset(&mut self);

    /// Stores a tagged value under `field_id`.
    fn set_value(&mut self, field_id: FieldId, value: &KeyFieldValue) -> KeyResult<()>;

    /// Reads `field_id` into `value`. `None` is reported as a null output.
    fn get_value(&self, field_id: FieldId, value: Option<&mut KeyFieldValue>) -> KeyResult<()>;
}

/// Keys whose fields have a fixed-width big-endian wire form.
pub trait FixedWidthKey: TableKey {
    /// Decodes `value`, which must be exactly the field width, into `field_id`.
    fn set_value_bytes(&mut self, field_id: FieldId, value: &[u8]) -> KeyResult<()>;

    /// Encodes `field_id` into `out`, which must be exactly the field width.
    fn get_value_bytes(&self, field_id: FieldId, out: &mut [u8]) -> KeyResult<()>;
}

/// Keys addressed directly by a resolved field descriptor.
pub trait FieldKey: FixedWidthKey {
    /// Stores an integer under `field`, which must be an exact field of
    /// this key's table.
    fn set_field(&mut self, field: &KeyFieldInfo, value: u64) -> KeyResult<()>;

    /// Decodes a raw big-endian buffer into `field`.
    fn set_field_bytes(&mut self, field: &KeyFieldInfo, value: &[u8]) -> KeyResult<()>;

    /// Returns the integer held for `field`.
    fn get_field(&self, field: &KeyFieldInfo) -> KeyResult<u64>;

    /// Encodes `field` into `out`, which must be exactly the field width.
    fn get_field_bytes(&self, field: &KeyFieldInfo, out: &mut [u8]) -> KeyResult<()>;
}

const U32_SLOT: SlotKind = SlotKind::Uint {
    bytes: U32_WIRE_BYTES,
};

static DEV_PORT_LAYOUT: KeyLayout = KeyLayout {
    binding: FieldBinding::Sole,
    slots: &[SlotDef {
        name: schema::DEV_PORT,
        kind: U32_SLOT,
    }],
};

static PORT_NAME_LAYOUT: KeyLayout = KeyLayout {
    binding: FieldBinding::Sole,
    slots: &[SlotDef {
        name: schema::PORT_NAME,
        kind: SlotKind::Str,
    }],
};

static PORT_HDL_LAYOUT: KeyLayout = KeyLayout {
    binding: FieldBinding::ByName,
    slots: &[
        SlotDef {
            name: schema::CONN_ID,
            kind: U32_SLOT,
        },
        SlotDef {
            name: schema::CHNL_ID,
            kind: U32_SLOT,
        },
    ],
};

static FP_IDX_LAYOUT: KeyLayout = KeyLayout {
    binding: FieldBinding::ByName,
    slots: &[SlotDef {
        name: schema::FP_IDX,
        kind: U32_SLOT,
    }],
};

/// Reads a 32-bit slot. Stored integers never exceed the 4-byte width.
fn slot_u32(engine: &KeyEngine<'_>, slot: usize) -> u32 {
    u32::try_from(engine.uint(slot)).unwrap_or(u32::MAX)
}

/// Macro to define a key type over a static layout.
macro_rules! define_table_key {
    ($(#[$meta:meta])* $name:ident, $layout:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name<'t> {
            engine: KeyEngine<'t>,
        }

        impl<'t> $name<'t> {
            /// Creates a zeroed key bound to `table`.
            ///
            /// Fails with an invalid schema error if `table` does not have
            /// the key fields this key type holds.
            pub fn new(table: &'t TableInfo) -> KeyResult<Self> {
                Ok(Self {
                    engine: KeyEngine::new(table, &$layout)?,
                })
            }
        }

        impl TableKey for $name<'_> {
            fn table(&self) -> &TableInfo {
                self.engine.table()
            }

            fn reset(&mut self) {
                self.engine.reset();
            }

            fn set_value(&mut self, field_id: FieldId, value: &KeyFieldValue) -> KeyResult<()> {
                self.engine.set_value(field_id, value)
            }

            fn get_value(
                &self,
                field_id: FieldId,
                value: Option<&mut KeyFieldValue>,
            ) -> KeyResult<()> {
                self.engine.get_value(field_id, value)
            }
        }
    };
}

macro_rules! impl_fixed_width_key {
    ($name:ident) => {
        impl FixedWidthKey for $name<'_> {
            fn set_value_bytes(&mut self, field_id: FieldId, value: &[u8]) -> KeyResult<()> {
                self.engine.set_value_bytes(field_id, value)
            }

            fn get_value_bytes(&self, field_id: FieldId, out: &mut [u8]) -> KeyResult<()> {
                self.engine.get_value_bytes(field_id, out)
            }
        }
    };
}

macro_rules! impl_field_key {
    ($name:ident) => {
        impl FieldKey for $name<'_> {
            fn set_field(&mut self, field: &KeyFieldInfo, value: u64) -> KeyResult<()> {
                self.engine.set_field(field, value)
            }

            fn set_field_bytes(&mut self, field: &KeyFieldInfo, value: &[u8]) -> KeyResult<()> {
                self.engine.set_field_bytes(field, value)
            }

            fn get_field(&self, field: &KeyFieldInfo) -> KeyResult<u64> {
                self.engine.get_field(field)
            }

            fn get_field_bytes(&self, field: &KeyFieldInfo, out: &mut [u8]) -> KeyResult<()> {
                self.engine.get_field_bytes(field, out)
            }
        }
    };
}

define_table_key!(
    /// Key of the port configuration table: one device port.
    PortCfgKey,
    DEV_PORT_LAYOUT
);
impl_fixed_width_key!(PortCfgKey);

define_table_key!(
    /// Key of the port statistics table: one device port.
    PortStatKey,
    DEV_PORT_LAYOUT
);
impl_fixed_width_key!(PortStatKey);

define_table_key!(
    /// Key of the port name lookup table.
    ///
    /// The name has no fixed-width form, so this key only exchanges values
    /// through [`KeyFieldValue`] strings.
    PortStrInfoKey,
    PORT_NAME_LAYOUT
);

define_table_key!(
    /// Key of the port handle lookup table: connector and channel ids,
    /// matched to schema fields by name.
    PortHdlInfoKey,
    PORT_HDL_LAYOUT
);
impl_fixed_width_key!(PortHdlInfoKey);
impl_field_key!(PortHdlInfoKey);

define_table_key!(
    /// Key of the front-panel index lookup table.
    PortFpIdxInfoKey,
    FP_IDX_LAYOUT
);
impl_fixed_width_key!(PortFpIdxInfoKey);
impl_field_key!(PortFpIdxInfoKey);

impl PortCfgKey<'_> {
    /// Returns the device port.
    pub fn dev_port(&self) -> DevPort {
        DevPort::from_raw(slot_u32(&self.engine, 0))
    }

    /// Sets the device port.
    pub fn set_dev_port(&mut self, dev_port: DevPort) {
        self.engine.set_uint(0, u64::from(dev_port.as_u32()));
    }
}

impl PortStatKey<'_> {
    /// Returns the device port.
    pub fn dev_port(&self) -> DevPort {
        DevPort::from_raw(slot_u32(&self.engine, 0))
    }

    /// Sets the device port.
    pub fn set_dev_port(&mut self, dev_port: DevPort) {
        self.engine.set_uint(0, u64::from(dev_port.as_u32()));
    }

    /// Returns the integer value of `field_id` after the usual field checks.
    ///
    /// # Errors
    ///
    /// Fails for an unknown id or a non-exact field, like [`TableKey::get_value`].
    pub fn get_value_u64(&self, field_id: FieldId) -> KeyResult<u64> {
        self.engine.get_value_u64(field_id)
    }
}

impl PortStrInfoKey<'_> {
    /// Returns the port name; empty after a reset.
    pub fn port_name(&self) -> &str {
        self.engine.str(0)
    }

    /// Sets the port name.
    pub fn set_port_name(&mut self, name: impl Into<String>) {
        self.engine.set_str(0, name.into());
    }
}

impl PortHdlInfoKey<'_> {
    /// Returns connector and channel ids together.
    pub fn port_hdl(&self) -> PortHandle {
        PortHandle::new(slot_u32(&self.engine, 0), slot_u32(&self.engine, 1))
    }

    /// Sets connector and channel ids together.
    pub fn set_port_hdl(&mut self, hdl: PortHandle) {
        self.engine.set_uint(0, u64::from(hdl.conn_id));
        self.engine.set_uint(1, u64::from(hdl.chnl_id));
    }
}

impl PortFpIdxInfoKey<'_> {
    /// Returns the front-panel index.
    pub fn fp_idx(&self) -> FrontPanelIndex {
        FrontPanelIndex::new(slot_u32(&self.engine, 0))
    }

    /// Sets the front-panel index.
    pub fn set_fp_idx(&mut self, fp_idx: FrontPanelIndex) {
        self.engine.set_uint(0, u64::from(fp_idx.as_u32()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KeyError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_port_cfg_typed_accessors() {
        let table = TableInfo::port_cfg();
        let mut key = PortCfgKey::new(&table).unwrap();
        key.set_dev_port(DevPort::from_raw(260));
        assert_eq!(key.dev_port(), DevPort::from_raw(260));

        let mut out = KeyFieldValue::exact_int(0);
        key.get_value(1, Some(&mut out)).unwrap();
        assert_eq!(out.as_int(), Some(260));
    }

    #[test]
    fn test_port_stat_get_value_u64() {
        let table = TableInfo::port_stat();
        let mut key = PortStatKey::new(&table).unwrap();
        key.set_value_bytes(1, &[0, 0, 0x01, 0x04]).unwrap();
        assert_eq!(key.get_value_u64(1).unwrap(), 0x104);
        assert!(matches!(
            key.get_value_u64(2),
            Err(KeyError::UnknownField { field_id: 2, .. })
        ));
    }

    #[test]
    fn test_port_name() {
        let table = TableInfo::port_str_info();
        let mut key = PortStrInfoKey::new(&table).unwrap();
        key.set_port_name("33/0");
        let mut out = KeyFieldValue::exact_str("");
        key.get_value(1, Some(&mut out)).unwrap();
        assert_eq!(out.as_str(), Some("33/0"));
    }

    #[test]
    fn test_port_hdl_accessors() {
        let table = TableInfo::port_hdl_info();
        let mut key = PortHdlInfoKey::new(&table).unwrap();
        key.set_port_hdl(PortHandle::new(12, 3));
        assert_eq!(key.port_hdl(), PortHandle::new(12, 3));

        let mut chnl = [0u8; 4];
        key.get_value_bytes(2, &mut chnl).unwrap();
        assert_eq!(chnl, [0, 0, 0, 3]);
    }

    #[test]
    fn test_fp_idx_field_key() {
        let table = TableInfo::port_fp_idx_info();
        let mut key = PortFpIdxInfoKey::new(&table).unwrap();
        let field = table.key_field(1).unwrap().clone();
        key.set_field(&field, 48).unwrap();
        assert_eq!(key.fp_idx(), FrontPanelIndex::new(48));

        let mut buf = [0u8; 4];
        key.get_field_bytes(&field, &mut buf).unwrap();
        assert_eq!(buf, [0, 0, 0, 48]);
    }

    #[test]
    fn test_wrong_table_rejected() {
        let table = TableInfo::port_cfg();
        assert!(matches!(
            PortHdlInfoKey::new(&table),
            Err(KeyError::InvalidSchema { .. })
        ));
        assert!(PortFpIdxInfoKey::new(&table).is_err());
        assert!(PortCfgKey::new(&TableInfo::port_hdl_info()).is_err());
    }
}
