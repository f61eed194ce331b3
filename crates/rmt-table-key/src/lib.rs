//! Key objects for the fixed RMT port tables.
//!
//! A key object holds the lookup key of one table and exposes a uniform
//! get/set contract over numeric field ids checked against the table's
//! [`TableInfo`] schema:
//!
//! - [`PortCfgKey`], [`PortStatKey`]: one 32-bit device port
//! - [`PortStrInfoKey`]: port display name
//! - [`PortHdlInfoKey`]: connector id and channel id, bound by name
//! - [`PortFpIdxInfoKey`]: front-panel index, bound by name
//!
//! Integer fields exchange raw buffers in network byte order and the buffer
//! must be exactly the field width. Every failure is a [`KeyError`] that
//! maps to one driver ABI [`TdiStatus`].
//!
//! # Example
//!
//! ```
//! use rmt_table_key::{FixedWidthKey, KeyResultExt, PortCfgKey, TableInfo, TableKey, TdiStatus};
//!
//! let table = TableInfo::port_cfg();
//! let mut key = PortCfgKey::new(&table).unwrap();
//!
//! key.set_value_bytes(1, &[0x00, 0x00, 0x01, 0x04]).unwrap();
//! assert_eq!(key.dev_port().as_u32(), 260);
//!
//! let mut short = [0u8; 3];
//! assert_eq!(key.get_value_bytes(1, &mut short).status(), TdiStatus::InvalidArg);
//! assert_eq!(key.get_value(1, None).status(), TdiStatus::ObjectNotFound);
//! ```

mod engine;
mod error;
mod field;
mod keys;
mod schema;
mod value;
pub mod wire;

pub use engine::{FieldBinding, KeyEngine, KeyLayout, SlotDef, SlotKind, MAX_UINT_BYTES};
pub use error::{KeyError, KeyResult, KeyResultExt, TdiStatus};
pub use field::{check_match_type, check_value_match_type, key_field_safe_get};
pub use keys::{
    FieldKey, FixedWidthKey, PortCfgKey, PortFpIdxInfoKey, PortHdlInfoKey, PortStatKey,
    PortStrInfoKey, TableKey,
};
pub use schema::{
    FieldId, KeyFieldInfo, MatchType, TableInfo, CHNL_ID, CONN_ID, DEV_PORT, FP_IDX, PORT_NAME,
};
pub use value::{FieldData, KeyFieldValue};
