//! Table key schemas.
//!
//! A [`TableInfo`] names a table and lists its key fields. Key objects hold a
//! shared reference to one and consult it to validate field ids; they never
//! modify it.

use crate::error::{KeyError, KeyResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Numeric key field identifier.
pub type FieldId = u32;

/// Name of the device-port key field.
pub const DEV_PORT: &str = "dev_port";
/// Name of the port display-name key field.
pub const PORT_NAME: &str = "port_name";
/// Name of the connector id key field.
pub const CONN_ID: &str = "conn_id";
/// Name of the channel id key field.
pub const CHNL_ID: &str = "chnl_id";
/// Name of the front-panel index key field.
pub const FP_IDX: &str = "fp_idx";

/// How a key field is compared during lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Bit-exact comparison.
    Exact,
    /// Value/mask comparison.
    Ternary,
    /// Inclusive range.
    Range,
    /// Longest prefix match.
    Lpm,
    /// Exact match that may be wildcarded.
    Optional,
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MatchType::Exact => "exact",
            MatchType::Ternary => "ternary",
            MatchType::Range => "range",
            MatchType::Lpm => "lpm",
            MatchType::Optional => "optional",
        };
        write!(f, "{}", s)
    }
}

/// Descriptor of one key field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFieldInfo {
    /// Numeric identifier, unique within the table.
    pub id: FieldId,
    /// Symbolic name.
    pub name: String,
    /// Match kind.
    pub match_type: MatchType,
    /// Width in bits; 0 for variable-length (string) fields.
    #[serde(default)]
    pub size_bits: u32,
}

impl KeyFieldInfo {
    /// Creates a descriptor.
    pub fn new(id: FieldId, name: impl Into<String>, match_type: MatchType, size_bits: u32) -> Self {
        Self {
            id,
            name: name.into(),
            match_type,
            size_bits,
        }
    }

    /// Creates an exact-match descriptor.
    pub fn exact(id: FieldId, name: impl Into<String>, size_bits: u32) -> Self {
        Self::new(id, name, MatchType::Exact, size_bits)
    }
}

#[derive(Deserialize)]
struct TableInfoDef {
    name: String,
    key_fields: Vec<KeyFieldInfo>,
}

impl TryFrom<TableInfoDef> for TableInfo {
    type Error = KeyError;

    fn try_from(def: TableInfoDef) -> Result<Self, Self::Error> {
        def.key_fields
            .into_iter()
            .try_fold(TableInfo::new(def.name), TableInfo::with_key_field)
    }
}

/// Name and key schema of one table.
///
/// # Example
///
/// ```
/// use rmt_table_key::{KeyFieldInfo, MatchType, TableInfo};
///
/// let table = TableInfo::new("$PORT")
///     .with_key_field(KeyFieldInfo::exact(1, "dev_port", 32))
///     .unwrap();
/// assert_eq!(table.key_field(1).unwrap().match_type, MatchType::Exact);
/// assert!(table.key_field(2).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "TableInfoDef")]
pub struct TableInfo {
    name: String,
    key_fields: BTreeMap<FieldId, KeyFieldInfo>,
}

impl TableInfo {
    /// Creates a table with no key fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key_fields: BTreeMap::new(),
        }
    }

    /// Adds a key field.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidSchema`] if the id or name is already used.
    pub fn with_key_field(mut self, field: KeyFieldInfo) -> KeyResult<Self> {
        if self.key_fields.contains_key(&field.id) {
            return Err(KeyError::invalid_schema(format!(
                "{}: duplicate key field id {}",
                self.name, field.id
            )));
        }
        if self.key_field_by_name(&field.name).is_some() {
            return Err(KeyError::invalid_schema(format!(
                "{}: duplicate key field name {}",
                self.name, field.name
            )));
        }
        self.key_fields.insert(field.id, field);
        Ok(self)
    }

    /// Parses a schema of the form
    /// `{"name": "...", "key_fields": [{"id": 1, "name": "...", "match_type": "exact", "size_bits": 32}]}`.
    pub fn from_json(json: &str) -> KeyResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up a key field by id.
    pub fn key_field(&self, id: FieldId) -> Option<&KeyFieldInfo> {
        self.key_fields.get(&id)
    }

    /// Looks up a key field by name.
    pub fn key_field_by_name(&self, name: &str) -> Option<&KeyFieldInfo> {
        self.key_fields.values().find(|f| f.name == name)
    }

    /// Key field ids in ascending order.
    pub fn key_field_ids(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.key_fields.keys().copied()
    }

    /// Number of key fields.
    pub fn key_field_count(&self) -> usize {
        self.key_fields.len()
    }

    fn single(name: &str, field: KeyFieldInfo) -> Self {
        let mut key_fields = BTreeMap::new();
        key_fields.insert(field.id, field);
        Self {
            name: name.to_string(),
            key_fields,
        }
    }

    /// Schema of the port configuration table.
    pub fn port_cfg() -> Self {
        Self::single("$PORT", KeyFieldInfo::exact(1, DEV_PORT, 32))
    }

    /// Schema of the port statistics table.
    pub fn port_stat() -> Self {
        Self::single("$PORT_STAT", KeyFieldInfo::exact(1, DEV_PORT, 32))
    }

    /// Schema of the port name lookup table.
    pub fn port_str_info() -> Self {
        Self::single("$PORT_STR_INFO", KeyFieldInfo::exact(1, PORT_NAME, 0))
    }

    /// Schema of the port handle lookup table.
    pub fn port_hdl_info() -> Self {
        let mut table = Self::single("$PORT_HDL_INFO", KeyFieldInfo::exact(1, CONN_ID, 32));
        let chnl = KeyFieldInfo::exact(2, CHNL_ID, 32);
        table.key_fields.insert(chnl.id, chnl);
        table
    }

    /// Schema of the front-panel index lookup table.
    pub fn port_fp_idx_info() -> Self {
        Self::single("$PORT_FP_IDX_INFO", KeyFieldInfo::exact(1, FP_IDX, 32))
    }
}
