//! Generic key-object engine.
//!
//! Every port table key is a [`KeyEngine`] driven by a static [`KeyLayout`]:
//! a list of slots (name + native shape) and a rule for binding schema
//! fields to slots. Validation, range checks and wire conversion live here
//! once instead of in each key type.

use crate::error::{KeyError, KeyResult};
use crate::field;
use crate::schema::{FieldId, KeyFieldInfo, MatchType, TableInfo};
use crate::value::{FieldData, KeyFieldValue};
use crate::wire;
use tracing::error;

/// Native shape of a key slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// Unsigned integer exchanged as a `bytes`-wide big-endian buffer.
    Uint { bytes: usize },
    /// Arbitrary-length string; no raw buffer form.
    Str,
}

/// One value held by a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotDef {
    /// Schema field name bound to this slot.
    pub name: &'static str,
    /// Native shape.
    pub kind: SlotKind,
}

/// How schema fields map to slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldBinding {
    /// The table has one key field and the key one slot; any exact field
    /// of the schema addresses it.
    Sole,
    /// Fields are matched to slots by name.
    ByName,
}

/// Static description of a key type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyLayout {
    /// Field-to-slot rule.
    pub binding: FieldBinding,
    /// Slots in storage order.
    pub slots: &'static [SlotDef],
}

/// Widest integer slot, in bytes.
pub const MAX_UINT_BYTES: usize = 8;

fn check_width(table: &TableInfo, slot: &SlotDef, field: &KeyFieldInfo) -> KeyResult<()> {
    let SlotKind::Uint { bytes } = slot.kind else {
        return Ok(());
    };
    let slot_bits = bytes * 8;
    if usize::try_from(field.size_bits).ok() != Some(slot_bits) {
        return Err(KeyError::invalid_schema(format!(
            "{}: key field {} is {} bits, key holds {} bits",
            table.name(),
            field.name,
            field.size_bits,
            slot_bits
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SlotValue {
    Uint(u64),
    Str(String),
}

impl SlotValue {
    fn zero(kind: SlotKind) -> Self {
        match kind {
            SlotKind::Uint { .. } => SlotValue::Uint(0),
            SlotKind::Str => SlotValue::Str(String::new()),
        }
    }
}

/// Current value of a table key plus the schema it is validated against.
#[derive(Debug, Clone)]
pub struct KeyEngine<'t> {
    table: &'t TableInfo,
    layout: &'static KeyLayout,
    values: Vec<SlotValue>,
}

impl<'t> KeyEngine<'t> {
    /// Creates a zeroed key for `table`.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidSchema`] if the schema cannot back the
    /// layout: a `Sole` layout needs exactly one key field, a `ByName`
    /// layout needs an exact field for every slot name, integer slots must
    /// be 1 to 8 bytes wide and each bound field's `size_bits` must equal
    /// its integer slot's width.
    pub fn new(table: &'t TableInfo, layout: &'static KeyLayout) -> KeyResult<Self> {
        for slot in layout.slots {
            if let SlotKind::Uint { bytes } = slot.kind {
                if !(1..=MAX_UINT_BYTES).contains(&bytes) {
                    return Err(KeyError::invalid_schema(format!(
                        "{}: slot {} width {} bytes not in 1..={}",
                        table.name(),
                        slot.name,
                        bytes,
                        MAX_UINT_BYTES
                    )));
                }
            }
        }
        match layout.binding {
            FieldBinding::Sole => {
                let (Some(slot), Some(field), 1, 1) = (
                    layout.slots.first(),
                    table.key_field_ids().next().and_then(|id| table.key_field(id)),
                    layout.slots.len(),
                    table.key_field_count(),
                ) else {
                    return Err(KeyError::invalid_schema(format!(
                        "{}: expected a single key field, found {}",
                        table.name(),
                        table.key_field_count()
                    )));
                };
                check_width(table, slot, field)?;
            }
            FieldBinding::ByName => {
                for slot in layout.slots {
                    let field = table
                        .key_field_by_name(slot.name)
                        .filter(|f| f.match_type == MatchType::Exact)
                        .ok_or_else(|| {
                            KeyError::invalid_schema(format!(
                                "{}: missing exact key field {}",
                                table.name(),
                                slot.name
                            ))
                        })?;
                    check_width(table, slot, field)?;
                }
            }
        }
        Ok(Self {
            table,
            layout,
            values: layout.slots.iter().map(|s| SlotValue::zero(s.kind)).collect(),
        })
    }

    /// Schema this key validates against.
    pub fn table(&self) -> &'t TableInfo {
        self.table
    }

    /// Zeroes every slot (strings become empty).
    pub fn reset(&mut self) {
        for (value, slot) in self.values.iter_mut().zip(self.layout.slots) {
            *value = SlotValue::zero(slot.kind);
        }
    }

    fn lookup(&self, field_id: FieldId) -> KeyResult<&'t KeyFieldInfo> {
        field::key_field_safe_get(self.table, field_id, MatchType::Exact)
    }

    fn slot_of(&self, field: &KeyFieldInfo) -> KeyResult<usize> {
        let slot = match self.layout.binding {
            FieldBinding::Sole => Some(0),
            FieldBinding::ByName => self.layout.slots.iter().position(|s| s.name == field.name),
        };
        slot.ok_or_else(|| {
            error!(
                table = self.table.name(),
                field_id = field.id,
                name = %field.name,
                "key field is not held by this key"
            );
            KeyError::UnboundField {
                table: self.table.name().to_string(),
                field_id: field.id,
                name: field.name.clone(),
            }
        })
    }

    fn size_mismatch(&self, field_id: FieldId, source: wire::SizeMismatch) -> KeyError {
        error!(
            table = self.table.name(),
            field_id,
            expected = source.expected,
            received = source.received,
            "array size is not equal to the field size"
        );
        KeyError::SizeMismatch {
            table: self.table.name().to_string(),
            field_id,
            source,
        }
    }

    fn wrong_data(&self, field_id: FieldId, received: &'static str) -> KeyError {
        error!(
            table = self.table.name(),
            field_id, received, "key field does not accept this data"
        );
        KeyError::WrongDataKind {
            table: self.table.name().to_string(),
            field_id,
            received,
        }
    }

    fn unexpected_slot(&self, slot: usize) -> KeyError {
        KeyError::unexpected(format!(
            "{}: slot {} storage does not match its layout",
            self.table.name(),
            slot
        ))
    }

    fn store_uint(&mut self, field_id: FieldId, slot: usize, value: u64) -> KeyResult<()> {
        let SlotKind::Uint { bytes } = self.layout.slots[slot].kind else {
            return Err(self.wrong_data(field_id, "integer"));
        };
        let max = wire::max_value(bytes);
        if value > max {
            error!(
                table = self.table.name(),
                field_id, value, max, "key field value out of range"
            );
            return Err(KeyError::ValueOutOfRange {
                table: self.table.name().to_string(),
                field_id,
                value,
                max,
            });
        }
        if let SlotValue::Uint(v) = &mut self.values[slot] {
            *v = value;
            return Ok(());
        }
        Err(self.unexpected_slot(slot))
    }

    fn store_bytes(&mut self, field_id: FieldId, slot: usize, buf: &[u8]) -> KeyResult<()> {
        let SlotKind::Uint { bytes } = self.layout.slots[slot].kind else {
            return Err(self.wrong_data(field_id, "byte buffer"));
        };
        let value = wire::decode(bytes, buf).map_err(|e| self.size_mismatch(field_id, e))?;
        self.store_uint(field_id, slot, value)
    }

    fn store(&mut self, field_id: FieldId, slot: usize, data: &FieldData) -> KeyResult<()> {
        match (data, self.layout.slots[slot].kind) {
            (FieldData::Int(v), _) => self.store_uint(field_id, slot, *v),
            (FieldData::Bytes(b), _) => self.store_bytes(field_id, slot, b),
            (FieldData::Str(s), SlotKind::Str) => {
                if let SlotValue::Str(v) = &mut self.values[slot] {
                    v.clone_from(s);
                    return Ok(());
                }
                Err(self.unexpected_slot(slot))
            }
            (FieldData::Str(_), SlotKind::Uint { .. }) => Err(self.wrong_data(field_id, "string")),
        }
    }

    fn load_uint(&self, field_id: FieldId, slot: usize) -> KeyResult<u64> {
        match (&self.values[slot], self.layout.slots[slot].kind) {
            (SlotValue::Uint(v), SlotKind::Uint { .. }) => Ok(*v),
            (_, SlotKind::Str) => Err(self.wrong_data(field_id, "integer")),
            (SlotValue::Str(_), SlotKind::Uint { .. }) => Err(self.unexpected_slot(slot)),
        }
    }

    fn load_bytes(&self, field_id: FieldId, slot: usize, out: &mut [u8]) -> KeyResult<()> {
        let SlotKind::Uint { bytes } = self.layout.slots[slot].kind else {
            return Err(self.wrong_data(field_id, "byte buffer"));
        };
        let value = self.load_uint(field_id, slot)?;
        wire::encode(value, bytes, out).map_err(|e| self.size_mismatch(field_id, e))
    }

    fn load(&self, field_id: FieldId, slot: usize, out: &mut FieldData) -> KeyResult<()> {
        match out {
            FieldData::Int(v) => {
                *v = self.load_uint(field_id, slot)?;
                Ok(())
            }
            FieldData::Bytes(buf) => self.load_bytes(field_id, slot, buf),
            FieldData::Str(s) => match (&self.values[slot], self.layout.slots[slot].kind) {
                (SlotValue::Str(v), SlotKind::Str) => {
                    s.clone_from(v);
                    Ok(())
                }
                (_, SlotKind::Uint { .. }) => Err(self.wrong_data(field_id, "string")),
                (SlotValue::Uint(_), SlotKind::Str) => Err(self.unexpected_slot(slot)),
            },
        }
    }

    /// Stores a tagged value under `field_id`.
    pub fn set_value(&mut self, field_id: FieldId, value: &KeyFieldValue) -> KeyResult<()> {
        let field = self.lookup(field_id)?;
        field::check_value_match_type(self.table, field_id, value, MatchType::Exact)?;
        let slot = self.slot_of(field)?;
        match value.as_exact() {
            Some(data) => self.store(field_id, slot, data),
            None => Err(KeyError::unexpected("non-exact value passed the match type check")),
        }
    }

    /// Decodes a raw big-endian buffer into `field_id`.
    pub fn set_value_bytes(&mut self, field_id: FieldId, value: &[u8]) -> KeyResult<()> {
        let field = self.lookup(field_id)?;
        let slot = self.slot_of(field)?;
        self.store_bytes(field_id, slot, value)
    }

    /// Reads `field_id` into a caller supplied tagged value.
    ///
    /// The shape of the output decides the conversion: an `Int` receives
    /// the native value, a `Bytes` buffer receives the wire encoding (its
    /// length must equal the field width) and a `Str` receives the string.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::NullOutput`] when `value` is `None`.
    pub fn get_value(&self, field_id: FieldId, value: Option<&mut KeyFieldValue>) -> KeyResult<()> {
        let Some(value) = value else {
            error!(
                table = self.table.name(),
                field_id, "input param passed null for key field"
            );
            return Err(KeyError::NullOutput {
                table: self.table.name().to_string(),
                field_id,
            });
        };
        let field = self.lookup(field_id)?;
        field::check_value_match_type(self.table, field_id, value, MatchType::Exact)?;
        let slot = self.slot_of(field)?;
        match value.as_exact_mut() {
            Some(data) => self.load(field_id, slot, data),
            None => Err(KeyError::unexpected("non-exact value passed the match type check")),
        }
    }

    /// Writes the wire encoding of `field_id` into `out`.
    pub fn get_value_bytes(&self, field_id: FieldId, out: &mut [u8]) -> KeyResult<()> {
        let field = self.lookup(field_id)?;
        let slot = self.slot_of(field)?;
        self.load_bytes(field_id, slot, out)
    }

    /// Returns the integer value of `field_id`.
    pub fn get_value_u64(&self, field_id: FieldId) -> KeyResult<u64> {
        let field = self.lookup(field_id)?;
        let slot = self.slot_of(field)?;
        self.load_uint(field_id, slot)
    }

    /// Stores an integer under a descriptor already resolved by the caller.
    pub fn set_field(&mut self, field: &KeyFieldInfo, value: u64) -> KeyResult<()> {
        field::check_match_type(self.table, field, MatchType::Exact)?;
        let slot = self.slot_of(field)?;
        self.store_uint(field.id, slot, value)
    }

    /// Decodes a raw buffer under a descriptor already resolved by the caller.
    pub fn set_field_bytes(&mut self, field: &KeyFieldInfo, value: &[u8]) -> KeyResult<()> {
        field::check_match_type(self.table, field, MatchType::Exact)?;
        let slot = self.slot_of(field)?;
        self.store_bytes(field.id, slot, value)
    }

    /// Reads an integer through a resolved descriptor.
    pub fn get_field(&self, field: &KeyFieldInfo) -> KeyResult<u64> {
        field::check_match_type(self.table, field, MatchType::Exact)?;
        let slot = self.slot_of(field)?;
        self.load_uint(field.id, slot)
    }

    /// Encodes a field into `out` through a resolved descriptor.
    pub fn get_field_bytes(&self, field: &KeyFieldInfo, out: &mut [u8]) -> KeyResult<()> {
        field::check_match_type(self.table, field, MatchType::Exact)?;
        let slot = self.slot_of(field)?;
        self.load_bytes(field.id, slot, out)
    }

    pub(crate) fn uint(&self, slot: usize) -> u64 {
        match self.values.get(slot) {
            Some(SlotValue::Uint(v)) => *v,
            _ => 0,
        }
    }

    pub(crate) fn set_uint(&mut self, slot: usize, value: u64) {
        if let Some(SlotValue::Uint(v)) = self.values.get_mut(slot) {
            *v = value;
        }
    }

    pub(crate) fn str(&self, slot: usize) -> &str {
        match self.values.get(slot) {
            Some(SlotValue::Str(s)) => s,
            _ => "",
        }
    }

    pub(crate) fn set_str(&mut self, slot: usize, value: String) {
        if let Some(SlotValue::Str(s)) = self.values.get_mut(slot) {
            *s = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    static PAIR: KeyLayout = KeyLayout {
        binding: FieldBinding::ByName,
        slots: &[
            SlotDef {
                name: "lo",
                kind: SlotKind::Uint { bytes: 2 },
            },
            SlotDef {
                name: "hi",
                kind: SlotKind::Uint { bytes: 4 },
            },
        ],
    };

    static NAME: KeyLayout = KeyLayout {
        binding: FieldBinding::Sole,
        slots: &[SlotDef {
            name: "name",
            kind: SlotKind::Str,
        }],
    };

    fn pair_table() -> TableInfo {
        TableInfo::new("pair")
            .with_key_field(KeyFieldInfo::exact(10, "hi", 32))
            .unwrap()
            .with_key_field(KeyFieldInfo::exact(11, "lo", 16))
            .unwrap()
            .with_key_field(KeyFieldInfo::exact(12, "extra", 8))
            .unwrap()
    }

    #[test]
    fn test_by_name_binding_ignores_schema_order() {
        let table = pair_table();
        let mut key = KeyEngine::new(&table, &PAIR).unwrap();
        key.set_value(10, &KeyFieldValue::exact_int(0xdead_beef)).unwrap();
        key.set_value(11, &KeyFieldValue::exact_int(0xbeef)).unwrap();
        assert_eq!(key.uint(0), 0xbeef);
        assert_eq!(key.uint(1), 0xdead_beef);
    }

    #[test]
    fn test_per_slot_width() {
        let table = pair_table();
        let mut key = KeyEngine::new(&table, &PAIR).unwrap();
        assert!(matches!(
            key.set_value(11, &KeyFieldValue::exact_int(0x1_0000)),
            Err(KeyError::ValueOutOfRange { max: 0xffff, .. })
        ));
        key.set_value_bytes(11, &[0x12, 0x34]).unwrap();
        assert_eq!(key.get_value_u64(11).unwrap(), 0x1234);
        assert!(key.set_value_bytes(11, &[0, 0, 0x12, 0x34]).unwrap_err().is_size_mismatch());
    }

    #[test]
    fn test_unbound_field() {
        let table = pair_table();
        let mut key = KeyEngine::new(&table, &PAIR).unwrap();
        assert!(matches!(
            key.set_value(12, &KeyFieldValue::exact_int(1)),
            Err(KeyError::UnboundField { field_id: 12, .. })
        ));
        assert_eq!((key.uint(0), key.uint(1)), (0, 0));
    }

    #[test]
    fn test_schema_must_back_layout() {
        let table = TableInfo::new("bad")
            .with_key_field(KeyFieldInfo::exact(1, "lo", 16))
            .unwrap();
        assert!(KeyEngine::new(&table, &PAIR).is_err());

        let ternary = TableInfo::new("bad")
            .with_key_field(KeyFieldInfo::exact(1, "lo", 16))
            .unwrap()
            .with_key_field(KeyFieldInfo::new(2, "hi", MatchType::Ternary, 32))
            .unwrap();
        assert!(KeyEngine::new(&ternary, &PAIR).is_err());

        assert!(KeyEngine::new(&pair_table(), &NAME).is_err());
    }

    #[test]
    fn test_slot_width_must_fit_wire_codec() {
        static EMPTY: KeyLayout = KeyLayout {
            binding: FieldBinding::Sole,
            slots: &[SlotDef {
                name: "v",
                kind: SlotKind::Uint { bytes: 0 },
            }],
        };
        static WIDE: KeyLayout = KeyLayout {
            binding: FieldBinding::Sole,
            slots: &[SlotDef {
                name: "v",
                kind: SlotKind::Uint { bytes: 9 },
            }],
        };
        for (layout, bits) in [(&EMPTY, 0), (&WIDE, 72)] {
            let table = TableInfo::new("t")
                .with_key_field(KeyFieldInfo::exact(1, "v", bits))
                .unwrap();
            assert!(matches!(
                KeyEngine::new(&table, layout),
                Err(KeyError::InvalidSchema { .. })
            ));
        }
    }

    #[test]
    fn test_schema_width_must_match_slot() {
        let narrow = TableInfo::new("pair")
            .with_key_field(KeyFieldInfo::exact(10, "hi", 32))
            .unwrap()
            .with_key_field(KeyFieldInfo::exact(11, "lo", 8))
            .unwrap();
        assert!(matches!(KeyEngine::new(&narrow, &PAIR), Err(KeyError::InvalidSchema { .. })));

        static SINGLE: KeyLayout = KeyLayout {
            binding: FieldBinding::Sole,
            slots: &[SlotDef {
                name: "v",
                kind: SlotKind::Uint { bytes: 4 },
            }],
        };
        let half = TableInfo::new("t")
            .with_key_field(KeyFieldInfo::exact(1, "v", 16))
            .unwrap();
        assert!(KeyEngine::new(&half, &SINGLE).is_err());
    }

    #[test]
    fn test_string_slot() {
        let table = TableInfo::new("names")
            .with_key_field(KeyFieldInfo::exact(1, "name", 0))
            .unwrap();
        let mut key = KeyEngine::new(&table, &NAME).unwrap();
        key.set_value(1, &KeyFieldValue::exact_str("1/0")).unwrap();
        assert_eq!(key.str(0), "1/0");

        assert!(key.set_value(1, &KeyFieldValue::exact_int(3)).is_err());
        assert!(key.set_value_bytes(1, &[0, 0, 0, 3]).is_err());
        assert!(key.get_value_u64(1).is_err());
        assert_eq!(key.str(0), "1/0");

        key.reset();
        assert_eq!(key.str(0), "");
    }

    #[test]
    fn test_failed_get_leaves_output_untouched() {
        let table = pair_table();
        let key = KeyEngine::new(&table, &PAIR).unwrap();
        let mut out = KeyFieldValue::exact_bytes(vec![0xaa; 3]);
        assert!(key.get_value(10, Some(&mut out)).unwrap_err().is_size_mismatch());
        assert_eq!(out, KeyFieldValue::exact_bytes(vec![0xaa; 3]));
    }
}
