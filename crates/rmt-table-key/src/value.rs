//! Tagged generic key field values.

use crate::schema::MatchType;

/// Payload of a key field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldData {
    /// Inline integer.
    Int(u64),
    /// Raw network byte order buffer; its length is the declared size.
    Bytes(Vec<u8>),
    /// String.
    Str(String),
}

impl FieldData {
    /// Short name of the payload shape, used in diagnostics.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            FieldData::Int(_) => "integer",
            FieldData::Bytes(_) => "byte buffer",
            FieldData::Str(_) => "string",
        }
    }
}

/// A key field value tagged with the match kind it represents.
///
/// Key objects only accept [`KeyFieldValue::Exact`]; the other variants
/// exist so callers holding a ternary/range/LPM value get a clean rejection
/// instead of a misinterpreted one.
///
/// # Example
///
/// ```
/// use rmt_table_key::{FieldData, KeyFieldValue, MatchType};
///
/// let value = KeyFieldValue::exact_int(12);
/// assert_eq!(value.match_type(), MatchType::Exact);
/// assert_eq!(value.as_exact(), Some(&FieldData::Int(12)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyFieldValue {
    /// Exact-match value.
    Exact(FieldData),
    /// Value/mask pair.
    Ternary { value: FieldData, mask: FieldData },
    /// Inclusive bounds.
    Range { low: FieldData, high: FieldData },
    /// Prefix value and length.
    Lpm { value: FieldData, prefix_len: u16 },
    /// Value that may be wildcarded.
    Optional { value: FieldData, is_valid: bool },
}

impl KeyFieldValue {
    /// Exact integer value.
    pub fn exact_int(value: u64) -> Self {
        KeyFieldValue::Exact(FieldData::Int(value))
    }

    /// Exact raw buffer value.
    pub fn exact_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        KeyFieldValue::Exact(FieldData::Bytes(bytes.into()))
    }

    /// Exact zero-filled buffer of `size` bytes, used as a getter output.
    pub fn exact_buffer(size: usize) -> Self {
        KeyFieldValue::Exact(FieldData::Bytes(vec![0; size]))
    }

    /// Exact string value.
    pub fn exact_str(value: impl Into<String>) -> Self {
        KeyFieldValue::Exact(FieldData::Str(value.into()))
    }

    /// Match kind this value represents.
    pub const fn match_type(&self) -> MatchType {
        match self {
            KeyFieldValue::Exact(_) => MatchType::Exact,
            KeyFieldValue::Ternary { .. } => MatchType::Ternary,
            KeyFieldValue::Range { .. } => MatchType::Range,
            KeyFieldValue::Lpm { .. } => MatchType::Lpm,
            KeyFieldValue::Optional { .. } => MatchType::Optional,
        }
    }

    /// Payload of an exact value.
    pub fn as_exact(&self) -> Option<&FieldData> {
        match self {
            KeyFieldValue::Exact(data) => Some(data),
            _ => None,
        }
    }

    /// Mutable payload of an exact value.
    pub fn as_exact_mut(&mut self) -> Option<&mut FieldData> {
        match self {
            KeyFieldValue::Exact(data) => Some(data),
            _ => None,
        }
    }

    /// Integer payload of an exact value.
    pub fn as_int(&self) -> Option<u64> {
        match self.as_exact() {
            Some(FieldData::Int(v)) => Some(*v),
            _ => None,
        }
    }

    /// Buffer payload of an exact value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self.as_exact() {
            Some(FieldData::Bytes(b)) => Some(b),
            _ => None,
        }
    }

    /// String payload of an exact value.
    pub fn as_str(&self) -> Option<&str> {
        match self.as_exact() {
            Some(FieldData::Str(s)) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_match_types() {
        assert_eq!(KeyFieldValue::exact_int(1).match_type(), MatchType::Exact);
        let ternary = KeyFieldValue::Ternary {
            value: FieldData::Int(1),
            mask: FieldData::Int(0xff),
        };
        assert_eq!(ternary.match_type(), MatchType::Ternary);
        assert!(ternary.as_exact().is_none());
    }

    #[test]
    fn test_accessors() {
        assert_eq!(KeyFieldValue::exact_int(7).as_int(), Some(7));
        assert_eq!(KeyFieldValue::exact_str("a").as_str(), Some("a"));
        assert_eq!(KeyFieldValue::exact_buffer(4).as_bytes(), Some(&[0u8; 4][..]));
        assert_eq!(KeyFieldValue::exact_str("a").as_int(), None);
    }

    #[test]
    fn test_kind_name() {
        assert_eq!(FieldData::Str(String::new()).kind_name(), "string");
        assert_eq!(FieldData::Bytes(vec![]).kind_name(), "byte buffer");
    }
}
