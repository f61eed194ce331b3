//! Field-identity validation shared by every key object.
//!
//! Each setter and getter passes through here before touching stored state,
//! so a value is never stored under a field of the wrong match kind.

use crate::error::{KeyError, KeyResult};
use crate::schema::{FieldId, KeyFieldInfo, MatchType, TableInfo};
use crate::value::KeyFieldValue;
use tracing::error;

/// Looks up `field_id` in `table` and checks its match kind.
///
/// # Errors
///
/// Returns [`KeyError::UnknownField`] for an id missing from the schema and
/// [`KeyError::WrongMatchType`] if the field is not of kind `expected`.
pub fn key_field_safe_get<'t>(
    table: &'t TableInfo,
    field_id: FieldId,
    expected: MatchType,
) -> KeyResult<&'t KeyFieldInfo> {
    let Some(field) = table.key_field(field_id) else {
        error!(table = table.name(), field_id, "key field not found");
        return Err(KeyError::UnknownField {
            table: table.name().to_string(),
            field_id,
        });
    };
    check_match_type(table, field, expected)?;
    Ok(field)
}

/// Checks that a descriptor already in hand is of kind `expected`.
pub fn check_match_type(
    table: &TableInfo,
    field: &KeyFieldInfo,
    expected: MatchType,
) -> KeyResult<()> {
    if field.match_type != expected {
        error!(
            table = table.name(),
            field_id = field.id,
            expected = %expected,
            received = %field.match_type,
            "wrong API called for this field type"
        );
        return Err(KeyError::WrongMatchType {
            table: table.name().to_string(),
            field_id: field.id,
            expected,
            received: field.match_type,
        });
    }
    Ok(())
}

/// Checks that a caller supplied value carries the `expected` tag.
pub fn check_value_match_type(
    table: &TableInfo,
    field_id: FieldId,
    value: &KeyFieldValue,
    expected: MatchType,
) -> KeyResult<()> {
    let received = value.match_type();
    if received != expected {
        error!(
            table = table.name(),
            field_id,
            expected = %expected,
            received = %received,
            "key field value has the wrong match type"
        );
        return Err(KeyError::WrongMatchType {
            table: table.name().to_string(),
            field_id,
            expected,
            received,
        });
    }
    Ok(())
}
