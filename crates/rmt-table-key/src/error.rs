//! Status codes and error types for key operations.
//!
//! Every key operation reports failure as a [`KeyError`]; each error maps to
//! exactly one driver ABI [`TdiStatus`] through [`KeyError::status`].

use crate::schema::{FieldId, MatchType};
use crate::wire::SizeMismatch;
use std::fmt;
use thiserror::Error;

/// Driver ABI status codes.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TdiStatus {
    Success = 0,
    NotReady = 1,
    NoSysResources = 2,
    InvalidArg = 3,
    AlreadyExists = 4,
    HwCommFail = 5,
    ObjectNotFound = 6,
    MaxSessionsExceeded = 7,
    SessionNotFound = 8,
    NoSpace = 9,
    Again = 10,
    InitError = 11,
    TxnNotSupported = 12,
    TableLocked = 13,
    Io = 14,
    Unexpected = 15,
    EntryReferencesExist = 16,
    NotSupported = 17,
}

impl TdiStatus {
    /// Creates a status from a raw i32 value.
    ///
    /// Unknown codes map to [`TdiStatus::Unexpected`].
    pub fn from_raw(status: i32) -> Self {
        match status {
            0 => TdiStatus::Success,
            1 => TdiStatus::NotReady,
            2 => TdiStatus::NoSysResources,
            3 => TdiStatus::InvalidArg,
            4 => TdiStatus::AlreadyExists,
            5 => TdiStatus::HwCommFail,
            6 => TdiStatus::ObjectNotFound,
            7 => TdiStatus::MaxSessionsExceeded,
            8 => TdiStatus::SessionNotFound,
            9 => TdiStatus::NoSpace,
            10 => TdiStatus::Again,
            11 => TdiStatus::InitError,
            12 => TdiStatus::TxnNotSupported,
            13 => TdiStatus::TableLocked,
            14 => TdiStatus::Io,
            16 => TdiStatus::EntryReferencesExist,
            17 => TdiStatus::NotSupported,
            _ => TdiStatus::Unexpected,
        }
    }

    /// Returns the raw status code.
    pub const fn as_raw(&self) -> i32 {
        *self as i32
    }

    /// Returns true if the status indicates success.
    pub fn is_success(&self) -> bool {
        *self == TdiStatus::Success
    }

    /// Converts to a Result, returning Ok(()) for success.
    pub fn into_result(self) -> Result<(), TdiStatus> {
        if self.is_success() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for TdiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TdiStatus::Success => "TDI_SUCCESS",
            TdiStatus::NotReady => "TDI_NOT_READY",
            TdiStatus::NoSysResources => "TDI_NO_SYS_RESOURCES",
            TdiStatus::InvalidArg => "TDI_INVALID_ARG",
            TdiStatus::AlreadyExists => "TDI_ALREADY_EXISTS",
            TdiStatus::HwCommFail => "TDI_HW_COMM_FAIL",
            TdiStatus::ObjectNotFound => "TDI_OBJECT_NOT_FOUND",
            TdiStatus::MaxSessionsExceeded => "TDI_MAX_SESSIONS_EXCEEDED",
            TdiStatus::SessionNotFound => "TDI_SESSION_NOT_FOUND",
            TdiStatus::NoSpace => "TDI_NO_SPACE",
            TdiStatus::Again => "TDI_EAGAIN",
            TdiStatus::InitError => "TDI_INIT_ERROR",
            TdiStatus::TxnNotSupported => "TDI_TXN_NOT_SUPPORTED",
            TdiStatus::TableLocked => "TDI_TABLE_LOCKED",
            TdiStatus::Io => "TDI_IO",
            TdiStatus::Unexpected => "TDI_UNEXPECTED",
            TdiStatus::EntryReferencesExist => "TDI_ENTRY_REFERENCES_EXIST",
            TdiStatus::NotSupported => "TDI_NOT_SUPPORTED",
        };
        write!(f, "{}", s)
    }
}

/// Result type for key operations.
pub type KeyResult<T> = Result<T, KeyError>;

/// Error type for key operations.
#[derive(Debug, Error)]
pub enum KeyError {
    /// The field id is not part of the table's key schema.
    #[error("{table}: unknown key field id {field_id}")]
    UnknownField { table: String, field_id: FieldId },

    /// The field (or the supplied value) is not of the required match type.
    #[error("{table}: field {field_id} expected {expected} match, received {received}")]
    WrongMatchType {
        table: String,
        field_id: FieldId,
        expected: MatchType,
        received: MatchType,
    },

    /// The field exists in the schema but this key has no slot for it.
    #[error("{table}: field {field_id} ({name}) is not held by this key")]
    UnboundField {
        table: String,
        field_id: FieldId,
        name: String,
    },

    /// Raw buffer length differs from the field's wire width.
    #[error("{table}: field {field_id}: {source}")]
    SizeMismatch {
        table: String,
        field_id: FieldId,
        #[source]
        source: SizeMismatch,
    },

    /// Integer value does not fit the field.
    #[error("{table}: field {field_id} value {value} exceeds maximum {max}")]
    ValueOutOfRange {
        table: String,
        field_id: FieldId,
        value: u64,
        max: u64,
    },

    /// The value carries data of the wrong shape (e.g. a string for an
    /// integer field).
    #[error("{table}: field {field_id} does not accept {received} data")]
    WrongDataKind {
        table: String,
        field_id: FieldId,
        received: &'static str,
    },

    /// No output value was supplied to a getter.
    #[error("{table}: null output for key field {field_id}")]
    NullOutput { table: String, field_id: FieldId },

    /// The table schema cannot back this key.
    #[error("invalid table schema: {message}")]
    InvalidSchema { message: String },

    /// The table schema could not be parsed.
    #[error("failed to parse table schema: {source}")]
    Config {
        #[from]
        source: serde_json::Error,
    },

    /// A state believed unreachable.
    #[error("unexpected: {message}")]
    Unexpected { message: String },
}

impl KeyError {
    /// Creates an invalid schema error.
    pub fn invalid_schema(message: impl Into<String>) -> Self {
        KeyError::InvalidSchema {
            message: message.into(),
        }
    }

    /// Creates an unexpected-state error.
    pub fn unexpected(message: impl Into<String>) -> Self {
        KeyError::Unexpected {
            message: message.into(),
        }
    }

    /// Returns the ABI status reported for this error.
    pub fn status(&self) -> TdiStatus {
        match self {
            KeyError::NullOutput { .. } => TdiStatus::ObjectNotFound,
            KeyError::Unexpected { .. } => TdiStatus::Unexpected,
            KeyError::UnknownField { .. }
            | KeyError::WrongMatchType { .. }
            | KeyError::UnboundField { .. }
            | KeyError::SizeMismatch { .. }
            | KeyError::ValueOutOfRange { .. }
            | KeyError::WrongDataKind { .. }
            | KeyError::InvalidSchema { .. }
            | KeyError::Config { .. } => TdiStatus::InvalidArg,
        }
    }

    /// Returns true if the error reports a buffer length mismatch.
    pub fn is_size_mismatch(&self) -> bool {
        matches!(self, KeyError::SizeMismatch { .. })
    }
}

/// Extension trait for collapsing a key result to its ABI status.
pub trait KeyResultExt {
    /// Returns [`TdiStatus::Success`] or the error's status.
    fn status(&self) -> TdiStatus;
}

impl<T> KeyResultExt for KeyResult<T> {
    fn status(&self) -> TdiStatus {
        match self {
            Ok(_) => TdiStatus::Success,
            Err(e) => e.status(),
        }
    }
}
