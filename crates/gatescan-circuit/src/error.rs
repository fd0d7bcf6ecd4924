//! Error types for description parsing and circuit loading.

use std::error::Error;
use std::fmt;

use gatescan_core::BindError;

// ── PayloadError ───────────────────────────────────────────────────

/// A gate table payload that cannot be turned into engine words.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PayloadError {
    /// The `data` field is not valid standard base64.
    Base64 {
        /// Gate table name.
        table: String,
        /// Decoder message.
        reason: String,
    },
    /// The decoded byte count is not a whole number of elements.
    Truncated {
        /// Gate table name.
        table: String,
        /// Decoded byte count.
        byte_len: usize,
        /// Element width in bytes.
        width: usize,
    },
    /// The table's `len` field disagrees with its payload.
    LenMismatch {
        /// Gate table name.
        table: String,
        /// Element count declared by `len`.
        declared: u32,
        /// Element count decoded from `data`.
        decoded: usize,
    },
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base64 { table, reason } => {
                write!(f, "gate table '{table}': invalid base64 payload: {reason}")
            }
            Self::Truncated {
                table,
                byte_len,
                width,
            } => write!(
                f,
                "gate table '{table}': {byte_len} payload bytes is not a multiple of {width}"
            ),
            Self::LenMismatch {
                table,
                declared,
                decoded,
            } => write!(
                f,
                "gate table '{table}': len says {declared} elements, payload holds {decoded}"
            ),
        }
    }
}

impl Error for PayloadError {}

// ── LoadError ──────────────────────────────────────────────────────

/// Errors raised while parsing a description or loading it into an engine.
///
/// All variants are fatal for the load; nothing is retried.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadError {
    /// The description text is not valid circuit JSON.
    Description {
        /// Parser message.
        reason: String,
    },
    /// A gate table payload could not be decoded.
    Payload(PayloadError),
    /// The description has no entry for the primary gate table.
    MissingPrimaryTable {
        /// Primary table name from [`LoadOptions`](crate::LoadOptions).
        table: String,
    },
    /// The engine does not provide a table the load needs.
    MissingTable {
        /// Table name.
        table: String,
    },
    /// The engine table and the payload hold different element counts.
    SizeMismatch {
        /// Table name.
        table: String,
        /// Element count reported by the engine.
        engine_len: usize,
        /// Element count decoded from the description.
        payload_len: usize,
    },
    /// A required pin is not in the description's pin map.
    MissingPin {
        /// Pin name.
        name: String,
    },
    /// The settle loop hit its configured bound while still changing.
    SettleDiverged {
        /// Number of `update_all` passes made.
        passes: u64,
    },
    /// The engine binding rejected an access.
    Bind(BindError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Description { reason } => write!(f, "invalid circuit description: {reason}"),
            Self::Payload(e) => write!(f, "payload error: {e}"),
            Self::MissingPrimaryTable { table } => {
                write!(f, "description has no '{table}' gate table")
            }
            Self::MissingTable { table } => write!(f, "engine has no '{table}' table"),
            Self::SizeMismatch {
                table,
                engine_len,
                payload_len,
            } => write!(
                f,
                "table '{table}': engine holds {engine_len} elements, payload has {payload_len}"
            ),
            Self::MissingPin { name } => write!(f, "pin '{name}' not found in pin map"),
            Self::SettleDiverged { passes } => {
                write!(f, "circuit still changing after {passes} settle passes")
            }
            Self::Bind(e) => write!(f, "binding error: {e}"),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Payload(e) => Some(e),
            Self::Bind(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PayloadError> for LoadError {
    fn from(e: PayloadError) -> Self {
        Self::Payload(e)
    }
}

impl From<BindError> for LoadError {
    fn from(e: BindError) -> Self {
        Self::Bind(e)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        Self::Description {
            reason: e.to_string(),
        }
    }
}
