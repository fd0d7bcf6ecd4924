//! Binding errors.
//!
//! Every variant is an engine contract violation or a caller mistake.
//! An absent array is not an error: accessors return `Ok(None)`.

use std::error::Error;
use std::fmt;

use crate::element::ElementType;
use crate::id::ArrayId;

/// Errors raised while binding an engine or dereferencing a view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindError {
    /// A `_len_` export without a `__<tag>` suffix or with an empty name.
    MalformedArrayExport {
        /// The offending export name.
        export: String,
    },
    /// An array export carries a type tag gatescan does not know.
    UnknownElementType {
        /// The array name.
        array: String,
        /// The unrecognised tag.
        tag: String,
    },
    /// A length export has no matching `_get_<name>` offset export.
    MissingOffsetAccessor {
        /// The array name.
        array: String,
    },
    /// The engine lists an export it cannot resolve to a handle.
    UnresolvableExport {
        /// The export name.
        export: String,
    },
    /// Two length exports declare the same array name.
    DuplicateArray {
        /// The repeated array name.
        array: String,
    },
    /// No array with this name was discovered at bind time.
    UnknownArray {
        /// The requested name.
        name: String,
    },
    /// An [`ArrayId`] outside the schema table.
    UnknownArrayId {
        /// The requested id.
        id: ArrayId,
    },
    /// A typed view was requested with the wrong element type.
    ElementTypeMismatch {
        /// The array name.
        array: String,
        /// Element type declared by the engine.
        declared: ElementType,
        /// Element type the caller asked for.
        requested: ElementType,
    },
    /// The engine reported a region that does not fit in its memory.
    OutOfBounds {
        /// The array name.
        array: String,
        /// Reported byte offset.
        byte_offset: usize,
        /// Byte length implied by the reported element count.
        byte_len: usize,
        /// Current size of engine memory in bytes.
        memory_len: usize,
    },
    /// The engine reported an offset not aligned to the element size.
    Misaligned {
        /// The array name.
        array: String,
        /// Reported byte offset.
        byte_offset: usize,
        /// Required alignment in bytes.
        align: usize,
    },
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedArrayExport { export } => {
                write!(f, "malformed array export '{export}'")
            }
            Self::UnknownElementType { array, tag } => {
                write!(f, "array '{array}' has unknown element type '{tag}'")
            }
            Self::MissingOffsetAccessor { array } => {
                write!(f, "array '{array}' has no offset export '_get_{array}'")
            }
            Self::UnresolvableExport { export } => {
                write!(f, "export '{export}' is listed but cannot be resolved")
            }
            Self::DuplicateArray { array } => write!(f, "array '{array}' is exported twice"),
            Self::UnknownArray { name } => write!(f, "unknown array '{name}'"),
            Self::UnknownArrayId { id } => write!(f, "unknown array id {id}"),
            Self::ElementTypeMismatch {
                array,
                declared,
                requested,
            } => write!(
                f,
                "array '{array}' holds {declared} elements, requested {requested}"
            ),
            Self::OutOfBounds {
                array,
                byte_offset,
                byte_len,
                memory_len,
            } => write!(
                f,
                "array '{array}' at offset {byte_offset} with {byte_len} bytes \
                 exceeds engine memory of {memory_len} bytes"
            ),
            Self::Misaligned {
                array,
                byte_offset,
                align,
            } => write!(
                f,
                "array '{array}' offset {byte_offset} is not {align}-byte aligned"
            ),
        }
    }
}

impl Error for BindError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_array() {
        let err = BindError::ElementTypeMismatch {
            array: "luts".into(),
            declared: ElementType::U64,
            requested: ElementType::U32,
        };
        assert_eq!(
            err.to_string(),
            "array 'luts' holds uint64_t elements, requested uint32_t"
        );
    }

    #[test]
    fn out_of_bounds_reports_sizes() {
        let err = BindError::OutOfBounds {
            array: "state".into(),
            byte_offset: 64,
            byte_len: 128,
            memory_len: 100,
        };
        let msg = err.to_string();
        assert!(msg.contains("offset 64"));
        assert!(msg.contains("128 bytes"));
        assert!(msg.contains("100 bytes"));
    }
}
