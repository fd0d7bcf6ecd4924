//! Gate table payload decoding.
//!
//! Payloads are standard base64 of little-endian 32- or 64-bit words.
//! Decoding is independent of host byte order.

use base64::Engine as _;

use gatescan_core::ElementType;

use crate::description::{GateDtype, GateTable};
use crate::error::PayloadError;

/// Decoded gate table words.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableWords {
    /// Words of a `uint32` table.
    U32(Vec<u32>),
    /// Words of a `uint64` table.
    U64(Vec<u64>),
}

impl TableWords {
    /// Element count.
    pub fn len(&self) -> usize {
        match self {
            Self::U32(w) => w.len(),
            Self::U64(w) => w.len(),
        }
    }

    /// Whether the table has no words.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Engine element type of the words.
    pub fn element(&self) -> ElementType {
        match self {
            Self::U32(_) => ElementType::U32,
            Self::U64(_) => ElementType::U64,
        }
    }
}

/// Decode one gate table from its description entry.
///
/// If the entry declares `len`, it must match the decoded element count.
pub fn decode(name: &str, table: &GateTable) -> Result<TableWords, PayloadError> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(table.data.as_bytes())
        .map_err(|e| PayloadError::Base64 {
            table: name.to_string(),
            reason: e.to_string(),
        })?;

    let width = table.dtype.width();
    if bytes.len() % width != 0 {
        return Err(PayloadError::Truncated {
            table: name.to_string(),
            byte_len: bytes.len(),
            width,
        });
    }

    let words = match table.dtype {
        GateDtype::Uint32 => TableWords::U32(
            bytes
                .chunks_exact(4)
                .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        ),
        GateDtype::Uint64 => TableWords::U64(
            bytes
                .chunks_exact(8)
                .map(|c| u64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
                .collect(),
        ),
    };

    if let Some(declared) = table.len {
        if declared as usize != words.len() {
            return Err(PayloadError::LenMismatch {
                table: name.to_string(),
                declared,
                decoded: words.len(),
            });
        }
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(dtype: GateDtype, len: Option<u32>, data: &str) -> GateTable {
        GateTable {
            dtype,
            len,
            data: data.to_string(),
        }
    }

    #[test]
    fn uint32_words_are_little_endian() {
        // 01 00 00 00 | 00 01 00 00
        let words = decode("dffs", &entry(GateDtype::Uint32, Some(2), "AQAAAAABAAA=")).unwrap();
        assert_eq!(words, TableWords::U32(vec![1, 256]));
    }

    #[test]
    fn uint64_words_are_little_endian() {
        // ff 00 00 00 00 00 00 80
        let words = decode("luts", &entry(GateDtype::Uint64, None, "/wAAAAAAAIA=")).unwrap();
        assert_eq!(words, TableWords::U64(vec![0x8000_0000_0000_00ff]));
        assert_eq!(words.element(), ElementType::U64);
    }

    #[test]
    fn empty_payload_is_empty_table() {
        let words = decode("luts", &entry(GateDtype::Uint64, Some(0), "")).unwrap();
        assert!(words.is_empty());
    }

    #[test]
    fn partial_word_is_rejected() {
        // six bytes
        let err = decode("dffs", &entry(GateDtype::Uint32, None, "AAAAAAAA")).unwrap_err();
        assert_eq!(
            err,
            PayloadError::Truncated {
                table: "dffs".into(),
                byte_len: 6,
                width: 4,
            }
        );
    }

    #[test]
    fn bad_base64_is_rejected() {
        let err = decode("luts", &entry(GateDtype::Uint64, None, "not base64!")).unwrap_err();
        assert!(matches!(err, PayloadError::Base64 { .. }));
    }

    #[test]
    fn declared_len_must_match() {
        let err = decode("dffs", &entry(GateDtype::Uint32, Some(3), "AQAAAAABAAA=")).unwrap_err();
        assert_eq!(
            err,
            PayloadError::LenMismatch {
                table: "dffs".into(),
                declared: 3,
                decoded: 2,
            }
        );
    }

    mod proptests {
        use super::*;
        use base64::Engine as _;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn whole_words_decode_and_partial_words_fail(
                bytes in prop::collection::vec(any::<u8>(), 0..96),
            ) {
                let data = base64::engine::general_purpose::STANDARD.encode(&bytes);
                let result = decode("luts", &entry(GateDtype::Uint64, None, &data));
                if bytes.len() % 8 == 0 {
                    prop_assert_eq!(result.unwrap().len(), bytes.len() / 8);
                } else {
                    let is_truncated = matches!(result, Err(PayloadError::Truncated { .. }));
                    prop_assert!(is_truncated);
                }
            }
        }
    }
}
