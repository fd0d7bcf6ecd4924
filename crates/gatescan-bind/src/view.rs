//! Borrowed views of engine arrays whose element type is only known at
//! runtime.

use gatescan_core::ElementType;

/// A borrowed engine array, tagged with its element type.
///
/// Returned by [`Binder::read_untyped`](crate::Binder::read_untyped) for
/// callers that pass arrays through without interpreting them (texture
/// uploads, dumps). Typed callers should prefer
/// [`Binder::read`](crate::Binder::read).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ArrayData<'a> {
    /// `uint8_t` elements.
    U8(&'a [u8]),
    /// `float` elements.
    F32(&'a [f32]),
    /// `int` elements.
    I32(&'a [i32]),
    /// `uint32_t` elements.
    U32(&'a [u32]),
    /// `uint64_t` elements.
    U64(&'a [u64]),
}

impl<'a> ArrayData<'a> {
    /// Reinterpret raw bytes as an array of `element`.
    ///
    /// Returns `None` if the bytes are misaligned or not a whole number
    /// of elements.
    pub fn from_bytes(element: ElementType, bytes: &'a [u8]) -> Option<Self> {
        Some(match element {
            ElementType::U8 => Self::U8(bytes),
            ElementType::F32 => Self::F32(bytemuck::try_cast_slice(bytes).ok()?),
            ElementType::I32 => Self::I32(bytemuck::try_cast_slice(bytes).ok()?),
            ElementType::U32 => Self::U32(bytemuck::try_cast_slice(bytes).ok()?),
            ElementType::U64 => Self::U64(bytemuck::try_cast_slice(bytes).ok()?),
        })
    }

    /// Element type of the array.
    pub fn element(&self) -> ElementType {
        match self {
            Self::U8(_) => ElementType::U8,
            Self::F32(_) => ElementType::F32,
            Self::I32(_) => ElementType::I32,
            Self::U32(_) => ElementType::U32,
            Self::U64(_) => ElementType::U64,
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            Self::U8(s) => s.len(),
            Self::F32(s) => s.len(),
            Self::I32(s) => s.len(),
            Self::U32(s) => s.len(),
            Self::U64(s) => s.len(),
        }
    }

    /// Whether the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The underlying bytes, in engine (little-endian) order.
    pub fn as_bytes(&self) -> &'a [u8] {
        match *self {
            Self::U8(s) => s,
            Self::F32(s) => bytemuck::cast_slice(s),
            Self::I32(s) => bytemuck::cast_slice(s),
            Self::U32(s) => bytemuck::cast_slice(s),
            Self::U64(s) => bytemuck::cast_slice(s),
        }
    }
}
