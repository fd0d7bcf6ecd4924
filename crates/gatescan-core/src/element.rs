//! Element types of engine-exported arrays.
//!
//! Each array export carries a type tag in its name (the C type the
//! engine was compiled with). [`ElementType`] is the parsed tag;
//! [`Element`] links a Rust scalar type to its tag so typed views can
//! be checked against the schema.

use std::fmt;

/// Element type of an engine array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// Unsigned byte (`uint8_t`).
    U8,
    /// 32-bit float (`float`).
    F32,
    /// Signed 32-bit integer (`int`).
    I32,
    /// Unsigned 32-bit integer (`uint32_t`).
    U32,
    /// Unsigned 64-bit integer (`uint64_t`).
    U64,
}

impl ElementType {
    /// All element types, in tag order.
    pub const ALL: [ElementType; 5] = [Self::U8, Self::F32, Self::I32, Self::U32, Self::U64];

    /// Parse the type tag that follows the `__` separator in a length export.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "uint8_t" => Some(Self::U8),
            "float" => Some(Self::F32),
            "int" => Some(Self::I32),
            "uint32_t" => Some(Self::U32),
            "uint64_t" => Some(Self::U64),
            _ => None,
        }
    }

    /// The type tag as it appears in export names.
    pub fn tag(self) -> &'static str {
        match self {
            Self::U8 => "uint8_t",
            Self::F32 => "float",
            Self::I32 => "int",
            Self::U32 => "uint32_t",
            Self::U64 => "uint64_t",
        }
    }

    /// Size of one element in bytes.
    pub fn size_bytes(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::F32 | Self::I32 | Self::U32 => 4,
            Self::U64 => 8,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for f32 {}
    impl Sealed for i32 {}
    impl Sealed for u32 {}
    impl Sealed for u64 {}
}

/// A Rust scalar that can back an engine array view.
///
/// Sealed: implemented exactly for the five element types an engine
/// may export.
pub trait Element: bytemuck::Pod + sealed::Sealed {
    /// The element type tag this Rust type corresponds to.
    const TYPE: ElementType;
}

impl Element for u8 {
    const TYPE: ElementType = ElementType::U8;
}

impl Element for f32 {
    const TYPE: ElementType = ElementType::F32;
}

impl Element for i32 {
    const TYPE: ElementType = ElementType::I32;
}

impl Element for u32 {
    const TYPE: ElementType = ElementType::U32;
}

impl Element for u64 {
    const TYPE: ElementType = ElementType::U64;
}
