//! Generation-tagged view handles.
//!
//! A [`ViewHandle`] records where an array lived in engine memory when it
//! was last resolved. It is generation-scoped: comparing its generation
//! with the engine's current [`MemoryGeneration`] is an O(1) staleness
//! check that needs no engine calls.

use std::fmt;
use std::ops::Range;

use gatescan_core::{BindError, ElementType, MemoryGeneration};

use crate::schema::ArraySchema;

/// Location of an array within one generation of engine memory.
///
/// Handles never own data. They are rebuilt whenever the engine replaces
/// its memory buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct ViewHandle {
    /// Memory generation this handle was resolved against.
    pub(crate) generation: MemoryGeneration,
    /// Byte offset of the first element.
    pub(crate) byte_offset: usize,
    /// Length in elements.
    pub(crate) len: usize,
    /// Element type of the array.
    pub(crate) element: ElementType,
}

impl ViewHandle {
    /// Validate an engine-reported region and build a handle for it.
    ///
    /// `memory` is the engine's buffer for `generation`. Regions that
    /// overflow the buffer or sit at a misaligned address are contract
    /// violations.
    pub(crate) fn resolve(
        array: &ArraySchema,
        generation: MemoryGeneration,
        byte_offset: usize,
        len: usize,
        memory: &[u8],
    ) -> Result<Self, BindError> {
        let size = array.element.size_bytes();
        let out_of_bounds = |byte_len: usize| BindError::OutOfBounds {
            array: array.name.clone(),
            byte_offset,
            byte_len,
            memory_len: memory.len(),
        };
        let byte_len = len.checked_mul(size).ok_or_else(|| out_of_bounds(usize::MAX))?;
        let end = byte_offset
            .checked_add(byte_len)
            .ok_or_else(|| out_of_bounds(byte_len))?;
        if end > memory.len() {
            return Err(out_of_bounds(byte_len));
        }
        let address = (memory.as_ptr() as usize).wrapping_add(byte_offset);
        if address % size != 0 {
            return Err(BindError::Misaligned {
                array: array.name.clone(),
                byte_offset,
                align: size,
            });
        }
        Ok(Self {
            generation,
            byte_offset,
            len,
            element: array.element,
        })
    }

    /// The memory generation this handle belongs to.
    pub fn generation(&self) -> MemoryGeneration {
        self.generation
    }

    /// Whether the handle still aliases the engine's current buffer.
    pub fn is_current(&self, generation: MemoryGeneration) -> bool {
        self.generation == generation
    }

    /// Byte offset of the first element.
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    /// Length in elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the view has no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Element type of the array.
    pub fn element(&self) -> ElementType {
        self.element
    }

    /// Length in bytes.
    pub fn byte_len(&self) -> usize {
        self.len * self.element.size_bytes()
    }

    /// Byte range of the array within engine memory.
    pub fn byte_range(&self) -> Range<usize> {
        self.byte_offset..self.byte_offset + self.byte_len()
    }
}

impl fmt::Display for ViewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ViewHandle(gen={}, off={}, len={}, {})",
            self.generation, self.byte_offset, self.len, self.element
        )
    }
}
