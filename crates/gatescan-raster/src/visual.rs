//! Texture packing for circuit visualization.
//!
//! Renderers sample per-unit arrays (`state`, `heat`) as 2D textures of
//! a fixed width. These helpers compute the grid and pad the data; the
//! rendering itself happens elsewhere.

use std::num::NonZeroUsize;

/// Default texture width in texels.
pub const TEXTURE_WIDTH: usize = 256;

/// Dimensions of a packed texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextureLayout {
    /// Texels per row.
    pub width: usize,
    /// Rows.
    pub height: usize,
    /// Values per texel.
    pub channels: usize,
}

impl TextureLayout {
    /// Grid for `texels` texels at [`TEXTURE_WIDTH`].
    pub fn for_len(texels: usize, channels: usize) -> Self {
        Self {
            width: TEXTURE_WIDTH,
            height: texels.div_ceil(TEXTURE_WIDTH),
            channels,
        }
    }

    /// Grid for `texels` texels at a custom width.
    pub fn with_width(texels: usize, channels: usize, width: NonZeroUsize) -> Self {
        Self {
            width: width.get(),
            height: texels.div_ceil(width.get()),
            channels,
        }
    }

    /// Texels in the full grid.
    pub fn texel_count(&self) -> usize {
        self.width * self.height
    }

    /// Values in the full grid.
    pub fn value_count(&self) -> usize {
        self.texel_count() * self.channels
    }
}

/// Copy `data` into a zero-padded buffer filling `layout`.
///
/// Values beyond the grid are dropped.
pub fn pack_texture<T: Copy + Default>(data: &[T], layout: &TextureLayout) -> Vec<T> {
    let mut out = vec![T::default(); layout.value_count()];
    let n = data.len().min(out.len());
    out[..n].copy_from_slice(&data[..n]);
    out
}
