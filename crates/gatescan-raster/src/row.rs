//! Scanline buffers and row sinks.
//!
//! The stepper assembles one scanline at a time in a [`RowBuffer`] and
//! hands each finished row to a [`RowSink`]. [`FrameBuffer`] is the
//! stock sink that keeps a whole RGBA frame.

use crate::config::RasterConfig;

/// Bytes per pixel (RGBA).
pub const CHANNELS: usize = 4;

// ── RowBuffer ──────────────────────────────────────────────────────

/// One in-progress scanline, `width` RGBA pixels.
///
/// Only the colour channels are written; alpha stays zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowBuffer {
    pixels: Vec<u8>,
}

impl RowBuffer {
    /// A cleared row of `width` pixels.
    pub fn new(width: usize) -> Self {
        Self {
            pixels: vec![0; width * CHANNELS],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.pixels.len() / CHANNELS
    }

    /// Set the colour of column `x`. Out-of-range columns are ignored.
    pub fn put(&mut self, x: usize, rgb: [u8; 3]) {
        let start = x * CHANNELS;
        if let Some(px) = self.pixels.get_mut(start..start + 3) {
            px.copy_from_slice(&rgb);
        }
    }

    /// The row as RGBA bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Zero every pixel.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }
}

// ── RowSink ────────────────────────────────────────────────────────

/// Receiver of completed scanlines.
///
/// `row` is the 1-based index of the finished scanline relative to the
/// visible origin: the scanline at the origin arrives as row 1, rows in
/// vertical blanking arrive as zero or negative.
pub trait RowSink {
    /// Called once per falling edge of hsync with the finished row.
    fn on_row(&mut self, row: i64, pixels: &[u8]);
}

impl<F: FnMut(i64, &[u8])> RowSink for F {
    fn on_row(&mut self, row: i64, pixels: &[u8]) {
        self(row, pixels)
    }
}

/// A sink that drops every row.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl RowSink for NoopSink {
    fn on_row(&mut self, _row: i64, _pixels: &[u8]) {}
}

// ── FrameBuffer ────────────────────────────────────────────────────

/// A whole RGBA frame, rebuilt row by row.
///
/// Row `r` is stored at scanline `r + origin - 1`, the scanline the
/// cursor was on while the row was drawn. Rows falling outside the frame
/// are counted and dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    origin: usize,
    pixels: Vec<u8>,
    rows_stored: u64,
    rows_dropped: u64,
}

impl FrameBuffer {
    /// A black frame.
    pub fn new(width: usize, height: usize, origin: usize) -> Self {
        Self {
            width,
            height,
            origin,
            pixels: vec![0; width * height * CHANNELS],
            rows_stored: 0,
            rows_dropped: 0,
        }
    }

    /// A frame sized for `config`.
    pub fn for_config(config: &RasterConfig) -> Self {
        Self::new(config.width, config.height, config.visible_origin_row)
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in scanlines.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The frame as RGBA bytes, top scanline first.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// One scanline, if inside the frame.
    pub fn scanline(&self, y: usize) -> Option<&[u8]> {
        let stride = self.width * CHANNELS;
        self.pixels.get(y * stride..(y + 1) * stride)
    }

    /// Rows stored so far.
    pub fn rows_stored(&self) -> u64 {
        self.rows_stored
    }

    /// Rows that fell outside the frame.
    pub fn rows_dropped(&self) -> u64 {
        self.rows_dropped
    }

    /// Copy the in-progress row into scanline `y`.
    ///
    /// Lets a display show the row currently being drawn before its
    /// hsync arrives.
    pub fn blit_partial(&mut self, y: usize, row: &RowBuffer) {
        self.store(y, row.as_bytes());
    }

    /// Black out the whole frame.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    fn store(&mut self, y: usize, pixels: &[u8]) -> bool {
        if y >= self.height {
            return false;
        }
        let stride = self.width * CHANNELS;
        let dst = &mut self.pixels[y * stride..(y + 1) * stride];
        let n = stride.min(pixels.len());
        dst[..n].copy_from_slice(&pixels[..n]);
        true
    }
}

impl RowSink for FrameBuffer {
    fn on_row(&mut self, row: i64, pixels: &[u8]) {
        let scanline = row
            .checked_add(self.origin as i64 - 1)
            .and_then(|y| usize::try_from(y).ok());
        match scanline {
            Some(y) if self.store(y, pixels) => self.rows_stored += 1,
            _ => self.rows_dropped += 1,
        }
    }
}
