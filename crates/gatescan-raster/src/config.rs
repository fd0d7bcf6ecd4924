//! Raster configuration, validation, and error types.
//!
//! [`RasterConfig`] replaces the loose frame constants of a hard-wired
//! VGA decoder with one immutable value passed at construction.
//! [`validate()`](RasterConfig::validate) checks it before the first step.

use std::error::Error;
use std::fmt;

use crate::stepper::Cursor;

// ── OutputLayout ───────────────────────────────────────────────────

/// Bit positions of the video signals within the output bus.
///
/// Each field is an index into the bus (`uo_out[i]`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputLayout {
    /// Red, most significant bit.
    pub r1: usize,
    /// Green, most significant bit.
    pub g1: usize,
    /// Blue, most significant bit.
    pub b1: usize,
    /// Vertical sync.
    pub vsync: usize,
    /// Red, least significant bit.
    pub r0: usize,
    /// Green, least significant bit.
    pub g0: usize,
    /// Blue, least significant bit.
    pub b0: usize,
    /// Horizontal sync.
    pub hsync: usize,
}

impl OutputLayout {
    /// Width of the output bus.
    pub const BUS_WIDTH: usize = 8;

    /// The TinyVGA PMOD ordering: `[R1, G1, B1, vsync, R0, G0, B0, hsync]`.
    pub const fn tiny_vga() -> Self {
        Self {
            r1: 0,
            g1: 1,
            b1: 2,
            vsync: 3,
            r0: 4,
            g0: 5,
            b0: 6,
            hsync: 7,
        }
    }

    /// `(signal name, bus bit)` for every field.
    pub fn bits(&self) -> [(&'static str, usize); 8] {
        [
            ("r1", self.r1),
            ("g1", self.g1),
            ("b1", self.b1),
            ("vsync", self.vsync),
            ("r0", self.r0),
            ("g0", self.g0),
            ("b0", self.b0),
            ("hsync", self.hsync),
        ]
    }
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self::tiny_vga()
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected by [`RasterConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Frame width or height is zero.
    ZeroDimension {
        /// `"width"` or `"height"`.
        which: &'static str,
    },
    /// The visible origin row lies outside the frame.
    OriginOutOfFrame {
        /// Configured origin row.
        origin: usize,
        /// Frame height.
        height: usize,
    },
    /// A layout bit does not fit in the output bus.
    LayoutBitOutOfRange {
        /// Signal name.
        signal: &'static str,
        /// Configured bit.
        bit: usize,
    },
    /// Two signals share one bus bit.
    LayoutBitReused {
        /// The shared bit.
        bit: usize,
    },
    /// A pin name is empty.
    EmptyPinName {
        /// Which pin setting.
        which: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDimension { which } => write!(f, "frame {which} must be non-zero"),
            Self::OriginOutOfFrame { origin, height } => write!(
                f,
                "visible origin row {origin} is outside a frame of height {height}"
            ),
            Self::LayoutBitOutOfRange { signal, bit } => write!(
                f,
                "{signal} mapped to bus bit {bit}, bus is {} bits wide",
                OutputLayout::BUS_WIDTH
            ),
            Self::LayoutBitReused { bit } => write!(f, "bus bit {bit} mapped more than once"),
            Self::EmptyPinName { which } => write!(f, "{which} pin name is empty"),
        }
    }
}

impl Error for ConfigError {}

// ── RasterConfig ───────────────────────────────────────────────────

/// Frame geometry, reset timing, and pin naming for the cycle stepper.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterConfig {
    /// Frame width in pixels. Default: 736 (640 visible plus 48 each side).
    pub width: usize,
    /// Frame height in scanlines. Default: 576 (480 visible plus 48 each side).
    pub height: usize,
    /// Cursor position before the first step. Default: (44, 33).
    pub initial_cursor: Cursor,
    /// First visible scanline; the row drawn on it reaches the sink as
    /// row 1. Default: 33.
    pub visible_origin_row: usize,
    /// Reset is held low while `tick <= reset_release_after`. Default: 9.
    pub reset_release_after: u64,
    /// Clock pin name. Default: `"clk"`.
    pub clock_pin: String,
    /// Active-low reset pin name. Default: `"rst_n"`.
    pub reset_pin: String,
    /// Output bus name; bits are looked up as `name[i]`. Default: `"uo_out"`.
    pub output_bus: String,
    /// Signal positions within the output bus.
    pub layout: OutputLayout,
}

impl RasterConfig {
    /// Border around the visible 640x480 area, in pixels.
    pub const DEFAULT_PAD: usize = 48;
    /// Default frame width.
    pub const DEFAULT_WIDTH: usize = 640 + 2 * Self::DEFAULT_PAD;
    /// Default frame height.
    pub const DEFAULT_HEIGHT: usize = 480 + 2 * Self::DEFAULT_PAD;
    /// Default starting cursor.
    pub const DEFAULT_INITIAL_CURSOR: Cursor = Cursor { x: 44, y: 33 };
    /// Default visible origin row.
    pub const DEFAULT_VISIBLE_ORIGIN_ROW: usize = 33;
    /// Default reset release tick.
    pub const DEFAULT_RESET_RELEASE_AFTER: u64 = 9;

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 {
            return Err(ConfigError::ZeroDimension { which: "width" });
        }
        if self.height == 0 {
            return Err(ConfigError::ZeroDimension { which: "height" });
        }
        if self.visible_origin_row >= self.height {
            return Err(ConfigError::OriginOutOfFrame {
                origin: self.visible_origin_row,
                height: self.height,
            });
        }
        let mut used = [false; OutputLayout::BUS_WIDTH];
        for (signal, bit) in self.layout.bits() {
            let slot = used
                .get_mut(bit)
                .ok_or(ConfigError::LayoutBitOutOfRange { signal, bit })?;
            if *slot {
                return Err(ConfigError::LayoutBitReused { bit });
            }
            *slot = true;
        }
        for (which, name) in [
            ("clock", &self.clock_pin),
            ("reset", &self.reset_pin),
            ("output bus", &self.output_bus),
        ] {
            if name.is_empty() {
                return Err(ConfigError::EmptyPinName { which });
            }
        }
        Ok(())
    }
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            initial_cursor: Self::DEFAULT_INITIAL_CURSOR,
            visible_origin_row: Self::DEFAULT_VISIBLE_ORIGIN_ROW,
            reset_release_after: Self::DEFAULT_RESET_RELEASE_AFTER,
            clock_pin: "clk".to_string(),
            reset_pin: "rst_n".to_string(),
            output_bus: "uo_out".to_string(),
            layout: OutputLayout::tiny_vga(),
        }
    }
}
