//! The cycle stepper: clock/reset drive and scan conversion.
//!
//! Each [`CycleStepper::step`] call makes one propagation attempt:
//!
//! ```text
//! sample hsync/vsync ─▶ drive clk, rst_n ─▶ run_wave ─▶ done?
//!                                                        │
//!        ┌───────────────── done && clk == 1 ◀───────────┘
//!        ▼
//!   write pixel at x, x += 1
//!        │
//!   hsync 1→0 ─▶ x = 0, y += 1, flush row y - origin
//!   vsync 1→0 ─▶ x = 0, y = 0
//! ```
//!
//! Edges are detected against levels sampled before the clock is
//! driven, so a call performs at most one pixel write and at most one
//! row flush.

use std::fmt;

use log::trace;

use gatescan_bind::Binder;
use gatescan_core::{ArrayId, BindError, Engine, PinId, TickId};

use crate::config::{ConfigError, RasterConfig};
use crate::metrics::RasterMetrics;
use crate::pins::RasterPins;
use crate::row::{RowBuffer, RowSink};

/// Weight of a colour's most significant bit.
const HIGH_WEIGHT: u8 = 170;

/// Weight of a colour's least significant bit.
const LOW_WEIGHT: u8 = 85;

// ── Cursor ─────────────────────────────────────────────────────────

/// Raster position: column `x` within the row, scanline `y` since the
/// last vertical sync.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cursor {
    /// Column.
    pub x: usize,
    /// Scanline.
    pub y: usize,
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ── StepError ──────────────────────────────────────────────────────

/// Errors raised by [`CycleStepper::step`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepError {
    /// The engine reports its `state` array absent.
    StateUnavailable,
    /// A sampled pin lies past the end of the state array.
    PinOutOfRange {
        /// Highest pin index the stepper samples.
        index: usize,
        /// Length of the state array.
        state_len: usize,
    },
    /// The binding rejected the state access.
    Bind(BindError),
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StateUnavailable => write!(f, "engine state array is absent"),
            Self::PinOutOfRange { index, state_len } => write!(
                f,
                "pin index {index} is outside the state array ({state_len} signals)"
            ),
            Self::Bind(e) => write!(f, "binding error: {e}"),
        }
    }
}

impl std::error::Error for StepError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bind(e) => Some(e),
            _ => None,
        }
    }
}

impl From<BindError> for StepError {
    fn from(e: BindError) -> Self {
        Self::Bind(e)
    }
}

// ── Levels ─────────────────────────────────────────────────────────

/// Output levels sampled from the state array in one read.
#[derive(Clone, Copy)]
struct Levels {
    hsync: bool,
    vsync: bool,
    rgb: [u8; 3],
}

// ── CycleStepper ───────────────────────────────────────────────────

/// Drives the engine's clock and reset and scan-converts its video
/// outputs.
///
/// The stepper owns the raster cursor, the tick counter, and the
/// in-progress row; the engine stays with the [`Binder`] passed to each
/// call.
#[derive(Clone, Debug)]
pub struct CycleStepper {
    config: RasterConfig,
    pins: RasterPins,
    state: ArrayId,
    max_output_index: usize,
    cursor: Cursor,
    tick: TickId,
    row: RowBuffer,
    metrics: RasterMetrics,
}

impl CycleStepper {
    /// Build a stepper reading levels from the `state` array.
    ///
    /// Validates `config`. The cursor starts at
    /// [`initial_cursor`](RasterConfig::initial_cursor) and the tick at 0.
    pub fn new(config: RasterConfig, pins: RasterPins, state: ArrayId) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            cursor: config.initial_cursor,
            row: RowBuffer::new(config.width),
            max_output_index: pins.max_output_index(),
            config,
            pins,
            state,
            tick: TickId::default(),
            metrics: RasterMetrics::default(),
        })
    }

    /// Advance one propagation attempt.
    ///
    /// Returns whether the wave completed a cycle. Finished rows go to
    /// `sink` with their 1-based index relative to the visible origin:
    /// the row drawn on scanline `visible_origin_row` arrives as row 1.
    pub fn step<E: Engine, S: RowSink + ?Sized>(
        &mut self,
        binder: &mut Binder<E>,
        sink: &mut S,
    ) -> Result<bool, StepError> {
        let clk = self.tick.clock_phase();
        let rst_n = u8::from(self.tick.0 > self.config.reset_release_after);

        let before = self.sample(binder)?;

        binder.set_signal(self.pins.clk, clk);
        binder.set_signal(self.pins.rst_n, rst_n);
        let done = binder.run_wave() == 0;
        self.tick.0 += u64::from(done);

        let after = self.sample(binder)?;
        self.metrics.steps += 1;
        self.metrics.cycles += u64::from(done);

        if done && clk == 1 {
            if self.cursor.x < self.config.width {
                self.row.put(self.cursor.x, after.rgb);
                self.metrics.pixels_written += 1;
            } else {
                self.metrics.pixels_clipped += 1;
            }
            self.cursor.x += 1;
        }

        if before.hsync && !after.hsync {
            self.cursor.x = 0;
            self.cursor.y += 1;
            let row = self.cursor.y as i64 - self.config.visible_origin_row as i64;
            sink.on_row(row, self.row.as_bytes());
            self.row.clear();
            self.metrics.rows_flushed += 1;
        }

        if before.vsync && !after.vsync {
            trace!(
                "vsync at tick {} after {} scanlines",
                self.tick,
                self.cursor.y
            );
            self.cursor = Cursor { x: 0, y: 0 };
            self.metrics.frames += 1;
        }

        Ok(done)
    }

    fn sample<E: Engine>(&self, binder: &mut Binder<E>) -> Result<Levels, StepError> {
        let state = binder
            .read::<u8>(self.state)?
            .ok_or(StepError::StateUnavailable)?;
        if self.max_output_index >= state.len() {
            return Err(StepError::PinOutOfRange {
                index: self.max_output_index,
                state_len: state.len(),
            });
        }
        let high = |pin: PinId| state[pin.index()] != 0;
        let channel = |msb: PinId, lsb: PinId| {
            u8::from(high(msb)) * HIGH_WEIGHT + u8::from(high(lsb)) * LOW_WEIGHT
        };
        let p = &self.pins;
        Ok(Levels {
            hsync: high(p.hsync),
            vsync: high(p.vsync),
            rgb: [channel(p.r1, p.r0), channel(p.g1, p.g0), channel(p.b1, p.b0)],
        })
    }

    // ── Accessors ───────────────────────────────────────────────

    /// Current raster position.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Completed cycles so far.
    pub fn tick(&self) -> TickId {
        self.tick
    }

    /// The in-progress row.
    pub fn row(&self) -> &RowBuffer {
        &self.row
    }

    /// Cumulative counters.
    pub fn metrics(&self) -> &RasterMetrics {
        &self.metrics
    }

    /// The configuration this stepper was built with.
    pub fn config(&self) -> &RasterConfig {
        &self.config
    }

    /// The resolved pins.
    pub fn pins(&self) -> &RasterPins {
        &self.pins
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatescan_circuit::PinMap;
    use gatescan_test_utils::fixtures::{self, vga_engine, VGA_PINS};
    use gatescan_test_utils::{MockEngine, SyncPattern, TraceEntry, TraceScript, WaveScript};

    fn setup(script: impl WaveScript + 'static) -> (Binder<MockEngine>, CycleStepper) {
        let binder = Binder::bind(vga_engine(1, script)).unwrap();
        let map: PinMap = VGA_PINS
            .iter()
            .map(|&(name, index)| (name.to_string(), PinId(index)))
            .collect();
        let config = RasterConfig::default();
        let pins = RasterPins::resolve(&map, &config).unwrap();
        let state = binder.array_id("state").unwrap();
        let stepper = CycleStepper::new(config, pins, state).unwrap();
        (binder, stepper)
    }

    fn entry(pending: u32, hsync: u8, vsync: u8) -> TraceEntry {
        TraceEntry {
            pending,
            hsync,
            vsync,
        }
    }

    #[test]
    fn reset_is_held_through_tick_nine() {
        let (mut b, mut s) = setup(gatescan_test_utils::Settled);
        let mut rst = Vec::new();
        for _ in 0..12 {
            s.step(&mut b, &mut crate::NoopSink).unwrap();
            rst.push(b.engine().state()[fixtures::RST_N.index()]);
        }
        // ticks 0..=9 hold reset, release from tick 10
        assert_eq!(rst, [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1]);
    }

    #[test]
    fn clock_follows_tick_parity() {
        let trace = vec![entry(1, 0, 0), entry(0, 0, 0)];
        let (mut b, mut s) = setup(TraceScript::new(fixtures::HSYNC, fixtures::VSYNC, trace));
        let mut clk = Vec::new();
        for _ in 0..6 {
            s.step(&mut b, &mut crate::NoopSink).unwrap();
            clk.push(b.engine().state()[fixtures::CLK.index()]);
        }
        // clk only toggles after a completed cycle
        assert_eq!(clk, [0, 0, 1, 1, 0, 0]);
        assert_eq!(s.tick(), TickId(3));
    }

    #[test]
    fn pixel_is_written_only_on_completed_rising_clock() {
        let (mut b, mut s) = setup(gatescan_test_utils::Settled);
        b.engine_mut().set_state(fixtures::R1, 1);
        b.engine_mut().set_state(fixtures::G0, 1);

        // tick 0: clk = 0, completes, no pixel
        s.step(&mut b, &mut crate::NoopSink).unwrap();
        assert_eq!(s.cursor().x, 44);
        // tick 1: clk = 1, completes, pixel at x = 44
        s.step(&mut b, &mut crate::NoopSink).unwrap();
        assert_eq!(s.cursor().x, 45);
        let px = &s.row().as_bytes()[44 * 4..45 * 4];
        assert_eq!(px, &[170, 85, 0, 0]);
        assert_eq!(s.metrics().pixels_written, 1);
    }

    #[test]
    fn incomplete_wave_writes_nothing() {
        let trace = vec![entry(3, 0, 0)];
        let (mut b, mut s) = setup(TraceScript::new(fixtures::HSYNC, fixtures::VSYNC, trace));
        for _ in 0..5 {
            assert!(!s.step(&mut b, &mut crate::NoopSink).unwrap());
        }
        assert_eq!(s.tick(), TickId(0));
        assert_eq!(s.cursor(), Cursor { x: 44, y: 33 });
        assert_eq!(s.metrics().pixels_written, 0);
    }

    #[test]
    fn falling_hsync_flushes_and_clears_row() {
        let trace = vec![entry(0, 1, 0), entry(0, 0, 0)];
        let (mut b, mut s) = setup(TraceScript::new(fixtures::HSYNC, fixtures::VSYNC, trace));
        b.engine_mut().set_state(fixtures::B1, 1);
        let mut rows = Vec::new();
        let mut sink = |row: i64, px: &[u8]| rows.push((row, px[44 * 4 + 2]));

        s.step(&mut b, &mut sink).unwrap(); // hsync 0 -> 1
        assert_eq!(s.cursor().x, 44);
        s.step(&mut b, &mut sink).unwrap(); // clk 1 pixel, hsync 1 -> 0
        assert_eq!(s.cursor(), Cursor { x: 0, y: 34 });
        assert!(s.row().as_bytes().iter().all(|&v| v == 0));
        assert_eq!(rows, [(1, 170)]);
    }

    #[test]
    fn row_above_origin_arrives_as_row_zero() {
        let trace = vec![entry(0, 1, 0), entry(0, 0, 0)];
        let (mut b, mut s) = setup(TraceScript::new(fixtures::HSYNC, fixtures::VSYNC, trace));
        s.cursor.y = s.config.visible_origin_row - 1;
        let mut rows = Vec::new();
        let mut sink = |row: i64, _: &[u8]| rows.push(row);
        s.step(&mut b, &mut sink).unwrap();
        s.step(&mut b, &mut sink).unwrap();
        assert_eq!(rows, [0]);
        assert_eq!(s.cursor().y, 33);
    }

    #[test]
    fn falling_vsync_resets_cursor() {
        let trace = vec![entry(0, 0, 1), entry(0, 0, 0)];
        let (mut b, mut s) = setup(TraceScript::new(fixtures::HSYNC, fixtures::VSYNC, trace));
        s.step(&mut b, &mut crate::NoopSink).unwrap();
        s.step(&mut b, &mut crate::NoopSink).unwrap();
        assert_eq!(s.cursor(), Cursor::default());
        assert_eq!(s.metrics().frames, 1);
    }

    #[test]
    fn hsync_and_vsync_falling_together_flush_then_reset() {
        let trace = vec![entry(0, 1, 1), entry(0, 0, 0)];
        let (mut b, mut s) = setup(TraceScript::new(fixtures::HSYNC, fixtures::VSYNC, trace));
        let mut rows = Vec::new();

        s.step(&mut b, &mut |row: i64, _: &[u8]| rows.push(row)).unwrap(); // both rise
        assert!(rows.is_empty());
        s.step(&mut b, &mut |row: i64, _: &[u8]| rows.push(row)).unwrap(); // both fall
        assert_eq!(rows, [1]);
        assert_eq!(s.metrics().rows_flushed, 1);
        assert_eq!(s.metrics().frames, 1);
        assert_eq!(s.cursor(), Cursor { x: 0, y: 0 });
    }

    #[test]
    fn pixels_past_right_edge_are_clipped() {
        let (mut b, mut s) = setup(gatescan_test_utils::Settled);
        s.cursor.x = s.config.width;
        s.tick = TickId(1);
        s.step(&mut b, &mut crate::NoopSink).unwrap();
        assert_eq!(s.cursor().x, s.config.width + 1);
        assert_eq!(s.metrics().pixels_clipped, 1);
        assert_eq!(s.metrics().pixels_written, 0);
    }

    #[test]
    fn absent_state_is_an_error() {
        let engine = MockEngine::builder()
            .absent("state", gatescan_core::ElementType::U8)
            .build();
        let mut b = Binder::bind(engine).unwrap();
        let map: PinMap = VGA_PINS
            .iter()
            .map(|&(name, index)| (name.to_string(), PinId(index)))
            .collect();
        let config = RasterConfig::default();
        let pins = RasterPins::resolve(&map, &config).unwrap();
        let state = b.array_id("state").unwrap();
        let mut s = CycleStepper::new(config, pins, state).unwrap();
        assert_eq!(
            s.step(&mut b, &mut crate::NoopSink).unwrap_err(),
            StepError::StateUnavailable
        );
    }

    #[test]
    fn short_state_array_is_an_error() {
        let engine = MockEngine::builder()
            .array("state", gatescan_core::ElementType::U8, 4)
            .build();
        let mut b = Binder::bind(engine).unwrap();
        let map: PinMap = VGA_PINS
            .iter()
            .map(|&(name, index)| (name.to_string(), PinId(index)))
            .collect();
        let config = RasterConfig::default();
        let pins = RasterPins::resolve(&map, &config).unwrap();
        let state = b.array_id("state").unwrap();
        let mut s = CycleStepper::new(config, pins, state).unwrap();
        assert_eq!(
            s.step(&mut b, &mut crate::NoopSink).unwrap_err(),
            StepError::PinOutOfRange {
                index: 9,
                state_len: 4
            }
        );
    }

    #[test]
    fn sync_pattern_with_multi_wave_cycles() {
        let script = SyncPattern::hsync(fixtures::HSYNC, 2, 2).waves_per_cycle(3);
        let (mut b, mut s) = setup(script);
        let mut rows = 0;
        let mut sink = |_: i64, _: &[u8]| rows += 1;
        for _ in 0..(4 * 3 * 2) {
            s.step(&mut b, &mut sink).unwrap();
        }
        assert_eq!(rows, 2);
        assert_eq!(s.tick(), TickId(8));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn trace_strategy() -> impl Strategy<Value = Vec<TraceEntry>> {
            prop::collection::vec((0u32..3, 0u8..2, 0u8..2), 1..24).prop_map(|v| {
                v.into_iter()
                    .map(|(pending, hsync, vsync)| TraceEntry {
                        pending,
                        hsync,
                        vsync,
                    })
                    .collect()
            })
        }

        proptest! {
            #[test]
            fn tick_never_decreases_and_moves_by_at_most_one(
                trace in trace_strategy(),
                steps in 1usize..200,
            ) {
                let (mut b, mut s) =
                    setup(TraceScript::new(fixtures::HSYNC, fixtures::VSYNC, trace));
                let mut flushes = 0u64;
                for _ in 0..steps {
                    let before = s.tick();
                    let rows_before = s.metrics().rows_flushed;
                    let done = s.step(&mut b, &mut crate::NoopSink).unwrap();
                    let after = s.tick();
                    prop_assert!(after >= before);
                    prop_assert_eq!(after.0 - before.0, u64::from(done));
                    prop_assert!(s.metrics().rows_flushed - rows_before <= 1);
                    flushes = s.metrics().rows_flushed;
                }
                prop_assert!(flushes <= steps as u64);
            }

            #[test]
            fn cursor_x_is_zero_after_every_flush(trace in trace_strategy()) {
                let (mut b, mut s) =
                    setup(TraceScript::new(fixtures::HSYNC, fixtures::VSYNC, trace));
                for _ in 0..100 {
                    let rows_before = s.metrics().rows_flushed;
                    s.step(&mut b, &mut crate::NoopSink).unwrap();
                    if s.metrics().rows_flushed > rows_before {
                        prop_assert_eq!(s.cursor().x, 0);
                    }
                }
            }
        }
    }
}
