//! Benchmark profiles and utilities for gatescan.
//!
//! Provides pre-built sessions over the mock engine:
//!
//! - [`vga_session`]: tiny-VGA pinout with realistic sync timing
//! - [`lut_table`]: deterministic gate table contents
//! - [`vga_description`]: a description carrying one `luts` table

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use gatescan_circuit::{CircuitDescription, LoadError, LoadOptions};
use gatescan_raster::{RasterConfig, Session, SessionError};
use gatescan_test_utils::fixtures::{self, vga_circuit_json, vga_engine, TableData};
use gatescan_test_utils::{MockEngine, SyncPattern};

/// Visible pixels plus horizontal blanking for 640x480 VGA, in cycles.
pub const LINE_CYCLES: u64 = 800;
/// Lines per 640x480 VGA frame.
pub const FRAME_LINES: u64 = 525;
/// Width of the hsync pulse in cycles.
pub const HSYNC_PULSE: u64 = 96;
/// Width of the vsync pulse in lines.
pub const VSYNC_PULSE: u64 = 2;

/// Generate `n` deterministic LUT words from `seed`.
pub fn lut_table(n: usize, seed: u64) -> Vec<u64> {
    (0..n as u64)
        .map(|i| {
            seed.wrapping_mul(6364136223846793005)
                .wrapping_add(i.wrapping_mul(1442695040888963407))
        })
        .collect()
}

/// A tiny-VGA description whose `luts` table holds `luts`.
pub fn vga_description(luts: Vec<u64>) -> Result<CircuitDescription, LoadError> {
    CircuitDescription::from_json(&vga_circuit_json(&[("luts", TableData::Uint64(luts))]))
}

/// A loaded session with `lut_count` gates and 640x480 sync timing.
///
/// The mock needs `waves_per_cycle` propagation waves per clock cycle,
/// so `waves_per_cycle - 1` of every `waves_per_cycle` steps are
/// incomplete.
pub fn vga_session(
    lut_count: usize,
    waves_per_cycle: u32,
) -> Result<Session<MockEngine>, SessionError> {
    // hsync is active-low: high for the rest of the line, low for the pulse.
    let script = SyncPattern::hsync(fixtures::HSYNC, LINE_CYCLES - HSYNC_PULSE, HSYNC_PULSE)
        .with_vsync(
            fixtures::VSYNC,
            (FRAME_LINES - VSYNC_PULSE) * LINE_CYCLES,
            VSYNC_PULSE * LINE_CYCLES,
        )
        .waves_per_cycle(waves_per_cycle);
    let desc = vga_description(lut_table(lut_count, 42))?;
    Session::new(
        vga_engine(lut_count, script),
        &desc,
        RasterConfig::default(),
        &LoadOptions::default(),
    )
}
