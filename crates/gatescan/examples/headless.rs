//! Headless gatescan run: load a circuit, render one frame, print stats.
//!
//! Demonstrates:
//!   1. Parsing a circuit description
//!   2. Building a Session over an engine
//!   3. Stepping into a FrameBuffer until a frame completes
//!   4. Reading metrics and the state texture
//!
//! The engine here is the in-tree mock, scripted to emit VGA sync
//! pulses. Swap in a real `Engine` implementation to run a compiled
//! circuit.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example headless

use gatescan::prelude::*;
use gatescan_test_utils::fixtures::{self, vga_circuit_json, vga_engine, TableData};
use gatescan_test_utils::SyncPattern;
use log::info;

// ─── Timing ─────────────────────────────────────────────────────

// Cycles per scanline and scanlines per frame, scaled down from the
// real 800x525 timing so the mock finishes instantly.
const LINE_HIGH: u64 = 40;
const LINE_LOW: u64 = 8;
const FRAME_HIGH: u64 = 2 * (LINE_HIGH + LINE_LOW);
const FRAME_LOW: u64 = 60 * (LINE_HIGH + LINE_LOW);

const STEP_BUDGET: u64 = 100_000;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let script = SyncPattern::hsync(fixtures::HSYNC, LINE_HIGH, LINE_LOW)
        .with_vsync(fixtures::VSYNC, FRAME_HIGH, FRAME_LOW)
        .waves_per_cycle(3);
    let luts: Vec<u64> = (0..64).map(|i| i * 0x9e37_79b9).collect();
    let json = vga_circuit_json(&[("luts", TableData::Uint64(luts.clone()))]);
    let desc = CircuitDescription::from_json(&json)?;

    let config = RasterConfig::default();
    let mut frame = FrameBuffer::for_config(&config);
    let mut session = Session::new(
        vga_engine(luts.len(), script),
        &desc,
        config,
        &LoadOptions::default(),
    )?;
    info!(
        "loaded {} gates in {} settle passes",
        session.load_report().gate_count,
        session.load_report().settle_passes
    );

    // Light a couple of colour outputs so the frame is not all black.
    let engine = session.binder_mut().engine_mut();
    engine.set_state(fixtures::R1, 1);
    engine.set_state(fixtures::G0, 1);

    let outcome = session.run_until(&mut frame, STEP_BUDGET, |s| s.metrics().frames >= 1)?;
    if !outcome.reached {
        info!("no frame within {STEP_BUDGET} steps");
    }

    let m = session.metrics();
    println!("steps:          {}", m.steps);
    println!("cycles:         {}", m.cycles);
    println!("cycle ratio:    {:.3}", m.cycle_ratio());
    println!("pixels written: {}", m.pixels_written);
    println!("pixels clipped: {}", m.pixels_clipped);
    println!("rows flushed:   {}", m.rows_flushed);
    println!("rows stored:    {}", frame.rows_stored());
    println!("rows dropped:   {}", frame.rows_dropped());
    println!("cursor:         {}", session.cursor());

    if let Some((layout, texels)) = session.state_texture()? {
        let lit = texels.iter().filter(|&&v| v != 0).count();
        println!(
            "state texture:  {}x{} ({lit} lit)",
            layout.width, layout.height
        );
    }
    Ok(())
}
