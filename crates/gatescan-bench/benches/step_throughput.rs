//! Criterion benchmarks for stepping and scan conversion.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use gatescan_bench::{vga_session, LINE_CYCLES};
use gatescan_raster::{FrameBuffer, NoopSink, RasterConfig};

/// One step per cycle, discarding rows.
fn bench_step_noop(c: &mut Criterion) {
    let mut s = vga_session(4096, 1).unwrap();
    c.bench_function("step_noop", |b| {
        b.iter(|| black_box(s.step(&mut NoopSink).unwrap()));
    });
}

/// Three waves per cycle, so two of three steps return early.
fn bench_step_cycle_multiwave(c: &mut Criterion) {
    let mut s = vga_session(4096, 3).unwrap();
    c.bench_function("step_cycle_3_waves", |b| {
        b.iter(|| black_box(s.step_cycle(&mut NoopSink).unwrap()));
    });
}

/// A full scanline into a frame buffer.
fn bench_scanline_to_frame(c: &mut Criterion) {
    let mut s = vga_session(4096, 1).unwrap();
    let mut frame = FrameBuffer::for_config(&RasterConfig::default());
    c.bench_function("scanline_to_frame", |b| {
        b.iter(|| {
            for _ in 0..LINE_CYCLES {
                s.step(&mut frame).unwrap();
            }
            black_box(frame.rows_stored())
        });
    });
}

/// Session construction: bind, decode, copy, settle.
fn bench_session_load(c: &mut Criterion) {
    c.bench_function("session_load_64k_luts", |b| {
        b.iter(|| black_box(vga_session(65_536, 1).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_step_noop,
    bench_step_cycle_multiwave,
    bench_scanline_to_frame,
    bench_session_load
);
criterion_main!(benches);
