//! Scripted circuit behaviour for [`MockEngine`](crate::MockEngine).
//!
//! - [`Settled`]: every wave completes at once and nothing ever changes.
//! - [`SettleAfter`]: `update_all` reports change a fixed number of times.
//! - [`Oscillating`]: `update_all` never settles.
//! - [`SyncPattern`]: periodic hsync/vsync levels per completed cycle.
//! - [`TraceScript`]: replays explicit per-call wave results and levels.

use gatescan_core::PinId;

/// What the mock circuit does when the engine is driven.
///
/// `state` is the engine's state array (one byte per signal).
pub trait WaveScript {
    /// Called by `run_wave`; returns the number of pending events.
    fn run_wave(&mut self, state: &mut [u8]) -> u32 {
        let _ = state;
        0
    }

    /// Called by `update_all`; returns whether anything changed.
    fn update_all(&mut self, state: &mut [u8]) -> bool {
        let _ = state;
        false
    }
}

/// A circuit that is always stable.
pub struct Settled;

impl WaveScript for Settled {}

/// Reports change on the first `n` settle passes, then stabilises.
pub struct SettleAfter {
    pub remaining: u32,
}

impl SettleAfter {
    pub fn new(n: u32) -> Self {
        Self { remaining: n }
    }
}

impl WaveScript for SettleAfter {
    fn update_all(&mut self, _state: &mut [u8]) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

/// A circuit with a ring oscillator: settle passes never converge.
pub struct Oscillating;

impl WaveScript for Oscillating {
    fn update_all(&mut self, _state: &mut [u8]) -> bool {
        true
    }
}

/// Periodic sync signals.
///
/// Each cycle takes `waves_per_cycle` calls to `run_wave`; when a cycle
/// completes, hsync is driven high for the first `high` cycles of every
/// `high + low` period and low for the rest (vsync likewise, if set).
pub struct SyncPattern {
    hsync: PinId,
    h_high: u64,
    h_low: u64,
    vsync: Option<(PinId, u64, u64)>,
    waves_per_cycle: u32,
    remaining: u32,
    cycle: u64,
}

impl SyncPattern {
    pub fn hsync(pin: PinId, high: u64, low: u64) -> Self {
        assert!(high + low > 0, "empty hsync period");
        Self {
            hsync: pin,
            h_high: high,
            h_low: low,
            vsync: None,
            waves_per_cycle: 1,
            remaining: 0,
            cycle: 0,
        }
    }

    pub fn with_vsync(mut self, pin: PinId, high: u64, low: u64) -> Self {
        assert!(high + low > 0, "empty vsync period");
        self.vsync = Some((pin, high, low));
        self
    }

    pub fn waves_per_cycle(mut self, n: u32) -> Self {
        assert!(n > 0, "a cycle needs at least one wave");
        self.waves_per_cycle = n;
        self
    }

    /// Number of cycles completed so far.
    pub fn cycles(&self) -> u64 {
        self.cycle
    }
}

impl WaveScript for SyncPattern {
    fn run_wave(&mut self, state: &mut [u8]) -> u32 {
        if self.remaining == 0 {
            self.remaining = self.waves_per_cycle;
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            let phase = self.cycle % (self.h_high + self.h_low);
            state[self.hsync.index()] = u8::from(phase < self.h_high);
            if let Some((pin, high, low)) = self.vsync {
                let phase = self.cycle % (high + low);
                state[pin.index()] = u8::from(phase < high);
            }
            self.cycle += 1;
        }
        self.remaining
    }
}

/// Replays an explicit trace, one entry per `run_wave` call.
///
/// Each entry sets hsync and vsync to the given levels and returns its
/// `pending` count from `run_wave`. The trace repeats when it runs
/// out.
pub struct TraceScript {
    hsync: PinId,
    vsync: PinId,
    entries: Vec<TraceEntry>,
    next: usize,
}

/// One `run_wave` call in a [`TraceScript`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceEntry {
    pub pending: u32,
    pub hsync: u8,
    pub vsync: u8,
}

impl TraceScript {
    pub fn new(hsync: PinId, vsync: PinId, entries: Vec<TraceEntry>) -> Self {
        assert!(!entries.is_empty(), "empty trace");
        Self {
            hsync,
            vsync,
            entries,
            next: 0,
        }
    }
}

impl WaveScript for TraceScript {
    fn run_wave(&mut self, state: &mut [u8]) -> u32 {
        let entry = self.entries[self.next % self.entries.len()];
        self.next += 1;
        state[self.hsync.index()] = entry.hsync;
        state[self.vsync.index()] = entry.vsync;
        entry.pending
    }
}
