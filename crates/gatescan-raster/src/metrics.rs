//! Cumulative stepping counters.

/// Counters maintained by the [`CycleStepper`](crate::CycleStepper).
///
/// All fields are cumulative since construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RasterMetrics {
    /// `step()` calls.
    pub steps: u64,
    /// Steps whose wave completed a cycle.
    pub cycles: u64,
    /// Pixels written into the row buffer.
    pub pixels_written: u64,
    /// Rising-clock pixels past the right edge of the frame.
    pub pixels_clipped: u64,
    /// Rows delivered to the sink (falling hsync edges).
    pub rows_flushed: u64,
    /// Frames completed (falling vsync edges).
    pub frames: u64,
}

impl RasterMetrics {
    /// Fraction of steps that completed a cycle.
    pub fn cycle_ratio(&self) -> f64 {
        if self.steps == 0 {
            0.0
        } else {
            self.cycles as f64 / self.steps as f64
        }
    }
}
