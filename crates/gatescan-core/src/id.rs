//! Strongly-typed identifiers.

use std::fmt;

/// Identifies a named array in a binder's schema table.
///
/// `ArrayId(n)` is the n-th array discovered at bind time, in export
/// order. Resolving a name to an id once keeps string lookups out of
/// the per-step hot path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArrayId(pub u32);

impl fmt::Display for ArrayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ArrayId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Opaque handle to a callable export of an engine.
///
/// Obtained from [`Engine::export_index`](crate::Engine::export_index)
/// and only meaningful for the engine instance that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExportIndex(pub u32);

impl fmt::Display for ExportIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ExportIndex {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identity of the engine's linear memory buffer.
///
/// Changes every time the engine replaces its buffer (memory growth).
/// Any view created under an older generation aliases freed memory and
/// must be rebuilt before use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemoryGeneration(pub u64);

impl fmt::Display for MemoryGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for MemoryGeneration {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Index of a circuit signal in the engine's state array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PinId(pub u32);

impl PinId {
    /// The pin index as a slice index into the state array.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for PinId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Count of completed propagation cycles.
///
/// Advances by at most one per step call, and only when the engine
/// reports that the wave has fully settled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickId(pub u64);

impl TickId {
    /// Low bit of the tick: the clock phase driven on this tick.
    pub fn clock_phase(self) -> u8 {
        (self.0 & 1) as u8
    }
}

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TickId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_phase_alternates() {
        assert_eq!(TickId(0).clock_phase(), 0);
        assert_eq!(TickId(1).clock_phase(), 1);
        assert_eq!(TickId(2).clock_phase(), 0);
        assert_eq!(TickId(u64::MAX).clock_phase(), 1);
    }

    #[test]
    fn pin_index_widens() {
        assert_eq!(PinId(42).index(), 42usize);
    }

    #[test]
    fn ids_display_as_bare_numbers() {
        assert_eq!(ArrayId(3).to_string(), "3");
        assert_eq!(MemoryGeneration(7).to_string(), "7");
        assert_eq!(TickId::from(9).to_string(), "9");
    }
}
