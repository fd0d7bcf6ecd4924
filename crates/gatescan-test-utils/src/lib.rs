//! Test utilities and mock engines for gatescan development.
//!
//! Provides [`MockEngine`], an in-memory implementation of
//! [`Engine`] that follows the `_len_`/`_get_` export convention, plus
//! [`WaveScript`] implementations that script what the "circuit" does on
//! each propagation wave and settle pass. Shared circuit fixtures live in
//! [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod script;

use indexmap::IndexMap;

use gatescan_core::{
    ArrayExportName, Element, ElementType, Engine, ExportIndex, MemoryGeneration, PinId,
    GET_PREFIX,
};

pub use script::{
    Oscillating, SettleAfter, Settled, SyncPattern, TraceEntry, TraceScript, WaveScript,
};

/// First byte offset handed out to arrays. Offset zero means "absent".
const BASE_OFFSET: usize = 8;

/// Spare bytes left after the last array.
const TAIL_SLACK: usize = 64;

const SCALAR_EXPORTS: [&str; 5] = ["memory", "set_signal", "run_wave", "update_all", "cooldown"];

#[derive(Clone, Debug)]
struct MockArray {
    element: ElementType,
    /// `None` while the array is absent.
    offset: Option<usize>,
    len: usize,
    /// Length reported through `_len_`, when it should differ from `len`.
    reported_len: Option<usize>,
}

/// Call counters, for asserting how the code under test drove the engine.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MockCounters {
    /// `call_u32` invocations (length and offset queries).
    pub queries: u64,
    pub set_signal: u64,
    pub run_wave: u64,
    pub update_all: u64,
    pub cooldown_factors: Vec<f32>,
}

/// In-memory engine with a growable, 8-byte aligned linear memory.
///
/// Arrays are laid out back to back from offset 8 in the order they were
/// declared. `grow` and `relocate` replace the buffer and bump the memory
/// generation, exactly like a real engine growing its heap.
pub struct MockEngine {
    words: Vec<u64>,
    generation: u64,
    arrays: IndexMap<String, MockArray>,
    exports: Vec<String>,
    script: Box<dyn WaveScript>,
    counters: MockCounters,
}

/// Builder for [`MockEngine`].
pub struct MockEngineBuilder {
    arrays: IndexMap<String, MockArray>,
    exports: Vec<String>,
    script: Box<dyn WaveScript>,
}

impl MockEngine {
    pub fn builder() -> MockEngineBuilder {
        MockEngineBuilder {
            arrays: IndexMap::new(),
            exports: Vec::new(),
            script: Box::new(Settled),
        }
    }

    fn bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.words)
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        bytemuck::cast_slice_mut(&mut self.words)
    }

    fn region(&self, name: &str) -> Option<std::ops::Range<usize>> {
        let a = self.arrays.get(name)?;
        let offset = a.offset?;
        Some(offset..offset + a.len * a.element.size_bytes())
    }

    /// Typed copy-free view of an array, straight from engine memory.
    ///
    /// # Panics
    ///
    /// Panics if the array is unknown, absent, or of another type.
    pub fn array<T: Element>(&self, name: &str) -> &[T] {
        let a = &self.arrays[name];
        assert_eq!(a.element, T::TYPE, "array '{name}' element type");
        let range = self.region(name).expect("array is absent");
        bytemuck::cast_slice(&self.bytes()[range])
    }

    /// Mutable typed view of an array.
    ///
    /// # Panics
    ///
    /// Panics if the array is unknown, absent, or of another type.
    pub fn array_mut<T: Element>(&mut self, name: &str) -> &mut [T] {
        let a = &self.arrays[name];
        assert_eq!(a.element, T::TYPE, "array '{name}' element type");
        let range = self.region(name).expect("array is absent");
        bytemuck::cast_slice_mut(&mut self.bytes_mut()[range])
    }

    /// The `state` array (one byte per signal).
    pub fn state(&self) -> &[u8] {
        self.array::<u8>("state")
    }

    /// Force a signal level without going through `set_signal`.
    pub fn set_state(&mut self, pin: PinId, value: u8) {
        self.array_mut::<u8>("state")[pin.index()] = value;
    }

    pub fn counters(&self) -> &MockCounters {
        &self.counters
    }

    /// Replace the wave script.
    pub fn set_script(&mut self, script: impl WaveScript + 'static) {
        self.script = Box::new(script);
    }

    /// Extend memory by `extra_bytes` into a fresh buffer.
    ///
    /// Offsets stay put; only the buffer identity changes.
    pub fn grow(&mut self, extra_bytes: usize) {
        let mut words = vec![0u64; self.words.len() + extra_bytes.div_ceil(8)];
        words[..self.words.len()].copy_from_slice(&self.words);
        self.words = words;
        self.generation += 1;
    }

    /// Move every array `shift` bytes up into a fresh buffer.
    ///
    /// # Panics
    ///
    /// Panics if `shift` is not a multiple of 8.
    pub fn relocate(&mut self, shift: usize) {
        assert_eq!(shift % 8, 0, "relocation must keep 8-byte alignment");
        let shift_words = shift / 8;
        let mut words = vec![0u64; self.words.len() + shift_words];
        words[shift_words..].copy_from_slice(&self.words);
        self.words = words;
        for a in self.arrays.values_mut() {
            if let Some(offset) = a.offset.as_mut() {
                *offset += shift;
            }
        }
        self.generation += 1;
    }

    /// Report `len` through the array's `_len_` export without moving it.
    pub fn override_len(&mut self, name: &str, len: usize) {
        self.arrays
            .get_mut(name)
            .expect("unknown array")
            .reported_len = Some(len);
    }

    /// Allocate a previously absent array at the end of memory.
    pub fn materialize(&mut self, name: &str, len: usize) {
        let element = self.arrays[name].element;
        let offset = (self.words.len() * 8).next_multiple_of(8);
        self.grow(len * element.size_bytes() + TAIL_SLACK);
        let a = self.arrays.get_mut(name).expect("unknown array");
        a.offset = Some(offset);
        a.len = len;
        a.reported_len = None;
    }

    /// Make an array absent again (its `_get_` export reports zero).
    pub fn vanish(&mut self, name: &str) {
        self.arrays.get_mut(name).expect("unknown array").offset = None;
    }

    fn state_range(&self) -> std::ops::Range<usize> {
        self.region("state").unwrap_or(0..0)
    }
}

impl MockEngineBuilder {
    /// Declare a present array of `len` elements.
    pub fn array(mut self, name: &str, element: ElementType, len: usize) -> Self {
        self.declare(name, element, Some(len));
        self
    }

    /// Declare an array whose offset export reports zero.
    pub fn absent(mut self, name: &str, element: ElementType) -> Self {
        self.declare(name, element, None);
        self
    }

    /// Add an export name verbatim (for malformed-surface tests).
    pub fn raw_export(mut self, export: &str) -> Self {
        self.exports.push(export.to_string());
        self
    }

    pub fn script(mut self, script: impl WaveScript + 'static) -> Self {
        self.script = Box::new(script);
        self
    }

    fn declare(&mut self, name: &str, element: ElementType, len: Option<usize>) {
        self.exports
            .push(format!("_len_{name}__{}", element.tag()));
        self.exports.push(format!("{GET_PREFIX}{name}"));
        self.arrays.insert(
            name.to_string(),
            MockArray {
                element,
                offset: len.map(|_| 0),
                len: len.unwrap_or(0),
                reported_len: None,
            },
        );
    }

    pub fn build(self) -> MockEngine {
        let mut arrays = self.arrays;
        let mut cursor = BASE_OFFSET;
        for a in arrays.values_mut() {
            if a.offset.is_some() {
                a.offset = Some(cursor);
                cursor = (cursor + a.len * a.element.size_bytes()).next_multiple_of(8);
            }
        }
        let total = cursor + TAIL_SLACK;

        let mut exports = self.exports;
        exports.extend(SCALAR_EXPORTS.iter().map(|s| s.to_string()));

        MockEngine {
            words: vec![0u64; total.div_ceil(8)],
            generation: 0,
            arrays,
            exports,
            script: self.script,
            counters: MockCounters::default(),
        }
    }
}

impl Engine for MockEngine {
    fn exports(&self) -> Vec<String> {
        self.exports.clone()
    }

    fn export_index(&self, name: &str) -> Option<ExportIndex> {
        self.exports
            .iter()
            .position(|e| e == name)
            .map(|i| ExportIndex(i as u32))
    }

    fn call_u32(&mut self, export: ExportIndex) -> u32 {
        self.counters.queries += 1;
        let Some(name) = self.exports.get(export.0 as usize) else {
            return 0;
        };
        if let Some(Ok(parsed)) = ArrayExportName::parse(name) {
            return self
                .arrays
                .get(parsed.name)
                .map_or(0, |a| a.reported_len.unwrap_or(a.len) as u32);
        }
        if let Some(array) = name.strip_prefix(GET_PREFIX) {
            return self
                .arrays
                .get(array)
                .and_then(|a| a.offset)
                .map_or(0, |o| o as u32);
        }
        0
    }

    fn memory(&self) -> &[u8] {
        self.bytes()
    }

    fn memory_mut(&mut self) -> &mut [u8] {
        self.bytes_mut()
    }

    fn memory_generation(&self) -> MemoryGeneration {
        MemoryGeneration(self.generation)
    }

    fn set_signal(&mut self, pin: PinId, value: u8) {
        self.counters.set_signal += 1;
        let range = self.state_range();
        if let Some(slot) = self.bytes_mut()[range].get_mut(pin.index()) {
            *slot = value;
        }
    }

    fn run_wave(&mut self) -> u32 {
        self.counters.run_wave += 1;
        let range = self.state_range();
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut self.words);
        self.script.run_wave(&mut bytes[range])
    }

    fn update_all(&mut self) -> bool {
        self.counters.update_all += 1;
        let range = self.state_range();
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut self.words);
        self.script.update_all(&mut bytes[range])
    }

    fn cooldown(&mut self, factor: f32) {
        self.counters.cooldown_factors.push(factor);
        if let Some(range) = self.region("heat") {
            let heat: &mut [f32] = bytemuck::cast_slice_mut(&mut self.bytes_mut()[range]);
            heat.iter_mut().for_each(|h| *h *= factor);
        }
    }
}
