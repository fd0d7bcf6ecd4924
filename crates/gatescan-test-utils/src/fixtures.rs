//! Shared circuit fixtures.
//!
//! A small tiny-VGA style pin layout, a matching [`MockEngine`], and
//! builders for circuit description JSON.
//!
//! Pin layout used throughout the fixtures:
//!
//! ```text
//! 0        clk
//! 1        rst_n
//! 2..=9    uo_out[0..8]  (R1 G1 B1 vsync R0 G0 B0 hsync)
//! ```

use base64::Engine as _;
use gatescan_core::{ElementType, PinId};
use serde_json::{json, Map, Value};

use crate::script::WaveScript;
use crate::MockEngine;

pub const CLK: PinId = PinId(0);
pub const RST_N: PinId = PinId(1);
pub const R1: PinId = PinId(2);
pub const G1: PinId = PinId(3);
pub const B1: PinId = PinId(4);
pub const VSYNC: PinId = PinId(5);
pub const R0: PinId = PinId(6);
pub const G0: PinId = PinId(7);
pub const B0: PinId = PinId(8);
pub const HSYNC: PinId = PinId(9);

/// Length of the fixture engine's `state` and `heat` arrays.
pub const SIGNAL_COUNT: usize = 32;

/// Pin names and indices of the fixture layout, in description order.
pub const VGA_PINS: [(&str, u32); 10] = [
    ("clk", 0),
    ("rst_n", 1),
    ("uo_out[0]", 2),
    ("uo_out[1]", 3),
    ("uo_out[2]", 4),
    ("uo_out[3]", 5),
    ("uo_out[4]", 6),
    ("uo_out[5]", 7),
    ("uo_out[6]", 8),
    ("uo_out[7]", 9),
];

/// A mock engine shaped like a compiled tiny-VGA circuit.
///
/// Arrays: `state` (u8) and `heat` (f32) with [`SIGNAL_COUNT`] entries,
/// `gate_n` (one u32), and a `luts` table of `lut_count` u64 entries.
/// A `lut_count` of zero leaves `luts` absent.
pub fn vga_engine(lut_count: usize, script: impl WaveScript + 'static) -> MockEngine {
    let builder = MockEngine::builder()
        .array("state", ElementType::U8, SIGNAL_COUNT)
        .array("heat", ElementType::F32, SIGNAL_COUNT)
        .array("gate_n", ElementType::U32, 1);
    let builder = if lut_count == 0 {
        builder.absent("luts", ElementType::U64)
    } else {
        builder.array("luts", ElementType::U64, lut_count)
    };
    builder.script(script).build()
}

/// Raw contents of one gate table in a circuit description.
#[derive(Clone, Debug, PartialEq)]
pub enum TableData {
    Uint32(Vec<u32>),
    Uint64(Vec<u64>),
}

impl TableData {
    pub fn len(&self) -> usize {
        match self {
            Self::Uint32(v) => v.len(),
            Self::Uint64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Little-endian payload bytes.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        match self {
            Self::Uint32(v) => v.iter().flat_map(|w| w.to_le_bytes()).collect(),
            Self::Uint64(v) => v.iter().flat_map(|w| w.to_le_bytes()).collect(),
        }
    }

    /// The `{dtype, len, data}` object for this table.
    pub fn to_json(&self) -> Value {
        let dtype = match self {
            Self::Uint32(_) => "uint32",
            Self::Uint64(_) => "uint64",
        };
        json!({
            "dtype": dtype,
            "len": self.len(),
            "data": base64::engine::general_purpose::STANDARD.encode(self.to_le_bytes()),
        })
    }
}

/// Build circuit description JSON from pins and gate tables.
pub fn circuit_json(pins: &[(&str, u32)], gates: &[(&str, TableData)]) -> String {
    let pins: Map<String, Value> = pins
        .iter()
        .map(|(name, index)| (name.to_string(), json!(index)))
        .collect();
    let gates: Map<String, Value> = gates
        .iter()
        .map(|(name, table)| (name.to_string(), table.to_json()))
        .collect();
    json!({
        "pins": pins,
        "bbox": [0.0, 0.0, 100.0, 100.0],
        "wire_rects": [],
        "wire_infos": [],
        "gates": gates,
    })
    .to_string()
}

/// Circuit description JSON with the [`VGA_PINS`] layout.
pub fn vga_circuit_json(gates: &[(&str, TableData)]) -> String {
    circuit_json(&VGA_PINS, gates)
}
