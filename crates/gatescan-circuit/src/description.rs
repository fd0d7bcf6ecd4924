//! The circuit description container.
//!
//! A description is the JSON document a circuit compiler emits next to
//! the engine. gatescan interprets only what the load needs (pins and
//! gate tables); the visualization geometry is carried through as-is.
//!
//! ```text
//! {
//!   "pins":       { "clk": 0, "rst_n": 1, "uo_out[0]": 2, ... },
//!   "bbox":       [x0, y0, x1, y1],
//!   "wire_rects": [...],
//!   "wire_infos": [...],
//!   "gates":      { "luts": { "dtype": "uint64", "len": 3, "data": "<base64>" }, ... }
//! }
//! ```

use std::io::Read;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use gatescan_core::{ElementType, PinId};

use crate::error::LoadError;
use crate::pins::PinMap;

/// Word width of a gate table payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateDtype {
    /// 32-bit little-endian words.
    Uint32,
    /// 64-bit little-endian words.
    Uint64,
}

impl GateDtype {
    /// The engine element type a table of this dtype is stored as.
    pub fn element(self) -> ElementType {
        match self {
            Self::Uint32 => ElementType::U32,
            Self::Uint64 => ElementType::U64,
        }
    }

    /// Bytes per word.
    pub fn width(self) -> usize {
        self.element().size_bytes()
    }
}

/// One entry of the `gates` map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GateTable {
    /// Word width of `data`.
    pub dtype: GateDtype,
    /// Declared element count. Optional for secondary tables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub len: Option<u32>,
    /// Standard base64 of the little-endian words.
    pub data: String,
}

/// A parsed circuit description.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CircuitDescription {
    /// Pin name to state-array index, in description order.
    pub pins: IndexMap<String, u32>,
    /// Layout bounding box (passed through).
    #[serde(default)]
    pub bbox: [f32; 4],
    /// Wire geometry (passed through).
    #[serde(default)]
    pub wire_rects: Vec<f32>,
    /// Per-wire metadata (passed through).
    #[serde(default)]
    pub wire_infos: Vec<i32>,
    /// Gate tables keyed by gate-type name, in description order.
    pub gates: IndexMap<String, GateTable>,
}

impl CircuitDescription {
    /// Parse a description from JSON text.
    pub fn from_json(text: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parse a description from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// The immutable pin map.
    pub fn pin_map(&self) -> PinMap {
        self.pins
            .iter()
            .map(|(name, &index)| (name.clone(), PinId(index)))
            .collect()
    }

    /// Look up a gate table by name.
    pub fn gate(&self, name: &str) -> Option<&GateTable> {
        self.gates.get(name)
    }
}
