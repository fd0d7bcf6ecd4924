//! Gatescan: drive a compiled gate-level circuit and rebuild its VGA picture.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all gatescan sub-crates. Supply an [`Engine`](types::Engine)
//! implementation for your simulation backend, hand it a circuit
//! description, and step.
//!
//! # Quick start
//!
//! ```rust
//! use gatescan::prelude::*;
//! use gatescan_test_utils::fixtures::{vga_circuit_json, vga_engine, TableData, HSYNC};
//! use gatescan_test_utils::SyncPattern;
//!
//! // A mock engine whose hsync output toggles every four cycles.
//! let engine = vga_engine(2, SyncPattern::hsync(HSYNC, 4, 4));
//! let json = vga_circuit_json(&[("luts", TableData::Uint64(vec![7, 9]))]);
//! let desc = CircuitDescription::from_json(&json).unwrap();
//!
//! let config = RasterConfig::default();
//! let mut frame = FrameBuffer::for_config(&config);
//! let mut session = Session::new(engine, &desc, config, &LoadOptions::default()).unwrap();
//!
//! for _ in 0..16 {
//!     session.step(&mut frame).unwrap();
//! }
//! assert_eq!(session.tick(), gatescan::types::TickId(16));
//! assert_eq!(frame.rows_stored(), 2);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `gatescan-core` | IDs, element types, the `Engine` trait, `BindError` |
//! | [`bind`] | `gatescan-bind` | Schema discovery and generation-checked views |
//! | [`circuit`] | `gatescan-circuit` | Circuit descriptions, payload decoding, the loader |
//! | [`raster`] | `gatescan-raster` | Clock stepping, scan conversion, sessions |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and the engine contract (`gatescan-core`).
///
/// Implement [`types::Engine`] to plug in a simulation backend.
pub use gatescan_core as types;

/// Typed access to engine memory (`gatescan-bind`).
///
/// [`bind::Binder`] owns the engine, discovers its arrays, and keeps
/// views valid across memory growth.
pub use gatescan_bind as bind;

/// Circuit descriptions and loading (`gatescan-circuit`).
///
/// Parse with [`circuit::CircuitDescription::from_json`], then
/// [`circuit::load`] into a bound engine.
pub use gatescan_circuit as circuit;

/// Stepping and scan conversion (`gatescan-raster`).
///
/// [`raster::Session`] is the usual entry point; [`raster::CycleStepper`]
/// is available for callers that manage the binder themselves.
pub use gatescan_raster as raster;

/// Common imports for typical gatescan usage.
///
/// ```rust
/// use gatescan::prelude::*;
/// ```
pub mod prelude {
    // Engine contract
    pub use gatescan_core::{ArrayId, BindError, Element, ElementType, Engine, PinId, TickId};

    // Binding
    pub use gatescan_bind::Binder;

    // Loading
    pub use gatescan_circuit::{
        load, CircuitDescription, LoadError, LoadOptions, LoadReport, PinMap,
    };

    // Stepping
    pub use gatescan_raster::{
        Cursor, CycleStepper, FrameBuffer, NoopSink, RasterConfig, RasterMetrics, RowSink,
        Session, SessionError, StepError,
    };
}
