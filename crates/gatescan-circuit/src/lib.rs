//! Circuit descriptions and the one-shot engine load.
//!
//! A compiled circuit ships as an engine plus a JSON description. This
//! crate parses the description ([`CircuitDescription`]), decodes its
//! base64 gate tables ([`payload`]), and [`load`]s them into a bound
//! engine, leaving the circuit settled and ready to step.
//!
//! The pin map ([`PinMap`]) is built from the same description and is
//! immutable for the rest of the session.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod description;
pub mod error;
pub mod loader;
pub mod payload;
pub mod pins;

pub use description::{CircuitDescription, GateDtype, GateTable};
pub use error::{LoadError, PayloadError};
pub use loader::{
    load, LoadOptions, LoadReport, TableLoad, DEFAULT_PRIMARY_TABLE, GATE_COUNT_ARRAY, STATE_ARRAY,
};
pub use payload::TableWords;
pub use pins::PinMap;
