//! Core types and the engine contract for gatescan.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by the rest of the workspace: identifiers,
//! array element types, the [`Engine`] trait that every simulation
//! backend implements, and the [`BindError`] taxonomy.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod element;
pub mod engine;
pub mod error;
pub mod id;

pub use element::{Element, ElementType};
pub use engine::{is_scalar_export, ArrayExportName, Engine, GET_PREFIX, LEN_PREFIX, TYPE_SEPARATOR};
pub use error::BindError;
pub use id::{ArrayId, ExportIndex, MemoryGeneration, PinId, TickId};
