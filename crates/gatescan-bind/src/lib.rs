//! Generation-checked typed views over a simulation engine's linear memory.
//!
//! The engine's memory is treated as an arena that the engine owns and
//! may replace at any time (memory growth). This crate layers three
//! things on top of an [`Engine`](gatescan_core::Engine):
//!
//! ```text
//! Binder<E> (owns the engine)
//! ├── SchemaTable   name → ArraySchema {element, len export, offset export}
//! ├── Vec<Option<ViewHandle>>   cached (generation, offset, len) per array
//! └── BinderStats   rebuild / absent counters
//! ```
//!
//! # Staleness
//!
//! Every handle carries the [`MemoryGeneration`](gatescan_core::MemoryGeneration)
//! it was resolved under. Accessors compare it with the engine's current
//! generation and re-query offset and length on mismatch. Rebuilding is
//! lazy: a growth costs nothing until an array is touched again.
//!
//! # Absence
//!
//! An engine may report an array at offset zero (or with zero length).
//! That is a normal state, surfaced as `Ok(None)`, distinct from the
//! contract violations in [`BindError`](gatescan_core::BindError).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod binder;
pub mod handle;
pub mod schema;
pub mod view;

pub use binder::{Binder, BinderStats};
pub use handle::ViewHandle;
pub use schema::{ArraySchema, SchemaTable};
pub use view::ArrayData;
