//! Clock driving and VGA scan conversion for gatescan engines.
//!
//! The [`CycleStepper`] toggles the circuit clock once per completed
//! propagation wave, holds reset for the first few cycles, and watches
//! the circuit's sync outputs to rebuild video rows. Finished rows go to
//! a [`RowSink`]; [`FrameBuffer`] keeps a whole frame.
//!
//! [`Session`] ties a bound engine, its loaded circuit, and a stepper
//! together and is the usual entry point.
//!
//! # Frame geometry
//!
//! ```text
//!   0 ┌──────────────────────────────┐
//!     │ blanking                     │
//!  33 ├──────────────────────────────┤ ◀ visible_origin_row (row 1)
//!     │                              │
//!     │ visible rows                 │
//!     │                              │
//! 576 └──────────────────────────────┘
//!     0                            736
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod metrics;
pub mod pins;
pub mod row;
pub mod session;
pub mod stepper;
pub mod visual;

pub use config::{ConfigError, OutputLayout, RasterConfig};
pub use metrics::RasterMetrics;
pub use pins::RasterPins;
pub use row::{FrameBuffer, NoopSink, RowBuffer, RowSink, CHANNELS};
pub use session::{RunOutcome, Session, SessionError, COOLDOWN_BASE, HEAT_ARRAY};
pub use stepper::{Cursor, CycleStepper, StepError};
pub use visual::{pack_texture, TextureLayout, TEXTURE_WIDTH};
