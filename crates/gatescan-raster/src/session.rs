//! Lockstep simulation session.
//!
//! [`Session`] is the user-facing API: it binds an engine, loads a
//! circuit description into it, resolves the pins, and then steps the
//! clock while scan-converting the video output.
//!
//! # Ownership model
//!
//! The session owns the engine through its [`Binder`]. Read accessors
//! ([`state()`](Session::state), [`heat()`](Session::heat)) return slices
//! that borrow the session mutably, so the caller cannot step while
//! holding one; a memory growth during the next step can never leave a
//! dangling view.

use std::error::Error;
use std::fmt;

use log::debug;

use gatescan_bind::Binder;
use gatescan_circuit::{
    load, CircuitDescription, LoadError, LoadOptions, LoadReport, GATE_COUNT_ARRAY, STATE_ARRAY,
};
use gatescan_core::{BindError, Engine, TickId};

use crate::config::{ConfigError, RasterConfig};
use crate::metrics::RasterMetrics;
use crate::pins::RasterPins;
use crate::row::RowSink;
use crate::stepper::{Cursor, CycleStepper, StepError};
use crate::visual::{pack_texture, TextureLayout};

/// Engine array holding per-unit activity.
pub const HEAT_ARRAY: &str = "heat";

/// Base of the per-frame heat decay: `cooldown(COOLDOWN_BASE^speed)`.
pub const COOLDOWN_BASE: f32 = 0.75;

// ── SessionError ───────────────────────────────────────────────────

/// Errors raised while building a [`Session`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionError {
    /// The raster configuration is invalid.
    Config(ConfigError),
    /// The circuit could not be loaded or a pin is missing.
    Load(LoadError),
    /// The engine could not be bound.
    Bind(BindError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config error: {e}"),
            Self::Load(e) => write!(f, "load error: {e}"),
            Self::Bind(e) => write!(f, "binding error: {e}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Load(e) => Some(e),
            Self::Bind(e) => Some(e),
        }
    }
}

impl From<ConfigError> for SessionError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<LoadError> for SessionError {
    fn from(e: LoadError) -> Self {
        Self::Load(e)
    }
}

impl From<BindError> for SessionError {
    fn from(e: BindError) -> Self {
        Self::Bind(e)
    }
}

// ── RunOutcome ─────────────────────────────────────────────────────

/// Result of [`Session::run_until`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunOutcome {
    /// Steps taken.
    pub steps: u64,
    /// Whether the predicate was satisfied (as opposed to running out of
    /// budget).
    pub reached: bool,
}

// ── Session ────────────────────────────────────────────────────────

/// A bound, loaded engine plus the stepper that drives it.
pub struct Session<E> {
    binder: Binder<E>,
    stepper: CycleStepper,
    report: LoadReport,
}

impl<E: Engine> Session<E> {
    /// Bind `engine`, load `description` into it, and resolve the pins
    /// named by `config`.
    pub fn new(
        engine: E,
        description: &CircuitDescription,
        config: RasterConfig,
        options: &LoadOptions,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        let mut binder = Binder::bind(engine)?;
        let report = load(&mut binder, description, options)?;
        let pins = RasterPins::resolve(&report.pins, &config)?;
        let state = binder.array_id(STATE_ARRAY)?;
        debug!("session ready: {pins:?}");
        let stepper = CycleStepper::new(config, pins, state)?;
        Ok(Self {
            binder,
            stepper,
            report,
        })
    }

    // ── Stepping ────────────────────────────────────────────────

    /// One propagation attempt. Returns whether a cycle completed.
    pub fn step<S: RowSink + ?Sized>(&mut self, sink: &mut S) -> Result<bool, StepError> {
        self.stepper.step(&mut self.binder, sink)
    }

    /// Step until a cycle completes. Returns the number of steps taken.
    ///
    /// Does not return if the engine never completes a wave; use
    /// [`run_until`](Self::run_until) for a bounded run.
    pub fn step_cycle<S: RowSink + ?Sized>(&mut self, sink: &mut S) -> Result<u64, StepError> {
        let mut steps = 0;
        loop {
            steps += 1;
            if self.step(sink)? {
                return Ok(steps);
            }
        }
    }

    /// Step until `pred` holds or `max_steps` steps have been taken.
    ///
    /// `pred` is checked after every step.
    pub fn run_until<S, P>(
        &mut self,
        sink: &mut S,
        max_steps: u64,
        mut pred: P,
    ) -> Result<RunOutcome, StepError>
    where
        S: RowSink + ?Sized,
        P: FnMut(&CycleStepper) -> bool,
    {
        let mut steps = 0;
        while steps < max_steps {
            self.step(sink)?;
            steps += 1;
            if pred(&self.stepper) {
                return Ok(RunOutcome {
                    steps,
                    reached: true,
                });
            }
        }
        Ok(RunOutcome {
            steps,
            reached: false,
        })
    }

    // ── Observation ─────────────────────────────────────────────

    /// Current raster position.
    pub fn cursor(&self) -> Cursor {
        self.stepper.cursor()
    }

    /// Completed cycles so far.
    pub fn tick(&self) -> TickId {
        self.stepper.tick()
    }

    /// Cumulative stepping counters.
    pub fn metrics(&self) -> &RasterMetrics {
        self.stepper.metrics()
    }

    /// The stepper (config, pins, in-progress row).
    pub fn stepper(&self) -> &CycleStepper {
        &self.stepper
    }

    /// What the load did.
    pub fn load_report(&self) -> &LoadReport {
        &self.report
    }

    /// Per-signal logic levels.
    pub fn state(&mut self) -> Result<Option<&[u8]>, BindError> {
        self.binder.read_by_name::<u8>(STATE_ARRAY)
    }

    /// Per-unit activity, if the engine tracks it.
    pub fn heat(&mut self) -> Result<Option<&[f32]>, BindError> {
        match self.binder.schema().id_of(HEAT_ARRAY) {
            Some(id) => self.binder.read::<f32>(id),
            None => Ok(None),
        }
    }

    /// Primary unit count from `gate_n[0]`.
    pub fn gate_count(&mut self) -> Result<u32, BindError> {
        Ok(self
            .binder
            .read_by_name::<u32>(GATE_COUNT_ARRAY)?
            .and_then(|g| g.first().copied())
            .unwrap_or(0))
    }

    /// The state array packed into a texture of `gate_count` texels.
    pub fn state_texture(&mut self) -> Result<Option<(TextureLayout, Vec<u8>)>, BindError> {
        let layout = TextureLayout::for_len(self.gate_count()? as usize, 1);
        Ok(self.state()?.map(|s| (layout, pack_texture(s, &layout))))
    }

    /// The heat array packed into a texture of `gate_count` texels.
    pub fn heat_texture(&mut self) -> Result<Option<(TextureLayout, Vec<f32>)>, BindError> {
        let layout = TextureLayout::for_len(self.gate_count()? as usize, 1);
        Ok(self.heat()?.map(|h| (layout, pack_texture(h, &layout))))
    }

    /// Decay heat by `COOLDOWN_BASE^speed`. Call once per drawn frame.
    pub fn cooldown(&mut self, speed: f32) {
        self.binder.cooldown(COOLDOWN_BASE.powf(speed));
    }

    // ── Engine access ───────────────────────────────────────────

    /// The binder.
    pub fn binder(&self) -> &Binder<E> {
        &self.binder
    }

    /// The binder, mutably.
    pub fn binder_mut(&mut self) -> &mut Binder<E> {
        &mut self.binder
    }

    /// The bound engine.
    pub fn engine(&self) -> &E {
        self.binder.engine()
    }

    /// Tear down the session and return the engine.
    pub fn into_engine(self) -> E {
        self.binder.into_engine()
    }
}
