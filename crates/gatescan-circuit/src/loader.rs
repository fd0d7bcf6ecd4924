//! Populating an engine from a circuit description.
//!
//! [`load`] runs once per session, before the first step:
//!
//! 1. write the primary unit count into `gate_n[0]`;
//! 2. copy every gate table into the engine's same-named array;
//! 3. zero the `state` array;
//! 4. call `update_all` until the circuit reports no change.
//!
//! All payloads are decoded, and every target array is checked for
//! presence, element type and length, before anything is written. A
//! description that fails to load leaves engine memory as it was.

use std::num::NonZeroU64;

use log::{debug, info, trace, warn};
use smallvec::SmallVec;

use gatescan_bind::Binder;
use gatescan_core::{ArrayId, ElementType, Engine};

use crate::description::CircuitDescription;
use crate::error::LoadError;
use crate::payload::{self, TableWords};
use crate::pins::PinMap;

/// Default name of the primary gate table.
pub const DEFAULT_PRIMARY_TABLE: &str = "luts";

/// Engine array holding the primary unit count in slot 0.
pub const GATE_COUNT_ARRAY: &str = "gate_n";

/// Engine array holding one logic level per signal.
pub const STATE_ARRAY: &str = "state";

// ── LoadOptions ────────────────────────────────────────────────────

/// Options for [`load`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadOptions {
    /// Gate table whose element count is the primary unit count.
    /// Default: `"luts"`.
    pub primary_table: String,
    /// Upper bound on settle passes. `None` (the default) loops until the
    /// circuit settles, however long that takes.
    pub max_settle_passes: Option<NonZeroU64>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            primary_table: DEFAULT_PRIMARY_TABLE.to_string(),
            max_settle_passes: None,
        }
    }
}

// ── LoadReport ─────────────────────────────────────────────────────

/// One gate table copied into the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableLoad {
    /// Table name.
    pub name: String,
    /// Element type written.
    pub element: ElementType,
    /// Elements written.
    pub len: usize,
}

/// Summary of a completed load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadReport {
    /// Primary unit count written to `gate_n[0]`.
    pub gate_count: u32,
    /// Tables copied, in description order. Empty tables the engine
    /// reports absent are not listed.
    pub tables: SmallVec<[TableLoad; 4]>,
    /// Number of `update_all` calls, including the final one that
    /// reported no change.
    pub settle_passes: u64,
    /// The description's pin map.
    pub pins: PinMap,
}

// ── load ───────────────────────────────────────────────────────────

/// Load `description` into the bound engine.
pub fn load<E: Engine>(
    binder: &mut Binder<E>,
    description: &CircuitDescription,
    options: &LoadOptions,
) -> Result<LoadReport, LoadError> {
    let decoded = description
        .gates
        .iter()
        .map(|(name, table)| Ok((name.as_str(), payload::decode(name, table)?)))
        .collect::<Result<Vec<_>, LoadError>>()?;

    let primary = description.gate(&options.primary_table).ok_or_else(|| {
        LoadError::MissingPrimaryTable {
            table: options.primary_table.clone(),
        }
    })?;
    let gate_count = match primary.len {
        Some(len) => len,
        None => decoded
            .iter()
            .find(|(name, _)| *name == options.primary_table)
            .map_or(0, |(_, words)| words.len() as u32),
    };

    let gate_n = check_gate_count(binder)?;
    let mut targets = Vec::with_capacity(decoded.len());
    for (name, words) in &decoded {
        if let Some(id) = check_table(binder, name, words)? {
            targets.push((id, *name, words));
        }
    }
    let state = target(binder, STATE_ARRAY)?;
    if binder.read::<u8>(state)?.is_none() {
        return Err(missing_table(STATE_ARRAY));
    }

    write_gate_count(binder, gate_n, gate_count)?;
    debug!("gate_n[0] = {gate_count}");

    let mut tables = SmallVec::new();
    for (id, name, words) in targets {
        tables.push(copy_table(binder, id, name, words)?);
    }

    binder
        .write::<u8>(state)?
        .ok_or_else(|| missing_table(STATE_ARRAY))?
        .fill(0);

    let settle_passes = settle(binder, options.max_settle_passes)?;
    info!(
        "loaded circuit: {gate_count} units, {} tables, settled after {settle_passes} passes",
        tables.len()
    );

    Ok(LoadReport {
        gate_count,
        tables,
        settle_passes,
        pins: description.pin_map(),
    })
}

fn missing_table(name: &str) -> LoadError {
    LoadError::MissingTable {
        table: name.to_string(),
    }
}

/// Schema id of an engine array; an array the engine does not export is
/// a missing table.
fn target<E: Engine>(binder: &Binder<E>, name: &str) -> Result<ArrayId, LoadError> {
    binder.schema().id_of(name).ok_or_else(|| missing_table(name))
}

fn check_gate_count<E: Engine>(binder: &mut Binder<E>) -> Result<ArrayId, LoadError> {
    let id = target(binder, GATE_COUNT_ARRAY)?;
    match binder.read::<u32>(id)? {
        Some(gate_n) if !gate_n.is_empty() => Ok(id),
        _ => Err(missing_table(GATE_COUNT_ARRAY)),
    }
}

fn write_gate_count<E: Engine>(
    binder: &mut Binder<E>,
    id: ArrayId,
    count: u32,
) -> Result<(), LoadError> {
    let slot = binder
        .write::<u32>(id)?
        .and_then(|gate_n| gate_n.first_mut())
        .ok_or_else(|| missing_table(GATE_COUNT_ARRAY))?;
    *slot = count;
    Ok(())
}

/// Check that the engine can take one decoded table. Returns `None` for
/// an empty payload whose engine table is absent.
fn check_table<E: Engine>(
    binder: &mut Binder<E>,
    name: &str,
    words: &TableWords,
) -> Result<Option<ArrayId>, LoadError> {
    let id = target(binder, name)?;

    let engine_len = match words {
        TableWords::U32(_) => binder.read::<u32>(id)?.map(<[u32]>::len),
        TableWords::U64(_) => binder.read::<u64>(id)?.map(<[u64]>::len),
    };
    match engine_len {
        None if words.is_empty() => {
            debug!("skipping empty gate table '{name}' (absent in engine)");
            Ok(None)
        }
        None => Err(missing_table(name)),
        Some(engine_len) if engine_len != words.len() => {
            Err(size_mismatch(name, engine_len, words))
        }
        Some(_) => Ok(Some(id)),
    }
}

/// Copy one checked table into the engine.
fn copy_table<E: Engine>(
    binder: &mut Binder<E>,
    id: ArrayId,
    name: &str,
    words: &TableWords,
) -> Result<TableLoad, LoadError> {
    let copied = match words {
        TableWords::U32(src) => fill(binder.write::<u32>(id)?, src.as_slice()),
        TableWords::U64(src) => fill(binder.write::<u64>(id)?, src.as_slice()),
    };
    match copied {
        None => Err(missing_table(name)),
        Some(Err(engine_len)) => Err(size_mismatch(name, engine_len, words)),
        Some(Ok(())) => {
            trace!("copied {} {} words into '{name}'", words.len(), words.element());
            Ok(TableLoad {
                name: name.to_string(),
                element: words.element(),
                len: words.len(),
            })
        }
    }
}

fn size_mismatch(name: &str, engine_len: usize, words: &TableWords) -> LoadError {
    LoadError::SizeMismatch {
        table: name.to_string(),
        engine_len,
        payload_len: words.len(),
    }
}

/// Copy `src` into `dst` if the lengths agree; otherwise report the
/// engine's length. `None` when the engine table is absent.
fn fill<T: Copy>(dst: Option<&mut [T]>, src: &[T]) -> Option<Result<(), usize>> {
    let dst = dst?;
    if dst.len() != src.len() {
        return Some(Err(dst.len()));
    }
    dst.copy_from_slice(src);
    Some(Ok(()))
}

/// Call `update_all` until it reports no change. Returns the number of
/// calls made.
fn settle<E: Engine>(binder: &mut Binder<E>, bound: Option<NonZeroU64>) -> Result<u64, LoadError> {
    let mut passes = 0u64;
    loop {
        if let Some(max) = bound {
            if passes >= max.get() {
                warn!("circuit did not settle within {passes} passes");
                return Err(LoadError::SettleDiverged { passes });
            }
        }
        passes += 1;
        if !binder.update_all() {
            return Ok(passes);
        }
    }
}
