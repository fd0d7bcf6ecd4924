//! The engine binder.
//!
//! [`Binder`] owns an [`Engine`] together with its [`SchemaTable`] and a
//! per-array cache of [`ViewHandle`]s. Every array access goes through
//! [`Binder::view`], which rebuilds the cached handle lazily whenever the
//! engine's memory generation has moved on.
//!
//! # Ownership model
//!
//! All accessors borrow the binder, so a slice returned by
//! [`Binder::read`] cannot outlive the next engine call: the borrow
//! checker rules out using a view across a memory growth. What survives
//! across calls is only the handle, and handles are generation-checked.

use log::{debug, trace};

use gatescan_core::{ArrayId, BindError, Element, Engine, MemoryGeneration, PinId};

use crate::handle::ViewHandle;
use crate::schema::{ArraySchema, SchemaTable};
use crate::view::ArrayData;

/// Cumulative binder counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BinderStats {
    /// Number of view handles built (first access or after invalidation).
    pub rebuilds: u64,
    /// Number of accesses that found the array absent.
    pub absent_lookups: u64,
}

/// A bound engine: scalar accessors plus generation-checked array views.
pub struct Binder<E> {
    engine: E,
    schema: SchemaTable,
    views: Vec<Option<ViewHandle>>,
    stats: BinderStats,
}

impl<E: Engine> Binder<E> {
    /// Discover the engine's exports and bind to it.
    ///
    /// No views are built here; each array is resolved on first access.
    pub fn bind(engine: E) -> Result<Self, BindError> {
        let schema = SchemaTable::discover(&engine)?;
        debug!(
            "bound engine: {} arrays, {} scalar exports",
            schema.len(),
            schema.scalars().len()
        );
        for (id, entry) in schema.iter() {
            trace!("array {id}: '{}' ({})", entry.name, entry.element);
        }
        let views = vec![None; schema.len()];
        Ok(Self {
            engine,
            schema,
            views,
            stats: BinderStats::default(),
        })
    }

    // ── Schema ──────────────────────────────────────────────────

    /// The parsed export surface.
    pub fn schema(&self) -> &SchemaTable {
        &self.schema
    }

    /// Resolve an array name to its id.
    pub fn array_id(&self, name: &str) -> Result<ArrayId, BindError> {
        self.schema.id_of(name).ok_or_else(|| BindError::UnknownArray {
            name: name.to_string(),
        })
    }

    /// Names of the plain scalar exports.
    pub fn scalar_exports(&self) -> &[String] {
        self.schema.scalars()
    }

    fn entry(&self, id: ArrayId) -> Result<&ArraySchema, BindError> {
        self.schema.get(id).ok_or(BindError::UnknownArrayId { id })
    }

    fn check_type<T: Element>(&self, id: ArrayId) -> Result<(), BindError> {
        let entry = self.entry(id)?;
        if entry.element != T::TYPE {
            return Err(BindError::ElementTypeMismatch {
                array: entry.name.clone(),
                declared: entry.element,
                requested: T::TYPE,
            });
        }
        Ok(())
    }

    // ── Views ───────────────────────────────────────────────────

    /// Current handle for an array, rebuilding it if stale.
    ///
    /// Returns `Ok(None)` when the engine reports the array absent (zero
    /// offset or zero length). Absent arrays are not cached, so a later
    /// access queries the engine again.
    pub fn view(&mut self, id: ArrayId) -> Result<Option<ViewHandle>, BindError> {
        let slot = id.0 as usize;
        let current = self.engine.memory_generation();
        if let Some(Some(handle)) = self.views.get(slot) {
            if handle.is_current(current) {
                return Ok(Some(*handle));
            }
        }

        let entry = self.entry(id)?.clone();
        let byte_offset = self.engine.call_u32(entry.offset_export) as usize;
        let len = self.engine.call_u32(entry.len_export) as usize;
        if byte_offset == 0 || len == 0 {
            self.views[slot] = None;
            self.stats.absent_lookups += 1;
            return Ok(None);
        }

        let handle = ViewHandle::resolve(&entry, current, byte_offset, len, self.engine.memory())?;
        trace!("rebuilt view of '{}': {handle}", entry.name);
        self.views[slot] = Some(handle);
        self.stats.rebuilds += 1;
        Ok(Some(handle))
    }

    /// Typed read-only view of an array.
    pub fn read<T: Element>(&mut self, id: ArrayId) -> Result<Option<&[T]>, BindError> {
        self.check_type::<T>(id)?;
        let Some(handle) = self.view(id)? else {
            return Ok(None);
        };
        let bytes = &self.engine.memory()[handle.byte_range()];
        bytemuck::try_cast_slice(bytes)
            .map(Some)
            .map_err(|_| misaligned(&self.schema, id, &handle))
    }

    /// Typed mutable view of an array (the engine's table-write accessor).
    pub fn write<T: Element>(&mut self, id: ArrayId) -> Result<Option<&mut [T]>, BindError> {
        self.check_type::<T>(id)?;
        let Some(handle) = self.view(id)? else {
            return Ok(None);
        };
        let schema = &self.schema;
        let bytes = &mut self.engine.memory_mut()[handle.byte_range()];
        bytemuck::try_cast_slice_mut(bytes)
            .map(Some)
            .map_err(|_| misaligned(schema, id, &handle))
    }

    /// Read-only view of an array whose element type the caller does not
    /// need to know.
    pub fn read_untyped(&mut self, id: ArrayId) -> Result<Option<ArrayData<'_>>, BindError> {
        let Some(handle) = self.view(id)? else {
            return Ok(None);
        };
        let bytes = &self.engine.memory()[handle.byte_range()];
        ArrayData::from_bytes(handle.element(), bytes)
            .map(Some)
            .ok_or_else(|| misaligned(&self.schema, id, &handle))
    }

    /// Typed read-only view of an array, looked up by name.
    pub fn read_by_name<T: Element>(&mut self, name: &str) -> Result<Option<&[T]>, BindError> {
        let id = self.array_id(name)?;
        self.read(id)
    }

    /// Typed mutable view of an array, looked up by name.
    pub fn write_by_name<T: Element>(
        &mut self,
        name: &str,
    ) -> Result<Option<&mut [T]>, BindError> {
        let id = self.array_id(name)?;
        self.write(id)
    }

    /// Drop every cached handle; the next access re-queries the engine.
    pub fn invalidate_all(&mut self) {
        self.views.iter_mut().for_each(|v| *v = None);
    }

    // ── Scalar accessors ────────────────────────────────────────

    /// Drive a signal to a logic level.
    pub fn set_signal(&mut self, pin: PinId, value: u8) {
        self.engine.set_signal(pin, value);
    }

    /// Propagate one wave; returns the number of events still pending.
    pub fn run_wave(&mut self) -> u32 {
        self.engine.run_wave()
    }

    /// Re-evaluate every gate once; returns whether anything changed.
    pub fn update_all(&mut self) -> bool {
        self.engine.update_all()
    }

    /// Decay per-unit activity by `factor`.
    pub fn cooldown(&mut self, factor: f32) {
        self.engine.cooldown(factor);
    }

    /// The engine's current memory generation.
    pub fn memory_generation(&self) -> MemoryGeneration {
        self.engine.memory_generation()
    }

    // ── Engine access ───────────────────────────────────────────

    /// Shared access to the bound engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Exclusive access to the bound engine.
    ///
    /// Anything the caller does here (including memory growth) is safe:
    /// stale handles are detected on the next access.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Unbind and return the engine.
    pub fn into_engine(self) -> E {
        self.engine
    }

    /// Cumulative counters.
    pub fn stats(&self) -> BinderStats {
        self.stats
    }
}

fn misaligned(schema: &SchemaTable, id: ArrayId, handle: &ViewHandle) -> BindError {
    BindError::Misaligned {
        array: schema
            .get(id)
            .map(|entry| entry.name.clone())
            .unwrap_or_default(),
        byte_offset: handle.byte_offset(),
        align: handle.element().size_bytes(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatescan_core::ElementType;
    use gatescan_test_utils::MockEngine;

    fn bound() -> Binder<MockEngine> {
        let engine = MockEngine::builder()
            .array("state", ElementType::U8, 16)
            .array("heat", ElementType::F32, 16)
            .array("luts", ElementType::U64, 4)
            .absent("wires", ElementType::U32)
            .build();
        Binder::bind(engine).unwrap()
    }

    #[test]
    fn first_access_builds_view_then_caches() {
        let mut b = bound();
        let id = b.array_id("state").unwrap();
        assert_eq!(b.stats().rebuilds, 0);
        let h1 = b.view(id).unwrap().unwrap();
        let h2 = b.view(id).unwrap().unwrap();
        assert_eq!(h1, h2);
        assert_eq!(b.stats().rebuilds, 1);
        assert_eq!(h1.len(), 16);
    }

    #[test]
    fn write_then_read_round_trips_through_engine_memory() {
        let mut b = bound();
        let luts = b.write_by_name::<u64>("luts").unwrap().unwrap();
        luts.copy_from_slice(&[1, 2, 3, u64::MAX]);
        assert_eq!(
            b.read_by_name::<u64>("luts").unwrap().unwrap(),
            &[1, 2, 3, u64::MAX]
        );
        assert_eq!(b.engine().array::<u64>("luts"), &[1, 2, 3, u64::MAX]);
    }

    #[test]
    fn absent_array_is_none_not_error() {
        let mut b = bound();
        assert!(b.read_by_name::<u32>("wires").unwrap().is_none());
        assert!(b.write_by_name::<u32>("wires").unwrap().is_none());
        assert_eq!(b.stats().absent_lookups, 2);
        assert_eq!(b.stats().rebuilds, 0);
    }

    #[test]
    fn wrong_element_type_is_rejected_before_engine_calls() {
        let mut b = bound();
        let calls = b.engine().counters().queries;
        let err = b.read_by_name::<f32>("state").unwrap_err();
        assert_eq!(
            err,
            BindError::ElementTypeMismatch {
                array: "state".into(),
                declared: ElementType::U8,
                requested: ElementType::F32,
            }
        );
        assert_eq!(b.engine().counters().queries, calls);
    }

    #[test]
    fn unknown_names_and_ids_are_errors() {
        let mut b = bound();
        assert_eq!(
            b.read_by_name::<u8>("missing").unwrap_err(),
            BindError::UnknownArray {
                name: "missing".into()
            }
        );
        assert_eq!(
            b.view(ArrayId(42)).unwrap_err(),
            BindError::UnknownArrayId { id: ArrayId(42) }
        );
    }

    #[test]
    fn growth_rebuilds_on_next_access_only() {
        let mut b = bound();
        let id = b.array_id("heat").unwrap();
        let before = b.view(id).unwrap().unwrap();
        b.engine_mut().grow(4096);
        assert_eq!(b.stats().rebuilds, 1);
        let after = b.view(id).unwrap().unwrap();
        assert_eq!(b.stats().rebuilds, 2);
        assert_ne!(before.generation(), after.generation());
        assert_eq!(after.generation(), b.memory_generation());
    }

    #[test]
    fn out_of_range_report_is_fatal() {
        let mut b = bound();
        b.engine_mut().override_len("heat", 1 << 20);
        assert!(matches!(
            b.read_by_name::<f32>("heat"),
            Err(BindError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn untyped_read_carries_element_type() {
        let mut b = bound();
        let id = b.array_id("heat").unwrap();
        let data = b.read_untyped(id).unwrap().unwrap();
        assert_eq!(data.element(), ElementType::F32);
        assert_eq!(data.len(), 16);
        assert_eq!(data.as_bytes().len(), 64);
    }

    #[test]
    fn invalidate_all_forces_requery() {
        let mut b = bound();
        let id = b.array_id("state").unwrap();
        b.view(id).unwrap();
        b.invalidate_all();
        b.view(id).unwrap();
        assert_eq!(b.stats().rebuilds, 2);
    }

    #[test]
    fn scalar_accessors_reach_the_engine() {
        let mut b = bound();
        b.set_signal(PinId(3), 1);
        assert_eq!(b.engine().array::<u8>("state")[3], 1);
        assert_eq!(b.run_wave(), 0);
        assert!(!b.update_all());
        b.cooldown(0.5);
        assert_eq!(b.engine().counters().cooldown_factors, vec![0.5]);
    }
}
