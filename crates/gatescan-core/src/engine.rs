//! The engine contract.
//!
//! A simulation engine is an opaque, precompiled gate-level evaluator
//! living behind a flat linear memory. Hosts (a WebAssembly runtime, an
//! FFI shim, a test double) implement [`Engine`] to expose it; nothing
//! in gatescan depends on how the engine evaluates gates.
//!
//! # Array exports
//!
//! Named arrays are advertised through a naming convention on the
//! export surface:
//!
//! ```text
//! _len_<name>__<tag>   zero-argument query returning the element count
//! _get_<name>          zero-argument query returning the byte offset
//! ```
//!
//! where `<tag>` is one of the [`ElementType`](crate::ElementType) tags.
//! A byte offset of zero means the array is currently absent.

use crate::id::{ExportIndex, MemoryGeneration, PinId};

/// Prefix of an array length export.
pub const LEN_PREFIX: &str = "_len_";

/// Prefix of an array offset export.
pub const GET_PREFIX: &str = "_get_";

/// Separator between the array name and its element type tag.
pub const TYPE_SEPARATOR: &str = "__";

/// Operations every simulation engine exposes.
///
/// All methods are synchronous and run to completion. The engine owns
/// its memory exclusively; callers only mutate it through
/// [`memory_mut`](Engine::memory_mut) (table writes) and
/// [`set_signal`](Engine::set_signal).
pub trait Engine {
    /// Names of every export, in the engine's declaration order.
    fn exports(&self) -> Vec<String>;

    /// Resolve an export name to a callable handle.
    fn export_index(&self, name: &str) -> Option<ExportIndex>;

    /// Call a zero-argument query export (array lengths and offsets).
    fn call_u32(&mut self, export: ExportIndex) -> u32;

    /// The engine's linear memory.
    fn memory(&self) -> &[u8];

    /// Mutable access to the engine's linear memory.
    fn memory_mut(&mut self) -> &mut [u8];

    /// Identity of the current memory buffer. Changes on growth.
    fn memory_generation(&self) -> MemoryGeneration;

    /// Drive a signal to a logic level.
    fn set_signal(&mut self, pin: PinId, value: u8);

    /// Propagate one wave of events. Returns the number of events still
    /// pending; zero means the current cycle has settled.
    fn run_wave(&mut self) -> u32;

    /// Re-evaluate every gate once. Returns whether anything changed.
    fn update_all(&mut self) -> bool;

    /// Decay the per-unit activity (heat) values by `factor`.
    fn cooldown(&mut self, factor: f32);
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn exports(&self) -> Vec<String> {
        (**self).exports()
    }

    fn export_index(&self, name: &str) -> Option<ExportIndex> {
        (**self).export_index(name)
    }

    fn call_u32(&mut self, export: ExportIndex) -> u32 {
        (**self).call_u32(export)
    }

    fn memory(&self) -> &[u8] {
        (**self).memory()
    }

    fn memory_mut(&mut self) -> &mut [u8] {
        (**self).memory_mut()
    }

    fn memory_generation(&self) -> MemoryGeneration {
        (**self).memory_generation()
    }

    fn set_signal(&mut self, pin: PinId, value: u8) {
        (**self).set_signal(pin, value)
    }

    fn run_wave(&mut self) -> u32 {
        (**self).run_wave()
    }

    fn update_all(&mut self) -> bool {
        (**self).update_all()
    }

    fn cooldown(&mut self, factor: f32) {
        (**self).cooldown(factor)
    }
}

/// A parsed `_len_<name>__<tag>` export name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArrayExportName<'a> {
    /// The array's logical name.
    pub name: &'a str,
    /// The raw element type tag (not yet validated).
    pub tag: &'a str,
}

impl<'a> ArrayExportName<'a> {
    /// Split a length export into name and tag.
    ///
    /// Returns `None` if `export` is not a length export at all, and
    /// `Some(Err(export))` if it has the prefix but no `__` separator or
    /// an empty name.
    pub fn parse(export: &'a str) -> Option<Result<Self, &'a str>> {
        let rest = export.strip_prefix(LEN_PREFIX)?;
        Some(match rest.split_once(TYPE_SEPARATOR) {
            Some((name, tag)) if !name.is_empty() => Ok(Self { name, tag }),
            _ => Err(export),
        })
    }

    /// Name of the matching offset export (`_get_<name>`).
    pub fn offset_export(&self) -> String {
        format!("{GET_PREFIX}{}", self.name)
    }
}

/// Whether an export is a plain scalar accessor (no leading underscore).
pub fn is_scalar_export(export: &str) -> bool {
    !export.starts_with('_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_length_export() {
        let parsed = ArrayExportName::parse("_len_state__uint8_t").unwrap().unwrap();
        assert_eq!(parsed.name, "state");
        assert_eq!(parsed.tag, "uint8_t");
        assert_eq!(parsed.offset_export(), "_get_state");
    }

    #[test]
    fn non_length_exports_are_skipped() {
        assert!(ArrayExportName::parse("_get_state").is_none());
        assert!(ArrayExportName::parse("run_wave").is_none());
        assert!(ArrayExportName::parse("memory").is_none());
    }

    #[test]
    fn missing_separator_is_malformed() {
        assert_eq!(ArrayExportName::parse("_len_state"), Some(Err("_len_state")));
        assert_eq!(
            ArrayExportName::parse("_len___uint8_t"),
            Some(Err("_len___uint8_t"))
        );
    }

    #[test]
    fn first_separator_splits_name_from_tag() {
        let parsed = ArrayExportName::parse("_len_gate_n__uint32_t").unwrap().unwrap();
        assert_eq!(parsed.name, "gate_n");
        assert_eq!(parsed.tag, "uint32_t");
    }

    #[test]
    fn scalar_exports_have_no_underscore_prefix() {
        assert!(is_scalar_export("set_signal"));
        assert!(is_scalar_export("memory"));
        assert!(!is_scalar_export("_get_state"));
        assert!(!is_scalar_export("__heap_base"));
    }

    mod proptests {
        use super::*;
        use crate::ElementType;
        use proptest::prelude::*;

        // Array names never contain `__` and never end in `_`.
        fn array_name() -> impl Strategy<Value = String> {
            "[a-z][a-z0-9]{0,8}(_[a-z0-9]{1,6}){0,2}"
        }

        fn element_type() -> impl Strategy<Value = ElementType> {
            prop::sample::select(ElementType::ALL.to_vec())
        }

        proptest! {
            #[test]
            fn length_export_splits_into_name_and_tag(
                name in array_name(),
                ty in element_type(),
            ) {
                let export = format!("{LEN_PREFIX}{name}{TYPE_SEPARATOR}{}", ty.tag());
                let parsed = ArrayExportName::parse(&export).unwrap().unwrap();
                prop_assert_eq!(parsed.name, name.as_str());
                prop_assert_eq!(ElementType::from_tag(parsed.tag), Some(ty));
                prop_assert_eq!(parsed.offset_export(), format!("{GET_PREFIX}{name}"));
            }

            #[test]
            fn offset_exports_are_never_length_exports(name in array_name()) {
                let export = format!("{GET_PREFIX}{name}");
                prop_assert!(ArrayExportName::parse(&export).is_none());
                prop_assert!(!is_scalar_export(&export));
            }
        }
    }
}
