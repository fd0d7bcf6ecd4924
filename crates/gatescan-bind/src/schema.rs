//! Array schema table: array name → `(element type, length export, offset export)`.
//!
//! The [`SchemaTable`] is built once when an engine is bound. It parses
//! the `_len_<name>__<tag>` / `_get_<name>` naming convention a single
//! time and validates it eagerly, so the per-access path only ever deals
//! with resolved [`ExportIndex`] handles. Entries live in an `IndexMap`
//! keyed by name; an entry's position is its [`ArrayId`].

use indexmap::IndexMap;

use gatescan_core::engine::is_scalar_export;
use gatescan_core::{ArrayExportName, ArrayId, BindError, ElementType, Engine, ExportIndex};

/// Everything needed to (re)build a view of one named array.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArraySchema {
    /// Logical array name (e.g. `state`, `heat`, `luts`).
    pub name: String,
    /// Element type declared by the engine.
    pub element: ElementType,
    /// Handle of the `_len_<name>__<tag>` export.
    pub len_export: ExportIndex,
    /// Handle of the `_get_<name>` export.
    pub offset_export: ExportIndex,
}

/// The engine's export surface, parsed and validated.
#[derive(Clone, Debug, Default)]
pub struct SchemaTable {
    arrays: IndexMap<String, ArraySchema>,
    scalars: Vec<String>,
}

impl SchemaTable {
    /// Parse an engine's export list into a schema table.
    ///
    /// Plain exports (no leading underscore) are recorded as scalar
    /// accessors. Every `_len_` export must carry a known type tag and a
    /// matching `_get_` export; anything else fails the bind.
    pub fn discover<E: Engine + ?Sized>(engine: &E) -> Result<Self, BindError> {
        let mut arrays = IndexMap::new();
        let mut scalars = Vec::new();

        for export in engine.exports() {
            let parsed = match ArrayExportName::parse(&export) {
                None => {
                    if is_scalar_export(&export) {
                        scalars.push(export);
                    }
                    continue;
                }
                Some(Err(_)) => {
                    return Err(BindError::MalformedArrayExport { export });
                }
                Some(Ok(parsed)) => parsed,
            };

            let element =
                ElementType::from_tag(parsed.tag).ok_or_else(|| BindError::UnknownElementType {
                    array: parsed.name.to_string(),
                    tag: parsed.tag.to_string(),
                })?;
            let len_export =
                engine
                    .export_index(&export)
                    .ok_or_else(|| BindError::UnresolvableExport {
                        export: export.clone(),
                    })?;
            let offset_export = engine
                .export_index(&parsed.offset_export())
                .ok_or_else(|| BindError::MissingOffsetAccessor {
                    array: parsed.name.to_string(),
                })?;

            if arrays.contains_key(parsed.name) {
                return Err(BindError::DuplicateArray {
                    array: parsed.name.to_string(),
                });
            }
            arrays.insert(
                parsed.name.to_string(),
                ArraySchema {
                    name: parsed.name.to_string(),
                    element,
                    len_export,
                    offset_export,
                },
            );
        }

        Ok(Self { arrays, scalars })
    }

    /// Resolve an array name to its id.
    pub fn id_of(&self, name: &str) -> Option<ArrayId> {
        self.arrays.get_index_of(name).map(|i| ArrayId(i as u32))
    }

    /// Look up an array by id.
    pub fn get(&self, id: ArrayId) -> Option<&ArraySchema> {
        self.arrays.get_index(id.0 as usize).map(|(_, entry)| entry)
    }

    /// Look up an array by name.
    pub fn get_by_name(&self, name: &str) -> Option<&ArraySchema> {
        self.arrays.get(name)
    }

    /// Iterate over arrays in export order.
    pub fn iter(&self) -> impl Iterator<Item = (ArrayId, &ArraySchema)> {
        self.arrays
            .values()
            .enumerate()
            .map(|(i, entry)| (ArrayId(i as u32), entry))
    }

    /// Names of the plain scalar exports, in export order.
    pub fn scalars(&self) -> &[String] {
        &self.scalars
    }

    /// Number of arrays.
    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    /// Whether the engine exports no arrays.
    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }
}
