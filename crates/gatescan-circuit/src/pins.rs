//! Symbolic pin names resolved to state-array indices.

use indexmap::IndexMap;

use gatescan_core::PinId;

use crate::error::LoadError;

/// Pin name to [`PinId`], built once from a description.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PinMap {
    pins: IndexMap<String, PinId>,
}

impl PinMap {
    /// Look up a pin.
    pub fn get(&self, name: &str) -> Option<PinId> {
        self.pins.get(name).copied()
    }

    /// Look up a pin that must exist.
    pub fn require(&self, name: &str) -> Result<PinId, LoadError> {
        self.get(name).ok_or_else(|| LoadError::MissingPin {
            name: name.to_string(),
        })
    }

    /// Resolve `prefix[0]` .. `prefix[width - 1]`.
    pub fn bus(&self, prefix: &str, width: usize) -> Result<Vec<PinId>, LoadError> {
        (0..width)
            .map(|i| self.require(&format!("{prefix}[{i}]")))
            .collect()
    }

    /// Number of pins.
    pub fn len(&self) -> usize {
        self.pins.len()
    }

    /// Whether the map has no pins.
    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    /// Pins in description order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, PinId)> {
        self.pins.iter().map(|(name, &pin)| (name.as_str(), pin))
    }
}

impl FromIterator<(String, PinId)> for PinMap {
    fn from_iter<I: IntoIterator<Item = (String, PinId)>>(iter: I) -> Self {
        Self {
            pins: iter.into_iter().collect(),
        }
    }
}
