//! Level to embed colour mapping.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::level::FemtoLevel;

/// Colour used for levels absent from a [`ColorMap`] (black).
pub const DEFAULT_COLOR: u32 = 0x000000;

/// Built-in colours keyed by the standard severities.
pub const DEFAULT_COLOR_MAPPINGS: [(FemtoLevel, u32); 5] = [
    (FemtoLevel::Debug, 0x63C5DA),
    (FemtoLevel::Info, 0x63C5DA),
    (FemtoLevel::Warn, 0xFFA500),
    (FemtoLevel::Error, 0xFF0000),
    (FemtoLevel::Critical, 0x8B0000),
];

static DEFAULT_COLOR_MAP: Lazy<ColorMap> =
    Lazy::new(|| DEFAULT_COLOR_MAPPINGS.into_iter().collect());

/// Mapping from level to a 24-bit RGB colour.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorMap {
    colors: HashMap<FemtoLevel, u32>,
}

impl ColorMap {
    /// An empty map; every level resolves to [`DEFAULT_COLOR`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the colour for `level`, replacing any previous mapping.
    pub fn with(mut self, level: FemtoLevel, color: u32) -> Self {
        self.colors.insert(level, color);
        self
    }

    /// Colour for `level`, or [`DEFAULT_COLOR`] when unmapped.
    pub fn color_for(&self, level: FemtoLevel) -> u32 {
        self.colors.get(&level).copied().unwrap_or(DEFAULT_COLOR)
    }

    pub fn get(&self, level: FemtoLevel) -> Option<u32> {
        self.colors.get(&level).copied()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// A copy of the built-in table.
pub fn default_color_map() -> ColorMap {
    DEFAULT_COLOR_MAP.clone()
}

impl FromIterator<(FemtoLevel, u32)> for ColorMap {
    fn from_iter<I: IntoIterator<Item = (FemtoLevel, u32)>>(iter: I) -> Self {
        Self {
            colors: iter.into_iter().collect(),
        }
    }
}
