//! Vertex ranges occupied by each populated feature.

use rustc_hash::FxHashMap;

/// Maps a feature id to the vertex ranges its paint data was written to.
///
/// A feature may appear several times in one tile (e.g. a line split at tile
/// boundaries), so each id keeps a list of half-open ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeaturePositionMap {
    positions: FxHashMap<u64, Vec<(usize, usize)>>,
}

impl FeaturePositionMap {
    /// Record that `id` occupies vertices `start..end`. Empty ranges are
    /// ignored.
    pub fn add(&mut self, id: u64, start: usize, end: usize) {
        if start >= end {
            return;
        }
        self.positions.entry(id).or_default().push((start, end));
    }

    /// Ranges recorded for `id`.
    #[must_use]
    pub fn ranges(&self, id: u64) -> &[(usize, usize)] {
        self.positions.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of distinct features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
