//! Qubit index normalization.
//!
//! Source formats may address qubits with sparse or unordered
//! identifiers (e.g. line qubits {0, 2, 4}). Before dense tensor math or
//! cross-format translation, those identifiers are mapped onto a
//! contiguous canonical range `[0..k)` in ascending numeric order.

use rustc_hash::FxHashMap;
use std::hash::Hash;

/// A bijection from source qubit identifiers onto contiguous indices.
///
/// Built once per circuit and consumed by decoders and the unitary
/// calculator. The mapping assigns `0..k` in ascending order of the
/// source identifiers.
#[derive(Debug, Clone)]
pub struct ReindexTable<K = u32> {
    map: FxHashMap<K, u32>,
    keys: Vec<K>,
}

impl<K: Copy + Ord + Hash + Eq> ReindexTable<K> {
    /// Build a table from an arbitrary set of source identifiers.
    ///
    /// Duplicates are collapsed; an empty input yields an empty table
    /// (the 0-qubit circuit is a defined degenerate case, not an error).
    pub fn from_indices(indices: impl IntoIterator<Item = K>) -> Self {
        let mut keys: Vec<K> = indices.into_iter().collect();
        keys.sort_unstable();
        keys.dedup();
        let map = keys
            .iter()
            .enumerate()
            .map(|(i, &k)| (k, i as u32))
            .collect();
        Self { map, keys }
    }

    /// Look up the contiguous index for a source identifier.
    pub fn get(&self, key: K) -> Option<u32> {
        self.map.get(&key).copied()
    }

    /// The source identifiers in ascending order.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Number of distinct identifiers.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Check whether the mapping is the identity on `0..k`.
    pub fn is_identity(&self) -> bool
    where
        K: TryInto<u32>,
    {
        self.keys
            .iter()
            .enumerate()
            .all(|(i, &k)| k.try_into().map(|v: u32| v == i as u32).unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_ascending() {
        let table = ReindexTable::from_indices([4u32, 0, 2]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(0), Some(0));
        assert_eq!(table.get(2), Some(1));
        assert_eq!(table.get(4), Some(2));
        assert_eq!(table.get(1), None);
        assert!(!table.is_identity());
    }

    #[test]
    fn test_duplicates_collapsed() {
        let table = ReindexTable::from_indices([3u32, 3, 1, 1]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.keys(), &[1, 3]);
    }

    #[test]
    fn test_empty_is_degenerate_not_error() {
        let table: ReindexTable<u32> = ReindexTable::from_indices([]);
        assert!(table.is_empty());
        assert!(table.is_identity());
    }

    #[test]
    fn test_identity() {
        let table = ReindexTable::from_indices([0u32, 1, 2]);
        assert!(table.is_identity());
    }

    #[test]
    fn test_signed_keys() {
        let table = ReindexTable::from_indices([7i64, 5]);
        assert_eq!(table.get(5), Some(0));
        assert_eq!(table.get(7), Some(1));
    }
}
