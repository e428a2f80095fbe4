//! Measured item widths keyed by item identity.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone)]
pub struct WidthTable<K> {
    widths: HashMap<K, f32>,
}

impl<K> Default for WidthTable<K> {
    fn default() -> Self {
        Self {
            widths: HashMap::new(),
        }
    }
}

impl<K> WidthTable<K>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert a width. Returns `false` when the stored value is already equal,
    /// so callers can skip downstream recomputation.
    ///
    /// Negative or non-finite measurements are stored as zero.
    pub fn record(&mut self, key: K, width: f32) -> bool {
        let width = if width.is_finite() { width.max(0.0) } else { 0.0 };
        match self.widths.get_mut(&key) {
            Some(existing) if *existing == width => false,
            Some(existing) => {
                *existing = width;
                true
            }
            None => {
                self.widths.insert(key, width);
                true
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<f32> {
        self.widths.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    /// Whether exactly `item_count` identities have reported.
    pub fn is_complete(&self, item_count: usize) -> bool {
        self.widths.len() == item_count
    }

    pub fn total(&self) -> f32 {
        self.widths.values().sum()
    }

    pub fn clear(&mut self) {
        self.widths.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_is_idempotent() {
        let mut table = WidthTable::new();
        assert!(table.record("a", 100.0));
        assert!(!table.record("a", 100.0));
        assert!(table.record("a", 120.0));
        assert_eq!(table.get(&"a"), Some(120.0));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn order_does_not_matter() {
        let mut forward = WidthTable::new();
        let mut backward = WidthTable::new();
        for (key, width) in [(1_u32, 100.0), (2, 150.0), (3, 200.0)] {
            forward.record(key, width);
        }
        for (key, width) in [(3_u32, 200.0), (2, 150.0), (1, 100.0)] {
            backward.record(key, width);
        }
        assert_eq!(forward.total(), backward.total());
        assert!(forward.is_complete(3));
        assert!(!forward.is_complete(4));
    }

    #[test]
    fn bogus_widths_clamp_to_zero() {
        let mut table = WidthTable::new();
        table.record('x', -5.0);
        table.record('y', f32::NAN);
        assert_eq!(table.total(), 0.0);
        assert!(!table.record('x', 0.0));
    }

    #[test]
    fn clear_empties() {
        let mut table = WidthTable::new();
        table.record(1, 10.0);
        table.clear();
        assert!(table.is_empty());
        assert!(table.is_complete(0));
    }
}
