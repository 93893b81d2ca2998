//! Last-value cache for derived state

/// Caches the value derived from a key, recomputing only when the key changes
///
/// Keys are cheap fingerprints of the inputs (revision counters, sizes), not
/// the inputs themselves.
#[derive(Debug, Clone)]
pub struct Memo<K, V> {
    entry: Option<(K, V)>,
    computations: u64,
}

impl<K: PartialEq, V> Memo<K, V> {
    pub fn new() -> Self {
        Self {
            entry: None,
            computations: 0,
        }
    }

    /// Return the cached value for `key`, computing it first when stale
    ///
    /// The flag is `true` when `compute` ran.
    pub fn get_or_compute(&mut self, key: K, compute: impl FnOnce() -> V) -> (&V, bool) {
        let fresh = matches!(&self.entry, Some((cached, _)) if *cached == key);
        if !fresh {
            self.computations += 1;
            self.entry = None;
        }
        let (_, value) = self.entry.get_or_insert_with(|| (key, compute()));
        (&*value, !fresh)
    }

    /// Last computed value, if any
    pub fn cached(&self) -> Option<&V> {
        self.entry.as_ref().map(|(_, value)| value)
    }

    /// Number of times a value has been computed
    pub fn computations(&self) -> u64 {
        self.computations
    }

    /// Drop the cached value so the next read recomputes
    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

impl<K: PartialEq, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recomputes_only_on_key_change() {
        let mut memo = Memo::new();

        let (value, computed) = memo.get_or_compute(1, || "one");
        assert_eq!((*value, computed), ("one", true));

        let (value, computed) = memo.get_or_compute(1, || "never");
        assert_eq!((*value, computed), ("one", false));

        let (value, computed) = memo.get_or_compute(2, || "two");
        assert_eq!((*value, computed), ("two", true));

        assert_eq!(memo.computations(), 2);
    }

    #[test]
    fn test_invalidate_forces_recompute() {
        let mut memo = Memo::new();
        memo.get_or_compute((0, 0), || 10);
        memo.invalidate();
        assert!(memo.cached().is_none());

        let (_, computed) = memo.get_or_compute((0, 0), || 10);
        assert!(computed);
    }
}
