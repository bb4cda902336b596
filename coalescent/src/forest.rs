use std::collections::HashMap;
use std::hash::Hash;

/// A multiset of `(deme, lineage-payload)` pairs, grouped by deme for the
/// backward driver's co-location merger.
///
/// `P` is opaque to this crate: no `Clone` bound is carried anywhere on the
/// forest, so payload ownership moves on every merge rather than being
/// duplicated, mirroring the "move-construction must not invalidate payload
/// ownership" contract the original simulator's own lineage container
/// enforced through its non-copyable node type.
#[derive(Debug, Clone)]
pub struct Forest<X, P> {
    by_deme: HashMap<X, Vec<P>>,
}

impl<X, P> Default for Forest<X, P>
where
    X: Eq + Hash,
{
    fn default() -> Self {
        Self {
            by_deme: HashMap::new(),
        }
    }
}

impl<X, P> Forest<X, P>
where
    X: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, x: X, payload: P) {
        self.by_deme.entry(x).or_default().push(payload);
    }

    pub fn insert_many(&mut self, x: X, payloads: impl IntoIterator<Item = P>) {
        self.by_deme.entry(x).or_default().extend(payloads);
    }

    /// Distinct deme keys currently holding at least one lineage.
    pub fn positions(&self) -> impl Iterator<Item = &X> + '_ {
        self.by_deme
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(x, _)| x)
    }

    pub fn range_at(&self, x: &X) -> &[P] {
        self.by_deme.get(x).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Removes and returns every lineage at `x`, leaving the deme empty.
    pub fn erase(&mut self, x: &X) -> Vec<P> {
        self.by_deme.remove(x).unwrap_or_default()
    }

    pub fn size_at(&self, x: &X) -> usize {
        self.by_deme.get(x).map(Vec::len).unwrap_or(0)
    }

    /// Total number of lineages across every deme.
    pub fn size(&self) -> usize {
        self.by_deme.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Consumes the forest, returning every lineage regardless of deme.
    /// Used once coalescence has finished (or the recorded history has run
    /// out) and the remaining lineages are handed to the ancestral
    /// Wright-Fisher tail, which has no notion of spatial position.
    pub fn into_all(self) -> Vec<P> {
        self.by_deme.into_values().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_range_at_roundtrips() {
        let mut forest: Forest<i32, &'static str> = Forest::new();
        forest.insert(0, "a");
        forest.insert(0, "b");
        assert_eq!(forest.range_at(&0), &["a", "b"]);
    }

    #[test]
    fn erase_empties_the_deme_and_returns_its_contents() {
        let mut forest: Forest<i32, &'static str> = Forest::new();
        forest.insert(0, "a");
        let taken = forest.erase(&0);
        assert_eq!(taken, vec!["a"]);
        assert_eq!(forest.size_at(&0), 0);
    }

    #[test]
    fn positions_excludes_emptied_demes() {
        let mut forest: Forest<i32, &'static str> = Forest::new();
        forest.insert(0, "a");
        forest.insert(1, "b");
        forest.erase(&0);
        let positions: Vec<&i32> = forest.positions().collect();
        assert_eq!(positions, vec![&1]);
    }

    #[test]
    fn size_counts_every_lineage_across_demes() {
        let mut forest: Forest<i32, &'static str> = Forest::new();
        forest.insert_many(0, ["a", "b", "c"]);
        forest.insert(1, "d");
        assert_eq!(forest.size(), 4);
    }

    #[test]
    fn into_all_flattens_every_deme() {
        let mut forest: Forest<i32, &'static str> = Forest::new();
        forest.insert_many(0, ["a", "b"]);
        forest.insert(1, "c");
        let mut all = forest.into_all();
        all.sort();
        assert_eq!(all, vec!["a", "b", "c"]);
    }
}
