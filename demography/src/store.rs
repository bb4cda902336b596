use std::collections::HashMap;
use std::hash::Hash;

use crate::{DemographyError, Generation};

/// Mapping `(deme, generation) -> population size` and
/// `(deme, generation, deme) -> directed flow count`, with an inverse flow
/// index maintained incrementally so the backward coalescent driver's hot
/// loop (`flow_into`) is `O(|in-neighbors|)` rather than `O(|demes|)`.
///
/// The store exclusively owns size and flow entries for the lifetime of a
/// replicate: the forward engine writes through a `&mut Store`, downstream
/// consumers (the backward driver) only ever hold a `&Store`.
#[derive(Debug, Clone)]
pub struct Store<X> {
    sizes: HashMap<Generation, HashMap<X, u64>>,
    // keyed by (t, y) -> {x: flow(x -> y, t)}
    flow_inverse: HashMap<Generation, HashMap<X, HashMap<X, u64>>>,
    first_time: Generation,
    last_time: Generation,
}

impl<X> Store<X>
where
    X: Clone + Eq + Hash,
{
    /// Seed the store with a single deme/generation/size triple.
    pub fn new(x0: X, t0: Generation, n0: u64) -> Self {
        let mut sizes = HashMap::new();
        sizes.insert(t0, HashMap::from([(x0, n0)]));
        Self {
            sizes,
            flow_inverse: HashMap::new(),
            first_time: t0,
            last_time: t0,
        }
    }

    /// Sets `N(x, t) := n`. Subsequent `get_size(x, t) == n`.
    pub fn set_size(&mut self, x: X, t: Generation, n: u64) {
        self.sizes.entry(t).or_default().insert(x, n);
        self.extend_bounds(t);
    }

    /// Adds `delta` to the current size of `x` at `t`, returning the new
    /// value. Used by the forward engine to accumulate immigrant counts.
    pub fn add_size(&mut self, x: X, t: Generation, delta: u64) -> u64 {
        let entry = self.sizes.entry(t).or_default().entry(x).or_insert(0);
        *entry += delta;
        let new_value = *entry;
        self.extend_bounds(t);
        new_value
    }

    /// Reports the recorded size at `(x, t)`, or `0` if absent.
    pub fn get_size(&self, x: &X, t: Generation) -> u64 {
        self.sizes
            .get(&t)
            .and_then(|m| m.get(x))
            .copied()
            .unwrap_or(0)
    }

    /// Atomically increments `Phi(x -> y, t)` by `delta` and records the
    /// inverse-index entry under `(y, t) -> {x: Phi}`.
    pub fn add_flow(&mut self, x: X, y: X, t: Generation, delta: u64) {
        let entry = self
            .flow_inverse
            .entry(t)
            .or_default()
            .entry(y)
            .or_default()
            .entry(x)
            .or_insert(0);
        *entry += delta;
    }

    /// Sets `Phi(x -> y, t) := n` directly (used by the mass-based strategy,
    /// which computes a deterministic allocation rather than accumulating
    /// one emigrant at a time).
    pub fn set_flow(&mut self, x: X, y: X, t: Generation, n: u64) {
        self.flow_inverse
            .entry(t)
            .or_default()
            .entry(y)
            .or_default()
            .insert(x, n);
    }

    /// Returns the exact pre-image support of `y` at `t`: every `x` with a
    /// recorded `Phi(x -> y, t) > 0` and its weight.
    ///
    /// Fails with [`DemographyError::NoSuchFlow`] if no flow into `(y, t)`
    /// has ever been recorded.
    pub fn flow_into(
        &self,
        y: &X,
        t: Generation,
    ) -> Result<impl Iterator<Item = (&X, u64)> + '_, DemographyError>
    where
        X: std::fmt::Debug,
    {
        match self.flow_inverse.get(&t).and_then(|m| m.get(y)) {
            Some(support) if !support.is_empty() => {
                Ok(support.iter().map(|(x, phi)| (x, *phi)))
            }
            _ => Err(DemographyError::NoSuchFlow {
                deme: format!("{y:?}"),
                time: t,
            }),
        }
    }

    /// Enumerates `{x : N(x, t) > 0}` in unspecified order.
    pub fn demes_with_positive_size(&self, t: Generation) -> impl Iterator<Item = &X> + '_ {
        self.sizes
            .get(&t)
            .into_iter()
            .flat_map(|m| m.iter())
            .filter(|(_, &n)| n > 0)
            .map(|(x, _)| x)
    }

    /// The earliest generation recorded in the store.
    pub fn first_time(&self) -> Generation {
        self.first_time
    }

    /// The latest generation recorded in the store.
    pub fn last_time(&self) -> Generation {
        self.last_time
    }

    fn extend_bounds(&mut self, t: Generation) {
        if t < self.first_time {
            self.first_time = t;
        }
        if t > self.last_time {
            self.last_time = t;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_size_reports_zero() {
        let store: Store<i32> = Store::new(0, Generation::new(0), 10);
        assert_eq!(store.get_size(&1, Generation::new(0)), 0);
    }

    #[test]
    fn set_then_get_size_roundtrips() {
        let mut store: Store<i32> = Store::new(0, Generation::new(0), 10);
        store.set_size(1, Generation::new(1), 42);
        assert_eq!(store.get_size(&1, Generation::new(1)), 42);
    }

    #[test]
    fn add_size_accumulates() {
        let mut store: Store<i32> = Store::new(0, Generation::new(0), 10);
        store.add_size(1, Generation::new(1), 5);
        store.add_size(1, Generation::new(1), 7);
        assert_eq!(store.get_size(&1, Generation::new(1)), 12);
    }

    #[test]
    fn flow_into_reports_no_such_flow_when_absent() {
        let store: Store<i32> = Store::new(0, Generation::new(0), 10);
        assert!(matches!(
            store.flow_into(&0, Generation::new(0)),
            Err(DemographyError::NoSuchFlow { .. })
        ));
    }

    #[test]
    fn flow_into_returns_exact_preimage() {
        let mut store: Store<i32> = Store::new(0, Generation::new(0), 10);
        store.add_flow(-1, 0, Generation::new(0), 3);
        store.add_flow(1, 0, Generation::new(0), 4);
        let mut collected: Vec<(i32, u64)> = store
            .flow_into(&0, Generation::new(0))
            .unwrap()
            .map(|(x, phi)| (*x, phi))
            .collect();
        collected.sort();
        assert_eq!(collected, vec![(-1, 3), (1, 4)]);
    }

    #[test]
    fn demes_with_positive_size_filters_zero_entries() {
        let mut store: Store<i32> = Store::new(0, Generation::new(0), 10);
        store.set_size(1, Generation::new(0), 0);
        store.set_size(2, Generation::new(0), 5);
        let mut positive: Vec<i32> = store
            .demes_with_positive_size(Generation::new(0))
            .copied()
            .collect();
        positive.sort();
        assert_eq!(positive, vec![0, 2]);
    }

    #[test]
    fn bounds_extend_monotonically() {
        let mut store: Store<i32> = Store::new(0, Generation::new(0), 10);
        assert_eq!(store.first_time(), Generation::new(0));
        assert_eq!(store.last_time(), Generation::new(0));
        store.set_size(0, Generation::new(3), 1);
        assert_eq!(store.last_time(), Generation::new(3));
    }
}
