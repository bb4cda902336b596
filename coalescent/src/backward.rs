use std::collections::HashMap;
use std::hash::Hash;

use demography::{spectrum, Generation, Store};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::forest::Forest;
use crate::merge;
use crate::CoalescentError;

/// Where a simultaneous-multiple-merger spectrum for `(k, N)` comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpectrumSource {
    /// Simulate the ball-and-urn process directly, bypassing enumeration.
    OnTheFly,
    /// Draw from the process-wide memoized distribution.
    Memoized,
}

/// How colocated lineages are merged within a single generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Wright-Fisher binary coalescence: probability `C(k,2)/N`, capped at 1.
    Binary,
    /// Simultaneous multiple mergers drawn from an occupancy spectrum.
    SimultaneousMultiple { spectrum_source: SpectrumSource },
}

struct BackwardRow<X> {
    sources: Vec<X>,
    dist: WeightedIndex<u64>,
}

/// Consumes a recorded [`Store`] and an initial sampled [`Forest`], tracing
/// lineages backward generation by generation.
///
/// Backward transition rows (the discrete distribution over source demes
/// feeding a given `(x, t)`) are cached the first time each is queried,
/// mirroring `TransitionKernel`'s lazy-build-then-reuse contract.
pub struct BackwardDriver<X, P> {
    forest: Forest<X, P>,
    policy: MergePolicy,
    sample_time: Generation,
    cached_rows: HashMap<(X, Generation), BackwardRow<X>>,
}

impl<X, P> BackwardDriver<X, P>
where
    X: Clone + Eq + Hash + std::fmt::Debug,
{
    /// Builds the initial forest from a sample specification: `count`
    /// lineages at each deme `x`, each created by calling `leaf(x)`.
    ///
    /// Fails with [`CoalescentError::EmptySample`] if the specification is
    /// empty or sums to fewer than two lineages (nothing to coalesce), and
    /// with [`CoalescentError::SampleSizeExceedsPopulation`] if a requested
    /// count exceeds the recorded size at `(x, t_sample)`.
    pub fn from_sample(
        sample: &HashMap<X, usize>,
        store: &Store<X>,
        t_sample: Generation,
        policy: MergePolicy,
        leaf: impl Fn(&X) -> P,
    ) -> Result<Self, CoalescentError> {
        if sample.is_empty() || sample.values().sum::<usize>() < 2 {
            return Err(CoalescentError::EmptySample);
        }

        let mut forest = Forest::new();
        for (x, &count) in sample {
            let available = store.get_size(x, t_sample);
            if count as u64 > available {
                return Err(CoalescentError::SampleSizeExceedsPopulation {
                    deme: format!("{x:?}"),
                    requested: count,
                    available,
                });
            }
            forest.insert_many(x.clone(), (0..count).map(|_| leaf(x)));
        }

        Ok(Self {
            forest,
            policy,
            sample_time: t_sample,
            cached_rows: HashMap::new(),
        })
    }

    /// Runs the backward loop from the sampling generation down to
    /// `first_time()`, applying one final co-location merge pass at
    /// `first_time()`.
    ///
    /// Stops early (skipping remaining generations) once the forest holds a
    /// single lineage. `init` synthesizes a fresh parent payload for `(x, t)`
    /// (the "node factory"); `branch` absorbs a child into a parent. Both
    /// are opaque callables, never interpreted by this crate.
    pub fn run<R, I, B>(
        &mut self,
        store: &Store<X>,
        rng: &mut R,
        init: &I,
        branch: &B,
    ) -> Result<(), CoalescentError>
    where
        R: Rng + ?Sized,
        I: Fn(&X, Generation) -> P,
        B: Fn(P, P) -> P,
    {
        let mut t = self.sample_time;
        let first = store.first_time();

        loop {
            self.merge_colocated(store, t, rng, init, branch)?;

            if self.forest.size() <= 1 || t <= first {
                break;
            }

            self.migrate_backward(store, t, rng)?;
            t = t.prev();
        }

        Ok(())
    }

    fn merge_colocated<R, I, B>(
        &mut self,
        store: &Store<X>,
        t: Generation,
        rng: &mut R,
        init: &I,
        branch: &B,
    ) -> Result<(), CoalescentError>
    where
        R: Rng + ?Sized,
        I: Fn(&X, Generation) -> P,
        B: Fn(P, P) -> P,
    {
        let positions: Vec<X> = self.forest.positions().cloned().collect();

        for x in positions {
            if self.forest.size_at(&x) < 2 {
                continue;
            }

            let mut v = self.forest.erase(&x);
            let k = v.len();
            let n = store.get_size(&x, t);

            match self.policy {
                MergePolicy::Binary => {
                    let prob = ((k * (k - 1)) as f64 / 2.0 / n as f64).min(1.0);
                    if rng.gen::<f64>() < prob {
                        merge::binary_merge(&mut v, rng, || init(&x, t), branch);
                    }
                }
                MergePolicy::SimultaneousMultiple { spectrum_source } => {
                    let spectrum = match spectrum_source {
                        SpectrumSource::OnTheFly => {
                            spectrum::sample_on_the_fly(k as u32, n as u32, rng)
                        }
                        SpectrumSource::Memoized => {
                            spectrum::memoize(k as u32, n as u32).sample(rng).clone()
                        }
                    };
                    merge::simultaneous_multiple_merge(&mut v, rng, &spectrum, || init(&x, t), branch);
                }
            }

            self.forest.insert_many(x, v);
        }

        Ok(())
    }

    fn migrate_backward<R: Rng + ?Sized>(
        &mut self,
        store: &Store<X>,
        t: Generation,
        rng: &mut R,
    ) -> Result<(), CoalescentError> {
        let size_before = self.forest.size();
        let mut next = Forest::new();

        let positions: Vec<X> = self.forest.positions().cloned().collect();
        for x in positions {
            let payloads = self.forest.erase(&x);
            for payload in payloads {
                let source = self.sample_source(store, &x, t, rng)?;
                next.insert(source, payload);
            }
        }

        debug_assert_eq!(
            next.size(),
            size_before,
            "backward migration must conserve forest size"
        );

        self.forest = next;
        Ok(())
    }

    fn sample_source<R: Rng + ?Sized>(
        &mut self,
        store: &Store<X>,
        x: &X,
        t: Generation,
        rng: &mut R,
    ) -> Result<X, CoalescentError> {
        let key = (x.clone(), t);
        if !self.cached_rows.contains_key(&key) {
            let mut sources = Vec::new();
            let mut weights = Vec::new();
            for (source, phi) in store.flow_into(x, t.prev())? {
                sources.push(source.clone());
                weights.push(phi);
            }
            let dist = WeightedIndex::new(&weights).map_err(|_| demography::DemographyError::NoSuchFlow {
                deme: format!("{x:?}"),
                time: t.prev(),
            })?;
            self.cached_rows.insert(key.clone(), BackwardRow { sources, dist });
        }

        let row = &self.cached_rows[&key];
        let chosen = row.dist.sample(rng);
        Ok(row.sources[chosen].clone())
    }

    /// The forest as it currently stands (after `run`, the coalesced
    /// result; mid-run, an implementation detail exposed for testing).
    pub fn forest(&self) -> &Forest<X, P> {
        &self.forest
    }

    pub fn into_forest(self) -> Forest<X, P> {
        self.forest
    }
}
