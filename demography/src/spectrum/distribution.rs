use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use super::enumerate::{generate, Spectrum};
use super::probability::probability;
use crate::DemographyError;

/// The full probability distribution over occupancy spectra of `k` balls
/// into `N` urns, built by exhaustive enumeration.
///
/// Mirrors the original simulator's `OccupancySpectrumDistribution`: the
/// enumerator's callback is used to populate parallel `support`/`weights`
/// vectors, and sampling draws an index from a discrete distribution over
/// those weights rather than re-walking the enumeration.
#[derive(Debug, Clone)]
pub struct SpectrumDistribution {
    k: u32,
    n: u32,
    support: Vec<Spectrum>,
    weights: Vec<f64>,
}

impl SpectrumDistribution {
    /// Enumerates every occupancy spectrum of `k` balls into `n` urns and
    /// computes its exact probability.
    ///
    /// The two conservation invariants (every urn counted, every ball
    /// counted) are enforced by the enumerator's own descent, not by this
    /// constructor; a violation here would be an enumerator bug rather
    /// than a caller error, so it is a `debug_assert!`
    /// (`DemographyError::SpectrumInvariantBroken` exists as the typed
    /// value such a check would report) rather than a runtime `Result`.
    pub fn build(k: u32, n: u32) -> Self {
        Self::build_filtered(k, n, |_| true)
    }

    /// As [`Self::build`], but drops spectra whose probability fails
    /// `keep`. Used to discard negligible-probability tails when the
    /// full support would otherwise be unwieldy.
    pub fn build_filtered(k: u32, n: u32, keep: impl Fn(f64) -> bool) -> Self {
        Self::build_filtered_edited(k, n, keep, |s| s)
    }

    /// As [`Self::build_filtered`], but also runs every retained spectrum
    /// through `edit` before it is stored (e.g. [`super::truncate_trailing_zeros`]).
    /// The probability used for filtering and weighting is computed from the
    /// *pre-edit* spectrum, since the edit may change its shape without
    /// changing the event it represents.
    pub fn build_filtered_edited(
        k: u32,
        n: u32,
        keep: impl Fn(f64) -> bool,
        edit: impl Fn(Spectrum) -> Spectrum,
    ) -> Self {
        let mut support = Vec::new();
        let mut weights = Vec::new();

        generate(k, n, &mut |spectrum| {
            debug_assert!(
                spectrum.iter().sum::<u32>() == n,
                "{}",
                DemographyError::SpectrumInvariantBroken {
                    expected_k: k,
                    expected_n: n,
                }
            );
            let p = probability(k, n, &spectrum);
            if keep(p) {
                support.push(edit(spectrum));
                weights.push(p);
            }
        });

        Self {
            k,
            n,
            support,
            weights,
        }
    }

    pub fn k(&self) -> u32 {
        self.k
    }

    pub fn n(&self) -> u32 {
        self.n
    }

    pub fn support(&self) -> &[Spectrum] {
        &self.support
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Draws one occupancy spectrum, weighted by its exact probability.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> &Spectrum {
        let dist = WeightedIndex::new(&self.weights).expect("build() rejects empty-support distributions");
        &self.support[dist.sample(rng)]
    }
}

/// Throws `k` balls uniformly into `n` urns directly, without building the
/// full distribution.
///
/// For large `k` the number of distinct spectra grows too fast to
/// enumerate; this samples a single draw from the underlying urn
/// allocation process directly, which has the same marginal distribution
/// over spectra as drawing from [`SpectrumDistribution`] but costs `O(k)`
/// rather than `O(partitions(k, n))`.
pub fn sample_on_the_fly<R: Rng + ?Sized>(k: u32, n: u32, rng: &mut R) -> Spectrum {
    let mut urns = vec![0u32; n as usize];
    for _ in 0..k {
        let chosen = rng.gen_range(0..n as usize);
        urns[chosen] += 1;
    }

    let mut spectrum = vec![0u32; k as usize + 1];
    for count in urns {
        spectrum[count as usize] += 1;
    }
    spectrum
}

thread_local! {
    static CACHE: RefCell<HashMap<(u32, u32), Rc<SpectrumDistribution>>> = RefCell::new(HashMap::new());
}

/// Returns the (possibly cached) [`SpectrumDistribution`] for `(k, n)`,
/// building and caching it on first use.
///
/// The cache is append-only and thread-local: a single replicate runs on a
/// single thread, and requesting the same `(k, n)` pair repeatedly across a
/// run of many coalescent events is the common case this is built for.
pub fn memoize(k: u32, n: u32) -> Rc<SpectrumDistribution> {
    CACHE.with(|cache| {
        if let Some(existing) = cache.borrow().get(&(k, n)) {
            return Rc::clone(existing);
        }
        let built = Rc::new(SpectrumDistribution::build(k, n));
        cache.borrow_mut().insert((k, n), Rc::clone(&built));
        built
    })
}
