use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::DemographyError;

struct IndividualKernelInner<X> {
    demes: Vec<X>,
    index: HashMap<X, usize>,
    rows: Vec<WeightedIndex<f64>>,
}

/// Individual-based dispersal: for a departure deme `x`, samples one arrival
/// deme `y` per emigrant from a discrete distribution built from a
/// caller-supplied pairwise weight function.
///
/// The per-row distributions and the heavy `demes`/`index` tables are built
/// once at construction and shared behind an `Rc`, so cloning a kernel handle
/// (e.g. to capture it in a closure passed down several call frames) is O(1)
/// and never mutates the shared state.
#[derive(Clone)]
pub struct IndividualKernel<X> {
    inner: Rc<IndividualKernelInner<X>>,
}

impl<X> IndividualKernel<X>
where
    X: Clone + Eq + Hash + std::fmt::Debug,
{
    /// Builds one [`WeightedIndex`] per departure deme from the
    /// non-normalized pairwise weight function `weight(x, y)`.
    ///
    /// A row whose weights are all zero (or otherwise rejected by
    /// [`WeightedIndex::new`]) is a construction-time error: no sampling is
    /// possible, so the kernel must not be built in the first place rather
    /// than fail lazily on first use.
    pub fn new<W>(demes: Vec<X>, weight: W) -> Result<Self, DemographyError>
    where
        W: Fn(&X, &X) -> f64,
    {
        let index: HashMap<X, usize> = demes
            .iter()
            .cloned()
            .enumerate()
            .map(|(i, x)| (x, i))
            .collect();

        let mut rows = Vec::with_capacity(demes.len());
        for x in &demes {
            let weights: Vec<f64> = demes.iter().map(|y| weight(x, y)).collect();
            let dist = WeightedIndex::new(&weights).map_err(|_| DemographyError::ZeroWeightRow {
                deme: format!("{x:?}"),
            })?;
            rows.push(dist);
        }

        Ok(Self {
            inner: Rc::new(IndividualKernelInner { demes, index, rows }),
        })
    }

    /// Draws a single arrival deme for an emigrant departing `x`.
    pub fn sample_arrival<R: Rng + ?Sized>(&self, rng: &mut R, x: &X) -> Result<X, DemographyError> {
        let row = *self
            .inner
            .index
            .get(x)
            .ok_or_else(|| DemographyError::EmptyArrivalSpace {
                deme: format!("{x:?}"),
            })?;
        let chosen = self.inner.rows[row].sample(rng);
        Ok(self.inner.demes[chosen].clone())
    }
}
