mod individual;
mod mass;
mod neighboring;

pub use individual::IndividualKernel;
pub use mass::MatrixKernel;
pub use neighboring::NeighboringMigration;

use std::hash::Hash;

use rand::Rng;

use crate::DemographyError;

/// The two dispersal strategies a forward history can be built from.
///
/// The forward engine is polymorphic over the capability set each variant
/// offers rather than over a shared trait: individual-based dispersal draws
/// one arrival deme per emigrant (`sample_arrival`), while mass-based
/// dispersal reports a deterministic arrival space and per-destination rate
/// (`arrival_space`, `rate`) that the engine multiplies against a raw
/// emigrant count. `NeighboringMigration` is folded into the mass-based arm
/// since it offers the same two-method interface, just computed lazily.
#[derive(Clone)]
pub enum DispersalKernel<X> {
    IndividualBased(IndividualKernel<X>),
    MassBased(MassStrategy<X>),
}

/// The concrete mass-based strategy backing [`DispersalKernel::MassBased`].
#[derive(Clone)]
pub enum MassStrategy<X> {
    Matrix(MatrixKernel<X>),
    Neighboring(std::rc::Rc<NeighboringMigration<X>>),
}

impl<X> MassStrategy<X>
where
    X: Clone + Eq + Hash + std::fmt::Debug,
{
    pub fn arrival_space(&self, x: &X) -> Result<Vec<X>, DemographyError> {
        match self {
            MassStrategy::Matrix(k) => k.arrival_space(x),
            MassStrategy::Neighboring(k) => k.arrival_space(x),
        }
    }

    pub fn rate(&self, x: &X, y: &X) -> Result<f64, DemographyError> {
        match self {
            MassStrategy::Matrix(k) => k.rate(x, y),
            MassStrategy::Neighboring(k) => k.rate(x, y),
        }
    }
}

impl<X> DispersalKernel<X>
where
    X: Clone + Eq + Hash + std::fmt::Debug,
{
    /// Draws a single arrival deme for one emigrant departing `x`. Only
    /// meaningful for [`DispersalKernel::IndividualBased`]; mass-based
    /// strategies are driven through `arrival_space`/`rate` instead, since
    /// they allocate emigrant counts deterministically rather than one at a
    /// time.
    pub fn sample_arrival<R: Rng + ?Sized>(&self, rng: &mut R, x: &X) -> Result<X, DemographyError> {
        match self {
            DispersalKernel::IndividualBased(k) => k.sample_arrival(rng, x),
            DispersalKernel::MassBased(_) => Err(DemographyError::EmptyArrivalSpace {
                deme: format!("{x:?}"),
            }),
        }
    }
}
