pub(crate) mod enumerate;
mod distribution;
mod probability;

pub use distribution::{memoize, sample_on_the_fly, SpectrumDistribution};
pub use enumerate::{generate, truncate_trailing_zeros, Spectrum};
pub use probability::probability;
