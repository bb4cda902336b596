use crate::Generation;
use thiserror::Error;

/// Error type for the `demography` crate.
///
/// Mirrors the scoped, `#[from]`-convertible error enums used throughout this
/// corpus: one flat enum per crate rather than a hierarchy of nested error
/// types.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum DemographyError {
    /// Backward lookup into a deme that received no recorded flow at the
    /// requested generation.
    #[error("no flow recorded into deme {deme:?} at generation {time:?}")]
    NoSuchFlow { deme: String, time: Generation },

    /// A size query landed on a generation never written for that deme.
    /// Recoverable at most call sites (treated as zero), but distinguished
    /// here for callers that must tell "never recorded" from "recorded as
    /// zero".
    #[error("no size recorded for deme {deme:?} at generation {time:?}")]
    NoSuchSize { deme: String, time: Generation },

    /// A dispersal kernel has no positive-probability destination for the
    /// given departure deme; the forward loop would stall.
    #[error("dispersal kernel has an empty arrival space at deme {deme:?}")]
    EmptyArrivalSpace { deme: String },

    /// A row of an individual-based weight matrix, or a mass-based migration
    /// matrix, summed to zero: no destination can be sampled/allocated.
    #[error("dispersal weight row for deme {deme:?} sums to zero")]
    ZeroWeightRow { deme: String },

    /// An occupancy spectrum failed one of its two balance equations.
    /// Indicates a bug in the enumerator or sampler, not caller error.
    #[error("occupancy spectrum invariant broken for k={expected_k}, N={expected_n}")]
    SpectrumInvariantBroken { expected_k: u32, expected_n: u32 },
}
