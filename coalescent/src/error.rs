use demography::{DemographyError, Generation};
use thiserror::Error;

/// Error type for the `coalescent` crate.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum CoalescentError {
    /// A query into the underlying store failed; surfaced unchanged.
    #[error(transparent)]
    Demography(#[from] DemographyError),

    /// The forward loop observed zero total emission in a generation before
    /// the recorded history reached its target length.
    #[error("forward expansion extincted before reaching generation {time:?}")]
    ExtinctedBeforeSampling { time: Generation },

    /// At the start of coalescence, a deme held more requested lineages than
    /// its recorded size.
    #[error("sample of {requested} lineages at deme {deme:?} exceeds recorded population {available}")]
    SampleSizeExceedsPopulation {
        deme: String,
        requested: usize,
        available: u64,
    },

    /// The sample specification was empty or held a single lineage (nothing
    /// to coalesce).
    #[error("sample specification is empty or degenerate")]
    EmptySample,

    /// The occupancy-spectrum enumerator reached an unsolvable leaf
    /// (`j_max == 0 && k > 0`). Never returned in practice: the enumerator
    /// backtracks internally. This variant exists only so a `debug_assert!`
    /// site has a typed value to report if that invariant is ever violated.
    #[error("occupancy spectrum enumerator reached an unsolvable leaf for k={k}")]
    UnsolvableSpectrumLeaf { k: u32 },

    /// The recorded forward history ran out with `remaining` lineages still
    /// uncoalesced and no ancestral population size was configured to finish
    /// the job with a Wright-Fisher tail.
    #[error(
        "recorded history exhausted with {remaining} lineages uncoalesced and no ancestral size configured"
    )]
    RecordedHistoryExhausted { remaining: usize },
}

/// The outcome of running one replicate end to end: either a completed
/// forest or a typed failure, so a harness driving many replicates can
/// tally attempted-vs-accepted without matching on panics.
pub type ReplicateOutcome<F> = Result<F, CoalescentError>;
