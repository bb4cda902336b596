//! Forward demographic simulation driving a backward coalescent trace.
//!
//! Builds on [`demography`] (re-exported here so downstream crates need not
//! depend on it separately) to add the genealogical layer: a lineage forest,
//! a forward engine that records flows, a backward driver that consumes
//! them, and an ancestral Wright-Fisher tail for when the recorded history
//! runs out before coalescence completes.

pub use demography;

mod backward;
mod error;
mod forest;
mod forward;
mod merge;
mod wf_tail;

pub use backward::{BackwardDriver, MergePolicy, SpectrumSource};
pub use error::{CoalescentError, ReplicateOutcome};
pub use forest::Forest;
pub use forward::ForwardHistory;
pub use merge::{binary_merge, simultaneous_multiple_merge};
pub use wf_tail::run_wf_tail;

use std::collections::HashMap;
use std::hash::Hash;

use demography::{DispersalKernel, Generation};
use rand::Rng;

/// Runs one full replicate end to end: forward expansion, backward
/// coalescence, and (if the recorded history runs out before a single
/// ancestor is reached) the ancestral Wright-Fisher tail.
///
/// This is the entry point a harness driving many independent replicates
/// should call; it reports success or a typed [`CoalescentError`] rather
/// than panicking, so a caller can tally attempted-vs-accepted replicates
/// without inspecting panics.
#[allow(clippy::too_many_arguments)]
pub fn run_replicate<X, P, R, G, InitSpatial, InitAncestral, Branch>(
    x0: X,
    t0: Generation,
    n0: u64,
    generations: u32,
    growth: G,
    kernel: &DispersalKernel<X>,
    sample: &HashMap<X, usize>,
    t_sample: Generation,
    policy: MergePolicy,
    leaf: impl Fn(&X) -> P,
    init_at_deme: &InitSpatial,
    init_ancestral: &InitAncestral,
    branch: &Branch,
    ancestral_size: Option<u64>,
    rng: &mut R,
) -> ReplicateOutcome<P>
where
    X: Clone + Eq + Hash + std::fmt::Debug,
    R: Rng + ?Sized,
    G: FnMut(&mut R, &X, Generation, u64) -> u64,
    InitSpatial: Fn(&X, Generation) -> P,
    InitAncestral: Fn(i64) -> P,
    Branch: Fn(P, P) -> P,
{
    let mut history = ForwardHistory::new(x0, t0, n0);
    history.expand(generations, growth, kernel, rng)?;

    let mut driver = BackwardDriver::from_sample(sample, history.store(), t_sample, policy, leaf)?;
    driver.run(history.store(), rng, init_at_deme, branch)?;

    let first_time = history.store().first_time();
    let lineages = driver.into_forest().into_all();

    if lineages.len() <= 1 {
        return Ok(lineages
            .into_iter()
            .next()
            .expect("coalescence never empties the forest entirely"));
    }

    match ancestral_size {
        Some(ancestral_size) => Ok(run_wf_tail(
            lineages,
            ancestral_size,
            first_time.value(),
            |depth| init_ancestral(depth),
            branch,
            rng,
        )),
        None => Err(CoalescentError::RecordedHistoryExhausted {
            remaining: lineages.len(),
        }),
    }
}
