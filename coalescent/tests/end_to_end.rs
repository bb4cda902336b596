//! End-to-end coalescent scenarios: a two-deme migration run through the
//! top-level replicate entry point, rejection of malformed samples, and the
//! ancestral Wright-Fisher tail's reduction of a forest to a single lineage.

use std::collections::HashMap;

use coalescent::{run_replicate, run_wf_tail, BackwardDriver, MergePolicy};
use demography::{DispersalKernel, Generation, IndividualKernel, Store};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Poisson};

/// An integer lineage payload where merging sums the two children, so the
/// total population mass conserved across every merge is directly checkable
/// against the sample size.
fn sum_branch(a: u32, b: u32) -> u32 {
    a + b
}

#[test]
fn two_deme_symmetric_migration_coalesces_to_a_single_lineage() {
    // Demes {-1, +1}, seed (x0=1, N0=100, t0=0), growth = Poisson(2*N(x,t)),
    // dispersal = uniform flip-sign, 3 generations, sampling 30 lineages at
    // +1 at t=3. Driven through the top-level `run_replicate` entry point
    // end to end.
    let demes = vec![-1i32, 1i32];
    let kernel = DispersalKernel::IndividualBased(
        IndividualKernel::new(demes, |_x: &i32, _y: &i32| 1.0).unwrap(),
    );

    let mut rng = SmallRng::seed_from_u64(1234);
    let mut sample = HashMap::new();
    sample.insert(1i32, 30usize);

    let growth = |rng: &mut SmallRng, _x: &i32, _t: Generation, n: u64| {
        Poisson::new(2.0 * n as f64)
            .map(|dist| dist.sample(rng).round() as u64)
            .unwrap_or(0)
    };

    let outcome = run_replicate(
        1i32,
        Generation::new(0),
        100,
        3,
        growth,
        &kernel,
        &sample,
        Generation::new(3),
        MergePolicy::Binary,
        |_x| 1u32,
        &|_x, _t| 0u32,
        &|_depth| 0u32,
        &sum_branch,
        Some(100),
        &mut rng,
    );

    let root = outcome.expect("a finite ancestral size always finishes coalescence");
    assert_eq!(root, 30, "all 30 sampled lineages must merge into one root");
}

// The literal binary-merger-probability scenario (k=4, N=3, capped at 1)
// lives in `coalescent::backward`'s own `#[cfg(test)]` module, since it
// exercises the private `merge_colocated` step directly rather than the
// full `from_sample` entry point (which correctly refuses a sample larger
// than the recorded population at the sampling generation).

#[test]
fn ancestral_wf_tail_reduces_four_lineages_to_one_within_three_merges() {
    // Forest of 4 lineages after recorded history, ancestral N=10 =>
    // p = 1/(1 + 10/C(4,2)) = 1/(1 + 10/6); since k <= ancestral_size no
    // trimming round runs, so exactly k-1=3 binary merges finish the job.
    let lineages = vec![1u32, 2, 3, 4];
    let mut rng = SmallRng::seed_from_u64(77);
    let root = run_wf_tail(lineages, 10, 0, |_depth| 0u32, sum_branch, &mut rng);
    assert_eq!(root, 10, "sum of 1+2+3+4 conserved through exactly 3 merges");
}

#[test]
fn empty_sample_is_rejected_before_any_merge_attempt() {
    let store: Store<i32> = Store::new(0, Generation::new(0), 10);
    let sample: HashMap<i32, usize> = HashMap::new();
    let result = BackwardDriver::from_sample(
        &sample,
        &store,
        Generation::new(0),
        MergePolicy::Binary,
        |_x| 0u32,
    );
    assert!(result.is_err());
}

#[test]
fn oversized_sample_is_rejected_with_a_typed_error() {
    let store: Store<i32> = Store::new(0, Generation::new(0), 5);
    let mut sample = HashMap::new();
    sample.insert(0i32, 10usize);
    let result = BackwardDriver::from_sample(
        &sample,
        &store,
        Generation::new(0),
        MergePolicy::Binary,
        |_x| 0u32,
    );
    assert!(matches!(
        result,
        Err(coalescent::CoalescentError::SampleSizeExceedsPopulation { .. })
    ));
}
