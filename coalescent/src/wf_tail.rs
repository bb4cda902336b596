use demography::spectrum;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, Geometric};

use crate::merge;

/// Finishes coalescence in a panmictic ancestral population once the
/// spatially recorded history is exhausted.
///
/// If more lineages remain than the ancestral population can be modeled
/// as holding at once (`lineages.len() > ancestral_size`), one
/// simultaneous-multiple-merge round (spectrum sampled on the fly for
/// `(k, ancestral_size)`) brings the count down first. From there, pairs
/// of lineages are merged one at a time with a geometrically distributed
/// waiting gap between merges, `p = 1 / (1 + ancestral_size / C(k, 2))`,
/// until a single lineage remains.
///
/// `depth` is the generation depth at the point the tail takes over; each
/// merge's waiting time is subtracted from it before `init` synthesizes
/// the new parent, so the returned tree's branch lengths stay consistent
/// with the generational gaps the waiting times represent.
pub fn run_wf_tail<P, R: Rng + ?Sized>(
    mut lineages: Vec<P>,
    ancestral_size: u64,
    mut depth: i64,
    init: impl Fn(i64) -> P,
    branch: impl Fn(P, P) -> P,
    rng: &mut R,
) -> P {
    assert!(
        lineages.len() >= 2,
        "run_wf_tail requires at least two lineages"
    );

    let mut k = lineages.len() as u32;
    if k > ancestral_size as u32 {
        let spectrum = spectrum::sample_on_the_fly(k, ancestral_size as u32, rng);
        merge::simultaneous_multiple_merge(&mut lineages, rng, &spectrum, || init(depth), &branch);
        k = lineages.len() as u32;
    }

    while k > 1 {
        let pairs = (k * (k - 1)) as f64 / 2.0;
        let p = 1.0 / (1.0 + ancestral_size as f64 / pairs);
        let waiting_time: u64 = Geometric::new(p)
            .expect("p derived from a positive pair count stays in (0, 1]")
            .sample(rng);
        depth -= waiting_time as i64;

        lineages.shuffle(rng);
        let last = lineages.pop().expect("k > 1 guarantees at least two lineages");
        let second_last = lineages.pop().expect("k > 1 guarantees at least two lineages");
        let parent = branch(branch(init(depth), second_last), last);
        lineages.push(parent);

        k -= 1;
    }

    lineages.pop().expect("loop exits with exactly one lineage")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn branch_sum(a: i32, b: i32) -> i32 {
        a + b
    }

    #[test]
    fn four_lineages_reduce_to_a_single_one() {
        let lineages = vec![1, 2, 3, 4];
        let mut rng = SmallRng::seed_from_u64(13);
        let root = run_wf_tail(lineages, 10, 0, |_depth| 0, branch_sum, &mut rng);
        assert_eq!(root, 10); // 1+2+3+4, conserved through every merge
    }

    #[test]
    fn excess_lineages_are_trimmed_before_the_geometric_phase() {
        let lineages: Vec<i32> = (1..=8).collect();
        let mut rng = SmallRng::seed_from_u64(29);
        let root = run_wf_tail(lineages, 3, 0, |_depth| 0, branch_sum, &mut rng);
        assert_eq!(root, 36); // sum 1..=8, conserved regardless of merge shape
    }
}
