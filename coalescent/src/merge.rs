use rand::seq::SliceRandom;
use rand::Rng;

/// Merges the last two of a shuffled buffer into a fresh parent, leaving
/// every other lineage untouched.
///
/// Shuffles `v`, combines a freshly initialized parent with one child, then
/// with a second child pulled from the back, and leaves the merged parent at
/// the front. Returns the new length of `v` after the merge.
///
/// Panics if `v.len() < 2`.
pub fn binary_merge<P, R: Rng + ?Sized>(
    v: &mut Vec<P>,
    rng: &mut R,
    init: impl Fn() -> P,
    branch: impl Fn(P, P) -> P,
) -> usize {
    assert!(v.len() >= 2, "binary_merge requires at least two lineages");
    v.shuffle(rng);
    let last = v.pop().expect("length checked above");
    let first = v.remove(0);
    let parent = branch(branch(init(), first), last);
    v.insert(0, parent);
    v.len()
}

/// Applies a simultaneous-multiple-merger spectrum to a shuffled buffer.
///
/// `spectrum[j]` is the number of new parents that absorb exactly `j`
/// children, for `j` from `2` up; bins `0` and `1` are never touched (an
/// empty urn contributes nothing, a singleton urn survives as itself).
/// Each new parent takes one child from the advancing front and `j - 1`
/// children from the retreating back, mirroring the front/back descent in
/// `merge.h`. Returns the surviving lineage count, i.e.
/// `sum_{j >= 1} spectrum[j]`.
pub fn simultaneous_multiple_merge<P, R: Rng + ?Sized>(
    v: &mut Vec<P>,
    rng: &mut R,
    spectrum: &[u32],
    init: impl Fn() -> P,
    branch: impl Fn(P, P) -> P,
) -> usize {
    v.shuffle(rng);
    let mut front = 0usize;
    for (j, &m_j) in spectrum.iter().enumerate().skip(2) {
        for _ in 0..m_j {
            let first_child = v.remove(front);
            let mut parent = branch(init(), first_child);
            for _ in 0..(j - 1) {
                let child = v.pop().expect("spectrum accounts for every ball");
                parent = branch(parent, child);
            }
            v.insert(front, parent);
            front += 1;
        }
    }
    v.len()
}
