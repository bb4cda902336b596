/// An occupancy spectrum: `spectrum[j]` is the number of urns (parents)
/// holding exactly `j` balls (lineages), for `j` from `0` up to `k`.
///
/// `sum(spectrum) == N` (every urn is accounted for) and
/// `sum(j * spectrum[j]) == k` (every ball is accounted for) hold for every
/// spectrum this module produces; both are checked in the distribution's
/// construction-time tests rather than re-validated on every access.
pub type Spectrum = Vec<u32>;

/// Drops trailing zero bins above the largest occupied bin, e.g. `[3, 0, 1, 0,
/// 0]` becomes `[3, 0, 1]`. Never shortens a spectrum past `max{j: M_j>0} + 1`
/// entries, so `Σ j*M_j` and `Σ M_j` are unaffected; only the representation
/// shrinks. A spectrum of all zeros (only possible for `k == 0`) is left with
/// a single `0` entry rather than emptied.
pub fn truncate_trailing_zeros(mut spectrum: Spectrum) -> Spectrum {
    while spectrum.len() > 1 && *spectrum.last().unwrap() == 0 {
        spectrum.pop();
    }
    spectrum
}

/// Depth-first enumeration of every occupancy spectrum of `k` balls into `N`
/// urns, invoking `callback` once per spectrum found.
///
/// Ported from the recursive descent in the original simulator's spectrum
/// generator: `f` peels off the most populated urn size (`j_max`) and
/// recurses on the remaining balls and urns, decrementing `j_max` on the
/// "horizontal" branch (no urn holds `j_max` balls) and the ball/urn counts
/// on the "vertical" branch (some number of urns hold exactly `j_max`
/// balls). The recursion bottoms out when every ball and every urn has been
/// assigned.
pub fn generate(k: u32, n: u32, callback: &mut impl FnMut(Spectrum)) {
    let scratch = vec![0u32; k as usize + 1];
    descend(k, n, k, scratch, callback);
}

fn descend(n: u32, m: u32, j_max: u32, v: Spectrum, callback: &mut impl FnMut(Spectrum)) {
    if m == 0 && n == 0 {
        callback(v);
        return;
    }

    if m != 0 {
        if n == 0 {
            let mut copy = v.clone();
            copy[0] = m;
            callback(copy);
            return;
        }

        if j_max > 0 {
            let mut i = n / j_max;
            while i >= 1 {
                let mut copy = v.clone();
                copy[j_max as usize] = i;

                if m >= i {
                    let balls_left = n - i * j_max;
                    if balls_left < j_max {
                        descend(balls_left, m - i, balls_left, copy, callback);
                    } else {
                        descend(balls_left, m - i, j_max - 1, copy, callback);
                    }
                }
                i -= 1;
            }
        }
    }

    if j_max == 0 && n > 0 {
        return;
    }

    let Some(next_j_max) = j_max.checked_sub(1) else {
        return;
    };
    let mut copy = v;
    copy[j_max as usize] = 0;
    descend(n, m, next_j_max, copy, callback);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_spectrum_conserves_balls_and_urns() {
        let (k, n) = (5u32, 3u32);
        let mut spectra = Vec::new();
        generate(k, n, &mut |s| spectra.push(s));
        assert!(!spectra.is_empty());
        for s in &spectra {
            let urns: u32 = s.iter().sum();
            let balls: u32 = s.iter().enumerate().map(|(j, &m_j)| j as u32 * m_j).sum();
            assert_eq!(urns, n);
            assert_eq!(balls, k);
        }
    }

    #[test]
    fn spectra_are_pairwise_distinct() {
        let (k, n) = (4u32, 4u32);
        let mut spectra = Vec::new();
        generate(k, n, &mut |s| spectra.push(s));
        let mut sorted = spectra.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), spectra.len());
    }

    #[test]
    fn k_equals_n_includes_the_all_singletons_spectrum() {
        let mut spectra = Vec::new();
        generate(3, 3, &mut |s| spectra.push(s));
        assert!(spectra.iter().any(|s| s[1] == 3));
    }

    #[test]
    fn truncate_drops_trailing_zeros_only() {
        let truncated = truncate_trailing_zeros(vec![3, 0, 1, 0, 0]);
        assert_eq!(truncated, vec![3, 0, 1]);
    }

    #[test]
    fn truncate_never_shortens_past_the_highest_occupied_bin() {
        let truncated = truncate_trailing_zeros(vec![0, 2, 0]);
        assert_eq!(truncated, vec![0, 2]);
        assert!(truncated.len() >= 2, "M_1 = 2 must remain representable");
    }

    #[test]
    fn truncate_leaves_a_single_zero_entry_alone() {
        assert_eq!(truncate_trailing_zeros(vec![0]), vec![0]);
    }

    #[test]
    fn single_urn_has_exactly_one_spectrum() {
        let mut spectra = Vec::new();
        generate(6, 1, &mut |s| spectra.push(s));
        assert_eq!(spectra.len(), 1);
        assert_eq!(spectra[0][6], 1);
    }
}
