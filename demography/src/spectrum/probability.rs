use bigdecimal::BigDecimal;
use num_bigint::{BigInt, BigUint};
use num_traits::ToPrimitive;

/// The Johnson-Kotz probability of observing a given occupancy spectrum
/// when `k` distinguishable balls are thrown uniformly at random into `N`
/// distinguishable urns:
///
/// ```text
/// P(spectrum) = (N! * k!) / ( N^k * prod_j (j!^{M_j} * M_j!) )
/// ```
///
/// Every intermediate term is computed exactly with arbitrary-precision
/// integers and only the final ratio is rounded to `f64`; for even modest
/// `k` and `N` the unrounded factorials and `N^k` overflow any fixed-width
/// integer long before the ratio itself does; computing in floating point
/// throughout would lose exactly the precision that later distinguishes a
/// rare spectrum from a truly-zero one.
pub fn probability(k: u32, n: u32, spectrum: &[u32]) -> f64 {
    let numerator = factorial(n) * factorial(k);

    let mut denominator = BigUint::from(1u32);
    for (j, &m_j) in spectrum.iter().enumerate() {
        denominator *= factorial(j as u32).pow(m_j) * factorial(m_j);
    }
    denominator *= BigUint::from(n).pow(k);

    let numerator = BigDecimal::from(BigInt::from(numerator));
    let denominator = BigDecimal::from(BigInt::from(denominator));

    (numerator / denominator).to_f64().unwrap_or(0.0)
}

fn factorial(n: u32) -> BigUint {
    let mut result = BigUint::from(1u32);
    for i in 2..=n {
        result *= i;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probabilities_of_a_full_enumeration_sum_to_one() {
        let (k, n) = (5u32, 3u32);
        let mut spectra = Vec::new();
        crate::spectrum::enumerate::generate(k, n, &mut |s| spectra.push(s));

        let total: f64 = spectra.iter().map(|s| probability(k, n, s)).sum();
        assert!((total - 1.0).abs() < 1e-9, "total = {total}");
    }

    #[test]
    fn single_urn_spectrum_has_probability_one() {
        let spectrum = vec![0, 0, 0, 0, 0, 0, 1];
        assert!((probability(6, 1, &spectrum) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn all_singletons_matches_a_permutation_count() {
        // k == N: the all-singletons spectrum is every ball in its own urn,
        // probability N!/N^N.
        let (k, n) = (4u32, 4u32);
        let mut spectrum = vec![0u32; k as usize + 1];
        spectrum[1] = n;
        let expected = 24.0 / 256.0; // 4! / 4^4
        assert!((probability(k, n, &spectrum) - expected).abs() < 1e-9);
    }
}
