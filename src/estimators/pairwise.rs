use crate::error::AbError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PairwiseMethod {
    /// Every (a, b) pair, O(n·m).
    Naive,
    /// Sort + two-pointer sweep, O(n log n).
    #[default]
    MannWhitney,
}

impl PairwiseMethod {
    pub fn estimate(&self, samples_a: &[f64], samples_b: &[f64]) -> f64 {
        match self {
            PairwiseMethod::Naive => estimate_probability_naive(samples_a, samples_b),
            PairwiseMethod::MannWhitney => mann_whitney_a_lt_b(samples_a, samples_b),
        }
    }
}

impl FromStr for PairwiseMethod {
    type Err = AbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "naive" => Ok(PairwiseMethod::Naive),
            "mann-whitney" => Ok(PairwiseMethod::MannWhitney),
            other => Err(AbError::UnknownPairwiseMethod(other.to_string())),
        }
    }
}

/// Fraction of pairs with a < b, via the Mann–Whitney U statistic.
///
/// Both sets are sorted; whenever A[i] < B[j], every B from j onward beats
/// A[i], so they are counted at once and i advances. Ties count as losses,
/// which keeps the result identical to the naive count. Empty inputs give NaN.
pub fn mann_whitney_a_lt_b(samples_a: &[f64], samples_b: &[f64]) -> f64 {
    let mut a = samples_a.to_vec();
    let mut b = samples_b.to_vec();
    a.sort_by(f64::total_cmp);
    b.sort_by(f64::total_cmp);

    let (n_a, n_b) = (a.len(), b.len());
    let (mut i, mut j) = (0, 0);
    let mut count: u64 = 0;

    while i < n_a && j < n_b {
        if a[i] < b[j] {
            count += (n_b - j) as u64;
            i += 1;
        } else {
            j += 1;
        }
    }

    count as f64 / (n_a as f64 * n_b as f64)
}

pub fn estimate_probability_naive(samples_a: &[f64], samples_b: &[f64]) -> f64 {
    let count: u64 = samples_a
        .iter()
        .map(|a| samples_b.iter().filter(|&&b| *a < b).count() as u64)
        .sum();
    count as f64 / (samples_a.len() as f64 * samples_b.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn mann_whitney_equals_naive_on_fixed_arrays() {
        let a = [0.3, 0.1, 0.7, 0.5, 0.5, 0.9];
        let b = [0.5, 0.2, 0.8, 0.1, 0.6];
        assert_eq!(mann_whitney_a_lt_b(&a, &b), estimate_probability_naive(&a, &b));
    }

    #[test]
    fn mann_whitney_equals_naive_on_random_arrays_with_ties() {
        let mut rng = StdRng::seed_from_u64(31);
        for _ in 0..50 {
            // Coarse grid so ties are common.
            let a: Vec<f64> = (0..37).map(|_| rng.gen_range(0..20) as f64 / 20.0).collect();
            let b: Vec<f64> = (0..23).map(|_| rng.gen_range(0..20) as f64 / 20.0).collect();
            assert_eq!(mann_whitney_a_lt_b(&a, &b), estimate_probability_naive(&a, &b));
        }
    }

    #[test]
    fn all_ties_count_as_zero() {
        let a = [0.4; 5];
        assert_eq!(mann_whitney_a_lt_b(&a, &a), 0.0);
        assert_eq!(estimate_probability_naive(&a, &a), 0.0);
    }

    #[test]
    fn separated_sets_give_zero_or_one() {
        let low = [0.1, 0.2, 0.3];
        let high = [0.7, 0.8];
        assert_eq!(mann_whitney_a_lt_b(&low, &high), 1.0);
        assert_eq!(mann_whitney_a_lt_b(&high, &low), 0.0);
    }

    #[test]
    fn empty_input_is_nan() {
        assert!(mann_whitney_a_lt_b(&[], &[0.5]).is_nan());
        assert!(estimate_probability_naive(&[0.5], &[]).is_nan());
    }

    #[test]
    fn input_slices_are_not_reordered() {
        let a = vec![0.9, 0.1, 0.5];
        let b = vec![0.3, 0.2];
        let _ = mann_whitney_a_lt_b(&a, &b);
        assert_eq!(a, vec![0.9, 0.1, 0.5]);
    }

    #[test]
    fn pairwise_method_parses_kebab_case() {
        assert_eq!(
            "mann-whitney".parse::<PairwiseMethod>().unwrap(),
            PairwiseMethod::MannWhitney
        );
        assert!("wilcoxon".parse::<PairwiseMethod>().is_err());
        assert_eq!(
            serde_json::to_string(&PairwiseMethod::MannWhitney).unwrap(),
            "\"mann-whitney\""
        );
    }
}
