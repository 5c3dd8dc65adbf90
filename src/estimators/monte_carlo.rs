use super::pairwise::PairwiseMethod;
use super::{finite_probability, ComparisonMethod};
use crate::constants::MONTE_CARLO_DEFAULT_SAMPLE_SIZE;
use crate::delta::adjuster;
use crate::sampling::beta_sample;
use crate::types::{BetaParams, Delta};
use rand::Rng;

/// Monte Carlo P(A < B) with the default sample size and Mann–Whitney
/// comparison, drawing from the thread RNG.
pub fn monte_carlo_beta_a_lt_b(a: &BetaParams, b: &BetaParams, delta: Option<&Delta>) -> Option<f64> {
    sample_based_beta_a_lt_b(
        &mut rand::thread_rng(),
        a,
        b,
        delta,
        MONTE_CARLO_DEFAULT_SAMPLE_SIZE,
        PairwiseMethod::default(),
    )
}

/// Draws `samples` variates from each of A and B, shifts the A draws by
/// `delta` (clamped to [0, 1]) and returns the fraction of pairs with a < b.
pub fn sample_based_beta_a_lt_b<R: Rng + ?Sized>(
    rng: &mut R,
    a: &BetaParams,
    b: &BetaParams,
    delta: Option<&Delta>,
    samples: usize,
    pairwise: PairwiseMethod,
) -> Option<f64> {
    if !a.is_valid() || !b.is_valid() {
        return None;
    }
    let adjust = adjuster(delta);
    let samples_a: Vec<f64> = (0..samples)
        .map(|_| adjust(beta_sample(rng, a.a, a.b)))
        .collect();
    let samples_b: Vec<f64> = (0..samples).map(|_| beta_sample(rng, b.a, b.b)).collect();

    finite_probability(
        ComparisonMethod::MonteCarlo,
        pairwise.estimate(&samples_a, &samples_b),
    )
}
