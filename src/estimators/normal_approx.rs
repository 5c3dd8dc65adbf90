use super::{finite_probability, validate, ComparisonMethod};
use crate::error::Result;
use crate::special::SpecialFunctions;
use crate::types::{BetaParams, Delta};

/// P(A < B) with each Beta replaced by a Gaussian of the same mean and
/// variance: Φ((μ_B - μ_A') / sqrt(σ²_A' + σ²_B)), where A' is A shifted by
/// `delta`.
///
/// Logit deltas are rejected: a logit shift has no closed-form effect on a
/// Gaussian's variance.
pub fn normal_approx_beta_a_lt_b(
    a: &BetaParams,
    b: &BetaParams,
    delta: Option<&Delta>,
) -> Result<Option<f64>> {
    validate(ComparisonMethod::NormalApprox, delta)?;
    if !a.is_valid() || !b.is_valid() {
        return Ok(None);
    }

    let (mean_a, variance_a) = match delta {
        Some(d) => d.apply_moments(a.mean(), a.variance()),
        None => (a.mean(), a.variance()),
    };

    let z = (b.mean() - mean_a) / (variance_a + b.variance()).sqrt();
    let p = SpecialFunctions::global().normal_cdf(z);
    Ok(finite_probability(ComparisonMethod::NormalApprox, p))
}
