use super::{finite_probability, ComparisonMethod};
use crate::error::SpecialFunctionError;
use crate::special::SpecialFunctions;
use crate::types::BetaParams;

/// Which shape parameter the closed-form sum runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummationAxis {
    /// B.a, summed directly.
    BSuccesses,
    /// A.a, via P(A<B) = 1 - P(B<A).
    ASuccesses,
    /// B.b, via reflecting both distributions to (b, a) and complementing.
    BFailures,
    /// A.b, via reflecting both distributions and swapping A and B.
    AFailures,
}

impl SummationAxis {
    pub const ALL: [SummationAxis; 4] = [
        SummationAxis::BSuccesses,
        SummationAxis::ASuccesses,
        SummationAxis::BFailures,
        SummationAxis::AFailures,
    ];

    fn length(&self, a: &BetaParams, b: &BetaParams) -> f64 {
        match self {
            SummationAxis::BSuccesses => b.a,
            SummationAxis::ASuccesses => a.a,
            SummationAxis::BFailures => b.b,
            SummationAxis::AFailures => a.b,
        }
    }

    /// The axis with the fewest terms.
    pub fn cheapest(a: &BetaParams, b: &BetaParams) -> SummationAxis {
        let mut best = SummationAxis::BSuccesses;
        for axis in SummationAxis::ALL {
            if axis.length(a, b) < best.length(a, b) {
                best = axis;
            }
        }
        best
    }
}

/// Exact P(A < B) for integer-shaped posteriors (Evan Miller's closed form).
///
/// Returns `None` without logging an error when any shape is non-integer:
/// that is an expected input for the other estimators. Delta shifts are not
/// representable here; [`super::validate`] rejects them before dispatch.
pub fn summation_beta_a_lt_b(a: &BetaParams, b: &BetaParams) -> Option<f64> {
    if !a.is_valid() || !b.is_valid() || !a.is_integral() || !b.is_integral() {
        return None;
    }

    let axis = SummationAxis::cheapest(a, b);
    tracing::debug!(?axis, terms = axis.length(a, b), "summation axis");

    match summation_via(axis, a, b) {
        Ok(p) => finite_probability(ComparisonMethod::Summation, p),
        Err(e) => {
            tracing::warn!("summation failed: {}", e);
            None
        }
    }
}

/// Evaluates the sum along a specific axis. All four axes give the same value
/// up to rounding; they differ only in the number of terms.
pub fn summation_via(
    axis: SummationAxis,
    a: &BetaParams,
    b: &BetaParams,
) -> Result<f64, SpecialFunctionError> {
    match axis {
        SummationAxis::BSuccesses => sum_over_b_successes(a, b),
        SummationAxis::ASuccesses => Ok(1.0 - sum_over_b_successes(b, a)?),
        SummationAxis::BFailures => Ok(1.0 - sum_over_b_successes(&a.reflected(), &b.reflected())?),
        SummationAxis::AFailures => sum_over_b_successes(&b.reflected(), &a.reflected()),
    }
}

/// P(A < B) = Σ_{i=0}^{B.a-1} B(A.a+i, A.b+B.b) / ((B.b+i) · B(1+i, B.b) · B(A.a, A.b)),
/// each term evaluated in log space.
fn sum_over_b_successes(a: &BetaParams, b: &BetaParams) -> Result<f64, SpecialFunctionError> {
    let sf = SpecialFunctions::global();
    let ln_norm_a = sf.ln_beta(a.a, a.b)?;
    let terms = b.a as u64;

    let mut total = 0.0;
    for i in 0..terms {
        let i = i as f64;
        let log_num = sf.ln_beta(a.a + i, a.b + b.b)?;
        let log_den = (b.b + i).ln() + sf.ln_beta(1.0 + i, b.b)? + ln_norm_a;
        total += (log_num - log_den).exp();
    }

    Ok(total)
}
