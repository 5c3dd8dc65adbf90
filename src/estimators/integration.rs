use super::{finite_probability, ComparisonMethod};
use crate::constants::{
    INTEGRATION_SUBRANGES, INTEGRATION_WIDTH_STDDEVS, NUMERICAL_INTEGRAL_DEFAULT_STEPS,
};
use crate::delta::adjuster;
use crate::error::SpecialFunctionError;
use crate::special::{beta_pdf_with_norm, SpecialFunctions};
use crate::types::{BetaParams, Delta, IntegrationParams};

/// P(A < B) by quadrature.
///
/// Averages the direct integral ∫ f_A(x)(1 - F_B(δ(x))) dx with the complement
/// obtained by swapping A and B and inverting δ, which cancels most of the
/// first-order trapezoid bias.
///
/// Returns `None` for invalid shapes, and also for any shape below 1: the
/// density is unbounded at 0 or 1, which are always segment endpoints, so the
/// trapezoid sum is infinite. Use summation, Monte Carlo or the normal
/// approximation for such priors.
pub fn integral_beta_a_lt_b(params: &IntegrationParams) -> Option<f64> {
    if !params.a.is_valid() || !params.b.is_valid() {
        return None;
    }
    let steps = params.steps.unwrap_or(NUMERICAL_INTEGRAL_DEFAULT_STEPS);
    let inverse = params.delta.map(|d| d.inverse());

    let result = compute_integral(&params.a, &params.b, params.delta.as_ref(), steps).and_then(
        |direct| {
            let complement = compute_integral(&params.b, &params.a, inverse.as_ref(), steps)?;
            Ok((direct + (1.0 - complement)) / 2.0)
        },
    );

    match result {
        Ok(p) => finite_probability(ComparisonMethod::Integration, p),
        Err(e) => {
            tracing::warn!("numerical integration failed: {}", e);
            None
        }
    }
}

fn compute_integral(
    a: &BetaParams,
    b: &BetaParams,
    delta: Option<&Delta>,
    steps: usize,
) -> Result<f64, SpecialFunctionError> {
    let schema = steps_schema(&Window::around(a), &Window::around(b), steps);
    let sf = SpecialFunctions::global();
    let ln_norm_a = sf.ln_beta(a.a, a.b)?;
    let adjust = adjuster(delta);
    let (aa, ab, ba, bb) = (a.a, a.b, b.a, b.b);

    let integrand = move |x: f64| -> Result<f64, SpecialFunctionError> {
        let density = beta_pdf_with_norm(aa, ab, ln_norm_a, x);
        if density == 0.0 {
            return Ok(0.0);
        }
        Ok(density * (1.0 - sf.incomplete_beta(ba, bb, adjust(x))?))
    };

    trapezoid(&schema, integrand)
}

/// Dense region of a Beta density: [peak - width, peak + width] clipped to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Window {
    pub start: f64,
    pub end: f64,
}

impl Window {
    pub(crate) fn around(params: &BetaParams) -> Self {
        let (a, b) = (params.a, params.b);
        // Mode; for a + b <= 2 it is undefined, so fall back to the mean.
        let peak = if a + b > 2.0 {
            (a - 1.0) / (a + b - 2.0)
        } else {
            params.mean()
        };
        let width = INTEGRATION_WIDTH_STDDEVS * params.variance().sqrt();
        Self {
            start: (peak - width).max(0.0),
            end: (peak + width).min(1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Segment {
    pub start: f64,
    pub end: f64,
    pub steps: usize,
}

/// Splits [0, 1] into contiguous sub-ranges around the two windows, each
/// getting an equal share of the step budget.
pub(crate) fn steps_schema(a: &Window, b: &Window, total_steps: usize) -> Vec<Segment> {
    let per_segment = total_steps.div_ceil(INTEGRATION_SUBRANGES).max(1);

    let bounds: [f64; 4] = if a.end < b.start || b.end < a.start {
        let (first, second) = if a.start <= b.start { (a, b) } else { (b, a) };
        tracing::trace!("integration windows are disjoint");
        [first.start, first.end, second.start, second.end]
    } else if a.start >= b.start && a.end <= b.end {
        tracing::trace!("A window nested in B");
        [b.start, a.start, a.end, b.end]
    } else if b.start >= a.start && b.end <= a.end {
        tracing::trace!("B window nested in A");
        [a.start, b.start, b.end, a.end]
    } else {
        tracing::trace!("integration windows partially overlap");
        [
            a.start.min(b.start),
            a.start.max(b.start),
            a.end.min(b.end),
            a.end.max(b.end),
        ]
    };

    let edges = [0.0, bounds[0], bounds[1], bounds[2], bounds[3], 1.0];
    edges
        .windows(2)
        .map(|w| Segment {
            start: w[0],
            end: w[1],
            steps: per_segment,
        })
        .collect()
}

fn trapezoid<F>(schema: &[Segment], integrand: F) -> Result<f64, SpecialFunctionError>
where
    F: Fn(f64) -> Result<f64, SpecialFunctionError>,
{
    let mut sum = 0.0;
    for segment in schema {
        let step_size = (segment.end - segment.start) / segment.steps as f64;
        if step_size == 0.0 {
            continue;
        }
        let mut last = integrand(segment.start)?;
        for i in 1..=segment.steps {
            let x = if i == segment.steps {
                segment.end
            } else {
                segment.start + i as f64 * step_size
            };
            let current = integrand(x)?;
            sum += 0.5 * (last + current) * step_size;
            last = current;
        }
    }
    Ok(sum)
}
