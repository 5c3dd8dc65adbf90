//! P(A < B) estimators behind one contract.
//!
//! Every estimator returns `Ok(Some(p))` with p in [0, 1], `Ok(None)` when the
//! computation failed (special-function error, non-finite result, non-integer
//! input to the summation), or `Err` for a method/delta combination that can
//! never be valid. The combination checks live in [`validate`] so they are
//! enforced the same way whichever strategy is selected.

pub mod integration;
pub mod monte_carlo;
pub mod normal_approx;
pub mod pairwise;
pub mod summation;

use crate::constants::{MONTE_CARLO_DEFAULT_SAMPLE_SIZE, NUMERICAL_INTEGRAL_DEFAULT_STEPS};
use crate::error::{AbError, Result};
use crate::types::{BetaParams, Delta, DeltaType, IntegrationParams};
use pairwise::PairwiseMethod;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ComparisonMethod {
    NormalApprox,
    Summation,
    Integration,
    MonteCarlo,
}

impl ComparisonMethod {
    /// Method used when none is configured: integration if a delta is
    /// present (summation cannot take one), summation otherwise.
    pub fn default_for(delta: Option<&Delta>) -> Self {
        if delta.is_some() {
            ComparisonMethod::Integration
        } else {
            ComparisonMethod::Summation
        }
    }
}

impl FromStr for ComparisonMethod {
    type Err = AbError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "normalApprox" => Ok(ComparisonMethod::NormalApprox),
            "summation" => Ok(ComparisonMethod::Summation),
            "integration" => Ok(ComparisonMethod::Integration),
            "monteCarlo" => Ok(ComparisonMethod::MonteCarlo),
            other => Err(AbError::UnknownComparisonMethod(other.to_string())),
        }
    }
}

impl fmt::Display for ComparisonMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComparisonMethod::NormalApprox => "normalApprox",
            ComparisonMethod::Summation => "summation",
            ComparisonMethod::Integration => "integration",
            ComparisonMethod::MonteCarlo => "monteCarlo",
        };
        f.write_str(name)
    }
}

/// Strategy-specific knobs. Fields a strategy does not use are ignored.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EstimateOptions {
    /// Monte Carlo draws per distribution.
    pub samples: usize,
    /// Total trapezoid steps per integral.
    pub steps: usize,
    pub pairwise: PairwiseMethod,
}

impl Default for EstimateOptions {
    fn default() -> Self {
        Self {
            samples: MONTE_CARLO_DEFAULT_SAMPLE_SIZE,
            steps: NUMERICAL_INTEGRAL_DEFAULT_STEPS,
            pairwise: PairwiseMethod::default(),
        }
    }
}

/// Rejects method/delta combinations no input could make valid.
pub fn validate(method: ComparisonMethod, delta: Option<&Delta>) -> Result<()> {
    match (method, delta) {
        (ComparisonMethod::Summation, Some(_)) => Err(AbError::DeltaNotSupported {
            method: "Summation".to_string(),
        }),
        (ComparisonMethod::NormalApprox, Some(d)) if d.kind == DeltaType::Logit => {
            Err(AbError::LogitDeltaNotSupported)
        }
        _ => Ok(()),
    }
}

pub fn estimate(
    method: ComparisonMethod,
    a: &BetaParams,
    b: &BetaParams,
    delta: Option<&Delta>,
    options: &EstimateOptions,
) -> Result<Option<f64>> {
    estimate_with_rng(&mut rand::thread_rng(), method, a, b, delta, options)
}

/// Same as [`estimate`] with a caller-supplied RNG (only Monte Carlo draws from it).
pub fn estimate_with_rng<R: Rng + ?Sized>(
    rng: &mut R,
    method: ComparisonMethod,
    a: &BetaParams,
    b: &BetaParams,
    delta: Option<&Delta>,
    options: &EstimateOptions,
) -> Result<Option<f64>> {
    validate(method, delta)?;
    a.validate()?;
    b.validate()?;

    let p = match method {
        ComparisonMethod::Summation => summation::summation_beta_a_lt_b(a, b),
        ComparisonMethod::Integration => integration::integral_beta_a_lt_b(&IntegrationParams {
            a: *a,
            b: *b,
            delta: delta.copied(),
            steps: Some(options.steps),
        }),
        ComparisonMethod::MonteCarlo => monte_carlo::sample_based_beta_a_lt_b(
            rng,
            a,
            b,
            delta,
            options.samples,
            options.pairwise,
        ),
        ComparisonMethod::NormalApprox => normal_approx::normal_approx_beta_a_lt_b(a, b, delta)?,
    };
    Ok(p)
}

/// Collapses a raw estimate to the sentinel if it is not a probability.
pub(crate) fn finite_probability(method: ComparisonMethod, value: f64) -> Option<f64> {
    if value.is_finite() {
        Some(value.clamp(0.0, 1.0))
    } else {
        tracing::warn!(%method, value, "estimate is not finite; returning no result");
        None
    }
}
