//! Special functions backing the estimators and samplers.
//!
//! Numerics come from `statrs`. [`SpecialFunctions::global`] is a process-wide
//! handle that runs a one-time self-check on first use; [`await_ready`] forces
//! that check up front so later calls never pay for it.

use crate::error::SpecialFunctionError;
use once_cell::sync::Lazy;
use statrs::function::{beta, erf, gamma};

static PROVIDER: Lazy<SpecialFunctions> = Lazy::new(SpecialFunctions::initialize);

#[derive(Debug)]
pub struct SpecialFunctions {
    self_check_passed: bool,
}

impl SpecialFunctions {
    pub fn global() -> &'static SpecialFunctions {
        &PROVIDER
    }

    fn initialize() -> Self {
        let ln_gamma_one = gamma::ln_gamma(1.0);
        let phi_zero = standard_normal_cdf(0.0);
        let self_check_passed = ln_gamma_one.abs() < 1e-12 && (phi_zero - 0.5).abs() < 1e-12;
        if self_check_passed {
            tracing::debug!("special functions ready");
        } else {
            tracing::warn!(
                ln_gamma_one,
                phi_zero,
                "special function self-check failed; results may be inaccurate"
            );
        }
        Self { self_check_passed }
    }

    pub fn is_ready(&self) -> bool {
        self.self_check_passed
    }

    pub fn ln_gamma(&self, x: f64) -> f64 {
        gamma::ln_gamma(x)
    }

    pub fn ln_beta(&self, a: f64, b: f64) -> Result<f64, SpecialFunctionError> {
        beta::checked_ln_beta(a, b).map_err(|e| SpecialFunctionError(e.to_string()))
    }

    pub fn beta(&self, a: f64, b: f64) -> Result<f64, SpecialFunctionError> {
        beta::checked_beta(a, b).map_err(|e| SpecialFunctionError(e.to_string()))
    }

    /// Regularized incomplete beta I_x(a, b), i.e. the Beta(a, b) CDF at x.
    /// `x` is clamped to [0, 1] first.
    pub fn incomplete_beta(&self, a: f64, b: f64, x: f64) -> Result<f64, SpecialFunctionError> {
        beta::checked_beta_reg(a, b, clamp_unit(x))
            .map_err(|e| SpecialFunctionError(e.to_string()))
    }

    pub fn normal_cdf(&self, z: f64) -> f64 {
        standard_normal_cdf(z)
    }
}

/// Forces the one-time initialization of the special-function provider.
/// Idempotent; returns whether the self-check passed.
pub fn await_ready() -> bool {
    SpecialFunctions::global().is_ready()
}

fn standard_normal_cdf(z: f64) -> f64 {
    0.5 * erf::erfc(-z / std::f64::consts::SQRT_2)
}

pub fn clamp_unit(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Log-odds; infinite at 0 and 1.
pub fn logit(p: f64) -> f64 {
    (p / (1.0 - p)).ln()
}

/// Beta(a, b) density at `x`, evaluated in log space so large shapes do not
/// overflow the normalizing constant.
pub fn beta_pdf(a: f64, b: f64, x: f64) -> Result<f64, SpecialFunctionError> {
    let ln_norm = SpecialFunctions::global().ln_beta(a, b)?;
    Ok(beta_pdf_with_norm(a, b, ln_norm, x))
}

pub(crate) fn beta_pdf_with_norm(a: f64, b: f64, ln_norm: f64, x: f64) -> f64 {
    if !(0.0..=1.0).contains(&x) {
        return 0.0;
    }
    if x == 0.0 || x == 1.0 {
        // Only one factor vanishes at an endpoint; the other is 1.
        let shape = if x == 0.0 { a } else { b };
        return if shape < 1.0 {
            f64::INFINITY
        } else if shape == 1.0 {
            (-ln_norm).exp()
        } else {
            0.0
        };
    }
    ((a - 1.0) * x.ln() + (b - 1.0) * (-x).ln_1p() - ln_norm).exp()
}

pub fn beta_cdf(a: f64, b: f64, x: f64) -> Result<f64, SpecialFunctionError> {
    SpecialFunctions::global().incomplete_beta(a, b, x)
}
