//! Estimators for P(A < B) between two Beta posteriors, plus a simulation
//! harness that measures the empirical confidence and power they achieve.
//!
//! The four estimators ([`ComparisonMethod`]) share one contract: take two
//! [`BetaParams`] and an optional [`Delta`], return `Ok(Some(p))`, `Ok(None)`
//! when the computation could not produce a probability, or `Err` for an
//! invalid method/delta combination.
//!
//! ```ignore
//! use abconfidence::{estimate, BetaParams, ComparisonMethod, EstimateOptions};
//!
//! let a = BetaParams::from_counts(50, 35);
//! let b = BetaParams::from_counts(45, 40);
//! let p = estimate(ComparisonMethod::Summation, &a, &b, None, &EstimateOptions::default())?;
//! ```

pub mod constants;
pub mod delta;
pub mod error;
pub mod estimators;
pub mod sampling;
pub mod simulation;
pub mod special;
pub mod types;

pub use error::{AbError, Result, SpecialFunctionError};
pub use estimators::{
    estimate, estimate_with_rng, integration::integral_beta_a_lt_b,
    monte_carlo::monte_carlo_beta_a_lt_b, normal_approx::normal_approx_beta_a_lt_b,
    pairwise::PairwiseMethod, summation::summation_beta_a_lt_b, ComparisonMethod,
    EstimateOptions,
};
pub use sampling::binomial::BinomialType;
pub use simulation::{
    config::SimulationConfig, report::ExperimentReport, runner::run_experiments_find_confidence_and_power,
};
pub use special::await_ready;
pub use types::{BetaParams, Delta, DeltaType, IntegrationParams};
