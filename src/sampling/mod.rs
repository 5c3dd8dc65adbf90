//! Random variate generators. Every sampler takes the RNG explicitly so
//! callers can seed it.

pub mod binomial;
pub mod continuous;

pub use binomial::{naive_binomial_sample, optimized_binomial_sample, BinomialType};
pub use continuous::{
    beta_sample, exponential_sample, gamma_sample, gaussian_sample, poisson_sample,
};
