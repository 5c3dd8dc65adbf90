//! Experiment harness: simulate many A/B tests with known ground truth and
//! measure how often an estimator's "significant" calls are right.

pub mod config;
pub mod report;
pub mod runner;
