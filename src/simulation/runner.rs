use super::config::SimulationConfig;
use super::report::ExperimentReport;
use crate::error::{AbError, Result};
use crate::estimators::estimate_with_rng;
use crate::types::BetaParams;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;

/// Runs `n_experiments` simulated A/B tests and scores the configured
/// estimator's positive calls against ground truth.
///
/// Seeded from `config.seed` when present, from OS entropy otherwise.
pub fn run_experiments_find_confidence_and_power(
    config: &SimulationConfig,
) -> Result<ExperimentReport> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    run_experiments_with_rng(&mut rng, config)
}

pub fn run_experiments_with_rng<R: Rng + ?Sized>(
    rng: &mut R,
    config: &SimulationConfig,
) -> Result<ExperimentReport> {
    config.validate()?;

    let method = config.method();
    let options = config.estimate_options();
    let delta = config.delta.as_ref();
    let n = config.n_per_experiment;

    tracing::info!(
        %method,
        experiments = config.n_experiments,
        per_experiment = n,
        significance = config.significance,
        "Starting simulation"
    );
    let start = Instant::now();

    let mut report = ExperimentReport::new(config.n_experiments);
    let mut hypothesized_false_positives = 0.0;

    for _ in 0..config.n_experiments {
        let pa: f64 = rng.gen();
        let pb: f64 = rng.gen();
        let min_pb = delta.map_or(pa, |d| d.apply(pa));
        let ground_truth_positive = pb > min_pb;

        let a_successes = config.binomial_type.sample(rng, pa, n);
        let b_successes = config.binomial_type.sample(rng, pb, n);
        let dist_a = BetaParams::from_counts(a_successes, n - a_successes);
        let dist_b = BetaParams::from_counts(b_successes, n - b_successes);

        let p = estimate_with_rng(rng, method, &dist_a, &dist_b, delta, &options)?.ok_or_else(
            || AbError::ComparisonFailed {
                method: method.to_string(),
            },
        )?;

        let observed_positive = 1.0 - p < config.significance;
        if observed_positive {
            hypothesized_false_positives += 1.0 - p;
        }
        report.record(observed_positive, ground_truth_positive);
    }

    report.finalize(hypothesized_false_positives);

    tracing::info!(
        true_positives = report.n_true_positives,
        false_positives = report.n_false_positives,
        p_value = report.empirical_p_value,
        power = report.empirical_power,
        "Simulation finished in {}ms",
        start.elapsed().as_millis()
    );
    Ok(report)
}
