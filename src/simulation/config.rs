use crate::constants::{MONTE_CARLO_DEFAULT_SAMPLE_SIZE, NUMERICAL_INTEGRAL_DEFAULT_STEPS};
use crate::error::{AbError, Result};
use crate::estimators::{self, pairwise::PairwiseMethod, ComparisonMethod, EstimateOptions};
use crate::sampling::BinomialType;
use crate::types::Delta;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_monte_carlo_samples() -> usize {
    MONTE_CARLO_DEFAULT_SAMPLE_SIZE
}

fn default_integration_steps() -> usize {
    NUMERICAL_INTEGRAL_DEFAULT_STEPS
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimulationConfig {
    #[serde(rename = "NExperiments")]
    pub n_experiments: u64,
    #[serde(rename = "NPerExperiment")]
    pub n_per_experiment: u64,
    /// Alpha: an experiment is called positive when 1 - P(A<B) < significance.
    pub significance: f64,
    #[serde(default)]
    pub delta: Option<Delta>,
    #[serde(default)]
    pub binomial_type: BinomialType,
    /// Defaults to integration with a delta, summation without.
    #[serde(default)]
    pub comparison_method: Option<ComparisonMethod>,
    #[serde(default = "default_monte_carlo_samples")]
    pub monte_carlo_samples: usize,
    #[serde(default = "default_integration_steps")]
    pub integration_steps: usize,
    #[serde(default)]
    pub pairwise_method: PairwiseMethod,
    /// Fixes the RNG for reproducible runs.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SimulationConfig {
    pub fn new(n_experiments: u64, n_per_experiment: u64, significance: f64) -> Self {
        Self {
            n_experiments,
            n_per_experiment,
            significance,
            delta: None,
            binomial_type: BinomialType::default(),
            comparison_method: None,
            monte_carlo_samples: MONTE_CARLO_DEFAULT_SAMPLE_SIZE,
            integration_steps: NUMERICAL_INTEGRAL_DEFAULT_STEPS,
            pairwise_method: PairwiseMethod::default(),
            seed: None,
        }
    }

    /// Reads a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SimulationConfig = serde_json::from_str(&content)?;
        tracing::info!(
            "Loaded simulation config from {}: {} experiments x {} trials",
            path.display(),
            config.n_experiments,
            config.n_per_experiment
        );
        Ok(config)
    }

    pub fn method(&self) -> ComparisonMethod {
        self.comparison_method
            .unwrap_or_else(|| ComparisonMethod::default_for(self.delta.as_ref()))
    }

    pub fn estimate_options(&self) -> EstimateOptions {
        EstimateOptions {
            samples: self.monte_carlo_samples,
            steps: self.integration_steps,
            pairwise: self.pairwise_method,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.significance > 0.0 && self.significance < 1.0) {
            return Err(AbError::InvalidConfig(format!(
                "significance must be in (0, 1), got {}",
                self.significance
            )));
        }
        if self.n_experiments == 0 {
            return Err(AbError::InvalidConfig(
                "NExperiments must be at least 1".to_string(),
            ));
        }
        if let Some(delta) = &self.delta {
            if !delta.value.is_finite() {
                return Err(AbError::InvalidConfig(format!(
                    "delta value must be finite, got {}",
                    delta.value
                )));
            }
        }
        if self.monte_carlo_samples == 0 || self.integration_steps == 0 {
            return Err(AbError::InvalidConfig(
                "monteCarloSamples and integrationSteps must be positive".to_string(),
            ));
        }
        estimators::validate(self.method(), self.delta.as_ref())
    }
}
