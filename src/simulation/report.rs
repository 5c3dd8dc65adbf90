use serde::{Deserialize, Serialize};

/// Confusion matrix of simulated experiments against ground truth, plus the
/// ratios derived from it. Ratios are NaN when their denominator is zero.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ExperimentReport {
    pub n_experiments: u64,
    pub n_true_positives: u64,
    pub n_false_positives: u64,
    pub n_true_negatives: u64,
    pub n_false_negatives: u64,
    pub empirical_confidence: f64,
    pub empirical_p_value: f64,
    pub empirical_power: f64,
    /// Sum of 1 - P(A<B) over experiments called positive: the false-positive
    /// count the estimator itself expects. Compare against `n_false_positives`
    /// as a calibration check.
    pub hypothesized_false_positives: f64,
}

impl ExperimentReport {
    pub fn new(n_experiments: u64) -> Self {
        Self {
            n_experiments,
            ..Default::default()
        }
    }

    pub fn record(&mut self, observed_positive: bool, ground_truth_positive: bool) {
        match (observed_positive, ground_truth_positive) {
            (true, true) => self.n_true_positives += 1,
            (true, false) => self.n_false_positives += 1,
            (false, true) => self.n_false_negatives += 1,
            (false, false) => self.n_true_negatives += 1,
        }
    }

    pub fn finalize(&mut self, hypothesized_false_positives: f64) {
        let tp = self.n_true_positives as f64;
        let fp = self.n_false_positives as f64;
        let fn_ = self.n_false_negatives as f64;

        self.empirical_p_value = fp / (fp + tp);
        self.empirical_confidence = 1.0 - self.empirical_p_value;
        self.empirical_power = tp / (tp + fn_);
        self.hypothesized_false_positives = hypothesized_false_positives;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finalize_derives_ratios_from_counts() {
        let mut report = ExperimentReport::new(10);
        for _ in 0..6 {
            report.record(true, true);
        }
        for _ in 0..2 {
            report.record(true, false);
        }
        report.record(false, true);
        report.record(false, false);
        report.finalize(0.4);

        assert_eq!(report.n_true_positives, 6);
        assert_eq!(report.n_false_positives, 2);
        assert_eq!(report.n_false_negatives, 1);
        assert_eq!(report.n_true_negatives, 1);
        assert!((report.empirical_p_value - 0.25).abs() < 1e-12);
        assert!((report.empirical_confidence - 0.75).abs() < 1e-12);
        assert!((report.empirical_power - 6.0 / 7.0).abs() < 1e-12);
        assert_eq!(report.hypothesized_false_positives, 0.4);
    }

    #[test]
    fn finalize_without_positives_leaves_nan() {
        let mut report = ExperimentReport::new(3);
        for _ in 0..3 {
            report.record(false, false);
        }
        report.finalize(0.0);
        assert!(report.empirical_p_value.is_nan());
        assert!(report.empirical_confidence.is_nan());
        assert!(report.empirical_power.is_nan());
    }

    #[test]
    fn serializes_with_pascal_case_field_names() {
        let json = serde_json::to_string(&ExperimentReport::new(5)).unwrap();
        assert!(json.contains("\"NExperiments\":5"));
        assert!(json.contains("\"EmpiricalPValue\""));
        assert!(json.contains("\"HypothesizedFalsePositives\""));
    }
}
