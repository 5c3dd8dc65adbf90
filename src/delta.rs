//! Delta transform: the three shift semantics applied to a probability or to
//! a (mean, variance) pair, and their inverses.

use crate::special::{clamp_unit, logit, sigmoid};
use crate::types::{Delta, DeltaType};

impl Delta {
    /// Shifts a probability and clamps the result to [0, 1].
    pub fn apply(&self, p: f64) -> f64 {
        clamp_unit(shift(self.kind, self.value, p))
    }

    /// Shifts the moments of a distribution. The mean is clamped to [0, 1].
    /// For logit deltas only the mean moves; the variance is left as is.
    pub fn apply_moments(&self, mean: f64, variance: f64) -> (f64, f64) {
        let variance = match self.kind {
            DeltaType::Relative => variance * (1.0 + self.value).powi(2),
            DeltaType::Constant | DeltaType::Logit => variance,
        };
        (self.apply(mean), variance)
    }

    /// The delta that undoes this one.
    pub fn inverse(&self) -> Delta {
        let value = match self.kind {
            DeltaType::Constant | DeltaType::Logit => -self.value,
            DeltaType::Relative => 1.0 / (1.0 + self.value) - 1.0,
        };
        Delta {
            kind: self.kind,
            value,
        }
    }
}

fn shift(kind: DeltaType, value: f64, p: f64) -> f64 {
    match kind {
        DeltaType::Constant => p + value,
        DeltaType::Relative => p * (1.0 + value),
        DeltaType::Logit => sigmoid(logit(p) + value),
    }
}

/// Builds the clamped transform for `delta` once, so hot loops call a plain
/// closure instead of re-dispatching on the delta type per point.
pub fn adjuster(delta: Option<&Delta>) -> Box<dyn Fn(f64) -> f64 + Send + Sync> {
    let Some(delta) = delta else {
        return Box::new(|x| x);
    };
    let value = delta.value;
    match delta.kind {
        DeltaType::Constant => Box::new(move |x| clamp_unit(x + value)),
        DeltaType::Relative => {
            let factor = 1.0 + value;
            Box::new(move |x| clamp_unit(x * factor))
        }
        DeltaType::Logit => Box::new(move |x| clamp_unit(sigmoid(logit(x) + value))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Forward transform ───────────────────────────────────────────

    #[test]
    fn constant_delta_adds_and_clamps() {
        let d = Delta::constant(0.1);
        assert!((d.apply(0.4) - 0.5).abs() < 1e-12);
        assert_eq!(d.apply(0.95), 1.0);
        assert_eq!(Delta::constant(-0.5).apply(0.2), 0.0);
    }

    #[test]
    fn relative_delta_scales_and_clamps() {
        let d = Delta::relative(0.1);
        assert!((d.apply(0.5) - 0.55).abs() < 1e-12);
        assert_eq!(d.apply(0.99), 1.0);
    }

    #[test]
    fn logit_delta_shifts_log_odds() {
        let d = Delta::logit(1.0);
        let p = d.apply(0.5);
        assert!((logit(p) - 1.0).abs() < 1e-12, "p={}", p);
    }

    #[test]
    fn logit_delta_keeps_boundaries() {
        let d = Delta::logit(2.0);
        assert_eq!(d.apply(0.0), 0.0);
        assert_eq!(d.apply(1.0), 1.0);
    }

    // ── Moments ─────────────────────────────────────────────────────

    #[test]
    fn relative_delta_scales_variance_by_square() {
        let (mean, var) = Delta::relative(0.1).apply_moments(0.4, 0.01);
        assert!((mean - 0.44).abs() < 1e-12);
        assert!((var - 0.0121).abs() < 1e-12);
    }

    #[test]
    fn constant_and_logit_leave_variance_alone() {
        assert_eq!(Delta::constant(0.1).apply_moments(0.4, 0.01).1, 0.01);
        assert_eq!(Delta::logit(0.3).apply_moments(0.4, 0.01).1, 0.01);
    }

    // ── Inverse ─────────────────────────────────────────────────────

    #[test]
    fn inverse_of_inverse_is_identity() {
        for d in [Delta::constant(0.1), Delta::relative(0.25), Delta::logit(-0.7)] {
            let back = d.inverse().inverse();
            assert_eq!(back.kind, d.kind);
            assert!((back.value - d.value).abs() < 1e-12, "{:?} -> {:?}", d, back);
        }
        assert_eq!(Delta::constant(0.1).inverse().value, -0.1);
    }

    #[test]
    fn applying_delta_then_inverse_round_trips() {
        for d in [Delta::constant(0.1), Delta::relative(0.25), Delta::logit(-0.7)] {
            let p = 0.3;
            let back = d.inverse().apply(d.apply(p));
            assert!((back - p).abs() < 1e-12, "{:?}: {}", d, back);
        }
    }

    #[test]
    fn adjuster_matches_apply() {
        for d in [Delta::constant(0.1), Delta::relative(0.25), Delta::logit(-0.7)] {
            let f = adjuster(Some(&d));
            for x in [0.0, 0.1, 0.5, 0.97] {
                assert_eq!(f(x), d.apply(x), "{:?} at {}", d, x);
            }
        }
        assert_eq!(adjuster(None)(0.42), 0.42);
    }
}
