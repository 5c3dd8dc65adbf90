use crate::constants::BINOMIAL_INVERSION_THRESHOLD;
use crate::error::AbError;
use crate::special::SpecialFunctions;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BinomialType {
    /// n independent Bernoulli trials. O(n); kept as a reference generator.
    Naive,
    /// Inversion for small n·p, BTPE rejection sampling otherwise.
    #[default]
    Optimized,
}

impl BinomialType {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, p: f64, n: u64) -> u64 {
        match self {
            BinomialType::Naive => naive_binomial_sample(rng, p, n),
            BinomialType::Optimized => optimized_binomial_sample(rng, p, n),
        }
    }
}

impl FromStr for BinomialType {
    type Err = AbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "naive" => Ok(BinomialType::Naive),
            "optimized" => Ok(BinomialType::Optimized),
            other => Err(AbError::UnknownBinomialType(other.to_string())),
        }
    }
}

pub fn naive_binomial_sample<R: Rng + ?Sized>(rng: &mut R, p: f64, n: u64) -> u64 {
    (0..n).filter(|_| rng.gen::<f64>() < p).count() as u64
}

/// Draws X ~ Binomial(n, p).
///
/// For p > 0.5 the draw is made with q = 1 - p and reflected as n - X, so
/// both algorithms only ever see success probabilities in (0, 0.5].
pub fn optimized_binomial_sample<R: Rng + ?Sized>(rng: &mut R, p: f64, n: u64) -> u64 {
    if n == 0 || p.is_nan() || p <= 0.0 {
        return 0;
    }
    if p >= 1.0 {
        return n;
    }

    if p <= 0.5 {
        draw(rng, n, p)
    } else {
        n - draw(rng, n, 1.0 - p)
    }
}

fn draw<R: Rng + ?Sized>(rng: &mut R, n: u64, p: f64) -> u64 {
    if n as f64 * p <= BINOMIAL_INVERSION_THRESHOLD {
        binomial_inversion(rng, n, p)
    } else {
        binomial_btpe(rng, n, p)
    }
}

/// Walks the CDF upward from x = 0 using the pmf ratio
/// P(x) = P(x-1) · (n-x+1)p / (xq).
fn binomial_inversion<R: Rng + ?Sized>(rng: &mut R, n: u64, p: f64) -> u64 {
    let q = 1.0 - p;
    let mut px = (n as f64 * q.ln()).exp();
    let mut u: f64 = rng.gen();
    let mut x: u64 = 0;

    while u > px {
        u -= px;
        x += 1;
        // Rounding can leave u above the total mass.
        if x > n {
            return n;
        }
        px *= ((n - x + 1) as f64 * p) / (x as f64 * q);
    }

    x
}

/// BTPE (Kachitvichyanukul & Schmeiser). The envelope is a triangle around
/// the mode, a parallelogram over it, and exponential tails on both sides.
/// Everything outside the triangle goes through an exact pmf-ratio test
/// against the mode, so the output law is exactly Binomial(n, p).
fn binomial_btpe<R: Rng + ?Sized>(rng: &mut R, n: u64, p: f64) -> u64 {
    let sf = SpecialFunctions::global();
    let nf = n as f64;
    let q = 1.0 - p;
    let r = p.min(q);
    let npq = nf * r * q;

    let fm = nf * r + r;
    let m = fm.floor();
    let p1 = (2.195 * npq.sqrt() - 4.6 * q).floor() + 0.5;
    let xm = m + 0.5;
    let xl = xm - p1;
    let xr = xm + p1;
    let c = 0.134 + 20.5 / (15.3 + m);

    let a = (fm - xl) / (fm - xl * r);
    let lambda_l = a * (1.0 + a / 2.0);
    let a = (xr - fm) / (xr * q);
    let lambda_r = a * (1.0 + a / 2.0);

    let p2 = p1 * (1.0 + 2.0 * c);
    let p3 = p2 + c / lambda_l;
    let p4 = p3 + c / lambda_r;

    let ln_odds = (r / q).ln();
    let ln_mode_terms = sf.ln_gamma(m + 1.0) + sf.ln_gamma(nf - m + 1.0);
    let ln_pmf_ratio = |y: f64| {
        (y - m) * ln_odds + ln_mode_terms - sf.ln_gamma(y + 1.0) - sf.ln_gamma(nf - y + 1.0)
    };

    loop {
        let u = rng.gen::<f64>() * p4;
        let v = rng.gen::<f64>();

        // Region 1: triangle, always under the pmf.
        if u <= p1 {
            return clamp_to_bounds((xm - p1 * v + u).floor(), n);
        }

        let (y, v) = if u <= p2 {
            // Region 2: parallelogram.
            let x = xl + (u - p1) / c;
            let v = v * c + 1.0 - (m - x + 0.5).abs() / p1;
            if v > 1.0 {
                continue;
            }
            (x.floor(), v)
        } else if u <= p3 {
            // Region 3: left exponential tail.
            let y = (xl + v.ln() / lambda_l).floor();
            if y < 0.0 || v == 0.0 {
                continue;
            }
            (y, v * (u - p2) * lambda_l)
        } else {
            // Region 4: right exponential tail.
            let y = (xr - v.ln() / lambda_r).floor();
            if y > nf || v == 0.0 {
                continue;
            }
            (y, v * (u - p3) * lambda_r)
        };

        if v.ln() <= ln_pmf_ratio(y) {
            return clamp_to_bounds(y, n);
        }
    }
}

fn clamp_to_bounds(x: f64, n: u64) -> u64 {
    if x <= 0.0 {
        0
    } else if x >= n as f64 {
        n
    } else {
        x as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn mean_and_variance(draws: &[u64]) -> (f64, f64) {
        let n = draws.len() as f64;
        let mean = draws.iter().map(|&x| x as f64).sum::<f64>() / n;
        let var = draws
            .iter()
            .map(|&x| (x as f64 - mean).powi(2))
            .sum::<f64>()
            / (n - 1.0);
        (mean, var)
    }

    fn exact_pmf(n: u64, p: f64, k: u64) -> f64 {
        let sf = SpecialFunctions::global();
        let (nf, kf) = (n as f64, k as f64);
        (sf.ln_gamma(nf + 1.0) - sf.ln_gamma(kf + 1.0) - sf.ln_gamma(nf - kf + 1.0)
            + kf * p.ln()
            + (nf - kf) * (1.0 - p).ln())
        .exp()
    }

    // ── Dispatch edge cases ─────────────────────────────────────────

    #[test]
    fn degenerate_inputs_short_circuit() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(optimized_binomial_sample(&mut rng, 0.3, 0), 0);
        assert_eq!(optimized_binomial_sample(&mut rng, 0.0, 50), 0);
        assert_eq!(optimized_binomial_sample(&mut rng, -0.2, 50), 0);
        assert_eq!(optimized_binomial_sample(&mut rng, 1.0, 50), 50);
        assert_eq!(optimized_binomial_sample(&mut rng, 1.5, 50), 50);
        assert_eq!(optimized_binomial_sample(&mut rng, f64::NAN, 50), 0);
    }

    #[test]
    fn samples_never_leave_zero_to_n() {
        let mut rng = StdRng::seed_from_u64(2);
        for &(p, n) in &[
            (1e-9, 10u64),
            (0.5, 1),
            (0.999, 7),
            (0.03, 1000),
            (0.45, 100),
            (0.97, 5000),
        ] {
            for _ in 0..2000 {
                let x = optimized_binomial_sample(&mut rng, p, n);
                assert!(x <= n, "p={} n={} x={}", p, n, x);
            }
        }
    }

    // ── Moments ─────────────────────────────────────────────────────

    #[test]
    fn btpe_regime_matches_binomial_moments() {
        let mut rng = StdRng::seed_from_u64(3);
        let draws: Vec<u64> = (0..10_000)
            .map(|_| optimized_binomial_sample(&mut rng, 0.3, 1000))
            .collect();
        let (mean, var) = mean_and_variance(&draws);
        assert!((mean - 300.0).abs() < 1.0, "mean={}", mean);
        assert!((var - 210.0).abs() < 15.0, "var={}", var);
    }

    #[test]
    fn inversion_regime_matches_binomial_moments() {
        let mut rng = StdRng::seed_from_u64(4);
        let draws: Vec<u64> = (0..10_000)
            .map(|_| optimized_binomial_sample(&mut rng, 0.02, 1000))
            .collect();
        let (mean, var) = mean_and_variance(&draws);
        assert!((mean - 20.0).abs() < 0.25, "mean={}", mean);
        assert!((var - 19.6).abs() < 1.5, "var={}", var);
    }

    #[test]
    fn reflected_regime_mirrors_low_probability_distribution() {
        let mut rng = StdRng::seed_from_u64(5);
        let high: Vec<u64> = (0..10_000)
            .map(|_| optimized_binomial_sample(&mut rng, 0.8, 500))
            .collect();
        let mirrored: Vec<u64> = (0..10_000)
            .map(|_| 500 - optimized_binomial_sample(&mut rng, 0.2, 500))
            .collect();
        let (mean_h, var_h) = mean_and_variance(&high);
        let (mean_m, var_m) = mean_and_variance(&mirrored);
        assert!((mean_h - 400.0).abs() < 0.5, "mean={}", mean_h);
        assert!((mean_h - mean_m).abs() < 0.6, "{} vs {}", mean_h, mean_m);
        assert!((var_h - var_m).abs() < 8.0, "{} vs {}", var_h, var_m);
    }

    #[test]
    fn naive_generator_matches_binomial_moments() {
        let mut rng = StdRng::seed_from_u64(6);
        let draws: Vec<u64> = (0..5000)
            .map(|_| BinomialType::Naive.sample(&mut rng, 0.3, 100))
            .collect();
        let (mean, var) = mean_and_variance(&draws);
        assert!((mean - 30.0).abs() < 0.35, "mean={}", mean);
        assert!((var - 21.0).abs() < 2.0, "var={}", var);
    }

    // ── Exact law ───────────────────────────────────────────────────

    #[test]
    fn btpe_histogram_is_close_to_exact_pmf() {
        let (n, p) = (100u64, 0.4);
        let draws = 200_000;
        let mut rng = StdRng::seed_from_u64(7);
        let mut counts = vec![0u64; n as usize + 1];
        for _ in 0..draws {
            counts[optimized_binomial_sample(&mut rng, p, n) as usize] += 1;
        }
        let total_variation: f64 = counts
            .iter()
            .enumerate()
            .map(|(k, &c)| (c as f64 / draws as f64 - exact_pmf(n, p, k as u64)).abs())
            .sum::<f64>()
            / 2.0;
        assert!(total_variation < 0.015, "tv={}", total_variation);
    }

    #[test]
    fn binomial_type_parses_and_rejects_unknown() {
        assert_eq!("naive".parse::<BinomialType>().unwrap(), BinomialType::Naive);
        assert!("fast".parse::<BinomialType>().is_err());
        assert_eq!(BinomialType::default(), BinomialType::Optimized);
    }
}
