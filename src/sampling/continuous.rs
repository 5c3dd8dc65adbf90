use rand::Rng;
use std::f64::consts::PI;

pub fn exponential_sample<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    -(1.0 - rng.gen::<f64>()).ln()
}

/// Box–Muller; `1 - U` keeps the log argument in (0, 1].
pub fn gaussian_sample<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u = 1.0 - rng.gen::<f64>();
    let v = rng.gen::<f64>();
    (-2.0 * u.ln()).sqrt() * (2.0 * PI * v).cos()
}

/// Multiplicative Poisson sampler, O(λ) per draw.
pub fn poisson_sample<R: Rng + ?Sized>(rng: &mut R, lambda: f64) -> u64 {
    if lambda <= 0.0 {
        return 0;
    }
    let limit = (-lambda).exp();
    let mut k: u64 = 0;
    let mut p = 1.0;
    loop {
        p *= rng.gen::<f64>();
        if p <= limit {
            return k;
        }
        k += 1;
    }
}

/// Gamma(shape, 1).
///
/// shape = 1 is exponential, shape < 1 uses Johnk's transform, shape > 1 uses
/// the Marsaglia–Tsang squeeze.
pub fn gamma_sample<R: Rng + ?Sized>(rng: &mut R, shape: f64) -> f64 {
    if shape == 1.0 {
        return exponential_sample(rng);
    }
    if shape <= 0.0 {
        return 0.0;
    }

    if shape < 1.0 {
        loop {
            let u: f64 = rng.gen();
            let v = exponential_sample(rng);
            if u <= 1.0 - shape {
                let x = u.powf(1.0 / shape);
                if x <= v {
                    return x;
                }
            } else {
                let y = -((1.0 - u) / shape).ln();
                let x = (1.0 - shape + shape * y).powf(1.0 / shape);
                if x <= v + y {
                    return x;
                }
            }
        }
    }

    let b = shape - 1.0 / 3.0;
    let c = 1.0 / (9.0 * b).sqrt();
    loop {
        let (x, v) = loop {
            let x = gaussian_sample(rng);
            let v = 1.0 + c * x;
            if v > 0.0 {
                break (x, v * v * v);
            }
        };

        let u: f64 = rng.gen();
        if u < 1.0 - 0.0331 * x.powi(4) {
            return b * v;
        }
        if u.ln() < 0.5 * x * x + b * (1.0 - v + v.ln()) {
            return b * v;
        }
    }
}

/// Beta(a, b).
///
/// With both shapes ≤ 1, rejection on (U^(1/a), V^(1/b)) pairs; otherwise the
/// ratio Ga / (Ga + Gb) of two Gamma draws. NaN for non-positive shapes.
pub fn beta_sample<R: Rng + ?Sized>(rng: &mut R, a: f64, b: f64) -> f64 {
    // The rejection loop below never accepts for non-positive shapes.
    if !(a > 0.0 && b > 0.0) {
        return f64::NAN;
    }
    if a <= 1.0 && b <= 1.0 {
        loop {
            let u: f64 = rng.gen();
            let v: f64 = rng.gen();
            let x = u.powf(1.0 / a);
            let y = v.powf(1.0 / b);

            if x + y <= 1.0 {
                if x + y > 0.0 {
                    return x / (x + y);
                }
                // Both powers underflowed; redo the ratio in log space.
                let mut log_x = u.ln() / a;
                let mut log_y = v.ln() / b;
                let log_max = log_x.max(log_y);
                log_x -= log_max;
                log_y -= log_max;
                return (log_x - (log_x.exp() + log_y.exp()).ln()).exp();
            }
        }
    }

    let ga = gamma_sample(rng, a);
    let gb = gamma_sample(rng, b);
    ga / (ga + gb)
}
