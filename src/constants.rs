/// Total trapezoid steps per integral (split evenly across sub-ranges).
pub const NUMERICAL_INTEGRAL_DEFAULT_STEPS: usize = 1000;

/// Number of Beta draws per distribution in the Monte Carlo estimator.
pub const MONTE_CARLO_DEFAULT_SAMPLE_SIZE: usize = 10_000;

/// Sub-ranges the integration domain is split into.
pub const INTEGRATION_SUBRANGES: usize = 5;

/// Half-width of the dense integration window, in standard deviations.
pub const INTEGRATION_WIDTH_STDDEVS: f64 = 4.0;

/// `n * min(p, 1 - p)` at or below which the binomial generator uses inversion
/// instead of BTPE.
pub const BINOMIAL_INVERSION_THRESHOLD: f64 = 30.0;
