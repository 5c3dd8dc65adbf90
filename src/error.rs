use thiserror::Error;

#[derive(Error, Debug)]
pub enum AbError {
    #[error("{method} method does not support delta adjustments")]
    DeltaNotSupported { method: String },

    #[error("Normal approximation method does not support logit delta adjustments")]
    LogitDeltaNotSupported,

    #[error("Unknown delta type: {0}")]
    UnknownDeltaType(String),

    #[error("Invalid comparison method: {0}")]
    UnknownComparisonMethod(String),

    #[error("Unknown binomial type: {0}")]
    UnknownBinomialType(String),

    #[error("Unknown pairwise method: {0}")]
    UnknownPairwiseMethod(String),

    #[error("Invalid Beta parameters: a={a}, b={b} (both must be finite and > 0)")]
    InvalidBetaParams { a: f64, b: f64 },

    #[error("Configuration error: {0}")]
    InvalidConfig(String),

    #[error("Error during comparison: {method} returned no result")]
    ComparisonFailed { method: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure inside the special-function layer. Estimators turn this into the
/// "no result" sentinel instead of surfacing it.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("special function failure: {0}")]
pub struct SpecialFunctionError(pub String);

pub type Result<T> = std::result::Result<T, AbError>;
