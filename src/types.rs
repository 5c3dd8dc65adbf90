use crate::error::AbError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shape parameters of a Beta posterior.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct BetaParams {
    pub a: f64,
    pub b: f64,
}

impl BetaParams {
    pub fn new(a: f64, b: f64) -> Result<Self, AbError> {
        let params = Self { a, b };
        params.validate()?;
        Ok(params)
    }

    /// Posterior under a uniform Beta(1,1) prior: a = successes + 1, b = failures + 1.
    pub fn from_counts(successes: u64, failures: u64) -> Self {
        Self {
            a: successes as f64 + 1.0,
            b: failures as f64 + 1.0,
        }
    }

    /// Both shapes finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        self.a.is_finite() && self.b.is_finite() && self.a > 0.0 && self.b > 0.0
    }

    pub fn validate(&self) -> Result<(), AbError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(AbError::InvalidBetaParams {
                a: self.a,
                b: self.b,
            })
        }
    }

    pub fn mean(&self) -> f64 {
        self.a / (self.a + self.b)
    }

    pub fn variance(&self) -> f64 {
        let sum = self.a + self.b;
        (self.a * self.b) / (sum * sum * (sum + 1.0))
    }

    /// Mirror image on [0,1]: X ~ Beta(a,b) implies 1-X ~ Beta(b,a).
    pub fn reflected(&self) -> Self {
        Self {
            a: self.b,
            b: self.a,
        }
    }

    pub(crate) fn is_integral(&self) -> bool {
        self.a.fract() == 0.0 && self.b.fract() == 0.0
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeltaType {
    Constant,
    Relative,
    Logit,
}

impl FromStr for DeltaType {
    type Err = AbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "constant" => Ok(DeltaType::Constant),
            "relative" => Ok(DeltaType::Relative),
            "logit" => Ok(DeltaType::Logit),
            other => Err(AbError::UnknownDeltaType(other.to_string())),
        }
    }
}

impl fmt::Display for DeltaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeltaType::Constant => "constant",
            DeltaType::Relative => "relative",
            DeltaType::Logit => "logit",
        };
        f.write_str(name)
    }
}

/// A hypothesized shift applied to A before comparing against B.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Delta {
    #[serde(rename = "type")]
    pub kind: DeltaType,
    pub value: f64,
}

impl Delta {
    pub fn constant(value: f64) -> Self {
        Self {
            kind: DeltaType::Constant,
            value,
        }
    }

    pub fn relative(value: f64) -> Self {
        Self {
            kind: DeltaType::Relative,
            value,
        }
    }

    pub fn logit(value: f64) -> Self {
        Self {
            kind: DeltaType::Logit,
            value,
        }
    }
}

/// Request for the integration estimator.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationParams {
    #[serde(rename = "A")]
    pub a: BetaParams,
    #[serde(rename = "B")]
    pub b: BetaParams,
    #[serde(default)]
    pub delta: Option<Delta>,
    #[serde(default)]
    pub steps: Option<usize>,
}

impl IntegrationParams {
    pub fn new(a: BetaParams, b: BetaParams) -> Self {
        Self {
            a,
            b,
            delta: None,
            steps: None,
        }
    }
}
