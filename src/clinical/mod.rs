pub mod egfr;
pub mod features;
pub mod interpret;
pub mod observation;
pub mod stage;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CkdError;

pub use egfr::calculate_egfr;
pub use features::{CANONICAL_FEATURES, DerivedFeatureVector, OrderedInputRow};
pub use interpret::{RiskLevel, RiskStatement};
pub use observation::ClinicalObservation;
pub use stage::{CkdStage, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = CkdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            other => Err(CkdError::validation(format!(
                "sex must be 'male' or 'female', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    /// Only the exact label `yes` is positive; every other label reads as `no`.
    pub fn from_label(label: &str) -> Self {
        if label == "yes" { Self::Yes } else { Self::No }
    }

    pub fn is_known_label(label: &str) -> bool {
        label == "yes" || label == "no"
    }

    pub fn encode(self) -> f64 {
        match self {
            Self::Yes => 1.0,
            Self::No => 0.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }
}

impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The final per-request outcome, present only when every scoring stage ran.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub egfr: f64,
    pub stage: CkdStage,
    pub prediction: PredictionResult,
    pub statement: RiskStatement,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionResult {
    pub label: u8,
    pub probability: f64,
}
