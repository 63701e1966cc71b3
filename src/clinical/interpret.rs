use serde::Serialize;

use crate::clinical::PredictionResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    High,
}

/// Human-readable verdict. `probability` is the confidence in the reported
/// level: p for high risk, 1 - p for low risk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskStatement {
    pub level: RiskLevel,
    pub probability: f64,
}

impl RiskStatement {
    pub fn from_prediction(prediction: &PredictionResult) -> Self {
        if prediction.label == 1 {
            Self {
                level: RiskLevel::High,
                probability: prediction.probability,
            }
        } else {
            Self {
                level: RiskLevel::Low,
                probability: 1.0 - prediction.probability,
            }
        }
    }

    pub fn percent(&self) -> f64 {
        self.probability * 100.0
    }

    pub fn message(&self) -> String {
        let level = match self.level {
            RiskLevel::High => "High",
            RiskLevel::Low => "Low",
        };
        format!(
            "{} risk of Chronic Kidney Disease ({:.2}% probability)",
            level,
            self.percent()
        )
    }
}
