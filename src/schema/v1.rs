use serde::Serialize;

use crate::artifacts::ArtifactFingerprint;
use crate::clinical::{ClinicalObservation, RiskLevel, Severity};

#[derive(Debug, Clone, Serialize)]
pub struct EgfrBlock {
    pub value: f64,
    pub unit: String,
    pub stage: u8,
    pub message: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionBlock {
    pub label: u8,
    pub positive_probability: f64,
    pub risk_level: RiskLevel,
    pub display_probability: f64,
    pub statement: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureValue {
    pub name: String,
    pub raw: f64,
    pub scaled: f64,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Explainability {
    pub feature_order: Vec<String>,
    pub features: Vec<FeatureValue>,
    pub selected_feature_names: Vec<String>,
    pub selected_values: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CkdRiskV1 {
    pub tool: String,
    pub version: String,
    pub schema_version: String,
    pub observation: ClinicalObservation,
    pub egfr: EgfrBlock,
    pub prediction: PredictionBlock,
    pub explainability: Explainability,
    pub artifacts: Vec<ArtifactFingerprint>,
    pub warnings: Vec<String>,
}
