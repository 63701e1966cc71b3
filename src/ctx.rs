use std::path::PathBuf;
use std::sync::Arc;

use crate::artifacts::Artifacts;
use crate::clinical::{
    Assessment, ClinicalObservation, DerivedFeatureVector, OrderedInputRow, PredictionResult,
};
use crate::schema::v1::CkdRiskV1;

#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub out_dir: PathBuf,
    pub json_path: PathBuf,
    pub tsv_path: PathBuf,
}

/// Per-request state threaded through the pipeline stages.
#[derive(Debug)]
pub struct Ctx {
    pub artifacts: Arc<Artifacts>,
    pub observation: ClinicalObservation,
    pub write_json: bool,
    pub write_tsv: bool,
    pub tool_version: String,
    /// Warnings raised by this request's input; artifact warnings live on
    /// `artifacts`.
    pub warnings: Vec<String>,
    pub egfr: Option<f64>,
    pub features: Option<DerivedFeatureVector>,
    pub ordered_row: Option<OrderedInputRow>,
    pub scaled_row: Option<Vec<f64>>,
    pub selected_row: Option<Vec<f64>>,
    pub prediction: Option<PredictionResult>,
    pub assessment: Option<Assessment>,
    pub output: OutputPaths,
    pub report: Option<CkdRiskV1>,
}

impl Ctx {
    pub fn new(
        artifacts: Arc<Artifacts>,
        observation: ClinicalObservation,
        out_dir: PathBuf,
        write_json: bool,
        write_tsv: bool,
        tool_version: &str,
    ) -> Self {
        let json_path = out_dir.join("ckdrisk.json");
        let tsv_path = out_dir.join("ckdrisk_features.tsv");
        Self {
            artifacts,
            observation,
            write_json,
            write_tsv,
            tool_version: tool_version.to_string(),
            warnings: Vec::new(),
            egfr: None,
            features: None,
            ordered_row: None,
            scaled_row: None,
            selected_row: None,
            prediction: None,
            assessment: None,
            output: OutputPaths {
                out_dir,
                json_path,
                tsv_path,
            },
            report: None,
        }
    }

    /// Artifact warnings first, then request warnings.
    pub fn all_warnings(&self) -> Vec<String> {
        self.artifacts
            .warnings
            .iter()
            .chain(&self.warnings)
            .cloned()
            .collect()
    }
}
