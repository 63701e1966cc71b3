pub mod classifier;
pub mod loader;
pub mod scaler;
pub mod selector;
pub mod trees;

use anyhow::Result;
use tracing::warn;

use crate::clinical::PredictionResult;
use crate::error::CkdError;

pub use classifier::{ClassifierArtifact, LogisticClassifier};
pub use loader::{ArtifactFingerprint, ArtifactPaths, load_artifacts};
pub use scaler::StandardScaler;
pub use selector::SupportSelector;
pub use trees::TreeEnsemble;

/// Fitted per-feature normalisation over the full feature set.
pub trait FeatureScaler: Send + Sync {
    /// Column order the scaler was fitted on.
    fn feature_names(&self) -> &[String];

    fn transform(&self, batch: &[Vec<f64>]) -> Result<Vec<Vec<f64>>>;

    fn n_features(&self) -> usize {
        self.feature_names().len()
    }
}

/// Fitted projection onto a trained subset of columns.
pub trait FeatureSelector: Send + Sync {
    fn n_features_in(&self) -> usize;

    /// Retained column indices, ascending.
    fn selected_indices(&self) -> &[usize];

    fn n_features_out(&self) -> usize {
        self.selected_indices().len()
    }

    fn transform(&self, batch: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        ensure_batch(batch, self.n_features_in(), "selector")?;
        let mut out = Vec::with_capacity(batch.len());
        for row in batch {
            let selected = self
                .selected_indices()
                .iter()
                .map(|&i| {
                    row.get(i).copied().ok_or_else(|| {
                        CkdError::configuration(format!(
                            "selector index {} out of range for row of width {}",
                            i,
                            row.len()
                        ))
                    })
                })
                .collect::<Result<Vec<f64>, CkdError>>()?;
            out.push(selected);
        }
        Ok(out)
    }
}

/// Pre-trained binary classifier.
pub trait Classifier: Send + Sync {
    fn n_features(&self) -> usize;

    fn predict(&self, batch: &[Vec<f64>]) -> Result<Vec<u8>>;

    /// `[p(class 0), p(class 1)]` per row.
    fn predict_proba(&self, batch: &[Vec<f64>]) -> Result<Vec<[f64; 2]>>;
}

/// Scaled (full width) and selected (narrow) rows of one preprocessing pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Preprocessed {
    pub scaled: Vec<Vec<f64>>,
    pub selected: Vec<Vec<f64>>,
}

/// Read-only bundle loaded once at startup and shared across requests.
pub struct Artifacts {
    pub scaler: Box<dyn FeatureScaler>,
    pub selector: Box<dyn FeatureSelector>,
    pub classifier: Box<dyn Classifier>,
    pub selected_feature_names: Vec<String>,
    pub fingerprints: Vec<ArtifactFingerprint>,
    pub warnings: Vec<String>,
}

impl std::fmt::Debug for Artifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifacts")
            .field("n_features", &self.scaler.n_features())
            .field("n_selected", &self.selector.n_features_out())
            .field("selected_feature_names", &self.selected_feature_names)
            .field("fingerprints", &self.fingerprints)
            .finish()
    }
}

impl Artifacts {
    /// Cross-checks the widths of the three components. Inconsistent bundles
    /// are rejected as a startup error.
    pub fn new(
        scaler: Box<dyn FeatureScaler>,
        selector: Box<dyn FeatureSelector>,
        classifier: Box<dyn Classifier>,
        selected_feature_names: Vec<String>,
    ) -> Result<Self, CkdError> {
        if scaler.n_features() == 0 {
            return Err(CkdError::startup("scaler", "scaler has no features"));
        }
        if selector.n_features_in() != scaler.n_features() {
            return Err(CkdError::startup(
                "selector",
                format!(
                    "selector expects {} features but scaler produces {}",
                    selector.n_features_in(),
                    scaler.n_features()
                ),
            ));
        }
        if selector.n_features_out() == 0 {
            return Err(CkdError::startup("selector", "selector keeps no features"));
        }
        check_selected_indices(selector.selected_indices(), selector.n_features_in())?;
        if classifier.n_features() != selector.n_features_out() {
            return Err(CkdError::startup(
                "classifier",
                format!(
                    "classifier expects {} features but selector produces {}",
                    classifier.n_features(),
                    selector.n_features_out()
                ),
            ));
        }

        let mut warnings = Vec::new();
        if selected_feature_names.len() != selector.n_features_out() {
            let msg = format!(
                "selected feature name list has {} entries but selector keeps {} features",
                selected_feature_names.len(),
                selector.n_features_out()
            );
            warn!(%msg, "selected_feature_names_mismatch");
            warnings.push(msg);
        }

        Ok(Self {
            scaler,
            selector,
            classifier,
            selected_feature_names,
            fingerprints: Vec::new(),
            warnings,
        })
    }

    pub fn feature_order(&self) -> &[String] {
        self.scaler.feature_names()
    }

    /// Scale, then select. Strict order: the selector indexes scaled columns.
    pub fn preprocess(&self, batch: &[Vec<f64>]) -> Result<Preprocessed> {
        let scaled = self.scaler.transform(batch)?;
        let selected = self.selector.transform(&scaled)?;
        Ok(Preprocessed { scaled, selected })
    }

    pub fn classify(&self, batch: &[Vec<f64>]) -> Result<Vec<PredictionResult>> {
        ensure_batch(batch, self.classifier.n_features(), "classifier")?;
        let labels = self.classifier.predict(batch)?;
        let probas = self.classifier.predict_proba(batch)?;
        if labels.len() != batch.len() || probas.len() != batch.len() {
            return Err(CkdError::configuration(format!(
                "classifier returned {} labels and {} probabilities for {} rows",
                labels.len(),
                probas.len(),
                batch.len()
            ))
            .into());
        }

        let mut out = Vec::with_capacity(batch.len());
        for (label, proba) in labels.into_iter().zip(probas) {
            if label > 1 {
                return Err(
                    CkdError::configuration(format!("classifier label {} is not 0/1", label))
                        .into(),
                );
            }
            let p = proba[1];
            if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                return Err(CkdError::configuration(format!(
                    "classifier probability {} outside [0, 1]",
                    p
                ))
                .into());
            }
            out.push(PredictionResult {
                label,
                probability: p,
            });
        }
        Ok(out)
    }
}

/// Selected indices must be ascending, unique and below `n_features_in`.
fn check_selected_indices(indices: &[usize], n_features_in: usize) -> Result<(), CkdError> {
    if let Some(&i) = indices.iter().find(|&&i| i >= n_features_in) {
        return Err(CkdError::startup(
            "selector",
            format!(
                "selected index {} out of range for {} input features",
                i, n_features_in
            ),
        ));
    }
    if let Some(pair) = indices.windows(2).find(|w| w[0] >= w[1]) {
        return Err(CkdError::startup(
            "selector",
            format!(
                "selected indices must be unique and ascending, found {} before {}",
                pair[0], pair[1]
            ),
        ));
    }
    Ok(())
}

/// Rejects empty batches and rows whose width differs from `width`.
pub fn ensure_batch(batch: &[Vec<f64>], width: usize, component: &str) -> Result<(), CkdError> {
    if batch.is_empty() {
        return Err(CkdError::configuration(format!(
            "{} received an empty batch",
            component
        )));
    }
    for (i, row) in batch.iter().enumerate() {
        if row.len() != width {
            return Err(CkdError::configuration(format!(
                "{} expects rows of width {}, row {} has width {}",
                component,
                width,
                i,
                row.len()
            )));
        }
    }
    Ok(())
}

pub(crate) fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
