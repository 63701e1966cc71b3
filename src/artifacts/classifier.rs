use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::artifacts::trees::{TreeEnsemble, TreeEnsembleDump};
use crate::artifacts::{Classifier, ensure_batch, sigmoid};
use crate::error::CkdError;

/// On-disk classifier description, tagged by `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    GradientBoostedTrees(TreeEnsembleDump),
    Logistic(LogisticClassifier),
}

impl ClassifierArtifact {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::GradientBoostedTrees(_) => "gradient_boosted_trees",
            Self::Logistic(_) => "logistic",
        }
    }

    pub fn into_classifier(self) -> Result<Box<dyn Classifier>, CkdError> {
        match self {
            Self::GradientBoostedTrees(dump) => Ok(Box::new(TreeEnsemble::from_dump(dump)?)),
            Self::Logistic(model) => {
                model.check()?;
                Ok(Box::new(model))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticClassifier {
    pub coef: Vec<f64>,
    pub intercept: f64,
}

impl LogisticClassifier {
    pub fn check(&self) -> Result<(), CkdError> {
        if self.coef.is_empty() {
            return Err(CkdError::startup("classifier", "logistic coef is empty"));
        }
        if !self.intercept.is_finite() || self.coef.iter().any(|w| !w.is_finite()) {
            return Err(CkdError::startup(
                "classifier",
                "logistic coefficients must be finite",
            ));
        }
        Ok(())
    }

    pub fn decision(&self, row: &[f64]) -> f64 {
        self.coef
            .iter()
            .zip(row.iter())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept
    }
}

impl Classifier for LogisticClassifier {
    fn n_features(&self) -> usize {
        self.coef.len()
    }

    fn predict(&self, batch: &[Vec<f64>]) -> Result<Vec<u8>> {
        ensure_batch(batch, self.coef.len(), "classifier")?;
        Ok(batch
            .iter()
            .map(|row| u8::from(self.decision(row) > 0.0))
            .collect())
    }

    fn predict_proba(&self, batch: &[Vec<f64>]) -> Result<Vec<[f64; 2]>> {
        ensure_batch(batch, self.coef.len(), "classifier")?;
        Ok(batch
            .iter()
            .map(|row| {
                let p = sigmoid(self.decision(row));
                [1.0 - p, p]
            })
            .collect())
    }
}
