use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::artifacts::{FeatureScaler, ensure_batch};
use crate::error::CkdError;

fn default_true() -> bool {
    true
}

/// Mean/standard-deviation scaler as fitted on the training set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub feature_names_in: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
    #[serde(default = "default_true")]
    pub with_mean: bool,
    #[serde(default = "default_true")]
    pub with_std: bool,
}

impl StandardScaler {
    pub fn check(&self) -> Result<(), CkdError> {
        let n = self.feature_names_in.len();
        if n == 0 {
            return Err(CkdError::startup("scaler", "feature_names_in is empty"));
        }
        if self.mean.len() != n || self.scale.len() != n {
            return Err(CkdError::startup(
                "scaler",
                format!(
                    "feature_names_in has {} entries but mean has {} and scale has {}",
                    n,
                    self.mean.len(),
                    self.scale.len()
                ),
            ));
        }
        for (i, name) in self.feature_names_in.iter().enumerate() {
            if !self.mean[i].is_finite() {
                return Err(CkdError::startup(
                    "scaler",
                    format!("mean for '{}' is not finite", name),
                ));
            }
            if !self.scale[i].is_finite() || self.scale[i] <= 0.0 {
                return Err(CkdError::startup(
                    "scaler",
                    format!("scale for '{}' must be positive, got {}", name, self.scale[i]),
                ));
            }
        }
        Ok(())
    }
}

impl FeatureScaler for StandardScaler {
    fn feature_names(&self) -> &[String] {
        &self.feature_names_in
    }

    fn transform(&self, batch: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        ensure_batch(batch, self.feature_names_in.len(), "scaler")?;
        let out = batch
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(i, &x)| {
                        let centered = if self.with_mean { x - self.mean[i] } else { x };
                        if self.with_std {
                            centered / self.scale[i]
                        } else {
                            centered
                        }
                    })
                    .collect()
            })
            .collect();
        Ok(out)
    }
}
