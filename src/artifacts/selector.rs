use serde::{Deserialize, Serialize};

use crate::artifacts::FeatureSelector;
use crate::error::CkdError;

/// Selector described by a boolean support mask over the scaled columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SupportMaskRaw", into = "SupportMaskRaw")]
pub struct SupportSelector {
    support: Vec<bool>,
    indices: Vec<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SupportMaskRaw {
    support: Vec<bool>,
}

impl TryFrom<SupportMaskRaw> for SupportSelector {
    type Error = CkdError;

    fn try_from(raw: SupportMaskRaw) -> Result<Self, Self::Error> {
        Self::from_support(raw.support)
    }
}

impl From<SupportSelector> for SupportMaskRaw {
    fn from(sel: SupportSelector) -> Self {
        Self {
            support: sel.support,
        }
    }
}

impl SupportSelector {
    pub fn from_support(support: Vec<bool>) -> Result<Self, CkdError> {
        if support.is_empty() {
            return Err(CkdError::startup("selector", "support mask is empty"));
        }
        let indices = support
            .iter()
            .enumerate()
            .filter(|(_, keep)| **keep)
            .map(|(i, _)| i)
            .collect();
        Ok(Self { support, indices })
    }

    pub fn support(&self) -> &[bool] {
        &self.support
    }
}

impl FeatureSelector for SupportSelector {
    fn n_features_in(&self) -> usize {
        self.support.len()
    }

    fn selected_indices(&self) -> &[usize] {
        &self.indices
    }
}
