use std::collections::{BTreeMap, BTreeSet};

use crate::clinical::ClinicalObservation;
use crate::error::CkdError;

/// Names emitted by the assembler. The scaler's trained order must be a
/// permutation of exactly this set.
pub const CANONICAL_FEATURES: [&str; 19] = [
    "age",
    "blood_pressure",
    "specific_gravity",
    "albumin",
    "sugar",
    "blood_glucose_random",
    "blood_urea",
    "serum_creatinine",
    "sodium",
    "potassium",
    "hemoglobin",
    "packed_cell_volume",
    "white_blood_cell_count",
    "red_blood_cell_count",
    "hypertension",
    "diabetes",
    "anemia",
    "edema",
    "eGFR",
];

#[derive(Debug, Clone, PartialEq)]
pub struct DerivedFeatureVector {
    values: BTreeMap<String, f64>,
}

impl DerivedFeatureVector {
    /// Sex is consumed by the eGFR calculation only and is not a feature.
    pub fn assemble(obs: &ClinicalObservation, egfr: f64) -> Self {
        let pairs = [
            ("age", f64::from(obs.age)),
            ("blood_pressure", obs.blood_pressure),
            ("specific_gravity", obs.specific_gravity),
            ("albumin", f64::from(obs.albumin)),
            ("sugar", f64::from(obs.sugar)),
            ("blood_glucose_random", obs.blood_glucose_random),
            ("blood_urea", obs.blood_urea),
            ("serum_creatinine", obs.serum_creatinine),
            ("sodium", obs.sodium),
            ("potassium", obs.potassium),
            ("hemoglobin", obs.hemoglobin),
            ("packed_cell_volume", obs.packed_cell_volume),
            ("white_blood_cell_count", obs.white_blood_cell_count),
            ("red_blood_cell_count", obs.red_blood_cell_count),
            ("hypertension", obs.hypertension.encode()),
            ("diabetes", obs.diabetes.encode()),
            ("anemia", obs.anemia.encode()),
            ("edema", obs.edema.encode()),
            ("eGFR", egfr),
        ];
        let values = pairs
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect();
        Self { values }
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            values: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Reverse lookup of [`DerivedFeatureVector::reorder`].
    pub fn from_ordered(row: &OrderedInputRow) -> Self {
        Self::from_pairs(
            row.names
                .iter()
                .cloned()
                .zip(row.values.iter().copied()),
        )
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Lays the values out in `order`. Any name missing from the vector, any
    /// name the order does not consume, and any duplicate in the order is a
    /// configuration error; no defaults are inserted.
    pub fn reorder(&self, order: &[String]) -> Result<OrderedInputRow, CkdError> {
        let mut seen = BTreeSet::new();
        let mut duplicates = Vec::new();
        let mut missing = Vec::new();
        let mut values = Vec::with_capacity(order.len());

        for name in order {
            if !seen.insert(name.as_str()) {
                duplicates.push(name.clone());
                continue;
            }
            match self.values.get(name) {
                Some(&v) => values.push(v),
                None => missing.push(name.clone()),
            }
        }

        let unused: Vec<String> = self
            .values
            .keys()
            .filter(|k| !seen.contains(k.as_str()))
            .cloned()
            .collect();

        let mut problems = Vec::new();
        if !missing.is_empty() {
            problems.push(format!(
                "expected features not assembled: {}",
                missing.join(", ")
            ));
        }
        if !duplicates.is_empty() {
            problems.push(format!(
                "duplicate names in feature order: {}",
                duplicates.join(", ")
            ));
        }
        if !unused.is_empty() {
            problems.push(format!(
                "assembled features not in feature order: {}",
                unused.join(", ")
            ));
        }
        if !problems.is_empty() {
            return Err(CkdError::configuration(problems.join("; ")));
        }

        Ok(OrderedInputRow {
            names: order.to_vec(),
            values,
        })
    }
}

/// Feature values in the scaler's trained column order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedInputRow {
    names: Vec<String>,
    values: Vec<f64>,
}

impl OrderedInputRow {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Single-row batch for the preprocessing adapter.
    pub fn to_batch(&self) -> Vec<Vec<f64>> {
        vec![self.values.clone()]
    }
}
