use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::clinical::{ClinicalObservation, Sex, YesNo};
use crate::error::CkdError;
use crate::io::open_maybe_gz;

/// Observation as submitted: categorical answers are free-form strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationRecord {
    pub sex: String,
    pub age: u32,
    pub blood_pressure: f64,
    pub specific_gravity: f64,
    pub albumin: u8,
    pub sugar: u8,
    pub blood_glucose_random: f64,
    pub blood_urea: f64,
    pub serum_creatinine: f64,
    pub sodium: f64,
    pub potassium: f64,
    pub hemoglobin: f64,
    pub packed_cell_volume: f64,
    pub white_blood_cell_count: f64,
    pub red_blood_cell_count: f64,
    pub hypertension: String,
    pub diabetes: String,
    pub anemia: String,
    pub edema: String,
}

impl ObservationRecord {
    /// Sex must be `male` or `female`. Yes/no answers other than the exact
    /// labels read as `no` and are returned as warnings.
    pub fn into_observation(self) -> Result<(ClinicalObservation, Vec<String>)> {
        let sex: Sex = self.sex.parse()?;
        let mut warnings = Vec::new();
        let mut answer = |field: &str, label: &str| {
            if !YesNo::is_known_label(label) {
                warnings.push(format!(
                    "{}: unrecognised answer '{}' treated as 'no'",
                    field, label
                ));
            }
            YesNo::from_label(label)
        };
        let hypertension = answer("hypertension", &self.hypertension);
        let diabetes = answer("diabetes", &self.diabetes);
        let anemia = answer("anemia", &self.anemia);
        let edema = answer("edema", &self.edema);

        let observation = ClinicalObservation {
            sex,
            age: self.age,
            blood_pressure: self.blood_pressure,
            specific_gravity: self.specific_gravity,
            albumin: self.albumin,
            sugar: self.sugar,
            blood_glucose_random: self.blood_glucose_random,
            blood_urea: self.blood_urea,
            serum_creatinine: self.serum_creatinine,
            sodium: self.sodium,
            potassium: self.potassium,
            hemoglobin: self.hemoglobin,
            packed_cell_volume: self.packed_cell_volume,
            white_blood_cell_count: self.white_blood_cell_count,
            red_blood_cell_count: self.red_blood_cell_count,
            hypertension,
            diabetes,
            anemia,
            edema,
        };
        Ok((observation, warnings))
    }
}

pub fn read_observation(path: &Path) -> Result<(ClinicalObservation, Vec<String>)> {
    let reader =
        open_maybe_gz(path).map_err(|e| CkdError::validation(format!("{:#}", e)))?;
    let record: ObservationRecord = serde_json::from_reader(reader).map_err(|e| {
        CkdError::validation(format!("malformed observation {}: {}", path.display(), e))
    })?;
    record.into_observation()
}
