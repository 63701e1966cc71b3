use serde::{Deserialize, Serialize};

use crate::clinical::{Sex, YesNo};
use crate::error::CkdError;

pub const SPECIFIC_GRAVITY_LEVELS: [f64; 5] = [1.005, 1.010, 1.015, 1.020, 1.025];

const GRAVITY_TOLERANCE: f64 = 1e-9;

/// One patient's raw inputs at prediction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalObservation {
    pub sex: Sex,
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
    pub hypertension: YesNo,
    pub diabetes: YesNo,
    pub anemia: YesNo,
    pub edema: YesNo,
}

impl Default for ClinicalObservation {
    fn default() -> Self {
        Self {
            sex: Sex::Male,
            age: 45,
            blood_pressure: 80.0,
            specific_gravity: 1.005,
            albumin: 1,
            sugar: 0,
            blood_glucose_random: 100.0,
            blood_urea: 40.0,
            serum_creatinine: 1.2,
            sodium: 137.0,
            potassium: 4.5,
            hemoglobin: 13.5,
            packed_cell_volume: 40.0,
            white_blood_cell_count: 9000.0,
            red_blood_cell_count: 4.8,
            hypertension: YesNo::Yes,
            diabetes: YesNo::Yes,
            anemia: YesNo::Yes,
            edema: YesNo::Yes,
        }
    }
}

impl ClinicalObservation {
    /// Checks every field against its accepted domain and reports all
    /// violations together.
    pub fn validate(&self) -> Result<(), CkdError> {
        let mut errors = Vec::new();

        if !(1..=100).contains(&self.age) {
            errors.push(format!("age {} out of range [1, 100]", self.age));
        }
        check_range(&mut errors, "blood_pressure", self.blood_pressure, 0.0, 200.0);
        if !SPECIFIC_GRAVITY_LEVELS
            .iter()
            .any(|level| (level - self.specific_gravity).abs() < GRAVITY_TOLERANCE)
        {
            errors.push(format!(
                "specific_gravity {} must be one of 1.005, 1.010, 1.015, 1.020, 1.025",
                self.specific_gravity
            ));
        }
        if self.albumin > 5 {
            errors.push(format!("albumin {} out of range [0, 5]", self.albumin));
        }
        if self.sugar > 5 {
            errors.push(format!("sugar {} out of range [0, 5]", self.sugar));
        }
        check_range(
            &mut errors,
            "blood_glucose_random",
            self.blood_glucose_random,
            0.0,
            500.0,
        );
        check_range(&mut errors, "blood_urea", self.blood_urea, 0.0, 300.0);
        check_range(
            &mut errors,
            "serum_creatinine",
            self.serum_creatinine,
            0.0,
            15.0,
        );
        if self.serum_creatinine == 0.0 {
            errors.push("serum_creatinine must be greater than 0".to_string());
        }
        check_range(&mut errors, "sodium", self.sodium, 100.0, 160.0);
        check_range(&mut errors, "potassium", self.potassium, 2.0, 8.0);
        check_range(&mut errors, "hemoglobin", self.hemoglobin, 5.0, 20.0);
        check_range(
            &mut errors,
            "packed_cell_volume",
            self.packed_cell_volume,
            20.0,
            55.0,
        );
        check_range(
            &mut errors,
            "white_blood_cell_count",
            self.white_blood_cell_count,
            3000.0,
            18000.0,
        );
        check_range(
            &mut errors,
            "red_blood_cell_count",
            self.red_blood_cell_count,
            2.0,
            6.5,
        );

        if errors.is_empty() {
            Ok(())
        } else {
            Err(CkdError::Validation(errors))
        }
    }
}

fn check_range(errors: &mut Vec<String>, field: &str, value: f64, min: f64, max: f64) {
    if !value.is_finite() {
        errors.push(format!("{} must be a finite number", field));
    } else if !(min..=max).contains(&value) {
        errors.push(format!(
            "{} {} out of range [{}, {}]",
            field, value, min, max
        ));
    }
}
