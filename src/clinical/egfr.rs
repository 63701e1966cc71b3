//! CKD-EPI 2009 creatinine equation, race coefficient omitted.

use crate::clinical::Sex;
use crate::error::CkdError;

pub const EGFR_UNIT: &str = "mL/min/1.73m²";

const BASE: f64 = 141.0;
const UPPER_EXPONENT: f64 = -1.209;
const AGE_DECAY: f64 = 0.993;

struct SexConstants {
    kappa: f64,
    alpha: f64,
    factor: f64,
}

fn constants(sex: Sex) -> SexConstants {
    match sex {
        Sex::Female => SexConstants {
            kappa: 0.7,
            alpha: -0.329,
            factor: 1.018,
        },
        Sex::Male => SexConstants {
            kappa: 0.9,
            alpha: -0.411,
            factor: 1.0,
        },
    }
}

pub fn calculate_egfr(creatinine: f64, age: u32, sex: Sex) -> Result<f64, CkdError> {
    if !creatinine.is_finite() || creatinine <= 0.0 {
        return Err(CkdError::validation(format!(
            "serum creatinine must be a positive number, got {}",
            creatinine
        )));
    }

    let c = constants(sex);
    let ratio = creatinine / c.kappa;
    let egfr = BASE
        * ratio.min(1.0).powf(c.alpha)
        * ratio.max(1.0).powf(UPPER_EXPONENT)
        * AGE_DECAY.powf(f64::from(age))
        * c.factor;

    if !egfr.is_finite() || egfr <= 0.0 {
        return Err(CkdError::validation(format!(
            "eGFR is not computable for creatinine={} age={}",
            creatinine, age
        )));
    }
    Ok(egfr)
}
