use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::clinical::{ClinicalObservation, Sex, YesNo};

#[derive(Debug, Parser)]
#[command(
    name = "kira-ckdrisk",
    version,
    about = "Chronic kidney disease risk: eGFR staging and model-based risk scoring"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Score one observation against a loaded artifact set.
    Predict(PredictArgs),
    /// Compute eGFR and CKD stage only.
    Egfr(EgfrArgs),
    /// Load the artifact set and report its shape.
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
pub struct PredictArgs {
    #[arg(long, env = "KIRA_CKDRISK_ARTIFACTS", help = "Artifact directory")]
    pub artifacts: PathBuf,

    #[arg(
        long,
        help = "Observation JSON (optionally .gz); overrides the observation flags"
    )]
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub observation: ObservationArgs,

    #[arg(long, default_value = ".")]
    pub out: PathBuf,

    #[arg(long, default_value_t = false, help = "Write ckdrisk.json to --out")]
    pub json: bool,

    #[arg(
        long,
        default_value_t = false,
        help = "Write ckdrisk_features.tsv to --out"
    )]
    pub tsv: bool,
}

#[derive(Debug, Args)]
pub struct EgfrArgs {
    #[arg(long, help = "Serum creatinine (mg/dL)")]
    pub creatinine: f64,

    #[arg(long)]
    pub age: u32,

    #[arg(long, value_enum)]
    pub sex: SexArg,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[arg(long, env = "KIRA_CKDRISK_ARTIFACTS", help = "Artifact directory")]
    pub artifacts: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct ObservationArgs {
    #[arg(long, value_enum, default_value_t = SexArg::Male)]
    pub sex: SexArg,

    #[arg(long, default_value_t = 45)]
    pub age: u32,

    #[arg(long, default_value_t = 80.0, help = "Blood pressure (mmHg)")]
    pub blood_pressure: f64,

    #[arg(long, default_value_t = 1.005)]
    pub specific_gravity: f64,

    #[arg(long, default_value_t = 1)]
    pub albumin: u8,

    #[arg(long, default_value_t = 0)]
    pub sugar: u8,

    #[arg(long, default_value_t = 100.0, help = "Blood glucose random (mg/dL)")]
    pub blood_glucose_random: f64,

    #[arg(long, default_value_t = 40.0, help = "Blood urea (mg/dL)")]
    pub blood_urea: f64,

    #[arg(long, default_value_t = 1.2, help = "Serum creatinine (mg/dL)")]
    pub serum_creatinine: f64,

    #[arg(long, default_value_t = 137.0, help = "Sodium (mEq/L)")]
    pub sodium: f64,

    #[arg(long, default_value_t = 4.5, help = "Potassium (mEq/L)")]
    pub potassium: f64,

    #[arg(long, default_value_t = 13.5, help = "Hemoglobin (g/dL)")]
    pub hemoglobin: f64,

    #[arg(long, default_value_t = 40.0)]
    pub packed_cell_volume: f64,

    #[arg(long, default_value_t = 9000.0, help = "WBC count (cells/cumm)")]
    pub white_blood_cell_count: f64,

    #[arg(long, default_value_t = 4.8, help = "RBC count (millions/cmm)")]
    pub red_blood_cell_count: f64,

    #[arg(long, value_enum, default_value_t = YesNoArg::Yes)]
    pub hypertension: YesNoArg,

    #[arg(long, value_enum, default_value_t = YesNoArg::Yes)]
    pub diabetes: YesNoArg,

    #[arg(long, value_enum, default_value_t = YesNoArg::Yes)]
    pub anemia: YesNoArg,

    #[arg(long, value_enum, default_value_t = YesNoArg::Yes)]
    pub edema: YesNoArg,
}

impl ObservationArgs {
    pub fn to_observation(&self) -> ClinicalObservation {
        ClinicalObservation {
            sex: self.sex.into(),
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
            hypertension: self.hypertension.into(),
            diabetes: self.diabetes.into(),
            anemia: self.anemia.into(),
            edema: self.edema.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SexArg {
    Male,
    Female,
}

impl From<SexArg> for Sex {
    fn from(arg: SexArg) -> Self {
        match arg {
            SexArg::Male => Sex::Male,
            SexArg::Female => Sex::Female,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum YesNoArg {
    Yes,
    No,
}

impl From<YesNoArg> for YesNo {
    fn from(arg: YesNoArg) -> Self {
        match arg {
            YesNoArg::Yes => YesNo::Yes,
            YesNoArg::No => YesNo::No,
        }
    }
}
