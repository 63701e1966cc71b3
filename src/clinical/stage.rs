use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CkdStage {
    Stage1,
    Stage2,
    Stage3,
    Stage4,
    Stage5,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

impl CkdStage {
    /// Thresholds are checked from the top down; NaN falls through to stage 5.
    pub fn from_egfr(egfr: f64) -> Self {
        if egfr >= 90.0 {
            Self::Stage1
        } else if egfr >= 60.0 {
            Self::Stage2
        } else if egfr >= 30.0 {
            Self::Stage3
        } else if egfr >= 15.0 {
            Self::Stage4
        } else {
            Self::Stage5
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Self::Stage1 => 1,
            Self::Stage2 => 2,
            Self::Stage3 => 3,
            Self::Stage4 => 4,
            Self::Stage5 => 5,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Stage1 => "Normal kidney function",
            Self::Stage2 => "Mildly decreased function",
            Self::Stage3 => "Moderate decrease in function",
            Self::Stage4 => "Severe decrease in function",
            Self::Stage5 => "Kidney failure",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            Self::Stage1 => Severity::Success,
            Self::Stage2 => Severity::Info,
            Self::Stage3 => Severity::Warning,
            Self::Stage4 | Self::Stage5 => Severity::Error,
        }
    }

    pub fn describe(self) -> String {
        format!("{} (Stage {})", self.message(), self.number())
    }
}
