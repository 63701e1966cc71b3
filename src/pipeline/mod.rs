use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::artifacts::Artifacts;
use crate::clinical::{Assessment, ClinicalObservation};
use crate::ctx::Ctx;
use crate::error::{ErrorKind, classify};

pub mod stage1_validate;
pub mod stage2_egfr;
pub mod stage3_features;
pub mod stage4_preprocess;
pub mod stage5_classify;
pub mod stage6_interpret;
pub mod stage7_output;

use stage1_validate::Stage1Validate;
use stage2_egfr::Stage2Egfr;
use stage3_features::Stage3Features;
use stage4_preprocess::Stage4Preprocess;
use stage5_classify::Stage5Classify;
use stage6_interpret::Stage6Interpret;
use stage7_output::Stage7Output;

pub trait Stage {
    fn name(&self) -> &'static str;
    fn run(&self, ctx: &mut Ctx) -> Result<()>;
}

pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    /// Stages 1-6: observation in, assessment out, nothing written.
    pub fn scoring() -> Self {
        Self::new(vec![
            Box::new(Stage1Validate::new()),
            Box::new(Stage2Egfr::new()),
            Box::new(Stage3Features::new()),
            Box::new(Stage4Preprocess::new()),
            Box::new(Stage5Classify::new()),
            Box::new(Stage6Interpret::new()),
        ])
    }

    /// Scoring followed by report building and optional file output.
    pub fn full() -> Self {
        let mut pipeline = Self::scoring();
        pipeline.stages.push(Box::new(Stage7Output::new()));
        pipeline
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn run(&self, ctx: &mut Ctx) -> Result<()> {
        for stage in &self.stages {
            let start = Instant::now();
            info!(stage = stage.name(), "stage started");
            if let Err(err) = stage.run(ctx) {
                let elapsed_ms = start.elapsed().as_millis() as u64;
                match classify(&err) {
                    Some(ErrorKind::Validation) => warn!(
                        stage = stage.name(),
                        elapsed_ms,
                        kind = "validation",
                        error = %format!("{:#}", err),
                        "stage rejected input"
                    ),
                    Some(kind) => error!(
                        stage = stage.name(),
                        elapsed_ms,
                        kind = kind.as_str(),
                        error = %format!("{:#}", err),
                        "stage failed"
                    ),
                    None => error!(
                        stage = stage.name(),
                        elapsed_ms,
                        error = %format!("{:#}", err),
                        "stage failed"
                    ),
                }
                return Err(err);
            }
            let elapsed_ms = start.elapsed().as_millis();
            info!(
                stage = stage.name(),
                elapsed_ms = elapsed_ms as u64,
                "stage finished"
            );
        }
        Ok(())
    }
}

/// Runs the scoring stages for one observation against shared artifacts.
pub fn assess(artifacts: Arc<Artifacts>, observation: ClinicalObservation) -> Result<Assessment> {
    let mut ctx = Ctx::new(
        artifacts,
        observation,
        PathBuf::from("."),
        false,
        false,
        env!("CARGO_PKG_VERSION"),
    );
    Pipeline::scoring().run(&mut ctx)?;
    ctx.assessment.context("assessment missing after scoring")
}
