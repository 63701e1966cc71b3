use anyhow::{Context, Result};
use tracing::info;

use crate::clinical::{Assessment, CkdStage, RiskStatement};
use crate::ctx::Ctx;
use crate::pipeline::Stage;

pub struct Stage6Interpret;

impl Stage6Interpret {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage6Interpret {
    fn name(&self) -> &'static str {
        "stage6_interpret"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let egfr = ctx.egfr.context("eGFR missing")?;
        let prediction = ctx.prediction.context("prediction missing")?;
        let stage = CkdStage::from_egfr(egfr);
        let statement = RiskStatement::from_prediction(&prediction);
        info!(
            ckd_stage = stage.number(),
            risk = ?statement.level,
            "interpretation_ready"
        );
        ctx.assessment = Some(Assessment {
            egfr,
            stage,
            prediction,
            statement,
        });
        Ok(())
    }
}
