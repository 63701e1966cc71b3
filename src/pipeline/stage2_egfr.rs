use anyhow::Result;
use tracing::info;

use crate::clinical::calculate_egfr;
use crate::ctx::Ctx;
use crate::pipeline::Stage;

pub struct Stage2Egfr;

impl Stage2Egfr {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage2Egfr {
    fn name(&self) -> &'static str {
        "stage2_egfr"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let obs = &ctx.observation;
        let egfr = calculate_egfr(obs.serum_creatinine, obs.age, obs.sex)?;
        ctx.egfr = Some(egfr);
        info!(egfr, "egfr_ready");
        Ok(())
    }
}
