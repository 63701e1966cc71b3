use anyhow::{Context, Result};
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::Stage;

pub struct Stage5Classify;

impl Stage5Classify {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage5Classify {
    fn name(&self) -> &'static str {
        "stage5_classify"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let selected = ctx.selected_row.as_ref().context("selected row missing")?;
        let batch = vec![selected.clone()];
        let prediction = ctx
            .artifacts
            .classify(&batch)?
            .into_iter()
            .next()
            .context("classifier returned no prediction")?;
        info!(
            label = prediction.label,
            probability = prediction.probability,
            "prediction_ready"
        );
        ctx.prediction = Some(prediction);
        Ok(())
    }
}
