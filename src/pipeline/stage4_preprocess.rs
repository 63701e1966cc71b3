use anyhow::{Context, Result};
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::Stage;

pub struct Stage4Preprocess;

impl Stage4Preprocess {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage4Preprocess {
    fn name(&self) -> &'static str {
        "stage4_preprocess"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let row = ctx.ordered_row.as_ref().context("ordered feature row missing")?;
        let out = ctx.artifacts.preprocess(&row.to_batch())?;
        let scaled = out.scaled.into_iter().next().context("scaler returned no rows")?;
        let selected = out
            .selected
            .into_iter()
            .next()
            .context("selector returned no rows")?;
        info!(
            scaled_width = scaled.len(),
            selected_width = selected.len(),
            "preprocess_ready"
        );
        ctx.scaled_row = Some(scaled);
        ctx.selected_row = Some(selected);
        Ok(())
    }
}
