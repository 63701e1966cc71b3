use anyhow::{Context, Result};
use tracing::info;

use crate::clinical::DerivedFeatureVector;
use crate::ctx::Ctx;
use crate::pipeline::Stage;

pub struct Stage3Features;

impl Stage3Features {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage3Features {
    fn name(&self) -> &'static str {
        "stage3_features"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let egfr = ctx.egfr.context("eGFR missing")?;
        let features = DerivedFeatureVector::assemble(&ctx.observation, egfr);
        let row = features.reorder(ctx.artifacts.feature_order())?;
        info!(n_features = row.len(), "feature_row_ready");
        ctx.features = Some(features);
        ctx.ordered_row = Some(row);
        Ok(())
    }
}
