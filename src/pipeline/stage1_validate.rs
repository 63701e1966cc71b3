use anyhow::Result;
use tracing::{info, warn};

use crate::ctx::Ctx;
use crate::pipeline::Stage;

pub struct Stage1Validate;

impl Stage1Validate {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage1Validate {
    fn name(&self) -> &'static str {
        "stage1_validate"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        ctx.observation.validate()?;
        for warning in &ctx.warnings {
            warn!(%warning, "observation_warning");
        }
        info!(
            sex = %ctx.observation.sex,
            age = ctx.observation.age,
            "observation_valid"
        );
        Ok(())
    }
}
