use anyhow::{Context, Result};

use crate::clinical::egfr::EGFR_UNIT;
use crate::ctx::Ctx;

pub fn format_summary(ctx: &Ctx) -> Result<String> {
    let assessment = ctx.assessment.as_ref().context("assessment missing")?;

    let mut out = String::new();
    out.push_str(&format!("kira-ckdrisk v{}\n", ctx.tool_version));
    out.push_str(&format!("eGFR: {:.2} {}\n", assessment.egfr, EGFR_UNIT));
    out.push_str(&format!("Stage: {}\n", assessment.stage.describe()));
    out.push_str(&format!("Risk: {}\n", assessment.statement.message()));

    let names = &ctx.artifacts.selected_feature_names;
    if names.is_empty() {
        out.push_str("Selected features: none listed\n");
    } else {
        out.push_str(&format!("Selected features: {}\n", names.join(", ")));
    }

    Ok(out)
}
