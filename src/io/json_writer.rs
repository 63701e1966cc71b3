use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::clinical::egfr::EGFR_UNIT;
use crate::ctx::Ctx;
use crate::schema::v1::{CkdRiskV1, EgfrBlock, Explainability, FeatureValue, PredictionBlock};

pub fn build_report(ctx: &Ctx) -> Result<CkdRiskV1> {
    let assessment = ctx.assessment.as_ref().context("assessment missing")?;

    let egfr = EgfrBlock {
        value: assessment.egfr,
        unit: EGFR_UNIT.to_string(),
        stage: assessment.stage.number(),
        message: assessment.stage.message().to_string(),
        severity: assessment.stage.severity(),
    };

    let prediction = PredictionBlock {
        label: assessment.prediction.label,
        positive_probability: assessment.prediction.probability,
        risk_level: assessment.statement.level,
        display_probability: assessment.statement.probability,
        statement: assessment.statement.message(),
    };

    Ok(CkdRiskV1 {
        tool: "kira-ckdrisk".to_string(),
        version: ctx.tool_version.clone(),
        schema_version: "v1".to_string(),
        observation: ctx.observation.clone(),
        egfr,
        prediction,
        explainability: build_explainability(ctx)?,
        artifacts: ctx.artifacts.fingerprints.clone(),
        warnings: ctx.all_warnings(),
    })
}

pub fn build_explainability(ctx: &Ctx) -> Result<Explainability> {
    let row = ctx
        .ordered_row
        .as_ref()
        .context("ordered feature row missing")?;
    let scaled = ctx.scaled_row.as_ref().context("scaled row missing")?;
    let selected = ctx.selected_row.as_ref().context("selected row missing")?;
    if scaled.len() != row.len() {
        bail!("scaled row length mismatch: {} != {}", scaled.len(), row.len());
    }

    let indices = ctx.artifacts.selector.selected_indices();
    let features = row
        .names()
        .iter()
        .zip(row.values())
        .zip(scaled)
        .enumerate()
        .map(|(i, ((name, raw), scaled))| FeatureValue {
            name: name.clone(),
            raw: *raw,
            scaled: *scaled,
            selected: indices.contains(&i),
        })
        .collect();

    Ok(Explainability {
        feature_order: row.names().to_vec(),
        features,
        selected_feature_names: ctx.artifacts.selected_feature_names.clone(),
        selected_values: selected.clone(),
    })
}

pub fn write_json(path: &Path, ctx: &Ctx) -> Result<()> {
    let report = build_report(ctx)?;
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &report)?;
    Ok(())
}
