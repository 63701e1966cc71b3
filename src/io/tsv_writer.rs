use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::ctx::Ctx;
use crate::io::json_writer::build_explainability;

/// One line per scaler column: raw value, scaled value, selector membership.
pub fn write_tsv(path: &Path, ctx: &Ctx) -> Result<()> {
    let explain = build_explainability(ctx)?;
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);

    writeln!(w, "feature\traw\tscaled\tselected")?;
    for f in &explain.features {
        writeln!(
            w,
            "{}\t{:.6}\t{:.6}\t{}",
            f.name,
            f.raw,
            f.scaled,
            if f.selected { "yes" } else { "no" }
        )?;
    }
    w.flush()?;
    Ok(())
}
