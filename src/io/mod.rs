use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;

pub mod json_writer;
pub mod observation;
pub mod summary;
pub mod tsv_writer;

fn is_gz(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("gz")
}

pub(crate) fn open_maybe_gz(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    if is_gz(path) {
        let decoder = GzDecoder::new(file);
        Ok(Box::new(decoder))
    } else {
        Ok(Box::new(file))
    }
}

/// Inflates `raw` when `path` names a gzip file, otherwise returns it as is.
pub(crate) fn decode_maybe_gz(path: &Path, raw: &[u8]) -> Result<Vec<u8>> {
    if !is_gz(path) {
        return Ok(raw.to_vec());
    }
    let mut out = Vec::new();
    GzDecoder::new(raw)
        .read_to_end(&mut out)
        .with_context(|| format!("failed to inflate {}", path.display()))?;
    Ok(out)
}
