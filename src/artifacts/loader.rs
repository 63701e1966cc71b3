use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Result;
use crc::{CRC_64_ECMA_182, Crc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::artifacts::{Artifacts, ClassifierArtifact, StandardScaler, SupportSelector};
use crate::clinical::CANONICAL_FEATURES;
use crate::error::CkdError;
use crate::io::decode_maybe_gz;

pub const SCALER_FILE: &str = "scaler.json";
pub const SELECTOR_FILE: &str = "selector.json";
pub const CLASSIFIER_FILE: &str = "classifier.json";
pub const SELECTED_FEATURES_FILE: &str = "selected_features.json";

const CRC64: Crc<u64> = Crc::<u64>::new(&CRC_64_ECMA_182);

#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub scaler: PathBuf,
    pub selector: PathBuf,
    pub classifier: PathBuf,
    pub selected_features: PathBuf,
}

impl ArtifactPaths {
    /// Each artifact may be stored plain or as `<name>.gz`; plain wins.
    pub fn in_dir(dir: &Path) -> Result<Self, CkdError> {
        if !dir.is_dir() {
            return Err(CkdError::startup(
                dir.display().to_string(),
                "artifact directory does not exist",
            ));
        }
        Ok(Self {
            scaler: resolve(dir, SCALER_FILE)?,
            selector: resolve(dir, SELECTOR_FILE)?,
            classifier: resolve(dir, CLASSIFIER_FILE)?,
            selected_features: resolve(dir, SELECTED_FEATURES_FILE)?,
        })
    }
}

fn resolve(dir: &Path, name: &str) -> Result<PathBuf, CkdError> {
    let plain = dir.join(name);
    if plain.is_file() {
        return Ok(plain);
    }
    let gz = dir.join(format!("{}.gz", name));
    if gz.is_file() {
        return Ok(gz);
    }
    Err(CkdError::startup(
        name,
        format!("neither {} nor {} found", plain.display(), gz.display()),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactFingerprint {
    pub name: String,
    pub path: String,
    pub bytes: u64,
    pub crc64: String,
}

struct Loaded<T> {
    value: T,
    fingerprint: ArtifactFingerprint,
}

fn load_json<T: DeserializeOwned>(name: &str, path: &Path) -> Result<Loaded<T>, CkdError> {
    let raw = std::fs::read(path).map_err(|e| {
        CkdError::startup(name, format!("failed to read {}: {}", path.display(), e))
    })?;
    let fingerprint = ArtifactFingerprint {
        name: name.to_string(),
        path: path.display().to_string(),
        bytes: raw.len() as u64,
        crc64: format!("{:016x}", CRC64.checksum(&raw)),
    };
    let decoded = decode_maybe_gz(path, &raw)
        .map_err(|e| CkdError::startup(name, format!("failed to decompress: {:#}", e)))?;
    let value = serde_json::from_slice(&decoded)
        .map_err(|e| CkdError::startup(name, format!("malformed JSON: {}", e)))?;
    Ok(Loaded { value, fingerprint })
}

/// Loads and cross-checks the artifact set. Every failure is a startup error.
pub fn load_artifacts(dir: &Path) -> Result<Artifacts> {
    let paths = ArtifactPaths::in_dir(dir)?;

    let scaler: Loaded<StandardScaler> = load_json("scaler", &paths.scaler)?;
    scaler.value.check()?;
    check_feature_contract(&scaler.value.feature_names_in)?;

    let selector: Loaded<SupportSelector> = load_json("selector", &paths.selector)?;
    let classifier: Loaded<ClassifierArtifact> = load_json("classifier", &paths.classifier)?;
    let classifier_kind = classifier.value.kind();
    let selected: Loaded<Vec<String>> =
        load_json("selected_features", &paths.selected_features)?;

    let fingerprints = vec![
        scaler.fingerprint,
        selector.fingerprint,
        classifier.fingerprint,
        selected.fingerprint,
    ];

    let mut artifacts = Artifacts::new(
        Box::new(scaler.value),
        Box::new(selector.value),
        classifier.value.into_classifier()?,
        selected.value,
    )?;
    artifacts.fingerprints = fingerprints;

    for fp in &artifacts.fingerprints {
        info!(
            artifact = %fp.name,
            path = %fp.path,
            bytes = fp.bytes,
            crc64 = %fp.crc64,
            "artifact_loaded"
        );
    }
    info!(
        n_features = artifacts.scaler.n_features(),
        n_selected = artifacts.selector.n_features_out(),
        classifier = classifier_kind,
        "artifacts_ready"
    );
    Ok(artifacts)
}

/// The scaler's column order must be a permutation of the assembler's names.
pub fn check_feature_contract(feature_names_in: &[String]) -> Result<(), CkdError> {
    let expected: BTreeSet<&str> = CANONICAL_FEATURES.iter().copied().collect();
    let got: BTreeSet<&str> = feature_names_in.iter().map(String::as_str).collect();
    if got.len() != feature_names_in.len() {
        return Err(CkdError::startup(
            "scaler",
            "feature_names_in contains duplicate names",
        ));
    }
    let unknown: Vec<&str> = got.difference(&expected).copied().collect();
    let absent: Vec<&str> = expected.difference(&got).copied().collect();
    if !unknown.is_empty() || !absent.is_empty() {
        return Err(CkdError::startup(
            "scaler",
            format!(
                "feature_names_in does not match assembled features (unknown: [{}], absent: [{}])",
                unknown.join(", "),
                absent.join(", ")
            ),
        ));
    }
    Ok(())
}
