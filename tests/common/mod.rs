#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use kira_ckdrisk::artifacts::{Artifacts, LogisticClassifier, StandardScaler, SupportSelector};
use kira_ckdrisk::clinical::CANONICAL_FEATURES;
use serde_json::json;

pub fn canonical_names() -> Vec<String> {
    CANONICAL_FEATURES.iter().map(|s| s.to_string()).collect()
}

/// Identity scaler (mean 0, scale 1) over the canonical names in reverse
/// order, so any reliance on assembly order shows up.
pub fn identity_scaler() -> StandardScaler {
    let mut names = canonical_names();
    names.reverse();
    let n = names.len();
    StandardScaler {
        feature_names_in: names,
        mean: vec![0.0; n],
        scale: vec![1.0; n],
        with_mean: true,
        with_std: true,
    }
}

/// Keeps the columns named in `keep` from the scaler's order.
pub fn selector_for(scaler: &StandardScaler, keep: &[&str]) -> SupportSelector {
    let support = scaler
        .feature_names_in
        .iter()
        .map(|n| keep.contains(&n.as_str()))
        .collect();
    SupportSelector::from_support(support).unwrap()
}

/// Logistic model on [eGFR, serum_creatinine] (selector order follows the
/// reversed canonical order, so eGFR comes first).
pub fn egfr_creatinine_artifacts(coef: Vec<f64>, intercept: f64) -> Arc<Artifacts> {
    let scaler = identity_scaler();
    let selector = selector_for(&scaler, &["eGFR", "serum_creatinine"]);
    let classifier = LogisticClassifier { coef, intercept };
    Arc::new(
        Artifacts::new(
            Box::new(scaler),
            Box::new(selector),
            Box::new(classifier),
            vec!["eGFR".to_string(), "serum_creatinine".to_string()],
        )
        .unwrap(),
    )
}

/// Writes a consistent artifact set: identity-like scaler in canonical
/// order, selector keeping eGFR/serum_creatinine/hemoglobin, and a small
/// boosted-tree classifier that flags low eGFR or high creatinine.
pub fn write_artifact_dir(dir: &Path) {
    let names = canonical_names();
    let n = names.len();
    let mut mean = vec![0.0; n];
    let mut scale = vec![1.0; n];
    let egfr_idx = names.iter().position(|n| n == "eGFR").unwrap();
    mean[egfr_idx] = 60.0;
    scale[egfr_idx] = 30.0;

    let support: Vec<bool> = names
        .iter()
        .map(|n| n == "serum_creatinine" || n == "hemoglobin" || n == "eGFR")
        .collect();

    let scaler = json!({
        "feature_names_in": names,
        "mean": mean,
        "scale": scale,
    });
    let selector = json!({ "support": support });
    // Selected order: serum_creatinine (f0), hemoglobin (f1), eGFR (f2).
    let classifier = json!({
        "kind": "gradient_boosted_trees",
        "n_features": 3,
        "base_score": 0.5,
        "feature_names": ["serum_creatinine", "hemoglobin", "eGFR"],
        "trees": [
            {
                "nodeid": 0, "depth": 0, "split": "eGFR", "split_condition": 0.0,
                "yes": 1, "no": 2, "missing": 1,
                "children": [
                    { "nodeid": 1, "leaf": 1.5 },
                    { "nodeid": 2, "leaf": -1.5 }
                ]
            },
            {
                "nodeid": 0, "depth": 0, "split": "f0", "split_condition": 2.0,
                "yes": 1, "no": 2, "missing": 2,
                "children": [
                    { "nodeid": 1, "leaf": -0.5 },
                    { "nodeid": 2, "leaf": 0.5 }
                ]
            }
        ]
    });
    let selected = json!(["serum_creatinine", "hemoglobin", "eGFR"]);

    fs::write(dir.join("scaler.json"), scaler.to_string()).unwrap();
    fs::write(dir.join("selector.json"), selector.to_string()).unwrap();
    fs::write(dir.join("classifier.json"), classifier.to_string()).unwrap();
    fs::write(dir.join("selected_features.json"), selected.to_string()).unwrap();
}
