use kira_ckdrisk::artifacts::{Classifier, ClassifierArtifact, LogisticClassifier};
use kira_ckdrisk::error::{ErrorKind, classify};
use serde_json::json;

fn stump(split: &str, threshold: f64, yes: f64, no: f64, missing: u32) -> serde_json::Value {
    json!({
        "nodeid": 0, "depth": 0, "split": split, "split_condition": threshold,
        "yes": 1, "no": 2, "missing": missing,
        "children": [ { "nodeid": 1, "leaf": yes }, { "nodeid": 2, "leaf": no } ]
    })
}

fn load(value: serde_json::Value) -> Box<dyn Classifier> {
    serde_json::from_value::<ClassifierArtifact>(value)
        .unwrap()
        .into_classifier()
        .unwrap()
}

#[test]
fn logistic_probability_and_label() {
    let model = LogisticClassifier {
        coef: vec![2.0, -1.0],
        intercept: 0.5,
    };
    let batch = vec![vec![1.0, 1.0], vec![-1.0, 0.0]];
    let probas = model.predict_proba(&batch).unwrap();
    let p0 = 1.0 / (1.0 + (-1.5f64).exp());
    let p1 = 1.0 / (1.0 + (1.5f64).exp());
    assert!((probas[0][1] - p0).abs() < 1e-12);
    assert!((probas[0][0] + probas[0][1] - 1.0).abs() < 1e-12);
    assert!((probas[1][1] - p1).abs() < 1e-12);
    assert_eq!(model.predict(&batch).unwrap(), vec![1, 0]);
}

#[test]
fn logistic_label_threshold_is_strict() {
    let model = LogisticClassifier {
        coef: vec![1.0],
        intercept: 0.0,
    };
    // decision 0 gives p = 0.5, which stays class 0.
    assert_eq!(model.predict(&[vec![0.0]]).unwrap(), vec![0]);
}

#[test]
fn tree_ensemble_sums_leaves_over_base_margin() {
    let model = load(json!({
        "kind": "gradient_boosted_trees",
        "n_features": 2,
        "base_score": 0.5,
        "trees": [stump("f0", 1.0, 0.4, -0.4, 1), stump("f1", 0.0, -0.2, 0.3, 2)]
    }));
    assert_eq!(model.n_features(), 2);

    // f0 = 0.5 < 1 -> 0.4 ; f1 = 1 >= 0 -> 0.3
    let p = model.predict_proba(&[vec![0.5, 1.0]]).unwrap()[0][1];
    let expected = 1.0 / (1.0 + (-0.7f64).exp());
    assert!((p - expected).abs() < 1e-12);
    assert_eq!(model.predict(&[vec![0.5, 1.0]]).unwrap(), vec![1]);

    // f0 = 2 -> -0.4 ; f1 = -1 -> -0.2
    assert_eq!(model.predict(&[vec![2.0, -1.0]]).unwrap(), vec![0]);
}

#[test]
fn tree_ensemble_routes_nan_to_missing_branch() {
    let model = load(json!({
        "kind": "gradient_boosted_trees",
        "n_features": 1,
        "trees": [stump("f0", 1.0, 1.0, -1.0, 2)]
    }));
    let p = model.predict_proba(&[vec![f64::NAN]]).unwrap()[0][1];
    let expected = 1.0 / (1.0 + (1.0f64).exp());
    assert!((p - expected).abs() < 1e-12);
}

#[test]
fn tree_ensemble_resolves_named_splits_and_base_score() {
    let model = load(json!({
        "kind": "gradient_boosted_trees",
        "n_features": 2,
        "base_score": 0.8,
        "feature_names": ["hemoglobin", "eGFR"],
        "trees": [stump("eGFR", 60.0, 0.0, 0.0, 1)]
    }));
    let p = model.predict_proba(&[vec![12.0, 40.0]]).unwrap()[0][1];
    assert!((p - 0.8).abs() < 1e-12);
}

#[test]
fn malformed_trees_are_startup_errors() {
    let cases = [
        json!({ "kind": "gradient_boosted_trees", "n_features": 1,
                "trees": [stump("f3", 1.0, 0.1, 0.2, 1)] }),
        json!({ "kind": "gradient_boosted_trees", "n_features": 1,
                "trees": [stump("bmi", 1.0, 0.1, 0.2, 1)] }),
        json!({ "kind": "gradient_boosted_trees", "n_features": 1,
                "trees": [stump("f0", 1.0, 0.1, 0.2, 7)] }),
        json!({ "kind": "gradient_boosted_trees", "n_features": 1, "trees": [] }),
        json!({ "kind": "gradient_boosted_trees", "n_features": 1, "trees": [{
            "nodeid": 0, "split": "f0", "split_condition": 1.0,
            "yes": 0, "no": 1, "missing": 0,
            "children": [ { "nodeid": 1, "leaf": 0.2 } ]
        }] }),
        json!({ "kind": "gradient_boosted_trees", "n_features": 1, "trees": [{
            "nodeid": 0, "split": "f0", "split_condition": 1.0,
            "yes": 1, "no": 2, "missing": 1,
            "children": [
                { "nodeid": 1, "split": "f0", "split_condition": 0.0,
                  "yes": 3, "no": 0, "missing": 3,
                  "children": [ { "nodeid": 3, "leaf": 0.1 } ] },
                { "nodeid": 2, "leaf": -0.1 }
            ]
        }] }),
        json!({ "kind": "gradient_boosted_trees", "n_features": 1, "base_score": 1.0,
                "trees": [stump("f0", 1.0, 0.1, 0.2, 1)] }),
    ];
    for case in cases {
        let artifact: ClassifierArtifact = serde_json::from_value(case).unwrap();
        let err = artifact.into_classifier().err().expect("expected startup error");
        assert_eq!(err.kind(), ErrorKind::Startup);
    }
}

#[test]
fn branch_outside_children_names_the_node() {
    let artifact: ClassifierArtifact = serde_json::from_value(json!({
        "kind": "gradient_boosted_trees", "n_features": 1, "trees": [{
            "nodeid": 0, "split": "f0", "split_condition": 1.0,
            "yes": 0, "no": 1, "missing": 0,
            "children": [ { "nodeid": 1, "leaf": 0.2 } ]
        }]
    }))
    .unwrap();
    let msg = artifact.into_classifier().err().unwrap().to_string();
    assert!(msg.contains("tree 0"));
    assert!(msg.contains("node 0 yes branch targets 0"));
}

#[test]
fn logistic_artifact_round_trips_through_kind_tag() {
    let model = load(json!({ "kind": "logistic", "coef": [1.0, 2.0, 3.0], "intercept": -1.0 }));
    assert_eq!(model.n_features(), 3);
    let err = model.predict_proba(&[vec![1.0]]).unwrap_err();
    assert_eq!(classify(&err), Some(ErrorKind::Configuration));
}
