//! Binary-logistic gradient-boosted tree ensemble.
//!
//! Trees are read in the nested JSON dump shape (`nodeid`, `split`,
//! `split_condition`, `yes`, `no`, `missing`, `children`, `leaf`) and
//! flattened into index-addressed arenas at load time, so evaluation never
//! looks anything up by id.

use std::collections::HashMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::artifacts::{Classifier, ensure_batch, sigmoid};
use crate::error::CkdError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNodeDump {
    Split {
        nodeid: u32,
        split: String,
        split_condition: f64,
        yes: u32,
        no: u32,
        missing: u32,
        children: Vec<TreeNodeDump>,
    },
    Leaf {
        nodeid: u32,
        leaf: f64,
    },
}

impl TreeNodeDump {
    fn nodeid(&self) -> u32 {
        match self {
            Self::Split { nodeid, .. } | Self::Leaf { nodeid, .. } => *nodeid,
        }
    }
}

fn default_base_score() -> f64 {
    0.5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsembleDump {
    pub n_features: usize,
    #[serde(default = "default_base_score")]
    pub base_score: f64,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub trees: Vec<TreeNodeDump>,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        yes: usize,
        no: usize,
        missing: usize,
    },
    Leaf(f64),
}

#[derive(Debug, Clone, PartialEq)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn leaf_value(&self, row: &[f64]) -> f64 {
        // Every branch points at a later child in the arena, so the walk
        // always reaches a leaf.
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf(v) => return *v,
                Node::Split {
                    feature,
                    threshold,
                    yes,
                    no,
                    missing,
                } => {
                    let x = row[*feature];
                    idx = if x.is_nan() {
                        *missing
                    } else if x < *threshold {
                        *yes
                    } else {
                        *no
                    };
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreeEnsemble {
    n_features: usize,
    base_margin: f64,
    trees: Vec<Tree>,
}

impl TreeEnsemble {
    pub fn from_dump(dump: TreeEnsembleDump) -> Result<Self, CkdError> {
        if dump.n_features == 0 {
            return Err(CkdError::startup("classifier", "n_features must be > 0"));
        }
        if !(dump.base_score > 0.0 && dump.base_score < 1.0) {
            return Err(CkdError::startup(
                "classifier",
                format!("base_score {} must lie in (0, 1)", dump.base_score),
            ));
        }
        if dump.trees.is_empty() {
            return Err(CkdError::startup("classifier", "ensemble has no trees"));
        }
        if let Some(names) = &dump.feature_names {
            if names.len() != dump.n_features {
                return Err(CkdError::startup(
                    "classifier",
                    format!(
                        "feature_names has {} entries but n_features is {}",
                        names.len(),
                        dump.n_features
                    ),
                ));
            }
        }

        let mut trees = Vec::with_capacity(dump.trees.len());
        for (t, root) in dump.trees.iter().enumerate() {
            let tree = flatten(root, dump.n_features, dump.feature_names.as_deref()).map_err(
                |reason| CkdError::startup("classifier", format!("tree {}: {}", t, reason)),
            )?;
            trees.push(tree);
        }

        let p = dump.base_score;
        Ok(Self {
            n_features: dump.n_features,
            base_margin: (p / (1.0 - p)).ln(),
            trees,
        })
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn margin(&self, row: &[f64]) -> f64 {
        self.base_margin + self.trees.iter().map(|t| t.leaf_value(row)).sum::<f64>()
    }
}

impl Classifier for TreeEnsemble {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, batch: &[Vec<f64>]) -> Result<Vec<u8>> {
        Ok(self
            .predict_proba(batch)?
            .into_iter()
            .map(|p| u8::from(p[1] > 0.5))
            .collect())
    }

    fn predict_proba(&self, batch: &[Vec<f64>]) -> Result<Vec<[f64; 2]>> {
        ensure_batch(batch, self.n_features, "classifier")?;
        Ok(batch
            .iter()
            .map(|row| {
                let p = sigmoid(self.margin(row));
                [1.0 - p, p]
            })
            .collect())
    }
}

fn flatten(
    root: &TreeNodeDump,
    n_features: usize,
    feature_names: Option<&[String]>,
) -> Result<Tree, String> {
    let mut by_id: HashMap<u32, &TreeNodeDump> = HashMap::new();
    let mut order: Vec<u32> = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        let id = node.nodeid();
        if by_id.insert(id, node).is_some() {
            return Err(format!("duplicate nodeid {}", id));
        }
        order.push(id);
        if let TreeNodeDump::Split { children, .. } = node {
            for child in children.iter().rev() {
                stack.push(child);
            }
        }
    }

    let index: HashMap<u32, usize> = order.iter().enumerate().map(|(i, id)| (*id, i)).collect();
    let lookup = |id: u32| -> Result<usize, String> {
        index
            .get(&id)
            .copied()
            .ok_or_else(|| format!("reference to unknown nodeid {}", id))
    };

    let mut nodes = Vec::with_capacity(order.len());
    for id in &order {
        let node = match by_id[id] {
            TreeNodeDump::Leaf { leaf, .. } => {
                if !leaf.is_finite() {
                    return Err(format!("leaf {} is not finite", id));
                }
                Node::Leaf(*leaf)
            }
            TreeNodeDump::Split {
                split,
                split_condition,
                yes,
                no,
                missing,
                children,
                ..
            } => {
                let child = |target: u32, branch: &str| -> Result<usize, String> {
                    if !children.iter().any(|c| c.nodeid() == target) {
                        return Err(format!(
                            "node {} {} branch targets {}, which is not one of its children",
                            id, branch, target
                        ));
                    }
                    lookup(target)
                };
                Node::Split {
                    feature: resolve_feature(split, n_features, feature_names)?,
                    threshold: *split_condition,
                    yes: child(*yes, "yes")?,
                    no: child(*no, "no")?,
                    missing: child(*missing, "missing")?,
                }
            }
        };
        nodes.push(node);
    }
    Ok(Tree { nodes })
}

fn resolve_feature(
    split: &str,
    n_features: usize,
    feature_names: Option<&[String]>,
) -> Result<usize, String> {
    if let Some(names) = feature_names {
        if let Some(pos) = names.iter().position(|n| n == split) {
            return Ok(pos);
        }
    }
    let idx = split
        .strip_prefix('f')
        .and_then(|rest| rest.parse::<usize>().ok())
        .ok_or_else(|| format!("cannot resolve split feature '{}'", split))?;
    if idx >= n_features {
        return Err(format!(
            "split feature f{} out of range for {} features",
            idx, n_features
        ));
    }
    Ok(idx)
}
