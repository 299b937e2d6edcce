//! Learning paths: ordered walks through graph nodes.
//!
//! Provides path progress arithmetic ([`path_progress`]), prerequisite
//! gating derived from `DEPENDS_ON` edges ([`node_prerequisites`],
//! [`missing_prerequisites`]), and the [`PathCatalog`] that owns the authored
//! paths.
//!
//! All functions are pure: they read the store but never modify it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::edge::EdgeKind;
use crate::error::ContentError;
use crate::id::NodeId;
use crate::store::GraphStore;

/// An authored sequence of nodes. Order is meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningPath {
    pub id: String,
    pub title: String,
    pub ordered_nodes: Vec<NodeId>,
}

/// A learner's position within a path.
///
/// The current step is the boundary: it is not yet counted as completed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathProgress {
    pub total: usize,
    pub completed: usize,
    /// `completed / total`, as a rounded percentage.
    pub percent: u32,
    pub current_index: usize,
    pub current_node_id: Option<NodeId>,
    pub next_node_id: Option<NodeId>,
}

/// Result of checking that every node on a path exists in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathValidation {
    pub valid: bool,
    pub missing_node_ids: Vec<NodeId>,
}

/// Computes progress for a learner at `step` on `path`.
///
/// `step` is clamped into the path. An empty path yields the all-zero
/// progress with no current or next node.
pub fn path_progress(path: &LearningPath, step: i64) -> PathProgress {
    let total = path.ordered_nodes.len();
    if total == 0 {
        return PathProgress::default();
    }

    let last = total - 1;
    let current_index = usize::try_from(step.max(0)).map_or(last, |s| s.min(last));
    let completed = current_index;
    let percent = ((completed as f64 / total as f64) * 100.0).round() as u32;

    PathProgress {
        total,
        completed,
        percent,
        current_index,
        current_node_id: path.ordered_nodes.get(current_index).cloned(),
        next_node_id: path.ordered_nodes.get(current_index + 1).cloned(),
    }
}

/// Sources of every `DEPENDS_ON` edge into `node_id`, in edge order.
pub fn node_prerequisites(store: &GraphStore, node_id: &str) -> Vec<NodeId> {
    store
        .get_incoming_edges(node_id)
        .into_iter()
        .filter(|e| e.kind == EdgeKind::DependsOn)
        .map(|e| e.from)
        .collect()
}

/// Prerequisites of `node_id` that are not in `completed`, in prerequisite
/// order. Empty means the node is unblocked.
pub fn missing_prerequisites<I, S>(store: &GraphStore, node_id: &str, completed: I) -> Vec<NodeId>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let completed: HashSet<String> = completed
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect();
    node_prerequisites(store, node_id)
        .into_iter()
        .filter(|p| !completed.contains(p.as_str()))
        .collect()
}

/// Checks that every node on `path` exists, collecting all that do not.
pub fn validate_path(store: &GraphStore, path: &LearningPath) -> PathValidation {
    let missing_node_ids: Vec<NodeId> = path
        .ordered_nodes
        .iter()
        .filter(|id| !store.has_node(id.as_str()))
        .cloned()
        .collect();
    PathValidation {
        valid: missing_node_ids.is_empty(),
        missing_node_ids,
    }
}

/// The authored learning paths, with one designated canonical path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathCatalog {
    paths: Vec<LearningPath>,
    canonical: Option<usize>,
}

impl PathCatalog {
    /// Builds a catalog. Path ids must be unique.
    ///
    /// `canonical_id` selects the canonical path; when unset or unknown, the
    /// first path is canonical.
    pub fn new(paths: Vec<LearningPath>, canonical_id: Option<&str>) -> Result<Self, ContentError> {
        let mut seen = HashSet::with_capacity(paths.len());
        for path in &paths {
            if !seen.insert(path.id.as_str()) {
                return Err(ContentError::DuplicatePathId {
                    id: path.id.clone(),
                });
            }
        }

        let canonical = canonical_id
            .and_then(|id| paths.iter().position(|p| p.id == id))
            .or(if paths.is_empty() { None } else { Some(0) });

        Ok(PathCatalog { paths, canonical })
    }

    pub fn all(&self) -> &[LearningPath] {
        &self.paths
    }

    pub fn get(&self, id: &str) -> Option<&LearningPath> {
        self.paths.iter().find(|p| p.id == id)
    }

    pub fn canonical(&self) -> Option<&LearningPath> {
        self.canonical.and_then(|i| self.paths.get(i))
    }
}
