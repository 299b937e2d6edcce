//! KnowledgeBase: the explicitly constructed entry point over all content.
//!
//! A [`ContentBundle`] is the whole authored content set as supplied by the
//! content loader. [`KnowledgeBase::from_bundle`] turns it into a validated
//! graph store, the security registries, and the path catalog. Construction
//! either succeeds completely or returns a [`ContentError`]; callers build it
//! once at startup and pass it by reference.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::attack::{attack_traversal, AttackTraversal};
use crate::edge::Edge;
use crate::error::ContentError;
use crate::id::NodeId;
use crate::node::GraphNode;
use crate::paths::{self, LearningPath, PathCatalog, PathProgress, PathValidation};
use crate::query::SecurityRegistry;
use crate::registry::{AttackModel, SecurityAssumption, ValidationRule, Vulnerability};
use crate::store::GraphStore;

/// Authored content, exactly as the content loader supplies it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBundle {
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub assumptions: Vec<SecurityAssumption>,
    #[serde(default)]
    pub attack_models: Vec<AttackModel>,
    #[serde(default)]
    pub vulnerabilities: Vec<Vulnerability>,
    #[serde(default)]
    pub validation_rules: Vec<ValidationRule>,
    #[serde(default)]
    pub paths: Vec<LearningPath>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_path_id: Option<String>,
}

/// Validated content: graph store, security registries and learning paths.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    store: GraphStore,
    registry: SecurityRegistry,
    paths: PathCatalog,
}

impl KnowledgeBase {
    /// Validates and indexes a content bundle.
    pub fn from_bundle(bundle: ContentBundle) -> Result<Self, ContentError> {
        let ContentBundle {
            nodes,
            edges,
            assumptions,
            attack_models,
            vulnerabilities,
            validation_rules,
            paths,
            canonical_path_id,
        } = bundle;

        let registry = SecurityRegistry::new(
            assumptions,
            attack_models,
            vulnerabilities,
            validation_rules,
        );
        let store = GraphStore::new(nodes, edges, &registry)?;
        let paths = PathCatalog::new(paths, canonical_path_id.as_deref())?;

        let kb = KnowledgeBase {
            store,
            registry,
            paths,
        };
        for path in kb.paths.all() {
            let validation = kb.validate_path(path);
            if !validation.valid {
                tracing::warn!(
                    path = %path.id,
                    missing = ?validation.missing_node_ids,
                    "learning path references unknown nodes"
                );
            }
        }
        Ok(kb)
    }

    /// Decodes a JSON content bundle, then validates it.
    pub fn from_json_str(json: &str) -> Result<Self, ContentError> {
        let bundle: ContentBundle = serde_json::from_str(json)?;
        Self::from_bundle(bundle)
    }

    /// Reads a JSON content bundle from disk, then validates it.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ContentError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    // -----------------------------------------------------------------------
    // Read-only accessors
    // -----------------------------------------------------------------------

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn registry(&self) -> &SecurityRegistry {
        &self.registry
    }

    pub fn paths(&self) -> &PathCatalog {
        &self.paths
    }

    // -----------------------------------------------------------------------
    // Path queries
    // -----------------------------------------------------------------------

    pub fn all_paths(&self) -> &[LearningPath] {
        self.paths.all()
    }

    pub fn path_by_id(&self, id: &str) -> Option<&LearningPath> {
        self.paths.get(id)
    }

    pub fn canonical_path(&self) -> Option<&LearningPath> {
        self.paths.canonical()
    }

    pub fn path_progress(&self, path: &LearningPath, step: i64) -> PathProgress {
        paths::path_progress(path, step)
    }

    pub fn node_prerequisites(&self, node_id: &str) -> Vec<NodeId> {
        paths::node_prerequisites(&self.store, node_id)
    }

    pub fn missing_prerequisites<I, S>(&self, node_id: &str, completed: I) -> Vec<NodeId>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        paths::missing_prerequisites(&self.store, node_id, completed)
    }

    pub fn validate_path(&self, path: &LearningPath) -> PathValidation {
        paths::validate_path(&self.store, path)
    }

    pub fn attack_traversal(&self, attack_model_id: &str) -> Option<AttackTraversal<'_>> {
        attack_traversal(&self.store, &self.registry, attack_model_id)
    }
}
