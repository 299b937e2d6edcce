//! Bitcoin knowledge graph: validated content store, learning-path engine,
//! and security registry queries.
//!
//! # Modules
//!
//! - [`id`], [`node`], [`edge`], [`registry`]: content record types
//! - [`store`]: [`GraphStore`], the validated, read-only graph index
//! - [`validate`]: cross-registry integrity checks run at store construction
//! - [`paths`]: path progress and `DEPENDS_ON` prerequisite gating
//! - [`query`]: [`SecurityRegistry`] lookups and filters
//! - [`attack`]: attack models resolved against the graph
//! - [`knowledge`]: [`KnowledgeBase`], the single constructed entry point

pub mod attack;
pub mod edge;
pub mod error;
pub mod id;
pub mod knowledge;
pub mod node;
pub mod paths;
pub mod query;
pub mod registry;
pub mod store;
pub mod validate;

// Re-export commonly used types
pub use attack::AttackTraversal;
pub use edge::{Edge, EdgeKind};
pub use error::{ContentError, IntegrityError};
pub use id::NodeId;
pub use knowledge::{ContentBundle, KnowledgeBase};
pub use node::{Difficulty, GraphNode, NodeType};
pub use paths::{LearningPath, PathCatalog, PathProgress, PathValidation};
pub use query::{SecurityRegistry, VulnerabilityFilter};
pub use registry::{
    AssumptionCategory, AttackModel, EnforcedBy, ExploitationType, RuleLayer, SecurityAssumption,
    Severity, TargetLayer, ValidationRule, Vulnerability,
};
pub use store::GraphStore;
