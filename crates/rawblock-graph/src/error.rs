//! Error types for rawblock-graph.
//!
//! [`IntegrityError`] is raised while the graph store is being built and is
//! fatal: there is one variant per validator category, and each variant
//! lists every offender for that category. [`ContentError`] wraps it together
//! with the decode and I/O failures of loading a content bundle.
//!
//! Runtime lookups never use these types. Absence is an `Option`.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::edge::Edge;
use crate::id::NodeId;
use crate::node::NodeType;

/// A difficulty value outside 1..=4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("difficulty must be between 1 and 4, got {0}")]
pub struct InvalidDifficulty(pub u8);

/// A registry entry pointing at a graph node: `owner -> node`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryReference {
    pub owner: NodeId,
    pub node: NodeId,
}

impl fmt::Display for RegistryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.owner, self.node)
    }
}

/// Why an attack model failed to line up with the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttackModelParityIssue {
    MissingNode { id: NodeId },
    WrongNodeType { id: NodeId, found: NodeType },
}

impl fmt::Display for AttackModelParityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttackModelParityIssue::MissingNode { id } => {
                write!(f, "missing graph node for attack model \"{id}\"")
            }
            AttackModelParityIssue::WrongNodeType { id, found } => write!(
                f,
                "attack model \"{id}\" must map to a node of type \"attack\" (found \"{found}\")"
            ),
        }
    }
}

/// Which end of an edge failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointRole {
    Source,
    Target,
}

/// An edge endpoint that names no graph node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingEndpoint {
    pub edge: Edge,
    pub role: EndpointRole,
}

impl fmt::Display for DanglingEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (role, id) = match self.role {
            EndpointRole::Source => ("source", &self.edge.from),
            EndpointRole::Target => ("target", &self.edge.to),
        };
        write!(f, "missing {role} \"{id}\" in {}", self.edge)
    }
}

/// Content integrity violations detected while building the graph store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    /// Node ids that appear more than once, each listed once.
    #[error("duplicate graph node ids: {}", join(.ids))]
    DuplicateNodeIds { ids: Vec<NodeId> },

    /// Security assumption ids with no graph node.
    #[error(
        "assumption/node parity violation: no graph node for assumption ids: {}",
        join(.missing)
    )]
    AssumptionNodeParity { missing: Vec<NodeId> },

    /// Attack models that are missing from the graph or not typed `attack`.
    #[error("attack model/node parity violation: {}", join(.issues))]
    AttackModelNodeParity { issues: Vec<AttackModelParityIssue> },

    /// `exploitsNodes`/`mitigatedBy` entries that name no graph node.
    #[error(
        "attack model reference violation: unknown node references: {}",
        join(.references)
    )]
    AttackModelReferences { references: Vec<RegistryReference> },

    /// Edge endpoints that name no graph node.
    #[error("edge endpoint violation: {}", join(.endpoints))]
    DanglingEdgeEndpoints { endpoints: Vec<DanglingEndpoint> },

    /// Vulnerability `relatedNodes` entries with no backing relation edge.
    #[error(
        "vulnerability/edge parity violation: no EXPLOITS, WEAKENS, STRENGTHENS or MITIGATED_BY edge for: {}",
        join(.missing)
    )]
    VulnerabilityEdgeParity { missing: Vec<RegistryReference> },

    /// Direct edges between `transaction` and `utxo`.
    #[error(
        "transaction/utxo relation violation: direct edges are not allowed ({}); model the relation through intermediate nodes such as output and input",
        join(.edges)
    )]
    DirectTransactionUtxoEdge { edges: Vec<Edge> },
}

/// Errors produced while loading a content bundle into a knowledge base.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The bundle JSON did not match the content schema.
    #[error("content decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The bundle file could not be read.
    #[error("failed to read content from '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The graph failed integrity validation.
    #[error(transparent)]
    Integrity(#[from] IntegrityError),

    /// Two learning paths share an id.
    #[error("duplicate learning path id: '{id}'")]
    DuplicatePathId { id: String },
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::EdgeKind;

    #[test]
    fn duplicate_ids_message_lists_every_id() {
        let err = IntegrityError::DuplicateNodeIds {
            ids: vec![NodeId::from("x"), NodeId::from("y")],
        };
        insta::assert_snapshot!(err.to_string(), @"duplicate graph node ids: x, y");
    }

    #[test]
    fn dangling_endpoint_message() {
        let err = IntegrityError::DanglingEdgeEndpoints {
            endpoints: vec![DanglingEndpoint {
                edge: Edge::new("a", "ghost", EdgeKind::DependsOn),
                role: EndpointRole::Target,
            }],
        };
        insta::assert_snapshot!(
            err.to_string(),
            @r#"edge endpoint violation: missing target "ghost" in a -[DEPENDS_ON]-> ghost"#
        );
    }

    #[test]
    fn attack_parity_message() {
        let err = IntegrityError::AttackModelNodeParity {
            issues: vec![
                AttackModelParityIssue::MissingNode {
                    id: NodeId::from("m1"),
                },
                AttackModelParityIssue::WrongNodeType {
                    id: NodeId::from("m2"),
                    found: NodeType::Mechanism,
                },
            ],
        };
        insta::assert_snapshot!(
            err.to_string(),
            @r#"attack model/node parity violation: missing graph node for attack model "m1", attack model "m2" must map to a node of type "attack" (found "mechanism")"#
        );
    }

    #[test]
    fn integrity_error_converts_into_content_error() {
        let err: ContentError = IntegrityError::DuplicateNodeIds {
            ids: vec![NodeId::from("x")],
        }
        .into();
        assert!(matches!(err, ContentError::Integrity(_)));
        assert_eq!(err.to_string(), "duplicate graph node ids: x");
    }
}
