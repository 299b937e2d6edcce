//! Cross-registry integrity checks for the knowledge graph.
//!
//! Each `verify_*` function is pure and checks one rule. A failing check
//! returns an [`IntegrityError`] listing every offender for that rule.
//! [`verify_graph_integrity`] runs the checks in a fixed order and stops at
//! the first failing category.
//!
//! Edges passed in here must already be canonical; see
//! [`crate::edge::canonicalize_edges`].

use std::collections::{HashMap, HashSet};

use indexmap::IndexSet;

use crate::edge::Edge;
use crate::error::{
    AttackModelParityIssue, DanglingEndpoint, EndpointRole, IntegrityError, RegistryReference,
};
use crate::id::NodeId;
use crate::node::GraphNode;
use crate::query::SecurityRegistry;
use crate::registry::{AttackModel, SecurityAssumption, Vulnerability};

const TRANSACTION_NODE: &str = "transaction";
const UTXO_NODE: &str = "utxo";

/// Runs every integrity check, short-circuiting on the first failure.
///
/// Order: unique ids, assumption parity, attack model parity, attack model
/// references, edge endpoints, vulnerability edge parity, and finally the
/// forbidden direct transaction/utxo edge.
pub fn verify_graph_integrity(
    nodes: &[GraphNode],
    edges: &[Edge],
    registry: &SecurityRegistry,
) -> Result<(), IntegrityError> {
    verify_unique_node_ids(nodes)?;
    verify_assumption_node_parity(nodes, registry.assumptions())?;
    verify_attack_model_node_parity(nodes, registry.attack_models())?;
    verify_attack_model_references(nodes, registry.attack_models())?;
    verify_edge_endpoints(nodes, edges)?;
    verify_vulnerability_edge_parity(edges, registry.vulnerabilities())?;
    verify_no_direct_transaction_utxo_edges(edges)?;
    Ok(())
}

fn node_ids(nodes: &[GraphNode]) -> HashSet<&str> {
    nodes.iter().map(|n| n.id.as_str()).collect()
}

/// Every node id must be unique. Each repeated id is reported once.
pub fn verify_unique_node_ids(nodes: &[GraphNode]) -> Result<(), IntegrityError> {
    let mut seen = HashSet::with_capacity(nodes.len());
    let mut duplicates = IndexSet::new();
    for node in nodes {
        if !seen.insert(node.id.as_str()) {
            duplicates.insert(node.id.clone());
        }
    }

    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(IntegrityError::DuplicateNodeIds {
            ids: duplicates.into_iter().collect(),
        })
    }
}

/// Every security assumption id must also be a graph node.
pub fn verify_assumption_node_parity(
    nodes: &[GraphNode],
    assumptions: &[SecurityAssumption],
) -> Result<(), IntegrityError> {
    let ids = node_ids(nodes);
    let missing: Vec<NodeId> = assumptions
        .iter()
        .filter(|a| !ids.contains(a.id.as_str()))
        .map(|a| a.id.clone())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(IntegrityError::AssumptionNodeParity { missing })
    }
}

/// Every attack model id must be a graph node of type `attack`.
pub fn verify_attack_model_node_parity(
    nodes: &[GraphNode],
    models: &[AttackModel],
) -> Result<(), IntegrityError> {
    let by_id: HashMap<&str, &GraphNode> = nodes.iter().map(|n| (n.id.as_str(), n)).collect();
    let mut issues = Vec::new();

    for model in models {
        match by_id.get(model.id.as_str()) {
            None => issues.push(AttackModelParityIssue::MissingNode {
                id: model.id.clone(),
            }),
            Some(node) if !node.is_attack() => {
                let found = node.node_type;
                issues.push(AttackModelParityIssue::WrongNodeType {
                    id: model.id.clone(),
                    found,
                });
            }
            Some(_) => {}
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(IntegrityError::AttackModelNodeParity { issues })
    }
}

/// Every `exploitsNodes` and `mitigatedBy` entry must name a graph node.
pub fn verify_attack_model_references(
    nodes: &[GraphNode],
    models: &[AttackModel],
) -> Result<(), IntegrityError> {
    let ids = node_ids(nodes);
    let references: Vec<RegistryReference> = models
        .iter()
        .flat_map(|model| {
            model
                .exploits_nodes
                .iter()
                .chain(model.mitigated_by.iter())
                .map(move |node| (model, node))
        })
        .filter(|(_, node)| !ids.contains(node.as_str()))
        .map(|(model, node)| RegistryReference {
            owner: model.id.clone(),
            node: node.clone(),
        })
        .collect();

    if references.is_empty() {
        Ok(())
    } else {
        Err(IntegrityError::AttackModelReferences { references })
    }
}

/// Both endpoints of every edge must name a graph node.
pub fn verify_edge_endpoints(nodes: &[GraphNode], edges: &[Edge]) -> Result<(), IntegrityError> {
    let ids = node_ids(nodes);
    let mut endpoints = Vec::new();

    for edge in edges {
        if !ids.contains(edge.from.as_str()) {
            endpoints.push(DanglingEndpoint {
                edge: edge.clone(),
                role: EndpointRole::Source,
            });
        }
        if !ids.contains(edge.to.as_str()) {
            endpoints.push(DanglingEndpoint {
                edge: edge.clone(),
                role: EndpointRole::Target,
            });
        }
    }

    if endpoints.is_empty() {
        Ok(())
    } else {
        Err(IntegrityError::DanglingEdgeEndpoints { endpoints })
    }
}

/// Every `(vulnerability, relatedNode)` pair needs an explicit edge out of
/// the vulnerability whose kind is EXPLOITS, WEAKENS, STRENGTHENS or
/// MITIGATED_BY.
pub fn verify_vulnerability_edge_parity(
    edges: &[Edge],
    vulnerabilities: &[Vulnerability],
) -> Result<(), IntegrityError> {
    let relations: HashSet<(&str, &str)> = edges
        .iter()
        .filter(|e| e.kind.is_vulnerability_relation())
        .map(|e| (e.from.as_str(), e.to.as_str()))
        .collect();

    let mut missing = Vec::new();
    for vulnerability in vulnerabilities {
        for related in &vulnerability.related_nodes {
            if !relations.contains(&(vulnerability.id.as_str(), related.as_str())) {
                missing.push(RegistryReference {
                    owner: vulnerability.id.clone(),
                    node: related.clone(),
                });
            }
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(IntegrityError::VulnerabilityEdgeParity { missing })
    }
}

/// No edge of any kind may connect `transaction` and `utxo` directly.
pub fn verify_no_direct_transaction_utxo_edges(edges: &[Edge]) -> Result<(), IntegrityError> {
    let forbidden: Vec<Edge> = edges
        .iter()
        .filter(|e| {
            (e.from == TRANSACTION_NODE && e.to == UTXO_NODE)
                || (e.from == UTXO_NODE && e.to == TRANSACTION_NODE)
        })
        .cloned()
        .collect();

    if forbidden.is_empty() {
        Ok(())
    } else {
        Err(IntegrityError::DirectTransactionUtxoEdge { edges: forbidden })
    }
}
