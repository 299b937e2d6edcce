//! Attack traversal: an attack model resolved against the graph.

use serde::Serialize;

use crate::edge::{Edge, EdgeKind};
use crate::node::GraphNode;
use crate::query::SecurityRegistry;
use crate::registry::AttackModel;
use crate::store::GraphStore;

/// An attack model with its exploited and mitigating nodes resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackTraversal<'a> {
    pub model: &'a AttackModel,
    pub exploited_nodes: Vec<&'a GraphNode>,
    pub mitigated_by_nodes: Vec<&'a GraphNode>,
    /// `EXPLOITS` edges from the model to each exploited node, then
    /// `MITIGATED_BY` edges to each mitigator, in registry order.
    pub traversal_edges: Vec<Edge>,
}

/// Resolves `attack_model_id` against the store. `None` for unknown models.
///
/// Node references that do not resolve are skipped; on a validated store
/// they always resolve.
pub fn attack_traversal<'a>(
    store: &'a GraphStore,
    registry: &'a SecurityRegistry,
    attack_model_id: &str,
) -> Option<AttackTraversal<'a>> {
    let model = registry.attack_model(attack_model_id)?;

    let exploited_nodes = model
        .exploits_nodes
        .iter()
        .filter_map(|id| store.get_node(id.as_str()))
        .collect();
    let mitigated_by_nodes = model
        .mitigated_by
        .iter()
        .filter_map(|id| store.get_node(id.as_str()))
        .collect();

    let traversal_edges = model
        .exploits_nodes
        .iter()
        .map(|id| Edge::new(model.id.clone(), id.clone(), EdgeKind::Exploits))
        .chain(
            model
                .mitigated_by
                .iter()
                .map(|id| Edge::new(model.id.clone(), id.clone(), EdgeKind::MitigatedBy)),
        )
        .collect();

    Some(AttackTraversal {
        model,
        exploited_nodes,
        mitigated_by_nodes,
        traversal_edges,
    })
}
