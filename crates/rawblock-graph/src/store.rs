//! GraphStore: the validated, read-only knowledge graph.
//!
//! [`GraphStore::new`] canonicalizes and deduplicates the authored edges,
//! runs the integrity validator, and only then indexes nodes and edges into a
//! petgraph `DiGraph`. A store that exists has passed every check; there is
//! no partially-built state.
//!
//! # Indexing
//!
//! Nodes are stored in the `DiGraph` in authoring order, with a side map from
//! [`NodeId`] to `NodeIndex`. Adjacency comes from the graph itself: every
//! node index owns an (initially empty) outgoing and incoming edge list, so
//! adjacency queries for a known node never need an existence check. Edge
//! indices are assigned in insertion order, which is what the adjacency
//! queries sort by.
//!
//! The store has no mutating methods after construction and is `Send + Sync`,
//! so one instance can be shared by reference across request handlers.

use std::collections::HashMap;

use indexmap::IndexSet;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::edge::{canonicalize_edges, Edge, EdgeKind};
use crate::error::IntegrityError;
use crate::id::NodeId;
use crate::node::GraphNode;
use crate::query::SecurityRegistry;
use crate::validate::verify_graph_integrity;

/// The validated knowledge graph.
#[derive(Debug, Clone)]
pub struct GraphStore {
    graph: DiGraph<GraphNode, EdgeKind, u32>,
    by_id: HashMap<NodeId, NodeIndex<u32>>,
}

impl GraphStore {
    /// Builds a store from authored nodes and edges.
    ///
    /// Edges are canonicalized and deduplicated first; the canonical set is
    /// what gets validated and indexed. Returns the first failing
    /// [`IntegrityError`] category if the content is inconsistent.
    pub fn new(
        nodes: Vec<GraphNode>,
        edges: Vec<Edge>,
        registry: &SecurityRegistry,
    ) -> Result<Self, IntegrityError> {
        let authored_edges = edges.len();
        let edges = canonicalize_edges(edges);
        verify_graph_integrity(&nodes, &edges, registry)?;

        let mut graph = DiGraph::with_capacity(nodes.len(), edges.len());
        let mut by_id = HashMap::with_capacity(nodes.len());
        for node in nodes {
            let id = node.id.clone();
            let idx = graph.add_node(node);
            by_id.insert(id, idx);
        }

        for edge in edges {
            // Endpoints were verified above.
            let (Some(&from), Some(&to)) = (by_id.get(&edge.from), by_id.get(&edge.to)) else {
                continue;
            };
            graph.add_edge(from, to, edge.kind);
        }

        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            authored_edges,
            "graph store built"
        );

        Ok(GraphStore { graph, by_id })
    }

    // -----------------------------------------------------------------------
    // Node queries
    // -----------------------------------------------------------------------

    /// Looks up a node by id. `None` for unknown ids.
    pub fn get_node(&self, id: &str) -> Option<&GraphNode> {
        self.by_id.get(id).map(|&idx| &self.graph[idx])
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// All nodes in authoring order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> + '_ {
        self.graph.node_weights()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    // -----------------------------------------------------------------------
    // Edge queries
    // -----------------------------------------------------------------------

    /// All canonical edges in insertion order.
    pub fn edges(&self) -> Vec<Edge> {
        self.graph
            .edge_indices()
            .filter_map(|e| self.edge_at(e))
            .collect()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Edges leaving `id`, in insertion order. Empty for unknown ids.
    pub fn get_outgoing_edges(&self, id: &str) -> Vec<Edge> {
        self.directed_edges(id, Direction::Outgoing)
            .into_iter()
            .filter_map(|e| self.edge_at(e))
            .collect()
    }

    /// Edges entering `id`, in insertion order. Empty for unknown ids.
    pub fn get_incoming_edges(&self, id: &str) -> Vec<Edge> {
        self.directed_edges(id, Direction::Incoming)
            .into_iter()
            .filter_map(|e| self.edge_at(e))
            .collect()
    }

    /// Nodes adjacent to `id` in either direction, each listed once.
    ///
    /// Heads of outgoing edges come first, then tails of incoming edges.
    /// Empty for unknown ids.
    pub fn get_neighbors(&self, id: &str) -> Vec<&GraphNode> {
        let mut neighbors = IndexSet::new();
        for e in self.directed_edges(id, Direction::Outgoing) {
            if let Some((_, to)) = self.graph.edge_endpoints(e) {
                neighbors.insert(to);
            }
        }
        for e in self.directed_edges(id, Direction::Incoming) {
            if let Some((from, _)) = self.graph.edge_endpoints(e) {
                neighbors.insert(from);
            }
        }
        neighbors.into_iter().map(|n| &self.graph[n]).collect()
    }

    fn directed_edges(&self, id: &str, direction: Direction) -> Vec<EdgeIndex<u32>> {
        let Some(&idx) = self.by_id.get(id) else {
            return Vec::new();
        };
        // petgraph walks adjacency newest-first.
        let mut edges: Vec<EdgeIndex<u32>> = self
            .graph
            .edges_directed(idx, direction)
            .map(|e| e.id())
            .collect();
        edges.sort_unstable();
        edges
    }

    fn edge_at(&self, e: EdgeIndex<u32>) -> Option<Edge> {
        let (from, to) = self.graph.edge_endpoints(e)?;
        let kind = *self.graph.edge_weight(e)?;
        Some(Edge {
            from: self.graph[from].id.clone(),
            to: self.graph[to].id.clone(),
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeType;

    fn nodes(ids: &[&str]) -> Vec<GraphNode> {
        ids.iter()
            .map(|id| GraphNode::new(*id, NodeType::Primitive, id.to_uppercase()))
            .collect()
    }

    fn build(ids: &[&str], edges: Vec<Edge>) -> Result<GraphStore, IntegrityError> {
        GraphStore::new(nodes(ids), edges, &SecurityRegistry::default())
    }

    #[test]
    fn basic_store_construction() {
        let store = build(
            &["a", "b", "c"],
            vec![Edge::new("a", "b", EdgeKind::DependsOn)],
        )
        .unwrap();

        assert_eq!(store.node_count(), 3);
        assert_eq!(store.edge_count(), 1);
        assert_eq!(store.get_node("b").map(|n| n.title.as_str()), Some("B"));
        assert_eq!(
            store.get_outgoing_edges("a"),
            vec![Edge::new("a", "b", EdgeKind::DependsOn)]
        );
        assert_eq!(
            store.get_incoming_edges("b"),
            vec![Edge::new("a", "b", EdgeKind::DependsOn)]
        );
        assert!(store.get_outgoing_edges("c").is_empty());
        assert!(store.get_incoming_edges("c").is_empty());
    }

    #[test]
    fn unknown_ids_are_absent_not_errors() {
        let store = build(&["a"], Vec::new()).unwrap();
        assert!(store.get_node("zzz").is_none());
        assert!(!store.has_node("zzz"));
        assert!(store.get_outgoing_edges("zzz").is_empty());
        assert!(store.get_incoming_edges("zzz").is_empty());
        assert!(store.get_neighbors("zzz").is_empty());
    }

    #[test]
    fn introduced_in_is_stored_canonically() {
        let store = build(
            &["segwit", "bip141"],
            vec![Edge::new("segwit", "bip141", EdgeKind::IntroducedIn)],
        )
        .unwrap();

        assert_eq!(
            store.edges(),
            vec![Edge::new("bip141", "segwit", EdgeKind::Introduces)]
        );
        assert!(store.get_outgoing_edges("segwit").is_empty());
        assert_eq!(store.get_outgoing_edges("bip141").len(), 1);
    }

    #[test]
    fn canonical_duplicates_collapse() {
        let store = build(
            &["segwit", "bip141"],
            vec![
                Edge::new("segwit", "bip141", EdgeKind::IntroducedIn),
                Edge::new("bip141", "segwit", EdgeKind::Introduces),
                Edge::new("segwit", "bip141", EdgeKind::IntroducedIn),
            ],
        )
        .unwrap();
        assert_eq!(store.edge_count(), 1);
    }

    #[test]
    fn adjacency_keeps_insertion_order() {
        let store = build(
            &["hub", "a", "b", "c"],
            vec![
                Edge::new("hub", "c", EdgeKind::DependsOn),
                Edge::new("hub", "a", EdgeKind::PartOf),
                Edge::new("hub", "b", EdgeKind::Strengthens),
            ],
        )
        .unwrap();
        let heads: Vec<_> = store
            .get_outgoing_edges("hub")
            .into_iter()
            .map(|e| e.to.0)
            .collect();
        assert_eq!(heads, vec!["c", "a", "b"]);
    }

    #[test]
    fn neighbors_are_deduplicated_across_directions() {
        let store = build(
            &["a", "b", "c"],
            vec![
                Edge::new("a", "b", EdgeKind::DependsOn),
                Edge::new("a", "b", EdgeKind::PartOf),
                Edge::new("b", "a", EdgeKind::Strengthens),
                Edge::new("c", "a", EdgeKind::ValidatedBy),
            ],
        )
        .unwrap();
        let ids: Vec<_> = store
            .get_neighbors("a")
            .into_iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn returned_edge_lists_are_copies() {
        let store = build(&["a", "b"], vec![Edge::new("a", "b", EdgeKind::DependsOn)]).unwrap();
        let mut edges = store.get_outgoing_edges("a");
        edges.clear();
        assert_eq!(store.get_outgoing_edges("a").len(), 1);
    }

    #[test]
    fn duplicate_node_ids_abort_construction() {
        let err = build(&["x", "x"], Vec::new()).unwrap_err();
        assert!(err.to_string().contains("x"));
    }

    #[test]
    fn dangling_edge_aborts_construction() {
        let err = build(&["a"], vec![Edge::new("a", "ghost", EdgeKind::DependsOn)]).unwrap_err();
        assert!(matches!(err, IntegrityError::DanglingEdgeEndpoints { .. }));
    }

    #[test]
    fn direct_transaction_utxo_edge_aborts_construction() {
        let err = build(
            &["transaction", "utxo"],
            vec![Edge::new("utxo", "transaction", EdgeKind::PartOf)],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            IntegrityError::DirectTransactionUtxoEdge { .. }
        ));
    }

    #[test]
    fn store_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GraphStore>();
    }
}
