//! End-to-end tests over a realistic authored content bundle.

use rawblock_graph::{
    ContentBundle, ContentError, Edge, EdgeKind, IntegrityError, KnowledgeBase, LearningPath,
    NodeId, NodeType, Severity, TargetLayer, VulnerabilityFilter,
};

const BITCOIN: &str = include_str!("fixtures/bitcoin.json");

fn kb() -> KnowledgeBase {
    KnowledgeBase::from_json_str(BITCOIN).expect("fixture content should validate")
}

fn bundle() -> ContentBundle {
    serde_json::from_str(BITCOIN).unwrap()
}

fn ids(nodes: &[NodeId]) -> Vec<&str> {
    nodes.iter().map(NodeId::as_str).collect()
}

#[test]
fn fixture_builds_with_canonical_edges() {
    let kb = kb();
    let store = kb.store();
    assert_eq!(store.node_count(), 28);
    // One INTRODUCED_IN/INTRODUCES pair and one repeated DEPENDS_ON collapse.
    assert_eq!(store.edge_count(), 32);
    assert!(store
        .edges()
        .iter()
        .all(|e| e.kind != EdgeKind::IntroducedIn));
    assert_eq!(
        store.get_outgoing_edges("bip141"),
        vec![Edge::new("bip141", "segwit", EdgeKind::Introduces)]
    );
}

#[test]
fn node_lookup_and_neighbors() {
    let kb = kb();
    let store = kb.store();

    let node = store.get_node("double-spend").unwrap();
    assert_eq!(node.node_type, NodeType::Attack);
    assert_eq!(node.security_case_studies.len(), 1);
    assert!(store.get_node("lightning").is_none());

    let neighbors: Vec<_> = store
        .get_neighbors("utxo")
        .into_iter()
        .map(|n| n.id.as_str())
        .collect();
    assert_eq!(neighbors, vec!["input", "output", "double-spend"]);
}

#[test]
fn prerequisites_follow_depends_on_edges() {
    let kb = kb();
    assert_eq!(
        ids(&kb.node_prerequisites("transaction")),
        vec!["input", "output", "signature"]
    );
    assert_eq!(
        ids(&kb.missing_prerequisites("transaction", ["output"])),
        vec!["input", "signature"]
    );
    assert_eq!(ids(&kb.node_prerequisites("utxo")), vec!["output"]);
    assert!(kb.node_prerequisites("output").is_empty());
}

#[test]
fn canonical_path_progress() {
    let kb = kb();
    let path = kb.canonical_path().unwrap();
    assert_eq!(path.id, "transaction-lifecycle");
    assert!(kb.validate_path(path).valid);

    let progress = kb.path_progress(path, 3);
    assert_eq!(progress.total, 8);
    assert_eq!(progress.completed, 3);
    assert_eq!(progress.percent, 38);
    assert_eq!(progress.current_node_id, Some(NodeId::from("mempool")));
    assert_eq!(progress.next_node_id, Some(NodeId::from("mining")));

    assert_eq!(kb.all_paths().len(), 2);
    assert!(kb.path_by_id("attack-surfaces").is_some());
    assert!(kb.path_by_id("lightning-primer").is_none());
}

#[test]
fn path_validation_reports_unknown_nodes() {
    let kb = kb();
    let stale = LearningPath {
        id: "stale".to_string(),
        title: "Stale".to_string(),
        ordered_nodes: vec![
            NodeId::from("utxo"),
            NodeId::from("taproot"),
            NodeId::from("block"),
        ],
    };
    let validation = kb.validate_path(&stale);
    assert!(!validation.valid);
    assert_eq!(ids(&validation.missing_node_ids), vec!["taproot"]);
}

#[test]
fn registry_queries() {
    let kb = kb();
    let registry = kb.registry();

    let for_mining: Vec<_> = registry
        .assumptions_for_node("mining")
        .into_iter()
        .map(|a| a.id.as_str())
        .collect();
    assert_eq!(for_mining, vec!["hashpower-majority-assumption"]);

    let mining_attacks: Vec<_> = registry
        .attack_models_by_target_layer(TargetLayer::Mining)
        .into_iter()
        .map(|m| m.id.as_str())
        .collect();
    assert_eq!(mining_attacks, vec!["attack-51-percent", "selfish-mining"]);

    let critical = registry.vulnerabilities_by_severity(Severity::Critical);
    assert_eq!(critical.len(), 2);

    let filtered = registry.filter_vulnerabilities(&VulnerabilityFilter {
        affected_version: Some(" 0.16.0 ".to_string()),
        ..VulnerabilityFilter::default()
    });
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, "cve-2018-17144");

    let rules: Vec<_> = registry
        .validation_rules_for_node("mempool")
        .into_iter()
        .map(|r| r.id.as_str())
        .collect();
    assert_eq!(
        rules,
        vec!["policy-standard-script-forms", "policy-min-relay-fee"]
    );
}

#[test]
fn attack_traversal_over_fixture() {
    let kb = kb();
    let traversal = kb.attack_traversal("double-spend").unwrap();
    let exploited: Vec<_> = traversal
        .exploited_nodes
        .iter()
        .map(|n| n.id.as_str())
        .collect();
    assert_eq!(exploited, vec!["utxo", "mempool", "transaction"]);
    assert_eq!(traversal.mitigated_by_nodes.len(), 3);
    assert_eq!(traversal.traversal_edges.len(), 6);
    assert!(kb.attack_traversal("eclipse-attack").is_none());
}

#[test]
fn removing_a_vulnerability_edge_fails_parity() {
    let mut bundle = bundle();
    bundle
        .edges
        .retain(|e| !(e.from == "cve-2018-17144" && e.to == "input"));
    let err = KnowledgeBase::from_bundle(bundle).unwrap_err();
    let missing = match err {
        ContentError::Integrity(IntegrityError::VulnerabilityEdgeParity { missing }) => missing,
        other => panic!("expected vulnerability parity failure, got {other:?}"),
    };
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].owner, "cve-2018-17144");
    assert_eq!(missing[0].node, "input");
}

#[test]
fn direct_transaction_utxo_edge_is_rejected() {
    let mut bundle = bundle();
    bundle
        .edges
        .push(Edge::new("transaction", "utxo", EdgeKind::DependsOn));
    let err = KnowledgeBase::from_bundle(bundle).unwrap_err();
    assert!(matches!(
        err,
        ContentError::Integrity(IntegrityError::DirectTransactionUtxoEdge { .. })
    ));
}

#[test]
fn attack_model_on_non_attack_node_is_rejected() {
    let mut bundle = bundle();
    let node = bundle
        .nodes
        .iter_mut()
        .find(|n| n.id == "selfish-mining")
        .unwrap();
    node.node_type = NodeType::Mechanism;
    let err = KnowledgeBase::from_bundle(bundle).unwrap_err();
    assert!(matches!(
        err,
        ContentError::Integrity(IntegrityError::AttackModelNodeParity { .. })
    ));
}

#[test]
fn duplicate_path_ids_are_rejected() {
    let mut bundle = bundle();
    let copy = bundle.paths[0].clone();
    bundle.paths.push(copy);
    let err = KnowledgeBase::from_bundle(bundle).unwrap_err();
    match err {
        ContentError::DuplicatePathId { id } => assert_eq!(id, "transaction-lifecycle"),
        other => panic!("expected a duplicate path id error, got {other:?}"),
    }
}
