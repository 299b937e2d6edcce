//! Directed, typed relations between graph nodes.
//!
//! An [`Edge`] has no identity beyond its `(from, to, kind)` triple. Content
//! is authored in whichever direction reads naturally ("segwit was introduced
//! in BIP141"), so edges pass through [`canonicalize_edges`] before the graph
//! store indexes them.

use std::fmt;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::id::NodeId;

/// Relation kinds between graph nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeKind {
    DependsOn,
    ValidatedBy,
    PartOf,
    Exploits,
    ExploitedBy,
    Strengthens,
    Weakens,
    MitigatedBy,
    PolicyOnly,
    NotConsensusCritical,
    IntroducedBy,
    /// Authoring-only form; rewritten to [`EdgeKind::Introduces`] with the
    /// endpoints swapped during canonicalization.
    IntroducedIn,
    Introduces,
}

impl EdgeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeKind::DependsOn => "DEPENDS_ON",
            EdgeKind::ValidatedBy => "VALIDATED_BY",
            EdgeKind::PartOf => "PART_OF",
            EdgeKind::Exploits => "EXPLOITS",
            EdgeKind::ExploitedBy => "EXPLOITED_BY",
            EdgeKind::Strengthens => "STRENGTHENS",
            EdgeKind::Weakens => "WEAKENS",
            EdgeKind::MitigatedBy => "MITIGATED_BY",
            EdgeKind::PolicyOnly => "POLICY_ONLY",
            EdgeKind::NotConsensusCritical => "NOT_CONSENSUS_CRITICAL",
            EdgeKind::IntroducedBy => "INTRODUCED_BY",
            EdgeKind::IntroducedIn => "INTRODUCED_IN",
            EdgeKind::Introduces => "INTRODUCES",
        }
    }

    /// Returns `true` for the kinds that may back a vulnerability's
    /// `relatedNodes` entry.
    pub fn is_vulnerability_relation(self) -> bool {
        match self {
            EdgeKind::Exploits
            | EdgeKind::Weakens
            | EdgeKind::Strengthens
            | EdgeKind::MitigatedBy => true,
            EdgeKind::DependsOn
            | EdgeKind::ValidatedBy
            | EdgeKind::PartOf
            | EdgeKind::ExploitedBy
            | EdgeKind::PolicyOnly
            | EdgeKind::NotConsensusCritical
            | EdgeKind::IntroducedBy
            | EdgeKind::IntroducedIn
            | EdgeKind::Introduces => false,
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed relation `from -[kind]-> to`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
}

impl Edge {
    pub fn new(from: impl Into<NodeId>, to: impl Into<NodeId>, kind: EdgeKind) -> Self {
        Edge {
            from: from.into(),
            to: to.into(),
            kind,
        }
    }

    /// Returns the normalized form of this edge.
    ///
    /// `INTRODUCED_IN` becomes `INTRODUCES` with `from` and `to` swapped.
    /// Every other kind is already canonical.
    pub fn canonical(self) -> Edge {
        match self.kind {
            EdgeKind::IntroducedIn => Edge {
                from: self.to,
                to: self.from,
                kind: EdgeKind::Introduces,
            },
            EdgeKind::DependsOn
            | EdgeKind::ValidatedBy
            | EdgeKind::PartOf
            | EdgeKind::Exploits
            | EdgeKind::ExploitedBy
            | EdgeKind::Strengthens
            | EdgeKind::Weakens
            | EdgeKind::MitigatedBy
            | EdgeKind::PolicyOnly
            | EdgeKind::NotConsensusCritical
            | EdgeKind::IntroducedBy
            | EdgeKind::Introduces => self,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -[{}]-> {}", self.from, self.kind, self.to)
    }
}

/// Canonicalizes every edge, then drops exact `(from, to, kind)` repeats.
///
/// The first occurrence of each triple is kept and relative order is
/// preserved. Repeats are not an error.
pub fn canonicalize_edges<I>(edges: I) -> Vec<Edge>
where
    I: IntoIterator<Item = Edge>,
{
    let mut seen = IndexSet::new();
    let mut dropped = 0usize;
    for edge in edges {
        if !seen.insert(edge.canonical()) {
            dropped += 1;
        }
    }
    if dropped > 0 {
        tracing::debug!(dropped, "dropped duplicate edges after canonicalization");
    }
    seen.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn introduced_in_is_swapped_and_retyped() {
        let edge = Edge::new("segwit", "bip141", EdgeKind::IntroducedIn).canonical();
        assert_eq!(edge, Edge::new("bip141", "segwit", EdgeKind::Introduces));
    }

    #[test]
    fn other_kinds_are_untouched() {
        let edge = Edge::new("a", "b", EdgeKind::IntroducedBy);
        assert_eq!(edge.clone().canonical(), edge);
        let edge = Edge::new("a", "b", EdgeKind::DependsOn);
        assert_eq!(edge.clone().canonical(), edge);
    }

    #[test]
    fn canonical_duplicates_collapse_to_first_occurrence() {
        let edges = vec![
            Edge::new("a", "b", EdgeKind::DependsOn),
            Edge::new("b", "a", EdgeKind::Introduces),
            Edge::new("c", "a", EdgeKind::PartOf),
            Edge::new("a", "b", EdgeKind::IntroducedIn),
            Edge::new("a", "b", EdgeKind::DependsOn),
        ];
        let canonical = canonicalize_edges(edges);
        assert_eq!(
            canonical,
            vec![
                Edge::new("a", "b", EdgeKind::DependsOn),
                Edge::new("b", "a", EdgeKind::Introduces),
                Edge::new("c", "a", EdgeKind::PartOf),
            ]
        );
    }

    #[test]
    fn no_introduced_in_survives_canonicalization() {
        let canonical = canonicalize_edges(vec![
            Edge::new("taproot", "bip341", EdgeKind::IntroducedIn),
            Edge::new("segwit", "bip141", EdgeKind::IntroducedIn),
        ]);
        assert!(canonical.iter().all(|e| e.kind != EdgeKind::IntroducedIn));
        assert!(canonical.contains(&Edge::new("bip341", "taproot", EdgeKind::Introduces)));
    }

    #[test]
    fn vulnerability_relation_kinds() {
        assert!(EdgeKind::Exploits.is_vulnerability_relation());
        assert!(EdgeKind::MitigatedBy.is_vulnerability_relation());
        assert!(!EdgeKind::DependsOn.is_vulnerability_relation());
        assert!(!EdgeKind::ExploitedBy.is_vulnerability_relation());
    }

    #[test]
    fn edge_kind_wire_names() {
        let json = r#"{"from": "a", "to": "b", "type": "NOT_CONSENSUS_CRITICAL"}"#;
        let edge: Edge = serde_json::from_str(json).unwrap();
        assert_eq!(edge.kind, EdgeKind::NotConsensusCritical);
        assert_eq!(
            serde_json::to_string(&EdgeKind::IntroducedIn).unwrap(),
            "\"INTRODUCED_IN\""
        );
    }

    #[test]
    fn display_format() {
        let edge = Edge::new("transaction", "output", EdgeKind::PartOf);
        assert_eq!(edge.to_string(), "transaction -[PART_OF]-> output");
    }
}
