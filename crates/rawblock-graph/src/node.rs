//! Graph node records.
//!
//! A [`GraphNode`] is one concept in the Bitcoin knowledge graph: a primitive
//! such as `utxo`, a consensus rule, a mechanism, a protocol upgrade, an
//! attack, or a system property. Nodes are authored once as static content
//! and never mutated after the graph store is built.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::InvalidDifficulty;
use crate::id::NodeId;

/// Classification of a graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Primitive,
    Rule,
    Mechanism,
    Upgrade,
    Attack,
    Property,
}

impl NodeType {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Primitive => "primitive",
            NodeType::Rule => "rule",
            NodeType::Mechanism => "mechanism",
            NodeType::Upgrade => "upgrade",
            NodeType::Attack => "attack",
            NodeType::Property => "property",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Learner-facing difficulty, 1 (introductory) through 4 (expert).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 4;

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty(Self::MIN)
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = InvalidDifficulty;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Difficulty(value))
        } else {
            Err(InvalidDifficulty(value))
        }
    }
}

impl From<Difficulty> for u8 {
    fn from(d: Difficulty) -> Self {
        d.0
    }
}

/// An external reading reference attached to a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FurtherReading {
    pub title: String,
    pub url: String,
}

/// A historical incident illustrating a node's security properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityCaseStudy {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub historical_reference: Option<String>,
}

/// A node in the knowledge graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    /// Globally unique node id.
    pub id: NodeId,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub title: String,
    pub summary: String,
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub claim_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub advanced_notes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub further_reading: Vec<FurtherReading>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub explorer_links: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security_notes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security_case_studies: Vec<SecurityCaseStudy>,
}

impl GraphNode {
    /// Creates a node with the given identity and all optional content empty.
    pub fn new(id: impl Into<NodeId>, node_type: NodeType, title: impl Into<String>) -> Self {
        GraphNode {
            id: id.into(),
            node_type,
            title: title.into(),
            summary: String::new(),
            difficulty: Difficulty::default(),
            claim_ids: Vec::new(),
            advanced_notes: Vec::new(),
            further_reading: Vec::new(),
            explorer_links: Vec::new(),
            security_notes: Vec::new(),
            security_case_studies: Vec::new(),
        }
    }

    pub fn is_attack(&self) -> bool {
        self.node_type == NodeType::Attack
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_accepts_one_through_four() {
        for value in 1..=4u8 {
            assert_eq!(Difficulty::try_from(value).unwrap().get(), value);
        }
        assert!(Difficulty::try_from(0).is_err());
        assert!(Difficulty::try_from(5).is_err());
    }

    #[test]
    fn node_deserializes_from_content_json() {
        let json = r#"{
            "id": "utxo",
            "type": "primitive",
            "title": "UTXO",
            "summary": "Unspent transaction output.",
            "difficulty": 2,
            "securityNotes": ["Double spends target unspent outputs."],
            "securityCaseStudies": [
                {"title": "2010 overflow", "description": "Invalid outputs created."}
            ]
        }"#;
        let node: GraphNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.id, "utxo");
        assert_eq!(node.node_type, NodeType::Primitive);
        assert_eq!(node.difficulty.get(), 2);
        assert_eq!(node.security_notes.len(), 1);
        assert_eq!(node.security_case_studies[0].historical_reference, None);
        assert!(node.explorer_links.is_empty());
    }

    #[test]
    fn out_of_range_difficulty_is_rejected() {
        let json = r#"{"id": "x", "type": "rule", "title": "X", "summary": "", "difficulty": 7}"#;
        let err = serde_json::from_str::<GraphNode>(json).unwrap_err();
        assert!(err.to_string().contains("difficulty"));
    }

    #[test]
    fn unknown_node_type_is_rejected() {
        let json = r#"{"id": "x", "type": "widget", "title": "X", "summary": "", "difficulty": 1}"#;
        assert!(serde_json::from_str::<GraphNode>(json).is_err());
    }

    #[test]
    fn summary_and_difficulty_are_required() {
        let json = r#"{"id": "x", "type": "rule", "title": "X", "summary": "S"}"#;
        let err = serde_json::from_str::<GraphNode>(json).unwrap_err();
        assert!(err.to_string().contains("missing field `difficulty`"));

        let json = r#"{"id": "x", "type": "rule", "title": "X", "difficulty": 2}"#;
        let err = serde_json::from_str::<GraphNode>(json).unwrap_err();
        assert!(err.to_string().contains("missing field `summary`"));
    }

    #[test]
    fn is_attack_follows_node_type() {
        assert!(GraphNode::new("double-spend", NodeType::Attack, "Double Spend").is_attack());
        assert!(!GraphNode::new("mining", NodeType::Mechanism, "Mining").is_attack());
    }
}
