//! Security content registries.
//!
//! Each record here is authored independently of the graph and points at
//! graph nodes by id. The integrity validator checks those references once
//! when the store is built; see [`crate::validate`].

use serde::{Deserialize, Serialize};

use crate::id::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssumptionCategory {
    Cryptographic,
    Economic,
    Network,
    GameTheory,
}

/// A property the system's security relies on holding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityAssumption {
    /// Must also be a graph node id.
    pub id: NodeId,
    pub statement: String,
    pub category: AssumptionCategory,
    #[serde(default)]
    pub depends_on: Vec<NodeId>,
    #[serde(default)]
    pub weakened_by: Vec<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetLayer {
    Consensus,
    Network,
    Mining,
    Mempool,
}

/// An adversary model: capabilities, targeted nodes, and mitigations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackModel {
    /// Must also be a graph node id of type `attack`.
    pub id: NodeId,
    pub title: String,
    #[serde(default)]
    pub attacker_capabilities: Vec<String>,
    pub target_layer: TargetLayer,
    #[serde(default)]
    pub exploits_nodes: Vec<NodeId>,
    #[serde(default)]
    pub mitigated_by: Vec<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_model: Option<String>,
    #[serde(default)]
    pub real_world_observed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExploitationType {
    Inflation,
    Consensus,
    Dos,
    Policy,
    Economic,
}

/// A historical protocol or implementation vulnerability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vulnerability {
    /// Must also be a graph node id; every `related_nodes` entry needs a
    /// matching relation edge out of it.
    pub id: NodeId,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cve: Option<String>,
    #[serde(default)]
    pub year: u16,
    #[serde(default)]
    pub affected_versions: Vec<String>,
    #[serde(default)]
    pub root_cause: String,
    #[serde(default)]
    pub impact: String,
    #[serde(default)]
    pub fixed_by: String,
    #[serde(default)]
    pub related_nodes: Vec<NodeId>,
    pub exploitation_type: ExploitationType,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleLayer {
    Consensus,
    Policy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnforcedBy {
    FullNode,
    Miner,
}

/// A consensus or relay-policy validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRule {
    pub id: String,
    pub layer: RuleLayer,
    pub description: String,
    #[serde(default)]
    pub applies_to: Vec<NodeId>,
    pub enforced_by: EnforcedBy,
}
