//! Stable string identifiers for knowledge graph entities.
//!
//! Content registries reference graph nodes by plain string ids. [`NodeId`]
//! wraps those strings so a node reference cannot be confused with free text
//! such as a title or a capability description.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a node in the knowledge graph.
///
/// Serializes as a bare JSON string. Implements `Borrow<str>` so maps keyed
/// by `NodeId` can be queried with a `&str`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        NodeId(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        NodeId(id)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn node_id_display() {
        assert_eq!(format!("{}", NodeId::new("utxo")), "utxo");
    }

    #[test]
    fn map_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(NodeId::from("mempool"), 3);
        assert_eq!(map.get("mempool"), Some(&3));
        assert_eq!(map.get("block"), None);
    }

    #[test]
    fn serializes_as_bare_string() {
        let id = NodeId::from("proof-of-work");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"proof-of-work\"");
        let back: NodeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, "proof-of-work");
    }
}
