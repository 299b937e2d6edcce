//! Lookup and filter queries over the security registries.
//!
//! The registries are small and static, so every query is a linear scan in
//! registry order. Id lookups return `Option`; list queries return borrowed
//! records in the order they were authored.

use serde::{Deserialize, Serialize};

use crate::registry::{
    AttackModel, ExploitationType, RuleLayer, SecurityAssumption, Severity, TargetLayer,
    ValidationRule, Vulnerability,
};

/// The four security registries, held together for validation and queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityRegistry {
    assumptions: Vec<SecurityAssumption>,
    attack_models: Vec<AttackModel>,
    vulnerabilities: Vec<Vulnerability>,
    validation_rules: Vec<ValidationRule>,
}

impl SecurityRegistry {
    pub fn new(
        assumptions: Vec<SecurityAssumption>,
        attack_models: Vec<AttackModel>,
        vulnerabilities: Vec<Vulnerability>,
        validation_rules: Vec<ValidationRule>,
    ) -> Self {
        SecurityRegistry {
            assumptions,
            attack_models,
            vulnerabilities,
            validation_rules,
        }
    }

    // -----------------------------------------------------------------------
    // Security assumptions
    // -----------------------------------------------------------------------

    pub fn assumptions(&self) -> &[SecurityAssumption] {
        &self.assumptions
    }

    pub fn assumption(&self, id: &str) -> Option<&SecurityAssumption> {
        self.assumptions.iter().find(|a| a.id == id)
    }

    /// Assumptions that are the node itself, depend on it, or are weakened by it.
    pub fn assumptions_for_node(&self, node_id: &str) -> Vec<&SecurityAssumption> {
        self.assumptions
            .iter()
            .filter(|a| {
                a.id == node_id
                    || a.depends_on.iter().any(|n| n == node_id)
                    || a.weakened_by.iter().any(|n| n == node_id)
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Attack models
    // -----------------------------------------------------------------------

    pub fn attack_models(&self) -> &[AttackModel] {
        &self.attack_models
    }

    pub fn attack_model(&self, id: &str) -> Option<&AttackModel> {
        self.attack_models.iter().find(|m| m.id == id)
    }

    /// Attack models that are the node itself, exploit it, or are mitigated by it.
    pub fn attack_models_for_node(&self, node_id: &str) -> Vec<&AttackModel> {
        self.attack_models
            .iter()
            .filter(|m| {
                m.id == node_id
                    || m.exploits_nodes.iter().any(|n| n == node_id)
                    || m.mitigated_by.iter().any(|n| n == node_id)
            })
            .collect()
    }

    pub fn attack_models_by_target_layer(&self, layer: TargetLayer) -> Vec<&AttackModel> {
        self.attack_models
            .iter()
            .filter(|m| m.target_layer == layer)
            .collect()
    }

    // -----------------------------------------------------------------------
    // Vulnerabilities
    // -----------------------------------------------------------------------

    pub fn vulnerabilities(&self) -> &[Vulnerability] {
        &self.vulnerabilities
    }

    pub fn vulnerability(&self, id: &str) -> Option<&Vulnerability> {
        self.vulnerabilities.iter().find(|v| v.id == id)
    }

    pub fn vulnerabilities_for_node(&self, node_id: &str) -> Vec<&Vulnerability> {
        self.vulnerabilities
            .iter()
            .filter(|v| v.id == node_id || v.related_nodes.iter().any(|n| n == node_id))
            .collect()
    }

    pub fn vulnerabilities_by_severity(&self, severity: Severity) -> Vec<&Vulnerability> {
        self.vulnerabilities
            .iter()
            .filter(|v| v.severity == severity)
            .collect()
    }

    pub fn vulnerabilities_by_exploitation_type(
        &self,
        exploitation_type: ExploitationType,
    ) -> Vec<&Vulnerability> {
        self.vulnerabilities
            .iter()
            .filter(|v| v.exploitation_type == exploitation_type)
            .collect()
    }

    pub fn filter_vulnerabilities(&self, filter: &VulnerabilityFilter) -> Vec<&Vulnerability> {
        self.vulnerabilities
            .iter()
            .filter(|v| filter.matches(v))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Validation rules
    // -----------------------------------------------------------------------

    pub fn validation_rules(&self) -> &[ValidationRule] {
        &self.validation_rules
    }

    pub fn validation_rule(&self, id: &str) -> Option<&ValidationRule> {
        self.validation_rules.iter().find(|r| r.id == id)
    }

    pub fn validation_rules_by_layer(&self, layer: RuleLayer) -> Vec<&ValidationRule> {
        self.validation_rules
            .iter()
            .filter(|r| r.layer == layer)
            .collect()
    }

    pub fn validation_rules_for_node(&self, node_id: &str) -> Vec<&ValidationRule> {
        self.validation_rules
            .iter()
            .filter(|r| r.id == node_id || r.applies_to.iter().any(|n| n == node_id))
            .collect()
    }
}

/// Conjunctive vulnerability filter. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VulnerabilityFilter {
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub year: Option<u16>,
    /// Exact match against one of `affectedVersions`, after trimming.
    #[serde(default)]
    pub affected_version: Option<String>,
}

impl VulnerabilityFilter {
    pub fn matches(&self, vulnerability: &Vulnerability) -> bool {
        if let Some(severity) = self.severity {
            if vulnerability.severity != severity {
                return false;
            }
        }
        if let Some(year) = self.year {
            if vulnerability.year != year {
                return false;
            }
        }
        match self.affected_version.as_deref().map(str::trim) {
            Some(version) if !version.is_empty() => {
                vulnerability.affected_versions.iter().any(|v| v == version)
            }
            _ => true,
        }
    }
}
