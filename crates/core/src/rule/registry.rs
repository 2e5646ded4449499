use std::collections::HashSet;
use std::path::Path;

use super::context::RuleContext;
use super::traits::Rule;
use crate::finding::{Finding, Severity};
use crate::summary::{ContractSummary, FunctionSummary};

/// Registry that holds the rule table and evaluates it against summaries.
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Register a rule. Evaluation follows registration order.
    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    /// Register multiple rules at once
    pub fn register_all(&mut self, rules: Vec<Box<dyn Rule>>) {
        self.rules.extend(rules);
    }

    /// List all registered rule names
    pub fn list_rules(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Findings for one function. Non-entry functions never report.
    pub fn evaluate_function(
        &self,
        file: &Path,
        source: &str,
        contract: &ContractSummary,
        function: &FunctionSummary,
    ) -> Vec<Finding> {
        if !function.is_entry_point {
            return Vec::new();
        }
        let ctx = RuleContext::new(file, source, contract, function);
        let findings = self.rules.iter().flat_map(|r| r.evaluate(&ctx)).collect();
        dedup_findings(findings)
    }

    /// Findings for every function of a contract, in document order
    pub fn evaluate_contract(
        &self,
        file: &Path,
        source: &str,
        contract: &ContractSummary,
    ) -> Vec<Finding> {
        contract
            .functions
            .iter()
            .flat_map(|f| self.evaluate_function(file, source, contract, f))
            .collect()
    }

    /// Filter findings by minimum severity
    pub fn filter_by_severity(findings: Vec<Finding>, min: &Severity) -> Vec<Finding> {
        findings
            .into_iter()
            .filter(|f| f.severity <= *min)
            .collect()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Collapse findings that share `(line, category)`; the first one wins.
pub fn dedup_findings(findings: Vec<Finding>) -> Vec<Finding> {
    let mut seen = HashSet::new();
    findings
        .into_iter()
        .filter(|f| seen.insert(f.dedup_key()))
        .collect()
}
