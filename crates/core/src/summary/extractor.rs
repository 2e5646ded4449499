use tracing::debug;

use crate::ast::{ContractDefinition, Node, SourceUnit};
use crate::heuristics::Heuristics;

use super::function::summarize_function;
use super::types::{ContractSummary, StateVariable};

/// Walks the top-level nodes of one source unit and builds a summary skeleton
/// per contract. Findings are left empty for the rule evaluator.
pub struct ContractExtractor<'a> {
    source: &'a str,
    heuristics: &'a Heuristics,
}

impl<'a> ContractExtractor<'a> {
    pub fn new(source: &'a str, heuristics: &'a Heuristics) -> Self {
        Self { source, heuristics }
    }

    pub fn extract(&self, unit: &SourceUnit) -> Vec<ContractSummary> {
        unit.contracts().map(|def| self.contract(def)).collect()
    }

    fn contract(&self, def: &ContractDefinition) -> ContractSummary {
        let state_variables: Vec<StateVariable> = def
            .nodes
            .iter()
            .filter_map(|node| match node {
                Node::VariableDeclaration(var) if var.state_variable => Some(StateVariable {
                    name: var.name.clone(),
                    type_name: var.type_string().to_string(),
                    is_owner_like: self.heuristics.is_owner_like(&var.name),
                }),
                _ => None,
            })
            .collect();

        let mut summary = ContractSummary {
            name: def.name.clone(),
            kind: def
                .contract_kind
                .clone()
                .unwrap_or_else(|| "contract".to_string()),
            state_variables,
            functions: Vec::new(),
            findings: Vec::new(),
        };

        let owner_vars = summary.owner_variable_names();
        summary.functions = def
            .nodes
            .iter()
            .filter_map(|node| match node {
                Node::FunctionDefinition(func) if func.implemented && !func.is_constructor() => {
                    Some(summarize_function(func, self.source, &owner_vars, self.heuristics))
                }
                _ => None,
            })
            .collect();

        debug!(
            contract = %summary.name,
            state_variables = summary.state_variables.len(),
            functions = summary.functions.len(),
            "summarized contract"
        );
        summary
    }
}
