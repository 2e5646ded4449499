use std::path::Path;

use solflow::ast::{parse_ast_json, SourceUnit, TreeSitterProvider};
use solflow::finding::Finding;
use solflow::heuristics::Heuristics;
use solflow::rule::{Rule, RuleRegistry};
use solflow::summary::ContractExtractor;

pub const TEST_FILE: &str = "Test.sol";

/// Findings from a registry holding `rules`, over every contract in `source`.
pub fn run_all(rules: Vec<Box<dyn Rule>>, source: &str) -> Vec<Finding> {
    let unit = TreeSitterProvider
        .source_unit(Path::new(TEST_FILE), source)
        .unwrap();
    evaluate(rules, source, &unit)
}

pub fn run(rule: impl Rule + 'static, source: &str) -> Vec<Finding> {
    run_all(vec![Box::new(rule)], source)
}

/// Like [`run`], over a hand-written compact AST instead of a parse of `source`.
pub fn run_with_ast(rule: impl Rule + 'static, source: &str, ast_json: &str) -> Vec<Finding> {
    let unit = parse_ast_json(Path::new(TEST_FILE), ast_json).unwrap();
    evaluate(vec![Box::new(rule)], source, &unit)
}

fn evaluate(rules: Vec<Box<dyn Rule>>, source: &str, unit: &SourceUnit) -> Vec<Finding> {
    let heuristics = Heuristics::default();
    let mut registry = RuleRegistry::new();
    registry.register_all(rules);
    ContractExtractor::new(source, &heuristics)
        .extract(unit)
        .iter()
        .flat_map(|c| registry.evaluate_contract(Path::new(TEST_FILE), source, c))
        .collect()
}
