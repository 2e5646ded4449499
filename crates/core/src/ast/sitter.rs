use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};
use tree_sitter::{Node, Parser};

use super::nodes::SourceUnit;
use super::provider::{parse_ast_json, SyntaxProvider};
use crate::error::AnalysisError;

static IMPLICIT_WIDTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(u?int)\b").expect("integer alias regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Builds the solc-shaped compact AST from a tree-sitter-solidity parse, for
/// hosts without a compiler. Only the declaration layer is produced: contracts,
/// state variables, and function headers with parameter and body spans.
/// Statements stay in the source text, where the flow heuristics read them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeSitterProvider;

impl TreeSitterProvider {
    /// Parse straight to a [`SourceUnit`].
    pub fn source_unit(&self, path: &Path, source: &str) -> Result<SourceUnit, AnalysisError> {
        parse_ast_json(path, &self.provide_ast(path, source)?)
    }

    fn build(&self, path: &Path, source: &str) -> Result<Value, AnalysisError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_solidity::LANGUAGE.into())
            .map_err(|e| AnalysisError::parse_failure(path, format!("tree-sitter: {e}")))?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| AnalysisError::parse_failure(path, "tree-sitter returned no tree"))?;
        let root = tree.root_node();

        if let Some(bad) = first_syntax_error(root) {
            let at = bad.start_position();
            return Err(AnalysisError::parse_failure(
                path,
                format!("syntax error at {}:{}", at.row + 1, at.column + 1),
            ));
        }

        let builder = AstBuilder { source };
        let nodes: Vec<Value> = named_children(root)
            .into_iter()
            .filter_map(|node| builder.top_level(node))
            .collect();
        Ok(json!({
            "nodeType": "SourceUnit",
            "absolutePath": path.to_string_lossy(),
            "src": src(root),
            "nodes": nodes,
        }))
    }
}

impl SyntaxProvider for TreeSitterProvider {
    fn name(&self) -> &str {
        "tree-sitter"
    }

    fn provide_ast(&self, path: &Path, source: &str) -> Result<String, AnalysisError> {
        self.build(path, source).map(|ast| ast.to_string())
    }
}

fn first_syntax_error(node: Node) -> Option<Node> {
    if !node.has_error() {
        return None;
    }
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    children(node).into_iter().find_map(first_syntax_error)
}

fn children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

fn named_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

fn src(node: Node) -> String {
    let range = node.byte_range();
    format!("{}:{}:0", range.start, range.len())
}

/// Canonical spelling of a type as solc prints it in `typeString`.
fn type_string(raw: &str) -> String {
    let collapsed = WHITESPACE.replace_all(raw.trim(), " ");
    IMPLICIT_WIDTH.replace_all(&collapsed, "${1}256").into_owned()
}

struct AstBuilder<'s> {
    source: &'s str,
}

impl<'s> AstBuilder<'s> {
    fn text(&self, node: Node) -> &'s str {
        &self.source[node.byte_range()]
    }

    fn field_text(&self, node: Node, field: &str) -> Option<&'s str> {
        node.child_by_field_name(field).map(|n| self.text(n))
    }

    fn top_level(&self, node: Node) -> Option<Value> {
        match node.kind() {
            "pragma_directive" => Some(json!({"nodeType": "PragmaDirective", "src": src(node)})),
            "import_directive" => Some(json!({"nodeType": "ImportDirective", "src": src(node)})),
            "contract_declaration" => Some(self.contract(node, "contract")),
            "interface_declaration" => Some(self.contract(node, "interface")),
            "library_declaration" => Some(self.contract(node, "library")),
            _ => None,
        }
    }

    fn contract(&self, node: Node, kind: &str) -> Value {
        let members: Vec<Value> = node
            .child_by_field_name("body")
            .or_else(|| children(node).into_iter().find(|c| c.kind() == "contract_body"))
            .map(named_children)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|member| self.member(member, kind))
            .collect();
        json!({
            "nodeType": "ContractDefinition",
            "name": self.field_text(node, "name").unwrap_or_default(),
            "contractKind": kind,
            "abstract": children(node).iter().any(|c| c.kind() == "abstract"),
            "src": src(node),
            "nodes": members,
        })
    }

    fn member(&self, node: Node, contract_kind: &str) -> Option<Value> {
        match node.kind() {
            "function_definition" => Some(self.function(node, "function", contract_kind)),
            "constructor_definition" => Some(self.function(node, "constructor", contract_kind)),
            "fallback_receive_definition" => {
                let kind = if children(node).iter().any(|c| c.kind() == "receive") {
                    "receive"
                } else {
                    "fallback"
                };
                Some(self.function(node, kind, contract_kind))
            }
            "state_variable_declaration" => Some(self.state_variable(node)),
            "modifier_definition" => Some(json!({
                "nodeType": "ModifierDefinition",
                "name": self.field_text(node, "name").unwrap_or_default(),
                "src": src(node),
            })),
            "event_definition" => Some(json!({
                "nodeType": "EventDefinition",
                "name": self.field_text(node, "name").unwrap_or_default(),
                "src": src(node),
            })),
            _ => None,
        }
    }

    fn function(&self, node: Node, kind: &str, contract_kind: &str) -> Value {
        let parts = children(node);

        let mut visibility = None;
        let mut mutability = "nonpayable";
        let mut modifiers = Vec::new();
        for part in &parts {
            match part.kind() {
                "visibility" | "public" | "external" | "internal" | "private" => {
                    visibility = Some(self.text(*part).trim());
                }
                "state_mutability" | "pure" | "view" | "payable" | "constant" => {
                    mutability = match self.text(*part).trim() {
                        "constant" => "view",
                        other => other,
                    };
                }
                "modifier_invocation" => modifiers.push(json!({
                    "nodeType": "ModifierInvocation",
                    "modifierName": {"nodeType": "IdentifierPath", "name": self.modifier_name(*part)},
                })),
                _ => {}
            }
        }
        let visibility = visibility.unwrap_or(match kind {
            "receive" | "fallback" => "external",
            _ if contract_kind == "interface" => "external",
            _ => "public",
        });

        let body = node
            .child_by_field_name("body")
            .or_else(|| parts.iter().copied().find(|p| p.kind() == "function_body"))
            .map(|b| json!({"nodeType": "Block", "src": src(b)}));

        json!({
            "nodeType": "FunctionDefinition",
            "name": self.field_text(node, "name").unwrap_or_default(),
            "kind": kind,
            "visibility": visibility,
            "stateMutability": mutability,
            "modifiers": modifiers,
            "parameters": {"nodeType": "ParameterList", "parameters": self.parameters(node, &parts)},
            "implemented": body.is_some(),
            "body": body,
            "src": src(node),
        })
    }

    /// Input parameters sit directly under the definition; return parameters
    /// are nested in `return_type_definition` and never reach this list.
    fn parameters(&self, node: Node, parts: &[Node]) -> Vec<Value> {
        let direct: Vec<Node> = parts
            .iter()
            .copied()
            .filter(|p| p.kind() == "parameter")
            .collect();
        let params = if direct.is_empty() {
            node.child_by_field_name("parameters")
                .map(|list| {
                    named_children(list)
                        .into_iter()
                        .filter(|p| p.kind() == "parameter")
                        .collect()
                })
                .unwrap_or_default()
        } else {
            direct
        };
        params.into_iter().map(|p| self.parameter(p)).collect()
    }

    fn parameter(&self, node: Node) -> Value {
        let type_node = node
            .child_by_field_name("type")
            .or_else(|| named_children(node).into_iter().next());
        let mut type_name = type_node.map(|t| type_string(self.text(t))).unwrap_or_default();
        if let Some(location) = children(node)
            .into_iter()
            .find(|c| matches!(c.kind(), "memory" | "storage" | "calldata"))
        {
            type_name.push(' ');
            type_name.push_str(self.text(location));
        }
        json!({
            "nodeType": "VariableDeclaration",
            "name": self.field_text(node, "name").unwrap_or_default(),
            "stateVariable": false,
            "typeDescriptions": {"typeString": type_name},
            "src": src(node),
        })
    }

    fn state_variable(&self, node: Node) -> Value {
        let parts = named_children(node);
        let type_name = self
            .field_text(node, "type")
            .or_else(|| parts.iter().find(|p| p.kind() == "type_name").map(|p| self.text(*p)))
            .map(type_string)
            .unwrap_or_default();
        let name = self
            .field_text(node, "name")
            .or_else(|| parts.iter().find(|p| p.kind() == "identifier").map(|p| self.text(*p)))
            .unwrap_or_default();
        json!({
            "nodeType": "VariableDeclaration",
            "name": name,
            "stateVariable": true,
            "typeDescriptions": {"typeString": type_name},
            "src": src(node),
        })
    }

    fn modifier_name(&self, node: Node) -> &'s str {
        named_children(node)
            .into_iter()
            .find(|c| c.kind() == "identifier")
            .map(|c| self.text(c))
            .unwrap_or_else(|| {
                let text = self.text(node);
                text.split('(').next().unwrap_or(text).trim()
            })
    }
}
