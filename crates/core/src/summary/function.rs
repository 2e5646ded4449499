use crate::ast::{FunctionDefinition, SourceSpan};
use crate::flow::patterns::{self, SENSITIVE_SIGNATURES};
use crate::flow::{text, FlowFacts};
use crate::heuristics::Heuristics;

use super::types::*;

/// Derive the behavioral summary of one function definition.
/// `owner_vars` are the owner-like state variables of the enclosing contract.
pub fn summarize_function(
    def: &FunctionDefinition,
    source: &str,
    owner_vars: &[String],
    heuristics: &Heuristics,
) -> FunctionSummary {
    let kind = FunctionKind::parse(def.kind.as_deref());
    let visibility = Visibility::parse(def.visibility.as_deref());
    let mutability = Mutability::parse(def.state_mutability.as_deref());
    let span = SourceSpan::from_src(def.src.as_deref());

    let (body_span, body) = body_slice(def, span, source);
    let body = text::mask_comments(body);

    let parameters: Vec<Parameter> = def
        .parameters
        .parameters
        .iter()
        .map(|p| Parameter {
            name: p.name.clone(),
            type_name: p.type_string().to_string(),
            span: SourceSpan::from_src(p.src.as_deref()),
        })
        .collect();

    let modifiers: Vec<String> = def.modifier_names().map(str::to_string).collect();
    let uses_known_modifier = modifiers.iter().any(|m| heuristics.is_access_modifier(m));
    let has_owner_guard_expression = heuristics.has_owner_guard(&body);

    let sensitive_ops = sensitive_operations(&body);
    let mutates_state = !mutability.is_read_only() && patterns::has_state_mutation(&body);
    let flow = FlowFacts::analyze(
        &body,
        parameters.iter().map(|p| p.name.as_str()),
        heuristics.validation_shapes(),
    );

    FunctionSummary {
        name: function_name(def, kind),
        kind,
        visibility,
        mutability,
        is_entry_point: visibility.is_entry_point(),
        span,
        body_span,
        modifiers,
        parameters,
        sensitive_ops,
        mutates_state,
        has_access_control: uses_known_modifier || has_owner_guard_expression,
        access_control: AccessControlEvidence {
            uses_known_modifier,
            has_owner_guard_expression,
            owner_variable_names: owner_vars.to_vec(),
        },
        flow,
    }
}

/// Fallback and receive functions have no name in the AST.
fn function_name(def: &FunctionDefinition, kind: FunctionKind) -> String {
    if !def.name.is_empty() {
        return def.name.clone();
    }
    match kind {
        FunctionKind::Fallback => "fallback".to_string(),
        FunctionKind::Receive => "receive".to_string(),
        _ => "anonymous".to_string(),
    }
}

/// Prefer the body block; fall back to the whole definition, then to nothing.
fn body_slice<'a>(
    def: &FunctionDefinition,
    span: Option<SourceSpan>,
    source: &'a str,
) -> (Option<SourceSpan>, &'a str) {
    let body_span = def
        .body
        .as_ref()
        .and_then(|b| SourceSpan::from_src(b.src.as_deref()));
    [body_span, span]
        .into_iter()
        .flatten()
        .find_map(|s| s.slice(source).map(|text| (Some(s), text)))
        .unwrap_or((None, ""))
}

/// One entry per matching signature; presence only, not count.
pub fn sensitive_operations(body: &str) -> Vec<SensitiveOperation> {
    SENSITIVE_SIGNATURES
        .iter()
        .filter_map(|sig| {
            sig.regex.find(body).map(|m| SensitiveOperation {
                kind: sig.kind,
                detail: sig.detail.to_string(),
                offset: m.start(),
            })
        })
        .collect()
}
