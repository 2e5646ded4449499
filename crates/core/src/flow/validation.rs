use regex::Regex;
use serde::Serialize;

use super::text;
use crate::heuristics::ValidationShape;

/// Per-parameter evidence gathered from the body text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterFlow {
    pub name: String,
    pub is_referenced: bool,
    pub has_validation_evidence: bool,
    /// Name of the first guard shape that matched.
    pub matched_shape: Option<&'static str>,
    /// Offset of the first whole-word reference, relative to the body slice.
    pub first_reference: Option<usize>,
}

/// Test the guard shapes for `name` anywhere in `body`. Position independent:
/// a check placed after the use it should protect still counts.
pub fn parameter_flow(body: &str, name: &str, shapes: &[ValidationShape]) -> ParameterFlow {
    let first_reference = text::word_offsets(body, name).first().copied();
    let is_referenced = first_reference.is_some();

    let matched_shape = if is_referenced {
        let escaped = regex::escape(name);
        shapes
            .iter()
            .find(|shape| {
                Regex::new(&shape.template.replace("{p}", &escaped))
                    .is_ok_and(|re| re.is_match(body))
            })
            .map(|shape| shape.name)
    } else {
        None
    };

    ParameterFlow {
        name: name.to_string(),
        is_referenced,
        has_validation_evidence: matched_shape.is_some(),
        matched_shape,
        first_reference,
    }
}
