//! Flow heuristics over a function body slice.
//!
//! Three independent signals are recovered from text alone, without a control-flow
//! graph: arithmetic inside `unchecked` blocks, per-parameter validation guards,
//! and external calls that precede state writes.

pub mod ordering;
pub mod patterns;
pub mod text;
pub mod unchecked;
pub mod validation;

use serde::Serialize;

pub use patterns::OperationKind;
pub use unchecked::ArithmeticOp;
pub use validation::ParameterFlow;

use crate::heuristics::ValidationShape;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlowFacts {
    pub has_unchecked_block: bool,
    pub unchecked_has_arithmetic: bool,
    pub arithmetic_ops: Vec<ArithmeticOp>,
    pub external_call_precedes_state_write: bool,
    /// Earliest external call when the ordering check fires.
    pub first_reordered_call: Option<usize>,
    /// In parameter declaration order.
    pub parameters: Vec<ParameterFlow>,
}

impl FlowFacts {
    /// `body` must already have comments masked.
    pub fn analyze<'a>(
        body: &str,
        parameter_names: impl IntoIterator<Item = &'a str>,
        shapes: &[ValidationShape],
    ) -> Self {
        let regions = unchecked::find_unchecked_regions(body);
        let arithmetic_ops = unchecked::arithmetic_ops(body, &regions);
        let first_reordered_call = ordering::call_before_write(body);
        let parameters = parameter_names
            .into_iter()
            .filter(|name| !name.is_empty())
            .map(|name| validation::parameter_flow(body, name, shapes))
            .collect();

        Self {
            has_unchecked_block: !regions.is_empty(),
            unchecked_has_arithmetic: arithmetic_ops.iter().any(|op| op.inside_unchecked),
            arithmetic_ops,
            external_call_precedes_state_write: first_reordered_call.is_some(),
            first_reordered_call,
            parameters,
        }
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterFlow> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn unchecked_ops(&self) -> impl Iterator<Item = &ArithmeticOp> {
        self.arithmetic_ops.iter().filter(|op| op.inside_unchecked)
    }
}
