use solflow::finding::*;
use solflow::rule::{Rule, RuleContext};
use solflow::summary::Parameter;

/// Address parameters used without a `!= address(0)`-style guard.
pub struct MissingZeroAddressCheck;

/// Integer parameters feeding a state-changing function without any bound.
pub struct MissingBoundsCheck;

/// Parameters the body references but never guards, in declaration order.
fn unvalidated<'a>(
    ctx: &'a RuleContext,
    class: impl Fn(&Parameter) -> bool + 'a,
) -> impl Iterator<Item = &'a Parameter> + 'a {
    ctx.function.parameters.iter().filter(move |p| {
        class(*p)
            && ctx
                .function
                .flow
                .parameter(&p.name)
                .is_some_and(|flow| flow.is_referenced && !flow.has_validation_evidence)
    })
}

impl Rule for MissingZeroAddressCheck {
    fn category(&self) -> Category {
        Category::MissingZeroAddressCheck
    }

    fn description(&self) -> &str {
        "Address parameter used without a zero-address check"
    }

    fn severity(&self) -> Severity {
        Severity::Medium
    }

    fn evaluate(&self, ctx: &RuleContext) -> Vec<Finding> {
        unvalidated(ctx, Parameter::is_address)
            .map(|param| Finding {
                category: self.category(),
                severity: self.severity(),
                title: format!("Missing zero-address check on `{}`", param.name),
                message: format!(
                    "Parameter `{}` ({}) of `{}` is used without checking it against \
                     `address(0)`.",
                    param.name, param.type_name, ctx.function.name
                ),
                contract_name: ctx.contract.name.clone(),
                function_name: ctx.function.name.clone(),
                location: ctx.span_location(param.span),
                detail: Some(param.name.clone()),
                recommendation: Some(format!(
                    "Add `require({} != address(0));` before using it.",
                    param.name
                )),
            })
            .collect()
    }
}

impl Rule for MissingBoundsCheck {
    fn category(&self) -> Category {
        Category::MissingBoundsCheck
    }

    fn description(&self) -> &str {
        "Numeric parameter reaches a state change without a bounds check"
    }

    fn severity(&self) -> Severity {
        Severity::Low
    }

    fn evaluate(&self, ctx: &RuleContext) -> Vec<Finding> {
        if !ctx.function.mutates_state {
            return Vec::new();
        }
        unvalidated(ctx, Parameter::is_integer)
            .map(|param| Finding {
                category: self.category(),
                severity: self.severity(),
                title: format!("Missing bounds check on `{}`", param.name),
                message: format!(
                    "Parameter `{}` ({}) of `{}` reaches a state change without being \
                     compared against any bound.",
                    param.name, param.type_name, ctx.function.name
                ),
                contract_name: ctx.contract.name.clone(),
                function_name: ctx.function.name.clone(),
                location: ctx.span_location(param.span),
                detail: Some(param.name.clone()),
                recommendation: Some(format!(
                    "Validate `{}` with `require` against its allowed range.",
                    param.name
                )),
            })
            .collect()
    }
}
